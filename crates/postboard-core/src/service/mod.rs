//! The access layer: every read and write the application exposes.
//!
//! Each call receives the requester explicitly. Nothing here keeps
//! per-request state; the store is the only shared mutable resource.

mod read;
mod write;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Comment, CommentEntry, Group, Post, PostEntry, User};
use crate::error::DomainError;
use crate::pagination::Page;
use crate::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

pub const INDEX_PAGE_SIZE: u64 = 10;
pub const GROUP_PAGE_SIZE: u64 = 12;
pub const PROFILE_PAGE_SIZE: u64 = 10;
pub const FOLLOW_PAGE_SIZE: u64 = 10;

/// A group and one page of its posts.
#[derive(Debug, Clone, Serialize)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// An author, one page of their posts, and whether the requester follows them.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub author: User,
    pub page: Page<PostEntry>,
    pub following: bool,
}

/// A single post with all of its comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub entry: PostEntry,
    pub comments: Vec<CommentEntry>,
}

/// Access layer over the repository ports.
#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        follows: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
            comments,
            follows,
        }
    }

    async fn user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    /// Resolve a post through its author's username. A post id that exists
    /// under a different author is reported as missing.
    async fn post_by_author(&self, username: &str, post_id: i64) -> Result<(User, Post), DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("post", format!("{username}/{post_id}")))?;

        let post = self
            .posts
            .find_by_author(author.id, post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", format!("{username}/{post_id}")))?;

        Ok((author, post))
    }

    async fn users_by_id(&self, ids: BTreeSet<i64>) -> Result<HashMap<i64, User>, DomainError> {
        let ids: Vec<i64> = ids.into_iter().collect();
        let users = self.users.find_many(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Attach authors and groups to a page of posts.
    async fn entries(&self, page: Page<Post>) -> Result<Page<PostEntry>, DomainError> {
        let author_ids = page.items.iter().map(|p| p.author_id).collect();
        let group_ids: Vec<i64> = page
            .items
            .iter()
            .filter_map(|p| p.group_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let authors = self.users_by_id(author_ids).await?;
        let groups: HashMap<i64, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_many(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        page.try_map(|post| {
            let author = authors
                .get(&post.author_id)
                .cloned()
                .ok_or_else(|| missing_author("post", post.id, post.author_id))?;
            let group = post.group_id.and_then(|id| groups.get(&id).cloned());
            Ok(PostEntry {
                post,
                author,
                group,
            })
        })
    }

    async fn comment_entries(&self, comments: Vec<Comment>) -> Result<Vec<CommentEntry>, DomainError> {
        let authors = self
            .users_by_id(comments.iter().map(|c| c.author_id).collect())
            .await?;

        comments
            .into_iter()
            .map(|comment| {
                let author = authors
                    .get(&comment.author_id)
                    .cloned()
                    .ok_or_else(|| missing_author("comment", comment.id, comment.author_id))?;
                Ok(CommentEntry { comment, author })
            })
            .collect()
    }

    async fn group_for(&self, post: &Post) -> Result<Option<Group>, DomainError> {
        match post.group_id {
            Some(id) => Ok(self.groups.find_by_id(id).await?),
            None => Ok(None),
        }
    }
}

fn missing_author(entity: &str, id: i64, author_id: i64) -> DomainError {
    tracing::error!(entity, id, author_id, "Row references a missing author");
    DomainError::Internal(format!("{entity} {id} references missing author {author_id}"))
}
