//! Feeds and single-post lookups.

use crate::domain::PostEntry;
use crate::error::DomainError;
use crate::identity::Requester;
use crate::pagination::{Page, PageRequest};
use crate::ports::PostFilter;

use super::{
    BlogService, FOLLOW_PAGE_SIZE, GROUP_PAGE_SIZE, GroupFeed, INDEX_PAGE_SIZE, PROFILE_PAGE_SIZE,
    PostDetail, Profile,
};

impl BlogService {
    /// Every post, newest first.
    pub async fn recent_posts(&self, page: &PageRequest) -> Result<Page<PostEntry>, DomainError> {
        let posts = self.posts.list(PostFilter::All, page, INDEX_PAGE_SIZE).await?;
        self.entries(posts).await
    }

    /// Posts tagged with the group identified by `slug`.
    pub async fn group_posts(&self, slug: &str, page: &PageRequest) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let posts = self
            .posts
            .list(PostFilter::Group(group.id), page, GROUP_PAGE_SIZE)
            .await?;
        let page = self.entries(posts).await?;

        Ok(GroupFeed { group, page })
    }

    /// An author's posts plus whether `requester` follows them.
    pub async fn profile(
        &self,
        requester: &Requester,
        username: &str,
        page: &PageRequest,
    ) -> Result<Profile, DomainError> {
        let author = self.user_by_username(username).await?;

        let posts = self
            .posts
            .list(PostFilter::Author(author.id), page, PROFILE_PAGE_SIZE)
            .await?;
        let page = self.entries(posts).await?;

        let following = match requester.identity() {
            Some(identity) => self.follows.exists(identity.user_id, author.id).await?,
            None => false,
        };

        Ok(Profile {
            author,
            page,
            following,
        })
    }

    /// Posts by every author the requester follows.
    pub async fn follow_feed(
        &self,
        requester: &Requester,
        page: &PageRequest,
    ) -> Result<Page<PostEntry>, DomainError> {
        let identity = requester.require()?;

        let posts = self
            .posts
            .list(PostFilter::FollowedBy(identity.user_id), page, FOLLOW_PAGE_SIZE)
            .await?;
        self.entries(posts).await
    }

    /// A post addressed by its author's username and its id, with comments.
    pub async fn post_detail(&self, username: &str, post_id: i64) -> Result<PostDetail, DomainError> {
        let (author, post) = self.post_by_author(username, post_id).await?;
        let group = self.group_for(&post).await?;

        let comments = self.comments.list_for_post(post.id).await?;
        let comments = self.comment_entries(comments).await?;

        Ok(PostDetail {
            entry: PostEntry {
                post,
                author,
                group,
            },
            comments,
        })
    }
}
