//! Post, comment and follow writes.

use crate::domain::{CommentEntry, NewComment, NewPost, PostEntry, User};
use crate::error::DomainError;
use crate::forms::{CommentForm, PostForm, PostInput};
use crate::identity::Requester;

use super::BlogService;

impl BlogService {
    async fn clean_post(&self, form: PostForm) -> Result<PostInput, DomainError> {
        let group_exists = match form.group_id {
            Some(id) => self.groups.find_by_id(id).await?.is_some(),
            None => true,
        };
        Ok(form.validate(group_exists)?)
    }

    /// Publish a new post as the requester.
    pub async fn create_post(
        &self,
        requester: &Requester,
        form: PostForm,
    ) -> Result<PostEntry, DomainError> {
        let identity = requester.require()?;
        let input = self.clean_post(form).await?;

        let post = self
            .posts
            .create(NewPost::new(
                identity.user_id,
                input.text,
                input.group_id,
                input.image,
            ))
            .await?;
        tracing::info!(post_id = post.id, author = %identity.username, "Post created");

        let group = self.group_for(&post).await?;
        Ok(PostEntry {
            post,
            author: User {
                id: identity.user_id,
                username: identity.username.clone(),
            },
            group,
        })
    }

    /// Change a post's text, group and image.
    ///
    /// Only the author may edit. Anyone else gets `Forbidden`, which callers
    /// answer by sending the requester back to the post.
    pub async fn edit_post(
        &self,
        requester: &Requester,
        username: &str,
        post_id: i64,
        form: PostForm,
    ) -> Result<PostEntry, DomainError> {
        let identity = requester.require()?;
        if identity.username != username {
            tracing::debug!(post_id, editor = %identity.username, "Edit refused for non-author");
            return Err(DomainError::Forbidden);
        }

        let (author, mut post) = self.post_by_author(username, post_id).await?;
        let input = self.clean_post(form).await?;

        post.text = input.text;
        post.group_id = input.group_id;
        post.image = input.image;
        let post = self.posts.update(&post).await?;
        tracing::info!(post_id = post.id, author = %author.username, "Post edited");

        let group = self.group_for(&post).await?;
        Ok(PostEntry {
            post,
            author,
            group,
        })
    }

    /// Comment on the post addressed by (`username`, `post_id`).
    pub async fn add_comment(
        &self,
        requester: &Requester,
        username: &str,
        post_id: i64,
        form: CommentForm,
    ) -> Result<CommentEntry, DomainError> {
        let identity = requester.require()?;
        let (_, post) = self.post_by_author(username, post_id).await?;
        let text = form.validate()?;

        let comment = self
            .comments
            .create(NewComment::new(post.id, identity.user_id, text))
            .await?;
        tracing::info!(comment_id = comment.id, post_id = post.id, author = %identity.username, "Comment added");

        Ok(CommentEntry {
            comment,
            author: User {
                id: identity.user_id,
                username: identity.username.clone(),
            },
        })
    }

    /// Follow `username`. Returns false when nothing changed: the edge
    /// already existed or the requester tried to follow themself.
    pub async fn follow(&self, requester: &Requester, username: &str) -> Result<bool, DomainError> {
        let identity = requester.require()?;
        let author = self.user_by_username(username).await?;

        if author.id == identity.user_id {
            return Ok(false);
        }

        let created = self.follows.create(identity.user_id, author.id).await?;
        if created {
            tracing::info!(user = %identity.username, author = %author.username, "Follow created");
        }
        Ok(created)
    }

    /// Remove the requester's follow edge to `username`.
    pub async fn unfollow(&self, requester: &Requester, username: &str) -> Result<(), DomainError> {
        let identity = requester.require()?;
        let author = self.user_by_username(username).await?;

        if !self.follows.delete(identity.user_id, author.id).await? {
            return Err(DomainError::not_found(
                "follow",
                format!("{} -> {}", identity.username, author.username),
            ));
        }
        tracing::info!(user = %identity.username, author = %author.username, "Follow removed");
        Ok(())
    }
}
