use async_trait::async_trait;

use crate::domain::{Comment, Group, NewComment, NewPost, Post, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Lookup by primary key, shared by every repository.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;
}

/// Read-only access to the identity provider's users.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch several users at once; unknown ids are skipped.
    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>, RepoError>;
}

/// Read-only access to groups; groups are managed out of band.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(i64),
    /// Posts by every author the given user follows.
    FollowedBy(i64),
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// List posts newest first, one page at a time.
    async fn list(
        &self,
        filter: PostFilter,
        page: &PageRequest,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError>;

    /// Find a post only if `author_id` wrote it.
    async fn find_by_author(&self, author_id: i64, post_id: i64)
    -> Result<Option<Post>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Persist text, group and image. Author and publication date are never written.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// All comments on a post, newest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

/// Follow edge repository.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;

    /// Insert the edge unless it already exists. Returns true if a row was added.
    async fn create(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;

    /// Returns true if a row was removed.
    async fn delete(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;
}
