//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the foreign-key policies of the SQL schema: deleting a user
//! removes their posts, comments and follow edges; deleting a post removes
//! its comments; deleting a group clears the group of its posts.
//! Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use postboard_core::BlogService;
use postboard_core::domain::{Comment, Follow, Group, NewComment, NewPost, Post, User};
use postboard_core::error::RepoError;
use postboard_core::pagination::{Page, PageRequest};
use postboard_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostFilter,
    PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    follows: BTreeMap<i64, Follow>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn follows_edge(&self, user_id: i64, author_id: i64) -> Option<i64> {
        self.follows
            .values()
            .find(|f| f.user_id == user_id && f.author_id == author_id)
            .map(|f| f.id)
    }

    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group_id) => post.group_id == Some(group_id),
            PostFilter::Author(author_id) => post.author_id == author_id,
            PostFilter::FollowedBy(user_id) => self.follows_edge(user_id, post.author_id).is_some(),
        }
    }

    fn remove_post(&mut self, post_id: i64) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// Shared in-memory tables. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the access layer with this store behind every port.
    pub fn blog_service(&self) -> BlogService {
        BlogService::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    /// Register a user, as the identity provider would.
    pub async fn add_user(&self, username: &str) -> User {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Create a group, as an administrator would.
    pub async fn add_group(&self, title: &str, slug: &str, description: &str) -> Group {
        let mut tables = self.tables.write().await;
        let group = Group {
            id: tables.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            slug: slug.to_string(),
        };
        tables.groups.insert(group.id, group.clone());
        group
    }

    /// Remove a user and everything that cascades from them.
    pub async fn delete_user(&self, user_id: i64) {
        let mut tables = self.tables.write().await;
        tables.users.remove(&user_id);
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == user_id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != user_id);
        tables
            .follows
            .retain(|_, f| f.user_id != user_id && f.author_id != user_id);
    }

    /// Remove a group; its posts stay, ungrouped.
    pub async fn delete_group(&self, group_id: i64) {
        let mut tables = self.tables.write().await;
        tables.groups.remove(&group_id);
        for post in tables.posts.values_mut() {
            if post.group_id == Some(group_id) {
                post.group_id = None;
            }
        }
    }

    /// Remove a post and its comments.
    pub async fn delete_post(&self, post_id: i64) {
        self.tables.write().await.remove_post(post_id);
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }

    pub async fn follow_count(&self) -> usize {
        self.tables.read().await.follows.len()
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Group, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.groups.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(
        &self,
        filter: PostFilter,
        page: &PageRequest,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| tables.matches(p, filter))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        Ok(Page::slice(posts, page, per_page))
    }

    async fn find_by_author(
        &self,
        author_id: i64,
        post_id: i64,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&post_id)
            .filter(|p| p.author_id == author_id)
            .cloned())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new.author_id) {
            return Err(RepoError::Constraint(format!(
                "posts.author_id {} has no matching user",
                new.author_id
            )));
        }
        if let Some(group_id) = new.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::Constraint(format!(
                    "posts.group_id {group_id} has no matching group"
                )));
            }
        }

        let post = Post {
            id: tables.next_id(),
            text: new.text,
            pub_date: new.pub_date,
            author_id: new.author_id,
            group_id: new.group_id,
            image: new.image,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        stored.text = post.text.clone();
        stored.group_id = post.group_id;
        stored.image = post.image.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new.post_id) {
            return Err(RepoError::Constraint(format!(
                "comments.post_id {} has no matching post",
                new.post_id
            )));
        }

        let comment = Comment {
            id: tables.next_id(),
            post_id: new.post_id,
            author_id: new.author_id,
            text: new.text,
            created: new.created,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(comments)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .follows_edge(user_id, author_id)
            .is_some())
    }

    async fn create(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        // Check and insert under one write guard.
        let mut tables = self.tables.write().await;
        if tables.follows_edge(user_id, author_id).is_some() {
            return Ok(false);
        }

        let edge = Follow {
            id: tables.next_id(),
            user_id,
            author_id,
        };
        tables.follows.insert(edge.id, edge);
        Ok(true)
    }

    async fn delete(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.follows_edge(user_id, author_id) {
            Some(id) => {
                tables.follows.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_delete_group_keeps_posts() {
        let store = InMemoryStore::new();
        let author = store.add_user("NikitaF").await;
        let group = store.add_group("Ramax Int", "ramax", "").await;
        let post = PostRepository::create(
            &store,
            NewPost::new(author.id, "Ramax Sys".to_string(), Some(group.id), None),
        )
        .await
        .unwrap();

        store.delete_group(group.id).await;

        let stored = BaseRepository::<Post, i64>::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.group_id, None);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = InMemoryStore::new();
        let author = store.add_user("KrisF").await;
        let reader = store.add_user("Ksu").await;
        let post = PostRepository::create(
            &store,
            NewPost::new(author.id, "text".to_string(), None, None),
        )
        .await
        .unwrap();
        CommentRepository::create(
            &store,
            NewComment {
                post_id: post.id,
                author_id: reader.id,
                text: "reply".to_string(),
                created: Utc::now(),
            },
        )
        .await
        .unwrap();
        FollowRepository::create(&store, reader.id, author.id)
            .await
            .unwrap();

        store.delete_user(author.id).await;

        assert_eq!(store.post_count().await, 0);
        assert_eq!(store.comment_count().await, 0);
        assert_eq!(store.follow_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_post_removes_comments() {
        let store = InMemoryStore::new();
        let author = store.add_user("NikitaF").await;
        let post = PostRepository::create(
            &store,
            NewPost::new(author.id, "text".to_string(), None, None),
        )
        .await
        .unwrap();
        CommentRepository::create(
            &store,
            NewComment::new(post.id, author.id, "reply".to_string()),
        )
        .await
        .unwrap();

        store.delete_post(post.id).await;

        assert_eq!(store.post_count().await, 0);
        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn test_post_requires_known_author() {
        let store = InMemoryStore::new();
        let result =
            PostRepository::create(&store, NewPost::new(99, "orphan".to_string(), None, None)).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
