use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, User};

/// Post entity - a text entry published by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    /// Set once at creation.
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    /// Reference to an attachment managed by external media storage.
    pub image: Option<String>,
}

/// A post that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(author_id: i64, text: String, group_id: Option<i64>, image: Option<String>) -> Self {
        Self {
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
            image,
        }
    }
}

/// A post together with the rows it references, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

const PREVIEW_CHARS: usize = 15;

impl std::fmt::Display for PostEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview: String = self.post.text.chars().take(PREVIEW_CHARS).collect();
        write!(
            f,
            "{}... Author: {}. Date: {}",
            preview, self.author, self.post.pub_date
        )
    }
}
