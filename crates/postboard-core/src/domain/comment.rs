use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Comment entity - a reply attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A comment that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: i64, author_id: i64, text: String) -> Self {
        Self {
            post_id,
            author_id,
            text,
            created: Utc::now(),
        }
    }
}

/// A comment together with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: User,
}
