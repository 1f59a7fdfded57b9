//! Access layer values to response bodies.

use postboard_core::Page;
use postboard_core::domain::{CommentEntry, Group, PostEntry, User};
use postboard_shared::dto::{
    CommentResponse, GroupResponse, GroupSummary, PageResponse, PostResponse, UserSummary,
};

pub fn user(user: User) -> UserSummary {
    UserSummary {
        id: user.id,
        username: user.username,
    }
}

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn post(entry: PostEntry) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        text: entry.post.text,
        pub_date: entry.post.pub_date,
        author: user(entry.author),
        group: entry.group.map(|g| GroupSummary {
            id: g.id,
            title: g.title,
            slug: g.slug,
        }),
        image: entry.post.image,
    }
}

pub fn comment(entry: CommentEntry) -> CommentResponse {
    CommentResponse {
        id: entry.comment.id,
        text: entry.comment.text,
        created: entry.comment.created,
        author: user(entry.author),
    }
}

pub fn posts(page: Page<PostEntry>) -> PageResponse<PostResponse> {
    PageResponse {
        page: page.number,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        items: page.items.into_iter().map(post).collect(),
    }
}

/// Where a post can be viewed.
pub fn post_location(entry: &PostEntry) -> String {
    format!("/api/profiles/{}/posts/{}", entry.author.username, entry.post.id)
}
