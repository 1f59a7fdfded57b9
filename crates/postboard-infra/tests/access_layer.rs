//! Access layer behaviour against the in-memory store.

use postboard_core::forms::{CommentForm, INVALID_CHOICE, PostForm, REQUIRED};
use postboard_core::{DomainError, PageRequest, Requester};
use postboard_infra::InMemoryStore;

const USERNAME: &str = "NikitaF";
const USERNAME2: &str = "KrisF";
const USERNAME3: &str = "Ksu";
const SLUG: &str = "ramax";

fn post_form(text: &str, group_id: Option<i64>) -> PostForm {
    PostForm {
        text: text.to_string(),
        group_id,
        image: None,
    }
}

fn comment_form(text: &str) -> CommentForm {
    CommentForm {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_new_post_appears_in_global_feed_only() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let group = store.add_group("Ramax Int", SLUG, "").await;
    let requester = Requester::user(user.id, USERNAME);

    let created = blog
        .create_post(&requester, post_form("Ramax Sys, Ramax int", None))
        .await
        .unwrap();

    let feed = blog.recent_posts(&PageRequest::first()).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items[0].post.id, created.post.id);
    assert_eq!(feed.items[0].author.username, USERNAME);

    let group_feed = blog.group_posts(&group.slug, &PageRequest::first()).await.unwrap();
    assert!(group_feed.page.is_empty());
}

#[tokio::test]
async fn test_group_feed_lists_only_its_posts_newest_first() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let ramax = store.add_group("Ramax Int", SLUG, "").await;
    let other = store.add_group("new_test", "new_test-slag", "new_test").await;
    let requester = Requester::user(user.id, USERNAME);

    for (text, group) in [
        ("first", Some(ramax.id)),
        ("elsewhere", Some(other.id)),
        ("second", Some(ramax.id)),
        ("ungrouped", None),
    ] {
        blog.create_post(&requester, post_form(text, group))
            .await
            .unwrap();
    }

    let feed = blog.group_posts(SLUG, &PageRequest::first()).await.unwrap();
    assert_eq!(feed.group, ramax);
    let texts: Vec<&str> = feed.page.items.iter().map(|e| e.post.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);
    assert!(
        feed.page
            .items
            .iter()
            .all(|e| e.group.as_ref().map(|g| g.id) == Some(ramax.id))
    );
}

#[tokio::test]
async fn test_unknown_group_is_not_found() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();

    let result = blog.group_posts("missing", &PageRequest::first()).await;

    assert!(matches!(result, Err(DomainError::NotFound { entity: "group", .. })));
}

#[tokio::test]
async fn test_page_sizes() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let group = store.add_group("Ramax Int", SLUG, "").await;
    let requester = Requester::user(user.id, USERNAME);

    for i in 0..13 {
        blog.create_post(&requester, post_form(&format!("post {i}"), Some(group.id)))
            .await
            .unwrap();
    }

    let index = blog.recent_posts(&PageRequest::first()).await.unwrap();
    assert_eq!(index.len(), 10);
    assert_eq!(index.total_pages, 2);

    let grouped = blog.group_posts(SLUG, &PageRequest::first()).await.unwrap();
    assert_eq!(grouped.page.len(), 12);

    let profile = blog
        .profile(&Requester::Anonymous, USERNAME, &PageRequest::number(2))
        .await
        .unwrap();
    assert_eq!(profile.page.len(), 3);
    assert_eq!(profile.page.items[2].post.text, "post 0");

    let beyond = blog.recent_posts(&PageRequest::number(40)).await.unwrap();
    assert_eq!(beyond.number, 2);
}

#[tokio::test]
async fn test_empty_text_is_rejected_without_write() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let requester = Requester::user(user.id, USERNAME);

    let result = blog.create_post(&requester, post_form("  ", Some(404))).await;

    match result {
        Err(DomainError::Validation(errors)) => {
            assert_eq!(errors.field("text"), vec![REQUIRED]);
            assert_eq!(errors.field("group_id"), vec![INVALID_CHOICE]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(store.post_count().await, 0);
}

#[tokio::test]
async fn test_anonymous_cannot_create_post() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();

    let result = blog
        .create_post(&Requester::Anonymous, post_form("ramax", None))
        .await;

    assert!(matches!(result, Err(DomainError::AuthenticationRequired)));
    assert_eq!(store.post_count().await, 0);
}

#[tokio::test]
async fn test_edit_keeps_pub_date_and_author() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let group = store.add_group("new_test", "new_test-slag", "new_test").await;
    let requester = Requester::user(user.id, USERNAME);

    let original = blog
        .create_post(&requester, post_form("Ramax Sys, Ramax int", None))
        .await
        .unwrap();

    let edited = blog
        .edit_post(
            &requester,
            USERNAME,
            original.post.id,
            PostForm {
                text: "ramax".to_string(),
                group_id: Some(group.id),
                image: Some("posts/small.gif".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.post.text, "ramax");
    assert_eq!(edited.group, Some(group));
    assert_eq!(edited.post.image.as_deref(), Some("posts/small.gif"));
    assert_eq!(edited.post.pub_date, original.post.pub_date);
    assert_eq!(edited.author, original.author);
}

#[tokio::test]
async fn test_non_author_edit_is_forbidden_and_changes_nothing() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let author = store.add_user(USERNAME).await;
    let other = store.add_user("non_author").await;

    let post = blog
        .create_post(&Requester::user(author.id, USERNAME), post_form("original", None))
        .await
        .unwrap();

    let result = blog
        .edit_post(
            &Requester::user(other.id, "non_author"),
            USERNAME,
            post.post.id,
            post_form("hijacked", None),
        )
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden)));

    let detail = blog.post_detail(USERNAME, post.post.id).await.unwrap();
    assert_eq!(detail.entry.post.text, "original");
}

#[tokio::test]
async fn test_edit_missing_post_is_not_found() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;

    let result = blog
        .edit_post(&Requester::user(user.id, USERNAME), USERNAME, 999, post_form("x", None))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_post_detail_requires_matching_author() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let author = store.add_user(USERNAME).await;
    store.add_user(USERNAME2).await;

    let post = blog
        .create_post(&Requester::user(author.id, USERNAME), post_form("mine", None))
        .await
        .unwrap();

    assert!(blog.post_detail(USERNAME, post.post.id).await.is_ok());
    let result = blog.post_detail(USERNAME2, post.post.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { entity: "post", .. })));
}

#[tokio::test]
async fn test_comments_listed_newest_first() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let author = store.add_user(USERNAME).await;
    let reader = store.add_user(USERNAME3).await;
    let author_req = Requester::user(author.id, USERNAME);
    let reader_req = Requester::user(reader.id, USERNAME3);

    let post = blog
        .create_post(&author_req, post_form("Ramax Sys, Ramax int", None))
        .await
        .unwrap();

    blog.add_comment(&reader_req, USERNAME, post.post.id, comment_form("first"))
        .await
        .unwrap();
    let latest = blog
        .add_comment(&author_req, USERNAME, post.post.id, comment_form("Текст комментария!"))
        .await
        .unwrap();

    let detail = blog.post_detail(USERNAME, post.post.id).await.unwrap();
    assert_eq!(detail.comments.len(), 2);
    assert_eq!(detail.comments[0].comment.id, latest.comment.id);
    assert_eq!(detail.comments[0].author.username, USERNAME);
    assert_eq!(detail.comments[1].author.username, USERNAME3);
}

#[tokio::test]
async fn test_comment_rules() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let author = store.add_user(USERNAME).await;
    let requester = Requester::user(author.id, USERNAME);
    let post = blog
        .create_post(&requester, post_form("Ramax", None))
        .await
        .unwrap();

    let anonymous = blog
        .add_comment(&Requester::Anonymous, USERNAME, post.post.id, comment_form("hi"))
        .await;
    assert!(matches!(anonymous, Err(DomainError::AuthenticationRequired)));

    let blank = blog
        .add_comment(&requester, USERNAME, post.post.id, comment_form(""))
        .await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));

    let missing = blog
        .add_comment(&requester, USERNAME, post.post.id + 100, comment_form("hi"))
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    assert_eq!(store.comment_count().await, 0);
}

#[tokio::test]
async fn test_follow_twice_creates_one_edge() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    store.add_user(USERNAME2).await;
    let requester = Requester::user(user.id, USERNAME);

    assert!(blog.follow(&requester, USERNAME2).await.unwrap());
    assert!(!blog.follow(&requester, USERNAME2).await.unwrap());

    assert_eq!(store.follow_count().await, 1);
}

#[tokio::test]
async fn test_follow_self_is_noop() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;

    let created = blog
        .follow(&Requester::user(user.id, USERNAME), USERNAME)
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(store.follow_count().await, 0);
}

#[tokio::test]
async fn test_follow_then_unfollow() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    store.add_user(USERNAME2).await;
    let requester = Requester::user(user.id, USERNAME);

    blog.follow(&requester, USERNAME2).await.unwrap();
    blog.unfollow(&requester, USERNAME2).await.unwrap();
    assert_eq!(store.follow_count().await, 0);

    let again = blog.unfollow(&requester, USERNAME2).await;
    assert!(matches!(again, Err(DomainError::NotFound { entity: "follow", .. })));
}

#[tokio::test]
async fn test_follow_unknown_author_is_not_found() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;

    let result = blog
        .follow(&Requester::user(user.id, USERNAME), "nobody")
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { entity: "user", .. })));
}

#[tokio::test]
async fn test_follow_feed_and_profile_flag() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();
    let user = store.add_user(USERNAME).await;
    let author = store.add_user(USERNAME2).await;
    let stranger = store.add_user(USERNAME3).await;
    let requester = Requester::user(user.id, USERNAME);

    blog.create_post(
        &Requester::user(author.id, USERNAME2),
        post_form("Хочу подписаться на Р.Киплинга", None),
    )
    .await
    .unwrap();
    blog.create_post(&Requester::user(stranger.id, USERNAME3), post_form("noise", None))
        .await
        .unwrap();

    let before = blog.follow_feed(&requester, &PageRequest::first()).await.unwrap();
    assert!(before.is_empty());

    blog.follow(&requester, USERNAME2).await.unwrap();

    let feed = blog.follow_feed(&requester, &PageRequest::first()).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items[0].author.username, USERNAME2);

    let profile = blog
        .profile(&requester, USERNAME2, &PageRequest::first())
        .await
        .unwrap();
    assert!(profile.following);
    assert_eq!(profile.author, author);

    let anonymous = blog
        .profile(&Requester::Anonymous, USERNAME2, &PageRequest::first())
        .await
        .unwrap();
    assert!(!anonymous.following);
}

#[tokio::test]
async fn test_follow_feed_requires_authentication() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();

    let result = blog
        .follow_feed(&Requester::Anonymous, &PageRequest::first())
        .await;

    assert!(matches!(result, Err(DomainError::AuthenticationRequired)));
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let store = InMemoryStore::new();
    let blog = store.blog_service();

    let result = blog
        .profile(&Requester::Anonymous, "ghost", &PageRequest::first())
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
