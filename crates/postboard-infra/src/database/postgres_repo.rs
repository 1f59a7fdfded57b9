//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, Set, Unchanged,
};

use postboard_core::domain::{Comment, Group, NewComment, NewPost, Post, User};
use postboard_core::error::RepoError;
use postboard_core::pagination::{Page, PageRequest};
use postboard_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow edge repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = GroupEntity::find()
            .filter(group::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// WHERE clause for a post listing.
fn post_condition(filter: PostFilter) -> Condition {
    match filter {
        PostFilter::All => Condition::all(),
        PostFilter::Group(group_id) => Condition::all().add(post::Column::GroupId.eq(group_id)),
        PostFilter::Author(author_id) => Condition::all().add(post::Column::AuthorId.eq(author_id)),
        PostFilter::FollowedBy(user_id) => Condition::all().add(
            post::Column::AuthorId.in_subquery(
                Query::select()
                    .column(follow::Column::AuthorId)
                    .from(FollowEntity)
                    .and_where(follow::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        ),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        filter: PostFilter,
        page: &PageRequest,
        per_page: u64,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page);

        let totals = paginator.num_items_and_pages().await.map_err(query_error)?;
        let total_pages = totals.number_of_pages.max(1);
        let number = page.resolve(total_pages);

        let items = paginator
            .fetch_page(number - 1)
            .await
            .map_err(query_error)?;

        tracing::debug!(?filter, page = number, total_pages, "Listed posts");

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            number,
            per_page,
            total_items: totals.number_of_items,
            total_pages,
        })
    }

    async fn find_by_author(
        &self,
        author_id: i64,
        post_id: i64,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(post_id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            text: Set(new.text),
            pub_date: Set(new.pub_date.into()),
            author_id: Set(new.author_id),
            group_id: Set(new.group_id),
            image: Set(new.image),
        }
        .insert(&self.db)
        .await
        .map_err(query_error)?;

        Ok(model.into())
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Unchanged(post.id),
            text: Set(post.text.clone()),
            group_id: Set(post.group_id),
            image: Set(post.image.clone()),
            pub_date: NotSet,
            author_id: NotSet,
        }
        .update(&self.db)
        .await
        .map_err(query_error)?;

        Ok(model.into())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new.post_id),
            author_id: Set(new.author_id),
            text: Set(new.text),
            created: Set(new.created.into()),
        }
        .insert(&self.db)
        .await
        .map_err(query_error)?;

        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::Created)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let edge = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(edge.is_some())
    }

    async fn create(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        // The unique index on (user_id, author_id) makes concurrent follows a no-op.
        let edge = follow::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            author_id: Set(author_id),
        };

        let inserted = FollowEntity::insert(edge)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(user_id, author_id, inserted, "Follow insert");
        Ok(inserted > 0)
    }

    async fn delete(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected > 0)
    }
}
