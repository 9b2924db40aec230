//! `SQLite` implementation of [`PostRepository`], [`LikeRepository`], and [`FavoriteRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use community_app::ports::{FavoriteRepository, LikeRepository, PostRepository};
use community_domain::error::CommunityError;
use community_domain::id::{CategoryId, PostId, UserId};
use community_domain::message::NewMessage;
use community_domain::page::{PageRequest, Paged};
use community_domain::post::{
    Housing, JobOffer, NewPost, Post, PostExtension, PostFilter, PostType, PostView, Rideshare,
    SavedPost, SecondHand,
};
use community_domain::relation::Toggle;
use community_domain::time::{Timestamp, now};

use crate::error::StorageError;
use crate::message_repo::insert_message;
use crate::store::{
    Count, SqliteStore, Wrapper, encode_images, images, like_pattern, parse, timestamp,
};
use crate::tag_repo::post_tags;

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Post> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Post {
            id: PostId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            category_id: CategoryId::new(row.try_get("category_id")?),
            post_type: parse(row, "type")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            content: row.try_get("content")?,
            images: images(row, "images")?,
            location: row.try_get("location")?,
            ip: row.try_get("ip")?,
            view_num: row.try_get("view_num")?,
            like_num: row.try_get("like_num")?,
            share_num: row.try_get("share_num")?,
            favorite_num: row.try_get("favorite_num")?,
            comment_num: row.try_get("comment_num")?,
            status: parse(row, "status")?,
            is_stick: row.try_get("is_stick")?,
            is_recommend: row.try_get("is_recommend")?,
            created_at: timestamp(row, "createtime")?,
            updated_at: timestamp(row, "updatetime")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<PostView> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(post) = Wrapper::<Post>::from_row(row)?;
        Ok(Self(PostView {
            post,
            nickname: row.try_get("nickname")?,
            avatar: row.try_get("avatar")?,
            category_name: row.try_get("category_name")?,
            extension: None,
            tags: None,
            is_liked: Some(row.try_get("is_liked")?),
            is_favorite: Some(row.try_get("is_favorite")?),
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<SavedPost> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SavedPost {
            post_id: PostId::new(row.try_get("post_id")?),
            title: row.try_get("title")?,
            images: images(row, "images")?,
            view_num: row.try_get("view_num")?,
            like_num: row.try_get("like_num")?,
            comment_num: row.try_get("comment_num")?,
            post_created_at: timestamp(row, "post_createtime")?,
            nickname: row.try_get("nickname")?,
            avatar: row.try_get("avatar")?,
            saved_at: timestamp(row, "saved_at")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<SecondHand> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SecondHand {
            price: row.try_get("price")?,
            contact: row.try_get("contact")?,
            condition: row.try_get("condition")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Housing> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Housing {
            price: row.try_get("price")?,
            area: row.try_get("area")?,
            room: row.try_get("room")?,
            contact: row.try_get("contact")?,
            address: row.try_get("address")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<JobOffer> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(JobOffer {
            salary: row.try_get("salary")?,
            company: row.try_get("company")?,
            contact: row.try_get("contact")?,
            position: row.try_get("position")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Rideshare> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Rideshare {
            start_place: row.try_get("start_place")?,
            end_place: row.try_get("end_place")?,
            time: row.try_get("depart_time")?,
            seats: row.try_get("seats")?,
            contact: row.try_get("contact")?,
        }))
    }
}

/// Enriched post projection; `?1` is the viewer id (or NULL).
macro_rules! select_view {
    ($tail:literal) => {
        concat!(
            "SELECT p.*, u.nickname AS nickname, u.avatar AS avatar, c.name AS category_name, ",
            "EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = ?1) AS is_liked, ",
            "EXISTS (SELECT 1 FROM favorites f WHERE f.post_id = p.id AND f.user_id = ?1) AS is_favorite ",
            "FROM posts p LEFT JOIN users u ON u.id = p.user_id LEFT JOIN categories c ON c.id = p.category_id",
            $tail
        )
    };
}

const INSERT_POST: &str = "INSERT INTO posts (user_id, category_id, type, title, description, content, images, location, ip, createtime, updatetime) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const INSERT_SECOND: &str =
    "INSERT INTO post_second (post_id, price, contact, condition) VALUES (?, ?, ?, ?)";
const INSERT_HOUSE: &str =
    "INSERT INTO post_house (post_id, price, area, room, contact, address) VALUES (?, ?, ?, ?, ?, ?)";
const INSERT_JOB: &str =
    "INSERT INTO post_job (post_id, salary, company, contact, position) VALUES (?, ?, ?, ?, ?)";
const INSERT_CAR: &str = "INSERT INTO post_car (post_id, start_place, end_place, depart_time, seats, contact) VALUES (?, ?, ?, ?, ?, ?)";
const INCREMENT_CATEGORY: &str =
    "UPDATE categories SET post_count = post_count + 1 WHERE id = ?";
const DECREMENT_CATEGORY: &str = "UPDATE categories SET post_count = MAX(post_count - 1, 0) WHERE id = (SELECT category_id FROM posts WHERE id = ?)";

const SELECT_BY_ID: &str = "SELECT * FROM posts WHERE id = ?";
const SELECT_VIEW: &str = select_view!(" WHERE p.id = ?2 AND p.status = 'normal'");
const SELECT_LIST: &str = select_view!(
    " WHERE p.status = 'normal' AND (?2 IS NULL OR p.type = ?2) AND (?3 IS NULL OR p.category_id = ?3) AND (?4 IS NULL OR p.title LIKE ?4 ESCAPE '\\' OR p.content LIKE ?4 ESCAPE '\\') ORDER BY p.is_stick DESC, p.id DESC LIMIT ?5 OFFSET ?6"
);
const COUNT_LIST: &str = "SELECT COUNT(*) FROM posts p WHERE p.status = 'normal' AND (?1 IS NULL OR p.type = ?1) AND (?2 IS NULL OR p.category_id = ?2) AND (?3 IS NULL OR p.title LIKE ?3 ESCAPE '\\' OR p.content LIKE ?3 ESCAPE '\\')";
const SELECT_BY_AUTHOR: &str = select_view!(
    " WHERE p.user_id = ?2 AND p.status = 'normal' ORDER BY p.id DESC LIMIT ?3 OFFSET ?4"
);
const COUNT_BY_AUTHOR: &str =
    "SELECT COUNT(*) FROM posts WHERE user_id = ? AND status = 'normal'";
const SELECT_LATEST: &str =
    select_view!(" WHERE p.status = 'normal' ORDER BY p.id DESC LIMIT ?2");
const INCREMENT_VIEWS: &str =
    "UPDATE posts SET view_num = view_num + 1 WHERE id = ? AND status = 'normal'";
const HIDE_POST: &str =
    "UPDATE posts SET status = 'hidden', updatetime = ? WHERE id = ? AND status = 'normal'";

const DELETE_LIKE: &str = "DELETE FROM post_likes WHERE post_id = ? AND user_id = ?";
const INSERT_LIKE: &str = "INSERT INTO post_likes (post_id, user_id, createtime) VALUES (?, ?, ?)";
const INCREMENT_LIKES: &str = "UPDATE posts SET like_num = like_num + 1 WHERE id = ?";
const DECREMENT_LIKES: &str = "UPDATE posts SET like_num = MAX(like_num - 1, 0) WHERE id = ?";

const DELETE_FAVORITE: &str = "DELETE FROM favorites WHERE user_id = ? AND post_id = ?";
const INSERT_FAVORITE: &str =
    "INSERT INTO favorites (user_id, post_id, createtime) VALUES (?, ?, ?)";
const INCREMENT_FAVORITES: &str = "UPDATE posts SET favorite_num = favorite_num + 1 WHERE id = ?";
const DECREMENT_FAVORITES: &str =
    "UPDATE posts SET favorite_num = MAX(favorite_num - 1, 0) WHERE id = ?";
const EXISTS_FAVORITE: &str =
    "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = ? AND post_id = ?)";
const SELECT_FAVORITES: &str = "SELECT p.id AS post_id, p.title, p.images, p.view_num, p.like_num, p.comment_num, p.createtime AS post_createtime, u.nickname, u.avatar, f.createtime AS saved_at FROM favorites f JOIN posts p ON p.id = f.post_id AND p.status = 'normal' LEFT JOIN users u ON u.id = p.user_id WHERE f.user_id = ? ORDER BY f.createtime DESC, f.id DESC LIMIT ? OFFSET ?";
const COUNT_FAVORITES: &str = "SELECT COUNT(*) FROM favorites f JOIN posts p ON p.id = f.post_id AND p.status = 'normal' WHERE f.user_id = ?";

/// Strip the viewer flags when nobody is signed in.
fn for_viewer(mut view: PostView, viewer: Option<UserId>) -> PostView {
    if viewer.is_none() {
        view.is_liked = None;
        view.is_favorite = None;
    }
    view
}

async fn insert_extension(
    conn: &mut SqliteConnection,
    post: i64,
    extension: &PostExtension,
) -> Result<(), sqlx::Error> {
    let query = match extension {
        PostExtension::Second(second) => sqlx::query(INSERT_SECOND)
            .bind(post)
            .bind(second.price)
            .bind(&second.contact)
            .bind(second.condition.as_deref()),
        PostExtension::House(house) => sqlx::query(INSERT_HOUSE)
            .bind(post)
            .bind(house.price)
            .bind(house.area)
            .bind(&house.room)
            .bind(&house.contact)
            .bind(house.address.as_deref()),
        PostExtension::Job(job) => sqlx::query(INSERT_JOB)
            .bind(post)
            .bind(&job.salary)
            .bind(&job.company)
            .bind(&job.contact)
            .bind(job.position.as_deref()),
        PostExtension::Car(car) => sqlx::query(INSERT_CAR)
            .bind(post)
            .bind(&car.start_place)
            .bind(&car.end_place)
            .bind(&car.time)
            .bind(car.seats)
            .bind(&car.contact),
    };
    query.execute(conn).await?;
    Ok(())
}

async fn load_extension(
    pool: &SqlitePool,
    post: PostId,
    post_type: PostType,
) -> Result<Option<PostExtension>, sqlx::Error> {
    let extension = match post_type {
        PostType::General => None,
        PostType::Second => {
            let row: Option<Wrapper<SecondHand>> =
                sqlx::query_as("SELECT * FROM post_second WHERE post_id = ?")
                    .bind(post.get())
                    .fetch_optional(pool)
                    .await?;
            Wrapper::maybe(row).map(PostExtension::Second)
        }
        PostType::House => {
            let row: Option<Wrapper<Housing>> =
                sqlx::query_as("SELECT * FROM post_house WHERE post_id = ?")
                    .bind(post.get())
                    .fetch_optional(pool)
                    .await?;
            Wrapper::maybe(row).map(PostExtension::House)
        }
        PostType::Job => {
            let row: Option<Wrapper<JobOffer>> =
                sqlx::query_as("SELECT * FROM post_job WHERE post_id = ?")
                    .bind(post.get())
                    .fetch_optional(pool)
                    .await?;
            Wrapper::maybe(row).map(PostExtension::Job)
        }
        PostType::Car => {
            let row: Option<Wrapper<Rideshare>> =
                sqlx::query_as("SELECT * FROM post_car WHERE post_id = ?")
                    .bind(post.get())
                    .fetch_optional(pool)
                    .await?;
            Wrapper::maybe(row).map(PostExtension::Car)
        }
    };
    Ok(extension)
}

async fn insert_post(pool: &SqlitePool, post: NewPost) -> Result<PostId, StorageError> {
    let images = encode_images(&post.images)?;
    let at = post.created_at.timestamp();

    let mut tx = pool.begin().await?;
    let id = sqlx::query(INSERT_POST)
        .bind(post.user_id.get())
        .bind(post.category_id.get())
        .bind(post.post_type().as_str())
        .bind(&post.title)
        .bind(post.description.as_deref())
        .bind(&post.content)
        .bind(images)
        .bind(post.location.as_deref())
        .bind(post.ip.as_deref())
        .bind(at)
        .bind(at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
    if let Some(extension) = &post.extension {
        insert_extension(&mut *tx, id, extension).await?;
    }
    sqlx::query(INCREMENT_CATEGORY)
        .bind(post.category_id.get())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(PostId::new(id))
}

impl PostRepository for SqliteStore {
    fn create_post(
        &self,
        post: NewPost,
    ) -> impl Future<Output = Result<PostId, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(insert_post(&pool, post).await?) }
    }

    fn find_post(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<Option<Post>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<Post>> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn view_post(
        &self,
        id: PostId,
        viewer: Option<UserId>,
    ) -> impl Future<Output = Result<Option<PostView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper<PostView>> = sqlx::query_as(SELECT_VIEW)
                .bind(viewer.map(UserId::get))
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(Wrapper(mut view)) = row else {
                return Ok(None);
            };

            view.extension = load_extension(&pool, id, view.post.post_type)
                .await
                .map_err(StorageError::from)?;
            view.tags = Some(post_tags(&pool, id).await.map_err(StorageError::from)?);

            Ok(Some(for_viewer(view, viewer)))
        }
    }

    fn list_posts(
        &self,
        filter: PostFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PostView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let post_type = filter.post_type.map(PostType::as_str);
            let category = filter.category_id.map(CategoryId::get);
            let keyword = filter
                .keyword
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(like_pattern);

            let Count(total) = sqlx::query_as(COUNT_LIST)
                .bind(post_type)
                .bind(category)
                .bind(keyword.as_deref())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<PostView>> = sqlx::query_as(SELECT_LIST)
                .bind(viewer.map(UserId::get))
                .bind(post_type)
                .bind(category)
                .bind(keyword.as_deref())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let list = Wrapper::list(rows)
                .into_iter()
                .map(|view| for_viewer(view, viewer))
                .collect();
            Ok(Paged::new(total, list))
        }
    }

    fn list_user_posts(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PostView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_BY_AUTHOR)
                .bind(author.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<PostView>> = sqlx::query_as(SELECT_BY_AUTHOR)
                .bind(Option::<i64>::None)
                .bind(author.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let list = Wrapper::list(rows)
                .into_iter()
                .map(|view| for_viewer(view, None))
                .collect();
            Ok(Paged::new(total, list))
        }
    }

    fn latest_posts(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<PostView>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper<PostView>> = sqlx::query_as(SELECT_LATEST)
                .bind(Option::<i64>::None)
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::list(rows)
                .into_iter()
                .map(|view| for_viewer(view, None))
                .collect())
        }
    }

    fn increment_views(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INCREMENT_VIEWS)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn hide_post(
        &self,
        id: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(hide(&pool, id, at).await?) }
    }
}

async fn hide(pool: &SqlitePool, id: PostId, at: Timestamp) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let hidden = sqlx::query(HIDE_POST)
        .bind(at.timestamp())
        .bind(id.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if hidden == 1 {
        sqlx::query(DECREMENT_CATEGORY)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn toggle_like(
    pool: &SqlitePool,
    post: PostId,
    user: UserId,
    notice: Option<NewMessage>,
) -> Result<Toggle, StorageError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query(DELETE_LIKE)
        .bind(post.get())
        .bind(user.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let toggle = if removed > 0 {
        sqlx::query(DECREMENT_LIKES)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        Toggle::Off
    } else {
        sqlx::query(INSERT_LIKE)
            .bind(post.get())
            .bind(user.get())
            .bind(now().timestamp())
            .execute(&mut *tx)
            .await?;
        sqlx::query(INCREMENT_LIKES)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        if let Some(notice) = &notice {
            insert_message(&mut *tx, notice).await?;
        }
        Toggle::On
    };
    tx.commit().await?;
    Ok(toggle)
}

impl LikeRepository for SqliteStore {
    fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
        notice: Option<NewMessage>,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(toggle_like(&pool, post, user, notice).await?) }
    }
}

async fn toggle_favorite(
    pool: &SqlitePool,
    user: UserId,
    post: PostId,
) -> Result<Toggle, StorageError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query(DELETE_FAVORITE)
        .bind(user.get())
        .bind(post.get())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let toggle = if removed > 0 {
        sqlx::query(DECREMENT_FAVORITES)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        Toggle::Off
    } else {
        sqlx::query(INSERT_FAVORITE)
            .bind(user.get())
            .bind(post.get())
            .bind(now().timestamp())
            .execute(&mut *tx)
            .await?;
        sqlx::query(INCREMENT_FAVORITES)
            .bind(post.get())
            .execute(&mut *tx)
            .await?;
        Toggle::On
    };
    tx.commit().await?;
    Ok(toggle)
}

impl FavoriteRepository for SqliteStore {
    fn toggle_favorite(
        &self,
        user: UserId,
        post: PostId,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(toggle_favorite(&pool, user, post).await?) }
    }

    fn is_favorite(
        &self,
        user: UserId,
        post: PostId,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (exists,): (bool,) = sqlx::query_as(EXISTS_FAVORITE)
                .bind(user.get())
                .bind(post.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn list_favorites(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<SavedPost>, CommunityError>> + Send {
        let pool = self.pool.clone();
        async move {
            let Count(total) = sqlx::query_as(COUNT_FAVORITES)
                .bind(user.get())
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;
            let rows: Vec<Wrapper<SavedPost>> = sqlx::query_as(SELECT_FAVORITES)
                .bind(user.get())
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Paged::new(total, Wrapper::list(rows)))
        }
    }
}
