//! Postgres-backed store.
//!
//! Queries are built at runtime with `sqlx::query` and rows are decoded by
//! hand, so the crate builds without a live database. Referential integrity
//! and cascades live in `schema.sql`, which is applied on connect.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use shareit_core::{
    Booking, BookingId, BookingStatus, Comment, CommentId, Item, ItemId, ItemPatch, ItemRequest, NewBooking,
    NewComment, NewItem, NewItemRequest, NewUser, RequestId, User, UserId, UserPatch,
};

use super::{
    BookingRepository, BookingView, CommentRepository, CommentView, ItemRepository, RequestRepository,
    StoreError, StoreResult, UserRepository, ITEM_BOOKINGS_LIMIT,
};

const SCHEMA: &str = include_str!("schema.sql");

const USER_COLUMNS: &str = "id, email, name";
const ITEM_COLUMNS: &str = "id, name, description, is_available, owner_id, request_id";
const REQUEST_COLUMNS: &str = "id, description, requestor_id, created";
const BOOKING_COLUMNS: &str = "id, start_date, end_date, item_id, booker_id, status";

const BOOKING_VIEW: &str = r#"
    SELECT
        b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status,
        i.name AS item_name,
        i.description AS item_description,
        i.is_available AS item_available,
        i.owner_id AS item_owner_id,
        i.request_id AS item_request_id,
        u.email AS booker_email,
        u.name AS booker_name
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    JOIN users u ON u.id = b.booker_id
"#;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        tracing::info!("database schema ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    #[instrument(skip(self, user), err)]
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let sql = format!("INSERT INTO users (email, name) VALUES ($1, $2) RETURNING {USER_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(&user.email)
            .bind(&user.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_user", e))?;
        decode(user_from_row(&row))
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;
        row.as_ref().map(user_from_row).transpose().map_err(decode_error)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.as_ref().map(user_from_row).transpose().map_err(decode_error)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        rows.iter().map(user_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }

    #[instrument(skip(self, patch), fields(user_id = %id), err)]
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let current = match sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_user", e))?
        {
            Some(row) => decode(user_from_row(&row))?,
            None => {
                tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::NotFound(format!("user with id={id} not found")));
            }
        };
        let updated = patch.apply(&current);

        let sql = format!("UPDATE users SET email = $2, name = $3 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(&updated.email)
            .bind(&updated.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_user", e))?;
        let user = decode(user_from_row(&row))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl ItemRepository for PostgresStore {
    #[instrument(skip(self, item), fields(owner_id = %item.owner_id), err)]
    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item> {
        let sql = format!(
            "INSERT INTO items (name, description, is_available, owner_id, request_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.owner_id.get())
            .bind(item.request_id.map(|r| r.get()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_item", e))?;
        decode(item_from_row(&row))
    }

    async fn find_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_item", e))?;
        row.as_ref().map(item_from_row).transpose().map_err(decode_error)
    }

    #[instrument(skip(self, patch), fields(item_id = %id), err)]
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> StoreResult<Item> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 FOR UPDATE");
        let current = match sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_item", e))?
        {
            Some(row) => decode(item_from_row(&row))?,
            None => {
                tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::NotFound(format!("item with id={id} not found")));
            }
        };
        let updated = patch.apply(&current);

        let sql = format!(
            "UPDATE items SET name = $2, description = $3, is_available = $4 \
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(&updated.name)
            .bind(&updated.description)
            .bind(updated.available)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_item", e))?;
        let item = decode(item_from_row(&row))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(item)
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;
        Ok(done.rows_affected() > 0)
    }

    async fn items_by_owner(&self, owner: UserId, offset: usize, limit: usize) -> StoreResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE owner_id = $1 ORDER BY id OFFSET $2 LIMIT $3");
        let rows = sqlx::query(&sql)
            .bind(owner.get())
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("items_by_owner", e))?;
        rows.iter().map(item_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }

    async fn search_available(&self, needle: &str, offset: usize, limit: usize) -> StoreResult<Vec<Item>> {
        // strpos avoids having to escape LIKE wildcards in user input.
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE is_available \
               AND (strpos(lower(name), lower($1)) > 0 OR strpos(lower(description), lower($1)) > 0) \
             ORDER BY id OFFSET $2 LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(needle)
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("search_available", e))?;
        rows.iter().map(item_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }

    async fn items_by_requests(&self, requests: &[RequestId]) -> StoreResult<Vec<Item>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = requests.iter().map(|r| r.get()).collect();
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE request_id = ANY($1) ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("items_by_requests", e))?;
        rows.iter().map(item_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }
}

#[async_trait]
impl BookingRepository for PostgresStore {
    #[instrument(skip(self, booking), fields(item_id = %booking.item_id, booker_id = %booking.booker_id), err)]
    async fn insert_booking(&self, booking: &NewBooking) -> StoreResult<Booking> {
        let sql = format!(
            "INSERT INTO bookings (start_date, end_date, item_id, booker_id, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {BOOKING_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(booking.start)
            .bind(booking.end)
            .bind(booking.item_id.get())
            .bind(booking.booker_id.get())
            .bind(booking.status().as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_booking", e))?;
        decode(booking_from_row(&row))
    }

    async fn find_booking(&self, id: BookingId) -> StoreResult<Option<BookingView>> {
        let sql = format!("{BOOKING_VIEW} WHERE b.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_booking", e))?;
        row.as_ref().map(booking_view_from_row).transpose().map_err(decode_error)
    }

    /// Row is locked for the duration of the check so two concurrent
    /// decisions cannot both succeed.
    #[instrument(skip(self), err)]
    async fn update_booking_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> StoreResult<Booking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let current = sqlx::query("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("lock_booking", e))?;

        let current: String = match current {
            Some(row) => row.try_get("status").map_err(decode_error)?,
            None => {
                tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::NotFound(format!("booking {id} not found")));
            }
        };

        if current != from.as_str() {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::Conflict(format!("booking {id} is {current} instead of {from}")));
        }

        let sql = format!("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {BOOKING_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(to.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_booking_status", e))?;
        let booking = decode(booking_from_row(&row))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(booking)
    }

    async fn bookings_by_booker(&self, booker: UserId) -> StoreResult<Vec<BookingView>> {
        let sql = format!("{BOOKING_VIEW} WHERE b.booker_id = $1 ORDER BY b.id");
        let rows = sqlx::query(&sql)
            .bind(booker.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("bookings_by_booker", e))?;
        rows.iter()
            .map(booking_view_from_row)
            .collect::<Result<_, _>>()
            .map_err(decode_error)
    }

    async fn bookings_by_item_owner(&self, owner: UserId) -> StoreResult<Vec<BookingView>> {
        let sql = format!("{BOOKING_VIEW} WHERE i.owner_id = $1 ORDER BY b.id");
        let rows = sqlx::query(&sql)
            .bind(owner.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("bookings_by_item_owner", e))?;
        rows.iter()
            .map(booking_view_from_row)
            .collect::<Result<_, _>>()
            .map_err(decode_error)
    }

    async fn bookings_by_item(&self, item: ItemId) -> StoreResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE item_id = $1 ORDER BY start_date DESC, id LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(item.get())
            .bind(to_i64(ITEM_BOOKINGS_LIMIT))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("bookings_by_item", e))?;
        rows.iter().map(booking_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }

    async fn bookings_by_item_and_booker(&self, item: ItemId, booker: UserId) -> StoreResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE item_id = $1 AND booker_id = $2 ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(item.get())
            .bind(booker.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("bookings_by_item_and_booker", e))?;
        rows.iter().map(booking_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }
}

#[async_trait]
impl CommentRepository for PostgresStore {
    #[instrument(skip(self, comment), fields(item_id = %comment.item_id, author_id = %comment.author_id), err)]
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<CommentView> {
        let row = sqlx::query(
            r#"
            WITH c AS (
                INSERT INTO comments (text, item_id, author_id, created)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, item_id, author_id, created
            )
            SELECT c.id, c.text, c.item_id, c.author_id, c.created, u.name AS author_name
            FROM c JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.item_id.get())
        .bind(comment.author_id.get())
        .bind(comment.created)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_comment", e))?;
        decode(comment_view_from_row(&row))
    }

    async fn comments_by_item(&self, item: ItemId) -> StoreResult<Vec<CommentView>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, c.created, u.name AS author_name
            FROM comments c JOIN users u ON u.id = c.author_id
            WHERE c.item_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(item.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("comments_by_item", e))?;
        rows.iter()
            .map(comment_view_from_row)
            .collect::<Result<_, _>>()
            .map_err(decode_error)
    }
}

#[async_trait]
impl RequestRepository for PostgresStore {
    #[instrument(skip(self, request), fields(requestor_id = %request.requestor_id), err)]
    async fn insert_request(&self, request: &NewItemRequest) -> StoreResult<ItemRequest> {
        let sql = format!(
            "INSERT INTO requests (description, requestor_id, created) VALUES ($1, $2, $3) \
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&request.description)
            .bind(request.requestor_id.get())
            .bind(request.created)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_request", e))?;
        decode(request_from_row(&row))
    }

    async fn find_request(&self, id: RequestId) -> StoreResult<Option<ItemRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_request", e))?;
        row.as_ref().map(request_from_row).transpose().map_err(decode_error)
    }

    async fn requests_by_requestor(&self, requestor: UserId) -> StoreResult<Vec<ItemRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE requestor_id = $1 ORDER BY created DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(requestor.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("requests_by_requestor", e))?;
        rows.iter().map(request_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }

    async fn requests_of_others(&self, user: UserId, offset: usize, limit: usize) -> StoreResult<Vec<ItemRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE requestor_id <> $1 ORDER BY id DESC OFFSET $2 LIMIT $3"
        );
        let rows = sqlx::query(&sql)
            .bind(user.get())
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("requests_of_others", e))?;
        rows.iter().map(request_from_row).collect::<Result<_, _>>().map_err(decode_error)
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from_raw(row.try_get("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<Item, sqlx::Error> {
    Ok(Item {
        id: ItemId::from_raw(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        available: row.try_get("is_available")?,
        owner_id: UserId::from_raw(row.try_get("owner_id")?),
        request_id: row.try_get::<Option<i64>, _>("request_id")?.map(RequestId::from_raw),
    })
}

fn request_from_row(row: &PgRow) -> Result<ItemRequest, sqlx::Error> {
    Ok(ItemRequest {
        id: RequestId::from_raw(row.try_get("id")?),
        description: row.try_get("description")?,
        requestor_id: UserId::from_raw(row.try_get("requestor_id")?),
        created: row.try_get("created")?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Booking {
        id: BookingId::from_raw(row.try_get("id")?),
        start: row.try_get("start_date")?,
        end: row.try_get("end_date")?,
        item_id: ItemId::from_raw(row.try_get("item_id")?),
        booker_id: UserId::from_raw(row.try_get("booker_id")?),
        status: status.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
    })
}

fn booking_view_from_row(row: &PgRow) -> Result<BookingView, sqlx::Error> {
    let booking = booking_from_row(row)?;
    let item = Item {
        id: booking.item_id,
        name: row.try_get("item_name")?,
        description: row.try_get("item_description")?,
        available: row.try_get("item_available")?,
        owner_id: UserId::from_raw(row.try_get("item_owner_id")?),
        request_id: row
            .try_get::<Option<i64>, _>("item_request_id")?
            .map(RequestId::from_raw),
    };
    let booker = User {
        id: booking.booker_id,
        email: row.try_get("booker_email")?,
        name: row.try_get("booker_name")?,
    };
    Ok(BookingView { booking, item, booker })
}

fn comment_view_from_row(row: &PgRow) -> Result<CommentView, sqlx::Error> {
    Ok(CommentView {
        comment: Comment {
            id: CommentId::from_raw(row.try_get("id")?),
            text: row.try_get("text")?,
            item_id: ItemId::from_raw(row.try_get("item_id")?),
            author_id: UserId::from_raw(row.try_get("author_id")?),
            created: row.try_get("created")?,
        },
        author_name: row.try_get("author_name")?,
    })
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn decode<T>(res: Result<T, sqlx::Error>) -> StoreResult<T> {
    res.map_err(decode_error)
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("failed to decode row: {err}"))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => StoreError::Conflict(msg),
                // foreign_key_violation: the referenced row is gone
                Some("23503") => StoreError::NotFound(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        sqlx::Error::PoolTimedOut => StoreError::Backend(format!("connection pool timed out in {}", operation)),
        other => StoreError::Backend(format!("database error in {}: {}", operation, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_every_table() {
        for table in ["users", "requests", "items", "bookings", "comments"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn pool_errors_map_to_backend() {
        assert!(matches!(
            map_sqlx_error("op", sqlx::Error::PoolClosed),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            map_sqlx_error("op", sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn offsets_saturate() {
        assert_eq!(to_i64(5), 5);
        assert_eq!(to_i64(usize::MAX), i64::MAX);
    }
}
