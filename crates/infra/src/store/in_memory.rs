//! Process-local store: one `RwLock` over all tables.
//!
//! Ids are assigned per table starting at 1, like a Postgres identity column.
//! Foreign keys are checked on insert and deletes cascade the same way the SQL
//! schema does, so both backends behave the same from the outside.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use shareit_core::{
    Booking, BookingId, BookingStatus, Comment, CommentId, Entity, Item, ItemId, ItemPatch, ItemRequest,
    NewBooking, NewComment, NewItem, NewItemRequest, NewUser, RequestId, User, UserId, UserPatch,
};

use super::{
    BookingRepository, BookingView, CommentRepository, CommentView, ItemRepository, RequestRepository,
    StoreError, StoreResult, UserRepository, ITEM_BOOKINGS_LIMIT,
};

struct Table<E: Entity> {
    rows: BTreeMap<E::Id, E>,
    last_id: i64,
}

impl<E: Entity + Clone> Table<E>
where
    E::Id: From<i64>,
{
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> E::Id {
        self.last_id += 1;
        E::Id::from(self.last_id)
    }

    fn put(&mut self, row: E) -> E {
        self.rows.insert(row.id(), row.clone());
        row
    }

    fn get(&self, id: E::Id) -> Option<&E> {
        self.rows.get(&id)
    }

    fn contains(&self, id: E::Id) -> bool {
        self.rows.contains_key(&id)
    }

    fn values(&self) -> impl DoubleEndedIterator<Item = &E> {
        self.rows.values()
    }
}

struct Tables {
    users: Table<User>,
    items: Table<Item>,
    bookings: Table<Booking>,
    comments: Table<Comment>,
    requests: Table<ItemRequest>,
}

impl Tables {
    fn booking_view(&self, booking: &Booking) -> StoreResult<BookingView> {
        let item = self
            .items
            .get(booking.item_id)
            .cloned()
            .ok_or_else(|| dangling("booking", booking.id.get(), "item"))?;
        let booker = self
            .users
            .get(booking.booker_id)
            .cloned()
            .ok_or_else(|| dangling("booking", booking.id.get(), "booker"))?;
        Ok(BookingView {
            booking: booking.clone(),
            item,
            booker,
        })
    }

    fn comment_view(&self, comment: &Comment) -> StoreResult<CommentView> {
        let author = self
            .users
            .get(comment.author_id)
            .ok_or_else(|| dangling("comment", comment.id.get(), "author"))?;
        Ok(CommentView {
            comment: comment.clone(),
            author_name: author.name.clone(),
        })
    }

    fn booking_views(&self, keep: impl Fn(&Booking, &Item) -> bool) -> StoreResult<Vec<BookingView>> {
        let mut out = Vec::new();
        for booking in self.bookings.values() {
            let Some(item) = self.items.get(booking.item_id) else {
                continue;
            };
            if keep(booking, item) {
                out.push(self.booking_view(booking)?);
            }
        }
        Ok(out)
    }

    fn remove_item_cascade(&mut self, id: ItemId) -> bool {
        if self.items.rows.remove(&id).is_none() {
            return false;
        }
        self.bookings.rows.retain(|_, b| b.item_id != id);
        self.comments.rows.retain(|_, c| c.item_id != id);
        true
    }
}

fn dangling(table: &str, id: i64, column: &str) -> StoreError {
    StoreError::Backend(format!("{table} {id} references a missing {column}"))
}

fn duplicate_email(email: &str) -> StoreError {
    StoreError::Conflict(format!("user with email={email} already exists"))
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

/// Default backend; everything is lost on restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: Table::new(),
                items: Table::new(),
                bookings: Table::new(),
                comments: Table::new(),
                requests: Table::new(),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| poisoned())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut t = self.write()?;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }
        let id = t.users.next_id();
        Ok(t.users.put(User {
            id,
            email: user.email.clone(),
            name: user.name.clone(),
        }))
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> StoreResult<User> {
        let mut t = self.write()?;
        let current = t
            .users
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("user with id={id} not found")))?;
        let updated = patch.apply(current);
        if t.users.values().any(|u| u.id != id && u.email == updated.email) {
            return Err(duplicate_email(&updated.email));
        }
        Ok(t.users.put(updated))
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        let mut t = self.write()?;
        if t.users.rows.remove(&id).is_none() {
            return Ok(false);
        }

        let owned: Vec<ItemId> = t.items.values().filter(|i| i.owner_id == id).map(|i| i.id).collect();
        for item in owned {
            t.remove_item_cascade(item);
        }
        t.bookings.rows.retain(|_, b| b.booker_id != id);
        t.comments.rows.retain(|_, c| c.author_id != id);

        let dropped: Vec<RequestId> = t
            .requests
            .values()
            .filter(|r| r.requestor_id == id)
            .map(|r| r.id)
            .collect();
        t.requests.rows.retain(|_, r| r.requestor_id != id);
        for item in t.items.rows.values_mut() {
            if item.request_id.is_some_and(|r| dropped.contains(&r)) {
                item.request_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn insert_item(&self, item: &NewItem) -> StoreResult<Item> {
        let mut t = self.write()?;
        if !t.users.contains(item.owner_id) {
            return Err(StoreError::NotFound(format!("user {} not found", item.owner_id)));
        }
        if let Some(request) = item.request_id {
            if !t.requests.contains(request) {
                return Err(StoreError::NotFound(format!("request {request} not found")));
            }
        }
        let id = t.items.next_id();
        Ok(t.items.put(Item {
            id,
            name: item.name.clone(),
            description: item.description.clone(),
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
        }))
    }

    async fn find_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.read()?.items.get(id).cloned())
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> StoreResult<Item> {
        let mut t = self.write()?;
        let current = t
            .items
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("item with id={id} not found")))?;
        let updated = patch.apply(current);
        Ok(t.items.put(updated))
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<bool> {
        Ok(self.write()?.remove_item_cascade(id))
    }

    async fn items_by_owner(&self, owner: UserId, offset: usize, limit: usize) -> StoreResult<Vec<Item>> {
        Ok(self
            .read()?
            .items
            .values()
            .filter(|i| i.owner_id == owner)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_available(&self, needle: &str, offset: usize, limit: usize) -> StoreResult<Vec<Item>> {
        let needle = needle.to_lowercase();
        Ok(self
            .read()?
            .items
            .values()
            .filter(|i| i.available && i.matches_text(&needle))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn items_by_requests(&self, requests: &[RequestId]) -> StoreResult<Vec<Item>> {
        Ok(self
            .read()?
            .items
            .values()
            .filter(|i| i.request_id.is_some_and(|r| requests.contains(&r)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_booking(&self, booking: &NewBooking) -> StoreResult<Booking> {
        let mut t = self.write()?;
        if !t.items.contains(booking.item_id) {
            return Err(StoreError::NotFound(format!("item {} not found", booking.item_id)));
        }
        if !t.users.contains(booking.booker_id) {
            return Err(StoreError::NotFound(format!("user {} not found", booking.booker_id)));
        }
        let id = t.bookings.next_id();
        Ok(t.bookings.put(Booking {
            id,
            start: booking.start,
            end: booking.end,
            item_id: booking.item_id,
            booker_id: booking.booker_id,
            status: booking.status(),
        }))
    }

    async fn find_booking(&self, id: BookingId) -> StoreResult<Option<BookingView>> {
        let t = self.read()?;
        match t.bookings.get(id) {
            Some(booking) => t.booking_view(booking).map(Some),
            None => Ok(None),
        }
    }

    async fn update_booking_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> StoreResult<Booking> {
        let mut t = self.write()?;
        let booking = t
            .bookings
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("booking {id} not found")))?;
        if booking.status != from {
            return Err(StoreError::Conflict(format!(
                "booking {id} is {} instead of {}",
                booking.status, from
            )));
        }
        booking.status = to;
        Ok(booking.clone())
    }

    async fn bookings_by_booker(&self, booker: UserId) -> StoreResult<Vec<BookingView>> {
        self.read()?.booking_views(|b, _| b.booker_id == booker)
    }

    async fn bookings_by_item_owner(&self, owner: UserId) -> StoreResult<Vec<BookingView>> {
        self.read()?.booking_views(|_, i| i.owner_id == owner)
    }

    async fn bookings_by_item(&self, item: ItemId) -> StoreResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .read()?
            .bookings
            .values()
            .filter(|b| b.item_id == item)
            .cloned()
            .collect();
        // Stable sort keeps ascending id among equal starts.
        bookings.sort_by_key(|b| Reverse(b.start));
        bookings.truncate(ITEM_BOOKINGS_LIMIT);
        Ok(bookings)
    }

    async fn bookings_by_item_and_booker(&self, item: ItemId, booker: UserId) -> StoreResult<Vec<Booking>> {
        Ok(self
            .read()?
            .bookings
            .values()
            .filter(|b| b.item_id == item && b.booker_id == booker)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<CommentView> {
        let mut t = self.write()?;
        if !t.items.contains(comment.item_id) {
            return Err(StoreError::NotFound(format!("item {} not found", comment.item_id)));
        }
        if !t.users.contains(comment.author_id) {
            return Err(StoreError::NotFound(format!("user {} not found", comment.author_id)));
        }
        let id: CommentId = t.comments.next_id();
        let stored = t.comments.put(Comment {
            id,
            text: comment.text.clone(),
            item_id: comment.item_id,
            author_id: comment.author_id,
            created: comment.created,
        });
        t.comment_view(&stored)
    }

    async fn comments_by_item(&self, item: ItemId) -> StoreResult<Vec<CommentView>> {
        let t = self.read()?;
        t.comments
            .values()
            .filter(|c| c.item_id == item)
            .map(|c| t.comment_view(c))
            .collect()
    }
}

#[async_trait]
impl RequestRepository for InMemoryStore {
    async fn insert_request(&self, request: &NewItemRequest) -> StoreResult<ItemRequest> {
        let mut t = self.write()?;
        if !t.users.contains(request.requestor_id) {
            return Err(StoreError::NotFound(format!("user {} not found", request.requestor_id)));
        }
        let id = t.requests.next_id();
        Ok(t.requests.put(ItemRequest {
            id,
            description: request.description.clone(),
            requestor_id: request.requestor_id,
            created: request.created,
        }))
    }

    async fn find_request(&self, id: RequestId) -> StoreResult<Option<ItemRequest>> {
        Ok(self.read()?.requests.get(id).cloned())
    }

    async fn requests_by_requestor(&self, requestor: UserId) -> StoreResult<Vec<ItemRequest>> {
        let mut own: Vec<ItemRequest> = self
            .read()?
            .requests
            .values()
            .filter(|r| r.requestor_id == requestor)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(own)
    }

    async fn requests_of_others(&self, user: UserId, offset: usize, limit: usize) -> StoreResult<Vec<ItemRequest>> {
        Ok(self
            .read()?
            .requests
            .values()
            .rev()
            .filter(|r| r.requestor_id != user)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    async fn user(store: &InMemoryStore, email: &str) -> User {
        store
            .insert_user(&NewUser::new(Some(email.into()), Some("Name".into())).unwrap())
            .await
            .unwrap()
    }

    async fn item(store: &InMemoryStore, owner: UserId, name: &str, available: bool) -> Item {
        let new = NewItem::new(Some(name.into()), Some("desc".into()), Some(available), owner, None).unwrap();
        store.insert_item(&new).await.unwrap()
    }

    async fn booking(store: &InMemoryStore, item: ItemId, booker: UserId) -> Booking {
        booking_at(store, item, booker, 0).await
    }

    async fn booking_at(store: &InMemoryStore, item: ItemId, booker: UserId, start_min: i64) -> Booking {
        let start = t0() + Duration::minutes(start_min);
        store
            .insert_booking(&NewBooking {
                start,
                end: start + Duration::hours(1),
                item_id: item,
                booker_id: booker,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() {
        let store = InMemoryStore::new();
        let a = user(&store, "a@x.io").await;
        let b = user(&store, "b@x.io").await;
        let i = item(&store, a.id, "Drill", true).await;
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
        assert_eq!(i.id.get(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_on_insert_and_update() {
        let store = InMemoryStore::new();
        let a = user(&store, "a@x.io").await;
        user(&store, "b@x.io").await;

        let dup = NewUser::new(Some("a@x.io".into()), Some("Other".into())).unwrap();
        assert!(matches!(store.insert_user(&dup).await, Err(StoreError::Conflict(_))));

        let steal = UserPatch::new(Some("b@x.io".into()), None).unwrap();
        assert!(matches!(store.update_user(a.id, &steal).await, Err(StoreError::Conflict(_))));

        // Keeping one's own email is fine.
        let keep = UserPatch::new(Some("a@x.io".into()), Some("Renamed".into())).unwrap();
        assert_eq!(store.update_user(a.id, &keep).await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn status_update_is_compare_and_set() {
        let store = InMemoryStore::new();
        let owner = user(&store, "o@x.io").await;
        let booker = user(&store, "b@x.io").await;
        let i = item(&store, owner.id, "Drill", true).await;
        let b = booking(&store, i.id, booker.id).await;

        let approved = store
            .update_booking_status(b.id, BookingStatus::Waiting, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let again = store
            .update_booking_status(b.id, BookingStatus::Waiting, BookingStatus::Rejected)
            .await;
        assert!(matches!(again, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn search_only_returns_available_matches() {
        let store = InMemoryStore::new();
        let owner = user(&store, "o@x.io").await;
        item(&store, owner.id, "Power Drill", true).await;
        item(&store, owner.id, "Old drill", false).await;
        item(&store, owner.id, "Saw", true).await;

        let found = store.search_available("DRILL", 0, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Power Drill");
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = InMemoryStore::new();
        let owner = user(&store, "o@x.io").await;
        let booker = user(&store, "b@x.io").await;
        let i = item(&store, owner.id, "Drill", true).await;
        booking(&store, i.id, booker.id).await;
        store
            .insert_comment(&NewComment::new(Some("ok".into()), i.id, booker.id, t0()).unwrap())
            .await
            .unwrap();

        assert!(store.delete_user(owner.id).await.unwrap());
        assert!(store.find_item(i.id).await.unwrap().is_none());
        assert!(store.bookings_by_booker(booker.id).await.unwrap().is_empty());
        assert!(store.comments_by_item(i.id).await.unwrap().is_empty());
        assert!(!store.delete_user(owner.id).await.unwrap());
    }

    #[tokio::test]
    async fn other_users_requests_come_newest_id_first() {
        let store = InMemoryStore::new();
        let a = user(&store, "a@x.io").await;
        let b = user(&store, "b@x.io").await;
        for (who, n) in [(a.id, 0), (b.id, 1), (b.id, 2), (a.id, 3)] {
            store
                .insert_request(
                    &NewItemRequest::new(Some(format!("req {n}")), who, t0() + Duration::minutes(n)).unwrap(),
                )
                .await
                .unwrap();
        }

        let others: Vec<i64> = store
            .requests_of_others(a.id, 0, 10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(others, vec![3, 2]);

        let own: Vec<i64> = store
            .requests_by_requestor(a.id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(own, vec![4, 1]);
    }

    #[tokio::test]
    async fn item_bookings_come_latest_start_first() {
        let store = InMemoryStore::new();
        let owner = user(&store, "o@x.io").await;
        let booker = user(&store, "b@x.io").await;
        let i = item(&store, owner.id, "Drill", true).await;
        for start_min in [10, 60, 30, 60] {
            booking_at(&store, i.id, booker.id, start_min).await;
        }
        let ids: Vec<i64> = store
            .bookings_by_item(i.id)
            .await
            .unwrap()
            .iter()
            .map(|b| b.id.get())
            .collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[tokio::test]
    async fn item_bookings_are_capped() {
        let store = InMemoryStore::new();
        let owner = user(&store, "o@x.io").await;
        let booker = user(&store, "b@x.io").await;
        let i = item(&store, owner.id, "Drill", true).await;
        for start_min in 0..(ITEM_BOOKINGS_LIMIT as i64 + 5) {
            booking_at(&store, i.id, booker.id, start_min).await;
        }
        let bookings = store.bookings_by_item(i.id).await.unwrap();
        assert_eq!(bookings.len(), ITEM_BOOKINGS_LIMIT);
        assert_eq!(bookings[0].start, t0() + Duration::minutes(ITEM_BOOKINGS_LIMIT as i64 + 4));
        // The earliest starts are the ones dropped.
        assert_eq!(bookings[ITEM_BOOKINGS_LIMIT - 1].start, t0() + Duration::minutes(5));
    }
}
