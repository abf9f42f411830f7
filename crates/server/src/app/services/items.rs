use std::cmp::Reverse;

use shareit_core::{
    BookingNeighbours, DomainError, Item, ItemId, ItemPatch, NewComment, NewItem, PageRequest, UserId,
};
use shareit_infra::CommentView;

use super::{AppServices, ServiceResult};
use crate::app::dto::{CommentBody, CommentDto, ItemBody, ItemDto};

/// Item plus what its owner gets to see about it.
struct EnrichedItem {
    item: Item,
    neighbours: BookingNeighbours,
    comments: Vec<CommentView>,
}

impl AppServices {
    pub async fn create_item(&self, owner: UserId, body: ItemBody) -> ServiceResult<ItemDto> {
        self.require_user(owner).await?;
        if let Some(request) = body.request_id {
            if self.store.find_request(request).await?.is_none() {
                return Err(DomainError::not_found(format!("request with id={request} not found")).into());
            }
        }

        let new = NewItem::new(body.name, body.description, body.available, owner, body.request_id)?;
        let item = self.store.insert_item(&new).await?;
        tracing::info!(item_id = %item.id, owner_id = %owner, "item created");
        Ok(ItemDto::plain(&item))
    }

    /// Comments always; last/next booking only for the owner.
    pub async fn get_item(&self, actor: UserId, id: ItemId) -> ServiceResult<ItemDto> {
        let item = self.require_item(id).await?;
        let enriched = self.enrich(item, actor).await?;
        Ok(self.to_dto(&enriched))
    }

    pub async fn list_own_items(&self, owner: UserId, page: PageRequest) -> ServiceResult<Vec<ItemDto>> {
        self.require_user(owner).await?;
        tracing::debug!(owner_id = %owner, from = page.from(), size = page.size(), "listing own items");
        let items = self
            .store
            .items_by_owner(owner, page.page_offset(), page.size())
            .await?;

        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            enriched.push(self.enrich(item, owner).await?);
        }
        // Latest next booking first; items without one go last.
        enriched.sort_by_key(|e| Reverse(e.neighbours.next.as_ref().map(|b| b.start)));

        Ok(enriched.iter().map(|e| self.to_dto(e)).collect())
    }

    pub async fn search_items(&self, actor: UserId, text: &str, page: PageRequest) -> ServiceResult<Vec<ItemDto>> {
        self.require_user(actor).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(text, "searching items");
        let items = self
            .store
            .search_available(text, page.page_offset(), page.size())
            .await?;
        Ok(items.iter().map(ItemDto::plain).collect())
    }

    pub async fn patch_item(&self, actor: UserId, id: ItemId, body: ItemBody) -> ServiceResult<ItemDto> {
        let patch = ItemPatch::new(body.name, body.description, body.available)?;
        let item = self.require_item(id).await?;
        item.ensure_owner(actor)?;

        let item = self.store.update_item(id, &patch).await?;
        tracing::info!(item_id = %id, "item updated");
        Ok(ItemDto::plain(&item))
    }

    pub async fn delete_item(&self, actor: UserId, id: ItemId) -> ServiceResult<()> {
        let item = self.require_item(id).await?;
        item.ensure_owner(actor)?;

        self.store.delete_item(id).await?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }

    pub async fn add_comment(&self, author: UserId, item_id: ItemId, body: CommentBody) -> ServiceResult<CommentDto> {
        self.require_user(author).await?;
        let item = self.require_item(item_id).await?;

        let now = self.clock.now();
        let new = NewComment::new(body.text, item_id, author, now)?;
        let bookings = self.store.bookings_by_item_and_booker(item_id, author).await?;
        if let Err(e) = new.ensure_eligible(&bookings, now) {
            tracing::warn!(item_id = %item_id, author_id = %author, "comment without a started booking");
            return Err(e.into());
        }

        let view = self.store.insert_comment(&new).await?;
        tracing::info!(comment_id = %view.comment.id, item_id = %item_id, "comment added");
        Ok(CommentDto::new(&view, &item, &self.format))
    }

    async fn enrich(&self, item: Item, actor: UserId) -> ServiceResult<EnrichedItem> {
        let comments = self.store.comments_by_item(item.id).await?;
        let neighbours = if item.is_owned_by(actor) {
            let bookings = self.store.bookings_by_item(item.id).await?;
            BookingNeighbours::select(&bookings, self.clock.now())
        } else {
            BookingNeighbours::default()
        };
        Ok(EnrichedItem {
            item,
            neighbours,
            comments,
        })
    }

    fn to_dto(&self, e: &EnrichedItem) -> ItemDto {
        ItemDto::enriched(&e.item, &e.neighbours, &e.comments, &self.format)
    }
}
