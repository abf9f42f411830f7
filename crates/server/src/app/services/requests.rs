use shareit_core::{DomainError, ItemRequest, NewItemRequest, PageRequest, RequestId, UserId};

use super::{AppServices, ServiceResult};
use crate::app::dto::{ItemRequestDto, RequestBody};

impl AppServices {
    pub async fn create_request(&self, requestor: UserId, body: RequestBody) -> ServiceResult<ItemRequestDto> {
        self.require_user(requestor).await?;
        let new = NewItemRequest::new(body.description, requestor, self.clock.now())?;
        let request = self.store.insert_request(&new).await?;
        tracing::info!(request_id = %request.id, requestor_id = %requestor, "item request created");
        Ok(ItemRequestDto::new(&request, &[], &self.format))
    }

    /// Newest first, each with the items answering it.
    pub async fn own_requests(&self, requestor: UserId) -> ServiceResult<Vec<ItemRequestDto>> {
        self.require_user(requestor).await?;
        let requests = self.store.requests_by_requestor(requestor).await?;
        self.with_items(requests).await
    }

    pub async fn requests_of_others(&self, user: UserId, page: PageRequest) -> ServiceResult<Vec<ItemRequestDto>> {
        self.require_user(user).await?;
        let requests = self
            .store
            .requests_of_others(user, page.page_offset(), page.size())
            .await?;
        self.with_items(requests).await
    }

    pub async fn get_request(&self, user: UserId, id: RequestId) -> ServiceResult<ItemRequestDto> {
        self.require_user(user).await?;
        let request = self
            .store
            .find_request(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("request with id={id} not found")))?;
        let items = self.store.items_by_requests(&[id]).await?;
        Ok(ItemRequestDto::new(&request, &items, &self.format))
    }

    async fn with_items(&self, requests: Vec<ItemRequest>) -> ServiceResult<Vec<ItemRequestDto>> {
        let ids: Vec<RequestId> = requests.iter().map(|r| r.id).collect();
        let items = self.store.items_by_requests(&ids).await?;
        Ok(requests
            .iter()
            .map(|r| ItemRequestDto::new(r, &items, &self.format))
            .collect())
    }
}
