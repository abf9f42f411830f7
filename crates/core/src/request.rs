//! Item requests: "I am looking for ..." posts that items can answer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainResult;
use crate::id::{RequestId, UserId};
use crate::user::require_non_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub id: RequestId,
    pub description: String,
    pub requestor_id: UserId,
    pub created: NaiveDateTime,
}

impl Entity for ItemRequest {
    type Id = RequestId;

    fn id(&self) -> RequestId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub description: String,
    pub requestor_id: UserId,
    pub created: NaiveDateTime,
}

impl NewItemRequest {
    pub fn new(
        description: Option<String>,
        requestor_id: UserId,
        created: NaiveDateTime,
    ) -> DomainResult<Self> {
        let description = require_non_blank(description, "request description must be set")?;
        Ok(Self {
            description,
            requestor_id,
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn description_is_required() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(NewItemRequest::new(Some("Need a ladder".into()), UserId::from_raw(1), created).is_ok());
        assert!(NewItemRequest::new(Some("".into()), UserId::from_raw(1), created).is_err());
        assert!(NewItemRequest::new(None, UserId::from_raw(1), created).is_err());
    }
}
