//! Edge-side shape checks for bodies and query strings.
//!
//! Nothing here touches stored state: existence, ownership and booking
//! rules stay with the server. Bodies are re-serialized as they were
//! received once they pass.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shareit_core::user::validate_email;
use shareit_core::{BookingState, DateTimeFormat, DomainError, DomainResult, ItemId, PageRequest, RequestId};

// -------------------------
// Bodies
// -------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserInput {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserInput {
    pub fn validate_new(&self) -> DomainResult<()> {
        match &self.email {
            Some(email) => validate_email(email),
            None => Ok(()),
        }
    }

    pub fn validate_patch(&self) -> DomainResult<()> {
        null_or_non_blank("email", self.email.as_deref())?;
        null_or_non_blank("name", self.name.as_deref())?;
        self.validate_new()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<RequestId>,
}

impl ItemInput {
    pub fn validate_new(&self) -> DomainResult<()> {
        non_blank("name", self.name.as_deref())?;
        non_blank("description", self.description.as_deref())?;
        if self.available.is_none() {
            return Err(DomainError::validation("available must be set"));
        }
        Ok(())
    }

    pub fn validate_patch(&self) -> DomainResult<()> {
        null_or_non_blank("name", self.name.as_deref())?;
        null_or_non_blank("description", self.description.as_deref())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CommentInput {
    pub text: Option<String>,
}

impl CommentInput {
    pub fn validate(&self) -> DomainResult<()> {
        non_blank("text", self.text.as_deref())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub start: Option<String>,
    pub end: Option<String>,
    pub item_id: Option<ItemId>,
}

impl BookingInput {
    /// `start` may be exactly now, `end` must lie strictly after it.
    pub fn validate(&self, format: &DateTimeFormat, now: NaiveDateTime) -> DomainResult<()> {
        let start = required("start", self.start.as_deref())?;
        let end = required("end", self.end.as_deref())?;
        if self.item_id.is_none() {
            return Err(DomainError::validation("itemId must be set"));
        }

        if format.parse(start)? < now {
            return Err(DomainError::validation("start must be in the present or future"));
        }
        if format.parse(end)? <= now {
            return Err(DomainError::validation("end must be in the future"));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RequestInput {
    pub description: Option<String>,
}

impl RequestInput {
    pub fn validate(&self) -> DomainResult<()> {
        non_blank("description", self.description.as_deref())
    }
}

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub from: Option<String>,
    pub size: Option<String>,
}

impl PageQuery {
    pub fn validate(&self) -> DomainResult<PageRequest> {
        page(self.from.as_deref(), self.size.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub from: Option<String>,
    pub size: Option<String>,
}

impl SearchQuery {
    /// `text` must be present; a blank one is fine and yields no hits upstream.
    pub fn validate(&self) -> DomainResult<PageRequest> {
        if self.text.is_none() {
            return Err(DomainError::invalid_argument("text must be set"));
        }
        page(self.from.as_deref(), self.size.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub state: Option<String>,
    pub from: Option<String>,
    pub size: Option<String>,
}

impl BookingListQuery {
    pub fn validate(&self) -> DomainResult<(BookingState, PageRequest)> {
        let state = match self.state.as_deref() {
            Some(s) => s.parse()?,
            None => BookingState::All,
        };
        Ok((state, page(self.from.as_deref(), self.size.as_deref())?))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionQuery {
    pub approved: Option<String>,
}

impl DecisionQuery {
    pub fn validate(&self) -> DomainResult<bool> {
        parse_param("approved", self.approved.as_deref())?
            .ok_or_else(|| DomainError::invalid_argument("approved must be set"))
    }
}

// -------------------------
// Helpers
// -------------------------

fn page(from: Option<&str>, size: Option<&str>) -> DomainResult<PageRequest> {
    PageRequest::from_query(parse_param("from", from)?, parse_param("size", size)?)
}

fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> DomainResult<Option<T>> {
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|_| DomainError::invalid_argument(format!("invalid value for {name}: {v}")))
    })
    .transpose()
}

fn required<'a>(field: &str, value: Option<&'a str>) -> DomainResult<&'a str> {
    value.ok_or_else(|| DomainError::validation(format!("{field} must be set")))
}

fn non_blank(field: &str, value: Option<&str>) -> DomainResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(DomainError::validation(format!("{field} must not be blank"))),
    }
}

fn null_or_non_blank(field: &str, value: Option<&str>) -> DomainResult<()> {
    match value {
        Some(v) if v.trim().is_empty() => Err(DomainError::validation(format!("{field} must not be blank"))),
        _ => Ok(()),
    }
}
