use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use shareit_core::{SHARER_USER_HEADER, UserId};

use crate::app::errors::json_error;

/// Acting user, validated at the edge and passed on to the server as is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sharer(pub UserId);

pub async fn sharer_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let user_id = parse_sharer(req.headers()).map_err(|msg| {
        tracing::warn!(error = %msg, "rejected request without a usable sharer header");
        json_error(StatusCode::BAD_REQUEST, msg)
    })?;

    req.extensions_mut().insert(Sharer(user_id));

    Ok(next.run(req).await)
}

fn parse_sharer(headers: &HeaderMap) -> Result<UserId, String> {
    headers
        .get(SHARER_USER_HEADER)
        .ok_or_else(|| format!("missing {SHARER_USER_HEADER} header"))?
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<UserId>().ok())
        .ok_or_else(|| format!("{SHARER_USER_HEADER} header must be a numeric user id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_and_garbage_headers_are_distinguished() {
        let mut headers = HeaderMap::new();
        assert!(parse_sharer(&headers).unwrap_err().starts_with("missing"));

        headers.insert(SHARER_USER_HEADER, HeaderValue::from_static("7a"));
        assert!(parse_sharer(&headers).unwrap_err().contains("numeric"));

        headers.insert(SHARER_USER_HEADER, HeaderValue::from_static("7"));
        assert_eq!(parse_sharer(&headers).unwrap(), UserId::from_raw(7));
    }
}
