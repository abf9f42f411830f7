use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use shareit_core::{SHARER_USER_HEADER, UserId};

use crate::app::errors::json_error;
use crate::context::SharerContext;

pub async fn sharer_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let user_id = extract_sharer(req.headers())
        .map_err(|msg| json_error(StatusCode::BAD_REQUEST, msg))?;

    req.extensions_mut().insert(SharerContext::new(user_id));

    Ok(next.run(req).await)
}

pub fn extract_sharer(headers: &HeaderMap) -> Result<UserId, String> {
    let header = headers
        .get(SHARER_USER_HEADER)
        .ok_or_else(|| format!("missing {SHARER_USER_HEADER} header"))?;

    let header = header
        .to_str()
        .map_err(|_| format!("{SHARER_USER_HEADER} header is not valid text"))?;

    header
        .trim()
        .parse::<UserId>()
        .map_err(|_| format!("{SHARER_USER_HEADER} header must be a numeric user id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_must_be_present_and_numeric() {
        let mut headers = HeaderMap::new();
        assert!(extract_sharer(&headers).is_err());

        headers.insert(SHARER_USER_HEADER, HeaderValue::from_static("abc"));
        assert!(extract_sharer(&headers).is_err());

        headers.insert(SHARER_USER_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(extract_sharer(&headers).unwrap(), UserId::from_raw(42));
    }
}
