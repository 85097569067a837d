//! 自定义提取器
//!
//! 拒绝统一映射为 `ApiError`，响应体与处理器错误保持一致。

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tracing::warn;

use super::error::ApiError;
use crate::pagination::page_from_query;

/// 路径中的 id 段；只接受非负整数，其它一律当作路径不存在
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParam(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        parse_id(&raw).map(IdParam).ok_or(ApiError::NotFound)
    }
}

/// `?page=N`，缺失或非法时为 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(pub u32);

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Page(page_from_query(parts.uri.query())))
    }
}

/// JSON 请求体；不检查 Content-Type，解析失败 400，超过上限 413
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S, B> FromRequest<S, B> for JsonBody
where
    Bytes: FromRequest<S, B>,
    B: Send + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            let response = axum::response::IntoResponse::into_response(rejection);
            if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
                warn!("[Api::Extract] Request body exceeds limit");
                ApiError::PayloadTooLarge
            } else {
                ApiError::BadRequest
            }
        })?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| ApiError::BadRequest)
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
