//! API 统一错误类型
//!
//! 每个变体对应一个 HTTP 状态码；响应体统一为
//! `{"success": false, "error": <code>, "message": <text>}`，不携带内部细节。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400：请求体无法解析或搜索词为空
    #[error("bad request")]
    BadRequest,

    /// 404：资源不存在或列表为空
    #[error("resource not found")]
    NotFound,

    /// 405：路径存在但方法不匹配
    #[error("method not allowed")]
    MethodNotAllowed,

    /// 413：请求体超过上限
    #[error("payload too large")]
    PayloadTooLarge,

    /// 422：缺少必填字段或写入失败
    #[error("unprocessable")]
    Unprocessable,

    /// 500：读取路径上的存储故障
    #[error("internal server error")]
    Internal,
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.status().as_u16(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
