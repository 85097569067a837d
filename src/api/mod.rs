//! HTTP API 层
//!
//! `router` 构建 axum 路由表并把请求交给 `handlers`，`server` 负责监听与关闭。
//! 处理器是同步函数，只依赖 `ApiState` 与已解析的参数。

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use router::{trivia_router, API_PREFIX, MAX_BODY_BYTES};
pub use server::{serve, spawn_server, ServerHandle};
pub use state::ApiState;
