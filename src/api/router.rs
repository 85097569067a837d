//! 显式路由表
//!
//! 进程启动时构建一次的 `axum::Router`。未知路径统一 404，已知路径上的错误方法 405，
//! `OPTIONS` 预检在已知路径上返回空 200。每个响应都带 CORS 头并记录一行访问日志。

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, MethodRouter};
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info};

use super::error::{ApiError, ApiResult};
use super::extract::{IdParam, JsonBody, Page};
use super::handlers;
use super::state::ApiState;

/// 默认 API 前缀
pub const API_PREFIX: &str = "/api/v1";

/// 请求体上限
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization, true";
const CORS_ALLOW_METHODS: &str = "GET, PUT, POST, DELETE, OPTIONS";

type SharedState = Arc<ApiState>;

/// 题库 API 的完整路由表
pub fn trivia_router(prefix: &str, state: SharedState) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let path = |p: &str| format!("{}{}", prefix, p);

    Router::new()
        .route(&path("/categories"), with_fallback(get(list_categories)))
        .route(
            &path("/categories/:id/questions"),
            with_fallback(get(list_category_questions)),
        )
        .route(
            &path("/questions"),
            with_fallback(get(list_questions).post(create_question)),
        )
        .route(&path("/questions/search"), with_fallback(post(search_questions)))
        .route(&path("/questions/:id"), with_fallback(delete(delete_question)))
        .route(&path("/quizzes"), with_fallback(post(play_quiz)))
        .fallback(not_found)
        .layer(middleware::from_fn(access_log_and_cors))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

fn with_fallback(route: MethodRouter<SharedState>) -> MethodRouter<SharedState> {
    route.fallback(method_fallback)
}

// ============================================================================
// 端点
// ============================================================================

async fn list_categories(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    blocking(state, handlers::get_categories).await
}

async fn list_questions(
    State(state): State<SharedState>,
    Page(page): Page,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| handlers::get_questions(s, page)).await
}

async fn list_category_questions(
    State(state): State<SharedState>,
    IdParam(category_id): IdParam,
    Page(page): Page,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| {
        handlers::get_questions_by_category(s, category_id, page)
    })
    .await
}

async fn search_questions(
    State(state): State<SharedState>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| handlers::search_questions(s, &body)).await
}

async fn delete_question(
    State(state): State<SharedState>,
    IdParam(question_id): IdParam,
    Page(page): Page,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| handlers::delete_question(s, question_id, page)).await
}

async fn create_question(
    State(state): State<SharedState>,
    Page(page): Page,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| handlers::create_question(s, &body, page)).await
}

async fn play_quiz(
    State(state): State<SharedState>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    blocking(state, move |s| handlers::play_quiz(s, &body)).await
}

// ============================================================================
// 兜底与中间件
// ============================================================================

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// 已知路径上的未注册方法：预检返回空 200，其它 405
async fn method_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        ApiError::MethodNotAllowed.into_response()
    }
}

async fn access_log_and_cors<B>(req: Request<B>, next: Next<B>) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );

    info!(
        "[Api::Router] {} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// 存储调用是阻塞的，放到阻塞线程池里执行
async fn blocking<F>(state: SharedState, f: F) -> ApiResult<Json<Value>>
where
    F: FnOnce(&ApiState) -> ApiResult<Value> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("[Api::Router] Handler task failed: {}", e);
            ApiError::Internal
        })?
        .map(Json)
}
