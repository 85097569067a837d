// Trivia API library entry
// 二进制目标只负责日志初始化与配置加载，其余都在这里。

pub mod api;
pub mod config;
pub mod pagination;
pub mod quiz_service;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::api::{trivia_router, ApiState, API_PREFIX};
use crate::config::AppConfig;
use crate::store::{seed_if_empty, TriviaDatabase};

/// 打开数据库、按需写入默认题库
pub fn open_database(config: &AppConfig) -> anyhow::Result<Arc<TriviaDatabase>> {
    let db = TriviaDatabase::with_pool_size(&config.database_path, config.pool_max_size)
        .with_context(|| {
            format!(
                "failed to open trivia database at {}",
                config.database_path.display()
            )
        })?;

    if config.seed_on_empty {
        let seeded = seed_if_empty(&db).context("failed to seed trivia database")?;
        if seeded.categories_created > 0 {
            info!(
                "[Trivia] Seeded {} categories and {} questions",
                seeded.categories_created, seeded.questions_created
            );
        }
    }

    Ok(Arc::new(db))
}

/// 启动服务并阻塞到 Ctrl-C
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = open_database(&config)?;
    let app = trivia_router(API_PREFIX, Arc::new(ApiState::new(db)));

    api::serve(config.bind_addr, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[Trivia] Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("[Trivia] Shutdown signal received");
    })
    .await
}
