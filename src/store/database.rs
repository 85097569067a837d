//! 题库数据库管理模块
//!
//! 提供题库的 SQLite 数据库初始化和管理功能。
//! 使用 r2d2 连接池，支持并发访问。
//!
//! ## 设计原则
//! - **两张表**：`categories`（只读）与 `questions`（增删）
//! - **不做外键**：题目的 `category` 允许指向已不存在的分类
//! - **连接池管理**：使用 r2d2 管理连接池
//!
//! Schema 使用 `CREATE TABLE IF NOT EXISTS` 初始化，可重复执行。

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::{StoreError, StoreResult};

/// SQLite 连接池类型
pub type TriviaPool = Pool<SqliteConnectionManager>;
/// SQLite 池化连接类型
pub type TriviaPooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// 默认最大连接数
pub const DEFAULT_POOL_MAX_SIZE: u32 = 8;

const TRIVIA_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category INTEGER NOT NULL,
    difficulty INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
"#;

/// 题库数据库管理器
///
/// 持有连接池；所有仓储方法都通过它取连接，自身不缓存任何行数据。
#[derive(Debug)]
pub struct TriviaDatabase {
    pool: TriviaPool,
    /// 内存库时为 None
    db_path: Option<PathBuf>,
}

impl TriviaDatabase {
    /// 打开（或创建）磁盘上的题库数据库
    ///
    /// # Errors
    /// * 目录创建失败
    /// * 连接池创建失败
    /// * Schema 初始化失败
    pub fn new(db_path: &Path) -> StoreResult<Self> {
        Self::with_pool_size(db_path, DEFAULT_POOL_MAX_SIZE)
    }

    /// 打开磁盘数据库并指定连接池大小
    pub fn with_pool_size(db_path: &Path, max_size: u32) -> StoreResult<Self> {
        info!(
            "[Trivia::Database] Opening trivia database: {}",
            db_path.display()
        );

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    error!(
                        "[Trivia::Database] Failed to create database directory: {}",
                        e
                    );
                    return Err(StoreError::Io(format!(
                        "Failed to create database directory: {}",
                        e
                    )));
                }
            }
        }

        let pool = Self::build_pool(db_path, max_size.max(1))?;
        let db = Self {
            pool,
            db_path: Some(db_path.to_path_buf()),
        };
        db.init_schema()?;

        info!(
            "[Trivia::Database] Trivia database ready: {}",
            db_path.display()
        );
        Ok(db)
    }

    /// 创建内存数据库（测试用）
    ///
    /// 每个 SQLite 内存连接都是独立的库，所以池大小固定为 1，
    /// 且不设置连接寿命，避免连接被回收导致数据丢失。
    pub fn new_in_memory() -> StoreResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_timeout(Duration::from_secs(2))
            .build(manager)
            .map_err(|e| StoreError::Pool(format!("Failed to create in-memory pool: {}", e)))?;

        let db = Self {
            pool,
            db_path: None,
        };
        db.init_schema()?;
        debug!("[Trivia::Database] In-memory trivia database ready");
        Ok(db)
    }

    /// 构建连接池
    fn build_pool(db_path: &Path, max_size: u32) -> StoreResult<TriviaPool> {
        debug!(
            "[Trivia::Database] Building connection pool for: {}",
            db_path.display()
        );

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            // 写锁等待上限，避免无界阻塞
            conn.pragma_update(None, "busy_timeout", 5000i64)?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(1))
            .connection_timeout(Duration::from_secs(5))
            .max_lifetime(Some(Duration::from_secs(1800)))
            .idle_timeout(Some(Duration::from_secs(600)))
            .build(manager)
            .map_err(|e| StoreError::Pool(format!("Failed to create connection pool: {}", e)))?;

        Ok(pool)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        Self::init_schema_with_conn(&conn)
    }

    /// 在指定连接上执行建表语句（幂等）
    pub fn init_schema_with_conn(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(TRIVIA_SCHEMA)?;
        Ok(())
    }

    /// 获取数据库连接
    pub fn get_conn(&self) -> StoreResult<TriviaPooledConnection> {
        self.pool
            .get()
            .map_err(|e| StoreError::Pool(format!("Failed to get connection: {}", e)))
    }

    /// 获取数据库连接（带重试）
    ///
    /// 连接池繁忙时最多尝试 3 次，退避时间指数增长。
    pub fn get_conn_safe(&self) -> StoreResult<TriviaPooledConnection> {
        const MAX_RETRIES: usize = 3;
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match self.pool.get() {
                Ok(conn) => {
                    if attempt > 0 {
                        debug!(
                            "[Trivia::Database] get_conn_safe: succeeded on retry attempt {}",
                            attempt
                        );
                    }
                    return Ok(conn);
                }
                Err(e) => {
                    warn!(
                        "[Trivia::Database] get_conn_safe: attempt {} failed: {}",
                        attempt + 1,
                        e
                    );
                    last_error = Some(e);
                    if attempt < MAX_RETRIES - 1 {
                        let backoff_ms = 50u64.saturating_mul(1u64 << attempt).min(1000);
                        std::thread::sleep(Duration::from_millis(backoff_ms));
                    }
                }
            }
        }

        error!(
            "[Trivia::Database] get_conn_safe: all {} attempts failed",
            MAX_RETRIES
        );
        Err(StoreError::Pool(format!(
            "Failed to get connection after {} retries: {}",
            MAX_RETRIES,
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string())
        )))
    }

    /// 数据库文件路径（内存库返回 None）
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_db() -> (TempDir, TriviaDatabase) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = TriviaDatabase::new(&temp_dir.path().join("data").join("trivia.db"))
            .expect("Failed to create database");
        (temp_dir, db)
    }

    #[test]
    fn test_database_creation() {
        let (temp_dir, db) = setup_test_db();

        let db_file = temp_dir.path().join("data").join("trivia.db");
        assert!(db_file.exists(), "Database file should exist");
        assert_eq!(db.db_path(), Some(db_file.as_path()));
    }

    #[test]
    fn test_tables_created() {
        let (_temp_dir, db) = setup_test_db();
        let conn = db.get_conn().expect("Failed to get connection");

        for table in ["categories", "questions"] {
            let exists: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .expect("Failed to check table existence");
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_schema_idempotent() {
        let (temp_dir, db) = setup_test_db();
        drop(db);

        // 重新打开（模拟重启）不应报错
        let db2 = TriviaDatabase::new(&temp_dir.path().join("data").join("trivia.db"))
            .expect("Failed to reopen database");
        let conn = db2.get_conn_safe().expect("Failed to get connection");
        TriviaDatabase::init_schema_with_conn(&conn).expect("Schema should be idempotent");
    }

    #[test]
    fn test_in_memory_database_keeps_data_between_checkouts() {
        let db = TriviaDatabase::new_in_memory().expect("Failed to create in-memory db");
        {
            let conn = db.get_conn().unwrap();
            conn.execute("INSERT INTO categories (type) VALUES ('Science')", [])
                .unwrap();
        }
        let conn = db.get_conn().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(db.db_path().is_none());
    }
}
