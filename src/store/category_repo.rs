//! 题目分类表只读访问
//!
//! 分类在播种后不再变化；`insert` 仅供播种与测试使用，没有对应的 HTTP 端点。

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::database::TriviaDatabase;
use super::error::StoreResult;

/// 题目分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// 显示名称（列名沿用 `type`）
    #[serde(rename = "type")]
    pub kind: String,
}

/// 分类 id -> 名称映射，序列化为 `{"1": "Science", ...}`
pub type CategoryMap = BTreeMap<i64, String>;

/// 分类仓储
pub struct TriviaCategoryRepo;

impl TriviaCategoryRepo {
    /// 列出全部分类（按 id 升序）
    pub fn list_all(db: &TriviaDatabase) -> StoreResult<Vec<Category>> {
        let conn = db.get_conn_safe()?;
        Self::list_all_with_conn(&conn)
    }

    /// 列出全部分类（使用现有连接）
    pub fn list_all_with_conn(conn: &Connection) -> StoreResult<Vec<Category>> {
        let mut stmt = conn.prepare("SELECT id, type FROM categories ORDER BY id ASC")?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "[Trivia::CategoryRepo] Listed {} categories",
            categories.len()
        );
        Ok(categories)
    }

    /// 分类数量
    pub fn count(db: &TriviaDatabase) -> StoreResult<i64> {
        let conn = db.get_conn_safe()?;
        Self::count_with_conn(&conn)
    }

    pub fn count_with_conn(conn: &Connection) -> StoreResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 新增分类
    pub fn insert(db: &TriviaDatabase, kind: &str) -> StoreResult<Category> {
        let conn = db.get_conn_safe()?;
        Self::insert_with_conn(&conn, kind)
    }

    pub fn insert_with_conn(conn: &Connection, kind: &str) -> StoreResult<Category> {
        conn.execute("INSERT INTO categories (type) VALUES (?1)", params![kind])?;
        let id = conn.last_insert_rowid();
        info!("[Trivia::CategoryRepo] Created category id={} type={}", id, kind);
        Ok(Category {
            id,
            kind: kind.to_string(),
        })
    }

    /// 构建 id -> 名称映射
    pub fn to_map(categories: &[Category]) -> CategoryMap {
        categories
            .iter()
            .map(|c| (c.id, c.kind.clone()))
            .collect()
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            kind: row.get(1)?,
        })
    }
}
