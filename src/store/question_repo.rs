//! 题目表 CRUD 操作
//!
//! ## 核心方法
//! - `list_all`: 按 id 升序列出全部题目
//! - `list_by_category`: 按分类精确筛选
//! - `search`: 题干子串搜索（Unicode 大小写不敏感）
//! - `list_excluding`: 排除指定 id，可选限定分类（测验选题用）
//! - `create_question` / `delete_question`: 新增、物理删除
//! - `count`: 题目总数
//!
//! 每个方法都有 `_with_conn` 版本，便于处理器在同一连接上完成一次请求。

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::database::TriviaDatabase;
use super::error::{StoreError, StoreResult};

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

// ============================================================================
// 数据类型定义
// ============================================================================

/// 题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// 创建题目参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQuestionParams {
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

// ============================================================================
// 仓储
// ============================================================================

/// 题目仓储
pub struct TriviaQuestionRepo;

impl TriviaQuestionRepo {
    // ========================================================================
    // 列表查询
    // ========================================================================

    /// 列出全部题目（按 id 升序）
    pub fn list_all(db: &TriviaDatabase) -> StoreResult<Vec<Question>> {
        let conn = db.get_conn_safe()?;
        Self::list_all_with_conn(&conn)
    }

    pub fn list_all_with_conn(conn: &Connection) -> StoreResult<Vec<Question>> {
        let sql = format!("SELECT {} FROM questions ORDER BY id ASC", QUESTION_COLUMNS);
        Self::query_questions(conn, &sql, &[])
    }

    /// 按分类列出题目
    pub fn list_by_category(db: &TriviaDatabase, category_id: i64) -> StoreResult<Vec<Question>> {
        let conn = db.get_conn_safe()?;
        Self::list_by_category_with_conn(&conn, category_id)
    }

    pub fn list_by_category_with_conn(
        conn: &Connection,
        category_id: i64,
    ) -> StoreResult<Vec<Question>> {
        let sql = format!(
            "SELECT {} FROM questions WHERE category = ?1 ORDER BY id ASC",
            QUESTION_COLUMNS
        );
        let questions = Self::query_questions(conn, &sql, &[&category_id])?;
        debug!(
            "[Trivia::QuestionRepo] category={} matched {} questions",
            category_id,
            questions.len()
        );
        Ok(questions)
    }

    /// 题干子串搜索
    ///
    /// 大小写折叠按 Unicode 规则在内存中完成（SQLite 的 LIKE 只折叠 ASCII），
    /// 关键词按字面匹配，没有通配符。
    pub fn search(db: &TriviaDatabase, term: &str) -> StoreResult<Vec<Question>> {
        let conn = db.get_conn_safe()?;
        Self::search_with_conn(&conn, term)
    }

    pub fn search_with_conn(conn: &Connection, term: &str) -> StoreResult<Vec<Question>> {
        if term.is_empty() {
            return Err(StoreError::InvalidArgument {
                param: "term".to_string(),
                reason: "search term must not be empty".to_string(),
            });
        }

        let needle = term.to_lowercase();
        let questions: Vec<Question> = Self::list_all_with_conn(conn)?
            .into_iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .collect();
        debug!(
            "[Trivia::QuestionRepo] search term={:?} matched {} questions",
            term,
            questions.len()
        );
        Ok(questions)
    }

    /// 列出不在 `excluded_ids` 中的题目
    ///
    /// `category_id` 为 `Some(非 0)` 时额外限定分类；`None` 或 `Some(0)` 表示全部分类。
    /// 排除集在内存中过滤，长度不受 SQLite 绑定参数上限约束。
    pub fn list_excluding(
        db: &TriviaDatabase,
        excluded_ids: &[i64],
        category_id: Option<i64>,
    ) -> StoreResult<Vec<Question>> {
        let conn = db.get_conn_safe()?;
        Self::list_excluding_with_conn(&conn, excluded_ids, category_id)
    }

    pub fn list_excluding_with_conn(
        conn: &Connection,
        excluded_ids: &[i64],
        category_id: Option<i64>,
    ) -> StoreResult<Vec<Question>> {
        let excluded: HashSet<i64> = excluded_ids.iter().copied().collect();

        let scope = match category_id.filter(|&c| c != 0) {
            Some(cid) => Self::list_by_category_with_conn(conn, cid)?,
            None => Self::list_all_with_conn(conn)?,
        };
        let questions: Vec<Question> = scope
            .into_iter()
            .filter(|q| !excluded.contains(&q.id))
            .collect();

        debug!(
            "[Trivia::QuestionRepo] {} candidates remain (excluded={}, category={:?})",
            questions.len(),
            excluded.len(),
            category_id
        );
        Ok(questions)
    }

    /// 题目总数
    pub fn count(db: &TriviaDatabase) -> StoreResult<i64> {
        let conn = db.get_conn_safe()?;
        Self::count_with_conn(&conn)
    }

    pub fn count_with_conn(conn: &Connection) -> StoreResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count)
    }

    // ========================================================================
    // 单题
    // ========================================================================

    /// 根据 ID 获取题目
    pub fn get_question(db: &TriviaDatabase, question_id: i64) -> StoreResult<Option<Question>> {
        let conn = db.get_conn_safe()?;
        Self::get_question_with_conn(&conn, question_id)
    }

    pub fn get_question_with_conn(
        conn: &Connection,
        question_id: i64,
    ) -> StoreResult<Option<Question>> {
        let sql = format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS);
        let question = conn
            .query_row(&sql, params![question_id], Self::row_to_question)
            .optional()?;
        Ok(question)
    }

    /// 创建题目
    pub fn create_question(
        db: &TriviaDatabase,
        params: &CreateQuestionParams,
    ) -> StoreResult<Question> {
        let conn = db.get_conn_safe()?;
        Self::create_question_with_conn(&conn, params)
    }

    pub fn create_question_with_conn(
        conn: &Connection,
        params: &CreateQuestionParams,
    ) -> StoreResult<Question> {
        conn.execute(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![
                params.question,
                params.answer,
                params.category,
                params.difficulty
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!("[Trivia::QuestionRepo] Created question id={}", id);

        Self::get_question_with_conn(conn, id)?
            .ok_or_else(|| StoreError::not_found("question", id))
    }

    /// 删除题目（物理删除）
    ///
    /// 行不存在时返回 `StoreError::NotFound`，不会静默成功。
    pub fn delete_question(db: &TriviaDatabase, question_id: i64) -> StoreResult<()> {
        let conn = db.get_conn_safe()?;
        Self::delete_question_with_conn(&conn, question_id)
    }

    pub fn delete_question_with_conn(conn: &Connection, question_id: i64) -> StoreResult<()> {
        let affected = conn.execute("DELETE FROM questions WHERE id = ?1", params![question_id])?;

        if affected == 0 {
            return Err(StoreError::not_found("question", question_id));
        }

        info!("[Trivia::QuestionRepo] Deleted question id={}", question_id);
        Ok(())
    }

    // ========================================================================
    // 辅助方法
    // ========================================================================

    fn query_questions(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> StoreResult<Vec<Question>> {
        let mut stmt = conn.prepare(sql)?;
        let questions = stmt
            .query_map(params, Self::row_to_question)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    /// 行转换为 Question
    fn row_to_question(row: &Row) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
        })
    }
}
