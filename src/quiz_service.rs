//! 随机测验选题服务
//!
//! 无状态：测验进度完全由客户端持有，每轮把已出过的题目 id 列表发回来。
//! 每次调用都重新读取候选集并重新抽样，不按难度加权。

use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::Connection;
use std::sync::Arc;
use tracing::debug;

use crate::store::{Question, StoreResult, TriviaDatabase, TriviaQuestionRepo};

/// "全部分类" 哨兵值
pub const ALL_CATEGORIES: i64 = 0;

/// 测验选题服务
pub struct QuizService {
    db: Arc<TriviaDatabase>,
}

impl QuizService {
    pub fn new(db: Arc<TriviaDatabase>) -> Self {
        Self { db }
    }

    /// 抽取下一题
    ///
    /// `category_id == 0` 表示不限分类；候选集为空时返回 `None`（测验结束，不是错误）。
    pub fn select_next(
        &self,
        category_id: i64,
        previous_ids: &[i64],
    ) -> StoreResult<Option<Question>> {
        let conn = self.db.get_conn_safe()?;
        Self::select_next_with_conn(&conn, category_id, previous_ids)
    }

    /// 抽取下一题（使用现有连接）
    pub fn select_next_with_conn(
        conn: &Connection,
        category_id: i64,
        previous_ids: &[i64],
    ) -> StoreResult<Option<Question>> {
        Self::select_next_with_rng(conn, category_id, previous_ids, &mut rand::thread_rng())
    }

    /// 抽取下一题（指定随机源）
    pub fn select_next_with_rng<R: Rng + ?Sized>(
        conn: &Connection,
        category_id: i64,
        previous_ids: &[i64],
        rng: &mut R,
    ) -> StoreResult<Option<Question>> {
        let category = (category_id != ALL_CATEGORIES).then_some(category_id);
        let candidates =
            TriviaQuestionRepo::list_excluding_with_conn(conn, previous_ids, category)?;

        let picked = candidates.choose(rng).cloned();
        debug!(
            "[QuizService] category={} previous={} candidates={} picked={:?}",
            category_id,
            previous_ids.len(),
            candidates.len(),
            picked.as_ref().map(|q| q.id)
        );
        Ok(picked)
    }
}
