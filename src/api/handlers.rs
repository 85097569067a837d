//! 端点处理器
//!
//! 每个处理器：先校验必填字段，再执行一次逻辑操作，最后整形响应。
//! 处理器是同步的，由 `router` 放到阻塞线程池里执行。
//! 状态码映射：
//! - 读路径上的存储故障 -> 500
//! - 写路径（新增/删除）上的存储故障 -> 422，删除不存在的题目 -> 404
//! - 列表端点分页后为空 -> 404（包括确实为空的分类、越界页码）

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::error::{ApiError, ApiResult};
use super::state::ApiState;
use super::types::{
    CategoriesResponse, CreateQuestionResponse, DeleteQuestionResponse, QuestionListResponse,
    QuizResponse,
};
use crate::pagination::{paginate, QUESTIONS_PER_PAGE};
use crate::store::{
    CreateQuestionParams, StoreError, TriviaCategoryRepo, TriviaPooledConnection,
    TriviaQuestionRepo,
};

const MSG_DELETED: &str = "Question deleted successfully.";
const MSG_CREATED: &str = "Question created successfully.";

// ============================================================================
// 分类
// ============================================================================

/// GET /categories
pub fn get_categories(state: &ApiState) -> ApiResult<Value> {
    let conn = read_conn(state)?;
    let categories = TriviaCategoryRepo::list_all_with_conn(&conn)
        .map_err(|e| read_failure("list categories", e))?;

    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    to_json(&CategoriesResponse {
        success: true,
        categories: TriviaCategoryRepo::to_map(&categories),
    })
}

// ============================================================================
// 题目列表
// ============================================================================

/// GET /questions?page=N
pub fn get_questions(state: &ApiState, page: u32) -> ApiResult<Value> {
    let conn = read_conn(state)?;
    let all = TriviaQuestionRepo::list_all_with_conn(&conn)
        .map_err(|e| read_failure("list questions", e))?;
    let questions = paginate(&all, page, QUESTIONS_PER_PAGE);

    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = TriviaCategoryRepo::list_all_with_conn(&conn)
        .map_err(|e| read_failure("list categories", e))?;
    let total_questions = TriviaQuestionRepo::count_with_conn(&conn)
        .map_err(|e| read_failure("count questions", e))?;

    to_json(&QuestionListResponse {
        success: true,
        questions,
        total_questions,
        categories: TriviaCategoryRepo::to_map(&categories),
        current_category: None,
    })
}

/// GET /categories/{id}/questions?page=N
///
/// `category_id > 分类数量` 时直接 404。这只是近似的存在性检查：
/// 编号小于数量但已被删除的分类不会被拦下，最终表现为空列表 404。
pub fn get_questions_by_category(
    state: &ApiState,
    category_id: i64,
    page: u32,
) -> ApiResult<Value> {
    let conn = read_conn(state)?;
    let categories = TriviaCategoryRepo::list_all_with_conn(&conn)
        .map_err(|e| read_failure("list categories", e))?;

    if category_id > categories.len() as i64 {
        return Err(ApiError::NotFound);
    }

    let selection = TriviaQuestionRepo::list_by_category_with_conn(&conn, category_id)
        .map_err(|e| read_failure("list questions by category", e))?;
    let questions = paginate(&selection, page, QUESTIONS_PER_PAGE);

    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let total_questions = TriviaQuestionRepo::count_with_conn(&conn)
        .map_err(|e| read_failure("count questions", e))?;

    to_json(&QuestionListResponse {
        success: true,
        questions,
        total_questions,
        categories: TriviaCategoryRepo::to_map(&categories),
        current_category: Some(category_id),
    })
}

/// POST /questions/search  `{"searchTerm": "..."}`
///
/// 空字符串、缺失或 `null` 的 searchTerm 一律 400；结果不分页，无匹配时返回空列表。
pub fn search_questions(state: &ApiState, body: &Value) -> ApiResult<Value> {
    let body = body.as_object().ok_or(ApiError::BadRequest)?;

    let conn = read_conn(state)?;
    let categories = TriviaCategoryRepo::list_all_with_conn(&conn)
        .map_err(|e| read_failure("list categories", e))?;

    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }

    let term = match body.get("searchTerm") {
        Some(Value::String(term)) if !term.is_empty() => term,
        _ => return Err(ApiError::BadRequest),
    };

    let questions = TriviaQuestionRepo::search_with_conn(&conn, term)
        .map_err(|e| read_failure("search questions", e))?;
    let total_questions = TriviaQuestionRepo::count_with_conn(&conn)
        .map_err(|e| read_failure("count questions", e))?;

    to_json(&QuestionListResponse {
        success: true,
        questions,
        total_questions,
        categories: TriviaCategoryRepo::to_map(&categories),
        current_category: None,
    })
}

// ============================================================================
// 写操作
// ============================================================================

/// DELETE /questions/{id}
pub fn delete_question(state: &ApiState, question_id: i64, page: u32) -> ApiResult<Value> {
    let conn = write_conn(state)?;
    TriviaQuestionRepo::delete_question_with_conn(&conn, question_id).map_err(|e| {
        if e.is_not_found() {
            ApiError::NotFound
        } else {
            write_failure("delete question", e)
        }
    })?;

    let all = TriviaQuestionRepo::list_all_with_conn(&conn)
        .map_err(|e| write_failure("list questions after delete", e))?;
    let total_questions = TriviaQuestionRepo::count_with_conn(&conn)
        .map_err(|e| write_failure("count questions after delete", e))?;

    info!("[Api::Handlers] Question {} deleted", question_id);

    to_json(&DeleteQuestionResponse {
        success: true,
        deleted: question_id,
        message: MSG_DELETED.to_string(),
        questions: paginate(&all, page, QUESTIONS_PER_PAGE),
        total_questions,
    })
}

/// POST /questions  `{"question", "answer", "difficulty", "category"}`
///
/// 任一字段缺失或为 `null` -> 422；字段存在但无法写入（类型不对）同样 422。
/// `difficulty` / `category` 接受整数或数字字符串。
pub fn create_question(state: &ApiState, body: &Value, page: u32) -> ApiResult<Value> {
    let body = body.as_object().ok_or(ApiError::BadRequest)?;

    let question = required_field(body, "question")?;
    let answer = required_field(body, "answer")?;
    let difficulty = required_field(body, "difficulty")?;
    let category = required_field(body, "category")?;

    let params = CreateQuestionParams {
        question: question
            .as_str()
            .ok_or_else(|| invalid_field("question"))?
            .to_string(),
        answer: answer
            .as_str()
            .ok_or_else(|| invalid_field("answer"))?
            .to_string(),
        difficulty: as_integer(difficulty).ok_or_else(|| invalid_field("difficulty"))?,
        category: as_integer(category).ok_or_else(|| invalid_field("category"))?,
    };

    let conn = write_conn(state)?;
    let created = TriviaQuestionRepo::create_question_with_conn(&conn, &params)
        .map_err(|e| write_failure("create question", e))?;
    let all = TriviaQuestionRepo::list_all_with_conn(&conn)
        .map_err(|e| write_failure("list questions after create", e))?;
    let total_questions = TriviaQuestionRepo::count_with_conn(&conn)
        .map_err(|e| write_failure("count questions after create", e))?;

    to_json(&CreateQuestionResponse {
        success: true,
        created: created.id,
        message: MSG_CREATED.to_string(),
        questions: paginate(&all, page, QUESTIONS_PER_PAGE),
        total_questions,
    })
}

// ============================================================================
// 测验
// ============================================================================

/// POST /quizzes  `{"quiz_category": {"id": N}, "previous_questions": [ids]}`
///
/// 两个键都必须存在；结构不对同样 422。候选为空时返回 `question: null`。
/// 分类 id 与已出题 id 都接受整数或数字字符串。
pub fn play_quiz(state: &ApiState, body: &Value) -> ApiResult<Value> {
    let body = body.as_object().ok_or(ApiError::BadRequest)?;

    let (Some(quiz_category), Some(previous_questions)) =
        (body.get("quiz_category"), body.get("previous_questions"))
    else {
        return Err(ApiError::Unprocessable);
    };

    let category_id = quiz_category
        .get("id")
        .and_then(as_integer)
        .ok_or_else(|| invalid_field("quiz_category.id"))?;
    let previous_ids = previous_questions
        .as_array()
        .and_then(|ids| ids.iter().map(as_integer).collect::<Option<Vec<_>>>())
        .ok_or_else(|| invalid_field("previous_questions"))?;

    let question = state
        .quiz
        .select_next(category_id, &previous_ids)
        .map_err(|e| read_failure("select quiz question", e))?;

    to_json(&QuizResponse {
        success: true,
        question,
    })
}

// ============================================================================
// 辅助方法
// ============================================================================

fn read_conn(state: &ApiState) -> ApiResult<TriviaPooledConnection> {
    state
        .db
        .get_conn_safe()
        .map_err(|e| read_failure("acquire connection", e))
}

fn write_conn(state: &ApiState) -> ApiResult<TriviaPooledConnection> {
    state
        .db
        .get_conn_safe()
        .map_err(|e| write_failure("acquire connection", e))
}

fn read_failure(op: &str, err: StoreError) -> ApiError {
    error!("[Api::Handlers] {} failed: {}", op, err);
    ApiError::Internal
}

fn write_failure(op: &str, err: StoreError) -> ApiError {
    warn!("[Api::Handlers] {} failed: {}", op, err);
    ApiError::Unprocessable
}

fn invalid_field(name: &str) -> ApiError {
    warn!("[Api::Handlers] Field '{}' has an unusable value", name);
    ApiError::Unprocessable
}

/// 缺失与 `null` 等价
fn required_field<'a>(body: &'a Map<String, Value>, name: &str) -> ApiResult<&'a Value> {
    match body.get(name) {
        Some(Value::Null) | None => Err(ApiError::Unprocessable),
        Some(value) => Ok(value),
    }
}

/// 整数或数字字符串
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_json<T: Serialize>(response: &T) -> ApiResult<Value> {
    serde_json::to_value(response).map_err(|e| {
        error!("[Api::Handlers] Failed to serialize response: {}", e);
        ApiError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer(&json!(3)), Some(3));
        assert_eq!(as_integer(&json!("4")), Some(4));
        assert_eq!(as_integer(&json!(" 5 ")), Some(5));
        assert_eq!(as_integer(&json!("five")), None);
        assert_eq!(as_integer(&json!(1.5)), None);
        assert_eq!(as_integer(&json!(true)), None);
    }

    #[test]
    fn test_required_field_treats_null_as_missing() {
        let body = json!({"question": null, "answer": "A"});
        let body = body.as_object().unwrap();
        assert_eq!(required_field(body, "question"), Err(ApiError::Unprocessable));
        assert_eq!(required_field(body, "difficulty"), Err(ApiError::Unprocessable));
        assert_eq!(required_field(body, "answer"), Ok(&json!("A")));
    }
}
