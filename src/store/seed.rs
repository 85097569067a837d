/// 题库播种工具
/// 空库启动时写入默认分类与题目，测试也用它构造固定数据
use rusqlite::Connection;
use tracing::info;

use super::category_repo::TriviaCategoryRepo;
use super::database::TriviaDatabase;
use super::error::StoreResult;
use super::question_repo::{CreateQuestionParams, TriviaQuestionRepo};

/// 默认分类（按插入顺序得到 id 1..=6）
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

/// 默认题目：(题干, 答案, 难度, 分类序号)
pub const DEFAULT_QUESTIONS: [(&str, &str, i64, i64); 19] = [
    (
        "What movie earned Tom Hanks his third straight Oscar nomination, in 1996?",
        "Apollo 13",
        4,
        5,
    ),
    (
        "What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?",
        "Tom Cruise",
        4,
        5,
    ),
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 2, 4),
    (
        "What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?",
        "Edward Scissorhands",
        3,
        5,
    ),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", 1, 4),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", 3, 6),
    ("Which country won the first ever soccer World Cup in 1930?", "Uruguay", 4, 6),
    ("Who invented Peanut Butter?", "George Washington Carver", 2, 4),
    ("What is the largest lake in Africa?", "Lake Victoria", 2, 3),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    ("The Taj Mahal is located in which Indian city?", "Agra", 2, 3),
    ("Which Dutch graphic artist-initials M C was a creator of optical illusions?", "Escher", 1, 2),
    ("La Giaconda is better known as what?", "Mona Lisa", 3, 2),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", 4, 2),
    (
        "Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?",
        "Jackson Pollock",
        2,
        2,
    ),
    ("What is the heaviest organ in the human body?", "The Liver", 4, 1),
    ("Who discovered penicillin?", "Alexander Fleming", 3, 1),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 4, 1),
    ("Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", 4, 4),
];

/// 播种结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub categories_created: usize,
    pub questions_created: usize,
}

/// 分类表为空时写入默认数据；已有数据则什么都不做
pub fn seed_if_empty(db: &TriviaDatabase) -> StoreResult<SeedResult> {
    let mut conn = db.get_conn_safe()?;
    if TriviaCategoryRepo::count_with_conn(&conn)? > 0 {
        return Ok(SeedResult::default());
    }

    let tx = conn.transaction()?;
    let result = seed_with_conn(&tx)?;
    tx.commit()?;

    info!(
        "[Trivia::Seed] Seeded {} categories and {} questions",
        result.categories_created, result.questions_created
    );
    Ok(result)
}

/// 无条件写入默认数据（使用现有连接）
///
/// 题目的分类按 `DEFAULT_CATEGORIES` 的序号映射到实际分配的 id。
pub fn seed_with_conn(conn: &Connection) -> StoreResult<SeedResult> {
    let mut category_ids = Vec::with_capacity(DEFAULT_CATEGORIES.len());
    for kind in DEFAULT_CATEGORIES {
        category_ids.push(TriviaCategoryRepo::insert_with_conn(conn, kind)?.id);
    }

    let mut questions_created = 0;
    for (question, answer, difficulty, ordinal) in DEFAULT_QUESTIONS {
        let category = category_ids
            .get((ordinal - 1) as usize)
            .copied()
            .unwrap_or(ordinal);
        TriviaQuestionRepo::create_question_with_conn(
            conn,
            &CreateQuestionParams {
                question: question.to_string(),
                answer: answer.to_string(),
                difficulty,
                category,
            },
        )?;
        questions_created += 1;
    }

    Ok(SeedResult {
        categories_created: category_ids.len(),
        questions_created,
    })
}
