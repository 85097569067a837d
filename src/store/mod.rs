//! 题库存储层
//!
//! SQLite（r2d2 连接池）上的两张表：`categories` 与 `questions`。
//! 存储层不做任何缓存，每次调用都重新读取当前状态。

pub mod category_repo;
pub mod database;
pub mod error;
pub mod question_repo;
pub mod seed;

pub use category_repo::{Category, CategoryMap, TriviaCategoryRepo};
pub use database::{TriviaDatabase, TriviaPooledConnection};
pub use error::{StoreError, StoreResult};
pub use question_repo::{CreateQuestionParams, Question, TriviaQuestionRepo};
pub use seed::{seed_if_empty, SeedResult};
