//! 处理器共享状态
//!
//! 只持有连接池与服务句柄，没有跨请求的可变状态。

use std::sync::Arc;

use crate::quiz_service::QuizService;
use crate::store::TriviaDatabase;

pub struct ApiState {
    pub db: Arc<TriviaDatabase>,
    pub quiz: QuizService,
}

impl ApiState {
    pub fn new(db: Arc<TriviaDatabase>) -> Self {
        let quiz = QuizService::new(db.clone());
        Self { db, quiz }
    }
}
