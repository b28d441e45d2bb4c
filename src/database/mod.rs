pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::{
    AnswerRepository, PgAnswerRepository, PgQuestionRepository, PgUserRepository,
    QuestionRepository, Repositories, UserRepository,
};
