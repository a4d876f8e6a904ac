pub mod chat_repo;
pub mod user_repo;
pub mod writing_repo;
