pub mod dispatch;
pub mod prompts;
pub mod rules;
pub mod scoring;
