pub mod fallback;
pub mod gateway;
pub mod library;
pub mod llm;
pub mod profile;
pub mod prompts;
pub mod setup;
pub mod studio;
pub mod workflow;
