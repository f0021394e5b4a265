//! Code generation agent.
//!
//! Classifies a natural-language coding request as simple, complex or
//! ambiguous, then answers it by orchestrating chat-completion calls:
//! one call for simple requests, a feedback call for ambiguous ones, and
//! an interpret / two-branch generate+enhance / select / review pipeline
//! for complex ones.

pub mod agent;
pub mod config;
pub mod llm;
pub mod server;

pub use agent::CodeAgent;
pub use config::AgentConfig;
pub use server::{create_router, AppState, Server};
