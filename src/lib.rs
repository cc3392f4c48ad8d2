// Public API for integration tests and the binary

pub mod config;
pub mod handlers;
pub mod protocol;
pub mod sheets;
pub mod state;
pub mod tasks;
pub mod telegram;
pub mod texts;
pub mod types;
