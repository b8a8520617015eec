pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod relay;
pub mod wire;
