use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("configuration error: {0}")] Config(String),
    #[error("backend error: {0}")] Backend(String),
    #[error("backend timed out after {0:?}")] Timeout(Duration),
    #[error("could not extract layout: {0}")] Extract(String),
}
