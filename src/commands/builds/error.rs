//! Error types for build commands.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildsError {
    #[error("Invalid JSON for inputs: {0}")]
    InvalidInputs(String),

    #[error("Workflow run {id} finished with conclusion: {conclusion}")]
    RunNotSuccessful { id: u64, conclusion: String },
}

pub type Result<T> = anyhow::Result<T>;
