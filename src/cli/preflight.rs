//! Pre-flight checks before expensive operations.
//!
//! Validates that required API keys are present before starting
//! operations that would otherwise fail midway.

use crate::config::{Settings, VectorIndexProvider};
use crate::error::{Result, SvarError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking questions requires embedding and generation credentials.
    Ask,
    /// Serving requires the same credentials as asking.
    Serve,
    /// Index administration needs only the vector backend.
    Index,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Serve => {
            check_env_key("OPENAI_API_KEY", "sk-...")?;
            check_pinecone_key(settings)?;
        }
        Operation::Index => {
            check_pinecone_key(settings)?;
        }
    }
    Ok(())
}

/// Check that an environment variable holds a non-empty value.
fn check_env_key(name: &str, example: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SvarError::Config(format!(
            "{} is empty. Set it with: export {}='{}'",
            name, name, example
        ))),
        Err(_) => Err(SvarError::Config(format!(
            "{} not set. Set it with: export {}='{}'",
            name, name, example
        ))),
    }
}

/// The Pinecone key is only required when that backend is selected.
fn check_pinecone_key(settings: &Settings) -> Result<()> {
    match settings.vector_index.provider {
        VectorIndexProvider::Memory => Ok(()),
        VectorIndexProvider::Pinecone => {
            check_env_key(&settings.vector_index.api_key_env, "pcsk-...")
        }
    }
}
