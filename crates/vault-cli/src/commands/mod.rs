//! Command handlers

pub mod collections;
pub mod config;
pub mod documents;

use vault_core::ApiError;

/// Attach the recovery hint of an API error, if it has one
pub(crate) fn with_hint(error: ApiError) -> anyhow::Error {
    match error.recovery_suggestion() {
        Some(hint) => anyhow::anyhow!("{}\n  hint: {}", error, hint),
        None => anyhow::Error::new(error),
    }
}
