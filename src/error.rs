use thiserror::Error;

/// Error kinds for the trust subsystem.
///
/// None of these are fatal to the host process: fetch errors degrade to an
/// empty (fail-closed) pattern set, and response errors drive the gateway's
/// retry loop before converting to a fail-closed `false`.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("config fetch failed: {0}")]
    ConfigFetch(String),

    #[error("trust list fetch failed: {0}")]
    ListFetch(String),

    #[error("invalid query response: {0}")]
    InvalidResponse(String),
}

pub type GuardResult<T> = Result<T, GuardError>;
