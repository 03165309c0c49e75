use thiserror::Error;

/// Errors surfaced by the ledger store and the domain services built on it.
///
/// Ledger-write errors abort the operation and are reported to the caller
/// synchronously. Notification failures are a different animal and never
/// appear here; see [`DeliveryError`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input, rejected before any write
    #[error("{0}")]
    Validation(String),

    /// An id or roll number that does not resolve to a record
    #[error("{0} not found")]
    NotFound(String),

    /// Roll-number collision on student creation
    #[error("{0} already exists")]
    DuplicateKey(String),

    /// Underlying persistence failure; propagated, never retried
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// Document rendering failure (CSV or PDF assembly)
    #[error("document generation failed: {0}")]
    Document(String),
}

/// A notification channel failure. Confined to the `notify` module: the
/// dispatcher downgrades every instance to a logged warning and callers of
/// the dispatcher never see it.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("sms gateway error: {0}")]
    Sms(String),

    #[error("smtp error: {0}")]
    Email(String),
}
