use thiserror::Error;

/// Codec-level failures. Both are fatal to the [`crate::Message`] being
/// processed; the transport layer above decides how to treat the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("not enough data in stream buffer")]
    NotEnoughData,
    #[error("sequence is too long")]
    SequenceTooLong,
}
