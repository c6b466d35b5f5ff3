use thiserror::Error;

/// Failures that can arise while driving a [`crate::Session`] or
/// establishing one via a [`crate::Server`]/[`crate::Client`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("codec error: {0}")]
    Wire(#[from] wire::WireError),

    #[error("cipher error: {0}")]
    Cipher(#[from] cipher_engine::CipherError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed its end of the socket (read returned zero bytes)
    /// with no further frames buffered.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The peer vanished mid-frame: the socket hit EOF while a partial,
    /// never-to-be-completed frame sat in the receive buffer.
    #[error("connection failed: peer disconnected mid-frame")]
    ConnectionFailure,

    /// A listen/connect attempt against the configured socket path failed.
    #[error("unable to connect to {path}: {source}")]
    UnableToConnect {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
