use thiserror::Error;

/// Failures from running the handshake or authentication protocol over a
/// session. Verification *rejection* (the prover didn't know the private
/// key) is not an error here — see [`crate::ffs::verify`] — only the
/// mechanics of getting the rounds exchanged can fail this way.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("big integer error: {0}")]
    BigInt(#[from] bigint::BigIntError),

    #[error("cipher error: {0}")]
    Cipher(#[from] cipher_engine::CipherError),
}
