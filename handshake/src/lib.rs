//! Ties the Diffie-Hellman and Feige-Fiat-Shamir protocol steps to a
//! [`session::Session`] and tracks where in the handshake a connection
//! currently is.

pub mod dh;
pub mod error;
pub mod ffs;

use std::io::{Read, Write};

use bigint::BigInt;
use session::Session;

pub use error::HandshakeError;

/// Where a session sits in the protocol's lifecycle. `Channel` advances
/// through these in order; any handshake or I/O failure moves it straight
/// to `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    KeyAgreed,
    Authenticated,
    Open,
    Closed,
    Failed,
}

/// A session plus its position in the handshake state machine. Wraps the
/// DH and FFS steps so a caller drives one state transition at a time
/// instead of threading the raw [`Session`] through free functions.
pub struct Channel<S> {
    session: Session<S>,
    state: SessionState,
}

impl<S> Channel<S>
where
    S: Read + Write,
{
    pub fn new(session: Session<S>) -> Self {
        Self {
            session,
            state: SessionState::Connected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs DH agreement and installs the resulting cipher on the
    /// underlying session. `sends_first` should be `true` for the peer that
    /// accepted the connection and `false` for the peer that initiated it.
    pub fn agree(&mut self, generator: &BigInt, modulus: &BigInt, sends_first: bool) -> Result<(), HandshakeError> {
        let cipher = dh::agree(&mut self.session, generator, modulus, sends_first)?;
        self.session.set_cipher(cipher);
        self.state = SessionState::KeyAgreed;
        log::info!("session key agreed");
        Ok(())
    }

    /// Runs the client/prover side of FFS authentication for `rounds`
    /// rounds in one call.
    pub fn authenticate(&mut self, modulus: &BigInt, private_key: &[BigInt], rounds: u32) -> Result<(), HandshakeError> {
        ffs::authenticate(&mut self.session, modulus, private_key, rounds)?;
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Runs a single round as the prover. Callers that want to report
    /// progress per round (as the reference CLI does) should use this
    /// instead of [`Channel::authenticate`].
    pub fn authenticate_round(&mut self, modulus: &BigInt, private_key: &[BigInt]) -> Result<(), HandshakeError> {
        ffs::authenticate_round(&mut self.session, modulus, private_key)
    }

    /// Runs the server/verifier side of FFS authentication for `rounds`
    /// rounds in one call. On rejection, the channel moves to `Failed` and
    /// `Ok(false)` is returned; the caller decides how to report that to
    /// the operator.
    pub fn verify(&mut self, modulus: &BigInt, key_element_count: usize, rounds: u32) -> Result<bool, HandshakeError> {
        let accepted = ffs::verify(&mut self.session, modulus, key_element_count, rounds)?;
        self.state = if accepted {
            SessionState::Authenticated
        } else {
            SessionState::Failed
        };
        Ok(accepted)
    }

    /// Runs a single round as the verifier. On rejection the channel moves
    /// to `Failed`.
    pub fn verify_round(&mut self, modulus: &BigInt, key_element_count: usize) -> Result<bool, HandshakeError> {
        let accepted = ffs::verify_round(&mut self.session, modulus, key_element_count)?;
        if !accepted {
            self.state = SessionState::Failed;
        }
        Ok(accepted)
    }

    /// Marks the channel authenticated. Called once all FFS rounds have
    /// accepted.
    pub fn mark_authenticated(&mut self) {
        self.state = SessionState::Authenticated;
    }

    /// Marks the channel as ready for application traffic. Called once
    /// authentication has succeeded.
    pub fn mark_open(&mut self) {
        self.state = SessionState::Open;
    }

    pub fn mark_closed(&mut self) {
        self.state = SessionState::Closed;
    }

    pub fn mark_failed(&mut self) {
        self.state = SessionState::Failed;
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }
}
