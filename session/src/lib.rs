//! A blocking, single-connection transport session.
//!
//! [`Session`] owns a byte stream (in practice a [`std::os::unix::net::UnixStream`],
//! but anything implementing [`Read`] + [`Write`] works, which keeps the unit
//! tests free of real sockets) plus a receive buffer, a queue of frames
//! already parsed out of it, and an optional [`cipher_engine::CipherEngine`]
//! that — once installed — transparently wraps every outgoing frame and
//! unwraps every incoming one. There is no async runtime here: each call
//! blocks the calling thread, matching the protocol's single connection,
//! single in-flight request model.

pub mod error;
pub mod peer;

use std::collections::VecDeque;
use std::io::{Read, Write};

use cipher_engine::CipherEngine;
use wire::{EncryptedData, Message, ParseOutcome, WireDecode, WireEncode};

pub use error::SessionError;
pub use peer::{Client, Server};

/// How many bytes to request from the underlying stream per `read` call.
const READ_CHUNK: usize = 4096;

pub struct Session<S> {
    stream: S,
    recv_buffer: Vec<u8>,
    queue: VecDeque<Message>,
    cipher: Option<CipherEngine>,
}

impl<S> Session<S>
where
    S: Read + Write,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            recv_buffer: Vec::new(),
            queue: VecDeque::new(),
            cipher: None,
        }
    }

    /// Installs the session's cipher. Called once the handshake has
    /// produced a shared key; every [`Session::send`]/[`Session::receive`]
    /// after this point is transparently encrypted.
    pub fn set_cipher(&mut self, cipher: CipherEngine) {
        self.cipher = Some(cipher);
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Encodes `value` into a fresh [`Message`] and sends it as a frame.
    pub fn send_value<T: WireEncode>(&mut self, value: &T) -> Result<(), SessionError> {
        let mut msg = Message::new();
        value.write_to(&mut msg)?;
        self.send(&msg)
    }

    /// Sends a pre-built [`Message`]. If a cipher is installed, the
    /// message's raw bytes are encrypted first and the actual frame on the
    /// wire carries an [`EncryptedData`] envelope instead.
    pub fn send(&mut self, msg: &Message) -> Result<(), SessionError> {
        let frame = match &self.cipher {
            None => msg.serialize(),
            Some(cipher) => {
                let (iv, ciphertext) = cipher.encrypt(msg.content());
                let envelope = EncryptedData::new(iv, ciphertext);
                let mut wrapper = Message::new();
                envelope.write_to(&mut wrapper)?;
                wrapper.serialize()
            }
        };
        self.stream.write_all(&frame)?;
        Ok(())
    }

    /// Blocks until a full frame is available, decrypting it if a cipher is
    /// installed, and returns it as a [`Message`] ready for field-by-field
    /// decoding.
    pub fn receive(&mut self) -> Result<Message, SessionError> {
        loop {
            if let Some(msg) = self.queue.pop_front() {
                return self.unwrap_if_encrypted(msg);
            }
            self.fill_queue()?;
        }
    }

    /// Convenience wrapper over [`Session::receive`] for a single typed
    /// value.
    pub fn receive_value<T: WireDecode>(&mut self) -> Result<T, SessionError> {
        let mut msg = self.receive()?;
        Ok(T::read_from(&mut msg)?)
    }

    fn unwrap_if_encrypted(&self, mut msg: Message) -> Result<Message, SessionError> {
        match &self.cipher {
            None => Ok(msg),
            Some(cipher) => {
                let envelope = EncryptedData::read_from(&mut msg)?;
                let plaintext = cipher.decrypt(&envelope.iv, &envelope.ciphertext)?;
                Ok(Message::from_bytes(plaintext))
            }
        }
    }

    /// Parses as many complete frames as currently sit in `recv_buffer`,
    /// then blocks for more bytes if none were found.
    fn fill_queue(&mut self) -> Result<(), SessionError> {
        let mut consumed_any = false;
        loop {
            match Message::parse(&self.recv_buffer) {
                ParseOutcome::Complete(msg, consumed) => {
                    self.recv_buffer.drain(..consumed);
                    self.queue.push_back(msg);
                    consumed_any = true;
                }
                ParseOutcome::Incomplete => break,
            }
        }
        if consumed_any {
            return Ok(());
        }

        let mut chunk = [0u8; READ_CHUNK];
        let n = self.stream.read(&mut chunk)?;
        if n == 0 {
            return Err(if self.recv_buffer.is_empty() {
                SessionError::ConnectionClosed
            } else {
                // A partial frame is sitting in the buffer with no way to
                // complete it: this is not a clean close.
                SessionError::ConnectionFailure
            });
        }
        self.recv_buffer.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}
