//! The on-wire envelope for a ciphertext payload: a fresh initialization
//! vector alongside the bytes it was used to produce.

use crate::error::WireError;
use crate::message::{Message, WireDecode, WireEncode};

/// An IV and the ciphertext it was paired with. Both travel as
/// length-prefixed byte sequences, back to back, so the envelope carries no
/// assumption about either one's fixed width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedData {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    pub fn new(iv: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }
}

impl WireEncode for EncryptedData {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError> {
        msg.write_sequence(&self.iv)?;
        msg.write_sequence(&self.ciphertext)
    }
}

impl WireDecode for EncryptedData {
    fn read_from(msg: &mut Message) -> Result<Self, WireError> {
        let iv = msg.read_sequence::<u8>()?;
        let ciphertext = msg.read_sequence::<u8>()?;
        Ok(Self { iv, ciphertext })
    }
}
