//! The framed [`Message`] type: an ordered byte buffer with independent
//! read/write cursors, carrying a typed value stream. See the module docs
//! in `lib.rs` for the wire format this implements.

use bigint::BigInt;
use bitvec::prelude::{BitVec, Msb0};
use byteorder::{ByteOrder, LittleEndian};

use crate::error::WireError;

/// Size in bytes of the length prefix that precedes every serialized frame.
pub const HEADER_SIZE: usize = 2;

/// The largest count a sequence's variable-length prefix can carry.
const MAX_SEQUENCE_LEN: usize = 0x3FFF;

/// Implemented by every concrete value the codec knows how to write. The
/// dispatch is static (monomorphized per `T`), matching the reference's
/// compile-time overload set without needing a runtime type tag on the wire.
pub trait WireEncode {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError>;
}

/// The read-side counterpart of [`WireEncode`].
pub trait WireDecode: Sized {
    fn read_from(msg: &mut Message) -> Result<Self, WireError>;
}

/// A length-prefixed frame payload: an ordered byte buffer plus independent
/// read and write cursors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    data: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
}

/// The result of attempting to parse a frame out of a byte buffer that may
/// not yet hold a complete frame.
pub enum ParseOutcome {
    /// A complete frame was found; `usize` is the total number of bytes
    /// (header + payload) consumed from the front of the buffer.
    Complete(Message, usize),
    /// Fewer than `header_size + L` bytes are available yet.
    Incomplete,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-received payload (no header) for reading.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let write_pos = data.len();
        Self {
            data,
            read_pos: 0,
            write_pos,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.data
    }

    pub fn total_size(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.read_pos)
    }

    fn read_exact(&mut self, n: usize) -> Result<&[u8], WireError> {
        if self.remaining() < n {
            return Err(WireError::NotEnoughData);
        }
        let slice = &self.data[self.read_pos..self.read_pos + n];
        self.read_pos += n;
        Ok(slice)
    }

    fn write_exact(&mut self, bytes: &[u8]) {
        let end = self.write_pos + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.write_pos..end].copy_from_slice(bytes);
        self.write_pos = end;
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_exact(&[value]);
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(LittleEndian::read_u16(self.read_exact(2)?))
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.write_exact(&buf);
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(LittleEndian::read_u32(self.read_exact(4)?))
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.write_exact(&buf);
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(LittleEndian::read_u64(self.read_exact(8)?))
    }

    pub fn write_u64(&mut self, value: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, value);
        self.write_exact(&buf);
    }

    /// Variable-length count prefix followed by `n` elements, each encoded
    /// by its own [`WireEncode`] impl.
    pub fn write_sequence<T: WireEncode>(&mut self, items: &[T]) -> Result<(), WireError> {
        let count = items.len();
        if count <= 0x7F {
            self.write_u8(count as u8);
        } else if count <= MAX_SEQUENCE_LEN {
            self.write_u8(0x80 | ((count >> 8) & 0x3F) as u8);
            self.write_u8((count & 0xFF) as u8);
        } else {
            return Err(WireError::SequenceTooLong);
        }

        for item in items {
            item.write_to(self)?;
        }
        Ok(())
    }

    pub fn read_sequence<T: WireDecode>(&mut self) -> Result<Vec<T>, WireError> {
        let first = self.read_u8()?;
        let count = if first & 0x80 == 0 {
            (first & 0x7F) as usize
        } else if first & 0xC0 == 0x80 {
            let second = self.read_u8()?;
            (((first & 0x3F) as usize) << 8) | second as usize
        } else {
            return Err(WireError::SequenceTooLong);
        };

        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            result.push(T::read_from(self)?);
        }
        Ok(result)
    }

    /// Raw bytes followed by a terminating NUL; no length prefix.
    pub fn write_string(&mut self, s: &str) {
        for byte in s.as_bytes() {
            self.write_u8(*byte);
        }
        self.write_u8(0);
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        let mut bytes = Vec::new();
        loop {
            match self.read_u8()? {
                0 => break,
                b => bytes.push(b),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Bitset, most-significant bit first, carried as the ASCII `'0'`/`'1'`
    /// string of its bits through the string codec.
    pub fn write_bitset(&mut self, bits: &BitVec<u8, Msb0>) {
        let as_string: String = bits.iter().map(|b| if *b { '1' } else { '0' }).collect();
        self.write_string(&as_string);
    }

    pub fn read_bitset(&mut self) -> Result<BitVec<u8, Msb0>, WireError> {
        let as_string = self.read_string()?;
        let mut bits = BitVec::<u8, Msb0>::with_capacity(as_string.len());
        for c in as_string.chars() {
            bits.push(c == '1');
        }
        Ok(bits)
    }

    /// Signed byte (the value's sign, in `{-1, 0, 1}`) followed by a
    /// length-prefixed byte sequence of the magnitude.
    pub fn write_bigint(&mut self, value: &BigInt) -> Result<(), WireError> {
        self.write_u8(value.sign() as i8 as u8);
        self.write_sequence(&value.raw_bytes())
    }

    pub fn read_bigint(&mut self) -> Result<BigInt, WireError> {
        let sign = self.read_u8()? as i8;
        let magnitude = BigInt::from_bytes(&self.read_sequence::<u8>()?);
        Ok(match sign {
            s if s < 0 => -magnitude,
            s if s > 0 => magnitude,
            _ => BigInt::zero(),
        })
    }

    /// SHA-256 of this message's full serialized frame (header included),
    /// so that both peers hash over exactly the same bytes.
    pub fn hash_of(&self) -> [u8; crate::hash::DIGEST_SIZE] {
        crate::hash::sha256(&self.serialize())
    }

    /// Prepends the 16-bit little-endian payload length.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.data.len());
        out.extend_from_slice(&(self.data.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Looks for a complete frame at the front of `buffer`. Returns
    /// [`ParseOutcome::Incomplete`] — not an error — when fewer than
    /// `HEADER_SIZE + L` bytes are present.
    pub fn parse(buffer: &[u8]) -> ParseOutcome {
        if buffer.len() < HEADER_SIZE {
            return ParseOutcome::Incomplete;
        }
        let payload_len = LittleEndian::read_u16(&buffer[..HEADER_SIZE]) as usize;
        if buffer.len() < HEADER_SIZE + payload_len {
            return ParseOutcome::Incomplete;
        }
        let payload = buffer[HEADER_SIZE..HEADER_SIZE + payload_len].to_vec();
        ParseOutcome::Complete(Message::from_bytes(payload), HEADER_SIZE + payload_len)
    }
}

impl WireEncode for u8 {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError> {
        msg.write_u8(*self);
        Ok(())
    }
}

impl WireDecode for u8 {
    fn read_from(msg: &mut Message) -> Result<Self, WireError> {
        msg.read_u8()
    }
}

impl WireEncode for BigInt {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError> {
        msg.write_bigint(self)
    }
}

impl WireDecode for BigInt {
    fn read_from(msg: &mut Message) -> Result<Self, WireError> {
        msg.read_bigint()
    }
}

/// A length-prefixed sequence of any element type the codec already knows,
/// e.g. the FFS public vector (`Vec<BigInt>`).
impl<T: WireEncode> WireEncode for Vec<T> {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError> {
        msg.write_sequence(self)
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn read_from(msg: &mut Message) -> Result<Self, WireError> {
        msg.read_sequence()
    }
}

impl WireEncode for BitVec<u8, Msb0> {
    fn write_to(&self, msg: &mut Message) -> Result<(), WireError> {
        msg.write_bitset(self);
        Ok(())
    }
}

impl WireDecode for BitVec<u8, Msb0> {
    fn read_from(msg: &mut Message) -> Result<Self, WireError> {
        msg.read_bitset()
    }
}
