//! Arbitrary-precision signed integer facade used throughout the protocol
//! core. Wraps [`num_bigint::BigInt`], which already stores a sign and a
//! normalized (no leading-zero-byte) magnitude, so the invariants the
//! protocol needs come for free from the underlying crate.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg, Rem, Sub};

use num_bigint::{BigInt as Inner, Sign};
use num_traits::{One, Signed, Zero};
use rand::RngCore;
use thiserror::Error;

/// Failure modes for parsing a [`BigInt`] from a textual representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBigIntError {
    #[error("'{0}' is not a valid decimal integer")]
    Decimal(String),
    #[error("'{0}' is not a valid hexadecimal integer")]
    Hex(String),
}

/// Failure modes for the modular operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BigIntError {
    #[error("modulus must be strictly positive")]
    NonPositiveModulus,
    #[error("value has no inverse modulo the given modulus")]
    NotInvertible,
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BigInt(Inner);

impl BigInt {
    pub fn zero() -> Self {
        Self(Inner::zero())
    }

    pub fn one() -> Self {
        Self(Inner::one())
    }

    /// Imports a big-endian unsigned byte buffer. An empty slice is zero.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Inner::from_bytes_be(Sign::Plus, bytes))
    }

    pub fn from_decimal(s: &str) -> Result<Self, ParseBigIntError> {
        let (negative, digits) = strip_sign(s);
        Inner::parse_bytes(digits.as_bytes(), 10)
            .map(|magnitude| Self(if negative { -magnitude } else { magnitude }))
            .ok_or_else(|| ParseBigIntError::Decimal(s.to_string()))
    }

    pub fn from_hex(s: &str) -> Result<Self, ParseBigIntError> {
        let (negative, rest) = strip_sign(s);
        let digits = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest);
        Inner::parse_bytes(digits.as_bytes(), 16)
            .map(|magnitude| Self(if negative { -magnitude } else { magnitude }))
            .ok_or_else(|| ParseBigIntError::Hex(s.to_string()))
    }

    /// Uniformly random non-negative integer with the top bit set, bit
    /// length exactly `num_bits`, and the bottom bit set (odd), as drawn
    /// from a cryptographic RNG.
    pub fn random(num_bits: u64) -> Self {
        let num_bits = num_bits.max(1);
        let num_bytes = ((num_bits + 7) / 8) as usize;
        let mut bytes = vec![0u8; num_bytes];
        rand::rngs::OsRng.fill_bytes(&mut bytes);

        let excess_bits = (num_bytes as u64 * 8) - num_bits;
        if excess_bits > 0 {
            bytes[0] &= 0xFFu8 >> excess_bits;
        }
        bytes[0] |= 1u8 << (7 - excess_bits);
        let last = bytes.len() - 1;
        bytes[last] |= 1;

        Self(Inner::from_bytes_be(Sign::Plus, &bytes))
    }

    pub fn bit_length(&self) -> u64 {
        self.0.bits()
    }

    pub fn sign(&self) -> i8 {
        match self.0.sign() {
            Sign::Minus => -1,
            Sign::NoSign => 0,
            Sign::Plus => 1,
        }
    }

    /// Big-endian minimal-length unsigned byte export of the magnitude.
    /// Zero exports as a single zero byte.
    pub fn raw_bytes(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return vec![0];
        }
        self.0.to_bytes_be().1
    }

    pub fn raise_mod(&self, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt, BigIntError> {
        if !modulus.0.is_positive() {
            return Err(BigIntError::NonPositiveModulus);
        }
        Ok(Self(self.0.modpow(&exponent.0, &modulus.0)))
    }

    /// Multiplicative inverse modulo `modulus`, via the extended Euclidean
    /// algorithm. Fails when `gcd(self, modulus) != 1`.
    pub fn invert_mod(&self, modulus: &BigInt) -> Result<BigInt, BigIntError> {
        if !modulus.0.is_positive() {
            return Err(BigIntError::NonPositiveModulus);
        }

        let (gcd, x, _y) = extended_gcd(&self.0, &modulus.0);
        if gcd.abs() != Inner::one() {
            return Err(BigIntError::NotInvertible);
        }

        let result = ((x % &modulus.0) + &modulus.0) % &modulus.0;
        Ok(Self(result))
    }
}

impl<'a> Neg for &'a BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        BigInt(-&self.0)
    }
}

impl Neg for BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        BigInt(-self.0)
    }
}

impl<'a, 'b> Sub<&'b BigInt> for &'a BigInt {
    type Output = BigInt;
    fn sub(self, rhs: &'b BigInt) -> BigInt {
        BigInt(&self.0 - &rhs.0)
    }
}

impl<'a, 'b> Mul<&'b BigInt> for &'a BigInt {
    type Output = BigInt;
    fn mul(self, rhs: &'b BigInt) -> BigInt {
        BigInt(&self.0 * &rhs.0)
    }
}

impl<'a, 'b> Rem<&'b BigInt> for &'a BigInt {
    type Output = BigInt;
    fn rem(self, rhs: &'b BigInt) -> BigInt {
        BigInt(&self.0 % &rhs.0)
    }
}

impl<'b> Sub<&'b BigInt> for BigInt {
    type Output = BigInt;
    fn sub(self, rhs: &'b BigInt) -> BigInt {
        &self - rhs
    }
}

impl<'b> Mul<&'b BigInt> for BigInt {
    type Output = BigInt;
    fn mul(self, rhs: &'b BigInt) -> BigInt {
        &self * rhs
    }
}

impl<'b> Rem<&'b BigInt> for BigInt {
    type Output = BigInt;
    fn rem(self, rhs: &'b BigInt) -> BigInt {
        &self % rhs
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({})", self.0)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn strip_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    }
}

// gcd(a, b) = a*x + b*y, returned as (gcd, x, y).
fn extended_gcd(a: &Inner, b: &Inner) -> (Inner, Inner, Inner) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (Inner::one(), Inner::zero());
    let (mut old_t, mut t) = (Inner::zero(), Inner::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let new_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, new_r);

        let new_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, new_s);

        let new_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, new_t);
    }

    (old_r, old_s, old_t)
}
