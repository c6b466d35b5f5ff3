//! Feige-Fiat-Shamir zero-knowledge identification. [`authenticate`] is the
//! prover side (the client proves knowledge of its private key); [`verify`]
//! is the verifier side (the server checks the proof without learning the
//! key). Both run `rounds` independent rounds; each round's false-accept
//! probability is `2^-k` where `k` is the private key's element count.

use std::io::{Read, Write};

use bigint::BigInt;
use bitvec::prelude::{BitVec, Msb0};
use rand::RngCore;
use session::Session;

use crate::error::HandshakeError;

fn random_sign() -> bool {
    rand::rngs::OsRng.next_u32() & 1 == 1
}

fn with_random_sign(value: BigInt) -> BigInt {
    if random_sign() {
        -value
    } else {
        value
    }
}

fn random_challenge(k: usize) -> BitVec<u8, Msb0> {
    let mut bits = BitVec::with_capacity(k);
    for _ in 0..k {
        let mut byte = [0u8; 1];
        rand::rngs::OsRng.fill_bytes(&mut byte);
        bits.push(byte[0] & 1 == 1);
    }
    bits
}

fn square_mod(value: &BigInt, modulus: &BigInt) -> BigInt {
    (value * value) % modulus
}

/// `v_i = (s_i^2)^-1 mod N`, signed with a throwaway random sign bit: the
/// sign carries no information (verification accepts either representative)
/// but must round-trip faithfully through the signed BigInt codec.
fn public_vector(private_key: &[BigInt], modulus: &BigInt) -> Result<Vec<BigInt>, HandshakeError> {
    private_key
        .iter()
        .map(|s_i| {
            let inverse = square_mod(s_i, modulus).invert_mod(modulus)?;
            Ok(with_random_sign(inverse))
        })
        .collect()
}

fn product_over_challenge(factors: &[BigInt], challenge: &BitVec<u8, Msb0>, modulus: &BigInt) -> BigInt {
    let mut product = BigInt::one();
    for (factor, bit) in factors.iter().zip(challenge.iter()) {
        if *bit {
            product = (&product * factor) % modulus;
        }
    }
    product
}

/// Runs one round as the prover, sending the public vector, a witness, and
/// (after receiving the verifier's challenge) the response.
pub fn authenticate_round<S: Read + Write>(
    session: &mut Session<S>,
    modulus: &BigInt,
    private_key: &[BigInt],
) -> Result<(), HandshakeError> {
    let v = public_vector(private_key, modulus)?;
    session.send_value(&v)?;

    let exponent_bits = modulus.bit_length().saturating_sub(1);
    let r = BigInt::random(exponent_bits);
    let x = with_random_sign(square_mod(&r, modulus));
    session.send_value(&x)?;

    let challenge: BitVec<u8, Msb0> = session.receive_value()?;

    let s_product = product_over_challenge(private_key, &challenge, modulus);
    let y = (&r * &s_product) % modulus;
    session.send_value(&y)?;

    Ok(())
}

/// Runs all `rounds` rounds as the prover. Fails only on transport/codec
/// errors; a failed round is purely the verifier's concern.
pub fn authenticate<S: Read + Write>(
    session: &mut Session<S>,
    modulus: &BigInt,
    private_key: &[BigInt],
    rounds: u32,
) -> Result<(), HandshakeError> {
    for round in 0..rounds {
        log::debug!("ffs authentication round {}/{}", round + 1, rounds);
        authenticate_round(session, modulus, private_key)?;
    }
    Ok(())
}

/// Runs one round as the verifier. Returns `Ok(false)` (not an error) when
/// the round fails to check out — that is a normal protocol outcome, not a
/// transport fault.
pub fn verify_round<S: Read + Write>(
    session: &mut Session<S>,
    modulus: &BigInt,
    key_element_count: usize,
) -> Result<bool, HandshakeError> {
    let v: Vec<BigInt> = session.receive_value()?;
    if v.len() != key_element_count {
        return Ok(false);
    }
    let x: BigInt = session.receive_value()?;

    let challenge = random_challenge(key_element_count);
    session.send_value(&challenge)?;

    let y: BigInt = session.receive_value()?;

    let v_product = product_over_challenge(&v, &challenge, modulus);
    let y_squared = square_mod(&y, modulus);
    let z = (&y_squared * &v_product) % modulus;

    Ok(x != BigInt::zero() && (z == x || z == -&x))
}

/// Runs all `rounds` rounds as the verifier, short-circuiting on the first
/// failed round. `Ok(true)` means every round accepted.
pub fn verify<S: Read + Write>(
    session: &mut Session<S>,
    modulus: &BigInt,
    key_element_count: usize,
    rounds: u32,
) -> Result<bool, HandshakeError> {
    for round in 0..rounds {
        log::debug!("ffs verification round {}/{}", round + 1, rounds);
        if !verify_round(session, modulus, key_element_count)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;
    use std::thread;

    // A small FFS instance: N = 3127 = 53 * 59 (53 ≡ 1 mod 4 doesn't hold,
    // but soundness only needs s_i coprime to N for this exercise of the
    // round mechanics; production parameters use the large reference N).
    fn small_modulus() -> BigInt {
        BigInt::from_decimal("3127").unwrap()
    }

    fn small_private_key() -> Vec<BigInt> {
        vec![
            BigInt::from_decimal("5").unwrap(),
            BigInt::from_decimal("7").unwrap(),
            BigInt::from_decimal("11").unwrap(),
        ]
    }

    #[test]
    fn correct_key_passes_every_round() {
        let modulus = small_modulus();
        let private_key = small_private_key();
        let k = private_key.len();
        let (server_stream, client_stream) = UnixStream::pair().unwrap();

        let modulus_for_client = modulus.clone();
        let client_thread = thread::spawn(move || {
            let mut session = Session::new(client_stream);
            authenticate(&mut session, &modulus_for_client, &private_key, 8).unwrap();
        });

        let mut server_session = Session::new(server_stream);
        let accepted = verify(&mut server_session, &modulus, k, 8).unwrap();

        client_thread.join().unwrap();
        assert!(accepted);
    }

    #[test]
    fn wrong_key_fails_within_a_handful_of_rounds() {
        let modulus = small_modulus();
        let mut wrong_key = small_private_key();
        wrong_key[0] = BigInt::from_decimal("6").unwrap();
        let k = wrong_key.len();
        let (server_stream, client_stream) = UnixStream::pair().unwrap();

        let modulus_for_client = modulus.clone();
        let client_thread = thread::spawn(move || {
            let mut session = Session::new(client_stream);
            // an 8-round authenticate against a wrong key still completes
            // (the prover doesn't know it's wrong); only the verifier can
            // detect the mismatch.
            let _ = authenticate(&mut session, &modulus_for_client, &wrong_key, 8);
        });

        let mut server_session = Session::new(server_stream);
        let accepted = verify(&mut server_session, &modulus, k, 8).unwrap();

        client_thread.join().unwrap();
        assert!(!accepted);
    }
}
