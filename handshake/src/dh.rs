//! Ephemeral Diffie-Hellman key agreement: each side sends its public value,
//! receives the peer's, and derives a shared AES-256 key from the result.

use std::io::{Read, Write};

use bigint::BigInt;
use cipher_engine::CipherEngine;
use session::Session;

use crate::error::HandshakeError;

/// Runs one round of DH agreement over `session` and installs the derived
/// cipher on it. `sends_first` breaks the symmetry so two blocking peers
/// don't both wait on `receive` at once; the reference has the server send
/// first and the client reciprocate, but either order produces the same
/// shared secret as long as both sides agree on it.
pub fn agree<S: Read + Write>(
    session: &mut Session<S>,
    generator: &BigInt,
    modulus: &BigInt,
    sends_first: bool,
) -> Result<CipherEngine, HandshakeError> {
    let exponent_bits = modulus.bit_length().saturating_sub(1);
    let secret = BigInt::random(exponent_bits);
    let public = generator.raise_mod(&secret, modulus)?;

    let peer_public = if sends_first {
        session.send_value(&public)?;
        session.receive_value::<BigInt>()?
    } else {
        let peer_public = session.receive_value::<BigInt>()?;
        session.send_value(&public)?;
        peer_public
    };

    let shared_secret = peer_public.raise_mod(&secret, modulus)?;
    let key = wire::sha256(&shared_secret.raw_bytes());
    log::debug!("diffie-hellman agreement complete, installing session cipher");
    Ok(CipherEngine::new(&key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;
    use std::thread;

    #[test]
    fn both_sides_derive_the_same_key() {
        let generator = BigInt::from_decimal("2").unwrap();
        let modulus = BigInt::from_decimal("2357").unwrap();

        // Run each side's math directly (bypassing the socket) to check the
        // DH identity the protocol relies on: (g^a)^b = (g^b)^a mod p.
        let secret_a = BigInt::from_decimal("31").unwrap();
        let secret_b = BigInt::from_decimal("47").unwrap();

        let public_a = generator.raise_mod(&secret_a, &modulus).unwrap();
        let public_b = generator.raise_mod(&secret_b, &modulus).unwrap();

        let shared_from_a = public_b.raise_mod(&secret_a, &modulus).unwrap();
        let shared_from_b = public_a.raise_mod(&secret_b, &modulus).unwrap();

        assert_eq!(shared_from_a.raw_bytes(), shared_from_b.raw_bytes());
    }

    #[test]
    fn agree_over_a_real_socket_yields_interoperable_ciphers() {
        let generator = BigInt::from_decimal("2").unwrap();
        let modulus = BigInt::from_decimal("2357").unwrap();
        let (server_stream, client_stream) = UnixStream::pair().unwrap();

        let server_thread = thread::spawn(move || {
            let mut session = Session::new(server_stream);
            agree(&mut session, &generator, &modulus, true).unwrap()
        });

        let generator = BigInt::from_decimal("2").unwrap();
        let modulus = BigInt::from_decimal("2357").unwrap();
        let mut client_session = Session::new(client_stream);
        let client_cipher = agree(&mut client_session, &generator, &modulus, false).unwrap();
        let server_cipher = server_thread.join().unwrap();

        let (iv, ciphertext) = server_cipher.encrypt(b"shared secret established");
        assert_eq!(
            client_cipher.decrypt(&iv, &ciphertext).unwrap(),
            b"shared secret established"
        );
    }
}
