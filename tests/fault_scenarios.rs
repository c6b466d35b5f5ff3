//! End-to-end fault scenarios that can't be driven through the real `ffsock`
//! binary on both ends at once: a tampered digest reply (the peer on one
//! side has to be a misbehaving stand-in, not the real server) and a wrong
//! FFS private key (the peer on the other side has to be a misbehaving
//! stand-in client). Both stand-ins are built from the same `session` and
//! `handshake` crates the real binary uses, so the protocol mechanics are
//! identical; only the one deliberately-broken step differs.

mod common;

use std::os::unix::net::UnixStream;
use std::thread;

use bigint::BigInt;
use handshake::Channel;
use session::{Server, Session};

use ffsock::constants::{DH_GENERATOR, DH_MODULUS, FFS_MODULUS, FFS_PRIVATE_KEY, FFS_ROUNDS};

use common::{run_client, unique_socket_path, ServerProcess};

/// Scenario: inject a bit flip into the server's echoed digest. The client
/// must detect the mismatch and print `MISMATCH` rather than `OK`, and still
/// exit cleanly.
#[test]
fn tampered_digest_reply_reports_mismatch() {
    let path = unique_socket_path("tampered-digest");
    let _ = std::fs::remove_file(&path);
    let listener = Server::bind(&path).unwrap();

    let server_thread = thread::spawn(move || {
        let session = listener.accept().unwrap();
        let mut channel = Channel::new(session);
        channel.agree(&DH_GENERATOR, &DH_MODULUS, true).unwrap();
        for _ in 0..FFS_ROUNDS {
            assert!(channel
                .verify_round(&FFS_MODULUS, FFS_PRIVATE_KEY.len())
                .unwrap());
        }

        let mut msg = channel.session_mut().receive().unwrap();
        let mut digest = msg.hash_of();
        digest[0] ^= 0xFF; // tamper with one byte of the digest
        let tampered = BigInt::from_bytes(&digest);
        channel.session_mut().send_value(&tampered).unwrap();
    });

    let output = run_client(&path, "Hello World\n");
    server_thread.join().unwrap();

    assert_eq!(output.exit_code, 0, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Comparing hashes... MISMATCH"));
    assert!(!output.stdout.contains("Comparing hashes... OK"));
}

/// Scenario: the client authenticates with a private key element that
/// doesn't match the public vector it derives (`s_1 + 1` instead of `s_1`).
/// The real server must reject within its configured round count and exit
/// with a failure status after printing `FAIL`.
///
/// A round with a wrong key still has a `2^-k` chance of passing by luck;
/// over `FFS_ROUNDS` independent rounds the chance every one of them passes
/// is `2^-(k*FFS_ROUNDS)` (about one in a million at the defaults), which we
/// accept as negligible the same way the FFS soundness bound in the spec
/// does.
#[test]
fn wrong_ffs_key_fails_authentication() {
    let path = unique_socket_path("wrong-ffs-key");
    let server = ServerProcess::spawn_with_rounds(&path, Some(FFS_ROUNDS));

    let client_path = path.clone();
    let client_thread = thread::spawn(move || {
        let stream = UnixStream::connect(&client_path).unwrap();
        let mut channel = Channel::new(Session::new(stream));
        if channel.agree(&DH_GENERATOR, &DH_MODULUS, false).is_err() {
            return;
        }

        let one = BigInt::one();
        let mut wrong_key = FFS_PRIVATE_KEY.clone();
        wrong_key[0] = &wrong_key[0] - &(-one);

        for _ in 0..FFS_ROUNDS {
            if channel.authenticate_round(&FFS_MODULUS, &wrong_key).is_err() {
                // the server already closed the connection after rejecting
                // an earlier round.
                break;
            }
        }
    });

    client_thread.join().unwrap();
    let output = server.finish();

    assert_eq!(output.exit_code, 1, "stdout: {}", output.stdout);
    assert!(output.stdout.contains("FAIL"));
}
