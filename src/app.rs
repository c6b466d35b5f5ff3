//! The `-s`/`-c` protocol drivers: establish the secured channel, run FFS
//! authentication, and exchange application messages, printing the
//! human-readable progress lines the operator watches.

use std::env;
use std::io::{self, BufRead};

use handshake::Channel;
use session::{Client, Server, SessionError};
use wire::{to_hex, Message, WireDecode};

use crate::constants::{DH_GENERATOR, DH_MODULUS, FFS_MODULUS, FFS_PRIVATE_KEY, FFS_ROUNDS};

const DEFAULT_SOCKET_PATH: &str = "/tmp/ffsock.socket";

fn socket_path() -> String {
    env::var("FFSOCK_SOCKET_PATH").unwrap_or_else(|_| DEFAULT_SOCKET_PATH.to_string())
}

fn rounds() -> u32 {
    env::var("FFSOCK_ROUNDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(FFS_ROUNDS)
}

pub fn server() -> bool {
    let path = socket_path();
    let listener = match Server::bind(&path) {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("=== Unable to start server: {err}");
            return false;
        }
    };

    println!("=== Starting server and waiting for client...");
    let session = match listener.accept() {
        Ok(session) => session,
        Err(err) => {
            eprintln!("=== Failed to accept connection: {err}");
            return false;
        }
    };
    let mut channel = Channel::new(session);

    println!("=== Starting Diffie-Hellman key exchange...");
    if let Err(err) = channel.agree(&DH_GENERATOR, &DH_MODULUS, true) {
        eprintln!("=== Key exchange failed: {err}");
        return false;
    }
    println!("=== Diffie-Hellman key exchange completed. All communication is now encrypted with AES-256-CBC.");

    for _ in 0..rounds() {
        print!("=== Authenticating client... ");
        match channel.verify_round(&FFS_MODULUS, FFS_PRIVATE_KEY.len()) {
            Ok(true) => println!("OK"),
            Ok(false) => {
                println!("FAIL");
                return false;
            }
            Err(err) => {
                eprintln!("\n=== Authentication error: {err}");
                channel.mark_failed();
                return false;
            }
        }
    }
    channel.mark_authenticated();
    channel.mark_open();

    loop {
        let mut msg = match channel.session_mut().receive() {
            Ok(msg) => msg,
            Err(SessionError::ConnectionClosed) => {
                channel.mark_closed();
                return true;
            }
            Err(err) => {
                eprintln!("=== Client disconnected unexpectedly: {err}");
                channel.mark_failed();
                return false;
            }
        };

        let digest = msg.hash_of();
        let text = match msg.read_string() {
            Ok(text) => text,
            Err(err) => {
                eprintln!("=== Malformed message from client: {err}");
                channel.mark_failed();
                return false;
            }
        };
        println!("=== Received: {text} ({})", to_hex(&digest));

        let digest_value = bigint::BigInt::from_bytes(&digest);
        if let Err(err) = channel.session_mut().send_value(&digest_value) {
            eprintln!("=== Failed to echo digest: {err}");
            channel.mark_failed();
            return false;
        }
    }
}

pub fn client() -> bool {
    let path = socket_path();
    let session = match Client::connect(&path) {
        Ok(session) => session,
        Err(_) => {
            eprintln!("=== Unable to connect to the server.");
            return false;
        }
    };
    let mut channel = Channel::new(session);

    println!("=== Starting Diffie-Hellman key exchange...");
    if let Err(err) = channel.agree(&DH_GENERATOR, &DH_MODULUS, false) {
        eprintln!("=== Key exchange failed: {err}");
        return false;
    }
    println!("=== Diffie-Hellman key exchange completed. All communication is now encrypted with AES-256-CBC.");

    for _ in 0..rounds() {
        println!("=== Sending authentication info to server...");
        if let Err(err) = channel.authenticate_round(&FFS_MODULUS, &FFS_PRIVATE_KEY) {
            eprintln!("=== Server disconnected unexpectedly: {err}");
            channel.mark_failed();
            return false;
        }
    }
    channel.mark_authenticated();

    println!("=== Awaiting input...");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        let mut sent_msg = Message::new();
        sent_msg.write_string(&line);
        let sent_digest = sent_msg.hash_of();

        if let Err(err) = channel.session_mut().send(&sent_msg) {
            eprintln!("=== Server disconnected unexpectedly: {err}");
            channel.mark_failed();
            return false;
        }
        println!("=== Sent: {line} ({})", to_hex(&sent_digest));

        let mut reply = match channel.session_mut().receive() {
            Ok(reply) => reply,
            Err(SessionError::ConnectionClosed) => {
                channel.mark_closed();
                return true;
            }
            Err(err) => {
                eprintln!("=== Server disconnected unexpectedly: {err}");
                channel.mark_failed();
                return false;
            }
        };

        let received_digest = match bigint::BigInt::read_from(&mut reply) {
            Ok(digest) => digest,
            Err(err) => {
                eprintln!("=== Malformed digest from server: {err}");
                channel.mark_failed();
                return false;
            }
        };
        let sent_digest_value = bigint::BigInt::from_bytes(&sent_digest);
        let matches = sent_digest_value == received_digest;
        println!("=== Comparing hashes... {}", if matches { "OK" } else { "MISMATCH" });
    }

    channel.mark_closed();
    true
}
