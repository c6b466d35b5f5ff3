#![allow(dead_code)]

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use std::{fs, thread};

const FFSOCK: &str = env!("CARGO_BIN_EXE_ffsock");

#[derive(Debug)]
pub struct Output {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn unique_socket_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ffsock-test-{name}-{}.sock", std::process::id()))
}

/// Blocks until `path` exists (created by `Server::bind`) or panics after a
/// few seconds — the server binds and creates the socket file before it
/// does anything else.
pub fn wait_for_socket(path: &Path) {
    for _ in 0..200 {
        if path.exists() {
            return;
        }
        thread::sleep(Duration::from_millis(20));
    }
    panic!("server never created its socket file at {}", path.display());
}

/// A running `ffsock -s` child process, killed (and its socket file
/// cleaned up) on drop.
pub struct ServerProcess {
    child: Child,
    path: PathBuf,
}

impl ServerProcess {
    pub fn spawn(path: &Path) -> Self {
        Self::spawn_with_rounds(path, None)
    }

    /// Like [`ServerProcess::spawn`], but overrides `FFSOCK_ROUNDS` when
    /// `rounds` is `Some`, for scenarios that need a known round count.
    pub fn spawn_with_rounds(path: &Path, rounds: Option<u32>) -> Self {
        let _ = fs::remove_file(path);
        let mut command = Command::new(FFSOCK);
        command
            .arg("-s")
            .env("FFSOCK_SOCKET_PATH", path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(rounds) = rounds {
            command.env("FFSOCK_ROUNDS", rounds.to_string());
        }
        let child = command.spawn().expect("failed to spawn ffsock -s");
        wait_for_socket(path);
        Self {
            child,
            path: path.to_path_buf(),
        }
    }

    /// Waits for the process to exit on its own (rather than killing it)
    /// and collects its output. Use for scenarios where the server is
    /// expected to terminate itself (e.g. a failed FFS round).
    pub fn finish(mut self) -> Output {
        let stdout_handle = {
            let mut stdout = self.child.stdout.take().unwrap();
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stdout.read_to_string(&mut buf);
                buf
            })
        };
        let stderr_handle = {
            let mut stderr = self.child.stderr.take().unwrap();
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        };
        let status = self.child.wait().expect("server process was never started");
        let _ = fs::remove_file(&self.path);
        Output {
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout_handle.join().unwrap(),
            stderr: stderr_handle.join().unwrap(),
        }
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        // Deliberately does not remove the socket file: a killed server
        // leaves a stale entry behind in real use, and
        // `reconnection_after_a_stale_socket_file` relies on that to test
        // `Server::bind`'s own unlink-on-start cleanup.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Runs `ffsock -c`, feeding `stdin` and collecting its full output.
pub fn run_client(path: &Path, stdin: &str) -> Output {
    let mut child = Command::new(FFSOCK)
        .arg("-c")
        .env("FFSOCK_SOCKET_PATH", path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn ffsock -c");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    Output {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Spawns `ffsock -c` without waiting for it to finish, for scenarios that
/// need to control the server side by hand (tampering, killing mid-frame).
pub fn spawn_client(path: &Path, stdin: &str) -> Child {
    let mut child = Command::new(FFSOCK)
        .arg("-c")
        .env("FFSOCK_SOCKET_PATH", path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn ffsock -c");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child
}

pub fn finish(mut child: Child) -> Output {
    let stdout_handle = {
        let mut stdout = child.stdout.take().unwrap();
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout.read_to_string(&mut buf);
            buf
        })
    };
    let stderr_handle = {
        let mut stderr = child.stderr.take().unwrap();
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        })
    };
    let status = child.wait().unwrap();
    Output {
        exit_code: status.code().unwrap_or(-1),
        stdout: stdout_handle.join().unwrap(),
        stderr: stderr_handle.join().unwrap(),
    }
}
