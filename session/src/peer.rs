//! Peer roles: a [`Server`] binds a Unix domain socket and accepts exactly
//! one connection; a [`Client`] connects to one. Both hand back a
//! [`Session`] wrapping the resulting [`UnixStream`].

use std::fs;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use crate::{Session, SessionError};

/// Binds `path`, removing any stale socket file left behind by a previous
/// run, and accepts a single incoming connection. The listener (and the
/// socket file) are released when the returned session's `Server` handle
/// is dropped.
pub struct Server {
    path: PathBuf,
    listener: UnixListener,
}

impl Server {
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            fs::remove_file(&path).map_err(|source| SessionError::UnableToConnect {
                path: path.display().to_string(),
                source,
            })?;
        }
        let listener = UnixListener::bind(&path).map_err(|source| SessionError::UnableToConnect {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("listening on {}", path.display());
        Ok(Self { path, listener })
    }

    /// Blocks for the single connection this protocol expects, returning a
    /// [`Session`] over it.
    pub fn accept(&self) -> Result<Session<UnixStream>, SessionError> {
        let (stream, _addr) = self.listener.accept()?;
        log::info!("accepted connection on {}", self.path.display());
        Ok(Session::new(stream))
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Connects to a server already listening at `path`.
pub struct Client;

impl Client {
    pub fn connect(path: impl AsRef<Path>) -> Result<Session<UnixStream>, SessionError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| SessionError::UnableToConnect {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("connected to {}", path.display());
        Ok(Session::new(stream))
    }
}
