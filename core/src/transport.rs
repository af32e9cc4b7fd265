//! Blocking TCP transport.
//!
//! # Design
//! `Transport` is the only seam where the engine touches the network. The
//! fetch loop is generic over it, so tests can script responses without
//! sockets. One call is one connection: connect, write the whole request,
//! read until the peer closes, drop the socket.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::FetchError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const READ_CHUNK: usize = 4096;

/// Sends one request and returns every byte received until end-of-stream.
pub trait Transport {
    fn fetch(&mut self, host: &str, port: u16, request: &[u8]) -> Result<Vec<u8>, FetchError>;
}

/// Plain TCP transport with connect, read and write timeouts.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
        debug!(host, port, candidates = addrs.len(), "resolved host");

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    debug!(%addr, "connected");
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no addresses found for {host}"))
        }))
    }

    fn exchange(&self, host: &str, port: u16, request: &[u8]) -> io::Result<Vec<u8>> {
        let mut stream = self.connect(host, port)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        stream.write_all(request)?;
        stream.flush()?;
        debug!(bytes = request.len(), "request sent");

        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            trace!(n, "received chunk");
            response.extend_from_slice(&chunk[..n]);
        }
        debug!(bytes = response.len(), "response received");
        Ok(response)
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for TcpTransport {
    fn fetch(&mut self, host: &str, port: u16, request: &[u8]) -> Result<Vec<u8>, FetchError> {
        self.exchange(host, port, request)
            .map_err(|source| FetchError::Connection {
                host: host.to_string(),
                port,
                source,
            })
    }
}
