//! Scripted HTTP/1.1 server for exercising the fetch client.
//!
//! Every connection serves exactly one response and is then closed. Header
//! names are written with the exact case chosen here (`Location`, not
//! `location`), which matters because the client matches header names
//! case-sensitively.
//!
//! Routes:
//! - `/`, `/hello`: 200 with a short text body
//! - `/bytes/{n}`: 200 with `n` bytes covering every byte value
//! - `/echo`: 200 whose body is the raw request head
//! - `/redirect/{n}`: 302 to `/redirect/{n-1}`, 200 at zero
//! - `/absolute-redirect/{n}`: 301 to the absolute form of `/redirect/{n}`
//! - `/dir/`: 303 with the relative `Location: file.txt`
//! - `/dir/file.txt`: 200
//! - `/loop`: 302 to itself
//! - `/status/{code}`: bare response with that status
//! - `/malformed`: bytes without a header terminator
//! - `/no-status`: a status line with a single field

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

const MAX_HEAD: usize = 64 * 1024;
const MAX_BYTES_ROUTE: usize = 1 << 20;

/// Port used by the standalone binary when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

pub const HELLO_BODY: &[u8] = b"hello world\n";
pub const ARRIVED_BODY: &[u8] = b"arrived\n";
pub const DIR_FILE_BODY: &[u8] = b"file in dir\n";

/// Loopback address for the standalone binary, taking the port from `PORT`.
pub fn listen_addr(port: Option<&str>) -> Result<SocketAddr, io::Error> {
    let port = match port {
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid PORT '{raw}': {e}"))
        })?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
}

pub async fn run(listener: TcpListener) -> Result<(), io::Error> {
    let local = listener.local_addr()?;
    loop {
        let (socket, peer) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(e) = serve(socket, local).await {
                debug!(%peer, error = %e, "connection failed");
            }
        });
    }
}

async fn serve(mut socket: TcpStream, local: SocketAddr) -> Result<(), io::Error> {
    let head = read_head(&mut socket).await?;
    let reply = respond(&head, local);
    socket.write_all(&reply).await?;
    socket.shutdown().await
}

/// Read until the blank line ending the request head, EOF, or `MAX_HEAD`.
async fn read_head(socket: &mut TcpStream) -> Result<Vec<u8>, io::Error> {
    let mut buf = BytesMut::with_capacity(1024);
    loop {
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() >= MAX_HEAD {
            break;
        }
        if socket.read_buf(&mut buf).await? == 0 {
            break;
        }
    }
    Ok(buf.to_vec())
}

/// Route a raw request head to the bytes of its response.
pub fn respond(head: &[u8], local: SocketAddr) -> Vec<u8> {
    let text = String::from_utf8_lossy(head);
    let request_line = text.lines().next().unwrap_or_default();
    let mut parts = request_line.split(' ');
    let (method, path) = match (parts.next(), parts.next()) {
        (Some(method), Some(path)) => (method, path),
        _ => return reply(400, &[], b""),
    };
    debug!(method, path, "request");

    if method != "GET" {
        return reply(405, &[], b"");
    }

    match path {
        "/" | "/hello" => reply(200, &[("Content-Type", "text/plain")], HELLO_BODY),
        "/echo" => reply(200, &[("Content-Type", "application/octet-stream")], head),
        "/dir/" => reply(303, &[("Location", "file.txt")], b""),
        "/dir/file.txt" => reply(200, &[("Content-Type", "text/plain")], DIR_FILE_BODY),
        "/loop" => reply(302, &[("Location", "/loop")], b""),
        "/malformed" => b"this is not an http response".to_vec(),
        "/no-status" => b"HTTP/1.1\r\n\r\nbody".to_vec(),
        _ => route_with_param(path, local),
    }
}

fn route_with_param(path: &str, local: SocketAddr) -> Vec<u8> {
    if let Some(n) = param(path, "/bytes/") {
        let n = n.min(MAX_BYTES_ROUTE);
        return reply(200, &[("Content-Type", "application/octet-stream")], &pattern_bytes(n));
    }
    if let Some(n) = param(path, "/redirect/") {
        if n == 0 {
            return reply(200, &[("Content-Type", "text/plain")], ARRIVED_BODY);
        }
        let location = format!("/redirect/{}", n - 1);
        return reply(302, &[("Location", location.as_str())], b"");
    }
    if let Some(n) = param(path, "/absolute-redirect/") {
        let location = format!("http://{local}/redirect/{n}");
        return reply(301, &[("Location", location.as_str())], b"");
    }
    if let Some(code) = param(path, "/status/") {
        return match u16::try_from(code) {
            Ok(code) => reply(code, &[], b""),
            Err(_) => reply(400, &[], b""),
        };
    }
    reply(404, &[("Content-Type", "text/plain")], b"not found\n")
}

fn param(path: &str, prefix: &str) -> Option<usize> {
    path.strip_prefix(prefix)?.parse().ok()
}

/// `n` bytes cycling through every value, so binary bodies are exercised.
pub fn pattern_bytes(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 256) as u8).collect()
}

fn reply(status: u16, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {status} {}\r\n", reason(status));
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\n", body.len()));
    out.push_str("Connection: close\r\n\r\n");

    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
