use crate::error::{ContribError, Result};
use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_START_PORT: u16 = 8000;
pub const DEFAULT_MAX_TRIES: u16 = 100;

/// Resolve `host`, preferring an IPv4 address when the name has one.
pub fn resolve_host(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            ContribError::Io(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{host} did not resolve to any address"),
            ))
        })
}

/// Bind the first free port in `start_port..start_port + max_tries`.
///
/// The returned listener is the one that claimed the port, so the caller
/// serves on exactly the port it reports.
pub fn find_available_port(
    host: &str,
    start_port: u16,
    max_tries: u16,
) -> Result<(TcpListener, u16)> {
    for offset in 0..max_tries {
        let Some(port) = start_port.checked_add(offset) else {
            break;
        };
        let addr = resolve_host(host, port)?;
        if let Ok(listener) = TcpListener::bind(addr) {
            let bound = listener.local_addr()?.port();
            return Ok((listener, bound));
        }
    }

    Err(ContribError::NoAvailablePort {
        host: host.to_string(),
        start: start_port,
        end: start_port as u32 + max_tries as u32,
    })
}
