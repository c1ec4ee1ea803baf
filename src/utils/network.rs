//! LAN address detection for the startup banner

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Best-effort local IP as seen by other machines on the network.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface, whose address we then read back.
pub fn local_ip() -> IpAddr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip())
    };

    probe().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// URLs printed at startup
pub fn listening_urls(port: u16) -> Vec<String> {
    let mut urls = vec![format!("http://localhost:{}", port)];
    let ip = local_ip();
    if !ip.is_loopback() {
        urls.push(format!("http://{}:{}", ip, port));
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_never_unspecified() {
        assert!(!local_ip().is_unspecified());
    }

    #[test]
    fn test_listening_urls_starts_with_localhost() {
        let urls = listening_urls(8080);
        assert_eq!(urls[0], "http://localhost:8080");
        assert!(urls.iter().all(|u| u.ends_with(":8080")));
    }
}
