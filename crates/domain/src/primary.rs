use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Host part of a primary, either a literal socket address or a name that
/// still has to be resolved before connecting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryHost {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl PrimaryHost {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            PrimaryHost::Resolved(addr) => Some(*addr),
            PrimaryHost::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            PrimaryHost::Resolved(addr) => addr.port(),
            PrimaryHost::Unresolved { port, .. } => *port,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            PrimaryHost::Unresolved { hostname, port } => Some((hostname, *port)),
            PrimaryHost::Resolved(_) => None,
        }
    }
}

impl fmt::Display for PrimaryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryHost::Resolved(addr) => write!(f, "{}", addr),
            PrimaryHost::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportProtocol {
    #[default]
    Udp,
    Tcp,
}

impl TransportProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
        }
    }
}

impl FromStr for TransportProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            other => Err(format!("Unknown transport protocol '{}'", other)),
        }
    }
}

/// A server that may be authoritative for any zone this instance is secondary for.
///
/// `protocol` only governs SOA probes; zone transfers always run over TCP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryAddr {
    pub host: PrimaryHost,
    pub protocol: TransportProtocol,
}

impl PrimaryAddr {
    pub fn new(host: PrimaryHost, protocol: TransportProtocol) -> Self {
        Self { host, protocol }
    }

    pub fn udp(addr: SocketAddr) -> Self {
        Self::new(PrimaryHost::Resolved(addr), TransportProtocol::Udp)
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self::new(PrimaryHost::Resolved(addr), TransportProtocol::Tcp)
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host.socket_addr()
    }

    /// Parses `udp://host[:port]`, `tcp://host[:port]` or a bare `host[:port]`,
    /// the latter using `default_protocol`.
    pub fn parse_with_default(
        s: &str,
        default_protocol: TransportProtocol,
    ) -> Result<Self, String> {
        let s = s.trim();
        let (protocol, rest) = if let Some(rest) = s.strip_prefix("udp://") {
            (TransportProtocol::Udp, rest)
        } else if let Some(rest) = s.strip_prefix("tcp://") {
            (TransportProtocol::Tcp, rest)
        } else if s.contains("://") {
            return Err(format!(
                "Unsupported scheme in '{}'. Expected 'udp://' or 'tcp://'",
                s
            ));
        } else {
            (default_protocol, s)
        };

        let host = parse_primary_host(rest)?;
        Ok(Self { host, protocol })
    }
}

impl fmt::Display for PrimaryAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)
    }
}

impl FromStr for PrimaryAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default(s, TransportProtocol::default())
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn parse_primary_host(s: &str) -> Result<PrimaryHost, String> {
    if s.is_empty() {
        return Err("Empty primary address".to_string());
    }
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(PrimaryHost::Resolved(addr));
    }
    let bare = s.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(PrimaryHost::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
    }
    if let Some((host, port)) = parse_host_port(s) {
        if host.is_empty() {
            return Err(format!("Invalid address '{}'", s));
        }
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(PrimaryHost::Resolved(SocketAddr::new(ip, port)));
        }
        return Ok(PrimaryHost::Unresolved {
            hostname: host.into(),
            port,
        });
    }
    if s.contains(':') || s.contains('/') || s.contains(char::is_whitespace) {
        return Err(format!("Invalid address '{}'", s));
    }
    Ok(PrimaryHost::Unresolved {
        hostname: s.into(),
        port: DEFAULT_DNS_PORT,
    })
}
