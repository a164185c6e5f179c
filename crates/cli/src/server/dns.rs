use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use zonesync_infrastructure::dns::{DnsServerHandler, TcpResponseSink, UdpResponseSink};

const MAX_UDP_MESSAGE_SIZE: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Serves UDP and TCP on `bind_addr`; every inbound message gets its own task.
pub async fn start_dns_server(bind_addr: String, handler: DnsServerHandler) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let handler = Arc::new(handler);

    let udp_socket = Arc::new(UdpSocket::bind(socket_addr).await?);
    let tcp_listener = TcpListener::bind(socket_addr).await?;

    info!(bind_address = %socket_addr, "DNS server ready (UDP + TCP)");

    let mut join_set: JoinSet<()> = JoinSet::new();
    join_set.spawn(run_udp(udp_socket, Arc::clone(&handler)));
    join_set.spawn(run_tcp(tcp_listener, handler));

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>) {
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // ICMP errors from earlier replies surface here on some platforms.
                warn!(error = %e, "UDP recv error");
                continue;
            }
        };

        let request: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            let mut sink = UdpResponseSink::new(socket, from);
            let rcode = handler.handle_request(&request, &mut sink).await;
            debug!(client = %from, rcode = ?rcode, "UDP request handled");
        });
    }
}

async fn run_tcp(listener: TcpListener, handler: Arc<DnsServerHandler>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(serve_tcp_connection(stream, peer, Arc::clone(&handler)));
            }
            Err(e) => {
                error!(error = %e, "TCP accept error");
            }
        }
    }
}

async fn serve_tcp_connection(stream: TcpStream, peer: SocketAddr, handler: Arc<DnsServerHandler>) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(client = %peer, error = %e, "Failed to set TCP_NODELAY");
    }

    let (mut reader, writer) = stream.into_split();
    let writer = Arc::new(Mutex::new(writer));

    loop {
        let request = match read_tcp_message(&mut reader, TCP_IDLE_TIMEOUT).await {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(e) => {
                debug!(client = %peer, error = %e, "Closing TCP connection");
                break;
            }
        };

        let handler = Arc::clone(&handler);
        let writer = Arc::clone(&writer);
        tokio::spawn(async move {
            let mut sink = TcpResponseSink::new(writer, peer);
            let rcode = handler.handle_request(&request, &mut sink).await;
            debug!(client = %peer, rcode = ?rcode, "TCP request handled");
        });
    }
}

/// Reads one length-prefixed message. `Ok(None)` is a clean close between
/// messages; a peer silent for `idle` yields a `TimedOut` error.
async fn read_tcp_message<R>(reader: &mut R, idle: Duration) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    match tokio::time::timeout(idle, reader.read_exact(&mut len_buf)).await {
        Err(_) => return Err(io::Error::new(io::ErrorKind::TimedOut, "idle TCP connection")),
        Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Ok(Err(e)) => return Err(e),
        Ok(Ok(_)) => {}
    }

    let mut request = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    tokio::time::timeout(idle, reader.read_exact(&mut request))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TCP message stalled"))??;
    Ok(Some(request))
}
