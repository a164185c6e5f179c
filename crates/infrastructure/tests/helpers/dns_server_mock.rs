#![allow(dead_code)]
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;
use zonesync_infrastructure::dns::MessageBuilder;

/// Decides what a mock primary sends back for each query it receives.
pub type Script = Arc<dyn Fn(&Message) -> Vec<Message> + Send + Sync>;

pub fn script<F>(f: F) -> Script
where
    F: Fn(&Message) -> Vec<Message> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// In-process primary answering over UDP and TCP on the same port.
///
/// Every TCP connection serves one query: the scripted messages are written
/// and the connection is closed.
pub struct MockPrimary {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Message>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockPrimary {
    pub async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let socket = UdpSocket::bind(addr).await.unwrap();

        let received = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let seen = Arc::clone(&received);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            tokio::spawn(serve_tcp(stream, Arc::clone(&script), Arc::clone(&seen)));
                        }
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let Ok(query) = Message::from_vec(&buf[..len]) else { continue };
                            seen.lock().unwrap().push(query.clone());
                            for response in script(&query) {
                                let bytes = MessageBuilder::serialize_message(&response).unwrap();
                                let _ = socket.send_to(&bytes, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queries received so far, over either transport.
    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for MockPrimary {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve_tcp(mut stream: TcpStream, script: Script, seen: Arc<Mutex<Vec<Message>>>) {
    let mut len_buf = [0u8; 2];
    if stream.read_exact(&mut len_buf).await.is_err() {
        return;
    }
    let mut body = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    if stream.read_exact(&mut body).await.is_err() {
        return;
    }
    let Ok(query) = Message::from_vec(&body) else {
        return;
    };
    seen.lock().unwrap().push(query.clone());

    for response in script(&query) {
        let bytes = MessageBuilder::serialize_message(&response).unwrap();
        let _ = stream.write_all(&(bytes.len() as u16).to_be_bytes()).await;
        let _ = stream.write_all(&bytes).await;
    }
    let _ = stream.flush().await;
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
