use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How a canned server behaves after it has written its response.
#[derive(Clone, Copy)]
pub enum AfterWrite {
    Close,
    /// Keep the socket open for this long.
    Hold(Duration),
}

/// Starts a loopback HTTP "server" that answers every connection with
/// `response`, sent in `chunk`-sized writes. Returns the port.
pub async fn canned_server(response: &'static [u8], chunk: usize, after: AfterWrite) -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(answer(socket, response, chunk, after));
        }
    });

    port
}

async fn answer(mut socket: TcpStream, response: &'static [u8], chunk: usize, after: AfterWrite) {
    let mut request = Vec::new();
    let mut buf = [0u8; 512];
    while !request.ends_with(b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    for part in response.chunks(chunk.max(1)) {
        if socket.write_all(part).await.is_err() {
            return;
        }
        let _ = socket.flush().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    if let AfterWrite::Hold(duration) = after {
        tokio::time::sleep(duration).await;
    }
}

/// A port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}
