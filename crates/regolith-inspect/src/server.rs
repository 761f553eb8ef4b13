//! TCP inspection server
//!
//! Runs a line-delimited JSON protocol on a dedicated thread with its own
//! single-threaded tokio runtime, so the tick-driven host never touches
//! async. Dropping the server handle shuts the thread down.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::protocol::{InspectCommand, InspectResponse};

/// Trait the host implements to answer inspection commands
pub trait InspectHandler: Send + 'static {
    fn handle_command(&mut self, cmd: InspectCommand) -> InspectResponse;
}

/// Inspection server handle - keep alive to keep the server running
pub struct InspectServer {
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl InspectServer {
    /// Start the server on the given port.
    ///
    /// Returns immediately; the accept loop runs on its own thread until
    /// the handle is dropped. A failed bind is logged, not fatal.
    pub fn start(handler: Arc<Mutex<dyn InspectHandler>>, port: u16) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let thread = std::thread::Builder::new()
            .name("regolith-inspect".to_string())
            .spawn(move || run_server(handler, port, shutdown_rx))
            .ok();
        if thread.is_none() {
            log::error!("failed to spawn inspection server thread");
        }

        Self {
            shutdown: Some(shutdown_tx),
            thread,
        }
    }
}

impl Drop for InspectServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_server(
    handler: Arc<Mutex<dyn InspectHandler>>,
    port: u16,
    mut shutdown: oneshot::Receiver<()>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("inspection server runtime failed to start: {}", e);
            return;
        }
    };

    runtime.block_on(async move {
        let addr = format!("127.0.0.1:{}", port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => {
                log::info!("inspection server listening on {}", addr);
                l
            }
            Err(e) => {
                log::error!("inspection server failed to bind {}: {}", addr, e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("inspection server shutting down");
                    return;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            log::info!("inspection client connected from {}", peer);
                            let handler = handler.clone();
                            tokio::spawn(async move {
                                serve_client(stream, handler).await;
                                log::info!("inspection client disconnected: {}", peer);
                            });
                        }
                        Err(e) => {
                            log::error!("inspection server accept error: {}", e);
                        }
                    }
                }
            }
        }
    });
}

async fn serve_client(stream: TcpStream, handler: Arc<Mutex<dyn InspectHandler>>) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<InspectCommand>(line) {
            Ok(cmd) => {
                log::debug!("inspection command: {:?}", cmd);
                match handler.lock() {
                    Ok(mut h) => h.handle_command(cmd),
                    Err(_) => InspectResponse::error("handler poisoned"),
                }
            }
            Err(e) => InspectResponse::error(format!("invalid command JSON: {}", e)),
        };

        let mut json = serde_json::to_string(&response).unwrap_or_else(|e| {
            format!("{{\"status\":\"error\",\"message\":\"serialize error: {}\"}}", e)
        });
        json.push('\n');

        if writer.write_all(json.as_bytes()).await.is_err() {
            break;
        }
        if writer.flush().await.is_err() {
            break;
        }
    }
}
