use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, HttpError};
use crate::http::HttpClient;
use crate::metrics::RequestResult;

pub(crate) fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// In-memory client: answers every URL with `status` after `delay`, except
/// `fail_on`, which fails like a malformed URL. With `echo_path` set, the
/// status is the number in the URL's last path segment instead.
pub(crate) struct FakeClient {
    pub(crate) status: u16,
    pub(crate) delay: Duration,
    pub(crate) fail_on: Option<String>,
    pub(crate) echo_path: bool,
    pub(crate) calls: AtomicU64,
}

impl FakeClient {
    pub(crate) fn ok(delay: Duration) -> Self {
        Self {
            status: 200,
            delay,
            fail_on: None,
            echo_path: false,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn echoing(delay: Duration) -> Self {
        Self {
            echo_path: true,
            ..Self::ok(delay)
        }
    }

    pub(crate) fn failing_on(url: &str, delay: Duration) -> Self {
        Self {
            fail_on: Some(url.to_owned()),
            ..Self::ok(delay)
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn status_for(&self, url: &str) -> u16 {
        if !self.echo_path {
            return self.status;
        }
        url.rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
            .unwrap_or(self.status)
    }
}

#[async_trait]
impl HttpClient for FakeClient {
    async fn get(&self, url: &str) -> AppResult<RequestResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref() == Some(url) {
            return Err(AppError::http(HttpError::InvalidUrl {
                url: url.to_owned(),
                source: url::ParseError::EmptyHost,
            }));
        }
        tokio::time::sleep(self.delay).await;
        Ok(RequestResult::from_parts(self.status_for(url), self.delay))
    }
}

pub(crate) struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: Arc<AtomicU64>,
}

impl ServerHandle {
    pub(crate) fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Loopback HTTP server answering `200 OK` to every request. Returns `None`
/// when the sandbox forbids binding sockets.
pub(crate) fn spawn_http_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("Skipping loopback test: {}", err);
            return Ok(None);
        }
        Err(err) => return Err(format!("bind test server failed: {}", err)),
    };
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicU64::new(0));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(_) => break,
            }
        }
    });

    Ok(Some((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    )))
}

fn handle_client(mut stream: TcpStream, hits: &AtomicU64) {
    drop(stream.set_nonblocking(false));
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    hits.fetch_add(1, Ordering::SeqCst);
    if stream
        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK")
        .is_err()
    {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}
