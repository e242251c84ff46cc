//! HTTP/1.1 Server.
//!
//! [`Server`] runs an accept loop that spawns one task per connection. Each connection serves a
//! single request with [`serve_connection`], then closes.
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::h1::{ReadBuffer, RequestError, read_request};
use crate::http::StatusCode;
use crate::log::{debug, error, info, warning};
use crate::request::Request;
use crate::response::{self, ResponseWriter, WriteError};

mod config;

pub use config::{Config, DEFAULT_BUFFER_CAP, DEFAULT_PORT, MAX_HEADER_SIZE};


// ===== Handler =====

/// Application callback invoked once per parsed request.
///
/// The handler writes the whole response through `res`. Write errors are for the handler to
/// observe, there is no error channel back to the server. After the handler returns, the server
/// calls [`ResponseWriter::finish`] and closes the connection.
pub trait Handler: Send + Sync + 'static {
    fn call<W>(
        &self,
        res: &mut ResponseWriter<W>,
        req: &Request,
    ) -> impl Future<Output = ()> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

// ===== Connection =====

/// Serve a single request on `io`.
///
/// When the request cannot be read, an error response is written instead of calling `handler`.
/// The write side of `io` is shut down before returning.
///
/// # Errors
///
/// Returns error if writing the response fails.
pub async fn serve_connection<IO, H>(
    mut io: IO,
    handler: &H,
    config: &Config,
) -> Result<(), WriteError>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    let mut buffer = ReadBuffer::new(config.buffer_capacity(), config.max_header_size());

    let result = match read_request(&mut io, &mut buffer).await {
        Ok(request) => {
            debug!("{} {}", request.method(), request.target());

            let mut res = ResponseWriter::new(&mut io);
            handler.call(&mut res, &request).await;

            let result = res.finish().await;
            if let Err(err) = &result {
                warning!("incomplete response for {}: {err}", request.target());
            }
            result
        }
        Err(err) => match err.status() {
            Some(status) => {
                warning!("failed to read request: {err}");
                write_error(&mut io, status, &err).await
            }
            None => {
                debug!("failed to read request: {err}");
                Ok(())
            }
        },
    };

    if let Err(err) = io.shutdown().await {
        debug!("failed to shutdown connection: {err}");
    }

    result
}

async fn write_error<W>(io: W, status: StatusCode, err: &RequestError) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    let body = match err {
        RequestError::Parse(err) => err.to_string(),
        err => err.to_string(),
    };
    let mut res = ResponseWriter::new(io);
    res.write_status_line(status).await?;
    res.write_headers(&response::default_headers(body.len(), "text/plain")).await?;
    res.write_body(body.as_bytes()).await?;
    res.finish().await
}

// ===== Server =====

/// Running HTTP server.
///
/// The accept loop runs in a spawned task until [`Server::close`] is called or the server is
/// dropped.
#[derive(Debug)]
pub struct Server {
    addr: SocketAddr,
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl Server {
    /// Bind to [`Config::addr`] and start accepting connections.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if binding the listener fails.
    pub async fn bind<H: Handler>(config: Config, handler: H) -> io::Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        Self::from_listener(listener, config, handler)
    }

    /// Start accepting connections from an already bound listener.
    ///
    /// The address in `config` is ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the listener local address cannot be retrieved.
    pub fn from_listener<H: Handler>(
        listener: TcpListener,
        config: Config,
        handler: H,
    ) -> io::Result<Self> {
        let addr = listener.local_addr()?;
        let closed = Arc::new(AtomicBool::new(false));
        let notify = Arc::new(Notify::new());

        let task = tokio::spawn(accept_loop(
            listener,
            Arc::new(config),
            Arc::new(handler),
            Arc::clone(&closed),
            Arc::clone(&notify),
        ));

        info!("listening on {addr}");

        Ok(Self {
            addr,
            closed,
            notify,
            task: Some(task),
        })
    }

    /// Returns the address the server is listening on.
    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns `true` if the server has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    ///
    /// Connections already accepted keep running to completion.
    pub async fn close(mut self) {
        self.shutdown();

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!("accept loop failed: {err}");
            }
        }
    }

    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.notify.notify_one();
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    config: Arc<Config>,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = notify.notified() => break,
            accepted = listener.accept() => match accepted {
                Ok(ok) => ok,
                Err(err) => {
                    if closed.load(Ordering::Acquire) {
                        break;
                    }
                    error!("failed to accept connection: {err}");
                    continue;
                }
            },
        };

        if closed.load(Ordering::Acquire) {
            break;
        }

        let config = Arc::clone(&config);
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            debug!("accepted connection from {peer}");
            if let Err(err) = serve_connection(stream, &*handler, &config).await {
                debug!("connection {peer} closed: {err}");
            }
        });
    }

    debug!("accept loop stopped");
}
