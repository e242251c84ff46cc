use clap::Parser;
use sha2::{Digest, Sha256};
use std::{io, path::PathBuf};
use tcphttp::{
    Config, Handler, Headers, Request, ResponseWriter, Server, StatusCode,
    response::{WriteError, default_headers},
};
use tokio::{io::AsyncWrite, signal};

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const INTERNAL_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const BAD_GATEWAY_PAGE: &str = "<html>
  <head>
    <title>502 Bad Gateway</title>
  </head>
  <body>
    <h1>Bad Gateway</h1>
    <p>The upstream did not want to talk to us.</p>
  </body>
</html>";

const OK_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

const HTTPBIN_PREFIX: &str = "/httpbin/";

#[derive(Debug, Parser)]
#[command(name = "httpserver")]
#[command(about = "Demo HTTP/1.1 server built on raw TCP", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = tcphttp::server::DEFAULT_PORT)]
    port: u16,

    /// Directory holding `vim.mp4`
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Base URL proxied under `/httpbin/`
    #[arg(short, long, default_value = "https://httpbin.org")]
    upstream: String,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    tokio::runtime::Runtime::new()?.block_on(async move {
        let app = App {
            assets: cli.assets,
            upstream: cli.upstream.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        };

        let server = Server::bind(Config::new().with_port(cli.port), app).await?;
        log::info!("server started on port {}", server.local_addr().port());

        shutdown_signal().await?;

        server.close().await;
        log::info!("server gracefully stopped");
        Ok::<_, io::Error>(())
    })
}

#[cfg(unix)]
async fn shutdown_signal() -> io::Result<()> {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    tokio::select! {
        result = signal::ctrl_c() => result,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<()> {
    signal::ctrl_c().await
}

#[derive(Debug)]
struct App {
    assets: PathBuf,
    upstream: String,
    client: reqwest::Client,
}

impl Handler for App {
    async fn call<W>(&self, res: &mut ResponseWriter<W>, req: &Request)
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = req.target();

        let result = match target {
            "/yourproblem" => html(res, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            "/myproblem" => html(res, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await,
            "/video" => self.video(res).await,
            path if path.starts_with(HTTPBIN_PREFIX) => {
                self.proxy(res, &path[HTTPBIN_PREFIX.len()..]).await
            }
            _ => html(res, StatusCode::OK, OK_PAGE).await,
        };

        if let Err(err) = result {
            log::error!("failed to respond to {target}: {err}");
        }
    }
}

impl App {
    async fn video<W>(&self, res: &mut ResponseWriter<W>) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        let path = self.assets.join("vim.mp4");
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(err) => {
                log::error!("failed to read {}: {err}", path.display());
                return html(res, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await;
            }
        };

        res.write_status_line(StatusCode::OK).await?;
        res.write_headers(&default_headers(body.len(), "video/mp4")).await?;
        res.write_body(&body).await
    }

    /// Stream `<upstream>/<path>` back as chunks, followed by digest and length trailers.
    async fn proxy<W>(&self, res: &mut ResponseWriter<W>, path: &str) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        let url = format!("{}/{path}", self.upstream);
        log::info!("proxying {url}");

        let mut upstream = match self.client.get(&url).send().await {
            Ok(upstream) => upstream,
            Err(err) => {
                log::error!("failed to reach {url}: {err}");
                return html(res, StatusCode::BAD_GATEWAY, BAD_GATEWAY_PAGE).await;
            }
        };

        let content_type = upstream
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/json")
            .to_owned();

        let mut headers = default_headers(0, &content_type);
        headers.remove("content-length");
        headers.set("transfer-encoding", "chunked");
        headers.set("trailers", "X-Content-SHA256, X-Content-Length");

        res.write_status_line(StatusCode::OK).await?;
        res.write_headers(&headers).await?;

        let mut hasher = Sha256::new();
        let mut len = 0;

        loop {
            match upstream.chunk().await {
                Ok(Some(chunk)) => {
                    log::debug!("received {} bytes", chunk.len());
                    hasher.update(&chunk);
                    len += chunk.len();
                    res.write_chunk(&chunk).await?;
                }
                Ok(None) => break,
                Err(err) => {
                    // the body is left unterminated so the client sees a truncated response
                    log::error!("failed to read body of {url}: {err}");
                    return Ok(());
                }
            }
        }

        res.write_chunked_done().await?;

        let mut trailers = Headers::new();
        trailers.set("X-Content-SHA256", format!("{:x}", hasher.finalize()));
        trailers.set("X-Content-Length", len.to_string());
        res.write_trailers(&trailers).await
    }
}

async fn html<W>(res: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    res.write_status_line(status).await?;
    res.write_headers(&default_headers(page.len(), "text/html")).await?;
    res.write_body(page.as_bytes()).await
}
