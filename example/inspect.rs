use clap::Parser;
use std::io;
use tcphttp::h1::{ReadBuffer, read_request};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "inspect")]
#[command(about = "Print every request received on a port", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = tcphttp::server::DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    log::info!("listening on {}", listener.local_addr()?);

    loop {
        let (mut stream, peer) = listener.accept().await?;
        println!("Connection accepted from {peer}");

        let mut buffer = ReadBuffer::new(
            tcphttp::server::DEFAULT_BUFFER_CAP,
            tcphttp::server::MAX_HEADER_SIZE,
        );

        match read_request(&mut stream, &mut buffer).await {
            Ok(request) => {
                println!("Request line:");
                println!("- Method: {}", request.method());
                println!("- Target: {}", request.target());
                println!("- Version: {}", request.version());
                println!("Headers:");
                for (name, value) in request.headers() {
                    println!("- {name}: {value}");
                }
            }
            Err(err) => println!("Invalid request: {err}"),
        }

        println!("Connection closed");
    }
}
