use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // RUST_LOG overrides the default; `debug` shows every request line.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let port = std::env::var("PORT").ok();
    let addr = mock_server::listen_addr(port.as_deref())?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    mock_server::run(listener).await
}
