use oxbrain::{api, config, logging};
use std::net::Ipv4Addr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let port = config::server_port_from_env()?.unwrap_or(8000);
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    tracing::info!("Listening on http://0.0.0.0:{port}");
    axum::serve(listener, api::create_router()).await?;
    Ok(())
}
