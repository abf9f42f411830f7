use shareit_infra::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shareit_observability::init("shareit-server");

    let config = ServerConfig::from_env()?;
    let app = shareit_server::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
