use shareit_infra::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shareit_observability::init("shareit-gateway");

    let config = GatewayConfig::from_env()?;
    let app = shareit_gateway::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, upstream = %config.server_url, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
