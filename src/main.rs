//src/main.rs

use pharma_analytics::{build_router, cors_layer, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pharma_analytics=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;
    let app = build_router(app_state, cors_layer(settings.cors_allowed_origin.as_deref())?);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
