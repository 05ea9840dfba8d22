use std::sync::Arc;

use anyhow::Context as _;

use souq_api::config::ApiConfig;
use souq_auth::{TokenCodec, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env();
    souq_observability::init(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or_default(),
    );
    let config = config.inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;

    let (access_ttl, refresh_ttl, key) = config.tokens.into_parts();
    tracing::info!(
        access_ttl_secs = access_ttl.num_seconds(),
        refresh_ttl_secs = refresh_ttl.num_seconds(),
        "token settings loaded"
    );
    let verifier = Arc::new(TokenVerifier::new(TokenCodec::new(Arc::new(key))));

    let app = souq_api::app::build_app(verifier);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
