use std::net::SocketAddr;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use contact_relay::config::Config;
use contact_relay::email;
use contact_relay::variants::VariantRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting contact relay");

    // Missing mail configuration is fatal at startup.
    let mail_config = config.mail.as_ref().ok_or(
        "Missing email configuration: set RESEND_API_KEY or CONTACT_RELAY_SMTP_HOST, \
         plus CONTACT_RELAY_RECIPIENT and CONTACT_RELAY_FROM",
    )?;
    let mailer = email::build_mailer(mail_config)?;

    let variants = match &config.variants_file {
        Some(path) => VariantRegistry::from_file(path, &config.default_variant)?,
        None => VariantRegistry::builtin(&config.default_variant)?,
    };
    tracing::info!(
        count = variants.list().len(),
        default = %config.default_variant,
        "Variants loaded"
    );

    let addr = SocketAddr::new(config.host, config.port);
    let max_age = Duration::from_secs(config.rate_window_secs.max(60) * 2);
    let (app, state) = contact_relay::build_app(config, variants, Some(mailer));

    // Prune the rate limiter so idle clients don't accumulate.
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            state.submission_limiter.cleanup(max_age);
            tracing::debug!(entries = state.submission_limiter.len(), "Rate limiter pruned");
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
