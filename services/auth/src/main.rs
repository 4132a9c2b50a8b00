use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{
    AuthConfig, AuthService,
    clock::SystemClock,
    ui::{LoggingNavigator, TracingNotifier},
};
use common::{FileStore, FileStoreConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Loading storefront page");

    let store_config = FileStoreConfig::from_env()?;
    let store = Arc::new(FileStore::open(&store_config)?);
    let config = AuthConfig::from_env()?;

    let service = AuthService::new(
        config,
        store,
        Arc::new(SystemClock),
        Arc::new(TracingNotifier),
        Arc::new(LoggingNavigator),
    );

    service.initialize()?;

    let prefill = service.sign_in_prefill()?;
    if prefill.remember_me {
        info!("Remembered sign-in email: {}", prefill.email);
    }

    info!("Session authenticated: {}", service.is_authenticated());
    println!("{}", service.header().render()?);

    Ok(())
}
