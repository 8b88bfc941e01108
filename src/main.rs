use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,bucket_browser_lib=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    bucket_browser_lib::run().await
}
