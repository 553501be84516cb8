use anyhow::{Context, Result};
use nowplaying_web::{Config, Provider};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the snapshot, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let provider = Provider::from_config(&config)?;
    info!(uri = %provider.uri(), policy = ?config.volume_policy, "querying provider");

    match provider
        .currently_playing()
        .await
        .context("querying playback state")?
    {
        Some(snapshot) => {
            info!(
                track = %snapshot.item.name,
                artists = %snapshot.item.credited_artists(),
                album = %snapshot.item.album.name,
                is_playing = snapshot.is_playing,
                volume_percent = ?snapshot.volume_percent(),
                "currently playing"
            );
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        None => info!("nothing is playing"),
    }
    Ok(())
}
