mod config;
mod domain;
mod infrastructure;
mod ports;
mod services;

use config::Config;
use infrastructure::google_auth::GoogleAuthenticator;
use infrastructure::spotify::SpotifyClient;
use infrastructure::throttle::FixedDelay;
use infrastructure::youtube::YouTubeClient;
use services::converter::{ConversionReport, PlaylistConverter};
use services::reader::SourceTrackReader;
use services::writer::DestinationWriter;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let http_client = reqwest::Client::new();

    let spotify = SpotifyClient::new(&config.spotify_client_id, &config.spotify_client_secret).await?;
    let auth = GoogleAuthenticator::new(
        http_client.clone(),
        &config.youtube_client_secrets,
        &config.youtube_token_file,
    );
    let youtube = YouTubeClient::new(http_client, auth.access_token().await?);

    let mut converter = PlaylistConverter::new(
        SourceTrackReader::new(spotify),
        DestinationWriter::new(youtube),
        FixedDelay::new(config.request_delay),
    );

    let report = converter
        .convert(
            &config.source_playlist_id,
            &config.playlist_title,
            &config.playlist_description,
        )
        .await
        .inspect_err(|e| tracing::error!("Conversion failed: {e}"))?;

    log_report(&report);
    Ok(())
}

fn log_report(report: &ConversionReport) {
    tracing::info!(
        "Converted into YouTube playlist {}: {}/{} tracks added, {} points of quota used",
        report.playlist,
        report.added,
        report.processed,
        report.quota_used
    );
    for query in &report.unmatched {
        tracing::warn!("No match: {query}");
    }
    for (query, reason) in &report.failed {
        tracing::warn!("Failed: {query} ({reason})");
    }
}
