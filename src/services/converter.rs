use crate::domain::playlist::PlaylistHandle;
use crate::domain::track::TrackQuery;
use crate::infrastructure::throttle::Throttle;
use crate::ports::destination::MediaService;
use crate::ports::source::PlaylistSource;
use crate::services::error::ConversionError;
use crate::services::reader::SourceTrackReader;
use crate::services::writer::{AddOutcome, DestinationWriter};

#[derive(Debug)]
pub struct ConversionReport {
    pub playlist: PlaylistHandle,
    pub processed: usize,
    pub added: usize,
    pub unmatched: Vec<TrackQuery>,
    pub failed: Vec<(TrackQuery, String)>,
    pub quota_used: u64,
}

/// Copies one source playlist into a new destination playlist, one track
/// at a time.
pub struct PlaylistConverter<S, M, T> {
    reader: SourceTrackReader<S>,
    writer: DestinationWriter<M>,
    throttle: T,
}

impl<S, M, T> PlaylistConverter<S, M, T>
where
    S: PlaylistSource,
    M: MediaService,
    T: Throttle,
{
    pub fn new(reader: SourceTrackReader<S>, writer: DestinationWriter<M>, throttle: T) -> Self {
        Self {
            reader,
            writer,
            throttle,
        }
    }

    pub async fn convert(
        &mut self,
        source_playlist_id: &str,
        title: &str,
        description: &str,
    ) -> Result<ConversionReport, ConversionError> {
        let tracks = self.reader.get_playlist_tracks(source_playlist_id).await;
        if tracks.is_empty() {
            return Err(ConversionError::NoTracks(source_playlist_id.to_string()));
        }

        let playlist = self
            .writer
            .create_playlist(title, description)
            .await
            .map_err(ConversionError::Provision)?;

        tracing::info!("Processing {} tracks from the Spotify playlist.", tracks.len());

        let mut report = ConversionReport {
            playlist,
            processed: 0,
            added: 0,
            unmatched: Vec::new(),
            failed: Vec::new(),
            quota_used: 0,
        };

        let total = tracks.len();
        for (i, track) in tracks.into_iter().enumerate() {
            tracing::info!("Processing track {}/{total}: {track}", i + 1);

            let outcome = self.writer.search_and_add(&track, &report.playlist).await;
            tracing::debug!("Track {} cost {}", i + 1, outcome.cost());
            match outcome {
                AddOutcome::Added { item_id } => {
                    tracing::debug!("'{track}' matched video {item_id}");
                    report.added += 1;
                }
                AddOutcome::NoMatch => report.unmatched.push(track),
                AddOutcome::SearchFailed { reason } => report.failed.push((track, reason)),
                AddOutcome::AppendFailed { item_id, reason } => {
                    report.failed.push((track, format!("{item_id}: {reason}")))
                }
            }
            report.processed += 1;

            if i + 1 < total {
                self.throttle.wait().await;
            }
        }

        report.quota_used = self.writer.total_quota_usage();
        tracing::info!("Total YouTube API quota used: {} points", report.quota_used);

        Ok(report)
    }
}
