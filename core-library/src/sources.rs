//! Collaborator traits for the entity store and the download tracker.
//!
//! Both hand out full snapshots, never deltas. [`refresh_from_sources`]
//! pulls every collection concurrently and publishes each one into the
//! engine.

use crate::engine::SnapshotPublisher;
use crate::error::{LibraryError, Result};
use crate::models::{
    Album, Artist, DownloadStates, DownloadedSong, Playlist, PlaylistSongMap, Song, SongArtistMap,
};
use crate::snapshot::SnapshotUpdate;
use async_trait::async_trait;
use core_runtime::events::SnapshotSource;
use tracing::{debug, instrument, warn};

/// Persistent library collections.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn songs(&self) -> Result<Vec<Song>>;

    async fn albums(&self) -> Result<Vec<Album>>;

    async fn artists(&self) -> Result<Vec<Artist>>;

    async fn playlists(&self) -> Result<Vec<Playlist>>;

    /// Membership rows of every playlist
    async fn playlist_song_maps(&self) -> Result<Vec<PlaylistSongMap>>;

    async fn song_artist_maps(&self) -> Result<Vec<SongArtistMap>>;
}

/// Live and finished downloads.
#[async_trait]
pub trait DownloadTracker: Send + Sync {
    /// Status of every song with a live download entry
    async fn download_states(&self) -> Result<DownloadStates>;

    async fn downloaded_songs(&self) -> Result<Vec<DownloadedSong>>;
}

/// Pull every collection and publish the ones that loaded.
///
/// Fetches run concurrently. Successful snapshots are published even when
/// another source fails; the first failure is then returned as
/// [`LibraryError::Source`]. Returns the generation after the last publish.
///
/// # Errors
///
/// [`LibraryError::EngineClosed`] aborts immediately. A failing source is
/// reported after the others were published.
#[instrument(skip_all)]
pub async fn refresh_from_sources(
    publisher: &SnapshotPublisher,
    store: &dyn EntityStore,
    tracker: &dyn DownloadTracker,
) -> Result<u64> {
    let (
        songs,
        albums,
        artists,
        playlists,
        playlist_song_maps,
        song_artist_maps,
        download_states,
        downloaded_songs,
    ) = futures::join!(
        store.songs(),
        store.albums(),
        store.artists(),
        store.playlists(),
        store.playlist_song_maps(),
        store.song_artist_maps(),
        tracker.download_states(),
        tracker.downloaded_songs(),
    );

    let fetched = [
        (SnapshotSource::Songs, songs.map(SnapshotUpdate::Songs)),
        (SnapshotSource::Albums, albums.map(SnapshotUpdate::Albums)),
        (SnapshotSource::Artists, artists.map(SnapshotUpdate::Artists)),
        (SnapshotSource::Playlists, playlists.map(SnapshotUpdate::Playlists)),
        (
            SnapshotSource::PlaylistSongMaps,
            playlist_song_maps.map(SnapshotUpdate::PlaylistSongMaps),
        ),
        (
            SnapshotSource::SongArtistMaps,
            song_artist_maps.map(SnapshotUpdate::SongArtistMaps),
        ),
        (SnapshotSource::DownloadStates, download_states.map(SnapshotUpdate::DownloadStates)),
        (
            SnapshotSource::DownloadedSongs,
            downloaded_songs.map(SnapshotUpdate::DownloadedSongs),
        ),
    ];

    let mut generation = publisher.snapshot().generation();
    let mut failure: Option<LibraryError> = None;

    for (source, result) in fetched {
        match result {
            Ok(update) => {
                generation = publisher.publish(update)?;
            }
            Err(err) => {
                warn!(source = %source, error = %err, "Snapshot source failed");
                if failure.is_none() {
                    failure = Some(as_source_error(source, err));
                }
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => {
            debug!(generation, "Refreshed all sources");
            Ok(generation)
        }
    }
}

fn as_source_error(source: SnapshotSource, err: LibraryError) -> LibraryError {
    match err {
        LibraryError::Source { .. } => err,
        other => LibraryError::Source {
            source_name: source.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ViewEngine;
    use crate::models::{DownloadState, DownloadStatus};
    use core_runtime::config::EngineConfig;
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl EntityStore for Store {
            async fn songs(&self) -> Result<Vec<Song>>;
            async fn albums(&self) -> Result<Vec<Album>>;
            async fn artists(&self) -> Result<Vec<Artist>>;
            async fn playlists(&self) -> Result<Vec<Playlist>>;
            async fn playlist_song_maps(&self) -> Result<Vec<PlaylistSongMap>>;
            async fn song_artist_maps(&self) -> Result<Vec<SongArtistMap>>;
        }
    }

    mock! {
        pub Tracker {}

        #[async_trait]
        impl DownloadTracker for Tracker {
            async fn download_states(&self) -> Result<DownloadStates>;
            async fn downloaded_songs(&self) -> Result<Vec<DownloadedSong>>;
        }
    }

    fn store_with_songs(songs: Vec<Song>) -> MockStore {
        let mut store = MockStore::new();
        store.expect_songs().times(1).return_once(move || Ok(songs));
        store.expect_albums().times(1).returning(|| Ok(Vec::new()));
        store.expect_artists().times(1).returning(|| Ok(Vec::new()));
        store.expect_playlists().times(1).returning(|| Ok(Vec::new()));
        store
            .expect_playlist_song_maps()
            .times(1)
            .returning(|| Ok(Vec::new()));
        store
            .expect_song_artist_maps()
            .times(1)
            .returning(|| Ok(Vec::new()));
        store
    }

    #[tokio::test]
    async fn test_refresh_publishes_every_source() {
        let engine = ViewEngine::start(EngineConfig::default()).unwrap();
        let store = store_with_songs(vec![Song::new("s1", "One")]);

        let mut tracker = MockTracker::new();
        tracker.expect_download_states().times(1).returning(|| {
            Ok([("s1".to_string(), DownloadState::new(DownloadStatus::Queued))]
                .into_iter()
                .collect())
        });
        tracker
            .expect_downloaded_songs()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let generation = refresh_from_sources(&engine.publisher(), &store, &tracker)
            .await
            .unwrap();
        assert_eq!(generation, 8);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.songs.len(), 1);
        assert_eq!(snapshot.download_states.len(), 1);
        assert_eq!(snapshot.version(SnapshotSource::DownloadedSongs), 1);

        engine.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_source_reported_after_others_publish() {
        let engine = ViewEngine::start(EngineConfig::default()).unwrap();
        let store = store_with_songs(vec![Song::new("s1", "One")]);

        let mut tracker = MockTracker::new();
        tracker.expect_download_states().times(1).returning(|| {
            Err(LibraryError::InvalidInput {
                field: "status".to_string(),
                message: "corrupt row".to_string(),
            })
        });
        tracker
            .expect_downloaded_songs()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let err = refresh_from_sources(&engine.publisher(), &store, &tracker)
            .await
            .unwrap_err();
        match err {
            LibraryError::Source { source_name, message } => {
                assert_eq!(source_name, "download_states");
                assert!(message.contains("corrupt row"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.songs.len(), 1);
        assert_eq!(snapshot.version(SnapshotSource::DownloadStates), 0);
        assert_eq!(snapshot.version(SnapshotSource::DownloadedSongs), 1);
        assert_eq!(snapshot.generation(), 7);

        engine.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_into_closed_engine() {
        let engine = ViewEngine::start(EngineConfig::default()).unwrap();
        let publisher = engine.publisher();
        engine.shutdown().await.unwrap();

        let store = store_with_songs(Vec::new());
        let mut tracker = MockTracker::new();
        tracker
            .expect_download_states()
            .returning(|| Ok(DownloadStates::new()));
        tracker.expect_downloaded_songs().returning(|| Ok(Vec::new()));

        let err = refresh_from_sources(&publisher, &store, &tracker)
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::EngineClosed));
    }
}
