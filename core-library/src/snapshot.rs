//! Versioned set of input snapshots.
//!
//! Each collection is an immutable `Arc` that is swapped wholesale. A
//! recompute clones the set (a handful of reference-count bumps) and reads a
//! consistent view of every input, however fast the sources keep changing.

use crate::models::{
    Album, Artist, DownloadStates, DownloadedSong, Playlist, PlaylistSongMap, Song, SongArtistMap,
};
use crate::preferences::LibraryPreferences;
use core_runtime::events::SnapshotSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Full replacement of one input collection.
#[derive(Debug, Clone)]
pub enum SnapshotUpdate {
    Songs(Vec<Song>),
    Albums(Vec<Album>),
    Artists(Vec<Artist>),
    Playlists(Vec<Playlist>),
    PlaylistSongMaps(Vec<PlaylistSongMap>),
    SongArtistMaps(Vec<SongArtistMap>),
    DownloadStates(DownloadStates),
    DownloadedSongs(Vec<DownloadedSong>),
    Preferences(LibraryPreferences),
}

impl SnapshotUpdate {
    pub fn source(&self) -> SnapshotSource {
        match self {
            SnapshotUpdate::Songs(_) => SnapshotSource::Songs,
            SnapshotUpdate::Albums(_) => SnapshotSource::Albums,
            SnapshotUpdate::Artists(_) => SnapshotSource::Artists,
            SnapshotUpdate::Playlists(_) => SnapshotSource::Playlists,
            SnapshotUpdate::PlaylistSongMaps(_) => SnapshotSource::PlaylistSongMaps,
            SnapshotUpdate::SongArtistMaps(_) => SnapshotSource::SongArtistMaps,
            SnapshotUpdate::DownloadStates(_) => SnapshotSource::DownloadStates,
            SnapshotUpdate::DownloadedSongs(_) => SnapshotSource::DownloadedSongs,
            SnapshotUpdate::Preferences(_) => SnapshotSource::Preferences,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotSet {
    pub songs: Arc<Vec<Song>>,
    pub albums: Arc<Vec<Album>>,
    pub artists: Arc<Vec<Artist>>,
    pub playlists: Arc<Vec<Playlist>>,
    pub playlist_song_maps: Arc<Vec<PlaylistSongMap>>,
    pub song_artist_maps: Arc<Vec<SongArtistMap>>,
    pub download_states: Arc<DownloadStates>,
    pub downloaded_songs: Arc<Vec<DownloadedSong>>,
    pub preferences: Arc<LibraryPreferences>,
    generation: u64,
    versions: HashMap<SnapshotSource, u64>,
}

impl SnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every replacement; zero for the initial empty set.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of times `source` was replaced.
    pub fn version(&self, source: SnapshotSource) -> u64 {
        self.versions.get(&source).copied().unwrap_or(0)
    }

    /// Swap one collection and return the new generation.
    pub fn replace(&mut self, update: SnapshotUpdate) -> u64 {
        let source = update.source();
        match update {
            SnapshotUpdate::Songs(v) => self.songs = Arc::new(v),
            SnapshotUpdate::Albums(v) => self.albums = Arc::new(v),
            SnapshotUpdate::Artists(v) => self.artists = Arc::new(v),
            SnapshotUpdate::Playlists(v) => self.playlists = Arc::new(v),
            SnapshotUpdate::PlaylistSongMaps(v) => self.playlist_song_maps = Arc::new(v),
            SnapshotUpdate::SongArtistMaps(v) => self.song_artist_maps = Arc::new(v),
            SnapshotUpdate::DownloadStates(v) => self.download_states = Arc::new(v),
            SnapshotUpdate::DownloadedSongs(v) => self.downloaded_songs = Arc::new(v),
            SnapshotUpdate::Preferences(v) => self.preferences = Arc::new(v),
        }
        *self.versions.entry(source).or_insert(0) += 1;
        self.generation += 1;
        self.generation
    }
}
