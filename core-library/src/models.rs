//! Domain models for the music library
//!
//! Raw entities arrive as immutable snapshots from the entity store and the
//! download tracker. They are replaced wholesale, never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point in time attached to library entities.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// Raw Entities
// =============================================================================

/// Song known to the local library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Primary artist reference, may be blank
    pub artist_id: Option<String>,
    /// Primary artist display name, may be blank
    pub artist_name: Option<String>,
    /// Album reference, may be blank
    pub album_id: Option<String>,
    /// Cover art URL
    pub thumbnail_url: Option<String>,
    pub liked: bool,
    /// When the song was added to the library
    pub in_library: Option<Timestamp>,
    pub liked_date: Option<Timestamp>,
    pub date_modified: Option<Timestamp>,
    /// Accumulated listening time in milliseconds
    pub total_play_time: u64,
    /// Duration in seconds
    pub duration: u32,
}

impl Song {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Creation date used for ordering: library date, then liked date, then
    /// modification date.
    pub fn create_date(&self) -> Option<Timestamp> {
        self.in_library.or(self.liked_date).or(self.date_modified)
    }
}

/// Album with cached aggregate fields from the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    /// Cached track count
    pub song_count: u32,
    /// Cached total duration in seconds
    pub duration: u32,
    pub thumbnail_url: Option<String>,
    pub in_library: Option<Timestamp>,
    pub bookmarked_at: Option<Timestamp>,
    pub last_update_time: Option<Timestamp>,
}

impl Album {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn create_date(&self) -> Option<Timestamp> {
        self.in_library.or(self.bookmarked_at)
    }
}

/// Artist; `bookmarked_at` is set while the artist is followed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub bookmarked_at: Option<Timestamp>,
    pub last_update_time: Option<Timestamp>,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_followed(&self) -> bool {
        self.bookmarked_at.is_some()
    }
}

/// Persisted playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Remote identity, when the playlist mirrors a remote one
    pub browse_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub last_update_time: Option<Timestamp>,
    pub is_editable: bool,
    /// Song count reported by the remote side, used until membership syncs
    pub remote_song_count: Option<u32>,
    pub thumbnail_url: Option<String>,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            browse_id: None,
            created_at: None,
            last_update_time: None,
            is_editable: true,
            remote_song_count: None,
            thumbnail_url: None,
        }
    }

    /// Remote identity if present, otherwise the local id.
    pub fn effective_id(&self) -> &str {
        self.browse_id.as_deref().unwrap_or(&self.id)
    }
}

/// Playlist membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSongMap {
    pub playlist_id: String,
    pub song_id: String,
    pub position: u32,
}

impl PlaylistSongMap {
    pub fn new(playlist_id: impl Into<String>, song_id: impl Into<String>, position: u32) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            song_id: song_id.into(),
            position,
        }
    }
}

/// Song ↔ artist link for songs credited to several artists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongArtistMap {
    pub song_id: String,
    pub artist_id: String,
    pub position: u32,
}

/// A finished download; outlives the `Song` it was made from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedSong {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail_url: Option<String>,
    /// Duration in seconds
    pub duration: u32,
    pub downloaded_at: Timestamp,
}

impl DownloadedSong {
    /// Minimal stand-in song for a download whose `Song` is no longer known.
    pub fn to_fallback_song(&self) -> Song {
        Song {
            id: self.song_id.clone(),
            title: self.title.clone(),
            artist_name: Some(self.artist.clone()),
            thumbnail_url: self.thumbnail_url.clone(),
            duration: self.duration,
            date_modified: Some(self.downloaded_at),
            ..Song::default()
        }
    }
}

/// Live status reported by the download tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Queued,
    Downloading,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl DownloadStatus {
    /// Queued, downloading or paused.
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            DownloadStatus::Queued | DownloadStatus::Downloading | DownloadStatus::Paused
        )
    }

    /// Queued or downloading; a paused download is not actively transferring.
    pub fn is_active(self) -> bool {
        matches!(self, DownloadStatus::Queued | DownloadStatus::Downloading)
    }
}

/// Per-song entry in the live download map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadState {
    pub status: DownloadStatus,
    /// Fraction in `0.0..=1.0`
    pub progress: f32,
}

impl DownloadState {
    pub fn new(status: DownloadStatus) -> Self {
        Self {
            status,
            progress: 0.0,
        }
    }
}

/// Live download map keyed by song id
pub type DownloadStates = HashMap<String, DownloadState>;
