//! Render-ready playlist rows for persisted and auto playlists.

use crate::auto_playlist::AutoPlaylistKind;
use crate::download::CollectionDownloadState;
use crate::join::PlaylistMembership;
use crate::models::{Playlist, Song, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of thumbnails sampled for a playlist cover.
pub const THUMBNAIL_SAMPLE_SIZE: usize = 4;

/// Identity of a playlist row. Auto-playlists live in their own variant, so
/// their fixed ids cannot collide with a stored playlist's id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PlaylistKey {
    Auto(AutoPlaylistKind),
    Stored(String),
}

impl PlaylistKey {
    /// Display id: the fixed synthetic id for auto-playlists.
    pub fn id(&self) -> &str {
        match self {
            PlaylistKey::Auto(kind) => kind.id(),
            PlaylistKey::Stored(id) => id,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, PlaylistKey::Auto(_))
    }
}

/// Derived playlist row with computed song count and cover sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPlaylist {
    pub key: PlaylistKey,
    pub name: String,
    pub song_count: u32,
    /// Up to four distinct thumbnail URLs
    pub thumbnails: Vec<String>,
    pub download_state: CollectionDownloadState,
    /// The stored playlist; `None` for auto-playlists
    pub playlist: Option<Playlist>,
}

impl LibraryPlaylist {
    pub fn is_auto(&self) -> bool {
        self.key.is_auto()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.playlist.as_ref().and_then(|p| p.created_at)
    }

    pub fn last_updated(&self) -> Option<Timestamp> {
        self.playlist.as_ref().and_then(|p| p.last_update_time)
    }
}

/// First distinct thumbnails of `songs`, capped at [`THUMBNAIL_SAMPLE_SIZE`].
/// Falls back to `fallback` as a single element when none is found.
pub fn sample_thumbnails<'a, I>(songs: I, fallback: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a Song>,
{
    let mut sample: Vec<String> = Vec::with_capacity(THUMBNAIL_SAMPLE_SIZE);
    for url in songs.into_iter().filter_map(|song| song.thumbnail_url.as_deref()) {
        if sample.len() == THUMBNAIL_SAMPLE_SIZE {
            break;
        }
        if !sample.iter().any(|seen| seen == url) {
            sample.push(url.to_string());
        }
    }

    if sample.is_empty() {
        fallback.map(|url| vec![url.to_string()]).unwrap_or_default()
    } else {
        sample
    }
}

/// Song count for a stored playlist: the local membership count when
/// non-zero, otherwise the remote count, otherwise zero.
pub fn effective_song_count(local_count: usize, playlist: &Playlist) -> u32 {
    if local_count > 0 {
        local_count as u32
    } else {
        playlist.remote_song_count.unwrap_or(0)
    }
}

/// Rows for stored playlists, in input order. Download state is left at
/// its default for the caller to reduce.
pub fn build_library_playlists(
    playlists: &[&Playlist],
    membership: &PlaylistMembership<'_>,
    songs_by_id: &HashMap<&str, &Song>,
) -> Vec<LibraryPlaylist> {
    playlists
        .iter()
        .map(|playlist| {
            let song_ids = membership.song_ids(&playlist.id);
            let songs = membership.songs(&playlist.id, songs_by_id);
            LibraryPlaylist {
                key: PlaylistKey::Stored(playlist.id.clone()),
                name: playlist.name.clone(),
                song_count: effective_song_count(song_ids.len(), playlist),
                thumbnails: sample_thumbnails(songs, playlist.thumbnail_url.as_deref()),
                download_state: CollectionDownloadState::default(),
                playlist: Some((*playlist).clone()),
            }
        })
        .collect()
}
