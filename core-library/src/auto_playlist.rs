//! Auto-playlist synthesizer.
//!
//! Liked, Downloaded and Top are never persisted. They are rebuilt from the
//! unfiltered song snapshot on every recompute and rendered as a fixed block
//! ahead of the stored playlists.

use crate::download::{resolve_collection_download_state, CollectionDownloadState};
use crate::models::{DownloadStates, DownloadedSong, Song};
use crate::playlists::{sample_thumbnails, LibraryPlaylist, PlaylistKey};
use crate::sort::{sort_songs, SongSortType};
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Number of songs in the Top playlist.
pub const TOP_PLAYLIST_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoPlaylistKind {
    Liked,
    Downloaded,
    Top,
}

string_enum!(AutoPlaylistKind, "auto_playlist" {
    Liked => "liked",
    Downloaded => "downloaded",
    Top => "top",
});

impl AutoPlaylistKind {
    pub const ALL: [AutoPlaylistKind; 3] = [
        AutoPlaylistKind::Liked,
        AutoPlaylistKind::Downloaded,
        AutoPlaylistKind::Top,
    ];

    /// Fixed synthetic playlist id.
    pub fn id(&self) -> &'static str {
        self.as_str()
    }
}

/// Liked songs in snapshot order.
pub fn liked_songs(songs: &[Song]) -> Vec<&Song> {
    songs.iter().filter(|song| song.liked).collect()
}

/// One song per finished download, in download-list order. Downloads whose
/// song is no longer known get a stand-in built from the download record.
pub fn downloaded_songs<'a>(
    songs_by_id: &HashMap<&str, &'a Song>,
    downloaded: &'a [DownloadedSong],
) -> Vec<Cow<'a, Song>> {
    downloaded
        .iter()
        .map(|entry| resolve_download(songs_by_id, entry))
        .collect()
}

/// Songs of the Downloaded library tab: every finished download, most
/// recently downloaded first. Orphans are kept as stand-ins.
pub fn downloaded_library_songs<'a>(
    songs_by_id: &HashMap<&str, &'a Song>,
    downloaded: &'a [DownloadedSong],
) -> Vec<Cow<'a, Song>> {
    let mut entries: Vec<&DownloadedSong> = downloaded.iter().collect();
    entries.sort_by_key(|entry| Reverse(entry.downloaded_at));
    entries
        .into_iter()
        .map(|entry| resolve_download(songs_by_id, entry))
        .collect()
}

fn resolve_download<'a>(
    songs_by_id: &HashMap<&str, &'a Song>,
    entry: &'a DownloadedSong,
) -> Cow<'a, Song> {
    match songs_by_id.get(entry.song_id.as_str()) {
        Some(song) => Cow::Borrowed(*song),
        None => Cow::Owned(entry.to_fallback_song()),
    }
}

/// The most played songs, most played first. Equal play times keep snapshot
/// order.
pub fn top_songs(songs: &[Song]) -> Vec<&Song> {
    let mut ranked: Vec<&Song> = songs.iter().collect();
    ranked.sort_by_key(|song| Reverse(song.total_play_time));
    ranked.truncate(TOP_PLAYLIST_SIZE);
    ranked
}

/// Songs of one auto-playlist.
pub fn auto_playlist_songs<'a>(
    kind: AutoPlaylistKind,
    songs: &'a [Song],
    songs_by_id: &HashMap<&str, &'a Song>,
    downloaded: &'a [DownloadedSong],
) -> Vec<Cow<'a, Song>> {
    match kind {
        AutoPlaylistKind::Liked => liked_songs(songs).into_iter().map(Cow::Borrowed).collect(),
        AutoPlaylistKind::Downloaded => downloaded_songs(songs_by_id, downloaded),
        AutoPlaylistKind::Top => top_songs(songs).into_iter().map(Cow::Borrowed).collect(),
    }
}

/// Row for an auto-playlist. The fallback thumbnail is used only when none
/// of the songs has one.
pub fn build_auto_playlist<S: Borrow<Song>>(
    kind: AutoPlaylistKind,
    name: &str,
    songs: &[S],
    fallback_thumbnail: Option<&str>,
) -> LibraryPlaylist {
    LibraryPlaylist {
        key: PlaylistKey::Auto(kind),
        name: name.to_string(),
        song_count: songs.len() as u32,
        thumbnails: sample_thumbnails(songs.iter().map(Borrow::<Song>::borrow), fallback_thumbnail),
        download_state: CollectionDownloadState::default(),
        playlist: None,
    }
}

/// Everything the detail screen of one auto-playlist shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPlaylistDetail {
    pub kind: AutoPlaylistKind,
    pub name: String,
    /// Songs after sorting and search
    pub songs: Vec<Song>,
    /// Seconds, over all songs regardless of the search
    pub total_duration: u64,
    /// Thumbnail of the first sorted song
    pub header_thumbnail: Option<String>,
    pub download_state: CollectionDownloadState,
}

/// Case-insensitive substring match on title or artist name. A blank query
/// matches everything; any other query is matched as typed, surrounding
/// whitespace included.
pub fn matches_query(song: &Song, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    song.title.to_lowercase().contains(&query)
        || song
            .artist_name
            .as_deref()
            .is_some_and(|artist| artist.to_lowercase().contains(&query))
}

#[allow(clippy::too_many_arguments)]
pub fn build_auto_playlist_detail(
    kind: AutoPlaylistKind,
    name: &str,
    songs: &[Cow<'_, Song>],
    sort: SongSortType,
    descending: bool,
    query: Option<&str>,
    states: &DownloadStates,
    downloaded_ids: &HashSet<&str>,
) -> AutoPlaylistDetail {
    let sorted = sort_songs(songs.iter().map(Borrow::<Song>::borrow).collect(), sort, descending);

    let total_duration = sorted.iter().map(|song| u64::from(song.duration)).sum();
    let header_thumbnail = sorted.first().and_then(|song| song.thumbnail_url.clone());
    let download_state = resolve_collection_download_state(
        sorted.iter().map(|song| song.id.as_str()),
        states,
        downloaded_ids,
    );

    let query = query.unwrap_or_default();
    let visible = sorted
        .into_iter()
        .filter(|song| matches_query(song, query))
        .cloned()
        .collect();

    AutoPlaylistDetail {
        kind,
        name: name.to_string(),
        songs: visible,
        total_duration,
        header_thumbnail,
        download_state,
    }
}
