//! Filter engine: pure predicates selecting subsets of the raw snapshots.
//!
//! Every function keeps the input order and is idempotent, so filtering an
//! already filtered list returns it unchanged.

use crate::models::{Album, Artist, Playlist, Song};
use crate::normalize::fold_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Browse ids of remote system playlists that never appear in the library.
pub const SPECIAL_REMOTE_PLAYLIST_IDS: [&str; 2] = ["LM", "SE"];

/// Folded names of the auto-generated cache playlist.
pub const CACHED_PLAYLIST_NAMES: [&str; 2] = ["en cache", "cached"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongFilter {
    Liked,
    #[default]
    Library,
    Downloaded,
}

string_enum!(SongFilter, "song_filter" {
    Liked => "liked",
    Library => "library",
    Downloaded => "downloaded",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumFilter {
    Liked,
    #[default]
    Library,
}

string_enum!(AlbumFilter, "album_filter" {
    Liked => "liked",
    Library => "library",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistFilter {
    Liked,
    #[default]
    Library,
}

string_enum!(ArtistFilter, "artist_filter" {
    Liked => "liked",
    Library => "library",
});

/// Songs matching `filter`: liked flag, library timestamp, or membership in
/// `downloaded_ids`.
pub fn filter_songs<'a, I>(songs: I, filter: SongFilter, downloaded_ids: &HashSet<&str>) -> Vec<&'a Song>
where
    I: IntoIterator<Item = &'a Song>,
{
    songs
        .into_iter()
        .filter(|song| match filter {
            SongFilter::Liked => song.liked,
            SongFilter::Library => song.in_library.is_some(),
            SongFilter::Downloaded => downloaded_ids.contains(song.id.as_str()),
        })
        .collect()
}

/// Liked albums are bookmarked ones; library albums carry a library date.
pub fn filter_albums<'a, I>(albums: I, filter: AlbumFilter) -> Vec<&'a Album>
where
    I: IntoIterator<Item = &'a Album>,
{
    albums
        .into_iter()
        .filter(|album| match filter {
            AlbumFilter::Liked => album.bookmarked_at.is_some(),
            AlbumFilter::Library => album.in_library.is_some(),
        })
        .collect()
}

/// Liked artists are followed ones; the library filter keeps every artist.
pub fn filter_artists<'a, I>(artists: I, filter: ArtistFilter) -> Vec<&'a Artist>
where
    I: IntoIterator<Item = &'a Artist>,
{
    artists
        .into_iter()
        .filter(|artist| match filter {
            ArtistFilter::Liked => artist.is_followed(),
            ArtistFilter::Library => true,
        })
        .collect()
}

pub fn is_special_remote_playlist(playlist: &Playlist) -> bool {
    SPECIAL_REMOTE_PLAYLIST_IDS.contains(&playlist.effective_id())
}

pub fn is_cached_name(name: &str) -> bool {
    let folded = fold_name(name);
    CACHED_PLAYLIST_NAMES.contains(&folded.as_str())
}

/// True for the remote system playlists and for the cache playlist,
/// whatever its case or accents.
pub fn is_reserved_system_playlist(playlist: &Playlist) -> bool {
    is_special_remote_playlist(playlist) || is_cached_name(&playlist.name)
}

/// Playlists for the library listing. System playlists are always dropped;
/// the cache playlist is kept only when `show_cached` is set.
pub fn filter_library_playlists<'a, I>(playlists: I, show_cached: bool) -> Vec<&'a Playlist>
where
    I: IntoIterator<Item = &'a Playlist>,
{
    playlists
        .into_iter()
        .filter(|playlist| !is_special_remote_playlist(playlist))
        .filter(|playlist| show_cached || !is_cached_name(&playlist.name))
        .collect()
}
