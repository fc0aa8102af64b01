//! Sort engine.
//!
//! Every sort runs ascending with a stable sort, so equal keys keep their
//! input order, and descending order reverses the whole ascending result.
//! `sort(S, key, true) == reverse(sort(S, key, false))` holds exactly,
//! including the adjacency of tied items.
//!
//! Names compare through [`Collator`] at primary strength; missing
//! timestamps sort as the earliest possible value and a missing album year
//! sorts as year zero.

use crate::join::{AlbumAggregate, ArtistStats};
use crate::models::{Album, Artist, Song};
use crate::normalize::strip_marks;
use crate::playlists::LibraryPlaylist;
use icu_collator::{CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Locale collation at primary strength: case and accents are ignored.
///
/// Orders by the root collation data compiled into `icu_collator`, so letters
/// without a canonical decomposition (`Æ`, `Ø`, `Ł`) sort among their base
/// letters instead of after `z`. When the collation data cannot be loaded,
/// names compare by their folded form.
pub struct Collator {
    inner: Option<icu_collator::Collator>,
}

impl Collator {
    pub fn primary() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);
        let inner = match icu_collator::Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                warn!(error = %err, "Collation data unavailable, comparing folded names");
                None
            }
        };
        Self { inner }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.inner {
            Some(collator) => collator.compare(a, b),
            None => fold(a).cmp(&fold(b)),
        }
    }
}

impl fmt::Debug for Collator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collator")
            .field("locale_data", &self.inner.is_some())
            .finish()
    }
}

fn fold(value: &str) -> String {
    strip_marks(value).to_lowercase()
}

/// Apply the descending policy to an ascending result.
pub fn apply_direction<T>(mut items: Vec<T>, descending: bool) -> Vec<T> {
    if descending {
        items.reverse();
    }
    items
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongSortType {
    #[default]
    CreateDate,
    Name,
    Artist,
    PlayTime,
}

string_enum!(SongSortType, "song_sort_type" {
    CreateDate => "create_date",
    Name => "name",
    Artist => "artist",
    PlayTime => "play_time",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistSortType {
    #[default]
    CreateDate,
    Name,
    SongCount,
    LastUpdated,
}

string_enum!(PlaylistSortType, "playlist_sort_type" {
    CreateDate => "create_date",
    Name => "name",
    SongCount => "song_count",
    LastUpdated => "last_updated",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumSortType {
    #[default]
    CreateDate,
    Name,
    Artist,
    Year,
    SongCount,
    Length,
    PlayTime,
}

string_enum!(AlbumSortType, "album_sort_type" {
    CreateDate => "create_date",
    Name => "name",
    Artist => "artist",
    Year => "year",
    SongCount => "song_count",
    Length => "length",
    PlayTime => "play_time",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistSortType {
    #[default]
    CreateDate,
    Name,
    SongCount,
    PlayTime,
}

string_enum!(ArtistSortType, "artist_sort_type" {
    CreateDate => "create_date",
    Name => "name",
    SongCount => "song_count",
    PlayTime => "play_time",
});

pub fn sort_songs<'a>(mut songs: Vec<&'a Song>, sort: SongSortType, descending: bool) -> Vec<&'a Song> {
    let collator = Collator::primary();
    match sort {
        SongSortType::CreateDate => songs.sort_by_key(|song| song.create_date()),
        SongSortType::Name => songs.sort_by(|a, b| collator.compare(&a.title, &b.title)),
        SongSortType::Artist => songs.sort_by(|a, b| {
            collator.compare(
                a.artist_name.as_deref().unwrap_or_default(),
                b.artist_name.as_deref().unwrap_or_default(),
            )
        }),
        SongSortType::PlayTime => songs.sort_by_key(|song| song.total_play_time),
    }
    apply_direction(songs, descending)
}

/// Album sorts. Artist and play time come from the per-album aggregates;
/// albums without local songs sort with an empty artist and zero play time.
pub fn sort_albums<'a>(
    mut albums: Vec<&'a Album>,
    sort: AlbumSortType,
    descending: bool,
    aggregates: &HashMap<&str, AlbumAggregate>,
) -> Vec<&'a Album> {
    let collator = Collator::primary();
    let aggregate = |album: &Album| aggregates.get(album.id.as_str());
    let artist_name = |album: &Album| aggregate(album).map_or("", |a| a.artist_name.as_str());
    match sort {
        AlbumSortType::CreateDate => albums.sort_by_key(|album| album.create_date()),
        AlbumSortType::Name => albums.sort_by(|a, b| collator.compare(&a.title, &b.title)),
        AlbumSortType::Artist => {
            albums.sort_by(|a, b| collator.compare(artist_name(a), artist_name(b)))
        }
        AlbumSortType::Year => albums.sort_by_key(|album| album.year.unwrap_or(0)),
        AlbumSortType::SongCount => albums.sort_by_key(|album| album.song_count),
        AlbumSortType::Length => albums.sort_by_key(|album| album.duration),
        AlbumSortType::PlayTime => {
            albums.sort_by_key(|album| aggregate(album).map_or(0, |a| a.play_time))
        }
    }
    apply_direction(albums, descending)
}

/// Artist sorts; create date is the follow date.
pub fn sort_artists<'a>(
    mut artists: Vec<&'a Artist>,
    sort: ArtistSortType,
    descending: bool,
    stats: &ArtistStats,
) -> Vec<&'a Artist> {
    let collator = Collator::primary();
    match sort {
        ArtistSortType::CreateDate => artists.sort_by_key(|artist| artist.bookmarked_at),
        ArtistSortType::Name => artists.sort_by(|a, b| collator.compare(&a.name, &b.name)),
        ArtistSortType::SongCount => artists.sort_by_key(|artist| stats.lookup(artist).song_count),
        ArtistSortType::PlayTime => artists.sort_by_key(|artist| stats.lookup(artist).play_time),
    }
    apply_direction(artists, descending)
}

/// Sorts real playlist rows. Auto-playlists never pass through here.
pub fn sort_playlists(
    mut playlists: Vec<LibraryPlaylist>,
    sort: PlaylistSortType,
    descending: bool,
) -> Vec<LibraryPlaylist> {
    let collator = Collator::primary();
    match sort {
        PlaylistSortType::CreateDate => playlists.sort_by_key(|row| row.created_at()),
        PlaylistSortType::Name => playlists.sort_by(|a, b| collator.compare(&a.name, &b.name)),
        PlaylistSortType::SongCount => playlists.sort_by_key(|row| row.song_count),
        PlaylistSortType::LastUpdated => playlists.sort_by_key(|row| row.last_updated()),
    }
    apply_direction(playlists, descending)
}
