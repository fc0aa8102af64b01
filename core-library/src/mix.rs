//! Mix view composer: stored playlists, albums and artists merged into one
//! list and sorted by a key all three kinds share.

use crate::models::{Album, Artist, Playlist, Timestamp};
use crate::sort::{apply_direction, Collator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixSortType {
    #[default]
    CreateDate,
    LastUpdated,
    Name,
}

string_enum!(MixSortType, "mix_sort_type" {
    CreateDate => "create_date",
    LastUpdated => "last_updated",
    Name => "name",
});

/// One entry of the mix, borrowing the raw entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixEntry<'a> {
    Playlist(&'a Playlist),
    Album(&'a Album),
    Artist(&'a Artist),
}

impl<'a> MixEntry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            MixEntry::Playlist(playlist) => &playlist.id,
            MixEntry::Album(album) => &album.id,
            MixEntry::Artist(artist) => &artist.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            MixEntry::Playlist(playlist) => &playlist.name,
            MixEntry::Album(album) => &album.title,
            MixEntry::Artist(artist) => &artist.name,
        }
    }

    pub fn create_date(&self) -> Option<Timestamp> {
        match self {
            MixEntry::Playlist(playlist) => playlist.created_at,
            MixEntry::Album(album) => album.create_date(),
            MixEntry::Artist(artist) => artist.bookmarked_at,
        }
    }

    pub fn last_updated(&self) -> Option<Timestamp> {
        match self {
            MixEntry::Playlist(playlist) => playlist.last_update_time,
            MixEntry::Album(album) => album.last_update_time,
            MixEntry::Artist(artist) => artist.last_update_time,
        }
    }
}

/// Playlists first, then albums, then artists, each in input order. The
/// playlists are expected to be filtered already.
pub fn build_mix_entries<'a>(
    playlists: &[&'a Playlist],
    albums: &'a [Album],
    artists: &'a [Artist],
) -> Vec<MixEntry<'a>> {
    let mut entries = Vec::with_capacity(playlists.len() + albums.len() + artists.len());
    entries.extend(playlists.iter().map(|playlist| MixEntry::Playlist(*playlist)));
    entries.extend(albums.iter().map(MixEntry::Album));
    entries.extend(artists.iter().map(MixEntry::Artist));
    entries
}

pub fn sort_mix_entries(
    mut entries: Vec<MixEntry<'_>>,
    sort: MixSortType,
    descending: bool,
) -> Vec<MixEntry<'_>> {
    let collator = Collator::primary();
    match sort {
        MixSortType::CreateDate => entries.sort_by_key(|entry| entry.create_date()),
        MixSortType::LastUpdated => entries.sort_by_key(|entry| entry.last_updated()),
        MixSortType::Name => entries.sort_by(|a, b| collator.compare(a.name(), b.name())),
    }
    apply_direction(entries, descending)
}
