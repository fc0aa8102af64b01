//! Artist attribution for songs.
//!
//! A song is attributed by artist id when it has one, otherwise by the
//! lowercased artist name. Two distinct artists sharing a name
//! case-insensitively cannot be told apart on the name path.

use crate::models::{Artist, Song};
use crate::normalize::{is_blank, name_key};

/// Resolution key for artist attribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtistKey {
    Id(String),
    NameKey(String),
    Unresolved,
}

/// Resolve the artist attribution key of a song.
pub fn resolve_artist_key(song: &Song) -> ArtistKey {
    let artist_id = song.artist_id.as_deref();
    let artist_name = song.artist_name.as_deref();
    match (artist_id, artist_name) {
        (Some(id), _) if !is_blank(artist_id) => ArtistKey::Id(id.to_string()),
        (_, Some(name)) if !is_blank(artist_name) => ArtistKey::NameKey(name_key(name)),
        _ => ArtistKey::Unresolved,
    }
}

/// Whether `song` is attributed to `artist` under the same precedence the
/// aggregates use: id when the song has one, else a case-insensitive name.
pub fn song_belongs_to(song: &Song, artist: &Artist) -> bool {
    match resolve_artist_key(song) {
        ArtistKey::Id(id) => id == artist.id,
        ArtistKey::NameKey(key) => key == name_key(&artist.name),
        ArtistKey::Unresolved => false,
    }
}
