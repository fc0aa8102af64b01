//! Joins between the song snapshot and the album, artist and playlist
//! snapshots.
//!
//! Everything here borrows from the input snapshots; nothing is cloned until a
//! view row is materialized.

use crate::identity::{resolve_artist_key, ArtistKey};
use crate::models::{Artist, PlaylistSongMap, Song, SongArtistMap};
use crate::normalize::{is_blank, name_key};
use std::collections::{HashMap, HashSet};

/// Song count and cumulative play time attributed to one artist or album.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtistAggregate {
    pub song_count: u32,
    /// Milliseconds
    pub play_time: u64,
}

impl ArtistAggregate {
    fn add(&mut self, song: &Song) {
        self.song_count += 1;
        self.play_time += song.total_play_time;
    }
}

/// Per-artist aggregates held in two independent maps.
///
/// A song lands in exactly one map, chosen by [`resolve_artist_key`]. Lookups
/// check the id map first and only consult the name map when the id is
/// absent, so the maps are never merged.
#[derive(Debug, Clone, Default)]
pub struct ArtistStats {
    by_id: HashMap<String, ArtistAggregate>,
    by_name: HashMap<String, ArtistAggregate>,
}

impl ArtistStats {
    pub fn build(songs: &[Song]) -> Self {
        let mut stats = Self::default();
        for song in songs {
            match resolve_artist_key(song) {
                ArtistKey::Id(id) => stats.by_id.entry(id).or_default().add(song),
                ArtistKey::NameKey(key) => stats.by_name.entry(key).or_default().add(song),
                ArtistKey::Unresolved => {}
            }
        }
        stats
    }

    /// Aggregate for an artist entity: id map, then lowercased name, else zero.
    pub fn lookup(&self, artist: &Artist) -> ArtistAggregate {
        self.by_id
            .get(&artist.id)
            .or_else(|| self.by_name.get(&name_key(&artist.name)))
            .copied()
            .unwrap_or_default()
    }

    pub fn by_id(&self, artist_id: &str) -> Option<ArtistAggregate> {
        self.by_id.get(artist_id).copied()
    }

    /// `name` is lowercased before probing.
    pub fn by_name(&self, name: &str) -> Option<ArtistAggregate> {
        self.by_name.get(&name_key(name)).copied()
    }
}

/// Songs grouped by non-blank album id, in snapshot order within each group.
pub fn songs_by_album(songs: &[Song]) -> HashMap<&str, Vec<&Song>> {
    let mut groups: HashMap<&str, Vec<&Song>> = HashMap::new();
    for song in songs {
        if let Some(album_id) = song.album_id.as_deref() {
            if !is_blank(Some(album_id)) {
                groups.entry(album_id).or_default().push(song);
            }
        }
    }
    groups
}

/// Aggregates computed per album from its grouped songs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumAggregate {
    /// Songs of the album known locally
    pub local_song_count: u32,
    /// Milliseconds
    pub play_time: u64,
    /// Artist name of the first song, empty when unknown
    pub artist_name: String,
}

pub fn album_aggregates<'a>(
    songs_by_album: &HashMap<&'a str, Vec<&Song>>,
) -> HashMap<&'a str, AlbumAggregate> {
    songs_by_album
        .iter()
        .map(|(album_id, songs)| {
            let aggregate = AlbumAggregate {
                local_song_count: songs.len() as u32,
                play_time: songs.iter().map(|song| song.total_play_time).sum(),
                artist_name: songs
                    .first()
                    .and_then(|song| song.artist_name.clone())
                    .unwrap_or_default(),
            };
            (*album_id, aggregate)
        })
        .collect()
}

/// Playlist membership rows grouped by playlist and ordered by position.
#[derive(Debug, Clone, Default)]
pub struct PlaylistMembership<'a> {
    song_ids: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> PlaylistMembership<'a> {
    pub fn build(maps: &'a [PlaylistSongMap]) -> Self {
        let mut grouped: HashMap<&'a str, Vec<&'a PlaylistSongMap>> = HashMap::new();
        for map in maps {
            grouped.entry(map.playlist_id.as_str()).or_default().push(map);
        }

        let song_ids = grouped
            .into_iter()
            .map(|(playlist_id, mut rows)| {
                rows.sort_by_key(|row| row.position);
                let ids = rows.into_iter().map(|row| row.song_id.as_str()).collect();
                (playlist_id, ids)
            })
            .collect();

        Self { song_ids }
    }

    /// Song ids of a playlist in position order; empty when unknown.
    pub fn song_ids(&self, playlist_id: &str) -> &[&'a str] {
        self.song_ids
            .get(playlist_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Songs of a playlist in position order, skipping ids missing from the
    /// song snapshot.
    pub fn songs<'s>(
        &self,
        playlist_id: &str,
        songs_by_id: &HashMap<&str, &'s Song>,
    ) -> Vec<&'s Song> {
        self.song_ids(playlist_id)
            .iter()
            .filter_map(|id| songs_by_id.get(id).copied())
            .collect()
    }
}

pub fn songs_by_id(songs: &[Song]) -> HashMap<&str, &Song> {
    songs.iter().map(|song| (song.id.as_str(), song)).collect()
}

/// Song count per artist id for the mix view: songs linked through a
/// [`SongArtistMap`] row plus songs whose artist name matches the artist's
/// name case-insensitively. A song matching both ways counts once.
pub fn linked_song_counts(
    artists: &[Artist],
    songs: &[Song],
    song_artist_maps: &[SongArtistMap],
) -> HashMap<String, u32> {
    let known: HashSet<&str> = songs.iter().map(|song| song.id.as_str()).collect();

    let mut linked: HashMap<&str, HashSet<&str>> = HashMap::new();
    for map in song_artist_maps {
        if known.contains(map.song_id.as_str()) {
            linked
                .entry(map.artist_id.as_str())
                .or_default()
                .insert(map.song_id.as_str());
        }
    }

    let mut by_name: HashMap<String, Vec<&str>> = HashMap::new();
    for song in songs {
        if let Some(name) = song.artist_name.as_deref() {
            if !is_blank(Some(name)) {
                by_name.entry(name_key(name)).or_default().push(song.id.as_str());
            }
        }
    }

    artists
        .iter()
        .map(|artist| {
            let mut ids: HashSet<&str> = linked.get(artist.id.as_str()).cloned().unwrap_or_default();
            if let Some(named) = by_name.get(&name_key(&artist.name)) {
                ids.extend(named.iter().copied());
            }
            (artist.id.clone(), ids.len() as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, artist_id: Option<&str>, artist_name: Option<&str>, play: u64) -> Song {
        Song {
            artist_id: artist_id.map(str::to_string),
            artist_name: artist_name.map(str::to_string),
            total_play_time: play,
            ..Song::new(id, id)
        }
    }

    fn in_album(mut song: Song, album_id: &str) -> Song {
        song.album_id = Some(album_id.to_string());
        song
    }

    #[test]
    fn test_songs_by_album_skips_blank_ids_and_keeps_order() {
        let songs = vec![
            in_album(song("s1", None, Some("A"), 1), "al1"),
            in_album(song("s2", None, Some("B"), 2), " "),
            song("s3", None, None, 3),
            in_album(song("s4", None, Some("C"), 4), "al1"),
        ];

        let groups = songs_by_album(&songs);
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups["al1"].iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s4"]);
    }

    #[test]
    fn test_album_aggregates() {
        let songs = vec![
            in_album(song("s1", None, Some("First"), 100), "al1"),
            in_album(song("s2", None, Some("Second"), 50), "al1"),
            in_album(song("s3", None, None, 7), "al2"),
        ];
        let groups = songs_by_album(&songs);
        let aggregates = album_aggregates(&groups);

        assert_eq!(aggregates["al1"].play_time, 150);
        assert_eq!(aggregates["al1"].local_song_count, 2);
        assert_eq!(aggregates["al1"].artist_name, "First");
        assert_eq!(aggregates["al2"].artist_name, "");
    }

    #[test]
    fn test_artist_stats_no_double_counting() {
        let songs = vec![
            song("s1", Some("UC1"), Some("Daft Punk"), 10),
            song("s2", Some("UC1"), None, 20),
            song("s3", None, Some("daft punk"), 5),
            song("s4", None, None, 99),
        ];
        let stats = ArtistStats::build(&songs);

        assert_eq!(
            stats.by_id("UC1"),
            Some(ArtistAggregate {
                song_count: 2,
                play_time: 30
            })
        );
        // s1 carries a name too but only counts under its id
        assert_eq!(
            stats.by_name("Daft Punk"),
            Some(ArtistAggregate {
                song_count: 1,
                play_time: 5
            })
        );
    }

    #[test]
    fn test_artist_lookup_precedence() {
        let songs = vec![
            song("s1", Some("UC1"), None, 10),
            song("s2", None, Some("Daft Punk"), 5),
        ];
        let stats = ArtistStats::build(&songs);

        // Id present: name map is not consulted
        let by_id = stats.lookup(&Artist::new("UC1", "Daft Punk"));
        assert_eq!(by_id.song_count, 1);
        assert_eq!(by_id.play_time, 10);

        // Id absent: falls back to name
        let by_name = stats.lookup(&Artist::new("UC9", "DAFT PUNK"));
        assert_eq!(by_name.song_count, 1);
        assert_eq!(by_name.play_time, 5);

        // Both miss
        assert_eq!(
            stats.lookup(&Artist::new("UC7", "Nobody")),
            ArtistAggregate::default()
        );
    }

    #[test]
    fn test_playlist_membership_orders_by_position() {
        let maps = vec![
            PlaylistSongMap::new("p1", "s3", 2),
            PlaylistSongMap::new("p1", "s2", 0),
            PlaylistSongMap::new("p2", "s1", 0),
            PlaylistSongMap::new("p1", "missing", 1),
        ];
        let songs = vec![
            song("s1", None, None, 0),
            song("s2", None, None, 0),
            song("s3", None, None, 0),
        ];
        let membership = PlaylistMembership::build(&maps);
        let by_id = songs_by_id(&songs);

        assert_eq!(membership.song_ids("p1"), &["s2", "missing", "s3"]);
        assert!(membership.song_ids("nope").is_empty());

        let resolved: Vec<&str> = membership
            .songs("p1", &by_id)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(resolved, vec!["s2", "s3"]);
    }

    #[test]
    fn test_linked_song_counts() {
        let artists = vec![Artist::new("UC1", "Daft Punk"), Artist::new("UC2", "Air")];
        let songs = vec![
            song("s1", Some("UC1"), Some("Daft Punk"), 0),
            song("s2", None, Some("daft punk"), 0),
            song("s3", None, Some("Other"), 0),
        ];
        let maps = vec![
            SongArtistMap {
                song_id: "s1".to_string(),
                artist_id: "UC1".to_string(),
                position: 0,
            },
            SongArtistMap {
                song_id: "s3".to_string(),
                artist_id: "UC2".to_string(),
                position: 1,
            },
            SongArtistMap {
                song_id: "unknown".to_string(),
                artist_id: "UC2".to_string(),
                position: 0,
            },
        ];

        let counts = linked_song_counts(&artists, &songs, &maps);
        assert_eq!(counts["UC1"], 2);
        assert_eq!(counts["UC2"], 1);
    }
}
