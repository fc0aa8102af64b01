//! Materialized library views.
//!
//! [`LibraryViews::compute`] is a pure function of one [`SnapshotSet`]: join,
//! filter, synthesize, sort and compose, in that order. The query helpers at
//! the bottom serve screens that need an extra argument (a playlist id, an
//! artist, a search string) and are evaluated against a snapshot on demand.

use crate::auto_playlist::{
    auto_playlist_songs, build_auto_playlist, build_auto_playlist_detail, downloaded_library_songs,
    AutoPlaylistDetail, AutoPlaylistKind,
};
use crate::download::{
    downloaded_ids, resolve_collection_download_action, resolve_collection_download_state,
    CollectionDownloadAction, CollectionDownloadState,
};
use crate::filter::{filter_albums, filter_artists, filter_library_playlists, filter_songs};
use crate::identity::song_belongs_to;
use crate::join::{
    album_aggregates, linked_song_counts, songs_by_album, songs_by_id, ArtistStats,
    PlaylistMembership,
};
use crate::mix::{build_mix_entries, sort_mix_entries, MixEntry};
use crate::models::{Album, Artist, Song};
use crate::playlists::{build_library_playlists, LibraryPlaylist};
use crate::snapshot::SnapshotSet;
use crate::sort::{sort_albums, sort_artists, sort_playlists, sort_songs, SongSortType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRow {
    pub album: Album,
    /// Songs of the album known locally
    pub song_count: u32,
    /// Milliseconds
    pub play_time: u64,
    pub artist_name: String,
    pub download_state: CollectionDownloadState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist: Artist,
    pub song_count: u32,
    /// Milliseconds
    pub play_time: u64,
}

/// Concrete row behind a mix entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MixRow {
    Playlist(LibraryPlaylist),
    Album(AlbumRow),
    Artist(ArtistRow),
}

impl MixRow {
    pub fn id(&self) -> &str {
        match self {
            MixRow::Playlist(row) => row.key.id(),
            MixRow::Album(row) => &row.album.id,
            MixRow::Artist(row) => &row.artist.id,
        }
    }
}

/// Every library screen's rows for one snapshot generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryViews {
    /// Generation of the snapshot set these rows were computed from
    pub generation: u64,
    pub songs: Vec<Song>,
    /// Downloaded tab: every finished download, newest first, orphans
    /// included
    pub downloaded: Vec<Song>,
    pub albums: Vec<AlbumRow>,
    pub artists: Vec<ArtistRow>,
    /// Enabled auto-playlists in fixed order, shown ahead of `playlists`
    pub auto_playlists: Vec<LibraryPlaylist>,
    pub playlists: Vec<LibraryPlaylist>,
    /// Sorted stored playlists, albums and artists; `auto_playlists` head
    /// the mix screen as well
    pub mix: Vec<MixRow>,
}

/// Indexes shared by every view of one snapshot.
struct Joined<'a> {
    by_id: HashMap<&'a str, &'a Song>,
    by_album: HashMap<&'a str, Vec<&'a Song>>,
    membership: PlaylistMembership<'a>,
    downloaded: HashSet<&'a str>,
}

impl<'a> Joined<'a> {
    fn new(set: &'a SnapshotSet) -> Self {
        Self {
            by_id: songs_by_id(&set.songs),
            by_album: songs_by_album(&set.songs),
            membership: PlaylistMembership::build(&set.playlist_song_maps),
            downloaded: downloaded_ids(&set.downloaded_songs),
        }
    }

    fn album_song_ids(&self, album_id: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.by_album
            .get(album_id)
            .into_iter()
            .flatten()
            .copied()
            .map(|song: &'a Song| song.id.as_str())
    }
}

impl LibraryViews {
    pub fn compute(set: &SnapshotSet) -> Self {
        let prefs = &*set.preferences;
        let joined = Joined::new(set);
        let states = &*set.download_states;

        let songs = sort_songs(
            filter_songs(set.songs.iter(), prefs.song_filter, &joined.downloaded),
            prefs.song_sort_type,
            prefs.song_sort_descending,
        )
        .into_iter()
        .cloned()
        .collect();

        let downloaded = downloaded_library_songs(&joined.by_id, &set.downloaded_songs)
            .into_iter()
            .map(Cow::into_owned)
            .collect();

        let aggregates = album_aggregates(&joined.by_album);
        let album_row = |album: &Album| {
            let aggregate = aggregates.get(album.id.as_str()).cloned().unwrap_or_default();
            AlbumRow {
                album: album.clone(),
                song_count: aggregate.local_song_count,
                play_time: aggregate.play_time,
                artist_name: aggregate.artist_name,
                download_state: resolve_collection_download_state(
                    joined.album_song_ids(&album.id),
                    states,
                    &joined.downloaded,
                ),
            }
        };
        let albums = sort_albums(
            filter_albums(set.albums.iter(), prefs.album_filter),
            prefs.album_sort_type,
            prefs.album_sort_descending,
            &aggregates,
        )
        .into_iter()
        .map(&album_row)
        .collect();

        let stats = ArtistStats::build(&set.songs);
        let artists = sort_artists(
            filter_artists(set.artists.iter(), prefs.artist_filter),
            prefs.artist_sort_type,
            prefs.artist_sort_descending,
            &stats,
        )
        .into_iter()
        .map(|artist| {
            let aggregate = stats.lookup(artist);
            ArtistRow {
                artist: artist.clone(),
                song_count: aggregate.song_count,
                play_time: aggregate.play_time,
            }
        })
        .collect();

        let auto_playlists = prefs
            .visible_auto_playlists()
            .into_iter()
            .map(|kind| {
                let songs = auto_playlist_songs(kind, &set.songs, &joined.by_id, &set.downloaded_songs);
                let mut row = build_auto_playlist(kind, prefs.auto_playlist_titles.title(kind), &songs, None);
                row.download_state = resolve_collection_download_state(
                    songs.iter().map(|song| song.id.as_str()),
                    states,
                    &joined.downloaded,
                );
                row
            })
            .collect();

        let visible = filter_library_playlists(set.playlists.iter(), prefs.show_cached_playlist);
        let mut playlist_rows = build_library_playlists(&visible, &joined.membership, &joined.by_id);
        for row in &mut playlist_rows {
            row.download_state = resolve_collection_download_state(
                joined.membership.song_ids(row.key.id()).iter().copied(),
                states,
                &joined.downloaded,
            );
        }
        let playlists = sort_playlists(
            playlist_rows.clone(),
            prefs.playlist_sort_type,
            prefs.playlist_sort_descending,
        );

        let playlist_rows: HashMap<String, LibraryPlaylist> = playlist_rows
            .into_iter()
            .map(|row| (row.key.id().to_string(), row))
            .collect();
        let mix_counts = linked_song_counts(&set.artists, &set.songs, &set.song_artist_maps);
        let mix = sort_mix_entries(
            build_mix_entries(&visible, &set.albums, &set.artists),
            prefs.mix_sort_type,
            prefs.mix_sort_descending,
        )
        .into_iter()
        .filter_map(|entry| match entry {
            MixEntry::Playlist(playlist) => playlist_rows.get(&playlist.id).cloned().map(MixRow::Playlist),
            MixEntry::Album(album) => Some(MixRow::Album(album_row(album))),
            MixEntry::Artist(artist) => {
                let aggregate = stats.lookup(artist);
                Some(MixRow::Artist(ArtistRow {
                    artist: artist.clone(),
                    song_count: mix_counts.get(&artist.id).copied().unwrap_or(0),
                    play_time: aggregate.play_time,
                }))
            }
        })
        .collect();

        Self {
            generation: set.generation(),
            songs,
            downloaded,
            albums,
            artists,
            auto_playlists,
            playlists,
            mix,
        }
    }

    /// Total number of rows across all views.
    pub fn row_count(&self) -> usize {
        self.songs.len()
            + self.downloaded.len()
            + self.albums.len()
            + self.artists.len()
            + self.auto_playlists.len()
            + self.playlists.len()
            + self.mix.len()
    }
}

// =============================================================================
// On-demand queries
// =============================================================================

/// Songs of a stored playlist in position order; unknown songs are skipped.
pub fn playlist_songs(set: &SnapshotSet, playlist_id: &str) -> Vec<Song> {
    let membership = PlaylistMembership::build(&set.playlist_song_maps);
    let by_id = songs_by_id(&set.songs);
    membership
        .songs(playlist_id, &by_id)
        .into_iter()
        .cloned()
        .collect()
}

/// Play queue for an artist: attributed songs, newest first.
pub fn artist_songs(set: &SnapshotSet, artist: &Artist) -> Vec<Song> {
    let attributed: Vec<&Song> = set
        .songs
        .iter()
        .filter(|song| song_belongs_to(song, artist))
        .collect();
    sort_songs(attributed, SongSortType::CreateDate, true)
        .into_iter()
        .cloned()
        .collect()
}

/// Detail screen of an auto-playlist, sorted by the song sort preference.
pub fn auto_playlist_detail(
    set: &SnapshotSet,
    kind: AutoPlaylistKind,
    query: Option<&str>,
) -> AutoPlaylistDetail {
    let prefs = &*set.preferences;
    let by_id = songs_by_id(&set.songs);
    let songs = auto_playlist_songs(kind, &set.songs, &by_id, &set.downloaded_songs);
    build_auto_playlist_detail(
        kind,
        prefs.auto_playlist_titles.title(kind),
        &songs,
        prefs.song_sort_type,
        prefs.song_sort_descending,
        query,
        &set.download_states,
        &downloaded_ids(&set.downloaded_songs),
    )
}

/// Download button action for an arbitrary song collection.
pub fn collection_download_action<'a, I>(
    set: &SnapshotSet,
    song_ids: I,
    show_when_empty: bool,
) -> Option<CollectionDownloadAction>
where
    I: IntoIterator<Item = &'a str>,
{
    resolve_collection_download_action(
        song_ids,
        &set.download_states,
        &downloaded_ids(&set.downloaded_songs),
        show_when_empty,
    )
}
