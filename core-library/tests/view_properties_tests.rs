//! Integration tests for the library view pipeline
//!
//! These tests exercise the pure engine end to end:
//! - Filter idempotence for every mode
//! - Sort reversal law including tie adjacency
//! - Artist attribution without double counting
//! - Auto-playlist synthesis and download reduction
//! - Cached playlist exclusion and mix ordering

use chrono::{TimeZone, Utc};
use core_library::auto_playlist::{auto_playlist_songs, build_auto_playlist, AutoPlaylistKind};
use core_library::download::{downloaded_ids, resolve_collection_download_state, CollectionDownloadState};
use core_library::filter::{
    filter_albums, filter_artists, filter_library_playlists, filter_songs, AlbumFilter,
    ArtistFilter, SongFilter,
};
use core_library::identity::{resolve_artist_key, ArtistKey};
use core_library::join::{songs_by_id, ArtistStats};
use core_library::mix::{build_mix_entries, sort_mix_entries, MixSortType};
use core_library::models::{
    Album, Artist, DownloadState, DownloadStates, DownloadStatus, DownloadedSong, Playlist,
    Song, Timestamp,
};
use core_library::snapshot::{SnapshotSet, SnapshotUpdate};
use core_library::sort::{sort_songs, SongSortType};
use core_library::views::LibraryViews;
use core_library::{LibraryPreferences, MixRow};

// ============================================================================
// Fixtures
// ============================================================================

fn at(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn song(id: &str, title: &str, artist_id: Option<&str>, artist_name: Option<&str>) -> Song {
    Song {
        artist_id: artist_id.map(str::to_string),
        artist_name: artist_name.map(str::to_string),
        ..Song::new(id, title)
    }
}

fn mixed_songs() -> Vec<Song> {
    vec![
        Song {
            liked: true,
            in_library: Some(at(3)),
            total_play_time: 500,
            ..song("s1", "Éclair", Some("ar1"), Some("Alpha"))
        },
        Song {
            in_library: Some(at(1)),
            total_play_time: 900,
            ..song("s2", "apple", None, Some("ALPHA"))
        },
        Song {
            liked: true,
            total_play_time: 100,
            ..song("s3", "Banana", Some(""), Some("Beta"))
        },
        Song {
            in_library: Some(at(1)),
            ..song("s4", "eclair", None, None)
        },
        Song {
            in_library: Some(at(2)),
            total_play_time: 900,
            ..song("s5", "Cherry", Some("ar1"), None)
        },
    ]
}

fn downloaded(song_id: &str) -> DownloadedSong {
    DownloadedSong {
        song_id: song_id.to_string(),
        title: format!("Downloaded {song_id}"),
        artist: "Someone".to_string(),
        thumbnail_url: None,
        duration: 200,
        downloaded_at: at(5),
    }
}

fn ids<'a>(songs: impl IntoIterator<Item = &'a Song>) -> Vec<&'a str> {
    songs.into_iter().map(|song| song.id.as_str()).collect()
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_song_filters_are_idempotent() {
    let songs = mixed_songs();
    let downloads = vec![downloaded("s2"), downloaded("s4")];
    let downloaded = downloaded_ids(&downloads);

    for mode in [SongFilter::Liked, SongFilter::Library, SongFilter::Downloaded] {
        let once = filter_songs(songs.iter(), mode, &downloaded);
        let twice = filter_songs(once.iter().copied(), mode, &downloaded);
        assert_eq!(ids(once.iter().copied()), ids(twice.iter().copied()), "{mode}");
    }
}

#[test]
fn test_album_and_artist_filters_are_idempotent() {
    let albums = vec![
        Album {
            bookmarked_at: Some(at(1)),
            ..Album::new("al1", "One")
        },
        Album {
            in_library: Some(at(2)),
            ..Album::new("al2", "Two")
        },
        Album::new("al3", "Three"),
    ];
    for mode in [AlbumFilter::Liked, AlbumFilter::Library] {
        let once = filter_albums(albums.iter(), mode);
        let twice = filter_albums(once.iter().copied(), mode);
        assert_eq!(once, twice);
    }

    let artists = vec![
        Artist {
            bookmarked_at: Some(at(1)),
            ..Artist::new("ar1", "Alpha")
        },
        Artist::new("ar2", "Beta"),
    ];
    for mode in [ArtistFilter::Liked, ArtistFilter::Library] {
        let once = filter_artists(artists.iter(), mode);
        let twice = filter_artists(once.iter().copied(), mode);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_cached_name_exclusion() {
    let playlists = vec![
        Playlist::new("p1", "En Caché"),
        Playlist::new("p2", "cached"),
        Playlist::new("p3", "Road trip"),
    ];

    let hidden = filter_library_playlists(playlists.iter(), false);
    assert_eq!(
        hidden.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["p3"]
    );

    let shown = filter_library_playlists(playlists.iter(), true);
    assert_eq!(shown.len(), 3);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_descending_is_exact_reverse_of_ascending() {
    let songs = mixed_songs();

    for sort in [
        SongSortType::CreateDate,
        SongSortType::Name,
        SongSortType::Artist,
        SongSortType::PlayTime,
    ] {
        let ascending = sort_songs(songs.iter().collect(), sort, false);
        let mut descending = sort_songs(songs.iter().collect(), sort, true);
        descending.reverse();
        assert_eq!(ids(ascending), ids(descending), "{sort}");
    }
}

#[test]
fn test_name_sort_ignores_case_and_accents() {
    let songs = mixed_songs();
    let sorted = sort_songs(songs.iter().collect(), SongSortType::Name, false);

    // "Éclair" and "eclair" collate equal and keep snapshot order
    assert_eq!(ids(sorted), vec!["s2", "s3", "s5", "s1", "s4"]);
}

// ============================================================================
// Artist attribution
// ============================================================================

#[test]
fn test_id_attributed_songs_never_counted_by_name() {
    let songs = mixed_songs();
    let stats = ArtistStats::build(&songs);

    let by_id = songs
        .iter()
        .filter(|song| resolve_artist_key(song) == ArtistKey::Id("ar1".to_string()))
        .count() as u32;
    assert_eq!(stats.by_id("ar1").map(|agg| agg.song_count), Some(by_id));
    assert_eq!(by_id, 2);

    // s1 carries the name "Alpha" but is attributed by id; only s2 is on the
    // name path
    let by_name = stats.by_name("alpha").unwrap();
    assert_eq!(by_name.song_count, 1);
    assert_eq!(by_name.play_time, 900);

    let artist = Artist::new("ar1", "Alpha");
    let total = stats.lookup(&artist);
    assert_eq!(total.song_count, 2);
    assert_eq!(total.play_time, 1400);
}

// ============================================================================
// Auto-playlists and downloads
// ============================================================================

#[test]
fn test_liked_auto_playlist_contains_only_liked_songs() {
    let songs = vec![
        Song {
            liked: true,
            ..Song::new("a", "A")
        },
        Song::new("b", "B"),
    ];
    let by_id = songs_by_id(&songs);
    let liked = auto_playlist_songs(AutoPlaylistKind::Liked, &songs, &by_id, &[]);
    let row = build_auto_playlist(AutoPlaylistKind::Liked, "Liked Songs", &liked, None);

    assert_eq!(row.song_count, 1);
    assert_eq!(ids(liked.iter().map(|song| &**song)), vec!["a"]);
    assert!(row.is_auto());
}

#[test]
fn test_download_reduction() {
    let song_ids = ["a", "b"];
    let only_a = vec![downloaded("a")];
    let both = vec![downloaded("a"), downloaded("b")];

    let mut states = DownloadStates::new();
    states.insert("b".to_string(), DownloadState::new(DownloadStatus::Downloading));

    assert_eq!(
        resolve_collection_download_state(song_ids, &states, &downloaded_ids(&only_a)),
        CollectionDownloadState::Downloading
    );
    assert_eq!(
        resolve_collection_download_state(song_ids, &DownloadStates::new(), &downloaded_ids(&only_a)),
        CollectionDownloadState::Stopped
    );
    assert_eq!(
        resolve_collection_download_state(song_ids, &DownloadStates::new(), &downloaded_ids(&both)),
        CollectionDownloadState::Completed
    );
}

// ============================================================================
// Mix composition
// ============================================================================

#[test]
fn test_mix_sorts_by_name_across_kinds() {
    let playlist = Playlist {
        created_at: Some(at(1)),
        ..Playlist::new("p1", "A")
    };
    let albums = vec![Album {
        in_library: Some(at(2)),
        ..Album::new("al1", "B")
    }];
    let playlists = [&playlist];

    let entries = sort_mix_entries(
        build_mix_entries(&playlists, &albums, &[]),
        MixSortType::Name,
        false,
    );
    let names: Vec<&str> = entries.iter().map(|entry| entry.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_computed_mix_keeps_auto_playlists_separate() {
    let mut set = SnapshotSet::new();
    set.replace(SnapshotUpdate::Songs(mixed_songs()));
    set.replace(SnapshotUpdate::Playlists(vec![Playlist {
        created_at: Some(at(1)),
        ..Playlist::new("p1", "A")
    }]));
    set.replace(SnapshotUpdate::Albums(vec![Album {
        in_library: Some(at(2)),
        ..Album::new("al1", "B")
    }]));
    set.replace(SnapshotUpdate::Preferences(LibraryPreferences {
        mix_sort_type: MixSortType::Name,
        mix_sort_descending: false,
        ..LibraryPreferences::default()
    }));

    let views = LibraryViews::compute(&set);
    assert_eq!(views.generation, 4);
    assert_eq!(views.auto_playlists.len(), 3);

    let mix_ids: Vec<&str> = views.mix.iter().map(MixRow::id).collect();
    assert_eq!(mix_ids, vec!["p1", "al1"]);
    assert!(views.mix.iter().all(|row| match row {
        MixRow::Playlist(playlist) => !playlist.is_auto(),
        _ => true,
    }));
}
