//! Library view preferences.
//!
//! Hosts persist these as JSON. Missing keys take their defaults so older
//! preference files keep loading after new options are added.

use crate::auto_playlist::AutoPlaylistKind;
use crate::error::{LibraryError, Result};
use crate::filter::{AlbumFilter, ArtistFilter, SongFilter};
use crate::mix::MixSortType;
use crate::sort::{AlbumSortType, ArtistSortType, PlaylistSortType, SongSortType};
use serde::{Deserialize, Serialize};

/// Display titles of the auto-playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlaylistTitles {
    pub liked: String,
    pub downloaded: String,
    pub top: String,
}

impl Default for AutoPlaylistTitles {
    fn default() -> Self {
        Self {
            liked: "Liked Songs".to_string(),
            downloaded: "Offline".to_string(),
            top: "My Top 50".to_string(),
        }
    }
}

impl AutoPlaylistTitles {
    pub fn title(&self, kind: AutoPlaylistKind) -> &str {
        match kind {
            AutoPlaylistKind::Liked => &self.liked,
            AutoPlaylistKind::Downloaded => &self.downloaded,
            AutoPlaylistKind::Top => &self.top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryPreferences {
    pub song_filter: SongFilter,
    pub album_filter: AlbumFilter,
    pub artist_filter: ArtistFilter,

    pub song_sort_type: SongSortType,
    pub song_sort_descending: bool,
    pub playlist_sort_type: PlaylistSortType,
    pub playlist_sort_descending: bool,
    pub album_sort_type: AlbumSortType,
    pub album_sort_descending: bool,
    pub artist_sort_type: ArtistSortType,
    pub artist_sort_descending: bool,
    pub mix_sort_type: MixSortType,
    pub mix_sort_descending: bool,

    /// Keep the cache playlist in listings
    pub show_cached_playlist: bool,
    pub show_liked_playlist: bool,
    pub show_downloaded_playlist: bool,
    pub show_top_playlist: bool,

    pub auto_playlist_titles: AutoPlaylistTitles,
}

impl Default for LibraryPreferences {
    fn default() -> Self {
        Self {
            song_filter: SongFilter::default(),
            album_filter: AlbumFilter::default(),
            artist_filter: ArtistFilter::default(),
            song_sort_type: SongSortType::default(),
            song_sort_descending: true,
            playlist_sort_type: PlaylistSortType::default(),
            playlist_sort_descending: true,
            album_sort_type: AlbumSortType::default(),
            album_sort_descending: true,
            artist_sort_type: ArtistSortType::default(),
            artist_sort_descending: true,
            mix_sort_type: MixSortType::default(),
            mix_sort_descending: true,
            show_cached_playlist: false,
            show_liked_playlist: true,
            show_downloaded_playlist: true,
            show_top_playlist: true,
            auto_playlist_titles: AutoPlaylistTitles::default(),
        }
    }
}

impl LibraryPreferences {
    /// Parse and validate preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let preferences: Self = serde_json::from_str(json)?;
        preferences.validate()?;
        Ok(preferences)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Auto-playlist titles must not be blank.
    pub fn validate(&self) -> Result<()> {
        for kind in AutoPlaylistKind::ALL {
            if self.auto_playlist_titles.title(kind).trim().is_empty() {
                return Err(LibraryError::InvalidInput {
                    field: format!("auto_playlist_titles.{}", kind),
                    message: "title must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn shows_auto_playlist(&self, kind: AutoPlaylistKind) -> bool {
        match kind {
            AutoPlaylistKind::Liked => self.show_liked_playlist,
            AutoPlaylistKind::Downloaded => self.show_downloaded_playlist,
            AutoPlaylistKind::Top => self.show_top_playlist,
        }
    }

    /// Enabled auto-playlists in their fixed display order.
    pub fn visible_auto_playlists(&self) -> Vec<AutoPlaylistKind> {
        AutoPlaylistKind::ALL
            .into_iter()
            .filter(|kind| self.shows_auto_playlist(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = LibraryPreferences::default();
        assert_eq!(prefs.song_filter, SongFilter::Library);
        assert_eq!(prefs.song_sort_type, SongSortType::CreateDate);
        assert!(prefs.song_sort_descending);
        assert!(!prefs.show_cached_playlist);
        assert_eq!(prefs.visible_auto_playlists(), AutoPlaylistKind::ALL.to_vec());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let prefs = LibraryPreferences::from_json(
            r#"{
                "song_filter": "downloaded",
                "album_sort_type": "play_time",
                "album_sort_descending": false,
                "show_top_playlist": false,
                "auto_playlist_titles": { "liked": "Me gusta" }
            }"#,
        )
        .unwrap();

        assert_eq!(prefs.song_filter, SongFilter::Downloaded);
        assert_eq!(prefs.album_sort_type, AlbumSortType::PlayTime);
        assert!(!prefs.album_sort_descending);
        assert!(prefs.artist_sort_descending);
        assert_eq!(prefs.auto_playlist_titles.liked, "Me gusta");
        assert_eq!(prefs.auto_playlist_titles.top, "My Top 50");
        assert_eq!(
            prefs.visible_auto_playlists(),
            vec![AutoPlaylistKind::Liked, AutoPlaylistKind::Downloaded]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let mut prefs = LibraryPreferences::default();
        prefs.mix_sort_type = MixSortType::Name;
        prefs.show_cached_playlist = true;

        let json = prefs.to_json().unwrap();
        assert!(json.contains("\"mix_sort_type\": \"name\""));
        assert_eq!(LibraryPreferences::from_json(&json).unwrap(), prefs);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let err = LibraryPreferences::from_json(r#"{ "song_sort_type": "loudness" }"#).unwrap_err();
        assert!(matches!(err, LibraryError::Preferences(_)));
    }

    #[test]
    fn test_blank_title_rejected() {
        let err = LibraryPreferences::from_json(r#"{ "auto_playlist_titles": { "top": "  " } }"#)
            .unwrap_err();
        match err {
            LibraryError::InvalidInput { field, .. } => assert_eq!(field, "auto_playlist_titles.top"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
