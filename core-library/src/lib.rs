//! # Library Views Module
//!
//! Materializes the library screens of a music client from raw snapshots of
//! songs, albums, artists, playlists, their link tables, download status and
//! user preferences.
//!
//! ## Overview
//!
//! This module provides:
//! - Entity models and the joins between them
//! - Filtering, collation-aware sorting and auto-playlist synthesis
//! - Collection download state resolution
//! - A reactive engine that recomputes every view when any input changes
//! - Collaborator traits for the entity store and the download tracker
//!
//! The pipeline itself ([`views::LibraryViews::compute`]) is a pure function
//! of a [`snapshot::SnapshotSet`]; the engine only decides when to run it.

#[macro_use]
mod macros;

pub mod auto_playlist;
pub mod download;
pub mod engine;
pub mod error;
pub mod filter;
pub mod identity;
pub mod join;
pub mod mix;
pub mod models;
pub mod normalize;
pub mod playlists;
pub mod preferences;
pub mod snapshot;
pub mod sort;
pub mod sources;
pub mod views;

pub use auto_playlist::{AutoPlaylistDetail, AutoPlaylistKind};
pub use download::{CollectionDownloadAction, CollectionDownloadState};
pub use engine::{SnapshotPublisher, ViewEngine};
pub use error::{LibraryError, Result};
pub use playlists::{LibraryPlaylist, PlaylistKey};
pub use preferences::LibraryPreferences;
pub use snapshot::{SnapshotSet, SnapshotUpdate};
pub use sources::{refresh_from_sources, DownloadTracker, EntityStore};
pub use views::{AlbumRow, ArtistRow, LibraryViews, MixRow};
