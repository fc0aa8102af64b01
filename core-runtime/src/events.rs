//! # Event Bus System
//!
//! Broadcast notifications about the view pipeline, built on
//! `tokio::sync::broadcast`. Publishers report every snapshot replacement;
//! the engine task reports its lifecycle and each recompute. Hosts observe
//! the pipeline here without polling it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  SnapshotReplaced  ┌───────────┐
//! │  Publishers  ├───────────────────>│           │     subscribe    ┌────────────┐
//! └──────────────┘                    │ EventBus  ├─────────────────>│ Subscriber │
//! ┌──────────────┐  ViewsRecomputed   │ (broadcast│                  └────────────┘
//! │  ViewEngine  ├───────────────────>│  channel) │
//! └──────────────┘                    └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, LibraryEvent, SnapshotSource};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(16);
//! let mut events = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Library(LibraryEvent::SnapshotReplaced {
//!         source: SnapshotSource::Songs,
//!         generation: 1,
//!     }))
//!     .ok();
//!
//! assert_eq!(events.recv().await.unwrap().description(), "Input snapshot replaced");
//! # }
//! ```
//!
//! A subscriber that falls more than the buffer size behind gets
//! `RecvError::Lagged(n)` once and then resumes with the newest events.
//! `emit` fails when nobody is subscribed; publishers ignore that.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Input snapshot changes
    Library(LibraryEvent),
    /// Recompute lifecycle
    Engine(EngineEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &'static str {
        match self {
            CoreEvent::Library(LibraryEvent::SnapshotReplaced { .. }) => "Input snapshot replaced",
            CoreEvent::Engine(EngineEvent::Started) => "View engine started",
            CoreEvent::Engine(EngineEvent::ViewsRecomputed { .. }) => "Views recomputed",
            CoreEvent::Engine(EngineEvent::RecomputeFailed { .. }) => "View recompute failed",
            CoreEvent::Engine(EngineEvent::Stopped) => "View engine stopped",
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Engine(EngineEvent::RecomputeFailed { .. }) => EventSeverity::Error,
            CoreEvent::Engine(EngineEvent::Started | EngineEvent::Stopped) => EventSeverity::Info,
            CoreEvent::Engine(EngineEvent::ViewsRecomputed { .. }) | CoreEvent::Library(_) => {
                EventSeverity::Debug
            }
        }
    }

    /// Snapshot generation the event refers to, if any.
    pub fn generation(&self) -> Option<u64> {
        match self {
            CoreEvent::Library(LibraryEvent::SnapshotReplaced { generation, .. })
            | CoreEvent::Engine(EngineEvent::ViewsRecomputed { generation, .. })
            | CoreEvent::Engine(EngineEvent::RecomputeFailed { generation, .. }) => {
                Some(*generation)
            }
            CoreEvent::Engine(EngineEvent::Started | EngineEvent::Stopped) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// The independently changing input collections of the view engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Songs,
    Albums,
    Artists,
    Playlists,
    PlaylistSongMaps,
    SongArtistMaps,
    DownloadStates,
    DownloadedSongs,
    Preferences,
}

impl SnapshotSource {
    pub const ALL: [SnapshotSource; 9] = [
        SnapshotSource::Songs,
        SnapshotSource::Albums,
        SnapshotSource::Artists,
        SnapshotSource::Playlists,
        SnapshotSource::PlaylistSongMaps,
        SnapshotSource::SongArtistMaps,
        SnapshotSource::DownloadStates,
        SnapshotSource::DownloadedSongs,
        SnapshotSource::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Songs => "songs",
            SnapshotSource::Albums => "albums",
            SnapshotSource::Artists => "artists",
            SnapshotSource::Playlists => "playlists",
            SnapshotSource::PlaylistSongMaps => "playlist_song_maps",
            SnapshotSource::SongArtistMaps => "song_artist_maps",
            SnapshotSource::DownloadStates => "download_states",
            SnapshotSource::DownloadedSongs => "downloaded_songs",
            SnapshotSource::Preferences => "preferences",
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    /// One source was replaced wholesale.
    SnapshotReplaced {
        source: SnapshotSource,
        /// Generation of the snapshot set after the replacement
        generation: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum EngineEvent {
    Started,
    /// New views were published.
    ViewsRecomputed { generation: u64, duration_ms: u64 },
    /// The recompute task panicked or was cancelled; the previous views stay
    /// published.
    RecomputeFailed { generation: u64, message: String },
    Stopped,
}

/// Cloneable handle to the broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// `capacity` is the number of events a subscriber may fall behind
    /// before it lags. Must be non-zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send `event` to every current subscriber and return how many there
    /// were.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// New receiver; events emitted before this call are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
