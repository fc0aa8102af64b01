//! # Reactive View Engine
//!
//! Owns the latest [`SnapshotSet`] and keeps a [`LibraryViews`] value in step
//! with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────┐ send_modify ┌──────────────┐ changed() ┌─────────────┐
//! │ SnapshotPublisher ├────────────>│ watch<Set>   ├──────────>│ engine task │
//! └───────────────────┘             └──────────────┘           └──────┬──────┘
//!                                                                     │ compute
//! ┌───────────────────┐  subscribe  ┌──────────────────────┐          │
//! │     Screens       │<────────────┤ watch<Arc<Views>>    │<─────────┘
//! └───────────────────┘             └──────────────────────┘
//! ```
//!
//! Publishing replaces one collection and bumps the set's generation. The
//! engine task wakes on change, takes the newest set (intermediate
//! generations coalesce) and recomputes every view from scratch. Large
//! libraries are recomputed on the blocking pool. A result is published only
//! if its generation is newer than the one on screen, so subscribers never
//! see an older set replace a newer one.
//!
//! ## Usage
//!
//! ```no_run
//! use core_library::engine::ViewEngine;
//! use core_library::models::Song;
//! use core_library::snapshot::SnapshotUpdate;
//! use core_runtime::config::EngineConfig;
//!
//! # async fn run() -> core_library::Result<()> {
//! let engine = ViewEngine::start(EngineConfig::default())?;
//! let mut views = engine.subscribe();
//!
//! engine.publish(SnapshotUpdate::Songs(vec![Song::new("s1", "Teardrop")]))?;
//! views.changed().await.ok();
//! println!("{} songs", views.borrow().songs.len());
//!
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{LibraryError, Result};
use crate::snapshot::{SnapshotSet, SnapshotUpdate};
use crate::views::LibraryViews;
use core_runtime::config::EngineConfig;
use core_runtime::events::{CoreEvent, EngineEvent, EventBus, LibraryEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Cloneable handle that replaces input snapshots.
#[derive(Clone)]
pub struct SnapshotPublisher {
    input: Arc<watch::Sender<SnapshotSet>>,
    event_bus: EventBus,
}

impl SnapshotPublisher {
    /// Replace one input collection and return the new generation.
    ///
    /// # Errors
    ///
    /// [`LibraryError::EngineClosed`] once the engine task has stopped.
    pub fn publish(&self, update: SnapshotUpdate) -> Result<u64> {
        if self.input.is_closed() {
            return Err(LibraryError::EngineClosed);
        }

        let source = update.source();
        let mut generation = 0;
        self.input.send_modify(|set| generation = set.replace(update));

        debug!(source = %source, generation, "Snapshot replaced");
        self.event_bus
            .emit(CoreEvent::Library(LibraryEvent::SnapshotReplaced {
                source,
                generation,
            }))
            .ok();

        Ok(generation)
    }

    /// Copy of the current input set, for on-demand queries.
    pub fn snapshot(&self) -> SnapshotSet {
        self.input.borrow().clone()
    }
}

impl std::fmt::Debug for SnapshotPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPublisher")
            .field("generation", &self.input.borrow().generation())
            .finish()
    }
}

/// Handle to a running view engine.
pub struct ViewEngine {
    publisher: SnapshotPublisher,
    output: watch::Receiver<Arc<LibraryViews>>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ViewEngine {
    /// Validate `config`, create an event bus sized from it and spawn the
    /// engine. Must be called inside a Tokio runtime.
    pub fn start(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let event_bus = EventBus::new(config.event_buffer_size);
        Ok(Self::spawn(config, event_bus))
    }

    /// Spawn the engine task, reporting on `event_bus`.
    pub fn spawn(config: EngineConfig, event_bus: EventBus) -> Self {
        let initial = SnapshotSet::new();
        let first_views = Arc::new(LibraryViews::compute(&initial));

        let (input_tx, input_rx) = watch::channel(initial);
        let (output_tx, output_rx) = watch::channel(first_views);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_bus = event_bus.clone();
        let handle = tokio::spawn(async move {
            run_engine(config, input_rx, output_tx, shutdown_rx, task_bus).await;
        });

        Self {
            publisher: SnapshotPublisher {
                input: Arc::new(input_tx),
                event_bus,
            },
            output: output_rx,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn publisher(&self) -> SnapshotPublisher {
        self.publisher.clone()
    }

    pub fn publish(&self, update: SnapshotUpdate) -> Result<u64> {
        self.publisher.publish(update)
    }

    /// Receiver of the published views. The current value is available
    /// immediately through `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<LibraryViews>> {
        self.output.clone()
    }

    /// Latest published views.
    pub fn current(&self) -> Arc<LibraryViews> {
        self.output.borrow().clone()
    }

    pub fn snapshot(&self) -> SnapshotSet {
        self.publisher.snapshot()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.publisher.event_bus
    }

    /// Stop the engine task and wait for it to exit. An in-flight recompute
    /// finishes first.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        match self.handle.take() {
            Some(handle) => handle.await.map_err(|err| LibraryError::Recompute {
                generation: self.output.borrow().generation,
                message: err.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Drop for ViewEngine {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("publisher", &self.publisher)
            .field("published_generation", &self.output.borrow().generation)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

async fn run_engine(
    config: EngineConfig,
    mut input: watch::Receiver<SnapshotSet>,
    output: watch::Sender<Arc<LibraryViews>>,
    mut shutdown: oneshot::Receiver<()>,
    event_bus: EventBus,
) {
    info!(offload_threshold = config.offload_threshold, "View engine started");
    event_bus.emit(CoreEvent::Engine(EngineEvent::Started)).ok();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = input.changed() => {
                if changed.is_err() {
                    // Every publisher is gone
                    break;
                }
                let snapshot = input.borrow_and_update().clone();
                recompute_and_publish(&config, snapshot, &output, &event_bus).await;
            }
        }
    }

    info!("View engine stopped");
    event_bus.emit(CoreEvent::Engine(EngineEvent::Stopped)).ok();
}

#[instrument(skip_all, fields(generation = snapshot.generation()))]
async fn recompute_and_publish(
    config: &EngineConfig,
    snapshot: SnapshotSet,
    output: &watch::Sender<Arc<LibraryViews>>,
    event_bus: &EventBus,
) {
    let generation = snapshot.generation();
    let started = Instant::now();

    match recompute(config, snapshot).await {
        Ok(views) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            let rows = views.row_count();
            let published = output.send_if_modified(|current| {
                if views.generation > current.generation {
                    *current = Arc::new(views);
                    true
                } else {
                    false
                }
            });

            if published {
                debug!(rows, duration_ms, "Views recomputed");
                event_bus
                    .emit(CoreEvent::Engine(EngineEvent::ViewsRecomputed {
                        generation,
                        duration_ms,
                    }))
                    .ok();
            } else {
                debug!("Discarded views older than the published generation");
            }
        }
        Err(err) => {
            warn!(error = %err, "View recompute failed");
            event_bus
                .emit(CoreEvent::Engine(EngineEvent::RecomputeFailed {
                    generation,
                    message: err.to_string(),
                }))
                .ok();
        }
    }
}

async fn recompute(config: &EngineConfig, snapshot: SnapshotSet) -> Result<LibraryViews> {
    let generation = snapshot.generation();
    if !config.should_offload(snapshot.songs.len()) {
        return Ok(LibraryViews::compute(&snapshot));
    }

    debug!(songs = snapshot.songs.len(), "Offloading recompute");
    tokio::task::spawn_blocking(move || LibraryViews::compute(&snapshot))
        .await
        .map_err(|err| LibraryError::Recompute {
            generation,
            message: err.to_string(),
        })
}
