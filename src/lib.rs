//! Workspace facade crate.
//!
//! Re-exports the workspace crates behind the `engine` feature so host
//! applications can depend on `library-views` alone instead of wiring
//! `core-runtime` and `core-library` individually.

#[cfg(feature = "engine")]
pub use core_library;
#[cfg(feature = "engine")]
pub use core_runtime;

#[cfg(feature = "engine")]
pub use core_library::{LibraryError, LibraryPreferences, LibraryViews, SnapshotUpdate, ViewEngine};
#[cfg(feature = "engine")]
pub use core_runtime::config::EngineConfig;
