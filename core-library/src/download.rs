//! Collection-level download state.
//!
//! Reduces the per-song live status map and the finished-download list to a
//! single status for an album, playlist or auto-playlist. The reduction holds
//! no state; callers re-run it whenever either input is replaced.

use crate::models::{DownloadStates, DownloadedSong};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionDownloadState {
    /// Every song of the collection is downloaded
    Completed,
    /// At least one song is queued, downloading or paused
    Downloading,
    #[default]
    Stopped,
}

/// Action offered for a collection's download button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionDownloadAction {
    Download,
    Cancel,
    Remove,
}

/// Set of finished song ids, built once per downloaded-list snapshot.
pub fn downloaded_ids(downloaded: &[DownloadedSong]) -> HashSet<&str> {
    downloaded.iter().map(|d| d.song_id.as_str()).collect()
}

/// Reduce a song collection to one status. An empty collection is `Stopped`.
pub fn resolve_collection_download_state<'a, I>(
    song_ids: I,
    states: &DownloadStates,
    downloaded: &HashSet<&str>,
) -> CollectionDownloadState
where
    I: IntoIterator<Item = &'a str>,
{
    let mut any = false;
    let mut all_downloaded = true;
    let mut in_progress = false;

    for id in song_ids {
        any = true;
        if !downloaded.contains(id) {
            all_downloaded = false;
        }
        if states.get(id).is_some_and(|s| s.status.is_in_progress()) {
            in_progress = true;
        }
    }

    if !any {
        CollectionDownloadState::Stopped
    } else if all_downloaded {
        CollectionDownloadState::Completed
    } else if in_progress {
        CollectionDownloadState::Downloading
    } else {
        CollectionDownloadState::Stopped
    }
}

/// Button action for a collection.
///
/// Only queued or downloading songs make the collection cancellable; a paused
/// download is offered as a fresh `Download`. An empty collection yields an
/// action only when `show_when_empty` is set.
pub fn resolve_collection_download_action<'a, I>(
    song_ids: I,
    states: &DownloadStates,
    downloaded: &HashSet<&str>,
    show_when_empty: bool,
) -> Option<CollectionDownloadAction>
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: Vec<&str> = song_ids.into_iter().collect();
    if ids.is_empty() {
        return show_when_empty.then_some(CollectionDownloadAction::Download);
    }

    if ids.iter().all(|id| downloaded.contains(id)) {
        Some(CollectionDownloadAction::Remove)
    } else if ids
        .iter()
        .any(|id| states.get(*id).is_some_and(|s| s.status.is_active()))
    {
        Some(CollectionDownloadAction::Cancel)
    } else {
        Some(CollectionDownloadAction::Download)
    }
}
