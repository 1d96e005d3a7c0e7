use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::models::EventRecord;
use crate::utils;

/// Directory a record is persisted into under the harvest root. A second
/// record sanitizing to the same title lands in the same directory and
/// overwrites the sidecar.
pub fn event_dir(root: &Path, source_id: &str, title: &str) -> PathBuf {
    root.join(source_id).join(utils::sanitize_title(title))
}

/// Writes the record's JSON sidecar into its event directory. Fails closed:
/// a missing title or any I/O error logs and reports `false` without raising.
pub fn save_event(root: &Path, source_id: &str, record: &EventRecord) -> bool {
    if record.title.trim().is_empty() {
        tracing::warn!("refusing to persist a record with no title ({source_id})");
        return false;
    }
    match try_save(root, source_id, record) {
        Ok(_) => {
            tracing::info!("saved event: {}", record.title);
            true
        }
        Err(err) => {
            tracing::error!("failed to persist event {}: {err:#}", record.title);
            false
        }
    }
}

fn try_save(root: &Path, source_id: &str, record: &EventRecord) -> anyhow::Result<PathBuf> {
    let dir = event_dir(root, source_id, &record.title);
    fs::create_dir_all(&dir).with_context(|| format!("creating {dir:?}"))?;
    let json_path = dir.join("event_details.json");
    let contents = serde_json::to_string_pretty(record).context("serializing record")?;
    fs::write(&json_path, contents).with_context(|| format!("writing {json_path:?}"))?;
    Ok(dir)
}

/// Drops downloaded media next to the sidecar. The shell discovers
/// `main_image.jpg` and `gallery_image<N>.jpg` by directory listing.
pub fn write_image(dir: &Path, file_name: &str, bytes: &[u8]) -> bool {
    let path = dir.join(file_name);
    match fs::write(&path, bytes) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("failed to write image {path:?}: {err}");
            false
        }
    }
}

/// Copies a persisted event directory into the favourites root. Reports
/// `false` when the source is missing or the favourite already exists.
pub fn add_to_favourites(favourites_root: &Path, event_dir: &Path) -> bool {
    if !event_dir.exists() {
        tracing::warn!("favourite source not found: {event_dir:?}");
        return false;
    }
    let Some(name) = event_dir.file_name() else {
        return false;
    };
    let destination = favourites_root.join(name);
    if destination.exists() {
        return false;
    }
    match copy_dir_recursive(event_dir, &destination) {
        Ok(()) => true,
        Err(err) => {
            tracing::error!("failed to copy {event_dir:?} to favourites: {err:#}");
            false
        }
    }
}

pub fn remove_from_favourites(favourites_root: &Path, event_name: &str) -> bool {
    let destination = favourites_root.join(event_name);
    if !destination.exists() {
        return false;
    }
    match fs::remove_dir_all(&destination) {
        Ok(()) => true,
        Err(err) => {
            tracing::error!("failed to remove favourite {destination:?}: {err}");
            false
        }
    }
}

pub fn is_favourite(favourites_root: &Path, event_name: &str) -> bool {
    favourites_root.join(event_name).exists()
}

fn copy_dir_recursive(from: &Path, to: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(to).with_context(|| format!("creating {to:?}"))?;
    for entry in fs::read_dir(from).with_context(|| format!("reading {from:?}"))? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {:?}", entry.path()))?;
        }
    }
    Ok(())
}
