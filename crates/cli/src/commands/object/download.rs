//! download command - fetch a file or a whole folder
//!
//! A remote path naming an existing file is streamed to the local path (a
//! directory receives the file under its own name). Anything else is taken
//! as a folder: every sub-folder is created locally and every file streamed
//! to the same relative location below the local directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use oss_core::{ObjectPath, ObjectStore};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::human_size;
use crate::commands::{parse_path, report_chain};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Download a file or a folder
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Remote file or folder
    pub remote: String,

    /// Local file or directory (default: current directory)
    pub local: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct DownloadSummary {
    files: usize,
    folders: usize,
    bytes: u64,
}

pub async fn run(args: DownloadArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let remote = match parse_path(&args.remote, formatter) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let local = args.local.unwrap_or_else(|| PathBuf::from("."));

    let result = match remote_file_size(store, &remote).await {
        Ok(Some(size)) => download_single(store, &remote, &local, size, formatter).await,
        Ok(None) => download_folder(store, &remote.to_folder(), &local, formatter).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            if formatter.is_json() {
                formatter.json(&summary);
            } else {
                formatter.success(&format!(
                    "Summary: {} file(s) and {} folder(s), {}",
                    summary.files,
                    summary.folders,
                    human_size(summary.bytes)
                ));
            }
            ExitCode::Success
        }
        Err(e) => report_chain(formatter, &e),
    }
}

/// Size of the file at `remote`, or `None` when no such file exists
async fn remote_file_size(
    store: &dyn ObjectStore,
    remote: &ObjectPath,
) -> anyhow::Result<Option<u64>> {
    if remote.is_folder() {
        return Ok(None);
    }
    let head = store
        .head_object(remote)
        .await
        .with_context(|| format!("Failed to stat {remote}"))?;
    match head.status {
        200 => Ok(Some(head.content_length().unwrap_or(0))),
        404 => Ok(None),
        status => Err(oss_core::Error::protocol(status, ""))
            .with_context(|| format!("Failed to stat {remote}")),
    }
}

/// Where a single file lands: inside `local` when it is a directory
fn single_target(remote: &ObjectPath, local: &Path) -> PathBuf {
    let names_dir = local.is_dir()
        || local
            .to_str()
            .is_some_and(|s| s.ends_with('/') || s.ends_with(std::path::MAIN_SEPARATOR));
    if names_dir {
        local.join(remote.file_name())
    } else {
        local.to_path_buf()
    }
}

/// Local path for a key relative to the downloaded folder
fn relative_target(local: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|part| !part.is_empty())
        .fold(local.to_path_buf(), |path, part| path.join(part))
}

async fn download_single(
    store: &dyn ObjectStore,
    remote: &ObjectPath,
    local: &Path,
    size: u64,
    formatter: &Formatter,
) -> anyhow::Result<DownloadSummary> {
    let target = single_target(remote, local);
    let bytes = fetch(store, remote, &target, Some(size), formatter).await?;
    Ok(DownloadSummary {
        files: 1,
        folders: 0,
        bytes,
    })
}

async fn download_folder(
    store: &dyn ObjectStore,
    remote: &ObjectPath,
    local: &Path,
    formatter: &Formatter,
) -> anyhow::Result<DownloadSummary> {
    if local.exists() && !local.is_dir() {
        bail!("{} exists and is not a directory", local.display());
    }

    let spinner = ProgressBar::spinner(formatter.config(), &format!("Listing {remote}"));
    let listing = store.list_folder(remote, true).await;
    spinner.finish_and_clear();
    let listing = listing.with_context(|| format!("Failed to list {remote}"))?;

    tokio::fs::create_dir_all(local)
        .await
        .with_context(|| format!("Failed to create directory {}", local.display()))?;

    let mut summary = DownloadSummary::default();
    for folder in &listing.folders {
        let dir = relative_target(local, folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        summary.folders += 1;
    }

    for file in &listing.files {
        let source = remote.join(&file.key);
        let target = relative_target(local, &file.key);
        summary.bytes += fetch(store, &source, &target, file.size_bytes(), formatter).await?;
        summary.files += 1;
    }

    Ok(summary)
}

/// Stream one remote file into `target`, creating parent directories
async fn fetch(
    store: &dyn ObjectStore,
    remote: &ObjectPath,
    target: &Path,
    size: Option<u64>,
    formatter: &Formatter,
) -> anyhow::Result<u64> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = tokio::fs::File::create(target)
        .await
        .with_context(|| format!("Failed to create {}", target.display()))?;
    let progress = ProgressBar::new(formatter.config(), size, remote.file_name());
    let mut sink = progress.writer(file);

    let bytes = store
        .get_file(remote, &mut *sink)
        .await
        .with_context(|| format!("Failed to download {remote}"))?;
    sink.shutdown()
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;
    progress.finish_and_clear();
    debug!(source = %remote, target = %target.display(), bytes, "Downloaded file");

    formatter.println(&format!(
        "{remote} -> {} ({})",
        target.display(),
        human_size(bytes)
    ));
    Ok(bytes)
}
