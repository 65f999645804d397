//! upload command - put local files and directories into a remote folder
//!
//! The remote path is always a folder. A local file lands at
//! `remote/<file name>`; a local directory is walked and each file lands at
//! `remote/<directory name>/<path inside the directory>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use oss_core::{ObjectPath, ObjectStore};
use serde::Serialize;
use tracing::debug;

use super::human_size;
use crate::commands::{parse_path, report_chain};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Upload files and directories
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Remote folder to upload into
    pub remote: String,

    /// Local files or directories
    #[arg(required = true)]
    pub local: Vec<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct UploadSummary {
    uploaded: Vec<String>,
    bytes: u64,
}

pub async fn run(args: UploadArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let remote = match parse_path(&args.remote, formatter) {
        Ok(path) => path.to_folder(),
        Err(code) => return code,
    };

    let mut summary = UploadSummary::default();
    for local in &args.local {
        if let Err(e) = upload_one(store, &remote, local, formatter, &mut summary).await {
            return report_chain(formatter, &e);
        }
    }

    if formatter.is_json() {
        formatter.json(&summary);
    } else {
        formatter.success(&format!(
            "Uploaded {} file(s), {}",
            summary.uploaded.len(),
            human_size(summary.bytes)
        ));
    }
    ExitCode::Success
}

async fn upload_one(
    store: &dyn ObjectStore,
    remote: &ObjectPath,
    local: &Path,
    formatter: &Formatter,
    summary: &mut UploadSummary,
) -> anyhow::Result<()> {
    let metadata = tokio::fs::metadata(local)
        .await
        .with_context(|| format!("Cannot access {}", local.display()))?;
    let name = local_name(local)?;

    let files = if metadata.is_dir() {
        let files = walk_dir(local, &format!("{name}/"))
            .with_context(|| format!("Failed to read directory {}", local.display()))?;
        formatter.println(&format!(
            "{} file(s) will be uploaded from {}",
            files.len(),
            local.display()
        ));
        files
    } else {
        vec![(local.to_path_buf(), name)]
    };

    for (path, rel) in files {
        let target = remote.join(&rel);
        summary.bytes += put(store, &path, &target, formatter).await?;
        summary.uploaded.push(target.to_string());
    }
    Ok(())
}

/// Final component of a local path, as used in the remote key
fn local_name(local: &Path) -> anyhow::Result<String> {
    let canonical;
    let path = if local.file_name().is_some() {
        local
    } else {
        canonical = std::fs::canonicalize(local)
            .with_context(|| format!("Cannot resolve {}", local.display()))?;
        canonical.as_path()
    };
    match path.file_name() {
        Some(name) => Ok(name.to_string_lossy().into_owned()),
        None => bail!("{} has no file name", local.display()),
    }
}

/// Every file below `dir`, paired with its key relative to the remote folder
fn walk_dir(dir: &Path, prefix: &str) -> std::io::Result<Vec<(PathBuf, String)>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            files.extend(walk_dir(&path, &format!("{prefix}{name}/"))?);
        } else if path.is_file() {
            files.push((path, format!("{prefix}{name}")));
        }
    }
    Ok(files)
}

/// Stream one local file to `target`
async fn put(
    store: &dyn ObjectStore,
    path: &Path,
    target: &ObjectPath,
    formatter: &Formatter,
) -> anyhow::Result<u64> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    let progress = ProgressBar::new(formatter.config(), Some(size), target.file_name());
    let result = store
        .put_file(target, progress.reader(file), Some(size))
        .await;
    progress.finish_and_clear();
    result.with_context(|| format!("Failed to upload {}", path.display()))?;
    debug!(source = %path.display(), target = %target, bytes = size, "Uploaded file");

    formatter.println(&format!(
        "{} -> {target} ({})",
        path.display(),
        human_size(size)
    ));
    Ok(size)
}
