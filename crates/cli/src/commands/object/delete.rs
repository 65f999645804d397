//! delete command - remove a file, or a folder with everything below it

use clap::Args;
use oss_core::{Error, ObjectPath, ObjectStore};
use serde::Serialize;

use crate::commands::{parse_path, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete a file or a folder
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Remote file or folder
    pub path: String,

    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    dry_run: bool,
    deleted: Vec<String>,
}

pub async fn run(args: DeleteArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let path = match parse_path(&args.path, formatter) {
        Ok(path) => path,
        Err(code) => return code,
    };
    if path.is_root() {
        let e = Error::InvalidPath("Cannot delete the bucket root".into());
        return report(formatter, "Refusing to delete /", &e);
    }

    let is_file = if path.is_folder() {
        false
    } else {
        match store.file_exists(&path).await {
            Ok(exists) => exists,
            Err(e) => return report(formatter, &format!("Failed to stat {path}"), &e),
        }
    };

    let result = if is_file {
        delete_file(store, &path, args.dry_run, formatter).await
    } else {
        delete_folder(store, &path, args.dry_run, formatter).await
    };

    match result {
        Ok(deleted) => {
            if formatter.is_json() {
                formatter.json(&DeleteOutput {
                    dry_run: args.dry_run,
                    deleted,
                });
            } else if args.dry_run {
                formatter.success(&format!("{} object(s) would be deleted", deleted.len()));
            } else {
                formatter.success(&format!("Deleted {} object(s)", deleted.len()));
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &format!("Failed to delete {path}"), &e),
    }
}

fn announce(target: &str, dry_run: bool, formatter: &Formatter) {
    if dry_run {
        formatter.println(&format!("Would delete: {target}"));
    } else {
        formatter.println(&format!("Deleting {target}"));
    }
}

async fn delete_file(
    store: &dyn ObjectStore,
    path: &ObjectPath,
    dry_run: bool,
    formatter: &Formatter,
) -> oss_core::Result<Vec<String>> {
    announce(&path.to_string(), dry_run, formatter);
    if !dry_run {
        store.delete_object(path).await?;
    }
    Ok(vec![path.to_string()])
}

async fn delete_folder(
    store: &dyn ObjectStore,
    path: &ObjectPath,
    dry_run: bool,
    formatter: &Formatter,
) -> oss_core::Result<Vec<String>> {
    let mut seen = Vec::new();
    let mut confirm = |target: &str| {
        announce(target, dry_run, formatter);
        seen.push(target.to_string());
        !dry_run
    };
    store.delete_folder(&path.to_folder(), &mut confirm).await?;
    Ok(seen)
}
