//! mkdir command - create an empty folder marker

use clap::Args;
use oss_core::ObjectStore;
use serde::Serialize;

use crate::commands::{parse_path, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create a folder
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Remote folder to create
    pub path: String,
}

#[derive(Debug, Serialize)]
struct MkdirOutput {
    status: &'static str,
    folder: String,
}

pub async fn run(args: MkdirArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let folder = match parse_path(&args.path, formatter) {
        Ok(path) => path.to_folder(),
        Err(code) => return code,
    };

    match store.create_folder(&folder).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&MkdirOutput {
                    status: "success",
                    folder: folder.to_string(),
                });
            } else {
                formatter.success(&format!("Created folder {folder}"));
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &format!("Failed to create {folder}"), &e),
    }
}
