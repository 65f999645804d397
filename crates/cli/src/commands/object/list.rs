//! list command - list the files and folders of a folder

use clap::Args;
use oss_core::{Listing, ObjectStore};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

use super::human_size;
use crate::commands::{parse_path, report};

/// List a folder
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Remote folder (e.g., "/", "/docs/")
    #[arg(default_value = "/")]
    pub path: String,

    /// List the whole subtree instead of one level
    #[arg(short, long)]
    pub recursive: bool,
}

pub async fn run(args: ListArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let folder = match parse_path(&args.path, formatter) {
        Ok(path) => path.to_folder(),
        Err(code) => return code,
    };

    match store.list_folder(&folder, args.recursive).await {
        Ok(listing) => {
            if formatter.is_json() {
                formatter.json(&listing);
            } else {
                print_listing(&listing, formatter);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, &format!("Failed to list {folder}"), &e),
    }
}

fn print_listing(listing: &Listing, formatter: &Formatter) {
    formatter.heading("Files:");
    for file in &listing.files {
        let size = file
            .size_bytes()
            .map(human_size)
            .unwrap_or_else(|| file.size.clone());
        formatter.println(&format!(
            "  {:>10}  {:<24}  {}",
            size, file.last_modified, file.key
        ));
    }

    formatter.heading("Folders:");
    for folder in &listing.folders {
        formatter.println(&format!("  {folder}"));
    }
}
