//! object commands - act on the objects of the alias's bucket
//!
//! Every subcommand runs against `&dyn ObjectStore`, so the same code
//! drives the HTTP client and the in-memory store used by the tests.

use clap::Subcommand;
use oss_core::ObjectStore;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

use super::connect;

mod delete;
mod download;
mod head;
mod list;
mod mkdir;
mod sign;
mod upload;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Subcommand, Debug)]
pub enum ObjectCommands {
    /// List the files and folders of a folder
    List(list::ListArgs),

    /// Create a folder
    Mkdir(mkdir::MkdirArgs),

    /// Show the status and headers of a HEAD request
    Head(head::HeadArgs),

    /// Build a share link, optionally signed with an expiry
    Sign(sign::SignArgs),

    /// Download a file or a whole folder
    Download(download::DownloadArgs),

    /// Upload local files and directories into a folder
    Upload(upload::UploadArgs),

    /// Delete a file, or a folder and everything below it
    Delete(delete::DeleteArgs),
}

/// Execute an object subcommand
pub async fn execute(cmd: ObjectCommands, alias: Option<&str>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let client = match connect(alias, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };
    run(cmd, &client, &formatter).await
}

async fn run(cmd: ObjectCommands, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    match cmd {
        ObjectCommands::List(args) => list::run(args, store, formatter).await,
        ObjectCommands::Mkdir(args) => mkdir::run(args, store, formatter).await,
        ObjectCommands::Head(args) => head::run(args, store, formatter).await,
        ObjectCommands::Sign(args) => sign::run(args, store, formatter).await,
        ObjectCommands::Download(args) => download::run(args, store, formatter).await,
        ObjectCommands::Upload(args) => upload::run(args, store, formatter).await,
        ObjectCommands::Delete(args) => delete::run(args, store, formatter).await,
    }
}

/// Human-readable size of a byte count
pub(crate) fn human_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
