//! CLI command definitions and execution
//!
//! Commands are grouped by what they act on: aliases (local config), the
//! account's buckets, and the objects of the bucket an alias points at.

use clap::{Parser, Subcommand};
use oss_client::OssClient;
use oss_core::{AliasManager, Error, ObjectPath};
use tracing::debug;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, describe_error};

mod alias;
mod bucket;
mod object;

/// ossc - OSS object-storage client
///
/// Lists, transfers, shares and deletes objects in OSS buckets.
/// Buckets and credentials are configured as named aliases.
#[derive(Parser, Debug)]
#[command(name = "ossc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Alias to use (defaults to the configured default alias)
    #[arg(short, long, global = true, env = "OSSC_ALIAS")]
    pub alias: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage bucket aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// Inspect the account's buckets
    #[command(subcommand)]
    Bucket(bucket::BucketCommands),

    /// List, transfer, share and delete objects
    #[command(subcommand)]
    Object(object::ObjectCommands),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    if output_config.no_color || output_config.json {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match cli.command {
        Commands::Alias(cmd) => alias::execute(cmd, output_config).await,
        Commands::Bucket(cmd) => bucket::execute(cmd, cli.alias.as_deref(), output_config).await,
        Commands::Object(cmd) => object::execute(cmd, cli.alias.as_deref(), output_config).await,
    }
}

/// Print `err` prefixed with `context` and map it to an exit code
pub(crate) fn report(formatter: &Formatter, context: &str, err: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {}", describe_error(err)));
    ExitCode::from(err)
}

/// Print an error chain and map it to an exit code
///
/// Local filesystem failures carry no store error and exit with
/// `GeneralError`; the chain stops at the first store error.
pub(crate) fn report_chain(formatter: &Formatter, err: &anyhow::Error) -> ExitCode {
    let mut parts = Vec::new();
    let mut code = ExitCode::GeneralError;
    for cause in err.chain() {
        if let Some(store_err) = cause.downcast_ref::<Error>() {
            parts.push(describe_error(store_err));
            code = ExitCode::from(store_err);
            break;
        }
        parts.push(cause.to_string());
    }
    formatter.error(&parts.join(": "));
    code
}

/// Resolve the alias and build a client for its bucket
pub(crate) fn connect(alias: Option<&str>, formatter: &Formatter) -> Result<OssClient, ExitCode> {
    let manager = AliasManager::new().map_err(|e| report(formatter, "Failed to load aliases", &e))?;
    let alias = manager
        .resolve(alias)
        .map_err(|e| report(formatter, "Failed to resolve alias", &e))?;
    debug!(alias = %alias.name, bucket = %alias.bucket, location = %alias.location, "Resolved alias");
    OssClient::new(&alias).map_err(|e| report(formatter, "Failed to create client", &e))
}

/// Parse a remote path argument
pub(crate) fn parse_path(raw: &str, formatter: &Formatter) -> Result<ObjectPath, ExitCode> {
    ObjectPath::parse(raw).map_err(|e| report(formatter, "Invalid remote path", &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ossc", "object", "list", "docs/", "--json", "--alias", "prod",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.alias.as_deref(), Some("prod"));
        assert!(matches!(cli.command, Commands::Object(_)));
    }

    #[test]
    fn test_report_maps_exit_code() {
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        let code = report(&formatter, "Failed", &Error::NotFound("/x".into()));
        assert_eq!(code, ExitCode::NotFound);

        let code = report(&formatter, "Failed", &Error::protocol(500, "boom"));
        assert_eq!(code, ExitCode::ProtocolError);
    }

    #[test]
    fn test_report_chain_finds_store_error() {
        use anyhow::Context;

        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        let err = Err::<(), _>(Error::BucketNotFound("media".into()))
            .context("Failed to list /docs/")
            .unwrap_err();
        assert_eq!(report_chain(&formatter, &err), ExitCode::AuthError);

        let err = anyhow::anyhow!("disk full");
        assert_eq!(report_chain(&formatter, &err), ExitCode::GeneralError);
    }

    #[test]
    fn test_parse_path_rejects_empty() {
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        assert_eq!(parse_path("", &formatter).unwrap_err(), ExitCode::UsageError);
        assert_eq!(parse_path("docs/a.txt", &formatter).unwrap().key(), "docs/a.txt");
    }
}
