//! Alias management commands
//!
//! Aliases are named bucket profiles: bucket, data-center location,
//! endpoint domain and the access key used to sign requests.

use clap::Subcommand;
use oss_core::endpoint::{DEFAULT_DOMAIN, KNOWN_LOCATIONS, is_known_location};
use oss_core::{Alias, AliasManager, EndpointConfig};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

use super::report;

/// Alias subcommands for managing bucket profiles
#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add or update an alias
    Set(SetArgs),

    /// List all configured aliases
    List(ListArgs),

    /// Remove an alias
    Remove(RemoveArgs),
}

/// Arguments for the `alias set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Alias name (e.g., "default", "media")
    pub name: String,

    /// Bucket name
    pub bucket: String,

    /// Data-center location (e.g., "oss-cn-hangzhou")
    pub location: String,

    /// Access key ID
    pub access_key_id: String,

    /// Access key secret
    pub access_key_secret: String,

    /// Endpoint domain
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Allow invalid TLS certificates
    #[arg(long, default_value = "false")]
    pub insecure: bool,

    /// Use plain http instead of https
    #[arg(long, default_value = "false")]
    pub http: bool,
}

/// Arguments for the `alias list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including endpoints
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `alias remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the alias to remove
    pub name: String,
}

/// JSON output for alias list
#[derive(Serialize)]
struct AliasListOutput {
    aliases: Vec<AliasInfo>,
}

/// Alias information for output (never includes the secret)
#[derive(Serialize)]
struct AliasInfo {
    name: String,
    bucket: String,
    location: String,
    endpoint: String,
    access_key_id: String,
}

impl From<&Alias> for AliasInfo {
    fn from(alias: &Alias) -> Self {
        let endpoint = EndpointConfig::from(alias);
        let scheme = if endpoint.secure { "https" } else { "http" };
        Self {
            name: alias.name.clone(),
            bucket: alias.bucket.clone(),
            location: alias.location.clone(),
            endpoint: format!("{scheme}://{}", endpoint.host()),
            access_key_id: alias.access_key_id.clone(),
        }
    }
}

/// JSON output for alias set/remove operations
#[derive(Serialize)]
struct AliasOperationOutput {
    success: bool,
    alias: String,
    message: String,
}

/// Execute an alias subcommand
pub async fn execute(cmd: AliasCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match AliasManager::new() {
        Ok(am) => am,
        Err(e) => return report(&formatter, "Failed to load aliases", &e),
    };
    run(cmd, &manager, &formatter)
}

fn run(cmd: AliasCommands, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    match cmd {
        AliasCommands::Set(args) => execute_set(args, manager, formatter),
        AliasCommands::List(args) => execute_list(args, manager, formatter),
        AliasCommands::Remove(args) => execute_remove(args, manager, formatter),
    }
}

fn execute_set(args: SetArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    for (value, what) in [
        (&args.name, "Alias name"),
        (&args.bucket, "Bucket"),
        (&args.location, "Location"),
        (&args.domain, "Domain"),
    ] {
        if value.trim().is_empty() {
            formatter.error(&format!("{what} cannot be empty"));
            return ExitCode::UsageError;
        }
    }

    if !is_known_location(&args.location) {
        formatter.warning(&format!(
            "Unknown location '{}' (known: {})",
            args.location,
            KNOWN_LOCATIONS.join(", ")
        ));
    }

    let mut alias = Alias::new(
        &args.name,
        &args.bucket,
        &args.location,
        &args.access_key_id,
        &args.access_key_secret,
    );
    alias.domain = args.domain;
    alias.secure = !args.http;
    alias.insecure = args.insecure;

    match manager.set(alias) {
        Ok(()) => {
            let message = format!("Alias '{}' configured successfully", args.name);
            if formatter.is_json() {
                formatter.json(&AliasOperationOutput {
                    success: true,
                    alias: args.name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to save alias", &e),
    }
}

fn execute_list(args: ListArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    let aliases = match manager.list() {
        Ok(aliases) => aliases,
        Err(e) => return report(formatter, "Failed to load aliases", &e),
    };

    if formatter.is_json() {
        formatter.json(&AliasListOutput {
            aliases: aliases.iter().map(AliasInfo::from).collect(),
        });
    } else if aliases.is_empty() {
        formatter.println("No aliases configured.");
    } else {
        for info in aliases.iter().map(AliasInfo::from) {
            if args.long {
                formatter.println(&format!(
                    "{:<12} {:<20} {} (location: {}, key: {})",
                    info.name, info.bucket, info.endpoint, info.location, info.access_key_id
                ));
            } else {
                formatter.println(&format!("{:<12} {}", info.name, info.bucket));
            }
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            let message = format!("Alias '{}' removed successfully", args.name);
            if formatter.is_json() {
                formatter.json(&AliasOperationOutput {
                    success: true,
                    alias: args.name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to remove alias", &e),
    }
}
