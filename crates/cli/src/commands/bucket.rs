//! bucket command - inspect the buckets owned by the account

use clap::Subcommand;
use oss_core::ObjectStore;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

use super::{connect, report};

#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// List the buckets owned by the alias's account
    List,
}

/// Execute a bucket subcommand
pub async fn execute(cmd: BucketCommands, alias: Option<&str>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let client = match connect(alias, &formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };

    match cmd {
        BucketCommands::List => list(&client, &formatter).await,
    }
}

async fn list(store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let buckets = match store.list_buckets().await {
        Ok(buckets) => buckets,
        Err(e) => return report(formatter, "Failed to list buckets", &e),
    };

    if formatter.is_json() {
        formatter.json(&buckets);
        return ExitCode::Success;
    }

    formatter.heading(&format!(
        "Owner: {} ({})",
        buckets.owner.display_name, buckets.owner.id
    ));
    if buckets.buckets.is_empty() {
        formatter.println("No buckets.");
    }
    for bucket in &buckets.buckets {
        formatter.println(&format!(
            "{:<32} {:<20} {}",
            bucket.name, bucket.location, bucket.creation_date
        ));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::object::testing::MemoryStore;

    #[tokio::test]
    async fn test_list_buckets() {
        let store = MemoryStore::default();
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        assert_eq!(list(&store, &formatter).await, ExitCode::Success);
    }
}
