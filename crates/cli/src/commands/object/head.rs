//! head command - show the status and headers of a HEAD request

use clap::Args;
use oss_core::{ObjectHead, ObjectStore};
use serde::Serialize;

use crate::commands::{parse_path, report};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Issue a HEAD request
#[derive(Args, Debug)]
pub struct HeadArgs {
    /// Remote path
    pub path: String,
}

#[derive(Debug, Serialize)]
struct HeadOutput<'a> {
    path: String,
    status: u16,
    headers: Vec<HeaderOutput<'a>>,
}

#[derive(Debug, Serialize)]
struct HeaderOutput<'a> {
    name: &'a str,
    value: &'a str,
}

pub async fn run(args: HeadArgs, store: &dyn ObjectStore, formatter: &Formatter) -> ExitCode {
    let path = match parse_path(&args.path, formatter) {
        Ok(path) => path,
        Err(code) => return code,
    };

    let head = match store.head_object(&path).await {
        Ok(head) => head,
        Err(e) => return report(formatter, &format!("Failed to head {path}"), &e),
    };

    if formatter.is_json() {
        formatter.json(&HeadOutput {
            path: path.to_string(),
            status: head.status,
            headers: head
                .headers
                .iter()
                .map(|(name, value)| HeaderOutput { name, value })
                .collect(),
        });
    } else {
        formatter.println(&format!("HTTP {}", head.status));
        for (name, value) in &head.headers {
            formatter.println(&format!("{name}: {value}"));
        }
    }

    status_exit_code(&head)
}

fn status_exit_code(head: &ObjectHead) -> ExitCode {
    match head.status {
        200 => ExitCode::Success,
        404 => ExitCode::NotFound,
        _ => ExitCode::ProtocolError,
    }
}
