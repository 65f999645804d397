//! Progress bar utilities for transfer operations
//!
//! Provides consistent progress indication for uploads and downloads.

use oss_core::ObjectReader;
use tokio::io::{AsyncRead, AsyncWrite};

use super::OutputConfig;

const BYTES_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";
const STREAM_TEMPLATE: &str = "{spinner:.green} {msg} {bytes} ({bytes_per_sec})";

/// Progress bar wrapper
///
/// Handles progress display based on output configuration.
/// In quiet or JSON mode, progress is suppressed.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    fn enabled(config: &OutputConfig) -> bool {
        !(config.quiet || config.json || config.no_progress)
    }

    /// Create a byte progress bar; an unknown total shows a byte counter instead
    pub fn new(config: &OutputConfig, total: Option<u64>, message: &str) -> Self {
        if !Self::enabled(config) {
            return Self { bar: None };
        }

        let (bar, template) = match total {
            Some(total) => (indicatif::ProgressBar::new(total), BYTES_TEMPLATE),
            None => (indicatif::ProgressBar::new_spinner(), STREAM_TEMPLATE),
        };
        if let Ok(style) = indicatif::ProgressStyle::default_bar().template(template) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(message.to_string());

        Self { bar: Some(bar) }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        if !Self::enabled(config) {
            return Self { bar: None };
        }

        let bar = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar: Some(bar) }
    }

    /// Wrap an upload source so reads advance the bar
    pub fn reader<R>(&self, reader: R) -> ObjectReader
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        match &self.bar {
            Some(bar) => Box::new(bar.wrap_async_read(reader)),
            None => Box::new(reader),
        }
    }

    /// Wrap a download sink so writes advance the bar
    pub fn writer<W>(&self, writer: W) -> Box<dyn AsyncWrite + Send + Unpin>
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        match &self.bar {
            Some(bar) => Box::new(bar.wrap_async_write(writer)),
            None => Box::new(writer),
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}
