use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

use super::events::TraceEvent;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trace encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How a file sink lays out each event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TraceFormat {
    /// One human-readable line per event
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl TraceFormat {
    pub fn render(self, event: &TraceEvent) -> Result<String, TraceError> {
        match self {
            TraceFormat::Text => Ok(event.to_string()),
            TraceFormat::Json => Ok(serde_json::to_string(event)?),
        }
    }
}

/// Append-only destination for trace events
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError>;
    async fn flush(&self) -> Result<(), TraceError>;
}

/// Writes trace lines to a file.
///
/// The writer sits behind its own lock, so events recorded outside the table
/// lock still come out as whole lines.
pub struct FileTraceSink {
    path: PathBuf,
    format: TraceFormat,
    writer: tokio::sync::Mutex<BufWriter<File>>,
}

impl FileTraceSink {
    /// Creates (or truncates) the trace file
    #[instrument]
    pub async fn create(path: &Path, format: TraceFormat) -> Result<Self, TraceError> {
        let file = File::create(path).await?;
        debug!(path = %path.display(), %format, "Opened trace file");

        Ok(Self {
            path: path.to_path_buf(),
            format,
            writer: tokio::sync::Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TraceSink for FileTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError> {
        let mut line = self.format.render(&event)?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), TraceError> {
        let mut writer = self.writer.lock().await;
        writer.flush().await?;
        Ok(())
    }
}

/// Keeps every event in memory, for tests and for inspecting a run afterwards
#[derive(Default)]
pub struct InMemoryTraceSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl InMemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Text lines as a file sink would have written them
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(TraceEvent::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TraceSink for InMemoryTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }

    async fn flush(&self) -> Result<(), TraceError> {
        Ok(())
    }
}
