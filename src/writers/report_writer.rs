use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes serializable reports (rental analysis, integrity audit) as JSON.
pub struct JsonReportWriter {
    pretty: bool,
}

impl JsonReportWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn to_string<T: Serialize>(&self, report: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    pub fn write<T: Serialize>(&self, report: &T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, report)?;
        } else {
            serde_json::to_writer(&mut writer, report)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %path.display(), "wrote JSON report");
        Ok(())
    }
}

impl Default for JsonReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
