use anyhow::Context;
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use ctxsnap::{Header, SnapshotInspector, StatusLevel, StatusLog, StatusSink};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One status line per header field
    #[default]
    Text,
    /// A single table
    Table,
    /// Machine readable JSON on stdout
    Json,
}

#[derive(Debug, Serialize)]
pub struct HeaderReport {
    pub number_of_contexts: u32,
    pub rehashability: u32,
    pub checksum: String,
    pub version: String,
    pub offset_to_read_only: u32,
    pub offset_to_context_0: u32,
    pub offset_to_context_1: u32,
}

impl From<&Header> for HeaderReport {
    fn from(header: &Header) -> Self {
        Self {
            number_of_contexts: header.number_of_contexts,
            rehashability: header.rehashability,
            checksum: header.checksum.to_hex(),
            version: header.version_text(),
            offset_to_read_only: header.offset_to_read_only,
            offset_to_context_0: header.offset_to_context_0,
            offset_to_context_1: header.offset_to_context_1,
        }
    }
}

pub fn run(
    inspector: &SnapshotInspector,
    snapshot_path: &Path,
    format: OutputFormat,
    sink: &mut dyn StatusSink,
) -> anyhow::Result<()> {
    if format == OutputFormat::Text {
        inspector.describe_path(snapshot_path, sink)?;
        return Ok(());
    }

    // Field lines are replaced by the rendered output; everything else still reaches the sink.
    let mut log = StatusLog::new();
    let outcome = inspector.describe_path(snapshot_path, &mut log);
    for line in log.lines().iter().filter(|l| l.level != StatusLevel::Info) {
        sink.emit(line.level, &line.message);
    }
    let header = outcome?;

    let rendered = match format {
        OutputFormat::Json => render_json(&header),
        _ => Ok(render_table(&header)),
    };
    match rendered {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            sink.error(&format!("{err:#}"));
            return Err(err);
        }
    }

    Ok(())
}

pub fn render_table(header: &Header) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Number of contexts".to_string(), header.number_of_contexts.to_string()]);
    table.add_row(vec!["Rehashability".to_string(), header.rehashability.to_string()]);
    table.add_row(vec!["Checksum".to_string(), header.checksum.to_hex()]);
    table.add_row(vec!["Version string".to_string(), header.version_text()]);
    table.add_row(vec!["Offset to readonly".to_string(), header.offset_to_read_only.to_string()]);
    table.add_row(vec!["Offset to context 0".to_string(), header.offset_to_context_0.to_string()]);
    table.add_row(vec!["Offset to context 1".to_string(), header.offset_to_context_1.to_string()]);

    table.to_string()
}

pub fn render_json(header: &Header) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&HeaderReport::from(header)).context("Failed to serialize header")
}
