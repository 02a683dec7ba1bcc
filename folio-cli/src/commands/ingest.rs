//! Ingest command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

use folio_core::{IngestConfig, ProgressSink, Stage};

use super::ingest_file;

/// Progress sink backed by an indicatif bar
struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        Self { bar }
    }
}

impl ProgressSink for BarSink {
    fn on_progress(&mut self, stage: Stage, processed_lines: u64, total_lines: u64) {
        if total_lines > 0 {
            self.bar.set_length(total_lines);
        }
        self.bar.set_position(processed_lines);
        self.bar.set_message(match stage {
            Stage::Detecting => "detecting patterns",
            Stage::Processing => "processing lines",
            Stage::Paginating => "paginating",
            Stage::Complete => "complete",
        });
        if stage == Stage::Complete {
            self.bar.finish_and_clear();
        }
    }
}

/// Ingest one text file and emit the document model as JSON
pub fn ingest(
    input: &str,
    output: Option<&str>,
    lines_per_page: u32,
    encoding: Option<String>,
    chunk_size: usize,
) -> Result<()> {
    let mut config = IngestConfig::default().with_target_lines_per_page(lines_per_page);
    if let Some(label) = encoding {
        config = config.with_encoding_override(label);
    }

    let model = ingest_file(
        Path::new(input),
        config,
        chunk_size,
        Some(Box::new(BarSink::new())),
    )?;

    tracing::info!(
        lines = model.stats.processed_lines,
        titles = model.stats.title_count,
        pages = model.stats.page_count,
        "ingested {}",
        input
    );

    let json = serde_json::to_string_pretty(&model)?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write output file: {}", path))?,
        None => println!("{}", json),
    }

    Ok(())
}
