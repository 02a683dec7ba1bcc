//! CLI command implementations

mod batch;
mod info;
mod ingest;

pub use batch::batch;
pub use info::info;
pub use ingest::ingest;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use folio_core::{
    ChunkOptions, ChunkOrchestrator, DocumentInfo, FootnoteEntry, IngestConfig, IngestStats,
    LineRecord, ProgressSink, TitleEntry,
};

/// The complete ingestion result written out as JSON
#[derive(Serialize)]
pub struct DocumentModel {
    pub info: DocumentInfo,
    pub stats: IngestStats,
    pub titles: Vec<TitleEntry>,
    pub footnotes: Vec<FootnoteEntry>,
    pub page_breaks: Vec<u32>,
    pub lines: Vec<LineRecord>,
}

/// Stream one file through the engine in fixed-size chunks
pub fn ingest_file(
    path: &Path,
    config: IngestConfig,
    chunk_size: usize,
    sink: Option<Box<dyn ProgressSink>>,
) -> Result<DocumentModel> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let size = file.metadata()?.len();
    let base_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    let mut orchestrator = ChunkOrchestrator::new(config);
    if let Some(sink) = sink {
        orchestrator = orchestrator.with_progress_sink(sink);
    }
    orchestrator.initialize(base_name, size);

    let mut reader = BufReader::new(file);
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut last_output = None;

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        let out = orchestrator
            .process_chunk(&buf[..n], &ChunkOptions::default())
            .with_context(|| format!("Failed to ingest {}", path.display()))?;
        last_output = Some(out);
    }

    // Empty file: run one final empty chunk so the model is well-formed.
    let out = match last_output {
        Some(out) => out,
        None => orchestrator.process_chunk(
            &[],
            &ChunkOptions {
                final_chunk: true,
                ..Default::default()
            },
        )?,
    };

    let lines = orchestrator
        .state()
        .map(|s| s.lines().to_vec())
        .unwrap_or_default();

    Ok(DocumentModel {
        info: out.info,
        stats: out.stats,
        titles: out.titles,
        footnotes: out.footnotes,
        page_breaks: out.page_breaks.starts().to_vec(),
        lines,
    })
}
