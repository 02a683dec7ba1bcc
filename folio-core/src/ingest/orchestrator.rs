//! Top-level chunk pipeline
//!
//! One orchestrator ingests one document. Chunks arrive in file order;
//! every `process_chunk` call decodes, classifies, and re-derives
//! pagination over all lines seen so far. The final line of a non-final
//! chunk is deferred to the next call so a paragraph split across a chunk
//! boundary can never be misclassified.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::decode::detect;
use crate::decode::{CachingDecoderProvider, DecoderProvider};
use crate::error::{FolioError, Result};
use crate::ingest::boilerplate::BoilerplateStripper;
use crate::ingest::line::{LineContext, LineProcessor};
use crate::ingest::state::ProcessingState;
use crate::ingest::{
    BookMetadataProvider, FileNameMetadataProvider, IngestConfig, NullProgressSink, ProgressSink,
    Stage,
};
use crate::nav::TitleIndex;
use crate::paginate::{self, PageConfig};
use crate::titles::learn_from_sample;
use crate::types::{DocumentInfo, FootnoteEntry, LineRecord, PageBreakTable, TitleEntry};

/// Bytes of the first chunk fed to encoding detection
const ENCODING_SAMPLE_BYTES: usize = 8 * 1024;

/// Per-chunk options
#[derive(Debug, Clone, Default)]
pub struct ChunkOptions {
    /// Override the encoding for this document (first chunk only)
    pub encoding_override: Option<String>,

    /// Treat this chunk as the last even if fewer bytes than the declared
    /// file size have arrived
    pub final_chunk: bool,

    /// Re-run pattern detection over this chunk's sample
    pub force_pattern_redetection: bool,
}

/// Everything a renderer needs after one chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkOutput {
    /// Records produced by this chunk only
    pub line_records: Vec<LineRecord>,

    /// All titles detected so far
    pub titles: Vec<TitleEntry>,

    /// All footnotes discovered so far
    pub footnotes: Vec<FootnoteEntry>,

    /// Page breaks over all lines seen so far
    pub page_breaks: PageBreakTable,

    /// Index over `titles`
    pub title_index: TitleIndex,

    /// Document identity and detection results
    pub info: DocumentInfo,

    /// Running counters
    pub stats: IngestStats,
}

/// Running counters for one document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestStats {
    pub processed_lines: u32,
    pub title_count: usize,
    pub footnote_count: usize,
    pub page_count: usize,
    pub complete: bool,
}

/// Owns one document's [`ProcessingState`] and sequences the pipeline
pub struct ChunkOrchestrator {
    config: IngestConfig,
    provider: Arc<dyn DecoderProvider>,
    metadata: Box<dyn BookMetadataProvider>,
    progress: Box<dyn ProgressSink>,
    state: Option<ProcessingState>,
}

impl ChunkOrchestrator {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            provider: Arc::new(CachingDecoderProvider::new()),
            metadata: Box::new(FileNameMetadataProvider),
            progress: Box::new(NullProgressSink),
            state: None,
        }
    }

    /// Share a decoder provider across documents
    pub fn with_decoder_provider(mut self, provider: Arc<dyn DecoderProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_metadata_provider(mut self, provider: Box<dyn BookMetadataProvider>) -> Self {
        self.metadata = provider;
        self
    }

    pub fn with_progress_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Start ingesting a document. Resolves book metadata once and builds
    /// fresh per-document state; any previous state is discarded.
    pub fn initialize(&mut self, file_base_name: &str, file_size_bytes: u64) {
        let (book_name, author) = self.metadata.book_name_and_author(file_base_name);
        let stripper = BoilerplateStripper::new(&book_name, &author);
        let info = DocumentInfo::new(book_name, author, file_size_bytes);
        self.state = Some(ProcessingState::new(info, stripper));
    }

    /// Drop all per-document state without finishing ingestion
    pub fn abandon(&mut self) {
        self.state = None;
    }

    /// Read-only view of the current state
    pub fn state(&self) -> Option<&ProcessingState> {
        self.state.as_ref()
    }

    /// Process the next chunk of the document, in file order.
    pub fn process_chunk(&mut self, bytes: &[u8], options: &ChunkOptions) -> Result<ChunkOutput> {
        let state = self.state.as_mut().ok_or(FolioError::NotInitialized)?;
        let last = options.final_chunk
            || state.bytes_seen + bytes.len() as u64 >= state.info.file_size;

        // Resolve the decoder on the first chunk.
        if state.decoder.is_none() {
            let label = options
                .encoding_override
                .clone()
                .or_else(|| self.config.encoding_override.clone());
            let (decoder, confident) = match label {
                Some(label) => (self.provider.decoder(&label)?, true),
                None => {
                    let sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_BYTES)];
                    let (encoding, confident) = detect::sniff_encoding(sample);
                    (self.provider.decoder(encoding.name())?, confident)
                }
            };
            state.info.encoding = decoder.encoding_name().to_string();
            state.info.detection_confident = confident;
            state.decoder = Some(decoder);
        }

        let decoder = state.decoder.as_mut().ok_or(FolioError::NotInitialized)?;
        let decoded = decoder.decode(bytes, last)?;
        state.bytes_seen += bytes.len() as u64;

        let mut text = std::mem::take(&mut state.carry_text);
        text.push_str(&decoded);

        let mut parts: Vec<&str> = text.split('\n').collect();
        if last && parts.last() == Some(&"") {
            parts.pop();
        }

        // Language and pattern detection run over a bounded prefix sample,
        // once per document (or again on explicit request).
        if !state.pattern_detected || options.force_pattern_redetection {
            self.progress.on_progress(Stage::Detecting, 0, 0);

            let sample: Vec<&str> = parts
                .iter()
                .take(self.config.sample_lines_for_pattern_detection)
                .map(|&p| p.strip_suffix('\r').unwrap_or(p))
                .collect();

            let (language, language_confident) = match self.config.language_override {
                Some(language) => (language, true),
                None => detect::detect_language(&sample.join("\n")),
            };
            state.info.language = language;
            state.info.detection_confident =
                state.info.detection_confident && language_confident;

            if let Some(rule) = learn_from_sample(&sample, &state.rules) {
                state.rules = state.rules.with_learned(rule);
            }
            state.pattern_detected = true;
            tracing::debug!(
                language = ?state.info.language,
                encoding = %state.info.encoding,
                learned = state.rules.has_learned(),
                "detection complete"
            );
        }

        // All but the final two elements are processed now. The very last
        // element may be a partial line; the one before it stays back so
        // the last processed line still has a real lookahead.
        let (batch, tail): (&[&str], &[&str]) = if last {
            (&parts[..], &[][..])
        } else if parts.len() >= 2 {
            parts.split_at(parts.len() - 2)
        } else {
            (&[][..], &parts[..])
        };

        let file_size = state.info.file_size;
        let bytes_seen = state.bytes_seen;
        let language = state.info.language;
        let interval = self.config.progress_line_interval.max(1) as u64;

        let ProcessingState {
            ref rules,
            ref stripper,
            ref mut footnotes,
            ref mut lines,
            ref mut titles,
            ref mut drop_cap_pending,
            ref mut first_title_seen,
            ref mut next_line_number,
            ..
        } = *state;

        let processor = LineProcessor::new(rules, stripper, language);
        let mut ctx = LineContext {
            next_line: None,
            drop_cap_pending: *drop_cap_pending,
            first_title_seen: *first_title_seen,
        };

        let chunk_start = lines.len();
        for (i, &part) in batch.iter().enumerate() {
            let raw = part.strip_suffix('\r').unwrap_or(part);
            ctx.next_line = batch
                .get(i + 1)
                .or_else(|| tail.first())
                .map(|&p| p.strip_suffix('\r').unwrap_or(p));

            let line_number = *next_line_number;
            *next_line_number += 1;

            let (record, title) = processor.process(raw, line_number, &mut ctx, footnotes);
            if let Some(entry) = title {
                titles.push(entry);
            }
            lines.push(record);

            let processed = *next_line_number as u64;
            if processed % interval == 0 {
                let total = estimate_total_lines(processed, bytes_seen, file_size, last);
                self.progress
                    .on_progress(Stage::Processing, processed, total);
            }
        }
        *drop_cap_pending = ctx.drop_cap_pending;
        *first_title_seen = ctx.first_title_seen;

        state.carry_text = tail.join("\n");

        // Pagination is re-derived over everything seen so far; the tail of
        // an incomplete document stays provisional.
        let processed = state.next_line_number as u64;
        self.progress.on_progress(
            Stage::Paginating,
            processed,
            estimate_total_lines(processed, state.bytes_seen, file_size, last),
        );

        let wrap_columns = if state.info.language.is_eastern() {
            self.config.wrap_columns_eastern
        } else {
            self.config.wrap_columns_western
        };
        let page_config = PageConfig {
            target_lines_per_page: self.config.target_lines_per_page,
            break_on_title_boundary: self.config.break_on_title_boundary,
            document_complete: last,
            start_line: self.config.start_line,
            wrap_columns,
            title_lookback: self.config.title_break_lookback,
        };
        let page_breaks = paginate::calculate(&state.lines, &page_config);
        state.pagination_final = last;

        let title_index = TitleIndex::build(&state.titles);

        if last {
            self.progress
                .on_progress(Stage::Complete, processed, processed);
            tracing::info!(
                lines = state.lines.len(),
                titles = state.titles.len(),
                footnotes = state.footnotes.entries().len(),
                pages = page_breaks.page_count(),
                "ingestion complete"
            );
        }

        Ok(ChunkOutput {
            line_records: state.lines[chunk_start..].to_vec(),
            titles: state.titles.clone(),
            footnotes: state.footnotes.entries().to_vec(),
            stats: IngestStats {
                processed_lines: state.next_line_number,
                title_count: state.titles.len(),
                footnote_count: state.footnotes.entries().len(),
                page_count: page_breaks.page_count(),
                complete: last,
            },
            page_breaks,
            title_index,
            info: state.info.clone(),
        })
    }
}

fn estimate_total_lines(processed: u64, bytes_seen: u64, file_size: u64, complete: bool) -> u64 {
    if complete || bytes_seen == 0 {
        processed
    } else {
        (processed * file_size.max(bytes_seen)) / bytes_seen
    }
}
