//! End-to-end ingestion tests for folio-core
//!
//! These tests drive the chunk orchestrator the way a host application
//! would and verify the document model it produces.
//!
//! ## Test Strategy
//!
//! 1. **Scenario tests**: fixed bilingual inputs with known expected
//!    classifications (titles, footnotes, drop caps)
//! 2. **Chunking tests**: the same input split at line and byte boundaries
//!    must produce the same line records as one-shot processing
//! 3. **Navigation tests**: title index and reading progress over real
//!    ingestion output
//! 4. **Edge case tests**: encodings, degraded detection, error handling

use std::sync::{Arc, Mutex};

use folio_core::{
    reading_progress, ChunkOptions, ChunkOrchestrator, ChunkOutput, FolioError, IngestConfig,
    Language, LineKind, LineRecord, ProgressSink, Stage,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Ingest a whole document as a single final chunk
fn ingest_whole(text: &str, config: IngestConfig) -> ChunkOutput {
    let mut orchestrator = ChunkOrchestrator::new(config);
    orchestrator.initialize("test-book", text.len() as u64);
    orchestrator
        .process_chunk(text.as_bytes(), &ChunkOptions::default())
        .expect("single-chunk ingestion failed")
}

/// Ingest a document split at the given byte offsets, returning all line
/// records in order
fn ingest_chunked(text: &str, config: IngestConfig, splits: &[usize]) -> Vec<LineRecord> {
    let bytes = text.as_bytes();
    let mut orchestrator = ChunkOrchestrator::new(config);
    orchestrator.initialize("test-book", bytes.len() as u64);

    let mut records = Vec::new();
    let mut offset = 0;
    for &split in splits {
        let end = split.min(bytes.len());
        let out = orchestrator
            .process_chunk(&bytes[offset..end], &ChunkOptions::default())
            .expect("chunked ingestion failed");
        records.extend(out.line_records);
        offset = end;
    }
    let out = orchestrator
        .process_chunk(&bytes[offset..], &ChunkOptions::default())
        .expect("final chunk failed");
    records.extend(out.line_records);
    records
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_eastern_document_scenario() {
    let text = "第一章 开端\n这是正文第一段。\n①脚注内容\n正文continuing ①more";
    let out = ingest_whole(text, IngestConfig::default());

    assert_eq!(out.info.language, Language::Eastern);
    assert_eq!(out.line_records.len(), 4);

    // Line 0: a title with its full display text.
    let title_line = &out.line_records[0];
    assert!(title_line.is_title_boundary());
    assert_eq!(out.titles[0].display_text, "第一章 开端");
    assert_eq!(out.titles[0].line_number, 0);
    assert_eq!(out.titles[0].shortest_text, "开端");

    // Line 1: plain paragraph, no drop cap for Eastern documents.
    let paragraph = &out.line_records[1];
    assert_eq!(paragraph.kind, LineKind::Paragraph);
    assert!(!paragraph.markup.contains("drop-cap"));

    // Line 2: footnote body, excluded from the main flow.
    assert_eq!(out.line_records[2].kind, LineKind::Empty);
    assert_eq!(out.footnotes.len(), 1);
    assert_eq!(out.footnotes[0].ordinal, 0);
    assert_eq!(out.footnotes[0].body, "脚注内容");

    // Line 3: the embedded marker is replaced by an anchor to the footnote.
    let with_ref = &out.line_records[3];
    assert_eq!(with_ref.footnote_refs, vec![0]);
    assert!(with_ref.markup.contains(&format!("href=\"#{}\"", out.footnotes[0].anchor_id)));
}

#[test]
fn test_western_drop_cap_scenario() {
    let text = "Chapter 1: The Beginning\nIt was a dark and stormy night.\nNothing else happened.";
    let out = ingest_whole(text, IngestConfig::default());

    assert_eq!(out.info.language, Language::Western);
    assert!(out.line_records[0].is_title_boundary());

    // The first paragraph after the title gets a drop cap; the next does not.
    assert!(out.line_records[1]
        .markup
        .contains("<span class=\"drop-cap\">I</span>"));
    assert!(!out.line_records[2].markup.contains("drop-cap"));
}

#[test]
fn test_line_numbers_strictly_increasing_with_identifiers() {
    let text = "楔子\n一段。\n\n另一段。\n后记";
    let out = ingest_whole(text, IngestConfig::default());

    for (i, rec) in out.line_records.iter().enumerate() {
        assert_eq!(rec.line_number, i as u32);
        if rec.kind != LineKind::Empty {
            assert!(rec.markup.contains(&format!("id=\"line-{i}\"")));
        }
    }
}

#[test]
fn test_titles_ordered_and_unique() {
    let text = "第一章 起\n正文。\n第二章 承\n正文。\n第三章 转\n正文。\n第四章 合\n正文。";
    let out = ingest_whole(text, IngestConfig::default());

    let numbers: Vec<u32> = out.titles.iter().map(|t| t.line_number).collect();
    assert_eq!(numbers, vec![0, 2, 4, 6]);
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================================
// Chunking Tests
// =============================================================================

#[test]
fn test_chunk_boundary_transparency_at_line_breaks() {
    let text = "第一章 起点\n这是第一段正文内容。\n这是第二段正文内容。\n第二章 中途\n这是第三段正文内容。\n这是第四段正文内容。\n第三章 终点\n这是最后一段正文。";
    let config = IngestConfig::default().with_language_override(Language::Eastern);

    let whole = ingest_whole(text, config.clone());

    // Split exactly after a newline.
    let split_at = text.find("第二章").unwrap();
    let chunked = ingest_chunked(text, config, &[split_at]);

    assert_eq!(whole.line_records, chunked);
}

#[test]
fn test_chunk_transparency_with_mid_character_split() {
    let text = "第一章 起点\n这是第一段正文内容。\n这是第二段正文内容。\n第二章 中途\n这是第三段正文。";
    let config = IngestConfig::default().with_language_override(Language::Eastern);

    let whole = ingest_whole(text, config.clone());

    // Split inside a multi-byte character, nowhere near a line break.
    let chunked = ingest_chunked(text, config, &[7, 20]);

    assert_eq!(whole.line_records, chunked);
}

#[test]
fn test_footnote_ordinals_stable_across_runs() {
    let text = "正文②引用在前。\n①第一个脚注\n②第二个脚注\n又见①和②。";
    let a = ingest_whole(text, IngestConfig::default());
    let b = ingest_whole(text, IngestConfig::default());

    let ordinals = |out: &ChunkOutput| -> Vec<(u32, String)> {
        out.footnotes
            .iter()
            .map(|f| (f.ordinal, f.body.clone()))
            .collect()
    };
    assert_eq!(ordinals(&a), ordinals(&b));

    // ② is referenced before its body, so it takes ordinal 0.
    assert_eq!(a.line_records[0].footnote_refs, vec![0]);
    let second = a.footnotes.iter().find(|f| f.body == "第二个脚注").unwrap();
    assert_eq!(second.ordinal, 0);
    let first = a.footnotes.iter().find(|f| f.body == "第一个脚注").unwrap();
    assert_eq!(first.ordinal, 1);
}

#[test]
fn test_incomplete_document_pagination_is_provisional() {
    let mut lines = Vec::new();
    for c in 0..4 {
        lines.push(format!("第{c}章 标题"));
        for p in 0..30 {
            lines.push(format!("这是章节{c}里第{p}段的正文内容，足够长的一行。"));
        }
    }
    let text = lines.join("\n");
    let bytes = text.as_bytes();

    let mut orchestrator =
        ChunkOrchestrator::new(IngestConfig::default().with_target_lines_per_page(20));
    orchestrator.initialize("test-book", bytes.len() as u64);

    let mid = bytes.len() / 2;
    // Not byte-exact on a char boundary; the decoder carries the tail.
    let partial = orchestrator
        .process_chunk(&bytes[..mid], &ChunkOptions::default())
        .unwrap();
    assert!(!partial.stats.complete);

    let done = orchestrator
        .process_chunk(&bytes[mid..], &ChunkOptions::default())
        .unwrap();
    assert!(done.stats.complete);

    // The final table covers every line and keeps its invariants.
    let starts = done.page_breaks.starts();
    assert_eq!(starts[0], 0);
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
    assert!((*starts.last().unwrap() as usize) < lines.len());
    assert!(done.page_breaks.page_count() > 1);
}

#[test]
fn test_streaming_ingestion_from_disk() {
    use std::io::Read;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("长夜.txt");
    let text = "第一章 起点\n这是第一段正文内容。\n第二章 终点\n这是最后一段正文。";
    std::fs::write(&path, text).unwrap();

    let size = std::fs::metadata(&path).unwrap().len();
    let mut orchestrator = ChunkOrchestrator::new(IngestConfig::default());
    orchestrator.initialize("长夜", size);

    // Tiny read buffer: chunk boundaries land inside multi-byte characters.
    let mut file = std::fs::File::open(&path).unwrap();
    let mut buf = [0u8; 16];
    let mut final_output = None;
    loop {
        let n = file.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        final_output = Some(
            orchestrator
                .process_chunk(&buf[..n], &ChunkOptions::default())
                .unwrap(),
        );
    }

    let out = final_output.unwrap();
    assert!(out.stats.complete);
    assert_eq!(out.stats.title_count, 2);
    assert_eq!(out.info.book_name, "长夜");
    assert_eq!(out.stats.processed_lines, 4);
}

// =============================================================================
// Navigation Tests
// =============================================================================

#[test]
fn test_title_index_query_over_ingested_document() {
    let text = "第一章 起\n正文。\n正文。\n第二章 承\n正文。";
    let out = ingest_whole(text, IngestConfig::default());

    assert_eq!(out.title_index.query_active_title(0), Some(0));
    assert_eq!(out.title_index.query_active_title(2), Some(0));
    assert_eq!(out.title_index.query_active_title(3), Some(3));
    assert_eq!(out.title_index.query_active_title(4), Some(3));
}

#[test]
fn test_title_index_sentinel_before_first_title() {
    let text = "引言之前的一行正文。\n第一章 起\n正文。";
    let out = ingest_whole(text, IngestConfig::default());

    assert_eq!(out.title_index.query_active_title(0), None);
    assert_eq!(out.title_index.query_active_title(1), Some(1));
}

#[test]
fn test_reading_progress_endpoints() {
    let lines: Vec<String> = (0..60).map(|i| format!("第{i}行的正文内容。")).collect();
    let text = lines.join("\n");
    let out = ingest_whole(
        &text,
        IngestConfig::default().with_target_lines_per_page(20),
    );

    let total = out.stats.processed_lines;
    assert_eq!(reading_progress(0, &out.page_breaks, 1, total), 0.0);

    let last_page = out.page_breaks.page_count();
    assert_eq!(
        reading_progress(total - 1, &out.page_breaks, last_page, total),
        100.0
    );
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_gbk_document_detected_and_decoded() {
    let source = "第一章 开端\n这是正文的第一段内容。";
    let (bytes, _, _) = encoding_rs::GB18030.encode(source);

    let mut orchestrator = ChunkOrchestrator::new(IngestConfig::default());
    orchestrator.initialize("test-book", bytes.len() as u64);
    let out = orchestrator
        .process_chunk(&bytes, &ChunkOptions::default())
        .unwrap();

    assert_eq!(out.info.encoding, "gb18030");
    assert_eq!(out.info.language, Language::Eastern);
    assert_eq!(out.titles[0].display_text, "第一章 开端");
}

#[test]
fn test_encoding_override_wins_over_detection() {
    let text = "Chapter 1\nPlain ascii text.";
    let out = ingest_whole(
        text,
        IngestConfig::default().with_encoding_override("windows-1252"),
    );
    assert_eq!(out.info.encoding, "windows-1252");
}

#[test]
fn test_malformed_bytes_abort_chunk() {
    let mut orchestrator =
        ChunkOrchestrator::new(IngestConfig::default().with_encoding_override("UTF-8"));
    orchestrator.initialize("test-book", 4);
    let err = orchestrator
        .process_chunk(&[0xff, 0xfe, 0x61, 0x62], &ChunkOptions::default())
        .unwrap_err();
    assert!(matches!(err, FolioError::Decode(_)));
}

#[test]
fn test_empty_document_degrades_gracefully() {
    let out = ingest_whole("", IngestConfig::default());
    assert!(!out.info.detection_confident);
    assert_eq!(out.info.language, Language::Western);
    assert!(out.line_records.is_empty());
    assert!(out.titles.is_empty());
}

// =============================================================================
// Progress Signal Tests
// =============================================================================

#[derive(Clone, Default)]
struct CollectingSink {
    events: Arc<Mutex<Vec<(Stage, u64, u64)>>>,
}

impl ProgressSink for CollectingSink {
    fn on_progress(&mut self, stage: Stage, processed_lines: u64, total_lines: u64) {
        self.events
            .lock()
            .unwrap()
            .push((stage, processed_lines, total_lines));
    }
}

#[test]
fn test_progress_signals_bounded_and_ordered() {
    let lines: Vec<String> = (0..2000).map(|i| format!("第{i}行正文。")).collect();
    let text = lines.join("\n");

    let sink = CollectingSink::default();
    let events = sink.events.clone();

    let mut orchestrator =
        ChunkOrchestrator::new(IngestConfig::default()).with_progress_sink(Box::new(sink));
    orchestrator.initialize("test-book", text.len() as u64);
    orchestrator
        .process_chunk(text.as_bytes(), &ChunkOptions::default())
        .unwrap();

    let events = events.lock().unwrap();
    // Far fewer signals than lines, and the pipeline stages appear in order.
    assert!(events.len() < 100);
    assert_eq!(events.first().unwrap().0, Stage::Detecting);
    assert_eq!(events.last().unwrap().0, Stage::Complete);
    assert!(events.iter().any(|e| e.0 == Stage::Processing));
    assert!(events.iter().any(|e| e.0 == Stage::Paginating));
}
