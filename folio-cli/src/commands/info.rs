//! Info command implementation

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use folio_core::IngestConfig;

use super::ingest_file;

/// Document info output
#[derive(Serialize)]
struct DocumentSummary {
    book_name: String,
    author: String,
    encoding: String,
    language: String,
    lines: u32,
    titles: usize,
    footnotes: usize,
    pages: usize,
    first_titles: Vec<String>,
}

/// Display summary information about a text file
pub fn info(input: &str, json: bool) -> Result<()> {
    let config = IngestConfig::default();
    let chunk_size = config.initial_chunk_size_bytes;
    let model = ingest_file(Path::new(input), config, chunk_size, None)?;

    let summary = DocumentSummary {
        book_name: model.info.book_name.clone(),
        author: model.info.author.clone(),
        encoding: model.info.encoding.clone(),
        language: format!("{:?}", model.info.language),
        lines: model.stats.processed_lines,
        titles: model.stats.title_count,
        footnotes: model.stats.footnote_count,
        pages: model.stats.page_count,
        first_titles: model
            .titles
            .iter()
            .take(10)
            .map(|t| t.display_text.clone())
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Book:      {}", summary.book_name);
        if !summary.author.is_empty() {
            println!("Author:    {}", summary.author);
        }
        println!("Encoding:  {}", summary.encoding);
        println!("Language:  {}", summary.language);
        println!("Lines:     {}", summary.lines);
        println!("Titles:    {}", summary.titles);
        println!("Footnotes: {}", summary.footnotes);
        println!("Pages:     {}", summary.pages);
        if !summary.first_titles.is_empty() {
            println!("Contents:");
            for title in &summary.first_titles {
                println!("  {}", title);
            }
        }
    }

    Ok(())
}
