//! Batch ingestion command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use folio_core::IngestConfig;

use super::ingest_file;

/// Ingest every text file in a directory, writing one JSON model per file
pub fn batch(input_dir: &str, output_dir: &str, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    fs::create_dir_all(output_path)?;

    let files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read input directory: {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        println!("No text files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} files to ingest", files.len());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    pool.install(|| {
        files.par_iter().for_each(|file_path| {
            let result = ingest_one(file_path, output_path);
            match result {
                Ok(()) => {
                    success_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Failed to ingest {:?}: {}", file_path, e);
                }
            }
            progress.inc(1);
        });
    });

    progress.finish_and_clear();
    println!(
        "Ingested {} files, {} failed",
        success_count.load(Ordering::Relaxed),
        error_count.load(Ordering::Relaxed)
    );

    Ok(())
}

fn ingest_one(file_path: &Path, output_dir: &Path) -> Result<()> {
    let config = IngestConfig::default();
    let chunk_size = config.initial_chunk_size_bytes;
    let model = ingest_file(file_path, config, chunk_size, None)?;

    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let output_file = output_dir.join(format!("{stem}.json"));

    let json = serde_json::to_string_pretty(&model)?;
    fs::write(&output_file, json)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;

    tracing::info!("Ingested {:?} -> {:?}", file_path, output_file);
    Ok(())
}
