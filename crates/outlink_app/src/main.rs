mod args;
mod config;
mod logging;
mod output;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use crawl_logging::{crawl_debug, crawl_info};
use log::LevelFilter;
use outlink_engine::{EngineEvent, EngineHandle, ExtractOutcome};

use crate::args::Args;
use crate::config::AppConfig;
use crate::logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match args.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    logging::initialize(destination, level);

    let config = match args.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let scope = args
        .scope
        .as_deref()
        .map(output::compile_scope)
        .transpose()
        .context("invalid --scope pattern")?;

    let urls = if args.urls.is_empty() {
        read_urls(io::stdin().lock())?
    } else {
        args.urls.clone()
    };

    let engine = EngineHandle::new(config.fetch_settings(), config.extractor_settings()?)
        .context("failed to start extraction engine")?;
    for (job_id, url) in (0u64..).zip(urls.iter()) {
        engine.enqueue(job_id, url.as_str());
    }

    let mut stdout = io::stdout().lock();
    let mut extracted = 0usize;
    for _ in 0..urls.len() {
        let Some(EngineEvent::JobCompleted {
            source_url,
            outcome,
            ..
        }) = engine.recv()
        else {
            break;
        };
        match outcome {
            ExtractOutcome::Extracted(result) => {
                let result = match &scope {
                    Some(scope) => result.retain_matching(scope),
                    None => result,
                };
                writeln!(stdout, "{}", output::json_line(&result, Utc::now()))?;
                extracted += 1;
            }
            ExtractOutcome::NoResult(reason) => {
                crawl_debug!("no result for {source_url}: {reason}");
            }
            // already reported by the extractor
            ExtractOutcome::Fault(_) => {}
        }
    }

    crawl_info!("{extracted} of {} pages yielded outlinks", urls.len());
    Ok(())
}

/// Non-empty, trimmed lines.
fn read_urls<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            urls.push(trimmed.to_string());
        }
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::read_urls;

    #[test]
    fn stdin_urls_are_trimmed_and_blank_lines_skipped() {
        let input = "https://a.example.com \n\n  https://b.example.com\n   \n";
        let urls = read_urls(input.as_bytes()).unwrap();
        assert_eq!(urls, vec!["https://a.example.com", "https://b.example.com"]);
    }
}
