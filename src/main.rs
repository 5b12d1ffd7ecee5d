//! `license-matchr` — identify licenses by canonical URL or by template similarity.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config (`license_matchr::config::load_config`) and apply CLI overrides.
//! 3. Build the license registry once (`Config::build_registry`).
//! 4. Classify the requested inputs: URLs, files/stdin, or a scanned tree.
//! 5. Optionally download unknown URLs and match their text (`--online`, [`remote`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` under `--strict` when any input stayed unclassified.

mod cli;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cli::{Cli, Command, ReportFormat};
use license_matchr::config::load_config;
use license_matchr::detector::find_license_files;
use license_matchr::models::{Classification, InputKind, LicenseSummary};
use license_matchr::license::strip_bom;
use license_matchr::{remote, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("license_matchr=warn")),
        )
        .init();

    let cli = Cli::parse();
    let global = &cli.global;

    let project_path = match &cli.command {
        Command::Scan { path, .. } => path.clone(),
        _ => PathBuf::from("."),
    };

    let mut config = load_config(&project_path, global.config.as_deref())?;
    if let Some(dir) = &global.templates {
        config.matching.templates_dir = Some(dir.clone());
    }
    if let Some(threshold) = global.threshold {
        config.matching.threshold = threshold;
    }
    config.validate()?;

    let registry = config.build_registry()?;
    info!(
        licenses = registry.len(),
        threshold = registry.threshold(),
        "license registry ready"
    );

    let (results, heading) = match &cli.command {
        Command::List => {
            let licenses: Vec<LicenseSummary> = registry.iter().map(LicenseSummary::from).collect();
            match global.report {
                ReportFormat::Terminal => report::terminal::render_registry(&licenses, registry.threshold()),
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&licenses)?),
            }
            return Ok(());
        }
        Command::Url { urls, online } => {
            let mut results: Vec<Classification> = urls
                .iter()
                .map(|url| match registry.find_by_url(url) {
                    Some(license) => Classification::by_url(url.as_str(), license),
                    None => Classification::unmatched(url.as_str(), InputKind::Url),
                })
                .collect();

            if *online {
                enrich_online(&registry, &mut results, global.quiet).await?;
            }
            (results, format!("Classifying {} URL(s)", urls.len()))
        }
        Command::Text { files } => {
            let results = classify_files(&registry, files, std::io::stdin().lock());
            (results, format!("Classifying {} input(s) by text", files.len().max(1)))
        }
        Command::Scan { path, max_depth } => {
            let files = find_license_files(path, *max_depth)
                .with_context(|| format!("failed to scan {}", path.display()))?;

            if files.is_empty() && !global.quiet {
                eprintln!("  {} no license files found in {}", "→".cyan(), path.display());
            }

            let results = scan_files(&registry, &files, global.quiet);
            (results, format!("Scanning: {}", path.display()))
        }
    };

    match global.report {
        ReportFormat::Terminal => {
            report::terminal::render(&results, &heading, global.verbose, global.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    let has_unclassified = results.iter().any(|r| !r.is_classified());
    if global.strict && has_unclassified {
        std::process::exit(1);
    }

    Ok(())
}

/// Classify each file by text; no files (or `-`) means stdin.
///
/// Stdin is read at most once; repeated `-` arguments are dropped.
fn classify_files<R: Read>(registry: &Registry, files: &[PathBuf], mut stdin: R) -> Vec<Classification> {
    if files.is_empty() {
        return vec![classify_stdin(registry, &mut stdin)];
    }

    let mut stdin_read = false;
    files
        .iter()
        .filter_map(|path| {
            if path.as_os_str() != "-" {
                return Some(classify_file(registry, path));
            }
            if stdin_read {
                return None;
            }
            stdin_read = true;
            Some(classify_stdin(registry, &mut stdin))
        })
        .collect()
}

fn classify_stdin(registry: &Registry, stdin: &mut impl Read) -> Classification {
    let mut text = String::new();
    match stdin.read_to_string(&mut text) {
        Ok(_) => Classification::by_text("<stdin>", InputKind::Stdin, registry.rank_text(strip_bom(&text))),
        Err(e) => Classification::failed("<stdin>", InputKind::Stdin, e),
    }
}

fn classify_file(registry: &Registry, path: &Path) -> Classification {
    let input = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(text) => Classification::by_text(input, InputKind::File, registry.rank_text(strip_bom(&text))),
        Err(e) => Classification::failed(input, InputKind::File, e),
    }
}

fn scan_files(registry: &Registry, files: &[PathBuf], quiet: bool) -> Vec<Classification> {
    let pb = progress_bar(files.len(), quiet);

    let results = files
        .iter()
        .map(|path| {
            let result = classify_file(registry, path);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    results
}

/// Download URLs that had no exact match and classify the response bodies.
async fn enrich_online(registry: &Registry, results: &mut [Classification], quiet: bool) -> Result<()> {
    use futures::future::join_all;

    const BATCH_SIZE: usize = 25;

    let client = remote::client()?;

    let mut pending: Vec<&mut Classification> = results
        .iter_mut()
        .filter(|r| !r.is_classified() && remote::is_fetchable(&r.input))
        .collect();

    let pb = progress_bar(pending.len(), quiet);

    for batch in pending.chunks_mut(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|r| {
                let client = client.clone();
                let url = r.input.clone();
                async move { remote::fetch_text(&client, &url).await }
            })
            .collect();

        let fetched = join_all(futures).await;

        for (result, body) in batch.iter_mut().zip(fetched) {
            let url = result.input.clone();
            **result = match body {
                Ok(Some(text)) => {
                    debug!(url = %url, bytes = text.len(), "fetched license text");
                    Classification::by_text(url, InputKind::Url, registry.rank_text(strip_bom(&text)))
                }
                Ok(None) => Classification::failed(url, InputKind::Url, "server returned an error status"),
                Err(e) => Classification::failed(url, InputKind::Url, e),
            };
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(())
}

fn progress_bar(len: usize, quiet: bool) -> Option<ProgressBar> {
    if quiet || len == 0 {
        return None;
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    Some(pb)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use license_matchr::models::MatchMethod;
    use license_matchr::EmbeddedTemplates;

    fn registry() -> Registry {
        Registry::build(&EmbeddedTemplates::new()).unwrap()
    }

    #[test]
    fn test_repeated_dash_reads_stdin_once() {
        let registry = registry();
        let mit = registry.get("MIT").unwrap().template_text().to_string();
        let files = vec![PathBuf::from("-"), PathBuf::from("-")];

        let results = classify_files(&registry, &files, Cursor::new(mit));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, InputKind::Stdin);
        assert_eq!(results[0].spdx_id.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_files_and_stdin_mixed() {
        let registry = registry();
        let dir = tempfile::tempdir().unwrap();
        let license = dir.path().join("LICENSE");
        let gpl2 = registry.get("GPL-2.0").unwrap().template_text().to_string();
        std::fs::write(&license, format!("\u{feff}{gpl2}")).unwrap();

        let files = vec![license, PathBuf::from("-"), dir.path().join("missing"), PathBuf::from("-")];
        let results = classify_files(&registry, &files, Cursor::new("not a license"));

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].spdx_id.as_deref(), Some("GPL-2.0"));
        assert_eq!(results[0].method, MatchMethod::Text);
        assert_eq!(results[1].kind, InputKind::Stdin);
        assert!(!results[1].is_classified());
        assert!(results[2].error.is_some());
    }

    #[test]
    fn test_no_files_means_stdin() {
        let registry = registry();
        let results = classify_files(&registry, &[], Cursor::new(""));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].input, "<stdin>");
        assert!(!results[0].is_classified());
    }
}
