use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use license_matchr::models::{Classification, LicenseSummary, MatchMethod};

/// Render a colored terminal report for a batch of classified inputs.
pub fn render(results: &[Classification], heading: &str, verbose: bool, quiet: bool) -> Result<()> {
    let total = results.len();
    let matched = results.iter().filter(|r| r.is_classified()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let unmatched = total - matched - failed;

    if quiet {
        println!(
            "Total: {}  Matched: {}  Unmatched: {}  Failed: {}",
            total,
            matched.to_string().green(),
            unmatched.to_string().yellow(),
            failed.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-matchr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" {}\n", heading);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Inputs             : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Matched         : {:>4}  {}",
            "✓".green(),
            matched,
            summarize_licenses(results)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unmatched       : {:>4}", "?".yellow(), unmatched)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Failed          : {:>4}", "✗".red(), failed)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if total > 0 {
        render_table(results, verbose);
        println!();
    }

    if verbose {
        for r in results.iter().filter(|r| r.error.is_some()) {
            if let Some(err) = &r.error {
                println!(" {} {}: {}", "[ERROR]".red().bold(), r.input, err);
            }
        }
    }

    Ok(())
}

fn render_table(results: &[Classification], verbose: bool) {
    let mut header = vec![
        Cell::new("Input").add_attribute(Attribute::Bold),
        Cell::new("License").add_attribute(Attribute::Bold),
        Cell::new("SPDX").add_attribute(Attribute::Bold),
        Cell::new("Method").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Decompile").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for r in results {
        let (license, license_color) = match (&r.license, &r.error) {
            (Some(name), _) => (name.as_str(), Color::Green),
            (None, Some(_)) => ("error", Color::Red),
            (None, None) => ("unclassified", Color::Yellow),
        };

        let method_color = match r.method {
            MatchMethod::Url => Color::Cyan,
            MatchMethod::Text => Color::Blue,
            MatchMethod::Fetched => Color::Magenta,
            MatchMethod::Unmatched => Color::DarkGrey,
        };

        let score = r.score.map(|s| format!("{:.3}", s)).unwrap_or_else(|| "-".to_string());

        let mut row = vec![
            Cell::new(&r.input),
            Cell::new(license).fg(license_color),
            Cell::new(r.spdx_id.as_deref().unwrap_or("-")),
            Cell::new(r.method.to_string()).fg(method_color),
            Cell::new(score).set_alignment(CellAlignment::Right),
        ];
        if verbose {
            let decompile = match r.allows_decompilation {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            };
            row.push(Cell::new(decompile).set_alignment(CellAlignment::Center));
        }
        table.add_row(row);
    }

    println!("{}", table);
}

/// Render the registry contents.
pub fn render_registry(licenses: &[LicenseSummary], threshold: f64) {
    println!(
        "\n {} v{}  ({} licenses, text threshold > {})\n",
        "license-matchr".bold(),
        env!("CARGO_PKG_VERSION"),
        licenses.len(),
        threshold
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("SPDX").add_attribute(Attribute::Bold),
            Cell::new("Decompile").add_attribute(Attribute::Bold),
            Cell::new("URLs").add_attribute(Attribute::Bold),
        ]);

    for l in licenses {
        let (decompile, color) = if l.allows_decompilation {
            ("yes", Color::Green)
        } else {
            ("no", Color::Red)
        };
        table.add_row(vec![
            Cell::new(&l.name),
            Cell::new(&l.spdx_id),
            Cell::new(decompile).fg(color).set_alignment(CellAlignment::Center),
            Cell::new(l.urls.join("\n")),
        ]);
    }

    println!("{}", table);
}

fn summarize_licenses(results: &[Classification]) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for spdx in results.iter().filter_map(|r| r.spdx_id.as_deref()) {
        *counts.entry(spdx).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
