use std::path::{Path, PathBuf};

use anyhow::Result;

/// Directories never descended into while looking for license files.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "vendor", "bin", "obj"];

/// Whether a file name looks like a license document
/// (`LICENSE`, `LICENSE.md`, `LICENCE-MIT`, `COPYING.LESSER`, `UNLICENSE`, ...).
pub fn is_license_file_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("license")
        || lower.starts_with("licence")
        || lower.starts_with("copying")
        || lower.starts_with("unlicense")
}

/// Find license-like files under `root`, at most `max_depth` directories deep.
///
/// Hidden directories and common build/dependency folders are skipped.
/// Results are sorted by path.
pub fn find_license_files(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, 0, max_depth, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, depth: usize, max_depth: usize, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            let skipped = name.starts_with('.') || SKIPPED_DIRS.iter().any(|d| *d == name);
            if depth < max_depth && !skipped {
                walk(&entry.path(), depth + 1, max_depth, found)?;
            }
        } else if file_type.is_file() && is_license_file_name(&name) {
            found.push(entry.path());
        }
    }
    Ok(())
}
