use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::license::{
    check_threshold, DirectoryTemplates, EmbeddedTemplates, LayeredTemplates, Registry,
    TemplateSource, DEFAULT_THRESHOLD,
};

/// Root configuration structure, deserialized from `.license-matchr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Registry build and text matching settings.
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MatchingConfig {
    /// Text matches must score strictly above this value. Defaults to `0.9`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// What to do when a built-in license has no template text.
    #[serde(default)]
    pub on_missing_template: MissingTemplateAction,
    /// Directory of `<template>.txt` files overriding the embedded texts.
    /// Relative paths resolve against the config file's directory.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            on_missing_template: MissingTemplateAction::default(),
            templates_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingTemplateAction {
    /// Refuse to start with an incomplete registry.
    #[default]
    Fail,
    /// Leave the affected license out and keep going.
    Skip,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.matching.threshold).context("invalid matching.threshold")?;
        Ok(())
    }

    /// Build the license registry this configuration describes.
    pub fn build_registry(&self) -> Result<Registry> {
        let source: Box<dyn TemplateSource> = match &self.matching.templates_dir {
            Some(dir) => Box::new(LayeredTemplates::new(
                DirectoryTemplates::new(dir),
                EmbeddedTemplates::new(),
            )),
            None => Box::new(EmbeddedTemplates::new()),
        };

        let registry = match self.matching.on_missing_template {
            MissingTemplateAction::Fail => {
                Registry::build(&*source).context("failed to build license registry")?
            }
            MissingTemplateAction::Skip => {
                let (registry, _skipped) = Registry::build_lenient(&*source);
                if registry.is_empty() {
                    bail!("no license templates could be loaded");
                }
                registry
            }
        };

        Ok(registry.with_threshold(self.matching.threshold)?)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-matchr/config.toml`
/// 3. `~/.config/license-matchr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    let home_config = dirs::home_dir().map(|home| {
        home.join(".config")
            .join("license-matchr")
            .join("config.toml")
    });
    load_config_from(project_path, config_override, home_config.as_deref())
}

fn load_config_from(
    project_path: &Path,
    config_override: Option<&Path>,
    home_config: Option<&Path>,
) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-matchr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home_config) = home_config {
        if home_config.exists() {
            return read_config(home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;

    if let (Some(dir), Some(base)) = (&config.matching.templates_dir, path.parent()) {
        if dir.is_relative() {
            config.matching.templates_dir = Some(base.join(dir));
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_project_config(root: &Path, content: &str) -> PathBuf {
        let dir = root.join(".license-matchr");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_any_file() {
        let project = tempfile::tempdir().unwrap();
        let config = load_config_from(project.path(), None, None).unwrap();

        assert_eq!(config.matching.threshold, 0.9);
        assert_eq!(config.matching.on_missing_template, MissingTemplateAction::Fail);
        assert!(config.matching.templates_dir.is_none());
    }

    #[test]
    fn test_project_config_and_relative_templates_dir() {
        let project = tempfile::tempdir().unwrap();
        write_project_config(
            project.path(),
            r#"
[matching]
threshold = 0.95
on_missing_template = "skip"
templates_dir = "templates"
"#,
        );

        let config = load_config_from(project.path(), None, None).unwrap();
        assert_eq!(config.matching.threshold, 0.95);
        assert_eq!(config.matching.on_missing_template, MissingTemplateAction::Skip);
        assert_eq!(
            config.matching.templates_dir.unwrap(),
            project.path().join(".license-matchr").join("templates")
        );
    }

    #[test]
    fn test_override_wins_over_project_and_home() {
        let project = tempfile::tempdir().unwrap();
        write_project_config(project.path(), "[matching]\nthreshold = 0.5\n");

        let other = tempfile::tempdir().unwrap();
        let override_path = other.path().join("custom.toml");
        std::fs::write(&override_path, "[matching]\nthreshold = 0.7\n").unwrap();
        let home_path = other.path().join("home.toml");
        std::fs::write(&home_path, "[matching]\nthreshold = 0.6\n").unwrap();

        let config = load_config_from(project.path(), Some(&override_path), Some(&home_path)).unwrap();
        assert_eq!(config.matching.threshold, 0.7);

        let config = load_config_from(project.path(), None, Some(&home_path)).unwrap();
        assert_eq!(config.matching.threshold, 0.5);

        let empty = tempfile::tempdir().unwrap();
        let config = load_config_from(empty.path(), None, Some(&home_path)).unwrap();
        assert_eq!(config.matching.threshold, 0.6);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let project = tempfile::tempdir().unwrap();
        write_project_config(project.path(), "[matching]\nthreshold = 1.5\n");
        let err = load_config_from(project.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("threshold"));

        for bad in ["-0.1", "nan"] {
            write_project_config(project.path(), &format!("[matching]\nthreshold = {bad}\n"));
            assert!(load_config_from(project.path(), None, None).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_build_registry_fail_vs_skip() {
        let templates = tempfile::tempdir().unwrap();
        std::fs::write(templates.path().join("MIT.txt"), "custom MIT template").unwrap();

        let mut config = Config::default();
        config.matching.templates_dir = Some(templates.path().to_path_buf());
        // Missing files fall back to the embedded texts.
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.find_by_text("custom MIT template").unwrap().spdx_id(), "MIT");

        config.matching.threshold = 0.99;
        config.matching.on_missing_template = MissingTemplateAction::Skip;
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.threshold(), 0.99);
    }

    #[test]
    fn test_build_registry_reports_unreadable_template() {
        let templates = tempfile::tempdir().unwrap();
        // A directory where a file is expected is a read error, not a missing template.
        std::fs::create_dir(templates.path().join("GPL3.txt")).unwrap();

        let mut config = Config::default();
        config.matching.templates_dir = Some(templates.path().to_path_buf());
        let err = config.build_registry().unwrap_err();
        assert!(format!("{err:#}").contains("GPL3"));

        config.matching.on_missing_template = MissingTemplateAction::Skip;
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 7);
        assert!(registry.get("GPL-3.0").is_none());
    }
}
