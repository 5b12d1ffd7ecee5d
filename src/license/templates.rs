//! Sources of canonical license template text.
//!
//! The registry never reads assets itself; it asks a [`TemplateSource`] for
//! the text behind each template name (`"Apache2"`, `"MIT"`, ...).

use std::path::{Path, PathBuf};

use crate::error::RegistryError;

/// Resolves a template name to its canonical license text.
pub trait TemplateSource: Send + Sync {
    fn load(&self, template_name: &str) -> Result<String, RegistryError>;
}

/// Template texts compiled into the binary from `licenses/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }

    fn lookup(template_name: &str) -> Option<&'static str> {
        let text = match template_name {
            "Apache2" => include_str!("../../licenses/Apache2.txt"),
            "BSD3Clause" => include_str!("../../licenses/BSD3Clause.txt"),
            "BSD2Clause" => include_str!("../../licenses/BSD2Clause.txt"),
            "GPL2" => include_str!("../../licenses/GPL2.txt"),
            "GPL3" => include_str!("../../licenses/GPL3.txt"),
            "LGPL21" => include_str!("../../licenses/LGPL21.txt"),
            "MIT" => include_str!("../../licenses/MIT.txt"),
            "MSPL" => include_str!("../../licenses/MSPL.txt"),
            _ => return None,
        };
        Some(text)
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn load(&self, template_name: &str) -> Result<String, RegistryError> {
        Self::lookup(template_name)
            .map(|text| strip_bom(text).to_string())
            .ok_or_else(|| RegistryError::MissingTemplate {
                template: template_name.to_string(),
            })
    }
}

/// Template texts read from `<root>/<template>.txt` on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, template_name: &str) -> PathBuf {
        self.root.join(format!("{template_name}.txt"))
    }
}

impl TemplateSource for DirectoryTemplates {
    fn load(&self, template_name: &str) -> Result<String, RegistryError> {
        let path = self.path_for(template_name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(strip_bom(&text).to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RegistryError::MissingTemplate {
                    template: template_name.to_string(),
                })
            }
            Err(e) => Err(RegistryError::TemplateIo {
                template: template_name.to_string(),
                source: e,
            }),
        }
    }
}

/// Tries an override source first and falls back to a base source when the
/// override has no text for a template.
///
/// Read failures other than "missing" in the override are reported, not
/// masked by the fallback.
pub struct LayeredTemplates<O, B> {
    overlay: O,
    base: B,
}

impl<O: TemplateSource, B: TemplateSource> LayeredTemplates<O, B> {
    pub fn new(overlay: O, base: B) -> Self {
        Self { overlay, base }
    }
}

impl<O: TemplateSource, B: TemplateSource> TemplateSource for LayeredTemplates<O, B> {
    fn load(&self, template_name: &str) -> Result<String, RegistryError> {
        match self.overlay.load(template_name) {
            Err(RegistryError::MissingTemplate { .. }) => self.base.load(template_name),
            other => other,
        }
    }
}

/// Drop a leading UTF-8 byte order mark.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_has_every_builtin_template() {
        let source = EmbeddedTemplates::new();
        for name in ["Apache2", "BSD3Clause", "BSD2Clause", "GPL2", "GPL3", "LGPL21", "MIT", "MSPL"] {
            let text = source.load(name).unwrap();
            assert!(!text.trim().is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn test_embedded_missing_template() {
        let err = EmbeddedTemplates::new().load("WTFPL").unwrap_err();
        assert!(matches!(err, RegistryError::MissingTemplate { .. }));
        assert_eq!(err.template(), Some("WTFPL"));
    }

    #[test]
    fn test_directory_reads_and_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MIT.txt"), "\u{feff}MIT License\n").unwrap();

        let source = DirectoryTemplates::new(dir.path());
        assert_eq!(source.load("MIT").unwrap(), "MIT License\n");
    }

    #[test]
    fn test_directory_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DirectoryTemplates::new(dir.path()).load("GPL3").unwrap_err();
        assert!(matches!(err, RegistryError::MissingTemplate { ref template } if template == "GPL3"));
    }

    #[test]
    fn test_layered_prefers_overlay_then_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MIT.txt"), "custom MIT text").unwrap();

        let source = LayeredTemplates::new(DirectoryTemplates::new(dir.path()), EmbeddedTemplates::new());
        assert_eq!(source.load("MIT").unwrap(), "custom MIT text");
        assert!(source.load("GPL2").unwrap().contains("GNU GENERAL PUBLIC LICENSE"));
        assert!(source.load("Nope").is_err());
    }
}
