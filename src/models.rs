use serde::Serialize;

use crate::license::{License, TextMatch};

/// Outcome of classifying one input (a URL, a file, or stdin).
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub input: String,
    pub kind: InputKind,
    pub license: Option<String>,
    pub spdx_id: Option<String>,
    pub allows_decompilation: Option<bool>,
    pub method: MatchMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    pub fn unmatched(input: impl Into<String>, kind: InputKind) -> Self {
        Self {
            input: input.into(),
            kind,
            license: None,
            spdx_id: None,
            allows_decompilation: None,
            method: MatchMethod::Unmatched,
            score: None,
            error: None,
        }
    }

    /// An input that could not be read or fetched.
    pub fn failed(input: impl Into<String>, kind: InputKind, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::unmatched(input, kind)
        }
    }

    pub fn by_url(input: impl Into<String>, license: &License) -> Self {
        Self {
            method: MatchMethod::Url,
            ..Self::unmatched(input, InputKind::Url).with_license(license)
        }
    }

    pub fn by_text(input: impl Into<String>, kind: InputKind, found: Option<TextMatch<'_>>) -> Self {
        let mut c = Self::unmatched(input, kind);
        if let Some(m) = found {
            c = c.with_license(m.license);
            c.method = if kind == InputKind::Url {
                MatchMethod::Fetched
            } else {
                MatchMethod::Text
            };
            c.score = Some(m.score);
        }
        c
    }

    fn with_license(mut self, license: &License) -> Self {
        self.license = Some(license.name().to_string());
        self.spdx_id = Some(license.spdx_id().to_string());
        self.allows_decompilation = Some(license.allows_decompilation());
        self
    }

    pub fn is_classified(&self) -> bool {
        self.license.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    File,
    Stdin,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Url => write!(f, "url"),
            InputKind::File => write!(f, "file"),
            InputKind::Stdin => write!(f, "stdin"),
        }
    }
}

/// How a license was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Exact canonical URL.
    Url,
    /// Template similarity on local text.
    Text,
    /// Template similarity on text downloaded from the URL.
    Fetched,
    Unmatched,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMethod::Url => write!(f, "url"),
            MatchMethod::Text => write!(f, "text"),
            MatchMethod::Fetched => write!(f, "fetched"),
            MatchMethod::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Registry entry as shown by `license-matchr list`.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseSummary {
    pub name: String,
    pub spdx_id: String,
    pub allows_decompilation: bool,
    pub template: String,
    pub urls: Vec<String>,
}

impl From<&License> for LicenseSummary {
    fn from(license: &License) -> Self {
        let mut urls: Vec<String> = license.known_urls().iter().cloned().collect();
        urls.sort();
        Self {
            name: license.name().to_string(),
            spdx_id: license.spdx_id().to_string(),
            allows_decompilation: license.allows_decompilation(),
            template: license.template_name().to_string(),
            urls,
        }
    }
}
