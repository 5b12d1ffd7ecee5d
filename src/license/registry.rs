use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::license::similarity::{bigrams, dice_coefficient, Bigram};
use crate::license::templates::TemplateSource;

/// Minimum Dice coefficient a text must strictly exceed to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Reject thresholds outside `[0, 1]`, including NaN.
///
/// A negative or NaN threshold would let a score of 0 through, so empty
/// text would match the first license.
pub fn check_threshold(threshold: f64) -> Result<f64, RegistryError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(RegistryError::InvalidThreshold { value: threshold })
    }
}

/// Static description of a known license, before its template is loaded.
#[derive(Debug, Clone, Copy)]
pub struct LicenseDescriptor {
    pub name: &'static str,
    pub spdx_id: &'static str,
    pub allows_decompilation: bool,
    pub urls: &'static [&'static str],
    pub template_name: &'static str,
}

/// Built-in licenses in lookup order.
pub const KNOWN_LICENSES: &[LicenseDescriptor] = &[
    LicenseDescriptor {
        name: "Apache License 2.0",
        spdx_id: "Apache-2.0",
        allows_decompilation: true,
        urls: &[
            "http://www.apache.org/licenses/LICENSE-2.0",
            "https://www.apache.org/licenses/LICENSE-2.0",
            "http://opensource.org/licenses/Apache-2.0",
            "https://opensource.org/licenses/Apache-2.0",
        ],
        template_name: "Apache2",
    },
    LicenseDescriptor {
        name: "3-Clause BSD License",
        spdx_id: "BSD-3-Clause",
        allows_decompilation: true,
        urls: &[
            "http://opensource.org/licenses/BSD-3-Clause",
            "https://opensource.org/licenses/BSD-3-Clause",
        ],
        template_name: "BSD3Clause",
    },
    LicenseDescriptor {
        name: "2-Clause BSD License",
        spdx_id: "BSD-2-Clause",
        allows_decompilation: true,
        urls: &[
            "http://opensource.org/licenses/BSD-2-Clause",
            "https://opensource.org/licenses/BSD-2-Clause",
        ],
        template_name: "BSD2Clause",
    },
    LicenseDescriptor {
        name: "GNU General Public License 2",
        spdx_id: "GPL-2.0",
        allows_decompilation: true,
        urls: &[
            "http://www.gnu.org/licenses/gpl-2.0.html",
            "https://www.gnu.org/licenses/gpl-2.0.html",
            "http://opensource.org/licenses/GPL-2.0",
            "https://opensource.org/licenses/GPL-2.0",
        ],
        template_name: "GPL2",
    },
    LicenseDescriptor {
        name: "GNU General Public License 3",
        spdx_id: "GPL-3.0",
        allows_decompilation: true,
        urls: &[
            "http://www.gnu.org/licenses/gpl-3.0.html",
            "https://www.gnu.org/licenses/gpl-3.0.html",
            "http://opensource.org/licenses/GPL-3.0",
            "https://opensource.org/licenses/GPL-3.0",
        ],
        template_name: "GPL3",
    },
    LicenseDescriptor {
        name: "GNU Lesser General Public License 2.1",
        spdx_id: "LGPL-2.1",
        allows_decompilation: true,
        urls: &[
            "http://www.gnu.org/licenses/lgpl-2.1.html",
            "https://www.gnu.org/licenses/lgpl-2.1.html",
            "http://opensource.org/licenses/LGPL-2.1",
            "https://opensource.org/licenses/LGPL-2.1",
        ],
        template_name: "LGPL21",
    },
    LicenseDescriptor {
        name: "MIT License",
        spdx_id: "MIT",
        allows_decompilation: true,
        urls: &[
            "http://opensource.org/licenses/MIT",
            "https://opensource.org/licenses/MIT",
        ],
        template_name: "MIT",
    },
    LicenseDescriptor {
        name: "MS-PL",
        spdx_id: "MS-PL",
        allows_decompilation: true,
        urls: &[
            "http://opensource.org/licenses/MS-PL",
            "https://opensource.org/licenses/MS-PL",
        ],
        template_name: "MSPL",
    },
];

impl LicenseDescriptor {
    /// Resolve the template text and precompute its bigrams.
    ///
    /// The returned [`License`] is complete; a failed load yields no value at all.
    pub fn materialize(&self, source: &dyn TemplateSource) -> Result<License, RegistryError> {
        let template_text = source.load(self.template_name)?;
        let template_bigrams = bigrams(&template_text);
        if template_bigrams.is_empty() {
            return Err(RegistryError::EmptyTemplate {
                template: self.template_name.to_string(),
            });
        }

        debug!(
            license = self.name,
            template = self.template_name,
            bigrams = template_bigrams.len(),
            "loaded license template"
        );

        Ok(License {
            name: self.name.to_string(),
            spdx_id: self.spdx_id.to_string(),
            allows_decompilation: self.allows_decompilation,
            known_urls: self.urls.iter().map(|u| u.to_string()).collect(),
            template_name: self.template_name.to_string(),
            template_text,
            template_bigrams,
        })
    }
}

/// A known license with its template loaded. Immutable once built.
#[derive(Debug, Clone)]
pub struct License {
    name: String,
    spdx_id: String,
    allows_decompilation: bool,
    known_urls: HashSet<String>,
    template_name: String,
    template_text: String,
    template_bigrams: HashSet<Bigram>,
}

impl License {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spdx_id(&self) -> &str {
        &self.spdx_id
    }

    pub fn allows_decompilation(&self) -> bool {
        self.allows_decompilation
    }

    pub fn known_urls(&self) -> &HashSet<String> {
        &self.known_urls
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn template_text(&self) -> &str {
        &self.template_text
    }

    pub fn template_bigrams(&self) -> &HashSet<Bigram> {
        &self.template_bigrams
    }
}

/// Best text match found by [`Registry::rank_text`].
#[derive(Debug, Clone, Copy)]
pub struct TextMatch<'a> {
    pub license: &'a License,
    pub score: f64,
}

/// The set of known licenses, built once and then only read.
#[derive(Debug, Clone)]
pub struct Registry {
    licenses: Vec<License>,
    threshold: f64,
}

impl Registry {
    /// Build the registry from the built-in table.
    ///
    /// Fails on the first template that cannot be loaded.
    pub fn build(source: &dyn TemplateSource) -> Result<Self, RegistryError> {
        Self::from_descriptors(KNOWN_LICENSES, source)
    }

    /// Build the registry from the built-in table, leaving out entries whose
    /// template cannot be loaded. The skipped entries' errors are returned.
    pub fn build_lenient(source: &dyn TemplateSource) -> (Self, Vec<RegistryError>) {
        let mut licenses = Vec::with_capacity(KNOWN_LICENSES.len());
        let mut skipped = Vec::new();

        for descriptor in KNOWN_LICENSES {
            match descriptor.materialize(source) {
                Ok(license) => licenses.push(license),
                Err(e) => {
                    warn!(license = descriptor.name, error = %e, "skipping license");
                    skipped.push(e);
                }
            }
        }

        (Self::from_licenses(licenses), skipped)
    }

    pub fn from_descriptors(
        descriptors: &[LicenseDescriptor],
        source: &dyn TemplateSource,
    ) -> Result<Self, RegistryError> {
        let licenses = descriptors
            .iter()
            .map(|d| d.materialize(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_licenses(licenses))
    }

    fn from_licenses(licenses: Vec<License>) -> Self {
        Self {
            licenses,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Replace the text-match threshold. Matches must score strictly above it.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, RegistryError> {
        self.threshold = check_threshold(threshold)?;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// First license, in declaration order, listing exactly this URL.
    pub fn find_by_url(&self, url: &str) -> Option<&License> {
        self.licenses.iter().find(|l| l.known_urls.contains(url))
    }

    /// License whose template is most similar to `text`, if it clears the threshold.
    pub fn find_by_text(&self, text: &str) -> Option<&License> {
        self.rank_text(text).map(|m| m.license)
    }

    /// Like [`find_by_text`](Self::find_by_text) but also reports the score.
    ///
    /// On equal scores the entry declared first wins.
    pub fn rank_text(&self, text: &str) -> Option<TextMatch<'_>> {
        let probe = bigrams(text);
        let mut best: Option<TextMatch<'_>> = None;

        for license in &self.licenses {
            let score = dice_coefficient(&license.template_bigrams, &probe);
            if score <= self.threshold {
                continue;
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(TextMatch { license, score });
            }
        }

        match &best {
            Some(m) => debug!(license = m.license.name(), score = m.score, "text matched"),
            None => debug!(bigrams = probe.len(), "no license matched text"),
        }

        best
    }

    /// Look a license up by its display name or SPDX identifier.
    pub fn get(&self, name: &str) -> Option<&License> {
        self.licenses
            .iter()
            .find(|l| l.name == name || l.spdx_id == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, License> {
        self.licenses.iter()
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a License;
    type IntoIter = std::slice::Iter<'a, License>;

    fn into_iter(self) -> Self::IntoIter {
        self.licenses.iter()
    }
}
