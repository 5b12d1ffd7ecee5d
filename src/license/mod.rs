//! License identification by canonical URL or by template similarity.
//!
//! - [`similarity`] — character bigram sets and the Dice coefficient.
//! - [`templates`] — where canonical template texts come from.
//! - [`registry`] — the known licenses and the two lookups over them.

pub mod registry;
pub mod similarity;
pub mod templates;

pub use registry::{
    check_threshold, License, LicenseDescriptor, Registry, TextMatch, DEFAULT_THRESHOLD,
    KNOWN_LICENSES,
};
pub use similarity::{bigrams, dice_coefficient, Bigram};
pub use templates::{strip_bom, DirectoryTemplates, EmbeddedTemplates, LayeredTemplates, TemplateSource};
