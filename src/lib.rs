//! `license_matchr` — identify which known open-source license governs a text.
//!
//! Build a [`Registry`] once at startup from a [`TemplateSource`], then share
//! it freely between threads:
//!
//! ```no_run
//! use license_matchr::{EmbeddedTemplates, Registry};
//!
//! let registry = Registry::build(&EmbeddedTemplates::new())?;
//! if let Some(license) = registry.find_by_url("https://opensource.org/licenses/MIT") {
//!     println!("{}", license.name());
//! }
//! # Ok::<(), license_matchr::RegistryError>(())
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod license;
pub mod models;
pub mod remote;

pub use error::RegistryError;
pub use license::{
    bigrams, dice_coefficient, DirectoryTemplates, EmbeddedTemplates, LayeredTemplates, License,
    Registry, TemplateSource, TextMatch,
};
