//! Renderers for classification results.
//!
//! - [`terminal`] — colored summary box and result tables; respects `--verbose` / `--quiet`.
//!
//! JSON output is produced directly from the serializable models in `main`.

pub mod terminal;
