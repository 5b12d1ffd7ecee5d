use thiserror::Error;

/// Failures raised while building the license registry.
///
/// Template failures name the template that could not be resolved so a
/// deployment problem can be traced to the missing asset.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("missing license template `{template}`")]
    MissingTemplate { template: String },

    #[error("failed to read license template `{template}`: {source}")]
    TemplateIo {
        template: String,
        #[source]
        source: std::io::Error,
    },

    #[error("license template `{template}` is empty")]
    EmptyTemplate { template: String },

    #[error("text match threshold must be between 0 and 1, got {value}")]
    InvalidThreshold { value: f64 },
}

impl RegistryError {
    /// Name of the template this error refers to, if any.
    pub fn template(&self) -> Option<&str> {
        match self {
            RegistryError::MissingTemplate { template }
            | RegistryError::TemplateIo { template, .. }
            | RegistryError::EmptyTemplate { template } => Some(template),
            RegistryError::InvalidThreshold { .. } => None,
        }
    }
}
