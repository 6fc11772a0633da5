//! Registry seam: maps a canonical reference identifier to a retrievable document.

pub mod cache;
pub mod mock;
pub mod registry;

use thiserror::Error;

/// A document located by a [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub url: String,
}

impl ResolvedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The registry could not be reached or is not loaded.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
    /// The lookup itself failed (transient; may succeed on a later call).
    #[error("lookup failed for {reference}: {message}")]
    Lookup { reference: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid registry file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A bibliographic registry that can resolve reference identifiers.
///
/// `Ok(None)` means the registry answered and does not know the reference;
/// `Err` is reserved for failures of the lookup itself.
pub trait Resolver: Send + Sync {
    /// Short name used in log events (e.g. "registry-table").
    fn name(&self) -> &str;

    fn resolve(&self, reference: &str) -> Result<Option<ResolvedSource>, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for std::sync::Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, reference: &str) -> Result<Option<ResolvedSource>, ResolveError> {
        (**self).resolve(reference)
    }
}

/// Registry keys compare after whitespace collapse, so `"IEC  60050-151"`
/// and `"IEC 60050-151"` share an entry.
pub(crate) fn registry_key(reference: &str) -> String {
    reference.split_whitespace().collect::<Vec<_>>().join(" ")
}
