//! i18n error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading catalogs or persisting the active locale.
///
/// Key lookups never fail; a missing key resolves to the key itself.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Locale code is not one of the supported set
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// An embedded catalog is not valid JSON or not a nested object
    #[error("Invalid catalog for {locale}: {error}")]
    InvalidCatalog { locale: String, error: String },

    /// Locale state file could not be written
    #[error("Failed to write locale state {path:?}: {error}")]
    Persist { path: PathBuf, error: String },
}

/// Result type alias for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
