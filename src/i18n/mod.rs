//! Internationalization
//!
//! Translated UI strings for the supported locales (`vi`, `en`, `ja`).
//!
//! ## Architecture
//!
//! - **Locale**: closed set of supported languages with display names
//! - **Catalog**: nested string tables, embedded and parsed once at startup
//! - **LocaleStore**: persisted choice of locale
//! - **LanguageContext**: active locale for a session, the only writer of it
//!
//! Missing keys never fail: they render as the key itself.

mod catalog;
mod context;
mod error;
mod locale;
mod store;

pub use catalog::{missing_keys, Catalog, Catalogs};
pub use context::LanguageContext;
pub use error::{I18nError, I18nResult};
pub use locale::Locale;
pub use store::{FileLocaleStore, LocaleStore, MemoryLocaleStore, LOCALE_STORAGE_KEY};
