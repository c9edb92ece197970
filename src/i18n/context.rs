//! Language context
//!
//! Holds the active locale for a session. The locale is seeded from the
//! persisted store once and changed only through [`LanguageContext::change_locale`],
//! which writes the new value back to the store.

use std::sync::Arc;

use super::catalog::Catalogs;
use super::error::I18nResult;
use super::locale::Locale;
use super::store::LocaleStore;

/// Active locale plus the catalogs and store it reads from
pub struct LanguageContext {
    catalogs: Arc<Catalogs>,
    store: Arc<dyn LocaleStore>,
    locale: Locale,
}

impl LanguageContext {
    /// Build a context, adopting the stored locale if it is supported
    pub fn load(catalogs: Arc<Catalogs>, store: Arc<dyn LocaleStore>) -> Self {
        let locale = match store.load() {
            Some(code) => match code.parse::<Locale>() {
                Ok(locale) => locale,
                Err(_) => {
                    tracing::warn!("Stored locale {:?} is not supported, using default", code);
                    Locale::default()
                }
            },
            None => Locale::default(),
        };

        tracing::debug!("Active locale: {}", locale);
        Self {
            catalogs,
            store,
            locale,
        }
    }

    /// Currently active locale
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch locale and persist the choice
    pub fn change_locale(&mut self, locale: Locale) -> I18nResult<()> {
        self.locale = locale;
        self.store.save(locale.code())
    }

    /// Translate a dotted key in the active locale
    pub fn t(&self, key: &str) -> String {
        self.catalogs.translate(self.locale, key)
    }

    pub fn supported_locales(&self) -> &'static [Locale] {
        Locale::supported()
    }

    pub fn locale_name(&self, locale: Locale) -> &'static str {
        locale.display_name()
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }
}
