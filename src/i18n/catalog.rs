//! Locale catalogs and dotted-key resolution
//!
//! A catalog is a tree of sections whose leaves are translated strings.
//! Keys address leaves with `.` separated segments, e.g. `todos.form.title`.
//!
//! # Resolution
//!
//! Lookup walks the tree one segment at a time. Any miss (absent segment,
//! descending into a leaf, or ending on a section) yields `None`, and
//! [`Catalogs::translate`] turns that into the original key so a missing
//! translation renders as its key instead of failing.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::error::{I18nError, I18nResult};
use super::locale::Locale;

/// One node of a locale catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Catalog {
    /// Translated string
    Text(String),
    /// Nested section keyed by segment
    Section(BTreeMap<String, Catalog>),
}

impl Catalog {
    /// Parse a catalog from JSON; the root must be an object
    pub fn from_json(locale: Locale, json: &str) -> I18nResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| I18nError::InvalidCatalog {
                locale: locale.to_string(),
                error: e.to_string(),
            })?;

        match catalog {
            Catalog::Section(_) => Ok(catalog),
            Catalog::Text(_) => Err(I18nError::InvalidCatalog {
                locale: locale.to_string(),
                error: "root must be an object".to_string(),
            }),
        }
    }

    /// Resolve a dotted key to its string, if the full path exists
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut node = self;
        for segment in key.split('.') {
            node = match node {
                Catalog::Section(children) => children.get(segment)?,
                Catalog::Text(_) => return None,
            };
        }

        match node {
            Catalog::Text(text) => Some(text),
            Catalog::Section(_) => None,
        }
    }

    /// Every leaf key in dotted form, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(self, &mut String::new(), &mut keys);
        keys
    }
}

fn collect_keys(node: &Catalog, prefix: &mut String, out: &mut Vec<String>) {
    match node {
        Catalog::Text(_) => out.push(prefix.clone()),
        Catalog::Section(children) => {
            for (name, child) in children {
                let len = prefix.len();
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(name);
                collect_keys(child, prefix, out);
                prefix.truncate(len);
            }
        }
    }
}

/// Keys present in `reference` but not resolvable in `other`
pub fn missing_keys(reference: &Catalog, other: &Catalog) -> Vec<String> {
    reference
        .keys()
        .into_iter()
        .filter(|key| other.lookup(key).is_none())
        .collect()
}

/// The full set of locale catalogs, loaded once at startup
#[derive(Debug, Clone)]
pub struct Catalogs {
    catalogs: HashMap<Locale, Catalog>,
}

const VI_JSON: &str = include_str!("locales/vi.json");
const EN_JSON: &str = include_str!("locales/en.json");
const JA_JSON: &str = include_str!("locales/ja.json");

impl Catalogs {
    /// Build from explicit catalogs
    pub fn new(catalogs: HashMap<Locale, Catalog>) -> Self {
        Self { catalogs }
    }

    /// Parse the catalogs compiled into the binary
    pub fn embedded() -> I18nResult<Self> {
        let mut catalogs = HashMap::new();
        for (locale, json) in [
            (Locale::Vi, VI_JSON),
            (Locale::En, EN_JSON),
            (Locale::Ja, JA_JSON),
        ] {
            catalogs.insert(locale, Catalog::from_json(locale, json)?);
        }

        tracing::debug!("Loaded {} embedded locale catalogs", catalogs.len());
        Ok(Self { catalogs })
    }

    /// Catalog for a locale, falling back to the default locale's catalog
    pub fn catalog(&self, locale: Locale) -> Option<&Catalog> {
        self.catalogs
            .get(&locale)
            .or_else(|| self.catalogs.get(&Locale::default()))
    }

    /// Resolve `key` for `locale`, returning the key itself when missing
    pub fn translate(&self, locale: Locale, key: &str) -> String {
        self.catalog(locale)
            .and_then(|catalog| catalog.lookup(key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve using a raw locale code; unknown codes use the default locale
    pub fn translate_code(&self, code: &str, key: &str) -> String {
        self.translate(Locale::from_code_or_default(code), key)
    }
}
