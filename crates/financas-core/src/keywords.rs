//! Keyword tables driving category, type and store classification
//!
//! Tables are data, not code: every rule the analyzers apply lives in a TOML file.
//! Order is significant in every table; the first matching entry wins.
//!
//! ## Configuration Resolution
//!
//! Tables are loaded with a three-layer resolution:
//! 1. An explicit path (`with_config_path`, or the `FINANCAS_KEYWORDS` env var)
//! 2. Override in data dir (~/.local/share/financas/config/keywords.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! All keywords and patterns are trimmed, lowercased and accent-folded at load,
//! and empty entries are dropped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analyzer::text::normalize;
use crate::error::{Error, Result};
use crate::models::{TransactionType, DEFAULT_CATEGORY};

/// Embedded default tables (compiled into binary)
const DEFAULT_KEYWORDS: &str = include_str!("../../../config/keywords.toml");

/// A category and the substrings that select it
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A transaction type and the substrings that select it
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRule {
    pub transaction_type: TransactionType,
    pub keywords: Vec<String>,
}

/// Brand substring mapped to its display name
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRule {
    pub pattern: String,
    pub name: String,
}

/// Store substring mapped to a category
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCategoryRule {
    pub pattern: String,
    pub category: String,
}

/// Default type for a category, with an optional text-conditional override
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTypeRule {
    pub category: String,
    pub transaction_type: TransactionType,
    /// When the description contains any of these, `then_type` applies instead
    pub when_contains: Vec<String>,
    pub then_type: Option<TransactionType>,
}

impl CategoryTypeRule {
    /// Resolve the type for an already-normalized description
    pub fn resolve(&self, text: &str) -> TransactionType {
        match self.then_type {
            Some(then) if self.when_contains.iter().any(|k| text.contains(k.as_str())) => then,
            _ => self.transaction_type,
        }
    }
}

/// The full set of classification tables
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTables {
    pub categories: Vec<CategoryRule>,
    pub types: Vec<TypeRule>,
    pub stores: Vec<StoreRule>,
    pub store_categories: Vec<StoreCategoryRule>,
    pub category_types: Vec<CategoryTypeRule>,
    pub known_brands: Vec<String>,
    pub default_category: String,
    pub default_type: TransactionType,
    /// File the tables were read from; `None` for the embedded defaults
    pub source: Option<PathBuf>,
}

impl KeywordTables {
    /// Load tables honoring `FINANCAS_KEYWORDS`, then the data-dir override,
    /// then the embedded defaults
    pub fn load() -> Result<Self> {
        match std::env::var("FINANCAS_KEYWORDS") {
            Ok(path) if !path.trim().is_empty() => Self::with_config_path(PathBuf::from(path)),
            _ => match default_config_path() {
                Some(path) if path.exists() => Self::with_config_path(path),
                _ => Self::builtin(),
            },
        }
    }

    /// Load tables from a specific file
    pub fn with_config_path(path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!(
                "Failed to read keyword tables {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut tables = parse_tables(&content)?;
        tracing::info!(path = %path.display(), "Loaded keyword tables");
        tables.source = Some(path);
        Ok(tables)
    }

    /// The embedded default tables
    pub fn builtin() -> Result<Self> {
        parse_tables(DEFAULT_KEYWORDS)
    }

    /// Parse tables from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        parse_tables(content)
    }

    /// Every category keyword, in table order
    pub fn category_keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.keywords.iter().map(String::as_str))
    }

    /// Where the tables came from, for display
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "embedded defaults".to_string(),
        }
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::builtin().unwrap_or_else(|_| Self {
            categories: Vec::new(),
            types: Vec::new(),
            stores: Vec::new(),
            store_categories: Vec::new(),
            category_types: Vec::new(),
            known_brands: Vec::new(),
            default_category: DEFAULT_CATEGORY.to_string(),
            default_type: TransactionType::default(),
            source: None,
        })
    }
}

/// Default override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("financas").join("config").join("keywords.toml"))
}

/// Write the embedded defaults to `path`, creating parent directories
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_KEYWORDS)?;
    Ok(())
}

/// Raw table structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawTables {
    default_category: Option<String>,
    default_type: Option<String>,
    #[serde(default)]
    known_brands: Vec<String>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    types: Vec<RawType>,
    #[serde(default)]
    stores: Vec<RawStore>,
    #[serde(default)]
    store_categories: Vec<RawStoreCategory>,
    #[serde(default)]
    category_types: Vec<RawCategoryType>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawType {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    pattern: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawStoreCategory {
    pattern: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct RawCategoryType {
    category: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    when_contains: Vec<String>,
    then_type: Option<String>,
}

fn parse_type(name: &str) -> Result<TransactionType> {
    name.parse().map_err(Error::Config)
}

/// Normalize a keyword list, dropping entries that end up empty
fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .iter()
        .map(|k| normalize(k.trim()))
        .filter(|k| !k.is_empty())
        .collect()
}

fn parse_tables(content: &str) -> Result<KeywordTables> {
    let raw: RawTables = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid keyword TOML: {}", e)))?;

    let default_type = match raw.default_type {
        Some(name) => parse_type(&name)?,
        None => TransactionType::default(),
    };

    let categories = raw
        .categories
        .into_iter()
        .map(|c| CategoryRule {
            name: c.name.trim().to_string(),
            keywords: normalize_keywords(c.keywords),
        })
        .collect();

    let types = raw
        .types
        .into_iter()
        .map(|t| {
            Ok(TypeRule {
                transaction_type: parse_type(&t.type_name)?,
                keywords: normalize_keywords(t.keywords),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let stores = raw
        .stores
        .into_iter()
        .map(|s| StoreRule {
            pattern: normalize(s.pattern.trim()),
            name: s.name.trim().to_string(),
        })
        .filter(|s| !s.pattern.is_empty())
        .collect();

    let store_categories = raw
        .store_categories
        .into_iter()
        .map(|s| StoreCategoryRule {
            pattern: normalize(s.pattern.trim()),
            category: s.category.trim().to_string(),
        })
        .filter(|s| !s.pattern.is_empty())
        .collect();

    let category_types = raw
        .category_types
        .into_iter()
        .map(|c| {
            Ok(CategoryTypeRule {
                category: c.category.trim().to_string(),
                transaction_type: parse_type(&c.type_name)?,
                when_contains: normalize_keywords(c.when_contains),
                then_type: c.then_type.as_deref().map(parse_type).transpose()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(KeywordTables {
        categories,
        types,
        stores,
        store_categories,
        category_types,
        known_brands: normalize_keywords(raw.known_brands),
        default_category: raw
            .default_category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        default_type,
        source: None,
    })
}
