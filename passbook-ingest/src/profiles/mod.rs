//! Bank profiles: detection keywords, header aliases, date formats and row
//! rules for one institution's statement layout.
//!
//! Profiles live in a [`ProfileRegistry`]. The parser service only ever talks
//! to the registry, so adding a bank is a `register` call.

pub mod generic;
pub mod hdfc;
pub mod sbi;

use passbook_core::{SkipReason, TransactionRecord};

use crate::headers::{AliasTable, MappedRow};

pub use generic::{GENERIC_DATE_FORMATS, GenericProfile, generic_aliases};
pub use hdfc::HdfcProfile;
pub use sbi::SbiProfile;

/// Statement layout of one institution.
pub trait BankProfile: Send + Sync {
    /// Stable identifier (`"sbi"`, `"hdfc"`, ...)
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Lowercase phrases whose presence in the document text identifies the bank
    fn keywords(&self) -> &[&'static str];

    fn aliases(&self) -> &AliasTable;

    /// Accepted date formats, tried in order
    fn date_formats(&self) -> &[&'static str] {
        GENERIC_DATE_FORMATS
    }

    /// Build a record from one mapped data row, or say why the row is skipped.
    fn normalize_row(&self, row: &MappedRow<'_>) -> Result<TransactionRecord, SkipReason> {
        generic::normalize_row(row, self.date_formats())
    }

    /// `text` must already be lowercase.
    fn matches(&self, text: &str) -> bool {
        self.keywords()
            .iter()
            .any(|k| text.contains(k.to_lowercase().as_str()))
    }
}

/// Bank that only needs its own detection keywords; tables go through the
/// generic aliases and row rules.
#[derive(Debug, Clone)]
pub struct KeywordProfile {
    id: &'static str,
    name: &'static str,
    keywords: Vec<&'static str>,
}

impl KeywordProfile {
    pub fn new(id: &'static str, name: &'static str, keywords: &[&'static str]) -> Self {
        Self {
            id,
            name,
            keywords: keywords.to_vec(),
        }
    }
}

impl BankProfile for KeywordProfile {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    fn aliases(&self) -> &AliasTable {
        generic_aliases()
    }
}

/// Ordered set of bank profiles plus the generic fallback.
pub struct ProfileRegistry {
    profiles: Vec<Box<dyn BankProfile>>,
    fallback: Box<dyn BankProfile>,
}

impl ProfileRegistry {
    /// Registry with no banks; everything parses with the generic profile.
    pub fn empty() -> Self {
        Self {
            profiles: Vec::new(),
            fallback: Box::new(GenericProfile),
        }
    }

    /// Built-in banks in detection order.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register(SbiProfile::new())
            .register(HdfcProfile::new())
            .register(KeywordProfile::new("icici", "ICICI Bank", &["icici bank"]))
            .register(KeywordProfile::new("axis", "Axis Bank", &["axis bank"]))
            .register(KeywordProfile::new(
                "kotak",
                "Kotak Mahindra Bank",
                &["kotak bank", "kotak mahindra bank"],
            ))
            .register(KeywordProfile::new("yes", "YES Bank", &["yes bank"]));
        registry
    }

    /// Append a profile. Detection tries profiles in registration order.
    pub fn register(&mut self, profile: impl BankProfile + 'static) -> &mut Self {
        self.profiles.push(Box::new(profile));
        self
    }

    pub fn profiles(&self) -> impl Iterator<Item = &dyn BankProfile> + '_ {
        self.profiles.iter().map(|p| p.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&dyn BankProfile> {
        self.profiles().find(|p| p.id() == id)
    }

    pub fn generic(&self) -> &dyn BankProfile {
        self.fallback.as_ref()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
