//! Bank detection by keyword search over the document text

use once_cell::sync::Lazy;
use tracing::debug;

use crate::profiles::{BankProfile, ProfileRegistry};

/// Bank id reported when no profile matches.
pub const UNKNOWN_BANK: &str = "unknown";

static BUILTIN: Lazy<ProfileRegistry> = Lazy::new(ProfileRegistry::builtin);

impl ProfileRegistry {
    /// First profile (registration order) with a keyword occurring in `text`,
    /// compared case-insensitively.
    pub fn detect(&self, text: &str) -> Option<&dyn BankProfile> {
        let text = text.to_lowercase();
        let hit = self.profiles().find(|p| p.matches(&text));
        match hit {
            Some(profile) => debug!(bank = profile.id(), "detected bank"),
            None => debug!("no bank keywords found"),
        }
        hit
    }

    /// Detected profile, or the generic one.
    pub fn resolve(&self, text: &str) -> &dyn BankProfile {
        self.detect(text).unwrap_or_else(|| self.generic())
    }

    /// Detected bank id, or [`UNKNOWN_BANK`].
    pub fn detect_id(&self, text: &str) -> &'static str {
        self.detect(text).map(|p| p.id()).unwrap_or(UNKNOWN_BANK)
    }
}

/// Bank id for `text` using the built-in profiles.
pub fn detect_bank(text: &str) -> &'static str {
    BUILTIN.detect_id(text)
}
