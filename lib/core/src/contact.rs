use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Unique identifier of an accepted contact, assigned at acceptance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(Uuid);

impl ContactId {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ContactId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

/// A contact record proposed for insertion, not yet persisted.
///
/// Carries the same attributes as [`Contact`] minus everything the registry
/// assigns on acceptance (id, score, validity, timestamps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactCandidate {
    pub name: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub source_url: String,
    pub source_type: Option<String>,
    pub research_lines: Option<Vec<String>>,
}

impl ContactCandidate {
    #[must_use]
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization: None,
            position: None,
            email: None,
            phone: None,
            region: None,
            source_url: source_url.into(),
            source_type: None,
            research_lines: None,
        }
    }

    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Check the structural field constraints.
    ///
    /// Name must be non-empty after trimming, the source URL must carry an
    /// http(s) scheme, and a phone (when present) is limited to a leading
    /// digit or `+` followed by digits, spaces and dashes.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".into()));
        }

        if !self.source_url.starts_with("http://") && !self.source_url.starts_with("https://") {
            return Err(Error::InvalidInput(format!(
                "source_url must start with http:// or https://: {}",
                self.source_url
            )));
        }

        if let Some(phone) = &self.phone {
            if !valid_phone(phone) {
                return Err(Error::InvalidInput(format!(
                    "invalid phone format: {phone}"
                )));
            }
        }

        Ok(())
    }
}

fn valid_phone(phone: &str) -> bool {
    let mut chars = phone.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '+' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}

/// An accepted, stored contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub source_url: String,
    pub source_type: Option<String>,
    pub research_lines: Option<Vec<String>>,
    pub is_valid: bool,
    pub validation_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Materialize an accepted candidate with its computed score.
    #[must_use]
    pub fn accept(
        id: ContactId,
        candidate: ContactCandidate,
        validation_score: f64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: candidate.name,
            organization: candidate.organization,
            position: candidate.position,
            email: candidate.email,
            phone: candidate.phone,
            region: candidate.region,
            source_url: candidate.source_url,
            source_type: candidate.source_type,
            research_lines: candidate.research_lines,
            is_valid: true,
            validation_score,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Partial update of a stored contact.
///
/// Only data fields are patchable; validity and score change exclusively
/// through [`ContactRegistry::invalidate`](crate::ContactRegistry::invalidate).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub source_type: Option<String>,
    pub research_lines: Option<Vec<String>>,
}

impl ContactPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::InvalidInput("name must not be empty".into()));
            }
        }
        if let Some(phone) = &self.phone {
            if !valid_phone(phone) {
                return Err(Error::InvalidInput(format!(
                    "invalid phone format: {phone}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_validation() {
        let ok = ContactCandidate::new("Ana Pérez", "https://example.org/people/1");
        assert!(ok.validate().is_ok());

        let blank = ContactCandidate::new("   ", "https://example.org");
        assert!(matches!(blank.validate(), Err(Error::InvalidInput(_))));

        let bad_url = ContactCandidate::new("Ana", "ftp://example.org");
        assert!(matches!(bad_url.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_phone_format() {
        assert!(valid_phone("+56 2 2345-6789"));
        assert!(valid_phone("123456"));
        assert!(!valid_phone("phone"));
        assert!(!valid_phone("-123"));
        assert!(!valid_phone("+56 (2) 234"));
    }
}
