use serde::{Deserialize, Serialize};

use crate::{Contact, ContactCandidate};

/// Normalized comparison projection of a contact.
///
/// Only the fields the scoring engine reads: name, organization, position and
/// region lower-cased and trimmed, phone with spaces and dashes stripped, the
/// source URL verbatim. A field that normalizes to empty is absent. Email is
/// deliberately excluded; exact email duplication is prevented structurally by
/// the registry's unique index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKey {
    name: Option<String>,
    organization: Option<String>,
    position: Option<String>,
    region: Option<String>,
    phone: Option<String>,
    source_url: Option<String>,
}

impl FieldKey {
    #[must_use]
    pub fn of_candidate(candidate: &ContactCandidate) -> Self {
        Self::normalize(
            Some(&candidate.name),
            candidate.organization.as_deref(),
            candidate.position.as_deref(),
            candidate.region.as_deref(),
            candidate.phone.as_deref(),
            Some(&candidate.source_url),
        )
    }

    #[must_use]
    pub fn of_contact(contact: &Contact) -> Self {
        Self::normalize(
            Some(&contact.name),
            contact.organization.as_deref(),
            contact.position.as_deref(),
            contact.region.as_deref(),
            contact.phone.as_deref(),
            Some(&contact.source_url),
        )
    }

    fn normalize(
        name: Option<&str>,
        organization: Option<&str>,
        position: Option<&str>,
        region: Option<&str>,
        phone: Option<&str>,
        source_url: Option<&str>,
    ) -> Self {
        Self {
            name: norm_text(name),
            organization: norm_text(organization),
            position: norm_text(position),
            region: norm_text(region),
            phone: norm_phone(phone),
            source_url: source_url
                .filter(|u| !u.is_empty())
                .map(ToOwned::to_owned),
        }
    }

    /// Compute the six field-match booleans against another key.
    ///
    /// Recomputed fresh for every pair; a field present on only one side
    /// never counts as a match.
    #[must_use]
    pub fn matches(&self, other: &FieldKey) -> FieldMatches {
        FieldMatches {
            name: field_eq(&self.name, &other.name),
            organization: field_eq(&self.organization, &other.organization),
            position: field_eq(&self.position, &other.position),
            region: field_eq(&self.region, &other.region),
            phone: field_eq(&self.phone, &other.phone),
            url: field_eq(&self.source_url, &other.source_url),
        }
    }
}

fn norm_text(value: Option<&str>) -> Option<String> {
    let normalized = value?.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn norm_phone(value: Option<&str>) -> Option<String> {
    let normalized: String = value?
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn field_eq(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Outcome of comparing one candidate against one stored contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatches {
    pub name: bool,
    pub organization: bool,
    pub position: bool,
    pub region: bool,
    pub phone: bool,
    pub url: bool,
}

impl FieldMatches {
    /// Agreement count among organization, position and region.
    #[inline]
    #[must_use]
    pub fn secondary(&self) -> usize {
        usize::from(self.organization) + usize::from(self.position) + usize::from(self.region)
    }

    /// Agreement count across all six compared fields.
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        usize::from(self.name)
            + usize::from(self.organization)
            + usize::from(self.position)
            + usize::from(self.region)
            + usize::from(self.phone)
            + usize::from(self.url)
    }
}
