use crate::scoring::{SUSPECT_MAX_SCORE, VALID_MIN_SCORE};
use crate::Contact;

/// Filter and pagination for the default contact listing.
///
/// The defaults reproduce the accepted read-path boundary: valid contacts
/// scoring at least [`VALID_MIN_SCORE`].
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub only_valid: bool,
    pub min_score: Option<f64>,
    /// Exact region match.
    pub region: Option<String>,
    /// Case-insensitive substring match on the organization.
    pub organization: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            only_valid: true,
            min_score: Some(VALID_MIN_SCORE),
            region: None,
            organization: None,
            skip: 0,
            limit: 100,
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        if self.only_valid && !contact.is_valid {
            return false;
        }
        if let Some(min_score) = self.min_score {
            if contact.validation_score < min_score {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if contact.region.as_deref() != Some(region.as_str()) {
                return false;
            }
        }
        if let Some(organization) = &self.organization {
            let needle = organization.to_lowercase();
            let haystack = contact
                .organization
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            if !haystack.contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Filter for the possible-duplicates listing: valid contacts whose score
/// fell below the ceiling, worst first.
#[derive(Debug, Clone)]
pub struct SuspectQuery {
    pub max_score: f64,
    pub skip: usize,
    pub limit: usize,
}

impl Default for SuspectQuery {
    fn default() -> Self {
        Self {
            max_score: SUSPECT_MAX_SCORE,
            skip: 0,
            limit: 100,
        }
    }
}

impl SuspectQuery {
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        contact.is_valid && contact.validation_score < self.max_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContactCandidate, ContactId};
    use chrono::Utc;

    fn contact(score: f64, valid: bool, org: Option<&str>, region: Option<&str>) -> Contact {
        let mut candidate = ContactCandidate::new("Ana Pérez", "https://x.com/1");
        candidate.organization = org.map(ToOwned::to_owned);
        candidate.region = region.map(ToOwned::to_owned);
        let mut c = Contact::accept(ContactId::new(), candidate, score, Utc::now());
        c.is_valid = valid;
        c
    }

    #[test]
    fn test_default_list_query_excludes_suspects() {
        let q = ListQuery::default();
        assert!(q.matches(&contact(1.0, true, None, None)));
        assert!(q.matches(&contact(0.7, true, None, None)));
        assert!(!q.matches(&contact(0.3, true, None, None)));
        assert!(!q.matches(&contact(1.0, false, None, None)));
    }

    #[test]
    fn test_organization_substring_is_case_insensitive() {
        let q = ListQuery {
            organization: Some("austral".into()),
            ..ListQuery::default()
        };
        assert!(q.matches(&contact(1.0, true, Some("Universidad Austral de Chile"), None)));
        assert!(!q.matches(&contact(1.0, true, Some("UC"), None)));
        assert!(!q.matches(&contact(1.0, true, None, None)));
    }

    #[test]
    fn test_region_is_exact() {
        let q = ListQuery {
            region: Some("Los Ríos".into()),
            ..ListQuery::default()
        };
        assert!(q.matches(&contact(1.0, true, None, Some("Los Ríos"))));
        assert!(!q.matches(&contact(1.0, true, None, Some("los ríos"))));
    }

    #[test]
    fn test_suspect_query() {
        let q = SuspectQuery::default();
        assert!(q.matches(&contact(0.3, true, None, None)));
        assert!(!q.matches(&contact(1.0, true, None, None)));
        assert!(!q.matches(&contact(0.3, false, None, None)));
    }
}
