use ahash::AHashMap;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::filter::{ListQuery, SuspectQuery};
use crate::scoring;
use crate::{Contact, ContactCandidate, ContactId, ContactPatch, Error, FieldKey, Result};

/// Result of submitting a candidate.
///
/// An email collision is an expected, recoverable outcome: the pre-existing
/// contact is returned instead of a new row. Callers that need to tell the
/// two apart match on the variant rather than inspecting timestamps.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Created(Contact),
    AlreadyExisted(Contact),
}

impl SubmitOutcome {
    #[inline]
    #[must_use]
    pub fn contact(&self) -> &Contact {
        match self {
            SubmitOutcome::Created(c) | SubmitOutcome::AlreadyExisted(c) => c,
        }
    }

    #[inline]
    #[must_use]
    pub fn into_contact(self) -> Contact {
        match self {
            SubmitOutcome::Created(c) | SubmitOutcome::AlreadyExisted(c) => c,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }
}

struct Inner {
    contacts: AHashMap<ContactId, Contact>,
    email_index: AHashMap<String, ContactId>,
}

/// In-memory contact store and lifecycle manager.
///
/// Owns the accept/store decision: scores every candidate against the full
/// committed population, persists it with the resulting score, and serves the
/// score-filtered read paths. Email uniqueness is the only enforced
/// constraint; it is checked atomically under the write lock.
pub struct ContactRegistry {
    inner: RwLock<Inner>,
}

impl Default for ContactRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                contacts: AHashMap::new(),
                email_index: AHashMap::new(),
            }),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.read().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().contacts.is_empty()
    }

    /// Score and store a candidate.
    ///
    /// The population snapshot is taken before the write lock, so racing
    /// submissions each score against already-committed contacts only. The
    /// raw engine score is rounded to two decimals at persistence.
    pub fn submit(&self, candidate: ContactCandidate) -> Result<SubmitOutcome> {
        candidate.validate()?;

        let key = FieldKey::of_candidate(&candidate);
        let population: Vec<FieldKey> = {
            let inner = self.inner.read();
            inner.contacts.values().map(FieldKey::of_contact).collect()
        };
        let validation_score = round2(scoring::score(&key, &population));

        let mut inner = self.inner.write();
        if let Some(email) = &candidate.email {
            if let Some(existing_id) = inner.email_index.get(email) {
                let existing = inner.contacts[existing_id].clone();
                debug!(email = %email, id = %existing.id, "duplicate email, returning existing contact");
                return Ok(SubmitOutcome::AlreadyExisted(existing));
            }
        }

        let contact = Contact::accept(ContactId::new(), candidate, validation_score, Utc::now());
        if let Some(email) = &contact.email {
            inner.email_index.insert(email.clone(), contact.id);
        }
        inner.contacts.insert(contact.id, contact.clone());
        debug!(id = %contact.id, score = contact.validation_score, "contact accepted");
        Ok(SubmitOutcome::Created(contact))
    }

    /// Mark a contact invalid, forcing its score to 0.0.
    ///
    /// Idempotent; repeated invalidation is a no-op success. The reason is
    /// logged, not stored.
    pub fn invalidate(&self, id: ContactId, reason: &str) -> Result<Contact> {
        let mut inner = self.inner.write();
        let contact = inner.contacts.get_mut(&id).ok_or(Error::NotFound(id))?;
        if contact.is_valid || contact.validation_score != 0.0 {
            contact.is_valid = false;
            contact.validation_score = 0.0;
            contact.updated_at = Utc::now();
        }
        info!(%id, reason, "contact invalidated");
        Ok(contact.clone())
    }

    /// Apply a partial update to a stored contact.
    pub fn update(&self, id: ContactId, patch: ContactPatch) -> Result<Contact> {
        patch.validate()?;

        let mut inner = self.inner.write();
        if let Some(email) = &patch.email {
            if let Some(other) = inner.email_index.get(email) {
                if *other != id {
                    return Err(Error::DuplicateEmail(email.clone()));
                }
            }
        }

        let contact = inner.contacts.get_mut(&id).ok_or(Error::NotFound(id))?;
        let previous_email = contact.email.clone();

        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(organization) = patch.organization {
            contact.organization = Some(organization);
        }
        if let Some(position) = patch.position {
            contact.position = Some(position);
        }
        if let Some(email) = patch.email {
            contact.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(region) = patch.region {
            contact.region = Some(region);
        }
        if let Some(source_type) = patch.source_type {
            contact.source_type = Some(source_type);
        }
        if let Some(research_lines) = patch.research_lines {
            contact.research_lines = Some(research_lines);
        }
        contact.updated_at = Utc::now();
        let updated = contact.clone();

        if previous_email != updated.email {
            if let Some(old) = previous_email {
                inner.email_index.remove(&old);
            }
            if let Some(new) = &updated.email {
                inner.email_index.insert(new.clone(), id);
            }
        }
        Ok(updated)
    }

    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.inner.read().contacts.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<Contact> {
        let inner = self.inner.read();
        inner
            .email_index
            .get(email)
            .and_then(|id| inner.contacts.get(id))
            .cloned()
    }

    /// List contacts matching the query, best score first.
    pub fn list(&self, query: &ListQuery) -> (Vec<Contact>, usize) {
        let mut items: Vec<Contact> = {
            let inner = self.inner.read();
            inner
                .contacts
                .values()
                .filter(|c| query.matches(c))
                .cloned()
                .collect()
        };
        items.sort_by(|a, b| {
            b.validation_score
                .partial_cmp(&a.validation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        paginate(items, query.skip, query.limit)
    }

    /// List valid contacts whose score fell below the ceiling, worst first.
    pub fn suspects(&self, query: &SuspectQuery) -> (Vec<Contact>, usize) {
        let mut items: Vec<Contact> = {
            let inner = self.inner.read();
            inner
                .contacts
                .values()
                .filter(|c| query.matches(c))
                .cloned()
                .collect()
        };
        items.sort_by(|a, b| {
            a.validation_score
                .partial_cmp(&b.validation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        paginate(items, query.skip, query.limit)
    }

    /// Case-insensitive substring search over name, email and organization.
    /// Valid contacts only, best score first.
    pub fn search(&self, term: &str, skip: usize, limit: usize) -> (Vec<Contact>, usize) {
        let needle = term.to_lowercase();
        let mut items: Vec<Contact> = {
            let inner = self.inner.read();
            inner
                .contacts
                .values()
                .filter(|c| c.is_valid && matches_term(c, &needle))
                .cloned()
                .collect()
        };
        items.sort_by(|a, b| {
            b.validation_score
                .partial_cmp(&a.validation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        paginate(items, skip, limit)
    }

    /// Snapshot of the full population.
    pub fn iter(&self) -> Vec<Contact> {
        self.inner.read().contacts.values().cloned().collect()
    }

    /// Insert or replace a fully-formed contact, keeping the email index in
    /// step. Used by the storage layer when loading snapshots and replaying
    /// the log; scoring is not re-run.
    pub fn restore(&self, contact: Contact) {
        let mut inner = self.inner.write();
        let previous_email = inner
            .contacts
            .get(&contact.id)
            .and_then(|c| c.email.clone());
        if let Some(old_email) = previous_email {
            inner.email_index.remove(&old_email);
        }
        if let Some(email) = &contact.email {
            inner.email_index.insert(email.clone(), contact.id);
        }
        inner.contacts.insert(contact.id, contact);
    }
}

fn matches_term(contact: &Contact, needle: &str) -> bool {
    contact.name.to_lowercase().contains(needle)
        || contact
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(needle))
        || contact
            .organization
            .as_deref()
            .is_some_and(|o| o.to_lowercase().contains(needle))
}

fn paginate(items: Vec<Contact>, skip: usize, limit: usize) -> (Vec<Contact>, usize) {
    let total = items.len();
    let page = items.into_iter().skip(skip).take(limit).collect();
    (page, total)
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
