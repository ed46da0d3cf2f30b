//! # ContactX Core
//!
//! Core library for the ContactX contact registry.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Contact`] - An accepted contact record with its validation score
//! - [`ContactCandidate`] - A proposed record, validated on submission
//! - [`FieldKey`] - Normalized comparison projection used by the scorer
//! - [`scoring`] - The pairwise rule cascade and population min-fold
//! - [`ContactRegistry`] - In-memory store with the accept/score lifecycle
//!
//! ## Example
//!
//! ```rust
//! use contactx_core::{ContactCandidate, ContactRegistry, ListQuery};
//!
//! let registry = ContactRegistry::new();
//!
//! // First contact: nothing to compare against, scores 1.0.
//! let outcome = registry
//!     .submit(ContactCandidate::new("Ana Pérez", "https://x.com/1"))
//!     .unwrap();
//! assert_eq!(outcome.contact().validation_score, 1.0);
//!
//! // Same source URL: suspicious, scores 0.7.
//! let outcome = registry
//!     .submit(ContactCandidate::new("Juan Soto", "https://x.com/1"))
//!     .unwrap();
//! assert_eq!(outcome.contact().validation_score, 0.7);
//!
//! let (contacts, total) = registry.list(&ListQuery::default());
//! assert_eq!(total, 2);
//! assert_eq!(contacts.len(), 2);
//! ```

pub mod contact;
pub mod error;
pub mod fieldkey;
pub mod filter;
pub mod registry;
pub mod scoring;

pub use contact::{Contact, ContactCandidate, ContactId, ContactPatch};
pub use error::{Error, Result};
pub use fieldkey::{FieldKey, FieldMatches};
pub use filter::{ListQuery, SuspectQuery};
pub use registry::{ContactRegistry, SubmitOutcome};
pub use scoring::{SUSPECT_MAX_SCORE, UNIQUE_SCORE, VALID_MIN_SCORE};
