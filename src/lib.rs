//! # ContactX
//!
//! A contact registry with insertion-time duplicate scoring.
//!
//! Every submitted candidate is compared against the full stored population
//! with an ordered, min-clamped rule set and persisted with a confidence
//! score in [0.0, 1.0]; nothing is auto-rejected except an exact duplicate
//! email. Read paths filter and rank by the stored score.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install contactx
//! contactx --data-dir ./data --http-port 8300
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use contactx::prelude::*;
//!
//! let registry = ContactRegistry::new();
//!
//! let outcome = registry
//!     .submit(ContactCandidate::new("Ana Pérez", "https://x.com/1"))
//!     .unwrap();
//! assert_eq!(outcome.contact().validation_score, 1.0);
//!
//! // Same origin page: suspicious, scored 0.7.
//! let outcome = registry
//!     .submit(ContactCandidate::new("Juan Soto", "https://x.com/1"))
//!     .unwrap();
//! assert_eq!(outcome.contact().validation_score, 0.7);
//! ```
//!
//! ## Crate Structure
//!
//! ContactX is composed of several crates:
//!
//! - `contactx-core` - Contact model, scoring engine, registry
//! - `contactx-storage` - Persistence layer (snapshot, WAL)
//! - `contactx-api` - REST API
//!
//! ## Features
//!
//! - **Rule-based scoring**: prioritized field-overlap rules with min-clamping
//! - **Structural dedup**: unique email index, duplicate submits return the
//!   existing row
//! - **Score-ranked reads**: validity threshold, suspect listing, search
//! - **Persistence**: snapshot plus write-ahead log

// Re-export core types
pub use contactx_core::{
    scoring, Contact, ContactCandidate, ContactId, ContactPatch, ContactRegistry, Error, FieldKey,
    FieldMatches, ListQuery, Result, SubmitOutcome, SuspectQuery,
};

// Re-export storage
pub use contactx_storage::StorageManager;

// Re-export API
pub use contactx_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        scoring, Contact, ContactCandidate, ContactId, ContactPatch, ContactRegistry, Error,
        FieldKey, FieldMatches, ListQuery, Result, RestApi, StorageManager, SubmitOutcome,
        SuspectQuery,
    };
}
