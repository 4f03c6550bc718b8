//! external-vocab - Concurrent external-vocabulary term lookup
//!
//! Answers one question for a host application: given a partial term a
//! user is typing into a controlled-vocabulary field (keywords,
//! discipline), which external authority-list entries match, across one
//! or more remote vocabulary services, without blocking on any single
//! service's failure or slowness?
//!
//! ## Pipeline
//! raw term -> sanitize -> dispatch (kind/locale -> query plans) ->
//! concurrent fetch -> per-service normalization -> aggregate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use external_vocab::VocabLookupEngine;
//!
//! # async fn lookup() {
//! let engine = VocabLookupEngine::finto().expect("valid default config");
//! let suggestions = engine
//!     .suggest("submissionKeyword", Some("climate"), "en")
//!     .await;
//! for s in suggestions {
//!     println!("{}", s.label);
//! }
//! # }
//! ```

// Configuration-time error handling
pub mod error;

// Request-scoped data types
pub mod types;

// Input sanitization
pub mod sanitize;

// Kind/locale -> query plan routing
pub mod dispatch;

// Concurrent settle-all plan execution
pub mod fetch;

// Per-service response normalization
pub mod normalize;

// Cross-service merge and dedup
pub mod aggregate;

// Public engine boundary
pub mod engine;

pub use engine::{skos_registry, VocabLookupEngine};
pub use error::ConfigError;
pub use types::{FetchFailure, FetchOutcome, QueryPlan, Suggestion, TermQuery};
