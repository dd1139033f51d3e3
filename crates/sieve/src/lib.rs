//! # Sieve
//!
//! Composable predicates deciding which handler receives a chat-bot event.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────┐     ┌──────────────────────────────┐     ┌─────────┐
//! │  Event   │────▶│ Predicate (Filter / RuleBook) │────▶│ Handler │
//! └──────────┘     └──────────────────────────────┘     └─────────┘
//!                        │ reads
//!                        ▼
//!                 ConversationStates
//! ```
//!
//! - **core**: `Event`, `EventType`, `PartKind` and the conversation-state store
//! - **filter**: the `Predicate` trait, combinators, built-in predicates,
//!   the `Filter` namespace and a tower filter layer
//! - **runtime**: configuration, logging and configured rule books
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sieve::prelude::*;
//!
//! let states = ConversationStates::shared();
//! let upload = Filter::file()
//!     .and(Filter::state("awaiting_document", states.clone()))
//!     .or(Filter::command("/cancel"));
//!
//! if upload.evaluate(&event) {
//!     // handle the upload
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` (default): TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use sieve_core as core;
pub use sieve_filter as filter;
pub use sieve_runtime as runtime;

/// Commonly used types.
///
/// ```rust,ignore
/// use sieve::prelude::*;
/// ```
pub mod prelude {
    // Input types
    pub use sieve_core::{BoxedStateSource, ConversationStates, Event, EventType, StateSource};

    // Predicates
    pub use sieve_filter::{
        BoxedPredicate, Filter, FilterError, FilterRegistry, Predicate, PredicateExt,
        ServiceBuilderExt, all_of, any_of,
    };

    // Configuration
    pub use sieve_runtime::{ConfigLoader, RuleBook, SieveConfig, init_from_config};
}
