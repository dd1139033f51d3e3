//! Rule books: named predicates declared in configuration.
//!
//! Each entry of `rules` in [`SieveConfig`] is a [`RuleSpec`] tree whose
//! leaves name a [`FilterRegistry`] alias. A [`RuleBook`] builds every tree
//! once, up front, so a typo or an invalid pattern stops the bot at startup
//! instead of silently never matching.
//!
//! ```rust,ignore
//! use sieve_runtime::{RuleBook, config::load_config};
//!
//! let config = load_config()?;
//! let rules = RuleBook::from_config(&config, Some(states.clone()))?;
//!
//! for name in rules.matching(&event) {
//!     dispatch(name, &event);
//! }
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use sieve_core::{BoxedStateSource, Event};
use sieve_filter::{
    BoxedPredicate, FilterArgs, FilterRegistry, FilterResult, Predicate, all_of, any_of,
};

use crate::config::{FilterSettings, RuleSpec, SieveConfig};
use crate::error::{RuntimeError, RuntimeResult};

/// Named predicates built from configuration.
#[derive(Clone, Default)]
pub struct RuleBook {
    rules: BTreeMap<String, BoxedPredicate>,
}

impl RuleBook {
    /// Builds every rule in `config.rules`.
    ///
    /// `states` is handed to state-based aliases; building one of those
    /// without a source is an error.
    pub fn from_config(
        config: &SieveConfig,
        states: Option<BoxedStateSource>,
    ) -> RuntimeResult<Self> {
        let builder = RuleBuilder {
            registry: FilterRegistry::global(),
            settings: &config.filters,
            states: states.as_ref(),
        };

        let mut rules = BTreeMap::new();
        for (name, spec) in &config.rules {
            let predicate = builder
                .build(spec)
                .map_err(|source| RuntimeError::rule(name, source))?;
            debug!(rule = %name, "Built rule");
            rules.insert(name.clone(), predicate);
        }

        info!(count = rules.len(), "Rule book ready");
        Ok(Self { rules })
    }

    /// Returns the predicate for `name`.
    pub fn get(&self, name: &str) -> Option<&BoxedPredicate> {
        self.rules.get(name)
    }

    /// Returns the names of all rules matching `event`, in name order.
    pub fn matching<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a str> + 'a {
        self.rules
            .iter()
            .filter(move |(_, predicate)| predicate.evaluate(event))
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

struct RuleBuilder<'a> {
    registry: &'a FilterRegistry,
    settings: &'a FilterSettings,
    states: Option<&'a BoxedStateSource>,
}

impl RuleBuilder<'_> {
    fn build(&self, spec: &RuleSpec) -> FilterResult<BoxedPredicate> {
        match spec {
            RuleSpec::Leaf { filter, arg } => {
                let mut args =
                    FilterArgs::new(arg).with_command_prefixes(&self.settings.command_prefixes);
                if let Some(states) = self.states {
                    args = args.with_states(states);
                }
                self.registry.build(filter, &args)
            }
            RuleSpec::All { all } => all_of(self.build_each(all)?),
            RuleSpec::Any { any } => any_of(self.build_each(any)?),
        }
    }

    fn build_each(&self, specs: &[RuleSpec]) -> FilterResult<Vec<BoxedPredicate>> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }
}
