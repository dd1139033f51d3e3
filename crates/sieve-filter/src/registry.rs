//! Short names for the built-in predicates.
//!
//! Handler-registration code refers to predicates through two surfaces:
//!
//! - [`Filter`], a namespace of functions returning ready-made predicates.
//!   Predicates without configuration (`file`, `reply`, `forward`, `message`)
//!   are shared singletons; the rest are built from their arguments.
//! - [`FilterRegistry`], a read-only table from alias name to an [`Alias`],
//!   used when the predicate to build is only known by name, e.g. from a
//!   configuration file.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use sieve_filter::{Filter, FilterArgs, FilterRegistry};
//!
//! let start = Filter::command("/start");
//! let digits = Filter::regexp(r"\d+")?;
//!
//! let registry = FilterRegistry::global();
//! let cancel = registry.build("command", &FilterArgs::new(&json!("/cancel")))?;
//! let files = registry.build("file", &FilterArgs::none())?;
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use serde_json::Value;
use tracing::debug;

use sieve_core::BoxedStateSource;

use crate::callback::{CallbackDataPredicate, CallbackDataRegexPredicate};
use crate::error::{FilterError, FilterResult};
use crate::nick::{FromNickPredicate, NickMatch};
use crate::predicate::{BoxedPredicate, PredicateExt};
use crate::shape::{FilePredicate, ForwardPredicate, MessagePredicate, ReplyPredicate};
use crate::state::{StateContainsPredicate, StateEqualsPredicate};
use crate::text::{CommandPredicate, RegexPredicate, RegexTextPartsPredicate, TagPredicate};

static MESSAGE: LazyLock<BoxedPredicate> = LazyLock::new(|| Arc::new(MessagePredicate));
static FILE: LazyLock<BoxedPredicate> = LazyLock::new(|| Arc::new(FilePredicate));
static REPLY: LazyLock<BoxedPredicate> = LazyLock::new(|| Arc::new(ReplyPredicate));
static FORWARD: LazyLock<BoxedPredicate> = LazyLock::new(|| Arc::new(ForwardPredicate));

static REGISTRY: LazyLock<FilterRegistry> = LazyLock::new(FilterRegistry::builtin);

static NO_ARGUMENT: Value = Value::Null;

// ============================================================================
// Filter namespace
// ============================================================================

/// Namespace of the built-in predicates under their short names.
pub struct Filter;

impl Filter {
    /// Any new message (shared instance).
    pub fn message() -> BoxedPredicate {
        Arc::clone(&MESSAGE)
    }

    /// Alias of [`Filter::message`].
    pub fn messagetext() -> BoxedPredicate {
        Self::message()
    }

    /// Messages carrying a file part (shared instance).
    pub fn file() -> BoxedPredicate {
        Arc::clone(&FILE)
    }

    /// Messages carrying a reply part (shared instance).
    pub fn reply() -> BoxedPredicate {
        Arc::clone(&REPLY)
    }

    /// Events carrying a forward part (shared instance).
    pub fn forward() -> BoxedPredicate {
        Arc::clone(&FORWARD)
    }

    /// Messages that are exactly `command`.
    pub fn command(command: impl Into<String>) -> CommandPredicate {
        CommandPredicate::new(command)
    }

    /// Messages whose text contains a match of `pattern`.
    pub fn regexp(pattern: &str) -> FilterResult<RegexPredicate> {
        RegexPredicate::new(pattern)
    }

    /// Messages with a part whose nested text matches `pattern`.
    pub fn regexp_text_parts(pattern: &str) -> FilterResult<RegexTextPartsPredicate> {
        RegexTextPartsPredicate::new(pattern)
    }

    /// Messages whose parts were authored by `nick`.
    pub fn message_text_from_nick(nick: impl Into<String>) -> FromNickPredicate {
        FromNickPredicate::new(nick)
    }

    /// Messages whose text is one of `tags`.
    pub fn tag<I, S>(tags: I) -> TagPredicate
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagPredicate::new(tags)
    }

    /// Callback queries carrying exactly `value`.
    pub fn callback_data(value: impl Into<String>) -> CallbackDataPredicate {
        CallbackDataPredicate::new(value)
    }

    /// Callback queries whose data contains a match of `pattern`.
    pub fn callback_data_regexp(pattern: &str) -> FilterResult<CallbackDataRegexPredicate> {
        CallbackDataRegexPredicate::new(pattern)
    }

    /// Messages from chats whose state equals `expected`.
    pub fn state(expected: impl Into<Value>, states: BoxedStateSource) -> StateEqualsPredicate {
        StateEqualsPredicate::new(expected, states)
    }

    /// Messages from chats whose active sub-states include `key`.
    pub fn state_regex(
        key: impl Into<String>,
        states: BoxedStateSource,
    ) -> StateContainsPredicate {
        StateContainsPredicate::new(key, states)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Builds a predicate from the alias name and its arguments.
pub type Constructor = fn(&str, &FilterArgs<'_>) -> FilterResult<BoxedPredicate>;

/// A registry entry.
#[derive(Clone)]
pub enum Alias {
    /// A pre-built predicate that takes no arguments.
    Instance(BoxedPredicate),
    /// A constructor taking [`FilterArgs`].
    Constructor(Constructor),
}

/// Arguments passed to an alias constructor.
///
/// `arg` is the alias-specific argument (a pattern, a command, a list of
/// tags, ...). State-based aliases additionally need a state source.
#[derive(Clone, Copy)]
pub struct FilterArgs<'a> {
    arg: &'a Value,
    states: Option<&'a BoxedStateSource>,
    command_prefixes: Option<&'a str>,
}

impl<'a> FilterArgs<'a> {
    /// Arguments consisting of `arg` only.
    pub fn new(arg: &'a Value) -> Self {
        Self {
            arg,
            states: None,
            command_prefixes: None,
        }
    }

    /// No argument at all, for instance aliases.
    pub fn none() -> FilterArgs<'static> {
        FilterArgs::new(&NO_ARGUMENT)
    }

    /// Supplies the conversation state source for state-based aliases.
    pub fn with_states(mut self, states: &'a BoxedStateSource) -> Self {
        self.states = Some(states);
        self
    }

    /// Overrides the command prefix characters used by `command`.
    pub fn with_command_prefixes(mut self, prefixes: &'a str) -> Self {
        self.command_prefixes = Some(prefixes);
        self
    }

    /// Returns the raw argument.
    pub fn arg(&self) -> &'a Value {
        self.arg
    }

    fn string(&self, alias: &str) -> FilterResult<&'a str> {
        self.arg
            .as_str()
            .ok_or_else(|| FilterError::invalid_argument(alias, "a string argument"))
    }

    fn strings(&self, alias: &str) -> FilterResult<Vec<String>> {
        let invalid = || FilterError::invalid_argument(alias, "a string or a list of strings");
        match self.arg {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            _ => Err(invalid()),
        }
    }

    fn states(&self, alias: &str) -> FilterResult<BoxedStateSource> {
        self.states
            .cloned()
            .ok_or_else(|| FilterError::MissingStateSource(alias.to_string()))
    }
}

/// A read-only table of predicate aliases.
///
/// The built-in table is assembled once on first use and never changes; see
/// [`FilterRegistry::global`].
pub struct FilterRegistry {
    aliases: BTreeMap<&'static str, Alias>,
}

impl FilterRegistry {
    /// Returns the built-in registry.
    pub fn global() -> &'static FilterRegistry {
        &REGISTRY
    }

    fn builtin() -> Self {
        let mut aliases = BTreeMap::new();
        for name in ["message", "messagetext"] {
            aliases.insert(name, Alias::Instance(Filter::message()));
        }
        aliases.insert("file", Alias::Instance(Filter::file()));
        aliases.insert("reply", Alias::Instance(Filter::reply()));
        aliases.insert("forward", Alias::Instance(Filter::forward()));

        let constructors: [(&'static str, Constructor); 11] = [
            ("command", build_command),
            ("regexp", build_regexp),
            ("regex", build_regexp),
            ("regexp_text_parts", build_regexp_text_parts),
            ("message_text_from_nick", build_from_nick),
            ("tag", build_tag),
            ("callback_data", build_callback_data),
            ("callback_data_regexp", build_callback_data_regexp),
            ("state", build_state),
            ("state_regex", build_state_contains),
            ("state_contains", build_state_contains),
        ];
        for (name, constructor) in constructors {
            aliases.insert(name, Alias::Constructor(constructor));
        }
        Self { aliases }
    }

    /// Looks up an alias.
    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Returns all alias names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.aliases.keys().copied()
    }

    /// Builds the predicate registered under `name`.
    ///
    /// Instance aliases return their shared predicate and reject any
    /// argument. Unknown names and ill-shaped arguments are errors.
    pub fn build(&self, name: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
        let alias = self
            .get(name)
            .ok_or_else(|| FilterError::UnknownAlias(name.to_string()))?;
        let predicate = match alias {
            Alias::Instance(predicate) => {
                if !args.arg.is_null() {
                    return Err(FilterError::invalid_argument(name, "no argument"));
                }
                Arc::clone(predicate)
            }
            Alias::Constructor(construct) => construct(name, args)?,
        };
        debug!(alias = name, "Built filter");
        Ok(predicate)
    }
}

// ============================================================================
// Constructors
// ============================================================================

fn build_command(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    let mut command = CommandPredicate::new(args.string(alias)?);
    if let Some(prefixes) = args.command_prefixes {
        command = command.with_prefixes(prefixes);
    }
    Ok(command.boxed())
}

fn build_regexp(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    Ok(RegexPredicate::new(args.string(alias)?)?.boxed())
}

fn build_regexp_text_parts(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    Ok(RegexTextPartsPredicate::new(args.string(alias)?)?.boxed())
}

/// Accepts `"nick"` or `{"nick": "nick", "all": true}`.
fn build_from_nick(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    let invalid = || FilterError::invalid_argument(alias, "a nick or {nick, all}");
    let (nick, all) = match args.arg {
        Value::String(nick) => (nick.as_str(), false),
        Value::Object(fields) => {
            let nick = fields
                .get("nick")
                .and_then(Value::as_str)
                .ok_or_else(invalid)?;
            let all = match fields.get("all") {
                None => false,
                Some(flag) => flag.as_bool().ok_or_else(invalid)?,
            };
            (nick, all)
        }
        _ => return Err(invalid()),
    };
    let mode = if all { NickMatch::All } else { NickMatch::Any };
    Ok(FromNickPredicate::new(nick).with_mode(mode).boxed())
}

fn build_tag(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    Ok(TagPredicate::new(args.strings(alias)?).boxed())
}

fn build_callback_data(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    Ok(CallbackDataPredicate::new(args.string(alias)?).boxed())
}

fn build_callback_data_regexp(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    Ok(CallbackDataRegexPredicate::new(args.string(alias)?)?.boxed())
}

fn build_state(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    if args.arg.is_null() {
        return Err(FilterError::invalid_argument(alias, "an expected state"));
    }
    let states = args.states(alias)?;
    Ok(StateEqualsPredicate::new(args.arg.clone(), states).boxed())
}

fn build_state_contains(alias: &str, args: &FilterArgs<'_>) -> FilterResult<BoxedPredicate> {
    let key = args.string(alias)?;
    let states = args.states(alias)?;
    Ok(StateContainsPredicate::new(key, states).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;
    use serde_json::json;
    use sieve_core::{ConversationStates, Event};

    #[test]
    fn test_singletons_are_shared() {
        assert!(Arc::ptr_eq(&Filter::file(), &Filter::file()));
        assert!(Arc::ptr_eq(&Filter::message(), &Filter::messagetext()));
        assert!(Arc::ptr_eq(&Filter::reply(), &Filter::reply()));
        assert!(Arc::ptr_eq(&Filter::forward(), &Filter::forward()));
    }

    #[test]
    fn test_registry_lists_aliases() {
        let registry = FilterRegistry::global();
        for name in [
            "message",
            "messagetext",
            "file",
            "reply",
            "forward",
            "command",
            "regexp",
            "regexp_text_parts",
            "message_text_from_nick",
            "tag",
            "callback_data",
            "callback_data_regexp",
            "state",
            "state_regex",
        ] {
            assert!(registry.contains(name), "missing alias {name}");
        }
        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_instance_alias_returns_singleton() {
        let registry = FilterRegistry::global();
        let file = registry.build("file", &FilterArgs::none()).unwrap();
        assert!(Arc::ptr_eq(&file, &Filter::file()));

        let err = registry
            .build("file", &FilterArgs::new(&json!("x")))
            .err()
            .unwrap();
        assert!(matches!(err, FilterError::InvalidArgument { .. }));
    }

    #[test]
    fn test_build_command_with_prefixes() {
        let registry = FilterRegistry::global();
        let arg = json!("!help");
        let bang = registry
            .build("command", &FilterArgs::new(&arg).with_command_prefixes("!"))
            .unwrap();
        assert!(bang.evaluate(&Event::message(json!({"text": "!help"}))));

        let slash = registry.build("command", &FilterArgs::new(&arg)).unwrap();
        assert!(!slash.evaluate(&Event::message(json!({"text": "!help"}))));
    }

    #[test]
    fn test_build_regexp_errors() {
        let registry = FilterRegistry::global();
        assert!(matches!(
            registry.build("regexp", &FilterArgs::new(&json!("("))).err(),
            Some(FilterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            registry.build("regexp", &FilterArgs::none()).err(),
            Some(FilterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            registry.build("nope", &FilterArgs::none()).err(),
            Some(FilterError::UnknownAlias(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_build_tag_from_string_or_list() {
        let registry = FilterRegistry::global();
        let single = registry.build("tag", &FilterArgs::new(&json!("#a"))).unwrap();
        let many = registry
            .build("tag", &FilterArgs::new(&json!(["#a", "#b"])))
            .unwrap();
        let event = Event::message(json!({"text": "#b"}));
        assert!(!single.evaluate(&event));
        assert!(many.evaluate(&event));
        assert!(
            registry
                .build("tag", &FilterArgs::new(&json!(["#a", 1])))
                .is_err()
        );
    }

    #[test]
    fn test_build_from_nick_modes() {
        let registry = FilterRegistry::global();
        let event = Event::message(json!({"parts": [
            {"payload": {"message": {"from": {"nick": "a"}}}},
            {"payload": {"message": {"from": {"nick": "b"}}}}
        ]}));
        let any = registry
            .build("message_text_from_nick", &FilterArgs::new(&json!("a")))
            .unwrap();
        let all = registry
            .build(
                "message_text_from_nick",
                &FilterArgs::new(&json!({"nick": "a", "all": true})),
            )
            .unwrap();
        assert!(any.evaluate(&event));
        assert!(!all.evaluate(&event));
    }

    #[test]
    fn test_state_aliases_need_a_source() {
        let registry = FilterRegistry::global();
        let arg = json!("menu");
        assert!(matches!(
            registry.build("state", &FilterArgs::new(&arg)).err(),
            Some(FilterError::MissingStateSource(_))
        ));

        let store = ConversationStates::shared();
        store.set_state("c1", json!("menu"));
        let states: BoxedStateSource = store;
        let state = registry
            .build("state", &FilterArgs::new(&arg).with_states(&states))
            .unwrap();
        assert!(state.evaluate(&Event::message(json!({"chat": {"chatId": "c1"}}))));
    }

    #[test]
    fn test_callback_aliases() {
        let registry = FilterRegistry::global();
        let exact = registry
            .build("callback_data", &FilterArgs::new(&json!("ok")))
            .unwrap();
        let pattern = registry
            .build("callback_data_regexp", &FilterArgs::new(&json!("^o")))
            .unwrap();
        let event = Event::callback_query("ok", json!({}));
        assert!(exact.evaluate(&event));
        assert!(pattern.evaluate(&event));
    }
}
