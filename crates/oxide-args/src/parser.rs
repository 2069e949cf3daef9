//! The argv parser.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::options::ParseOptions;
use crate::value::Value;

/// Parsed arguments: named flags plus the tokens no flag consumed.
///
/// Serializes as one map with the positional tokens under `"_"` and each
/// flag under its own name. A flag literally named `_` is left out so the
/// positional list keeps that key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    /// Bare tokens, in order.
    pub positional: Vec<String>,
    /// Flag values by name. Aliases appear under every name of their group.
    pub flags: BTreeMap<String, Value>,
}

impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags = || self.flags.iter().filter(|(name, _)| name.as_str() != POSITIONAL_KEY);
        let mut map = serializer.serialize_map(Some(1 + flags().count()))?;
        map.serialize_entry(POSITIONAL_KEY, &self.positional)?;
        for (name, value) in flags() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

const POSITIONAL_KEY: &str = "_";

impl Args {
    /// Gets a flag value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }

    /// Gets a flag value as a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Gets a flag value as a number.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Returns `true` if the flag was given with a truthy value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    /// Returns `true` if the flag has any value, including `false`.
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }
}

/// Parses an argument vector.
///
/// Parsing is lenient: unknown flags are accepted and never cause an error.
///
/// # Example
///
/// ```
/// use oxide_args::{parse, ParseOptions, Value};
///
/// let args = parse(["start", "-a", "5", "--name=web", "extra"], &ParseOptions::new());
/// assert_eq!(args.positional, vec!["start", "extra"]);
/// assert_eq!(args.get("a"), Some(&Value::Number(5.0)));
/// assert_eq!(args.get_str("name"), Some("web"));
/// ```
pub fn parse<I, S>(argv: I, options: &ParseOptions) -> Args
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = argv.into_iter().map(Into::into).collect();
    Parser::new(options).parse(tokens)
}

struct Parser<'o> {
    options: &'o ParseOptions,
    aliases: BTreeMap<String, Vec<String>>,
    bools: BTreeSet<String>,
    strings: BTreeSet<String>,
    args: Args,
}

impl<'o> Parser<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        let aliases = options.alias_groups();
        let expand = |names: &BTreeSet<String>| {
            let mut expanded = names.clone();
            for name in names {
                if let Some(group) = aliases.get(name) {
                    expanded.extend(group.iter().cloned());
                }
            }
            expanded
        };
        let bools = expand(&options.boolean);
        let strings = expand(&options.string);

        Self {
            options,
            aliases,
            bools,
            strings,
            args: Args::default(),
        }
    }

    fn parse(mut self, mut tokens: Vec<String>) -> Args {
        let after_terminator = tokens
            .iter()
            .position(|t| t == "--")
            .map(|at| {
                let rest = tokens.split_off(at + 1);
                tokens.pop();
                rest
            })
            .unwrap_or_default();

        let options = self.options;
        for name in &options.boolean {
            let initial = match options.default.get(name) {
                Some(value) => value.clone(),
                None => Value::Bool(false),
            };
            self.set_arg(name, initial);
        }

        let mut i = 0;
        while i < tokens.len() {
            let arg = &tokens[i];
            let next = tokens.get(i + 1).map(String::as_str);

            if let Some(body) = arg.strip_prefix("--").filter(|b| !b.is_empty()) {
                if self.long_flag(body, next) {
                    i += 1;
                }
            } else if let Some(body) = arg.strip_prefix('-').filter(|b| !b.is_empty()) {
                if self.short_flags(body, next) {
                    i += 1;
                }
            } else {
                self.args.positional.push(arg.clone());
                if options.stop_early {
                    self.args
                        .positional
                        .extend(tokens[i + 1..].iter().cloned());
                    break;
                }
            }
            i += 1;
        }

        self.apply_defaults();
        self.args.positional.extend(after_terminator);
        self.args
    }

    /// Handles `--key`, `--key=value` and `--no-key`. Returns `true` if the
    /// following token was consumed as the value.
    fn long_flag(&mut self, body: &str, next: Option<&str>) -> bool {
        if let Some((key, raw)) = body.split_once('=').filter(|(k, _)| !k.is_empty()) {
            let value = if self.bools.contains(key) {
                Value::Bool(raw != "false")
            } else {
                self.value_for(key, raw)
            };
            self.set_arg(key, value);
            return false;
        }

        if let Some(key) = body.strip_prefix("no-").filter(|k| !k.is_empty()) {
            self.set_arg(key, Value::Bool(false));
            return false;
        }

        self.trailing_flag(body, next, |n| !n.starts_with('-'))
    }

    /// Handles a group of short flags such as `-abc`, `-n5` or `-o=out`.
    fn short_flags(&mut self, body: &str, next: Option<&str>) -> bool {
        let letters: Vec<(usize, char)> = body.char_indices().collect();
        let Some(&(_, last)) = letters.last() else {
            return false;
        };

        for window in letters.windows(2) {
            let (_, letter) = window[0];
            let (rest_at, following) = window[1];
            let key = letter.to_string();
            let rest = &body[rest_at..];

            if rest == "-" {
                let value = self.value_for(&key, rest);
                self.set_arg(&key, value);
                continue;
            }
            if letter.is_alphabetic() {
                if let Some(raw) = rest.strip_prefix('=') {
                    let value = self.value_for(&key, raw);
                    self.set_arg(&key, value);
                    return false;
                }
                if is_short_number(rest) {
                    let value = self.value_for(&key, rest);
                    self.set_arg(&key, value);
                    return false;
                }
            }
            if !(following.is_alphanumeric() || following == '_') {
                let value = self.value_for(&key, rest);
                self.set_arg(&key, value);
                return false;
            }
            let value = self.bare_value(&key);
            self.set_arg(&key, value);
        }

        if last == '-' {
            return false;
        }
        self.trailing_flag(&last.to_string(), next, |n| {
            !(n.len() > 1 && n.starts_with('-'))
        })
    }

    /// Sets a flag that may take its value from the following token.
    fn trailing_flag(
        &mut self,
        key: &str,
        next: Option<&str>,
        consumable: impl Fn(&str) -> bool,
    ) -> bool {
        match next {
            Some(n) if consumable(n) && !self.bools.contains(key) => {
                let value = self.value_for(key, n);
                self.set_arg(key, value);
                true
            }
            Some(n @ ("true" | "false")) => {
                self.set_arg(key, Value::Bool(n == "true"));
                true
            }
            _ => {
                let value = self.bare_value(key);
                self.set_arg(key, value);
                false
            }
        }
    }

    fn apply_defaults(&mut self) {
        for (key, value) in &self.options.default {
            let mut names = std::iter::once(key).chain(self.aliases.get(key).into_iter().flatten());
            if names.any(|n| self.args.flags.contains_key(n)) {
                continue;
            }
            self.args.flags.insert(key.clone(), value.clone());
            for alias in self.aliases.get(key).into_iter().flatten() {
                self.args.flags.insert(alias.clone(), value.clone());
            }
        }
    }

    fn value_for(&self, key: &str, raw: &str) -> Value {
        if self.strings.contains(key) {
            Value::String(raw.to_string())
        } else {
            Value::from_token(raw)
        }
    }

    fn bare_value(&self, key: &str) -> Value {
        if self.strings.contains(key) {
            Value::String(String::new())
        } else {
            Value::Bool(true)
        }
    }

    fn set_arg(&mut self, key: &str, value: Value) {
        let aliases = self.aliases.get(key).cloned().unwrap_or_default();
        self.set_key(key, value.clone());
        for alias in &aliases {
            self.set_key(alias, value.clone());
        }
    }

    fn set_key(&mut self, key: &str, value: Value) {
        let overwrite = self.bools.contains(key);
        match self.args.flags.get_mut(key) {
            None => {
                self.args.flags.insert(key.to_string(), value);
            }
            Some(existing) if overwrite || matches!(existing, Value::Bool(_)) => {
                *existing = value;
            }
            Some(Value::List(values)) => values.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::List(Vec::new()));
                *existing = Value::List(vec![first, value]);
            }
        }
    }
}

/// `-n5`, `-n-1.5`, `-n2e3`: a short flag glued to a number.
fn is_short_number(rest: &str) -> bool {
    let digits = rest.strip_prefix('-').unwrap_or(rest);
    digits.starts_with(|c: char| c.is_ascii_digit()) && Value::is_numeric(digits)
}
