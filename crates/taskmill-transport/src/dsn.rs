//! DSN parsing — `scheme://body?opt=val`, with `(a || b)` composite bodies.
//!
//! The composite grammar rules out a general-purpose URL parser: a failover
//! body holds whole sub-DSNs between its parentheses.

use std::collections::HashMap;
use taskmill_core::{Result, TaskmillError};

/// A parsed connection descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Dsn {
    scheme: String,
    root: String,
    options: HashMap<String, String>,
    raw: String,
}

impl Dsn {
    /// Parse a DSN string of the shape `scheme://body?opt1=val1&opt2=val2`.
    pub fn from_string(dsn: &str) -> Result<Self> {
        let (scheme, rest) = dsn.split_once("://").ok_or_else(|| {
            TaskmillError::Configuration(format!("The DSN \"{dsn}\" is invalid, a scheme is required"))
        })?;
        if scheme.is_empty() {
            return Err(TaskmillError::Configuration(format!(
                "The DSN \"{dsn}\" is invalid, a scheme is required"
            )));
        }

        // A parenthesized body carries whole sub-DSNs, each allowed its
        // own `?` options, so the outer query only starts after the
        // closing parenthesis.
        let (root, query) = if rest.starts_with('(') {
            match rest.rfind(')') {
                Some(end) => (&rest[..=end], rest[end + 1..].strip_prefix('?')),
                None => (rest, None),
            }
        } else {
            match rest.split_once('?') {
                Some((root, query)) => (root, Some(query)),
                None => (rest, None),
            }
        };

        let mut options = HashMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                match pair.split_once('=') {
                    Some((key, value)) => options.insert(key.to_string(), value.to_string()),
                    None => options.insert(pair.to_string(), String::new()),
                };
            }
        }

        Ok(Self {
            scheme: scheme.to_string(),
            root: root.to_string(),
            options,
            raw: dsn.to_string(),
        })
    }

    /// The transport kind, e.g. `memory`, `failover`, `fo`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The body between `://` and `?` — a backend-specific locator.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The original DSN string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Flat string-keyed option map parsed from the query part.
    pub fn options(&self) -> &HashMap<String, String> {
        &self.options
    }

    /// A single option value.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Copy of this DSN with the given options layered over the ones
    /// parsed from the query part.
    pub fn with_overrides(&self, overrides: &HashMap<String, String>) -> Dsn {
        let mut merged = self.clone();
        merged
            .options
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Sub-DSNs of a composite body `(dsn-1 || dsn-2 || ... || dsn-N)`.
    /// Faults if the body is not parenthesized or holds no sub-DSN.
    pub fn nested(&self) -> Result<Vec<Dsn>> {
        let inner = self
            .root
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| {
                TaskmillError::Configuration(format!(
                    "The DSN \"{}\" does not define nested transports",
                    self.raw
                ))
            })?;

        let nested: Vec<Dsn> = inner
            .split("||")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Dsn::from_string)
            .collect::<Result<_>>()?;

        if nested.is_empty() {
            return Err(TaskmillError::Configuration(format!(
                "The DSN \"{}\" does not define nested transports",
                self.raw
            )));
        }

        Ok(nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_scheme_root_and_options() {
        let dsn = Dsn::from_string("memory://first_in_first_out?mode=normal&flag=").unwrap();
        assert_eq!(dsn.scheme(), "memory");
        assert_eq!(dsn.root(), "first_in_first_out");
        assert_eq!(dsn.option("mode"), Some("normal"));
        assert_eq!(dsn.option("flag"), Some(""));
        assert_eq!(dsn.option("missing"), None);
    }

    #[test]
    fn test_missing_scheme_is_an_error() {
        assert!(Dsn::from_string("not a dsn").is_err());
        assert!(Dsn::from_string("://body").is_err());
    }

    #[test]
    fn test_nested_splits_on_double_pipe() {
        let dsn = Dsn::from_string("failover://(memory://a || memory://b)?mode=normal").unwrap();
        let nested = dsn.nested().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].scheme(), "memory");
        assert_eq!(nested[0].root(), "a");
        assert_eq!(nested[1].root(), "b");
        // Options stay on the outer DSN.
        assert_eq!(dsn.option("mode"), Some("normal"));
    }

    #[test]
    fn test_nested_single_entry() {
        let dsn = Dsn::from_string("fo://(memory://first_in_first_out)").unwrap();
        assert_eq!(dsn.nested().unwrap().len(), 1);
    }

    #[test]
    fn test_nested_sub_dsns_keep_their_own_options() {
        let dsn =
            Dsn::from_string("failover://(fs://first_in_first_out?path=/tmp/x || memory://a)?mode=normal")
                .unwrap();
        assert_eq!(dsn.option("mode"), Some("normal"));

        let nested = dsn.nested().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].scheme(), "fs");
        assert_eq!(nested[0].option("path"), Some("/tmp/x"));
        assert_eq!(nested[1].root(), "a");
    }

    #[test]
    fn test_composite_body_without_outer_options() {
        let dsn = Dsn::from_string("failover://(memory://a?execution_mode=nice || memory://b)").unwrap();
        assert_eq!(dsn.options().len(), 0);
        assert_eq!(dsn.nested().unwrap()[0].option("execution_mode"), Some("nice"));
    }

    #[test]
    fn test_overrides_take_precedence_over_query_options() {
        let dsn = Dsn::from_string("memory://?execution_mode=nice&keep=1").unwrap();
        let merged = dsn.with_overrides(&HashMap::from([(
            "execution_mode".to_string(),
            "deadline".to_string(),
        )]));
        assert_eq!(merged.option("execution_mode"), Some("deadline"));
        assert_eq!(merged.option("keep"), Some("1"));
    }

    #[test]
    fn test_nested_requires_parentheses() {
        let dsn = Dsn::from_string("failover://memory://a").unwrap();
        assert!(dsn.nested().is_err());

        let empty = Dsn::from_string("failover://()").unwrap();
        assert!(empty.nested().is_err());
    }
}
