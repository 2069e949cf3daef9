//! Path pattern matching.

use std::collections::HashMap;

use serde::Serialize;

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal segment.
    Literal(String),
    /// A parameter segment (e.g., {name}).
    Param(String),
    /// A wildcard segment (matches the remainder of the path).
    Wildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Matches every path, including the empty one.
    Any,
    /// Matches only the empty path.
    Index,
    Segments(Vec<PathSegment>),
}

/// A compiled route specification.
///
/// Pattern syntax:
/// - `*` - any path, including the empty one
/// - `index` or the empty string - only the empty path
/// - `start` - literal path
/// - `user/{name}` - path with a parameter
/// - `exec/{*command}` - wildcard parameter (matches the rest of the path)
///
/// Segments are separated by `/`. Malformed braces are kept as literals.
///
/// # Example
///
/// ```
/// use oxide_cli_router::PathPattern;
///
/// let pattern = PathPattern::new("remote/{name}");
/// let params = pattern.match_path("remote/origin").unwrap();
/// assert_eq!(params.get("name"), Some("origin"));
/// assert!(pattern.match_path("remote").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pattern: String,
    kind: Kind,
}

impl PathPattern {
    /// Compiles a route specification.
    pub fn new(pattern: &str) -> Self {
        let kind = match pattern {
            "*" => Kind::Any,
            "" | "index" => Kind::Index,
            _ => {
                let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
                let last = parts.len().saturating_sub(1);
                let segments = parts
                    .iter()
                    .enumerate()
                    .map(|(i, part)| parse_segment(part, i == last))
                    .collect();
                Kind::Segments(segments)
            }
        };

        Self {
            pattern: pattern.to_string(),
            kind,
        }
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns the captured parameters if the path matches.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        match &self.kind {
            Kind::Any => Some(Params::new()),
            Kind::Index => path.is_empty().then(Params::new),
            Kind::Segments(segments) => match_segments(segments, path),
        }
    }

    /// Returns `true` if the path matches.
    pub fn matches(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }

    /// Returns the original specification.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` for the `*` pattern.
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.kind, Kind::Any)
    }

    /// Returns `true` for the index pattern.
    pub const fn is_index(&self) -> bool {
        matches!(self.kind, Kind::Index)
    }

    /// Returns the parameter names in order.
    pub fn param_names(&self) -> Vec<&str> {
        match &self.kind {
            Kind::Segments(segments) => segments
                .iter()
                .filter_map(|s| match s {
                    PathSegment::Param(name) | PathSegment::Wildcard(name) => Some(name.as_str()),
                    PathSegment::Literal(_) => None,
                })
                .collect(),
            Kind::Any | Kind::Index => Vec::new(),
        }
    }
}

fn parse_segment(part: &str, is_last: bool) -> PathSegment {
    match part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(param) if !param.is_empty() => match param.strip_prefix('*') {
            Some(name) if is_last && !name.is_empty() => PathSegment::Wildcard(name.to_string()),
            Some(_) => PathSegment::Literal(part.to_string()),
            None => PathSegment::Param(param.to_string()),
        },
        _ => PathSegment::Literal(part.to_string()),
    }
}

fn match_segments(segments: &[PathSegment], path: &str) -> Option<Params> {
    // `start/` and `/start` are different tokens from `start`.
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    let mut params = Params::new();

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            PathSegment::Literal(literal) => {
                if parts.get(i) != Some(&literal.as_str()) {
                    return None;
                }
            }
            PathSegment::Param(name) => params.insert(name.clone(), *parts.get(i)?),
            PathSegment::Wildcard(name) => {
                if i >= parts.len() {
                    return None;
                }
                params.insert(name.clone(), parts[i..].join("/"));
                return Some(params);
            }
        }
    }

    (parts.len() == segments.len()).then_some(params)
}

/// Parameters captured by a path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params {
    params: HashMap<String, String>,
}

impl Params {
    /// Creates new empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns `true` if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_path() {
        let pattern = PathPattern::new("start");
        assert!(pattern.matches("start"));
        assert!(!pattern.matches("started"));
        assert!(!pattern.matches("starts"));
        assert!(!pattern.matches("star"));
        assert!(!pattern.matches(""));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let pattern = PathPattern::new("*");
        assert!(pattern.is_wildcard());
        assert!(pattern.matches(""));
        assert!(pattern.matches("anything"));
        assert!(pattern.matches("a/b/c"));
    }

    #[test]
    fn test_index_matches_only_empty() {
        for spec in ["", "index"] {
            let pattern = PathPattern::new(spec);
            assert!(pattern.is_index());
            assert!(pattern.matches(""));
            assert!(!pattern.matches("index"));
            assert!(!pattern.matches("start"));
        }
    }

    #[test]
    fn test_single_param() {
        let pattern = PathPattern::new("{command}");
        let params = pattern.match_path("deploy").unwrap();
        assert_eq!(params.get("command"), Some("deploy"));
        assert!(pattern.match_path("").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let pattern = PathPattern::new("user/{id}/role/{role}");
        let params = pattern.match_path("user/42/role/admin").unwrap();
        assert_eq!(params.parse::<u32>("id"), Some(42));
        assert_eq!(params.get("role"), Some("admin"));
        assert_eq!(pattern.param_names(), vec!["id", "role"]);
    }

    #[test]
    fn test_wildcard_param() {
        let pattern = PathPattern::new("exec/{*command}");
        let params = pattern.match_path("exec/git/status").unwrap();
        assert_eq!(params.get("command"), Some("git/status"));
        assert!(pattern.match_path("exec").is_none());
    }

    #[test]
    fn test_malformed_braces_are_literal() {
        let pattern = PathPattern::new("{}");
        assert!(pattern.matches("{}"));
        assert!(!pattern.matches("x"));

        let pattern = PathPattern::new("{*rest}/tail");
        assert!(pattern.matches("{*rest}/tail"));
    }

    #[test]
    fn test_extra_segments_do_not_match() {
        let pattern = PathPattern::new("remote");
        assert!(!pattern.matches("remote/add"));
    }

    #[test]
    fn test_empty_segments_do_not_match() {
        let pattern = PathPattern::new("start");
        assert!(!pattern.matches("start/"));
        assert!(!pattern.matches("/start"));

        let pattern = PathPattern::new("remote/{name}");
        assert!(!pattern.matches("remote//origin"));
        assert!(!pattern.matches("remote/"));

        let pattern = PathPattern::new("exec/{*command}");
        assert!(!pattern.matches("exec/git//status"));
    }
}
