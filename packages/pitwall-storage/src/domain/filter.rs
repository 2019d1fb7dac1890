//! Query Filter
//!
//! Minimal predicate language every adapter must understand:
//! equality, set membership (the batched reference fetch), a
//! case-insensitive pattern match (search by name) and conjunction.
//!
//! Field names may be dotted paths into nested objects (`location.country`).
//! When the addressed value is an array, a predicate holds if it holds for
//! any element.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Document predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document
    All,
    /// `field == value`
    Eq { field: String, value: Value },
    /// `field ∈ values`
    In { field: String, values: Vec<Value> },
    /// Case-insensitive regex on a string field
    Matches { field: String, pattern: String },
    /// Every inner filter holds
    And(Vec<Filter>),
}

impl Filter {
    pub fn all() -> Self {
        Filter::All
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Matches {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Conjunction, flattening nested `And`s and dropping `All`
    pub fn and(self, other: Filter) -> Self {
        let mut parts = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::All => {}
                Filter::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    /// True when the filter needs in-process evaluation (regex)
    pub fn has_pattern(&self) -> bool {
        match self {
            Filter::Matches { .. } => true,
            Filter::And(inner) => inner.iter().any(Filter::has_pattern),
            _ => false,
        }
    }

    /// Compile into a reusable matcher
    pub fn matcher(&self) -> FilterMatcher {
        FilterMatcher {
            node: Node::compile(self),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}

/// Compiled form of a [`Filter`]
#[derive(Debug, Clone)]
pub struct FilterMatcher {
    node: Node,
}

impl FilterMatcher {
    pub fn is_match(&self, document: &Value) -> bool {
        self.node.is_match(document)
    }
}

#[derive(Debug, Clone)]
enum Node {
    All,
    Eq(Vec<String>, Value),
    In(Vec<String>, Vec<Value>),
    Matches(Vec<String>, Option<Regex>),
    And(Vec<Node>),
}

impl Node {
    fn compile(filter: &Filter) -> Self {
        match filter {
            Filter::All => Node::All,
            Filter::Eq { field, value } => Node::Eq(split_path(field), value.clone()),
            Filter::In { field, values } => Node::In(split_path(field), values.clone()),
            Filter::Matches { field, pattern } => {
                Node::Matches(split_path(field), compile_pattern(pattern))
            }
            Filter::And(inner) => Node::And(inner.iter().map(Node::compile).collect()),
        }
    }

    fn is_match(&self, document: &Value) -> bool {
        match self {
            Node::All => true,
            Node::Eq(path, expected) => {
                any_value(lookup(document, path), |v| v == expected)
            }
            Node::In(path, set) => any_value(lookup(document, path), |v| set.contains(v)),
            Node::Matches(path, regex) => match regex {
                Some(regex) => any_value(lookup(document, path), |v| {
                    v.as_str().is_some_and(|s| regex.is_match(s))
                }),
                None => false,
            },
            Node::And(inner) => inner.iter().all(|node| node.is_match(document)),
        }
    }
}

/// Case-insensitive regex; a pattern that does not compile is matched literally
fn compile_pattern(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
        })
        .ok()
}

fn split_path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_owned).collect()
}

fn lookup<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, segment| current.get(segment.as_str()))
}

fn any_value(value: Option<&Value>, pred: impl Fn(&Value) -> bool) -> bool {
    match value {
        Some(Value::Array(items)) => items.iter().any(&pred),
        Some(value) => pred(value),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn circuit() -> Value {
        json!({
            "circuit_id": "monza",
            "name": "Autodromo Nazionale Monza",
            "location": {"country": "Italy", "city": "Monza"},
            "tags": ["fast", "historic"]
        })
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(Filter::all().matcher().is_match(&circuit()));
        assert!(Filter::default().matcher().is_match(&json!({})));
    }

    #[test]
    fn test_eq() {
        assert!(Filter::eq("circuit_id", "monza").matcher().is_match(&circuit()));
        assert!(!Filter::eq("circuit_id", "spa").matcher().is_match(&circuit()));
        assert!(!Filter::eq("missing", "monza").matcher().is_match(&circuit()));
    }

    #[test]
    fn test_dotted_path() {
        let filter = Filter::eq("location.country", "Italy");
        assert!(filter.matcher().is_match(&circuit()));
    }

    #[test]
    fn test_in_set() {
        let filter = Filter::any_of("circuit_id", ["spa", "monza"]);
        assert!(filter.matcher().is_match(&circuit()));

        let empty = Filter::any_of("circuit_id", Vec::<String>::new());
        assert!(!empty.matcher().is_match(&circuit()));
    }

    #[test]
    fn test_array_field_matches_any_element() {
        assert!(Filter::eq("tags", "historic").matcher().is_match(&circuit()));
        assert!(Filter::matches("tags", "^FA").matcher().is_match(&circuit()));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(Filter::matches("name", "nazionale").matcher().is_match(&circuit()));
        assert!(Filter::matches("circuit_id", "^MON").matcher().is_match(&circuit()));
        assert!(!Filter::matches("circuit_id", "^spa").matcher().is_match(&circuit()));
    }

    #[test]
    fn test_invalid_pattern_is_matched_literally() {
        let doc = json!({"name": "Monza (Italy)"});
        assert!(Filter::matches("name", "(italy").matcher().is_match(&doc));
        assert!(!Filter::matches("name", "(spain").matcher().is_match(&doc));
    }

    #[test]
    fn test_matches_ignores_non_strings() {
        let doc = json!({"turns": 11});
        assert!(!Filter::matches("turns", "11").matcher().is_match(&doc));
    }

    #[test]
    fn test_and_flattens() {
        let filter = Filter::all()
            .and(Filter::eq("circuit_id", "monza"))
            .and(Filter::matches("name", "monza"));

        match &filter {
            Filter::And(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected And, got {:?}", other),
        }
        assert!(filter.has_pattern());
        assert!(filter.matcher().is_match(&circuit()));

        assert_eq!(Filter::all().and(Filter::all()), Filter::All);
        assert_eq!(
            Filter::all().and(Filter::eq("a", 1)),
            Filter::eq("a", 1)
        );
    }
}
