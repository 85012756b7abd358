//! Placement expressions shared by the constraint and affinity filters.
//!
//! Grammar: `<key><op><value>` with `op` one of `==` or `!=`. A `~`
//! directly after the operator marks the expression soft
//! (`zone==~east`). Values are case-insensitive globs (`*`, `?`) anchored
//! at both ends, or regular expressions when wrapped in slashes
//! (`/^rack-[0-9]+$/`).

use std::fmt;

use berth_core::Node;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{SchedulingError, SchedulingResult};

const SOFT_MARKER: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::NotEq => "!=",
        }
    }
}

/// Checked in this order; the first operator present splits the expression.
const OPERATORS: [Operator; 2] = [Operator::Eq, Operator::NotEq];

/// A parsed key/operator/value predicate.
#[derive(Debug, Clone)]
pub struct Expr {
    key: String,
    operator: Operator,
    value: String,
    soft: bool,
    pattern: Regex,
}

impl Expr {
    pub fn parse(raw: &str) -> SchedulingResult<Self> {
        let syntax = |reason: &str| SchedulingError::ConstraintSyntax {
            expr: raw.to_string(),
            reason: reason.to_string(),
        };

        let Some((operator, (key, value))) = OPERATORS
            .iter()
            .find_map(|op| raw.split_once(op.as_str()).map(|parts| (*op, parts)))
        else {
            return Err(syntax("expected == or != operator"));
        };

        let key = key.trim();
        if !is_valid_key(key) {
            return Err(syntax("invalid key"));
        }

        let mut value = value.trim();
        let soft = value.starts_with(SOFT_MARKER);
        if soft {
            value = &value[SOFT_MARKER.len_utf8()..];
        }
        if !is_valid_value(value) {
            return Err(syntax("invalid value"));
        }

        let pattern = compile_pattern(value)
            .map_err(|e| syntax(&format!("invalid regular expression: {e}")))?;

        Ok(Self {
            key: key.to_string(),
            operator,
            value: value.to_string(),
            soft,
            pattern,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    /// `==` holds when any candidate matches the value, `!=` when none does.
    pub fn matches<'s>(&self, candidates: impl IntoIterator<Item = &'s str>) -> bool {
        let matched = candidates
            .into_iter()
            .any(|candidate| self.pattern.is_match(candidate));
        match self.operator {
            Operator::Eq => matched,
            Operator::NotEq => !matched,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.operator.as_str(), self.value)
    }
}

pub fn parse_exprs(raw: &[String]) -> SchedulingResult<Vec<Expr>> {
    raw.iter().map(|e| Expr::parse(e)).collect()
}

/// Narrow `nodes` by each expression in turn, failing on the first one
/// that leaves nothing. Soft expressions are skipped unless `enforce_soft`.
pub(crate) fn narrow<'a>(
    exprs: &[Expr],
    mut nodes: Vec<&'a Node>,
    enforce_soft: bool,
    workload: &str,
    matches: impl Fn(&Expr, &Node) -> bool,
    unsatisfied: impl Fn(&Expr) -> SchedulingError,
) -> SchedulingResult<Vec<&'a Node>> {
    for expr in exprs {
        debug!(
            workload,
            expr = %expr,
            soft = expr.is_soft(),
            enforce_soft,
            "matching expression"
        );
        if expr.is_soft() && !enforce_soft {
            continue;
        }

        let candidates: Vec<&Node> = nodes
            .into_iter()
            .filter(|node| {
                let ok = matches(expr, *node);
                debug!(workload, node = %node.id, matched = ok, "evaluated node");
                ok
            })
            .collect();

        if candidates.is_empty() {
            return Err(unsatisfied(expr));
        }
        nodes = candidates;
    }
    Ok(nodes)
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && key.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_valid_value(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    ':' | '-' | '_' | '.' | '*' | '(' | ')' | '?' | '+' | '[' | ']' | '\\' | '^'
                        | '$' | '|' | '/'
                )
        })
}

fn compile_pattern(value: &str) -> Result<Regex, regex::Error> {
    let source = match value.strip_prefix('/').and_then(|v| v.strip_suffix('/')) {
        Some(re) => re.to_string(),
        None => glob_to_regex(value),
    };
    RegexBuilder::new(&source).case_insensitive(true).build()
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 2);
    out.push('^');
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}
