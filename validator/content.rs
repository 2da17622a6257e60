//! Versioned content rule tables.
//!
//! Each table is an ordered list of `{id, rule, pattern, severity, message}`
//! entries. Patterns are matched case-insensitively against the question;
//! these are heuristics over wording, not semantics. A newer rule set is the
//! previous table plus its own entries, so versions stay diffable.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RuleId, Severity};
use crate::config::RuleSetVersion;

/// One denylist entry.
#[derive(Debug)]
pub struct ContentRule {
    pub id: &'static str,
    pub rule: RuleId,
    pub pattern: Regex,
    pub severity: Severity,
    pub message: &'static str,
}

type Entry = (&'static str, RuleId, &'static str, Severity, &'static str);

const V1_ENTRIES: &[Entry] = &[
    (
        "autonomous-agent",
        RuleId::ObjectiveVerifiability,
        r"\bai agents?\b|\bautonomous(?:ly)?\b|\bbots?\b",
        Severity::Critical,
        "References to autonomous agents cannot be verified by a third party",
    ),
    (
        "self-reference",
        RuleId::ObjectiveVerifiability,
        r"\bwill (?:i|we)\b|\b(?:my|our)\b",
        Severity::Critical,
        "Self-referential questions depend on the creator, not a public source",
    ),
    (
        "vague-success",
        RuleId::ObjectiveVerifiability,
        r"\bsucceed(?:s|ed)?\b|\bsuccessful(?:ly)?\b|\bdo(?:es)? well\b|\bgo(?:es)? viral\b|\bbe popular\b",
        Severity::Critical,
        "Vague success language has no objective resolution criterion",
    ),
    (
        "unnamed-actor",
        RuleId::ManipulationRisk,
        r"\b(?:someone|somebody|anyone|anybody)\b",
        Severity::Critical,
        "Outcomes that any participant can cause are open to manipulation",
    ),
    (
        "payment-mechanism",
        RuleId::ManipulationRisk,
        r"\b(?:pays?|paid|payments?|tips?|donat(?:e|es|ed|ion)|send (?:me|us))\b",
        Severity::Critical,
        "Outcomes settled by a payment can be bought by a bettor",
    ),
];

const V2_ENTRIES: &[Entry] = &[
    (
        "superlative-opinion",
        RuleId::ObjectiveVerifiability,
        r"\b(?:best|worst|greatest|most (?:popular|loved|hated))\b",
        Severity::Critical,
        "Superlatives are opinions unless tied to a published ranking",
    ),
    (
        "payment-app",
        RuleId::ManipulationRisk,
        r"\b(?:venmo|paypal|cash ?app|wallet address)\b",
        Severity::Critical,
        "Outcomes settled by a payment can be bought by a bettor",
    ),
];

fn compile(entries: &[&[Entry]]) -> Vec<ContentRule> {
    entries
        .iter()
        .flat_map(|table| table.iter())
        .map(|&(id, rule, pattern, severity, message)| ContentRule {
            id,
            rule,
            pattern: Regex::new(&format!("(?i){pattern}")).expect("content rule pattern"),
            severity,
            message,
        })
        .collect()
}

static RULES_V1: Lazy<Vec<ContentRule>> = Lazy::new(|| compile(&[V1_ENTRIES]));
static RULES_V2: Lazy<Vec<ContentRule>> = Lazy::new(|| compile(&[V1_ENTRIES, V2_ENTRIES]));

/// Content denylist for a rule-set version, in evaluation order.
pub fn rules_for(version: RuleSetVersion) -> &'static [ContentRule] {
    match version {
        RuleSetVersion::V1 => &RULES_V1,
        RuleSetVersion::V2 => &RULES_V2,
    }
}

/// Lowercased matches of every entry for `rule`, in table order, deduplicated.
pub fn matched_phrases(
    question: &str,
    rule: RuleId,
    version: RuleSetVersion,
) -> Vec<(&'static ContentRule, Vec<String>)> {
    rules_for(version)
        .iter()
        .filter(|entry| entry.rule == rule)
        .filter_map(|entry| {
            let mut found: Vec<String> = Vec::new();
            for m in entry.pattern.find_iter(question) {
                let phrase = m.as_str().to_lowercase();
                if !found.contains(&phrase) {
                    found.push(phrase);
                }
            }
            (!found.is_empty()).then_some((entry, found))
        })
        .collect()
}

/// `Source: X` annotation, capturing the name.
pub static SOURCE_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsource:\s*([^)\]\n;]+)").expect("source annotation pattern"));

/// Domain keywords that imply a standard resolution source.
static IMPLIED_SOURCES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"\b(?:btc|bitcoin|eth|ether|ethereum|sol|solana|usdc|market cap)\b",
            "coingecko",
        ),
        (
            r"\b(?:nba|nfl|mlb|nhl|super bowl|world series|playoffs?)\b",
            "espn",
        ),
        (
            r"\b(?:premier league|champions league|world cup|la liga|serie a)\b",
            "uefa",
        ),
        (
            r"\b(?:cpi|inflation|unemployment|nonfarm payrolls?)\b",
            "bls.gov",
        ),
        (r"\b(?:fomc|fed funds|interest rates?)\b", "federal reserve"),
        (
            r"\b(?:temperature|rainfall|snowfall|hurricane)\b",
            "noaa",
        ),
    ]
    .into_iter()
    .map(|(pattern, source)| {
        (
            Regex::new(&format!("(?i){pattern}")).expect("implied source pattern"),
            source,
        )
    })
    .collect()
});

/// Source implied by the question's subject matter, if any.
pub fn implied_source(question: &str) -> Option<&'static str> {
    IMPLIED_SOURCES
        .iter()
        .find(|(pattern, _)| pattern.is_match(question))
        .map(|(_, source)| *source)
}

/// Patterns that make a resolution criterion checkable: a number with a
/// comparison, or a yes/no question.
static NUMERIC_THRESHOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:above|below|over|under|exceeds?|reach(?:es)?|at least|at most|more than|less than|higher than|lower than)\b[^0-9]{0,12}\$?\d",
    )
    .expect("threshold pattern")
});

static BINARY_PHRASING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:will|does|did|is|are|was|has|have|can)\b.*\?\s*(?:\(.*\))?\s*$")
        .expect("binary phrasing pattern")
});

pub fn has_clear_criteria(question: &str) -> bool {
    NUMERIC_THRESHOLD.is_match(question) || BINARY_PHRASING.is_match(question)
}
