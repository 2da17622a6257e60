//! Market rule validator.
//!
//! Every rule runs on every call and findings accumulate; nothing
//! short-circuits. A CRITICAL finding makes the proposal invalid, and on the
//! Lab layer it also blocks creation. Other layers get the same report
//! without the block. Rejections are returned values, not errors.

pub mod bet;
pub mod content;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{RuleConfig, RuleSetVersion},
    types::MarketLayer,
};

pub use bet::{validate_bet, validate_race_bet, BetValidation};

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
}

/// Identifier of each validation rule, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Classification,
    EventBuffer,
    MeasurementOrdering,
    VerifiableSource,
    ClearCriteria,
    ObjectiveVerifiability,
    ManipulationRisk,
    ClosingInPast,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::Classification => "classification",
            RuleId::EventBuffer => "event_buffer",
            RuleId::MeasurementOrdering => "measurement_ordering",
            RuleId::VerifiableSource => "verifiable_source",
            RuleId::ClearCriteria => "clear_criteria",
            RuleId::ObjectiveVerifiability => "objective_verifiability",
            RuleId::ManipulationRisk => "manipulation_risk",
            RuleId::ClosingInPast => "closing_in_past",
        }
    }
}

/// How a market resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Type A: a discrete event at a known time.
    Event,
    /// Type B: a value observed over or at a measurement period.
    Measurement,
}

impl MarketKind {
    pub fn rule_type(self) -> &'static str {
        match self {
            MarketKind::Event => "A",
            MarketKind::Measurement => "B",
        }
    }
}

/// A candidate market. Times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketProposal {
    pub question: String,
    pub layer: MarketLayer,
    pub closing_time: i64,
    pub event_time: Option<i64>,
    pub measurement_start: Option<i64>,
    /// Declared kind; inferred from which time is present when absent.
    pub kind: Option<MarketKind>,
    /// Current time, enables the closing-in-the-past check.
    pub now: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValidation {
    pub rule_set: RuleSetVersion,
    /// "A" for event markets, "B" for measurement markets.
    pub rule_type: Option<&'static str>,
    pub valid: bool,
    pub blocked: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub rule_violations: Vec<RuleViolation>,
    pub rules_checked: Vec<RuleId>,
}

#[derive(Default)]
struct Findings {
    violations: Vec<RuleViolation>,
    suggestions: Vec<String>,
    rules_checked: Vec<RuleId>,
}

impl Findings {
    fn check(&mut self, rule: RuleId) {
        self.rules_checked.push(rule);
    }

    fn report(&mut self, rule: RuleId, severity: Severity, message: String) {
        self.violations.push(RuleViolation {
            rule,
            severity,
            message,
            matched: Vec::new(),
        });
    }

    fn suggest(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }
}

fn hours(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}

fn classify(proposal: &MarketProposal, findings: &mut Findings) -> Option<MarketKind> {
    findings.check(RuleId::Classification);
    let kind = match proposal.kind {
        Some(kind) => kind,
        None if proposal.event_time.is_some() => MarketKind::Event,
        None if proposal.measurement_start.is_some() => MarketKind::Measurement,
        None => {
            findings.report(
                RuleId::Classification,
                Severity::Critical,
                "Market must declare an event time (type A) or a measurement start (type B)"
                    .to_string(),
            );
            findings.suggest(
                "Add the time the deciding event happens, or when the measured period starts",
            );
            return None;
        }
    };
    let missing = match kind {
        MarketKind::Event => proposal.event_time.is_none(),
        MarketKind::Measurement => proposal.measurement_start.is_none(),
    };
    if missing {
        let field = match kind {
            MarketKind::Event => "event time",
            MarketKind::Measurement => "measurement start",
        };
        findings.report(
            RuleId::Classification,
            Severity::Critical,
            format!("Type {} market is missing its {field}", kind.rule_type()),
        );
        return None;
    }
    Some(kind)
}

fn check_event_buffer(
    proposal: &MarketProposal,
    kind: Option<MarketKind>,
    config: &RuleConfig,
    findings: &mut Findings,
) {
    findings.check(RuleId::EventBuffer);
    let (Some(MarketKind::Event), Some(event_time)) = (kind, proposal.event_time) else {
        return;
    };
    let Some(gap) = event_time.checked_sub(proposal.closing_time) else {
        findings.report(
            RuleId::EventBuffer,
            Severity::Critical,
            format!(
                "Closing time {} and event time {event_time} are out of range",
                proposal.closing_time
            ),
        );
        return;
    };
    let buffer = hours(gap);
    let latest_close = event_time
        .saturating_sub((config.recommended_event_buffer_hours * SECONDS_PER_HOUR) as i64);
    if buffer < config.min_event_buffer_hours {
        findings.report(
            RuleId::EventBuffer,
            Severity::Critical,
            format!(
                "Betting closes {buffer:.2}h before the event; at least {:.0}h is required",
                config.min_event_buffer_hours
            ),
        );
        findings.suggest(format!("Close betting at or before {latest_close} (unix seconds)"));
    } else if buffer < config.recommended_event_buffer_hours {
        findings.report(
            RuleId::EventBuffer,
            Severity::Warning,
            format!(
                "Betting closes {buffer:.2}h before the event; {:.0}h is recommended",
                config.recommended_event_buffer_hours
            ),
        );
        findings.suggest(format!("Close betting at or before {latest_close} (unix seconds)"));
    }
}

fn check_measurement_ordering(
    proposal: &MarketProposal,
    kind: Option<MarketKind>,
    findings: &mut Findings,
) {
    findings.check(RuleId::MeasurementOrdering);
    let (Some(MarketKind::Measurement), Some(start)) = (kind, proposal.measurement_start) else {
        return;
    };
    if proposal.closing_time >= start {
        findings.report(
            RuleId::MeasurementOrdering,
            Severity::Critical,
            format!(
                "Betting closes AFTER the measurement period starts ({}s late); it must close strictly before",
                proposal.closing_time.saturating_sub(start)
            ),
        );
        findings.suggest(format!("Close betting before {start} (unix seconds)"));
    }
}

fn check_source(question: &str, config: &RuleConfig, findings: &mut Findings) {
    findings.check(RuleId::VerifiableSource);
    let lowercase = question.to_lowercase();

    let annotated = content::SOURCE_ANNOTATION
        .captures(question)
        .map(|caps| caps[1].trim().to_string())
        .filter(|named| !named.is_empty());
    if let Some(named) = annotated {
        if config.version.requires_approved_source()
            && config.approved_source_in(&named.to_lowercase()).is_none()
        {
            findings.report(
                RuleId::VerifiableSource,
                Severity::Warning,
                format!("Source \"{named}\" is not on the approved source list"),
            );
        }
        return;
    }
    if config.approved_source_in(&lowercase).is_some()
        || content::implied_source(question).is_some()
    {
        return;
    }

    let severity = if config.version.requires_approved_source() {
        Severity::Critical
    } else {
        Severity::Warning
    };
    findings.report(
        RuleId::VerifiableSource,
        severity,
        "Question names no verifiable data source".to_string(),
    );
    findings.suggest("Name the resolution source, e.g. \"(Source: CoinGecko)\"");
}

fn check_criteria(question: &str, findings: &mut Findings) {
    findings.check(RuleId::ClearCriteria);
    if !content::has_clear_criteria(question) {
        findings.report(
            RuleId::ClearCriteria,
            Severity::Warning,
            "Question has no numeric threshold or clear yes/no outcome".to_string(),
        );
        findings.suggest("Phrase the question as a yes/no with a measurable threshold");
    }
}

fn check_denylist(question: &str, rule: RuleId, version: RuleSetVersion, findings: &mut Findings) {
    findings.check(rule);
    for (entry, matched) in content::matched_phrases(question, rule, version) {
        findings.violations.push(RuleViolation {
            rule,
            severity: entry.severity,
            message: format!("{}: {}", entry.message, matched.join(", ")),
            matched,
        });
    }
}

fn check_closing_in_past(proposal: &MarketProposal, findings: &mut Findings) {
    let Some(now) = proposal.now else {
        return;
    };
    findings.check(RuleId::ClosingInPast);
    if proposal.closing_time <= now {
        findings.report(
            RuleId::ClosingInPast,
            Severity::Critical,
            format!(
                "Closing time {} is not in the future (now {now})",
                proposal.closing_time
            ),
        );
    }
}

/// Validate a candidate market against a rule set.
pub fn validate_market(proposal: &MarketProposal, config: &RuleConfig) -> MarketValidation {
    let mut findings = Findings::default();

    let kind = classify(proposal, &mut findings);
    check_event_buffer(proposal, kind, config, &mut findings);
    check_measurement_ordering(proposal, kind, &mut findings);
    check_source(&proposal.question, config, &mut findings);
    check_criteria(&proposal.question, &mut findings);
    check_denylist(
        &proposal.question,
        RuleId::ObjectiveVerifiability,
        config.version,
        &mut findings,
    );
    check_denylist(
        &proposal.question,
        RuleId::ManipulationRisk,
        config.version,
        &mut findings,
    );
    check_closing_in_past(proposal, &mut findings);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for violation in &findings.violations {
        match violation.severity {
            Severity::Critical => errors.push(violation.message.clone()),
            Severity::Warning => warnings.push(violation.message.clone()),
        }
    }
    let valid = errors.is_empty();
    let blocked = proposal.layer == MarketLayer::Lab && !valid;

    if blocked {
        warn!(
            layer = ?proposal.layer,
            errors = errors.len(),
            "market proposal blocked"
        );
    } else {
        debug!(
            layer = ?proposal.layer,
            valid,
            warnings = warnings.len(),
            "market proposal checked"
        );
    }

    MarketValidation {
        rule_set: config.version,
        rule_type: kind.map(MarketKind::rule_type),
        valid,
        blocked,
        errors,
        warnings,
        suggestions: findings.suggestions,
        rule_violations: findings.violations,
        rules_checked: findings.rules_checked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_timestamp;

    const HOUR: i64 = 3600;

    fn event_market(layer: MarketLayer, buffer_seconds: i64) -> MarketProposal {
        let event_time = 1_769_904_000;
        MarketProposal {
            question: "Will the Lakers beat the Celtics on Feb 1? (Source: ESPN)".to_string(),
            layer,
            closing_time: event_time - buffer_seconds,
            event_time: Some(event_time),
            measurement_start: None,
            kind: None,
            now: None,
        }
    }

    fn btc_market(closing: &str) -> MarketProposal {
        MarketProposal {
            question: "Will BTC be above $100,000 at 00:00 UTC Feb 1, 2026? (Source: CoinGecko)"
                .to_string(),
            layer: MarketLayer::Lab,
            closing_time: parse_timestamp(closing).unwrap(),
            event_time: None,
            measurement_start: Some(parse_timestamp("2026-02-01T00:00:00Z").unwrap()),
            kind: Some(MarketKind::Measurement),
            now: None,
        }
    }

    fn critical(result: &MarketValidation, rule: RuleId) -> bool {
        result
            .rule_violations
            .iter()
            .any(|v| v.rule == rule && v.severity == Severity::Critical)
    }

    #[test]
    fn test_event_buffer_boundary() {
        let config = RuleConfig::default();

        let exact = validate_market(&event_market(MarketLayer::Lab, 12 * HOUR), &config);
        assert!(!exact.blocked);
        assert!(exact.valid);
        assert_eq!(exact.rule_type, Some("A"));
        assert!(exact
            .rule_violations
            .iter()
            .any(|v| v.rule == RuleId::EventBuffer && v.severity == Severity::Warning));

        let short = validate_market(&event_market(MarketLayer::Lab, 12 * HOUR - 4), &config);
        assert!(short.blocked);
        assert!(critical(&short, RuleId::EventBuffer));

        let roomy = validate_market(&event_market(MarketLayer::Lab, 18 * HOUR), &config);
        assert!(roomy.rule_violations.is_empty());
        assert!(roomy.errors.is_empty() && roomy.warnings.is_empty());
    }

    #[test]
    fn test_measurement_scenario_is_valid() {
        let result = validate_market(&btc_market("2026-01-31T22:00:00Z"), &RuleConfig::default());
        assert!(result.valid);
        assert!(!result.blocked);
        assert_eq!(result.rule_type, Some("B"));
        assert!(result.errors.is_empty());
        assert_eq!(result.rule_set, RuleSetVersion::V2);
    }

    #[test]
    fn test_closing_after_measurement_start_is_blocked() {
        let result = validate_market(&btc_market("2026-02-01T01:00:00Z"), &RuleConfig::default());
        assert!(result.blocked);
        assert!(result.errors.iter().any(|e| e.contains("AFTER")));
    }

    #[test]
    fn test_closing_at_measurement_start_is_blocked() {
        let result = validate_market(&btc_market("2026-02-01T00:00:00Z"), &RuleConfig::default());
        assert!(result.blocked);
        assert!(critical(&result, RuleId::MeasurementOrdering));
    }

    #[test]
    fn test_agent_question_blocked_only_on_lab() {
        let mut proposal = event_market(MarketLayer::Lab, 24 * HOUR);
        proposal.question = "Will an AI agent autonomously trade?".to_string();

        let lab = validate_market(&proposal, &RuleConfig::default());
        assert!(lab.blocked);
        let violation = lab
            .rule_violations
            .iter()
            .find(|v| v.rule == RuleId::ObjectiveVerifiability)
            .unwrap();
        assert!(violation.matched.contains(&"ai agent".to_string()));
        assert!(violation.matched.contains(&"autonomously".to_string()));

        proposal.layer = MarketLayer::Official;
        let official = validate_market(&proposal, &RuleConfig::default());
        assert!(!official.blocked);
        assert!(!official.valid);
        assert!(critical(&official, RuleId::ObjectiveVerifiability));
    }

    #[test]
    fn test_missing_source_depends_on_rule_set() {
        let mut proposal = event_market(MarketLayer::Lab, 24 * HOUR);
        proposal.question = "Will the city council approve the new park?".to_string();

        let v1 = validate_market(&proposal, &RuleConfig::for_version(RuleSetVersion::V1));
        assert!(v1.valid);
        assert_eq!(v1.rule_set, RuleSetVersion::V1);
        assert!(v1
            .rule_violations
            .iter()
            .any(|v| v.rule == RuleId::VerifiableSource && v.severity == Severity::Warning));

        let v2 = validate_market(&proposal, &RuleConfig::for_version(RuleSetVersion::V2));
        assert!(v2.blocked);
        assert!(critical(&v2, RuleId::VerifiableSource));
    }

    #[test]
    fn test_unapproved_annotation_warns_under_v2() {
        let mut proposal = event_market(MarketLayer::Lab, 24 * HOUR);
        proposal.question = "Will the bridge open on time? (Source: Town Blog)".to_string();
        let result = validate_market(&proposal, &RuleConfig::default());
        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.contains("Town Blog")));
    }

    #[test]
    fn test_empty_source_annotation_counts_as_missing() {
        let mut proposal = event_market(MarketLayer::Lab, 24 * HOUR);
        proposal.question = "Will the city council approve the new park? (Source: )".to_string();

        let v2 = validate_market(&proposal, &RuleConfig::default());
        assert!(v2.blocked);
        assert!(!v2.valid);
        assert!(critical(&v2, RuleId::VerifiableSource));
        assert!(!v2.warnings.iter().any(|w| w.contains("approved source list")));

        let v1 = validate_market(&proposal, &RuleConfig::for_version(RuleSetVersion::V1));
        assert!(v1.valid);
        assert!(v1
            .rule_violations
            .iter()
            .any(|v| v.rule == RuleId::VerifiableSource && v.severity == Severity::Warning));
    }

    #[test]
    fn test_extreme_times_do_not_panic() {
        let mut event = event_market(MarketLayer::Lab, 0);
        event.closing_time = i64::MIN;
        event.event_time = Some(1);
        let result = validate_market(&event, &RuleConfig::default());
        assert!(result.blocked);
        assert!(critical(&result, RuleId::EventBuffer));

        event.closing_time = i64::MAX;
        event.event_time = Some(i64::MIN);
        event.now = Some(i64::MIN);
        let result = validate_market(&event, &RuleConfig::default());
        assert!(critical(&result, RuleId::EventBuffer));
        assert!(!critical(&result, RuleId::ClosingInPast));

        let mut measurement = btc_market("2026-01-31T22:00:00Z");
        measurement.closing_time = i64::MAX;
        measurement.measurement_start = Some(i64::MIN);
        let result = validate_market(&measurement, &RuleConfig::default());
        assert!(critical(&result, RuleId::MeasurementOrdering));
    }

    #[test]
    fn test_unclassified_market_reports_everything() {
        let proposal = MarketProposal {
            question: "Will someone pay me?".to_string(),
            layer: MarketLayer::Lab,
            closing_time: 100,
            event_time: None,
            measurement_start: None,
            kind: None,
            now: Some(200),
        };
        let result = validate_market(&proposal, &RuleConfig::default());
        assert!(result.blocked);
        assert_eq!(result.rule_type, None);
        for rule in [
            RuleId::Classification,
            RuleId::VerifiableSource,
            RuleId::ManipulationRisk,
            RuleId::ClosingInPast,
        ] {
            assert!(critical(&result, rule), "{rule:?} not reported");
        }
        assert!(!critical(&result, RuleId::ObjectiveVerifiability));
        assert_eq!(result.rules_checked.len(), 8);
    }

    #[test]
    fn test_declared_kind_without_time() {
        let mut proposal = btc_market("2026-01-31T22:00:00Z");
        proposal.kind = Some(MarketKind::Event);
        let result = validate_market(&proposal, &RuleConfig::default());
        assert!(critical(&result, RuleId::Classification));
        assert_eq!(result.rule_type, None);
    }

    #[test]
    fn test_result_serializes_for_display() {
        let result = validate_market(&btc_market("2026-02-01T01:00:00Z"), &RuleConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ruleType"], "B");
        assert_eq!(json["ruleSet"], "v2");
        assert_eq!(json["blocked"], true);
        assert_eq!(json["ruleViolations"][0]["severity"], "CRITICAL");
        assert!(json.get("violations").is_none());
    }
}
