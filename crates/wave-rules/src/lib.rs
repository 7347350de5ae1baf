//! Rule validation engine for Elliott Wave annotations.
//!
//! Validation is a pure function from a [`WavePath`] to an ordered list of
//! [`RuleResult`]s. Each rule declares the wave kind it applies to and the
//! number of points it needs; rules without enough points are skipped rather
//! than reported, so partial waves simply produce shorter reports.
//!
//! Results always come back in [`RuleId`] order, so a UI listing stays stable
//! across re-validation.

use std::fmt;

use serde::Serialize;
use wave_core::{WaveKind, WavePath};

mod context;
mod correction;
mod impulse;

pub use context::{Trend, WaveContext};
pub use correction::CorrectionDirection;
pub use impulse::{Alternation, LabelSequence, WaveFourOverlap, WaveThreeNotShortest, WaveTwoRetrace};

/// Identifier of a validation rule. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RuleId {
    R1,
    R2,
    R3,
    R4,
    #[serde(rename = "ALT")]
    Alternation,
    R5,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::R1 => "R1",
            RuleId::R2 => "R2",
            RuleId::R3 => "R3",
            RuleId::R4 => "R4",
            RuleId::Alternation => "ALT",
            RuleId::R5 => "R5",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a rule outcome is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Outcome of a single rule on a single wave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub id: RuleId,
    pub ok: bool,
    pub severity: Severity,
    pub message: String,
}

impl RuleResult {
    /// A passing result (always informational).
    pub fn pass(id: RuleId, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: true,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// A failing result with the given severity.
    pub fn fail(id: RuleId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            severity,
            message: message.into(),
        }
    }

    /// Pass or fail depending on `ok`.
    pub fn check(id: RuleId, ok: bool, severity: Severity, message: impl Into<String>) -> Self {
        if ok {
            Self::pass(id, message)
        } else {
            Self::fail(id, severity, message)
        }
    }
}

impl fmt::Display for RuleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match (self.ok, self.severity) {
            (true, _) => "✔",
            (false, Severity::Error) => "✖",
            (false, _) => "⚠",
        };
        write!(f, "{} {} — {}", mark, self.id, self.message)
    }
}

/// Trait for structural rules evaluated on a wave.
pub trait Rule: Send + Sync {
    /// Identifier reported in results.
    fn id(&self) -> RuleId;

    /// Whether the rule is defined for this kind of wave.
    fn applies_to(&self, kind: WaveKind) -> bool;

    /// Minimum number of points the rule needs.
    fn min_points(&self) -> usize;

    /// Evaluate the rule.
    ///
    /// Returns `None` when the rule has nothing to say about this wave.
    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult>;
}

/// A boxed rule for dynamic dispatch.
pub type BoxedRule = Box<dyn Rule>;

/// Numeric thresholds used by the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConfig {
    /// Tolerance for price comparisons.
    pub epsilon: f64,
    /// Minimum relative amplitude difference between waves 2 and 4.
    pub alternation_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            alternation_threshold: 0.10,
        }
    }
}

/// Runs the full rule set against waves.
pub struct Validator {
    config: ValidatorConfig,
    rules: Vec<BoxedRule>,
}

impl Validator {
    /// Create a validator with the standard impulse and correction rules.
    pub fn new(config: ValidatorConfig) -> Self {
        let mut rules: Vec<BoxedRule> = vec![
            Box::new(WaveTwoRetrace),
            Box::new(WaveThreeNotShortest),
            Box::new(WaveFourOverlap),
            Box::new(LabelSequence),
            Box::new(Alternation),
            Box::new(CorrectionDirection),
        ];
        rules.sort_by_key(|r| r.id());
        Self { config, rules }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a wave, returning results in rule-id order.
    pub fn validate(&self, wave: &WavePath) -> Vec<RuleResult> {
        let ctx = WaveContext::new(wave, &self.config);
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(wave.kind) && ctx.has_points(rule.min_points()))
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

/// Validate a wave with the default thresholds.
pub fn validate(wave: &WavePath) -> Vec<RuleResult> {
    Validator::default().validate(wave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_core::Point;

    fn impulse(prices: &[f64]) -> WavePath {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Point::new(i as f64 * 60.0, p))
            .collect();
        WavePath::from_points(WaveKind::Impulse, "#22c55e", points)
    }

    fn ids(results: &[RuleResult]) -> Vec<RuleId> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_wave_has_no_results() {
        assert!(validate(&WavePath::new(WaveKind::Impulse, "#fff")).is_empty());
        assert!(validate(&WavePath::new(WaveKind::Correction, "#fff")).is_empty());
    }

    #[test]
    fn test_partial_impulse_reports_only_applicable_rules() {
        assert_eq!(ids(&validate(&impulse(&[100.0, 110.0]))), vec![RuleId::R4]);
        assert_eq!(ids(&validate(&impulse(&[100.0, 110.0, 105.0]))), vec![RuleId::R1, RuleId::R4]);
        assert_eq!(
            ids(&validate(&impulse(&[100.0, 110.0, 105.0, 125.0, 115.0]))),
            vec![RuleId::R1, RuleId::R3, RuleId::R4, RuleId::Alternation]
        );
    }

    #[test]
    fn test_full_order_is_stable() {
        let results = validate(&impulse(&[100.0, 110.0, 105.0, 125.0, 115.0, 130.0]));
        assert_eq!(
            ids(&results),
            vec![RuleId::R1, RuleId::R2, RuleId::R3, RuleId::R4, RuleId::Alternation]
        );
        assert!(results.iter().all(|r| r.ok));
        assert!(results.iter().all(|r| r.severity == Severity::Info));
    }

    #[test]
    fn test_correction_gets_only_correction_rules() {
        let wave = WavePath::from_points(
            WaveKind::Correction,
            "#60a5fa",
            vec![Point::new(0.0, 100.0), Point::new(60.0, 90.0), Point::new(120.0, 95.0)],
        );
        assert_eq!(ids(&validate(&wave)), vec![RuleId::R5]);
    }

    #[test]
    fn test_display() {
        let ok = RuleResult::pass(RuleId::R1, "fine");
        let err = RuleResult::fail(RuleId::R2, Severity::Error, "bad");
        let warn = RuleResult::fail(RuleId::R3, Severity::Warn, "hmm");
        assert_eq!(ok.to_string(), "✔ R1 — fine");
        assert_eq!(err.to_string(), "✖ R2 — bad");
        assert_eq!(warn.to_string(), "⚠ R3 — hmm");
    }

    #[test]
    fn test_result_json() {
        let json = serde_json::to_value(RuleResult::fail(RuleId::Alternation, Severity::Info, "x")).unwrap();
        assert_eq!(json["id"], "ALT");
        assert_eq!(json["severity"], "info");
        assert_eq!(json["ok"], false);
    }
}
