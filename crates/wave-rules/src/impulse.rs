//! Impulse (1-5) structural rules.
//!
//! Point 0 is the origin of wave 1 and point `k` is the end of wave `k`, so
//! the price of point `k` is written `pk` below.

use wave_core::WaveKind;

use super::{Rule, RuleId, RuleResult, Severity, Trend, WaveContext};

/// R1: wave 2 must not retrace beyond the origin of wave 1.
pub struct WaveTwoRetrace;

impl Rule for WaveTwoRetrace {
    fn id(&self) -> RuleId {
        RuleId::R1
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Impulse
    }

    fn min_points(&self) -> usize {
        3
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        let [p0, p1, p2] = ctx.prices::<3>()?;
        let ok = match ctx.trend(p0, p1) {
            Trend::Up => ctx.above(p2, p0),
            Trend::Down => ctx.below(p2, p0),
            Trend::Flat => false,
        };
        Some(RuleResult::check(
            self.id(),
            ok,
            Severity::Error,
            "Wave 2 does not retrace beyond the origin of wave 1",
        ))
    }
}

/// R2: wave 3 is never the shortest of the motive waves 1, 3 and 5.
pub struct WaveThreeNotShortest;

impl Rule for WaveThreeNotShortest {
    fn id(&self) -> RuleId {
        RuleId::R2
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Impulse
    }

    fn min_points(&self) -> usize {
        6
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        let [p0, p1, p2, p3, p4, p5] = ctx.prices::<6>()?;
        let len1 = (p1 - p0).abs();
        let len3 = (p3 - p2).abs();
        let len5 = (p5 - p4).abs();
        let ok = !ctx.below(len3, len1.min(len5));
        Some(RuleResult::check(
            self.id(),
            ok,
            Severity::Error,
            "Wave 3 is not the shortest of waves 1, 3 and 5",
        ))
    }
}

/// R3: wave 4 must not enter the price territory of wave 1.
///
/// Ending inside wave 1's range is a warning; ending past wave 1's origin is an error.
pub struct WaveFourOverlap;

impl Rule for WaveFourOverlap {
    fn id(&self) -> RuleId {
        RuleId::R3
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Impulse
    }

    fn min_points(&self) -> usize {
        5
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        let [p0, p1, _, _, p4] = ctx.prices::<5>()?;
        let floor = p0.min(p1);
        let ceiling = p0.max(p1);
        let message = "Wave 4 does not enter the price territory of wave 1";

        let result = match ctx.trend(p0, p1) {
            Trend::Up if ctx.above(p4, ceiling) => RuleResult::pass(self.id(), message),
            Trend::Up if ctx.below(p4, floor) => RuleResult::fail(self.id(), Severity::Error, message),
            Trend::Down if ctx.below(p4, floor) => RuleResult::pass(self.id(), message),
            Trend::Down if ctx.above(p4, ceiling) => RuleResult::fail(self.id(), Severity::Error, message),
            _ => RuleResult::fail(self.id(), Severity::Warn, message),
        };
        Some(result)
    }
}

/// R4: assigned labels follow the 1-5 sequence.
pub struct LabelSequence;

impl Rule for LabelSequence {
    fn id(&self) -> RuleId {
        RuleId::R4
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Impulse
    }

    fn min_points(&self) -> usize {
        1
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        if ctx.wave.labels.is_empty() {
            return None;
        }
        Some(RuleResult::check(
            self.id(),
            ctx.wave.has_valid_labels(),
            Severity::Warn,
            "Label sequence is coherent (1-5)",
        ))
    }
}

/// Guideline: waves 2 and 4 should differ in amplitude. Informational only.
pub struct Alternation;

impl Rule for Alternation {
    fn id(&self) -> RuleId {
        RuleId::Alternation
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Impulse
    }

    fn min_points(&self) -> usize {
        5
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        let [_, p1, p2, p3, p4] = ctx.prices::<5>()?;
        let amp2 = (p2 - p1).abs();
        let amp4 = (p4 - p3).abs();
        let largest = amp2.max(amp4);
        let ok = largest > ctx.epsilon && (amp2 - amp4).abs() / largest > ctx.alternation_threshold;
        Some(RuleResult::check(
            self.id(),
            ok,
            Severity::Info,
            "Waves 2 and 4 alternate in amplitude",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidatorConfig;
    use wave_core::{Point, WaveLabel, WavePath};

    fn impulse(prices: &[f64]) -> WavePath {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Point::new(i as f64 * 60.0, p))
            .collect();
        WavePath::from_points(WaveKind::Impulse, "#22c55e", points)
    }

    fn eval(rule: &dyn Rule, wave: &WavePath) -> Option<RuleResult> {
        let config = ValidatorConfig::default();
        rule.evaluate(&WaveContext::new(wave, &config))
    }

    #[test]
    fn test_r1_bullish_retrace_below_origin() {
        let result = eval(&WaveTwoRetrace, &impulse(&[100.0, 110.0, 95.0])).unwrap();
        assert_eq!(result.id, RuleId::R1);
        assert!(!result.ok);
        assert_eq!(result.severity, Severity::Error);
    }

    #[test]
    fn test_r1_full_retrace_is_invalid() {
        let result = eval(&WaveTwoRetrace, &impulse(&[100.0, 110.0, 100.0])).unwrap();
        assert!(!result.ok);
    }

    #[test]
    fn test_r1_valid_both_directions() {
        assert!(eval(&WaveTwoRetrace, &impulse(&[100.0, 110.0, 104.0])).unwrap().ok);
        assert!(eval(&WaveTwoRetrace, &impulse(&[100.0, 90.0, 96.0])).unwrap().ok);
        assert!(!eval(&WaveTwoRetrace, &impulse(&[100.0, 90.0, 101.0])).unwrap().ok);
    }

    #[test]
    fn test_r1_flat_wave_one() {
        let result = eval(&WaveTwoRetrace, &impulse(&[100.0, 100.0, 101.0])).unwrap();
        assert!(!result.ok);
    }

    #[test]
    fn test_r2_wave_three_shortest() {
        let result = eval(&WaveThreeNotShortest, &impulse(&[100.0, 120.0, 110.0, 115.0, 112.0, 132.0])).unwrap();
        assert!(!result.ok);
        assert_eq!(result.severity, Severity::Error);
    }

    #[test]
    fn test_r2_wave_three_not_shortest() {
        // len1 = 10, len3 = 12, len5 = 20
        assert!(eval(&WaveThreeNotShortest, &impulse(&[100.0, 110.0, 105.0, 117.0, 112.0, 132.0])).unwrap().ok);
        // Equal to the shortest is allowed
        assert!(eval(&WaveThreeNotShortest, &impulse(&[100.0, 110.0, 105.0, 115.0, 112.0, 132.0])).unwrap().ok);
    }

    #[test]
    fn test_r2_needs_six_points() {
        assert!(eval(&WaveThreeNotShortest, &impulse(&[100.0, 110.0, 105.0, 125.0, 115.0])).is_none());
    }

    #[test]
    fn test_r3_bullish() {
        let clear = eval(&WaveFourOverlap, &impulse(&[100.0, 110.0, 105.0, 125.0, 112.0])).unwrap();
        assert!(clear.ok);

        let overlap = eval(&WaveFourOverlap, &impulse(&[100.0, 110.0, 105.0, 125.0, 108.0])).unwrap();
        assert!(!overlap.ok);
        assert_eq!(overlap.severity, Severity::Warn);

        let through = eval(&WaveFourOverlap, &impulse(&[100.0, 110.0, 105.0, 125.0, 95.0])).unwrap();
        assert!(!through.ok);
        assert_eq!(through.severity, Severity::Error);
    }

    #[test]
    fn test_r3_bearish_mirrored() {
        assert!(eval(&WaveFourOverlap, &impulse(&[100.0, 90.0, 95.0, 75.0, 85.0])).unwrap().ok);

        let overlap = eval(&WaveFourOverlap, &impulse(&[100.0, 90.0, 95.0, 75.0, 92.0])).unwrap();
        assert_eq!(overlap.severity, Severity::Warn);

        let through = eval(&WaveFourOverlap, &impulse(&[100.0, 90.0, 95.0, 75.0, 103.0])).unwrap();
        assert_eq!(through.severity, Severity::Error);
    }

    #[test]
    fn test_r3_touching_ceiling_counts_as_overlap() {
        let result = eval(&WaveFourOverlap, &impulse(&[100.0, 110.0, 105.0, 125.0, 110.0])).unwrap();
        assert!(!result.ok);
    }

    #[test]
    fn test_r4_labels() {
        let wave = impulse(&[100.0, 110.0]);
        assert!(eval(&LabelSequence, &wave).unwrap().ok);

        let mut broken = wave.clone();
        broken.labels = vec![WaveLabel::One, WaveLabel::Three];
        let result = eval(&LabelSequence, &broken).unwrap();
        assert!(!result.ok);
        assert_eq!(result.severity, Severity::Warn);

        let mut unlabeled = wave;
        unlabeled.labels.clear();
        assert!(eval(&LabelSequence, &unlabeled).is_none());
    }

    #[test]
    fn test_alternation() {
        // amp2 = 5, amp4 = 10
        assert!(eval(&Alternation, &impulse(&[100.0, 110.0, 105.0, 125.0, 115.0])).unwrap().ok);

        // amp2 = 5, amp4 = 5.2 -> under 10%
        let similar = eval(&Alternation, &impulse(&[100.0, 110.0, 105.0, 125.0, 119.8])).unwrap();
        assert!(!similar.ok);
        assert_eq!(similar.severity, Severity::Info);
    }
}
