//! Corrective (A-B-C) structural rules.

use wave_core::WaveKind;

use super::{Rule, RuleId, RuleResult, Severity, WaveContext};

/// R5: wave C moves against wave B, resuming the direction of wave A.
///
/// Both the A→B and B→C moves must be non-flat and point in opposite directions.
pub struct CorrectionDirection;

impl Rule for CorrectionDirection {
    fn id(&self) -> RuleId {
        RuleId::R5
    }

    fn applies_to(&self, kind: WaveKind) -> bool {
        kind == WaveKind::Correction
    }

    fn min_points(&self) -> usize {
        3
    }

    fn evaluate(&self, ctx: &WaveContext) -> Option<RuleResult> {
        let [a, b, c] = ctx.prices::<3>()?;
        let ab = ctx.trend(a, b);
        let bc = ctx.trend(b, c);
        let ok = !ab.is_flat() && !bc.is_flat() && bc == ab.opposite();
        Some(RuleResult::check(
            self.id(),
            ok,
            Severity::Warn,
            "A-B-C: C resumes the direction of A against B",
        ))
    }
}
