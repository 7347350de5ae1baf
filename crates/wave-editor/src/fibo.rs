//! Fibonacci retracement overlays anchored to a wave segment.
//!
//! Only the level math lives here. The renderer draws the lines.

use std::sync::atomic::{AtomicU64, Ordering};

use wave_core::{find_wave, WaveId, WavePath};

use crate::coords::CoordinateTransform;

static NEXT_TEMPLATE_ID: AtomicU64 = AtomicU64::new(1);

/// Default ratios for user-created templates.
pub const DEFAULT_RATIOS: [f64; 7] = [0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.618];

/// A wave segment a template measures from `a` to `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAnchor {
    pub wave_id: WaveId,
    pub a: usize,
    pub b: usize,
}

/// A named set of retracement ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct FiboTemplate {
    pub id: String,
    pub name: String,
    pub ratios: Vec<f64>,
    pub visible: bool,
    pub color: String,
    pub opacity: f64,
    pub anchor: Option<SegmentAnchor>,
}

/// One retracement level in price space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiboLevel {
    pub ratio: f64,
    pub price: f64,
}

/// One retracement level in pixel space, spanning the anchor segment horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLevel {
    pub ratio: f64,
    pub y: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl FiboTemplate {
    /// The built-in template, hidden until toggled.
    pub fn classic() -> Self {
        Self {
            id: "fibo_default".to_string(),
            name: "Classic".to_string(),
            ratios: vec![0.382, 0.5, 0.618, 1.0, 1.618],
            visible: false,
            color: "#9ca3af".to_string(),
            opacity: 0.5,
            anchor: None,
        }
    }

    /// A visible user template; `None` ratios fall back to [`DEFAULT_RATIOS`].
    pub fn custom(name: impl Into<String>, ratios: Option<Vec<f64>>) -> Self {
        let n = NEXT_TEMPLATE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("fibo_{n}"),
            name: name.into(),
            ratios: ratios.unwrap_or_else(|| DEFAULT_RATIOS.to_vec()),
            visible: true,
            color: "#a78bfa".to_string(),
            opacity: 0.4,
            anchor: None,
        }
    }

    /// Price levels for the anchored segment, `None` when unanchored or the
    /// anchor no longer resolves.
    pub fn levels(&self, waves: &[WavePath]) -> Option<Vec<FiboLevel>> {
        let anchor = self.anchor.as_ref()?;
        let wave = find_wave(waves, &anchor.wave_id)?;
        let start = wave.points.get(anchor.a)?;
        let end = wave.points.get(anchor.b)?;

        Some(
            self.ratios
                .iter()
                .map(|&ratio| FiboLevel {
                    ratio,
                    price: start.p + (end.p - start.p) * ratio,
                })
                .collect(),
        )
    }

    /// Levels projected to the screen. Levels outside the visible price range are dropped.
    pub fn screen_levels(&self, waves: &[WavePath], transform: &dyn CoordinateTransform) -> Option<Vec<ScreenLevel>> {
        let anchor = self.anchor.as_ref()?;
        let wave = find_wave(waves, &anchor.wave_id)?;
        let start = transform.point_to_screen(*wave.points.get(anchor.a)?)?;
        let end = transform.point_to_screen(*wave.points.get(anchor.b)?)?;
        let (x_min, x_max) = (start.x.min(end.x), start.x.max(end.x));

        let levels = self
            .levels(waves)?
            .into_iter()
            .filter_map(|level| {
                Some(ScreenLevel {
                    ratio: level.ratio,
                    y: transform.price_to_pixel(level.price)?,
                    x_min,
                    x_max,
                })
            })
            .collect();
        Some(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::LinearTransform;
    use wave_core::{Point, WaveKind};

    fn anchored(ratios: Vec<f64>) -> (FiboTemplate, Vec<WavePath>) {
        let wave = WavePath::from_points(
            WaveKind::Impulse,
            "#fff",
            vec![Point::new(100.0, 100.0), Point::new(200.0, 200.0), Point::new(300.0, 150.0)],
        );
        let mut template = FiboTemplate::custom("test", Some(ratios));
        template.anchor = Some(SegmentAnchor {
            wave_id: wave.id.clone(),
            a: 0,
            b: 1,
        });
        (template, vec![wave])
    }

    #[test]
    fn test_classic_template() {
        let classic = FiboTemplate::classic();
        assert_eq!(classic.ratios, vec![0.382, 0.5, 0.618, 1.0, 1.618]);
        assert!(!classic.visible);
        assert!(classic.anchor.is_none());
        assert!(classic.levels(&[]).is_none());
    }

    #[test]
    fn test_custom_ids_unique() {
        let a = FiboTemplate::custom("a", None);
        let b = FiboTemplate::custom("b", None);
        assert_ne!(a.id, b.id);
        assert_eq!(a.ratios, DEFAULT_RATIOS.to_vec());
    }

    #[test]
    fn test_levels() {
        let (template, waves) = anchored(vec![0.0, 0.5, 1.0, 1.618]);
        let levels = template.levels(&waves).unwrap();
        let prices: Vec<f64> = levels.iter().map(|l| l.price).collect();
        assert_eq!(prices[0], 100.0);
        assert_eq!(prices[1], 150.0);
        assert_eq!(prices[2], 200.0);
        assert!((prices[3] - 261.8).abs() < 1e-9);
    }

    #[test]
    fn test_screen_levels() {
        let (template, waves) = anchored(vec![0.5, 10.0]);
        let transform = LinearTransform::new(1000.0, 500.0, (0.0, 1000.0), (0.0, 500.0));
        let levels = template.screen_levels(&waves, &transform).unwrap();
        // 10.0 projects to price 1100, off screen
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].y, 350.0);
        assert_eq!((levels[0].x_min, levels[0].x_max), (100.0, 200.0));
    }

    #[test]
    fn test_dangling_anchor() {
        let (template, _) = anchored(vec![0.5]);
        assert!(template.levels(&[]).is_none());
    }
}
