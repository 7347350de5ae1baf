//! Point snapping: time grid, price grid and the high/low/close magnet.

use std::cmp::Ordering;

use wave_core::{Point, OHLCV};

use crate::coords::CoordinateTransform;

pub use wave_config::SnapSettings;

/// Snap a raw chart coordinate.
///
/// Grid rounding is applied first. With the magnet enabled, the price level
/// (high, low or close) of the candle nearest in time that is closest to the
/// pointer in pixels replaces both coordinates when it lies within
/// `magnet_px`. Levels the transform cannot project are ignored.
pub fn snap_point<C: OHLCV>(
    raw: Point,
    settings: &SnapSettings,
    candles: &[C],
    transform: &dyn CoordinateTransform,
) -> Point {
    if !settings.enabled {
        return raw;
    }

    let snapped = Point::new(
        snap_to_grid(raw.t, settings.time_grid_sec),
        snap_to_grid(raw.p, settings.price_grid),
    );

    if !settings.magnet_hl {
        return snapped;
    }

    let Some(candle) = nearest_candle(candles, snapped.t) else {
        return snapped;
    };
    let Some(current_y) = transform.price_to_pixel(snapped.p) else {
        return snapped;
    };

    let closest = [candle.high(), candle.low(), candle.close()]
        .into_iter()
        .filter_map(|level| {
            let y = transform.price_to_pixel(level)?;
            Some((level, (y - current_y).abs()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match closest {
        Some((level, distance)) if distance <= settings.magnet_px => {
            Point::new(candle.timestamp(), level)
        }
        _ => snapped,
    }
}

/// Round `value` to the nearest multiple of `step`. Non-positive steps disable rounding.
pub fn snap_to_grid(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Candle with the timestamp closest to `t`. Candles must be ordered by time;
/// on a tie the earlier candle wins.
pub fn nearest_candle<C: OHLCV>(candles: &[C], t: f64) -> Option<&C> {
    let idx = candles.partition_point(|c| c.timestamp() < t);
    let before = idx.checked_sub(1).and_then(|i| candles.get(i));
    let after = candles.get(idx);

    match (before, after) {
        (Some(b), Some(a)) => {
            let db = (t - b.timestamp()).abs();
            let da = (a.timestamp() - t).abs();
            match da.total_cmp(&db) {
                Ordering::Less => Some(a),
                _ => Some(b),
            }
        }
        (b, a) => b.or(a),
    }
}
