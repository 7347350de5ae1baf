//! Coordinate conversion between chart data space and screen pixels.
//!
//! The chart owns its axes; the editor only sees them through
//! [`CoordinateTransform`]. Every conversion may fail when the value lies
//! outside the drawable area, in which case callers skip the affected point
//! or event instead of substituting a default.
//!
//! [`LinearTransform`] is a plain affine implementation over a visible
//! time/price window, used for headless sessions and tests.

use wave_core::Point;

/// Screen coordinates in pixels from the top-left corner of the chart pane.
///
/// X increases to the right, Y increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another screen position.
    #[must_use]
    pub fn distance_to(self, other: ScreenPos) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Calculate squared distance (faster than distance_to when only comparing).
    #[must_use]
    pub fn distance_squared_to(self, other: ScreenPos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for ScreenPos {
    fn from(pos: (f64, f64)) -> Self {
        Self::new(pos.0, pos.1)
    }
}

/// Time/price ↔ pixel conversions provided by the chart.
pub trait CoordinateTransform {
    /// Pixel x for a time, `None` if the time is outside the visible range.
    fn time_to_pixel(&self, t: f64) -> Option<f64>;
    /// Pixel y for a price, `None` if the price is outside the visible range.
    fn price_to_pixel(&self, p: f64) -> Option<f64>;
    fn pixel_to_time(&self, x: f64) -> Option<f64>;
    fn pixel_to_price(&self, y: f64) -> Option<f64>;

    /// Project a chart point to the screen.
    fn point_to_screen(&self, point: Point) -> Option<ScreenPos> {
        Some(ScreenPos::new(self.time_to_pixel(point.t)?, self.price_to_pixel(point.p)?))
    }

    /// Convert a screen position to a chart point.
    fn screen_to_point(&self, pos: ScreenPos) -> Option<Point> {
        Some(Point::new(self.pixel_to_time(pos.x)?, self.pixel_to_price(pos.y)?))
    }
}

/// Affine transform over a visible time/price window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    /// Pane width in pixels.
    pub width: f64,
    /// Pane height in pixels.
    pub height: f64,
    /// Visible time range (start, end) in epoch seconds.
    pub time_range: (f64, f64),
    /// Visible price range (low, high).
    pub price_range: (f64, f64),
}

impl LinearTransform {
    #[must_use]
    pub fn new(width: f64, height: f64, time_range: (f64, f64), price_range: (f64, f64)) -> Self {
        // Use .max(1.0) to prevent division by zero on collapsed panes
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            time_range,
            price_range,
        }
    }

    fn time_span(&self) -> f64 {
        (self.time_range.1 - self.time_range.0).max(f64::EPSILON)
    }

    fn price_span(&self) -> f64 {
        (self.price_range.1 - self.price_range.0).max(f64::EPSILON)
    }

    /// Check if a screen position is within the pane.
    #[must_use]
    pub fn contains(&self, pos: ScreenPos) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}

impl CoordinateTransform for LinearTransform {
    fn time_to_pixel(&self, t: f64) -> Option<f64> {
        let (start, end) = self.time_range;
        (start..=end)
            .contains(&t)
            .then(|| (t - start) * self.width / self.time_span())
    }

    fn price_to_pixel(&self, p: f64) -> Option<f64> {
        let (low, high) = self.price_range;
        // Screen Y grows downward while price grows upward
        (low..=high)
            .contains(&p)
            .then(|| (high - p) * self.height / self.price_span())
    }

    fn pixel_to_time(&self, x: f64) -> Option<f64> {
        (0.0..=self.width)
            .contains(&x)
            .then(|| self.time_range.0 + x * self.time_span() / self.width)
    }

    fn pixel_to_price(&self, y: f64) -> Option<f64> {
        (0.0..=self.height)
            .contains(&y)
            .then(|| self.price_range.1 - y * self.price_span() / self.height)
    }
}
