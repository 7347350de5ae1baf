//! Candle data structures for OHLCV data.

use serde::{Deserialize, Serialize};

/// OHLCV candle as delivered by the chart's data source.
///
/// Serialized with the short keys used by the candle stream (`t`, `o`, `h`, `l`, `c`, `v`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in epoch seconds.
    #[serde(rename = "t")]
    pub timestamp: f64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: f64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Trait for types that provide timestamped OHLCV data.
pub trait OHLCV {
    fn timestamp(&self) -> f64;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

impl OHLCV for Candle {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
