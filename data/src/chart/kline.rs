use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Kline {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Kline {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Lowest low and highest high across `klines`, `None` when empty.
pub fn price_bounds(klines: &[Kline]) -> Option<(f64, f64)> {
    klines.iter().fold(None, |acc, kline| match acc {
        None => Some((kline.low, kline.high)),
        Some((low, high)) => Some((low.min(kline.low), high.max(kline.high))),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Timeframe {
    M1,
    M3,
    M5,
    M15,
    M30,
    H1,
    H2,
    H4,
    H6,
    H12,
    D1,
    W1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 12] = [
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H2,
        Timeframe::H4,
        Timeframe::H6,
        Timeframe::H12,
        Timeframe::D1,
        Timeframe::W1,
    ];

    pub fn to_minutes(self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M3 => 3,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H2 => 120,
            Timeframe::H4 => 240,
            Timeframe::H6 => 360,
            Timeframe::H12 => 720,
            Timeframe::D1 => 1_440,
            Timeframe::W1 => 10_080,
        }
    }

    pub fn to_milliseconds(self) -> u64 {
        u64::from(self.to_minutes()) * 60_000
    }

    pub fn to_seconds(self) -> f64 {
        f64::from(self.to_minutes()) * 60.0
    }

    /// Guesses the timeframe from the spacing of the first two klines.
    pub fn infer(klines: &[Kline]) -> Option<Timeframe> {
        let [first, second, ..] = klines else {
            return None;
        };

        let spacing = second.time.checked_sub(first.time)?;
        Timeframe::try_from(spacing).ok()
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Timeframe::M1 => "1m",
                Timeframe::M3 => "3m",
                Timeframe::M5 => "5m",
                Timeframe::M15 => "15m",
                Timeframe::M30 => "30m",
                Timeframe::H1 => "1h",
                Timeframe::H2 => "2h",
                Timeframe::H4 => "4h",
                Timeframe::H6 => "6h",
                Timeframe::H12 => "12h",
                Timeframe::D1 => "1d",
                Timeframe::W1 => "1w",
            }
        )
    }
}

impl TryFrom<u64> for Timeframe {
    type Error = u64;

    fn try_from(milliseconds: u64) -> Result<Self, Self::Error> {
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.to_milliseconds() == milliseconds)
            .ok_or(milliseconds)
    }
}
