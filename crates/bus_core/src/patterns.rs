//! Time-of-day demand patterns for stop arrival rates.
//!
//! The default curve has a morning peak at 07:00 and repeats every 12 hours,
//! so an evening peak falls at 19:00:
//!
//! ```text
//! rate(hour) = 1.2 + cos(pi * (hour - 7) / 6)      passengers per minute
//! ```
//!
//! It bottoms out at 0.2 passengers per minute around 01:00 and 13:00.

use serde::{Deserialize, Serialize};

use crate::clock::MINUTES_PER_HOUR;

/// Convert simulation minutes to hour of day in `[0, 24)`.
pub fn hour_of_day(minutes: f64) -> f64 {
    (minutes / MINUTES_PER_HOUR).rem_euclid(24.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinusoidalDemand {
    /// Mean rate (passengers per minute).
    pub base: f64,
    pub amplitude: f64,
    pub peak_hour: f64,
    pub period_hours: f64,
}

impl Default for SinusoidalDemand {
    fn default() -> Self {
        Self {
            base: 1.2,
            amplitude: 1.0,
            peak_hour: 7.0,
            period_hours: 12.0,
        }
    }
}

impl SinusoidalDemand {
    pub fn rate_at(&self, minutes: f64) -> f64 {
        let hour = hour_of_day(minutes);
        let phase = 2.0 * std::f64::consts::PI * (hour - self.peak_hour) / self.period_hours;
        (self.base + self.amplitude * phase.cos()).max(0.0)
    }

    /// Lowest rate the curve reaches.
    pub fn min_rate(&self) -> f64 {
        (self.base - self.amplitude.abs()).max(0.0)
    }
}

/// Stop arrival rate: fixed, or a function of the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArrivalRate {
    Constant(f64),
    TimeOfDay(SinusoidalDemand),
}

impl ArrivalRate {
    pub fn rate_at(&self, minutes: f64) -> f64 {
        match self {
            ArrivalRate::Constant(rate) => *rate,
            ArrivalRate::TimeOfDay(curve) => curve.rate_at(minutes),
        }
    }

    pub fn is_time_varying(&self) -> bool {
        matches!(self, ArrivalRate::TimeOfDay(_))
    }

    pub fn min_rate(&self) -> f64 {
        match self {
            ArrivalRate::Constant(rate) => *rate,
            ArrivalRate::TimeOfDay(curve) => curve.min_rate(),
        }
    }
}
