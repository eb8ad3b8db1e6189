use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::MINUTES_PER_DAY;
use crate::distributions::{
    ArrivalProcess, InterArrivalDistribution, ServiceTime, TruncatedNormal,
};
use crate::ecs::StopId;
use crate::error::{SimError, SimResult};
use crate::patterns::{ArrivalRate, SinusoidalDemand};

/// Default number of stops on the loop.
pub const DEFAULT_NUM_STOPS: usize = 15;

/// Default seats per vehicle.
pub const DEFAULT_VEHICLE_CAPACITY: usize = 130;

/// Destinations are drawn from the next `span - 1` stops downstream (or the source itself).
pub const DEFAULT_DESTINATION_SPAN: u32 = 7;

/// Queue positions that are never evicted for impatience.
pub const DEFAULT_PROTECTED_RANKS: usize = 20;

/// Minutes a passenger tolerates before becoming eligible for eviction.
pub const DEFAULT_PATIENCE_MIN: f64 = 10.0;

/// Simulation end time in minutes. The runner stops once the next event would
/// be at or after this timestamp; that event is left unprocessed.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTime(pub f64);

/// Shape of the loop.
#[derive(Debug, Clone, Copy, Resource)]
pub struct RouteConfig {
    pub num_stops: u32,
    pub destination_span: u32,
}

impl RouteConfig {
    /// Destination `k` stops downstream of `source`, wrapping past the last stop.
    pub fn destination_from(&self, source: StopId, k: u32) -> StopId {
        StopId(((source.0 + k) % self.num_stops) + 1)
    }
}

/// Passenger generation at stops.
#[derive(Debug, Resource)]
pub struct DemandConfig {
    pub rate: ArrivalRate,
    pub inter_arrival: Box<dyn InterArrivalDistribution>,
}

/// Impatient passengers leave the queue.
#[derive(Debug, Clone, Copy, Resource)]
pub struct RenegingConfig {
    pub enabled: bool,
    pub protected_ranks: usize,
    pub patience: f64,
}

impl Default for RenegingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            protected_ranks: DEFAULT_PROTECTED_RANKS,
            patience: DEFAULT_PATIENCE_MIN,
        }
    }
}

/// Vehicle dwell and transit durations.
#[derive(Debug, Clone, Copy, Resource)]
pub struct VehicleTimingConfig {
    pub transit: TruncatedNormal,
    pub boarding: ServiceTime,
    pub alighting: ServiceTime,
}

impl Default for VehicleTimingConfig {
    fn default() -> Self {
        Self {
            transit: TruncatedNormal::new(2.0, 0.5),
            boarding: ServiceTime::boarding(),
            alighting: ServiceTime::alighting(),
        }
    }
}

/// Stop whose arrival timestamps are kept for inter-arrival analysis.
#[derive(Debug, Clone, Copy, Resource)]
pub struct TrackedStop(pub StopId);

/// Parameters for building a bus line scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub num_vehicles: usize,
    pub num_stops: usize,
    pub vehicle_capacity: usize,
    /// Run length in minutes since midnight.
    pub horizon_min: f64,
    /// Arrivals per minute at every stop when demand is constant.
    pub base_arrival_rate: f64,
    /// Replace the constant rate with `demand_curve` evaluated at each arrival.
    pub time_varying_demand: bool,
    pub demand_curve: SinusoidalDemand,
    pub reneging: bool,
    pub protected_ranks: usize,
    pub patience_min: f64,
    /// `None` draws a fresh seed from the OS; runs are then not reproducible.
    pub seed: Option<u64>,
    pub destination_span: u32,
    pub sample_interval_min: f64,
    /// Number of trailing samples in the steady-state estimate.
    pub steady_state_window: usize,
    pub arrival_process: ArrivalProcess,
    pub transit: TruncatedNormal,
    pub boarding: ServiceTime,
    pub alighting: ServiceTime,
    pub tracked_stop: u32,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_vehicles: 5,
            num_stops: DEFAULT_NUM_STOPS,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            horizon_min: MINUTES_PER_DAY,
            base_arrival_rate: 1.0,
            time_varying_demand: false,
            demand_curve: SinusoidalDemand::default(),
            reneging: false,
            protected_ranks: DEFAULT_PROTECTED_RANKS,
            patience_min: DEFAULT_PATIENCE_MIN,
            seed: None,
            destination_span: DEFAULT_DESTINATION_SPAN,
            sample_interval_min: 10.0,
            steady_state_window: 10,
            arrival_process: ArrivalProcess::Poisson,
            transit: TruncatedNormal::new(2.0, 0.5),
            boarding: ServiceTime::boarding(),
            alighting: ServiceTime::alighting(),
            tracked_stop: 1,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_vehicles(mut self, num_vehicles: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self
    }

    pub fn with_stops(mut self, num_stops: usize) -> Self {
        self.num_stops = num_stops;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.vehicle_capacity = capacity;
        self
    }

    pub fn with_horizon_min(mut self, horizon_min: f64) -> Self {
        self.horizon_min = horizon_min;
        self
    }

    pub fn with_arrival_rate(mut self, rate: f64) -> Self {
        self.base_arrival_rate = rate;
        self
    }

    /// Stop arrival rate follows the time-of-day curve.
    pub fn with_time_varying_demand(mut self, enabled: bool) -> Self {
        self.time_varying_demand = enabled;
        self
    }

    pub fn with_reneging(mut self, enabled: bool) -> Self {
        self.reneging = enabled;
        self
    }

    pub fn with_arrival_process(mut self, process: ArrivalProcess) -> Self {
        self.arrival_process = process;
        self
    }

    pub fn with_transit(mut self, transit: TruncatedNormal) -> Self {
        self.transit = transit;
        self
    }

    /// Boarding and alighting both take no time.
    pub fn with_instant_dwell(mut self) -> Self {
        self.boarding = ServiceTime::instant();
        self.alighting = ServiceTime::instant();
        self
    }

    pub fn with_sampling(mut self, interval_min: f64, window: usize) -> Self {
        self.sample_interval_min = interval_min;
        self.steady_state_window = window;
        self
    }

    pub fn with_tracked_stop(mut self, stop: u32) -> Self {
        self.tracked_stop = stop;
        self
    }

    pub fn arrival_rate(&self) -> ArrivalRate {
        if self.time_varying_demand {
            ArrivalRate::TimeOfDay(self.demand_curve)
        } else {
            ArrivalRate::Constant(self.base_arrival_rate)
        }
    }

    /// Reject parameter sets that cannot produce a running simulation.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));

        if self.num_stops == 0 {
            return invalid("num_stops must be at least 1".into());
        }
        if u32::try_from(self.num_stops).is_err() {
            return invalid(format!("num_stops {} does not fit in u32", self.num_stops));
        }
        if self.num_vehicles == 0 {
            return invalid("num_vehicles must be at least 1".into());
        }
        if self.vehicle_capacity == 0 {
            return invalid("vehicle_capacity must be at least 1".into());
        }
        if !self.horizon_min.is_finite() || self.horizon_min <= 0.0 {
            return invalid(format!(
                "horizon_min must be positive and finite, got {}",
                self.horizon_min
            ));
        }
        if !self.time_varying_demand
            && (!self.base_arrival_rate.is_finite() || self.base_arrival_rate <= 0.0)
        {
            return invalid(format!(
                "base_arrival_rate must be positive, got {}",
                self.base_arrival_rate
            ));
        }
        if self.time_varying_demand {
            check_demand_curve(&self.demand_curve)?;
        }
        if !self.sample_interval_min.is_finite() || self.sample_interval_min <= 0.0 {
            return invalid(format!(
                "sample_interval_min must be positive, got {}",
                self.sample_interval_min
            ));
        }
        if self.steady_state_window == 0 {
            return invalid("steady_state_window must be at least 1".into());
        }
        if self.destination_span == 0 {
            return invalid("destination_span must be at least 1".into());
        }
        if self.tracked_stop == 0 || self.tracked_stop as usize > self.num_stops {
            return invalid(format!(
                "tracked_stop {} outside 1..={}",
                self.tracked_stop, self.num_stops
            ));
        }
        // Infinite patience disables eviction.
        if self.patience_min.is_nan() || self.patience_min < 0.0 {
            return invalid(format!(
                "patience_min must be non-negative, got {}",
                self.patience_min
            ));
        }
        check_duration("transit", &self.transit)?;
        // A loop that never advances the clock would spin forever at one timestamp.
        if self.transit.mean <= 0.0 && self.transit.std_dev <= 0.0 {
            return invalid("transit time must be positive".into());
        }
        for (name, service) in [("boarding", &self.boarding), ("alighting", &self.alighting)] {
            let (mean, spread) = (service.mean_per_passenger, service.spread_per_sqrt_passenger);
            if !mean.is_finite() || !spread.is_finite() || mean < 0.0 || spread < 0.0 {
                return invalid(format!(
                    "{name} parameters must be finite and non-negative, got mean {mean} spread {spread}"
                ));
            }
        }
        Ok(())
    }
}

fn check_duration(name: &str, dist: &TruncatedNormal) -> SimResult<()> {
    let TruncatedNormal {
        mean,
        std_dev,
        upper_sd,
    } = *dist;
    if !mean.is_finite() || !std_dev.is_finite() || !upper_sd.is_finite() {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} parameters must be finite, got mean {mean} sd {std_dev} upper_sd {upper_sd}"
        )));
    }
    if mean < 0.0 || std_dev < 0.0 {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} parameters must be non-negative, got mean {mean} sd {std_dev}"
        )));
    }
    if upper_sd <= 0.0 {
        return Err(SimError::InvalidConfiguration(format!(
            "{name} upper_sd must be positive, got {upper_sd}"
        )));
    }
    Ok(())
}

fn check_demand_curve(curve: &SinusoidalDemand) -> SimResult<()> {
    let SinusoidalDemand {
        base,
        amplitude,
        peak_hour,
        period_hours,
    } = *curve;
    if ![base, amplitude, peak_hour, period_hours]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(SimError::InvalidConfiguration(format!(
            "demand curve parameters must be finite, got {curve:?}"
        )));
    }
    if period_hours <= 0.0 {
        return Err(SimError::InvalidConfiguration(format!(
            "demand curve period_hours must be positive, got {period_hours}"
        )));
    }
    if curve.min_rate() <= 0.0 {
        return Err(SimError::InvalidConfiguration(
            "demand curve must stay above zero".into(),
        ));
    }
    Ok(())
}
