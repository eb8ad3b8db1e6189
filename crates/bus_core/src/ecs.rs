use std::collections::BTreeMap;
use std::fmt;

use bevy_ecs::prelude::{Component, Entity, Resource};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// 1-indexed position of a stop on the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopId(pub u32);

impl StopId {
    /// Zero-based index into per-stop arrays.
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stop {}", self.0)
    }
}

/// 1-indexed vehicle number. Vehicle `n` starts at stop `n` (wrapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle {}", self.0)
    }
}

/// Unique per run, assigned in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassengerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    /// Time the passenger joined the stop queue.
    pub arrival_time: f64,
    pub source_stop: StopId,
    pub destination_stop: StopId,
    /// Set exactly once, when the passenger boards.
    pub departure_time: Option<f64>,
}

impl Passenger {
    /// Time spent waiting at the stop; `None` until boarded.
    pub fn wait_time(&self) -> Option<f64> {
        self.departure_time.map(|t| t - self.arrival_time)
    }

    pub fn waited_until(&self, now: f64) -> f64 {
        now - self.arrival_time
    }
}

type QueueKey = (OrderedFloat<f64>, PassengerId);

/// A passenger evicted from a stop queue for waiting too long.
#[derive(Debug, Clone, PartialEq)]
pub struct Eviction {
    pub passenger: Passenger,
    /// 1-based queue position at the moment of the scan.
    pub rank: usize,
}

#[derive(Debug, Component)]
pub struct Stop {
    pub id: StopId,
    /// Current arrival rate (passengers per minute).
    pub arrival_rate: f64,
    /// FIFO queue keyed by arrival time; passenger id breaks ties.
    waiting: BTreeMap<QueueKey, Passenger>,
}

impl Stop {
    pub fn new(id: StopId, arrival_rate: f64) -> Self {
        Self {
            id,
            arrival_rate,
            waiting: BTreeMap::new(),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Waiting passengers, earliest arrival first.
    pub fn waiting(&self) -> impl Iterator<Item = &Passenger> {
        self.waiting.values()
    }

    /// Add a passenger and return the new queue length.
    pub fn enqueue(&mut self, passenger: Passenger) -> usize {
        let key = (OrderedFloat(passenger.arrival_time), passenger.id);
        self.waiting.insert(key, passenger);
        self.waiting.len()
    }

    /// Remove up to `count` passengers from the head of the queue.
    pub fn take_front(&mut self, count: usize) -> Vec<Passenger> {
        let mut taken = Vec::with_capacity(count.min(self.waiting.len()));
        while taken.len() < count {
            match self.waiting.pop_first() {
                Some((_, passenger)) => taken.push(passenger),
                None => break,
            }
        }
        taken
    }

    /// Evict passengers ranked after `protected_ranks` whose wait exceeds `patience`.
    ///
    /// Ranks `1..=protected_ranks` are never evaluated, however long they have waited.
    pub fn evict_impatient(
        &mut self,
        now: f64,
        protected_ranks: usize,
        patience: f64,
    ) -> Vec<Eviction> {
        let candidates: Vec<(QueueKey, usize)> = self
            .waiting
            .iter()
            .enumerate()
            .skip(protected_ranks)
            .filter(|(_, (_, passenger))| passenger.waited_until(now) > patience)
            .map(|(idx, (key, _))| (*key, idx + 1))
            .collect();

        candidates
            .into_iter()
            .filter_map(|(key, rank)| {
                self.waiting
                    .remove(&key)
                    .map(|passenger| Eviction { passenger, rank })
            })
            .collect()
    }
}

#[derive(Debug, Component)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Stop the vehicle is at (or heading to, between arrivals).
    pub location: StopId,
    pub capacity: usize,
    pub route_length: u32,
    /// `true` when every seat was taken after the last boarding.
    pub full: bool,
    onboard: Vec<Passenger>,
}

impl Vehicle {
    pub fn new(id: VehicleId, location: StopId, capacity: usize, route_length: u32) -> Self {
        Self {
            id,
            location,
            capacity,
            route_length,
            full: false,
            onboard: Vec::with_capacity(capacity),
        }
    }

    pub fn onboard(&self) -> &[Passenger] {
        &self.onboard
    }

    pub fn onboard_count(&self) -> usize {
        self.onboard.len()
    }

    pub fn free_seats(&self) -> usize {
        self.capacity.saturating_sub(self.onboard.len())
    }

    /// Remove every passenger whose destination is `stop`, keeping the others in boarding order.
    pub fn unload_at(&mut self, stop: StopId) -> Vec<Passenger> {
        let (leaving, staying): (Vec<Passenger>, Vec<Passenger>) = self
            .onboard
            .drain(..)
            .partition(|p| p.destination_stop == stop);
        self.onboard = staying;
        leaving
    }

    /// Seat `passengers`, stamping each with `now` as its departure time.
    ///
    /// # Panics
    ///
    /// Panics if the batch does not fit. Callers size the batch from
    /// [`Vehicle::free_seats`], so this can only fire on a logic error.
    pub fn board(&mut self, passengers: Vec<Passenger>, now: f64) {
        assert!(
            passengers.len() <= self.free_seats(),
            "{}: boarding {} passengers with {} free seats",
            self.id,
            passengers.len(),
            self.free_seats()
        );
        for mut passenger in passengers {
            debug_assert!(passenger.departure_time.is_none(), "passenger boarded twice");
            passenger.departure_time = Some(now);
            self.onboard.push(passenger);
        }
        self.full = self.onboard.len() == self.capacity;
    }

    /// Move to the next stop on the loop and return it. The last stop wraps to stop 1.
    pub fn advance(&mut self) -> StopId {
        self.location = StopId((self.location.0 % self.route_length) + 1);
        self.location
    }
}

/// Stop and vehicle entities in id order. Events carry entities; systems that
/// need "stop n" or "all vehicles in order" resolve them here.
#[derive(Debug, Default, Resource)]
pub struct RouteDirectory {
    stops: Vec<Entity>,
    vehicles: Vec<Entity>,
}

impl RouteDirectory {
    pub fn new(stops: Vec<Entity>, vehicles: Vec<Entity>) -> Self {
        Self { stops, vehicles }
    }

    pub fn stop(&self, id: StopId) -> Option<Entity> {
        if id.0 == 0 {
            return None;
        }
        self.stops.get(id.index()).copied()
    }

    pub fn stops(&self) -> &[Entity] {
        &self.stops
    }

    pub fn vehicles(&self) -> &[Entity] {
        &self.vehicles
    }
}
