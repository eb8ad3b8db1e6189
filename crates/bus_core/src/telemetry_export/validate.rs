use crate::telemetry::ServedBatch;

/// Checks that every passenger in a served batch went through the line in order:
/// `arrival_time <= departure_time <= served time`, and alighted at its destination.
/// Returns an error message for the first violation, `None` if the batch is consistent.
pub fn validate_served_batch(batch: &ServedBatch) -> Option<String> {
    for passenger in &batch.passengers {
        if passenger.destination_stop != batch.stop {
            return Some(format!(
                "Passenger {}: alighted at {} but was bound for {}",
                passenger.id.0, batch.stop, passenger.destination_stop
            ));
        }
        let Some(boarded) = passenger.departure_time else {
            return Some(format!(
                "Passenger {}: served without a boarding time",
                passenger.id.0
            ));
        };
        if passenger.arrival_time > boarded {
            return Some(format!(
                "Passenger {}: arrival_time ({}) > departure_time ({})",
                passenger.id.0, passenger.arrival_time, boarded
            ));
        }
        if boarded > batch.time {
            return Some(format!(
                "Passenger {}: departure_time ({}) > served at ({})",
                passenger.id.0, boarded, batch.time
            ));
        }
    }
    None
}
