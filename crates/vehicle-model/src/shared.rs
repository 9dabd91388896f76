//! Process-wide Vehicle Handle

use crate::VehicleState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to the single process-wide vehicle
///
/// Writers are the periodic vehicle task and CLI commands; the telemetry
/// encoder and status commands only take snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedVehicle {
    inner: Arc<Mutex<VehicleState>>,
}

impl SharedVehicle {
    /// Wrap an initial state
    pub fn new(state: VehicleState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Copy out the current state
    pub fn snapshot(&self) -> VehicleState {
        *self.lock()
    }

    /// Mutate the state in place and return whatever the closure returns
    pub fn update<R>(&self, f: impl FnOnce(&mut VehicleState) -> R) -> R {
        f(&mut self.lock())
    }

    // Poisoning is ignored: the guarded value is a plain Copy struct.
    fn lock(&self) -> MutexGuard<'_, VehicleState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let vehicle = SharedVehicle::new(VehicleState::new());
        let cli_side = vehicle.clone();

        cli_side.update(|vs| vs.set_target_speed(80.0));
        assert_eq!(vehicle.snapshot().speed_kph, 80.0);
    }

    #[test]
    fn test_update_returns_closure_value() {
        let vehicle = SharedVehicle::default();
        let rpm = vehicle.update(|vs| {
            vs.update(0.1);
            vs.engine_rpm
        });
        assert_eq!(rpm, 800);
    }
}
