//! Vehicle State and Update Law

use crate::limits::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Simple virtual vehicle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Vehicle speed (km/h)
    pub speed_kph: f32,
    /// Engine speed (RPM)
    pub engine_rpm: u16,
    /// Coolant temperature (°C)
    pub coolant_temp_c: f32,
}

impl VehicleState {
    /// Create a vehicle at rest with an idling, cold engine
    pub fn new() -> Self {
        Self {
            speed_kph: 0.0,
            engine_rpm: IDLE_RPM,
            coolant_temp_c: COLD_COOLANT_C,
        }
    }

    /// Integrate the model over `dt_s` seconds
    ///
    /// Non-positive (or NaN) steps leave the state untouched.
    pub fn update(&mut self, dt_s: f32) {
        if dt_s.is_nan() || dt_s <= 0.0 {
            return;
        }

        // Friction
        if self.speed_kph > SPEED_DEADBAND_KPH {
            self.speed_kph = (self.speed_kph - SPEED_DECAY_KPH_S * dt_s).max(0.0);
        }

        let target_rpm = IDLE_RPM as f32 + self.speed_kph * RPM_PER_KPH;
        let mut rpm = self.engine_rpm as f32;
        rpm += (target_rpm - rpm) * RPM_LAG_PER_S * dt_s;
        self.engine_rpm = rpm.clamp(RPM_RANGE.0, RPM_RANGE.1) as u16;

        if self.speed_kph > LOAD_SPEED_KPH || self.engine_rpm > LOAD_RPM {
            self.coolant_temp_c += COOLANT_WARM_C_S * dt_s;
        } else {
            self.coolant_temp_c -= COOLANT_COOL_C_S * dt_s;
        }
        self.coolant_temp_c = self.coolant_temp_c.clamp(COOLANT_RANGE.0, COOLANT_RANGE.1);
    }

    /// Apply a driver speed command
    ///
    /// There is no acceleration ramp: the speed snaps to the clamped target.
    pub fn set_target_speed(&mut self, target_speed_kph: f32) {
        self.speed_kph = target_speed_kph.clamp(TARGET_SPEED_RANGE.0, TARGET_SPEED_RANGE.1);
        debug!("Target speed set to {:.1} km/h", self.speed_kph);
    }

    /// Overwrite all fields for fault injection
    ///
    /// Uses the wider fault ranges, not the normal-update ones.
    pub fn force(&mut self, speed_kph: f32, rpm: u16, temp_c: f32) {
        self.speed_kph = speed_kph.clamp(FORCE_SPEED_RANGE.0, FORCE_SPEED_RANGE.1);
        self.engine_rpm = rpm.min(FORCE_RPM_MAX);
        self.coolant_temp_c = temp_c.clamp(FORCE_COOLANT_RANGE.0, FORCE_COOLANT_RANGE.1);
        debug!(
            "Vehicle forced: speed={:.1} rpm={} coolant={:.1}",
            self.speed_kph, self.engine_rpm, self.coolant_temp_c
        );
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}
