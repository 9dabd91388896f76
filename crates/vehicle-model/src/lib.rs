//! Virtual Vehicle Model
//!
//! A tiny "virtual vehicle" whose speed, engine RPM and coolant temperature
//! move just enough to make the Mini ECU telemetry feel alive.

mod shared;
mod state;

pub use shared::SharedVehicle;
pub use state::VehicleState;

/// Model limits and rates
pub mod limits {
    /// Idle engine speed (RPM)
    pub const IDLE_RPM: u16 = 800;
    /// Cold-start coolant temperature (°C)
    pub const COLD_COOLANT_C: f32 = 30.0;

    /// Speed decay while coasting (km/h per second)
    pub const SPEED_DECAY_KPH_S: f32 = 1.0;
    /// Speed below which the vehicle is considered stopped (km/h)
    pub const SPEED_DEADBAND_KPH: f32 = 0.1;
    /// RPM added per km/h ("fake gear")
    pub const RPM_PER_KPH: f32 = 50.0;
    /// First-order lag rate constant for RPM (1/s)
    pub const RPM_LAG_PER_S: f32 = 0.5;
    /// Normal-update RPM range
    pub const RPM_RANGE: (f32, f32) = (600.0, 6000.0);

    /// Coolant warm-up rate (°C per second)
    pub const COOLANT_WARM_C_S: f32 = 2.0;
    /// Coolant cool-down rate (°C per second)
    pub const COOLANT_COOL_C_S: f32 = 0.2;
    /// Speed above which the engine is under load (km/h)
    pub const LOAD_SPEED_KPH: f32 = 1.0;
    /// RPM above which the engine is under load
    pub const LOAD_RPM: u16 = 1500;
    /// Normal-update coolant range (°C)
    pub const COOLANT_RANGE: (f32, f32) = (20.0, 110.0);

    /// Driver-command speed range (km/h)
    pub const TARGET_SPEED_RANGE: (f32, f32) = (0.0, 200.0);

    /// Fault-injection ranges
    pub const FORCE_SPEED_RANGE: (f32, f32) = (0.0, 300.0);
    pub const FORCE_RPM_MAX: u16 = 8000;
    pub const FORCE_COOLANT_RANGE: (f32, f32) = (-40.0, 140.0);
}
