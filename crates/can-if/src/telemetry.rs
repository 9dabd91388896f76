//! Telemetry Frame Encoding
//!
//! Payload layout (little-endian, DLC 6):
//!
//! | Bytes | Field            | Type |
//! |-------|------------------|------|
//! | 0-1   | speed (km/h × 10)| u16  |
//! | 2-3   | engine RPM       | u16  |
//! | 4-5   | coolant (°C × 10)| i16  |

use crate::{CanError, CanFrame, MAX_STANDARD_ID};
use vehicle_model::VehicleState;

/// Telemetry payload length
pub const TELEMETRY_DLC: usize = 6;

/// Encoder/decoder for the vehicle telemetry frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryCodec {
    id: u16,
}

impl TelemetryCodec {
    /// Create a codec for frames with identifier `id`
    pub fn new(id: u16) -> Result<Self, CanError> {
        if id > MAX_STANDARD_ID {
            return Err(CanError::InvalidId(id));
        }
        Ok(Self { id })
    }

    /// Get the telemetry identifier
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Encode a vehicle state (scaled values are truncated, not rounded)
    pub fn encode(&self, state: &VehicleState) -> CanFrame {
        let speed = (state.speed_kph * 10.0) as u16;
        let temp = (state.coolant_temp_c * 10.0) as i16;

        let mut data = [0u8; 8];
        data[0..2].copy_from_slice(&speed.to_le_bytes());
        data[2..4].copy_from_slice(&state.engine_rpm.to_le_bytes());
        data[4..6].copy_from_slice(&temp.to_le_bytes());

        CanFrame {
            id: self.id,
            dlc: TELEMETRY_DLC as u8,
            data,
        }
    }

    /// Decode a telemetry frame back into a vehicle state
    pub fn decode(&self, frame: &CanFrame) -> Result<VehicleState, CanError> {
        if frame.id() != self.id {
            return Err(CanError::NotTelemetry {
                expected: self.id,
                actual: frame.id(),
            });
        }
        let payload = frame.payload();
        if payload.len() < TELEMETRY_DLC {
            return Err(CanError::TelemetryTooShort(payload.len()));
        }

        let speed = u16::from_le_bytes([payload[0], payload[1]]);
        let rpm = u16::from_le_bytes([payload[2], payload[3]]);
        let temp = i16::from_le_bytes([payload[4], payload[5]]);

        Ok(VehicleState {
            speed_kph: speed as f32 / 10.0,
            engine_rpm: rpm,
            coolant_temp_c: temp as f32 / 10.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> TelemetryCodec {
        TelemetryCodec::new(0x100).unwrap()
    }

    #[test]
    fn test_round_trip_within_truncation() {
        let state = VehicleState {
            speed_kph: 60.3,
            engine_rpm: 2500,
            coolant_temp_c: 85.7,
        };

        let decoded = codec().decode(&codec().encode(&state)).unwrap();
        assert!((decoded.speed_kph - 60.3).abs() <= 0.1 + 1e-4);
        assert_eq!(decoded.engine_rpm, 2500);
        assert!((decoded.coolant_temp_c - 85.7).abs() <= 0.1 + 1e-4);
    }

    #[test]
    fn test_byte_layout() {
        let state = VehicleState {
            speed_kph: 12.5,
            engine_rpm: 0x1234,
            coolant_temp_c: -12.5,
        };

        let frame = codec().encode(&state);
        assert_eq!(frame.id(), 0x100);
        assert_eq!(frame.dlc(), 6);
        // 125 = 0x007D, -125 = 0xFF83
        assert_eq!(frame.payload(), &[0x7D, 0x00, 0x34, 0x12, 0x83, 0xFF]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let state = VehicleState {
            speed_kph: 0.19,
            engine_rpm: 800,
            coolant_temp_c: -0.19,
        };

        let decoded = codec().decode(&codec().encode(&state)).unwrap();
        assert_eq!(decoded.speed_kph, 0.1);
        assert_eq!(decoded.coolant_temp_c, -0.1);
    }

    #[test]
    fn test_decode_rejects_other_frames() {
        let other = CanFrame::new(0x200, &[0; 6]).unwrap();
        assert_eq!(
            codec().decode(&other),
            Err(CanError::NotTelemetry {
                expected: 0x100,
                actual: 0x200
            })
        );

        let short = CanFrame::new(0x100, &[0; 4]).unwrap();
        assert_eq!(codec().decode(&short), Err(CanError::TelemetryTooShort(4)));
    }

    #[test]
    fn test_codec_rejects_extended_id() {
        assert_eq!(TelemetryCodec::new(0x1000), Err(CanError::InvalidId(0x1000)));
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_scaling(
            speed in 0.0f32..300.0,
            rpm in any::<u16>(),
            temp in -40.0f32..140.0,
        ) {
            let state = VehicleState {
                speed_kph: speed,
                engine_rpm: rpm,
                coolant_temp_c: temp,
            };

            let decoded = codec().decode(&codec().encode(&state)).unwrap();
            prop_assert_eq!(decoded.engine_rpm, rpm);
            prop_assert!((decoded.speed_kph - speed).abs() <= 0.1 + 1e-3);
            prop_assert!((decoded.coolant_temp_c - temp).abs() <= 0.1 + 1e-3);
        }
    }
}
