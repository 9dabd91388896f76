//! CAN Frame Representation

use crate::{CanError, MAX_STANDARD_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classic CAN frame with a standard identifier
///
/// Produced by the receive interrupt, owned by the RX queue while enqueued,
/// and copied out by the worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanFrame {
    /// Standard CAN ID (11-bit)
    pub(crate) id: u16,
    /// Data length code (0-8)
    pub(crate) dlc: u8,
    /// Data bytes (only the first `dlc` are meaningful)
    pub(crate) data: [u8; 8],
}

impl CanFrame {
    /// Maximum classic CAN payload
    pub const MAX_DLC: usize = 8;

    /// Build a frame, validating the identifier and payload length
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, CanError> {
        if id > MAX_STANDARD_ID {
            return Err(CanError::InvalidId(id));
        }
        if payload.len() > Self::MAX_DLC {
            return Err(CanError::InvalidLength(payload.len()));
        }

        let mut data = [0u8; 8];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            dlc: payload.len() as u8,
            data,
        })
    }

    /// Get the identifier
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get the data length code
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// Get the meaningful payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.dlc as usize]
    }
}

impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID=0x{:03X} DLC={} DATA=", self.id, self.dlc)?;
        for (i, byte) in self.payload().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
