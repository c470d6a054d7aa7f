// Device and button identifiers shared by every device kind

use std::fmt;

/// Button index within one device's ID space
pub type DeviceButtonId = u32;

/// Marker for "no button"
pub const INVALID_DEVICE_BUTTON_ID: DeviceButtonId = u32::MAX;

/// Handle of one registered input device.
///
/// Assigned in creation order by the input manager and never reused while
/// the manager lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u32);

impl DeviceId {
    /// Rebuild a handle from its raw value (used when loading recordings)
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value of the handle
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Position of the device in the registry
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Value type of a device button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonType {
    Bool,
    Float,
}

/// A button value, tagged by its type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonValue {
    Bool(bool),
    Float(f32),
}

impl ButtonValue {
    /// Type of this value
    pub fn button_type(self) -> ButtonType {
        match self {
            ButtonValue::Bool(_) => ButtonType::Bool,
            ButtonValue::Float(_) => ButtonType::Float,
        }
    }

    /// Read as bool (floats are down when non-zero)
    pub fn as_bool(self) -> bool {
        match self {
            ButtonValue::Bool(value) => value,
            ButtonValue::Float(value) => value != 0.0,
        }
    }

    /// Read as float (bools read 0.0 or 1.0)
    pub fn as_float(self) -> f32 {
        match self {
            ButtonValue::Bool(value) => {
                if value {
                    1.0
                } else {
                    0.0
                }
            }
            ButtonValue::Float(value) => value,
        }
    }
}

/// A (device, button) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceButtonSpec {
    pub device_id: DeviceId,
    pub button_id: DeviceButtonId,
}

impl DeviceButtonSpec {
    pub fn new(device_id: DeviceId, button_id: DeviceButtonId) -> Self {
        Self {
            device_id,
            button_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_roundtrip() {
        let id = DeviceId::from_raw(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "device#3");
    }

    #[test]
    fn test_button_value_conversions() {
        assert!(ButtonValue::Bool(true).as_bool());
        assert_eq!(ButtonValue::Bool(true).as_float(), 1.0);
        assert!(!ButtonValue::Float(0.0).as_bool());
        assert!(ButtonValue::Float(-0.5).as_bool());
        assert_eq!(ButtonValue::Float(0.25).as_float(), 0.25);
    }

    #[test]
    fn test_button_value_type() {
        assert_eq!(ButtonValue::Bool(false).button_type(), ButtonType::Bool);
        assert_eq!(ButtonValue::Float(1.0).button_type(), ButtonType::Float);
    }
}
