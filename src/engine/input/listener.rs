// Listener and state modifier hooks of the input manager

use super::button::{DeviceButtonId, DeviceId};
use super::device::{DeviceType, InputDevice};
use super::state::InputDeltaState;

/// Read-only view of the manager handed to listeners during notification
pub struct ManagerView<'a> {
    devices: &'a [InputDevice],
    time_ms: u64,
    display_size: (u32, u32),
}

impl<'a> ManagerView<'a> {
    pub fn new(devices: &'a [InputDevice], time_ms: u64, display_size: (u32, u32)) -> Self {
        Self {
            devices,
            time_ms,
            display_size,
        }
    }

    pub fn device(&self, id: DeviceId) -> Option<&'a InputDevice> {
        self.devices.get(id.index())
    }

    pub fn devices(&self) -> &'a [InputDevice] {
        self.devices
    }

    pub fn find_device_id(&self, kind: DeviceType, index: u32) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|d| d.kind() == kind && d.index() == index)
            .map(|d| d.id())
    }

    /// Manager time at the start of notification
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }
}

/// Receives every button change of an update, in the order it was recorded.
///
/// Returning false stops the change from reaching lower priority listeners.
pub trait InputListener {
    fn on_device_button_bool(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        old_value: bool,
        new_value: bool,
    ) -> bool;

    fn on_device_button_float(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        old_value: f32,
        new_value: f32,
    ) -> bool;

    /// Higher priorities are notified first
    fn priority(&self) -> i32 {
        0
    }
}

/// Runs after the devices updated and before listeners are notified.
///
/// Used to drive synced devices (playback).
pub trait DeviceStateModifier {
    fn update(
        &mut self,
        devices: &mut [InputDevice],
        time_ms: u64,
        delta: Option<&mut InputDeltaState>,
    );
}
