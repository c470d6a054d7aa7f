// Button state storage and the per-frame change log

use super::button::{ButtonType, ButtonValue, DeviceButtonId, DeviceId};
use crate::core::math::apply_dead_zone;

/// Values of every button of one device.
///
/// Bools are stored as 0.0 / 1.0 so a single slot type covers both kinds.
/// Reads outside the device's button range return the default value.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    values: Vec<f32>,
}

impl InputState {
    /// Create a state with `button_count` slots, all released
    pub fn new(button_count: usize) -> Self {
        Self {
            values: vec![0.0; button_count],
        }
    }

    /// Number of button slots
    pub fn button_count(&self) -> usize {
        self.values.len()
    }

    pub fn get_bool(&self, button: DeviceButtonId) -> bool {
        self.get_float(button) != 0.0
    }

    pub fn get_float(&self, button: DeviceButtonId) -> f32 {
        self.values.get(button as usize).copied().unwrap_or(0.0)
    }

    /// Read a slot as the given type
    pub fn get(&self, button: DeviceButtonId, button_type: ButtonType) -> ButtonValue {
        match button_type {
            ButtonType::Bool => ButtonValue::Bool(self.get_bool(button)),
            ButtonType::Float => ButtonValue::Float(self.get_float(button)),
        }
    }

    pub fn set_bool(&mut self, button: DeviceButtonId, value: bool) {
        self.set_float(button, if value { 1.0 } else { 0.0 });
    }

    pub fn set_float(&mut self, button: DeviceButtonId, value: f32) {
        if let Some(slot) = self.values.get_mut(button as usize) {
            *slot = value;
        }
    }

    /// Release every button
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Copy all values from another state of the same device
    pub fn copy_from(&mut self, other: &InputState) {
        self.values.clear();
        self.values.extend_from_slice(&other.values);
    }
}

/// One recorded button change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonChange {
    pub device_id: DeviceId,
    pub button_id: DeviceButtonId,
    pub old_value: ButtonValue,
    pub new_value: ButtonValue,
}

impl ButtonChange {
    pub fn button_type(&self) -> ButtonType {
        self.new_value.button_type()
    }
}

/// Ordered log of the changes made during one update.
///
/// Consumed by the manager's listener notification, then cleared.
#[derive(Debug, Clone, Default)]
pub struct InputDeltaState {
    changes: Vec<ButtonChange>,
}

impl InputDeltaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_change(
        &mut self,
        device_id: DeviceId,
        button_id: DeviceButtonId,
        old_value: ButtonValue,
        new_value: ButtonValue,
    ) {
        self.changes.push(ButtonChange {
            device_id,
            button_id,
            old_value,
            new_value,
        });
    }

    /// Changes in insertion order
    pub fn changes(&self) -> &[ButtonChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Take all recorded changes, leaving the log empty
    pub fn take(&mut self) -> Vec<ButtonChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

/// Write a bool button into `state`, logging a change when the value differs.
pub fn handle_button(
    device_id: DeviceId,
    state: &mut InputState,
    delta: Option<&mut InputDeltaState>,
    button: DeviceButtonId,
    value: bool,
) {
    let old = state.get_bool(button);
    if old != value {
        if let Some(delta) = delta {
            delta.add_change(
                device_id,
                button,
                ButtonValue::Bool(old),
                ButtonValue::Bool(value),
            );
        }
    }
    state.set_bool(button, value);
}

/// Write a float button into `state` after applying `dead_zone`.
///
/// A change is logged only when the stored value actually moves.
pub fn handle_axis(
    device_id: DeviceId,
    state: &mut InputState,
    delta: Option<&mut InputDeltaState>,
    dead_zone: f32,
    button: DeviceButtonId,
    value: f32,
) {
    let value = apply_dead_zone(value, dead_zone);
    let old = state.get_float(button);
    if old != value {
        if let Some(delta) = delta {
            delta.add_change(
                device_id,
                button,
                ButtonValue::Float(old),
                ButtonValue::Float(value),
            );
        }
    }
    state.set_float(button, value);
}

/// Log the current value of a float button again without changing it.
///
/// Used for the partner axis of a stick so both components arrive together.
pub fn reemit_axis(
    device_id: DeviceId,
    state: &InputState,
    delta: Option<&mut InputDeltaState>,
    button: DeviceButtonId,
) {
    if let Some(delta) = delta {
        let value = ButtonValue::Float(state.get_float(button));
        delta.add_change(device_id, button, value, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dev() -> DeviceId {
        DeviceId::from_raw(0)
    }

    #[test]
    fn test_state_defaults_and_out_of_range() {
        let mut state = InputState::new(4);
        assert!(!state.get_bool(0));
        assert_eq!(state.get_float(3), 0.0);

        // Out of range writes are ignored, reads return defaults
        state.set_bool(10, true);
        assert!(!state.get_bool(10));
        assert_eq!(state.get(10, ButtonType::Float), ButtonValue::Float(0.0));
    }

    #[test]
    fn test_handle_button_records_only_changes() {
        let mut state = InputState::new(4);
        let mut delta = InputDeltaState::new();

        handle_button(dev(), &mut state, Some(&mut delta), 1, true);
        handle_button(dev(), &mut state, Some(&mut delta), 1, true);
        assert!(state.get_bool(1));
        assert_eq!(delta.len(), 1);

        let change = delta.changes()[0];
        assert_eq!(change.old_value, ButtonValue::Bool(false));
        assert_eq!(change.new_value, ButtonValue::Bool(true));

        handle_button(dev(), &mut state, Some(&mut delta), 1, false);
        assert_eq!(delta.len(), 2);
    }

    #[test]
    fn test_handle_button_without_delta() {
        let mut state = InputState::new(2);
        handle_button(dev(), &mut state, None, 0, true);
        assert!(state.get_bool(0));
    }

    #[test]
    fn test_handle_axis_dead_zone() {
        let mut state = InputState::new(2);
        let mut delta = InputDeltaState::new();

        handle_axis(dev(), &mut state, Some(&mut delta), 0.15, 0, 0.1);
        assert_eq!(state.get_float(0), 0.0);
        assert!(delta.is_empty());

        handle_axis(dev(), &mut state, Some(&mut delta), 0.15, 0, 1.0);
        assert_relative_eq!(state.get_float(0), 1.0);
        assert_eq!(delta.len(), 1);
    }

    #[test]
    fn test_reemit_axis_keeps_value() {
        let mut state = InputState::new(2);
        let mut delta = InputDeltaState::new();
        state.set_float(1, 0.3);

        reemit_axis(dev(), &state, Some(&mut delta), 1);
        let change = delta.changes()[0];
        assert_eq!(change.old_value, change.new_value);
        assert_eq!(change.new_value, ButtonValue::Float(0.3));
    }

    #[test]
    fn test_delta_take_and_clear() {
        let mut delta = InputDeltaState::new();
        delta.add_change(dev(), 0, ButtonValue::Bool(false), ButtonValue::Bool(true));
        delta.add_change(dev(), 1, ButtonValue::Bool(false), ButtonValue::Bool(true));

        let taken = delta.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].button_id, 0);
        assert!(delta.is_empty());
    }
}
