// Gamepad backend for Android key and joystick motion events

use super::pad::PadButton;
use super::{ButtonWriter, DeviceBackend, DeviceState, DeviceVariant};
use crate::engine::input::event::{AndroidInputEvent, AndroidKeyAction, AndroidSource, PlatformEvent};
use log::{debug, info};
use std::collections::HashMap;

const AXIS_X: i32 = 0;
const AXIS_Y: i32 = 1;
const AXIS_Z: i32 = 11;
const AXIS_RZ: i32 = 14;
const AXIS_HAT_X: i32 = 15;
const AXIS_HAT_Y: i32 = 16;
const AXIS_LTRIGGER: i32 = 17;
const AXIS_RTRIGGER: i32 = 18;
const AXIS_GAS: i32 = 22;
const AXIS_BRAKE: i32 = 23;

/// `AKEYCODE_*` gamepad buttons
pub fn android_pad_dialect() -> HashMap<i32, PadButton> {
    HashMap::from([
        (19, PadButton::Up),
        (20, PadButton::Down),
        (21, PadButton::Left),
        (22, PadButton::Right),
        (96, PadButton::A),
        (97, PadButton::B),
        (99, PadButton::X),
        (100, PadButton::Y),
        (102, PadButton::L1),
        (103, PadButton::R1),
        (104, PadButton::L2),
        (105, PadButton::R2),
        (106, PadButton::L3),
        (107, PadButton::R3),
        (108, PadButton::Start),
        (109, PadButton::Select),
        (110, PadButton::Home),
    ])
}

/// Pad fed by Android input events for one controller slot
pub struct AndroidPad {
    index: u32,
    available: bool,
    dialect: HashMap<i32, PadButton>,
}

impl AndroidPad {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            available: false,
            dialect: android_pad_dialect(),
        }
    }

    fn mark_available(&mut self) {
        if !self.available {
            info!("Pad {} connected", self.index);
            self.available = true;
        }
    }

    fn handle_axis(&self, axis: i32, value: f32, sticks: &mut [StickReport; 2], out: &mut ButtonWriter<'_>) {
        match axis {
            AXIS_X => sticks[0].x = Some(value),
            AXIS_Y => sticks[0].y = Some(-value),
            AXIS_Z => sticks[1].x = Some(value),
            AXIS_RZ => sticks[1].y = Some(-value),
            AXIS_HAT_X => {
                out.set_bool(PadButton::Left.id(), value < -0.5);
                out.set_bool(PadButton::Right.id(), value > 0.5);
            }
            AXIS_HAT_Y => {
                out.set_bool(PadButton::Up.id(), value < -0.5);
                out.set_bool(PadButton::Down.id(), value > 0.5);
            }
            AXIS_LTRIGGER | AXIS_BRAKE => out.set_float(PadButton::Axis4.id(), value),
            AXIS_RTRIGGER | AXIS_GAS => out.set_float(PadButton::Axis5.id(), value),
            _ => debug!("Unmapped Android pad axis {}", axis),
        }
    }
}

/// Stick components carried by one motion event
#[derive(Debug, Clone, Copy, Default)]
struct StickReport {
    x: Option<f32>,
    y: Option<f32>,
}

impl StickReport {
    /// Write the stick once, keeping the stored value of a missing component
    fn write(self, x: PadButton, y: PadButton, out: &mut ButtonWriter<'_>) {
        if self.x.is_none() && self.y.is_none() {
            return;
        }
        let x_value = self.x.unwrap_or_else(|| out.get_float(x.id()));
        let y_value = self.y.unwrap_or_else(|| out.get_float(y.id()));
        out.set_stick_pair(x, x_value, y, y_value);
    }
}

impl DeviceBackend for AndroidPad {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        if self.available {
            DeviceState::Ok
        } else {
            DeviceState::Unavailable
        }
    }

    fn name(&self) -> &str {
        "Android Gamepad"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Android(AndroidInputEvent::Key {
                key_code,
                action,
                source: AndroidSource::Gamepad,
                device_index,
                ..
            }) if *device_index == self.index => {
                self.mark_available();
                match self.dialect.get(key_code) {
                    Some(button) => out.set_bool(button.id(), *action == AndroidKeyAction::Down),
                    None => debug!("Unmapped Android pad key {}", key_code),
                }
            }
            PlatformEvent::Android(AndroidInputEvent::Motion {
                source: AndroidSource::Joystick,
                axes,
                device_index,
                ..
            }) if *device_index == self.index => {
                self.mark_available();
                let mut sticks = [StickReport::default(); 2];
                for (axis, value) in axes {
                    self.handle_axis(*axis, *value, &mut sticks, out);
                }
                sticks[0].write(PadButton::LeftStickX, PadButton::LeftStickY, out);
                sticks[1].write(PadButton::RightStickX, PadButton::RightStickY, out);
            }
            _ => {}
        }
    }

    fn set_available(&mut self, available: bool) {
        if self.available != available {
            info!(
                "Pad {} {}",
                self.index,
                if available { "connected" } else { "disconnected" }
            );
        }
        self.available = available;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::button::{ButtonValue, DeviceId};
    use crate::engine::input::device::pad::PAD_BUTTON_COUNT;
    use crate::engine::input::state::{InputDeltaState, InputState};

    #[test]
    fn test_dialect_complete() {
        for button in android_pad_dialect().values() {
            assert!((button.id() as usize) < PAD_BUTTON_COUNT);
        }
    }

    #[test]
    fn test_key_for_other_slot_ignored() {
        let mut pad = AndroidPad::new(1);
        let mut state = InputState::new(PAD_BUTTON_COUNT);
        let dead_zones = vec![0.0; PAD_BUTTON_COUNT];
        let event = PlatformEvent::Android(AndroidInputEvent::Key {
            key_code: 96,
            action: AndroidKeyAction::Down,
            source: AndroidSource::Gamepad,
            device_index: 0,
            unicode: 0,
        });

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, None, &dead_zones);
        pad.handle_event(&event, &mut out);
        assert_eq!(pad.state(), DeviceState::Unavailable);
        assert!(!state.get_bool(PadButton::A.id()));
    }

    #[test]
    fn test_buttons_and_axes() {
        let mut pad = AndroidPad::new(0);
        let mut state = InputState::new(PAD_BUTTON_COUNT);
        let dead_zones = vec![0.0; PAD_BUTTON_COUNT];

        let key = PlatformEvent::Android(AndroidInputEvent::Key {
            key_code: 96,
            action: AndroidKeyAction::Down,
            source: AndroidSource::Gamepad,
            device_index: 0,
            unicode: 0,
        });
        let motion = PlatformEvent::Android(AndroidInputEvent::Motion {
            source: AndroidSource::Joystick,
            action: 2,
            pointers: Vec::new(),
            axes: vec![(AXIS_X, 0.5), (AXIS_Y, 0.25), (AXIS_RTRIGGER, 1.0), (AXIS_HAT_X, -1.0)],
            device_index: 0,
        });

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, None, &dead_zones);
        pad.handle_event(&key, &mut out);
        pad.handle_event(&motion, &mut out);

        assert_eq!(pad.state(), DeviceState::Ok);
        assert!(state.get_bool(PadButton::A.id()));
        assert_eq!(state.get_float(PadButton::LeftStickX.id()), 0.5);
        assert_eq!(state.get_float(PadButton::LeftStickY.id()), -0.25);
        assert_eq!(state.get_float(PadButton::Axis5.id()), 1.0);
        assert!(state.get_bool(PadButton::Left.id()));
    }

    fn stick_motion(axes: Vec<(i32, f32)>) -> PlatformEvent {
        PlatformEvent::Android(AndroidInputEvent::Motion {
            source: AndroidSource::Joystick,
            action: 2,
            pointers: Vec::new(),
            axes,
            device_index: 0,
        })
    }

    #[test]
    fn test_stick_pair_logged_once_per_event() {
        let mut pad = AndroidPad::new(0);
        let mut state = InputState::new(PAD_BUTTON_COUNT);
        let mut delta = InputDeltaState::new();
        let dead_zones = vec![0.0; PAD_BUTTON_COUNT];

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, Some(&mut delta), &dead_zones);
        pad.handle_event(&stick_motion(vec![(AXIS_X, 0.5), (AXIS_Y, -0.3)]), &mut out);

        let changes = delta.changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].button_id, PadButton::LeftStickX.id());
        assert_eq!(changes[0].new_value, ButtonValue::Float(0.5));
        assert_eq!(changes[1].button_id, PadButton::LeftStickY.id());
        assert_eq!(changes[1].new_value, ButtonValue::Float(0.3));
    }

    #[test]
    fn test_stick_keeps_missing_component() {
        let mut pad = AndroidPad::new(0);
        let mut state = InputState::new(PAD_BUTTON_COUNT);
        let mut delta = InputDeltaState::new();
        let dead_zones = vec![0.0; PAD_BUTTON_COUNT];
        state.set_float(PadButton::RightStickY.id(), -0.4);

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, Some(&mut delta), &dead_zones);
        pad.handle_event(&stick_motion(vec![(AXIS_Z, 0.2)]), &mut out);
        // Same report again changes nothing
        pad.handle_event(&stick_motion(vec![(AXIS_Z, 0.2)]), &mut out);

        let changes = delta.changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].new_value, ButtonValue::Float(0.2));
        assert_eq!(changes[1].button_id, PadButton::RightStickY.id());
        assert_eq!(changes[1].new_value, ButtonValue::Float(-0.4));
        assert_eq!(state.get_float(PadButton::LeftStickX.id()), 0.0);
    }
}
