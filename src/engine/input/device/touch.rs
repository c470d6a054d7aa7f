// Touch device: eight contacts with down state, position and pressure

use super::{ButtonWriter, DeviceBackend, DeviceState, DeviceVariant};
use crate::engine::input::button::{ButtonType, DeviceButtonId};
use crate::engine::input::event::{
    AndroidInputEvent, AndroidSource, PlatformEvent, TouchPhase, WindowInput,
    AMOTION_ACTION_CANCEL, AMOTION_ACTION_DOWN, AMOTION_ACTION_MOVE, AMOTION_ACTION_POINTER_DOWN,
    AMOTION_ACTION_POINTER_UP, AMOTION_ACTION_UP,
};
use log::debug;

/// Simultaneous contacts tracked per touch device
pub const TOUCH_POINT_COUNT: usize = 8;

/// Buttons per contact: down, x, y, pressure
pub const TOUCH_BUTTONS_PER_POINT: usize = 4;

pub const TOUCH_BUTTON_COUNT: usize = TOUCH_POINT_COUNT * TOUCH_BUTTONS_PER_POINT;

pub const TOUCH_BUTTON_NAMES: [&str; TOUCH_BUTTON_COUNT] = [
    "touch_0_down", "touch_0_x", "touch_0_y", "touch_0_pressure",
    "touch_1_down", "touch_1_x", "touch_1_y", "touch_1_pressure",
    "touch_2_down", "touch_2_x", "touch_2_y", "touch_2_pressure",
    "touch_3_down", "touch_3_x", "touch_3_y", "touch_3_pressure",
    "touch_4_down", "touch_4_x", "touch_4_y", "touch_4_pressure",
    "touch_5_down", "touch_5_x", "touch_5_y", "touch_5_pressure",
    "touch_6_down", "touch_6_x", "touch_6_y", "touch_6_pressure",
    "touch_7_down", "touch_7_x", "touch_7_y", "touch_7_pressure",
];

pub fn touch_down(point: u32) -> DeviceButtonId {
    point * 4
}

pub fn touch_x(point: u32) -> DeviceButtonId {
    point * 4 + 1
}

pub fn touch_y(point: u32) -> DeviceButtonId {
    point * 4 + 2
}

pub fn touch_pressure(point: u32) -> DeviceButtonId {
    point * 4 + 3
}

/// Contact index a touch button belongs to
pub fn touch_user(button: DeviceButtonId) -> u32 {
    button / 4
}

/// Axis of a touch button: -1 for down, 0 for x, 1 for y, 2 for pressure
pub fn touch_axis(button: DeviceButtonId) -> i32 {
    (button % 4) as i32 - 1
}

pub fn touch_button_type(button: DeviceButtonId) -> ButtonType {
    if button % 4 == 0 {
        ButtonType::Bool
    } else {
        ButtonType::Float
    }
}

/// Write one contact
fn write_contact(point: u32, down: bool, x: f32, y: f32, pressure: f32, out: &mut ButtonWriter<'_>) {
    out.set_bool(touch_down(point), down);
    out.set_float(touch_x(point), x);
    out.set_float(touch_y(point), y);
    out.set_float(touch_pressure(point), pressure);
}

/// Touch surface fed by winit touch events.
///
/// winit finger ids are assigned to the lowest free contact slot.
#[derive(Debug, Default)]
pub struct WinitTouch {
    slots: [Option<u64>; TOUCH_POINT_COUNT],
}

impl WinitTouch {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_of(&self, id: u64) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(id))
    }
}

impl DeviceBackend for WinitTouch {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Touch"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        let PlatformEvent::Window(WindowInput::Touch {
            id,
            phase,
            x,
            y,
            force,
        }) = event
        else {
            return;
        };

        match phase {
            TouchPhase::Started => {
                let slot = self.slot_of(*id).or_else(|| self.slots.iter().position(Option::is_none));
                match slot {
                    Some(slot) => {
                        self.slots[slot] = Some(*id);
                        write_contact(slot as u32, true, *x, *y, *force, out);
                    }
                    None => debug!("Touch {} dropped: all contacts in use", id),
                }
            }
            TouchPhase::Moved => {
                if let Some(slot) = self.slot_of(*id) {
                    write_contact(slot as u32, true, *x, *y, *force, out);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if let Some(slot) = self.slot_of(*id) {
                    self.slots[slot] = None;
                    write_contact(slot as u32, false, *x, *y, 0.0, out);
                }
            }
        }
    }
}

/// Touch surface fed by Android touchscreen motion events
#[derive(Debug, Default)]
pub struct AndroidTouch;

impl AndroidTouch {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceBackend for AndroidTouch {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Touch"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        let PlatformEvent::Android(AndroidInputEvent::Motion {
            source: AndroidSource::Touchscreen,
            action,
            pointers,
            ..
        }) = event
        else {
            return;
        };

        let (action, pointer_index) = AndroidInputEvent::motion_action(*action);
        match action {
            AMOTION_ACTION_DOWN | AMOTION_ACTION_MOVE => {
                for pointer in pointers.iter().filter(|p| (p.id as usize) < TOUCH_POINT_COUNT) {
                    write_contact(pointer.id as u32, true, pointer.x, pointer.y, pointer.pressure, out);
                }
            }
            AMOTION_ACTION_POINTER_DOWN | AMOTION_ACTION_POINTER_UP => {
                if let Some(pointer) = pointers.get(pointer_index) {
                    if (pointer.id as usize) < TOUCH_POINT_COUNT {
                        let down = action == AMOTION_ACTION_POINTER_DOWN;
                        let pressure = if down { pointer.pressure } else { 0.0 };
                        write_contact(pointer.id as u32, down, pointer.x, pointer.y, pressure, out);
                    }
                }
            }
            AMOTION_ACTION_UP | AMOTION_ACTION_CANCEL => {
                // Last contact lifted: release everything still down
                for point in 0..TOUCH_POINT_COUNT as u32 {
                    if out.get_bool(touch_down(point)) {
                        out.set_bool(touch_down(point), false);
                        out.set_float(touch_pressure(point), 0.0);
                    }
                }
                for pointer in pointers.iter().filter(|p| (p.id as usize) < TOUCH_POINT_COUNT) {
                    out.set_float(touch_x(pointer.id as u32), pointer.x);
                    out.set_float(touch_y(pointer.id as u32), pointer.y);
                }
            }
            _ => debug!("Unhandled touch action {}", action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::button::DeviceId;
    use crate::engine::input::event::{AndroidPointer, AMOTION_ACTION_POINTER_INDEX_SHIFT};
    use crate::engine::input::state::InputState;

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> PlatformEvent {
        PlatformEvent::Window(WindowInput::Touch {
            id,
            phase,
            x,
            y,
            force: 1.0,
        })
    }

    #[test]
    fn test_button_layout() {
        assert_eq!(touch_down(1), 4);
        assert_eq!(touch_x(1), 5);
        assert_eq!(touch_y(1), 6);
        assert_eq!(touch_pressure(1), 7);
        assert_eq!(touch_user(6), 1);
        assert_eq!(touch_axis(5), 0);
        assert_eq!(touch_axis(6), 1);
        assert_eq!(touch_axis(4), -1);
        assert_eq!(TOUCH_BUTTON_NAMES[touch_y(2) as usize], "touch_2_y");
        assert_eq!(touch_button_type(8), ButtonType::Bool);
        assert_eq!(touch_button_type(9), ButtonType::Float);
    }

    #[test]
    fn test_winit_slots() {
        let mut device = WinitTouch::new();
        let mut state = InputState::new(TOUCH_BUTTON_COUNT);
        let dead_zones = vec![0.0; TOUCH_BUTTON_COUNT];
        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, None, &dead_zones);

        device.handle_event(&touch(40, TouchPhase::Started, 10.0, 20.0), &mut out);
        device.handle_event(&touch(41, TouchPhase::Started, 30.0, 40.0), &mut out);
        device.handle_event(&touch(40, TouchPhase::Ended, 12.0, 22.0), &mut out);
        device.handle_event(&touch(42, TouchPhase::Started, 50.0, 60.0), &mut out);

        // Finger 42 reuses the slot freed by finger 40
        assert!(state.get_bool(touch_down(0)));
        assert_eq!(state.get_float(touch_x(0)), 50.0);
        assert!(state.get_bool(touch_down(1)));
        assert_eq!(state.get_float(touch_y(1)), 40.0);
    }

    #[test]
    fn test_android_pointer_down_up() {
        let mut device = AndroidTouch::new();
        let mut state = InputState::new(TOUCH_BUTTON_COUNT);
        let dead_zones = vec![0.0; TOUCH_BUTTON_COUNT];
        let pointers = vec![
            AndroidPointer { id: 0, x: 1.0, y: 2.0, pressure: 0.5 },
            AndroidPointer { id: 1, x: 3.0, y: 4.0, pressure: 0.7 },
        ];
        let motion = |action: i32| {
            PlatformEvent::Android(AndroidInputEvent::Motion {
                source: AndroidSource::Touchscreen,
                action,
                pointers: pointers.clone(),
                axes: Vec::new(),
                device_index: 0,
            })
        };

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, None, &dead_zones);
        device.handle_event(&motion(AMOTION_ACTION_DOWN), &mut out);
        device.handle_event(
            &motion(AMOTION_ACTION_POINTER_UP | (1 << AMOTION_ACTION_POINTER_INDEX_SHIFT)),
            &mut out,
        );
        assert!(out.get_bool(touch_down(0)));
        assert!(!out.get_bool(touch_down(1)));

        device.handle_event(&motion(AMOTION_ACTION_UP), &mut out);
        assert!(!state.get_bool(touch_down(0)));
    }
}
