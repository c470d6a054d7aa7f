// Mouse device: buttons, wheel pulses and pointer axes

use super::{ButtonWriter, DeviceBackend, DeviceState, DeviceVariant};
use crate::engine::input::button::{ButtonType, DeviceButtonId};
use crate::engine::input::event::{PlatformEvent, WindowInput};
use log::debug;
use winit::event::MouseButton as WinitMouseButton;

/// Canonical mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    Button5,
    Button6,
    Button7,
    Button8,
    Button9,
    Button10,
    Button11,
    Button12,
    Button13,
    Button14,
    Button15,
    Button16,
    Button17,
    Button18,
    Button19,
    Button20,
    AxisX,
    AxisY,
}

pub const MOUSE_BUTTON_COUNT: usize = MOUSE_BUTTON_NAMES.len();

pub const MOUSE_BUTTON_NAMES: [(MouseButton, &str); 23] = [
    (MouseButton::Left, "mouse_left"),
    (MouseButton::Middle, "mouse_middle"),
    (MouseButton::Right, "mouse_right"),
    (MouseButton::WheelUp, "mouse_wheel_up"),
    (MouseButton::WheelDown, "mouse_wheel_down"),
    (MouseButton::Button5, "mouse_5"),
    (MouseButton::Button6, "mouse_6"),
    (MouseButton::Button7, "mouse_7"),
    (MouseButton::Button8, "mouse_8"),
    (MouseButton::Button9, "mouse_9"),
    (MouseButton::Button10, "mouse_10"),
    (MouseButton::Button11, "mouse_11"),
    (MouseButton::Button12, "mouse_12"),
    (MouseButton::Button13, "mouse_13"),
    (MouseButton::Button14, "mouse_14"),
    (MouseButton::Button15, "mouse_15"),
    (MouseButton::Button16, "mouse_16"),
    (MouseButton::Button17, "mouse_17"),
    (MouseButton::Button18, "mouse_18"),
    (MouseButton::Button19, "mouse_19"),
    (MouseButton::Button20, "mouse_20"),
    (MouseButton::AxisX, "mouse_x"),
    (MouseButton::AxisY, "mouse_y"),
];

impl MouseButton {
    pub fn id(self) -> DeviceButtonId {
        self as DeviceButtonId
    }

    pub fn from_id(id: DeviceButtonId) -> Option<MouseButton> {
        MOUSE_BUTTON_NAMES.get(id as usize).map(|(button, _)| *button)
    }

    pub fn name(self) -> &'static str {
        MOUSE_BUTTON_NAMES[self as usize].1
    }

    pub fn button_type(self) -> ButtonType {
        match self {
            MouseButton::AxisX | MouseButton::AxisY => ButtonType::Float,
            _ => ButtonType::Bool,
        }
    }

    /// Canonical button for a winit button
    pub fn from_winit(button: WinitMouseButton) -> Option<MouseButton> {
        match button {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Back => Some(MouseButton::Button5),
            WinitMouseButton::Forward => Some(MouseButton::Button6),
            WinitMouseButton::Other(n) => {
                // Extra buttons continue after Forward
                let id = MouseButton::Button5.id() + u32::from(n);
                MouseButton::from_id(id).filter(|b| b.button_type() == ButtonType::Bool)
            }
        }
    }
}

/// Wheel buttons written this frame, released on a later update
#[derive(Debug, Clone, Copy, Default)]
struct WheelPulse {
    up: bool,
    down: bool,
}

/// Standard mouse: absolute cursor position and buttons from the window
#[derive(Debug, Default)]
pub struct WinitMouse {
    wheel: WheelPulse,
}

impl WinitMouse {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Release wheel buttons that were not pressed again since the last update
fn release_wheel(pulse: &mut WheelPulse, out: &mut ButtonWriter<'_>) {
    if !pulse.up && out.get_bool(MouseButton::WheelUp.id()) {
        out.set_bool(MouseButton::WheelUp.id(), false);
    }
    if !pulse.down && out.get_bool(MouseButton::WheelDown.id()) {
        out.set_bool(MouseButton::WheelDown.id(), false);
    }
    *pulse = WheelPulse::default();
}

fn handle_wheel(pulse: &mut WheelPulse, delta_y: f32, out: &mut ButtonWriter<'_>) {
    if delta_y > 0.0 {
        pulse.up = true;
        out.set_bool(MouseButton::WheelUp.id(), true);
    } else if delta_y < 0.0 {
        pulse.down = true;
        out.set_bool(MouseButton::WheelDown.id(), true);
    }
}

fn handle_button(button: WinitMouseButton, pressed: bool, out: &mut ButtonWriter<'_>) {
    match MouseButton::from_winit(button) {
        Some(button) => out.set_bool(button.id(), pressed),
        None => debug!("Unmapped mouse button {:?}", button),
    }
}

impl DeviceBackend for WinitMouse {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Mouse"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Window(WindowInput::CursorMoved { x, y }) => {
                out.set_float(MouseButton::AxisX.id(), *x);
                out.set_float(MouseButton::AxisY.id(), *y);
            }
            PlatformEvent::Window(WindowInput::MouseButton { button, pressed }) => {
                handle_button(*button, *pressed, out);
            }
            PlatformEvent::Window(WindowInput::MouseWheel { delta_y }) => {
                handle_wheel(&mut self.wheel, *delta_y, out);
            }
            _ => {}
        }
    }

    fn update(&mut self, out: &mut ButtonWriter<'_>) {
        release_wheel(&mut self.wheel, out);
    }
}

/// Raw mouse: unaccelerated motion summed into a virtual position.
///
/// The axes never reset, so consumers read motion as the difference between
/// two reports. Both axes are reported together on every motion event.
#[derive(Debug, Default)]
pub struct RawMouse {
    wheel: WheelPulse,
}

impl RawMouse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceBackend for RawMouse {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Raw
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Raw Mouse"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Window(WindowInput::RawMouseMotion { dx, dy }) => {
                let x = out.get_float(MouseButton::AxisX.id()) + dx;
                let y = out.get_float(MouseButton::AxisY.id()) + dy;
                out.set_float_pair(MouseButton::AxisX.id(), x, MouseButton::AxisY.id(), y);
            }
            PlatformEvent::Window(WindowInput::MouseButton { button, pressed }) => {
                handle_button(*button, *pressed, out);
            }
            PlatformEvent::Window(WindowInput::MouseWheel { delta_y }) => {
                handle_wheel(&mut self.wheel, *delta_y, out);
            }
            _ => {}
        }
    }

    fn update(&mut self, out: &mut ButtonWriter<'_>) {
        release_wheel(&mut self.wheel, out);
    }
}
