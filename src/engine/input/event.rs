// Platform-neutral raw input events
//
// Device backends consume these. Window events come from winit; HID reports and
// Android input events are described by plain structs so callback threads can
// build them without touching the window system.

use winit::event::{
    DeviceEvent, ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta,
    TouchPhase as WinitTouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Raw event handed to `InputManager::handle_event`
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Window(WindowInput),
    Hid(HidEvent),
    Android(AndroidInputEvent),
}

/// Phase of a touch contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

impl From<WinitTouchPhase> for TouchPhase {
    fn from(phase: WinitTouchPhase) -> Self {
        match phase {
            WinitTouchPhase::Started => TouchPhase::Started,
            WinitTouchPhase::Moved => TouchPhase::Moved,
            WinitTouchPhase::Ended => TouchPhase::Ended,
            WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
        }
    }
}

/// Window-system input (desktop message pump)
#[derive(Debug, Clone, PartialEq)]
pub enum WindowInput {
    KeyboardKey {
        code: KeyCode,
        pressed: bool,
        repeat: bool,
    },
    Text(char),
    CursorMoved {
        x: f32,
        y: f32,
    },
    MouseButton {
        button: WinitMouseButton,
        pressed: bool,
    },
    MouseWheel {
        delta_y: f32,
    },
    /// Unaccelerated motion since the last report
    RawMouseMotion {
        dx: f32,
        dy: f32,
    },
    Touch {
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
        force: f32,
    },
    FocusLost,
}

/// Kind of device a HID match callback reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidDeviceKind {
    Keyboard,
    Gamepad,
}

/// Properties of a matched HID device
#[derive(Debug, Clone, PartialEq)]
pub struct HidDeviceInfo {
    pub vendor_id: u32,
    pub product_id: u32,
    pub serial: u64,
    pub product_name: String,
    pub kind: HidDeviceKind,
}

/// One HID element value report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HidValue {
    /// Serial of the device that produced the report
    pub serial: u64,
    pub usage_page: u32,
    pub usage: u32,
    pub integer_value: i64,
    pub scaled_value: f32,
    pub physical_min: f32,
    pub physical_max: f32,
    pub report_count: u32,
}

/// IOKit style HID callback events
#[derive(Debug, Clone, PartialEq)]
pub enum HidEvent {
    DeviceMatched(HidDeviceInfo),
    DeviceRemoved { serial: u64 },
    Value(HidValue),
}

pub const HID_PAGE_GENERIC_DESKTOP: u32 = 0x01;
pub const HID_PAGE_KEYBOARD: u32 = 0x07;
pub const HID_PAGE_BUTTON: u32 = 0x09;
pub const HID_PAGE_VENDOR_START: u32 = 0xFF00;

pub const HID_USAGE_GD_POINTER: u32 = 0x01;
pub const HID_USAGE_GD_X: u32 = 0x30;
pub const HID_USAGE_GD_Y: u32 = 0x31;
pub const HID_USAGE_GD_Z: u32 = 0x32;
pub const HID_USAGE_GD_RX: u32 = 0x33;
pub const HID_USAGE_GD_RY: u32 = 0x34;
pub const HID_USAGE_GD_RZ: u32 = 0x35;
pub const HID_USAGE_GD_HATSWITCH: u32 = 0x39;
pub const HID_USAGE_GD_DPAD_UP: u32 = 0x90;
pub const HID_USAGE_GD_DPAD_DOWN: u32 = 0x91;
pub const HID_USAGE_GD_DPAD_RIGHT: u32 = 0x92;
pub const HID_USAGE_GD_DPAD_LEFT: u32 = 0x93;

/// Android key action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidKeyAction {
    Down,
    Up,
}

/// Source class of an Android input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidSource {
    Keyboard,
    Gamepad,
    Touchscreen,
    Joystick,
}

/// One pointer of an Android motion event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AndroidPointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
}

pub const AMOTION_ACTION_DOWN: i32 = 0;
pub const AMOTION_ACTION_UP: i32 = 1;
pub const AMOTION_ACTION_MOVE: i32 = 2;
pub const AMOTION_ACTION_CANCEL: i32 = 3;
pub const AMOTION_ACTION_POINTER_DOWN: i32 = 5;
pub const AMOTION_ACTION_POINTER_UP: i32 = 6;
pub const AMOTION_ACTION_MASK: i32 = 0xff;
pub const AMOTION_ACTION_POINTER_INDEX_SHIFT: i32 = 8;

/// Android `AInputEvent` contents
#[derive(Debug, Clone, PartialEq)]
pub enum AndroidInputEvent {
    Key {
        key_code: i32,
        action: AndroidKeyAction,
        source: AndroidSource,
        /// Which pad slot produced the event (gamepad sources)
        device_index: u32,
        /// Character produced by the key, 0 if none
        unicode: u32,
    },
    Motion {
        source: AndroidSource,
        /// Raw action, pointer index in bits 8..16
        action: i32,
        pointers: Vec<AndroidPointer>,
        /// (axis id, value) pairs for joystick sources
        axes: Vec<(i32, f32)>,
        device_index: u32,
    },
}

impl AndroidInputEvent {
    /// Masked motion action and the pointer index it refers to
    pub fn motion_action(action: i32) -> (i32, usize) {
        let masked = action & AMOTION_ACTION_MASK;
        let index = ((action >> AMOTION_ACTION_POINTER_INDEX_SHIFT) & 0xff) as usize;
        (masked, index)
    }
}

/// Convert a winit window event into platform events.
///
/// Key events carrying text also produce one `Text` event per character.
pub fn from_window_event(event: &WindowEvent) -> Vec<PlatformEvent> {
    let mut out = Vec::new();
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let pressed = event.state == ElementState::Pressed;
            if let PhysicalKey::Code(code) = event.physical_key {
                out.push(PlatformEvent::Window(WindowInput::KeyboardKey {
                    code,
                    pressed,
                    repeat: event.repeat,
                }));
            }
            if pressed {
                if let Some(text) = &event.text {
                    for c in text.chars().filter(|c| !c.is_control()) {
                        out.push(PlatformEvent::Window(WindowInput::Text(c)));
                    }
                }
            }
        }
        WindowEvent::Ime(Ime::Commit(text)) => {
            for c in text.chars() {
                out.push(PlatformEvent::Window(WindowInput::Text(c)));
            }
        }
        WindowEvent::CursorMoved { position, .. } => {
            out.push(PlatformEvent::Window(WindowInput::CursorMoved {
                x: position.x as f32,
                y: position.y as f32,
            }));
        }
        WindowEvent::MouseInput { state, button, .. } => {
            out.push(PlatformEvent::Window(WindowInput::MouseButton {
                button: *button,
                pressed: *state == ElementState::Pressed,
            }));
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let delta_y = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
            };
            out.push(PlatformEvent::Window(WindowInput::MouseWheel { delta_y }));
        }
        WindowEvent::Touch(touch) => {
            out.push(PlatformEvent::Window(WindowInput::Touch {
                id: touch.id,
                phase: touch.phase.into(),
                x: touch.location.x as f32,
                y: touch.location.y as f32,
                force: touch.force.map(|f| f.normalized() as f32).unwrap_or(1.0),
            }));
        }
        WindowEvent::Focused(false) => {
            out.push(PlatformEvent::Window(WindowInput::FocusLost));
        }
        _ => {}
    }
    out
}

/// Convert a winit device event (raw mouse motion) into a platform event
pub fn from_device_event(event: &DeviceEvent) -> Option<PlatformEvent> {
    match event {
        DeviceEvent::MouseMotion { delta } => {
            Some(PlatformEvent::Window(WindowInput::RawMouseMotion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            }))
        }
        _ => None,
    }
}
