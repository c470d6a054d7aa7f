// Logical bindings an action can be attached to

use crate::engine::input::device::keyboard::Key;

/// What kind of value a binding produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Button,
    Float,
    Text,
}

/// Logical input an action listens to.
///
/// Named buttons fan out to every physical button the binding tables map
/// them to (pad, keyboard, mouse, touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Every mapped pad, keyboard and mouse button (touch 0 in touch mode)
    Any,
    DpadLeft,
    DpadRight,
    DpadUp,
    DpadDown,
    South,
    East,
    West,
    North,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Start,
    Select,
    Touch,
    Home,
    /// Alt+Return combo
    Fullscreen,
    /// Start+B pad combo, or its keyboard key
    Dump,
    Exit,
    Back,
    KeyLeft,
    KeyRight,
    KeyShiftL,
    KeyShiftR,
    KeyHome,
    KeyEnd,
    KeyDelete,
    MouseRight,
    MouseMiddle,
    MouseScrollUp,
    MouseScrollDown,
    /// One keyboard key, independent of the binding tables
    Key(Key),

    FloatL2,
    FloatR2,
    FloatLeftStick,
    FloatRightStick,
    /// Pad D-pad as a 2D composite
    FloatDpad,
    FloatMouseWheel,

    /// Keyboard text typed during the frame
    Text,
}

impl InputBinding {
    pub fn kind(self) -> BindingKind {
        match self {
            InputBinding::FloatL2
            | InputBinding::FloatR2
            | InputBinding::FloatLeftStick
            | InputBinding::FloatRightStick
            | InputBinding::FloatDpad
            | InputBinding::FloatMouseWheel => BindingKind::Float,
            InputBinding::Text => BindingKind::Text,
            _ => BindingKind::Button,
        }
    }

    pub fn is_button(self) -> bool {
        self.kind() == BindingKind::Button
    }

    pub fn is_float(self) -> bool {
        self.kind() == BindingKind::Float
    }
}
