// Keyboard device: canonical key IDs and the keyboard backends

use super::{ButtonWriter, DeviceBackend, DeviceState, DeviceVariant};
use crate::engine::input::button::DeviceButtonId;
use crate::engine::input::event::{
    AndroidInputEvent, AndroidKeyAction, AndroidSource, HidDeviceKind, HidEvent, PlatformEvent,
    WindowInput, HID_PAGE_KEYBOARD,
};
use log::{debug, info};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Canonical keyboard buttons.
///
/// Discriminants are the device button IDs, in `KEY_NAMES` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Key {
    Escape,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    Print,
    ScrollLock,
    Break,
    Space,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Semicolon,
    Less,
    Equal,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    BracketLeft,
    Backslash,
    BracketRight,
    Grave,
    Left,
    Right,
    Up,
    Down,
    Insert,
    Home,
    Delete,
    End,
    PageUp,
    PageDown,
    NumLock,
    KpEqual,
    KpDivide,
    KpMultiply,
    KpSubtract,
    KpAdd,
    KpEnter,
    KpInsert,
    KpEnd,
    KpDown,
    KpPageDown,
    KpLeft,
    KpBegin,
    KpRight,
    KpHome,
    KpUp,
    KpPageUp,
    KpDelete,
    BackSpace,
    Tab,
    Return,
    CapsLock,
    ShiftL,
    CtrlL,
    SuperL,
    AltL,
    AltR,
    SuperR,
    Menu,
    CtrlR,
    ShiftR,
    Back,
    SoftLeft,
    SoftRight,
    Call,
    Endcall,
    Star,
    Pound,
    DpadCenter,
    VolumeUp,
    VolumeDown,
    Power,
    Camera,
    Clear,
    Symbol,
    Explorer,
    Envelope,
    Equals,
    At,
    Headsethook,
    Focus,
    Plus,
    Notification,
    Search,
    MediaPlayPause,
    MediaStop,
    MediaNext,
    MediaPrevious,
    MediaRewind,
    MediaFastForward,
    Mute,
    Pictsymbols,
    SwitchCharset,
    Forward,
    Extra1,
    Extra2,
    Extra3,
    Extra4,
    Extra5,
    Extra6,
    Fn,
    Circumflex,
    Ssharp,
    Acute,
    AltGr,
    Numbersign,
    Udiaeresis,
    Adiaeresis,
    Odiaeresis,
    Section,
    Aring,
    Diaeresis,
    Twosuperior,
    RightParenthesis,
    Dollar,
    Ugrave,
    Asterisk,
    Colon,
    Exclam,
    BraceLeft,
    BraceRight,
    SysRq,
}

/// Number of keyboard buttons
pub const KEY_COUNT: usize = KEY_NAMES.len();

/// Every key with its button name, indexed by button ID
pub const KEY_NAMES: [(Key, &str); 174] = [
    (Key::Escape, "escape"),
    (Key::F1, "f1"),
    (Key::F2, "f2"),
    (Key::F3, "f3"),
    (Key::F4, "f4"),
    (Key::F5, "f5"),
    (Key::F6, "f6"),
    (Key::F7, "f7"),
    (Key::F8, "f8"),
    (Key::F9, "f9"),
    (Key::F10, "f10"),
    (Key::F11, "f11"),
    (Key::F12, "f12"),
    (Key::F13, "f13"),
    (Key::F14, "f14"),
    (Key::F15, "f15"),
    (Key::F16, "f16"),
    (Key::F17, "f17"),
    (Key::F18, "f18"),
    (Key::F19, "f19"),
    (Key::Print, "print"),
    (Key::ScrollLock, "scroll_lock"),
    (Key::Break, "break"),
    (Key::Space, "space"),
    (Key::Apostrophe, "apostrophe"),
    (Key::Comma, "comma"),
    (Key::Minus, "minus"),
    (Key::Period, "period"),
    (Key::Slash, "slash"),
    (Key::Num0, "0"),
    (Key::Num1, "1"),
    (Key::Num2, "2"),
    (Key::Num3, "3"),
    (Key::Num4, "4"),
    (Key::Num5, "5"),
    (Key::Num6, "6"),
    (Key::Num7, "7"),
    (Key::Num8, "8"),
    (Key::Num9, "9"),
    (Key::Semicolon, "semicolon"),
    (Key::Less, "less"),
    (Key::Equal, "equal"),
    (Key::A, "a"),
    (Key::B, "b"),
    (Key::C, "c"),
    (Key::D, "d"),
    (Key::E, "e"),
    (Key::F, "f"),
    (Key::G, "g"),
    (Key::H, "h"),
    (Key::I, "i"),
    (Key::J, "j"),
    (Key::K, "k"),
    (Key::L, "l"),
    (Key::M, "m"),
    (Key::N, "n"),
    (Key::O, "o"),
    (Key::P, "p"),
    (Key::Q, "q"),
    (Key::R, "r"),
    (Key::S, "s"),
    (Key::T, "t"),
    (Key::U, "u"),
    (Key::V, "v"),
    (Key::W, "w"),
    (Key::X, "x"),
    (Key::Y, "y"),
    (Key::Z, "z"),
    (Key::BracketLeft, "bracket_left"),
    (Key::Backslash, "backslash"),
    (Key::BracketRight, "bracket_right"),
    (Key::Grave, "grave"),
    (Key::Left, "left"),
    (Key::Right, "right"),
    (Key::Up, "up"),
    (Key::Down, "down"),
    (Key::Insert, "insert"),
    (Key::Home, "home"),
    (Key::Delete, "delete"),
    (Key::End, "end"),
    (Key::PageUp, "page_up"),
    (Key::PageDown, "page_down"),
    (Key::NumLock, "num_lock"),
    (Key::KpEqual, "kp_equal"),
    (Key::KpDivide, "kp_divide"),
    (Key::KpMultiply, "kp_multiply"),
    (Key::KpSubtract, "kp_subtract"),
    (Key::KpAdd, "kp_add"),
    (Key::KpEnter, "kp_enter"),
    (Key::KpInsert, "kp_insert"),
    (Key::KpEnd, "kp_end"),
    (Key::KpDown, "kp_down"),
    (Key::KpPageDown, "kp_page_down"),
    (Key::KpLeft, "kp_left"),
    (Key::KpBegin, "kp_begin"),
    (Key::KpRight, "kp_right"),
    (Key::KpHome, "kp_home"),
    (Key::KpUp, "kp_up"),
    (Key::KpPageUp, "kp_page_up"),
    (Key::KpDelete, "kp_delete"),
    (Key::BackSpace, "back_space"),
    (Key::Tab, "tab"),
    (Key::Return, "return"),
    (Key::CapsLock, "caps_lock"),
    (Key::ShiftL, "shift_l"),
    (Key::CtrlL, "ctrl_l"),
    (Key::SuperL, "super_l"),
    (Key::AltL, "alt_l"),
    (Key::AltR, "alt_r"),
    (Key::SuperR, "super_r"),
    (Key::Menu, "menu"),
    (Key::CtrlR, "ctrl_r"),
    (Key::ShiftR, "shift_r"),
    (Key::Back, "back"),
    (Key::SoftLeft, "soft_left"),
    (Key::SoftRight, "soft_right"),
    (Key::Call, "call"),
    (Key::Endcall, "endcall"),
    (Key::Star, "star"),
    (Key::Pound, "pound"),
    (Key::DpadCenter, "dpad_center"),
    (Key::VolumeUp, "volume_up"),
    (Key::VolumeDown, "volume_down"),
    (Key::Power, "power"),
    (Key::Camera, "camera"),
    (Key::Clear, "clear"),
    (Key::Symbol, "symbol"),
    (Key::Explorer, "explorer"),
    (Key::Envelope, "envelope"),
    (Key::Equals, "equals"),
    (Key::At, "at"),
    (Key::Headsethook, "headsethook"),
    (Key::Focus, "focus"),
    (Key::Plus, "plus"),
    (Key::Notification, "notification"),
    (Key::Search, "search"),
    (Key::MediaPlayPause, "media_play_pause"),
    (Key::MediaStop, "media_stop"),
    (Key::MediaNext, "media_next"),
    (Key::MediaPrevious, "media_previous"),
    (Key::MediaRewind, "media_rewind"),
    (Key::MediaFastForward, "media_fast_forward"),
    (Key::Mute, "mute"),
    (Key::Pictsymbols, "pictsymbols"),
    (Key::SwitchCharset, "switch_charset"),
    (Key::Forward, "forward"),
    (Key::Extra1, "extra_1"),
    (Key::Extra2, "extra_2"),
    (Key::Extra3, "extra_3"),
    (Key::Extra4, "extra_4"),
    (Key::Extra5, "extra_5"),
    (Key::Extra6, "extra_6"),
    (Key::Fn, "fn"),
    (Key::Circumflex, "circumflex"),
    (Key::Ssharp, "ssharp"),
    (Key::Acute, "acute"),
    (Key::AltGr, "alt_gr"),
    (Key::Numbersign, "numbersign"),
    (Key::Udiaeresis, "udiaeresis"),
    (Key::Adiaeresis, "adiaeresis"),
    (Key::Odiaeresis, "odiaeresis"),
    (Key::Section, "section"),
    (Key::Aring, "aring"),
    (Key::Diaeresis, "diaeresis"),
    (Key::Twosuperior, "twosuperior"),
    (Key::RightParenthesis, "right_parenthesis"),
    (Key::Dollar, "dollar"),
    (Key::Ugrave, "ugrave"),
    (Key::Asterisk, "asterisk"),
    (Key::Colon, "colon"),
    (Key::Exclam, "exclam"),
    (Key::BraceLeft, "brace_left"),
    (Key::BraceRight, "brace_right"),
    (Key::SysRq, "sys_rq"),
];

impl Key {
    /// Button ID of this key
    pub fn id(self) -> DeviceButtonId {
        self as DeviceButtonId
    }

    /// Key for a button ID
    pub fn from_id(id: DeviceButtonId) -> Option<Key> {
        KEY_NAMES.get(id as usize).map(|(key, _)| *key)
    }

    pub fn name(self) -> &'static str {
        KEY_NAMES[self as usize].1
    }
}

/// Text typed during one frame.
///
/// Characters arrive into a pending buffer and are published at update, so
/// readers see one complete frame of text at a time.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    pending: Vec<char>,
    published: Vec<char>,
}

impl TextBuffer {
    pub fn push(&mut self, c: char) {
        self.pending.push(c);
    }

    /// Make the pending characters visible and start a new frame
    pub fn publish(&mut self) {
        self.published = std::mem::take(&mut self.pending);
    }

    pub fn published(&self) -> &[char] {
        &self.published
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.published.clear();
    }
}

/// Keyboard fed by winit window events (desktop)
pub struct WinitKeyboard {
    dialect: HashMap<KeyCode, Key>,
    text: TextBuffer,
}

impl WinitKeyboard {
    pub fn new() -> Self {
        Self {
            dialect: super::keyboard_dialect::winit_dialect(),
            text: TextBuffer::default(),
        }
    }
}

impl Default for WinitKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBackend for WinitKeyboard {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Keyboard"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Window(WindowInput::KeyboardKey { code, pressed, .. }) => {
                match self.dialect.get(code) {
                    Some(key) => out.set_bool(key.id(), *pressed),
                    None => debug!("Unmapped key code {:?}", code),
                }
            }
            PlatformEvent::Window(WindowInput::Text(c)) => self.text.push(*c),
            _ => {}
        }
    }

    fn update(&mut self, _out: &mut ButtonWriter<'_>) {
        self.text.publish();
    }

    fn text_input(&self) -> &[char] {
        self.text.published()
    }

    fn clear_text(&mut self) {
        self.text.clear();
    }
}

/// Keyboard fed by IOKit style HID reports (macOS).
///
/// Unavailable until a keyboard is matched; text still comes from the window.
pub struct HidKeyboard {
    dialect: HashMap<u32, Key>,
    serial: Option<u64>,
    text: TextBuffer,
}

impl HidKeyboard {
    pub fn new() -> Self {
        Self {
            dialect: super::keyboard_dialect::hid_dialect(),
            serial: None,
            text: TextBuffer::default(),
        }
    }
}

impl Default for HidKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBackend for HidKeyboard {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        if self.serial.is_some() {
            DeviceState::Ok
        } else {
            DeviceState::Unavailable
        }
    }

    fn name(&self) -> &str {
        "Keyboard"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Hid(HidEvent::DeviceMatched(info))
                if info.kind == HidDeviceKind::Keyboard && self.serial.is_none() =>
            {
                info!("Keyboard connected: {}", info.product_name);
                self.serial = Some(info.serial);
            }
            PlatformEvent::Hid(HidEvent::DeviceRemoved { serial }) if self.serial == Some(*serial) => {
                info!("Keyboard disconnected");
                self.serial = None;
            }
            PlatformEvent::Hid(HidEvent::Value(value))
                if value.usage_page == HID_PAGE_KEYBOARD && self.serial == Some(value.serial) =>
            {
                match self.dialect.get(&value.usage) {
                    Some(key) => out.set_bool(key.id(), value.integer_value != 0),
                    None => debug!("Unmapped HID keyboard usage {:#x}", value.usage),
                }
            }
            PlatformEvent::Window(WindowInput::Text(c)) => self.text.push(*c),
            _ => {}
        }
    }

    fn update(&mut self, _out: &mut ButtonWriter<'_>) {
        self.text.publish();
    }

    fn text_input(&self) -> &[char] {
        self.text.published()
    }

    fn clear_text(&mut self) {
        self.text.clear();
    }
}

/// Keyboard fed by Android key events
pub struct AndroidKeyboard {
    dialect: HashMap<i32, Key>,
    text: TextBuffer,
}

impl AndroidKeyboard {
    pub fn new() -> Self {
        Self {
            dialect: super::keyboard_dialect::android_dialect(),
            text: TextBuffer::default(),
        }
    }
}

impl Default for AndroidKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBackend for AndroidKeyboard {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        DeviceState::Ok
    }

    fn name(&self) -> &str {
        "Keyboard"
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        if let PlatformEvent::Android(AndroidInputEvent::Key {
            key_code,
            action,
            source: AndroidSource::Keyboard,
            unicode,
            ..
        }) = event
        {
            let pressed = *action == AndroidKeyAction::Down;
            match self.dialect.get(key_code) {
                Some(key) => out.set_bool(key.id(), pressed),
                None => debug!("Unmapped Android key code {}", key_code),
            }
            if pressed && *unicode != 0 {
                if let Some(c) = char::from_u32(*unicode) {
                    self.text.push(c);
                }
            }
        }
    }

    fn update(&mut self, _out: &mut ButtonWriter<'_>) {
        self.text.publish();
    }

    fn text_input(&self) -> &[char] {
        self.text.published()
    }

    fn clear_text(&mut self) {
        self.text.clear();
    }
}
