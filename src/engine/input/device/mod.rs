// Input devices
//
// An `InputDevice` owns the three state buffers of one device (current,
// previous and next) and a platform backend implementing `DeviceBackend`.
// Backends translate raw platform events into canonical button IDs and write
// them through a `ButtonWriter`, which funnels every write into the shared
// `handle_button`/`handle_axis` path so changes are logged consistently.
//
// ## Backends
//
// - `keyboard`: winit, HID usage page and Android key code dialects
// - `mouse`: standard (window cursor) and raw (unaccelerated motion)
// - `pad`, `pad_mac`, `pad_android`: canonical pad layout and its backends
// - `touch`: winit and Android touch surfaces

pub mod keyboard;
pub mod keyboard_dialect;
pub mod mouse;
pub mod pad;
pub mod pad_android;
pub mod pad_mac;
pub mod touch;

use super::button::{ButtonType, ButtonValue, DeviceButtonId, DeviceId};
use super::event::PlatformEvent;
use super::state::{handle_axis, handle_button, reemit_axis, InputDeltaState, InputState};
use crate::core::math::apply_radial_dead_zone;
use log::debug;
use pad::{PadButton, PadSerialTable};

/// Kind of input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Mouse,
    Keyboard,
    Pad,
    Touch,
}

impl DeviceType {
    /// Size of the button ID space for this kind
    pub fn button_count(self) -> usize {
        match self {
            DeviceType::Mouse => mouse::MOUSE_BUTTON_COUNT,
            DeviceType::Keyboard => keyboard::KEY_COUNT,
            DeviceType::Pad => pad::PAD_BUTTON_COUNT,
            DeviceType::Touch => touch::TOUCH_BUTTON_COUNT,
        }
    }

    pub fn button_type(self, button: DeviceButtonId) -> Option<ButtonType> {
        match self {
            DeviceType::Mouse => mouse::MouseButton::from_id(button).map(|b| b.button_type()),
            DeviceType::Keyboard => keyboard::Key::from_id(button).map(|_| ButtonType::Bool),
            DeviceType::Pad => PadButton::from_id(button).map(|b| b.button_type()),
            DeviceType::Touch => ((button as usize) < touch::TOUCH_BUTTON_COUNT)
                .then(|| touch::touch_button_type(button)),
        }
    }

    pub fn button_name(self, button: DeviceButtonId) -> Option<&'static str> {
        match self {
            DeviceType::Mouse => mouse::MouseButton::from_id(button).map(|b| b.name()),
            DeviceType::Keyboard => keyboard::Key::from_id(button).map(|k| k.name()),
            DeviceType::Pad => PadButton::from_id(button).map(|b| b.name()),
            DeviceType::Touch => touch::TOUCH_BUTTON_NAMES.get(button as usize).copied(),
        }
    }
}

/// Implementation strategy requested for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceVariant {
    #[default]
    Standard,
    Raw,
    Null,
}

/// Availability of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Ok,
    Unavailable,
}

/// Backend family to create devices for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformKind {
    /// winit window input (Windows, Linux)
    #[default]
    Desktop,
    /// winit window input plus IOKit style HID keyboards and pads
    MacOs,
    /// Android key and motion events
    Android,
    /// Devices exist but only the change queue feeds them
    Headless,
}

/// Writes button values of one device into one of its states.
///
/// Every write goes through `handle_button`/`handle_axis`, recording a change
/// in the delta when one is attached.
pub struct ButtonWriter<'a> {
    device_id: DeviceId,
    state: &'a mut InputState,
    delta: Option<&'a mut InputDeltaState>,
    dead_zones: &'a [f32],
}

impl<'a> ButtonWriter<'a> {
    pub fn new(
        device_id: DeviceId,
        state: &'a mut InputState,
        delta: Option<&'a mut InputDeltaState>,
        dead_zones: &'a [f32],
    ) -> Self {
        Self {
            device_id,
            state,
            delta,
            dead_zones,
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn get_bool(&self, button: DeviceButtonId) -> bool {
        self.state.get_bool(button)
    }

    pub fn get_float(&self, button: DeviceButtonId) -> f32 {
        self.state.get_float(button)
    }

    fn dead_zone(&self, button: DeviceButtonId) -> f32 {
        self.dead_zones.get(button as usize).copied().unwrap_or(0.0)
    }

    pub fn set_bool(&mut self, button: DeviceButtonId, value: bool) {
        handle_button(
            self.device_id,
            self.state,
            self.delta.as_deref_mut(),
            button,
            value,
        );
    }

    /// Write a float, applying the button's dead zone
    pub fn set_float(&mut self, button: DeviceButtonId, value: f32) {
        let dead_zone = self.dead_zone(button);
        handle_axis(
            self.device_id,
            self.state,
            self.delta.as_deref_mut(),
            dead_zone,
            button,
            value,
        );
    }

    /// Write two floats that are consumed together.
    ///
    /// Nothing is logged when neither value changes. Otherwise both are
    /// logged, so a reader of the delta sees the complete pair.
    pub fn set_float_pair(
        &mut self,
        first: DeviceButtonId,
        first_value: f32,
        second: DeviceButtonId,
        second_value: f32,
    ) {
        if self.state.get_float(first) == first_value && self.state.get_float(second) == second_value {
            return;
        }
        self.report_float(first, first_value);
        self.report_float(second, second_value);
    }

    /// Write a float without a dead zone, logging it even when unchanged
    pub fn report_float(&mut self, button: DeviceButtonId, value: f32) {
        let old = self.state.get_float(button);
        if let Some(delta) = self.delta.as_deref_mut() {
            delta.add_change(
                self.device_id,
                button,
                ButtonValue::Float(old),
                ButtonValue::Float(value),
            );
        }
        self.state.set_float(button, value);
    }

    /// Write one stick component with a radial dead zone, re-reporting its partner.
    ///
    /// Backends that receive both components in one event use `set_stick_pair`.
    pub fn set_stick(&mut self, axis: PadButton, value: f32) {
        let Some(partner) = axis.stick_partner() else {
            self.set_float(axis.id(), value);
            return;
        };

        let partner_value = self.state.get_float(partner.id());
        let value = apply_radial_dead_zone(value, partner_value, self.dead_zone(axis.id()));
        if self.state.get_float(axis.id()) == value {
            return;
        }
        self.report_float(axis.id(), value);
        reemit_axis(self.device_id, self.state, self.delta.as_deref_mut(), partner.id());
    }

    /// Write both components of a stick at once.
    ///
    /// Each component gets the radial dead zone computed against the other
    /// raw component, then the pair is logged once.
    pub fn set_stick_pair(&mut self, x: PadButton, x_value: f32, y: PadButton, y_value: f32) {
        let x_dead_zoned = apply_radial_dead_zone(x_value, y_value, self.dead_zone(x.id()));
        let y_dead_zoned = apply_radial_dead_zone(y_value, x_value, self.dead_zone(y.id()));
        self.set_float_pair(x.id(), x_dead_zoned, y.id(), y_dead_zoned);
    }

    /// Write any value, dispatching on its type
    pub fn set_value(&mut self, button: DeviceButtonId, value: ButtonValue) {
        match value {
            ButtonValue::Bool(value) => self.set_bool(button, value),
            ButtonValue::Float(value) => self.set_float(button, value),
        }
    }
}

/// Platform specific half of an input device.
///
/// One implementation exists per device kind and platform; the manager picks
/// one when the device is created.
pub trait DeviceBackend {
    fn variant(&self) -> DeviceVariant;

    fn state(&self) -> DeviceState;

    /// Human readable device name
    fn name(&self) -> &str;

    /// Translate one platform event into button writes
    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>);

    /// Per-frame work on the next state, before it becomes current
    fn update(&mut self, _out: &mut ButtonWriter<'_>) {}

    /// Text typed during the last frame
    fn text_input(&self) -> &[char] {
        &[]
    }

    fn clear_text(&mut self) {}

    /// Returns false when the device has no rumble motors
    fn set_rumble(&mut self, _left: f32, _right: f32, _duration_ms: u32) -> bool {
        false
    }

    /// Returns false when the device has no light
    fn set_led_color(&mut self, _r: u8, _g: u8, _b: u8) -> bool {
        false
    }

    /// Connection toggle delivered outside the event stream
    fn set_available(&mut self, _available: bool) {}
}

/// Backend for devices that do not exist on this platform
#[derive(Debug)]
pub struct NullBackend {
    name: &'static str,
}

impl NullBackend {
    pub fn new(kind: DeviceType) -> Self {
        let name = match kind {
            DeviceType::Mouse => "Null Mouse",
            DeviceType::Keyboard => "Null Keyboard",
            DeviceType::Pad => "Null Gamepad",
            DeviceType::Touch => "Null Touch",
        };
        Self { name }
    }
}

impl DeviceBackend for NullBackend {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Null
    }

    fn state(&self) -> DeviceState {
        DeviceState::Unavailable
    }

    fn name(&self) -> &str {
        self.name
    }

    fn handle_event(&mut self, _event: &PlatformEvent, _out: &mut ButtonWriter<'_>) {}
}

/// Pick the backend for a device.
///
/// Variants the platform cannot honor fall back to `Standard`.
pub fn create_backend(
    kind: DeviceType,
    variant: DeviceVariant,
    index: u32,
    platform: PlatformKind,
    serials: &PadSerialTable,
) -> Box<dyn DeviceBackend> {
    if variant == DeviceVariant::Null || platform == PlatformKind::Headless {
        return Box::new(NullBackend::new(kind));
    }

    let raw_supported = kind == DeviceType::Mouse && platform != PlatformKind::Android;
    if variant == DeviceVariant::Raw && !raw_supported {
        debug!(
            "{:?} variant {:?} unsupported on {:?}, using Standard",
            kind, variant, platform
        );
    }
    let raw = variant == DeviceVariant::Raw && raw_supported;

    match (kind, platform) {
        (DeviceType::Mouse, PlatformKind::Android) => Box::new(NullBackend::new(kind)),
        (DeviceType::Mouse, _) if raw => Box::new(mouse::RawMouse::new()),
        (DeviceType::Mouse, _) => Box::new(mouse::WinitMouse::new()),
        (DeviceType::Keyboard, PlatformKind::MacOs) => Box::new(keyboard::HidKeyboard::new()),
        (DeviceType::Keyboard, PlatformKind::Android) => {
            Box::new(keyboard::AndroidKeyboard::new())
        }
        (DeviceType::Keyboard, _) => Box::new(keyboard::WinitKeyboard::new()),
        (DeviceType::Pad, PlatformKind::MacOs) => {
            Box::new(pad_mac::MacPad::new(index as usize, serials.clone()))
        }
        (DeviceType::Pad, PlatformKind::Android) => Box::new(pad_android::AndroidPad::new(index)),
        (DeviceType::Pad, _) => Box::new(NullBackend::new(kind)),
        (DeviceType::Touch, PlatformKind::Android) => Box::new(touch::AndroidTouch::new()),
        (DeviceType::Touch, _) => Box::new(touch::WinitTouch::new()),
    }
}

/// Which state buffer a queued change targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTarget {
    Next,
    Current,
}

/// One registered input device
pub struct InputDevice {
    id: DeviceId,
    kind: DeviceType,
    index: u32,

    /// State visible to readers this frame
    current: InputState,

    /// Current state of the previous frame
    previous: InputState,

    /// State being written until the next update
    next: InputState,

    dead_zones: Vec<f32>,

    /// Driven by a state modifier (replay) instead of the backend
    synced: bool,

    backend: Box<dyn DeviceBackend>,
}

impl InputDevice {
    pub fn new(id: DeviceId, kind: DeviceType, index: u32, backend: Box<dyn DeviceBackend>) -> Self {
        let count = kind.button_count();
        Self {
            id,
            kind,
            index,
            current: InputState::new(count),
            previous: InputState::new(count),
            next: InputState::new(count),
            dead_zones: vec![0.0; count],
            synced: false,
            backend,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn kind(&self) -> DeviceType {
        self.kind
    }

    /// Index among the devices of the same kind
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn variant(&self) -> DeviceVariant {
        self.backend.variant()
    }

    pub fn state(&self) -> DeviceState {
        self.backend.state()
    }

    pub fn is_available(&self) -> bool {
        self.state() != DeviceState::Unavailable
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    pub fn button_count(&self) -> usize {
        self.kind.button_count()
    }

    pub fn is_valid_button(&self, button: DeviceButtonId) -> bool {
        (button as usize) < self.button_count()
    }

    pub fn button_type(&self, button: DeviceButtonId) -> Option<ButtonType> {
        self.kind.button_type(button)
    }

    pub fn button_name(&self, button: DeviceButtonId) -> Option<&'static str> {
        self.kind.button_name(button)
    }

    pub fn button_by_name(&self, name: &str) -> Option<DeviceButtonId> {
        (0..self.button_count() as DeviceButtonId).find(|&b| self.button_name(b) == Some(name))
    }

    pub fn get_bool(&self, button: DeviceButtonId) -> bool {
        self.current.get_bool(button)
    }

    pub fn get_float(&self, button: DeviceButtonId) -> f32 {
        self.current.get_float(button)
    }

    pub fn get_bool_previous(&self, button: DeviceButtonId) -> bool {
        self.previous.get_bool(button)
    }

    pub fn get_float_previous(&self, button: DeviceButtonId) -> f32 {
        self.previous.get_float(button)
    }

    pub fn current_state(&self) -> &InputState {
        &self.current
    }

    pub fn previous_state(&self) -> &InputState {
        &self.previous
    }

    pub fn dead_zone(&self, button: DeviceButtonId) -> f32 {
        self.dead_zones.get(button as usize).copied().unwrap_or(0.0)
    }

    pub fn set_dead_zone(&mut self, button: DeviceButtonId, dead_zone: f32) {
        if let Some(slot) = self.dead_zones.get_mut(button as usize) {
            *slot = dead_zone;
        }
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    pub fn text_input(&self) -> &[char] {
        self.backend.text_input()
    }

    pub fn set_rumble(&mut self, left: f32, right: f32, duration_ms: u32) -> bool {
        self.backend.set_rumble(left, right, duration_ms)
    }

    pub fn set_led_color(&mut self, r: u8, g: u8, b: u8) -> bool {
        self.backend.set_led_color(r, g, b)
    }

    pub fn set_available(&mut self, available: bool) {
        self.backend.set_available(available);
    }

    /// Feed a platform event to the backend, writing the next state
    pub fn handle_event(&mut self, event: &PlatformEvent, delta: Option<&mut InputDeltaState>) {
        let mut out = ButtonWriter::new(self.id, &mut self.next, delta, &self.dead_zones);
        self.backend.handle_event(event, &mut out);
    }

    /// Apply one value to the chosen state through the regular write path
    pub fn apply_change(
        &mut self,
        target: StateTarget,
        button: DeviceButtonId,
        value: ButtonValue,
        delta: Option<&mut InputDeltaState>,
    ) {
        if !self.is_valid_button(button) {
            debug!("{} ignores change for invalid button {}", self.id, button);
            return;
        }
        let state = match target {
            StateTarget::Next => &mut self.next,
            StateTarget::Current => &mut self.current,
        };
        let mut out = ButtonWriter::new(self.id, state, delta, &self.dead_zones);
        out.set_value(button, value);
    }

    /// Apply a recorded value verbatim: next state with delta, current without.
    ///
    /// Floats are always reported so paired axes replay as they were recorded.
    pub fn replay_change(
        &mut self,
        button: DeviceButtonId,
        value: ButtonValue,
        delta: Option<&mut InputDeltaState>,
    ) {
        if !self.is_valid_button(button) {
            return;
        }
        let mut out = ButtonWriter::new(self.id, &mut self.next, delta, &self.dead_zones);
        match value {
            ButtonValue::Bool(v) => out.set_bool(button, v),
            ButtonValue::Float(v) => out.report_float(button, v),
        }
        match value {
            ButtonValue::Bool(v) => self.current.set_bool(button, v),
            ButtonValue::Float(v) => self.current.set_float(button, v),
        }
    }

    /// Advance one frame: previous <- current, backend update, current <- next.
    ///
    /// Synced devices only shift their previous state; the modifier driving
    /// them writes current directly.
    pub fn update(&mut self, delta: Option<&mut InputDeltaState>) {
        self.previous.copy_from(&self.current);
        if self.synced {
            return;
        }

        let mut out = ButtonWriter::new(self.id, &mut self.next, delta, &self.dead_zones);
        self.backend.update(&mut out);
        self.current.copy_from(&self.next);
    }

    /// Buttons currently down (bool true or float non-zero)
    pub fn buttons_down(&self) -> Vec<DeviceButtonId> {
        (0..self.button_count() as DeviceButtonId)
            .filter(|&b| self.current.get_float(b) != 0.0)
            .collect()
    }

    /// Release every button in the next and current states
    pub fn clear_all_states(&mut self, mut delta: Option<&mut InputDeltaState>) {
        for button in 0..self.button_count() as DeviceButtonId {
            let down = self.next.get_float(button) != 0.0 || self.current.get_float(button) != 0.0;
            if !down {
                continue;
            }
            match self.button_type(button) {
                Some(ButtonType::Bool) => {
                    handle_button(self.id, &mut self.next, delta.as_deref_mut(), button, false)
                }
                _ => handle_axis(self.id, &mut self.next, delta.as_deref_mut(), 0.0, button, 0.0),
            }
            self.current.set_float(button, 0.0);
        }
        self.backend.clear_text();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::event::WindowInput;
    use approx::assert_relative_eq;
    use keyboard::Key;
    use winit::keyboard::KeyCode;

    fn keyboard_device() -> InputDevice {
        InputDevice::new(
            DeviceId::from_raw(0),
            DeviceType::Keyboard,
            0,
            Box::new(keyboard::WinitKeyboard::new()),
        )
    }

    fn key_event(code: KeyCode, pressed: bool) -> PlatformEvent {
        PlatformEvent::Window(WindowInput::KeyboardKey {
            code,
            pressed,
            repeat: false,
        })
    }

    #[test]
    fn test_state_swap_on_update() {
        let mut device = keyboard_device();
        device.handle_event(&key_event(KeyCode::KeyA, true), None);

        // Written to next, not yet visible
        assert!(!device.get_bool(Key::A.id()));
        assert!(!device.get_bool_previous(Key::A.id()));

        device.update(None);
        assert!(device.get_bool(Key::A.id()));
        assert!(!device.get_bool_previous(Key::A.id()));

        device.update(None);
        assert!(device.get_bool_previous(Key::A.id()));
    }

    #[test]
    fn test_button_metadata() {
        let device = keyboard_device();
        assert_eq!(device.button_type(Key::A.id()), Some(ButtonType::Bool));
        assert_eq!(device.button_name(Key::Space.id()), Some("space"));
        assert_eq!(device.button_by_name("escape"), Some(Key::Escape.id()));
        assert!(!device.is_valid_button(10_000));
        assert_eq!(device.button_type(10_000), None);
    }

    #[test]
    fn test_dialect_completeness_all_kinds() {
        for kind in [
            DeviceType::Mouse,
            DeviceType::Keyboard,
            DeviceType::Pad,
            DeviceType::Touch,
        ] {
            for button in 0..kind.button_count() as DeviceButtonId {
                assert!(kind.button_type(button).is_some(), "{:?} {}", kind, button);
                assert!(kind.button_name(button).is_some(), "{:?} {}", kind, button);
            }
        }
    }

    #[test]
    fn test_clear_all_states_records_releases() {
        let mut device = keyboard_device();
        device.handle_event(&key_event(KeyCode::KeyA, true), None);
        device.update(None);

        let mut delta = InputDeltaState::new();
        device.clear_all_states(Some(&mut delta));
        assert!(!device.get_bool(Key::A.id()));
        assert_eq!(delta.len(), 1);
        assert_eq!(delta.changes()[0].new_value, ButtonValue::Bool(false));
    }

    #[test]
    fn test_synced_device_keeps_current() {
        let mut device = keyboard_device();
        device.set_synced(true);
        device.handle_event(&key_event(KeyCode::KeyA, true), None);
        device.update(None);
        assert!(!device.get_bool(Key::A.id()));

        device.replay_change(Key::B.id(), ButtonValue::Bool(true), None);
        assert!(device.get_bool(Key::B.id()));
    }

    #[test]
    fn test_backend_fallback() {
        let serials = pad::new_serial_table();
        let keyboard = create_backend(
            DeviceType::Keyboard,
            DeviceVariant::Raw,
            0,
            PlatformKind::Desktop,
            &serials,
        );
        assert_eq!(keyboard.variant(), DeviceVariant::Standard);

        let mouse = create_backend(
            DeviceType::Mouse,
            DeviceVariant::Raw,
            0,
            PlatformKind::Desktop,
            &serials,
        );
        assert_eq!(mouse.variant(), DeviceVariant::Raw);

        let pad = create_backend(
            DeviceType::Pad,
            DeviceVariant::Standard,
            0,
            PlatformKind::Headless,
            &serials,
        );
        assert_eq!(pad.variant(), DeviceVariant::Null);
        assert_eq!(pad.state(), DeviceState::Unavailable);
    }

    #[test]
    fn test_stick_reports_partner() {
        let mut state = InputState::new(pad::PAD_BUTTON_COUNT);
        let mut delta = InputDeltaState::new();
        let dead_zones = vec![0.0; pad::PAD_BUTTON_COUNT];
        state.set_float(PadButton::LeftStickY.id(), 0.3);

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, Some(&mut delta), &dead_zones);
        out.set_stick(PadButton::LeftStickX, 0.5);

        let changes = delta.changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].new_value, ButtonValue::Float(0.5));
        assert_eq!(changes[1].button_id, PadButton::LeftStickY.id());
        assert_eq!(changes[1].new_value, ButtonValue::Float(0.3));
    }

    #[test]
    fn test_unchanged_stick_not_logged() {
        let mut state = InputState::new(pad::PAD_BUTTON_COUNT);
        let mut delta = InputDeltaState::new();
        let dead_zones = vec![0.0; pad::PAD_BUTTON_COUNT];

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, Some(&mut delta), &dead_zones);
        out.set_stick(PadButton::RightStickX, 0.4);
        out.set_stick(PadButton::RightStickX, 0.4);
        out.set_stick_pair(PadButton::LeftStickX, 0.1, PadButton::LeftStickY, 0.2);
        out.set_stick_pair(PadButton::LeftStickX, 0.1, PadButton::LeftStickY, 0.2);

        // One stick write plus its partner, then one pair
        assert_eq!(delta.len(), 4);
    }

    #[test]
    fn test_stick_pair_radial_dead_zone() {
        let mut state = InputState::new(pad::PAD_BUTTON_COUNT);
        let mut delta = InputDeltaState::new();
        let dead_zones = vec![0.5; pad::PAD_BUTTON_COUNT];

        let mut out = ButtonWriter::new(DeviceId::from_raw(0), &mut state, Some(&mut delta), &dead_zones);
        // Each component is inside the dead zone, the pair is not
        out.set_stick_pair(PadButton::LeftStickX, 0.48, PadButton::LeftStickY, 0.36);

        assert_eq!(delta.len(), 2);
        assert_relative_eq!(state.get_float(PadButton::LeftStickX.id()), 0.16, epsilon = 1e-5);
        assert_relative_eq!(state.get_float(PadButton::LeftStickY.id()), 0.12, epsilon = 1e-5);
    }
}
