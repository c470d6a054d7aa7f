// Input system configuration and remappable binding tables

use super::device::keyboard::Key;
use super::device::mouse::MouseButton;
use super::device::pad::PadButton;
use super::device::touch::TOUCH_POINT_COUNT;
use super::device::PlatformKind;
use super::manager::MAX_DEVICES;
use super::system::binding::InputBinding;
use super::InputError;
use crate::engine::clock::ClockMode;
use std::collections::HashMap;
use std::hash::Hash;

/// Gamepad slots created by default
pub const MAX_INPUT_GAMEPADS: usize = 4;

/// Touch points whose positions are tracked for actions by default
pub const MAX_INPUT_MULTI_TOUCHES: usize = 4;

/// Axes one float or axis control can combine
pub const MAX_BINDING_AXES: u32 = 3;

fn axis_mask(axis_count: u32) -> u8 {
    1u32.checked_shl(axis_count).map_or(u8::MAX, |bit| (bit - 1) as u8)
}

/// Action capacity hint
pub const MAX_INPUT_ACTIONS: usize = 128;

/// Devices the input system creates besides its pads (mouse, raw mouse, keyboard, touch)
const FIXED_DEVICE_COUNT: usize = 4;

/// Two-way map between logical bindings and the buttons of one device kind.
///
/// A button drives at most one binding; binding it again moves it.
#[derive(Debug, Clone)]
pub struct ButtonTable<B> {
    forward: HashMap<InputBinding, B>,
    reverse: HashMap<B, InputBinding>,
}

impl<B: Copy + Eq + Hash> ButtonTable<B> {
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Create a table from a list of bindings
    pub fn from_pairs(pairs: &[(InputBinding, B)]) -> Self {
        let mut table = Self::new();
        for (binding, button) in pairs {
            table.bind(*binding, *button);
        }
        table
    }

    /// Bind `button` to `binding`, replacing whatever either was bound to
    pub fn bind(&mut self, binding: InputBinding, button: B) {
        self.unbind(binding);
        self.unbind_button(button);
        self.forward.insert(binding, button);
        self.reverse.insert(button, binding);
    }

    /// Remove the button of `binding`
    pub fn unbind(&mut self, binding: InputBinding) -> Option<B> {
        let button = self.forward.remove(&binding)?;
        self.reverse.remove(&button);
        Some(button)
    }

    /// Remove the binding `button` drives
    pub fn unbind_button(&mut self, button: B) -> Option<InputBinding> {
        let binding = self.reverse.remove(&button)?;
        self.forward.remove(&binding);
        Some(binding)
    }

    pub fn button(&self, binding: InputBinding) -> Option<B> {
        self.forward.get(&binding).copied()
    }

    /// Binding driven by `button`
    pub fn binding_for(&self, button: B) -> Option<InputBinding> {
        self.reverse.get(&button).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InputBinding, B)> + '_ {
        self.forward.iter().map(|(binding, button)| (*binding, *button))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

impl<B: Copy + Eq + Hash> Default for ButtonTable<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pad axes read together by one axis control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinding {
    /// First axis; the others follow it in the pad ID space
    pub start: PadButton,
    pub axis_count: u32,
}

impl AxisBinding {
    /// Bit mask with one bit per axis
    pub fn target_mask(&self) -> u8 {
        axis_mask(self.axis_count)
    }

    /// Between one and `MAX_BINDING_AXES` axes, all of them pad buttons
    pub fn is_valid(&self) -> bool {
        (1..=MAX_BINDING_AXES).contains(&self.axis_count)
            && self.buttons().count() == self.axis_count as usize
    }

    pub fn buttons(&self) -> impl Iterator<Item = PadButton> {
        let start = self.start.id();
        (0..self.axis_count).filter_map(move |i| PadButton::from_id(start + i))
    }
}

/// Keys combined into a 1D (2 keys) or 2D (4 keys) value.
///
/// Keys are ordered positive then negative per axis: +x, -x, +y, -y.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeBinding {
    pub keys: Vec<Key>,
}

/// Mouse axes feeding a float control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseFloatBinding {
    pub start: MouseButton,
    pub axis_count: u32,
    /// Read the raw (unaccelerated) mouse
    pub raw: bool,
    /// Accumulate motion since the last update instead of absolute values
    pub delta: bool,
}

impl MouseFloatBinding {
    pub fn target_mask(&self) -> u8 {
        axis_mask(self.axis_count)
    }

    pub fn is_valid(&self) -> bool {
        (1..=MAX_BINDING_AXES).contains(&self.axis_count)
    }
}

/// Wheel buttons of a mouse wheel float control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelBinding {
    pub up: MouseButton,
    pub down: MouseButton,
}

/// Physical buttons behind each logical binding
#[derive(Debug, Clone)]
pub struct BindingTables {
    pub pad: ButtonTable<PadButton>,
    pub keys: ButtonTable<Key>,
    pub mouse: ButtonTable<MouseButton>,
    pub axes: HashMap<InputBinding, AxisBinding>,
    pub composites: HashMap<InputBinding, CompositeBinding>,
    pub mouse_floats: HashMap<InputBinding, MouseFloatBinding>,
    pub mouse_wheels: HashMap<InputBinding, WheelBinding>,
}

impl BindingTables {
    /// Tables with no bindings at all
    pub fn empty() -> Self {
        Self {
            pad: ButtonTable::new(),
            keys: ButtonTable::new(),
            mouse: ButtonTable::new(),
            axes: HashMap::new(),
            composites: HashMap::new(),
            mouse_floats: HashMap::new(),
            mouse_wheels: HashMap::new(),
        }
    }

    /// Remove `binding` from every table
    pub fn unbind(&mut self, binding: InputBinding) {
        self.pad.unbind(binding);
        self.keys.unbind(binding);
        self.mouse.unbind(binding);
        self.axes.remove(&binding);
        self.composites.remove(&binding);
        self.mouse_floats.remove(&binding);
        self.mouse_wheels.remove(&binding);
    }

    /// Check if any table maps `binding`
    pub fn is_bound(&self, binding: InputBinding) -> bool {
        self.pad.button(binding).is_some()
            || self.keys.button(binding).is_some()
            || self.mouse.button(binding).is_some()
            || self.axes.contains_key(&binding)
            || self.composites.contains_key(&binding)
            || self.mouse_floats.contains_key(&binding)
            || self.mouse_wheels.contains_key(&binding)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        for (binding, composite) in &self.composites {
            if composite.keys.len() != 2 && composite.keys.len() != 4 {
                return Err(InputError::InvalidConfig(format!(
                    "composite {:?} needs 2 or 4 keys, got {}",
                    binding,
                    composite.keys.len()
                )));
            }
        }
        for (binding, axis) in &self.axes {
            if !axis.is_valid() {
                return Err(InputError::InvalidConfig(format!(
                    "axis binding {:?} has an invalid axis range",
                    binding
                )));
            }
        }
        for (binding, float) in &self.mouse_floats {
            if !float.is_valid() {
                return Err(InputError::InvalidConfig(format!(
                    "mouse float {:?} has an invalid axis count",
                    binding
                )));
            }
        }
        Ok(())
    }
}

impl Default for BindingTables {
    fn default() -> Self {
        let pad = ButtonTable::from_pairs(&[
            (InputBinding::DpadLeft, PadButton::Left),
            (InputBinding::DpadRight, PadButton::Right),
            (InputBinding::DpadUp, PadButton::Up),
            (InputBinding::DpadDown, PadButton::Down),
            (InputBinding::South, PadButton::A),
            (InputBinding::East, PadButton::B),
            (InputBinding::West, PadButton::X),
            (InputBinding::North, PadButton::Y),
            (InputBinding::L1, PadButton::L1),
            (InputBinding::R1, PadButton::R1),
            (InputBinding::L2, PadButton::L2),
            (InputBinding::R2, PadButton::R2),
            (InputBinding::L3, PadButton::L3),
            (InputBinding::R3, PadButton::R3),
            (InputBinding::Start, PadButton::Start),
            (InputBinding::Select, PadButton::Select),
            (InputBinding::Touch, PadButton::Button17),
            (InputBinding::Home, PadButton::Home),
        ]);

        let keys = ButtonTable::from_pairs(&[
            (InputBinding::Exit, Key::Escape),
            (InputBinding::Back, Key::BackSpace),
            (InputBinding::North, Key::Space),
            (InputBinding::R3, Key::F1),
            (InputBinding::L3, Key::F2),
            (InputBinding::Dump, Key::F3),
            (InputBinding::KeyLeft, Key::Left),
            (InputBinding::KeyRight, Key::Right),
            (InputBinding::KeyShiftL, Key::ShiftL),
            (InputBinding::KeyShiftR, Key::ShiftR),
            (InputBinding::KeyHome, Key::Home),
            (InputBinding::KeyEnd, Key::End),
            (InputBinding::KeyDelete, Key::Delete),
        ]);

        let mouse = ButtonTable::from_pairs(&[
            (InputBinding::South, MouseButton::Left),
            (InputBinding::MouseRight, MouseButton::Right),
            (InputBinding::MouseMiddle, MouseButton::Middle),
            (InputBinding::MouseScrollUp, MouseButton::WheelUp),
            (InputBinding::MouseScrollDown, MouseButton::WheelDown),
        ]);

        let axes = HashMap::from([
            (
                InputBinding::FloatL2,
                AxisBinding {
                    start: PadButton::Axis4,
                    axis_count: 1,
                },
            ),
            (
                InputBinding::FloatR2,
                AxisBinding {
                    start: PadButton::Axis5,
                    axis_count: 1,
                },
            ),
            (
                InputBinding::FloatLeftStick,
                AxisBinding {
                    start: PadButton::LeftStickX,
                    axis_count: 2,
                },
            ),
            (
                InputBinding::FloatRightStick,
                AxisBinding {
                    start: PadButton::RightStickX,
                    axis_count: 2,
                },
            ),
        ]);

        let composites = HashMap::from([(
            InputBinding::FloatLeftStick,
            CompositeBinding {
                keys: vec![Key::D, Key::A, Key::W, Key::S],
            },
        )]);

        let mouse_floats = HashMap::from([(
            InputBinding::FloatRightStick,
            MouseFloatBinding {
                start: MouseButton::AxisX,
                axis_count: 2,
                raw: true,
                delta: true,
            },
        )]);

        let mouse_wheels = HashMap::from([(
            InputBinding::FloatMouseWheel,
            WheelBinding {
                up: MouseButton::WheelUp,
                down: MouseButton::WheelDown,
            },
        )]);

        Self {
            pad,
            keys,
            mouse,
            axes,
            composites,
            mouse_floats,
            mouse_wheels,
        }
    }
}

/// Settings of an input system
#[derive(Debug, Clone)]
pub struct InputSystemConfig {
    /// Backend family devices are created for
    pub platform: PlatformKind,

    /// Number of gamepad slots (one per user id)
    pub gamepad_count: usize,

    /// Touch points whose positions are tracked for actions
    pub touch_points: usize,

    /// Expected number of actions
    pub action_capacity: usize,

    /// Defer button PERFORMED to the next update and drive buttons from touches
    pub touch_input: bool,

    /// Dead zone applied to every pad axis at startup; pads keep their stick defaults when unset
    pub pad_dead_zone: Option<f32>,

    pub clock_mode: ClockMode,

    pub bindings: BindingTables,
}

impl InputSystemConfig {
    /// Defaults for `platform`; touch input is on for Android
    pub fn for_platform(platform: PlatformKind) -> Self {
        Self {
            platform,
            gamepad_count: MAX_INPUT_GAMEPADS,
            touch_points: MAX_INPUT_MULTI_TOUCHES,
            action_capacity: MAX_INPUT_ACTIONS,
            touch_input: platform == PlatformKind::Android,
            pad_dead_zone: None,
            clock_mode: ClockMode::System,
            bindings: BindingTables::default(),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.gamepad_count + FIXED_DEVICE_COUNT > MAX_DEVICES {
            return Err(InputError::TooManyDevices { max: MAX_DEVICES });
        }
        if self.touch_points == 0 || self.touch_points > TOUCH_POINT_COUNT {
            return Err(InputError::InvalidConfig(format!(
                "touch_points must be between 1 and {}, got {}",
                TOUCH_POINT_COUNT, self.touch_points
            )));
        }
        if let Some(dead_zone) = self.pad_dead_zone {
            if !(0.0..1.0).contains(&dead_zone) {
                return Err(InputError::InvalidConfig(format!(
                    "pad_dead_zone must be in [0, 1), got {}",
                    dead_zone
                )));
            }
        }
        self.bindings.validate()
    }
}

impl Default for InputSystemConfig {
    fn default() -> Self {
        Self::for_platform(PlatformKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let tables = BindingTables::default();
        assert_eq!(tables.pad.button(InputBinding::South), Some(PadButton::A));
        assert_eq!(tables.pad.button(InputBinding::Touch), Some(PadButton::Button17));
        assert_eq!(tables.keys.button(InputBinding::North), Some(Key::Space));
        assert_eq!(tables.keys.button(InputBinding::Dump), Some(Key::F3));
        assert_eq!(tables.mouse.button(InputBinding::South), Some(MouseButton::Left));
        assert_eq!(tables.pad.len(), 18);
        assert_eq!(tables.keys.len(), 13);
        assert_eq!(tables.mouse.len(), 5);
    }

    #[test]
    fn test_reverse_lookup() {
        let tables = BindingTables::default();
        assert_eq!(tables.pad.binding_for(PadButton::B), Some(InputBinding::East));
        assert_eq!(tables.keys.binding_for(Key::Escape), Some(InputBinding::Exit));
        assert_eq!(tables.keys.binding_for(Key::A), None);
        assert_eq!(
            tables.mouse.binding_for(MouseButton::WheelDown),
            Some(InputBinding::MouseScrollDown)
        );
    }

    #[test]
    fn test_axis_masks() {
        let tables = BindingTables::default();
        let stick = tables.axes[&InputBinding::FloatLeftStick];
        assert_eq!(stick.target_mask(), 0b11);
        assert_eq!(
            stick.buttons().collect::<Vec<_>>(),
            vec![PadButton::LeftStickX, PadButton::LeftStickY]
        );
        assert_eq!(tables.axes[&InputBinding::FloatL2].target_mask(), 0b1);
        assert_eq!(tables.mouse_floats[&InputBinding::FloatRightStick].target_mask(), 0b11);
    }

    #[test]
    fn test_oversized_axis_binding_invalid() {
        let wide = AxisBinding {
            start: PadButton::LeftStickX,
            axis_count: 32,
        };
        assert!(!wide.is_valid());
        assert_eq!(wide.target_mask(), u8::MAX);

        let mut tables = BindingTables::default();
        tables.axes.insert(
            InputBinding::FloatL2,
            AxisBinding {
                start: PadButton::Axis4,
                axis_count: 4,
            },
        );
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_rebind_moves_button() {
        let mut tables = BindingTables::default();
        tables.keys.bind(InputBinding::South, Key::Space);

        assert_eq!(tables.keys.button(InputBinding::South), Some(Key::Space));
        assert_eq!(tables.keys.button(InputBinding::North), None);
        assert_eq!(tables.keys.binding_for(Key::Space), Some(InputBinding::South));
    }

    #[test]
    fn test_rebind_binding_frees_old_button() {
        let mut tables = BindingTables::default();
        tables.keys.bind(InputBinding::Exit, Key::Q);

        assert_eq!(tables.keys.binding_for(Key::Escape), None);
        assert_eq!(tables.keys.binding_for(Key::Q), Some(InputBinding::Exit));
    }

    #[test]
    fn test_unbind_everywhere() {
        let mut tables = BindingTables::default();
        assert!(tables.is_bound(InputBinding::South));
        tables.unbind(InputBinding::South);
        assert!(!tables.is_bound(InputBinding::South));
        assert_eq!(tables.pad.binding_for(PadButton::A), None);

        assert_eq!(tables.keys.unbind_button(Key::F3), Some(InputBinding::Dump));
        assert_eq!(tables.keys.button(InputBinding::Dump), None);
    }

    #[test]
    fn test_platform_defaults() {
        let desktop = InputSystemConfig::default();
        assert_eq!(desktop.platform, PlatformKind::Desktop);
        assert!(!desktop.touch_input);
        assert_eq!(desktop.gamepad_count, 4);
        assert_eq!(desktop.touch_points, 4);
        assert_eq!(desktop.action_capacity, 128);

        let android = InputSystemConfig::for_platform(PlatformKind::Android);
        assert!(android.touch_input);
    }

    #[test]
    fn test_validate() {
        assert!(InputSystemConfig::default().validate().is_ok());

        let mut config = InputSystemConfig::default();
        config.touch_points = 0;
        assert!(matches!(config.validate(), Err(InputError::InvalidConfig(_))));

        let mut config = InputSystemConfig::default();
        config.gamepad_count = 13;
        assert!(matches!(
            config.validate(),
            Err(InputError::TooManyDevices { max: 16 })
        ));

        let mut config = InputSystemConfig::default();
        config.pad_dead_zone = Some(1.5);
        assert!(config.validate().is_err());

        let mut config = InputSystemConfig::default();
        config.bindings.composites.insert(
            InputBinding::FloatDpad,
            CompositeBinding {
                keys: vec![Key::Up, Key::Down, Key::Left],
            },
        );
        assert!(config.validate().is_err());
    }
}
