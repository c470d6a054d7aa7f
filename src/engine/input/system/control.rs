// Controls: the per-action state machines driven by device button changes
//
// A control never calls back into the application itself. Each change it
// sees produces a `Reaction` listing the phases to fire, in order, plus any
// work deferred to the next update. The dispatcher turns firings into
// callback invocations.

use super::action::{ActionHandle, InputPhase};
use crate::core::math::clamp_to_radius;
use crate::engine::input::button::DeviceButtonId;
use crate::engine::input::config::{AxisBinding, MouseFloatBinding, MAX_BINDING_AXES};
use crate::engine::input::device::touch::{touch_axis, touch_user};
use glam::{Vec2, Vec3};

/// One phase to report, with the values it carries
#[derive(Debug, Clone, PartialEq)]
pub struct Firing {
    pub phase: InputPhase,
    pub bool_value: bool,
    pub float_value: f32,
    pub float2: Vec2,
    pub float3: Vec3,
    /// Replaces the pointer position of the context
    pub position: Option<Vec2>,
    /// The callback's verdict decides whether later controls run
    pub chained: bool,
}

impl Firing {
    pub fn new(phase: InputPhase) -> Self {
        Self {
            phase,
            bool_value: false,
            float_value: 0.0,
            float2: Vec2::ZERO,
            float3: Vec3::ZERO,
            position: None,
            chained: true,
        }
    }

    fn with_bool(mut self, value: bool) -> Self {
        self.bool_value = value;
        self
    }

    fn with_float(mut self, value: f32) -> Self {
        self.float_value = value;
        self
    }

    fn with_float2(mut self, value: Vec2) -> Self {
        self.float2 = value;
        self
    }

    fn with_float3(mut self, value: Vec3) -> Self {
        self.float3 = value;
        self
    }

    fn with_position(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }
}

/// What a control wants done after seeing one change
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reaction {
    pub firings: Vec<Firing>,
    /// Fire PERFORMED at the start of the next update (touch input)
    pub defer_perform: bool,
    /// Reset and fire CANCELED at the start of the next update
    pub defer_cancel: bool,
}

impl Reaction {
    fn fire(&mut self, firing: Firing) {
        self.firings.push(firing);
    }
}

/// Touch contact behind a bool change on the touch device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub index: u32,
    pub position: Vec2,
    pub display_width: f32,
}

/// Plain button: STARTED and PERFORMED on press, CANCELED on release
#[derive(Debug, Clone, Default)]
pub struct ButtonControl {
    /// PERFORMED waits for the next update
    pub deferred: bool,
}

impl ButtonControl {
    fn on_bool(&mut self, old: bool, new: bool) -> Reaction {
        let mut reaction = Reaction::default();
        if new && !old {
            reaction.fire(Firing::new(InputPhase::Started).with_bool(new));
            if self.deferred {
                reaction.defer_perform = true;
            } else {
                reaction.fire(Firing::new(InputPhase::Performed).with_bool(new));
            }
        } else if old && !new {
            reaction.fire(Firing::new(InputPhase::Canceled).with_bool(new));
        }
        reaction
    }
}

/// Two or four buttons combined into a 1D or 2D value.
///
/// Buttons are ordered +x, -x, +y, -y.
#[derive(Debug, Clone)]
pub struct CompositeControl {
    buttons: Vec<DeviceButtonId>,
    value: Vec2,
    started: bool,
    performed: [bool; 4],
    pressed: [bool; 4],
}

impl CompositeControl {
    pub fn new(buttons: Vec<DeviceButtonId>) -> Self {
        debug_assert!(buttons.len() == 2 || buttons.len() == 4);
        Self {
            buttons,
            value: Vec2::ZERO,
            started: false,
            performed: [false; 4],
            pressed: [false; 4],
        }
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }

    fn axis_value(&self, axis: usize) -> f32 {
        let positive = self.pressed[axis * 2] as i32;
        let negative = self.pressed[axis * 2 + 1] as i32;
        (positive - negative) as f32
    }

    fn snapshot(&self, phase: InputPhase, axis: usize) -> Firing {
        let firing = Firing::new(phase);
        if self.buttons.len() == 2 {
            firing.with_float(self.value[axis])
        } else {
            firing.with_float2(self.value)
        }
    }

    fn on_bool(&mut self, button: DeviceButtonId, old: bool, new: bool) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(index) = self.buttons.iter().position(|b| *b == button) else {
            return reaction;
        };
        let axis = usize::from(index > 1);

        if new {
            self.pressed[index] = true;
            self.value[axis] = self.axis_value(axis);
        }

        if !self.started && !old && new {
            self.started = true;
            reaction.fire(self.snapshot(InputPhase::Started, axis));
        }

        if self.started && new && !self.performed[index] {
            self.performed[index] = true;
            reaction.fire(self.snapshot(InputPhase::Performed, axis));
        }

        if old && !new {
            self.performed[index] = false;
            self.pressed[index] = false;
            if self.performed.iter().all(|p| !p) {
                self.value = Vec2::ZERO;
                self.started = false;
                reaction.fire(self.snapshot(InputPhase::Canceled, axis));
            } else {
                self.value[axis] = self.axis_value(axis);
                reaction.fire(self.snapshot(InputPhase::Performed, axis));
            }
        }

        reaction
    }
}

/// Mouse wheel as a one-frame float pulse
#[derive(Debug, Clone)]
pub struct WheelControl {
    pub up: DeviceButtonId,
    pub down: DeviceButtonId,
}

impl WheelControl {
    fn on_bool(&mut self, button: DeviceButtonId, old: bool, new: bool) -> Reaction {
        let mut reaction = Reaction::default();
        if !old && new {
            let direction = if button == self.up { 1.0 } else { -1.0 };
            reaction.fire(Firing::new(InputPhase::Performed).with_float2(Vec2::new(0.0, direction)));
            reaction.defer_cancel = true;
        }
        reaction
    }
}

/// Consecutive float buttons of a pointer device read as one vector
#[derive(Debug, Clone)]
pub struct FloatControl {
    start: DeviceButtonId,
    axis_count: u32,
    target: u8,
    /// Accumulate the motion of each report instead of storing values
    delta: bool,
    value: Vec3,
    started: u8,
    performed: u8,
}

impl FloatControl {
    /// Expects a binding that passed `is_valid`
    pub fn new(binding: &MouseFloatBinding) -> Self {
        Self {
            start: binding.start.id(),
            axis_count: binding.axis_count.min(MAX_BINDING_AXES),
            target: binding.target_mask(),
            delta: binding.delta,
            value: Vec3::ZERO,
            started: 0,
            performed: 0,
        }
    }

    fn on_float(&mut self, button: DeviceButtonId, old: f32, new: f32) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(axis) = button.checked_sub(self.start).filter(|a| *a < self.axis_count) else {
            return reaction;
        };
        let bit = 1u8 << axis;
        let axis = axis as usize;

        if self.delta {
            let sign = if axis > 0 { -1.0 } else { 1.0 };
            self.value[axis] += sign * (new - old);

            if self.started & bit == 0 {
                self.started |= bit;
                if self.started == self.target {
                    reaction.fire(Firing::new(InputPhase::Started).with_float3(self.value));
                }
                reaction.defer_cancel = true;
            }
        } else {
            self.value[axis] = new;
        }

        self.performed |= bit;
        if self.performed == self.target {
            self.performed = 0;
            reaction.fire(Firing::new(InputPhase::Performed).with_float3(self.value));
        }
        reaction
    }

    fn reset(&mut self) {
        self.started = 0;
        self.performed = 0;
        self.value = Vec3::ZERO;
    }
}

/// Pad axes (stick, trigger) read as one vector.
///
/// STARTED once every axis reported and the value left zero, PERFORMED each
/// time every axis reported again, CANCELED when the value returns to zero.
#[derive(Debug, Clone)]
pub struct AxisControl {
    start: DeviceButtonId,
    axis_count: u32,
    target: u8,
    value: Vec3,
    started: u8,
    performed: u8,
    active: bool,
}

impl AxisControl {
    /// Expects a binding that passed `is_valid`
    pub fn new(binding: &AxisBinding) -> Self {
        Self {
            start: binding.start.id(),
            axis_count: binding.axis_count.min(MAX_BINDING_AXES),
            target: binding.target_mask(),
            value: Vec3::ZERO,
            started: 0,
            performed: 0,
            active: false,
        }
    }

    fn on_float(&mut self, button: DeviceButtonId, new: f32) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(axis) = button.checked_sub(self.start).filter(|a| *a < self.axis_count) else {
            return reaction;
        };
        let bit = 1u8 << axis;
        self.value[axis as usize] = new;
        self.started |= bit;
        self.performed |= bit;

        if !self.active && self.started == self.target && self.value != Vec3::ZERO {
            self.active = true;
            reaction.fire(Firing::new(InputPhase::Started).with_float3(self.value));
        }

        if self.performed == self.target {
            self.performed = 0;
            if self.active {
                if self.value == Vec3::ZERO {
                    self.active = false;
                    self.started = 0;
                    reaction.fire(Firing::new(InputPhase::Canceled));
                } else {
                    reaction.fire(Firing::new(InputPhase::Performed).with_float3(self.value));
                }
            }
        }
        reaction
    }
}

/// Screen half a virtual joystick accepts touches in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickArea {
    Left,
    Right,
}

/// On-screen stick emulated from one touch contact
#[derive(Debug, Clone)]
pub struct VirtualJoystickControl {
    area: JoystickArea,
    outside_radius: f32,
    dead_zone: f32,
    scale: f32,
    start_pos: Vec2,
    curr_pos: Vec2,
    /// Contact driving the stick; None while idle
    touch_index: Option<u32>,
    started: bool,
    performed: u8,
}

impl VirtualJoystickControl {
    pub fn new(area: JoystickArea, outside_radius: f32, dead_zone: f32, scale: f32) -> Self {
        Self {
            area,
            outside_radius,
            dead_zone,
            scale,
            start_pos: Vec2::ZERO,
            curr_pos: Vec2::ZERO,
            touch_index: None,
            started: false,
            performed: 0,
        }
    }

    pub fn touch_index(&self) -> Option<u32> {
        self.touch_index
    }

    fn in_area(&self, x: f32, display_width: f32) -> bool {
        let half = display_width * 0.5;
        match self.area {
            JoystickArea::Left => x <= half,
            JoystickArea::Right => x > half,
        }
    }

    fn on_bool(&mut self, old: bool, new: bool, touch: Option<TouchSample>) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(touch) = touch else {
            return reaction;
        };

        if !old && new && !self.started {
            self.start_pos = touch.position;
            if self.in_area(touch.position.x, touch.display_width) {
                self.started = true;
                self.touch_index = Some(touch.index);
                self.curr_pos = self.start_pos;
                reaction.fire(
                    Firing::new(InputPhase::Started)
                        .with_float2(Vec2::ZERO)
                        .with_position(self.curr_pos),
                );
            } else {
                self.started = false;
                self.touch_index = None;
            }
        } else if old && !new && self.touch_index == Some(touch.index) {
            self.touch_index = None;
            self.started = false;
            self.performed = 0;
            reaction.fire(Firing::new(InputPhase::Canceled).with_float2(Vec2::ZERO));
        }
        reaction
    }

    fn on_float(&mut self, button: DeviceButtonId, new: f32) -> Reaction {
        let mut reaction = Reaction::default();
        if !self.started || self.touch_index != Some(touch_user(button)) {
            return reaction;
        }
        let axis = touch_axis(button);
        if !(0..=1).contains(&axis) {
            return reaction;
        }

        self.performed |= 1 << axis;
        self.curr_pos[axis as usize] = new;
        if self.performed == 0b11 {
            let half_radius = self.outside_radius * 0.5 - self.dead_zone;
            let direction = if half_radius > 0.0 {
                self.curr_pos = clamp_to_radius(self.start_pos, self.curr_pos, half_radius);
                (self.curr_pos - self.start_pos) / half_radius * self.scale
            } else {
                Vec2::ZERO
            };
            reaction.fire(
                Firing::new(InputPhase::Performed)
                    .with_float2(Vec2::new(direction.x, -direction.y))
                    .with_position(self.curr_pos),
            );
        }
        reaction
    }
}

/// Hold one button, release another: a single PERFORMED
#[derive(Debug, Clone)]
pub struct ComboControl {
    pub press: DeviceButtonId,
    pub trigger: DeviceButtonId,
    pressed: bool,
}

impl ComboControl {
    pub fn new(press: DeviceButtonId, trigger: DeviceButtonId) -> Self {
        Self {
            press,
            trigger,
            pressed: false,
        }
    }

    fn on_bool(&mut self, button: DeviceButtonId, old: bool, new: bool) -> Reaction {
        let mut reaction = Reaction::default();
        if button == self.press {
            self.pressed = new;
        } else if button == self.trigger && self.pressed && old && !new {
            let mut firing = Firing::new(InputPhase::Performed).with_bool(true);
            firing.chained = false;
            reaction.fire(firing);
        }
        reaction
    }
}

/// State machine variants
#[derive(Debug, Clone)]
pub enum ControlKind {
    Button(ButtonControl),
    Composite(CompositeControl),
    Wheel(WheelControl),
    Float(FloatControl),
    Axis(AxisControl),
    VirtualJoystick(VirtualJoystickControl),
    Combo(ComboControl),
}

/// A control attached to one action
#[derive(Debug, Clone)]
pub struct Control {
    pub action: ActionHandle,
    pub user_id: u32,
    pub kind: ControlKind,
}

impl Control {
    pub fn new(action: ActionHandle, user_id: u32, kind: ControlKind) -> Self {
        Self {
            action,
            user_id,
            kind,
        }
    }

    /// Feed a bool button change
    pub fn on_bool(
        &mut self,
        button: DeviceButtonId,
        old: bool,
        new: bool,
        touch: Option<TouchSample>,
    ) -> Reaction {
        match &mut self.kind {
            ControlKind::Button(control) => control.on_bool(old, new),
            ControlKind::Composite(control) => control.on_bool(button, old, new),
            ControlKind::Wheel(control) => control.on_bool(button, old, new),
            ControlKind::VirtualJoystick(control) => control.on_bool(old, new, touch),
            ControlKind::Combo(control) => control.on_bool(button, old, new),
            ControlKind::Float(_) | ControlKind::Axis(_) => Reaction::default(),
        }
    }

    /// Feed a float button change
    pub fn on_float(&mut self, button: DeviceButtonId, old: f32, new: f32) -> Reaction {
        match &mut self.kind {
            ControlKind::Float(control) => control.on_float(button, old, new),
            ControlKind::Axis(control) => control.on_float(button, new),
            ControlKind::VirtualJoystick(control) => control.on_float(button, new),
            _ => Reaction::default(),
        }
    }

    /// Clear accumulated values before a deferred CANCELED
    pub fn reset(&mut self) {
        if let ControlKind::Float(control) = &mut self.kind {
            control.reset();
        }
    }
}
