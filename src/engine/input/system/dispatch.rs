// Routing of device button changes to the controls of registered actions

use super::action::{ActionArena, ActionHandle, InputActionContext, InputActionDesc, InputPhase};
use super::binding::InputBinding;
use super::control::{
    AxisControl, ButtonControl, ComboControl, CompositeControl, Control, ControlKind, Firing,
    FloatControl, JoystickArea, Reaction, TouchSample, VirtualJoystickControl, WheelControl,
};
use crate::engine::input::button::{DeviceButtonId, DeviceButtonSpec, DeviceId};
use crate::engine::input::config::BindingTables;
use crate::engine::input::device::keyboard::Key;
use crate::engine::input::device::mouse::MouseButton;
use crate::engine::input::device::pad::PadButton;
use crate::engine::input::device::touch::{touch_down, touch_user, touch_x, touch_y};
use crate::engine::input::device::{DeviceType, InputDevice};
use crate::engine::input::listener::{InputListener, ManagerView};
use glam::Vec2;
use log::{debug, warn};
use std::collections::HashMap;

/// Index of a control in the dispatcher's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

/// Devices created by the input system
#[derive(Debug, Clone)]
pub struct SystemDevices {
    pub mouse: DeviceId,
    pub raw_mouse: DeviceId,
    pub keyboard: DeviceId,
    pub touch: DeviceId,
    /// Indexed by user id
    pub gamepads: Vec<DeviceId>,
}

impl SystemDevices {
    fn is_mouse(&self, device: DeviceId) -> bool {
        device == self.mouse || device == self.raw_mouse
    }

    fn kind_of(&self, device: DeviceId) -> Option<DeviceType> {
        if self.is_mouse(device) {
            Some(DeviceType::Mouse)
        } else if device == self.keyboard {
            Some(DeviceType::Keyboard)
        } else if device == self.touch {
            Some(DeviceType::Touch)
        } else if self.gamepads.contains(&device) {
            Some(DeviceType::Pad)
        } else {
            None
        }
    }
}

/// Listener turning button changes into action callbacks.
///
/// Owns the actions, their controls and the per-button routing lists.
pub struct ActionDispatcher {
    devices: SystemDevices,
    bindings: BindingTables,
    touch_input: bool,

    actions: ActionArena,
    controls: Vec<Option<Control>>,
    action_controls: HashMap<ActionHandle, Vec<ControlId>>,

    /// Controls to run, in registration order, per device button
    routes: HashMap<DeviceButtonSpec, Vec<ControlId>>,

    text_actions: Vec<ActionHandle>,

    /// Controls that fire CANCELED at the start of the next update
    cancel_queue: Vec<ControlId>,
    /// Button controls that fire PERFORMED at the start of the next update
    perform_queue: Vec<ControlId>,

    touch_positions: Vec<Vec2>,
    mouse_position: Vec2,
    captured: bool,
}

impl ActionDispatcher {
    pub fn new(
        devices: SystemDevices,
        bindings: BindingTables,
        touch_input: bool,
        touch_points: usize,
        action_capacity: usize,
    ) -> Self {
        Self {
            devices,
            bindings,
            touch_input,
            actions: ActionArena::with_capacity(action_capacity),
            controls: Vec::new(),
            action_controls: HashMap::new(),
            routes: HashMap::new(),
            text_actions: Vec::new(),
            cancel_queue: Vec::new(),
            perform_queue: Vec::new(),
            touch_positions: vec![Vec2::ZERO; touch_points],
            mouse_position: Vec2::ZERO,
            captured: false,
        }
    }

    pub fn devices(&self) -> &SystemDevices {
        &self.devices
    }

    pub fn bindings(&self) -> &BindingTables {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut BindingTables {
        &mut self.bindings
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn contains(&self, handle: ActionHandle) -> bool {
        self.actions.contains(handle)
    }

    /// Number of controls attached to `handle`
    pub fn control_count(&self, handle: ActionHandle) -> usize {
        self.action_controls.get(&handle).map_or(0, Vec::len)
    }

    fn allocate(&mut self, control: Control) -> ControlId {
        let id = ControlId(self.controls.len());
        self.action_controls.entry(control.action).or_default().push(id);
        self.controls.push(Some(control));
        id
    }

    fn route(&mut self, id: ControlId, device: DeviceId, button: DeviceButtonId) {
        let routes = self.routes.entry(DeviceButtonSpec::new(device, button)).or_default();
        if !routes.contains(&id) {
            routes.push(id);
        }
    }

    fn button_control(&mut self, action: ActionHandle, user_id: u32) -> ControlId {
        let kind = ControlKind::Button(ButtonControl {
            deferred: self.touch_input,
        });
        self.allocate(Control::new(action, user_id, kind))
    }

    /// Register an action and attach the controls its binding calls for
    pub fn add_action(&mut self, desc: InputActionDesc) -> ActionHandle {
        let binding = desc.binding;
        let user_id = desc.user_id;
        let outside_radius = desc.outside_radius;
        let dead_zone = desc.dead_zone;
        let scale = desc.scale;
        let handle = self.actions.insert(desc);

        if binding == InputBinding::Text {
            self.text_actions.push(handle);
            return handle;
        }

        let gamepad = self.devices.gamepads.get(user_id as usize).copied();
        if gamepad.is_none() {
            debug!("No gamepad slot for user {}", user_id);
        }

        match binding {
            InputBinding::Any => self.attach_any(handle, user_id, gamepad),
            InputBinding::Fullscreen => {
                let combo = ComboControl::new(Key::AltL.id(), Key::Return.id());
                let id = self.allocate(Control::new(handle, user_id, ControlKind::Combo(combo)));
                let keyboard = self.devices.keyboard;
                self.route(id, keyboard, Key::Return.id());
                self.route(id, keyboard, Key::AltL.id());
            }
            InputBinding::Dump => {
                if let Some(pad) = gamepad {
                    let combo = ComboControl::new(PadButton::Start.id(), PadButton::B.id());
                    let id = self.allocate(Control::new(handle, user_id, ControlKind::Combo(combo)));
                    self.route(id, pad, PadButton::B.id());
                    self.route(id, pad, PadButton::Start.id());
                }
                if let Some(key) = self.bindings.keys.button(binding) {
                    let id = self.button_control(handle, user_id);
                    let keyboard = self.devices.keyboard;
                    self.route(id, keyboard, key.id());
                }
            }
            InputBinding::Key(key) => {
                let id = self.button_control(handle, user_id);
                let keyboard = self.devices.keyboard;
                self.route(id, keyboard, key.id());
            }
            InputBinding::FloatDpad => {
                if let Some(pad) = gamepad {
                    let buttons = [PadButton::Right, PadButton::Left, PadButton::Up, PadButton::Down]
                        .map(PadButton::id)
                        .to_vec();
                    let composite = CompositeControl::new(buttons.clone());
                    let id =
                        self.allocate(Control::new(handle, user_id, ControlKind::Composite(composite)));
                    for button in buttons {
                        self.route(id, pad, button);
                    }
                }
            }
            InputBinding::FloatMouseWheel => self.attach_wheel(handle, user_id, binding),
            binding if binding.is_float() => self.attach_float(
                handle,
                user_id,
                binding,
                gamepad,
                (outside_radius, dead_zone, scale),
            ),
            binding => self.attach_button(handle, user_id, binding, gamepad),
        }

        handle
    }

    fn attach_any(&mut self, handle: ActionHandle, user_id: u32, gamepad: Option<DeviceId>) {
        let id = self.button_control(handle, user_id);
        if let Some(pad) = gamepad {
            let buttons: Vec<_> = self.bindings.pad.iter().map(|(_, b)| b.id()).collect();
            for button in buttons {
                self.route(id, pad, button);
            }
        }
        let keys: Vec<_> = self.bindings.keys.iter().map(|(_, k)| k.id()).collect();
        let keyboard = self.devices.keyboard;
        for key in keys {
            self.route(id, keyboard, key);
        }
        if self.touch_input {
            let touch = self.devices.touch;
            self.route(id, touch, touch_down(user_id));
        } else {
            let buttons: Vec<_> = self.bindings.mouse.iter().map(|(_, b)| b.id()).collect();
            let mouse = self.devices.mouse;
            for button in buttons {
                self.route(id, mouse, button);
            }
        }
    }

    fn attach_button(
        &mut self,
        handle: ActionHandle,
        user_id: u32,
        binding: InputBinding,
        gamepad: Option<DeviceId>,
    ) {
        let id = self.button_control(handle, user_id);
        if let (Some(pad), Some(button)) = (gamepad, self.bindings.pad.button(binding)) {
            self.route(id, pad, button.id());
        }
        if self.touch_input {
            if binding == InputBinding::South {
                let touch = self.devices.touch;
                self.route(id, touch, touch_down(user_id));
            }
        } else {
            if let Some(key) = self.bindings.keys.button(binding) {
                let keyboard = self.devices.keyboard;
                self.route(id, keyboard, key.id());
            }
            if let Some(button) = self.bindings.mouse.button(binding) {
                let mouse = self.devices.mouse;
                self.route(id, mouse, button.id());
            }
        }
    }

    fn attach_wheel(&mut self, handle: ActionHandle, user_id: u32, binding: InputBinding) {
        let Some(wheel) = self.bindings.mouse_wheels.get(&binding).copied() else {
            warn!("No wheel binding for {:?}", binding);
            return;
        };
        let control = WheelControl {
            up: wheel.up.id(),
            down: wheel.down.id(),
        };
        let id = self.allocate(Control::new(handle, user_id, ControlKind::Wheel(control)));
        let mouse = self.devices.mouse;
        self.route(id, mouse, wheel.up.id());
        self.route(id, mouse, wheel.down.id());
    }

    fn attach_float(
        &mut self,
        handle: ActionHandle,
        user_id: u32,
        binding: InputBinding,
        gamepad: Option<DeviceId>,
        (outside_radius, dead_zone, scale): (f32, f32, f32),
    ) {
        match self.bindings.axes.get(&binding).copied() {
            Some(axis) if !axis.is_valid() => {
                warn!(
                    "Axis binding for {:?} spans {} axes from {:?}, skipped",
                    binding, axis.axis_count, axis.start
                );
            }
            Some(axis) => {
                if let Some(pad) = gamepad {
                    let control = AxisControl::new(&axis);
                    let id = self.allocate(Control::new(handle, user_id, ControlKind::Axis(control)));
                    for button in axis.buttons() {
                        self.route(id, pad, button.id());
                    }
                }
            }
            None => {
                warn!("No pad axis binding for {:?}", binding);
            }
        }

        let is_stick = matches!(binding, InputBinding::FloatLeftStick | InputBinding::FloatRightStick);
        if self.touch_input {
            if is_stick && outside_radius != 0.0 && scale != 0.0 {
                let area = if binding == InputBinding::FloatLeftStick {
                    JoystickArea::Left
                } else {
                    JoystickArea::Right
                };
                let control = VirtualJoystickControl::new(area, outside_radius, dead_zone, scale);
                let id = self.allocate(Control::new(
                    handle,
                    user_id,
                    ControlKind::VirtualJoystick(control),
                ));
                let touch = self.devices.touch;
                for point in 0..2 {
                    self.route(id, touch, touch_down(point));
                    self.route(id, touch, touch_x(point));
                    self.route(id, touch, touch_y(point));
                }
            }
            return;
        }

        if let Some(composite) = self.bindings.composites.get(&binding).cloned() {
            let buttons: Vec<_> = composite.keys.iter().map(|k| k.id()).collect();
            let control = CompositeControl::new(buttons.clone());
            let id = self.allocate(Control::new(handle, user_id, ControlKind::Composite(control)));
            let keyboard = self.devices.keyboard;
            for button in buttons {
                self.route(id, keyboard, button);
            }
        }

        if let Some(float) = self.bindings.mouse_floats.get(&binding).copied() {
            if !float.is_valid() {
                warn!("Mouse float for {:?} spans {} axes, skipped", binding, float.axis_count);
                return;
            }
            let control = FloatControl::new(&float);
            let id = self.allocate(Control::new(handle, user_id, ControlKind::Float(control)));
            let device = if float.raw {
                self.devices.raw_mouse
            } else {
                self.devices.mouse
            };
            for i in 0..float.axis_count {
                self.route(id, device, float.start.id() + i);
            }
        }
    }

    /// Unregister an action and detach all of its controls
    pub fn remove_action(&mut self, handle: ActionHandle) -> bool {
        if self.actions.remove(handle).is_none() {
            return false;
        }
        self.text_actions.retain(|h| *h != handle);

        let ids = self.action_controls.remove(&handle).unwrap_or_default();
        for id in &ids {
            if let Some(slot) = self.controls.get_mut(id.0) {
                *slot = None;
            }
        }
        for routes in self.routes.values_mut() {
            routes.retain(|id| !ids.contains(id));
        }
        self.routes.retain(|_, routes| !routes.is_empty());
        self.cancel_queue.retain(|id| !ids.contains(id));
        self.perform_queue.retain(|id| !ids.contains(id));
        true
    }

    fn pointer_position(&self, user_id: u32) -> Vec2 {
        if self.touch_input {
            self.touch_positions
                .get(user_id as usize)
                .copied()
                .unwrap_or(Vec2::ZERO)
        } else {
            self.mouse_position
        }
    }

    /// Fire what the previous update deferred, then the text typed since.
    ///
    /// Runs before the manager updates.
    pub fn flush_deferred(&mut self, keyboard: Option<&InputDevice>) {
        for id in std::mem::take(&mut self.cancel_queue) {
            let Some(control) = self.controls.get_mut(id.0).and_then(Option::as_mut) else {
                continue;
            };
            control.reset();
            let (action, user_id) = (control.action, control.user_id);

            let mut ctx = InputActionContext::new(InputPhase::Canceled);
            ctx.position = Some(self.pointer_position(user_id));
            ctx.user_id = user_id;
            self.actions.invoke(action, &ctx);
        }

        for id in std::mem::take(&mut self.perform_queue) {
            let Some(control) = self.controls.get(id.0).and_then(Option::as_ref) else {
                continue;
            };
            let (action, user_id) = (control.action, control.user_id);

            let mut ctx = InputActionContext::new(InputPhase::Performed);
            ctx.binding = Some(InputBinding::South);
            ctx.bool_value = true;
            ctx.position = Some(self.pointer_position(user_id));
            ctx.user_id = user_id;
            self.actions.invoke(action, &ctx);
        }

        let Some(keyboard) = keyboard else {
            return;
        };
        let text = keyboard.text_input();
        if text.is_empty() {
            return;
        }
        let mut ctx = InputActionContext::new(InputPhase::Performed);
        ctx.text = text;
        ctx.device_type = Some(DeviceType::Keyboard);
        for handle in self.text_actions.clone() {
            if !self.actions.invoke(handle, &ctx) {
                break;
            }
        }
    }

    /// Logical binding of a physical button
    fn reverse_binding(&self, device: DeviceId, kind: DeviceType, button: DeviceButtonId) -> Option<InputBinding> {
        match kind {
            DeviceType::Pad => PadButton::from_id(button).and_then(|b| self.bindings.pad.binding_for(b)),
            DeviceType::Keyboard => Key::from_id(button)
                .map(|k| self.bindings.keys.binding_for(k).unwrap_or(InputBinding::Key(k))),
            DeviceType::Mouse if device == self.devices.mouse => {
                MouseButton::from_id(button).and_then(|b| self.bindings.mouse.binding_for(b))
            }
            DeviceType::Mouse => None,
            DeviceType::Touch => Some(InputBinding::South),
        }
    }

    /// Refresh the tracked pointer position for a change on `device`.
    ///
    /// Returns the touch sample when the change belongs to a touch contact.
    fn track_pointer(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
    ) -> Option<TouchSample> {
        if self.touch_input {
            if device != self.devices.touch {
                return None;
            }
            let touch = view.device(device)?;
            let index = touch_user(button);
            let position = Vec2::new(touch.get_float(touch_x(index)), touch.get_float(touch_y(index)));
            if let Some(slot) = self.touch_positions.get_mut(index as usize) {
                *slot = position;
            }
            return Some(TouchSample {
                index,
                position,
                display_width: view.display_size().0 as f32,
            });
        }

        if device == self.devices.mouse {
            if let Some(mouse) = view.device(device) {
                self.mouse_position = Vec2::new(
                    mouse.get_float(MouseButton::AxisX.id()),
                    mouse.get_float(MouseButton::AxisY.id()),
                );
            }
        }
        None
    }

    /// Context fields shared by every firing of one change
    fn base_context(
        &self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        touch: Option<TouchSample>,
    ) -> InputActionContext<'static> {
        let kind = self.devices.kind_of(device);
        let mut ctx = InputActionContext::new(InputPhase::Performed);
        ctx.device_type = kind;
        ctx.binding = kind.and_then(|k| self.reverse_binding(device, k, button));

        if let Some(touch) = touch {
            ctx.position = Some(touch.position);
        } else if !self.touch_input && self.devices.is_mouse(device) {
            ctx.captured = self.captured;
            ctx.position = Some(self.mouse_position);
            if let Some(mouse) = view.device(self.devices.mouse) {
                ctx.scroll_value = mouse.get_float(MouseButton::WheelUp.id())
                    - mouse.get_float(MouseButton::WheelDown.id());
            }
        }
        ctx
    }

    /// Run every control routed to (device, button) with `feed`
    fn run_controls(
        &mut self,
        device: DeviceId,
        button: DeviceButtonId,
        base: &InputActionContext<'_>,
        mut feed: impl FnMut(&mut Control) -> Reaction,
    ) {
        let Some(routes) = self.routes.get(&DeviceButtonSpec::new(device, button)).cloned() else {
            return;
        };

        for id in routes {
            let Some(control) = self.controls.get_mut(id.0).and_then(Option::as_mut) else {
                continue;
            };
            let reaction = feed(control);
            let (action, user_id) = (control.action, control.user_id);

            let keep_going = self.apply(id, action, user_id, base, reaction);
            if !keep_going {
                break;
            }
        }
    }

    /// Fire a reaction's phases and queue its deferred work
    fn apply(
        &mut self,
        id: ControlId,
        action: ActionHandle,
        user_id: u32,
        base: &InputActionContext<'_>,
        reaction: Reaction,
    ) -> bool {
        let mut keep_going = true;
        for firing in reaction.firings {
            let ctx = firing_context(base, &firing, user_id);
            let verdict = self.actions.invoke(action, &ctx);
            if firing.chained {
                keep_going = verdict && keep_going;
            }
        }
        if reaction.defer_perform && !self.perform_queue.contains(&id) {
            self.perform_queue.push(id);
        }
        if reaction.defer_cancel && !self.cancel_queue.contains(&id) {
            self.cancel_queue.push(id);
        }
        keep_going
    }
}

fn firing_context<'a>(base: &InputActionContext<'a>, firing: &Firing, user_id: u32) -> InputActionContext<'a> {
    let mut ctx = base.clone();
    ctx.phase = firing.phase;
    ctx.bool_value = firing.bool_value;
    ctx.float_value = firing.float_value;
    ctx.float2 = firing.float2;
    ctx.float3 = firing.float3;
    if firing.position.is_some() {
        ctx.position = firing.position;
    }
    ctx.user_id = user_id;
    ctx
}

impl InputListener for ActionDispatcher {
    fn on_device_button_bool(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        old_value: bool,
        new_value: bool,
    ) -> bool {
        if old_value == new_value {
            return true;
        }
        let touch = self.track_pointer(view, device, button);
        let base = self.base_context(view, device, button, touch);
        self.run_controls(device, button, &base, |control| {
            control.on_bool(button, old_value, new_value, touch)
        });
        true
    }

    fn on_device_button_float(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        old_value: f32,
        new_value: f32,
    ) -> bool {
        let touch = self.track_pointer(view, device, button);
        let base = self.base_context(view, device, button, touch);
        self.run_controls(device, button, &base, |control| {
            control.on_float(button, old_value, new_value)
        });
        true
    }
}
