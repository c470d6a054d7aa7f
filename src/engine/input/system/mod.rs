// Action layer: logical bindings, controls and the input system facade
//
// `InputSystem` owns an `InputManager` with the standard device set (mouse, raw mouse,
// keyboard, touch, one pad per user) and an `ActionDispatcher` listening to it.
// Applications register actions against logical bindings and receive
// STARTED/PERFORMED/CANCELED callbacks while the system is updated once per frame.

pub mod action;
pub mod binding;
pub mod control;
pub mod dispatch;

pub use action::{ActionHandle, InputActionContext, InputActionDesc, InputPhase};
pub use binding::InputBinding;
pub use dispatch::{ActionDispatcher, SystemDevices};

use super::config::{BindingTables, InputSystemConfig};
use super::device::pad::PadButton;
use super::device::{DeviceType, DeviceVariant};
use super::event::{from_device_event, from_window_event, PlatformEvent, WindowInput};
use super::manager::{ChangeSender, InputManager, ListenerId};
use super::InputError;
use log::{debug, info, warn};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use winit::dpi::PhysicalPosition;
use winit::event::{DeviceEvent, WindowEvent};
use winit::window::{CursorGrabMode, Window};

/// On-screen keyboard requested by text fields on touch platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VirtualKeyboard {
    #[default]
    Hidden,
    Text,
    Digits,
}

impl From<u32> for VirtualKeyboard {
    fn from(value: u32) -> Self {
        match value {
            0 => VirtualKeyboard::Hidden,
            2 => VirtualKeyboard::Digits,
            _ => VirtualKeyboard::Text,
        }
    }
}

/// Window operations the input system needs
pub trait WindowControl {
    /// Confine and hide the cursor (or release it). Returns false when the
    /// window system refused.
    fn set_cursor_captured(&mut self, captured: bool) -> bool;

    /// Keep a captured cursor away from the window border
    fn warp_cursor_to_center(&mut self) {}

    fn set_virtual_keyboard(&mut self, _keyboard: VirtualKeyboard) {}
}

/// Window control for headless use; capture always succeeds
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWindowControl;

impl WindowControl for NullWindowControl {
    fn set_cursor_captured(&mut self, _captured: bool) -> bool {
        true
    }
}

/// Window control backed by a winit window
pub struct WinitWindowControl {
    window: Rc<Window>,
}

impl WinitWindowControl {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl WindowControl for WinitWindowControl {
    fn set_cursor_captured(&mut self, captured: bool) -> bool {
        let result = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };

        match result {
            Ok(()) => {
                self.window.set_cursor_visible(!captured);
                true
            }
            Err(e) => {
                warn!("Cursor grab failed: {}", e);
                false
            }
        }
    }

    fn warp_cursor_to_center(&mut self) {
        let size = self.window.inner_size();
        let center = PhysicalPosition::new(size.width / 2, size.height / 2);
        if let Err(e) = self.window.set_cursor_position(center) {
            debug!("Cursor warp failed: {}", e);
        }
    }

    fn set_virtual_keyboard(&mut self, keyboard: VirtualKeyboard) {
        self.window.set_ime_allowed(keyboard != VirtualKeyboard::Hidden);
    }
}

/// Input system: devices, actions and per-frame dispatch.
///
/// Created with `new` and torn down with `exit`; several independent
/// systems can live side by side.
pub struct InputSystem {
    manager: InputManager,
    dispatcher: Rc<RefCell<ActionDispatcher>>,
    listener_id: ListenerId,
    devices: SystemDevices,
    window: Box<dyn WindowControl>,
    captured: bool,
    virtual_keyboard: VirtualKeyboard,
}

impl InputSystem {
    pub fn new(config: InputSystemConfig, window: Box<dyn WindowControl>) -> Result<Self, InputError> {
        config.validate()?;

        let mut manager = InputManager::new(config.platform, config.clock_mode);
        let mouse = manager.create_device(DeviceType::Mouse, None, DeviceVariant::Standard)?;
        let raw_mouse = manager.create_device(DeviceType::Mouse, None, DeviceVariant::Raw)?;
        let keyboard = manager.create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)?;
        let touch = manager.create_device(DeviceType::Touch, None, DeviceVariant::Standard)?;
        let gamepads = (0..config.gamepad_count)
            .map(|i| manager.create_device(DeviceType::Pad, Some(i as u32), DeviceVariant::Standard))
            .collect::<Result<Vec<_>, _>>()?;

        let devices = SystemDevices {
            mouse,
            raw_mouse,
            keyboard,
            touch,
            gamepads,
        };

        let dispatcher = Rc::new(RefCell::new(ActionDispatcher::new(
            devices.clone(),
            config.bindings,
            config.touch_input,
            config.touch_points,
            config.action_capacity,
        )));
        let listener_id = manager.add_listener(dispatcher.clone());

        let mut system = Self {
            manager,
            dispatcher,
            listener_id,
            devices,
            window,
            captured: false,
            virtual_keyboard: VirtualKeyboard::Hidden,
        };

        if let Some(dead_zone) = config.pad_dead_zone {
            for controller in 0..system.devices.gamepads.len() {
                system.set_dead_zone(controller, dead_zone);
            }
        }

        info!(
            "Input system initialised: {:?}, {} gamepads, touch input {}",
            config.platform,
            system.devices.gamepads.len(),
            if config.touch_input { "on" } else { "off" }
        );
        Ok(system)
    }

    /// Release the cursor and tear the system down
    pub fn exit(mut self) {
        if self.captured {
            self.window.set_cursor_captured(false);
        }
        self.manager.remove_listener(self.listener_id);
        info!(
            "Input system shut down with {} actions",
            self.dispatcher.borrow().action_count()
        );
    }

    /// Run one frame.
    ///
    /// Fires what the previous frame deferred, then updates the devices and
    /// dispatches this frame's changes.
    pub fn update(&mut self, width: u32, height: u32) {
        self.begin_frame(width, height);
        self.manager.update();
        self.end_frame();
    }

    /// `update` with an externally advanced clock
    pub fn update_with_time(&mut self, width: u32, height: u32, delta_seconds: f32) {
        self.begin_frame(width, height);
        self.manager.update_with_time(delta_seconds);
        self.end_frame();
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        let keyboard = self.manager.device(self.devices.keyboard);
        self.dispatcher.borrow_mut().flush_deferred(keyboard);
        self.manager.set_display_size(width, height);
    }

    fn end_frame(&mut self) {
        if self.captured {
            self.window.warp_cursor_to_center();
        }
    }

    /// Feed one platform event
    pub fn handle_event(&mut self, event: &PlatformEvent) {
        self.manager.handle_event(event);
        if matches!(event, PlatformEvent::Window(WindowInput::FocusLost)) {
            self.reset_input_states();
        }
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        for event in from_window_event(event) {
            self.handle_event(&event);
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let Some(event) = from_device_event(event) {
            self.handle_event(&event);
        }
    }

    /// Producer handle for platform callback threads
    pub fn change_sender(&self) -> ChangeSender {
        self.manager.change_sender()
    }

    /// Release every held mouse, keyboard and pad button
    pub fn reset_input_states(&mut self) {
        debug!("Resetting input states");
        self.manager.clear_all_states(self.devices.mouse);
        self.manager.clear_all_states(self.devices.keyboard);
        for pad in self.devices.gamepads.clone() {
            self.manager.clear_all_states(pad);
        }
    }

    pub fn add_input_action(&mut self, desc: InputActionDesc) -> ActionHandle {
        self.dispatcher.borrow_mut().add_action(desc)
    }

    /// Unregister an action; it never fires again
    pub fn remove_input_action(&mut self, handle: ActionHandle) -> bool {
        let removed = self.dispatcher.borrow_mut().remove_action(handle);
        if !removed {
            warn!("remove_input_action: unknown action {:?}", handle);
        }
        removed
    }

    /// Capture (confine and hide) the mouse cursor, or release it
    pub fn set_enable_capture_input(&mut self, enable: bool) -> bool {
        if !self.window.set_cursor_captured(enable) {
            return false;
        }
        self.captured = enable;
        self.dispatcher.borrow_mut().set_captured(enable);
        info!("Input capture {}", if enable { "enabled" } else { "disabled" });
        true
    }

    pub fn is_input_captured(&self) -> bool {
        self.captured
    }

    pub fn set_virtual_keyboard(&mut self, keyboard: impl Into<VirtualKeyboard>) {
        let keyboard = keyboard.into();
        if keyboard != self.virtual_keyboard {
            self.virtual_keyboard = keyboard;
            self.window.set_virtual_keyboard(keyboard);
        }
    }

    pub fn virtual_keyboard(&self) -> VirtualKeyboard {
        self.virtual_keyboard
    }

    /// Dead zone for the sticks, triggers and thumb buttons of one pad
    pub fn set_dead_zone(&mut self, controller: usize, size: f32) {
        let Some(pad) = self.devices.gamepads.get(controller).copied() else {
            debug!("set_dead_zone: no gamepad {}", controller);
            return;
        };
        let Some(device) = self.manager.device_mut(pad) else {
            return;
        };
        let buttons = [
            PadButton::L3,
            PadButton::R3,
            PadButton::L2,
            PadButton::R2,
            PadButton::Axis4,
            PadButton::Axis5,
        ];
        for button in buttons.into_iter().chain(PadButton::sticks()) {
            device.set_dead_zone(button.id(), size);
        }
    }

    pub fn gamepad_name(&self, controller: usize) -> Option<&str> {
        let pad = self.devices.gamepads.get(controller)?;
        self.manager.device(*pad).map(|d| d.name())
    }

    pub fn gamepad_connected(&self, controller: usize) -> bool {
        self.devices
            .gamepads
            .get(controller)
            .and_then(|pad| self.manager.device(*pad))
            .is_some_and(|d| d.is_available())
    }

    /// Returns false when the pad is missing or has no motors
    pub fn set_rumble_effect(&mut self, controller: usize, left: f32, right: f32, duration_ms: u32) -> bool {
        let Some(pad) = self.devices.gamepads.get(controller).copied() else {
            return false;
        };
        match self.manager.set_rumble(pad, left, right, duration_ms) {
            Ok(()) => true,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    pub fn set_led_color(&mut self, controller: usize, r: u8, g: u8, b: u8) -> bool {
        let Some(pad) = self.devices.gamepads.get(controller).copied() else {
            return false;
        };
        match self.manager.set_led_color(pad, r, g, b) {
            Ok(()) => true,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    pub fn manager(&self) -> &InputManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut InputManager {
        &mut self.manager
    }

    pub fn devices(&self) -> &SystemDevices {
        &self.devices
    }

    /// Binding tables used for actions added from now on.
    ///
    /// Edits are not validated here; an axis or mouse float binding that
    /// fails `is_valid` is skipped with a warning when an action attaches.
    pub fn bindings_mut(&mut self) -> RefMut<'_, BindingTables> {
        RefMut::map(self.dispatcher.borrow_mut(), |d| d.bindings_mut())
    }

    pub fn action_count(&self) -> usize {
        self.dispatcher.borrow().action_count()
    }

    pub fn contains_action(&self, handle: ActionHandle) -> bool {
        self.dispatcher.borrow().contains(handle)
    }
}
