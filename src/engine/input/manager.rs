// Input manager - device registry, update driver and change queue

use super::button::{ButtonValue, DeviceButtonId, DeviceButtonSpec, DeviceId};
use super::device::{
    create_backend, pad, DeviceType, DeviceVariant, InputDevice, PlatformKind, StateTarget,
};
use super::event::PlatformEvent;
use super::listener::{DeviceStateModifier, InputListener, ManagerView};
use super::state::InputDeltaState;
use super::InputError;
use crate::engine::clock::{ClockMode, InputClock};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::cmp::Reverse;
use std::rc::Rc;

/// Size of the device table
pub const MAX_DEVICES: usize = 16;

/// Handle returned by `add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Handle returned by `add_modifier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierId(u32);

/// Value carried by a `DeviceInput`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceInputValue {
    Button(ButtonValue),
    /// Pad connected or disconnected
    Connected(bool),
}

/// Raw change addressed by device kind and index instead of id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceInput {
    pub kind: DeviceType,
    pub index: u32,
    pub button: DeviceButtonId,
    pub value: DeviceInputValue,
}

/// Work handed from callback threads to the update thread
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedInput {
    Change {
        device: DeviceId,
        target: StateTarget,
        button: DeviceButtonId,
        value: ButtonValue,
    },
    Event(PlatformEvent),
    Device(DeviceInput),
}

/// Producer end of the manager's change queue.
///
/// Cheap to clone and `Send`; every producer keeps its own submission order.
#[derive(Debug, Clone)]
pub struct ChangeSender {
    tx: Sender<QueuedInput>,
}

impl ChangeSender {
    pub fn enqueue(&self, input: QueuedInput) {
        if self.tx.send(input).is_err() {
            debug!("Input manager is gone, dropping queued input");
        }
    }

    /// Queue a bool write into the device's next state
    pub fn enqueue_bool(&self, device: DeviceId, button: DeviceButtonId, value: bool) {
        self.enqueue(QueuedInput::Change {
            device,
            target: StateTarget::Next,
            button,
            value: ButtonValue::Bool(value),
        });
    }

    /// Queue a float write into the device's next state
    pub fn enqueue_float(&self, device: DeviceId, button: DeviceButtonId, value: f32) {
        self.enqueue(QueuedInput::Change {
            device,
            target: StateTarget::Next,
            button,
            value: ButtonValue::Float(value),
        });
    }

    pub fn enqueue_event(&self, event: PlatformEvent) {
        self.enqueue(QueuedInput::Event(event));
    }

    pub fn enqueue_device_input(&self, input: DeviceInput) {
        self.enqueue(QueuedInput::Device(input));
    }
}

struct ListenerEntry {
    id: ListenerId,
    priority: i32,
    listener: Rc<RefCell<dyn InputListener>>,
}

type DeviceChangeCallback = Box<dyn FnMut(DeviceId, &str, bool)>;

/// Owns every input device and drives their per-frame update
pub struct InputManager {
    platform: PlatformKind,

    /// Indexed by `DeviceId`
    devices: Vec<InputDevice>,

    /// Sorted by descending priority, insertion order on ties
    listeners: Vec<ListenerEntry>,
    next_listener_id: u32,

    modifiers: Vec<(ModifierId, Rc<RefCell<dyn DeviceStateModifier>>)>,
    next_modifier_id: u32,

    /// Changes recorded since the last notification
    delta: InputDeltaState,

    queue_tx: Sender<QueuedInput>,
    queue_rx: Receiver<QueuedInput>,

    clock: InputClock,
    display_size: (u32, u32),

    /// Pad serial numbers already bound to a slot
    pad_serials: pad::PadSerialTable,

    device_change: Option<DeviceChangeCallback>,
}

impl InputManager {
    /// Create a manager creating devices for `platform`
    pub fn new(platform: PlatformKind, clock_mode: ClockMode) -> Self {
        let (queue_tx, queue_rx) = unbounded();
        Self {
            platform,
            devices: Vec::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
            modifiers: Vec::new(),
            next_modifier_id: 0,
            delta: InputDeltaState::new(),
            queue_tx,
            queue_rx,
            clock: InputClock::new(clock_mode),
            display_size: (0, 0),
            pad_serials: pad::new_serial_table(),
            device_change: None,
        }
    }

    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Create a device of `kind`.
    ///
    /// `index` defaults to the number of devices of that kind already created.
    /// Variants the platform cannot provide fall back to `Standard`.
    pub fn create_device(
        &mut self,
        kind: DeviceType,
        index: Option<u32>,
        variant: DeviceVariant,
    ) -> Result<DeviceId, InputError> {
        if self.devices.len() >= MAX_DEVICES {
            return Err(InputError::TooManyDevices { max: MAX_DEVICES });
        }

        let index = index.unwrap_or_else(|| self.device_count_by_type(kind) as u32);
        let id = DeviceId::from_raw(self.devices.len() as u32);
        let backend = create_backend(kind, variant, index, self.platform, &self.pad_serials);
        let mut device = InputDevice::new(id, kind, index, backend);

        if kind == DeviceType::Pad {
            for stick in pad::PadButton::sticks() {
                device.set_dead_zone(stick.id(), pad::STICK_DEAD_ZONE);
            }
        }

        info!(
            "Created {} ({:?} #{}, {:?}) as {}",
            device.name(),
            kind,
            index,
            device.variant(),
            id
        );
        self.devices.push(device);
        Ok(id)
    }

    pub fn device(&self, id: DeviceId) -> Option<&InputDevice> {
        self.devices.get(id.index())
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut InputDevice> {
        self.devices.get_mut(id.index())
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    pub fn find_device_id(&self, kind: DeviceType, index: u32) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|d| d.kind() == kind && d.index() == index)
            .map(|d| d.id())
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn device_count_by_type(&self, kind: DeviceType) -> usize {
        self.devices.iter().filter(|d| d.kind() == kind).count()
    }

    /// Every (device, button) currently down
    pub fn any_button_down(&self) -> Vec<DeviceButtonSpec> {
        self.devices
            .iter()
            .flat_map(|d| {
                d.buttons_down()
                    .into_iter()
                    .map(move |b| DeviceButtonSpec::new(d.id(), b))
            })
            .collect()
    }

    /// Release every button of a device, notifying listeners on the next update
    pub fn clear_all_states(&mut self, id: DeviceId) {
        let delta = if self.listeners.is_empty() {
            None
        } else {
            Some(&mut self.delta)
        };
        match self.devices.get_mut(id.index()) {
            Some(device) => device.clear_all_states(delta),
            None => warn!("clear_all_states on unknown {}", id),
        }
    }

    /// Start a rumble effect on a device with motors
    pub fn set_rumble(
        &mut self,
        id: DeviceId,
        left: f32,
        right: f32,
        duration_ms: u32,
    ) -> Result<(), InputError> {
        let device = self
            .devices
            .get_mut(id.index())
            .ok_or(InputError::UnknownDevice(id))?;
        if device.set_rumble(left, right, duration_ms) {
            Ok(())
        } else {
            Err(InputError::Unsupported {
                kind: device.kind(),
                operation: "rumble",
            })
        }
    }

    pub fn set_led_color(&mut self, id: DeviceId, r: u8, g: u8, b: u8) -> Result<(), InputError> {
        let device = self
            .devices
            .get_mut(id.index())
            .ok_or(InputError::UnknownDevice(id))?;
        if device.set_led_color(r, g, b) {
            Ok(())
        } else {
            Err(InputError::Unsupported {
                kind: device.kind(),
                operation: "led color",
            })
        }
    }

    /// Producer handle for callback threads
    pub fn change_sender(&self) -> ChangeSender {
        ChangeSender {
            tx: self.queue_tx.clone(),
        }
    }

    /// Queue a change to be applied at the start of the next update
    pub fn enqueue_concurrent_change(
        &self,
        device: DeviceId,
        target: StateTarget,
        button: DeviceButtonId,
        value: ButtonValue,
    ) {
        self.change_sender().enqueue(QueuedInput::Change {
            device,
            target,
            button,
            value,
        });
    }

    /// Queue a change addressed by device kind and index
    pub fn handle_device_input(&self, input: DeviceInput) {
        self.change_sender().enqueue_device_input(input);
    }

    /// Feed one platform event to every device not driven by a modifier
    pub fn handle_event(&mut self, event: &PlatformEvent) {
        let mut delta = if self.listeners.is_empty() {
            None
        } else {
            Some(&mut self.delta)
        };

        let mut toggled = Vec::new();
        for device in self.devices.iter_mut().filter(|d| !d.is_synced()) {
            let was_available = device.is_available();
            device.handle_event(event, delta.as_deref_mut());
            if device.is_available() != was_available {
                toggled.push(device.id());
            }
        }

        for id in toggled {
            self.report_device_change(id);
        }
    }

    fn report_device_change(&mut self, id: DeviceId) {
        let Some(device) = self.devices.get(id.index()) else {
            return;
        };
        let connected = device.is_available();
        info!(
            "{} ({}) {}",
            device.name(),
            id,
            if connected { "connected" } else { "disconnected" }
        );
        if let Some(callback) = self.device_change.as_mut() {
            callback(id, device.name(), connected);
        }
    }

    /// Called with (device, name, connected) when a device toggles availability
    pub fn set_device_change_callback(&mut self, callback: impl FnMut(DeviceId, &str, bool) + 'static) {
        self.device_change = Some(Box::new(callback));
    }

    /// Apply everything queued before this call
    fn drain_queue(&mut self) {
        let pending = self.queue_rx.len();
        for _ in 0..pending {
            let Ok(input) = self.queue_rx.try_recv() else {
                break;
            };
            match input {
                QueuedInput::Change {
                    device,
                    target,
                    button,
                    value,
                } => {
                    let delta = if self.listeners.is_empty() {
                        None
                    } else {
                        Some(&mut self.delta)
                    };
                    match self.devices.get_mut(device.index()) {
                        Some(d) => d.apply_change(target, button, value, delta),
                        None => debug!("Queued change for unknown {}", device),
                    }
                }
                QueuedInput::Event(event) => self.handle_event(&event),
                QueuedInput::Device(input) => self.apply_device_input(input),
            }
        }
    }

    fn apply_device_input(&mut self, input: DeviceInput) {
        let Some(id) = self.find_device_id(input.kind, input.index) else {
            debug!("No {:?} #{} for device input", input.kind, input.index);
            return;
        };
        let delta = if self.listeners.is_empty() {
            None
        } else {
            Some(&mut self.delta)
        };
        let Some(device) = self.devices.get_mut(id.index()) else {
            return;
        };
        if device.is_synced() {
            return;
        }

        match input.value {
            DeviceInputValue::Button(value) => {
                device.apply_change(StateTarget::Next, input.button, value, delta)
            }
            DeviceInputValue::Connected(connected) if input.kind == DeviceType::Pad => {
                let was_available = device.is_available();
                device.set_available(connected);
                if device.is_available() != was_available {
                    self.report_device_change(id);
                }
            }
            DeviceInputValue::Connected(_) => {
                debug!("Connection toggle ignored for {:?}", input.kind)
            }
        }
    }

    /// Run one frame.
    ///
    /// Drains the change queue, updates every device, runs the state
    /// modifiers, then hands the recorded changes to the listeners.
    pub fn update(&mut self) {
        self.drain_queue();

        let mut delta = if self.listeners.is_empty() {
            None
        } else {
            Some(&mut self.delta)
        };

        for device in self.devices.iter_mut() {
            device.update(delta.as_deref_mut());
        }

        let time_ms = self.clock.now_ms();
        for (_, modifier) in &self.modifiers {
            modifier
                .borrow_mut()
                .update(&mut self.devices, time_ms, delta.as_deref_mut());
        }

        self.notify_listeners();
        self.clock.tick();
    }

    /// Advance an external clock by `delta_seconds`, then update
    pub fn update_with_time(&mut self, delta_seconds: f32) {
        if !self.clock.advance(delta_seconds) {
            debug_assert!(false, "update_with_time on a system clock");
            warn!("update_with_time called on a system clock manager");
        }
        self.update();
    }

    fn notify_listeners(&mut self) {
        if self.delta.is_empty() {
            return;
        }

        let changes = self.delta.take();
        let view = ManagerView::new(&self.devices, self.clock.now_ms(), self.display_size);
        for change in &changes {
            for entry in &self.listeners {
                let mut listener = entry.listener.borrow_mut();
                let keep_going = match (change.old_value, change.new_value) {
                    (ButtonValue::Bool(old), ButtonValue::Bool(new)) => listener
                        .on_device_button_bool(&view, change.device_id, change.button_id, old, new),
                    (old, new) => listener.on_device_button_float(
                        &view,
                        change.device_id,
                        change.button_id,
                        old.as_float(),
                        new.as_float(),
                    ),
                };
                if !keep_going {
                    break;
                }
            }
        }
    }

    pub fn add_listener(&mut self, listener: Rc<RefCell<dyn InputListener>>) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        let priority = listener.borrow().priority();
        self.listeners.push(ListenerEntry {
            id,
            priority,
            listener,
        });
        self.reorder_listeners();
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.reorder_listeners();
        self.listeners.len() != before
    }

    /// Re-read listener priorities and sort; ties keep insertion order
    pub fn reorder_listeners(&mut self) {
        for entry in &mut self.listeners {
            entry.priority = entry.listener.borrow().priority();
        }
        self.listeners.sort_by_key(|entry| (Reverse(entry.priority), entry.id.0));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn add_modifier(&mut self, modifier: Rc<RefCell<dyn DeviceStateModifier>>) -> ModifierId {
        let id = ModifierId(self.next_modifier_id);
        self.next_modifier_id += 1;
        self.modifiers.push((id, modifier));
        id
    }

    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        let before = self.modifiers.len();
        self.modifiers.retain(|(modifier_id, _)| *modifier_id != id);
        self.modifiers.len() != before
    }

    /// Milliseconds since the manager started (or accumulated external time)
    pub fn time_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &InputClock {
        &self.clock
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display_size
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(PlatformKind::default(), ClockMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::keyboard::Key;
    use crate::engine::input::device::pad::PadButton;
    use crate::engine::input::event::WindowInput;
    use std::thread;
    use winit::keyboard::KeyCode;

    /// Records every notification it receives
    #[derive(Default)]
    struct Collector {
        priority: i32,
        stop: bool,
        bools: Vec<(DeviceId, DeviceButtonId, bool, bool)>,
        floats: Vec<(DeviceId, DeviceButtonId, f32)>,
    }

    impl InputListener for Collector {
        fn on_device_button_bool(
            &mut self,
            _view: &ManagerView<'_>,
            device: DeviceId,
            button: DeviceButtonId,
            old_value: bool,
            new_value: bool,
        ) -> bool {
            self.bools.push((device, button, old_value, new_value));
            !self.stop
        }

        fn on_device_button_float(
            &mut self,
            _view: &ManagerView<'_>,
            device: DeviceId,
            button: DeviceButtonId,
            _old_value: f32,
            new_value: f32,
        ) -> bool {
            self.floats.push((device, button, new_value));
            !self.stop
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn key_event(code: KeyCode, pressed: bool) -> PlatformEvent {
        PlatformEvent::Window(WindowInput::KeyboardKey {
            code,
            pressed,
            repeat: false,
        })
    }

    fn manager_with_collector() -> (InputManager, Rc<RefCell<Collector>>) {
        let mut manager = InputManager::new(PlatformKind::Desktop, ClockMode::External);
        let collector = Rc::new(RefCell::new(Collector::default()));
        manager.add_listener(collector.clone());
        (manager, collector)
    }

    #[test]
    fn test_device_ids_and_lookup() {
        let mut manager = InputManager::default();
        let mouse = manager
            .create_device(DeviceType::Mouse, None, DeviceVariant::Standard)
            .unwrap();
        let pad0 = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Standard)
            .unwrap();
        let pad1 = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Standard)
            .unwrap();

        assert_ne!(mouse, pad0);
        assert_eq!(manager.find_device_id(DeviceType::Pad, 1), Some(pad1));
        assert_eq!(manager.find_device_id(DeviceType::Touch, 0), None);
        assert_eq!(manager.device_count(), 3);
        assert_eq!(manager.device_count_by_type(DeviceType::Pad), 2);

        // Pad sticks get the default dead zone
        let pad = manager.device(pad0).unwrap();
        assert_eq!(pad.dead_zone(PadButton::LeftStickX.id()), pad::STICK_DEAD_ZONE);
    }

    #[test]
    fn test_device_table_limit() {
        let mut manager = InputManager::default();
        for _ in 0..MAX_DEVICES {
            manager
                .create_device(DeviceType::Keyboard, None, DeviceVariant::Null)
                .unwrap();
        }
        let result = manager.create_device(DeviceType::Keyboard, None, DeviceVariant::Null);
        assert!(matches!(result, Err(InputError::TooManyDevices { .. })));
    }

    #[test]
    fn test_events_notify_after_update() {
        let (mut manager, collector) = manager_with_collector();
        let keyboard = manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();

        manager.handle_event(&key_event(KeyCode::KeyA, true));
        assert!(collector.borrow().bools.is_empty());

        manager.update();
        assert_eq!(
            collector.borrow().bools,
            vec![(keyboard, Key::A.id(), false, true)]
        );
        assert!(manager.device(keyboard).unwrap().get_bool(Key::A.id()));
    }

    #[test]
    fn test_second_update_is_quiet() {
        let (mut manager, collector) = manager_with_collector();
        manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();
        manager
            .create_device(DeviceType::Mouse, None, DeviceVariant::Standard)
            .unwrap();

        manager.handle_event(&key_event(KeyCode::Space, true));
        manager.update();
        let seen = collector.borrow().bools.len();

        manager.update();
        assert_eq!(collector.borrow().bools.len(), seen);
        assert!(collector.borrow().floats.is_empty());
    }

    #[test]
    fn test_listener_priority_and_stop() {
        let mut manager = InputManager::new(PlatformKind::Desktop, ClockMode::External);
        manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();

        let low = Rc::new(RefCell::new(Collector::default()));
        let high = Rc::new(RefCell::new(Collector {
            priority: 10,
            stop: true,
            ..Default::default()
        }));
        manager.add_listener(low.clone());
        manager.add_listener(high.clone());

        manager.handle_event(&key_event(KeyCode::KeyB, true));
        manager.update();

        assert_eq!(high.borrow().bools.len(), 1);
        assert!(low.borrow().bools.is_empty());
    }

    #[test]
    fn test_remove_listener() {
        let (mut manager, _collector) = manager_with_collector();
        let extra = Rc::new(RefCell::new(Collector::default()));
        let id = manager.add_listener(extra);
        assert_eq!(manager.listener_count(), 2);
        assert!(manager.remove_listener(id));
        assert!(!manager.remove_listener(id));
        assert_eq!(manager.listener_count(), 1);
    }

    #[test]
    fn test_concurrent_producers_keep_order() {
        let (mut manager, collector) = manager_with_collector();
        let pad = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Null)
            .unwrap();

        let producers: Vec<_> = [PadButton::Axis4, PadButton::Axis5]
            .into_iter()
            .map(|axis| {
                let sender = manager.change_sender();
                thread::spawn(move || {
                    for step in 1..=50 {
                        sender.enqueue_float(pad, axis.id(), step as f32 / 50.0);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        manager.update();

        let collector = collector.borrow();
        for axis in [PadButton::Axis4, PadButton::Axis5] {
            let values: Vec<f32> = collector
                .floats
                .iter()
                .filter(|(_, button, _)| *button == axis.id())
                .map(|(_, _, value)| *value)
                .collect();
            assert_eq!(values.len(), 50);
            assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        }
        let device = manager.device(pad).unwrap();
        assert_eq!(device.get_float(PadButton::Axis4.id()), 1.0);
    }

    #[test]
    fn test_queued_event_applied_on_update() {
        let mut manager = InputManager::default();
        let keyboard = manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();
        let sender = manager.change_sender();
        thread::spawn(move || sender.enqueue_event(key_event(KeyCode::KeyQ, true)))
            .join()
            .unwrap();

        manager.update();
        assert!(manager.device(keyboard).unwrap().get_bool(Key::Q.id()));
    }

    #[test]
    fn test_device_input_connection_toggle() {
        let mut manager = InputManager::new(PlatformKind::Android, ClockMode::External);
        let pad = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Standard)
            .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        manager.set_device_change_callback(move |id, _name, connected| {
            sink.borrow_mut().push((id, connected));
        });

        manager.handle_device_input(DeviceInput {
            kind: DeviceType::Pad,
            index: 0,
            button: 0,
            value: DeviceInputValue::Connected(true),
        });
        manager.handle_device_input(DeviceInput {
            kind: DeviceType::Pad,
            index: 0,
            button: PadButton::A.id(),
            value: DeviceInputValue::Button(ButtonValue::Bool(true)),
        });
        manager.update();

        let device = manager.device(pad).unwrap();
        assert!(device.is_available());
        assert!(device.get_bool(PadButton::A.id()));
        assert_eq!(*seen.borrow(), vec![(pad, true)]);
    }

    #[test]
    fn test_any_button_down_and_clear() {
        let (mut manager, collector) = manager_with_collector();
        let keyboard = manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();
        manager.handle_event(&key_event(KeyCode::KeyW, true));
        manager.handle_event(&key_event(KeyCode::KeyD, true));
        manager.update();
        assert_eq!(manager.any_button_down().len(), 2);

        manager.clear_all_states(keyboard);
        assert!(manager.any_button_down().is_empty());

        manager.update();
        let releases = collector
            .borrow()
            .bools
            .iter()
            .filter(|(_, _, _, new)| !new)
            .count();
        assert_eq!(releases, 2);
    }

    #[test]
    fn test_rumble_and_led_errors() {
        let mut manager = InputManager::new(PlatformKind::Headless, ClockMode::External);
        let pad = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Standard)
            .unwrap();

        assert!(matches!(
            manager.set_rumble(pad, 1.0, 1.0, 100),
            Err(InputError::Unsupported {
                kind: DeviceType::Pad,
                ..
            })
        ));
        assert!(matches!(
            manager.set_led_color(DeviceId::from_raw(9), 255, 0, 0),
            Err(InputError::UnknownDevice(_))
        ));
    }

    #[test]
    fn test_external_clock() {
        let mut manager = InputManager::new(PlatformKind::Headless, ClockMode::External);
        manager.update_with_time(0.5);
        assert_eq!(manager.time_ms(), 500);
        assert_eq!(manager.clock().tick_count(), 1);
    }
}
