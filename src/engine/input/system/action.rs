// Action descriptions, callback payloads and the action arena

use super::binding::InputBinding;
use crate::engine::input::device::DeviceType;
use glam::{Vec2, Vec3};
use std::fmt;

/// Lifecycle phase reported to an action callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    Started,
    Performed,
    Canceled,
}

/// Payload handed to an action callback.
///
/// Which value field is meaningful depends on the binding: buttons fill
/// `bool_value`, 1D composites `float_value`, sticks and D-pads `float2`,
/// pad axes and mouse deltas `float3`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputActionContext<'a> {
    pub phase: InputPhase,
    pub device_type: Option<DeviceType>,
    /// Logical binding of the physical button that changed, if it has one
    pub binding: Option<InputBinding>,
    pub bool_value: bool,
    pub float_value: f32,
    pub float2: Vec2,
    pub float3: Vec3,
    /// Mouse or touch position, when the input comes from a pointer
    pub position: Option<Vec2>,
    /// Mouse capture state for pointer devices, false otherwise
    pub captured: bool,
    /// Text typed this frame (text actions)
    pub text: &'a [char],
    /// Wheel direction of the mouse for pointer devices
    pub scroll_value: f32,
    pub user_id: u32,
}

impl<'a> InputActionContext<'a> {
    pub fn new(phase: InputPhase) -> Self {
        Self {
            phase,
            device_type: None,
            binding: None,
            bool_value: false,
            float_value: 0.0,
            float2: Vec2::ZERO,
            float3: Vec3::ZERO,
            position: None,
            captured: false,
            text: &[],
            scroll_value: 0.0,
            user_id: 0,
        }
    }
}

/// Callback of an action. Returning false stops the controls registered
/// after it on the same button from running.
pub type ActionCallback = Box<dyn FnMut(&InputActionContext<'_>) -> bool>;

/// Description of an action to register
pub struct InputActionDesc {
    pub binding: InputBinding,
    /// Gamepad slot (and touch point) the action listens to
    pub user_id: u32,
    /// Actions without a callback are legal and never invoked
    pub callback: Option<ActionCallback>,
    /// Virtual joystick tuning (touch input); all zero disables the joystick
    pub outside_radius: f32,
    pub dead_zone: f32,
    pub scale: f32,
}

impl InputActionDesc {
    pub fn new(
        binding: InputBinding,
        callback: impl FnMut(&InputActionContext<'_>) -> bool + 'static,
    ) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            ..Self::without_callback(binding)
        }
    }

    pub fn without_callback(binding: InputBinding) -> Self {
        Self {
            binding,
            user_id: 0,
            callback: None,
            outside_radius: 0.0,
            dead_zone: 0.0,
            scale: 0.0,
        }
    }

    pub fn with_user(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }

    /// Tune the on-screen joystick used for stick bindings in touch mode
    pub fn with_virtual_joystick(mut self, outside_radius: f32, dead_zone: f32, scale: f32) -> Self {
        self.outside_radius = outside_radius;
        self.dead_zone = dead_zone;
        self.scale = scale;
        self
    }
}

impl fmt::Debug for InputActionDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputActionDesc")
            .field("binding", &self.binding)
            .field("user_id", &self.user_id)
            .field("callback", &self.callback.is_some())
            .field("outside_radius", &self.outside_radius)
            .field("dead_zone", &self.dead_zone)
            .field("scale", &self.scale)
            .finish()
    }
}

/// Stable handle of a registered action.
///
/// Stays valid while the action lives; a removed action's handle never
/// refers to a later action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle {
    index: u32,
    generation: u32,
}

struct ActionSlot {
    generation: u32,
    desc: Option<InputActionDesc>,
}

/// Generational storage of registered actions
#[derive(Default)]
pub struct ActionArena {
    slots: Vec<ActionSlot>,
    free: Vec<u32>,
    len: usize,
}

impl ActionArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, desc: InputActionDesc) -> ActionHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.desc = Some(desc);
            return ActionHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(ActionSlot {
            generation: 0,
            desc: Some(desc),
        });
        ActionHandle {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, handle: ActionHandle) -> Option<InputActionDesc> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let desc = slot.desc.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(desc)
    }

    pub fn get(&self, handle: ActionHandle) -> Option<&InputActionDesc> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.desc.as_ref())
    }

    pub fn contains(&self, handle: ActionHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Run the callback of `handle`.
    ///
    /// Returns the callback's verdict, or true when there is nothing to run.
    pub fn invoke(&mut self, handle: ActionHandle, ctx: &InputActionContext<'_>) -> bool {
        let callback = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.desc.as_mut())
            .and_then(|desc| desc.callback.as_mut());
        match callback {
            Some(callback) => callback(ctx),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_insert_and_invoke() {
        let mut arena = ActionArena::with_capacity(4);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let handle = arena.insert(InputActionDesc::new(InputBinding::South, move |_| {
            counter.set(counter.get() + 1);
            false
        }));

        assert_eq!(arena.len(), 1);
        assert!(!arena.invoke(handle, &InputActionContext::new(InputPhase::Started)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_missing_callback_continues() {
        let mut arena = ActionArena::default();
        let handle = arena.insert(InputActionDesc::without_callback(InputBinding::South));
        assert!(arena.invoke(handle, &InputActionContext::new(InputPhase::Performed)));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut arena = ActionArena::default();
        let first = arena.insert(InputActionDesc::without_callback(InputBinding::South));
        assert!(arena.remove(first).is_some());
        assert!(arena.remove(first).is_none());

        let second = arena.insert(InputActionDesc::without_callback(InputBinding::East));
        assert_ne!(first, second);
        assert!(!arena.contains(first));
        assert_eq!(arena.get(second).map(|d| d.binding), Some(InputBinding::East));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_desc_builders() {
        let desc = InputActionDesc::without_callback(InputBinding::FloatLeftStick)
            .with_user(2)
            .with_virtual_joystick(200.0, 20.0, 1.0);
        assert_eq!(desc.user_id, 2);
        assert_eq!(desc.outside_radius, 200.0);
        assert_eq!(desc.dead_zone, 20.0);
        assert_eq!(desc.scale, 1.0);
        assert!(format!("{:?}", desc).contains("FloatLeftStick"));
    }
}
