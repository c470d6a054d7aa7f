// Input map - user buttons mapped onto device buttons
//
// A user button collects one or more device buttons. Queries read the
// manager's devices, so the map itself stores no button state.

use super::button::{ButtonType, DeviceButtonId, DeviceButtonSpec, DeviceId};
use super::manager::InputManager;
use std::collections::BTreeMap;
use std::fmt;

pub type UserButtonId = u32;

/// Transforms a mapped float before the policy combines it
pub type FilterFn = Box<dyn Fn(f32) -> f32>;

/// How the values of several down device buttons combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserButtonPolicy {
    /// The first mapped button that is down wins
    #[default]
    FirstDown,
    /// Largest magnitude
    Max,
    /// Smallest magnitude
    Min,
    /// Mean of all buttons that are down
    Average,
}

struct MappedInput {
    spec: DeviceButtonSpec,
    range_min: f32,
    range_max: f32,
    filter: Option<FilterFn>,
}

impl fmt::Debug for MappedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedInput")
            .field("spec", &self.spec)
            .field("range_min", &self.range_min)
            .field("range_max", &self.range_max)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
struct UserButton {
    inputs: Vec<MappedInput>,
    policy: UserButtonPolicy,
    dead_zone: f32,
}

/// Named collection of user buttons
#[derive(Debug, Default)]
pub struct InputMap {
    name: String,
    buttons: BTreeMap<UserButtonId, UserButton>,
}

impl InputMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buttons: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map a device button as a bool (reads 1.0 when down as a float)
    pub fn map_bool(&mut self, user_button: UserButtonId, device: DeviceId, button: DeviceButtonId) {
        self.map_float(user_button, device, button, 0.0, 1.0, None);
    }

    /// Map a device button as a float.
    ///
    /// Bool buttons read `max` when down and `min` when up; float buttons read
    /// `min + value * max`.
    pub fn map_float(
        &mut self,
        user_button: UserButtonId,
        device: DeviceId,
        button: DeviceButtonId,
        min: f32,
        max: f32,
        filter: Option<FilterFn>,
    ) {
        self.buttons
            .entry(user_button)
            .or_default()
            .inputs
            .push(MappedInput {
                spec: DeviceButtonSpec::new(device, button),
                range_min: min,
                range_max: max,
                filter,
            });
    }

    pub fn unmap(&mut self, user_button: UserButtonId) {
        self.buttons.remove(&user_button);
    }

    pub fn is_mapped(&self, user_button: UserButtonId) -> bool {
        self.buttons.contains_key(&user_button)
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
    }

    /// Device buttons mapped to a user button, in mapping order
    pub fn mappings(&self, user_button: UserButtonId) -> Vec<DeviceButtonSpec> {
        self.buttons
            .get(&user_button)
            .map(|ub| ub.inputs.iter().map(|mi| mi.spec).collect())
            .unwrap_or_default()
    }

    /// Returns false when the user button is not mapped
    pub fn set_user_button_policy(&mut self, user_button: UserButtonId, policy: UserButtonPolicy) -> bool {
        match self.buttons.get_mut(&user_button) {
            Some(ub) => {
                ub.policy = policy;
                true
            }
            None => false,
        }
    }

    /// Returns false when the user button is not mapped
    pub fn set_dead_zone(&mut self, user_button: UserButtonId, dead_zone: f32) -> bool {
        match self.buttons.get_mut(&user_button) {
            Some(ub) => {
                ub.dead_zone = dead_zone;
                true
            }
            None => false,
        }
    }

    fn any_input(
        &self,
        manager: &InputManager,
        user_button: UserButtonId,
        test: impl Fn(bool, bool) -> bool,
    ) -> bool {
        let Some(ub) = self.buttons.get(&user_button) else {
            return false;
        };
        ub.inputs.iter().any(|mi| {
            manager.device(mi.spec.device_id).is_some_and(|device| {
                test(
                    device.get_bool(mi.spec.button_id),
                    device.get_bool_previous(mi.spec.button_id),
                )
            })
        })
    }

    pub fn get_bool(&self, manager: &InputManager, user_button: UserButtonId) -> bool {
        self.any_input(manager, user_button, |now, _| now)
    }

    /// Down now but not in the previous frame
    pub fn get_bool_is_new(&self, manager: &InputManager, user_button: UserButtonId) -> bool {
        self.any_input(manager, user_button, |now, previous| now && !previous)
    }

    pub fn get_bool_previous(&self, manager: &InputManager, user_button: UserButtonId) -> bool {
        self.any_input(manager, user_button, |_, previous| previous)
    }

    /// Released this frame
    pub fn get_bool_was_down(&self, manager: &InputManager, user_button: UserButtonId) -> bool {
        self.any_input(manager, user_button, |now, previous| !now && previous)
    }

    pub fn get_float(&self, manager: &InputManager, user_button: UserButtonId) -> f32 {
        self.float_state(manager, user_button, false)
    }

    pub fn get_float_previous(&self, manager: &InputManager, user_button: UserButtonId) -> f32 {
        self.float_state(manager, user_button, true)
    }

    pub fn get_float_delta(&self, manager: &InputManager, user_button: UserButtonId) -> f32 {
        self.get_float(manager, user_button) - self.get_float_previous(manager, user_button)
    }

    fn float_state(&self, manager: &InputManager, user_button: UserButtonId, previous: bool) -> f32 {
        let Some(ub) = self.buttons.get(&user_button) else {
            return 0.0;
        };

        let mut value = 0.0_f32;
        let mut down_count = 0;
        for mi in &ub.inputs {
            let Some(device) = manager.device(mi.spec.device_id) else {
                continue;
            };
            let button = mi.spec.button_id;

            let (down, mut device_value) = match device.button_type(button) {
                Some(ButtonType::Bool) => {
                    let down = if previous {
                        device.get_bool_previous(button)
                    } else {
                        device.get_bool(button)
                    };
                    (down, if down { mi.range_max } else { mi.range_min })
                }
                _ => {
                    let raw = if previous {
                        device.get_float_previous(button)
                    } else {
                        device.get_float(button)
                    };
                    if raw != 0.0 {
                        (true, mi.range_min + raw * mi.range_max)
                    } else {
                        (false, 0.0)
                    }
                }
            };

            if let Some(filter) = &mi.filter {
                device_value = filter(device_value);
            }

            if !down {
                continue;
            }
            down_count += 1;
            match ub.policy {
                UserButtonPolicy::FirstDown => {
                    value = device_value;
                    break;
                }
                UserButtonPolicy::Max => {
                    if device_value.abs() > value.abs() {
                        value = device_value;
                    }
                }
                UserButtonPolicy::Min => {
                    if down_count == 1 || device_value.abs() < value.abs() {
                        value = device_value;
                    }
                }
                UserButtonPolicy::Average => value += device_value,
            }
        }

        if ub.policy == UserButtonPolicy::Average && down_count > 0 {
            value /= down_count as f32;
        }

        if value.abs() <= ub.dead_zone {
            value = 0.0;
        }
        value
    }

    /// User button a device button is mapped to
    pub fn user_button_id(&self, device: DeviceId, button: DeviceButtonId) -> Option<UserButtonId> {
        self.buttons
            .iter()
            .find(|(_, ub)| {
                ub.inputs
                    .iter()
                    .any(|mi| mi.spec.device_id == device && mi.spec.button_id == button)
            })
            .map(|(id, _)| *id)
    }

    /// Name of the first device button mapped to a user button
    pub fn user_button_name(&self, manager: &InputManager, user_button: UserButtonId) -> Option<&'static str> {
        let mi = self.buttons.get(&user_button)?.inputs.first()?;
        manager.device(mi.spec.device_id)?.button_name(mi.spec.button_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ClockMode;
    use crate::engine::input::button::ButtonValue;
    use crate::engine::input::device::pad::PadButton;
    use crate::engine::input::device::{DeviceType, DeviceVariant, PlatformKind, StateTarget};
    use approx::assert_relative_eq;

    const JUMP: UserButtonId = 0;
    const THROTTLE: UserButtonId = 1;

    fn setup() -> (InputManager, DeviceId) {
        let mut manager = InputManager::new(PlatformKind::Headless, ClockMode::External);
        let pad = manager
            .create_device(DeviceType::Pad, None, DeviceVariant::Standard)
            .unwrap();
        (manager, pad)
    }

    fn press(manager: &mut InputManager, pad: DeviceId, button: PadButton, value: ButtonValue) {
        manager.enqueue_concurrent_change(pad, StateTarget::Next, button.id(), value);
        manager.update();
    }

    #[test]
    fn test_bool_edges() {
        let (mut manager, pad) = setup();
        let mut map = InputMap::new("test");
        map.map_bool(JUMP, pad, PadButton::A.id());
        map.map_bool(JUMP, pad, PadButton::B.id());
        assert!(map.is_mapped(JUMP));
        assert_eq!(map.mappings(JUMP).len(), 2);

        press(&mut manager, pad, PadButton::B, ButtonValue::Bool(true));
        assert!(map.get_bool(&manager, JUMP));
        assert!(map.get_bool_is_new(&manager, JUMP));

        manager.update();
        assert!(!map.get_bool_is_new(&manager, JUMP));
        assert!(map.get_bool_previous(&manager, JUMP));

        press(&mut manager, pad, PadButton::B, ButtonValue::Bool(false));
        assert!(map.get_bool_was_down(&manager, JUMP));
        assert_eq!(map.user_button_id(pad, PadButton::B.id()), Some(JUMP));
        assert_eq!(map.user_button_name(&manager, JUMP), Some("pad_button_a"));
    }

    #[test]
    fn test_float_policies() {
        let (mut manager, pad) = setup();
        let mut map = InputMap::new("test");
        map.map_float(THROTTLE, pad, PadButton::Axis4.id(), 0.0, 1.0, None);
        map.map_float(THROTTLE, pad, PadButton::Axis5.id(), 0.0, 1.0, None);

        manager.enqueue_concurrent_change(
            pad,
            StateTarget::Next,
            PadButton::Axis4.id(),
            ButtonValue::Float(0.2),
        );
        press(&mut manager, pad, PadButton::Axis5, ButtonValue::Float(0.6));

        assert_relative_eq!(map.get_float(&manager, THROTTLE), 0.2);
        map.set_user_button_policy(THROTTLE, UserButtonPolicy::Max);
        assert_relative_eq!(map.get_float(&manager, THROTTLE), 0.6);
        map.set_user_button_policy(THROTTLE, UserButtonPolicy::Min);
        assert_relative_eq!(map.get_float(&manager, THROTTLE), 0.2);
        map.set_user_button_policy(THROTTLE, UserButtonPolicy::Average);
        assert_relative_eq!(map.get_float(&manager, THROTTLE), 0.4);

        map.set_dead_zone(THROTTLE, 0.5);
        assert_eq!(map.get_float(&manager, THROTTLE), 0.0);
        assert_relative_eq!(map.get_float_delta(&manager, THROTTLE), 0.0);
    }

    #[test]
    fn test_bool_as_float_and_filter() {
        let (mut manager, pad) = setup();
        let mut map = InputMap::new("test");
        map.map_float(JUMP, pad, PadButton::X.id(), -1.0, 1.0, Some(Box::new(|v| v * 2.0)));

        press(&mut manager, pad, PadButton::X, ButtonValue::Bool(true));
        assert_relative_eq!(map.get_float(&manager, JUMP), 2.0);
        assert_relative_eq!(map.get_float_delta(&manager, JUMP), 2.0);
    }

    #[test]
    fn test_unmapped_reads_default() {
        let (manager, _) = setup();
        let mut map = InputMap::new("test");
        assert!(!map.get_bool(&manager, 42));
        assert_eq!(map.get_float(&manager, 42), 0.0);
        assert!(!map.set_dead_zone(42, 0.1));

        map.map_bool(42, DeviceId::from_raw(9), 0);
        map.unmap(42);
        assert!(!map.is_mapped(42));
    }
}
