// Input handling system
//
// Raw platform input flows bottom-up through three layers:
//
// ## Architecture
//
// - `device`: per-kind devices (keyboard, mouse, pad, touch) whose backends translate
//   platform codes into canonical button IDs and keep current/previous/next states
// - `state`: button state buffers and the delta log of changes made during a frame
// - `manager`: device registry, input clock, concurrent change queue, listener and
//   state modifier dispatch
// - `map`: user buttons mapped onto device buttons, queried by polling
// - `recording`: recording of button changes and their playback as a state modifier
// - `system`: logical actions bound to many physical buttons at once, fired through
//   STARTED/PERFORMED/CANCELED phases
// - `config`: input system settings and the remappable default binding tables
//
// ## Usage Example
//
// ```rust
// use forge_input::engine::input::{
//     InputActionDesc, InputBinding, InputSystem, InputSystemConfig, NullWindowControl,
// };
//
// let mut input = InputSystem::new(InputSystemConfig::default(), Box::new(NullWindowControl))?;
//
// input.add_input_action(InputActionDesc::new(InputBinding::South, |ctx| {
//     log::info!("jump {:?}", ctx.phase);
//     true
// }));
//
// // In your event loop
// input.handle_window_event(&window_event);
//
// // Once per frame
// input.update(width, height);
// ```

pub mod button;
pub mod config;
pub mod device;
pub mod event;
pub mod listener;
pub mod manager;
pub mod map;
pub mod recording;
pub mod state;
pub mod system;

// Re-export commonly used types
pub use button::{ButtonType, ButtonValue, DeviceButtonId, DeviceButtonSpec, DeviceId};
pub use config::{BindingTables, InputSystemConfig};
pub use device::{DeviceState, DeviceType, DeviceVariant, InputDevice, PlatformKind};
pub use event::PlatformEvent;
pub use listener::{DeviceStateModifier, InputListener, ManagerView};
pub use manager::{ChangeSender, InputManager};
pub use map::{InputMap, UserButtonPolicy};
pub use recording::{InputPlayer, InputRecorder, InputRecording};
pub use state::{InputDeltaState, InputState};
pub use system::{
    ActionHandle, InputActionContext, InputActionDesc, InputBinding, InputPhase, InputSystem,
    NullWindowControl, VirtualKeyboard, WindowControl, WinitWindowControl,
};

/// Input configuration and device errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Device table full: at most {max} devices")]
    TooManyDevices { max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceId),

    #[error("Unsupported operation for {kind:?}: {operation}")]
    Unsupported {
        kind: DeviceType,
        operation: &'static str,
    },
}

/// Serialized recording errors
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("Recording truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Not an input recording")]
    BadMagic,

    #[error("Unsupported recording version: {0}")]
    UnsupportedVersion(u32),

    #[error("Unknown value kind: {0}")]
    UnknownValueKind(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::TooManyDevices { max: 16 };
        assert_eq!(err.to_string(), "Device table full: at most 16 devices");

        let err = InputError::UnknownDevice(DeviceId::from_raw(7));
        assert_eq!(err.to_string(), "Unknown device: device#7");

        let err = InputError::Unsupported {
            kind: DeviceType::Keyboard,
            operation: "rumble",
        };
        assert_eq!(err.to_string(), "Unsupported operation for Keyboard: rumble");
    }

    #[test]
    fn test_recording_error_display() {
        let err = RecordingError::Truncated {
            expected: 40,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Recording truncated: expected 40 bytes, got 12"
        );
        assert_eq!(RecordingError::BadMagic.to_string(), "Not an input recording");
    }
}
