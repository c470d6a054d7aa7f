// Record and replay of device button changes
//
// `InputRecorder` listens to the manager and stores every change with a
// timestamp relative to its start. `InputPlayer` runs as a state modifier and
// writes the changes back into the recorded devices at the same offsets,
// marking those devices synced so live input does not interfere.

use super::button::{ButtonValue, DeviceButtonId, DeviceId};
use super::device::InputDevice;
use super::listener::{DeviceStateModifier, InputListener, ManagerView};
use super::manager::InputManager;
use super::state::InputDeltaState;
use super::RecordingError;
use bytemuck::{Pod, Zeroable};
use log::{debug, info};

const RECORDING_MAGIC: [u8; 4] = *b"FIRC";
const RECORDING_VERSION: u32 = 1;

const VALUE_KIND_BOOL: u32 = 0;
const VALUE_KIND_FLOAT: u32 = 1;

/// Priority of the recorder listener, ahead of regular listeners
pub const RECORDER_PRIORITY: i32 = 1000;

/// One recorded change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedChange {
    /// Milliseconds since the recording started
    pub time_ms: u64,
    pub device_id: DeviceId,
    pub button_id: DeviceButtonId,
    pub value: ButtonValue,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RecordingHeader {
    magic: [u8; 4],
    version: u32,
    count: u32,
    reserved: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ChangeRecord {
    time_ms: u64,
    device_id: u32,
    button_id: u32,
    kind: u32,
    value_bits: u32,
}

impl From<&RecordedChange> for ChangeRecord {
    fn from(change: &RecordedChange) -> Self {
        let (kind, bits) = match change.value {
            ButtonValue::Bool(v) => (VALUE_KIND_BOOL, u32::from(v)),
            ButtonValue::Float(v) => (VALUE_KIND_FLOAT, v.to_bits()),
        };
        Self {
            time_ms: change.time_ms.to_le(),
            device_id: change.device_id.raw().to_le(),
            button_id: change.button_id.to_le(),
            kind: kind.to_le(),
            value_bits: bits.to_le(),
        }
    }
}

impl TryFrom<ChangeRecord> for RecordedChange {
    type Error = RecordingError;

    fn try_from(record: ChangeRecord) -> Result<Self, Self::Error> {
        let bits = u32::from_le(record.value_bits);
        let value = match u32::from_le(record.kind) {
            VALUE_KIND_BOOL => ButtonValue::Bool(bits != 0),
            VALUE_KIND_FLOAT => ButtonValue::Float(f32::from_bits(bits)),
            other => return Err(RecordingError::UnknownValueKind(other)),
        };
        Ok(Self {
            time_ms: u64::from_le(record.time_ms),
            device_id: DeviceId::from_raw(u32::from_le(record.device_id)),
            button_id: u32::from_le(record.button_id),
            value,
        })
    }
}

/// Time ordered list of button changes with a playback cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRecording {
    changes: Vec<RecordedChange>,
    position: usize,
}

impl InputRecording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change; `time_ms` must not go backwards
    pub fn add_change(&mut self, time_ms: u64, device_id: DeviceId, button_id: DeviceButtonId, value: ButtonValue) {
        debug_assert!(self.changes.last().map_or(true, |last| last.time_ms <= time_ms));
        self.changes.push(RecordedChange {
            time_ms,
            device_id,
            button_id,
            value,
        });
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        self.position = 0;
    }

    /// Rewind the playback cursor
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Next change due at `time_ms`, advancing the cursor
    pub fn next_change(&mut self, time_ms: u64) -> Option<RecordedChange> {
        let change = *self.changes.get(self.position)?;
        if change.time_ms > time_ms {
            return None;
        }
        self.position += 1;
        Some(change)
    }

    /// Time of the last change
    pub fn duration(&self) -> u64 {
        self.changes.last().map_or(0, |change| change.time_ms)
    }

    pub fn changes(&self) -> &[RecordedChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Devices with at least one change, sorted
    pub fn recorded_devices(&self) -> Vec<DeviceId> {
        let mut devices: Vec<DeviceId> = self.changes.iter().map(|c| c.device_id).collect();
        devices.sort();
        devices.dedup();
        devices
    }

    /// Little-endian binary form: a 16 byte header then 24 bytes per change
    pub fn serialize(&self) -> Vec<u8> {
        let header = RecordingHeader {
            magic: RECORDING_MAGIC,
            version: RECORDING_VERSION.to_le(),
            count: (self.changes.len() as u32).to_le(),
            reserved: 0,
        };

        let record_size = std::mem::size_of::<ChangeRecord>();
        let mut out = Vec::with_capacity(std::mem::size_of::<RecordingHeader>() + self.changes.len() * record_size);
        out.extend_from_slice(bytemuck::bytes_of(&header));
        for change in &self.changes {
            out.extend_from_slice(bytemuck::bytes_of(&ChangeRecord::from(change)));
        }
        out
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, RecordingError> {
        let header_size = std::mem::size_of::<RecordingHeader>();
        if bytes.len() < header_size {
            return Err(RecordingError::Truncated {
                expected: header_size,
                actual: bytes.len(),
            });
        }

        let header: RecordingHeader = bytemuck::pod_read_unaligned(&bytes[..header_size]);
        if header.magic != RECORDING_MAGIC {
            return Err(RecordingError::BadMagic);
        }
        let version = u32::from_le(header.version);
        if version != RECORDING_VERSION {
            return Err(RecordingError::UnsupportedVersion(version));
        }

        let count = u32::from_le(header.count) as usize;
        let record_size = std::mem::size_of::<ChangeRecord>();
        let expected = header_size + count * record_size;
        if bytes.len() < expected {
            return Err(RecordingError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let changes = bytes[header_size..expected]
            .chunks_exact(record_size)
            .map(|chunk| RecordedChange::try_from(bytemuck::pod_read_unaligned::<ChangeRecord>(chunk)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            changes,
            position: 0,
        })
    }
}

/// Listener appending every change to a recording
#[derive(Debug, Default)]
pub struct InputRecorder {
    recording: InputRecording,
    is_recording: bool,
    start_time_ms: u64,

    /// Record only these devices; empty records all
    devices: Vec<DeviceId>,
}

impl InputRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh recording at `now_ms` (manager time)
    pub fn start(&mut self, now_ms: u64) {
        info!("Input recording started");
        self.recording.clear();
        self.start_time_ms = now_ms;
        self.is_recording = true;
    }

    pub fn stop(&mut self) {
        if self.is_recording {
            info!("Input recording stopped, {} changes", self.recording.len());
        }
        self.is_recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn add_device_to_record(&mut self, device: DeviceId) {
        if !self.devices.contains(&device) {
            self.devices.push(device);
        }
    }

    pub fn recording(&self) -> &InputRecording {
        &self.recording
    }

    pub fn take_recording(&mut self) -> InputRecording {
        std::mem::take(&mut self.recording)
    }

    fn record(&mut self, view: &ManagerView<'_>, device: DeviceId, button: DeviceButtonId, value: ButtonValue) {
        if !self.is_recording {
            return;
        }
        if !self.devices.is_empty() && !self.devices.contains(&device) {
            return;
        }
        let time = view.time_ms().saturating_sub(self.start_time_ms);
        self.recording.add_change(time, device, button, value);
    }
}

impl InputListener for InputRecorder {
    fn on_device_button_bool(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        _old_value: bool,
        new_value: bool,
    ) -> bool {
        self.record(view, device, button, ButtonValue::Bool(new_value));
        true
    }

    fn on_device_button_float(
        &mut self,
        view: &ManagerView<'_>,
        device: DeviceId,
        button: DeviceButtonId,
        _old_value: f32,
        new_value: f32,
    ) -> bool {
        self.record(view, device, button, ButtonValue::Float(new_value));
        true
    }

    fn priority(&self) -> i32 {
        RECORDER_PRIORITY
    }
}

/// State modifier replaying a recording into its devices
#[derive(Debug, Default)]
pub struct InputPlayer {
    recording: Option<InputRecording>,
    is_playing: bool,
    start_time_ms: u64,

    /// Devices marked synced for this playback
    synced: Vec<DeviceId>,
}

impl InputPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recording(&mut self, recording: InputRecording) {
        self.recording = Some(recording);
    }

    pub fn recording(&self) -> Option<&InputRecording> {
        self.recording.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Start playback from the beginning, taking over the recorded devices
    pub fn start(&mut self, manager: &mut InputManager) {
        let Some(recording) = self.recording.as_mut() else {
            debug!("Input player started without a recording");
            return;
        };
        recording.reset();
        self.start_time_ms = manager.time_ms();
        self.synced = recording.recorded_devices();
        for id in &self.synced {
            if let Some(device) = manager.device_mut(*id) {
                device.set_synced(true);
            }
        }
        self.is_playing = true;
        info!("Input playback started on {} devices", self.synced.len());
    }

    pub fn stop(&mut self, manager: &mut InputManager) {
        for id in &self.synced {
            if let Some(device) = manager.device_mut(*id) {
                device.set_synced(false);
            }
        }
        self.finish();
    }

    fn finish(&mut self) {
        if self.is_playing {
            info!("Input playback stopped");
        }
        self.synced.clear();
        self.is_playing = false;
    }
}

impl DeviceStateModifier for InputPlayer {
    fn update(&mut self, devices: &mut [InputDevice], time_ms: u64, mut delta: Option<&mut InputDeltaState>) {
        if !self.is_playing {
            return;
        }
        let Some(recording) = self.recording.as_mut() else {
            return;
        };

        let elapsed = time_ms.saturating_sub(self.start_time_ms);
        while let Some(change) = recording.next_change(elapsed) {
            match devices.get_mut(change.device_id.index()) {
                Some(device) => device.replay_change(change.button_id, change.value, delta.as_deref_mut()),
                None => debug!("Recorded change for unknown {}", change.device_id),
            }
        }

        if elapsed >= recording.duration() {
            for id in &self.synced {
                if let Some(device) = devices.get_mut(id.index()) {
                    device.set_synced(false);
                }
            }
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ClockMode;
    use crate::engine::input::device::keyboard::Key;
    use crate::engine::input::device::{DeviceType, DeviceVariant, PlatformKind};
    use crate::engine::input::event::{PlatformEvent, WindowInput};
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::keyboard::KeyCode;

    fn key_event(code: KeyCode, pressed: bool) -> PlatformEvent {
        PlatformEvent::Window(WindowInput::KeyboardKey {
            code,
            pressed,
            repeat: false,
        })
    }

    fn sample_recording() -> InputRecording {
        let mut recording = InputRecording::new();
        let device = DeviceId::from_raw(1);
        recording.add_change(0, device, 3, ButtonValue::Bool(true));
        recording.add_change(16, device, 21, ButtonValue::Float(0.25));
        recording.add_change(32, DeviceId::from_raw(0), 3, ButtonValue::Bool(false));
        recording
    }

    #[test]
    fn test_cursor_and_duration() {
        let mut recording = sample_recording();
        assert_eq!(recording.duration(), 32);
        assert_eq!(
            recording.recorded_devices(),
            vec![DeviceId::from_raw(0), DeviceId::from_raw(1)]
        );

        assert!(recording.next_change(0).is_some());
        assert!(recording.next_change(10).is_none());
        assert_eq!(recording.next_change(20).map(|c| c.button_id), Some(21));

        recording.reset();
        assert_eq!(recording.next_change(100).map(|c| c.time_ms), Some(0));
    }

    #[test]
    fn test_serialized_form() {
        let recording = sample_recording();
        let bytes = recording.serialize();
        assert_eq!(bytes.len(), 16 + 3 * 24);
        assert_eq!(&bytes[..4], b"FIRC");

        let restored = InputRecording::deserialize(&bytes).unwrap();
        assert_eq!(restored, recording);
    }

    #[test]
    fn test_deserialize_errors() {
        assert!(matches!(
            InputRecording::deserialize(b"FI"),
            Err(RecordingError::Truncated { .. })
        ));

        let mut bytes = sample_recording().serialize();
        bytes[0] = b'X';
        assert!(matches!(InputRecording::deserialize(&bytes), Err(RecordingError::BadMagic)));

        let bytes = sample_recording().serialize();
        assert!(matches!(
            InputRecording::deserialize(&bytes[..bytes.len() - 1]),
            Err(RecordingError::Truncated { .. })
        ));

        let mut bytes = sample_recording().serialize();
        // kind field of the first record
        bytes[16 + 16] = 7;
        assert!(matches!(
            InputRecording::deserialize(&bytes),
            Err(RecordingError::UnknownValueKind(7))
        ));
    }

    #[test]
    fn test_recorder_filters_devices() {
        let mut manager = InputManager::new(PlatformKind::Desktop, ClockMode::External);
        let keyboard = manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();
        let mouse = manager
            .create_device(DeviceType::Mouse, None, DeviceVariant::Standard)
            .unwrap();

        let recorder = Rc::new(RefCell::new(InputRecorder::new()));
        manager.add_listener(recorder.clone());
        recorder.borrow_mut().add_device_to_record(keyboard);
        recorder.borrow_mut().start(manager.time_ms());

        manager.handle_event(&key_event(KeyCode::KeyA, true));
        manager.handle_event(&PlatformEvent::Window(WindowInput::CursorMoved { x: 5.0, y: 6.0 }));
        manager.update_with_time(0.016);
        recorder.borrow_mut().stop();

        let recording = recorder.borrow_mut().take_recording();
        assert_eq!(recording.len(), 1);
        assert_eq!(recording.changes()[0].time_ms, 16);
        assert_eq!(recording.recorded_devices(), vec![keyboard]);
        assert_ne!(keyboard, mouse);
    }

    #[test]
    fn test_playback_drives_synced_device() {
        let mut manager = InputManager::new(PlatformKind::Desktop, ClockMode::External);
        let keyboard = manager
            .create_device(DeviceType::Keyboard, None, DeviceVariant::Standard)
            .unwrap();

        let mut recording = InputRecording::new();
        recording.add_change(16, keyboard, Key::A.id(), ButtonValue::Bool(true));
        recording.add_change(48, keyboard, Key::A.id(), ButtonValue::Bool(false));

        let player = Rc::new(RefCell::new(InputPlayer::new()));
        player.borrow_mut().set_recording(recording);
        manager.add_modifier(player.clone());
        player.borrow_mut().start(&mut manager);
        assert!(manager.device(keyboard).unwrap().is_synced());

        // Live input is ignored while playing
        manager.handle_event(&key_event(KeyCode::KeyB, true));
        manager.update_with_time(0.016);
        let device = manager.device(keyboard).unwrap();
        assert!(device.get_bool(Key::A.id()));
        assert!(!device.get_bool(Key::B.id()));

        manager.update_with_time(0.016);
        assert!(player.borrow().is_playing());

        manager.update_with_time(0.016);
        let device = manager.device(keyboard).unwrap();
        assert!(!device.get_bool(Key::A.id()));
        assert!(!player.borrow().is_playing());
        assert!(!device.is_synced());
    }
}
