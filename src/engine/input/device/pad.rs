// Gamepad device: canonical buttons and axes shared by every pad backend

use crate::engine::input::button::{ButtonType, DeviceButtonId};
use std::cell::RefCell;
use std::rc::Rc;

/// Canonical pad buttons. Axes come first, then the digital buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PadButton {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    Axis4,
    Axis5,
    Axis6,
    Axis7,
    Axis8,
    Axis9,
    Axis10,
    Axis11,
    Axis12,
    Axis13,
    Axis14,
    Axis15,
    Axis16,
    Axis17,
    Axis18,
    Axis19,
    Axis20,
    Axis21,
    Axis22,
    Axis23,
    Axis24,
    Axis25,
    Axis26,
    Axis27,
    Axis28,
    Axis29,
    Axis30,
    Axis31,
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    GravityX,
    GravityY,
    GravityZ,
    GyroscopeX,
    GyroscopeY,
    GyroscopeZ,
    MagneticFieldX,
    MagneticFieldY,
    MagneticFieldZ,
    Start,
    Select,
    Left,
    Right,
    Up,
    Down,
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    L3,
    R3,
    Home,
    Button17,
    Button18,
    Button19,
    Button20,
    Button21,
    Button22,
    Button23,
    Button24,
    Button25,
    Button26,
    Button27,
    Button28,
    Button29,
    Button30,
    Button31,
}

/// Number of float axes at the start of the ID space
pub const PAD_AXIS_COUNT: usize = 44;

pub const PAD_BUTTON_COUNT: usize = PAD_BUTTON_NAMES.len();

pub const PAD_BUTTON_NAMES: [(PadButton, &str); 76] = [
    (PadButton::LeftStickX, "pad_left_stick_x"),
    (PadButton::LeftStickY, "pad_left_stick_y"),
    (PadButton::RightStickX, "pad_right_stick_x"),
    (PadButton::RightStickY, "pad_right_stick_y"),
    (PadButton::Axis4, "pad_axis_4"),
    (PadButton::Axis5, "pad_axis_5"),
    (PadButton::Axis6, "pad_axis_6"),
    (PadButton::Axis7, "pad_axis_7"),
    (PadButton::Axis8, "pad_axis_8"),
    (PadButton::Axis9, "pad_axis_9"),
    (PadButton::Axis10, "pad_axis_10"),
    (PadButton::Axis11, "pad_axis_11"),
    (PadButton::Axis12, "pad_axis_12"),
    (PadButton::Axis13, "pad_axis_13"),
    (PadButton::Axis14, "pad_axis_14"),
    (PadButton::Axis15, "pad_axis_15"),
    (PadButton::Axis16, "pad_axis_16"),
    (PadButton::Axis17, "pad_axis_17"),
    (PadButton::Axis18, "pad_axis_18"),
    (PadButton::Axis19, "pad_axis_19"),
    (PadButton::Axis20, "pad_axis_20"),
    (PadButton::Axis21, "pad_axis_21"),
    (PadButton::Axis22, "pad_axis_22"),
    (PadButton::Axis23, "pad_axis_23"),
    (PadButton::Axis24, "pad_axis_24"),
    (PadButton::Axis25, "pad_axis_25"),
    (PadButton::Axis26, "pad_axis_26"),
    (PadButton::Axis27, "pad_axis_27"),
    (PadButton::Axis28, "pad_axis_28"),
    (PadButton::Axis29, "pad_axis_29"),
    (PadButton::Axis30, "pad_axis_30"),
    (PadButton::Axis31, "pad_axis_31"),
    (PadButton::AccelerationX, "pad_acceleration_x"),
    (PadButton::AccelerationY, "pad_acceleration_y"),
    (PadButton::AccelerationZ, "pad_acceleration_z"),
    (PadButton::GravityX, "pad_gravity_x"),
    (PadButton::GravityY, "pad_gravity_y"),
    (PadButton::GravityZ, "pad_gravity_z"),
    (PadButton::GyroscopeX, "pad_gyroscope_x"),
    (PadButton::GyroscopeY, "pad_gyroscope_y"),
    (PadButton::GyroscopeZ, "pad_gyroscope_z"),
    (PadButton::MagneticFieldX, "pad_magneticfield_x"),
    (PadButton::MagneticFieldY, "pad_magneticfield_y"),
    (PadButton::MagneticFieldZ, "pad_magneticfield_z"),
    (PadButton::Start, "pad_button_start"),
    (PadButton::Select, "pad_button_select"),
    (PadButton::Left, "pad_button_left"),
    (PadButton::Right, "pad_button_right"),
    (PadButton::Up, "pad_button_up"),
    (PadButton::Down, "pad_button_down"),
    (PadButton::A, "pad_button_a"),
    (PadButton::B, "pad_button_b"),
    (PadButton::X, "pad_button_x"),
    (PadButton::Y, "pad_button_y"),
    (PadButton::L1, "pad_button_l1"),
    (PadButton::R1, "pad_button_r1"),
    (PadButton::L2, "pad_button_l2"),
    (PadButton::R2, "pad_button_r2"),
    (PadButton::L3, "pad_button_l3"),
    (PadButton::R3, "pad_button_r3"),
    (PadButton::Home, "pad_button_home"),
    (PadButton::Button17, "pad_button_17"),
    (PadButton::Button18, "pad_button_18"),
    (PadButton::Button19, "pad_button_19"),
    (PadButton::Button20, "pad_button_20"),
    (PadButton::Button21, "pad_button_21"),
    (PadButton::Button22, "pad_button_22"),
    (PadButton::Button23, "pad_button_23"),
    (PadButton::Button24, "pad_button_24"),
    (PadButton::Button25, "pad_button_25"),
    (PadButton::Button26, "pad_button_26"),
    (PadButton::Button27, "pad_button_27"),
    (PadButton::Button28, "pad_button_28"),
    (PadButton::Button29, "pad_button_29"),
    (PadButton::Button30, "pad_button_30"),
    (PadButton::Button31, "pad_button_31"),
];

/// Dead zone applied to sticks when a pad is created
pub const STICK_DEAD_ZONE: f32 = 0.15;

/// Slots in the table of connected pad serial numbers
pub const MAX_PAD_SERIALS: usize = 8;

/// Serial numbers of connected pads, indexed by pad slot.
///
/// Shared by the pads of one manager so a physical controller is only
/// registered once.
pub type PadSerialTable = Rc<RefCell<[Option<u64>; MAX_PAD_SERIALS]>>;

/// Create an empty serial table
pub fn new_serial_table() -> PadSerialTable {
    Rc::new(RefCell::new([None; MAX_PAD_SERIALS]))
}

impl PadButton {
    pub fn id(self) -> DeviceButtonId {
        self as DeviceButtonId
    }

    pub fn from_id(id: DeviceButtonId) -> Option<PadButton> {
        PAD_BUTTON_NAMES.get(id as usize).map(|(button, _)| *button)
    }

    pub fn name(self) -> &'static str {
        PAD_BUTTON_NAMES[self as usize].1
    }

    pub fn button_type(self) -> ButtonType {
        if (self as usize) < PAD_AXIS_COUNT {
            ButtonType::Float
        } else {
            ButtonType::Bool
        }
    }

    /// Other component of a stick axis
    pub fn stick_partner(self) -> Option<PadButton> {
        match self {
            PadButton::LeftStickX => Some(PadButton::LeftStickY),
            PadButton::LeftStickY => Some(PadButton::LeftStickX),
            PadButton::RightStickX => Some(PadButton::RightStickY),
            PadButton::RightStickY => Some(PadButton::RightStickX),
            _ => None,
        }
    }

    /// The four stick axes
    pub fn sticks() -> [PadButton; 4] {
        [
            PadButton::LeftStickX,
            PadButton::LeftStickY,
            PadButton::RightStickX,
            PadButton::RightStickY,
        ]
    }
}
