// Gamepad backend for IOKit style HID reports (macOS Xbox controllers)

use super::pad::{PadButton, PadSerialTable, MAX_PAD_SERIALS};
use super::{ButtonWriter, DeviceBackend, DeviceState, DeviceVariant};
use crate::core::math::fix_up_analog;
use crate::engine::input::event::{
    HidDeviceInfo, HidDeviceKind, HidEvent, HidValue, PlatformEvent, HID_PAGE_BUTTON,
    HID_PAGE_GENERIC_DESKTOP, HID_PAGE_VENDOR_START, HID_USAGE_GD_HATSWITCH,
    HID_USAGE_GD_POINTER, HID_USAGE_GD_RX, HID_USAGE_GD_RY, HID_USAGE_GD_RZ, HID_USAGE_GD_X,
    HID_USAGE_GD_Y, HID_USAGE_GD_Z,
};
use log::{debug, info};
use std::collections::HashMap;

const HID_PAGE_SIMULATION: u32 = 0x02;
const HID_PAGE_CONSUMER: u32 = 0x0C;

const MICROSOFT_VENDOR_ID: u32 = 0x045e;

/// Xbox 360 wired/wireless and Xbox One
const XBOX_CLASSIC_PRODUCTS: [u32; 3] = [0x028E, 0x028F, 0x02D1];

/// Xbox Series S/X and late Xbox One revisions
const XBOX_SERIES_PRODUCTS: [u32; 5] = [0x0B13, 0x02FD, 0x02E0, 0x0B20, 0x0B12];

/// Hat switch value to (x, y) for older controllers
const DPAD_SCHEME: [i32; 18] = [0, 1, 1, 1, 1, 0, 1, -1, 0, -1, -1, -1, -1, 0, -1, 1, 0, 0];

/// Hat switch value to (x, y) for Series controllers (0 is centered)
const ALT_DPAD_SCHEME: [i32; 18] = [0, 0, 0, 1, 1, 1, 1, 0, 1, -1, 0, -1, -1, -1, -1, 0, -1, 1];

/// Pad driven by HID device match/removal callbacks and value reports
pub struct MacPad {
    index: usize,
    serials: PadSerialTable,
    serial: Option<u64>,
    name: String,
    alternative_dpad: bool,
    button_dialect: HashMap<u32, PadButton>,
    axis_dialect: HashMap<u32, PadButton>,
}

impl MacPad {
    pub fn new(index: usize, serials: PadSerialTable) -> Self {
        Self {
            index,
            serials,
            serial: None,
            name: String::new(),
            alternative_dpad: false,
            button_dialect: HashMap::new(),
            axis_dialect: HashMap::new(),
        }
    }

    /// Button dialect of the connected controller
    pub fn button_dialect(&self) -> &HashMap<u32, PadButton> {
        &self.button_dialect
    }

    pub fn axis_dialect(&self) -> &HashMap<u32, PadButton> {
        &self.axis_dialect
    }

    /// Slots fill in order: a controller waits while an earlier slot is
    /// free or already holds its serial.
    fn is_slot_blocked(&self, serial: u64) -> bool {
        let serials = self.serials.borrow();
        serials
            .iter()
            .take(self.index.min(MAX_PAD_SERIALS))
            .any(|slot| slot.map_or(true, |known| known == serial))
    }

    fn use_classic_dialect(&mut self) {
        self.alternative_dpad = false;
        self.axis_dialect = HashMap::from([
            (HID_USAGE_GD_X, PadButton::LeftStickX),
            (HID_USAGE_GD_Y, PadButton::LeftStickY),
            (HID_USAGE_GD_RX, PadButton::RightStickX),
            (HID_USAGE_GD_RY, PadButton::RightStickY),
            (HID_USAGE_GD_Z, PadButton::Axis4),
            (HID_USAGE_GD_RZ, PadButton::Axis5),
        ]);
        self.button_dialect = HashMap::from([
            (0x0a, PadButton::Select),
            (0x07, PadButton::L3),
            (0x08, PadButton::R3),
            (0x09, PadButton::Start),
            (0x0c, PadButton::Up),
            (0x0f, PadButton::Right),
            (0x0d, PadButton::Down),
            (0x0e, PadButton::Left),
            (0x05, PadButton::L1),
            (0x06, PadButton::R1),
            (0x04, PadButton::Y),
            (0x02, PadButton::B),
            (0x01, PadButton::A),
            (0x03, PadButton::X),
            (0x0b, PadButton::Home),
        ]);
    }

    fn use_series_dialect(&mut self) {
        self.alternative_dpad = true;
        self.axis_dialect = HashMap::from([
            (HID_USAGE_GD_X, PadButton::LeftStickX),
            (HID_USAGE_GD_Y, PadButton::LeftStickY),
            (0x32, PadButton::RightStickX),
            (0x35, PadButton::RightStickY),
            (0xc5, PadButton::Axis4),
            (0xc4, PadButton::Axis5),
        ]);

        let mut buttons = HashMap::new();
        buttons.insert(0x07, PadButton::L1);
        buttons.insert(0x08, PadButton::R1);
        // Select arrives on a different usage depending on the firmware
        buttons.insert(0x0b, PadButton::Select);
        buttons.insert(0x224, PadButton::Select);
        buttons.insert(0x0c, PadButton::Start);
        buttons.insert(0x0d, PadButton::Home);
        buttons.insert(0x0e, PadButton::L3);
        buttons.insert(0x0f, PadButton::R3);
        // Each direction overwrites the previous one, only Left is kept.
        // Unconfirmed against hardware, see test_series_hatswitch_keeps_only_left.
        buttons.insert(HID_USAGE_GD_HATSWITCH, PadButton::Up);
        buttons.insert(HID_USAGE_GD_HATSWITCH, PadButton::Right);
        buttons.insert(HID_USAGE_GD_HATSWITCH, PadButton::Down);
        buttons.insert(HID_USAGE_GD_HATSWITCH, PadButton::Left);
        buttons.insert(0x01, PadButton::A);
        buttons.insert(0x02, PadButton::B);
        buttons.insert(0x04, PadButton::X);
        buttons.insert(0x05, PadButton::Y);
        self.button_dialect = buttons;
    }

    fn on_matched(&mut self, info: &HidDeviceInfo) {
        if info.kind != HidDeviceKind::Gamepad || self.serial.is_some() {
            return;
        }
        if info.serial == 0 || info.product_name.is_empty() {
            return;
        }
        if self.is_slot_blocked(info.serial) {
            debug!(
                "Pad {} rejected serial {:#x}: earlier slot free or already holding it",
                self.index, info.serial
            );
            return;
        }

        if info.vendor_id == MICROSOFT_VENDOR_ID && XBOX_CLASSIC_PRODUCTS.contains(&info.product_id) {
            self.use_classic_dialect();
        } else if info.vendor_id == MICROSOFT_VENDOR_ID
            && XBOX_SERIES_PRODUCTS.contains(&info.product_id)
        {
            self.use_series_dialect();
        } else {
            debug!(
                "Pad {} ignores unsupported controller {:#06x}:{:#06x}",
                self.index, info.vendor_id, info.product_id
            );
            return;
        }

        if self.index < MAX_PAD_SERIALS {
            self.serials.borrow_mut()[self.index] = Some(info.serial);
        }
        self.serial = Some(info.serial);
        self.name = info.product_name.clone();
        info!("Pad {} connected: {}", self.index, self.name);
    }

    fn on_removed(&mut self, serial: u64) {
        if self.serial != Some(serial) {
            return;
        }
        if self.index < MAX_PAD_SERIALS {
            self.serials.borrow_mut()[self.index] = None;
        }
        self.serial = None;
        info!("Pad {} disconnected: {}", self.index, self.name);
    }

    fn on_value(&mut self, value: &HidValue, out: &mut ButtonWriter<'_>) {
        if self.serial != Some(value.serial) {
            return;
        }
        if value.report_count > 1
            || (value.usage_page == HID_PAGE_GENERIC_DESKTOP && value.usage == HID_USAGE_GD_POINTER)
        {
            return;
        }
        if value.usage_page >= HID_PAGE_VENDOR_START {
            return;
        }

        let state = value.integer_value;
        let page = value.usage_page;
        let button = self.button_dialect.get(&value.usage).copied();

        if page == HID_PAGE_BUTTON || page == HID_PAGE_CONSUMER {
            match button {
                Some(button) => out.set_bool(button.id(), state != 0),
                None => debug!("Unmapped pad button {:#x}", value.usage),
            }
        } else if page == HID_PAGE_GENERIC_DESKTOP || page == HID_PAGE_SIMULATION {
            if value.usage == HID_USAGE_GD_HATSWITCH {
                self.handle_hat(state, out);
            } else if let Some(axis) = self.axis_dialect.get(&value.usage).copied() {
                handle_analog(axis, value, out);
            } else if let Some(button) = button {
                out.set_bool(button.id(), state != 0);
            } else {
                debug!("Unmapped pad usage (generic): {:#x}", value.usage);
            }
        } else {
            debug!("Unmapped pad usage {:#x} on page {:#x}", value.usage, page);
        }
    }

    fn handle_hat(&self, state: i64, out: &mut ButtonWriter<'_>) {
        let index = if (0..9).contains(&state) {
            state as usize * 2
        } else {
            0
        };
        let scheme = if self.alternative_dpad {
            &ALT_DPAD_SCHEME
        } else {
            &DPAD_SCHEME
        };
        let (x, y) = (scheme[index], scheme[index + 1]);

        out.set_bool(PadButton::Left.id(), x < 0);
        out.set_bool(PadButton::Right.id(), x > 0);
        out.set_bool(PadButton::Up.id(), y > 0);
        out.set_bool(PadButton::Down.id(), y < 0);
    }
}

/// Remap an analog report and write it, sticks together with their partner axis
fn handle_analog(axis: PadButton, value: &HidValue, out: &mut ButtonWriter<'_>) {
    let (min, max) = (value.physical_min, value.physical_max);
    match axis {
        PadButton::Axis4 | PadButton::Axis5 => {
            out.set_float(axis.id(), fix_up_analog(value.scaled_value, min, max, false));
        }
        PadButton::LeftStickY | PadButton::RightStickY => {
            // HID reports Y growing downwards
            let analog = -fix_up_analog(value.scaled_value, min, max, true);
            out.set_stick(axis, analog);
        }
        PadButton::LeftStickX | PadButton::RightStickX => {
            let analog = fix_up_analog(value.scaled_value, min, max, true);
            out.set_stick(axis, analog);
        }
        _ => {}
    }
}

impl DeviceBackend for MacPad {
    fn variant(&self) -> DeviceVariant {
        DeviceVariant::Standard
    }

    fn state(&self) -> DeviceState {
        if self.serial.is_some() {
            DeviceState::Ok
        } else {
            DeviceState::Unavailable
        }
    }

    fn name(&self) -> &str {
        if self.name.is_empty() {
            "Gamepad"
        } else {
            &self.name
        }
    }

    fn handle_event(&mut self, event: &PlatformEvent, out: &mut ButtonWriter<'_>) {
        match event {
            PlatformEvent::Hid(HidEvent::DeviceMatched(info)) => self.on_matched(info),
            PlatformEvent::Hid(HidEvent::DeviceRemoved { serial }) => self.on_removed(*serial),
            PlatformEvent::Hid(HidEvent::Value(value)) => self.on_value(value, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::button::DeviceId;
    use crate::engine::input::device::pad::{new_serial_table, PAD_BUTTON_COUNT};
    use crate::engine::input::state::InputState;

    fn matched(serial: u64, product_id: u32) -> PlatformEvent {
        PlatformEvent::Hid(HidEvent::DeviceMatched(HidDeviceInfo {
            vendor_id: MICROSOFT_VENDOR_ID,
            product_id,
            serial,
            product_name: "Xbox Wireless Controller".to_string(),
            kind: HidDeviceKind::Gamepad,
        }))
    }

    fn value(serial: u64, page: u32, usage: u32, integer: i64) -> PlatformEvent {
        PlatformEvent::Hid(HidEvent::Value(HidValue {
            serial,
            usage_page: page,
            usage,
            integer_value: integer,
            scaled_value: integer as f32,
            physical_min: -32768.0,
            physical_max: 32768.0,
            report_count: 1,
        }))
    }

    struct Fixture {
        state: InputState,
        dead_zones: Vec<f32>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                state: InputState::new(PAD_BUTTON_COUNT),
                dead_zones: vec![0.0; PAD_BUTTON_COUNT],
            }
        }

        fn feed(&mut self, pad: &mut MacPad, event: &PlatformEvent) {
            let mut out = ButtonWriter::new(
                DeviceId::from_raw(0),
                &mut self.state,
                None,
                &self.dead_zones,
            );
            pad.handle_event(event, &mut out);
        }
    }

    #[test]
    fn test_connect_classic_pad() {
        let serials = new_serial_table();
        let mut pad = MacPad::new(0, serials.clone());
        let mut fixture = Fixture::new();
        assert_eq!(pad.state(), DeviceState::Unavailable);

        fixture.feed(&mut pad, &matched(11, 0x028E));
        assert_eq!(pad.state(), DeviceState::Ok);
        assert_eq!(serials.borrow()[0], Some(11));

        fixture.feed(&mut pad, &value(11, HID_PAGE_BUTTON, 0x01, 1));
        assert!(fixture.state.get_bool(PadButton::A.id()));
    }

    #[test]
    fn test_unsupported_vendor_rejected() {
        let mut pad = MacPad::new(0, new_serial_table());
        let mut fixture = Fixture::new();
        let event = PlatformEvent::Hid(HidEvent::DeviceMatched(HidDeviceInfo {
            vendor_id: 0x054c,
            product_id: 0x09cc,
            serial: 5,
            product_name: "Wireless Controller".to_string(),
            kind: HidDeviceKind::Gamepad,
        }));
        fixture.feed(&mut pad, &event);
        assert_eq!(pad.state(), DeviceState::Unavailable);
    }

    #[test]
    fn test_serial_dedup() {
        let serials = new_serial_table();
        let mut first = MacPad::new(0, serials.clone());
        let mut second = MacPad::new(1, serials.clone());
        let mut fixture = Fixture::new();

        // Two distinct controllers
        fixture.feed(&mut first, &matched(100, 0x0B13));
        fixture.feed(&mut second, &matched(200, 0x0B13));
        assert_eq!(first.state(), DeviceState::Ok);
        assert_eq!(second.state(), DeviceState::Ok);

        // The first controller showing up again on slot 2 is rejected
        let mut third = MacPad::new(2, serials.clone());
        fixture.feed(&mut third, &matched(100, 0x0B13));
        assert_eq!(third.state(), DeviceState::Unavailable);

        // After removal slot 0 is free, so slot 2 still waits
        fixture.feed(&mut first, &PlatformEvent::Hid(HidEvent::DeviceRemoved { serial: 100 }));
        assert_eq!(first.state(), DeviceState::Unavailable);
        fixture.feed(&mut third, &matched(100, 0x0B13));
        assert_eq!(third.state(), DeviceState::Unavailable);

        // The controller comes back on the first slot
        fixture.feed(&mut first, &matched(100, 0x0B13));
        assert_eq!(first.state(), DeviceState::Ok);
        fixture.feed(&mut third, &matched(300, 0x0B13));
        assert_eq!(third.state(), DeviceState::Ok);
    }

    #[test]
    fn test_slot_waits_for_earlier_slot() {
        let serials = new_serial_table();
        let mut first = MacPad::new(0, serials.clone());
        let mut second = MacPad::new(1, serials.clone());
        let mut fixture = Fixture::new();

        // Slot 0 is still empty
        fixture.feed(&mut second, &matched(200, 0x028E));
        assert_eq!(second.state(), DeviceState::Unavailable);
        assert_eq!(serials.borrow()[1], None);

        fixture.feed(&mut first, &matched(100, 0x028E));
        fixture.feed(&mut second, &matched(200, 0x028E));
        assert_eq!(first.state(), DeviceState::Ok);
        assert_eq!(second.state(), DeviceState::Ok);
        assert_eq!(serials.borrow()[1], Some(200));
    }

    #[test]
    fn test_series_hatswitch_keeps_only_left() {
        let mut pad = MacPad::new(0, new_serial_table());
        let mut fixture = Fixture::new();
        fixture.feed(&mut pad, &matched(1, 0x0B12));

        // Known discrepancy: all four directions share one usage
        assert_eq!(
            pad.button_dialect().get(&HID_USAGE_GD_HATSWITCH),
            Some(&PadButton::Left)
        );
    }

    #[test]
    fn test_hat_switch_schemes() {
        let mut pad = MacPad::new(0, new_serial_table());
        let mut fixture = Fixture::new();
        fixture.feed(&mut pad, &matched(1, 0x028E));

        // Classic scheme: 0 is up
        fixture.feed(&mut pad, &value(1, HID_PAGE_GENERIC_DESKTOP, HID_USAGE_GD_HATSWITCH, 0));
        assert!(fixture.state.get_bool(PadButton::Up.id()));
        assert!(!fixture.state.get_bool(PadButton::Left.id()));

        let mut series = MacPad::new(0, new_serial_table());
        let mut series_fixture = Fixture::new();
        series_fixture.feed(&mut series, &matched(2, 0x0B12));

        // Series scheme: 0 is centered, 7 is left
        series_fixture.feed(&mut series, &value(2, HID_PAGE_GENERIC_DESKTOP, HID_USAGE_GD_HATSWITCH, 0));
        assert!(!series_fixture.state.get_bool(PadButton::Up.id()));
        series_fixture.feed(&mut series, &value(2, HID_PAGE_GENERIC_DESKTOP, HID_USAGE_GD_HATSWITCH, 7));
        assert!(series_fixture.state.get_bool(PadButton::Left.id()));
    }

    #[test]
    fn test_stick_values_normalized() {
        let mut pad = MacPad::new(0, new_serial_table());
        let mut fixture = Fixture::new();
        fixture.feed(&mut pad, &matched(1, 0x028E));

        fixture.feed(&mut pad, &value(1, HID_PAGE_GENERIC_DESKTOP, HID_USAGE_GD_X, 32768));
        assert_eq!(fixture.state.get_float(PadButton::LeftStickX.id()), 1.0);

        // Y is inverted
        fixture.feed(&mut pad, &value(1, HID_PAGE_GENERIC_DESKTOP, HID_USAGE_GD_Y, 32768));
        assert_eq!(fixture.state.get_float(PadButton::LeftStickY.id()), -1.0);
    }

    #[test]
    fn test_foreign_and_multi_reports_ignored() {
        let mut pad = MacPad::new(0, new_serial_table());
        let mut fixture = Fixture::new();
        fixture.feed(&mut pad, &matched(1, 0x028E));

        // Another controller's report
        fixture.feed(&mut pad, &value(9, HID_PAGE_BUTTON, 0x01, 1));
        assert!(!fixture.state.get_bool(PadButton::A.id()));

        let multi = PlatformEvent::Hid(HidEvent::Value(HidValue {
            serial: 1,
            usage_page: HID_PAGE_BUTTON,
            usage: 0x01,
            integer_value: 1,
            scaled_value: 1.0,
            physical_min: 0.0,
            physical_max: 1.0,
            report_count: 2,
        }));
        fixture.feed(&mut pad, &multi);
        assert!(!fixture.state.get_bool(PadButton::A.id()));
    }
}
