// Raw key code tables for each keyboard backend

use super::keyboard::Key;
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// winit physical key codes
pub fn winit_dialect() -> HashMap<KeyCode, Key> {
    use KeyCode as C;

    let mut map = HashMap::new();
    let table = [
        (C::Escape, Key::Escape),
        (C::F1, Key::F1),
        (C::F2, Key::F2),
        (C::F3, Key::F3),
        (C::F4, Key::F4),
        (C::F5, Key::F5),
        (C::F6, Key::F6),
        (C::F7, Key::F7),
        (C::F8, Key::F8),
        (C::F9, Key::F9),
        (C::F10, Key::F10),
        (C::F11, Key::F11),
        (C::F12, Key::F12),
        (C::F13, Key::F13),
        (C::F14, Key::F14),
        (C::F15, Key::F15),
        (C::F16, Key::F16),
        (C::F17, Key::F17),
        (C::F18, Key::F18),
        (C::F19, Key::F19),
        (C::PrintScreen, Key::Print),
        (C::ScrollLock, Key::ScrollLock),
        (C::Pause, Key::Break),
        (C::Space, Key::Space),
        (C::Quote, Key::Apostrophe),
        (C::Comma, Key::Comma),
        (C::Minus, Key::Minus),
        (C::Period, Key::Period),
        (C::Slash, Key::Slash),
        (C::Digit0, Key::Num0),
        (C::Digit1, Key::Num1),
        (C::Digit2, Key::Num2),
        (C::Digit3, Key::Num3),
        (C::Digit4, Key::Num4),
        (C::Digit5, Key::Num5),
        (C::Digit6, Key::Num6),
        (C::Digit7, Key::Num7),
        (C::Digit8, Key::Num8),
        (C::Digit9, Key::Num9),
        (C::Semicolon, Key::Semicolon),
        (C::IntlBackslash, Key::Less),
        (C::Equal, Key::Equal),
        (C::KeyA, Key::A),
        (C::KeyB, Key::B),
        (C::KeyC, Key::C),
        (C::KeyD, Key::D),
        (C::KeyE, Key::E),
        (C::KeyF, Key::F),
        (C::KeyG, Key::G),
        (C::KeyH, Key::H),
        (C::KeyI, Key::I),
        (C::KeyJ, Key::J),
        (C::KeyK, Key::K),
        (C::KeyL, Key::L),
        (C::KeyM, Key::M),
        (C::KeyN, Key::N),
        (C::KeyO, Key::O),
        (C::KeyP, Key::P),
        (C::KeyQ, Key::Q),
        (C::KeyR, Key::R),
        (C::KeyS, Key::S),
        (C::KeyT, Key::T),
        (C::KeyU, Key::U),
        (C::KeyV, Key::V),
        (C::KeyW, Key::W),
        (C::KeyX, Key::X),
        (C::KeyY, Key::Y),
        (C::KeyZ, Key::Z),
        (C::BracketLeft, Key::BracketLeft),
        (C::Backslash, Key::Backslash),
        (C::BracketRight, Key::BracketRight),
        (C::Backquote, Key::Grave),
        (C::ArrowLeft, Key::Left),
        (C::ArrowRight, Key::Right),
        (C::ArrowUp, Key::Up),
        (C::ArrowDown, Key::Down),
        (C::Insert, Key::Insert),
        (C::Home, Key::Home),
        (C::Delete, Key::Delete),
        (C::End, Key::End),
        (C::PageUp, Key::PageUp),
        (C::PageDown, Key::PageDown),
        (C::NumLock, Key::NumLock),
        (C::NumpadEqual, Key::KpEqual),
        (C::NumpadDivide, Key::KpDivide),
        (C::NumpadMultiply, Key::KpMultiply),
        (C::NumpadSubtract, Key::KpSubtract),
        (C::NumpadAdd, Key::KpAdd),
        (C::NumpadEnter, Key::KpEnter),
        (C::Numpad0, Key::KpInsert),
        (C::Numpad1, Key::KpEnd),
        (C::Numpad2, Key::KpDown),
        (C::Numpad3, Key::KpPageDown),
        (C::Numpad4, Key::KpLeft),
        (C::Numpad5, Key::KpBegin),
        (C::Numpad6, Key::KpRight),
        (C::Numpad7, Key::KpHome),
        (C::Numpad8, Key::KpUp),
        (C::Numpad9, Key::KpPageUp),
        (C::NumpadDecimal, Key::KpDelete),
        (C::Backspace, Key::BackSpace),
        (C::Tab, Key::Tab),
        (C::Enter, Key::Return),
        (C::CapsLock, Key::CapsLock),
        (C::ShiftLeft, Key::ShiftL),
        (C::ControlLeft, Key::CtrlL),
        (C::SuperLeft, Key::SuperL),
        (C::AltLeft, Key::AltL),
        (C::AltRight, Key::AltR),
        (C::SuperRight, Key::SuperR),
        (C::ContextMenu, Key::Menu),
        (C::ControlRight, Key::CtrlR),
        (C::ShiftRight, Key::ShiftR),
        (C::BrowserBack, Key::Back),
        (C::BrowserForward, Key::Forward),
        (C::BrowserSearch, Key::Search),
        (C::LaunchMail, Key::Envelope),
        (C::AudioVolumeUp, Key::VolumeUp),
        (C::AudioVolumeDown, Key::VolumeDown),
        (C::AudioVolumeMute, Key::Mute),
        (C::Power, Key::Power),
        (C::MediaPlayPause, Key::MediaPlayPause),
        (C::MediaStop, Key::MediaStop),
        (C::MediaTrackNext, Key::MediaNext),
        (C::MediaTrackPrevious, Key::MediaPrevious),
        (C::Fn, Key::Fn),
    ];
    map.extend(table);
    map
}

/// HID keyboard usage page (0x07) usages
pub fn hid_dialect() -> HashMap<u32, Key> {
    let mut map = HashMap::new();

    let letters = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    for (offset, key) in letters.into_iter().enumerate() {
        map.insert(0x04 + offset as u32, key);
    }

    // 1..9 then 0
    let digits = [
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
        Key::Num0,
    ];
    for (offset, key) in digits.into_iter().enumerate() {
        map.insert(0x1E + offset as u32, key);
    }

    let function_keys = [
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
    ];
    for (offset, key) in function_keys.into_iter().enumerate() {
        map.insert(0x3A + offset as u32, key);
    }

    let upper_function_keys = [
        Key::F13,
        Key::F14,
        Key::F15,
        Key::F16,
        Key::F17,
        Key::F18,
        Key::F19,
    ];
    for (offset, key) in upper_function_keys.into_iter().enumerate() {
        map.insert(0x68 + offset as u32, key);
    }

    map.extend([
        (0x28, Key::Return),
        (0x29, Key::Escape),
        (0x2A, Key::BackSpace),
        (0x2B, Key::Tab),
        (0x2C, Key::Space),
        (0x2D, Key::Minus),
        (0x2E, Key::Equal),
        (0x2F, Key::BracketLeft),
        (0x30, Key::BracketRight),
        (0x31, Key::Backslash),
        (0x32, Key::Numbersign),
        (0x33, Key::Semicolon),
        (0x34, Key::Apostrophe),
        (0x35, Key::Grave),
        (0x36, Key::Comma),
        (0x37, Key::Period),
        (0x38, Key::Slash),
        (0x39, Key::CapsLock),
        (0x46, Key::Print),
        (0x47, Key::ScrollLock),
        (0x48, Key::Break),
        (0x49, Key::Insert),
        (0x4A, Key::Home),
        (0x4B, Key::PageUp),
        (0x4C, Key::Delete),
        (0x4D, Key::End),
        (0x4E, Key::PageDown),
        (0x4F, Key::Right),
        (0x50, Key::Left),
        (0x51, Key::Down),
        (0x52, Key::Up),
        (0x53, Key::NumLock),
        (0x54, Key::KpDivide),
        (0x55, Key::KpMultiply),
        (0x56, Key::KpSubtract),
        (0x57, Key::KpAdd),
        (0x58, Key::KpEnter),
        (0x59, Key::KpEnd),
        (0x5A, Key::KpDown),
        (0x5B, Key::KpPageDown),
        (0x5C, Key::KpLeft),
        (0x5D, Key::KpBegin),
        (0x5E, Key::KpRight),
        (0x5F, Key::KpHome),
        (0x60, Key::KpUp),
        (0x61, Key::KpPageUp),
        (0x62, Key::KpInsert),
        (0x63, Key::KpDelete),
        (0x64, Key::Less),
        (0x65, Key::Menu),
        (0x66, Key::Power),
        (0x67, Key::KpEqual),
        (0x7F, Key::Mute),
        (0x80, Key::VolumeUp),
        (0x81, Key::VolumeDown),
        (0xE0, Key::CtrlL),
        (0xE1, Key::ShiftL),
        (0xE2, Key::AltL),
        (0xE3, Key::SuperL),
        (0xE4, Key::CtrlR),
        (0xE5, Key::ShiftR),
        (0xE6, Key::AltR),
        (0xE7, Key::SuperR),
    ]);
    map
}

/// Android `AKEYCODE_*` values
pub fn android_dialect() -> HashMap<i32, Key> {
    let mut map = HashMap::new();

    let digits = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];
    for (offset, key) in digits.into_iter().enumerate() {
        map.insert(7 + offset as i32, key);
    }

    let letters = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    for (offset, key) in letters.into_iter().enumerate() {
        map.insert(29 + offset as i32, key);
    }

    let function_keys = [
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
    ];
    for (offset, key) in function_keys.into_iter().enumerate() {
        map.insert(131 + offset as i32, key);
    }

    // Numpad digits report their navigation meaning
    let numpad = [
        Key::KpInsert,
        Key::KpEnd,
        Key::KpDown,
        Key::KpPageDown,
        Key::KpLeft,
        Key::KpBegin,
        Key::KpRight,
        Key::KpHome,
        Key::KpUp,
        Key::KpPageUp,
    ];
    for (offset, key) in numpad.into_iter().enumerate() {
        map.insert(144 + offset as i32, key);
    }

    map.extend([
        (1, Key::SoftLeft),
        (2, Key::SoftRight),
        (3, Key::Home),
        (4, Key::Back),
        (5, Key::Call),
        (6, Key::Endcall),
        (17, Key::Star),
        (18, Key::Pound),
        (19, Key::Up),
        (20, Key::Down),
        (21, Key::Left),
        (22, Key::Right),
        (23, Key::DpadCenter),
        (24, Key::VolumeUp),
        (25, Key::VolumeDown),
        (26, Key::Power),
        (27, Key::Camera),
        (28, Key::Clear),
        (55, Key::Comma),
        (56, Key::Period),
        (57, Key::AltL),
        (58, Key::AltR),
        (59, Key::ShiftL),
        (60, Key::ShiftR),
        (61, Key::Tab),
        (62, Key::Space),
        (63, Key::Symbol),
        (64, Key::Explorer),
        (65, Key::Envelope),
        (66, Key::Return),
        (67, Key::BackSpace),
        (68, Key::Grave),
        (69, Key::Minus),
        (70, Key::Equals),
        (71, Key::BracketLeft),
        (72, Key::BracketRight),
        (73, Key::Backslash),
        (74, Key::Semicolon),
        (75, Key::Apostrophe),
        (76, Key::Slash),
        (77, Key::At),
        (79, Key::Headsethook),
        (80, Key::Focus),
        (81, Key::Plus),
        (82, Key::Menu),
        (83, Key::Notification),
        (84, Key::Search),
        (85, Key::MediaPlayPause),
        (86, Key::MediaStop),
        (87, Key::MediaNext),
        (88, Key::MediaPrevious),
        (89, Key::MediaRewind),
        (90, Key::MediaFastForward),
        (91, Key::Mute),
        (92, Key::PageUp),
        (93, Key::PageDown),
        (94, Key::Pictsymbols),
        (95, Key::SwitchCharset),
        (111, Key::Escape),
        (112, Key::Delete),
        (113, Key::CtrlL),
        (114, Key::CtrlR),
        (115, Key::CapsLock),
        (116, Key::ScrollLock),
        (117, Key::SuperL),
        (118, Key::SuperR),
        (119, Key::Fn),
        (120, Key::SysRq),
        (121, Key::Break),
        (122, Key::Home),
        (123, Key::End),
        (124, Key::Insert),
        (125, Key::Forward),
        (143, Key::NumLock),
        (154, Key::KpDivide),
        (155, Key::KpMultiply),
        (156, Key::KpSubtract),
        (157, Key::KpAdd),
        (158, Key::KpDelete),
        (160, Key::KpEnter),
        (161, Key::KpEqual),
    ]);
    map
}
