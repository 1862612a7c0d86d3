//! Key descriptors and Win32 virtual-key translation
//!
//! Provides the abstract key-combination types persisted in settings
//! and the pure translation to the modifier mask / virtual-key pair
//! consumed by hotkey registration.

/// Win32 hotkey modifier bits (`HOT_KEY_MODIFIERS`)
pub mod mods {
    /// Alt key modifier bit
    pub const ALT: u32 = 0x0001;
    /// Control key modifier bit
    pub const CONTROL: u32 = 0x0002;
    /// Shift key modifier bit
    pub const SHIFT: u32 = 0x0004;
    /// Windows key modifier bit
    pub const WIN: u32 = 0x0008;
}

/// Win32 virtual-key codes for the named keys in the fixed table
mod vk {
    pub const BACK: u32 = 0x08;
    pub const TAB: u32 = 0x09;
    pub const ESCAPE: u32 = 0x1B;
    pub const SPACE: u32 = 0x20;
    pub const DELETE: u32 = 0x2E;
    pub const F1: u32 = 0x70;
}

/// Symbolic base key of a hotkey binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character key; only ASCII letters and digits map
    /// to a virtual key
    Char(char),
    /// Function key F1..F12; anything outside that range is unmapped
    F(u8),
    Escape,
    Delete,
    Space,
    Backspace,
    Tab,
}

/// Modifier keys held as part of a hotkey binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key is part of the binding
    pub ctrl: bool,
    /// Alt key is part of the binding
    pub alt: bool,
    /// Shift key is part of the binding
    pub shift: bool,
    /// Windows key is part of the binding
    pub meta: bool,
}

impl Modifiers {
    /// Translate to a Win32 `HOT_KEY_MODIFIERS` bitmask; no modifiers
    /// yields 0
    pub fn mask(&self) -> u32 {
        let mut mask = 0;
        if self.ctrl {
            mask |= mods::CONTROL;
        }
        if self.alt {
            mask |= mods::ALT;
        }
        if self.shift {
            mask |= mods::SHIFT;
        }
        if self.meta {
            mask |= mods::WIN;
        }
        mask
    }

    /// Check if no modifiers are set
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }
}

/// An abstract key combination: base key plus modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub key: Key,
    pub modifiers: Modifiers,
}

/// The native modifier-mask / virtual-key pair used for registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeHotkeyCode {
    pub modifiers: u32,
    pub virtual_key: u32,
}

impl NativeHotkeyCode {
    /// A zero virtual key is the sentinel for a failed mapping; callers
    /// must not register it
    pub fn is_unmapped(&self) -> bool {
        self.virtual_key == 0
    }
}

/// Translate a key descriptor to its native modifier/virtual-key pair.
///
/// Pure and total: every descriptor yields a value. Base keys outside
/// the alphanumeric range and the fixed named-key table translate to
/// virtual key 0.
pub fn translate(descriptor: &KeyDescriptor) -> NativeHotkeyCode {
    NativeHotkeyCode {
        modifiers: descriptor.modifiers.mask(),
        virtual_key: virtual_key_of(descriptor.key),
    }
}

/// Map a base key to its Win32 virtual-key code, 0 if unmapped.
///
/// Letters and digits use their ASCII code directly (the WinAPI
/// convention); the named keys come from a fixed table.
fn virtual_key_of(key: Key) -> u32 {
    match key {
        Key::Char(c) => {
            let c = c.to_ascii_uppercase();
            if c.is_ascii_uppercase() || c.is_ascii_digit() {
                c as u32
            } else {
                0
            }
        }
        Key::F(n) if (1..=12).contains(&n) => vk::F1 + u32::from(n - 1),
        Key::F(_) => 0,
        Key::Escape => vk::ESCAPE,
        Key::Delete => vk::DELETE,
        Key::Space => vk::SPACE,
        Key::Backspace => vk::BACK,
        Key::Tab => vk::TAB,
    }
}

impl KeyDescriptor {
    /// Parse the textual form persisted in settings, e.g. "Ctrl+G" or
    /// "Ctrl+Shift+F5". Modifier and key names are case-insensitive.
    /// Returns None for an empty or unrecognized sequence.
    pub fn parse(text: &str) -> Option<Self> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in text.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "" => return None,
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "win" => modifiers.meta = true,
                name => {
                    // The base key must be the last segment
                    if key.is_some() {
                        return None;
                    }
                    key = Some(parse_base_key(name)?);
                }
            }
        }

        key.map(|key| Self { key, modifiers })
    }
}

fn parse_base_key(name: &str) -> Option<Key> {
    let key = match name {
        "escape" | "esc" => Key::Escape,
        "delete" | "del" => Key::Delete,
        "space" => Key::Space,
        "backspace" => Key::Backspace,
        "tab" => Key::Tab,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.as_str()) {
                (Some(c), "") if c.is_ascii_alphanumeric() => Key::Char(c.to_ascii_uppercase()),
                (Some('f'), rest) => {
                    let n: u8 = rest.parse().ok()?;
                    if !(1..=12).contains(&n) {
                        return None;
                    }
                    Key::F(n)
                }
                _ => return None,
            }
        }
    };
    Some(key)
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{}", n),
            Key::Escape => write!(f, "Escape"),
            Key::Delete => write!(f, "Delete"),
            Key::Space => write!(f, "Space"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Tab => write!(f, "Tab"),
        }
    }
}

impl std::fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        if self.modifiers.meta {
            write!(f, "Meta+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(key: Key) -> KeyDescriptor {
        KeyDescriptor {
            key,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_letters_map_to_ascii() {
        for c in 'A'..='Z' {
            let code = translate(&plain(Key::Char(c)));
            assert_eq!(code.virtual_key, c as u32);
            assert_eq!(code.modifiers, 0);
        }
        // Lowercase input normalizes to the same code
        assert_eq!(
            translate(&plain(Key::Char('g'))).virtual_key,
            translate(&plain(Key::Char('G'))).virtual_key
        );
    }

    #[test]
    fn test_digits_map_to_ascii() {
        for c in '0'..='9' {
            assert_eq!(translate(&plain(Key::Char(c))).virtual_key, c as u32);
        }
    }

    #[test]
    fn test_function_keys_injective() {
        let codes: Vec<u32> = (1..=12)
            .map(|n| translate(&plain(Key::F(n))).virtual_key)
            .collect();
        assert_eq!(codes[0], 0x70); // VK_F1
        assert_eq!(codes[11], 0x7B); // VK_F12
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(translate(&plain(Key::Escape)).virtual_key, 0x1B);
        assert_eq!(translate(&plain(Key::Delete)).virtual_key, 0x2E);
        assert_eq!(translate(&plain(Key::Space)).virtual_key, 0x20);
        assert_eq!(translate(&plain(Key::Backspace)).virtual_key, 0x08);
        assert_eq!(translate(&plain(Key::Tab)).virtual_key, 0x09);
    }

    #[test]
    fn test_modifiers_independent_of_base_key() {
        let bare = translate(&plain(Key::Char('G')));
        let with_ctrl = translate(&KeyDescriptor {
            key: Key::Char('G'),
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        });
        assert_eq!(bare.virtual_key, with_ctrl.virtual_key);
        assert_eq!(bare.modifiers, 0);
        assert_eq!(with_ctrl.modifiers, mods::CONTROL);
    }

    #[test]
    fn test_modifier_mask_combination() {
        let all = Modifiers {
            ctrl: true,
            alt: true,
            shift: true,
            meta: true,
        };
        assert_eq!(
            all.mask(),
            mods::CONTROL | mods::ALT | mods::SHIFT | mods::WIN
        );
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn test_unmapped_keys_yield_sentinel() {
        assert!(translate(&plain(Key::Char('#'))).is_unmapped());
        assert!(translate(&plain(Key::Char('ä'))).is_unmapped());
        assert!(translate(&plain(Key::F(13))).is_unmapped());
        assert!(translate(&plain(Key::F(0))).is_unmapped());
        assert!(!translate(&plain(Key::Char('A'))).is_unmapped());
    }

    #[test]
    fn test_parse_simple_binding() {
        let desc = KeyDescriptor::parse("Ctrl+G").unwrap();
        assert_eq!(desc.key, Key::Char('G'));
        assert!(desc.modifiers.ctrl);
        assert!(!desc.modifiers.shift);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            KeyDescriptor::parse("ctrl+shift+f5"),
            KeyDescriptor::parse("Ctrl+Shift+F5")
        );
        let desc = KeyDescriptor::parse("CTRL+ALT+DELETE").unwrap();
        assert_eq!(desc.key, Key::Delete);
        assert!(desc.modifiers.ctrl && desc.modifiers.alt);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyDescriptor::parse("").is_none());
        assert!(KeyDescriptor::parse("Ctrl+").is_none());
        assert!(KeyDescriptor::parse("Ctrl").is_none());
        assert!(KeyDescriptor::parse("Ctrl+G+H").is_none());
        assert!(KeyDescriptor::parse("F99").is_none());
        assert!(KeyDescriptor::parse("Hyper+G").is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["Ctrl+G", "Ctrl+Shift+F5", "Alt+Space", "F12", "Delete"] {
            let desc = KeyDescriptor::parse(text).unwrap();
            assert_eq!(desc.to_string(), text);
            assert_eq!(KeyDescriptor::parse(&desc.to_string()), Some(desc));
        }
    }
}
