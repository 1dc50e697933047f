use std::str::FromStr;

/// Length of the flag vector the page posts, one slot per DOM key code.
pub const KEY_SLOTS: usize = 256;
pub const KEY_DOWN: u8 = b'1';
pub const KEY_UP: u8 = b'0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    ArrowLeft = 37,
    ArrowUp = 38,
    ArrowRight = 39,
    ArrowDown = 40,
}

impl KeyCode {
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

impl FromStr for KeyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "left" => Self::ArrowLeft,
            "up" => Self::ArrowUp,
            "right" => Self::ArrowRight,
            "down" => Self::ArrowDown,
            other => anyhow::bail!("unknown key {other:?} (expected left, up, right or down)"),
        };

        Ok(key)
    }
}

/// Borrowed view over one POST body.
///
/// Slots past the end of a short body read as released.
#[derive(Clone, Copy, Debug)]
pub struct InputVector<'a> {
    raw: &'a [u8],
}

impl<'a> InputVector<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.raw.get(key.slot()) == Some(&KEY_DOWN)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Build the body a page holding `keys` would send.
    pub fn encode(keys: &[KeyCode]) -> Vec<u8> {
        let mut body = vec![KEY_UP; KEY_SLOTS];
        for key in keys {
            body[key.slot()] = KEY_DOWN;
        }
        body
    }
}
