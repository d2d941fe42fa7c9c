use crate::Vec2;

/// Pointer gesture reported by the touchpad, positioned in the coordinate
/// space of whichever node is currently receiving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Tap(Vec2),
    Press { touches: u32, position: Vec2 },
    Release { touches: u32, position: Vec2 },
    /// Finger moved across the pad.
    Move(Vec2),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Tap,
    Press,
    Release,
    Move,
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::Tap(_) => GestureKind::Tap,
            Gesture::Press { .. } => GestureKind::Press,
            Gesture::Release { .. } => GestureKind::Release,
            Gesture::Move(_) => GestureKind::Move,
        }
    }

    pub fn position(&self) -> Vec2 {
        match *self {
            Gesture::Tap(p) | Gesture::Move(p) => p,
            Gesture::Press { position, .. } | Gesture::Release { position, .. } => position,
        }
    }

    /// Same gesture re-expressed at another point (used when descending into
    /// a child's local space).
    pub fn at(self, position: Vec2) -> Gesture {
        match self {
            Gesture::Tap(_) => Gesture::Tap(position),
            Gesture::Move(_) => Gesture::Move(position),
            Gesture::Press { touches, .. } => Gesture::Press { touches, position },
            Gesture::Release { touches, .. } => Gesture::Release { touches, position },
        }
    }

    pub fn touches(&self) -> u32 {
        match *self {
            Gesture::Press { touches, .. } | Gesture::Release { touches, .. } => touches,
            _ => 1,
        }
    }
}

/// Key-down codes the core cares about. Anything else is passed through as
/// the raw virtual-key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Tab,
    Return,
    Escape,
    Other(u32),
}

impl Key {
    /// Maps a Windows-style virtual-key code as reported by the keyboard
    /// capture callback.
    pub fn from_vk(code: u32) -> Key {
        match code {
            0x08 => Key::Backspace,
            0x09 => Key::Tab,
            0x0D => Key::Return,
            0x1B => Key::Escape,
            other => Key::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Down(Key),
    Char(char),
}
