/// Modifier held down while a key is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modifier {
    Meta,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key {
    Tab,
    Char(char),
}

/// A single key press, optionally combined with a modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chord {
    pub(crate) modifier: Option<Modifier>,
    pub(crate) key: Key,
}

impl Chord {
    pub(crate) fn key(key: Key) -> Self {
        Self {
            modifier: None,
            key,
        }
    }

    pub(crate) fn with_modifier(modifier: Modifier, c: char) -> Self {
        Self {
            modifier: Some(modifier),
            key: Key::Char(c),
        }
    }
}

// WebDriver normalized key codes (Unicode private use area).
impl Modifier {
    pub(crate) fn code(self) -> &'static str {
        match self {
            Modifier::Meta => "\u{E03D}",
            Modifier::Control => "\u{E009}",
        }
    }
}

impl Key {
    pub(crate) fn code(self) -> String {
        match self {
            Key::Tab => "\u{E004}".to_string(),
            Key::Char(c) => c.to_string(),
        }
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(m) = self.modifier {
            write!(f, "{m:?}+")?;
        }
        match self.key {
            Key::Tab => write!(f, "Tab"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}
