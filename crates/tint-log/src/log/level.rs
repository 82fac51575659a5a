use core::str::FromStr;

use super::*;

/// Default color and channel of a call family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Preset {
    pub color: Color,
    pub kind: SinkKind,
}

impl Preset {

    pub const LOG: Self = Self::new(Color::White, SinkKind::Log);
    pub const WARNING: Self = Self::new(Color::Yellow, SinkKind::Warning);
    pub const ERROR: Self = Self::new(Color::Red, SinkKind::Error);
    pub const SUCCESS: Self = Self::new(Color::Green, SinkKind::Log);
    pub const ASSERTION: Self = Self::new(Color::Magenta, SinkKind::Assert);
    pub const EXCEPTION: Self = Self::new(Color::Blue, SinkKind::Exception);

    #[inline(always)]
    pub const fn new(color: Color, kind: SinkKind) -> Self {
        Self { color, kind }
    }

    #[inline(always)]
    pub const fn style(self) -> Style {
        Style::with_color(self.color)
    }
}

/// User-facing severity. Only selects default styling; the channel comes
/// from the preset's [`SinkKind`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Level {
    Normal,
    Warning,
    Error,
    Success,
}

impl Level {

    #[inline(always)]
    pub const fn preset(self) -> Preset {
        match self {
            Self::Normal => Preset::LOG,
            Self::Warning => Preset::WARNING,
            Self::Error => Preset::ERROR,
            Self::Success => Preset::SUCCESS,
        }
    }

    #[inline(always)]
    pub const fn color(self) -> Color {
        self.preset().color
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("normal") || s.eq_ignore_ascii_case("log") {
            Ok(Self::Normal)
        } else if s.eq_ignore_ascii_case("warning") || s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warning)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("success") {
            Ok(Self::Success)
        } else {
            Err(())
        }
    }
}
