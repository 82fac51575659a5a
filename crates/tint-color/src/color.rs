use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::*;

/// Fixed named palette.
///
/// The discriminant is the color's index: [`Color::from_index`] accepts
/// `0..Color::COUNT` in declaration order.
#[repr(u8)]
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Color {
    #[default]
    White = 0,
    Black = 1,
    Red = 2,
    Green = 3,
    Blue = 4,
    Yellow = 5,
    Cyan = 6,
    Magenta = 7,
    Gray = 8,
    Orange = 9,
}

impl Color {

    pub const ALL: [Self; 10] = [
        Self::White,
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Cyan,
        Self::Magenta,
        Self::Gray,
        Self::Orange,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Upper-case hexadecimal `RRGGBB` code, without a leading `#`.
    #[inline(always)]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::White => "FFFFFF",
            Self::Black => "000000",
            Self::Red => "FF0000",
            Self::Green => "00FF00",
            Self::Blue => "0000FF",
            Self::Yellow => "FFFF00",
            Self::Cyan => "00FFFF",
            Self::Magenta => "FF00FF",
            Self::Gray => "808080",
            Self::Orange => "FFA500",
        }
    }

    #[inline(always)]
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::White => [0xFF, 0xFF, 0xFF],
            Self::Black => [0x00, 0x00, 0x00],
            Self::Red => [0xFF, 0x00, 0x00],
            Self::Green => [0x00, 0xFF, 0x00],
            Self::Blue => [0x00, 0x00, 0xFF],
            Self::Yellow => [0xFF, 0xFF, 0x00],
            Self::Cyan => [0x00, 0xFF, 0xFF],
            Self::Magenta => [0xFF, 0x00, 0xFF],
            Self::Gray => [0x80, 0x80, 0x80],
            Self::Orange => [0xFF, 0xA5, 0x00],
        }
    }

    #[inline(always)]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Gray => "gray",
            Self::Orange => "orange",
        }
    }

    #[inline(always)]
    pub const fn index(self) -> i32 {
        self as u8 as i32
    }

    /// Resolves a raw numeric color code.
    ///
    /// # Errors
    /// [`ColorError::IndexOutOfRange`] when `index` is negative or not below [`Color::COUNT`].
    pub fn from_index(index: i32) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ColorError::IndexOutOfRange(index))
    }
}

impl TryFrom<i32> for Color {

    type Error = ColorError;

    #[inline(always)]
    fn try_from(value: i32) -> Result<Self> {
        Self::from_index(value)
    }
}

impl FromStr for Color {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("grey") {
            return Ok(Self::Gray)
        }
        Self::ALL
            .into_iter()
            .find(|color| s.eq_ignore_ascii_case(color.name()))
            .ok_or(())
    }
}

impl Display for Color {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_discriminant() {
        for (i, color) in Color::ALL.into_iter().enumerate() {
            assert_eq!(color.index(), i as i32);
            assert_eq!(Color::from_index(i as i32), Ok(color));
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(Color::from_index(Color::COUNT as i32), Err(ColorError::IndexOutOfRange(10)));
        assert_eq!(Color::try_from(-1), Err(ColorError::IndexOutOfRange(-1)));
        assert_eq!(
            ColorError::IndexOutOfRange(42).to_string(),
            "color index 42 is out of range 0..10",
        );
    }

    #[test]
    fn hex_matches_rgb() {
        for color in Color::ALL {
            let [r, g, b] = color.rgb();
            assert_eq!(color.hex(), format!("{r:02X}{g:02X}{b:02X}"));
        }
        assert_eq!(Color::Green.hex(), "00FF00");
        assert_eq!(Color::Yellow.hex(), "FFFF00");
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Magenta".parse(), Ok(Color::Magenta));
        assert_eq!(" ORANGE ".parse(), Ok(Color::Orange));
        assert_eq!("grey".parse(), Ok(Color::Gray));
        assert_eq!("chartreuse".parse::<Color>(), Err(()));
        assert_eq!(Color::Cyan.to_string(), "cyan");
    }

    #[test]
    fn default_is_white() {
        assert_eq!(Color::default(), Color::White);
    }
}
