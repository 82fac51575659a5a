#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorError {
    IndexOutOfRange(i32),
}

impl core::fmt::Display for ColorError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IndexOutOfRange(index) => write!(
                f, "color index {} is out of range 0..{}", index, crate::Color::COUNT,
            ),
        }
    }
}

impl core::error::Error for ColorError {}
