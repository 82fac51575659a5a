use tint_color::ColorError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogError {
    InvalidSinkType(i32),
    InvalidColorIndex(ColorError),
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSinkType(value) => write!(f, "invalid sink type {}", value),
            Self::InvalidColorIndex(ColorError::IndexOutOfRange(index)) => {
                write!(f, "invalid color index {}", index)
            },
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidSinkType(_) => None,
            Self::InvalidColorIndex(err) => Some(err),
        }
    }
}

impl From<ColorError> for LogError {

    fn from(value: ColorError) -> Self {
        Self::InvalidColorIndex(value)
    }
}
