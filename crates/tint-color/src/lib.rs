//! Named color palette used by `tint-log` markup.
//!
//! Every [`Color`] resolves to a fixed hexadecimal code and can be recovered
//! from its contiguous index with [`Color::from_index`].

mod color;
mod error;

pub use color::Color;
pub use error::ColorError;

pub type Result<T> = core::result::Result<T, ColorError>;
