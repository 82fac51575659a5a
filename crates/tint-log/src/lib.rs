//! Rich-text logging facade.
//!
//! Messages are decorated with `<color=#RRGGBB>`, `<b>` and `<i>` markup and
//! dispatched to one of five sink channels. The global facade lazily installs
//! a [`ConsoleSink`]; replace it with [`set_sink`].
//!
//! ```rust
//! use tint_log::{Color, Logger, CaptureSink, SinkKind, Style};
//!
//! let sink = CaptureSink::new();
//! let mut logger = Logger::new(sink.clone());
//! logger.emit("Build ok", SinkKind::Log, Style::new().color(Color::Green));
//! assert_eq!(sink.records()[0].text, "<color=#00FF00>Build ok</color>");
//! ```

#[macro_use]

mod log;

pub use tint_color::{Color, ColorError};

pub use log::*;

pub type Result<T> = core::result::Result<T, LogError>;
