use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    sync::{OnceLock, Mutex, MutexGuard, PoisonError},
};

use crate::*;

mod error;
mod fmt;
mod level;
mod sink;
mod console;

pub use error::LogError;
pub use fmt::{Composite, Message, Style, format, format_into};
pub use level::{Level, Preset};
pub use sink::{Sink, SinkKind, Exception, NoopSink, CaptureSink, Record};
pub use console::{
    ConsoleSink, MarkupMode, COLOR_ENV, MARKUP_ENV,
    strip_markup, render_markup, parse_color_choice,
};

/// Formats messages into a reusable buffer and hands them to a [`Sink`].
pub struct Logger<S: Sink> {
    sink: S,
    buf: String,
}

impl<S: Sink> Logger<S> {

    #[inline(always)]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buf: String::new(),
        }
    }

    #[inline(always)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline(always)]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[inline(always)]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Formats `message` with `style` and makes exactly one call into the
    /// sink channel selected by `kind`.
    pub fn emit<'a>(&mut self, message: impl Into<Message<'a>>, kind: SinkKind, style: Style) {
        format_into(&mut self.buf, message.into(), style);
        sink::dispatch(&mut self.sink, kind, &self.buf);
    }

    /// Like [`Logger::emit`] with an untyped sink kind.
    ///
    /// # Errors
    /// [`LogError::InvalidSinkType`] before anything is formatted or emitted.
    pub fn emit_raw<'a>(&mut self, message: impl Into<Message<'a>>, kind: i32, style: Style) -> Result<()> {
        let kind = SinkKind::try_from(kind)?;
        self.emit(message, kind, style);
        Ok(())
    }

    #[inline(always)]
    pub fn emit_preset<'a>(
        &mut self,
        preset: Preset,
        message: impl Into<Message<'a>>,
        f: impl FnOnce(Style) -> Style,
    ) {
        self.emit(message, preset.kind, f(preset.style()))
    }
}

type GlobalLogger = Logger<Box<dyn Sink>>;

static LOGGER: OnceLock<Mutex<GlobalLogger>> = OnceLock::new();

fn global() -> MutexGuard<'static, GlobalLogger> {
    LOGGER
        .get_or_init(|| {
            let sink: Box<dyn Sink> = Box::new(ConsoleSink::from_env());
            Mutex::new(Logger::new(sink))
        })
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Installs the default [`ConsoleSink`] unless a sink is already installed.
///
/// Calling this is optional; the first log call does the same.
pub fn init() {
    drop(global());
}

/// Replaces the global sink, returning the previous one.
///
/// Must not be called from inside a [`Sink`] method.
pub fn set_sink(sink: impl Sink + 'static) -> Box<dyn Sink> {
    let sink: Box<dyn Sink> = Box::new(sink);
    core::mem::replace(global().sink_mut(), sink)
}

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
    static PENDING: RefCell<VecDeque<(SinkKind, String)>> = const { RefCell::new(VecDeque::new()) };
}

/// Marks the current thread as holding the global logger.
struct Dispatching;

impl Dispatching {

    fn enter() -> Self {
        DISPATCHING.set(true);
        Self
    }
}

impl Drop for Dispatching {

    fn drop(&mut self) {
        DISPATCHING.set(false);
        PENDING.with_borrow_mut(VecDeque::clear);
    }
}

/// Emits through the global sink.
///
/// A call made from inside the installed sink is formatted immediately and
/// delivered right after the message being dispatched, on the same lock.
pub fn emit<'a>(message: impl Into<Message<'a>>, kind: SinkKind, style: Style) {
    if DISPATCHING.get() {
        let text = format(message, style);
        PENDING.with_borrow_mut(|pending| pending.push_back((kind, text)));
        return
    }
    let mut logger = global();
    let _dispatching = Dispatching::enter();
    logger.emit(message, kind, style);
    while let Some((kind, text)) = PENDING.with_borrow_mut(VecDeque::pop_front) {
        sink::dispatch(logger.sink_mut(), kind, &text);
    }
}

/// # Errors
/// [`LogError::InvalidSinkType`] for values outside `0..=4`; nothing is emitted.
#[inline(always)]
pub fn emit_raw<'a>(message: impl Into<Message<'a>>, kind: i32, style: Style) -> Result<()> {
    let kind = SinkKind::try_from(kind)?;
    emit(message, kind, style);
    Ok(())
}

#[inline(always)]
pub fn emit_preset<'a>(preset: Preset, message: impl Into<Message<'a>>, f: impl FnOnce(Style) -> Style) {
    emit(message, preset.kind, f(preset.style()))
}

/// Emits with the styling of `level`.
#[inline(always)]
pub fn log_level<'a>(level: Level, message: impl Into<Message<'a>>, f: impl FnOnce(Style) -> Style) {
    emit_preset(level.preset(), message, f)
}

macro_rules! family {
    ($preset:expr, $plain:ident, $styled:ident, $indexed:ident) => {
        #[inline(always)]
        pub fn $plain<'a>(message: impl Into<Message<'a>>) {
            emit_preset($preset, message, |style| style)
        }

        /// `f` receives the family's default style.
        #[inline(always)]
        pub fn $styled<'a>(message: impl Into<Message<'a>>, f: impl FnOnce(Style) -> Style) {
            emit_preset($preset, message, f)
        }

        /// Uses a raw palette index as the color.
        ///
        /// # Errors
        /// [`LogError::InvalidColorIndex`] when `color` is outside the palette; nothing is emitted.
        #[inline(always)]
        pub fn $indexed<'a>(
            color: i32,
            message: impl Into<Message<'a>>,
            f: impl FnOnce(Style) -> Style,
        ) -> Result<()>
        {
            let color = Color::from_index(color)?;
            emit_preset($preset, message, |style| f(style.color(color)));
            Ok(())
        }
    };
}

family!(Preset::LOG, log, log_styled, log_indexed);
family!(Preset::WARNING, warning, warning_styled, warning_indexed);
family!(Preset::ERROR, error, error_styled, error_indexed);
family!(Preset::SUCCESS, success, success_styled, success_indexed);
family!(Preset::ASSERTION, assertion, assertion_styled, assertion_indexed);
family!(Preset::EXCEPTION, exception, exception_styled, exception_indexed);

#[macro_export]
macro_rules! log {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::log_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::log(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[macro_export]
macro_rules! warning {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::warning_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::warning(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[macro_export]
macro_rules! error {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::error_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::error(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[macro_export]
macro_rules! success {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::success_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::success(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[macro_export]
macro_rules! assertion {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::assertion_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::assertion(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[macro_export]
macro_rules! exception {
    (with $f:expr; $($part:expr),+ $(,)?) => {
        $crate::exception_styled(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..], $f)
    };
    ($($part:expr),+ $(,)?) => {
        $crate::exception(&[$(::core::convert::AsRef::<str>::as_ref(&$part)),+][..])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> (Logger<CaptureSink>, CaptureSink) {
        let sink = CaptureSink::new();
        (Logger::new(sink.clone()), sink)
    }

    #[test]
    fn emits_once_on_selected_channel() {
        let (mut logger, sink) = capture();
        logger.emit("Build ok", SinkKind::Log, Style::with_color(Color::Green));
        assert_eq!(
            sink.take(),
            [Record { kind: SinkKind::Log, text: "<color=#00FF00>Build ok</color>".into() }],
        );
    }

    #[test]
    fn separated_warning_example() {
        let (mut logger, sink) = capture();
        let style = Style::with_color(Color::Yellow).bold().separate_lines();
        logger.emit(&["step1", "step2"], SinkKind::Warning, style);
        assert_eq!(
            sink.take(),
            [Record {
                kind: SinkKind::Warning,
                text: "<color=#FFFF00><b>step1\nstep2\n</b></color>\n".into(),
            }],
        );
    }

    #[test]
    fn buffer_does_not_leak_between_calls() {
        let (mut logger, sink) = capture();
        logger.emit("a much longer first message", SinkKind::Log, Style::new());
        logger.emit("b", SinkKind::Error, Style::new());
        let texts: Vec<_> = sink.take().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, ["a much longer first message", "b"]);
    }

    #[test]
    fn same_input_same_output() {
        let (mut logger, sink) = capture();
        let style = Style::with_color(Color::Orange).italic();
        logger.emit("x", SinkKind::Assert, style);
        logger.emit("x", SinkKind::Assert, style);
        let records = sink.take();
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn exception_channel_receives_wrapped_text() {
        let (mut logger, sink) = capture();
        logger.emit_preset(Preset::EXCEPTION, "boom", |style| style);
        assert_eq!(
            sink.take(),
            [Record { kind: SinkKind::Exception, text: "<color=#0000FF>boom</color>".into() }],
        );
    }

    #[test]
    fn invalid_raw_kind_emits_nothing() {
        let (mut logger, sink) = capture();
        assert_eq!(logger.emit_raw("x", 9, Style::new()), Err(LogError::InvalidSinkType(9)));
        assert!(sink.is_empty());
        assert_eq!(logger.emit_raw("x", 1, Style::new()), Ok(()));
        assert_eq!(sink.take()[0].kind, SinkKind::Warning);
    }

    #[test]
    fn into_sink_returns_owned_sink() {
        let (mut logger, _) = capture();
        logger.emit("kept", SinkKind::Log, Style::new());
        assert_eq!(logger.sink().len(), 1);
        assert_eq!(logger.into_sink().records()[0].text, "kept");
    }
}
