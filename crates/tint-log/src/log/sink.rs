use std::sync::{Arc, Mutex, PoisonError};

use compact_str::CompactString;

use super::*;

/// Destination channel of a formatted message.
#[repr(i32)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SinkKind {
    Log = 0,
    Warning = 1,
    Error = 2,
    Assert = 3,
    Exception = 4,
}

impl SinkKind {

    pub const ALL: [Self; 5] = [
        Self::Log,
        Self::Warning,
        Self::Error,
        Self::Assert,
        Self::Exception,
    ];

    #[inline(always)]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Assert => "ASSERT",
            Self::Exception => "EXCEPTION",
        }
    }
}

impl TryFrom<i32> for SinkKind {

    type Error = LogError;

    fn try_from(value: i32) -> Result<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(LogError::InvalidSinkType(value))
    }
}

/// Error value handed to [`Sink::exception`].
///
/// Carries the formatted message and nothing else.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Exception {
    message: CompactString,
}

impl Exception {

    #[inline(always)]
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            message: CompactString::new(message),
        }
    }

    #[inline(always)]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for Exception {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for Exception {}

/// Write-only log channels.
///
/// Calls are fire-and-forget; a sink deals with its own failures.
///
/// A sink may log through the global facade; those messages reach the sink
/// after the current call returns. It must not call [`set_sink`] or [`init`].
pub trait Sink: Send {

    fn log(&mut self, text: &str);

    fn warn(&mut self, text: &str);

    fn error(&mut self, text: &str);

    fn assert_fail(&mut self, text: &str) {
        self.error(text)
    }

    fn exception(&mut self, err: &Exception) {
        self.error(err.message())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {

    #[inline(always)]
    fn log(&mut self, text: &str) {
        (**self).log(text)
    }

    #[inline(always)]
    fn warn(&mut self, text: &str) {
        (**self).warn(text)
    }

    #[inline(always)]
    fn error(&mut self, text: &str) {
        (**self).error(text)
    }

    #[inline(always)]
    fn assert_fail(&mut self, text: &str) {
        (**self).assert_fail(text)
    }

    #[inline(always)]
    fn exception(&mut self, err: &Exception) {
        (**self).exception(err)
    }
}

/// Routes `text` to the channel selected by `kind`.
pub(crate) fn dispatch<S: Sink + ?Sized>(sink: &mut S, kind: SinkKind, text: &str) {
    match kind {
        SinkKind::Log => sink.log(text),
        SinkKind::Warning => sink.warn(text),
        SinkKind::Error => sink.error(text),
        SinkKind::Assert => sink.assert_fail(text),
        SinkKind::Exception => sink.exception(&Exception::new(text)),
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct NoopSink;

impl Sink for NoopSink {

    #[inline(always)]
    fn log(&mut self, _text: &str) {}

    #[inline(always)]
    fn warn(&mut self, _text: &str) {}

    #[inline(always)]
    fn error(&mut self, _text: &str) {}

    #[inline(always)]
    fn assert_fail(&mut self, _text: &str) {}

    #[inline(always)]
    fn exception(&mut self, _err: &Exception) {}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Record {
    pub kind: SinkKind,
    pub text: String,
}

/// Sink that records every message in memory.
///
/// Clones share the same record list, so a clone can be installed with
/// [`set_sink`] while the original is kept for inspection.
#[derive(Clone, Default, Debug)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CaptureSink {

    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<Record> {
        core::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, kind: SinkKind, text: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Record { kind, text: text.to_owned() });
    }
}

impl Sink for CaptureSink {

    fn log(&mut self, text: &str) {
        self.push(SinkKind::Log, text)
    }

    fn warn(&mut self, text: &str) {
        self.push(SinkKind::Warning, text)
    }

    fn error(&mut self, text: &str) {
        self.push(SinkKind::Error, text)
    }

    fn assert_fail(&mut self, text: &str) {
        self.push(SinkKind::Assert, text)
    }

    fn exception(&mut self, err: &Exception) {
        self.push(SinkKind::Exception, err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sink_kinds_follow_declaration_order() {
        for (i, kind) in SinkKind::ALL.into_iter().enumerate() {
            assert_eq!(SinkKind::try_from(i as i32), Ok(kind));
            assert_eq!(kind as i32, i as i32);
        }
        assert_eq!(SinkKind::try_from(5), Err(LogError::InvalidSinkType(5)));
        assert_eq!(SinkKind::try_from(-3), Err(LogError::InvalidSinkType(-3)));
    }

    #[test]
    fn dispatch_reaches_matching_channel() {
        let mut sink = CaptureSink::new();
        for kind in SinkKind::ALL {
            dispatch(&mut sink, kind, kind.tag());
        }
        let kinds: Vec<_> = sink.records().into_iter().map(|r| r.kind).collect();
        assert_eq!(kinds, SinkKind::ALL);
    }

    #[test]
    fn exception_carries_message_text() {
        let err = Exception::new("<color=#0000FF>boom</color>");
        assert_eq!(err.to_string(), "<color=#0000FF>boom</color>");
        assert!(core::error::Error::source(&err).is_none());
    }

    struct ErrorOnly(Vec<String>);

    impl Sink for ErrorOnly {
        fn log(&mut self, _text: &str) {}
        fn warn(&mut self, _text: &str) {}
        fn error(&mut self, text: &str) {
            self.0.push(text.to_owned())
        }
    }

    #[test]
    fn default_channels_fall_back_to_error() {
        let mut sink = ErrorOnly(Vec::new());
        dispatch(&mut sink, SinkKind::Assert, "a");
        dispatch(&mut sink, SinkKind::Exception, "e");
        assert_eq!(sink.0, ["a", "e"]);
    }

    #[test]
    fn capture_clones_share_records() {
        let sink = CaptureSink::new();
        let mut installed: Box<dyn Sink> = Box::new(sink.clone());
        installed.warn("w");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take(), [Record { kind: SinkKind::Warning, text: "w".into() }]);
        assert!(sink.is_empty());
    }
}
