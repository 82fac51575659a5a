use std::io::{self, Write};

use core::str::FromStr;

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::*;

pub const COLOR_ENV: &str = "TINT_COLOR";
pub const MARKUP_ENV: &str = "TINT_MARKUP";

/// How [`ConsoleSink`] treats `<color>`, `<b>` and `<i>` markup.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarkupMode {
    /// Translate markup into terminal styles.
    #[default]
    Render,
    /// Write the text untouched.
    Raw,
    /// Drop recognized tags.
    Strip,
}

impl FromStr for MarkupMode {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("render") {
            Ok(Self::Render)
        } else if s.eq_ignore_ascii_case("raw") {
            Ok(Self::Raw)
        } else if s.eq_ignore_ascii_case("strip") {
            Ok(Self::Strip)
        } else {
            Err(())
        }
    }
}

pub fn parse_color_choice(s: &str) -> Option<ColorChoice> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("always") {
        Some(ColorChoice::Always)
    } else if s.eq_ignore_ascii_case("ansi") {
        Some(ColorChoice::AlwaysAnsi)
    } else if s.eq_ignore_ascii_case("never") {
        Some(ColorChoice::Never)
    } else if s.eq_ignore_ascii_case("auto") {
        Some(ColorChoice::Auto)
    } else {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Tag {
    Color([u8; 3]),
    EndColor,
    Bold,
    EndBold,
    Italic,
    EndItalic,
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    // RRGGBB or RRGGBBAA, alpha ignored
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Parses the tag at the start of `s`, returning it and its byte length.
fn parse_tag(s: &str) -> Option<(Tag, usize)> {
    let end = s.find('>')?;
    let inner = s.get(1..end)?;
    let tag = match inner {
        "b" => Tag::Bold,
        "/b" => Tag::EndBold,
        "i" => Tag::Italic,
        "/i" => Tag::EndItalic,
        "/color" => Tag::EndColor,
        _ => {
            let value = inner.strip_prefix("color=")?;
            let rgb = match value.strip_prefix('#') {
                Some(hex) => parse_hex(hex)?,
                None => value.parse::<Color>().ok()?.rgb(),
            };
            Tag::Color(rgb)
        },
    };
    Some((tag, end + 1))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Token<'a> {
    Text(&'a str),
    Tag(Tag),
}

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {

    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None
        }
        let end = if self.rest.starts_with('<') {
            if let Some((tag, len)) = parse_tag(self.rest) {
                self.rest = &self.rest[len..];
                return Some(Token::Tag(tag))
            }
            // stray '<' is text
            self.rest[1..].find('<').map_or(self.rest.len(), |i| i + 1)
        } else {
            self.rest.find('<').unwrap_or(self.rest.len())
        };
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token::Text(text))
    }
}

#[inline(always)]
fn tokens(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

/// Removes recognized markup tags, keeping everything else.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokens(text) {
        if let Token::Text(text) = token {
            out.push_str(text);
        }
    }
    out
}

#[derive(Default)]
struct RenderState {
    colors: Vec<[u8; 3]>,
    bold: usize,
    italic: usize,
}

impl RenderState {

    fn apply(&mut self, tag: Tag) {
        match tag {
            Tag::Color(rgb) => self.colors.push(rgb),
            Tag::EndColor => { self.colors.pop(); },
            Tag::Bold => self.bold += 1,
            Tag::EndBold => self.bold = self.bold.saturating_sub(1),
            Tag::Italic => self.italic += 1,
            Tag::EndItalic => self.italic = self.italic.saturating_sub(1),
        }
    }

    fn is_plain(&self) -> bool {
        self.colors.is_empty() && self.bold == 0 && self.italic == 0
    }

    fn spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        spec
            .set_fg(self.colors.last().map(|&[r, g, b]| termcolor::Color::Rgb(r, g, b)))
            .set_bold(self.bold > 0)
            .set_italic(self.italic > 0);
        spec
    }
}

/// Writes `text` to `out`, translating markup into [`ColorSpec`]s.
///
/// Closing a span restores the style of the enclosing one.
pub fn render_markup(out: &mut impl WriteColor, text: &str) -> io::Result<()> {
    let mut state = RenderState::default();
    let mut styled = false;
    for token in tokens(text) {
        match token {
            Token::Text(text) => out.write_all(text.as_bytes())?,
            Token::Tag(tag) => {
                state.apply(tag);
                if state.is_plain() {
                    if styled {
                        out.reset()?;
                        styled = false;
                    }
                } else {
                    out.set_color(&state.spec())?;
                    styled = true;
                }
            },
        }
    }
    if styled {
        out.reset()?;
    }
    Ok(())
}

fn tag_color(kind: SinkKind) -> termcolor::Color {
    match kind {
        SinkKind::Log => termcolor::Color::White,
        SinkKind::Warning => termcolor::Color::Yellow,
        SinkKind::Error => termcolor::Color::Red,
        SinkKind::Assert => termcolor::Color::Magenta,
        SinkKind::Exception => termcolor::Color::Blue,
    }
}

/// Writes one channel-tagged line per message.
pub(crate) fn write_line(
    out: &mut impl WriteColor,
    markup: MarkupMode,
    kind: SinkKind,
    text: &str,
) -> io::Result<()>
{
    out.set_color(ColorSpec::new().set_fg(Some(tag_color(kind))).set_bold(true))?;
    write!(out, "[{}]", kind.tag())?;
    out.reset()?;
    out.write_all(b" ")?;
    match markup {
        MarkupMode::Render => render_markup(out, text)?,
        MarkupMode::Raw => out.write_all(text.as_bytes())?,
        MarkupMode::Strip => out.write_all(strip_markup(text).as_bytes())?,
    }
    out.write_all(b"\n")?;
    out.flush()
}

/// Terminal sink writing to stderr.
pub struct ConsoleSink {
    stderr: StandardStream,
    markup: MarkupMode,
}

impl ConsoleSink {

    #[inline(always)]
    pub fn new(choice: ColorChoice, markup: MarkupMode) -> Self {
        Self {
            stderr: StandardStream::stderr(choice),
            markup,
        }
    }

    /// Reads [`COLOR_ENV`] and [`MARKUP_ENV`]; unset or invalid values fall
    /// back to `auto` and [`MarkupMode::Render`].
    pub fn from_env() -> Self {
        let choice = std::env::var(COLOR_ENV)
            .ok()
            .and_then(|value| parse_color_choice(&value))
            .unwrap_or(ColorChoice::Auto);
        let markup = std::env::var(MARKUP_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self::new(choice, markup)
    }

    #[inline(always)]
    pub fn markup(&self) -> MarkupMode {
        self.markup
    }

    #[inline(always)]
    fn write(&mut self, kind: SinkKind, text: &str) {
        let _ = write_line(&mut self.stderr, self.markup, kind, text);
    }
}

impl Default for ConsoleSink {

    fn default() -> Self {
        Self::from_env()
    }
}

impl Sink for ConsoleSink {

    fn log(&mut self, text: &str) {
        self.write(SinkKind::Log, text)
    }

    fn warn(&mut self, text: &str) {
        self.write(SinkKind::Warning, text)
    }

    fn error(&mut self, text: &str) {
        self.write(SinkKind::Error, text)
    }

    fn assert_fail(&mut self, text: &str) {
        self.write(SinkKind::Assert, text)
    }

    fn exception(&mut self, err: &Exception) {
        self.write(SinkKind::Exception, err.message())
    }
}
