use compact_str::CompactString;

use super::*;

/// Owned, ordered list of message fragments.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct Composite {
    parts: Vec<CompactString>,
}

impl Composite {

    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn with_part(mut self, part: impl AsRef<str>) -> Self {
        self.push(part);
        self
    }

    #[inline(always)]
    pub fn push(&mut self, part: impl AsRef<str>) -> &mut Self {
        self.parts.push(CompactString::new(part));
        self
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.parts.clear();
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(CompactString::as_str)
    }
}

impl<'a> IntoIterator for &'a Composite {

    type Item = &'a CompactString;
    type IntoIter = core::slice::Iter<'a, CompactString>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Composite {

    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().map(CompactString::new).collect(),
        }
    }
}

impl<S: AsRef<str>> Extend<S> for Composite {

    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.parts.extend(iter.into_iter().map(CompactString::new));
    }
}

/// Message body handed to the formatter.
///
/// Fragment lists are joined without a separator unless
/// [`Style::separate_lines`] is set.
#[derive(Clone, Copy, Debug)]
pub enum Message<'a> {
    Text(&'a str),
    Parts(&'a [&'a str]),
    Composite(&'a Composite),
}

impl<'a> From<&'a str> for Message<'a> {

    #[inline(always)]
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Message<'a> {

    #[inline(always)]
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a, 'b: 'a> From<&'a [&'b str]> for Message<'a> {

    #[inline(always)]
    fn from(value: &'a [&'b str]) -> Self {
        Self::Parts(value)
    }
}

impl<'a, 'b: 'a, const N: usize> From<&'a [&'b str; N]> for Message<'a> {

    #[inline(always)]
    fn from(value: &'a [&'b str; N]) -> Self {
        Self::Parts(value)
    }
}

impl<'a> From<&'a Composite> for Message<'a> {

    #[inline(always)]
    fn from(value: &'a Composite) -> Self {
        Self::Composite(value)
    }
}

/// Decoration applied around a message.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    /// Newline after every fragment, plus one after the closing markup.
    pub separate_lines: bool,
}

impl Style {

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            color: Color::White,
            bold: false,
            italic: false,
            separate_lines: false,
        }
    }

    #[inline(always)]
    pub const fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::new()
        }
    }

    #[inline(always)]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Overrides the color with a raw palette index.
    ///
    /// # Errors
    /// [`LogError::InvalidColorIndex`] when `index` is outside the palette.
    #[inline(always)]
    pub fn color_index(self, index: i32) -> Result<Self> {
        Ok(self.color(Color::from_index(index)?))
    }

    #[inline(always)]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[inline(always)]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[inline(always)]
    pub const fn separate_lines(mut self) -> Self {
        self.separate_lines = true;
        self
    }
}

fn push_parts<'a>(buf: &mut String, parts: impl Iterator<Item = &'a str>, separate_lines: bool) {
    for part in parts {
        buf.push_str(part);
        if separate_lines {
            buf.push('\n');
        }
    }
}

/// Writes the decorated message into `buf`, replacing its previous contents.
///
/// Spans open as color, bold, italic and close in reverse. A white color
/// emits no color span at all.
pub fn format_into(buf: &mut String, message: Message<'_>, style: Style) {
    buf.clear();
    let colored = style.color != Color::White;
    if colored {
        buf.push_str("<color=#");
        buf.push_str(style.color.hex());
        buf.push('>');
    }
    if style.bold {
        buf.push_str("<b>");
    }
    if style.italic {
        buf.push_str("<i>");
    }
    match message {
        Message::Text(text) => buf.push_str(text),
        Message::Parts(parts) => push_parts(buf, parts.iter().copied(), style.separate_lines),
        Message::Composite(composite) => push_parts(buf, composite.iter(), style.separate_lines),
    }
    if style.italic {
        buf.push_str("</i>");
    }
    if style.bold {
        buf.push_str("</b>");
    }
    if colored {
        buf.push_str("</color>");
    }
    if style.separate_lines {
        buf.push('\n');
    }
}

#[inline(always)]
pub fn format<'a>(message: impl Into<Message<'a>>, style: Style) -> String {
    let mut buf = String::new();
    format_into(&mut buf, message.into(), style);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_plain_text_is_untouched() {
        assert_eq!(format("hello", Style::new()), "hello");
    }

    #[test]
    fn white_never_emits_color_span() {
        assert_eq!(format("x", Style::new().bold()), "<b>x</b>");
    }

    #[test]
    fn spans_nest_color_bold_italic() {
        let style = Style::with_color(Color::Red).bold().italic();
        assert_eq!(format("x", style), "<color=#FF0000><b><i>x</i></b></color>");
        assert_eq!(format("x", Style::with_color(Color::Red).italic()), "<color=#FF0000><i>x</i></color>");
        assert_eq!(format("x", Style::new().bold().italic()), "<b><i>x</i></b>");
    }

    #[test]
    fn colored_single_message() {
        let style = Style::with_color(Color::Green);
        assert_eq!(format("Build ok", style), "<color=#00FF00>Build ok</color>");
    }

    #[test]
    fn parts_join_without_separator() {
        assert_eq!(format(&["a", "b"], Style::new()), "ab");
    }

    #[test]
    fn separated_parts_get_trailing_newline_after_markup() {
        assert_eq!(format(&["a", "b"], Style::new().separate_lines()), "a\nb\n\n");
        let style = Style::with_color(Color::Yellow).bold().separate_lines();
        assert_eq!(
            format(&["step1", "step2"], style),
            "<color=#FFFF00><b>step1\nstep2\n</b></color>\n",
        );
    }

    #[test]
    fn empty_parts_produce_empty_body() {
        let empty: &[&str] = &[];
        assert_eq!(format(empty, Style::new()), "");
        assert_eq!(format(empty, Style::with_color(Color::Blue)), "<color=#0000FF></color>");
    }

    #[test]
    fn composite_formats_like_parts() {
        let composite: Composite = ["one", "two"].into_iter().collect();
        let style = Style::with_color(Color::Cyan).separate_lines();
        assert_eq!(format(&composite, style), format(&["one", "two"], style));
        assert_eq!(composite.len(), 2);
    }

    #[test]
    fn composite_builder_and_clear() {
        let mut composite = Composite::new().with_part("a").with_part(String::from("b"));
        assert_eq!(format(&composite, Style::new()), "ab");
        composite.clear();
        assert!(composite.is_empty());
        composite.extend(["c"]);
        assert_eq!(composite.iter().collect::<Vec<_>>(), ["c"]);
    }

    #[test]
    fn format_into_clears_previous_contents() {
        let mut buf = String::from("stale");
        format_into(&mut buf, Message::Text("fresh"), Style::new());
        assert_eq!(buf, "fresh");
    }

    #[test]
    fn color_index_resolves_or_fails() {
        assert_eq!(Style::new().color_index(2).map(|s| s.color), Ok(Color::Red));
        assert_eq!(
            Style::new().color_index(99),
            Err(LogError::InvalidColorIndex(ColorError::IndexOutOfRange(99))),
        );
    }
}
