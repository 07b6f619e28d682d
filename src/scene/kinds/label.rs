//! Label: monospaced text with an optional outline pass.

use std::fmt::Write as _;

use crate::color::Color;
use crate::font::Font;
use crate::render::{HAlign, VAlign};

pub struct LabelState {
    pub font: Font,
    pub halign: HAlign,
    pub valign: VAlign,
    pub text_color: Color,
    pub outline_color: Color,
    text: Vec<u8>,
}

impl LabelState {
    #[must_use]
    pub fn new(font: Font, text_color: Color, outline_color: Color) -> Self {
        Self {
            font,
            halign: HAlign::Left,
            valign: VAlign::Top,
            text_color,
            outline_color,
            text: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Replaces the text entirely. Non-printable bytes (outside
    /// `0x20..=0x7E`) are kept verbatim; the glyph source renders them as a
    /// blank advance.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.extend_from_slice(text.as_bytes());
    }

    pub fn set_text_format(&mut self, args: std::fmt::Arguments<'_>) {
        self.text.clear();
        let mut sink = VecSink(&mut self.text);
        let _ = sink.write_fmt(args);
    }

    pub fn append_text(&mut self, text: &str) {
        self.text.extend_from_slice(text.as_bytes());
    }

    pub fn append_char(&mut self, ch: u8) {
        self.text.push(ch);
    }

    pub fn append_format(&mut self, args: std::fmt::Arguments<'_>) {
        let mut sink = VecSink(&mut self.text);
        let _ = sink.write_fmt(args);
    }

    pub fn insert_text(&mut self, at: usize, text: &str) {
        let at = at.min(self.text.len());
        self.text.splice(at..at, text.bytes());
    }

    pub fn insert_char(&mut self, at: usize, ch: u8) {
        let at = at.min(self.text.len());
        self.text.insert(at, ch);
    }

    pub fn insert_format(&mut self, at: usize, args: std::fmt::Arguments<'_>) {
        let mut tmp = Vec::new();
        let mut sink = VecSink(&mut tmp);
        let _ = sink.write_fmt(args);
        let at = at.min(self.text.len());
        self.text.splice(at..at, tmp);
    }

    /// Removes `range` from the text (clamped to bounds).
    pub fn snip_text(&mut self, range: std::ops::Range<usize>) {
        let start = range.start.min(self.text.len());
        let end = range.end.min(self.text.len()).max(start);
        self.text.drain(start..end);
    }
}

struct VecSink<'a>(&'a mut Vec<u8>);

impl std::fmt::Write for VecSink<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
