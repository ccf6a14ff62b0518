//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are compared row by row against the last frame drawn; only rows
//! that changed are re-emitted. A size change or [`TerminalRenderer::invalidate`]
//! forces a full redraw.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, GlyphStyle, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal; safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, re-emitting only the rows that differ from the last frame.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        let same_size = |last: &&mut FrameBuffer| {
            last.width() == fb.width() && last.height() == fb.height()
        };
        if let Some(last) = self.last.as_mut().filter(same_size) {
            encode_rows_into(last, fb, &mut self.buf)?;
            last.clone_from(fb);
        } else {
            encode_full_into(fb, &mut self.buf)?;
            self.last = Some(fb.clone());
        }
        if self.buf.is_empty() {
            return Ok(());
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf).context("write frame")?;
        self.stdout.flush().context("flush frame")?;
        Ok(())
    }
}

/// Rows of `next` that differ from `prev`, top first.
///
/// Every row counts as changed when the sizes differ.
pub fn changed_rows<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = u16> + 'a {
    let resized = prev.width() != next.width() || prev.height() != next.height();
    (0..next.height()).filter(move |&y| resized || prev.row(y) != next.row(y))
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..fb.height() {
        encode_row(fb, y, &mut style, out)?;
    }
    finish(out)
}

/// Encode only the changed rows of `next` into `out`.
///
/// Leaves `out` untouched when nothing changed.
pub fn encode_rows_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut style = None;
    let mut wrote = false;
    for y in changed_rows(prev, next) {
        encode_row(next, y, &mut style, out)?;
        wrote = true;
    }
    if wrote {
        finish(out)?;
    }
    Ok(())
}

fn encode_row(
    fb: &FrameBuffer,
    y: u16,
    current: &mut Option<GlyphStyle>,
    out: &mut Vec<u8>,
) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    for glyph in fb.row(y) {
        if *current != Some(glyph.style) {
            apply_style_into(out, glyph.style)?;
            *current = Some(glyph.style);
        }
        out.queue(Print(glyph.ch))?;
    }
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: GlyphStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_rows_skips_identical_rows() {
        let style = GlyphStyle::default();
        let a = FrameBuffer::new(4, 3);
        let mut b = a.clone();
        b.put_char(2, 1, 'X', style);

        assert_eq!(changed_rows(&a, &b).collect::<Vec<_>>(), vec![1]);
        assert_eq!(changed_rows(&a, &a).count(), 0);
    }

    #[test]
    fn test_changed_rows_all_on_resize() {
        let a = FrameBuffer::new(4, 3);
        let b = FrameBuffer::new(5, 2);
        assert_eq!(changed_rows(&a, &b).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_unchanged_frame_encodes_nothing() {
        let fb = FrameBuffer::new(6, 2);
        let mut out = Vec::new();
        encode_rows_into(&fb, &fb, &mut out).unwrap();
        assert!(out.is_empty());

        encode_full_into(&fb, &mut out).unwrap();
        assert!(!out.is_empty());
    }
}
