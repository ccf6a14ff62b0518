//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The whole background is drawn with y up: background row `y` lands on
//! screen row `BACKGROUND_HEIGHT - 1 - y` inside the frame. The field
//! rectangle is tinted, with its open edge in a brighter tint.

use crate::core::{get_shape, GameSnapshot, Rect};
use crate::fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};
use crate::types::{Cell, Edge, PieceKind, BACKGROUND_HEIGHT, BACKGROUND_WIDTH};

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const BACKGROUND_BG: Rgb = Rgb::new(22, 22, 30);
const FIELD_BG: Rgb = Rgb::new(36, 40, 58);
const OPEN_EDGE_BG: Rgb = Rgb::new(54, 70, 96);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Renders the background, the field and a side panel.
pub struct GameView {
    /// Background cell width in terminal columns.
    cell_w: u16,
    /// Background cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2, cell_h: 1 }
    }
}

/// Top-left of the frame and the size of the play area.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Frame size in terminal cells, border included.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            BACKGROUND_WIDTH as u16 * self.cell_w + 2,
            BACKGROUND_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::new(' ', GlyphStyle::default()));

        let layout = self.layout(viewport);
        let border = GlyphStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        fb.draw_box(layout.x, layout.y, layout.frame_w, layout.frame_h, border);

        for y in 0..BACKGROUND_HEIGHT as i32 {
            for x in 0..BACKGROUND_WIDTH as i32 {
                let bg = cell_background(&snap.field_rect, snap.rotation.open_edge(), x, y);
                let (ch, style) = match Cell::from_u8(snap.background_code(x, y)) {
                    Some(Cell::Soft) => ('█', GlyphStyle::new(Rgb::new(90, 200, 200), bg)),
                    Some(Cell::Locked) => ('▓', GlyphStyle::new(Rgb::new(150, 150, 160), bg)),
                    Some(Cell::Bomb) => ('●', GlyphStyle::new(Rgb::new(240, 70, 60), bg).bold()),
                    _ => (' ', GlyphStyle::new(Rgb::new(80, 80, 90), bg)),
                };
                self.fill_cell(fb, layout, x, y, ch, style);
            }
        }

        if let Some(active) = snap.active {
            let (ch, fg) = piece_glyph(active.kind);
            for &(dx, dy) in get_shape(active.kind).cells {
                let x = active.x + dx as i32;
                let y = active.y + dy as i32;
                let bg = cell_background(&snap.field_rect, snap.rotation.open_edge(), x, y);
                self.fill_cell(fb, layout, x, y, ch, GlyphStyle::new(fg, bg).bold());
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        if snap.game_over {
            self.draw_overlay_text(fb, layout, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, layout, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Screen position of background cell (x, y), if it is on the board.
    pub fn cell_origin(&self, viewport: Viewport, x: i32, y: i32) -> Option<(u16, u16)> {
        self.origin(self.layout(viewport), x, y)
    }

    /// Frame centered in the viewport.
    fn layout(&self, viewport: Viewport) -> Layout {
        let (frame_w, frame_h) = self.frame_size();
        Layout {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    fn origin(&self, layout: Layout, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= BACKGROUND_WIDTH as i32 || y >= BACKGROUND_HEIGHT as i32 {
            return None;
        }
        let row = (BACKGROUND_HEIGHT as i32 - 1 - y) as u16;
        Some((
            layout.x + 1 + x as u16 * self.cell_w,
            layout.y + 1 + row * self.cell_h,
        ))
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, layout: Layout, x: i32, y: i32, ch: char, style: GlyphStyle) {
        if let Some((px, py)) = self.origin(layout, x, y) {
            fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, layout: Layout) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = GlyphStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = GlyphStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = layout.y;
        let mut entry = |fb: &mut FrameBuffer, name: &str| {
            fb.put_str(panel_x, y, name, label);
            let row = y.saturating_add(1);
            y = y.saturating_add(3);
            row
        };

        let row = entry(fb, "SCORE");
        fb.put_u32(panel_x, row, snap.score, value);

        let row = entry(fb, "LEVEL");
        fb.put_u32(panel_x, row, snap.level, value);

        let row = entry(fb, "COMBO");
        fb.put_u32(panel_x, row, snap.teleport_value, value);

        let row = entry(fb, "BOMBS");
        let end = fb.put_u32(panel_x, row, snap.bomb.inventory, value);
        if snap.bomb.armed {
            fb.put_str(end + 1, row, "ARMED", value.bold());
        }

        let row = entry(fb, "NEXT");
        let (_, fg) = piece_glyph(snap.next);
        fb.put_str(panel_x, row, piece_label(snap.next), GlyphStyle::new(fg, SCREEN_BG).bold());

        let row = entry(fb, "FIELD");
        let end = fb.put_u32(panel_x, row, snap.rotation.degrees() as u32, value);
        fb.put_char(end, row, '°', value);
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: Layout, text: &str) {
        let mid_y = layout.y.saturating_add(layout.frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = layout.x.saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
        let style = GlyphStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Tint for background cell (x, y) given the field rectangle.
fn cell_background(rect: &Rect, open: Edge, x: i32, y: i32) -> Rgb {
    if !rect.contains(x, y) {
        return BACKGROUND_BG;
    }
    let on_open_edge = match open {
        Edge::Top => y == rect.y2 - 1,
        Edge::Bottom => y == rect.y1,
        Edge::Left => x == rect.x1,
        Edge::Right => x == rect.x2 - 1,
    };
    if on_open_edge {
        OPEN_EDGE_BG
    } else {
        FIELD_BG
    }
}

fn piece_glyph(kind: PieceKind) -> (char, Rgb) {
    match kind {
        PieceKind::T => ('█', Rgb::new(200, 120, 220)),
        PieceKind::L => ('█', Rgb::new(255, 165, 0)),
        PieceKind::LMirror => ('█', Rgb::new(80, 120, 220)),
        PieceKind::I => ('█', Rgb::new(80, 220, 220)),
        PieceKind::S => ('█', Rgb::new(240, 220, 80)),
        PieceKind::Z => ('█', Rgb::new(220, 80, 80)),
        PieceKind::ZMirror => ('█', Rgb::new(100, 220, 120)),
        PieceKind::Bomb => ('●', Rgb::new(240, 70, 60)),
    }
}

fn piece_label(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::T => "T",
        PieceKind::L => "L",
        PieceKind::LMirror => "L'",
        PieceKind::I => "I",
        PieceKind::S => "S",
        PieceKind::Z => "Z",
        PieceKind::ZMirror => "Z'",
        PieceKind::Bomb => "BOMB",
    }
}
