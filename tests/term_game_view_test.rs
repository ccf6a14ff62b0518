use tui_spinfield::core::{get_shape, GameConfig, GameState};
use tui_spinfield::term::{GameView, Viewport};
use tui_spinfield::types::Cell;

fn fresh_snapshot() -> tui_spinfield::core::GameSnapshot {
    GameState::new(GameConfig::default()).snapshot()
}

#[test]
fn test_view_renders_border_corners() {
    let view = GameView::default();
    // 40 cells * 2 columns + border, 30 rows + border.
    assert_eq!(view.frame_size(), (82, 32));

    let fb = view.render(&fresh_snapshot(), Viewport::new(82, 32));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(81, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 31).unwrap().ch, '└');
    assert_eq!(fb.get(81, 31).unwrap().ch, '┘');
}

#[test]
fn test_view_draws_background_row_zero_at_bottom() {
    let mut snap = fresh_snapshot();
    snap.background[0][0] = Cell::Locked.as_u8();

    let view = GameView::default();
    let vp = Viewport::new(82, 32);
    assert_eq!(view.cell_origin(vp, 0, 0), Some((1, 30)));
    assert_eq!(view.cell_origin(vp, 39, 29), Some((79, 1)));
    assert_eq!(view.cell_origin(vp, 40, 0), None);

    let fb = view.render(&snap, vp);
    assert_eq!(fb.get(1, 30).unwrap().ch, '▓');
    assert_eq!(fb.get(2, 30).unwrap().ch, '▓');
    assert_eq!(fb.get(3, 30).unwrap().ch, ' ');
}

#[test]
fn test_view_tints_field_and_open_edge() {
    let view = GameView::default();
    let vp = Viewport::new(82, 32);
    let fb = view.render(&fresh_snapshot(), vp);

    let bg_at = |x, y| {
        let (px, py) = view.cell_origin(vp, x, y).unwrap();
        fb.get(px, py).unwrap().style.bg
    };
    let outside = bg_at(0, 0);
    let inside = bg_at(20, 12);
    let open_edge = bg_at(20, 19);
    assert_ne!(outside, inside);
    assert_ne!(inside, open_edge);
    assert_eq!(bg_at(10, 10), inside);
}

#[test]
fn test_view_draws_active_piece() {
    let mut state = GameState::new(GameConfig::default());
    state.start();
    let snap = state.snapshot();
    let active = snap.active.unwrap();

    let view = GameView::default();
    let vp = Viewport::new(82, 32);
    let fb = view.render(&snap, vp);
    for &(dx, dy) in get_shape(active.kind).cells {
        let (px, py) = view
            .cell_origin(vp, active.x + dx as i32, active.y + dy as i32)
            .unwrap();
        assert_eq!(fb.get(px, py).unwrap().ch, '█');
    }
}

#[test]
fn test_view_draws_side_panel_when_wide_enough() {
    let mut snap = fresh_snapshot();
    snap.score = 1234;
    snap.teleport_value = 37;
    snap.bomb.inventory = 2;
    snap.bomb.armed = true;

    let view = GameView::default();
    let text = view.render(&snap, Viewport::new(110, 32)).to_text();
    for label in ["SCORE", "1234", "LEVEL", "COMBO", "37", "BOMBS", "ARMED", "NEXT"] {
        assert!(text.contains(label), "missing {label}");
    }

    let narrow = view.render(&snap, Viewport::new(82, 32)).to_text();
    assert!(!narrow.contains("SCORE"));
}

#[test]
fn test_view_overlays() {
    let view = GameView::default();
    let vp = Viewport::new(82, 32);

    let mut snap = fresh_snapshot();
    snap.paused = true;
    assert!(view.render(&snap, vp).to_text().contains("PAUSED"));

    snap.game_over = true;
    let text = view.render(&snap, vp).to_text();
    assert!(text.contains("GAME OVER"));
    assert!(!text.contains("PAUSED"));
}

#[test]
fn test_view_centers_frame_in_large_viewport() {
    let view = GameView::default();
    let fb = view.render(&fresh_snapshot(), Viewport::new(90, 40));
    // (90 - 82) / 2 = 4, (40 - 32) / 2 = 4
    assert_eq!(fb.get(4, 4).unwrap().ch, '┌');
}
