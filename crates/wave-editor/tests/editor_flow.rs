//! End-to-end editing sessions driven through the command surface.

use wave_config::Config;
use wave_core::{Candle, Point, Selection, WaveKind, WaveLabel};
use wave_editor::{ChartContext, Command, CoordinateTransform, Editor, EditorError, LinearTransform, Mode, Outcome, ScreenPos};
use wave_rules::{RuleId, Severity};

// Pixel x == time, pixel y == 500 - price
fn transform() -> LinearTransform {
    LinearTransform::new(1000.0, 500.0, (0.0, 1000.0), (0.0, 500.0))
}

fn unsnapped_editor() -> Editor {
    let mut config = Config::default();
    config.snap.enabled = false;
    Editor::new(&config)
}

fn screen(t: f64, p: f64) -> ScreenPos {
    ScreenPos::new(t, 500.0 - p)
}

fn click_wave(editor: &mut Editor, ctx: &ChartContext<'_>, mode: Mode, points: &[(f64, f64)]) -> Outcome {
    editor.execute(Command::SetMode(mode), ctx).unwrap();
    let mut outcome = Outcome::Ignored;
    for &(t, p) in points {
        outcome = editor.execute(Command::Press(screen(t, p)), ctx).unwrap();
        editor.execute(Command::Release, ctx).unwrap();
    }
    outcome
}

const IMPULSE: [(f64, f64); 5] = [(100.0, 100.0), (200.0, 150.0), (300.0, 120.0), (400.0, 200.0), (500.0, 170.0)];
const CORRECTION: [(f64, f64); 3] = [(600.0, 200.0), (700.0, 150.0), (800.0, 180.0)];

#[test]
fn test_draw_impulse_by_clicking() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    let outcome = click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    assert!(matches!(outcome, Outcome::WaveCommitted(_)));
    assert_eq!(editor.mode(), Mode::Select);

    let wave = &editor.waves()[0];
    assert_eq!(wave.kind, WaveKind::Impulse);
    assert_eq!(
        wave.labels,
        vec![WaveLabel::One, WaveLabel::Two, WaveLabel::Three, WaveLabel::Four, WaveLabel::Five]
    );
    for (point, &(t, p)) in wave.points.iter().zip(IMPULSE.iter()) {
        assert!((point.t - t).abs() < 1e-9);
        assert!((point.p - p).abs() < 1e-9);
    }
    assert_eq!(editor.selected_wave_id(), Some(&wave.id));
}

#[test]
fn test_undo_redo_restores_exact_collection() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    let after_first = editor.waves().to_vec();
    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let after_second = editor.waves().to_vec();

    editor.execute(Command::Undo, &ctx).unwrap();
    assert_eq!(editor.waves(), after_first.as_slice());

    editor.execute(Command::Redo, &ctx).unwrap();
    assert_eq!(editor.waves(), after_second.as_slice());

    editor.execute(Command::Undo, &ctx).unwrap();
    editor.execute(Command::Undo, &ctx).unwrap();
    assert!(editor.waves().is_empty());
    assert!(editor.selection().is_none());
    assert!(matches!(
        editor.execute(Command::Undo, &ctx),
        Err(EditorError::EmptyHistory(_))
    ));
}

#[test]
fn test_new_edit_clears_redo() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    editor.execute(Command::Undo, &ctx).unwrap();
    assert!(editor.history().can_redo());

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    assert!(!editor.history().can_redo());
}

#[test]
fn test_delete_keeps_other_waves() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &[(100.0, 400.0), (200.0, 350.0), (300.0, 380.0)]);
    let before = editor.waves().to_vec();

    // Select the middle wave by clicking its B point
    editor.execute(Command::Press(screen(700.0, 150.0)), &ctx).unwrap();
    editor.execute(Command::Release, &ctx).unwrap();
    assert_eq!(editor.selected_wave_id(), Some(&before[1].id));

    editor.execute(Command::DeleteSelected, &ctx).unwrap();
    assert!(editor.selected_wave_id().is_none());
    assert_eq!(editor.waves(), &[before[0].clone(), before[2].clone()]);
}

#[test]
fn test_delete_mode_click() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    editor.execute(Command::SetMode(Mode::Delete), &ctx).unwrap();

    // Empty space keeps delete mode armed
    let outcome = editor.execute(Command::Press(screen(50.0, 50.0)), &ctx).unwrap();
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(editor.mode(), Mode::Delete);

    // Middle of segment A-B
    let outcome = editor.execute(Command::Press(screen(650.0, 175.0)), &ctx).unwrap();
    assert_eq!(outcome, Outcome::Committed);
    assert!(editor.waves().is_empty());
    assert_eq!(editor.mode(), Mode::Select);
}

#[test]
fn test_import_rejects_and_keeps_state() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    let before = editor.waves().to_vec();

    for payload in ["not json", "{}", r#"{"waves": 3}"#, "[1, 2]"] {
        let result = editor.execute(Command::ImportSnapshot(payload.to_string()), &ctx);
        assert!(matches!(result, Err(EditorError::Schema(_))), "payload {payload}");
        assert_eq!(editor.waves(), before.as_slice());
    }
    assert!(matches!(
        editor.import_waves(r#"{"waves": []}"#),
        Err(EditorError::Schema(_))
    ));
    assert!(editor.history().can_undo());
}

#[test]
fn test_export_import_roundtrip() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let json = editor.export_snapshot().unwrap();

    let mut other = unsnapped_editor();
    other.import_snapshot(&json).unwrap();
    assert_eq!(other.waves(), editor.waves());
    assert_eq!(other.selected_wave_id(), editor.selected_wave_id());
    assert!(!other.history().can_undo());

    let collection = editor.export_waves().unwrap();
    let mut third = unsnapped_editor();
    third.import_waves(&collection).unwrap();
    assert_eq!(third.waves(), editor.waves());
    assert!(third.selection().is_none());
}

#[test]
fn test_point_drag_via_pointer() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let history_before = editor.history().undo_len();

    // Grab point B, a few pixels off
    editor.execute(Command::Press(screen(703.0, 148.0)), &ctx).unwrap();
    assert_eq!(editor.active_handle().map(|h| h.point_index), Some(1));
    for step in 1..=5 {
        let p = 150.0 - step as f64 * 5.0;
        editor.execute(Command::DragTo(screen(700.0, p)), &ctx).unwrap();
    }
    assert_eq!(editor.history().undo_len(), history_before);

    let outcome = editor.execute(Command::Release, &ctx).unwrap();
    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(editor.history().undo_len(), history_before + 1);
    assert!(editor.active_handle().is_none());

    let moved = editor.waves()[0].points[1];
    assert!((moved.p - 125.0).abs() < 1e-9);
}

#[test]
fn test_segment_drag_translates_endpoints() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let original = editor.waves()[0].points.clone();

    editor.execute(Command::Press(screen(650.0, 175.0)), &ctx).unwrap();
    assert!(matches!(editor.selection(), Selection::Segment { a: 0, b: 1, .. }));
    editor.execute(Command::DragTo(screen(660.0, 185.0)), &ctx).unwrap();
    editor.execute(Command::DragTo(screen(670.0, 195.0)), &ctx).unwrap();
    editor.execute(Command::Release, &ctx).unwrap();

    let points = &editor.waves()[0].points;
    for i in 0..2 {
        assert!((points[i].t - (original[i].t + 20.0)).abs() < 1e-9);
        assert!((points[i].p - (original[i].p + 20.0)).abs() < 1e-9);
    }
    assert_eq!(points[2], original[2]);

    editor.execute(Command::Undo, &ctx).unwrap();
    assert_eq!(editor.waves()[0].points, original);
}

#[test]
fn test_empty_click_clears_selection_only() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    assert!(editor.selected_wave_id().is_some());

    editor.execute(Command::Press(screen(50.0, 450.0)), &ctx).unwrap();
    assert!(editor.selection().is_none());
    assert_eq!(editor.waves().len(), 1);
}

#[test]
fn test_double_click_inserts_point() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let outcome = editor
        .execute(Command::DoubleClick(screen(750.0, 165.0)), &ctx)
        .unwrap();
    assert_eq!(outcome, Outcome::Committed);

    let wave = &editor.waves()[0];
    assert_eq!(wave.points.len(), 4);
    assert!((wave.points[2].t - 750.0).abs() < 1e-9);
    assert!((wave.points[2].p - 165.0).abs() < 1e-9);
    assert!(matches!(editor.selection(), Selection::Point { index: 2, .. }));
}

#[test]
fn test_hit_test_reflexive_for_committed_points() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    let wave = editor.waves()[0].clone();
    for (index, point) in wave.points.iter().enumerate() {
        let pos = transform.point_to_screen(*point).unwrap();
        let hit = editor.hit_tester().hit_point(pos, editor.waves(), &transform).unwrap();
        assert_eq!(hit.wave_id, wave.id);
        assert_eq!(hit.index, index);
    }
}

#[test]
fn test_magnet_snap_while_drawing() {
    let transform = transform();
    let candles = vec![
        Candle::new(100.0, 100.0, 110.0, 95.0, 105.0, 0.0),
        Candle::new(200.0, 105.0, 130.0, 100.0, 120.0, 0.0),
    ];
    let ctx = ChartContext::new(&transform, &candles);
    let mut editor = Editor::new(&Config::default());

    editor.execute(Command::SetMode(Mode::DrawImpulse), &ctx).unwrap();
    editor.execute(Command::Press(screen(195.0, 127.0)), &ctx).unwrap();
    let wave = editor.active_wave().unwrap();
    assert_eq!(wave.points[0], Point::new(200.0, 130.0));
}

#[test]
fn test_validation_of_selected_wave() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE);
    let results = editor.validate_focused();
    let r1 = results.iter().find(|r| r.id == RuleId::R1).unwrap();
    assert!(r1.ok);
    assert!(results.iter().all(|r| r.ok || r.severity != Severity::Error));

    // A correction drawn in one direction violates R5
    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &[(600.0, 200.0), (700.0, 150.0), (800.0, 100.0)]);
    let results = editor.validate_focused();
    let r5 = results.iter().find(|r| r.id == RuleId::R5).unwrap();
    assert!(!r5.ok);
    assert_eq!(r5.severity, Severity::Warn);
}

#[test]
fn test_duplicate_and_undo() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawCorrection, &CORRECTION);
    let before = editor.waves().to_vec();

    editor.execute(Command::DuplicateSelected, &ctx).unwrap();
    assert_eq!(editor.waves().len(), 2);
    assert_eq!(editor.selected_wave_id(), Some(&editor.waves()[1].id));

    editor.execute(Command::Undo, &ctx).unwrap();
    assert_eq!(editor.waves(), before.as_slice());
    assert_eq!(editor.selected_wave_id(), Some(&before[0].id));
}

#[test]
fn test_escape_while_drawing() {
    let transform = transform();
    let ctx = ChartContext::without_candles(&transform);
    let mut editor = unsnapped_editor();

    click_wave(&mut editor, &ctx, Mode::DrawImpulse, &IMPULSE[..3]);
    assert_eq!(editor.active_wave().map(|w| w.points.len()), Some(3));

    editor.execute(Command::Cancel, &ctx).unwrap();
    assert!(editor.active_wave().is_none());
    assert!(editor.waves().is_empty());
    assert!(!editor.history().can_undo());
}
