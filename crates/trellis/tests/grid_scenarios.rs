//! End-to-end scenarios driving a [`GridView`] the way a host would:
//! input events and commands in, coalesced paint passes out.

use std::sync::Arc;

use trellis::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn grid(cols: usize, rows: usize) -> (GridView, Arc<VecTableModel>) {
    init_tracing();
    let model = Arc::new(VecTableModel::new(cols, rows));
    let mut view = GridView::new(model.clone() as Arc<dyn TableModel>);
    view.set_viewport_size(500, 400);
    let mut painter = RecordingPainter::new();
    view.end_turn(&mut painter);
    (view, model)
}

fn turn(view: &mut GridView) -> RecordingPainter {
    let mut painter = RecordingPainter::new();
    view.end_turn(&mut painter);
    painter
}

#[test]
fn selection_driven_column_resize_with_undo() {
    let (mut view, _model) = grid(6, 8);
    let mut undo = UndoStack::new();

    // Header click selects the full column; only full-extent selections
    // qualify for bulk resize.
    view.handle_mouse_press(PixelPoint::new(20 + 80 + 5, 5), Modifiers::default());
    view.handle_mouse_release();
    let resizable = view.selection().resizable_columns(6, 8);
    assert_eq!(resizable.iter().copied().collect::<Vec<_>>(), vec![1]);

    // Commands address data indices; the axis order maps them.
    let data_indices: Vec<usize> = resizable
        .iter()
        .map(|&pos| view.columns().data_index(pos))
        .collect();
    let mut cmd = Box::new(ResizeSectionsCommand::new(
        &view,
        Orientation::Columns,
        &data_indices,
        140,
    ));
    cmd.redo(&mut view);
    undo.push(cmd);

    assert_eq!(view.columns().index_pixels(ViewPos::Body(1)), 140);
    let painter = turn(&mut view);
    assert_eq!(painter.background_count(), 1);

    assert!(undo.undo(&mut view));
    assert_eq!(view.columns().index_pixels(ViewPos::Body(1)), 80);
    assert!(undo.redo(&mut view));
    assert_eq!(view.columns().index_pixels(ViewPos::Body(1)), 140);
}

#[test]
fn undo_chain_restores_exact_layout() {
    let (mut view, _model) = grid(8, 8);
    let mut undo = UndoStack::new();

    let order_before = view.columns().order().to_vec();
    let total_before = view.columns().total_pixels();

    let mut cmd: Box<dyn GridCommand> = Box::new(ResizeSectionsCommand::new(
        &view,
        Orientation::Columns,
        &[2, 3],
        30,
    ));
    cmd.redo(&mut view);
    undo.push(cmd);

    let mut cmd: Box<dyn GridCommand> =
        Box::new(HideSectionsCommand::new(&view, Orientation::Columns, &[5]).unwrap());
    cmd.redo(&mut view);
    undo.push(cmd);

    let moving = [0usize, 1].into_iter().collect();
    let mut cmd: Box<dyn GridCommand> =
        Box::new(ReorderCommand::new(&view, Orientation::Columns, moving, 3));
    cmd.redo(&mut view);
    undo.push(cmd);
    assert_eq!(&view.columns().order()[..4], &[2, 0, 1, 3]);

    let mut cmd: Box<dyn GridCommand> = Box::new(ZoomCommand::new(&view, 2.0).unwrap());
    cmd.redo(&mut view);
    undo.push(cmd);

    while undo.undo(&mut view) {}

    assert_eq!(view.columns().order(), order_before.as_slice());
    assert_eq!(view.columns().total_pixels(), total_before);
    assert_eq!(view.columns().index_size_override(2), None);
    assert!(!view.columns().is_hidden(5));
    assert_eq!(view.zoom(), 1.0);
}

#[test]
fn hide_selected_columns_refuses_hiding_all() {
    let (mut view, _model) = grid(3, 3);

    // Corner click: everything selected.
    view.handle_mouse_press(PixelPoint::new(5, 5), Modifiers::default());
    assert_eq!(view.selection().selected_columns(3), Selected::All);

    // Hiding the whole selection must be refused up front.
    assert!(HideSectionsCommand::new(&view, Orientation::Columns, &[0, 1, 2]).is_none());
    assert!(view.hide_sections(Orientation::Columns, &[0, 1]));
    assert!(!view.hide_sections(Orientation::Columns, &[2]));
    assert_eq!(view.columns().visible_count(), 1);
}

#[test]
fn one_paint_pass_per_turn_under_event_storm() {
    let (mut view, model) = grid(6, 6);

    // A burst of changes inside one turn: cells, a column, then a reset.
    for row in 0..6 {
        model.set_value(0, row, CellValue::Integer(row as i64));
        view.handle_model_event(ModelEvent::CellChanged(0, row));
    }
    view.handle_model_event(ModelEvent::ColumnChanged(0));
    view.handle_model_event(ModelEvent::Reset);

    let painter = turn(&mut view);
    // One full pass: one background, one overlay, each cell once.
    assert_eq!(painter.background_count(), 1);
    assert_eq!(painter.overlay_count(), 1);
    assert_eq!(painter.cells().len(), 36);

    // Next turn has nothing left.
    let painter = turn(&mut view);
    assert!(painter.calls.is_empty());
}

#[test]
fn zoom_drag_undoes_in_one_step() {
    let (mut view, _model) = grid(5, 5);
    let mut undo = UndoStack::new();

    for target in [1.25f32, 1.5, 1.75, 2.0] {
        let mut cmd = Box::new(ZoomCommand::new(&view, target).unwrap());
        cmd.redo(&mut view);
        undo.push(cmd);
    }
    assert_eq!(view.zoom(), 2.0);
    assert_eq!(view.columns().index_pixels(ViewPos::Body(0)), 160);

    assert!(undo.undo(&mut view));
    assert_eq!(view.zoom(), 1.0);
    assert!(!undo.can_undo());
}

#[test]
fn reordered_hidden_grid_still_round_trips_pixels() {
    let (mut view, _model) = grid(10, 10);

    assert!(view.hide_sections(Orientation::Columns, &[2, 3]));
    let moving = [0usize].into_iter().collect();
    view.axis_mut(Orientation::Columns).reorder(&moving, 10);
    view.axis_mutated(Orientation::Columns);
    view.set_zoom(1.5).unwrap();
    turn(&mut view);

    let mapper = view.mapper();
    for pos in 0..10 {
        if view.columns().index_pixels(ViewPos::Body(pos)) == 0 {
            continue;
        }
        let x = mapper.column_start_x(ViewPos::Body(pos));
        assert_eq!(mapper.column_at(x), ViewPos::Body(pos), "position {pos}");
    }
}

#[test]
fn keyboard_navigation_scrolls_focus_into_view() {
    let (mut view, _model) = grid(30, 40);
    view.selection_mut().click(0, 0, false);

    for _ in 0..20 {
        view.navigate(NavDirection::Right, false);
    }
    let (focus_col, _) = view.selection().focus_cell();
    assert_eq!(focus_col, 20);

    // The focused cell ends the turn fully inside the viewport.
    let mapper = view.mapper();
    let x = mapper.column_start_x(ViewPos::Body(20));
    let width = view.columns().index_pixels(ViewPos::Body(20));
    assert!(x >= view.columns().scaled_header());
    assert!(x + width <= 500);
}
