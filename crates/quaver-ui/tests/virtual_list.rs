//! End-to-end tests for the virtual list on the headless toolkit.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use quaver_ui::prelude::*;
use quaver_ui::toolkit::headless::{HeadlessToolkit, WidgetKind};
use quaver_ui::widget::class;

/// A two-label-column listing with heading and keyboard handling, filled
/// with "title N" / "artist N".
fn make_list(numrows: i64, display_rows: usize) -> (Rc<HeadlessToolkit>, VirtualList) {
    let kit = Rc::new(HeadlessToolkit::new());
    let mut list = VirtualList::new(
        kit.clone(),
        None,
        ListConfig::new("test")
            .with_display_rows(display_rows)
            .with_key_navigation(),
    );
    list.set_column_count(2);
    list.make_column(0, "title", CellType::Label);
    list.make_column(1, "artist", CellType::Label);
    list.set_heading(0, "Title");
    list.set_heading(1, "Artist");
    list.set_row_fill(|list, rownum| {
        list.set_cell_text(rownum, 0, &format!("title {rownum}"));
        list.set_cell_text(rownum, 1, &format!("artist {rownum}"));
    });
    list.set_num_rows(numrows);
    list.display();
    (kit, list)
}

/// Report pixel geometry so hit-testing works: 20px rows, 20px heading,
/// and column widths 40 + 60.
fn report_geometry(list: &mut VirtualList) {
    list.handle_row_height_changed(20);
    list.handle_heading_height_changed(20);
    list.handle_cell_width_changed(0, 40);
    list.handle_cell_width_changed(1, 60);
}

fn cell_text_at(kit: &HeadlessToolkit, list: &VirtualList, dispidx: usize, colidx: usize) -> String {
    let id = list
        .cell_widget_id(dispidx, colidx)
        .expect("cell widget exists");
    kit.record(id).expect("record exists").text
}

#[test]
fn selecting_an_offscreen_row_centers_it() {
    // Scenario A: numrows=100, dispsize=10 (1 heading + 9 data rows).
    let (kit, mut list) = make_list(100, 10);

    list.set_selection(50);

    assert_eq!(list.row_offset(), 46);
    assert_eq!(list.current_selection(), Some(50));
    // Visible data rows are 46..=54.
    assert_eq!(cell_text_at(&kit, &list, 1, 0), "title 46");
    assert_eq!(cell_text_at(&kit, &list, 9, 0), "title 54");
}

#[test]
fn short_list_hides_scrollbar_and_clears_tail_slots() {
    // Scenario B: numrows=5, dispsize=10.
    let (kit, mut list) = make_list(5, 10);

    let scrollbar = kit.record(list.scrollbar_id()).unwrap();
    assert!(!scrollbar.visible);

    // Data slots 1..=5 show rows 0..=4.
    assert_eq!(cell_text_at(&kit, &list, 1, 0), "title 0");
    assert_eq!(cell_text_at(&kit, &list, 5, 0), "title 4");

    // Slots 6..=9 are cleared: cells allocated but hidden.
    for dispidx in 6..10 {
        let id = list.cell_widget_id(dispidx, 0).unwrap();
        assert!(!kit.record(id).unwrap().visible, "slot {dispidx} not cleared");
    }

    // Clearing never frees: the full pool's widgets are still alive
    // (20 slot cells plus the scrollbar's heading filler).
    assert_eq!(kit.count_of(WidgetKind::Label), 21);

    // A selection past the end is rejected outright.
    list.set_selection(7);
    assert_eq!(list.current_selection(), Some(0));
}

#[test]
fn click_resolves_display_slot_and_column() {
    // Scenario C: click at dispidx=3, colidx=1 with rowoffset=20.
    let (_kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);
    list.handle_scrollbar_changed(20.0);
    assert_eq!(list.row_offset(), 20);

    let clicks: Rc<RefCell<Vec<(i64, Option<usize>)>>> = Rc::new(RefCell::new(Vec::new()));
    let clicks_c = clicks.clone();
    list.row_clicked.connect(move |hit| clicks_c.borrow_mut().push(*hit));

    // Heading is 20px, rows 20px: y=65 is the third data slot (dispidx 3);
    // x=50 lands in the second column.
    let consumed = list.handle_mouse_press(&MousePressEvent::new(
        MouseButton::Left,
        Point::new(50, 65),
    ));

    assert!(consumed);
    assert_eq!(*clicks.borrow(), vec![(22, Some(1))]);
    assert_eq!(list.current_selection(), Some(22));
}

#[test]
fn click_on_heading_or_empty_area_is_rejected() {
    let (_kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);

    // Heading row.
    assert!(!list.handle_mouse_press(&MousePressEvent::new(
        MouseButton::Left,
        Point::new(10, 5),
    )));
    // Below the last slot.
    assert!(!list.handle_mouse_press(&MousePressEvent::new(
        MouseButton::Left,
        Point::new(10, 20 + 9 * 20 + 5),
    )));
    assert_eq!(list.current_selection(), Some(0));
}

#[test]
fn move_at_last_row_is_a_no_op() {
    // Scenario D.
    let (_kit, mut list) = make_list(100, 10);
    list.set_selection(99);
    let offset = list.row_offset();

    let landed = list.move_selection(MoveDirection::Next);

    assert_eq!(landed, 99);
    assert_eq!(list.current_selection(), Some(99));
    assert_eq!(list.row_offset(), offset);
}

#[test]
fn heading_text_round_trips() {
    let (_kit, list) = make_list(10, 10);
    assert_eq!(list.heading_text(0).as_deref(), Some("Title"));
    assert_eq!(list.heading_text(1).as_deref(), Some("Artist"));
}

#[test]
fn scrolling_never_allocates_widgets() {
    let (kit, mut list) = make_list(50_000, 10);
    let before = kit.widget_count();

    for position in [100.0, 2_000.0, 49_000.0, 0.0, 25_000.0] {
        list.handle_scrollbar_changed(position);
    }

    assert_eq!(kit.widget_count(), before);
    assert_eq!(kit.count_of(WidgetKind::Label), 21);
    assert_eq!(list.row_offset(), 25_000);
}

#[test]
fn each_visible_row_is_rendered_exactly_once() {
    let (kit, mut list) = make_list(100, 10);
    list.handle_scrollbar_changed(46.0);

    let mut seen: Vec<String> = (1..10)
        .map(|dispidx| cell_text_at(&kit, &list, dispidx, 0))
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 9);
}

#[test]
fn offset_invariant_holds_under_mixed_sequences() {
    let (_kit, mut list) = make_list(100, 10);
    list.handle_row_height_changed(20);
    list.handle_heading_height_changed(20);

    // Interleave scrolls, row-count changes and resizes.
    list.handle_scrollbar_changed(91.0);
    assert_offset_invariant(&list);

    list.set_num_rows(40);
    assert_offset_invariant(&list);

    list.handle_viewport_resize(400); // 19 data slots + heading
    assert_offset_invariant(&list);

    list.set_num_rows(5);
    assert_offset_invariant(&list);

    list.handle_viewport_resize(200); // back to 9 data slots + heading
    assert_offset_invariant(&list);

    list.set_num_rows(0);
    assert_offset_invariant(&list);
}

fn assert_offset_invariant(list: &VirtualList) {
    let data_rows = list.display_size() as i64 - 1; // heading slot
    let bound = (list.num_rows() - data_rows).max(0);
    assert!(list.row_offset() >= 0);
    assert!(
        list.row_offset() <= bound,
        "offset {} exceeds bound {bound}",
        list.row_offset()
    );
}

#[test]
fn growing_the_viewport_grows_the_pool_and_shrinking_only_clears() {
    let (kit, mut list) = make_list(100, 10);
    list.handle_row_height_changed(20);
    list.handle_heading_height_changed(20);
    assert_eq!(kit.count_of(WidgetKind::Label), 21);

    // 400px: heading + 19 data rows.
    assert!(list.handle_viewport_resize(400));
    assert_eq!(list.display_size(), 20);
    assert_eq!(kit.count_of(WidgetKind::Label), 41);

    // Shrinking clears the excess slots but never frees them.
    assert!(list.handle_viewport_resize(200));
    assert_eq!(list.display_size(), 10);
    assert_eq!(kit.count_of(WidgetKind::Label), 41);
}

#[test]
fn growing_at_the_bottom_pulls_the_window_back() {
    let (_kit, mut list) = make_list(30, 10);
    list.handle_row_height_changed(20);
    list.handle_heading_height_changed(20);
    list.handle_scrollbar_changed(21.0);
    assert_eq!(list.row_offset(), 21);

    let moved = Rc::new(Cell::new(0));
    let moved_c = moved.clone();
    list.display_changed.connect(move |_| moved_c.set(moved_c.get() + 1));

    // Heading + 19 data rows: offset 21 would run past row 29.
    list.handle_viewport_resize(400);
    assert_eq!(list.row_offset(), 11);
    assert!(moved.get() >= 1);
}

#[test]
fn multi_select_click_sequence() {
    let (kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);
    list.set_selection_mode(SelectionMode::Multiple);

    let press = |row_y: i32, modifiers: KeyboardModifiers| {
        MousePressEvent::with_modifiers(MouseButton::Left, Point::new(10, row_y), modifiers)
    };
    // dispidx = 1 + (y - 20)/20; rows shown are 0..=8.
    list.handle_mouse_press(&press(20 + 2 * 20 + 5, KeyboardModifiers::NONE)); // row 2
    assert_eq!(list.selected_rows(), vec![2]);

    list.handle_mouse_press(&press(20 + 5 * 20 + 5, KeyboardModifiers::CONTROL)); // row 5
    assert_eq!(list.selected_rows(), vec![2, 5]);

    list.handle_mouse_press(&press(20 + 8 * 20 + 5, KeyboardModifiers::SHIFT)); // row 8
    assert_eq!(list.selected_rows(), vec![2, 3, 4, 5, 6, 7, 8]);

    // Each selected row carries the class on its box and two cells.
    assert_eq!(kit.widgets_with_class(class::SELECTED).len(), 7 * 3);

    // Ctrl-toggle off; current falls back to the highest remaining row.
    list.handle_mouse_press(&press(20 + 8 * 20 + 5, KeyboardModifiers::CONTROL));
    assert_eq!(list.selected_rows(), vec![2, 3, 4, 5, 6, 7]);
    assert_eq!(list.current_selection(), Some(7));
}

#[test]
fn selection_class_follows_rows_across_scrolls() {
    let (kit, mut list) = make_list(100, 10);
    list.set_selection(50);
    assert_eq!(kit.widgets_with_class(class::SELECTED).len(), 3);

    // Row 50 scrolled away: nothing on screen is selected.
    list.handle_scrollbar_changed(0.0);
    assert!(kit.widgets_with_class(class::SELECTED).is_empty());

    // Scrolled back: the class reappears on the slot now showing row 50.
    list.handle_scrollbar_changed(46.0);
    assert_eq!(kit.widgets_with_class(class::SELECTED).len(), 3);
    let selected_box = kit.widgets_with_class(class::SELECTED);
    let dispidx_of_50 = (1..10)
        .find(|d| cell_text_at(&kit, &list, *d, 0) == "title 50")
        .unwrap();
    assert!(selected_box.contains(&list.row_box_id(dispidx_of_50).unwrap()));
}

#[test]
fn keyboard_navigation_moves_and_scrolls() {
    let (_kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);
    list.set_selection(50);
    assert_eq!(list.row_offset(), 46);

    // Down past the midpoint nudges the window by one.
    assert!(list.handle_key_press(&KeyPressEvent::new(Key::ArrowDown)));
    assert_eq!(list.current_selection(), Some(51));
    assert_eq!(list.row_offset(), 47);

    // Page down reveals the target with a minimal scroll.
    assert!(list.handle_key_press(&KeyPressEvent::new(Key::PageDown)));
    assert_eq!(list.current_selection(), Some(60));
    assert_eq!(list.row_offset(), 52);

    // Unknown keys go to the fallback handler.
    let fallback_hits = Rc::new(Cell::new(0));
    let fallback_c = fallback_hits.clone();
    list.set_key_fallback(move |_| {
        fallback_c.set(fallback_c.get() + 1);
        true
    });
    assert!(list.handle_key_press(&KeyPressEvent::new(Key::Unknown(0x41))));
    assert_eq!(fallback_hits.get(), 1);

    // Enter activates the current row.
    let activated = Rc::new(Cell::new(-1i64));
    let activated_c = activated.clone();
    list.row_clicked.connect(move |(rownum, _)| activated_c.set(*rownum));
    assert!(list.handle_key_press(&KeyPressEvent::new(Key::Enter)));
    assert_eq!(activated.get(), 60);
}

#[test]
fn wheel_and_wheel_buttons_scroll_without_selecting() {
    let (_kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);
    list.set_selection(50);

    list.handle_wheel(&WheelEvent::new(1, Point::new(10, 40)));
    assert_eq!(list.row_offset(), 47);

    list.handle_mouse_press(&MousePressEvent::new(
        MouseButton::Button5,
        Point::new(10, 40),
    ));
    assert_eq!(list.row_offset(), 48);
    list.handle_mouse_press(&MousePressEvent::new(
        MouseButton::Button4,
        Point::new(10, 40),
    ));
    assert_eq!(list.row_offset(), 47);

    // Selection untouched throughout.
    assert_eq!(list.selected_rows(), vec![50]);
}

#[test]
fn shrinking_numrows_clamps_window_and_selection() {
    let (_kit, mut list) = make_list(100, 10);
    list.set_selection(99);
    assert_eq!(list.row_offset(), 91);

    list.set_num_rows(50);

    assert_eq!(list.current_selection(), Some(49));
    assert_offset_invariant(&list);
    // The window must show row 49.
    let offset = list.row_offset();
    assert!((offset..offset + 9).contains(&49));
}

#[test]
fn hover_highlights_exactly_one_unselected_row() {
    let (kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);
    list.set_selection(2);

    // Hover row 4 (dispidx 5).
    list.handle_mouse_move(&MouseMoveEvent::new(Point::new(10, 20 + 4 * 20 + 5)));
    assert_eq!(kit.widgets_with_class(class::HOVER).len(), 1);

    // Hover moves: old highlight is dropped.
    list.handle_mouse_move(&MouseMoveEvent::new(Point::new(10, 20 + 6 * 20 + 5)));
    assert_eq!(kit.widgets_with_class(class::HOVER).len(), 1);

    // Hovering the selected row highlights nothing.
    list.handle_mouse_move(&MouseMoveEvent::new(Point::new(10, 20 + 2 * 20 + 5)));
    assert!(kit.widgets_with_class(class::HOVER).is_empty());

    // Entering the listing clears any leftover highlight.
    list.handle_mouse_move(&MouseMoveEvent::new(Point::new(10, 20 + 6 * 20 + 5)));
    list.handle_enter(&EnterEvent);
    assert!(kit.widgets_with_class(class::HOVER).is_empty());
}

#[test]
fn double_click_requires_opt_in_and_skips_entry_cells() {
    let (_kit, mut list) = make_list(100, 10);
    report_geometry(&mut list);

    let doubles = Rc::new(Cell::new(0));
    let doubles_c = doubles.clone();
    list.double_clicked.connect(move |_| doubles_c.set(doubles_c.get() + 1));

    let event = MouseDoubleClickEvent::new(MouseButton::Left, Point::new(10, 45));
    assert!(!list.handle_mouse_double_click(&event));
    assert_eq!(doubles.get(), 0);

    list.set_allow_double_click();
    assert!(list.handle_mouse_double_click(&event));
    assert_eq!(doubles.get(), 1);
}

#[test]
fn double_click_over_entry_cell_is_suppressed() {
    let kit = Rc::new(HeadlessToolkit::new());
    let mut list = VirtualList::new(
        kit,
        None,
        ListConfig::new("edit").with_display_rows(6),
    );
    list.set_column_count(2);
    list.make_column(0, "name", CellType::Label);
    list.make_entry_column(1, "note", 10, 40);
    list.set_heading(0, "Name");
    list.set_row_fill(|list, rownum| {
        list.set_cell_text(rownum, 0, &format!("name {rownum}"));
        list.set_cell_text(rownum, 1, "");
    });
    list.set_num_rows(20);
    list.display();
    list.set_allow_double_click();
    list.handle_row_height_changed(20);
    list.handle_heading_height_changed(20);
    list.handle_cell_width_changed(0, 40);
    list.handle_cell_width_changed(1, 80);

    let doubles = Rc::new(Cell::new(0));
    let doubles_c = doubles.clone();
    list.double_clicked.connect(move |_| doubles_c.set(doubles_c.get() + 1));

    // Over the label column: delivered.
    assert!(list.handle_mouse_double_click(&MouseDoubleClickEvent::new(
        MouseButton::Left,
        Point::new(10, 45),
    )));
    // Over the entry column: a text-editing gesture, not an activation.
    assert!(!list.handle_mouse_double_click(&MouseDoubleClickEvent::new(
        MouseButton::Left,
        Point::new(60, 45),
    )));
    assert_eq!(doubles.get(), 1);
}

#[test]
fn entry_validation_marks_and_clears_the_error_class() {
    let kit = Rc::new(HeadlessToolkit::new());
    let mut list = VirtualList::new(
        kit.clone(),
        None,
        ListConfig::new("edit").with_display_rows(6),
    );
    list.set_column_count(1);
    list.make_entry_column(0, "bpm", 6, 6);
    list.set_entry_validator(0, |_rownum, text| {
        if text.chars().all(|c| c.is_ascii_digit()) && !text.is_empty() {
            EntryValidation::Accept
        } else {
            EntryValidation::Reject
        }
    });
    list.set_row_fill(|list, rownum| list.set_cell_text(rownum, 0, "120"));
    list.set_num_rows(10);
    list.display();

    list.handle_entry_edited(1, 0, "abc");
    let id = list.cell_widget_id(1, 0).unwrap();
    assert!(kit.record(id).unwrap().classes.contains(class::ENTRY_ERROR));

    list.handle_entry_edited(1, 0, "128");
    assert!(!kit.record(id).unwrap().classes.contains(class::ENTRY_ERROR));
}

#[test]
fn toggle_and_spin_changes_report_logical_rows() {
    let kit = Rc::new(HeadlessToolkit::new());
    let mut list = VirtualList::new(
        kit,
        None,
        ListConfig::new("mix").with_display_rows(6),
    );
    list.set_column_count(3);
    list.make_column(0, "name", CellType::Label);
    list.make_column(1, "fav", CellType::Checkbox);
    list.make_spinbox_column(
        2,
        "count",
        SpinRange {
            min: 0.0,
            max: 500.0,
            step: 1.0,
            page: 10.0,
        },
    );
    list.set_num_rows(100);
    list.display();
    list.handle_scrollbar_changed(40.0);

    let toggles: Rc<RefCell<Vec<(i64, bool)>>> = Rc::new(RefCell::new(Vec::new()));
    let toggles_c = toggles.clone();
    list.toggle_changed(1)
        .unwrap()
        .connect(move |change| toggles_c.borrow_mut().push(*change));

    let spins: Rc<RefCell<Vec<(i64, i64)>>> = Rc::new(RefCell::new(Vec::new()));
    let spins_c = spins.clone();
    list.spin_changed(2)
        .unwrap()
        .connect(move |change| spins_c.borrow_mut().push(*change));

    // The host flips the widgets, then reports the change by display slot.
    list.set_cell_value(42, 1, 1);
    list.handle_toggle_changed(3, 1);
    list.set_cell_value(42, 2, 128);
    list.handle_spin_changed(3, 2);

    assert_eq!(*toggles.borrow(), vec![(42, true)]);
    assert_eq!(*spins.borrow(), vec![(42, 128)]);
    assert_eq!(list.cell_value(42, 1), Some(1));
    assert_eq!(list.cell_value(42, 2), Some(128));
}

#[test]
fn internal_numeric_columns_store_values_without_widgets() {
    let kit = Rc::new(HeadlessToolkit::new());
    let mut list = VirtualList::new(
        kit.clone(),
        None,
        ListConfig::new("keys").with_display_rows(6),
    );
    list.set_column_count(2);
    list.make_column(0, "name", CellType::Label);
    list.make_column(1, "dbkey", CellType::InternalNumeric);
    list.set_row_fill(|list, rownum| {
        list.set_cell_text(rownum, 0, &format!("name {rownum}"));
        list.set_cell_value(rownum, 1, rownum * 7);
    });
    list.set_num_rows(50);
    list.display();

    assert_eq!(list.cell_value(3, 1), Some(21));
    // One label per slot plus the heading filler; the internal column
    // created no widget.
    assert_eq!(kit.count_of(WidgetKind::Label), 7);
}

#[test]
fn locked_rows_survive_scrolling() {
    let (kit, mut list) = make_list(100, 10);
    // Pin the first visible data row (row 0, dispidx 1).
    list.set_row_lock(0);

    list.handle_scrollbar_changed(40.0);

    // The pinned slot still shows row 0; the rest follow the window.
    assert_eq!(cell_text_at(&kit, &list, 1, 0), "title 0");
    assert_eq!(cell_text_at(&kit, &list, 2, 0), "title 41");
}

#[test]
fn row_count_changes_reconfigure_the_scrollbar() {
    let (kit, mut list) = make_list(100, 10);

    let sb = kit.record(list.scrollbar_id()).unwrap();
    assert_eq!(sb.scrollbar.upper, 100.0);
    assert_eq!(sb.scrollbar.page_size, 9.0);
    assert_eq!(sb.scrollbar.page_increment, 4.5);
    assert!(sb.visible);

    list.set_num_rows(6);
    let sb = kit.record(list.scrollbar_id()).unwrap();
    assert_eq!(sb.scrollbar.upper, 6.0);
    assert!(!sb.visible);
}

#[test]
fn copying_selection_and_position_mirrors_another_list() {
    let (_kit_a, mut a) = make_list(100, 10);
    let (_kit_b, mut b) = make_list(100, 10);
    a.set_selection_mode(SelectionMode::Multiple);
    b.set_selection_mode(SelectionMode::Multiple);

    a.set_selection(40);
    a.append_selection(44);
    b.copy_selection_from(&a);

    assert_eq!(b.selected_rows(), vec![40, 44]);
    assert_eq!(b.row_offset(), a.row_offset());
}

#[test]
fn out_of_range_operations_are_quiet_no_ops() {
    let (_kit, mut list) = make_list(10, 10);

    // None of these may panic or change state.
    list.set_cell_text(99, 0, "x");
    list.set_cell_text(-1, 0, "x");
    list.set_cell_text(3, 9, "x");
    list.set_selection(-5);
    list.append_selection(10);
    assert!(list.cell_value(3, 9).is_none());
    assert_eq!(list.current_selection(), Some(0));

    // Schema mutation after display is ignored.
    list.set_column_count(5);
    list.make_column(4, "late", CellType::Label);
    assert!(list.heading_text(4).is_none());
}
