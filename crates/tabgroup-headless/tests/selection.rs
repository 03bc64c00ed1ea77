mod common;

use std::sync::Arc;

use common::{names, record, Harness};
use tabgroup_core::{FocusEvent, TabEntry, TabGroupEvent, WindowId};
use tabgroup_headless::{SelectionAck, SurfaceCommand};

fn select_count(h: &Harness) -> usize {
    h.host
        .log()
        .surface_commands()
        .iter()
        .filter(|c| matches!(c, SurfaceCommand::SelectTab { .. }))
        .count()
}

#[test]
fn test_pending_index_selected_on_open() {
    let h = Harness::new(&["a", "b", "c"]);
    h.group.set_active_tab(2usize);
    let events = record(h.tabs[2].events());

    h.open();

    let focus = FocusEvent {
        source: Some(h.tabs[2].id()),
        previous_tab: None,
        previous_index: -1,
        tab: h.tabs[2].id(),
        index: 2,
    };
    assert_eq!(
        *events.lock(),
        vec![
            TabGroupEvent::Focus(Some(focus.clone())),
            TabGroupEvent::Selected(focus),
        ]
    );
    assert!(h
        .host
        .log()
        .surface_commands()
        .contains(&SurfaceCommand::SelectTab {
            tab: h.tabs[2].id()
        }));
    assert!(h.group.active_tab().is_some_and(|t| Arc::ptr_eq(&t, &h.tabs[2])));
}

#[test]
fn test_pending_index_waits_for_more_tabs() {
    let h = Harness::new(&["a"]);
    let events = record(h.group.events());

    h.group.set_active_tab(2usize);
    assert!(events.lock().is_empty());
    assert!(h.group.active_tab().is_some_and(|t| Arc::ptr_eq(&t, &h.tabs[0])));

    let (b, c) = (TabEntry::new("b"), TabEntry::new("c"));
    h.group.add_tab(&b);
    h.group.add_tab(&c);
    h.open();

    let selected: Vec<FocusEvent> = events
        .lock()
        .iter()
        .filter_map(|e| match e {
            TabGroupEvent::Selected(focus) => Some(focus.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        selected,
        vec![FocusEvent {
            source: Some(c.id()),
            previous_tab: None,
            previous_index: -1,
            tab: c.id(),
            index: 2,
        }]
    );
}

#[test]
fn test_invalid_pending_index_falls_back_to_first() {
    let h = Harness::new(&["a", "b"]);
    h.group.set_active_tab(5usize);

    h.open();

    assert!(h.tabs[0].is_active());
}

#[test]
fn test_blur_and_focus_payloads() {
    let h = Harness::new(&["a", "b"]);
    h.open();
    let first = record(h.tabs[0].events());
    let second = record(h.tabs[1].events());
    let group = record(h.group.events());

    h.group.set_active_tab(1usize);

    let focus = FocusEvent {
        source: Some(h.tabs[1].id()),
        previous_tab: Some(h.tabs[0].id()),
        previous_index: 0,
        tab: h.tabs[1].id(),
        index: 1,
    };
    let blur = focus.with_source(Some(h.tabs[0].id()));

    assert_eq!(*first.lock(), vec![TabGroupEvent::Blur(Some(blur))]);
    assert_eq!(
        *second.lock(),
        vec![
            TabGroupEvent::Focus(Some(focus.clone())),
            TabGroupEvent::Selected(focus.clone()),
        ]
    );
    assert_eq!(*group.lock(), vec![TabGroupEvent::Selected(focus)]);
    assert!(!h.tabs[0].is_active());
    assert!(h.tabs[1].is_active());
    assert!(h.tabs[1].last_selected_at().is_some());
}

#[test]
fn test_invalid_selection_sends_nothing() {
    let h = Harness::new(&["a", "b"]);
    h.open();
    let before = select_count(&h);

    h.group.set_active_tab(7usize);
    h.group.set_active_tab(-1i64);
    h.group.set_active_tab(TabEntry::new("stranger"));

    assert_eq!(select_count(&h), before);
    assert!(h.tabs[0].is_active());
}

#[test]
fn test_negative_pending_index_falls_back() {
    let h = Harness::new(&["a", "b"]);
    h.group.set_active_tab(-3i64);

    h.open();

    assert!(h.tabs[0].is_active());
}

#[test]
fn test_host_focus_emitted_once() {
    let h = Harness::new(&["a"]);
    h.open();
    let window = h.window();
    let events = record(h.tabs[0].events());

    // Already focused by the initial selection
    window.resume();
    assert!(events.lock().is_empty());

    window.pause();
    window.pause();
    window.resume();

    assert_eq!(
        *events.lock(),
        vec![TabGroupEvent::Blur(None), TabGroupEvent::Focus(None)]
    );
    assert!(h.tabs[0].is_focused());
}

#[test]
fn test_host_focus_without_tabs_goes_to_group() {
    let h = Harness::new(&[]);
    h.open();
    let events = record(h.group.events());

    h.window().pause();

    assert_eq!(*events.lock(), vec![TabGroupEvent::Blur(None)]);
    assert!(!h.group.is_focused());
}

#[test]
fn test_remove_selected_tab_while_open() {
    let h = Harness::new(&["a", "b", "c"]);
    h.open();
    h.group.set_active_tab(1usize);
    h.host.log().clear();

    h.group.remove_tab(&h.tabs[1]);

    assert_eq!(
        h.host.log().surface_commands(),
        vec![
            SurfaceCommand::RemoveTab { index: 1 },
            SurfaceCommand::SelectTab {
                tab: h.tabs[0].id()
            },
        ]
    );
    assert!(h.tabs[1].tab_group().is_none());
    assert!(!h.tabs[1].is_active());
    assert!(h.tabs[0].is_active());
    assert_eq!(h.surface().tabs().len(), 2);
}

#[test]
fn test_remove_other_tab_keeps_selection() {
    let h = Harness::new(&["a", "b", "c"]);
    h.open();
    h.group.set_active_tab(2usize);
    let events = record(h.group.events());

    h.group.remove_tab(&h.tabs[0]);

    assert!(names(&events).is_empty());
    assert_eq!(h.group.tab_index(&h.tabs[2]), Some(1));
    assert!(h.tabs[2].is_active());
}

#[test]
fn test_added_tab_reaches_open_surface() {
    let h = Harness::new(&["a"]);
    h.open();
    let tab = TabEntry::new("b");

    h.group.add_tab(&tab);

    assert_eq!(
        h.host.log().surface_commands().last(),
        Some(&SurfaceCommand::AddTab {
            tab: tab.id(),
            index: 1
        })
    );
    assert_eq!(h.surface().tabs().len(), 2);
}

#[test]
fn test_deferred_acknowledgement() {
    let h = Harness::new(&["a", "b", "c"]);
    h.host.set_selection_ack(SelectionAck::Deferred);
    h.open();
    let surface = h.surface();

    assert!(!h.tabs[0].is_active());
    assert_eq!(surface.ack_pending(), 1);
    assert!(h.tabs[0].is_active());

    h.group.set_active_tab(2usize);
    assert!(h.tabs[0].is_active());
    assert_eq!(surface.ack_pending(), 1);
    assert!(h.tabs[2].is_active());
    assert!(surface.selected().is_some_and(|t| Arc::ptr_eq(&t, &h.tabs[2])));
}

#[test]
fn test_user_tap_reports_selection() {
    let h = Harness::new(&["a", "b"]);
    h.open();
    let events = record(h.group.events());

    h.surface().tap(1);

    assert_eq!(names(&events), vec!["selected"]);
    assert!(h.tabs[1].is_active());
}

#[test]
fn test_selection_from_listener_reenters() {
    let h = Harness::new(&["a", "b"]);
    let events = record(h.group.events());
    let weak = h.group.downgrade();
    h.group.on(TabGroupEvent::SELECTED, move |event| {
        if let TabGroupEvent::Selected(focus) = event {
            if focus.index == 0 {
                if let Some(group) = weak.upgrade() {
                    group.set_active_tab(1usize);
                }
            }
        }
    });

    h.open();

    let indices: Vec<i32> = events
        .lock()
        .iter()
        .filter_map(|e| match e {
            TabGroupEvent::Selected(focus) => Some(focus.index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![0, 1]);
    assert!(h.tabs[1].is_active());
    assert!(!h.tabs[0].is_active());
}

#[test]
fn test_selection_set_during_open_event_is_kept() {
    let h = Harness::new(&["a", "b", "c"]);
    let weak = h.group.downgrade();
    h.group.on(TabGroupEvent::OPEN, move |_| {
        if let Some(group) = weak.upgrade() {
            group.set_active_tab(2usize);
        }
    });

    h.open();

    assert!(h.tabs[2].is_active());
    assert_eq!(h.surface().tabs().len(), 3);
}

#[test]
fn test_safe_area_reaches_tabs_with_windows() {
    let h = Harness::new(&["a", "b"]);
    h.open();
    h.tabs[0].attach_window(WindowId(40));
    let group = record(h.group.events());
    let with_window = record(h.tabs[0].events());
    let without_window = record(h.tabs[1].events());

    h.group.fire_safe_area_changed();

    assert_eq!(names(&group), vec!["safeareachanged"]);
    assert_eq!(names(&with_window), vec!["safeareachanged"]);
    assert!(names(&without_window).is_empty());
}

#[test]
fn test_selection_while_closing_used_on_reopen() {
    let h = Harness::new(&["a", "b", "c"]);
    h.open();

    h.group.close();
    h.group.set_active_tab(2usize);
    h.host.confirm_finished();
    assert!(h.group.active_tab().is_some_and(|t| Arc::ptr_eq(&t, &h.tabs[2])));

    let events = record(h.tabs[2].events());
    h.open();

    assert!(h.tabs[2].is_active());
    assert!(!h.tabs[0].is_active());
    assert!(h.surface().selected().is_some_and(|t| Arc::ptr_eq(&t, &h.tabs[2])));
    assert_eq!(names(&events), vec!["focus", "selected"]);
}

#[test]
fn test_removed_active_tab_blurs() {
    let h = Harness::new(&["a", "b"]);
    h.open();
    h.group.set_active_tab(1usize);
    let events = record(h.tabs[1].events());

    h.group.remove_tab(&h.tabs[1]);

    assert_eq!(*events.lock(), vec![TabGroupEvent::Blur(None)]);
    assert!(!h.tabs[1].is_focused());
    assert!(h.tabs[0].is_focused());
}
