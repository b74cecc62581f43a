use anyhow::{Result, anyhow};
use dom::{PageTree, PointerMove, Rect, Window, parse_html};
use read_aloud::{HoverTracker, ReaderConfig, classify, next_hover_state};
use std::rc::Rc;

fn page_with_box() -> Result<PageTree> {
    let mut tree = parse_html(r#"<div id="target" style="font-size: 20px">hover me</div>"#)?;
    let target = tree.get_element_by_id("target").ok_or_else(|| anyhow!("no #target"))?;
    tree.set_layout(target, Rect::new(20.0, 50.0, 100.0, 40.0));
    Ok(tree)
}

#[test]
fn pointer_inside_the_box_hovers_it() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = page_with_box()?;
    let target = tree.get_element_by_id("target").ok_or_else(|| anyhow!("no #target"))?;
    let elements = classify(&tree);
    assert_eq!(elements, vec![target]);

    let state = next_hover_state(None, PointerMove::new(70.0, 60.0), &elements, &tree, 1.2)
        .ok_or_else(|| anyhow!("nothing hovered"))?;
    assert_eq!(state.element, target);
    assert!((state.top - 50.0).abs() < f64::EPSILON);
    assert!((state.left - 20.0).abs() < f64::EPSILON);
    assert!((state.height_of_first_line - 24.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn pointer_far_away_hovers_nothing() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = page_with_box()?;
    let elements = classify(&tree);
    let state = next_hover_state(None, PointerMove::new(1000.0, 1000.0), &elements, &tree, 1.2);
    assert_eq!(state, None);
    Ok(())
}

#[test]
fn edges_are_inclusive() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = page_with_box()?;
    let elements = classify(&tree);
    for (x, y) in [(20.0, 50.0), (120.0, 90.0), (20.0, 90.0), (120.0, 50.0)] {
        let state = next_hover_state(None, PointerMove::new(x, y), &elements, &tree, 1.2);
        assert!(state.is_some(), "corner ({x}, {y}) should hover");
    }
    for (x, y) in [(19.9, 60.0), (120.1, 60.0), (70.0, 49.9), (70.0, 90.1)] {
        let state = next_hover_state(None, PointerMove::new(x, y), &elements, &tree, 1.2);
        assert!(state.is_none(), "({x}, {y}) should not hover");
    }
    Ok(())
}

#[test]
fn repeated_moves_are_idempotent() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = page_with_box()?;
    let elements = classify(&tree);
    let event = PointerMove::new(30.0, 55.0);
    let first = next_hover_state(None, event, &elements, &tree, 1.2);
    let second = next_hover_state(first.as_ref(), event, &elements, &tree, 1.2);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn scroll_offset_moves_boxes_into_page_coordinates() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = page_with_box()?;
    tree.set_scroll(0.0, 200.0);
    let elements = classify(&tree);
    assert_eq!(next_hover_state(None, PointerMove::new(70.0, 60.0), &elements, &tree, 1.2), None);
    let state = next_hover_state(None, PointerMove::new(70.0, 260.0), &elements, &tree, 1.2)
        .ok_or_else(|| anyhow!("nothing hovered"))?;
    assert!((state.top - 250.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn listener_is_not_leaked_across_mounts() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tree = Rc::new(page_with_box()?);
    let window = Rc::new(Window::new());
    for _ in 0..5 {
        let tracker = HoverTracker::attach(Rc::clone(&window), Rc::clone(&tree), classify(&*tree), &ReaderConfig::default());
        assert_eq!(window.listener_count(), 1);
        window.dispatch_pointer_move(70.0, 60.0);
        assert!(tracker.state().is_some());
        window.dispatch_pointer_move(1000.0, 1000.0);
        assert_eq!(tracker.state(), None);
        tracker.dispose();
    }
    assert_eq!(window.listener_count(), 0);
    Ok(())
}

#[test]
fn elements_without_layout_are_not_hovered() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = page_with_box()?;
    let target = tree.get_element_by_id("target").ok_or_else(|| anyhow!("no #target"))?;
    let elements = classify(&tree);
    let event = PointerMove::new(70.0, 60.0);
    assert!(next_hover_state(None, event, &elements, &tree, 1.2).is_some());

    tree.clear_layout(target);
    assert_eq!(next_hover_state(None, event, &elements, &tree, 1.2), None);
    Ok(())
}
