use anyhow::{Result, anyhow};
use dom::{DOMSubscriber, DOMUpdate, Document, LineHeight, NodeKey, PageTree, Rect, parse_html};

#[test]
fn mirrors_update_batches() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    // <html><body><div id=a>hello <b>world</b></div></body></html>
    let mut tree = PageTree::new();
    let root = NodeKey::ROOT;
    let html = NodeKey(10);
    let body = NodeKey(11);
    let div = NodeKey(12);
    let hello = NodeKey(13);
    let bold = NodeKey(14);
    let world = NodeKey(15);
    tree.apply_batch(vec![
        DOMUpdate::InsertElement { parent: root, node: html, tag: "html".into(), pos: 0 },
        DOMUpdate::InsertElement { parent: html, node: body, tag: "body".into(), pos: 0 },
        DOMUpdate::InsertElement { parent: body, node: div, tag: "div".into(), pos: 0 },
        DOMUpdate::SetAttr { node: div, name: "id".into(), value: "a".into() },
        DOMUpdate::InsertText { parent: div, node: hello, text: "hello ".into(), pos: 0 },
        DOMUpdate::InsertElement { parent: div, node: bold, tag: "b".into(), pos: 1 },
        DOMUpdate::InsertText { parent: bold, node: world, text: "world".into(), pos: 0 },
        DOMUpdate::EndOfDocument,
    ])?;

    assert!(tree.is_finished());
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.get_element_by_id("a"), Some(div));
    assert_eq!(tree.child_nodes(div), vec![hello, bold]);
    assert_eq!(tree.element_children(div), vec![bold]);
    assert_eq!(tree.text_content(div), "hello world");
    assert!(tree.is_ancestor_of(body, world));

    tree.apply_update(DOMUpdate::RemoveNode { node: bold })?;
    assert_eq!(tree.text_content(div), "hello ");
    assert!(!tree.contains(world));
    Ok(())
}

#[test]
fn rejects_updates_for_unknown_nodes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = PageTree::new();
    let orphan = DOMUpdate::InsertElement { parent: NodeKey(99), node: NodeKey(100), tag: "p".into(), pos: 0 };
    assert!(tree.apply_update(orphan).is_err());
    assert!(tree.apply_update(DOMUpdate::RemoveNode { node: NodeKey(5) }).is_err());
}

#[test]
fn parsed_page_exposes_geometry_and_style() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = parse_html(
        r#"<html><body><section id="s" style="font-size: 20px"><p id="p" style="line-height: 1.5">text</p></section></body></html>"#,
    )?;
    let paragraph = tree.get_element_by_id("p").ok_or_else(|| anyhow!("no #p"))?;

    let style = tree.computed_style(paragraph).ok_or_else(|| anyhow!("no style"))?;
    assert!((style.font_size - 20.0).abs() < f64::EPSILON);
    assert_eq!(style.line_height, LineHeight::Number(1.5));
    assert!((style.line_height_px(1.2) - 30.0).abs() < 1e-9);

    assert_eq!(tree.page_bounds(paragraph), None);
    tree.set_layout(paragraph, Rect::new(10.0, 20.0, 300.0, 30.0));
    tree.set_scroll(0.0, 100.0);
    assert_eq!(tree.bounding_client_rect(paragraph), Some(Rect::new(10.0, 20.0, 300.0, 30.0)));
    assert_eq!(tree.page_bounds(paragraph), Some(Rect::new(10.0, 120.0, 300.0, 30.0)));
    Ok(())
}
