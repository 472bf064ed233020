use std::time::Instant;

use mailcanvas::{
    render, render_with_styles, Affinity, Block, BlockKind, BlockStyle, BlockType, Contact,
    Document, DragController, DragSource, DropOutcome, DropTarget, Edit, EditingSession,
    HistoryManager, MailError, RecordMode, RenderOptions, Show, StylesState,
};
use pretty_assertions::assert_eq;

fn text_block(body: &str) -> Block {
    let mut block = Block::new(BlockType::Text);
    if let BlockKind::Text(content) = &mut block.kind {
        content.html = body.to_string();
    }
    block
}

fn strip_with(children: Vec<Block>) -> Block {
    let mut strip = Block::new(BlockType::Strip);
    if let BlockKind::Strip(content) = &mut strip.kind {
        content.blocks = children;
    }
    strip
}

fn all_ids(block: &Block) -> Vec<String> {
    let mut ids = vec![block.id.clone()];
    if let Some(children) = block.children() {
        for child in children {
            ids.extend(all_ids(child));
        }
    }
    ids
}

fn sample_shows() -> Vec<Show> {
    vec![
        Show {
            name: "Open Mic Riot".into(),
            venue: "The Basement".into(),
            category: Some("comedy".into()),
            url: Some("https://tickets.example.com/shows/1".into()),
            ..Show::default()
        },
        Show {
            name: "Synth Night".into(),
            venue: "Warehouse 9".into(),
            category: Some("music".into()),
            url: Some("https://tickets.example.com/shows/2".into()),
            ..Show::default()
        },
        Show {
            name: "Late Laughs".into(),
            venue: "The Basement".into(),
            category: Some("comedy".into()),
            url: Some("https://tickets.example.com/shows/3".into()),
            ..Show::default()
        },
    ]
}

// Document loading and normalization

#[test]
fn test_empty_input_loads_empty_document() {
    let document = Document::from_json("").unwrap();
    assert!(document.blocks.is_empty());
    let document = Document::from_json("null").unwrap();
    assert!(document.blocks.is_empty());
}

#[test]
fn test_bare_array_shape_loads() {
    let json = r#"[
        {"id":"a","type":"text","content":{"html":"<p>hi</p>"}},
        {"id":"b","type":"divider","content":{}}
    ]"#;
    let document = Document::from_json(json).unwrap();
    assert_eq!(document.blocks.len(), 2);
    assert!(matches!(document.blocks[0].kind, BlockKind::Text(_)));
    assert!(matches!(document.blocks[1].kind, BlockKind::Divider(_)));
}

#[test]
fn test_scalar_input_is_rejected() {
    let result = Document::from_json("42");
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), MailError::Document(_)));
}

#[test]
fn test_canonical_shape_round_trips() {
    let mut document = Document::new();
    document.blocks.push(text_block("<p>Hello</p>"));
    document.footer.org_name = "Night Owl Tickets".into();
    let json = document.to_json().unwrap();
    let loaded = Document::from_json(&json).unwrap();
    assert_eq!(loaded, document);
}

#[test]
fn test_container_alias_and_strip_tag() {
    let json = r#"[{"id":"c1","type":"container","content":{"blocks":[
        {"id":"t1","type":"text","content":{"html":"<p>inside</p>"}}
    ]}}]"#;
    let document = Document::from_json(json).unwrap();
    assert!(document.blocks[0].is_container());
    // Saving always emits the canonical tag.
    let saved = document.to_json().unwrap();
    assert!(saved.contains(r#""type":"strip""#));
    assert!(!saved.contains(r#""type":"container""#));
}

#[test]
fn test_unknown_block_type_is_kept_and_inert() {
    let json = r#"[
        {"id":"a","type":"countdown","content":{"until":"2026-12-31"}},
        {"id":"b","type":"text","content":{"html":"<p>still here</p>"}}
    ]"#;
    let document = Document::from_json(json).unwrap();
    assert_eq!(document.blocks.len(), 2);
    assert!(matches!(document.blocks[0].kind, BlockKind::Unknown));
    let html = render(&document, &RenderOptions::default());
    assert!(html.contains("still here"));
    assert!(!html.contains("countdown"));
}

#[test]
fn test_malformed_content_recovers_to_defaults() {
    let json = r#"[{"id":"img1","type":"image","content":"not an object"}]"#;
    let document = Document::from_json(json).unwrap();
    assert_eq!(document.blocks.len(), 1);
    assert_eq!(document.blocks[0].id, "img1");
    match &document.blocks[0].kind {
        BlockKind::Image(content) => assert!(content.url.is_empty()),
        other => panic!("expected image content, got {}", other.type_name()),
    }
}

#[test]
fn test_missing_content_defaults() {
    let json = r#"[{"id":"d1","type":"divider"},{"id":"s1","type":"spacer"}]"#;
    let document = Document::from_json(json).unwrap();
    assert!(matches!(document.blocks[0].kind, BlockKind::Divider(_)));
    match &document.blocks[1].kind {
        BlockKind::Spacer(content) => assert_eq!(content.height, 24.0),
        other => panic!("expected spacer content, got {}", other.type_name()),
    }
}

#[test]
fn test_duplicate_ids_are_repaired_on_load() {
    let json = r#"[
        {"id":"same","type":"text","content":{"html":"<p>one</p>"}},
        {"id":"same","type":"text","content":{"html":"<p>two</p>"}}
    ]"#;
    let document = Document::from_json(json).unwrap();
    assert_eq!(document.blocks.len(), 2);
    assert_ne!(document.blocks[0].id, document.blocks[1].id);
    assert!(document.validate().is_ok());
}

#[test]
fn test_nested_strips_are_flattened_on_load() {
    let json = r#"[{"id":"outer","type":"strip","content":{"blocks":[
        {"id":"keep","type":"text","content":{"html":"<p>keep</p>"}},
        {"id":"inner","type":"strip","content":{"blocks":[
            {"id":"hoisted","type":"button","content":{"label":"Go","url":""}}
        ]}}
    ]}}]"#;
    let document = Document::from_json(json).unwrap();
    let children = document.blocks[0].children().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id, "keep");
    assert_eq!(children[1].id, "hoisted");
    assert!(document.validate().is_ok());
}

#[test]
fn test_style_survives_serde_and_empty_style_is_omitted() {
    let mut block = text_block("<p>styled</p>");
    block.style.background_color = Some("#101010".into());
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(value["style"]["backgroundColor"], "#101010");

    let plain = text_block("<p>plain</p>");
    let value = serde_json::to_value(&plain).unwrap();
    assert!(value.get("style").is_none());
    assert_eq!(value["type"], "text");
    assert!(value.get("content").is_some());
}

// Tree operations

#[test]
fn test_duplicate_assigns_fresh_ids_to_whole_subtree() {
    let mut document = Document::new();
    let strip = strip_with(vec![text_block("<p>a</p>"), text_block("<p>b</p>")]);
    let strip_id = strip.id.clone();
    document.blocks.push(strip);
    document.blocks.push(text_block("<p>tail</p>"));

    let copy_id = document.duplicate_block(&strip_id).unwrap();
    assert_eq!(document.blocks.len(), 3);
    // The copy lands immediately after the original.
    assert_eq!(document.blocks[1].id, copy_id);

    let original_ids = all_ids(&document.blocks[0]);
    let copy_ids = all_ids(&document.blocks[1]);
    assert_eq!(original_ids.len(), copy_ids.len());
    for id in &copy_ids {
        assert!(!original_ids.contains(id), "id '{}' was reused", id);
    }
    assert!(document.validate().is_ok());
}

#[test]
fn test_insert_into_leaf_fails() {
    let mut document = Document::new();
    let leaf = text_block("<p>leaf</p>");
    let leaf_id = leaf.id.clone();
    document.blocks.push(leaf);

    let result = document.insert(Block::new(BlockType::Button), Some(leaf_id.as_str()), 0);
    assert!(matches!(result, Err(MailError::NotAContainer { .. })));
    assert_eq!(document.block_count(), 1);
}

#[test]
fn test_strip_cannot_nest_via_insert_or_move() {
    let mut document = Document::new();
    let strip = strip_with(vec![]);
    let strip_id = strip.id.clone();
    document.blocks.push(strip);

    let result = document.insert(Block::new(BlockType::Strip), Some(strip_id.as_str()), 0);
    assert!(matches!(result, Err(MailError::NestedContainer { .. })));

    let other = strip_with(vec![]);
    let other_id = other.id.clone();
    document.blocks.push(other);
    let result = document.move_block(&other_id, Some(strip_id.as_str()), 0);
    assert!(matches!(result, Err(MailError::NestedContainer { .. })));
    assert!(document.validate().is_ok());
}

#[test]
fn test_remove_returns_the_block() {
    let mut document = Document::new();
    let strip = strip_with(vec![text_block("<p>child</p>")]);
    let child_id = strip.children().unwrap()[0].id.clone();
    document.blocks.push(strip);

    let removed = document.remove(&child_id).unwrap();
    assert_eq!(removed.id, child_id);
    assert_eq!(document.blocks[0].children().unwrap().len(), 0);
    assert!(matches!(
        document.remove(&child_id),
        Err(MailError::UnknownBlock { .. })
    ));
}

// Editing session

#[test]
fn test_hydrate_empty_gives_starter_document() {
    let session = EditingSession::hydrate("").unwrap();
    assert!(!session.document.blocks.is_empty());
    assert!(session.active_block_id.is_none());
}

#[test]
fn test_replace_content_between_strips_keeps_children() {
    let strip = strip_with(vec![text_block("<p>keep me</p>")]);
    let strip_id = strip.id.clone();
    let mut document = Document::new();
    document.blocks.push(strip);
    let mut session = EditingSession::with_document(document);

    session
        .apply(Edit::ReplaceContent {
            id: strip_id.clone(),
            kind: BlockType::Strip.default_kind(),
        })
        .unwrap();
    let children = session.document.blocks[0].children().unwrap();
    assert_eq!(children.len(), 1);

    // Replacing with a leaf kind drops the children.
    session
        .apply(Edit::ReplaceContent {
            id: strip_id,
            kind: BlockType::Divider.default_kind(),
        })
        .unwrap();
    assert!(session.document.blocks[0].children().is_none());
}

#[test]
fn test_removing_selected_block_clears_selection() {
    let block = text_block("<p>bye</p>");
    let id = block.id.clone();
    let mut document = Document::new();
    document.blocks.push(block);
    let mut session = EditingSession::with_document(document);

    session.apply(Edit::Select { id: Some(id.clone()) }).unwrap();
    assert_eq!(session.active_block_id.as_deref(), Some(id.as_str()));
    session.apply(Edit::Remove { id }).unwrap();
    assert!(session.active_block_id.is_none());
}

#[test]
fn test_session_errors_leave_state_untouched() {
    let mut session = EditingSession::with_document(Document::new());
    let before = session.serialize().unwrap();
    let result = session.apply(Edit::Remove { id: "ghost".into() });
    assert!(matches!(result, Err(MailError::UnknownBlock { .. })));
    assert_eq!(session.serialize().unwrap(), before);
}

// History over real edits

#[test]
fn test_undo_redo_restore_exact_serialized_forms() {
    let mut document = Document::new();
    document.blocks.push(text_block("<p>first</p>"));
    let victim = text_block("<p>second</p>");
    let victim_id = victim.id.clone();
    document.blocks.push(victim);

    let mut session = EditingSession::with_document(document);
    let mut history = HistoryManager::new();
    history
        .record(&session, RecordMode::Immediate, Instant::now())
        .unwrap();
    let before = session.serialize().unwrap();

    session.apply(Edit::Remove { id: victim_id }).unwrap();
    history
        .record(&session, RecordMode::Immediate, Instant::now())
        .unwrap();
    let after = session.serialize().unwrap();
    assert_ne!(before, after);

    assert!(history.undo(&mut session));
    assert_eq!(session.serialize().unwrap(), before);

    assert!(history.redo(&mut session));
    assert_eq!(session.serialize().unwrap(), after);
}

#[test]
fn test_noop_edit_does_not_grow_history() {
    let block = text_block("<p>same</p>");
    let id = block.id.clone();
    let style = BlockStyle::default();
    let mut document = Document::new();
    document.blocks.push(block);
    let mut session = EditingSession::with_document(document);
    let mut history = HistoryManager::new();
    history
        .record(&session, RecordMode::Immediate, Instant::now())
        .unwrap();

    // Setting an identical style changes nothing observable.
    session.apply(Edit::SetStyle { id, style }).unwrap();
    let recorded = history
        .record(&session, RecordMode::Immediate, Instant::now())
        .unwrap();
    assert!(!recorded);
    assert_eq!(history.depth(), 1);
    assert!(!history.undo(&mut session));
}

// Drag and drop

#[test]
fn test_drop_from_container_to_canvas_start() {
    let strip = strip_with(vec![text_block("<p>a</p>"), text_block("<p>b</p>")]);
    let strip_id = strip.id.clone();
    let dragged_id = strip.children().unwrap()[1].id.clone();
    let mut document = Document::new();
    document.blocks.push(strip);

    let mut session = EditingSession::with_document(document);
    let mut history = HistoryManager::new();
    history
        .record(&session, RecordMode::Immediate, Instant::now())
        .unwrap();
    let before = session.serialize().unwrap();
    let mut controller = DragController::new();

    assert!(controller.drag_start(&session, DragSource::Existing(dragged_id.clone())));
    // Pointer above the strip's midpoint arms index 0 on the canvas.
    assert_eq!(
        controller.hover(&session, DropTarget::Canvas, 10.0, &[200.0]),
        Some(0)
    );
    let outcome = controller.drop(&mut session, &mut history, Instant::now());
    assert_eq!(outcome, DropOutcome::Completed { id: dragged_id.clone() });

    assert_eq!(session.document.blocks.len(), 2);
    assert_eq!(session.document.blocks[0].id, dragged_id);
    let strip = session.document.get(&strip_id).unwrap();
    assert_eq!(strip.children().unwrap().len(), 1);

    // The drop committed a snapshot, so a single undo restores the
    // pre-drag arrangement.
    assert!(history.undo(&mut session));
    assert_eq!(session.serialize().unwrap(), before);
}

#[test]
fn test_invalid_drop_is_silently_rejected() {
    let strip = strip_with(vec![]);
    let strip_id = strip.id.clone();
    let mut document = Document::new();
    document.blocks.push(strip);
    let mut session = EditingSession::with_document(document);
    let mut history = HistoryManager::new();
    let mut controller = DragController::new();
    let before = session.serialize().unwrap();

    // A strip dragged over a strip never arms, so the drop rejects.
    controller.drag_start(&session, DragSource::Existing(strip_id.clone()));
    assert_eq!(
        controller.hover(&session, DropTarget::Strip(strip_id), 0.0, &[]),
        None
    );
    let outcome = controller.drop(&mut session, &mut history, Instant::now());
    assert_eq!(outcome, DropOutcome::Rejected);
    assert_eq!(session.serialize().unwrap(), before);
    assert!(!controller.is_dragging());
}

#[test]
fn test_palette_drop_into_strip() {
    let strip = strip_with(vec![text_block("<p>existing</p>")]);
    let strip_id = strip.id.clone();
    let mut document = Document::new();
    document.blocks.push(strip);
    let mut session = EditingSession::with_document(document);
    let mut history = HistoryManager::new();
    let mut controller = DragController::new();

    controller.drag_start(&session, DragSource::Palette(BlockType::Image));
    // Below the only child's midpoint: index 1.
    assert_eq!(
        controller.hover(&session, DropTarget::Strip(strip_id.clone()), 80.0, &[40.0]),
        Some(1)
    );
    let outcome = controller.drop(&mut session, &mut history, Instant::now());
    let DropOutcome::Completed { id } = outcome else {
        panic!("palette drop should complete");
    };
    let children = session.document.get(&strip_id).unwrap().children().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].id, id);
    assert!(matches!(children[1].kind, BlockKind::Image(_)));
}

#[test]
fn test_leaf_block_is_not_a_drop_target() {
    let leaf = text_block("<p>leaf</p>");
    let leaf_id = leaf.id.clone();
    let mut document = Document::new();
    document.blocks.push(leaf);
    let session = EditingSession::with_document(document);
    let mut controller = DragController::new();

    controller.drag_start(&session, DragSource::Palette(BlockType::Button));
    assert_eq!(
        controller.hover(&session, DropTarget::Strip(leaf_id), 0.0, &[]),
        None
    );
    // The drag survives the bad hover; only the armed target is lost.
    assert!(controller.is_dragging());
}

// Rendering

#[test]
fn test_render_is_deterministic() {
    let json = r##"{"blocks":[
        {"id":"s1","type":"strip","style":{"backgroundColor":"#222831","borderRadius":8},"content":{"blocks":[
            {"id":"t1","type":"text","content":{"html":"<p>Hi {{contact.firstName}},</p>"}},
            {"id":"b1","type":"button","content":{"label":"Get Tickets","url":"{{show.url}}"}}
        ]}},
        {"id":"u1","type":"urgency","content":{"threshold":20,"message":"Only {count} tickets left!"}},
        {"id":"l1","type":"show-list","content":{"source":"recommended","limit":4,"heading":"Picked for you","showImage":false}},
        {"id":"g1","type":"image-group","content":{"images":[
            {"url":"https://cdn.example.com/a.jpg","alt":"A"},
            {"url":"https://cdn.example.com/b.jpg","alt":"B"},
            {"url":"https://cdn.example.com/c.jpg","alt":"C"}
        ]}},
        {"id":"d1","type":"divider"},
        {"id":"v1","type":"video","content":{"videoUrl":"https://example.com/v","thumbnailUrl":"","caption":"Aftermovie"}},
        {"id":"p1","type":"product","content":{"name":"Tour Poster","imageUrl":"","price":"$25","url":"/shop/poster","description":"A2, matte."}},
        {"id":"soc1","type":"social","content":{"links":[{"platform":"instagram","url":"https://instagram.com/x"}]}}
    ],"footer":{"orgName":"Night Owl Tickets","mailingAddress":"400 W 5th St, Austin, TX"}}"##;
    let document = Document::from_json(json).unwrap();
    let options = RenderOptions {
        contact: Some(Contact {
            first_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..Contact::default()
        }),
        show: Some(Show {
            name: "Open Mic Riot".into(),
            venue: "The Basement".into(),
            url: Some("https://tickets.example.com/shows/1".into()),
            tickets_remaining: Some(5),
            ..Show::default()
        }),
        upcoming_shows: sample_shows(),
        affinity: Some(Affinity {
            category: Some("comedy".into()),
            venue: None,
        }),
        base_url: Some("https://tickets.example.com".into()),
    };
    let mut styles = StylesState::new();
    styles.insert("pageBackground".into(), "#0e0e10".into());
    styles.insert("linkColor".into(), "#ff5a36".into());

    let first = render_with_styles(&document, &styles, &options);
    let second = render_with_styles(&document, &styles, &options);
    assert_eq!(first, second);

    assert!(first.contains("Hi Ada,"));
    assert!(first.contains("Only 5 tickets left!"));
    assert!(first.contains("https://tickets.example.com/shows/1"));
    assert!(first.contains("#0e0e10"));
    // Relative product URL joined onto the base url.
    assert!(first.contains("https://tickets.example.com/shop/poster"));
    // Two-column fragments carry the stacking class and the media query.
    assert!(first.contains("class=\"mc-col\""));
    assert!(first.contains("@media only screen and (max-width:480px)"));
}

#[test]
fn test_urgency_rendering_respects_threshold() {
    let json = r#"[{"id":"u1","type":"urgency","content":{"threshold":20,"message":"Only {count} tickets left!"}}]"#;
    let document = Document::from_json(json).unwrap();

    let mut options = RenderOptions::default();
    options.show = Some(Show {
        tickets_remaining: Some(25),
        ..Show::default()
    });
    let html = render(&document, &options);
    assert!(!html.contains("tickets left"));

    options.show = Some(Show {
        tickets_remaining: Some(5),
        ..Show::default()
    });
    let html = render(&document, &options);
    assert!(html.contains("Only 5 tickets left!"));

    // No live count at all: the banner stays out.
    let html = render(&document, &RenderOptions::default());
    assert!(!html.contains("tickets left"));
}

#[test]
fn test_recommended_list_orders_matches_first() {
    let json = r#"[{"id":"l1","type":"show-list","content":{"source":"recommended","limit":4}}]"#;
    let document = Document::from_json(json).unwrap();
    let options = RenderOptions {
        upcoming_shows: sample_shows(),
        affinity: Some(Affinity {
            category: Some("comedy".into()),
            venue: None,
        }),
        ..RenderOptions::default()
    };
    let html = render(&document, &options);
    let riot = html.find("Open Mic Riot").unwrap();
    let laughs = html.find("Late Laughs").unwrap();
    let synth = html.find("Synth Night").unwrap();
    assert!(riot < laughs, "tied comedy shows keep their input order");
    assert!(laughs < synth, "the music show ranks after both comedy shows");
}

#[test]
fn test_because_you_liked_requires_affinity() {
    let json = r#"[{"id":"l1","type":"show-list","content":{"source":"because-you-liked","limit":4}}]"#;
    let document = Document::from_json(json).unwrap();

    let without = render(
        &document,
        &RenderOptions {
            upcoming_shows: sample_shows(),
            ..RenderOptions::default()
        },
    );
    assert!(!without.contains("Open Mic Riot"));
    assert!(!without.contains("Because you liked"));

    let with = render(
        &document,
        &RenderOptions {
            upcoming_shows: sample_shows(),
            affinity: Some(Affinity {
                category: Some("comedy".into()),
                venue: None,
            }),
            ..RenderOptions::default()
        },
    );
    assert!(with.contains("Because you liked comedy"));
    assert!(with.contains("Open Mic Riot"));
}

#[test]
fn test_show_list_with_no_shows_renders_nothing() {
    let json = r#"[{"id":"l1","type":"show-list","content":{"source":"upcoming","heading":"Coming up"}}]"#;
    let document = Document::from_json(json).unwrap();
    let html = render(&document, &RenderOptions::default());
    assert!(!html.contains("Coming up"));
}

#[test]
fn test_unresolved_tokens_stay_verbatim_in_output() {
    let json = r#"[{"id":"t1","type":"text","content":{"html":"<p>Hi {{contact.firstName}}</p>"}}]"#;
    let document = Document::from_json(json).unwrap();
    let html = render(&document, &RenderOptions::default());
    assert!(html.contains("Hi {{contact.firstName}}"));
}

#[test]
fn test_missing_image_renders_placeholder_not_broken_tag() {
    let json = r#"[{"id":"i1","type":"image","content":{"url":"","alt":"Poster"}}]"#;
    let document = Document::from_json(json).unwrap();
    let html = render(&document, &RenderOptions::default());
    assert!(!html.contains("<img src=\"\""));
    assert!(html.contains("background-color:#e9e9e9"));
}

#[test]
fn test_footer_is_present_and_last_in_every_output() {
    let documents = vec![
        Document::from_json("").unwrap(),
        Document::from_json(r#"[{"id":"t1","type":"text","content":{"html":"<p>x</p>"}}]"#)
            .unwrap(),
        Document::from_json(r#"[{"id":"m1","type":"mystery","content":{}}]"#).unwrap(),
        Document::from_json(
            r#"{"blocks":[{"id":"s1","type":"strip","content":{"blocks":[
                {"id":"b1","type":"button","content":{"label":"Go","url":""}}
            ]}}],"footer":{"orgName":"Night Owl Tickets"}}"#,
        )
        .unwrap(),
    ];
    for document in documents {
        let html = render(&document, &RenderOptions::default());
        assert!(html.contains("Unsubscribe"));
        assert!(html.contains("Update preferences"));
        // The footer row is the last row opened in the document.
        let last_row = html.rfind("<tr>").unwrap();
        assert!(html[last_row..].contains("Unsubscribe"));
    }
}

#[test]
fn test_footer_links_resolve_with_base_url() {
    let document = Document::from_json("").unwrap();
    let options = RenderOptions {
        contact: Some(Contact {
            email: Some("ada@example.com".into()),
            ..Contact::default()
        }),
        base_url: Some("https://tickets.example.com".into()),
        ..RenderOptions::default()
    };
    let html = render(&document, &options);
    assert!(html.contains("https://tickets.example.com/email/unsubscribe?contact=ada@example.com"));
    // Without a base url the tokens stay verbatim for a downstream merge.
    let bare = render(&document, &RenderOptions::default());
    assert!(bare.contains("{{links.unsubscribeLink}}"));
}

#[test]
fn test_full_width_strip_escapes_content_padding() {
    let json = r##"[{"id":"s1","type":"strip","style":{"fullWidth":true,"backgroundColor":"#000000"},"content":{"blocks":[]}},
        {"id":"t1","type":"text","content":{"html":"<p>x</p>"}}]"##;
    let document = Document::from_json(json).unwrap();
    let html = render(&document, &RenderOptions::default());
    assert!(html.contains("<tr><td style=\"padding:0;\">"));
    assert!(html.contains("<tr><td style=\"padding:12px 24px;\">"));
}

#[test]
fn test_session_preview_uses_template_styles() {
    let mut session = EditingSession::hydrate("").unwrap();
    session
        .apply(Edit::SetTemplateStyle {
            key: "pageBackground".into(),
            value: "#123456".into(),
        })
        .unwrap();
    let html = session.preview(&RenderOptions::default());
    assert!(html.contains("#123456"));
}
