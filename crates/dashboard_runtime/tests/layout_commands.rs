mod common;

use common::{container, custom, ids, insight, kpi, record, runtime, runtime_with, section};
use dashboard_contract::{
    DashboardCommand, DrillDefinition, DrillOrigin, DrillRemoval, DrillTarget, EventPayload,
    FailureReason, FilterSettingsOperation, ItemDefinition, ItemPath, LayoutCoordinate, ObjRef,
    SectionPath, SectionTarget, Widget, WidgetFilterSettings,
};
use dashboard_runtime::{
    CatalogObject, DashboardIdentity, DashboardRuntime, DashboardSettings, DashboardState, Insight,
    InsightSizingProvider, MoveIndexConvention, SizeInfo, SizeLimits, SizingContext,
    VisualizationType,
};
use pretty_assertions::assert_eq;

fn three_sections() -> DashboardRuntime {
    runtime(vec![
        section(vec![insight("a", Some(12))]),
        section(vec![insight("b", Some(12))]),
        section(vec![insight("c", Some(12))]),
    ])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn moving_first_of_three_sections_to_index_two_puts_it_last() {
    let mut runtime = three_sections();

    let event = runtime
        .dispatch(DashboardCommand::move_layout_section(0usize, 2i64))
        .expect("move section");

    match event.payload {
        EventPayload::LayoutSectionMoved {
            from_index,
            to_index,
            section,
        } => {
            assert_eq!(from_index, SectionPath::flat(0));
            assert_eq!(to_index, SectionPath::flat(2));
            assert_eq!(section.items[0].widget.identity().identifier, "a");
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(
        ids(&runtime),
        vec![strings(&["b"]), strings(&["c"]), strings(&["a"])]
    );
}

#[test]
fn moving_section_to_its_own_position_is_rejected() {
    let mut runtime = three_sections();
    let before = runtime.state().clone();

    let failure = runtime
        .dispatch(DashboardCommand::move_layout_section(1usize, 1i64))
        .expect_err("no-op move");

    assert_eq!(failure.reason, FailureReason::UserError);
    assert!(failure.message.contains("same position"));
    assert_eq!(runtime.state(), &before);
}

#[test]
fn pre_removal_convention_reads_index_as_insertion_point() {
    let settings = DashboardSettings {
        move_index_convention: MoveIndexConvention::PreRemoval,
        ..DashboardSettings::default()
    };
    let mut runtime = runtime_with(
        vec![
            section(vec![insight("a", Some(12))]),
            section(vec![insight("b", Some(12))]),
            section(vec![insight("c", Some(12))]),
        ],
        settings,
    );

    let failure = runtime
        .dispatch(DashboardCommand::move_layout_section(0usize, 1i64))
        .expect_err("insertion point right after the source is a no-op");
    assert!(failure.message.contains("same position"));

    runtime
        .dispatch(DashboardCommand::move_layout_section(0usize, 3i64))
        .expect("move to end");
    assert_eq!(
        ids(&runtime),
        vec![strings(&["b"]), strings(&["c"]), strings(&["a"])]
    );
}

#[test]
fn resize_below_minimum_cites_the_minimum() {
    let mut settings = DashboardSettings::default();
    settings.sizing.insight.min_height = 4;
    let mut runtime = runtime_with(vec![section(vec![insight("a", Some(10))])], settings);

    let failure = runtime
        .dispatch(DashboardCommand::resize_height(0usize, vec![0], 3))
        .expect_err("below minimum");

    assert_eq!(failure.reason, FailureReason::UserError);
    assert!(failure.message.contains("minLimit=4"), "{}", failure.message);
    assert!(failure.message.contains("maxLimit=40"), "{}", failure.message);
    assert_eq!(
        runtime.state().layout.sections[0].items[0].size.xl.grid_height,
        Some(10)
    );
}

#[test]
fn bulk_resize_uses_tightest_limits_and_skips_custom_widgets() {
    let mut runtime = runtime(vec![section(vec![
        insight("a", Some(14)),
        kpi("k", Some(11)),
        custom("x", Some(5)),
    ])]);

    let failure = runtime
        .dispatch(DashboardCommand::resize_height(0usize, vec![0, 1, 2], 11))
        .expect_err("insight minimum is 12");
    assert!(failure.message.contains("minLimit=12"));

    let event = runtime
        .dispatch(DashboardCommand::resize_height(0usize, vec![0, 1, 2], 20))
        .expect("resize");

    assert_eq!(
        event.payload,
        EventPayload::LayoutSectionItemsHeightResized {
            section_index: SectionPath::flat(0),
            item_indexes: vec![0, 1, 2],
            previous_heights: vec![Some(14), Some(11), Some(5)],
            new_height: 20,
        }
    );
    let heights: Vec<_> = runtime.state().layout.sections[0]
        .items
        .iter()
        .map(|item| item.size.xl.grid_height)
        .collect();
    assert_eq!(heights, vec![Some(20), Some(20), Some(5)]);
    assert_eq!(runtime.state().undo.depth(), 0);
}

struct FixedSizing;

impl InsightSizingProvider for FixedSizing {
    fn size_info(&self, _widget: &Widget, _context: &SizingContext<'_>) -> SizeInfo {
        SizeInfo {
            width: SizeLimits {
                min: 3,
                max: 12,
                default: 6,
            },
            height: SizeLimits {
                min: 6,
                max: 9,
                default: 8,
            },
        }
    }
}

#[test]
fn custom_sizing_provider_drives_resize_limits() {
    let state = DashboardState::new(
        dashboard_contract::Layout::new(vec![section(vec![insight("a", Some(8))])]),
        DashboardSettings::default(),
    );
    let mut runtime = DashboardRuntime::with_sizing_provider(state, FixedSizing);

    let failure = runtime
        .dispatch(DashboardCommand::resize_height(0usize, vec![0], 10))
        .expect_err("above maximum");
    assert!(failure.message.contains("minLimit=6"));
    assert!(failure.message.contains("maxLimit=9"));

    let failure = runtime
        .dispatch(DashboardCommand::resize_width(0usize, 0, 2))
        .expect_err("below minimum width");
    assert!(failure.message.contains("minLimit=3"));

    runtime
        .dispatch(DashboardCommand::resize_width(0usize, 0, 4))
        .expect("resize width");
    assert_eq!(runtime.state().layout.sections[0].items[0].size.xl.grid_width, 4);
}

#[test]
fn width_inside_a_container_is_bounded_by_the_container() {
    let mut outer = container("box", vec![section(vec![insight("a", Some(12))])]);
    outer.size.xl.grid_width = 8;
    let mut runtime = runtime(vec![section(vec![outer])]);
    let nested = SectionPath::new(Some(ItemPath::root(0, 0)), 0);

    let failure = runtime
        .dispatch(DashboardCommand::resize_width(nested.clone(), 0, 10))
        .expect_err("wider than container");
    assert!(failure.message.contains("maxLimit=8"));

    runtime
        .dispatch(DashboardCommand::resize_width(nested, 0, 8))
        .expect("fits container");
}

#[test]
fn nested_resize_propagates_only_along_the_ancestor_chain() {
    let mut runtime = runtime(vec![
        section(vec![container(
            "outer",
            vec![section(vec![container(
                "inner",
                vec![section(vec![insight("a", Some(12))])],
            )])],
        )]),
        section(vec![container(
            "other",
            vec![section(vec![insight("b", Some(12))])],
        )]),
    ]);
    let inner = ItemPath::new(vec![LayoutCoordinate::new(0, 0), LayoutCoordinate::new(0, 0)]);
    let outer = ItemPath::root(0, 0);

    runtime
        .dispatch(DashboardCommand::resize_height(
            SectionPath::new(Some(inner.clone()), 0),
            vec![0],
            30,
        ))
        .expect("resize nested item");

    let reports = runtime.last_propagation();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].visited, vec![inner.clone(), outer.clone()]);
    assert_eq!(reports[0].updated, vec![inner, outer]);
    assert_eq!(
        runtime.state().layout.sections[0].items[0].size.xl.grid_height,
        Some(30)
    );
    assert_eq!(
        runtime.state().layout.sections[1].items[0].size.xl.grid_height,
        None
    );
}

#[test]
fn moving_a_section_between_containers_propagates_both_chains() {
    let mut runtime = runtime(vec![
        section(vec![container(
            "p1",
            vec![
                section(vec![insight("a", Some(12))]),
                section(vec![insight("b", Some(20))]),
            ],
        )]),
        section(vec![container(
            "p2",
            vec![section(vec![insight("c", Some(12))])],
        )]),
        section(vec![container(
            "other",
            vec![section(vec![insight("d", Some(12))])],
        )]),
    ]);
    let p1 = ItemPath::root(0, 0);
    let p2 = ItemPath::root(1, 0);

    runtime
        .dispatch(DashboardCommand::move_layout_section(
            SectionPath::new(Some(p1.clone()), 1),
            SectionTarget::nested(p2.clone(), -1),
        ))
        .expect("move section into the other container");

    let visited: Vec<_> = runtime
        .last_propagation()
        .iter()
        .map(|report| report.visited.clone())
        .collect();
    assert_eq!(visited, vec![vec![p1.clone()], vec![p2.clone()]]);
    let height = |section: usize| {
        runtime.state().layout.sections[section].items[0]
            .size
            .xl
            .grid_height
    };
    assert_eq!(height(0), Some(12));
    assert_eq!(height(1), Some(32));
    assert_eq!(height(2), None);
}

#[test]
fn results_and_failures_echo_the_correlation_id() {
    let mut runtime = three_sections();
    let events = record(&mut runtime);

    runtime
        .dispatch(DashboardCommand::move_layout_section(2usize, 0i64).with_correlation_id("ok-1"))
        .expect("move");
    runtime
        .dispatch(DashboardCommand::remove_layout_section(8usize, None).with_correlation_id("bad-1"))
        .expect_err("missing section");

    let echoed: Vec<_> = events
        .borrow()
        .iter()
        .map(|event| (event.event_type(), event.correlation_id.clone()))
        .collect();
    let id = |value: &str| Some(value.to_string());
    assert_eq!(
        echoed,
        vec![
            ("EVT.COMMAND.STARTED", id("ok-1")),
            ("EVT.LAYOUT.SECTION_MOVED", id("ok-1")),
            ("EVT.LAYOUT.CHANGED", id("ok-1")),
            ("EVT.COMMAND.STARTED", id("bad-1")),
            ("EVT.COMMAND.FAILED", id("bad-1")),
        ]
    );
}

#[test]
fn stashed_section_items_can_be_restored_once() {
    let mut runtime = three_sections();

    runtime
        .dispatch(DashboardCommand::remove_layout_section(
            1usize,
            Some("parked".to_string()),
        ))
        .expect("remove with stash");
    let event = runtime
        .dispatch(DashboardCommand::add_layout_section(
            -1i64,
            None,
            vec![ItemDefinition::Stash("parked".to_string())],
        ))
        .expect("restore stash");

    match event.payload {
        EventPayload::LayoutSectionAdded {
            index,
            stashes_used,
            ..
        } => {
            assert_eq!(index, SectionPath::flat(2));
            assert_eq!(stashes_used, strings(&["parked"]));
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(
        ids(&runtime),
        vec![strings(&["a"]), strings(&["c"]), strings(&["b"])]
    );
    assert!(runtime.state().stash.is_empty());

    let failure = runtime
        .dispatch(DashboardCommand::add_section_items(
            0usize,
            0,
            vec![ItemDefinition::Stash("parked".to_string())],
        ))
        .expect_err("stash consumed");
    assert!(failure.message.contains("parked"));
}

#[test]
fn items_move_between_sections_and_eager_removal_drops_empty_sections() {
    let mut runtime = runtime(vec![
        section(vec![insight("a", Some(12)), insight("b", Some(12))]),
        section(vec![insight("c", Some(12))]),
    ]);

    let event = runtime
        .dispatch(DashboardCommand::move_section_item(0usize, 0, 1usize, -1))
        .expect("move item");
    assert_eq!(
        event.payload,
        EventPayload::LayoutSectionItemMoved {
            item: insight("a", Some(12)),
            from_index: ItemPath::root(0, 0),
            to_index: ItemPath::root(1, 1),
        }
    );
    assert_eq!(ids(&runtime), vec![strings(&["b"]), strings(&["c", "a"])]);

    let failure = runtime
        .dispatch(DashboardCommand::move_section_item(1usize, 1, 1usize, 1))
        .expect_err("same position");
    assert!(failure.message.contains("same position"));

    let event = runtime
        .dispatch(DashboardCommand::remove_section_item(0usize, 0, None, true))
        .expect("remove last item");
    match event.payload {
        EventPayload::LayoutSectionItemRemoved {
            section_removed, ..
        } => assert!(section_removed.is_some()),
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(ids(&runtime), vec![strings(&["c", "a"])]);
}

#[test]
fn replacing_an_item_from_a_stash_parks_the_old_item_and_can_be_undone() {
    let mut runtime = runtime(vec![
        section(vec![insight("a", Some(12)), insight("b", Some(12))]),
        section(vec![insight("c", Some(12))]),
    ]);
    runtime
        .dispatch(DashboardCommand::remove_layout_section(
            1usize,
            Some("parked".to_string()),
        ))
        .expect("remove with stash");
    let before = runtime.state().clone();

    let event = runtime
        .dispatch(DashboardCommand::replace_section_item(
            0usize,
            1,
            ItemDefinition::Stash("parked".to_string()),
            Some("parked".to_string()),
        ))
        .expect("replace item");

    assert_eq!(
        event.payload,
        EventPayload::LayoutSectionItemReplaced {
            item_index: ItemPath::root(0, 1),
            previous_item: insight("b", Some(12)),
            items: vec![insight("c", Some(12))],
            stashes_used: strings(&["parked"]),
            stash_identifier: Some("parked".to_string()),
        }
    );
    assert_eq!(ids(&runtime), vec![strings(&["a", "c"])]);
    assert_eq!(
        runtime.state().stash.get("parked"),
        Some(&vec![insight("b", Some(12))])
    );

    let failure = runtime
        .dispatch(DashboardCommand::replace_section_item(
            0usize,
            5,
            ItemDefinition::Item(insight("z", None)),
            None,
        ))
        .expect_err("no item at index 5");
    assert!(failure.message.contains("non-existing item"));

    runtime
        .dispatch(DashboardCommand::undo_layout_changes(1))
        .expect("undo replace");
    assert_eq!(runtime.state().layout, before.layout);
    assert_eq!(runtime.state().stash, before.stash);
}

#[test]
fn undo_restores_layout_before_the_last_undoable_commands() {
    let mut runtime = three_sections();
    let original = runtime.state().layout.clone();

    runtime
        .dispatch(DashboardCommand::remove_layout_section(0usize, None))
        .expect("remove");
    runtime
        .dispatch(DashboardCommand::resize_height(0usize, vec![0], 20))
        .expect("resize is not undoable");
    runtime
        .dispatch(DashboardCommand::move_layout_section(0usize, 1i64))
        .expect("move");
    assert_eq!(runtime.state().undo.depth(), 2);

    let failure = runtime
        .dispatch(DashboardCommand::undo_layout_changes(3))
        .expect_err("only two recorded");
    assert!(failure.message.contains("only 2 recorded"));

    let event = runtime
        .dispatch(DashboardCommand::undo_layout_changes(2))
        .expect("undo");

    assert_eq!(
        event.payload,
        EventPayload::LayoutChangesUndone {
            undone: strings(&["CMD.LAYOUT.MOVE_SECTION", "CMD.LAYOUT.REMOVE_SECTION"]),
        }
    );
    assert_eq!(runtime.state().layout, original);
}

fn drill(origin: &str, target: DrillTarget) -> DrillDefinition {
    DrillDefinition::new(
        DrillOrigin::FromMeasure {
            local_identifier: origin.to_string(),
        },
        target,
    )
}

fn custom_url(origin: &str) -> DrillDefinition {
    drill(
        origin,
        DrillTarget::ToCustomUrl {
            url: format!("https://example.com/{origin}"),
        },
    )
}

fn drilled_runtime(drills: Vec<DrillDefinition>) -> DashboardRuntime {
    let mut item = insight("w", Some(12));
    if let Widget::Insight(widget) = &mut item.widget {
        widget.drills = drills;
    }
    let mut source = Insight::new("insight-w", VisualizationType::Column);
    source.measures = strings(&["m1", "m2", "m3"]);
    let target = Insight::new("insight-target", VisualizationType::Table);
    let state = DashboardState::new(
        dashboard_contract::Layout::new(vec![section(vec![item])]),
        DashboardSettings::default(),
    )
    .with_insights(vec![source, target])
    .with_dashboards(vec![DashboardIdentity {
        identifier: "sales".to_string(),
        uri: "/dashboards/sales".to_string(),
        title: "Sales".to_string(),
    }]);
    DashboardRuntime::new(state)
}

fn removed_origins(event: &dashboard_contract::DashboardEvent) -> Vec<String> {
    match &event.payload {
        EventPayload::InsightWidgetDrillsRemoved { removed, .. } => removed
            .iter()
            .map(|drill| drill.origin_id().to_string())
            .collect(),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn drill_removal_reports_only_existing_definitions() {
    let mut runtime = drilled_runtime(vec![custom_url("m1"), custom_url("m3")]);
    let widget = ObjRef::identifier("w");
    let remove = |origins: &[&str]| {
        DashboardCommand::remove_drills_for_insight_widget(
            widget.clone(),
            DrillRemoval::from_origins(origins.iter().copied()),
        )
    };

    let first = runtime.dispatch(remove(&["m1", "m2"])).expect("remove");
    let second = runtime.dispatch(remove(&["m1", "m2"])).expect("remove again");

    assert_eq!(removed_origins(&first), strings(&["m1"]));
    assert!(removed_origins(&second).is_empty());

    let all = runtime.dispatch(remove(&["*"])).expect("remove all");
    assert_eq!(removed_origins(&all), strings(&["m3"]));
}

#[test]
fn modifying_drills_normalizes_targets_and_reports_replacements() {
    let mut runtime = drilled_runtime(vec![custom_url("m1")]);
    let widget = ObjRef::identifier("w");

    let event = runtime
        .dispatch(DashboardCommand::modify_drills_for_insight_widget(
            widget.clone(),
            vec![
                drill(
                    "m1",
                    DrillTarget::ToInsight {
                        insight: ObjRef::uri("/insights/insight-target"),
                    },
                ),
                drill(
                    "m2",
                    DrillTarget::ToDashboard {
                        dashboard: Some(ObjRef::identifier("sales")),
                    },
                ),
            ],
        ))
        .expect("modify drills");

    let normalized = drill(
        "m1",
        DrillTarget::ToInsight {
            insight: ObjRef::identifier("insight-target"),
        },
    );
    match event.payload {
        EventPayload::InsightWidgetDrillsModified {
            added,
            updated,
            replaced,
            ..
        } => {
            assert_eq!(updated, vec![normalized]);
            assert_eq!(replaced, vec![custom_url("m1")]);
            assert_eq!(added.len(), 1);
            assert_eq!(added[0].origin_id(), "m2");
        }
        other => panic!("unexpected payload {other:?}"),
    }

    let failure = runtime
        .dispatch(DashboardCommand::modify_drills_for_insight_widget(
            widget.clone(),
            vec![custom_url("unknown")],
        ))
        .expect_err("origin not in insight");
    assert!(failure.message.contains("unknown"));

    let failure = runtime
        .dispatch(DashboardCommand::modify_drills_for_insight_widget(
            widget,
            vec![drill(
                "m3",
                DrillTarget::ToDashboard {
                    dashboard: Some(ObjRef::identifier("secret")),
                },
            )],
        ))
        .expect_err("inaccessible dashboard");
    assert!(failure.message.contains("not accessible"));
}

#[test]
fn dashboard_drill_targets_given_by_uri_are_stored_by_identifier() {
    let mut runtime = drilled_runtime(Vec::new());
    let by_identifier = drill(
        "m2",
        DrillTarget::ToDashboard {
            dashboard: Some(ObjRef::identifier("sales")),
        },
    );

    let event = runtime
        .dispatch(DashboardCommand::modify_drills_for_insight_widget(
            ObjRef::identifier("w"),
            vec![drill(
                "m2",
                DrillTarget::ToDashboard {
                    dashboard: Some(ObjRef::uri("/dashboards/sales")),
                },
            )],
        ))
        .expect("modify drills");

    match event.payload {
        EventPayload::InsightWidgetDrillsModified { added, .. } => {
            assert_eq!(added, vec![by_identifier.clone()]);
        }
        other => panic!("unexpected payload {other:?}"),
    }
    match &runtime.state().layout.sections[0].items[0].widget {
        Widget::Insight(widget) => assert_eq!(widget.drills, vec![by_identifier]),
        other => panic!("unexpected widget {other:?}"),
    }
}

#[test]
fn wildcard_origin_in_a_json_command_removes_every_drill() {
    let mut runtime = drilled_runtime(vec![custom_url("m1"), custom_url("m3")]);
    let command: DashboardCommand = serde_json::from_value(serde_json::json!({
        "payload": {
            "type": "remove_drills_for_insight_widget",
            "widget_ref": { "identifier": "w" },
            "origins": { "origins": ["m9", "*"] }
        }
    }))
    .expect("decode command");

    let event = runtime.dispatch(command).expect("remove drills");

    assert_eq!(removed_origins(&event), strings(&["m1", "m3"]));
    match &runtime.state().layout.sections[0].items[0].widget {
        Widget::Insight(widget) => assert!(widget.drills.is_empty()),
        other => panic!("unexpected widget {other:?}"),
    }
}

fn filtered_runtime() -> DashboardRuntime {
    let state = DashboardState::new(
        dashboard_contract::Layout::new(vec![section(vec![
            insight("w", Some(12)),
            kpi("k", None),
            custom("x", None),
        ])]),
        DashboardSettings::default(),
    )
    .with_filter_catalog(
        vec![CatalogObject::new("created", "/datasets/created")],
        vec![
            CatalogObject::new("region", "/displayForms/region"),
            CatalogObject::new("product", "/displayForms/product"),
        ],
    );
    DashboardRuntime::new(state)
}

fn filter_settings(date_dataset: Option<&str>, ignored: &[&str]) -> WidgetFilterSettings {
    WidgetFilterSettings {
        date_dataset: date_dataset.map(ObjRef::identifier),
        ignored_attribute_filters: ignored.iter().map(|id| ObjRef::identifier(*id)).collect(),
    }
}

#[test]
fn insight_filter_settings_are_stored_with_canonical_references() {
    let mut runtime = filtered_runtime();
    let widget = ObjRef::identifier("w");

    let event = runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            widget.clone(),
            FilterSettingsOperation::EnableDateFilter {
                date_dataset: ObjRef::uri("/datasets/created"),
            },
        ))
        .expect("enable date filter");
    assert_eq!(
        event.payload,
        EventPayload::WidgetFilterSettingsChanged {
            widget_ref: widget.clone(),
            previous_settings: WidgetFilterSettings::default(),
            settings: filter_settings(Some("created"), &[]),
        }
    );

    runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            widget.clone(),
            FilterSettingsOperation::IgnoreAttributeFilters {
                display_forms: vec![
                    ObjRef::uri("/displayForms/region"),
                    ObjRef::identifier("product"),
                ],
            },
        ))
        .expect("ignore filters");
    let event = runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            widget.clone(),
            FilterSettingsOperation::UnignoreAttributeFilters {
                display_forms: vec![ObjRef::identifier("region")],
            },
        ))
        .expect("unignore filter");
    match event.payload {
        EventPayload::WidgetFilterSettingsChanged { settings, .. } => {
            assert_eq!(settings, filter_settings(Some("created"), &["product"]));
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(
        runtime.state().layout.sections[0].items[0].widget.filter_settings(),
        Some(&filter_settings(Some("created"), &["product"]))
    );
    assert_eq!(runtime.state().undo.depth(), 3);
}

#[test]
fn unknown_filter_references_are_user_errors() {
    let mut runtime = filtered_runtime();
    let before = runtime.state().clone();

    let failure = runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            ObjRef::identifier("w"),
            FilterSettingsOperation::EnableDateFilter {
                date_dataset: ObjRef::identifier("closed"),
            },
        ))
        .expect_err("unknown dataset");
    assert_eq!(failure.reason, FailureReason::UserError);
    assert!(failure.message.contains("closed"), "{}", failure.message);

    let failure = runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            ObjRef::identifier("w"),
            FilterSettingsOperation::IgnoreAttributeFilters {
                display_forms: vec![ObjRef::identifier("country")],
            },
        ))
        .expect_err("unknown display form");
    assert_eq!(failure.reason, FailureReason::UserError);
    assert_eq!(runtime.state(), &before);
}

#[test]
fn kpi_filter_settings_go_through_the_kpi_command_only() {
    let mut runtime = filtered_runtime();

    runtime
        .dispatch(DashboardCommand::change_kpi_widget_filter_settings(
            ObjRef::identifier("k"),
            FilterSettingsOperation::ReplaceSettings {
                date_dataset: Some(ObjRef::identifier("created")),
                ignored_attribute_filters: vec![ObjRef::identifier("region")],
            },
        ))
        .expect("replace kpi settings");
    runtime
        .dispatch(DashboardCommand::change_kpi_widget_filter_settings(
            ObjRef::identifier("k"),
            FilterSettingsOperation::DisableDateFilter,
        ))
        .expect("disable date filter");
    assert_eq!(
        runtime.state().layout.sections[0].items[1].widget.filter_settings(),
        Some(&filter_settings(None, &["region"]))
    );

    let failure = runtime
        .dispatch(DashboardCommand::change_insight_widget_filter_settings(
            ObjRef::identifier("k"),
            FilterSettingsOperation::DisableDateFilter,
        ))
        .expect_err("kpi through the insight command");
    assert!(failure.message.contains("expected an insight widget"));

    let failure = runtime
        .dispatch(DashboardCommand::change_kpi_widget_filter_settings(
            ObjRef::identifier("x"),
            FilterSettingsOperation::DisableDateFilter,
        ))
        .expect_err("custom widget has no filter settings");
    assert_eq!(failure.reason, FailureReason::UserError);
}

#[test]
fn widget_header_and_vis_properties_keep_previous_values() {
    let mut runtime = runtime(vec![section(vec![insight("w", Some(12)), kpi("k", None)])]);

    let event = runtime
        .dispatch(DashboardCommand::change_widget_header(
            ObjRef::identifier("k"),
            "Revenue",
        ))
        .expect("rename kpi");
    assert_eq!(
        event.payload,
        EventPayload::WidgetHeaderChanged {
            widget_ref: ObjRef::identifier("k"),
            previous_title: "k".to_string(),
            title: "Revenue".to_string(),
        }
    );

    let properties = serde_json::json!({ "legend": { "position": "bottom" } });
    let event = runtime
        .dispatch(DashboardCommand::change_insight_widget_vis_properties(
            ObjRef::identifier("w"),
            Some(properties.clone()),
        ))
        .expect("change properties");
    assert_eq!(
        event.payload,
        EventPayload::InsightWidgetVisPropertiesChanged {
            widget_ref: ObjRef::identifier("w"),
            previous_properties: None,
            properties: Some(properties),
        }
    );

    let failure = runtime
        .dispatch(DashboardCommand::change_insight_widget_vis_properties(
            ObjRef::identifier("k"),
            None,
        ))
        .expect_err("kpi has no vis properties");
    assert_eq!(failure.reason, FailureReason::UserError);
}
