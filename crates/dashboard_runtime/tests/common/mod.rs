#![allow(dead_code)]

use dashboard_contract::{
    CustomWidget, DashboardEvent, InsightWidget, KpiWidget, Layout, LayoutItem, LayoutSection,
    LayoutWidget, ObjRef, Widget, WidgetFilterSettings, WidgetIdentity,
};
use dashboard_runtime::{DashboardRuntime, DashboardSettings, DashboardState};
use std::cell::RefCell;
use std::rc::Rc;

pub fn insight(id: &str, height: Option<u32>) -> LayoutItem {
    LayoutItem::new(
        Widget::Insight(InsightWidget {
            identity: WidgetIdentity::new(id),
            title: id.to_string(),
            description: None,
            insight: ObjRef::identifier(format!("insight-{id}")),
            properties: None,
            drills: Vec::new(),
            filter_settings: WidgetFilterSettings::default(),
        }),
        6,
        height,
    )
}

pub fn kpi(id: &str, height: Option<u32>) -> LayoutItem {
    LayoutItem::new(
        Widget::Kpi(KpiWidget {
            identity: WidgetIdentity::new(id),
            title: id.to_string(),
            metric: ObjRef::identifier(format!("metric-{id}")),
            drills: Vec::new(),
            filter_settings: WidgetFilterSettings::default(),
        }),
        2,
        height,
    )
}

pub fn custom(id: &str, height: Option<u32>) -> LayoutItem {
    LayoutItem::new(
        Widget::Custom(CustomWidget {
            identity: WidgetIdentity::new(id),
            custom_type: "iframe".to_string(),
            payload: serde_json::Value::Null,
        }),
        4,
        height,
    )
}

pub fn container(id: &str, sections: Vec<LayoutSection>) -> LayoutItem {
    LayoutItem::new(
        Widget::Layout(LayoutWidget {
            identity: WidgetIdentity::new(id),
            layout: Layout::new(sections),
        }),
        12,
        None,
    )
}

pub fn section(items: Vec<LayoutItem>) -> LayoutSection {
    LayoutSection::new(items)
}

pub fn runtime_with(sections: Vec<LayoutSection>, settings: DashboardSettings) -> DashboardRuntime {
    DashboardRuntime::new(DashboardState::new(Layout::new(sections), settings))
}

pub fn runtime(sections: Vec<LayoutSection>) -> DashboardRuntime {
    runtime_with(sections, DashboardSettings::default())
}

/// Widget identifiers per top-level section.
pub fn ids(runtime: &DashboardRuntime) -> Vec<Vec<String>> {
    runtime
        .state()
        .layout
        .sections
        .iter()
        .map(|section| {
            section
                .items
                .iter()
                .map(|item| item.widget.identity().identifier.clone())
                .collect()
        })
        .collect()
}

pub fn record(runtime: &mut DashboardRuntime) -> Rc<RefCell<Vec<DashboardEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    runtime.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}
