//! Layout builders shared by unit tests.

use dashboard_contract::{
    CustomWidget, InsightWidget, ItemPath, KpiWidget, Layout, LayoutCoordinate, LayoutItem,
    LayoutSection, LayoutWidget, ObjRef, Widget, WidgetFilterSettings, WidgetIdentity,
};

pub fn path(steps: &[(usize, usize)]) -> ItemPath {
    ItemPath::new(
        steps
            .iter()
            .map(|(section, item)| LayoutCoordinate::new(*section, *item))
            .collect(),
    )
}

pub fn layout_of(sections: Vec<LayoutSection>) -> Layout {
    Layout::new(sections)
}

pub fn section(items: Vec<LayoutItem>) -> LayoutSection {
    LayoutSection::new(items)
}

/// Insight widget `id` rendering insight `insight-<id>`.
pub fn insight_item(id: &str, height: Option<u32>) -> LayoutItem {
    insight_item_for(id, &format!("insight-{id}"), height)
}

pub fn insight_item_for(id: &str, insight: &str, height: Option<u32>) -> LayoutItem {
    LayoutItem::new(
        Widget::Insight(InsightWidget {
            identity: WidgetIdentity::new(id),
            title: id.to_string(),
            description: None,
            insight: ObjRef::identifier(insight),
            properties: None,
            drills: Vec::new(),
            filter_settings: WidgetFilterSettings::default(),
        }),
        6,
        height,
    )
}

pub fn kpi_item(id: &str, height: Option<u32>) -> LayoutItem {
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

pub fn custom_item(id: &str, height: Option<u32>) -> LayoutItem {
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

pub fn widget_id(item: &LayoutItem) -> &str {
    &item.widget.identity().identifier
}
