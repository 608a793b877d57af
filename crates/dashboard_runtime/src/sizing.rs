//! Size constraints of widgets at a responsive breakpoint.

use dashboard_contract::{ScreenSize, Widget};

use crate::model::{Insight, VisualizationType};
use crate::propagation::required_height;
use crate::settings::{DashboardSettings, WidgetSizeDefaults};

/// Inclusive bounds and default of one dimension, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl SizeLimits {
    /// Limits that admit exactly one value.
    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
            default: value,
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeInfo {
    pub width: SizeLimits,
    pub height: SizeLimits,
}

/// Height range shared by several items: the tightest min and max of the group.
///
/// Returns `None` for an empty group. The range may be empty (`min > max`) when the items cannot
/// share a height.
pub fn combined_height_limits(infos: impl IntoIterator<Item = SizeInfo>) -> Option<SizeLimits> {
    infos.into_iter().map(|info| info.height).reduce(|acc, next| SizeLimits {
        min: acc.min.max(next.min),
        max: acc.max.min(next.max),
        default: acc.default.max(next.default),
    })
}

/// Read-only view of the state sizing depends on.
#[derive(Debug, Clone, Copy)]
pub struct SizingContext<'a> {
    /// Breakpoint the dashboard renders at. [`DefaultSizingProvider`] ignores it; custom
    /// providers may scale their limits by it.
    pub screen: ScreenSize,
    pub settings: &'a DashboardSettings,
    pub insights: &'a [Insight],
}

impl<'a> SizingContext<'a> {
    pub fn new(screen: ScreenSize, settings: &'a DashboardSettings, insights: &'a [Insight]) -> Self {
        Self {
            screen,
            settings,
            insights,
        }
    }

    pub fn insight_for(&self, widget: &Widget) -> Option<&'a Insight> {
        match widget {
            Widget::Insight(widget) => self
                .insights
                .iter()
                .find(|insight| insight.matches(&widget.insight)),
            _ => None,
        }
    }
}

/// Source of widget size constraints.
///
/// Implementations may consult insight metadata through the [`SizingContext`]; the runtime only
/// consumes the returned limits.
pub trait InsightSizingProvider {
    fn size_info(&self, widget: &Widget, context: &SizingContext<'_>) -> SizeInfo;
}

/// Provider driven by [`crate::settings::SizingDefaults`].
///
/// Tables need room for their rows, headlines use their own defaults, and nested layouts are
/// pinned to the height their content requires.
///
/// Limits are in `xl` grid units, the only size the layout stores, so they are the same at every
/// breakpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSizingProvider;

impl InsightSizingProvider for DefaultSizingProvider {
    fn size_info(&self, widget: &Widget, context: &SizingContext<'_>) -> SizeInfo {
        let settings = context.settings;
        let sizing = &settings.sizing;
        match widget {
            Widget::Layout(container) => {
                let height = required_height(&container.layout, self, context);
                SizeInfo {
                    width: SizeLimits {
                        min: 1,
                        max: settings.grid_columns,
                        default: settings.grid_columns,
                    },
                    height: SizeLimits::fixed(height),
                }
            }
            Widget::Insight(_) => match context.insight_for(widget) {
                Some(insight) => insight_size(insight, settings),
                None => from_defaults(sizing.insight, settings.grid_columns),
            },
            other => from_defaults(sizing.for_kind(other.kind()), settings.grid_columns),
        }
    }
}

fn insight_size(insight: &Insight, settings: &DashboardSettings) -> SizeInfo {
    let sizing = &settings.sizing;
    match (insight.visualization_type, insight.row_count) {
        (VisualizationType::Headline, _) => from_defaults(sizing.headline, settings.grid_columns),
        (VisualizationType::Table, Some(rows)) => {
            let mut info = from_defaults(sizing.insight, settings.grid_columns);
            let per_grid_row = sizing.table_rows_per_grid_row.max(1);
            // One extra row for the table header.
            let needed = rows.div_ceil(per_grid_row) + 1;
            info.height.min = needed.clamp(sizing.insight.min_height, sizing.insight.max_height);
            info.height.default = info.height.default.max(info.height.min);
            info
        }
        _ => from_defaults(sizing.insight, settings.grid_columns),
    }
}

fn from_defaults(defaults: WidgetSizeDefaults, grid_columns: u32) -> SizeInfo {
    SizeInfo {
        width: SizeLimits {
            min: defaults.min_width,
            max: grid_columns,
            default: defaults.default_width,
        },
        height: SizeLimits {
            min: defaults.min_height,
            max: defaults.max_height,
            default: defaults.default_height,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{container, insight_item, kpi_item, section};

    fn table(rows: u32) -> Insight {
        let mut insight = Insight::new("insight-grid", VisualizationType::Table);
        insight.row_count = Some(rows);
        insight
    }

    #[test]
    fn table_minimum_grows_with_row_count() {
        let settings = DashboardSettings::default();
        let widget = crate::test_support::insight_item_for("grid", "insight-grid", None).widget;

        let small = [table(4)];
        let large = [table(60)];
        let huge = [table(10_000)];
        let limits = |insights: &[Insight]| {
            DefaultSizingProvider
                .size_info(&widget, &SizingContext::new(ScreenSize::Xl, &settings, insights))
                .height
        };

        assert_eq!(limits(&small).min, 12);
        assert_eq!(limits(&large).min, 31);
        assert_eq!(limits(&huge).min, 40);
        assert_eq!(limits(&large).default, 31);
    }

    #[test]
    fn default_limits_do_not_depend_on_the_breakpoint() {
        let settings = DashboardSettings::default();
        let nested = container("box", vec![section(vec![insight_item("a", Some(14))])]).widget;
        let at = |screen: ScreenSize, widget: &Widget| {
            DefaultSizingProvider.size_info(widget, &SizingContext::new(screen, &settings, &[]))
        };

        for widget in [insight_item("a", None).widget, kpi_item("k", None).widget, nested] {
            assert_eq!(at(ScreenSize::Md, &widget), at(ScreenSize::Xl, &widget));
            assert_eq!(at(ScreenSize::Xs, &widget), at(ScreenSize::Xl, &widget));
        }
    }

    #[test]
    fn unknown_insight_and_kpi_use_kind_defaults() {
        let settings = DashboardSettings::default();
        let context = SizingContext::new(ScreenSize::Xl, &settings, &[]);

        let insight = DefaultSizingProvider.size_info(&insight_item("a", None).widget, &context);
        let kpi = DefaultSizingProvider.size_info(&kpi_item("k", None).widget, &context);

        assert_eq!(insight.height.min, settings.sizing.insight.min_height);
        assert_eq!(kpi.height.min, settings.sizing.kpi.min_height);
        assert_eq!(kpi.width.max, settings.grid_columns);
    }

    #[test]
    fn combined_limits_take_the_tightest_bounds() {
        let settings = DashboardSettings::default();
        let context = SizingContext::new(ScreenSize::Xl, &settings, &[]);
        let infos = [insight_item("a", None), kpi_item("k", None)]
            .map(|item| DefaultSizingProvider.size_info(&item.widget, &context));

        let limits = combined_height_limits(infos).expect("non-empty group");

        assert_eq!(limits.min, settings.sizing.insight.min_height);
        assert_eq!(limits.max, 40);
        assert_eq!(combined_height_limits(Vec::new()), None);
    }

    #[test]
    fn nested_layout_height_is_pinned_to_content() {
        let settings = DashboardSettings::default();
        let context = SizingContext::new(ScreenSize::Xl, &settings, &[]);
        let item = container(
            "box",
            vec![
                section(vec![insight_item("a", Some(10)), insight_item("b", Some(15))]),
                section(vec![insight_item("c", Some(5))]),
            ],
        );

        let info = DefaultSizingProvider.size_info(&item.widget, &context);

        assert_eq!(info.height, SizeLimits::fixed(20));
    }
}
