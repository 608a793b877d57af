use std::collections::BTreeSet;

use serde_json::Value;

use dashboard_contract::{
    CommandFailed, DashboardCommand, DrillDefinition, DrillOrigin, DrillRemoval, DrillTarget,
    FilterSettingsOperation, InsightWidget, ItemPath, ObjRef, Widget, WidgetFilterSettings,
    WidgetKind,
};

use super::{HandlerContext, HandlerResult};
use crate::emitters;
use crate::emitters::invalid_arguments;
use crate::model::{CatalogObject, DashboardState, Insight};
use crate::reducer::{LayoutAction, WidgetAction};
use crate::selectors::{
    select_accessible_dashboards, select_attribute_filters, select_date_datasets,
    select_insight_by_ref, select_widget_by_ref,
};

fn insight_widget<'s>(
    state: &'s DashboardState,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
) -> Result<(ItemPath, &'s InsightWidget), CommandFailed> {
    match select_widget_by_ref(state, widget_ref) {
        Some((path, Widget::Insight(widget))) => Ok((path, widget)),
        Some((_, other)) => Err(invalid_arguments(
            command,
            format!(
                "Widget {widget_ref} is a {} widget, expected an insight widget.",
                other.kind().label()
            ),
        )),
        None => Err(invalid_arguments(
            command,
            format!("Cannot find insight widget {widget_ref}."),
        )),
    }
}

pub(super) fn change_insight_widget_vis_properties(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    properties: Option<&Value>,
) -> HandlerResult {
    let (path, previous_properties) = ctx.select(|state| {
        insight_widget(state, command, widget_ref)
            .map(|(path, widget)| (path, widget.properties.clone()))
    })?;

    let properties = properties.cloned();
    ctx.put(
        command,
        LayoutAction::UpdateWidget {
            path,
            action: WidgetAction::SetVisProperties {
                properties: properties.clone(),
            },
        },
    )?;
    Ok(emitters::insight_widget_vis_properties_changed(
        command,
        widget_ref.clone(),
        previous_properties,
        properties,
    ))
}

pub(super) fn change_widget_header(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    title: &str,
) -> HandlerResult {
    let (path, previous_title) = ctx.select(|state| match select_widget_by_ref(state, widget_ref) {
        Some((path, Widget::Insight(widget))) => Ok((path, widget.title.clone())),
        Some((path, Widget::Kpi(widget))) => Ok((path, widget.title.clone())),
        Some((_, other)) => Err(invalid_arguments(
            command,
            format!(
                "Widget {widget_ref} is a {} widget and has no header.",
                other.kind().label()
            ),
        )),
        None => Err(invalid_arguments(
            command,
            format!("Cannot find widget {widget_ref}."),
        )),
    })?;

    ctx.put(
        command,
        LayoutAction::UpdateWidget {
            path,
            action: WidgetAction::SetTitle {
                title: title.to_string(),
            },
        },
    )?;
    Ok(emitters::widget_header_changed(
        command,
        widget_ref.clone(),
        previous_title,
        title.to_string(),
    ))
}

pub(super) fn modify_drills_for_insight_widget(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    drills: &[DrillDefinition],
) -> HandlerResult {
    if drills.is_empty() {
        return Err(invalid_arguments(
            command,
            "Attempting to modify drills with an empty drill list.",
        ));
    }
    let mut origins = BTreeSet::new();
    if let Some(duplicate) = drills.iter().find(|drill| !origins.insert(drill.origin_id())) {
        return Err(invalid_arguments(
            command,
            format!(
                "Drill origin {} is defined more than once.",
                duplicate.origin_id()
            ),
        ));
    }

    let (path, existing, normalized) = ctx.select(|state| -> Result<_, CommandFailed> {
        let (path, widget) = insight_widget(state, command, widget_ref)?;
        let Some(insight) = select_insight_by_ref(state, &widget.insight) else {
            return Err(invalid_arguments(
                command,
                format!(
                    "Insight {} of widget {widget_ref} is not loaded.",
                    widget.insight
                ),
            ));
        };
        let normalized = drills
            .iter()
            .map(|drill| validate_drill(state, command, insight, drill))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((path, widget.drills.clone(), normalized))
    })?;

    let mut next = existing;
    let mut added = Vec::new();
    let mut updated = Vec::new();
    let mut replaced = Vec::new();
    for drill in normalized {
        match next
            .iter_mut()
            .find(|current| current.origin_id() == drill.origin_id())
        {
            Some(current) => {
                replaced.push(std::mem::replace(current, drill.clone()));
                updated.push(drill);
            }
            None => {
                next.push(drill.clone());
                added.push(drill);
            }
        }
    }

    ctx.put(
        command,
        LayoutAction::UpdateWidget {
            path,
            action: WidgetAction::SetDrills { drills: next },
        },
    )?;
    Ok(emitters::insight_widget_drills_modified(
        command,
        widget_ref.clone(),
        added,
        updated,
        replaced,
    ))
}

/// Checks a drill against the widget's insight and normalizes its target reference.
fn validate_drill(
    state: &DashboardState,
    command: &DashboardCommand,
    insight: &Insight,
    drill: &DrillDefinition,
) -> Result<DrillDefinition, CommandFailed> {
    let origin_known = match &drill.origin {
        DrillOrigin::FromMeasure { local_identifier } => {
            insight.measures.contains(local_identifier)
        }
        DrillOrigin::FromAttribute { local_identifier } => {
            insight.attributes.contains(local_identifier)
        }
    };
    if !origin_known {
        return Err(invalid_arguments(
            command,
            format!(
                "Drill origin {} does not exist in insight {}.",
                drill.origin_id(),
                insight.identifier
            ),
        ));
    }

    let target = match &drill.target {
        DrillTarget::ToInsight { insight: target } => {
            let Some(found) = select_insight_by_ref(state, target) else {
                return Err(invalid_arguments(
                    command,
                    format!("Drill target insight {target} does not exist."),
                ));
            };
            DrillTarget::ToInsight {
                insight: found.reference(),
            }
        }
        DrillTarget::ToDashboard {
            dashboard: Some(target),
        } => {
            let Some(found) = select_accessible_dashboards(state)
                .iter()
                .find(|dashboard| dashboard.matches(target))
            else {
                return Err(invalid_arguments(
                    command,
                    format!("Drill target dashboard {target} is not accessible."),
                ));
            };
            DrillTarget::ToDashboard {
                dashboard: Some(found.reference()),
            }
        }
        DrillTarget::ToCustomUrl { url } if url.trim().is_empty() => {
            return Err(invalid_arguments(
                command,
                format!("Drill from {} has an empty custom URL.", drill.origin_id()),
            ));
        }
        other => other.clone(),
    };
    Ok(DrillDefinition::new(drill.origin.clone(), target))
}

pub(super) fn remove_drills_for_insight_widget(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    origins: &DrillRemoval,
) -> HandlerResult {
    let (path, existing) = ctx.select(|state| {
        insight_widget(state, command, widget_ref)
            .map(|(path, widget)| (path, widget.drills.clone()))
    })?;

    let (removed, kept): (Vec<_>, Vec<_>) =
        existing.into_iter().partition(|drill| origins.selects(drill));
    if !removed.is_empty() {
        ctx.put(
            command,
            LayoutAction::UpdateWidget {
                path,
                action: WidgetAction::SetDrills { drills: kept },
            },
        )?;
    }
    Ok(emitters::insight_widget_drills_removed(
        command,
        widget_ref.clone(),
        removed,
    ))
}

/// Resolves an insight or KPI widget of the requested kind and returns its filter settings.
fn filtered_widget<'s>(
    state: &'s DashboardState,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    kind: WidgetKind,
) -> Result<(ItemPath, &'s WidgetFilterSettings), CommandFailed> {
    if kind == WidgetKind::Insight {
        return insight_widget(state, command, widget_ref)
            .map(|(path, widget)| (path, &widget.filter_settings));
    }
    match select_widget_by_ref(state, widget_ref) {
        Some((path, Widget::Kpi(widget))) => Ok((path, &widget.filter_settings)),
        Some((_, other)) => Err(invalid_arguments(
            command,
            format!(
                "Widget {widget_ref} is a {} widget, expected a kpi widget.",
                other.kind().label()
            ),
        )),
        None => Err(invalid_arguments(
            command,
            format!("Cannot find kpi widget {widget_ref}."),
        )),
    }
}

pub(super) fn change_widget_filter_settings(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    widget_ref: &ObjRef,
    kind: WidgetKind,
    operation: &FilterSettingsOperation,
) -> HandlerResult {
    let (path, previous, current, operation) = ctx.select(|state| -> Result<_, CommandFailed> {
        let (path, previous) = filtered_widget(state, command, widget_ref, kind)?;
        let operation = canonical_filter_operation(state, command, operation)?;
        let filters = select_attribute_filters(state);
        let current = WidgetFilterSettings {
            date_dataset: previous.date_dataset.clone(),
            ignored_attribute_filters: previous
                .ignored_attribute_filters
                .iter()
                .map(|ignored| canonical(filters, ignored).unwrap_or_else(|| ignored.clone()))
                .collect(),
        };
        Ok((path, previous.clone(), current, operation))
    })?;

    let settings = operation.apply(&current);
    tracing::debug!(
        target: "dashboard.layout",
        widget = %widget_ref,
        date_filter = settings.date_dataset.is_some(),
        ignored = settings.ignored_attribute_filters.len(),
        "changing widget filter settings"
    );
    ctx.put(
        command,
        LayoutAction::UpdateWidget {
            path,
            action: WidgetAction::SetFilterSettings {
                settings: settings.clone(),
            },
        },
    )?;
    Ok(emitters::widget_filter_settings_changed(
        command,
        widget_ref.clone(),
        previous,
        settings,
    ))
}

fn canonical(catalog: &[CatalogObject], reference: &ObjRef) -> Option<ObjRef> {
    catalog
        .iter()
        .find(|object| object.matches(reference))
        .map(CatalogObject::reference)
}

/// Checks every reference of `operation` against the filter catalog and rewrites it to the
/// canonical identifier reference.
fn canonical_filter_operation(
    state: &DashboardState,
    command: &DashboardCommand,
    operation: &FilterSettingsOperation,
) -> Result<FilterSettingsOperation, CommandFailed> {
    let dataset = |reference: &ObjRef| {
        canonical(select_date_datasets(state), reference).ok_or_else(|| {
            invalid_arguments(command, format!("Date dataset {reference} does not exist."))
        })
    };
    let display_forms = |references: &[ObjRef]| {
        references
            .iter()
            .map(|reference| {
                canonical(select_attribute_filters(state), reference).ok_or_else(|| {
                    invalid_arguments(
                        command,
                        format!(
                            "Display form {reference} is not used by any dashboard attribute filter."
                        ),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match operation {
        FilterSettingsOperation::ReplaceSettings {
            date_dataset,
            ignored_attribute_filters,
        } => FilterSettingsOperation::ReplaceSettings {
            date_dataset: date_dataset.as_ref().map(dataset).transpose()?,
            ignored_attribute_filters: display_forms(ignored_attribute_filters)?,
        },
        FilterSettingsOperation::EnableDateFilter { date_dataset } => {
            FilterSettingsOperation::EnableDateFilter {
                date_dataset: dataset(date_dataset)?,
            }
        }
        FilterSettingsOperation::DisableDateFilter => FilterSettingsOperation::DisableDateFilter,
        FilterSettingsOperation::ReplaceIgnoredAttributeFilters { display_forms: forms } => {
            FilterSettingsOperation::ReplaceIgnoredAttributeFilters {
                display_forms: display_forms(forms)?,
            }
        }
        FilterSettingsOperation::IgnoreAttributeFilters { display_forms: forms } => {
            FilterSettingsOperation::IgnoreAttributeFilters {
                display_forms: display_forms(forms)?,
            }
        }
        FilterSettingsOperation::UnignoreAttributeFilters { display_forms: forms } => {
            FilterSettingsOperation::UnignoreAttributeFilters {
                display_forms: display_forms(forms)?,
            }
        }
    })
}
