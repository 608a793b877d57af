//! Dashboard runtime settings loaded from TOML.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dashboard_contract::WidgetKind;

/// Workspace-relative location of the default settings file.
pub const DASHBOARD_SETTINGS_PATH: &str = "config/dashboard.toml";
/// Environment variable overriding [`DASHBOARD_SETTINGS_PATH`].
pub const DASHBOARD_SETTINGS_ENV: &str = "DASHBOARD_SETTINGS_PATH";

#[derive(Debug, Error)]
/// Errors raised while loading [`DashboardSettings`].
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings text is not valid TOML for [`DashboardSettings`].
    #[error("failed to parse dashboard settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// The override variable is set but empty.
    #[error("{DASHBOARD_SETTINGS_ENV} is set but empty; expected a filesystem path")]
    EmptyOverride,
}

/// How a move destination index is read relative to the removal of the moved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveIndexConvention {
    /// The destination index is the final position after the element was taken out.
    #[default]
    PostRemoval,
    /// The destination index is an insertion point in the sequence before the move.
    PreRemoval,
}

/// Width and height defaults for one widget kind, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSizeDefaults {
    /// Minimum width in columns.
    pub min_width: u32,
    /// Width used for new items.
    pub default_width: u32,
    /// Minimum height in rows.
    pub min_height: u32,
    /// Height used when an item has no explicit height.
    pub default_height: u32,
    /// Maximum height in rows.
    pub max_height: u32,
}

impl WidgetSizeDefaults {
    const fn new(
        min_width: u32,
        default_width: u32,
        min_height: u32,
        default_height: u32,
        max_height: u32,
    ) -> Self {
        Self {
            min_width,
            default_width,
            min_height,
            default_height,
            max_height,
        }
    }
}

/// Per-kind sizing defaults consumed by the default sizing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingDefaults {
    /// Chart and table insights.
    pub insight: WidgetSizeDefaults,
    /// Headline insights.
    pub headline: WidgetSizeDefaults,
    /// KPI widgets.
    pub kpi: WidgetSizeDefaults,
    /// Rich text widgets.
    pub rich_text: WidgetSizeDefaults,
    /// Custom widgets.
    pub custom: WidgetSizeDefaults,
    /// Table data rows rendered per grid row when deriving table minimum height.
    pub table_rows_per_grid_row: u32,
}

impl Default for SizingDefaults {
    fn default() -> Self {
        Self {
            insight: WidgetSizeDefaults::new(4, 6, 12, 22, 40),
            headline: WidgetSizeDefaults::new(2, 4, 6, 11, 40),
            kpi: WidgetSizeDefaults::new(2, 2, 11, 11, 40),
            rich_text: WidgetSizeDefaults::new(2, 12, 2, 4, 40),
            custom: WidgetSizeDefaults::new(1, 4, 1, 10, 40),
            table_rows_per_grid_row: 2,
        }
    }
}

impl SizingDefaults {
    /// Returns the defaults for a widget kind. Containers have computed sizes and use `custom`.
    pub fn for_kind(&self, kind: WidgetKind) -> WidgetSizeDefaults {
        match kind {
            WidgetKind::Insight => self.insight,
            WidgetKind::Kpi => self.kpi,
            WidgetKind::RichText => self.rich_text,
            WidgetKind::Layout | WidgetKind::Custom => self.custom,
        }
    }
}

/// Runtime settings. Every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Columns of the root layout grid.
    pub grid_columns: u32,
    /// Maximum number of recorded undo points.
    pub undo_limit: usize,
    /// Rows consumed by a rendered section header.
    pub section_header_height: u32,
    /// Interpretation of move destination indexes.
    pub move_index_convention: MoveIndexConvention,
    /// Widget sizing defaults.
    pub sizing: SizingDefaults,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            grid_columns: 12,
            undo_limit: 50,
            section_header_height: 2,
            move_index_convention: MoveIndexConvention::PostRemoval,
            sizing: SizingDefaults::default(),
        }
    }
}

impl DashboardSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read and
    /// [`SettingsError::Parse`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!(
            target: "dashboard.settings",
            path = %path.display(),
            grid_columns = settings.grid_columns,
            "loaded dashboard settings"
        );
        Ok(settings)
    }
}

/// Resolves the settings file under `root`, honoring [`DASHBOARD_SETTINGS_ENV`].
///
/// # Errors
///
/// Returns [`SettingsError::EmptyOverride`] when the override variable is blank.
pub fn resolve_settings_path(root: &Path) -> Result<PathBuf, SettingsError> {
    match env::var(DASHBOARD_SETTINGS_ENV) {
        Ok(raw) if raw.trim().is_empty() => Err(SettingsError::EmptyOverride),
        Ok(raw) => {
            let candidate = PathBuf::from(raw);
            Ok(if candidate.is_absolute() {
                candidate
            } else {
                root.join(candidate)
            })
        }
        Err(_) => Ok(root.join(DASHBOARD_SETTINGS_PATH)),
    }
}

/// Loads settings from the resolved path, using defaults when no file exists there.
///
/// # Errors
///
/// Propagates resolution, read, and parse errors for an existing file.
pub fn load_dashboard_settings(root: &Path) -> Result<DashboardSettings, SettingsError> {
    let path = resolve_settings_path(root)?;
    if !path.exists() {
        tracing::debug!(
            target: "dashboard.settings",
            path = %path.display(),
            "settings file missing; using defaults"
        );
        return Ok(DashboardSettings::default());
    }
    DashboardSettings::load(&path)
}
