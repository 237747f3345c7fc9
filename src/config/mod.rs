use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::drawing::{Color, DrawingPatch, LogicalPoint, TextBox};
use crate::render::RenderStyle;
use crate::session::{ToolDefaults, ToolKind, DEFAULT_TEXT_BOX_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "chartmark";
const APP_CONFIG_FILE: &str = "config.json";

/// Engine settings from `config.json`. Every key is optional.
///
/// `text_box` is a partial text-box record (same camelCase field names as the
/// persisted drawings) laid over the built-in new-box template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tool_colors: HashMap<ToolKind, Color>,
    pub sticky_tools: Vec<ToolKind>,
    pub text_box: DrawingPatch,
    pub chart_background: Color,
    pub glow: bool,
    pub horizontal_line_dash: Vec<f64>,
    pub line_width: f64,
    pub selection_color: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            tool_colors: HashMap::new(),
            sticky_tools: Vec::new(),
            text_box: DrawingPatch::default(),
            chart_background: style.chart_background,
            glow: style.glow,
            horizontal_line_dash: style.horizontal_line_dash,
            line_width: style.line_width,
            selection_color: style.selection_color,
        }
    }
}

impl EngineConfig {
    pub fn render_style(&self) -> RenderStyle {
        let fallback = RenderStyle::default();
        let dash_is_usable = self
            .horizontal_line_dash
            .iter()
            .all(|segment| segment.is_finite() && *segment >= 0.0);
        if !dash_is_usable {
            tracing::warn!(dash = ?self.horizontal_line_dash, "ignoring invalid dash pattern");
        }
        let width_is_usable = self.line_width.is_finite() && self.line_width > 0.0;
        if !width_is_usable {
            tracing::warn!(width = self.line_width, "ignoring invalid line width");
        }

        RenderStyle {
            chart_background: self.chart_background,
            glow: self.glow,
            horizontal_line_dash: if dash_is_usable {
                self.horizontal_line_dash.clone()
            } else {
                fallback.horizontal_line_dash
            },
            line_width: if width_is_usable {
                self.line_width
            } else {
                fallback.line_width
            },
            selection_color: self.selection_color,
        }
    }

    pub fn tool_defaults(&self) -> ToolDefaults {
        let mut text_box = TextBox::new(LogicalPoint::new(0.0, 0.0), DEFAULT_TEXT_BOX_TEXT);
        self.text_box.apply_to_text_box(&mut text_box);
        ToolDefaults {
            colors: self.tool_colors.clone(),
            sticky: self.sticky_tools.iter().copied().collect::<HashSet<_>>(),
            text_box,
        }
    }
}

pub fn load_engine_config() -> EngineConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_engine_config_with(xdg_config_home.as_deref(), home.as_deref())
}

pub fn load_engine_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> EngineConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return EngineConfig::default();
        }
    };
    if !path.exists() {
        return EngineConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EngineConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EngineConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
