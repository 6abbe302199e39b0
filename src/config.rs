//! Terminal configuration
//!
//! Geometry, fonts, texts and colours of the screen. Every field has a
//! default matching the 512x512 texture, so a config file only needs the
//! fields it changes.

use crate::layout::FontSpec;
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The JSON could not be parsed
    Parse(String),
    /// The values are inconsistent
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(s) => write!(f, "config parse error: {}", s),
            ConfigError::Invalid(s) => write!(f, "invalid config: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Pixel geometry of the texture surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    /// Left and top text margin
    pub margin: f64,
    /// Height of one visual row
    pub line_height: f64,
    /// Widest a row of text may be
    pub max_width: f64,
    /// Rows reserved at the top for the banner
    pub banner_rows: usize,
    /// Rows reserved at the bottom for the prompt and input
    pub prompt_rows: usize,
}

impl ScreenGeometry {
    /// Rows of text the screen holds between the top and bottom margins
    pub fn total_rows(&self) -> usize {
        let usable = self.height as f64 - 2.0 * self.margin;
        if usable <= 0.0 || self.line_height <= 0.0 {
            return 0;
        }
        (usable / self.line_height).floor() as usize
    }

    /// Rows left for scrollback once banner and prompt are reserved
    pub fn row_budget(&self) -> usize {
        self.total_rows()
            .saturating_sub(self.banner_rows)
            .saturating_sub(self.prompt_rows)
    }

    /// Top edge of visual row `row`
    pub fn row_y(&self, row: usize) -> f64 {
        self.margin + row as f64 * self.line_height
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            margin: 20.0,
            line_height: 20.0,
            max_width: 472.0,
            banner_rows: 4,
            prompt_rows: 3,
        }
    }
}

/// CSS colours for each kind of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub banner: String,
    pub echo: String,
    pub response: String,
    pub prompt: String,
    pub input: String,
    pub cursor: String,
    pub viewer_text: String,
    pub viewer_hint: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#000000".into(),
            banner: "#FFFFFF".into(),
            echo: "#FFFFFF".into(),
            response: "#FFFF00".into(),
            prompt: "#00FF00".into(),
            input: "#FFFFFF".into(),
            cursor: "#00FFFF".into(),
            viewer_text: "#00FF00".into(),
            viewer_hint: "#007700".into(),
        }
    }
}

/// Full terminal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub screen: ScreenGeometry,
    pub terminal_font: FontSpec,
    pub viewer_font: FontSpec,
    pub banner: Vec<String>,
    /// `user@host` part of the prompt
    pub prompt_host: String,
    /// Most characters the input line accepts
    pub input_capacity: usize,
    pub cursor_glyph: String,
    pub cursor_blink_ms: f64,
    /// Content lines shown per viewer page
    pub viewer_page_lines: usize,
    pub viewer_hint: String,
    pub image_hint: String,
    /// Prefix put in front of content paths when fetching them
    pub content_root: String,
    pub palette: Palette,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            screen: ScreenGeometry::default(),
            terminal_font: FontSpec::monospace(18.0),
            viewer_font: FontSpec::monospace(16.0),
            banner: vec![
                "Welcome to Ngaurama-Linux 1.8 LTS".into(),
                ">> Type \"help\" to get started".into(),
            ],
            prompt_host: "evaluator@42".into(),
            input_capacity: 50,
            cursor_glyph: "┃".into(),
            cursor_blink_ms: 500.0,
            viewer_page_lines: 15,
            viewer_hint: "     -- Arrow Keys to Navigate, Q to Exit --".into(),
            image_hint: "     -- Q to Exit --".into(),
            content_root: String::new(),
            palette: Palette::default(),
        }
    }
}

impl TerminalConfig {
    /// Parse a (possibly partial) config from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.max_width <= 0.0 {
            return Err(ConfigError::Invalid("screen.max_width must be positive".into()));
        }
        if self.screen.line_height <= 0.0 {
            return Err(ConfigError::Invalid("screen.line_height must be positive".into()));
        }
        if self.input_capacity == 0 {
            return Err(ConfigError::Invalid("input_capacity must be at least 1".into()));
        }
        if self.viewer_page_lines == 0 {
            return Err(ConfigError::Invalid("viewer_page_lines must be at least 1".into()));
        }
        Ok(())
    }

    /// The prompt shown before the input while in `cwd`
    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}:{} ~$ ", self.prompt_host, cwd)
    }
}
