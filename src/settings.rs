// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor configuration and non-visual constants.
//!
//! Visual styling (overlay colors, dash patterns) belongs in `theme.rs`.

use crate::error::EditorError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest accepted font size, in points.
pub const MIN_FONT_SIZE: u32 = 6;

/// Default font size for new sessions.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Freehand stroke width in viewport pixels.
pub const STROKE_WIDTH: f64 = 2.0;

/// Horizontal offset applied to new-text placement clicks, in document
/// units, so the first character does not start under the cursor.
pub const PLACEMENT_X_OFFSET: f64 = 20.0;

/// Supported font families, mapped to engine-native font names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
    Arial,
    Symbol,
}

impl FontFamily {
    /// The engine-native name for this family. Arial has no engine
    /// counterpart and maps to Helvetica.
    pub fn engine_name(self) -> &'static str {
        match self {
            FontFamily::Helvetica | FontFamily::Arial => "helv",
            FontFamily::Times => "times",
            FontFamily::Courier => "courier",
            FontFamily::Symbol => "symbol",
        }
    }
}

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);

    /// Normalized components for the engine interface.
    pub fn normalized(self) -> [f32; 3] {
        self.0.map(|c| f32::from(c) / 255.0)
    }

    pub fn to_color(self) -> peniko::Color {
        peniko::Color::from_rgb8(self.0[0], self.0[1], self.0[2])
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// User-adjustable editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    font_size: u32,
    pub font_family: FontFamily,
    pub font_color: Rgb,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            font_color: Rgb::default(),
        }
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Font size as a document-space scalar.
    pub fn font_size_pts(&self) -> f64 {
        f64::from(self.font_size)
    }

    pub fn set_font_size(&mut self, size: u32) -> Result<(), EditorError> {
        if size < MIN_FONT_SIZE {
            return Err(EditorError::InvalidInput(format!(
                "font size {size} is below the minimum of {MIN_FONT_SIZE}"
            )));
        }
        self.font_size = size;
        Ok(())
    }

    /// Parse a config from TOML, rejecting invalid sizes.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw).context("failed to parse editor config")?;
        if config.font_size < MIN_FONT_SIZE {
            anyhow::bail!(
                "font size {} is below the minimum of {MIN_FONT_SIZE}",
                config.font_size
            );
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EditorConfig::new();
        assert_eq!(config.font_size(), 12);
        assert_eq!(config.font_family, FontFamily::Helvetica);
        assert_eq!(config.font_color, Rgb::BLACK);
    }

    #[test]
    fn font_size_below_minimum_is_rejected() {
        let mut config = EditorConfig::new();
        assert!(config.set_font_size(5).is_err());
        assert_eq!(config.font_size(), 12);
        assert!(config.set_font_size(6).is_ok());
    }

    #[test]
    fn family_mapping_to_engine_names() {
        assert_eq!(FontFamily::Helvetica.engine_name(), "helv");
        assert_eq!(FontFamily::Arial.engine_name(), "helv");
        assert_eq!(FontFamily::Times.engine_name(), "times");
        assert_eq!(FontFamily::Courier.engine_name(), "courier");
        assert_eq!(FontFamily::Symbol.engine_name(), "symbol");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let raw = r#"
            font_size = 14
            font_family = "times"
            font_color = [255, 0, 0]
        "#;
        let config = EditorConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.font_size(), 14);
        assert_eq!(config.font_family, FontFamily::Times);
        assert_eq!(config.font_color, Rgb([255, 0, 0]));
    }

    #[test]
    fn toml_with_invalid_size_is_rejected() {
        let raw = "font_size = 2";
        assert!(EditorConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn normalized_color() {
        assert_eq!(Rgb([255, 0, 51]).normalized(), [1.0, 0.0, 0.2]);
    }
}
