mod generator;

pub use generator::{
    generate_colors, generate_custom_properties, generate_font_sizes, generate_heading_elements,
    generate_layout, generate_spacing_sizes, map_tokens_to_config, slugify, title_case,
    GeneratorOptions, INITIAL,
};

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// `theme.json` fragment produced from design tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeDocument {
    pub settings: ThemeSettings,
    pub styles: ThemeStyles,
}

impl ThemeDocument {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSettings {
    pub color: ColorSettings,
    pub layout: LayoutSettings,
    pub spacing: SpacingSettings,
    pub typography: TypographySettings,
    /// Custom property name (`--wpvip-border-radius`) to fluid value.
    pub custom: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSettings {
    pub palette: Vec<PaletteColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub content_size: String,
    pub wide_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSettings {
    pub spacing_sizes: Vec<PresetSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySettings {
    pub font_sizes: Vec<PresetSize>,
}

/// Spacing or font size preset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSize {
    pub name: String,
    pub slug: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeStyles {
    pub elements: BTreeMap<HeadingLevel, ElementStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementStyle {
    pub typography: HeadingTypography,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingTypography {
    pub font_size: String,
    pub letter_spacing: String,
    pub line_height: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}
