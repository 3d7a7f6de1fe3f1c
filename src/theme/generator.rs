use std::collections::BTreeMap;

use crate::fluid::{responsive_size, ViewportRange};
use crate::tokens::{
    HeadingToken, NamespaceKeys, TokenDocument, TokenError, TokenResult, TokenValue,
    DEFAULT_SYSTEM,
};

use super::{
    ColorSettings, ElementStyle, HeadingLevel, HeadingTypography, LayoutSettings, PaletteColor,
    PresetSize, SpacingSettings, ThemeDocument, ThemeSettings, ThemeStyles, TypographySettings,
};

/// CSS keyword emitted for heading metrics the tokens do not define.
pub const INITIAL: &str = "initial";

const LEAD_HEADING: &str = "lead";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Token namespace prefix, also used for custom property names.
    pub system: String,
    pub viewport: ViewportRange,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            viewport: ViewportRange::default(),
        }
    }
}

impl GeneratorOptions {
    pub fn namespace_keys(&self) -> NamespaceKeys {
        NamespaceKeys::for_system(&self.system)
    }
}

pub fn map_tokens_to_config(
    tokens: &TokenDocument,
    options: &GeneratorOptions,
) -> TokenResult<ThemeDocument> {
    let viewport = options.viewport;
    let palette = generate_colors(tokens);
    let layout = generate_layout(tokens)?;
    let spacing_sizes = generate_spacing_sizes(tokens, viewport)?;
    let font_sizes = generate_font_sizes(tokens, viewport)?;
    let elements = generate_heading_elements(tokens, viewport)?;
    let custom = generate_custom_properties(tokens, options)?;

    tracing::debug!(
        colors = palette.len(),
        spacing_sizes = spacing_sizes.len(),
        font_sizes = font_sizes.len(),
        custom_properties = custom.len(),
        "mapped design tokens"
    );

    Ok(ThemeDocument {
        settings: ThemeSettings {
            color: ColorSettings { palette },
            layout,
            spacing: SpacingSettings { spacing_sizes },
            typography: TypographySettings { font_sizes },
            custom,
        },
        styles: ThemeStyles { elements },
    })
}

/// Palette colors followed by helper colors, each in source order.
pub fn generate_colors(tokens: &TokenDocument) -> Vec<PaletteColor> {
    tokens
        .palette
        .iter()
        .chain(&tokens.helper_palette)
        .map(|(name, value)| PaletteColor {
            name: name.clone(),
            slug: slugify(name),
            color: value.to_string(),
        })
        .collect()
}

pub fn generate_layout(tokens: &TokenDocument) -> TokenResult<LayoutSettings> {
    let layout = &tokens.layout;
    let length = |value: Option<&TokenValue>, key: &str| -> TokenResult<String> {
        let value = value.ok_or_else(|| TokenError::missing(&layout.namespace, key))?;
        Ok(format!("{}px", px(value, &layout.namespace, key)?))
    };

    Ok(LayoutSettings {
        content_size: length(layout.content_size.as_ref(), "contentSize")?,
        wide_size: length(layout.wide_size.as_ref(), "wideSize")?,
    })
}

pub fn generate_spacing_sizes(
    tokens: &TokenDocument,
    viewport: ViewportRange,
) -> TokenResult<Vec<PresetSize>> {
    let (desktop, mobile) = (&tokens.desktop, &tokens.mobile);
    let desktop_ns = desktop.group_path("spacings");
    let mobile_ns = mobile.group_path("spacings");

    let mut sizes = Vec::with_capacity(desktop.spacings.len());
    for (key, desktop_value) in &desktop.spacings {
        let mobile_value = mobile
            .spacing(key)
            .ok_or_else(|| TokenError::missing(&mobile_ns, key))?;
        let desktop_px = px(desktop_value, &desktop_ns, key)?;
        let mobile_px = px(mobile_value, &mobile_ns, key)?;

        sizes.push((
            mean(desktop_px, mobile_px),
            PresetSize {
                name: key.clone(),
                slug: slugify(key),
                size: responsive_size(desktop_px, mobile_px, viewport),
            },
        ));
    }

    Ok(sorted_by_weight(sizes))
}

pub fn generate_font_sizes(
    tokens: &TokenDocument,
    viewport: ViewportRange,
) -> TokenResult<Vec<PresetSize>> {
    let (desktop, mobile) = (&tokens.desktop, &tokens.mobile);
    let desktop_ns = desktop.group_path("text");
    let mobile_ns = mobile.group_path("text");

    let mut sizes = Vec::with_capacity(desktop.text.len());
    for (key, desktop_entry) in &desktop.text {
        let field = format!("{key}.fontSize");
        let desktop_value = desktop_entry
            .font_size
            .as_ref()
            .ok_or_else(|| TokenError::missing(&desktop_ns, &field))?;
        let mobile_value = mobile
            .text(key)
            .ok_or_else(|| TokenError::missing(&mobile_ns, key))?
            .font_size
            .as_ref()
            .ok_or_else(|| TokenError::missing(&mobile_ns, &field))?;
        let desktop_px = px(desktop_value, &desktop_ns, &field)?;
        let mobile_px = px(mobile_value, &mobile_ns, &field)?;

        sizes.push((
            mean(desktop_px, mobile_px),
            PresetSize {
                name: title_case(key),
                slug: slugify(key),
                size: responsive_size(desktop_px, mobile_px, viewport),
            },
        ));
    }

    Ok(sorted_by_weight(sizes))
}

/// `h1`..`h6` typography. Letter spacing falls back to a mobile value of `0`
/// when only the desktop token exists; line height needs both sides.
pub fn generate_heading_elements(
    tokens: &TokenDocument,
    viewport: ViewportRange,
) -> TokenResult<BTreeMap<HeadingLevel, ElementStyle>> {
    let (desktop, mobile) = (&tokens.desktop, &tokens.mobile);
    let desktop_ns = desktop.group_path("headings");
    let mobile_ns = mobile.group_path("headings");

    let mut elements = BTreeMap::new();
    for level in HeadingLevel::ALL {
        let key = level.as_str();
        let desktop_heading = desktop
            .heading(key)
            .ok_or_else(|| TokenError::missing(&desktop_ns, key))?;
        let mobile_heading = mobile
            .heading(key)
            .ok_or_else(|| TokenError::missing(&mobile_ns, key))?;

        let typography = heading_typography(
            key,
            (desktop_heading, &desktop_ns),
            (mobile_heading, &mobile_ns),
            viewport,
        )?;
        elements.insert(level, ElementStyle { typography });
    }

    Ok(elements)
}

fn heading_typography(
    key: &str,
    (desktop, desktop_ns): (&HeadingToken, &str),
    (mobile, mobile_ns): (&HeadingToken, &str),
    viewport: ViewportRange,
) -> TokenResult<HeadingTypography> {
    let font_field = format!("{key}.fontSize");
    let desktop_font = desktop
        .font_size
        .as_ref()
        .ok_or_else(|| TokenError::missing(desktop_ns, &font_field))?;
    let mobile_font = mobile
        .font_size
        .as_ref()
        .ok_or_else(|| TokenError::missing(mobile_ns, &font_field))?;
    let font_size = responsive_size(
        px(desktop_font, desktop_ns, &font_field)?,
        px(mobile_font, mobile_ns, &font_field)?,
        viewport,
    );

    let spacing_field = format!("{key}.letterSpacing");
    let letter_spacing = match (&desktop.letter_spacing, &mobile.letter_spacing) {
        (None, _) => INITIAL.to_string(),
        (Some(desktop_value), mobile_value) => {
            let mobile_px = match mobile_value {
                Some(value) => px(value, mobile_ns, &spacing_field)?,
                None => 0.0,
            };
            responsive_size(
                px(desktop_value, desktop_ns, &spacing_field)?,
                mobile_px,
                viewport,
            )
        }
    };

    let line_field = format!("{key}.lineHeight");
    let line_height = match (&desktop.line_height, &mobile.line_height) {
        (Some(desktop_value), Some(mobile_value)) => responsive_size(
            px(desktop_value, desktop_ns, &line_field)?,
            px(mobile_value, mobile_ns, &line_field)?,
            viewport,
        ),
        _ => INITIAL.to_string(),
    };

    Ok(HeadingTypography {
        font_size,
        letter_spacing,
        line_height,
    })
}

/// Border radius and lead typography as custom properties. Each property is
/// only emitted when both viewports define it.
pub fn generate_custom_properties(
    tokens: &TokenDocument,
    options: &GeneratorOptions,
) -> TokenResult<BTreeMap<String, String>> {
    let (desktop, mobile) = (&tokens.desktop, &tokens.mobile);
    let prefix = format!("--{}", options.system);
    let mut custom = BTreeMap::new();

    let mut insert = |name: &str,
                      desktop_value: Option<&TokenValue>,
                      mobile_value: Option<&TokenValue>,
                      field: &str|
     -> TokenResult<()> {
        if let (Some(desktop_value), Some(mobile_value)) = (desktop_value, mobile_value) {
            let size = responsive_size(
                px(desktop_value, &desktop.namespace, field)?,
                px(mobile_value, &mobile.namespace, field)?,
                options.viewport,
            );
            custom.insert(format!("{prefix}-{name}"), size);
        }
        Ok(())
    };

    insert(
        "border-radius",
        desktop.border_radius.as_ref(),
        mobile.border_radius.as_ref(),
        "border.radius",
    )?;

    let desktop_lead = desktop.heading(LEAD_HEADING);
    let mobile_lead = mobile.heading(LEAD_HEADING);
    insert(
        "lead-font-size",
        desktop_lead.and_then(|lead| lead.font_size.as_ref()),
        mobile_lead.and_then(|lead| lead.font_size.as_ref()),
        "headings.lead.fontSize",
    )?;
    insert(
        "lead-letter-spacing",
        desktop_lead.and_then(|lead| lead.letter_spacing.as_ref()),
        mobile_lead.and_then(|lead| lead.letter_spacing.as_ref()),
        "headings.lead.letterSpacing",
    )?;
    insert(
        "lead-line-height",
        desktop_lead.and_then(|lead| lead.line_height.as_ref()),
        mobile_lead.and_then(|lead| lead.line_height.as_ref()),
        "headings.lead.lineHeight",
    )?;

    Ok(custom)
}

/// Lower-cases `name` and collapses whitespace runs into a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// Upper-cases the first character of every word (`x-large` -> `X-Large`).
pub fn title_case(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut previous_is_word = false;
    for ch in name.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !previous_is_word {
            titled.push(ch.to_ascii_uppercase());
        } else {
            titled.push(ch);
        }
        previous_is_word = is_word;
    }
    titled
}

fn px(value: &TokenValue, namespace: &str, key: &str) -> TokenResult<f64> {
    value.as_px().ok_or_else(|| {
        TokenError::invalid(format!("`{namespace}.{key}` is not numeric: `{value}`"))
    })
}

fn mean(desktop_px: f64, mobile_px: f64) -> f64 {
    (desktop_px + mobile_px) / 2.0
}

// Stable, so equal weights keep source order.
fn sorted_by_weight(mut entries: Vec<(f64, PresetSize)>) -> Vec<PresetSize> {
    entries.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    entries.into_iter().map(|(_, preset)| preset).collect()
}
