use serde_json::{Map, Value};

use super::{NamedTokens, TokenError, TokenResult, TokenValue};

pub const DEFAULT_SYSTEM: &str = "wpvip";

const PALETTE_GROUP: &str = "palette";
const HELPER_GROUP: &str = "helper";
const SPACINGS_GROUP: &str = "spacings";
const TEXT_GROUP: &str = "text";
const HEADINGS_GROUP: &str = "headings";

/// Top-level namespace keys of a token export for one design system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceKeys {
    pub colors: String,
    pub layout: String,
    pub desktop: String,
    pub mobile: String,
}

impl NamespaceKeys {
    pub fn for_system(system: &str) -> Self {
        Self {
            colors: format!("{system}/static"),
            layout: format!("{system}/layout/value"),
            desktop: format!("{system}/sizes/desktop"),
            mobile: format!("{system}/sizes/mobile"),
        }
    }
}

impl Default for NamespaceKeys {
    fn default() -> Self {
        Self::for_system(DEFAULT_SYSTEM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTokens {
    pub namespace: String,
    pub content_size: Option<TokenValue>,
    pub wide_size: Option<TokenValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextToken {
    pub font_size: Option<TokenValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadingToken {
    pub font_size: Option<TokenValue>,
    pub letter_spacing: Option<TokenValue>,
    pub line_height: Option<TokenValue>,
}

/// One viewport's size tokens (`{system}/sizes/desktop` or `.../mobile`).
#[derive(Debug, Clone, PartialEq)]
pub struct SizeTokens {
    pub namespace: String,
    pub spacings: NamedTokens<TokenValue>,
    pub text: NamedTokens<TextToken>,
    pub headings: NamedTokens<HeadingToken>,
    pub border_radius: Option<TokenValue>,
}

impl SizeTokens {
    pub fn spacing(&self, key: &str) -> Option<&TokenValue> {
        super::find(&self.spacings, key)
    }

    pub fn text(&self, key: &str) -> Option<&TextToken> {
        super::find(&self.text, key)
    }

    pub fn heading(&self, key: &str) -> Option<&HeadingToken> {
        super::find(&self.headings, key)
    }

    /// Namespace label used in error messages, e.g. `wpvip/sizes/mobile.spacings`.
    pub fn group_path(&self, group: &str) -> String {
        format!("{}.{group}", self.namespace)
    }
}

/// Validated token export, split into the namespaces the theme generator reads.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDocument {
    pub palette: NamedTokens<TokenValue>,
    pub helper_palette: NamedTokens<TokenValue>,
    pub layout: LayoutTokens,
    pub desktop: SizeTokens,
    pub mobile: SizeTokens,
}

impl TokenDocument {
    pub fn from_json_str(serialized: &str, keys: &NamespaceKeys) -> TokenResult<Self> {
        let raw: Value = serde_json::from_str(serialized)
            .map_err(|err| TokenError::invalid(format!("not valid JSON: {err}")))?;
        Self::from_value(&raw, keys)
    }

    pub fn from_value(raw: &Value, keys: &NamespaceKeys) -> TokenResult<Self> {
        let root = raw
            .as_object()
            .ok_or_else(|| TokenError::invalid("document root is not an object"))?;

        let colors = namespace(root, &keys.colors)?;
        let palette_path = format!("{}.{PALETTE_GROUP}", keys.colors);
        let palette = match colors.get(PALETTE_GROUP) {
            Some(group) => leaf_group(group, &palette_path)?,
            None => {
                return Err(TokenError::invalid(format!(
                    "namespace `{palette_path}` is missing"
                )))
            }
        };
        let helper_path = format!("{}.{HELPER_GROUP}", keys.colors);
        let helper_palette = match colors.get(HELPER_GROUP).filter(|group| !group.is_null()) {
            Some(group) => leaf_group(group, &helper_path)?,
            None => Vec::new(),
        };

        let layout_ns = namespace(root, &keys.layout)?;
        let layout = LayoutTokens {
            namespace: keys.layout.clone(),
            content_size: optional_leaf(layout_ns, "contentSize", &keys.layout)?,
            wide_size: optional_leaf(layout_ns, "wideSize", &keys.layout)?,
        };

        Ok(Self {
            palette,
            helper_palette,
            layout,
            desktop: size_tokens(root, &keys.desktop)?,
            mobile: size_tokens(root, &keys.mobile)?,
        })
    }
}

fn namespace<'a>(root: &'a Map<String, Value>, key: &str) -> TokenResult<&'a Map<String, Value>> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(TokenError::invalid(format!(
            "namespace `{key}` is not an object"
        ))),
        None => Err(TokenError::invalid(format!("namespace `{key}` is missing"))),
    }
}

fn size_tokens(root: &Map<String, Value>, key: &str) -> TokenResult<SizeTokens> {
    let ns = namespace(root, key)?;

    let spacings = leaf_group(
        required_group(ns, key, SPACINGS_GROUP)?,
        &format!("{key}.{SPACINGS_GROUP}"),
    )?;

    let text_path = format!("{key}.{TEXT_GROUP}");
    let text = entries(required_group(ns, key, TEXT_GROUP)?, &text_path)?
        .map(|(name, entry)| -> TokenResult<(String, TextToken)> {
            let path = format!("{text_path}.{name}");
            Ok((
                name.clone(),
                TextToken {
                    font_size: optional_leaf(entry, "fontSize", &path)?,
                },
            ))
        })
        .collect::<TokenResult<Vec<_>>>()?;

    let headings_path = format!("{key}.{HEADINGS_GROUP}");
    let headings = entries(required_group(ns, key, HEADINGS_GROUP)?, &headings_path)?
        .map(|(name, entry)| -> TokenResult<(String, HeadingToken)> {
            let path = format!("{headings_path}.{name}");
            Ok((
                name.clone(),
                HeadingToken {
                    font_size: optional_leaf(entry, "fontSize", &path)?,
                    letter_spacing: optional_leaf(entry, "letterSpacing", &path)?,
                    line_height: optional_leaf(entry, "lineHeight", &path)?,
                },
            ))
        })
        .collect::<TokenResult<Vec<_>>>()?;

    let border_radius = match ns.get("border") {
        Some(Value::Object(border)) => optional_leaf(border, "radius", &format!("{key}.border"))?,
        Some(Value::Null) | None => None,
        Some(_) => {
            return Err(TokenError::invalid(format!(
                "`{key}.border` is not an object"
            )))
        }
    };

    Ok(SizeTokens {
        namespace: key.to_string(),
        spacings,
        text,
        headings,
        border_radius,
    })
}

fn required_group<'a>(
    ns: &'a Map<String, Value>,
    namespace: &str,
    group: &str,
) -> TokenResult<&'a Value> {
    ns.get(group)
        .filter(|value| !value.is_null())
        .ok_or_else(|| TokenError::missing(namespace, group))
}

/// Iterates a group whose entries must all be objects.
fn entries<'a>(
    group: &'a Value,
    path: &str,
) -> TokenResult<impl Iterator<Item = (&'a String, &'a Map<String, Value>)>> {
    let map = group
        .as_object()
        .ok_or_else(|| TokenError::invalid(format!("`{path}` is not an object")))?;
    if let Some((name, _)) = map.iter().find(|(_, entry)| !entry.is_object()) {
        return Err(TokenError::invalid(format!(
            "`{path}.{name}` is not an object"
        )));
    }
    Ok(map
        .iter()
        .filter_map(|(name, entry)| entry.as_object().map(|entry| (name, entry))))
}

fn leaf_group(group: &Value, path: &str) -> TokenResult<NamedTokens<TokenValue>> {
    entries(group, path)?
        .map(|(name, entry)| -> TokenResult<(String, TokenValue)> {
            let value = leaf_value(entry, &format!("{path}.{name}"))?;
            Ok((name.clone(), value))
        })
        .collect()
}

fn optional_leaf(
    parent: &Map<String, Value>,
    key: &str,
    path: &str,
) -> TokenResult<Option<TokenValue>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(entry)) => leaf_value(entry, &format!("{path}.{key}")).map(Some),
        Some(_) => Err(TokenError::invalid(format!(
            "`{path}.{key}` is not a token leaf"
        ))),
    }
}

fn leaf_value(entry: &Map<String, Value>, path: &str) -> TokenResult<TokenValue> {
    let value = entry
        .get("value")
        .ok_or_else(|| TokenError::invalid(format!("`{path}` has no `value`")))?;
    TokenValue::from_json(value).ok_or_else(|| {
        TokenError::invalid(format!("`{path}.value` must be a string or a number"))
    })
}
