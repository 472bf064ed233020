use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Template-level style keys, kept as an ordered map so serialized
/// sessions compare byte-for-byte.
pub type StylesState = BTreeMap<String, String>;

/// Well-known template style keys consumed by the document chrome.
pub const STYLE_PAGE_BACKGROUND: &str = "pageBackground";
pub const STYLE_CONTENT_BACKGROUND: &str = "contentBackground";
pub const STYLE_FONT_FAMILY: &str = "fontFamily";
pub const STYLE_LINK_COLOR: &str = "linkColor";

/// A linear gradient painted behind a container strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

/// Per-block presentation properties. Every field is optional; renderers
/// fall back to built-in defaults for anything unset, and unknown keys in
/// stored documents are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStyle {
    // Padding properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_vertical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_horizontal: Option<f64>,

    // Color properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    // Typography properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,

    // Corner properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    // Divider line properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,

    // Span properties (buttons and container strips)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,

    // Container-only visuals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inset: Option<bool>,
}

impl BlockStyle {
    /// True when no property is set; empty styles are omitted from the
    /// serialized block.
    pub fn is_empty(&self) -> bool {
        *self == BlockStyle::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontFamily {
    Named(FontFamilyNamed),
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamilyNamed {
    Sans,
    Serif,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_style_round_trips_to_empty_object() {
        let style = BlockStyle::default();
        assert!(style.is_empty());
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn unknown_style_keys_are_ignored() {
        let style: BlockStyle =
            serde_json::from_str(r##"{"backgroundColor":"#ff0000","blink":true}"##).unwrap();
        assert_eq!(style.background_color.as_deref(), Some("#ff0000"));
        assert!(!style.is_empty());
    }

    #[test]
    fn font_family_accepts_named_and_custom() {
        let named: FontFamily = serde_json::from_str(r#""serif""#).unwrap();
        assert_eq!(named, FontFamily::Named(FontFamilyNamed::Serif));
        let custom: FontFamily = serde_json::from_str(r#""Georgia, serif""#).unwrap();
        assert_eq!(custom, FontFamily::Custom("Georgia, serif".into()));
    }
}
