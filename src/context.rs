use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The recipient a render is personalized for. Every field is optional;
/// tokens for missing fields stay unresolved in the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// A show as the rendering pipeline sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Show {
    pub id: Option<String>,
    pub name: String,
    pub venue: String,
    pub city: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub tickets_remaining: Option<u32>,
}

impl Show {
    /// Human-readable date line, e.g. "Fri, Mar 7 at 7:30 PM".
    pub fn date_label(&self) -> Option<String> {
        self.starts_at
            .map(|dt| dt.format("%a, %b %-d at %-I:%M %p").to_string())
    }
}

/// What the recipient has shown interest in, used by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Affinity {
    pub category: Option<String>,
    pub venue: Option<String>,
}

impl Affinity {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.venue.is_none()
    }
}

/// Everything [`render`](crate::render::render) may draw on besides the
/// document itself. Supplied per render call and never stored in the
/// document, so the same saved layout serves templates, campaigns, and
/// automation previews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    #[serde(alias = "personalization")]
    pub contact: Option<Contact>,
    pub show: Option<Show>,
    pub upcoming_shows: Vec<Show>,
    pub affinity: Option<Affinity>,
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_label_formats_without_padding() {
        let show = Show {
            starts_at: Some(Utc.with_ymd_and_hms(2026, 3, 6, 19, 30, 0).unwrap()),
            ..Show::default()
        };
        assert_eq!(show.date_label().as_deref(), Some("Fri, Mar 6 at 7:30 PM"));
    }

    #[test]
    fn options_accept_personalization_alias() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"personalization":{"firstName":"Ada"}}"#).unwrap();
        assert_eq!(
            options.contact.and_then(|c| c.first_name).as_deref(),
            Some("Ada")
        );
    }
}
