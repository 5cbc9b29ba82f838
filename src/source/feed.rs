//! The normalized "on this day" feed and the types it is made of.
//!
//! Whatever the endpoint returns, [`normalize`] turns it into a
//! [`FeedResult`] whose five lists are always present, so the rest of the
//! application can slice and count without checking for missing fields.
//!
//! Entries are pass-through data: nothing is validated beyond presence. A
//! present list keeps its length; missing or wrong-typed fields become empty
//! strings or `None`, and an element that is not an object becomes an empty
//! entry.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Thumbnail image attached to a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub source: String,
}

/// An encyclopedia page related to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "string_or_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub extract: Option<String>,
    #[serde(default, deserialize_with = "thumbnail_or_none")]
    pub thumbnail: Option<Thumbnail>,
}

/// One historical record: a birth, death, event, holiday or featured event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Year as shown to the user. Holidays have none, which leaves this empty.
    #[serde(default, deserialize_with = "display_year")]
    pub year: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "pages_or_empty")]
    pub pages: Vec<Page>,
}

impl Entry {
    /// Read one feed element. Never fails: anything that is not an object
    /// gives [`Entry::default`].
    pub fn from_value(value: &Value) -> Entry {
        if !value.is_object() {
            debug!(%value, "non-object entry, keeping it empty");
            return Entry::default();
        }
        Entry::deserialize(value).unwrap_or_else(|e| {
            debug!(error = %e, "unreadable entry, keeping it empty");
            Entry::default()
        })
    }

    /// Extract of the first related page, if it has a non-empty one.
    pub fn extract(&self) -> Option<&str> {
        self.pages
            .first()
            .and_then(|p| p.extract.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Thumbnail URL of the first related page.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.pages
            .first()
            .and_then(|p| p.thumbnail.as_ref())
            .map(|t| t.source.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Title of the first related page with underscores turned into spaces.
    pub fn page_title(&self) -> Option<String> {
        self.pages
            .first()
            .and_then(|p| p.title.as_deref())
            .filter(|s| !s.is_empty())
            .map(|s| s.replace('_', " "))
    }
}

/// The five lists the feed can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Births,
    Deaths,
    Events,
    Holidays,
    Selected,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Births,
        Category::Deaths,
        Category::Events,
        Category::Holidays,
        Category::Selected,
    ];

    /// JSON field name in the feed response.
    pub fn field(self) -> &'static str {
        match self {
            Category::Births => "births",
            Category::Deaths => "deaths",
            Category::Events => "events",
            Category::Holidays => "holidays",
            Category::Selected => "selected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Births => "Births",
            Category::Deaths => "Deaths",
            Category::Events => "Events",
            Category::Holidays => "Holidays",
            Category::Selected => "Featured",
        }
    }

    /// Maximum number of cards rendered for this category.
    pub fn display_cap(self) -> usize {
        match self {
            Category::Births | Category::Deaths => 10,
            Category::Events => 12,
            Category::Holidays | Category::Selected => 8,
        }
    }

    /// Line shown under an entry's text, e.g. "Born in 1879".
    pub fn caption(self, entry: &Entry) -> String {
        let year = if entry.year.is_empty() {
            "unknown year"
        } else {
            entry.year.as_str()
        };
        match self {
            Category::Births => format!("Born in {year}"),
            Category::Deaths => format!("Died in {year}"),
            Category::Events | Category::Selected => format!("Happened in {year}"),
            Category::Holidays => "Observance".to_string(),
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Category::Births => "No births found for this date.",
            Category::Deaths => "No deaths found for this date.",
            Category::Events => "No events found for this date.",
            Category::Holidays => "No holidays found for this date.",
            Category::Selected => "No featured events found for this date.",
        }
    }

    pub fn next(self) -> Category {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Category {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A normalized feed. Every list is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedResult {
    pub births: Vec<Entry>,
    pub deaths: Vec<Entry>,
    pub events: Vec<Entry>,
    pub holidays: Vec<Entry>,
    pub selected: Vec<Entry>,
}

impl FeedResult {
    /// The all-empty feed used when a request fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self, category: Category) -> &[Entry] {
        match category {
            Category::Births => &self.births,
            Category::Deaths => &self.deaths,
            Category::Events => &self.events,
            Category::Holidays => &self.holidays,
            Category::Selected => &self.selected,
        }
    }

    /// Entries of `category` truncated to its display cap.
    pub fn displayed(&self, category: Category) -> &[Entry] {
        let entries = self.entries(category);
        &entries[..entries.len().min(category.display_cap())]
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.entries(*c).is_empty())
    }
}

/// Map a decoded response body onto a [`FeedResult`].
///
/// A field is used only when present and an array; anything else yields an
/// empty list. A used array keeps its length: each element maps to exactly
/// one [`Entry`] (see [`Entry::from_value`]). Unknown fields are ignored, and
/// `null` or non-object input gives the empty feed. Normalizing an already normalized (and serialized) feed
/// returns it unchanged.
pub fn normalize(raw: &Value) -> FeedResult {
    let list = |category: Category| -> Vec<Entry> {
        let Some(items) = raw.get(category.field()).and_then(Value::as_array) else {
            return Vec::new();
        };
        items.iter().map(Entry::from_value).collect()
    };

    FeedResult {
        births: list(Category::Births),
        deaths: list(Category::Deaths),
        events: list(Category::Events),
        holidays: list(Category::Holidays),
        selected: list(Category::Selected),
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_none(deserializer)?.unwrap_or_default())
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn thumbnail_or_none<'de, D>(deserializer: D) -> Result<Option<Thumbnail>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(Thumbnail::deserialize(&value).ok())
}

// Elements that are not objects become empty pages so `pages[0]` stays the
// first page the feed sent.
fn pages_or_empty<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(|item| Page::deserialize(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

// The feed sends years as integers (negative for BC); a re-serialized feed
// carries them as strings.
fn display_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        _ => String::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
