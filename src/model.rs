use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const BOM: char = '\u{feff}';

static TRAILING_AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)\s*$").expect("valid author regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClippingType {
    Highlight,
    Note,
    Bookmark,
    Unknown,
}

impl ClippingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClippingType::Highlight => "surlignement",
            ClippingType::Note => "note",
            ClippingType::Bookmark => "signet",
            ClippingType::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "surlignement" => ClippingType::Highlight,
            "note" => ClippingType::Note,
            "signet" => ClippingType::Bookmark,
            _ => ClippingType::Unknown,
        }
    }
}

/// One entry of a clippings export, normalized at construction.
///
/// Fields are read-only once built; use [`Clipping::new`] so the title and
/// content cleanup always happens. Deserialization goes through the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawClipping", into = "RawClipping")]
pub struct Clipping {
    book_title: String,
    author: Option<String>,
    clipping_type: ClippingType,
    page: Option<String>,
    location: Option<String>,
    date: String,
    content: String,
}

impl Clipping {
    pub fn new(
        book_title: &str,
        author: Option<&str>,
        clipping_type: ClippingType,
        page: Option<&str>,
        location: Option<&str>,
        date: &str,
        content: &str,
    ) -> Self {
        Self {
            book_title: clean_text(book_title),
            author: author.map(|a| a.trim().to_string()),
            clipping_type,
            page: page.map(|p| p.trim().to_string()),
            location: location.map(|l| l.trim().to_string()),
            date: date.to_string(),
            content: clean_text(content),
        }
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn clipping_type(&self) -> ClippingType {
        self.clipping_type
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_highlight(&self) -> bool {
        self.clipping_type == ClippingType::Highlight
    }

    /// Numeric page used for ordering. Ranges such as `12-12` collapse to their
    /// first bound; a missing or unparsable page sorts as 0.
    pub fn page_number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.split('-').next())
            .and_then(|first| first.parse().ok())
            .unwrap_or(0)
    }
}

/// Serialized form of a [`Clipping`], with the type in the export's vocabulary.
#[derive(Debug, Serialize, Deserialize)]
struct RawClipping {
    book_title: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(rename = "type")]
    clipping_type: String,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    location: Option<String>,
    date: String,
    #[serde(default)]
    content: String,
}

impl From<RawClipping> for Clipping {
    fn from(raw: RawClipping) -> Self {
        Clipping::new(
            &raw.book_title,
            raw.author.as_deref(),
            ClippingType::from_str(&raw.clipping_type),
            raw.page.as_deref(),
            raw.location.as_deref(),
            &raw.date,
            &raw.content,
        )
    }
}

impl From<Clipping> for RawClipping {
    fn from(clipping: Clipping) -> Self {
        Self {
            clipping_type: clipping.clipping_type.as_str().to_string(),
            book_title: clipping.book_title,
            author: clipping.author,
            page: clipping.page,
            location: clipping.location,
            date: clipping.date,
            content: clipping.content,
        }
    }
}

/// Strips byte-order marks and surrounding whitespace. Idempotent.
pub fn clean_text(raw: &str) -> String {
    raw.replace(BOM, "").trim().to_string()
}

/// Returns the trailing parenthesised group of a title line, if any.
pub fn extract_author(book_title: &str) -> Option<String> {
    TRAILING_AUTHOR
        .captures(book_title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight(title: &str, page: Option<&str>, content: &str) -> Clipping {
        Clipping::new(
            title,
            None,
            ClippingType::Highlight,
            page,
            None,
            "dimanche 18 mai 2025 12:48:14",
            content,
        )
    }

    #[test]
    fn test_clipping_keeps_fields() {
        let clipping = highlight(
            "The Hard Thing About Hard Things",
            Some("12-12"),
            "was also on the highest academic track in math",
        );

        assert_eq!(clipping.book_title(), "The Hard Thing About Hard Things");
        assert_eq!(clipping.clipping_type(), ClippingType::Highlight);
        assert_eq!(clipping.page(), Some("12-12"));
        assert_eq!(clipping.content(), "was also on the highest academic track in math");
    }

    #[test]
    fn test_clipping_strips_bom_and_whitespace() {
        let clipping = highlight(
            "\u{feff}The Hard Thing About Hard Things  ",
            None,
            "\u{feff}  was also on the highest academic track in math\n",
        );

        assert_eq!(clipping.book_title(), "The Hard Thing About Hard Things");
        assert_eq!(clipping.content(), "was also on the highest academic track in math");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let once = clean_text("\u{feff} Sauve-moi ");
        assert_eq!(clean_text(&once), once);
        assert_eq!(clean_text("already clean"), "already clean");
    }

    #[test]
    fn test_extract_author() {
        assert_eq!(
            extract_author("The Hard Thing About Hard Things (Horowitz, Ben)"),
            Some("Horowitz, Ben".to_string())
        );
        assert_eq!(
            extract_author("Sauve-moi (French Edition) (Musso, Guillaume)"),
            Some("Musso, Guillaume".to_string())
        );
        assert_eq!(extract_author("The Hard Thing About Hard Things"), None);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(highlight("b", Some("12-12"), "x").page_number(), 12);
        assert_eq!(highlight("b", Some("7"), "x").page_number(), 7);
        assert_eq!(highlight("b", Some("xii"), "x").page_number(), 0);
        assert_eq!(highlight("b", None, "x").page_number(), 0);
    }

    #[test]
    fn test_page_number_beyond_u32() {
        let big = highlight("b", Some("5000000000"), "x");
        assert_eq!(big.page_number(), 5_000_000_000);
        assert!(big.page_number() > highlight("b", Some("1"), "x").page_number());
    }

    #[test]
    fn test_deserialized_clipping_is_normalized() {
        let clipping: Clipping = serde_json::from_str(
            r#"{"book_title":"\ufeff  Sauve-moi  ","type":"surlignement","page":" 7 ","date":"lundi","content":"  x \n"}"#,
        )
        .unwrap();

        assert_eq!(clipping.book_title(), "Sauve-moi");
        assert_eq!(clipping.page(), Some("7"));
        assert_eq!(clipping.content(), "x");
        assert_eq!(clipping.author(), None);
        assert_eq!(clipping.clipping_type(), ClippingType::Highlight);
    }

    #[test]
    fn test_serialized_clipping_uses_export_vocabulary() {
        let clipping = Clipping::new("Book", None, ClippingType::Bookmark, Some("23"), None, "mercredi", "");
        let value = serde_json::to_value(&clipping).unwrap();

        assert_eq!(value["type"], "signet");
        assert_eq!(serde_json::from_value::<Clipping>(value).unwrap(), clipping);
    }

    #[test]
    fn test_clipping_type_vocabulary() {
        assert_eq!(ClippingType::from_str("Surlignement"), ClippingType::Highlight);
        assert_eq!(ClippingType::from_str("signet"), ClippingType::Bookmark);
        assert_eq!(ClippingType::from_str("marque"), ClippingType::Unknown);
        assert_eq!(ClippingType::Note.as_str(), "note");
    }
}
