//! Metadata line grammar for French clippings exports.
//!
//! The second line of every clipping block is a sentence such as
//! `- Votre surlignement sur la page 7 | emplacement 58-59 | Ajouté le dimanche 18 mai 2025 12:34:30`.
//! Templates are tried top to bottom and the first one that matches decides the
//! shape of the result. For two-field matches the clipping type is then taken
//! from keywords found anywhere in the line, so a line can match the highlight
//! template shape and still come out as a note or as unknown.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;
use crate::model::ClippingType;

pub const UNKNOWN_DATE: &str = "Unknown date";

struct Template {
    pattern: Regex,
    fields: usize,
}

impl Template {
    fn new(pattern: &str, fields: usize) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid metadata template"),
            fields,
        }
    }
}

static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    vec![
        Template::new(
            r"^Votre surlignement sur la page (\S+) \| (emplacement [^|]+) \| Ajouté le (.+)",
            3,
        ),
        Template::new(r"^Votre surlignement sur la page (\S+) \| Ajouté le (.+)", 2),
        Template::new(r"^Votre note sur la page (\S+) \| Ajouté le (.+)", 2),
        Template::new(r"^Votre signet sur la page (\S+) \| Ajouté le (.+)", 2),
    ]
});

// Checked in this order against the whole line.
const TYPE_KEYWORDS: [(&str, ClippingType); 3] = [
    ("surlignement", ClippingType::Highlight),
    ("note", ClippingType::Note),
    ("signet", ClippingType::Bookmark),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub clipping_type: ClippingType,
    pub page: Option<String>,
    pub location: Option<String>,
    pub date: String,
}

impl Metadata {
    fn unknown() -> Self {
        Self {
            clipping_type: ClippingType::Unknown,
            page: None,
            location: None,
            date: UNKNOWN_DATE.to_string(),
        }
    }
}

/// Parses one metadata line. An unrecognized line is not an error; it yields
/// an `Unknown` record with [`UNKNOWN_DATE`].
///
/// Every template group is mandatory and every template has two or three
/// fields, so the `Err` arms are a guard: they fire only if the template table
/// is edited into an inconsistent state.
pub fn parse_metadata(line: &str) -> Result<Metadata, ParseError> {
    let line = line.trim_start_matches(['-', ' ']).trim();

    for template in TEMPLATES.iter() {
        let Some(caps) = template.pattern.captures(line) else {
            continue;
        };

        let field = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| ParseError::MissingField {
                    index: i,
                    line: line.to_string(),
                })
        };

        return match template.fields {
            3 => Ok(Metadata {
                clipping_type: ClippingType::Highlight,
                page: Some(field(1)?),
                location: Some(field(2)?),
                date: field(3)?,
            }),
            2 => Ok(Metadata {
                clipping_type: keyword_type(line),
                page: Some(field(1)?),
                location: None,
                date: field(2)?,
            }),
            n => Err(ParseError::UnsupportedTemplate(n)),
        };
    }

    Ok(Metadata::unknown())
}

fn keyword_type(line: &str) -> ClippingType {
    TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| line.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(ClippingType::Unknown)
}
