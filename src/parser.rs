use std::path::Path;

use crate::error::{ImportError, ParseError};
use crate::metadata::parse_metadata;
use crate::model::{Clipping, extract_author};

pub const BLOCK_SEPARATOR: &str = "==========";

/// Parser for "My Clippings.txt" style exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClippingParser;

impl ClippingParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Clipping>, ImportError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::SourceNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "read clippings file");

        Ok(self.parse_content(&content))
    }

    /// Parses every block of `content`, in file order. Blocks that cannot be
    /// parsed are logged and skipped.
    pub fn parse_content(&self, content: &str) -> Vec<Clipping> {
        let mut clippings = Vec::new();

        for (index, block) in content.split(BLOCK_SEPARATOR).enumerate() {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            match self.parse_block(block) {
                Ok(Some(clipping)) => clippings.push(clipping),
                Ok(None) => tracing::debug!(block = index, "skipping block with fewer than two lines"),
                Err(e) => tracing::warn!(block = index, error = %e, "failed to parse clipping block"),
            }
        }

        clippings
    }

    fn parse_block(&self, block: &str) -> Result<Option<Clipping>, ParseError> {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let [title, metadata_line, rest @ ..] = lines.as_slice() else {
            return Ok(None);
        };

        let author = extract_author(title);
        let metadata = parse_metadata(metadata_line)?;
        let content = rest.join("\n");

        Ok(Some(Clipping::new(
            title,
            author.as_deref(),
            metadata.clipping_type,
            metadata.page.as_deref(),
            metadata.location.as_deref(),
            &metadata.date,
            &content,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClippingType;

    const SAMPLE: &str = "\u{feff}Sauve-moi (French Edition) (Musso, Guillaume)
- Votre surlignement sur la page 7 | emplacement 58-59 | Ajouté le dimanche 18 mai 2025 12:34:30

Juliette frissonna en écoutant ces nouvelles.
==========
The Hard Thing About Hard Things
- Votre surlignement sur la page 12-12 | Ajouté le dimanche 18 mai 2025 12:48:14

was also on the highest academic track in math
==========
The Hard Thing About Hard Things
- Votre note sur la page 12 | Ajouté le dimanche 18 mai 2025 12:48:36

Remember this
==========
The Hard Thing About Hard Things
- Votre signet sur la page 23 | Ajouté le mercredi 21 mai 2025 22:14:57


==========
";

    #[test]
    fn test_parse_content_in_file_order() {
        let clippings = ClippingParser::new().parse_content(SAMPLE);

        assert_eq!(clippings.len(), 4);
        let types: Vec<ClippingType> = clippings.iter().map(|c| c.clipping_type()).collect();
        assert_eq!(
            types,
            vec![
                ClippingType::Highlight,
                ClippingType::Highlight,
                ClippingType::Note,
                ClippingType::Bookmark
            ]
        );
    }

    #[test]
    fn test_first_block_strips_bom_and_extracts_author() {
        let clippings = ClippingParser::new().parse_content(SAMPLE);
        let first = &clippings[0];

        assert_eq!(first.book_title(), "Sauve-moi (French Edition) (Musso, Guillaume)");
        assert_eq!(first.author(), Some("Musso, Guillaume"));
        assert_eq!(first.page(), Some("7"));
        assert_eq!(first.location(), Some("emplacement 58-59"));
        assert_eq!(first.content(), "Juliette frissonna en écoutant ces nouvelles.");
    }

    #[test]
    fn test_bookmark_has_empty_content() {
        let clippings = ClippingParser::new().parse_content(SAMPLE);
        let bookmark = &clippings[3];

        assert_eq!(bookmark.clipping_type(), ClippingType::Bookmark);
        assert_eq!(bookmark.page(), Some("23"));
        assert_eq!(bookmark.location(), None);
        assert_eq!(bookmark.content(), "");
    }

    #[test]
    fn test_short_and_empty_blocks_are_skipped() {
        let content = "==========\n   \n==========\nOnly a title\n==========\n";
        assert!(ClippingParser::new().parse_content(content).is_empty());
    }

    #[test]
    fn test_multiline_content_is_rejoined() {
        let content = "Book\n- Votre surlignement sur la page 1 | Ajouté le lundi\nfirst line\n\n  second line  \n";
        let clippings = ClippingParser::new().parse_content(content);

        assert_eq!(clippings[0].content(), "first line\nsecond line");
    }

    #[test]
    fn test_unknown_metadata_still_produces_record() {
        let content = "Book\n- Your Highlight on page 3\nsome text\n";
        let clippings = ClippingParser::new().parse_content(content);

        assert_eq!(clippings.len(), 1);
        assert_eq!(clippings[0].clipping_type(), ClippingType::Unknown);
        assert_eq!(clippings[0].date(), "Unknown date");
        assert_eq!(clippings[0].page(), None);
    }

    #[test]
    fn test_parse_file_not_found() {
        let err = ClippingParser::new()
            .parse_file("/nonexistent/My Clippings.txt")
            .unwrap_err();
        assert!(matches!(err, ImportError::SourceNotFound(_)));
    }
}
