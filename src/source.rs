use crate::error::ImportError;
use crate::model::Clipping;
use crate::parser::ClippingParser;
use crate::repository::ClippingSource;

/// Reads clippings from an export file on disk.
#[derive(Debug, Default)]
pub struct FileClippingSource {
    parser: ClippingParser,
}

impl FileClippingSource {
    pub fn new() -> Self {
        Self {
            parser: ClippingParser::new(),
        }
    }
}

impl ClippingSource for FileClippingSource {
    fn get_clippings(&self, source: &str) -> Result<Vec<Clipping>, ImportError> {
        self.parser.parse_file(source)
    }
}
