use tracing::info;

use crate::error::ImportError;
use crate::model::{Clipping, ClippingType};
use crate::render::render_pages;
use crate::repository::{ClippingSource, PagePublisher};

#[derive(Debug)]
pub struct ImportedBook {
    pub title: String,
    pub highlight_count: usize,
    pub page_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub total_clippings: usize,
    pub highlight_count: usize,
    pub books: Vec<ImportedBook>,
}

impl ImportReport {
    pub fn page_count(&self) -> usize {
        self.books.iter().map(|b| b.page_ids.len()).sum()
    }
}

pub struct ImportService<S, P> {
    source: S,
    publisher: P,
}

impl<S: ClippingSource, P: PagePublisher> ImportService<S, P> {
    pub fn new(source: S, publisher: P) -> Self {
        Self { source, publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publishes one page per book under `parent_id`.
    ///
    /// Stops at the first failed page. Pages created before the failure are
    /// left in place.
    pub async fn import_clippings(&self, source: &str, parent_id: &str) -> Result<ImportReport, ImportError> {
        let clippings = self.source.get_clippings(source)?;
        let pages = render_pages(&clippings);

        let mut report = ImportReport {
            total_clippings: clippings.len(),
            highlight_count: pages.iter().map(|p| p.highlight_count).sum(),
            books: Vec::with_capacity(pages.len()),
        };

        info!(
            clippings = report.total_clippings,
            highlights = report.highlight_count,
            notes = count(&clippings, ClippingType::Note),
            bookmarks = count(&clippings, ClippingType::Bookmark),
            books = pages.len(),
            "parsed clippings"
        );

        for page in pages {
            let page_id = self
                .publisher
                .create_page(parent_id, &page.title, &page.body)
                .await
                .map_err(|source| ImportError::Publish {
                    title: page.title.clone(),
                    source,
                })?;

            info!(title = %page.title, page_id = %page_id, "created book page");
            report.books.push(ImportedBook {
                title: page.title,
                highlight_count: page.highlight_count,
                page_ids: vec![page_id],
            });
        }

        Ok(report)
    }
}

fn count(clippings: &[Clipping], kind: ClippingType) -> usize {
    clippings.iter().filter(|c| c.clipping_type() == kind).count()
}
