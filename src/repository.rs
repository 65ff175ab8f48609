//! Seams between the import pipeline and the outside world.
//!
//! A [`ClippingSource`] turns a source reference (a file path for the
//! bundled implementation) into parsed clippings. A [`PagePublisher`] is any
//! system that can hold one page per book. Concrete implementations are
//! picked in `main`.

use crate::error::{ImportError, PublishError};
use crate::model::Clipping;

pub trait ClippingSource {
    fn get_clippings(&self, source: &str) -> Result<Vec<Clipping>, ImportError>;
}

#[allow(async_fn_in_trait)]
pub trait PagePublisher {
    /// Creates a page under `parent_id` and returns its id.
    async fn create_page(&self, parent_id: &str, title: &str, content: &str) -> Result<String, PublishError>;

    /// Page body as text, or `None` if it cannot be read.
    async fn get_page_content(&self, page_id: &str) -> Result<Option<String>, PublishError>;

    async fn page_exists(&self, page_id: &str) -> Result<bool, PublishError>;

    async fn delete_page(&self, page_id: &str) -> Result<bool, PublishError>;
}
