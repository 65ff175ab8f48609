use std::error::Error;

pub mod config;
pub mod error;
pub mod import;
pub mod metadata;
pub mod model;
pub mod notion;
pub mod parser;
pub mod render;
pub mod repository;
pub mod source;

/// Renders an error and its whole source chain as `outer: inner: ...`.
pub fn unpack_error(err: &(dyn Error)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Web address of a Notion page, from its id.
pub fn notion_url(page_id: &str) -> String {
    format!("https://notion.so/{}", page_id.replace('-', ""))
}
