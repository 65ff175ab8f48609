//! Notion implementation of [`PagePublisher`].
//!
//! Pages are created as children of a parent page, with the body split into
//! paragraph blocks that stay under Notion's per-block character limit.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Notion;
use crate::error::PublishError;
use crate::render::PARAGRAPH_SEPARATOR;
use crate::repository::PagePublisher;

const NOTION_VERSION_HEADER: &str = "notion-version";

#[derive(Debug)]
pub struct NotionPublisher {
    client: Client,
    api_url: String,
    max_block_chars: usize,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Deserialize)]
struct BlockList {
    #[serde(default)]
    results: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    paragraph: Option<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    #[serde(default)]
    content: String,
}

impl NotionPublisher {
    pub fn new(token: &str, cfg: &Notion) -> Result<Self, PublishError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| PublishError::InvalidHeader(format!("api token: {}", e)))?,
        );
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_str(&cfg.api_version)
                .map_err(|e| PublishError::InvalidHeader(format!("api version: {}", e)))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .default_headers(headers)
            .build()?;

        info!(api_url = %cfg.api_url, version = %cfg.api_version, "notion client ready");

        Ok(Self {
            client,
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            max_block_chars: cfg.max_block_chars,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Returns the page, or `None` when it does not exist or cannot be fetched.
    pub async fn get_page(&self, page_id: &str) -> Option<Page> {
        match self.fetch_page(page_id).await {
            Ok(page) => Some(page),
            Err(e) => {
                debug!(page_id, error = %crate::unpack_error(&e), "page lookup failed");
                None
            }
        }
    }

    async fn fetch_page(&self, page_id: &str) -> Result<Page, PublishError> {
        let response = self.client.get(self.url(&format!("pages/{}", page_id))).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn fetch_paragraphs(&self, page_id: &str) -> Result<String, PublishError> {
        let response = self
            .client
            .get(self.url(&format!("blocks/{}/children", page_id)))
            .send()
            .await?;
        let blocks: BlockList = check_status(response).await?.json().await?;
        Ok(collect_paragraph_text(&blocks))
    }
}

impl PagePublisher for NotionPublisher {
    async fn create_page(&self, parent_id: &str, title: &str, content: &str) -> Result<String, PublishError> {
        let blocks = split_into_blocks(content, self.max_block_chars);
        debug!(title, blocks = blocks.len(), "creating page");

        let body = create_page_body(parent_id, title, &blocks);
        let response = self.client.post(self.url("pages")).json(&body).send().await?;
        let page: Page = check_status(response).await?.json().await?;

        page.id.ok_or(PublishError::MissingId)
    }

    async fn get_page_content(&self, page_id: &str) -> Result<Option<String>, PublishError> {
        match self.fetch_paragraphs(page_id).await {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                debug!(page_id, error = %crate::unpack_error(&e), "failed to read page content");
                Ok(None)
            }
        }
    }

    async fn page_exists(&self, page_id: &str) -> Result<bool, PublishError> {
        Ok(self.get_page(page_id).await.is_some_and(|page| !page.archived))
    }

    async fn delete_page(&self, page_id: &str) -> Result<bool, PublishError> {
        let response = self
            .client
            .patch(self.url(&format!("pages/{}", page_id)))
            .json(&json!({ "archived": true }))
            .send()
            .await?;
        check_status(response).await?;
        debug!(page_id, "archived page");
        Ok(true)
    }
}

async fn check_status(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = if status == StatusCode::NOT_FOUND {
        String::from("not found")
    } else {
        response.text().await.unwrap_or_default()
    };

    Err(PublishError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Splits `content` into chunks of at most `max_chars` characters without
/// breaking a paragraph. A paragraph longer than the limit gets a chunk of its own.
pub fn split_into_blocks(content: &str, max_chars: usize) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for paragraph in content.split(PARAGRAPH_SEPARATOR) {
        let len = paragraph.chars().count() + PARAGRAPH_SEPARATOR.len();

        if current_len + len > max_chars && !current.is_empty() {
            blocks.push(current.join(PARAGRAPH_SEPARATOR));
            current.clear();
            current_len = 0;
        }

        current.push(paragraph);
        current_len += len;
    }

    if !current.is_empty() {
        blocks.push(current.join(PARAGRAPH_SEPARATOR));
    }

    blocks
}

fn paragraph_block(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": {
            "rich_text": [{ "type": "text", "text": { "content": text } }]
        }
    })
}

fn create_page_body(parent_id: &str, title: &str, blocks: &[String]) -> Value {
    json!({
        "parent": { "page_id": parent_id },
        "properties": {
            "title": { "title": [{ "text": { "content": title } }] }
        },
        "children": blocks.iter().map(|b| paragraph_block(b)).collect::<Vec<_>>(),
    })
}

fn collect_paragraph_text(blocks: &BlockList) -> String {
    blocks
        .results
        .iter()
        .filter(|block| block.block_type == "paragraph")
        .filter_map(|block| block.paragraph.as_ref())
        .map(|p| {
            p.rich_text
                .iter()
                .filter_map(|rt| rt.text.as_ref())
                .map(|t| t.content.as_str())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
