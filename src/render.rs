use std::collections::HashMap;

use crate::model::Clipping;

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Rendered body of one book page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    pub title: String,
    pub body: String,
    pub highlight_count: usize,
}

pub fn highlights(clippings: &[Clipping]) -> Vec<&Clipping> {
    clippings.iter().filter(|c| c.is_highlight()).collect()
}

/// Groups clippings by exact title, books in first-seen order.
pub fn group_by_book<'a>(clippings: &[&'a Clipping]) -> Vec<(String, Vec<&'a Clipping>)> {
    let mut books: Vec<(String, Vec<&'a Clipping>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for &clipping in clippings {
        let title = clipping.book_title();
        match index.get(title) {
            Some(&i) => books[i].1.push(clipping),
            None => {
                index.insert(title, books.len());
                books.push((title.to_string(), vec![clipping]));
            }
        }
    }

    books
}

pub fn render_highlight(clipping: &Clipping) -> String {
    match clipping.page() {
        Some(page) => format!("\"{}\" (p.{})", clipping.content(), page),
        None => format!("\"{}\"", clipping.content()),
    }
}

pub fn render_book(highlights: &[&Clipping]) -> String {
    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|c| c.page_number());

    sorted
        .iter()
        .map(|c| render_highlight(c))
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Keeps highlights only and renders one page per book.
pub fn render_pages(clippings: &[Clipping]) -> Vec<BookPage> {
    let highlights = highlights(clippings);

    group_by_book(&highlights)
        .into_iter()
        .map(|(title, book)| BookPage {
            body: render_book(&book),
            highlight_count: book.len(),
            title,
        })
        .collect()
}
