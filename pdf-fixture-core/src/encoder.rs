//! Encoder seam between the size-targeting loop and the PDF library
//!
//! The generator only needs to append pages and serialize the whole
//! document. [`PdfEncoder`] does that with `oxidize-pdf`; tests can plug in
//! their own [`DocumentEncoder`] to exercise failure paths.

use oxidize_pdf::{Document, Font, Page};

/// Placeholder sentence repeated to build a filler line.
pub const FILLER_SENTENCE: &str = "This is test content. ";

/// Text rendered on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub header: String,
    pub lines: Vec<String>,
}

/// Fixed page layout. Every page carries the same amount of filler so the
/// document grows by a roughly constant number of bytes per page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub font_size: f64,
    pub leading: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub lines_per_page: usize,
    pub sentence_repeats: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            font_size: 6.0,
            leading: 9.0,
            origin_x: 50.0,
            origin_y: 780.0,
            lines_per_page: 80,
            sentence_repeats: 200,
        }
    }
}

impl PageLayout {
    pub fn filler_line(&self) -> String {
        FILLER_SENTENCE.repeat(self.sentence_repeats)
    }

    /// Content of page `page_number` of a document titled `title`
    pub fn page(&self, title: &str, page_number: u32) -> PageContent {
        let filler = self.filler_line();
        PageContent {
            header: format!("{title} - Page {page_number}"),
            lines: vec![filler; self.lines_per_page],
        }
    }
}

/// Minimal document operations the generator depends on
pub trait DocumentEncoder {
    type Error: std::fmt::Display;

    /// Appends one page with `content` drawn on it
    fn append_page(&mut self, content: &PageContent) -> Result<(), Self::Error>;

    /// Encodes the whole document, exactly as it would be written to disk
    fn serialize(&mut self) -> Result<Vec<u8>, Self::Error>;

    fn page_count(&self) -> usize;
}

/// [`DocumentEncoder`] backed by an `oxidize-pdf` [`Document`]
pub struct PdfEncoder {
    document: Document,
    layout: PageLayout,
}

impl PdfEncoder {
    pub fn new(title: &str, layout: PageLayout) -> Self {
        let mut document = Document::new();
        document.set_title(title);
        document.set_creator("pdf-fixture");
        // Compressed filler shrinks to a few KB per page and the size loop
        // then needs quadratically more re-serializations
        document.set_compress(false);
        Self { document, layout }
    }
}

impl DocumentEncoder for PdfEncoder {
    type Error = oxidize_pdf::PdfError;

    fn append_page(&mut self, content: &PageContent) -> Result<(), Self::Error> {
        let layout = &self.layout;
        let mut page = Page::a4();

        let text = page.text();
        text.set_font(Font::Helvetica, layout.font_size)
            .at(layout.origin_x, layout.origin_y)
            .write(&content.header)?;

        for (i, line) in content.lines.iter().enumerate() {
            let y = layout.origin_y - layout.leading * (i + 1) as f64;
            text.at(layout.origin_x, y).write(line)?;
        }

        self.document.add_page(page);
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>, Self::Error> {
        // `to_bytes` honours the document's compression setting
        self.document.to_bytes()
    }

    fn page_count(&self) -> usize {
        self.document.page_count()
    }
}
