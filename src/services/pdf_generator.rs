use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::models::PDF_EXTENSION;

const TITLE_SUFFIX: &str = " - Anonymisiert";
const DEFAULT_TITLE: &str = "Lebenslauf - Anonymisiert";
const DOWNLOAD_SUFFIX: &str = "_anonymisiert.pdf";
const LAYER_NAME: &str = "Content";
const TAB_WIDTH: usize = 4;

/// Page geometry and type sizes, in points.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub title_size: f32,
    pub title_space_after: f32,
    pub body_size: f32,
    pub leading: f32,
    pub paragraph_space_after: f32,
}

impl Default for PageLayout {
    /// US Letter with one-inch margins.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 72.0,
            title_size: 16.0,
            title_space_after: 30.0,
            body_size: 11.0,
            leading: 14.0,
            paragraph_space_after: 12.0,
        }
    }
}

impl PageLayout {
    pub fn text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.page_height - self.margin
    }
}

/// Lays text out into a new PDF: a centered bold title followed by one
/// paragraph per non-empty input line.
#[derive(Debug, Clone, Default)]
pub struct PdfGenerator {
    layout: PageLayout,
}

impl PdfGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn generate(&self, text: &str, display_name: Option<&str>) -> AppResult<Vec<u8>> {
        let start = Instant::now();
        let title = document_title(display_name);

        check_encodable(&title)?;
        let paragraphs: Vec<String> = text
            .lines()
            .map(normalize_line)
            .filter(|line| !line.trim().is_empty())
            .collect();
        for paragraph in &paragraphs {
            check_encodable(paragraph)?;
        }

        let layout = self.layout;
        let (doc, page, layer) = PdfDocument::new(
            title.as_str(),
            pt_to_mm(layout.page_width),
            pt_to_mm(layout.page_height),
            LAYER_NAME,
        );
        let title_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::generation(e.to_string()))?;
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::generation(e.to_string()))?;

        let mut cursor = Cursor {
            doc: &doc,
            layout,
            layer: doc.get_page(page).get_layer(layer),
            y: layout.top(),
            pages: 1,
        };

        let title_width = text_width(&title, FontFace::Bold, layout.title_size);
        let title_x = layout.margin + ((layout.text_width() - title_width) / 2.0).max(0.0);
        cursor.advance(layout.title_size * 1.2);
        cursor.draw(&title, layout.title_size, title_x, &title_font);
        cursor.y -= layout.title_space_after;

        for paragraph in &paragraphs {
            for line in wrap_text(paragraph, FontFace::Regular, layout.body_size, layout.text_width()) {
                cursor.advance(layout.leading);
                cursor.draw(&line, layout.body_size, layout.margin, &body_font);
            }
            cursor.y -= layout.paragraph_space_after;
        }

        let pages = cursor.pages;
        let bytes = doc
            .save_to_bytes()
            .map_err(|e| AppError::generation(e.to_string()))?;

        tracing::info!(
            pages = pages,
            paragraphs = paragraphs.len(),
            size_bytes = bytes.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "PDF creation successful"
        );

        Ok(bytes)
    }
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layout: PageLayout,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor<'_> {
    /// Moves the baseline down by `height`, starting a new page when the line
    /// would cross the bottom margin.
    fn advance(&mut self, height: f32) {
        if self.y - height < self.layout.margin {
            let (page, layer) = self.doc.add_page(
                pt_to_mm(self.layout.page_width),
                pt_to_mm(self.layout.page_height),
                LAYER_NAME,
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = self.layout.top();
            self.pages += 1;
        }
        self.y -= height;
    }

    fn draw(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, pt_to_mm(x), pt_to_mm(self.y), font);
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Lowercased source name without its `.pdf` extension.
pub fn document_stem(source_name: &str) -> String {
    let lower = source_name.trim().to_lowercase();
    match lower.strip_suffix(PDF_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

pub fn document_title(display_name: Option<&str>) -> String {
    match display_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{}{}", document_stem(name), TITLE_SUFFIX),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Attachment name for a regenerated document, safe to place inside a quoted
/// `Content-Disposition` parameter.
pub fn download_filename(source_name: &str) -> String {
    let stem: String = document_stem(source_name)
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("{}{}", stem, DOWNLOAD_SUFFIX)
}

/// Tabs expand to spaces; other control characters, such as the form feeds
/// left behind by PDF text extraction, become a single space.
fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// The built-in PDF fonts only cover the WinAnsi (cp1252) repertoire.
fn is_winansi(c: char) -> bool {
    matches!(
        c,
        ' '..='~'
            | '\u{A0}'..='\u{FF}'
            | '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž'
            | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'
            | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ'
    )
}

fn check_encodable(text: &str) -> AppResult<()> {
    match text.chars().find(|c| !is_winansi(*c)) {
        Some(c) => Err(AppError::generation(format!(
            "character {:?} (U+{:04X}) cannot be encoded in the document font",
            c, c as u32
        ))),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy)]
enum FontFace {
    Regular,
    Bold,
}

// Advance widths for U+0020..=U+007E, in 1/1000 em (Adobe core font metrics).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char, face: FontFace) -> u16 {
    let table = match face {
        FontFace::Regular => &HELVETICA_WIDTHS,
        FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    match c {
        ' '..='~' => table[c as usize - 0x20],
        _ => FALLBACK_WIDTH,
    }
}

fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, face) as u32).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. Words wider than a full line are broken by character.
fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, face, size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
