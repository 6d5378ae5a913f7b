//! Two-column question/answer table with page breaks and header reissue.
//!
//! # Layout rules
//! - Question column takes `question_ratio` of the content width, answer the rest.
//! - Every row is at least `min_row_height` tall; taller if its text wraps.
//! - A row that does not fit starts a new page, and the header row is drawn
//!   again at the top of that page before the row.
//! - Answer present → wrapped, left-aligned text. Answer absent → an underline
//!   across the answer cell and no text.

use crate::layout::document::{Color, DocumentBuilder, TextStyle};
use crate::layout::font_metrics::FontStyle;

#[derive(Debug, Clone, Copy)]
pub struct TableStyle {
    pub question_ratio: f32,
    pub min_row_height: f32,
    pub padding: f32,
    pub header: TextStyle,
    pub category: TextStyle,
    pub body: TextStyle,
    pub border: Color,
    pub header_labels: (&'static str, &'static str),
}

pub fn default_table_style() -> TableStyle {
    TableStyle {
        question_ratio: 0.7,
        min_row_height: 24.0,
        padding: 5.0,
        header: TextStyle::new(FontStyle::Bold, 11.0, Color::BLACK),
        category: TextStyle::new(FontStyle::Bold, 11.0, Color::NAVY),
        body: TextStyle::new(FontStyle::Regular, 10.0, Color::BODY),
        border: Color::hex(0x999999),
        header_labels: ("Question", "Answer"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableEntry {
    /// Full-width group title.
    Category(String),
    Row {
        question: String,
        answer: Option<String>,
    },
}

/// Column geometry resolved against a page.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    style: TableStyle,
    x: f32,
    question_width: f32,
    answer_width: f32,
}

impl Table {
    pub fn new(style: TableStyle, doc: &DocumentBuilder) -> Self {
        let width = doc.config().content_width();
        let question_width = width * style.question_ratio;
        Self {
            style,
            x: doc.config().margin,
            question_width,
            answer_width: width - question_width,
        }
    }

    #[cfg(test)]
    pub fn column_widths(&self) -> (f32, f32) {
        (self.question_width, self.answer_width)
    }

    fn width(&self) -> f32 {
        self.question_width + self.answer_width
    }

    fn cell_height(&self, lines: usize, style: &TextStyle) -> f32 {
        let text_h = lines as f32 * style.line_height() + 2.0 * self.style.padding;
        text_h.max(self.style.min_row_height)
    }

    fn inner(&self, column_width: f32) -> f32 {
        (column_width - 2.0 * self.style.padding).max(0.0)
    }

    /// Height a row will occupy.
    pub fn measure(&self, entry: &TableEntry) -> f32 {
        let body = &self.style.body;
        match entry {
            TableEntry::Category(title) => {
                let inner = self.inner(self.width());
                let lines = self.style.category.wrap(title, inner, inner).len().max(1);
                self.cell_height(lines, &self.style.category)
            }
            TableEntry::Row { question, answer } => {
                let q_inner = self.inner(self.question_width);
                let a_inner = self.inner(self.answer_width);
                let q_lines = body.wrap(question, q_inner, q_inner).len();
                let a_lines = answer
                    .as_deref()
                    .map(|a| body.wrap(a, a_inner, a_inner).len())
                    .unwrap_or(0);
                self.cell_height(q_lines.max(a_lines).max(1), body)
            }
        }
    }

    /// Draws the header followed by every entry, breaking pages as needed.
    pub fn draw(&self, doc: &mut DocumentBuilder, entries: &[TableEntry]) {
        let header_h = self.style.min_row_height;
        let first_h = entries.first().map(|e| self.measure(e)).unwrap_or(0.0);
        // Keep the header together with the first row.
        doc.ensure_space(header_h + first_h);
        self.draw_header(doc);

        for entry in entries {
            let h = self.measure(entry);
            if !doc.fits(h) {
                doc.new_page();
                self.draw_header(doc);
            }
            match entry {
                TableEntry::Category(title) => self.draw_category(doc, title, h),
                TableEntry::Row { question, answer } => {
                    self.draw_row(doc, question, answer.as_deref(), h)
                }
            }
        }
    }

    fn draw_header(&self, doc: &mut DocumentBuilder) {
        let h = self.style.min_row_height;
        let top = doc.cursor_y();
        self.draw_borders(doc, top, h, true);
        let text_top = top + (h - self.style.header.line_height()) / 2.0;
        let pad = self.style.padding;
        doc.text_at(self.x + pad, text_top, self.style.header_labels.0, self.style.header);
        doc.text_at(
            self.x + self.question_width + pad,
            text_top,
            self.style.header_labels.1,
            self.style.header,
        );
        doc.move_down(h);
    }

    fn draw_category(&self, doc: &mut DocumentBuilder, title: &str, h: f32) {
        let top = doc.cursor_y();
        self.draw_borders(doc, top, h, false);
        let inner = self.inner(self.width());
        let style = self.style.category;
        for (i, line) in style.wrap(title, inner, inner).iter().enumerate() {
            let line_top = top + self.style.padding + i as f32 * style.line_height();
            doc.text_at(self.x + self.style.padding, line_top, line, style);
        }
        doc.move_down(h);
    }

    fn draw_row(&self, doc: &mut DocumentBuilder, question: &str, answer: Option<&str>, h: f32) {
        let top = doc.cursor_y();
        let pad = self.style.padding;
        let body = self.style.body;
        self.draw_borders(doc, top, h, true);

        let q_inner = self.inner(self.question_width);
        for (i, line) in body.wrap(question, q_inner, q_inner).iter().enumerate() {
            let line_top = top + pad + i as f32 * body.line_height();
            doc.text_at(self.x + pad, line_top, line, body);
        }

        let answer_x = self.x + self.question_width + pad;
        let a_inner = self.inner(self.answer_width);
        match answer.map(str::trim).filter(|a| !a.is_empty()) {
            Some(answer) => {
                for (i, line) in body.wrap(answer, a_inner, a_inner).iter().enumerate() {
                    let line_top = top + pad + i as f32 * body.line_height();
                    doc.text_at(answer_x, line_top, line, body);
                }
            }
            None => {
                let y = top + h - pad;
                doc.line(answer_x, y, answer_x + a_inner, y, Color::BLACK, 0.5);
            }
        }
        doc.move_down(h);
    }

    /// Outer box for a row; `split` adds the column divider.
    fn draw_borders(&self, doc: &mut DocumentBuilder, top: f32, h: f32, split: bool) {
        let (left, right, bottom) = (self.x, self.x + self.width(), top + h);
        let color = self.style.border;
        doc.line(left, top, right, top, color, 0.5);
        doc.line(left, bottom, right, bottom, color, 0.5);
        doc.line(left, top, left, bottom, color, 0.5);
        doc.line(right, top, right, bottom, color, 0.5);
        if split {
            let mid = self.x + self.question_width;
            doc.line(mid, top, mid, bottom, color, 0.5);
        }
    }
}
