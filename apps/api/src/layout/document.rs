//! Paginated document builder.
//!
//! Content is laid out top-down on fixed-size pages with a vertical cursor.
//! Anything that would cross the bottom margin starts a new page. The output is
//! a plain list of positioned draw operations per page, which `pdf.rs` turns
//! into PDF bytes and which tests can inspect directly.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontStyle};
use crate::layout::wrap::wrap_lines;

/// Fraction of the font size between the top of a line box and its baseline.
pub const ASCENT: f32 = 0.8;
/// Line box height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry in PDF points (1/72 in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    /// Same margin on all four sides.
    pub margin: f32,
}

/// US letter with a 40pt margin.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width: 612.0,
        height: 792.0,
        margin: 40.0,
    }
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y (top-down) that content may reach.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    pub const BLACK: Color = Color::hex(0x000000);
    pub const NAVY: Color = Color::hex(0x003366);
    pub const DARK_GRAY: Color = Color::hex(0x333333);
    pub const BODY: Color = Color::hex(0x222222);
    pub const RULE: Color = Color::hex(0xcccccc);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontStyle,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: FontStyle, size: f32, color: Color) -> Self {
        Self { font, size, color }
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR
    }

    pub fn width_of(&self, text: &str) -> f32 {
        get_metrics(self.font).width_pt(text, self.size)
    }

    pub fn wrap(&self, text: &str, first_width: f32, width: f32) -> Vec<String> {
        wrap_lines(text, get_metrics(self.font), self.size, first_width, width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A positioned drawing primitive. `y` values are measured top-down from the
/// top edge of the page; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        thickness: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Line { .. } => None,
        })
    }
}

/// The finished layout: page geometry plus each page's draw operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutDocument {
    pub config: PageConfig,
    pub pages: Vec<Page>,
}

#[cfg(test)]
impl LaidOutDocument {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.texts())
    }

    /// True if `needle` appears within a single drawn text run.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

pub struct DocumentBuilder {
    config: PageConfig,
    pages: Vec<Page>,
    cursor_y: f32,
}

impl DocumentBuilder {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor_y: config.margin,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn at_page_top(&self) -> bool {
        self.cursor_y <= self.config.margin
    }

    pub fn fits(&self, height: f32) -> bool {
        self.cursor_y + height <= self.config.bottom()
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.config.margin;
    }

    /// Starts a new page when `height` does not fit below the cursor.
    /// Content taller than a full page is placed at the top of a fresh page
    /// and allowed to overflow. Returns true if a page break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.fits(height) || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn move_down(&mut self, height: f32) {
        self.cursor_y += height;
    }

    pub fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn text_at(&mut self, x: f32, line_top: f32, text: &str, style: TextStyle) {
        self.push(DrawOp::Text {
            x,
            y: line_top + style.size * ASCENT,
            text: text.to_string(),
            style,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            thickness,
        });
    }

    /// Wrapped text across the content width. Explicit newlines start new lines.
    pub fn paragraph(&mut self, text: &str, style: TextStyle, align: Align) {
        let width = self.config.content_width();
        for source_line in text.lines() {
            let wrapped = style.wrap(source_line, width, width);
            if wrapped.is_empty() {
                self.ensure_space(style.line_height());
                self.move_down(style.line_height());
                continue;
            }
            for line in wrapped {
                self.ensure_space(style.line_height());
                let x = match align {
                    Align::Left => self.config.margin,
                    Align::Center => {
                        self.config.margin + ((width - style.width_of(&line)) / 2.0).max(0.0)
                    }
                };
                self.text_at(x, self.cursor_y, &line, style);
                self.move_down(style.line_height());
            }
        }
    }

    /// An inline bold-style label followed by wrapped body text, as in
    /// `AGENT: Hello there`. The label and first body line share a baseline.
    pub fn labeled_paragraph(
        &mut self,
        label: &str,
        label_style: TextStyle,
        text: &str,
        style: TextStyle,
    ) {
        let width = self.config.content_width();
        let indent = label_style.width_of(label) + style.width_of(" ");
        let line_height = style.line_height().max(label_style.line_height());
        let wrapped = style.wrap(text, (width - indent).max(0.0), width);

        self.ensure_space(line_height);
        let margin = self.config.margin;
        self.text_at(margin, self.cursor_y, label, label_style);

        let mut lines = wrapped.into_iter();
        if let Some(first) = lines.next() {
            self.text_at(margin + indent, self.cursor_y, &first, style);
        }
        self.move_down(line_height);

        for line in lines {
            self.ensure_space(style.line_height());
            self.text_at(margin, self.cursor_y, &line, style);
            self.move_down(style.line_height());
        }
    }

    /// Horizontal separator across the content width at the cursor.
    pub fn rule(&mut self, color: Color) {
        let y = self.cursor_y;
        let (left, right) = (self.config.margin, self.config.width - self.config.margin);
        self.line(left, y, right, y, color, 1.0);
    }

    pub fn finish(self) -> LaidOutDocument {
        LaidOutDocument {
            config: self.config,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: TextStyle = TextStyle::new(FontStyle::Regular, 12.0, Color::BLACK);
    const LABEL: TextStyle = TextStyle::new(FontStyle::Bold, 12.0, Color::NAVY);

    #[test]
    fn test_default_page_config_geometry() {
        let config = default_page_config();
        assert_eq!(config.content_width(), 532.0);
        assert_eq!(config.bottom(), 752.0);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::NAVY, Color { r: 0, g: 0x33, b: 0x66 });
    }

    #[test]
    fn test_paragraph_advances_cursor_per_line() {
        let mut doc = DocumentBuilder::new(default_page_config());
        doc.paragraph("one\ntwo", BODY, Align::Left);
        assert!((doc.cursor_y() - (40.0 + 2.0 * 14.4)).abs() < 1e-3);
        let laid = doc.finish();
        assert_eq!(laid.texts().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn test_centered_text_is_centered() {
        let mut doc = DocumentBuilder::new(default_page_config());
        doc.paragraph("MARIA LOPEZ", BODY, Align::Center);
        let laid = doc.finish();
        let DrawOp::Text { x, .. } = &laid.pages[0].ops[0] else {
            panic!("expected text op");
        };
        let w = BODY.width_of("MARIA LOPEZ");
        assert!((x + w / 2.0 - 306.0).abs() < 1e-3);
    }

    #[test]
    fn test_overflowing_paragraphs_paginate() {
        let mut doc = DocumentBuilder::new(default_page_config());
        for i in 0..100 {
            doc.paragraph(&format!("line {i}"), BODY, Align::Left);
        }
        assert!(doc.page_count() >= 2);
        let laid = doc.finish();
        for page in &laid.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y <= 752.0, "text below bottom margin at {y}");
                }
            }
        }
        assert!(laid.contains_text("line 99"));
    }

    #[test]
    fn test_labeled_paragraph_shares_first_baseline() {
        let mut doc = DocumentBuilder::new(default_page_config());
        doc.labeled_paragraph("AGENT:", LABEL, "Hi", BODY);
        let laid = doc.finish();
        let ops = &laid.pages[0].ops;
        assert_eq!(ops.len(), 2);
        match (&ops[0], &ops[1]) {
            (
                DrawOp::Text { x: lx, y: ly, text: label, .. },
                DrawOp::Text { x: tx, y: ty, text, .. },
            ) => {
                assert_eq!(label, "AGENT:");
                assert_eq!(text, "Hi");
                assert_eq!(ly, ty);
                assert!(tx > lx);
            }
            other => panic!("unexpected ops {other:?}"),
        }
    }

    #[test]
    fn test_ensure_space_does_not_break_on_fresh_page() {
        let mut doc = DocumentBuilder::new(default_page_config());
        assert!(!doc.ensure_space(10_000.0));
        assert_eq!(doc.page_count(), 1);
        doc.move_down(700.0);
        assert!(doc.ensure_space(100.0));
        assert_eq!(doc.page_count(), 2);
    }
}
