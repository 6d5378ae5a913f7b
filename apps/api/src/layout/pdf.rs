//! Serializes a `LaidOutDocument` to PDF bytes with printpdf.
//!
//! Uses the non-embedded base-14 Helvetica fonts, which is what the metric
//! tables in `font_metrics.rs` describe. Layout coordinates are top-down
//! points; PDF is bottom-up, and printpdf takes millimetres.

use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use crate::layout::document::{Color, DrawOp, LaidOutDocument, Page};
use crate::layout::font_metrics::FontStyle;

const LAYER_NAME: &str = "content";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        None,
    ))
}

/// Maps typographic punctuation that base-14 fonts cannot show to ASCII.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => "'".to_string(),
            '\u{201C}' | '\u{201D}' | '\u{2033}' => "\"".to_string(),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => "-".to_string(),
            '\u{2022}' => "-".to_string(),
            '\u{2026}' => "...".to_string(),
            '\u{00A0}' => " ".to_string(),
            c if c.is_control() => String::new(),
            c => c.to_string(),
        })
        .collect()
}

/// Renders every page of the document and returns the PDF file bytes.
pub fn render_pdf(doc: &LaidOutDocument, title: &str) -> Result<Vec<u8>, RenderError> {
    let (width, height) = (pt_to_mm(doc.config.width), pt_to_mm(doc.config.height));
    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let fonts = Fonts {
        regular: add_font(&pdf, BuiltinFont::Helvetica)?,
        bold: add_font(&pdf, BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in doc.pages.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, page, doc.config.height, &fonts);
    }

    pdf.save_to_bytes()
        .map_err(|e| RenderError::Pdf(format!("failed to serialize PDF: {e:?}")))
}

fn add_font(pdf: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, RenderError> {
    pdf.add_builtin_font(font)
        .map_err(|e| RenderError::Pdf(format!("failed to add builtin font: {e:?}")))
}

fn draw_page(layer: &PdfLayerReference, page: &Page, page_height: f32, fonts: &Fonts) {
    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, text, style } => {
                layer.set_fill_color(pdf_color(style.color));
                layer.use_text(
                    sanitize_text(text),
                    style.size,
                    pt_to_mm(*x),
                    pt_to_mm(page_height - *y),
                    fonts.get(style.font),
                );
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                thickness,
            } => {
                layer.set_outline_color(pdf_color(*color));
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(pt_to_mm(*x1), pt_to_mm(page_height - *y1)), false),
                        (Point::new(pt_to_mm(*x2), pt_to_mm(page_height - *y2)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}
