// Report layout: font metrics, word wrap, a paginated document builder,
// the question/answer table, and the printpdf backend.
// Layout is pure computation; `pdf.rs` is the only place that touches printpdf.

pub mod document;
pub mod font_metrics;
pub mod pdf;
pub mod table;
pub mod wrap;

// Re-export the public API consumed by the report renderer.
pub use document::{default_page_config, Align, Color, DocumentBuilder, LaidOutDocument, TextStyle};
pub use font_metrics::FontStyle;
pub use pdf::{render_pdf, RenderError};
pub use table::{default_table_style, Table, TableEntry};
