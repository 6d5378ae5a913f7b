//! Report documents: the narrative transcript report and the questionnaire table.
//!
//! Both are pure layout functions returning a `LaidOutDocument`; `render_reports`
//! turns them into named PDF buffers.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::layout::{
    default_page_config, default_table_style, render_pdf, Align, Color, DocumentBuilder,
    FontStyle, LaidOutDocument, RenderError, Table, TableEntry, TextStyle,
};
use crate::questions::QuestionCategory;
use crate::vendors::elevenlabs::TranscriptTurn;

pub const UNKNOWN: &str = "Unknown";
pub const NO_SUMMARY: &str = "No summary available";

const NAME_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 22.0, Color::NAVY);
const INFO_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 14.0, Color::DARK_GRAY);
const HEADING_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 16.0, Color::BLACK);
const BODY_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 12.0, Color::BODY);
const LABEL_STYLE: TextStyle = TextStyle::new(FontStyle::Bold, 12.0, Color::NAVY);
const MESSAGE_STYLE: TextStyle = TextStyle::new(FontStyle::Regular, 12.0, Color::BLACK);
const PARAGRAPH_GAP: f32 = 10.0;

/// Who the report is about. Fields fall back to `Unknown` when the caller's
/// number had no pending interview.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub occupation: String,
}

impl CandidateInfo {
    pub fn unknown(phone_number: Option<&str>) -> Self {
        Self {
            first_name: UNKNOWN.to_string(),
            last_name: String::new(),
            phone_number: phone_number.unwrap_or(UNKNOWN).to_string(),
            occupation: UNKNOWN.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Everything needed to render a conversation's report files. Owned so it can
/// move into `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub conversation_id: String,
    pub candidate: CandidateInfo,
    pub interview_date: Option<DateTime<Utc>>,
    pub summary: String,
    pub transcript: Vec<TranscriptTurn>,
    pub answers: HashMap<String, String>,
    /// Present only when the questionnaire report should be produced.
    pub questionnaire: Option<&'static [QuestionCategory]>,
}

/// A rendered PDF ready to be written to disk.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Bytes,
}

pub fn role_label(role: &str) -> &'static str {
    if role == "agent" {
        "AGENT:"
    } else {
        "CANDIDATE:"
    }
}

/// Keeps conversation ids safe to use inside a file name.
pub fn file_stem(conversation_id: &str) -> String {
    conversation_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Renders the narrative report and, when requested, the questionnaire report.
pub fn render_reports(input: &ReportInput) -> Result<Vec<RenderedReport>, RenderError> {
    let stem = file_stem(&input.conversation_id);
    let mut reports = Vec::with_capacity(2);

    let narrative = layout_transcript_report(input);
    reports.push(RenderedReport {
        filename: format!("transcript_{stem}.pdf"),
        bytes: Bytes::from(render_pdf(&narrative, &format!("Interview Transcript {stem}"))?),
    });

    if let Some(categories) = input.questionnaire {
        let table = layout_questionnaire_report(input, categories);
        reports.push(RenderedReport {
            filename: format!("questionnaire_{stem}.pdf"),
            bytes: Bytes::from(render_pdf(&table, &format!("Interview Questionnaire {stem}"))?),
        });
    }

    Ok(reports)
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative report
// ────────────────────────────────────────────────────────────────────────────

pub fn layout_transcript_report(input: &ReportInput) -> LaidOutDocument {
    let mut doc = DocumentBuilder::new(default_page_config());
    let candidate = &input.candidate;

    doc.paragraph(&candidate.full_name().to_uppercase(), NAME_STYLE, Align::Center);
    doc.paragraph(
        &format!("Phone Number: {}", candidate.phone_number),
        INFO_STYLE,
        Align::Center,
    );
    doc.paragraph(
        &format!("Position Applied: {}", candidate.occupation),
        INFO_STYLE,
        Align::Center,
    );
    if let Some(date) = input.interview_date {
        doc.paragraph(
            &format!("Interview Date: {}", date.format("%B %-d, %Y %H:%M UTC")),
            INFO_STYLE,
            Align::Center,
        );
    }

    doc.move_down(14.0);
    doc.rule(Color::RULE);
    doc.move_down(16.0);

    heading(&mut doc, "Interview Summary");
    doc.paragraph(&input.summary, BODY_STYLE, Align::Left);

    doc.move_down(16.0);
    doc.ensure_space(HEADING_STYLE.line_height() * 2.0);
    doc.rule(Color::RULE);
    doc.move_down(14.0);

    heading(&mut doc, "Full Transcript");
    for turn in &input.transcript {
        let Some(message) = turn.message.as_deref().filter(|m| !m.trim().is_empty()) else {
            continue;
        };
        doc.labeled_paragraph(role_label(&turn.role), LABEL_STYLE, message, MESSAGE_STYLE);
        doc.move_down(PARAGRAPH_GAP);
    }

    doc.finish()
}

/// Bold section heading with an underline the width of the text.
fn heading(doc: &mut DocumentBuilder, text: &str) {
    doc.ensure_space(HEADING_STYLE.line_height() * 2.0);
    let top = doc.cursor_y();
    let x = doc.config().margin;
    doc.text_at(x, top, text, HEADING_STYLE);
    let underline_y = top + HEADING_STYLE.size * 0.95;
    doc.line(
        x,
        underline_y,
        x + HEADING_STYLE.width_of(text),
        underline_y,
        HEADING_STYLE.color,
        0.8,
    );
    doc.move_down(HEADING_STYLE.line_height() + 5.0);
}

// ────────────────────────────────────────────────────────────────────────────
// Questionnaire report
// ────────────────────────────────────────────────────────────────────────────

pub fn layout_questionnaire_report(
    input: &ReportInput,
    categories: &[QuestionCategory],
) -> LaidOutDocument {
    let mut doc = DocumentBuilder::new(default_page_config());
    let candidate = &input.candidate;

    doc.paragraph(
        &format!("{} Interview Questionnaire", candidate.occupation),
        TextStyle::new(FontStyle::Bold, 18.0, Color::NAVY),
        Align::Center,
    );
    doc.paragraph(
        &format!("{}  |  {}", candidate.full_name(), candidate.phone_number),
        BODY_STYLE,
        Align::Center,
    );
    doc.move_down(12.0);

    let entries = questionnaire_entries(categories, &known_answers(input));
    let table = Table::new(default_table_style(), &doc);
    table.draw(&mut doc, &entries);

    doc.finish()
}

/// Flattens categories into table entries, pairing each question with the
/// extracted answer for its field id (or `None`).
pub fn questionnaire_entries(
    categories: &[QuestionCategory],
    answers: &HashMap<String, String>,
) -> Vec<TableEntry> {
    let mut entries = Vec::new();
    for category in categories {
        entries.push(TableEntry::Category(category.title.to_string()));
        for q in category.questions {
            entries.push(TableEntry::Row {
                question: q.question.to_string(),
                answer: answers.get(q.field_id).cloned(),
            });
        }
    }
    entries
}

/// Extracted answers, plus the applicant name and contact date when the agent
/// did not capture them but the service knows them.
fn known_answers(input: &ReportInput) -> HashMap<String, String> {
    let mut answers = input.answers.clone();
    if input.candidate.first_name != UNKNOWN {
        answers
            .entry("applicant_name".to_string())
            .or_insert_with(|| input.candidate.full_name());
    }
    if let Some(date) = input.interview_date {
        answers
            .entry("contact_date".to_string())
            .or_insert_with(|| date.format("%Y-%m-%d").to_string());
    }
    answers
}
