//! Post-call report job.
//!
//! One `run` call:
//! 1. lists recent conversations and picks the newest one with status `done`
//! 2. claims it through the `ProcessedGate` (a claimed id is never retried)
//! 3. fetches the full conversation and resolves the candidate by phone number
//! 4. renders the narrative PDF, plus the questionnaire PDF when enabled
//! 5. writes the files, mails them, then deletes them whatever the mail outcome

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::interviews::InterviewRegistry;
use crate::layout::RenderError;
use crate::questions::questionnaire_for;
use crate::report::gate::ProcessedGate;
use crate::report::render::{
    render_reports, CandidateInfo, RenderedReport, ReportInput, NO_SUMMARY,
};
use crate::vendors::elevenlabs::{ConversationDetail, ConversationSummary};
use crate::vendors::mailer::MailError;
use crate::vendors::{ConversationSource, Mailer, OutgoingReport, VendorError};

pub const REPORT_EMAIL_BODY: &str = "Please find attached the interview transcript.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Conversation API error: {0}")]
    Vendor(#[from] VendorError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Could not write report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Render task failed: {0}")]
    Join(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    NoCompletedConversation,
    AlreadyProcessed { conversation_id: String },
    Sent {
        conversation_id: String,
        attachments: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub page_size: u32,
    pub report_dir: PathBuf,
    pub include_questionnaire: bool,
}

pub struct ReportGenerator {
    conversations: Arc<dyn ConversationSource>,
    registry: Arc<dyn InterviewRegistry>,
    mailer: Arc<dyn Mailer>,
    gate: ProcessedGate,
    settings: ReportSettings,
}

impl ReportGenerator {
    pub fn new(
        conversations: Arc<dyn ConversationSource>,
        registry: Arc<dyn InterviewRegistry>,
        mailer: Arc<dyn Mailer>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            conversations,
            registry,
            mailer,
            gate: ProcessedGate::new(),
            settings,
        }
    }

    pub fn gate(&self) -> &ProcessedGate {
        &self.gate
    }

    pub async fn run(&self) -> Result<ReportOutcome, ReportError> {
        let conversations = self
            .conversations
            .list_conversations(self.settings.page_size)
            .await?;

        let Some(latest) = latest_completed(&conversations) else {
            warn!("No completed conversation found");
            return Ok(ReportOutcome::NoCompletedConversation);
        };
        let conversation_id = latest.conversation_id.clone();

        if !self.gate.claim(&conversation_id) {
            warn!(conversation_id = %conversation_id, "Latest conversation already processed");
            return Ok(ReportOutcome::AlreadyProcessed { conversation_id });
        }

        let detail = self.conversations.get_conversation(&conversation_id).await?;
        info!(
            conversation_id = %conversation_id,
            status = %detail.status,
            call_sid = ?detail.metadata.phone_call.as_ref().and_then(|p| p.call_sid.as_deref()),
            turns = detail.transcript.len(),
            "Fetched conversation"
        );

        let candidate = self.resolve_candidate(&detail).await;
        let input = self.report_input(detail, candidate.clone());

        // Layout and PDF serialization are CPU-bound.
        let rendered: Vec<RenderedReport> =
            tokio::task::spawn_blocking(move || render_reports(&input))
                .await
                .map_err(|e| ReportError::Join(e.to_string()))??;

        let mut written = Vec::with_capacity(rendered.len());
        let delivery = self
            .write_and_send(&candidate, &rendered, &mut written)
            .await;
        remove_report_files(&written).await;
        delivery?;

        let attachments: Vec<String> = rendered.into_iter().map(|r| r.filename).collect();
        info!(
            conversation_id = %conversation_id,
            candidate = %candidate.full_name(),
            attachments = ?attachments,
            "Interview report emailed"
        );
        Ok(ReportOutcome::Sent {
            conversation_id,
            attachments,
        })
    }

    /// Registry lookup by the caller's number. A miss, or a registry failure,
    /// yields the `Unknown` candidate so the report still goes out.
    async fn resolve_candidate(&self, detail: &ConversationDetail) -> CandidateInfo {
        let phone = detail.phone_number();
        let Some(number) = phone else {
            warn!(conversation_id = %detail.conversation_id, "Conversation has no caller number");
            return CandidateInfo::unknown(None);
        };

        match self.registry.get(number).await {
            Ok(Some(interview)) => CandidateInfo {
                first_name: interview.first_name,
                last_name: interview.last_name,
                phone_number: interview.phone_number,
                occupation: interview.occupation,
            },
            Ok(None) => {
                warn!(phone = %number, "No pending interview for caller");
                CandidateInfo::unknown(phone)
            }
            Err(e) => {
                warn!(phone = %number, error = %e, "Registry lookup failed; reporting as unknown caller");
                CandidateInfo::unknown(phone)
            }
        }
    }

    fn report_input(&self, detail: ConversationDetail, candidate: CandidateInfo) -> ReportInput {
        let questionnaire = if self.settings.include_questionnaire {
            questionnaire_for(&candidate.occupation)
        } else {
            None
        };
        let interview_date = detail
            .metadata
            .start_time_unix_secs
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        let summary = detail
            .analysis
            .transcript_summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUMMARY)
            .to_string();

        ReportInput {
            answers: detail.analysis.extracted_answers(),
            conversation_id: detail.conversation_id,
            candidate,
            interview_date,
            summary,
            transcript: detail.transcript,
            questionnaire,
        }
    }

    /// Writes every report into the report directory, recording each path in
    /// `written` as it lands, then mails them.
    async fn write_and_send(
        &self,
        candidate: &CandidateInfo,
        rendered: &[RenderedReport],
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ReportError> {
        tokio::fs::create_dir_all(&self.settings.report_dir).await?;
        for report in rendered {
            let path = self.settings.report_dir.join(&report.filename);
            tokio::fs::write(&path, &report.bytes).await?;
            written.push(path);
        }

        let email = OutgoingReport {
            subject: format!("Interview Report: {}", candidate.full_name()),
            body: REPORT_EMAIL_BODY.to_string(),
            attachments: written.clone(),
        };
        self.mailer.send(&email).await?;
        Ok(())
    }
}

/// Newest conversation with status `done`. Missing start times count as 0;
/// ties go to the earlier entry in the listing.
pub fn latest_completed(conversations: &[ConversationSummary]) -> Option<&ConversationSummary> {
    conversations
        .iter()
        .rev()
        .filter(|c| c.is_done())
        .max_by_key(|c| c.start_time())
}

async fn remove_report_files(paths: &[PathBuf]) {
    for path in paths {
        remove_report_file(path).await;
    }
}

async fn remove_report_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Could not delete report file");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::interviews::models::PendingInterview;
    use crate::interviews::InMemoryRegistry;

    /// Serves a fixed conversation listing and detail, counting list calls.
    pub(crate) struct FakeConversations {
        pub summaries: Vec<ConversationSummary>,
        pub detail: ConversationDetail,
        pub list_calls: AtomicUsize,
    }

    #[async_trait]
    impl ConversationSource for FakeConversations {
        async fn list_conversations(
            &self,
            _page_size: u32,
        ) -> Result<Vec<ConversationSummary>, VendorError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.summaries.clone())
        }

        async fn get_conversation(
            &self,
            conversation_id: &str,
        ) -> Result<ConversationDetail, VendorError> {
            let mut detail = self.detail.clone();
            detail.conversation_id = conversation_id.to_string();
            Ok(detail)
        }
    }

    /// Records each email and whether its attachments existed at send time.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<(OutgoingReport, bool)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, report: &OutgoingReport) -> Result<(), MailError> {
            let all_exist = report.attachments.iter().all(|p| p.exists());
            self.sent.lock().unwrap().push((report.clone(), all_exist));
            if self.fail {
                return Err(MailError::Attachment {
                    path: PathBuf::from("unreachable"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "smtp down"),
                });
            }
            Ok(())
        }
    }

    pub(crate) fn summary(id: &str, status: &str, start: Option<i64>) -> ConversationSummary {
        ConversationSummary {
            conversation_id: id.to_string(),
            status: status.to_string(),
            start_time_unix_secs: start,
            metadata: None,
        }
    }

    pub(crate) fn detail(phone: Option<&str>) -> ConversationDetail {
        serde_json::from_value(json!({
            "conversation_id": "placeholder",
            "status": "done",
            "transcript": [
                {"role": "agent", "message": "Hi Maria, I'm Joe."},
                {"role": "user", "message": "Hello"}
            ],
            "metadata": {
                "start_time_unix_secs": 1_709_649_000,
                "phone_call": {"external_number": phone, "call_sid": "CA123"}
            },
            "analysis": {
                "transcript_summary": "Good fit",
                "data_collection_results": {
                    "years_experience_total": {"value": "5 years"}
                }
            }
        }))
        .unwrap()
    }

    pub(crate) fn fake_conversations(phone: Option<&str>) -> Arc<FakeConversations> {
        Arc::new(FakeConversations {
            summaries: vec![
                summary("conv_old", "done", Some(100)),
                summary("conv_new", "done", Some(200)),
                summary("conv_live", "in-progress", Some(300)),
            ],
            detail: detail(phone),
            list_calls: AtomicUsize::new(0),
        })
    }

    fn maria() -> PendingInterview {
        PendingInterview {
            phone_number: "+15550001111".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Lopez".to_string(),
            occupation: "Electrician".to_string(),
            language: "en".to_string(),
            prompt: "prompt".to_string(),
            invited_at: Utc::now(),
        }
    }

    struct Harness {
        generator: ReportGenerator,
        mailer: Arc<RecordingMailer>,
        dir: tempfile::TempDir,
    }

    async fn harness(phone: Option<&str>, mailer: RecordingMailer, questionnaire: bool) -> Harness {
        let registry = Arc::new(InMemoryRegistry::new());
        registry.put(maria()).await.unwrap();
        let mailer = Arc::new(mailer);
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(
            fake_conversations(phone),
            registry,
            mailer.clone(),
            ReportSettings {
                page_size: 10,
                report_dir: dir.path().join("reports"),
                include_questionnaire: questionnaire,
            },
        );
        Harness {
            generator,
            mailer,
            dir,
        }
    }

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }

    #[test]
    fn test_latest_completed_picks_newest_done() {
        let listing = vec![
            summary("a", "done", Some(100)),
            summary("b", "processing", Some(500)),
            summary("c", "done", Some(300)),
            summary("d", "done", None),
        ];
        assert_eq!(latest_completed(&listing).unwrap().conversation_id, "c");
        assert!(latest_completed(&[summary("x", "failed", Some(1))]).is_none());
        assert!(latest_completed(&[]).is_none());
    }

    #[test]
    fn test_latest_completed_tie_prefers_listing_order() {
        let listing = vec![summary("first", "done", Some(7)), summary("second", "done", Some(7))];
        assert_eq!(latest_completed(&listing).unwrap().conversation_id, "first");
    }

    #[tokio::test]
    async fn test_run_sends_report_for_known_candidate() {
        let h = harness(Some("+15550001111"), RecordingMailer::default(), true).await;

        let outcome = h.generator.run().await.unwrap();
        assert_eq!(
            outcome,
            ReportOutcome::Sent {
                conversation_id: "conv_new".to_string(),
                attachments: vec![
                    "transcript_conv_new.pdf".to_string(),
                    "questionnaire_conv_new.pdf".to_string()
                ],
            }
        );

        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (email, existed) = &sent[0];
        assert!(*existed, "attachments should exist while mailing");
        assert_eq!(email.subject, "Interview Report: Maria Lopez");
        assert_eq!(email.body, REPORT_EMAIL_BODY);
        assert_eq!(email.attachments.len(), 2);
        assert!(dir_is_empty(&h.dir.path().join("reports")));
    }

    #[tokio::test]
    async fn test_run_is_idempotent_for_same_conversation() {
        let h = harness(Some("+15550001111"), RecordingMailer::default(), false).await;

        assert!(matches!(h.generator.run().await.unwrap(), ReportOutcome::Sent { .. }));
        assert_eq!(
            h.generator.run().await.unwrap(),
            ReportOutcome::AlreadyProcessed {
                conversation_id: "conv_new".to_string()
            }
        );
        assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
        assert!(h.generator.gate().is_processed("conv_new"));
    }

    #[tokio::test]
    async fn test_unknown_caller_uses_placeholder_candidate() {
        let h = harness(Some("+19999999999"), RecordingMailer::default(), true).await;

        let outcome = h.generator.run().await.unwrap();
        // Occupation is Unknown, so no questionnaire is attached.
        assert_eq!(
            outcome,
            ReportOutcome::Sent {
                conversation_id: "conv_new".to_string(),
                attachments: vec!["transcript_conv_new.pdf".to_string()],
            }
        );
        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent[0].0.subject, "Interview Report: Unknown");
    }

    #[tokio::test]
    async fn test_no_completed_conversation_sends_nothing() {
        let registry = Arc::new(InMemoryRegistry::new());
        let mailer = Arc::new(RecordingMailer::default());
        let conversations = Arc::new(FakeConversations {
            summaries: vec![summary("live", "in-progress", Some(1))],
            detail: detail(None),
            list_calls: AtomicUsize::new(0),
        });
        let generator = ReportGenerator::new(
            conversations,
            registry,
            mailer.clone(),
            ReportSettings {
                page_size: 10,
                report_dir: std::env::temp_dir(),
                include_questionnaire: true,
            },
        );

        assert_eq!(
            generator.run().await.unwrap(),
            ReportOutcome::NoCompletedConversation
        );
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_files_deleted_when_mail_fails() {
        let failing = RecordingMailer {
            fail: true,
            ..Default::default()
        };
        let h = harness(Some("+15550001111"), failing, true).await;

        let err = h.generator.run().await.unwrap_err();
        assert!(matches!(err, ReportError::Mail(_)));
        assert!(h.mailer.sent.lock().unwrap()[0].1);
        assert!(dir_is_empty(&h.dir.path().join("reports")));
        // Claimed before delivery; not retried.
        assert!(h.generator.gate().is_processed("conv_new"));
    }

    #[test]
    fn test_report_input_defaults_missing_summary() {
        let generator = ReportGenerator::new(
            fake_conversations(None),
            Arc::new(InMemoryRegistry::new()),
            Arc::new(RecordingMailer::default()),
            ReportSettings {
                page_size: 10,
                report_dir: std::env::temp_dir(),
                include_questionnaire: true,
            },
        );
        let mut detail = detail(None);
        detail.analysis.transcript_summary = Some("   ".to_string());
        detail.analysis.data_collection_results = HashMap::new();

        let input = generator.report_input(detail, CandidateInfo::unknown(None));
        assert_eq!(input.summary, NO_SUMMARY);
        assert!(input.questionnaire.is_none());
        assert!(input.answers.is_empty());
        assert!(input.interview_date.is_some());
    }
}
