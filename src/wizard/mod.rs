//! The "new timeline" flow: case details, then file staging and upload, then
//! review and submission.
//!
//! ```text
//! Form --next--> Upload --upload_files--> Review --submit--> Form
//!   ^              |  ^                     |
//!   +-----back-----+  +--------edit---------+
//! ```
//!
//! Validation problems and per-file upload failures never surface as errors;
//! they land in [`UploadWizard::status`] the way a form would show them.
//! [`WizardError`] is reserved for calls that make no sense in the current
//! state, and for a rejected submission.

mod preview;
mod staged;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateTimelineRequest, NewFile};
use crate::services::storage::ObjectStorage;
use crate::services::timelines::TimelineService;

pub use preview::{PreviewHandle, PreviewRegistry};
pub use staged::{is_accepted, mime_for, LocalFile, StagedFile, StagedFileId, ACCEPTED_EXTENSIONS};

const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(1500);
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub const FAILED_UPLOADS_NOTICE: &str = "Some files failed to upload. Use Retry or Remove.";
pub const ALL_UPLOADED_NOTICE: &str = "All files uploaded successfully — ready to submit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Form,
    Upload,
    Review,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub case_name: String,
    pub area_of_law: String,
}

impl FormData {
    fn missing_field(&self) -> Option<&'static str> {
        if self.case_name.trim().is_empty() {
            Some("Please enter a case name.")
        } else if self.area_of_law.trim().is_empty() {
            Some("Please select an area of law.")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

/// Outcome of uploading one staged file. An empty `url` marks a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub source: StagedFileId,
    pub file_name: String,
    pub url: String,
    pub size: u64,
    pub mime: Option<String>,
}

impl UploadedFile {
    pub fn is_failed(&self) -> bool {
        self.url.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("action not available in the {actual:?} step (expected {expected:?})")]
    WrongStep { expected: Step, actual: Step },

    #[error("no entry at index {0}")]
    IndexOutOfRange(usize),

    #[error("entry {0} did not fail, nothing to retry")]
    NotFailed(usize),

    #[error("the local file for entry {0} is gone")]
    MissingSource(usize),

    #[error("case name and area of law are required")]
    IncompleteForm,

    #[error("no files to submit")]
    NothingToSubmit,

    #[error("timeline creation failed: {0}")]
    Submission(#[source] AppError),
}

/// Whatever accepts the final "create timeline" call.
#[async_trait]
pub trait TimelineCreator: Send + Sync {
    async fn create_timeline(&self, request: CreateTimelineRequest) -> Result<Uuid, AppError>;
}

#[async_trait]
impl TimelineCreator for TimelineService {
    async fn create_timeline(&self, request: CreateTimelineRequest) -> Result<Uuid, AppError> {
        TimelineService::create_timeline(self, request).await
    }
}

#[derive(Debug, Clone)]
pub struct WizardOptions {
    /// How long the success message stays up before the wizard returns to
    /// the form.
    pub success_delay: Duration,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            success_delay: DEFAULT_SUCCESS_DELAY,
        }
    }
}

pub struct UploadWizard {
    step: Step,
    form: FormData,
    staged: Vec<StagedFile>,
    uploaded: Vec<UploadedFile>,
    status: Option<Status>,
    next_id: u64,
    previews: PreviewRegistry,
    storage: Arc<dyn ObjectStorage>,
    creator: Arc<dyn TimelineCreator>,
    options: WizardOptions,
}

impl UploadWizard {
    pub fn new(storage: Arc<dyn ObjectStorage>, creator: Arc<dyn TimelineCreator>) -> Self {
        Self::with_options(storage, creator, WizardOptions::default())
    }

    pub fn with_options(
        storage: Arc<dyn ObjectStorage>,
        creator: Arc<dyn TimelineCreator>,
        options: WizardOptions,
    ) -> Self {
        Self {
            step: Step::Form,
            form: FormData::default(),
            staged: Vec::new(),
            uploaded: Vec::new(),
            status: None,
            next_id: 0,
            previews: PreviewRegistry::new(),
            storage,
            creator,
            options,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn uploaded(&self) -> &[UploadedFile] {
        &self.uploaded
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    // --- form -------------------------------------------------------------

    pub fn set_case_name(&mut self, value: impl Into<String>) {
        self.form.case_name = value.into();
    }

    pub fn set_area_of_law(&mut self, value: impl Into<String>) {
        self.form.area_of_law = value.into();
    }

    pub fn reset_form(&mut self) {
        self.form = FormData::default();
        self.status = None;
    }

    /// Form -> Upload, provided both fields are filled in. Otherwise the
    /// wizard stays put and explains what is missing in the status.
    pub fn next(&mut self) -> Result<(), WizardError> {
        self.expect_step(Step::Form)?;

        if let Some(message) = self.form.missing_field() {
            self.set_status(StatusKind::Error, message);
            return Ok(());
        }

        self.status = None;
        self.step = Step::Upload;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.expect_step(Step::Upload)?;
        self.step = Step::Form;
        Ok(())
    }

    // --- staging ----------------------------------------------------------

    /// Adds files to the staged list, keeping whatever was staged before.
    /// Unsupported file types are skipped. Returns how many were staged.
    pub fn stage_files(
        &mut self,
        files: impl IntoIterator<Item = LocalFile>,
    ) -> Result<usize, WizardError> {
        self.expect_step(Step::Upload)?;

        let mut staged = 0;
        let mut skipped = 0;
        for file in files {
            if !is_accepted(&file.name) {
                tracing::debug!(file = %file.name, "skipping unsupported file type");
                skipped += 1;
                continue;
            }
            let id = StagedFileId(self.next_id);
            self.next_id += 1;
            self.staged.push(StagedFile::new(id, file, &self.previews));
            staged += 1;
        }

        if skipped > 0 {
            self.set_status(
                StatusKind::Error,
                format!(
                    "Skipped {skipped} unsupported file(s). Accepted: {}",
                    ACCEPTED_EXTENSIONS.join(", ")
                ),
            );
        }
        Ok(staged)
    }

    pub fn remove_staged(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_step(Step::Upload)?;
        if index >= self.staged.len() {
            return Err(WizardError::IndexOutOfRange(index));
        }
        // Dropping the entry revokes its preview.
        self.staged.remove(index);
        Ok(())
    }

    pub fn clear_staged(&mut self) -> Result<(), WizardError> {
        self.expect_step(Step::Upload)?;
        self.staged.clear();
        Ok(())
    }

    // --- upload -----------------------------------------------------------

    /// Uploads every staged file at once and waits for all of them. Failed
    /// uploads are kept as entries with an empty URL. Moves to Review once
    /// the whole batch has settled, whatever the outcome.
    pub async fn upload_files(&mut self) -> Result<(), WizardError> {
        self.expect_step(Step::Upload)?;

        if self.staged.is_empty() {
            self.set_status(StatusKind::Error, "No files selected to upload.");
            return Ok(());
        }

        self.set_status(StatusKind::Info, "Uploading files...");
        let storage = self.storage.as_ref();
        let results = join_all(self.staged.iter().map(|s| upload_one(storage, s))).await;

        let succeeded = results.iter().filter(|r| !r.is_failed()).count();
        let total = results.len();
        tracing::info!(succeeded, total, "upload batch settled");

        self.uploaded = results;
        self.set_status(
            if succeeded == total {
                StatusKind::Success
            } else {
                StatusKind::Error
            },
            format!("Uploaded {succeeded} / {total} file(s)"),
        );
        self.step = Step::Review;
        Ok(())
    }

    // --- review -----------------------------------------------------------

    /// Review -> Upload, keeping the staged files.
    pub fn edit(&mut self) -> Result<(), WizardError> {
        self.expect_step(Step::Review)?;
        self.step = Step::Upload;
        Ok(())
    }

    pub fn failed_count(&self) -> usize {
        self.uploaded.iter().filter(|f| f.is_failed()).count()
    }

    /// Notice shown under the review list: an error while any entry failed,
    /// otherwise a success line. `None` when there is nothing to review.
    pub fn review_notice(&self) -> Option<Status> {
        if self.uploaded.is_empty() {
            return None;
        }
        let (kind, message) = if self.failed_count() > 0 {
            (StatusKind::Error, FAILED_UPLOADS_NOTICE)
        } else {
            (StatusKind::Success, ALL_UPLOADED_NOTICE)
        };
        Some(Status {
            kind,
            message: message.to_string(),
        })
    }

    /// URLs of entries that reached storage. Nothing references these objects
    /// until the timeline is created, so a caller that gives up on the wizard
    /// leaves them behind in the bucket.
    pub fn stored_urls(&self) -> Vec<&str> {
        self.uploaded
            .iter()
            .filter(|f| !f.is_failed())
            .map(|f| f.url.as_str())
            .collect()
    }

    /// Re-uploads the file behind a failed entry and replaces that entry in
    /// place. Other entries are left untouched.
    pub async fn retry_upload(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_step(Step::Review)?;
        let entry = self
            .uploaded
            .get(index)
            .ok_or(WizardError::IndexOutOfRange(index))?;
        if !entry.is_failed() {
            return Err(WizardError::NotFailed(index));
        }

        let source = entry.source;
        let Some(staged) = self.staged.iter().find(|s| s.id() == source) else {
            self.set_status(StatusKind::Error, "Cannot retry: missing file.");
            return Err(WizardError::MissingSource(index));
        };

        tracing::info!(file = %staged.name(), "retrying upload");
        self.status = Some(Status {
            kind: StatusKind::Info,
            message: format!("Retrying upload for {}...", staged.name()),
        });

        let result = upload_one(self.storage.as_ref(), staged).await;
        let failed = result.is_failed();
        self.uploaded[index] = result;

        if failed {
            self.set_status(StatusKind::Error, "Retry failed");
        } else {
            self.set_status(StatusKind::Success, "Retry complete");
        }
        Ok(())
    }

    pub fn remove_uploaded(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_step(Step::Review)?;
        if index >= self.uploaded.len() {
            return Err(WizardError::IndexOutOfRange(index));
        }
        self.uploaded.remove(index);
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.step == Step::Review && !self.uploaded.is_empty()
    }

    /// Sends the case details and every reviewed entry to the creator.
    ///
    /// On success all local state is cleared, the success message is shown
    /// for `success_delay`, and the wizard returns to the form. On failure
    /// nothing is cleared so the same submission can be tried again.
    pub async fn submit(&mut self) -> Result<Uuid, WizardError> {
        self.expect_step(Step::Review)?;
        if self.uploaded.is_empty() {
            return Err(WizardError::NothingToSubmit);
        }
        if self.form.missing_field().is_some() {
            self.set_status(
                StatusKind::Error,
                "Please ensure case name and area of law are provided.",
            );
            return Err(WizardError::IncompleteForm);
        }

        self.set_status(StatusKind::Info, "Submitting timeline...");
        let request = CreateTimelineRequest {
            case_name: self.form.case_name.clone(),
            area_of_law: self.form.area_of_law.clone(),
            files: self
                .uploaded
                .iter()
                .map(|f| NewFile {
                    file_name: f.file_name.clone(),
                    url: f.url.clone(),
                    size: i64::try_from(f.size).unwrap_or(i64::MAX),
                    mime_type: f.mime.clone(),
                })
                .collect(),
        };

        let timeline_id = match self.creator.create_timeline(request).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "timeline creation failed");
                self.set_status(StatusKind::Error, "Failed to create timeline. Please try again.");
                return Err(WizardError::Submission(e));
            }
        };

        self.set_status(StatusKind::Success, "Timeline created successfully!");
        self.form = FormData::default();
        self.staged.clear();
        self.uploaded.clear();

        tokio::time::sleep(self.options.success_delay).await;
        self.status = None;
        self.step = Step::Form;
        Ok(timeline_id)
    }

    fn expect_step(&self, expected: Step) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(Status {
            kind,
            message: message.into(),
        });
    }
}

async fn upload_one(storage: &dyn ObjectStorage, staged: &StagedFile) -> UploadedFile {
    let content_type = staged.mime().unwrap_or(FALLBACK_CONTENT_TYPE);
    let url = match storage
        .upload(staged.name(), content_type, staged.data().clone())
        .await
    {
        Ok(stored) => stored.url,
        Err(e) => {
            tracing::warn!(file = %staged.name(), error = %e, "upload failed");
            String::new()
        }
    };

    UploadedFile {
        source: staged.id(),
        file_name: staged.name().to_string(),
        url,
        size: staged.size(),
        mime: staged.mime().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::services::storage::MemoryStorage;

    #[derive(Default)]
    struct RecordingCreator {
        calls: Mutex<Vec<CreateTimelineRequest>>,
        fail: Mutex<bool>,
    }

    impl RecordingCreator {
        fn calls(&self) -> Vec<CreateTimelineRequest> {
            self.calls.lock().unwrap().clone()
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl TimelineCreator for RecordingCreator {
        async fn create_timeline(&self, request: CreateTimelineRequest) -> Result<Uuid, AppError> {
            self.calls.lock().unwrap().push(request);
            if *self.fail.lock().unwrap() {
                return Err(AppError::InternalServerError("backend down".into()));
            }
            Ok(Uuid::now_v7())
        }
    }

    fn wizard(storage: &MemoryStorage, creator: &Arc<RecordingCreator>) -> UploadWizard {
        UploadWizard::with_options(
            Arc::new(storage.clone()),
            creator.clone(),
            WizardOptions {
                success_delay: Duration::ZERO,
            },
        )
    }

    fn pdf(name: &str, size: usize) -> LocalFile {
        LocalFile::new(name, vec![0u8; size])
    }

    fn at_upload(storage: &MemoryStorage, creator: &Arc<RecordingCreator>) -> UploadWizard {
        let mut w = wizard(storage, creator);
        w.set_case_name("ACME vs Smith");
        w.set_area_of_law("civil");
        w.next().unwrap();
        assert_eq!(w.step(), Step::Upload);
        w
    }

    #[test]
    fn next_requires_both_fields() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = wizard(&storage, &creator);

        w.next().unwrap();
        assert_eq!(w.step(), Step::Form);
        assert_eq!(w.status().unwrap().message, "Please enter a case name.");

        w.set_case_name("ACME vs Smith");
        w.set_area_of_law("   ");
        w.next().unwrap();
        assert_eq!(w.step(), Step::Form);
        assert_eq!(w.status().unwrap().message, "Please select an area of law.");

        w.set_area_of_law("criminal");
        w.next().unwrap();
        assert_eq!(w.step(), Step::Upload);
        assert!(w.status().is_none());
    }

    #[test]
    fn reset_form_clears_fields_and_status() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = wizard(&storage, &creator);
        w.set_case_name("x");
        w.next().unwrap();
        w.reset_form();
        assert_eq!(w.form(), &FormData::default());
        assert!(w.status().is_none());
    }

    #[test]
    fn staging_accumulates_and_skips_unsupported() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);

        assert_eq!(w.stage_files([pdf("a.pdf", 10)]).unwrap(), 1);
        assert_eq!(
            w.stage_files([pdf("b.png", 10), pdf("c.zip", 10)]).unwrap(),
            1
        );

        let names: Vec<&str> = w.staged().iter().map(StagedFile::name).collect();
        assert_eq!(names, ["a.pdf", "b.png"]);
        assert_eq!(w.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn removing_staged_file_keeps_order_and_revokes_preview() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1), pdf("b.png", 1), pdf("c.txt", 1)])
            .unwrap();
        assert_eq!(w.previews().live_count(), 1);

        w.remove_staged(1).unwrap();
        let names: Vec<&str> = w.staged().iter().map(StagedFile::name).collect();
        assert_eq!(names, ["a.pdf", "c.txt"]);
        assert_eq!(w.previews().live_count(), 0);

        assert!(matches!(w.remove_staged(5), Err(WizardError::IndexOutOfRange(5))));
    }

    #[test]
    fn clearing_staged_files_revokes_all_previews() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.png", 1), pdf("b.jpg", 1)]).unwrap();
        assert_eq!(w.previews().live_count(), 2);

        w.clear_staged().unwrap();
        assert!(w.staged().is_empty());
        assert_eq!(w.previews().live_count(), 0);

        w.back().unwrap();
        assert_eq!(w.step(), Step::Form);
    }

    #[tokio::test]
    async fn uploading_nothing_stays_on_upload_step() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);

        w.upload_files().await.unwrap();
        assert_eq!(w.step(), Step::Upload);
        assert_eq!(w.status().unwrap().message, "No files selected to upload.");
    }

    #[tokio::test]
    async fn partial_failure_keeps_every_entry() {
        let storage = MemoryStorage::new();
        storage.fail_on("b.png");
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 500_000), pdf("b.png", 2_000_000)])
            .unwrap();

        w.upload_files().await.unwrap();

        assert_eq!(w.step(), Step::Review);
        let entries = w.uploaded();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "a.pdf");
        assert!(!entries[0].url.is_empty());
        assert_eq!(entries[0].size, 500_000);
        assert_eq!(entries[1].file_name, "b.png");
        assert!(entries[1].url.is_empty());
        assert!(entries[1].is_failed());
        let notice = w.review_notice().unwrap();
        assert_eq!(notice.kind, StatusKind::Error);
        assert_eq!(notice.message, FAILED_UPLOADS_NOTICE);
        assert_eq!(w.stored_urls(), [entries[0].url.as_str()]);
        assert_eq!(w.status().unwrap().message, "Uploaded 1 / 2 file(s)");
    }

    #[tokio::test]
    async fn total_failure_still_reaches_review() {
        let storage = MemoryStorage::new();
        storage.fail_on("a.pdf");
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1)]).unwrap();

        w.upload_files().await.unwrap();
        assert_eq!(w.step(), Step::Review);
        assert_eq!(w.failed_count(), 1);
    }

    #[tokio::test]
    async fn retry_replaces_only_the_failed_slot() {
        let storage = MemoryStorage::new();
        storage.fail_on("b.pdf");
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1), pdf("b.pdf", 2), pdf("c.pdf", 3)])
            .unwrap();
        w.upload_files().await.unwrap();
        let before = w.uploaded().to_vec();

        assert!(matches!(w.retry_upload(0).await, Err(WizardError::NotFailed(0))));

        w.retry_upload(1).await.unwrap();
        assert_eq!(w.status().unwrap().message, "Retry failed");
        assert!(w.uploaded()[1].is_failed());

        storage.recover("b.pdf");
        w.retry_upload(1).await.unwrap();
        assert_eq!(w.status().unwrap().message, "Retry complete");

        let after = w.uploaded();
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1].file_name, "b.pdf");
        assert!(!after[1].is_failed());
        let notice = w.review_notice().unwrap();
        assert_eq!(notice.kind, StatusKind::Success);
        assert_eq!(notice.message, ALL_UPLOADED_NOTICE);
        assert_eq!(w.stored_urls().len(), 3);
    }

    #[tokio::test]
    async fn removing_reviewed_entry_keeps_order() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1), pdf("b.pdf", 1), pdf("c.pdf", 1)])
            .unwrap();
        w.upload_files().await.unwrap();

        w.remove_uploaded(0).unwrap();
        let names: Vec<&str> = w.uploaded().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn submit_with_blank_form_never_calls_creator() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1)]).unwrap();
        w.upload_files().await.unwrap();

        w.set_case_name("");
        assert!(matches!(w.submit().await, Err(WizardError::IncompleteForm)));
        assert!(creator.calls().is_empty());
        assert_eq!(w.step(), Step::Review);
    }

    #[tokio::test]
    async fn submit_without_entries_is_rejected() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1)]).unwrap();
        w.upload_files().await.unwrap();
        w.remove_uploaded(0).unwrap();

        assert!(!w.can_submit());
        assert!(matches!(w.submit().await, Err(WizardError::NothingToSubmit)));
        assert!(creator.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_submission_preserves_state() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        creator.set_failing(true);
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1)]).unwrap();
        w.upload_files().await.unwrap();

        assert!(matches!(w.submit().await, Err(WizardError::Submission(_))));
        assert_eq!(w.step(), Step::Review);
        assert_eq!(w.uploaded().len(), 1);
        assert_eq!(w.form().case_name, "ACME vs Smith");
        assert_eq!(
            w.status().unwrap().message,
            "Failed to create timeline. Please try again."
        );

        creator.set_failing(false);
        w.submit().await.unwrap();
        assert_eq!(creator.calls().len(), 2);
    }

    #[tokio::test]
    async fn successful_submission_resets_to_form() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 500_000), pdf("b.png", 2_000_000)])
            .unwrap();
        w.upload_files().await.unwrap();

        w.submit().await.unwrap();

        let calls = creator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].case_name, "ACME vs Smith");
        assert_eq!(calls[0].area_of_law, "civil");
        assert_eq!(calls[0].files.len(), 2);
        assert_eq!(calls[0].files[1].size, 2_000_000);
        assert_eq!(calls[0].files[1].mime_type.as_deref(), Some("image/png"));

        assert_eq!(w.step(), Step::Form);
        assert!(w.status().is_none());
        assert!(w.staged().is_empty());
        assert!(w.uploaded().is_empty());
        assert_eq!(w.form(), &FormData::default());
        assert_eq!(w.previews().live_count(), 0);
    }

    #[tokio::test]
    async fn edit_returns_to_staging_with_files_kept() {
        let storage = MemoryStorage::new();
        let creator = Arc::new(RecordingCreator::default());
        let mut w = at_upload(&storage, &creator);
        w.stage_files([pdf("a.pdf", 1)]).unwrap();
        w.upload_files().await.unwrap();

        w.edit().unwrap();
        assert_eq!(w.step(), Step::Upload);
        assert_eq!(w.staged().len(), 1);
        assert!(matches!(
            w.submit().await,
            Err(WizardError::WrongStep { expected: Step::Review, actual: Step::Upload })
        ));
    }
}
