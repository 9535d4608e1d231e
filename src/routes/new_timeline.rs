//! Browser flow for opening a case: a plain form that posts case details and
//! files in one multipart request. The server drives the upload wizard for
//! the whole request: validate, upload everything, retry failures once, then
//! create the timeline. If files still fail, nothing is created and the
//! review list is shown so the user can resubmit.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::models::AreaOfLaw;
use crate::state::AppState;
use crate::utils::{escape_html, format_file_size};
use crate::wizard::{
    LocalFile, Status, StatusKind, Step, UploadWizard, UploadedFile, WizardOptions,
    ACCEPTED_EXTENSIONS,
};

#[utoipa::path(
    get,
    path = "/timelines/new",
    responses(
        (status = 200, description = "New timeline form", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn new_timeline_form() -> Html<String> {
    Html(render_form("", "", None, &[]))
}

#[utoipa::path(
    post,
    path = "/timelines/new",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Timeline created, redirect to the dashboard"),
        (status = 200, description = "Form re-rendered with a status message", content_type = "text/html"),
        (status = 400, description = "Bad Request")
    ),
    tag = "General"
)]
pub async fn submit_new_timeline(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut wizard = UploadWizard::with_options(
        state.storage.clone(),
        Arc::new(state.timelines.clone()),
        WizardOptions {
            success_delay: Duration::ZERO,
        },
    );
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("caseName") => wizard.set_case_name(read_text(field).await?),
            Some("areaOfLaw") => wizard.set_area_of_law(read_text(field).await?),
            Some("files") => {
                let Some(name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let mime = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::BadRequest("Failed to read file bytes".to_string()))?;
                if name.is_empty() && data.is_empty() {
                    continue;
                }
                let mut file = LocalFile::new(name, data);
                if file.mime.is_none() {
                    file.mime = mime;
                }
                files.push(file);
            }
            _ => {}
        }
    }

    run_wizard(&mut wizard, files)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

async fn run_wizard(
    wizard: &mut UploadWizard,
    files: Vec<LocalFile>,
) -> Result<Response, crate::wizard::WizardError> {
    wizard.next()?;
    if wizard.step() != Step::Upload {
        return Ok(rerender(wizard, &[]));
    }

    wizard.stage_files(files)?;
    wizard.upload_files().await?;
    if wizard.step() != Step::Review {
        return Ok(rerender(wizard, &[]));
    }

    let failed: Vec<usize> = (0..wizard.uploaded().len())
        .filter(|&i| wizard.uploaded()[i].is_failed())
        .collect();
    for index in failed {
        wizard.retry_upload(index).await?;
    }

    if let Some(notice) = wizard
        .review_notice()
        .filter(|n| n.kind == StatusKind::Error)
    {
        log_abandoned_uploads(wizard);
        return Ok(Html(render_form(
            &wizard.form().case_name,
            &wizard.form().area_of_law,
            Some(&notice),
            wizard.uploaded(),
        ))
        .into_response());
    }

    match wizard.submit().await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "new timeline submission failed");
            log_abandoned_uploads(wizard);
            Ok(rerender(wizard, &[]))
        }
    }
}

/// The wizard lives for one request, so objects stored before an aborted
/// submission are not reused by the next one. Their URLs are logged for
/// cleanup; a resubmission uploads every file again.
fn log_abandoned_uploads(wizard: &UploadWizard) {
    let urls = wizard.stored_urls();
    if !urls.is_empty() {
        tracing::warn!(count = urls.len(), urls = ?urls, "stored objects left without a timeline");
    }
}

fn rerender(wizard: &UploadWizard, entries: &[UploadedFile]) -> Response {
    Html(render_form(
        &wizard.form().case_name,
        &wizard.form().area_of_law,
        wizard.status(),
        entries,
    ))
    .into_response()
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|_| AppError::BadRequest("Invalid form field".to_string()))
}

fn render_form(
    case_name: &str,
    area_of_law: &str,
    status: Option<&Status>,
    entries: &[UploadedFile],
) -> String {
    let mut options = String::from(r#"<option value="">Select area of law</option>"#);
    for area in AreaOfLaw::ALL {
        let selected = if area.value() == area_of_law { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{}"{selected}>{}</option>"#,
            area.value(),
            area.label()
        );
    }

    let status_html = status
        .map(|s| {
            let class = match s.kind {
                StatusKind::Error => "error",
                StatusKind::Success => "success",
                StatusKind::Info => "info",
            };
            format!(r#"<div class="status {class}">{}</div>"#, escape_html(&s.message))
        })
        .unwrap_or_default();

    let mut review = String::new();
    if !entries.is_empty() {
        review.push_str("<ul class=\"review\">");
        for entry in entries {
            let outcome = if entry.is_failed() { "Upload failed" } else { "Uploaded" };
            let _ = write!(
                review,
                "<li>{} ({}) - {outcome}</li>",
                escape_html(&entry.file_name),
                format_file_size(entry.size)
            );
        }
        review.push_str("</ul>");
    }

    let accept: Vec<String> = ACCEPTED_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>New Timeline</title>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f0f0f0; padding: 32px; }}
        .status.error {{ color: #b91c1c; }}
        .status.success {{ color: #15803d; }}
        .status.info {{ color: #1d4ed8; }}
    </style>
</head>
<body>
    <h1>New Timeline</h1>
    <p>Enter timeline details and upload relevant files</p>
    {status_html}
    {review}
    <form method="post" action="/timelines/new" enctype="multipart/form-data">
        <label>Case Name * <input name="caseName" value="{case_name}" placeholder="e.g. ACME vs Smith" required></label>
        <label>Area of Law * <select name="areaOfLaw" required>{options}</select></label>
        <label>Files <input type="file" name="files" multiple accept="{accept}"></label>
        <button type="submit">Create Timeline</button>
    </form>
    <a href="/">Back to dashboard</a>
</body>
</html>
"#,
        case_name = escape_html(case_name),
        accept = accept.join(","),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StagedFileId;

    #[test]
    fn form_keeps_previous_input_and_status() {
        let status = Status {
            kind: StatusKind::Error,
            message: "Please enter a case name.".to_string(),
        };
        let html = render_form("", "family", Some(&status), &[]);
        assert!(html.contains(r#"<option value="family" selected>Family Law</option>"#));
        assert!(html.contains("Please enter a case name."));
        assert!(html.contains(".pdf,.doc,.docx,.txt,.jpg,.jpeg,.png"));
    }

    #[test]
    fn review_lists_failed_entries() {
        let entries = vec![UploadedFile {
            source: StagedFileId(0),
            file_name: "b.png".to_string(),
            url: String::new(),
            size: 2_000_000,
            mime: Some("image/png".to_string()),
        }];
        let html = render_form("ACME", "civil", None, &entries);
        assert!(html.contains("b.png (1.9 MB) - Upload failed"));
    }
}
