//! The timeline list: one table row per case, newest first.

use std::fmt::Write as _;

use uuid::Uuid;

use crate::models::{AreaOfLaw, TimelineWithFiles};
use crate::utils::{escape_html, format_file_size};

pub const NEW_TIMELINE_HREF: &str = "/timelines/new";
pub const EMPTY_TITLE: &str = "Start Your Case Timeline Journey";
pub const EMPTY_BODY: &str = "Create a new timeline to organize and visualize your case events.";
pub const LOADING_TEXT: &str = "Loading cases...";
pub const ERROR_TEXT: &str = "Error loading cases";
const NO_FILES: &str = "No files";
const HEADERS: [&str; 5] = ["Case Title", "Type", "Files", "Size", "Created"];

pub fn detail_href(id: Uuid) -> String {
    format!("/timelines/{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub id: Uuid,
    pub case_name: String,
    pub area_of_law: String,
    /// Only the first file is shown in the table.
    pub first_file_name: Option<String>,
    pub first_file_size: Option<String>,
    pub file_count: usize,
    pub created: String,
    pub detail_href: String,
}

impl From<&TimelineWithFiles> for TimelineRow {
    fn from(t: &TimelineWithFiles) -> Self {
        let first = t.files.first();
        Self {
            id: t.id,
            case_name: t.case_name.clone(),
            area_of_law: AreaOfLaw::label_for(&t.area_of_law).to_string(),
            first_file_name: first.map(|f| f.file_name.clone()),
            first_file_size: first.map(|f| format_file_size(f.size.max(0) as u64)),
            file_count: t.files.len(),
            created: t.created_at.format("%-m/%-d/%Y").to_string(),
            detail_href: detail_href(t.id),
        }
    }
}

impl TimelineRow {
    fn files_cell(&self) -> String {
        match &self.first_file_name {
            Some(name) if self.file_count > 1 => {
                format!("{name} (+{} more)", self.file_count - 1)
            }
            Some(name) => name.clone(),
            None => NO_FILES.to_string(),
        }
    }

    fn size_cell(&self) -> &str {
        self.first_file_size.as_deref().unwrap_or("-")
    }

    fn cells(&self) -> [String; 5] {
        [
            self.case_name.clone(),
            self.area_of_law.clone(),
            self.files_cell(),
            self.size_cell().to_string(),
            self.created.clone(),
        ]
    }
}

/// The four mutually exclusive states of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineListState {
    Loading,
    Error,
    Empty,
    Populated(Vec<TimelineRow>),
}

impl TimelineListState {
    /// `None` means the query has not answered yet.
    pub fn from_query<E>(result: Option<Result<Vec<TimelineWithFiles>, E>>) -> Self {
        match result {
            None => TimelineListState::Loading,
            Some(Err(_)) => TimelineListState::Error,
            Some(Ok(timelines)) if timelines.is_empty() => TimelineListState::Empty,
            Some(Ok(timelines)) => {
                TimelineListState::Populated(timelines.iter().map(TimelineRow::from).collect())
            }
        }
    }

    pub fn render_html(&self) -> String {
        let mut body = String::new();
        let colspan = HEADERS.len() + 1;
        match self {
            TimelineListState::Loading => {
                let _ = write!(body, r#"<tr><td colspan="{colspan}">{LOADING_TEXT}</td></tr>"#);
            }
            TimelineListState::Error => {
                let _ = write!(
                    body,
                    r#"<tr><td colspan="{colspan}" class="error">{ERROR_TEXT}</td></tr>"#
                );
            }
            TimelineListState::Empty => {
                let _ = write!(
                    body,
                    r#"<tr><td colspan="{colspan}" class="empty"><h2>{EMPTY_TITLE}</h2><p>{EMPTY_BODY}</p><a class="button" href="{NEW_TIMELINE_HREF}">New Timeline</a></td></tr>"#
                );
            }
            TimelineListState::Populated(rows) => {
                for row in rows {
                    body.push_str("<tr>");
                    for cell in row.cells() {
                        let _ = write!(body, "<td>{}</td>", escape_html(&cell));
                    }
                    let _ = write!(
                        body,
                        r#"<td><a href="{}">View</a></td></tr>"#,
                        escape_html(&row.detail_href)
                    );
                }
            }
        }

        let head: String = HEADERS
            .iter()
            .map(|h| format!("<th>{h}</th>"))
            .chain(std::iter::once("<th>Actions</th>".to_string()))
            .collect();

        format!(
            r#"<table class="timelines"><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>"#
        )
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        match self {
            TimelineListState::Loading => LOADING_TEXT.to_string(),
            TimelineListState::Error => ERROR_TEXT.to_string(),
            TimelineListState::Empty => format!(
                "{EMPTY_TITLE}\n{EMPTY_BODY}\nRun `case-timeline new` to create one."
            ),
            TimelineListState::Populated(rows) => {
                let cells: Vec<[String; 5]> = rows.iter().map(TimelineRow::cells).collect();
                let mut widths = HEADERS.map(|h| h.chars().count());
                for row in &cells {
                    for (w, cell) in widths.iter_mut().zip(row) {
                        *w = (*w).max(cell.chars().count());
                    }
                }

                let mut out = String::new();
                push_text_row(&mut out, &HEADERS.map(str::to_string), &widths);
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                let _ = writeln!(out, "{}", rule.join("-+-"));
                for row in &cells {
                    push_text_row(&mut out, row, &widths);
                }
                out
            }
        }
    }
}

fn push_text_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
