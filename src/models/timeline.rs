use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{file, timeline};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineRequest {
    pub case_name: String,
    pub area_of_law: String,
    pub files: Vec<NewFile>,
}

/// A file that already sits in object storage and should be attached to
/// the new timeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub file_name: String,
    pub url: String,
    /// Size in bytes.
    pub size: i64,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineResponse {
    pub timeline_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: Uuid,
    pub timeline_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub size: i64,
    pub mime_type: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<file::Model> for FileResponse {
    fn from(model: file::Model) -> Self {
        Self {
            id: model.id,
            timeline_id: model.timeline_id,
            file_name: model.file_name,
            url: model.url,
            size: model.size,
            mime_type: model.mime_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWithFiles {
    pub id: Uuid,
    pub case_name: String,
    pub area_of_law: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub files: Vec<FileResponse>,
}

impl TimelineWithFiles {
    pub fn new(model: timeline::Model, files: Vec<file::Model>) -> Self {
        Self {
            id: model.id,
            case_name: model.case_name,
            area_of_law: model.area_of_law,
            created_at: model.created_at,
            updated_at: model.updated_at,
            files: files.into_iter().map(FileResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_uses_camel_case_and_numeric_size() {
        let req: CreateTimelineRequest = serde_json::from_value(json!({
            "caseName": "ACME vs Smith",
            "areaOfLaw": "civil",
            "files": [{ "fileName": "a.pdf", "url": "https://x/a.pdf", "size": 500000 }]
        }))
        .unwrap();

        assert_eq!(req.case_name, "ACME vs Smith");
        assert_eq!(req.files[0].size, 500_000);
        assert_eq!(req.files[0].mime_type, None);
    }

    #[test]
    fn create_request_requires_files_array() {
        let res = serde_json::from_value::<CreateTimelineRequest>(json!({
            "caseName": "ACME vs Smith",
            "areaOfLaw": "civil"
        }));
        assert!(res.is_err());
    }
}
