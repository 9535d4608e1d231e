use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{file, timeline};
use crate::error::AppError;
use crate::models::{CreateTimelineRequest, TimelineWithFiles};

/// Timeline ids bound per file query. Keeps each `IN (...)` well under the
/// bind-parameter ceiling of SQLite and Postgres.
const FILE_QUERY_CHUNK: usize = 1000;

#[derive(Clone)]
pub struct TimelineService {
    db: DatabaseConnection,
}

impl TimelineService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the timeline and one file row per entry in a single
    /// transaction. All rows share the same timestamp.
    pub async fn create_timeline(&self, request: CreateTimelineRequest) -> Result<Uuid, AppError> {
        let timestamp = chrono::Utc::now().naive_utc();
        let timeline_id = Uuid::now_v7();
        let file_count = request.files.len();

        let txn = self.db.begin().await?;

        timeline::ActiveModel {
            id: Set(timeline_id),
            case_name: Set(request.case_name),
            area_of_law: Set(request.area_of_law),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        for new_file in request.files {
            file::ActiveModel {
                id: Set(Uuid::now_v7()),
                timeline_id: Set(timeline_id),
                file_name: Set(new_file.file_name),
                url: Set(new_file.url),
                size: Set(new_file.size),
                mime_type: Set(new_file.mime_type),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        tracing::info!(%timeline_id, files = file_count, "timeline created");
        Ok(timeline_id)
    }

    /// All timelines, newest first, each with its files in insertion order.
    pub async fn list_timelines(&self) -> Result<Vec<TimelineWithFiles>, AppError> {
        let timelines = timeline::Entity::find()
            .order_by_desc(timeline::Column::CreatedAt)
            .order_by_desc(timeline::Column::Id)
            .all(&self.db)
            .await?;

        if timelines.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = timelines.iter().map(|t| t.id).collect();
        let mut files_by_timeline: HashMap<Uuid, Vec<file::Model>> = HashMap::new();
        for chunk in ids.chunks(FILE_QUERY_CHUNK) {
            for f in file::Entity::find()
                .filter(file::Column::TimelineId.is_in(chunk.iter().copied()))
                .order_by_asc(file::Column::CreatedAt)
                .order_by_asc(file::Column::Id)
                .all(&self.db)
                .await?
            {
                files_by_timeline.entry(f.timeline_id).or_default().push(f);
            }
        }

        Ok(timelines
            .into_iter()
            .map(|t| {
                let files = files_by_timeline.remove(&t.id).unwrap_or_default();
                TimelineWithFiles::new(t, files)
            })
            .collect())
    }

    pub async fn get_timeline(&self, id: Uuid) -> Result<TimelineWithFiles, AppError> {
        let timeline = timeline::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Timeline not found".to_string()))?;

        let files = file::Entity::find()
            .filter(file::Column::TimelineId.eq(id))
            .order_by_asc(file::Column::CreatedAt)
            .order_by_asc(file::Column::Id)
            .all(&self.db)
            .await?;

        Ok(TimelineWithFiles::new(timeline, files))
    }
}
