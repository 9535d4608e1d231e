mod home;
mod new_timeline;
mod timelines;
mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub use upload::FileUploadResponse;

/// Room for multipart framing and the text fields on top of the file bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        home::dashboard,
        new_timeline::new_timeline_form,
        new_timeline::submit_new_timeline,
        timelines::create_timeline,
        timelines::list_timelines,
        timelines::get_timeline,
        upload::upload_file,
    ),
    components(
        schemas(
            crate::models::CreateTimelineRequest,
            crate::models::NewFile,
            crate::models::CreateTimelineResponse,
            crate::models::TimelineWithFiles,
            crate::models::FileResponse,
            crate::models::AreaOfLaw,
            upload::FileUploadResponse,
        )
    ),
    tags(
        (name = "General", description = "Dashboard and browser pages"),
        (name = "Timelines", description = "Create and list case timelines"),
        (name = "File Upload", description = "Push files to object storage")
    ),
    info(
        title = "Case Timeline API",
        version = "0.1.0",
        description = "Case timelines with their uploaded files",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let body_limit = state.upload_max_bytes + MULTIPART_OVERHEAD;

    let app_routes = Router::new()
        .route("/", get(home::dashboard))
        .route(
            "/timelines",
            post(timelines::create_timeline).get(timelines::list_timelines),
        )
        .route(
            "/timelines/new",
            get(new_timeline::new_timeline_form).post(new_timeline::submit_new_timeline),
        )
        .route("/timelines/{id}", get(timelines::get_timeline))
        .route("/uploads", post(upload::upload_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
