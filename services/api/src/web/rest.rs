//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use study_transform_core::{
    GeneratedContent, GenerationOptions, PortError, Transformation, TransformationType,
    TransformationUpdate,
};
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

/// Shortest source text accepted by `POST /transform`, in characters.
pub const MIN_TEXT_CHARS: usize = 10;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        transform_handler,
        list_transformations_handler,
        get_transformation_handler,
        update_transformation_handler,
        delete_transformation_handler,
    ),
    components(
        schemas(
            TransformRequest,
            TransformResponse,
            UpdateTransformationRequest,
            TransformationListResponse,
            TransformationResponse,
            SuccessResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Study Transform API", description = "Turns study text into flashcards, summaries, mind maps, questions and quizzes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The payload of a transform request.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    /// The study text, at least 10 characters.
    pub text: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "flashcards")]
    pub kind: TransformationType,
    pub subject: String,
    pub content_type: String,
    /// Free-form options such as `numberOfCards`, `numberOfQuestions`, `subject`.
    /// Every key is stored as sent.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub options: Map<String, Value>,
}

/// The response sent after a successful transformation.
#[derive(Serialize, ToSchema)]
pub struct TransformResponse {
    success: bool,
    #[schema(value_type = Object)]
    transformation: Transformation,
    /// The generated material, already parsed.
    #[schema(value_type = Object)]
    data: GeneratedContent,
}

/// The payload of an update request. Absent fields are left untouched.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransformationRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content_type: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub options: Option<Map<String, Value>>,
}

impl From<UpdateTransformationRequest> for TransformationUpdate {
    fn from(request: UpdateTransformationRequest) -> Self {
        TransformationUpdate {
            title: request.title,
            subject: request.subject,
            content_type: request.content_type,
            options: request.options,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TransformationListResponse {
    #[schema(value_type = Vec<Object>)]
    transformations: Vec<Transformation>,
}

#[derive(Serialize, ToSchema)]
pub struct TransformationResponse {
    #[schema(value_type = Object)]
    transformation: Transformation,
}

#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    success: bool,
    error: String,
}

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
}

/// Missing records are a 404; any other store failure is a 500.
fn store_error(e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Transformation not found"),
        other => {
            error!("Transformation store failed: {:?}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Transform study text into study material.
///
/// Model failures never surface as errors: the response then carries
/// heuristic or placeholder content with a 200 status.
#[utoipa::path(
    post,
    path = "/api/transform",
    request_body = TransformRequest,
    responses(
        (status = 200, description = "Study material generated and stored", body = TransformResponse),
        (status = 400, description = "Invalid request (e.g., text too short or unknown type)", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn transform_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> Result<Json<TransformResponse>, HandlerError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected transform request: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    if request.text.chars().count() < MIN_TEXT_CHARS {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Text must be at least {} characters long", MIN_TEXT_CHARS),
        ));
    }

    let options =
        GenerationOptions::from_map(&request.options).with_default_subject(&request.subject);
    let content = app_state
        .generator
        .transform(request.kind, &request.text, &options)
        .await;
    if content.is_error_placeholder() {
        warn!(kind = %request.kind, "Returning placeholder content after generation failure");
    }

    let serialized = content.to_json().map_err(|e| {
        error!("Failed to serialize generated content: {:?}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize generated content")
    })?;

    let created_at = Utc::now();
    let transformation = Transformation {
        id: app_state.ids.next_id(created_at),
        title: format!("{} {}", request.subject, request.kind),
        text: request.text,
        kind: request.kind,
        subject: request.subject,
        content_type: request.content_type,
        content: serialized,
        options: request.options,
        created_at,
    };
    let transformation = app_state
        .store
        .create_transformation(transformation)
        .await
        .map_err(store_error)?;

    info!(id = %transformation.id, kind = %transformation.kind, "Transformation created");
    Ok(Json(TransformResponse {
        success: true,
        transformation,
        data: content,
    }))
}

/// List all stored transformations, newest first.
#[utoipa::path(
    get,
    path = "/api/transformations",
    responses(
        (status = 200, description = "All stored transformations", body = TransformationListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_transformations_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<TransformationListResponse>, HandlerError> {
    let transformations = app_state
        .store
        .list_transformations()
        .await
        .map_err(store_error)?;
    Ok(Json(TransformationListResponse { transformations }))
}

/// Fetch a single transformation.
#[utoipa::path(
    get,
    path = "/api/transformations/{id}",
    params(
        ("id" = String, Path, description = "The transformation id.")
    ),
    responses(
        (status = 200, description = "The transformation", body = TransformationResponse),
        (status = 404, description = "Transformation not found", body = ErrorResponse)
    )
)]
pub async fn get_transformation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TransformationResponse>, HandlerError> {
    let transformation = app_state
        .store
        .get_transformation(&id)
        .await
        .map_err(store_error)?;
    Ok(Json(TransformationResponse { transformation }))
}

/// Update the title, subject, content type or options of a transformation.
#[utoipa::path(
    patch,
    path = "/api/transformations/{id}",
    params(
        ("id" = String, Path, description = "The transformation id.")
    ),
    request_body = UpdateTransformationRequest,
    responses(
        (status = 200, description = "The updated transformation", body = TransformationResponse),
        (status = 400, description = "Invalid update payload", body = ErrorResponse),
        (status = 404, description = "Transformation not found", body = ErrorResponse)
    )
)]
pub async fn update_transformation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransformationRequest>, JsonRejection>,
) -> Result<Json<TransformationResponse>, HandlerError> {
    let Json(update) = payload
        .map_err(|rejection| error_response(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let transformation = app_state
        .store
        .update_transformation(&id, update.into())
        .await
        .map_err(store_error)?;
    Ok(Json(TransformationResponse { transformation }))
}

/// Delete a transformation.
#[utoipa::path(
    delete,
    path = "/api/transformations/{id}",
    params(
        ("id" = String, Path, description = "The transformation id.")
    ),
    responses(
        (status = 200, description = "Transformation deleted", body = SuccessResponse),
        (status = 404, description = "Transformation not found", body = ErrorResponse)
    )
)]
pub async fn delete_transformation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, HandlerError> {
    app_state
        .store
        .delete_transformation(&id)
        .await
        .map_err(store_error)?;
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransformationStore;
    use async_trait::async_trait;
    use serde_json::json;
    use study_transform_core::ports::{GenerationRequest, PortResult, TextGenerationService};

    struct OfflineLlm;

    #[async_trait]
    impl TextGenerationService for OfflineLlm {
        async fn generate_text(&self, _request: &GenerationRequest) -> PortResult<String> {
            Err(PortError::Upstream("inference endpoint unreachable".to_string()))
        }
    }

    struct CannedLlm(&'static str);

    #[async_trait]
    impl TextGenerationService for CannedLlm {
        async fn generate_text(&self, _request: &GenerationRequest) -> PortResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn state_with(llm: Arc<dyn TextGenerationService>) -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(InMemoryTransformationStore::new()), llm))
    }

    fn offline_state() -> Arc<AppState> {
        state_with(Arc::new(OfflineLlm))
    }

    fn request(body: Value) -> Result<Json<TransformRequest>, JsonRejection> {
        Json::from_bytes(body.to_string().as_bytes())
    }

    async fn transform(
        state: &Arc<AppState>,
        body: Value,
    ) -> Result<Json<TransformResponse>, HandlerError> {
        transform_handler(State(state.clone()), request(body)).await
    }

    const CELL_TEXT: &str = "Cells are the basic unit of life. The nucleus stores genetic material. \
                             Mitochondria produce energy for the cell.";

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/api/transform", "/api/transformations", "/api/transformations/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn transform_stores_and_returns_generated_content() {
        let state = offline_state();
        let Json(response) = transform(
            &state,
            json!({
                "text": CELL_TEXT,
                "type": "summary",
                "subject": "biology",
                "contentType": "notes",
                "options": {}
            }),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.transformation.title, "biology summary");
        assert_eq!(response.transformation.kind, TransformationType::Summary);
        assert_eq!(response.transformation.parsed_content().unwrap(), response.data);

        let GeneratedContent::Summary(summary) = &response.data else {
            panic!("expected a summary");
        };
        assert_eq!(
            summary.points,
            vec![
                "Cells are the basic unit of life",
                "The nucleus stores genetic material",
                "Mitochondria produce energy for the cell"
            ]
        );

        let stored = state
            .store
            .get_transformation(&response.transformation.id)
            .await
            .unwrap();
        assert_eq!(stored, response.transformation);
    }

    #[tokio::test]
    async fn transform_uses_model_output_when_available() {
        let state = state_with(Arc::new(CannedLlm(
            r#"[{"question": "What is the basic unit of life?", "answer": "The cell"}]"#,
        )));
        let Json(response) = transform(
            &state,
            json!({
                "text": CELL_TEXT,
                "type": "questions",
                "subject": "biology",
                "contentType": "notes",
                "options": {"numberOfQuestions": 1}
            }),
        )
        .await
        .unwrap();

        let GeneratedContent::Questions(questions) = &response.data else {
            panic!("expected questions");
        };
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "The cell");
        assert_eq!(response.transformation.options["numberOfQuestions"], 1);
    }

    #[tokio::test]
    async fn request_subject_drives_fallback_unless_options_override_it() {
        let state = offline_state();
        let body = |options: Value| {
            json!({
                "text": "0123456789",
                "type": "flashcards",
                "subject": "chemistry",
                "contentType": "notes",
                "options": options
            })
        };

        let Json(response) = transform(&state, body(json!({}))).await.unwrap();
        let GeneratedContent::Flashcards(cards) = &response.data else {
            panic!("expected flashcards");
        };
        assert_eq!(cards[0].question, "What is chemistry?");

        let Json(response) = transform(&state, body(json!({"subject": "organic chemistry"})))
            .await
            .unwrap();
        let GeneratedContent::Flashcards(cards) = &response.data else {
            panic!("expected flashcards");
        };
        assert_eq!(cards[0].question, "What is organic chemistry?");
    }

    #[tokio::test]
    async fn transform_rejects_short_text() {
        let (status, Json(body)) = transform(
            &offline_state(),
            json!({
                "text": "too short",
                "type": "quiz",
                "subject": "history",
                "contentType": "notes",
                "options": {}
            }),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error, "Text must be at least 10 characters long");
    }

    #[tokio::test]
    async fn transform_rejects_unknown_type_and_missing_fields() {
        let state = offline_state();
        for body in [
            json!({"text": CELL_TEXT, "type": "poster", "subject": "biology", "contentType": "notes", "options": {}}),
            json!({"text": CELL_TEXT, "type": "quiz", "contentType": "notes"}),
        ] {
            let (status, Json(error)) = transform(&state, body).await.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(!error.error.is_empty());
        }
        assert!(state.store.list_transformations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transformations_can_be_listed_fetched_updated_and_deleted() {
        let state = offline_state();
        let mut ids = Vec::new();
        for kind in ["flashcards", "mindmap"] {
            let Json(response) = transform(
                &state,
                json!({
                    "text": CELL_TEXT,
                    "type": kind,
                    "subject": "biology",
                    "contentType": "notes",
                    "options": {}
                }),
            )
            .await
            .unwrap();
            ids.push(response.transformation.id);
        }
        assert_ne!(ids[0], ids[1]);

        let Json(list) = list_transformations_handler(State(state.clone())).await.unwrap();
        let listed: Vec<&str> = list.transformations.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(listed, vec![ids[1].as_str(), ids[0].as_str()]);

        let Json(fetched) = get_transformation_handler(State(state.clone()), Path(ids[0].clone()))
            .await
            .unwrap();
        assert_eq!(fetched.transformation.kind, TransformationType::Flashcards);

        let Json(updated) = update_transformation_handler(
            State(state.clone()),
            Path(ids[0].clone()),
            Json::from_bytes(br#"{"title": "Cell flashcards"}"#),
        )
        .await
        .unwrap();
        assert_eq!(updated.transformation.title, "Cell flashcards");

        let Json(updated) = update_transformation_handler(
            State(state.clone()),
            Path(ids[0].clone()),
            Json::from_bytes(br#"{"contentType": "lecture", "options": {"layout": "radial"}}"#),
        )
        .await
        .unwrap();
        assert_eq!(updated.transformation.title, "Cell flashcards");
        assert_eq!(updated.transformation.content_type, "lecture");
        assert_eq!(updated.transformation.options["layout"], "radial");

        let Json(deleted) =
            delete_transformation_handler(State(state.clone()), Path(ids[0].clone()))
                .await
                .unwrap();
        assert!(deleted.success);

        let (status, Json(body)) =
            get_transformation_handler(State(state.clone()), Path(ids[0].clone()))
                .await
                .err()
                .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Transformation not found");

        let (status, _) = delete_transformation_handler(State(state), Path(ids[0].clone()))
            .await
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
