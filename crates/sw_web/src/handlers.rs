use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use sw_core::Error;
use sw_writer::WriteMode;

use crate::AppState;

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Simple,
    Detailed,
}

impl From<Mode> for WriteMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Simple => WriteMode::Simple,
            Mode::Detailed => WriteMode::Detailed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub topic: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_sources")]
    pub sources: usize,
}

fn default_sources() -> usize {
    1
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WriteRequest>,
) -> Response {
    let result = async {
        let writer = state.writer_for(request.mode.into(), request.sources)?;
        writer.write(&request.topic).await
    }
    .await;

    match result {
        Ok(article) => Json(article).into_response(),
        Err(e) => error_response(e),
    }
}

/// Run the pipeline and serve the article as a markdown download named
/// after the topic.
pub async fn download_article(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Response {
    let result = async {
        let writer = state.writer_for(state.writer.mode, state.search.result_num)?;
        writer.write(&topic).await
    }
    .await;

    match result {
        Ok(article) => {
            let filename = topic.replace(['/', '\\', '"'], "-");
            (
                [
                    (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.md\"", filename),
                    ),
                ],
                article.to_markdown(),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

fn error_response(e: Error) -> Response {
    error!("request failed: {}", e);
    let status = match &e {
        Error::EmptyResults => StatusCode::NOT_FOUND,
        Error::OutlinePayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Search(_) | Error::Fetch(_) | Error::Inference(_) | Error::Http(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}
