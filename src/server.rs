use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info};

use crate::config::ServerConfig;
use crate::data::{EvaluateOutput, EvaluateRequest, SolveOutput, SolveRequest};
use crate::solver;

type ApiError = (StatusCode, String);

async fn solve_handler(Json(input): Json<SolveRequest>) -> Result<Json<SolveOutput>, ApiError> {
    // the evolution loop is CPU bound
    let outcome = tokio::task::spawn_blocking(move || solver::solve(&input))
        .await
        .map_err(|e| {
            error!("Solver task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    match outcome {
        Ok(output) => Ok(Json(output)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

async fn evaluate_handler(Json(input): Json<EvaluateRequest>) -> Result<Json<EvaluateOutput>, ApiError> {
    match solver::evaluate(&input) {
        Ok(output) => Ok(Json(output)),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/supervision/solve", post(solve_handler))
        .route("/v1/supervision/evaluate", post(evaluate_handler))
}

pub async fn run_server(config: &ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await
}
