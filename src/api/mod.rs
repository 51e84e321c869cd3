use axum::{
    extract::{Path, Json},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension,
    Router,
};
use metrics::counter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Result;
use tracing::{error, info, warn};

use crate::engine::QueryEngine;
use crate::error::QueryError;
use crate::models::{Observation, Station, TemperatureSummary};

#[derive(Debug, Serialize)]
struct ApiResponse {
    success: bool,
    message: String,
}

/// A failed query, rendered as a JSON body with a matching status code.
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            QueryError::NoData(_) => StatusCode::NOT_FOUND,
            QueryError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            QueryError::CorruptDate(_)
            | QueryError::DateOutOfRange(_)
            | QueryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Query failed");
        } else {
            warn!(error = %self.0, "Query rejected");
        }
        counter!("climate_api_errors_total", 1, "status" => status.as_u16().to_string());

        let body = ApiResponse {
            success: false,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn record_request(route: &'static str) {
    counter!("climate_api_requests_total", 1, "route" => route);
}

async fn welcome() -> Html<&'static str> {
    record_request("welcome");
    Html(concat!(
        "<b>Date Format Example: 2017-05-08</b><br/>",
        "<br/>",
        "<b>Available Routes:</b><br/>",
        "/api/v1.0/precipitation<br/>",
        "/api/v1.0/stations<br/>",
        "/api/v1.0/tobs<br/>",
        "/api/v1.0/&lt;start date&gt;<br/>",
        "/api/v1.0/&lt;start date&gt;/&lt;end date&gt;",
    ))
}

async fn precipitation(
    Extension(engine): Extension<Arc<QueryEngine>>,
) -> ApiResult<BTreeMap<String, f64>> {
    record_request("precipitation");
    Ok(Json(engine.trailing_precipitation().await?))
}

async fn stations(Extension(engine): Extension<Arc<QueryEngine>>) -> ApiResult<Vec<Station>> {
    record_request("stations");
    Ok(Json(engine.stations().await?))
}

async fn temperature_observations(
    Extension(engine): Extension<Arc<QueryEngine>>,
) -> ApiResult<Vec<Observation>> {
    record_request("tobs");
    Ok(Json(engine.trailing_observations().await?))
}

async fn summary_from(
    Extension(engine): Extension<Arc<QueryEngine>>,
    Path(start): Path<String>,
) -> ApiResult<Vec<TemperatureSummary>> {
    record_request("start");
    let summary = engine.temperature_summary(&start, None).await?;
    Ok(Json(vec![summary]))
}

async fn summary_between(
    Extension(engine): Extension<Arc<QueryEngine>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Vec<TemperatureSummary>> {
    record_request("start_end");
    let summary = engine.temperature_summary(&start, Some(&end)).await?;
    Ok(Json(vec![summary]))
}

pub fn router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(temperature_observations))
        .route("/api/v1.0/:start", get(summary_from))
        .route("/api/v1.0/:start/:end", get(summary_between))
        .layer(Extension(engine))
}

pub async fn serve(engine: QueryEngine, addr: SocketAddr) -> Result<()> {
    let app = router(Arc::new(engine));

    info!("Starting server on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
