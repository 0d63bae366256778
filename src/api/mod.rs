use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::chart::{Size, Tooltip, Viewport};
use crate::core::{Profile, RawInput};
use crate::session::{DEFAULT_VIEWPORT, Event, Session, Update, calculate_once};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Tooltip box size assumed when the client does not report one.
const DEFAULT_TOOLTIP_SIZE: Size = Size::new(120.0, 48.0);
const MAX_SURFACE_PX: f64 = 10_000.0;

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub profile: Profile,
    pub viewport: Viewport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    profile: Option<String>,
    current_balance: Option<String>,
    gift_enabled: Option<bool>,
    monthly_contribution: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload {
    profile: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizePayload {
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoverQuery {
    generation: Option<u64>,
    x: f64,
    y: f64,
    tooltip_width: Option<f64>,
    tooltip_height: Option<f64>,
}

#[derive(Debug, PartialEq)]
struct CalculateRequest {
    profile: Option<Profile>,
    input: RawInput,
    viewport: Option<Viewport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HoverResponse {
    visible: bool,
    tooltip: Option<Tooltip>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route("/api/profile", post(profile_handler))
        .route("/api/resize", post(resize_handler))
        .route("/api/hover", get(hover_handler))
        .route("/api/chart.svg", get(chart_svg_handler))
        .fallback(not_found_handler)
        .with_state(session)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::new(config.bind, config.port);
    let session = Arc::new(Mutex::new(Session::new(config.profile, config.viewport)));
    let app = router(session);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, profile = config.profile.id, "savings calculator listening");
    info!("Local access: http://127.0.0.1:{}/", config.port);

    axum::serve(listener, app).await
}

fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(
    State(session): State<SharedSession>,
    Query(payload): Query<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&session, payload)
}

async fn calculate_post_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&session, payload)
}

fn calculate_handler_impl(session: &SharedSession, payload: CalculatePayload) -> Response {
    let request = match calculate_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!(error = %msg, "rejected calculate request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    let mut session = lock(session);
    if let Some(profile) = request.profile.filter(|p| *p != session.profile()) {
        let _ = session.handle(Event::SelectProfile(profile));
    }
    let update = session.handle(Event::Recalculate {
        input: request.input,
        viewport: request.viewport,
    });
    calculation_response(update)
}

async fn profile_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<ProfilePayload>,
) -> Response {
    let profile = match Profile::lookup(&payload.profile) {
        Ok(profile) => profile,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    info!(profile = profile.id, "switching profile");
    let update = lock(&session).handle(Event::SelectProfile(profile));
    calculation_response(update)
}

async fn resize_handler(
    State(session): State<SharedSession>,
    Json(payload): Json<ResizePayload>,
) -> Response {
    let viewport = match parse_viewport(payload.width, payload.height) {
        Ok(viewport) => viewport,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match lock(&session).handle(Event::Resize(viewport)) {
        Update::Redrawn(chart) => json_response(StatusCode::OK, chart),
        other => unexpected_update(other),
    }
}

async fn hover_handler(
    State(session): State<SharedSession>,
    Query(query): Query<HoverQuery>,
) -> Response {
    let tooltip = match tooltip_size_from_query(&query) {
        Ok(size) => size,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    if !query.x.is_finite() || !query.y.is_finite() {
        return error_response(StatusCode::BAD_REQUEST, "x and y must be finite");
    }
    match lock(&session).handle(Event::PointerMove {
        generation: query.generation,
        x: query.x,
        y: query.y,
        tooltip,
    }) {
        Update::Tooltip(tooltip) => json_response(
            StatusCode::OK,
            HoverResponse {
                visible: tooltip.is_some(),
                tooltip,
            },
        ),
        other => unexpected_update(other),
    }
}

/// Stand-alone chart render; does not touch the shared session.
async fn chart_svg_handler(Query(payload): Query<CalculatePayload>) -> Response {
    let request = match calculate_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match render_chart_svg(request) {
        Some(svg) => with_cache_control(([(header::CONTENT_TYPE, "image/svg+xml")], svg)),
        None => error_response(StatusCode::BAD_REQUEST, "nothing to plot for this profile and size"),
    }
}

fn render_chart_svg(request: CalculateRequest) -> Option<String> {
    calculate_once(
        request.profile.unwrap_or_default(),
        request.input,
        request.viewport.unwrap_or(DEFAULT_VIEWPORT),
    )
        .chart
        .map(|chart| chart.svg)
}

fn calculation_response(update: Update) -> Response {
    match update {
        Update::Calculated(calc) => json_response(StatusCode::OK, calc),
        other => unexpected_update(other),
    }
}

fn unexpected_update(update: Update) -> Response {
    warn!(?update, "event produced an unexpected update");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "unexpected session update")
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn calculate_request_from_json(json: &str) -> Result<CalculateRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    calculate_request_from_payload(payload)
}

fn calculate_request_from_payload(payload: CalculatePayload) -> Result<CalculateRequest, String> {
    let profile = payload
        .profile
        .as_deref()
        .map(Profile::lookup)
        .transpose()?;

    let viewport = match (payload.width, payload.height) {
        (Some(width), Some(height)) => Some(parse_viewport(width, height)?),
        (None, None) => None,
        _ => return Err("width and height must be given together".to_string()),
    };

    let input = RawInput {
        current_balance: payload.current_balance.unwrap_or_default(),
        gift_enabled: payload.gift_enabled.unwrap_or(false),
        monthly_contribution: payload.monthly_contribution.unwrap_or_default(),
    };
    debug!(?profile, ?viewport, "calculate request parsed");

    Ok(CalculateRequest {
        profile,
        input,
        viewport,
    })
}

/// Zero is accepted and means "not laid out yet"; the chart is skipped.
fn parse_viewport(width: f64, height: f64) -> Result<Viewport, String> {
    for (name, value) in [("width", width), ("height", height)] {
        if !value.is_finite() || !(0.0..=MAX_SURFACE_PX).contains(&value) {
            return Err(format!("{name} must be between 0 and {MAX_SURFACE_PX}"));
        }
    }
    Ok(Viewport::new(width, height))
}

fn tooltip_size_from_query(query: &HoverQuery) -> Result<Size, String> {
    let width = query.tooltip_width.unwrap_or(DEFAULT_TOOLTIP_SIZE.width);
    let height = query.tooltip_height.unwrap_or(DEFAULT_TOOLTIP_SIZE.height);
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err("tooltipWidth and tooltipHeight must be non-negative".to_string());
    }
    Ok(Size::new(width, height))
}
