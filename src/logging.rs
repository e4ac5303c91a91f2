use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}

/// Console + rolling-file tracing setup. The JSON file is the
/// machine-ingestible log; the plain file only records errors.
pub fn init_tracing() {
    use std::fs;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let log_dir = "storage/logs";
    fs::create_dir_all(log_dir).expect("Failed to create logs directory");

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,tower_http=warn,hyper=info",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "homelink.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let json_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "homelink.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .init();

    info!("Tracing initialized with console and file logging");
}
