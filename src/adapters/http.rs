//! HTTP command and telemetry adapter.
//!
//! | Route            | Effect                                   |
//! |------------------|------------------------------------------|
//! | `/servo?angle=N` | `set_position(N)`, echoes clamped angle  |
//! | `/servo/center`  | `center()`                               |
//! | `/servo/attach`  | `attach()`                               |
//! | `/servo/detach`  | `detach()`                               |
//! | `/motor?speed=N` | `set_speed(N)`, echoes clamped speed     |
//! | `/motor?action=` | `stop` / `enable` / `disable`            |
//! | `/status`        | [`ActuatorStatus`](crate::app::events::ActuatorStatus) JSON |
//!
//! Routing and status-code mapping live in [`route`], which has no server
//! types in it; the ESP-IDF server only forwards the URI and writes the
//! [`HttpResponse`] back.

use embedded_hal::digital::OutputPin;

use crate::app::commands::split_uri;
use crate::app::events::CommandReply;
use crate::app::ports::{EventSink, PwmPort};
use crate::app::service::ActuatorService;
use crate::error::{ActuatorError, CommandError, Error};

pub const CONTENT_JSON: &str = "application/json";
pub const CONTENT_TEXT: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(status: u16, body: String) -> Self {
        Self { status, content_type: CONTENT_JSON, body }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: CONTENT_TEXT,
            body: "Not found".into(),
        }
    }
}

/// HTTP status for a rejected command.
pub fn status_code_for(err: &Error) -> u16 {
    match err {
        Error::Command(CommandError::UnknownPath) => 404,
        Error::Command(_) => 400,
        Error::Actuator(ActuatorError::NotInitialized) => 503,
        Error::Actuator(_) | Error::Config(_) => 500,
    }
}

/// Handle one request URI (path plus optional query).
pub fn route<SP, MP, A, B, S>(
    service: &ActuatorService<SP, MP, A, B, S>,
    uri: &str,
    sink: &mut impl EventSink,
) -> HttpResponse
where
    SP: PwmPort,
    MP: PwmPort,
    A: OutputPin,
    B: OutputPin,
    S: OutputPin,
{
    let (path, query) = split_uri(uri);
    if path == "/status" {
        return match serde_json::to_string(&service.status()) {
            Ok(body) => HttpResponse::json(200, body),
            Err(e) => {
                log::error!("HTTP: status serialisation failed ({})", e);
                HttpResponse::json(500, r#"{"ok":false}"#.into())
            }
        };
    }

    match service.handle_request(path, query, sink) {
        Ok(reply) => reply_response(200, &reply),
        Err(Error::Command(CommandError::UnknownPath)) => HttpResponse::not_found(),
        Err(err) => reply_response(status_code_for(&err), &CommandReply::error(&err)),
    }
}

fn reply_response(status: u16, reply: &CommandReply) -> HttpResponse {
    match serde_json::to_string(reply) {
        Ok(body) => HttpResponse::json(status, body),
        Err(e) => {
            log::error!("HTTP: reply serialisation failed ({})", e);
            HttpResponse::json(500, r#"{"ok":false}"#.into())
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF server
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use server::start;

#[cfg(target_os = "espidf")]
mod server {
    use std::sync::Arc;

    use embedded_hal::digital::OutputPin;
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use log::info;

    use crate::adapters::log_sink::LogEventSink;
    use crate::app::ports::PwmPort;
    use crate::app::service::ActuatorService;

    const ROUTES: [&str; 6] = [
        "/status",
        "/servo",
        "/servo/center",
        "/servo/attach",
        "/servo/detach",
        "/motor",
    ];

    /// Start the server.  Handlers run on the server task; the returned
    /// handle must be kept alive for as long as the routes should answer.
    pub fn start<SP, MP, A, B, S>(
        service: Arc<ActuatorService<SP, MP, A, B, S>>,
        port: u16,
    ) -> anyhow::Result<EspHttpServer<'static>>
    where
        SP: PwmPort + Send + 'static,
        MP: PwmPort + Send + 'static,
        A: OutputPin + Send + 'static,
        B: OutputPin + Send + 'static,
        S: OutputPin + Send + 'static,
    {
        let mut server = EspHttpServer::new(&Configuration {
            http_port: port,
            uri_match_wildcard: true,
            ..Default::default()
        })?;

        // Exact routes first: the wildcard fallback matches everything.
        for uri in ROUTES.into_iter().chain(core::iter::once("/*")) {
            let service = Arc::clone(&service);
            server.fn_handler(uri, Method::Get, move |req| -> anyhow::Result<()> {
                let mut sink = LogEventSink::new();
                let response = super::route(&service, req.uri(), &mut sink);
                let mut resp = req.into_response(
                    response.status,
                    None,
                    &[("Content-Type", response.content_type)],
                )?;
                resp.write_all(response.body.as_bytes())?;
                Ok(())
            })?;
        }

        info!("HTTP server started on port {}", port);
        Ok(server)
    }
}
