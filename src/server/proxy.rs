use crate::config::UpstreamConfig;
use crate::router::{classify, Decision, Router};
use crate::stats::RequestMessage;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// Bound on establishing the upstream connection; a timeout is surfaced as
// Upstream Unavailable, never as a hang.
const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const UNAVAILABLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Service Temporarily Unavailable</title></head>
  <body>
    <h1>Service temporarily unavailable</h1>
    <p>The site is temporarily unavailable. Please try again in a few minutes.</p>
    <p><a href="/">Back to home</a></p>
  </body>
</html>
"#;

pub struct EdgeState {
    router: Router,
    client: reqwest::Client,
    stats_tx: mpsc::Sender<RequestMessage>,
}

impl EdgeState {
    pub fn new(
        upstreams: UpstreamConfig,
        stats_tx: mpsc::Sender<RequestMessage>,
    ) -> anyhow::Result<Self> {
        // Redirects pass through verbatim; following them here would hide
        // the upstream's 3xx from the client.
        let client = reqwest::Client::builder()
            .connect_timeout(UPSTREAM_CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(EdgeState {
            router: Router::new(upstreams),
            client,
            stats_tx,
        })
    }

    fn notify(&self, message: RequestMessage) {
        if let Err(err) = self.stats_tx.try_send(message) {
            warn!("Failed to send request stats: {}", err);
        }
    }
}

#[derive(Serialize)]
struct UnavailableBody {
    error: &'static str,
    upstream: &'static str,
}

/// Proxies one inbound request: classify by path, forward verbatim, apply
/// the frontend fallback and unavailable policies.
pub async fn handle(State(state): State<Arc<EdgeState>>, req: Request) -> Response {
    let decision = classify(req.uri().path());
    debug!(
        "Routing {} {} to {} upstream",
        req.method(),
        req.uri().path(),
        decision
    );

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let url = state.router.upstream_url(decision, &path, query.as_deref());
    let headers = req.headers().clone();
    let has_body = request_has_body(&headers);
    let body = req.into_body();

    // Method, headers and body go through untouched; the router neither
    // injects nor strips anything, Authorization included.
    let mut upstream_req = state.client.request(method.clone(), &url).headers(headers);
    if has_body {
        upstream_req = upstream_req.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let response = match upstream_req.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("{} upstream unreachable for {}: {}", decision, path, err);
            state.notify(RequestMessage::UpstreamUnavailable { decision });
            return synthesize_unavailable(decision);
        }
    };

    state.notify(RequestMessage::Forwarded { decision });

    // SPA fallback: a 404 from the frontend is taken to be a client-side
    // route and is answered with the app shell instead. Applied at most
    // once; whatever /index.html returns is final.
    if decision == Decision::Frontend && response.status() == StatusCode::NOT_FOUND {
        let index_url = state.router.frontend_index_url();
        debug!(
            "Frontend returned 404 for {}, substituting {}",
            path, index_url
        );

        return match state.client.request(method, &index_url).send().await {
            Ok(index_response) => {
                state.notify(RequestMessage::FallbackSubstituted);
                into_response(index_response)
            }
            Err(err) => {
                warn!("Frontend unreachable for {}: {}", index_url, err);
                state.notify(RequestMessage::UpstreamUnavailable { decision });
                synthesize_unavailable(decision)
            }
        };
    }

    into_response(response)
}

/// Streams an upstream response back to the client verbatim.
fn into_response(response: reqwest::Response) -> Response {
    let mut builder = Response::builder().status(response.status());
    if let Some(headers) = builder.headers_mut() {
        *headers = response.headers().clone();
    }

    builder
        .body(Body::from_stream(response.bytes_stream()))
        .unwrap_or_else(|err| {
            warn!("Failed to rebuild upstream response: {}", err);
            StatusCode::BAD_GATEWAY.into_response()
        })
}

/// The one place the router manufactures response content itself.
fn synthesize_unavailable(decision: Decision) -> Response {
    match decision {
        Decision::Frontend => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(UNAVAILABLE_PAGE),
        )
            .into_response(),
        Decision::Backend => (
            StatusCode::BAD_GATEWAY,
            Json(UnavailableBody {
                error: "backend temporarily unavailable",
                upstream: Decision::Backend.as_str(),
            }),
        )
            .into_response(),
    }
}

/// Whether the inbound request carries a body worth streaming upstream.
/// GETs and other bodiless requests must not be promoted to chunked
/// transfers just because a body stream exists.
fn request_has_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}
