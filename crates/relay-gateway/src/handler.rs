//! Axum route handler for the Ollama-compatible chat endpoint

use std::convert::Infallible;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use http::StatusCode;
use http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};

use crate::provider::FrameStream;
use crate::routing::ChatCall;
use crate::state::GatewayState;

/// Chat endpoint path
pub const CHAT_PATH: &str = "/api/chat";

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Build the gateway router
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route(CHAT_PATH, routing::post(chat))
        .with_state(state)
}

/// Handle `POST /api/chat`
async fn chat(State(state): State<GatewayState>, body: Bytes) -> Response {
    let start = Instant::now();

    let call = match ChatCall::from_body(body) {
        Ok(call) => call,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting chat request");
            return e.into_response();
        }
    };

    let provider = state.provider(&call.route);
    let streaming = call.is_stream();

    tracing::debug!(
        provider = provider.name(),
        model = call.request.model(),
        stream = streaming,
        messages = call.request.message_count(),
        "chat request"
    );

    let metrics = state.metrics().clone();
    let provider_name = provider.name();

    if streaming {
        // Recorded once the body ends or the client goes away
        return ndjson_response(provider.complete_stream(&call), move || {
            metrics.record_request(provider_name, true, StatusCode::OK.as_u16(), start);
        });
    }

    let response = match provider.complete(&call).await {
        Ok(reply) => reply.into_response(),
        Err(e) => e.into_response(),
    };
    metrics.record_request(provider_name, false, response.status().as_u16(), start);

    response
}

/// Runs its callback once, when dropped
struct OnFinish<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for OnFinish<F> {
    fn drop(&mut self) {
        if let Some(finish) = self.0.take() {
            finish();
        }
    }
}

/// Stream frames to the client as newline-delimited JSON
///
/// The body owns the upstream stream, so a client disconnect drops it and
/// closes the upstream connection. `on_finish` runs when the body is fully
/// sent or dropped.
fn ndjson_response<F>(frames: FrameStream, on_finish: F) -> Response
where
    F: FnOnce() + Send + 'static,
{
    let finish = OnFinish(Some(on_finish));
    let body = async_stream::stream! {
        let _finish = finish;
        for await frame in frames {
            yield Ok::<_, Infallible>(frame.into_line());
        }
    };

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, NDJSON_CONTENT_TYPE),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
            (http::HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}
