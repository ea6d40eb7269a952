//! The streaming render controller.

use futures::stream::StreamExt;
use http::header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, StatusCode};
use tracing::warn;

use vitrine_core::{RequestContext, RequestPhase, StorefrontEnv};
use vitrine_defer::PageDocument;
use vitrine_observability::{LogLevel, RenderMetrics, RequestLogger};
use vitrine_security::ContentSecurityPolicy;

use crate::bot::{AutomationClassifier, KnownCrawlers};
use crate::render::{BodyStream, RenderHandle, RenderOptions, RenderOutcome, Renderer};

/// The response handed back to the transport: status and headers fixed
/// at stream start, body possibly still being written.
pub struct StreamedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

/// Drives the renderer for one request and owns the response contract.
///
/// The security policy is issued strictly before the render call; the
/// completion policy depends on the requester: automated crawlers get
/// control back only after the stream reports a terminal state, humans
/// as soon as bytes are flowing. Render failures downgrade the status
/// to 500 without dropping the stream.
pub struct StreamController<R: Renderer> {
    renderer: R,
    classifier: Box<dyn AutomationClassifier>,
    env: StorefrontEnv,
}

impl<R: Renderer> StreamController<R> {
    /// Create a controller with the default crawler signatures.
    pub fn new(renderer: R, env: StorefrontEnv) -> Self {
        Self {
            renderer,
            classifier: Box::new(KnownCrawlers::new()),
            env,
        }
    }

    /// Replace the automation classifier.
    pub fn with_classifier(mut self, classifier: impl AutomationClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Render one page request into a streamable response.
    ///
    /// `initial_status` comes from the route layer (e.g. 404 from a
    /// not-found boundary rendering an error page); render failures
    /// override it with 500.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        initial_status: StatusCode,
        mut headers: HeaderMap,
        document: PageDocument,
    ) -> StreamedResponse {
        let logger = RequestLogger::new(ctx.request_id.clone()).with_route(&ctx.url);
        let mut metrics = RenderMetrics::new(ctx.request_id.clone());
        metrics.set_route(&ctx.url);

        // The nonce must exist before rendering begins; the renderer
        // consumes it for every inline script/style tag.
        let policy = ContentSecurityPolicy::issue_for(&self.env);
        metrics.record_policy_issued();

        let PageDocument {
            data,
            headers: document_headers,
        } = document;
        for (name, value) in document_headers.iter() {
            headers.append(name, value.clone());
        }

        let options = RenderOptions {
            nonce: policy.nonce().clone(),
            cancel: ctx.cancel.clone(),
        };

        let mut status = initial_status;
        metrics.record_render_started();
        let outcome = match self.renderer.render(data, options).await {
            Ok(RenderHandle { body, completion }) => {
                metrics.record_first_byte();
                if self.classifier.is_automated(ctx.user_agent()) {
                    // Crawlers do not run incremental rendering; hold the
                    // response until the document is fully formed.
                    metrics.record_completion_wait();
                    let result = completion.wait().await;
                    metrics.record_completed();
                    match result {
                        Ok(()) => RenderOutcome::Success { body },
                        Err(err) => {
                            logger
                                .entry(LogLevel::Error, "render failed mid-stream")
                                .field("error", err.to_string())
                                .emit();
                            RenderOutcome::Failed { body }
                        }
                    }
                } else {
                    // Humans start painting immediately; the terminal
                    // state is observed in the background for logging
                    // only, since the status is already committed.
                    let background_logger = logger.clone();
                    tokio::spawn(async move {
                        if let Err(err) = completion.wait().await {
                            background_logger
                                .entry(LogLevel::Error, "render failed after response start")
                                .field("error", err.to_string())
                                .emit();
                        }
                    });
                    RenderOutcome::Success { body }
                }
            }
            Err(err) => {
                logger
                    .entry(LogLevel::Error, "render failed to start")
                    .field("error", err.to_string())
                    .emit();
                metrics.record_completed();
                RenderOutcome::Failed {
                    body: error_fallback_body(),
                }
            }
        };

        let phase = if outcome.is_success() {
            RequestPhase::Complete
        } else {
            status = StatusCode::INTERNAL_SERVER_ERROR;
            RequestPhase::Failed("render".to_string())
        };

        insert_header(&mut headers, CONTENT_TYPE, "text/html; charset=utf-8");
        insert_header(&mut headers, CONTENT_SECURITY_POLICY, policy.header());

        let report = metrics.finalize(status.as_u16());
        logger
            .entry(LogLevel::Info, "page request finished")
            .field("phase", format!("{phase:?}"))
            .field("summary", report.to_summary())
            .emit();

        StreamedResponse {
            status,
            headers,
            body: outcome.into_body(),
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: http::header::HeaderName, value: &str) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(err) => warn!(header = %name, error = %err, "dropping non-ASCII header value"),
    }
}

/// Minimal well-formed document for renders that never produced a
/// stream. Carries no inline script or style, so it needs no nonce.
fn error_fallback_body() -> BodyStream {
    const FALLBACK: &str = "<!DOCTYPE html>\n<html>\n<head><title>Something went wrong</title></head>\n<body><h1>Something went wrong</h1><p>Please try again in a moment.</p></body>\n</html>\n";
    futures::stream::once(async { FALLBACK.as_bytes().to_vec() }).boxed()
}
