use crate::{mutate::PodAnnotator, WEBHOOK_PATH};
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    core::{admission::Operation, DynamicObject},
    Resource,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Serves Pod admission reviews, applying the [`PodAnnotator`] to Pods that
/// are created or updated.
#[derive(Clone)]
pub struct Admission {
    annotator: Arc<PodAnnotator>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[source] BoxError),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type Review = kube::core::admission::AdmissionReview<DynamicObject>;
type AdmissionRequest = kube::core::admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = kube::core::admission::AdmissionResponse;
type AdmissionReview = kube::core::admission::AdmissionReview<DynamicObject>;

type Body = http_body_util::Full<bytes::Bytes>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;

// === impl Admission ===

impl<B> tower::Service<Request<B>> for Admission
where
    B: hyper::body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        trace!(method = %req.method(), uri = %req.uri());
        if !is_webhook_route(&req) {
            return Box::pin(future::ok(not_found()));
        }

        let admission = self.clone();
        Box::pin(async move {
            let bytes = req
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::Request(e.into()))?
                .to_bytes();
            json_response(admission.review(&bytes))
        })
    }
}

impl Admission {
    pub fn new(annotator: Arc<PodAnnotator>) -> Self {
        Self { annotator }
    }

    /// Answers a serialized admission review.
    fn review(&self, body: &[u8]) -> AdmissionReview {
        let review: Review = match serde_json::from_slice(body) {
            Ok(review) => review,
            Err(error) => {
                warn!(%error, "Failed to parse request body");
                return AdmissionResponse::invalid(error).into_review();
            }
        };
        trace!(?review);

        let rsp = match review.try_into() {
            Ok(req) => {
                debug!(?req);
                self.admit(req)
            }
            Err(error) => {
                warn!(%error, "Invalid admission request");
                AdmissionResponse::invalid(error)
            }
        };
        debug!(?rsp);
        rsp.into_review()
    }

    fn admit(&self, req: AdmissionRequest) -> AdmissionResponse {
        if !is_kind::<Pod>(&req) {
            return AdmissionResponse::invalid(format_args!(
                "unsupported resource type: {}.{}.{}",
                req.kind.group, req.kind.version, req.kind.kind
            ));
        }

        match req.operation {
            Operation::Create | Operation::Update => self.annotator.admit(&req),
            _ => {
                debug!(operation = ?req.operation, "Skipping");
                AdmissionResponse::from(&req)
            }
        }
    }
}

fn is_webhook_route<B>(req: &Request<B>) -> bool {
    req.method() == http::Method::POST && req.uri().path() == WEBHOOK_PATH
}

fn is_kind<T>(req: &AdmissionRequest) -> bool
where
    T: Resource,
    T::DynamicType: Default,
{
    let dt = Default::default();
    req.kind.group.eq_ignore_ascii_case(&T::group(&dt))
        && req.kind.version.eq_ignore_ascii_case(&T::version(&dt))
        && req.kind.kind.eq_ignore_ascii_case(&T::kind(&dt))
}

fn not_found() -> Response<Body> {
    Response::builder()
        .status(http::StatusCode::NOT_FOUND)
        .body(Body::default())
        .expect("not found response must be valid")
}

fn json_response(rsp: AdmissionReview) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}
