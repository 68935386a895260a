use crate::decode::{Decode, JsonDecoder};
use hyper::http::StatusCode;
use k8s_openapi::api::core::v1::Pod;
use kube::core::{admission::SerializePatchError, DynamicObject};
use thiserror::Error;
use tracing::{info, warn};

/// The annotation set on every admitted Pod.
pub const ANNOTATION_KEY: &str = "cephfs-persistentvolume-mutating-admission-webhook";
pub const ANNOTATION_VALUE: &str = "gotcha";

type AdmissionRequest = kube::core::admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = kube::core::admission::AdmissionResponse;

/// Annotates Pods under admission review.
///
/// The decoder is supplied at construction, so an annotator is always ready
/// to handle requests.
#[derive(Clone, Debug, Default)]
pub struct PodAnnotator<D = JsonDecoder> {
    decoder: D,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("admission request missing 'object'")]
    MissingObject,

    #[error("failed to decode pod: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode pod: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to encode patch: {0}")]
    Patch(#[from] SerializePatchError),
}

// === impl PodAnnotator ===

impl<D: Decode> PodAnnotator<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Handles a request, turning failures into a denied response carrying
    /// the error's status code.
    pub fn admit(&self, req: &AdmissionRequest) -> AdmissionResponse {
        match self.handle(req) {
            Ok(rsp) => rsp,
            Err(error) => {
                let code = error.status_code();
                warn!(%error, %code, uid = %req.uid, "Failed to annotate pod");
                let mut rsp = AdmissionResponse::from(req).deny(error);
                rsp.result.code = code.as_u16();
                rsp
            }
        }
    }

    /// Sets the annotation on the request's Pod and returns a response
    /// patching the original object into the annotated one.
    pub fn handle(&self, req: &AdmissionRequest) -> Result<AdmissionResponse, Error> {
        let obj = req.object.as_ref().ok_or(Error::MissingObject)?;

        let original = serde_json::to_value(obj).map_err(Error::Decode)?;
        let mut pod: Pod = self.decoder.decode(&original).map_err(Error::Decode)?;

        let annotations = pod.metadata.annotations.get_or_insert_with(Default::default);
        annotations.insert(ANNOTATION_KEY.to_string(), ANNOTATION_VALUE.to_string());
        let annotations = serde_json::to_value(&*annotations).map_err(Error::Encode)?;
        info!(
            ns = req.namespace.as_deref().unwrap_or_default(),
            name = pod_name(&pod, req),
            operation = ?req.operation,
            "Annotated Pod"
        );

        // Only the annotations are re-encoded from the typed Pod. The rest of
        // the document stays as received, so fields the typed encoding would
        // drop (e.g. explicit nulls in status) never show up in the patch.
        let mut annotated = original.clone();
        annotated["metadata"]["annotations"] = annotations;
        let patch = json_patch::diff(&original, &annotated);
        Ok(AdmissionResponse::from(req).with_patch(patch)?)
    }
}

fn pod_name<'a>(pod: &'a Pod, req: &'a AdmissionRequest) -> &'a str {
    pod.metadata
        .name
        .as_deref()
        .or(pod.metadata.generate_name.as_deref())
        .unwrap_or(&req.name)
}

// === impl Error ===

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingObject | Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Encode(_) | Self::Patch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
