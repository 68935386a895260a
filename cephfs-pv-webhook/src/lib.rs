#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A mutating admission webhook that marks every created or updated Pod with
//! the `cephfs-persistentvolume-mutating-admission-webhook` annotation.

mod admission;
mod args;
pub mod decode;
pub mod mutate;

pub use self::{
    admission::Admission,
    args::Args,
    decode::{Decode, JsonDecoder},
    mutate::PodAnnotator,
};

/// The path the API server posts Pod admission reviews to.
pub const WEBHOOK_PATH: &str = "/mutate-v1-pod";

/// The name of the `MutatingWebhookConfiguration` webhook entry.
///
/// The webhook is registered for `create` and `update` on core `v1` Pods
/// with `failurePolicy: Fail`, `sideEffects: None` and
/// `admissionReviewVersions: [v1]`.
pub const WEBHOOK_NAME: &str = "mpv.skao.int";
