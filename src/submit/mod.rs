/// Submission module
///
/// This module handles:
/// - The outbound multipart request and resize directives (form.rs)
/// - Local checks, request assembly and response handling (controller.rs)
/// - The quick image-swap form (quick.rs)
/// - The HTTP seam and its reqwest implementation (transport.rs)
/// - Content-Disposition filenames (disposition.rs)
/// - Writing downloads to disk (download.rs)

pub mod controller;
pub mod disposition;
pub mod download;
pub mod form;
pub mod quick;
pub mod transport;

pub use controller::{perform, SubmissionController};
pub use form::Resize;
pub use transport::HttpTransport;
