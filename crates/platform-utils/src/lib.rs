//! Transport collaborators shared by the resolver and its callers.

mod error;
mod http;

pub use error::HttpError;
pub use http::{BitreqHttpClient, DefaultHttpClient, HttpClient, HttpResponse, REQUEST_TIMEOUT};
