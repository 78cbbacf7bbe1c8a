//! Dataset acquisition: the remote loader, payload reshaping, and the bundled
//! fallback data it degrades to.

pub mod fallback;
pub mod remote;
pub mod reshape;

pub use remote::{CancelToken, Dataset, DatasetLoader, HttpTransport, RawResponse, Transport};
