pub mod client;
pub mod config;
pub mod error;
pub mod multipart;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ClientError;
pub use multipart::{MultipartPayload, SketchFile};
