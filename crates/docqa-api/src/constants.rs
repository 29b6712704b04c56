//! API constants

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD_NAME: &str = "document";

/// Body of the root health endpoint.
pub const HEALTH_RESPONSE: &str = "hello";

pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const DOCS_PATH: &str = "/docs";
