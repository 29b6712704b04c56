use crate::constants::HEALTH_RESPONSE;

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn health() -> &'static str {
    HEALTH_RESPONSE
}
