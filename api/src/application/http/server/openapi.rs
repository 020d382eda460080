use crate::application::http::{health::router::HealthApiDoc, scan::router::ScanApiDoc};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabelCheck API"
    ),
    nest(
        (path = "/api", api = ScanApiDoc),
        (path = "/api", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
