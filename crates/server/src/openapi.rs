use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
}

/// `id` is a JSON number for sequential stores and a UUID string otherwise.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDoc {
    #[schema(example = 1)]
    pub id: String,
    pub reviewer: String,
    pub book_title: String,
    pub author: String,
    pub review: String,
    #[schema(minimum = 0, maximum = 5)]
    pub rating: i64,
    #[schema(example = "2024-05-01T12:00:00Z")]
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInputDoc {
    pub reviewer: String,
    pub book_title: String,
    pub author: String,
    pub review: String,
    /// Integer or numeric string.
    #[schema(minimum = 0, maximum = 5)]
    pub rating: i64,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteOutputDoc {
    pub success: bool,
    pub deleted: ReviewDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::reviews::list_reviews,
        crate::routes::reviews::get_review,
        crate::routes::reviews::create_review,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            ReviewDoc,
            ReviewInputDoc,
            DeleteOutputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
