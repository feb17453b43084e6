//! OpenAPI documentation and Swagger UI.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::http::handlers::{
    self, BlockNumberResponse, HealthResponse, SubmitTransactionRequest, SubmitTransactionResponse,
};

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Path the Swagger UI is served under.
pub const DOCS_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Multisig Gateway API",
        description = "HTTP facade over an EVM JSON-RPC endpoint that queues transactions on a multisig wallet.",
    ),
    tags(
        (name = "chain", description = "Chain queries"),
        (name = "multisig", description = "Multisig transaction submission"),
        (name = "health", description = "Liveness")
    ),
    paths(
        handlers::get_block_number,
        handlers::submit_transaction,
        handlers::health,
    ),
    components(schemas(
        BlockNumberResponse,
        SubmitTransactionRequest,
        SubmitTransactionResponse,
        HealthResponse,
    ))
)]
pub struct ApiDoc;

/// Swagger UI bound to the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/block-number", "/submit-transaction", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
