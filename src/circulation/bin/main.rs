use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use circulation::circulation::controller::{bookshelf, borrow, detail, fulfill, revoke};
use circulation::circulation::factory::create_circulation_service;
use circulation::core::controller::AppState;
use circulation::core::domain::Settings;
use circulation::licensor::registry::LicensorRegistry;
use circulation::utils::logging::setup_tracing;

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }

    let settings = Settings::load()?;
    let registry = LicensorRegistry::from_settings(&settings);
    let state = AppState::new(create_circulation_service(&settings, registry).await?);

    let app = Router::new()
        .route("/:library/loans", get(bookshelf))
        .route("/:library/works/:identifier_type/:identifier", get(detail))
        .route("/:library/works/:identifier_type/:identifier/borrow", post(borrow))
        .route("/:library/works/:identifier_type/:identifier/borrow/:mechanism_id", post(borrow))
        .route("/:library/loans/:pool_id/fulfill", get(fulfill))
        .route("/:library/loans/:pool_id/fulfill/:mechanism_id", get(fulfill))
        .route("/:library/loans/:pool_id/revoke", post(revoke))
        .with_state(state);

    run(app).await
}
