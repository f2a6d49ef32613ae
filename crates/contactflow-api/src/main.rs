use contactflow_api::ContactContext;
use lambda_http::{Error, Request, run, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Contactflow API Lambda function");

    let ctx = ContactContext::from_env();

    run(service_fn(|event: Request| {
        let ctx = ctx.clone();
        async move { contactflow_api::handler(ctx, event).await }
    }))
    .await
}
