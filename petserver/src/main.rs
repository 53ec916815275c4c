//! Pet registry server entry point

use clap::Parser;
use shared::{Component, logging, service_info};

use petserver::{Args, InMemoryPetServer, PetServerResult, ServerConfig};

#[tokio::main]
async fn main() -> PetServerResult<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config = ServerConfig::from_args(args)?;

    let trace_endpoint = config.trace_endpoint.clone().map(logging::TracingEndpoint::new);
    logging::init_tracing_with_endpoint_and_level(trace_endpoint, Some(&config.log_level));

    logging::log_startup(Component::Api, &format!("pet registry on {}", config.bind_address));
    service_info!(Component::Api, "📄 Page size: {}", config.page_size);

    let server = InMemoryPetServer::in_memory(config);
    if let Err(e) = server.run().await {
        logging::log_error(Component::Api, "Pet registry", &e);
        return Err(e);
    }

    logging::log_success(Component::Api, "Pet registry stopped gracefully");
    Ok(())
}
