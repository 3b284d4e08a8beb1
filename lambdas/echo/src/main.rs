use crate::http_handler::{function_handler, HandlerDeps};
use gateway_responses::configuration::Configuration;
use lambda_http::{run, service_fn, tracing, Error};

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let config = Configuration::load()?;
    tracing::info!("{}", config);
    let deps = HandlerDeps {
        responder: config.responder(),
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
