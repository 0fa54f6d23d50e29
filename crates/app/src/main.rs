mod plan;
mod problem;
mod router;
mod telemetry;

use std::net::SocketAddr;

use reqwest::Client;
use sendwarm_contacts::{AudienceResolver, ContactsClient};
use sendwarm_util::{load_env_file, AppConfig};
use tracing::info;
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let contacts_base = Url::parse(&config.contacts.api_url)?;
    let http = Client::builder().timeout(config.contacts.timeout).build()?;
    let contacts = ContactsClient::new(contacts_base, config.contacts.api_token.clone(), http);
    let resolver = AudienceResolver::new(contacts);

    let state = router::AppState::new(metrics, resolver);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
