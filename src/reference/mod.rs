//! External reference services
//!
//! Read-only lookups that feed the registration form: the IBGE localities API
//! (states and municipalities) and ViaCEP (address by postal code). Every
//! lookup returns a [`LookupResult`] so callers can tell a transport failure
//! from an unknown postal code and keep their state untouched on error.

pub mod types;
pub mod errors;
pub mod ibge;
pub mod viacep;

pub use errors::{LookupError, LookupResult};
pub use ibge::IbgeClient;
pub use viacep::{normalize_postal_code, ViaCepClient};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::models::{AddressLookup, CityOption, StateOption};

/// Source of states, municipalities and postal-code addresses
#[async_trait]
pub trait ReferenceService: Send + Sync {
    /// All states, in service order
    async fn list_states(&self) -> LookupResult<Vec<StateOption>>;

    /// Municipalities of the state with the given IBGE id
    async fn list_cities(&self, state_id: u32) -> LookupResult<Vec<CityOption>>;

    /// Address block for a postal code
    async fn lookup_postal_code(&self, postal_code: &str) -> LookupResult<AddressLookup>;
}

/// Production implementation backed by the public IBGE and ViaCEP APIs
pub struct HttpReferenceService {
    ibge: IbgeClient,
    viacep: ViaCepClient,
}

impl HttpReferenceService {
    pub fn new(ibge: IbgeClient, viacep: ViaCepClient) -> Self {
        Self { ibge, viacep }
    }

    /// Build both clients on one shared HTTP client
    pub fn from_config(config: &Config) -> LookupResult<Self> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self::new(
            IbgeClient::new(client.clone(), &config.endpoints.ibge_base_url),
            ViaCepClient::new(client, &config.endpoints.viacep_base_url),
        ))
    }
}

#[async_trait]
impl ReferenceService for HttpReferenceService {
    async fn list_states(&self) -> LookupResult<Vec<StateOption>> {
        self.ibge.list_states().await
    }

    async fn list_cities(&self, state_id: u32) -> LookupResult<Vec<CityOption>> {
        self.ibge.list_cities(state_id).await
    }

    async fn lookup_postal_code(&self, postal_code: &str) -> LookupResult<AddressLookup> {
        self.viacep.lookup(postal_code).await
    }
}

/// GET a URL and decode its JSON body, mapping each failure mode to a [`LookupError`]
pub(crate) async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> LookupResult<T> {
    debug!("Fetching reference data from: {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(LookupError::Status {
            status_code: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| LookupError::Malformed {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
