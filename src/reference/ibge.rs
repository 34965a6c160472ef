//! IBGE localities client (states and municipalities)

use reqwest::Client;
use tracing::{debug, info};

use super::types::{IbgeApi, IbgeMunicipality, IbgeState};
use super::{fetch_json, trim_base_url, LookupError, LookupResult};
use crate::models::{CityOption, StateOption};

pub struct IbgeClient {
    client: Client,
    base_url: String,
}

impl IbgeClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
        }
    }

    pub fn states_url(&self) -> String {
        format!("{}{}", self.base_url, IbgeApi::STATES_ENDPOINT)
    }

    pub fn municipalities_url(&self, state_id: u32) -> String {
        format!(
            "{}{}/{}{}",
            self.base_url,
            IbgeApi::STATES_ENDPOINT,
            state_id,
            IbgeApi::MUNICIPALITIES_ENDPOINT
        )
    }

    /// Fetch every state, preserving the order the service returns
    pub async fn list_states(&self) -> LookupResult<Vec<StateOption>> {
        let states: Vec<IbgeState> = fetch_json(&self.client, &self.states_url()).await?;
        if states.is_empty() {
            return Err(LookupError::NotFound("state list".to_string()));
        }

        info!("Loaded {} states from IBGE", states.len());
        Ok(states.into_iter().map(StateOption::from).collect())
    }

    /// Fetch the municipalities of one state
    pub async fn list_cities(&self, state_id: u32) -> LookupResult<Vec<CityOption>> {
        let cities: Vec<IbgeMunicipality> =
            fetch_json(&self.client, &self.municipalities_url(state_id)).await?;
        if cities.is_empty() {
            return Err(LookupError::NotFound(format!(
                "municipalities for state {}",
                state_id
            )));
        }

        debug!("Loaded {} municipalities for state {}", cities.len(), state_id);
        Ok(cities.into_iter().map(CityOption::from).collect())
    }
}
