//! Wire types of the IBGE and ViaCEP APIs

use serde::Deserialize;
use serde_json::Value;

use crate::models::{AddressLookup, CityOption, StateOption};

/// One entry of `GET /estados`
#[derive(Debug, Deserialize, Clone)]
pub struct IbgeState {
    pub id: u32,
    /// Two-letter abbreviation (UF)
    pub sigla: String,
    pub nome: String,
}

/// One entry of `GET /estados/{id}/municipios`
#[derive(Debug, Deserialize, Clone)]
pub struct IbgeMunicipality {
    pub id: u32,
    pub nome: String,
}

/// Body of `GET /{cep}/json/`
///
/// Unknown postal codes come back as `200 OK` with only an `erro` flag,
/// which older deployments send as a boolean and newer ones as a string.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ViaCepAddress {
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub erro: Option<Value>,
}

impl ViaCepAddress {
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

impl From<IbgeState> for StateOption {
    fn from(state: IbgeState) -> Self {
        StateOption {
            id: state.id,
            abbreviation: state.sigla,
            name: state.nome,
        }
    }
}

impl From<IbgeMunicipality> for CityOption {
    fn from(city: IbgeMunicipality) -> Self {
        CityOption {
            id: city.id,
            name: city.nome,
        }
    }
}

impl From<ViaCepAddress> for AddressLookup {
    fn from(address: ViaCepAddress) -> Self {
        AddressLookup {
            street_address: address.logradouro.unwrap_or_default(),
            state_code: address.uf.unwrap_or_default(),
            city: address.localidade.unwrap_or_default(),
            neighborhood: address.bairro.unwrap_or_default(),
        }
    }
}

/// IBGE localities API endpoints
pub struct IbgeApi;

impl IbgeApi {
    /// Base URL for the localities API
    pub const BASE_URL: &'static str = "https://servicodados.ibge.gov.br/api/v1/localidades";
    /// State listing endpoint
    pub const STATES_ENDPOINT: &'static str = "/estados";
    /// Municipality listing endpoint suffix (after the state id)
    pub const MUNICIPALITIES_ENDPOINT: &'static str = "/municipios";
}

/// ViaCEP API endpoints
pub struct ViaCepApi;

impl ViaCepApi {
    /// Base URL for ViaCEP
    pub const BASE_URL: &'static str = "https://viacep.com.br/ws";
    /// Response format suffix
    pub const JSON_ENDPOINT: &'static str = "/json/";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibge_states_deserialization() {
        let sample_response = r#"[
            {
                "id": 35,
                "sigla": "SP",
                "nome": "São Paulo",
                "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}
            },
            {
                "id": 33,
                "sigla": "RJ",
                "nome": "Rio de Janeiro",
                "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}
            }
        ]"#;

        let parsed: Vec<IbgeState> = serde_json::from_str(sample_response).unwrap();
        let states: Vec<StateOption> = parsed.into_iter().map(StateOption::from).collect();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].id, 35);
        assert_eq!(states[0].abbreviation, "SP");
        assert_eq!(states[1].name, "Rio de Janeiro");
        assert_eq!(states[0].label(), "SP - São Paulo");
    }

    #[test]
    fn test_ibge_municipalities_deserialization() {
        let sample_response = r#"[
            {"id": 3550308, "nome": "São Paulo", "microrregiao": {"id": 35061}},
            {"id": 3509502, "nome": "Campinas"}
        ]"#;

        let parsed: Vec<IbgeMunicipality> = serde_json::from_str(sample_response).unwrap();
        let cities: Vec<CityOption> = parsed.into_iter().map(CityOption::from).collect();
        assert_eq!(cities[0].id, 3550308);
        assert_eq!(cities[1].name, "Campinas");
    }

    #[test]
    fn test_viacep_address_maps_missing_fields_to_empty() {
        let sample_response = r#"{
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;

        let parsed: ViaCepAddress = serde_json::from_str(sample_response).unwrap();
        assert!(!parsed.is_not_found());

        let address = AddressLookup::from(parsed);
        assert_eq!(address.street_address, "Praça da Sé");
        assert_eq!(address.state_code, "SP");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.neighborhood, "");
    }

    #[test]
    fn test_viacep_not_found_flag_variants() {
        let as_bool: ViaCepAddress = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        let as_string: ViaCepAddress = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        let absent: ViaCepAddress = serde_json::from_str(r#"{"uf": "RJ"}"#).unwrap();

        assert!(as_bool.is_not_found());
        assert!(as_string.is_not_found());
        assert!(!absent.is_not_found());
    }
}
