//! ViaCEP postal-code client

use reqwest::Client;
use tracing::{debug, info};

use super::types::{ViaCepAddress, ViaCepApi};
use super::{fetch_json, trim_base_url, LookupError, LookupResult};
use crate::models::AddressLookup;

pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

/// Reduce a user-typed postal code to its 8 digits.
///
/// Accepts the usual `01001-000` / `01.001-000` spellings; anything else,
/// or a digit count other than 8, is rejected.
pub fn normalize_postal_code(raw: &str) -> LookupResult<String> {
    let mut digits = String::with_capacity(8);
    for c in raw.trim().chars() {
        match c {
            '0'..='9' => digits.push(c),
            '-' | '.' | ' ' => {}
            _ => return Err(LookupError::InvalidPostalCode(raw.to_string())),
        }
    }

    if digits.len() != 8 {
        return Err(LookupError::InvalidPostalCode(raw.to_string()));
    }
    Ok(digits)
}

impl ViaCepClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
        }
    }

    pub fn postal_code_url(&self, digits: &str) -> String {
        format!("{}/{}{}", self.base_url, digits, ViaCepApi::JSON_ENDPOINT)
    }

    /// Resolve a postal code to an address block
    pub async fn lookup(&self, postal_code: &str) -> LookupResult<AddressLookup> {
        let digits = normalize_postal_code(postal_code)?;
        debug!("Looking up postal code {}", digits);

        let address: ViaCepAddress = fetch_json(&self.client, &self.postal_code_url(&digits)).await?;
        if address.is_not_found() {
            return Err(LookupError::NotFound(format!("postal code {}", digits)));
        }

        let address = AddressLookup::from(address);
        info!(
            "Postal code {} resolved to {}/{}",
            digits, address.city, address.state_code
        );
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serve_once;

    #[test]
    fn test_normalize_postal_code() {
        assert_eq!(normalize_postal_code("01001-000").unwrap(), "01001000");
        assert_eq!(normalize_postal_code(" 01.001-000 ").unwrap(), "01001000");
        assert_eq!(normalize_postal_code("01001000").unwrap(), "01001000");

        assert!(matches!(
            normalize_postal_code("0100100"),
            Err(LookupError::InvalidPostalCode(_))
        ));
        assert!(matches!(
            normalize_postal_code("01001-00a"),
            Err(LookupError::InvalidPostalCode(_))
        ));
        assert!(normalize_postal_code("").is_err());
    }

    #[test]
    fn test_postal_code_url() {
        let client = ViaCepClient::new(Client::new(), "https://viacep.com.br/ws/");
        assert_eq!(
            client.postal_code_url("01001000"),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }

    #[tokio::test]
    async fn test_lookup_maps_erro_payload_to_not_found() {
        let base_url = serve_once(200, r#"{"erro": "true"}"#).await;
        let client = ViaCepClient::new(Client::new(), &base_url);

        let err = client.lookup("99999-999").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let base_url = serve_once(
            200,
            r#"{"cep": "20040-020", "logradouro": "Avenida Rio Branco", "bairro": "Centro", "localidade": "Rio de Janeiro", "uf": "RJ"}"#,
        )
        .await;
        let client = ViaCepClient::new(Client::new(), &base_url);

        let address = client.lookup("20040-020").await.unwrap();
        assert_eq!(address.street_address, "Avenida Rio Branco");
        assert_eq!(address.neighborhood, "Centro");
        assert_eq!(address.state_code, "RJ");
    }

    #[tokio::test]
    async fn test_invalid_code_fails_without_request() {
        // Unroutable base URL: a request would surface as an HTTP error instead
        let client = ViaCepClient::new(Client::new(), "http://127.0.0.1:9");
        let err = client.lookup("123").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidPostalCode(_)));
    }
}
