use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::ResolvedConfig;
use crate::error::EtlError;

pub trait CatalogClient {
    fn fetch_creature(&self, id: &str) -> Result<Value, EtlError>;
    fn fetch_species(&self, name: &str) -> Result<Value, EtlError>;
}

impl<C: CatalogClient + ?Sized> CatalogClient for &C {
    fn fetch_creature(&self, id: &str) -> Result<Value, EtlError> {
        (**self).fetch_creature(id)
    }

    fn fetch_species(&self, name: &str) -> Result<Value, EtlError> {
        (**self).fetch_species(name)
    }
}

#[derive(Clone)]
pub struct PokeApiHttpClient {
    client: Client,
    base_url: String,
}

impl PokeApiHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EtlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pokeapi-etl/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| EtlError::CatalogHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| EtlError::CatalogHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, EtlError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn creature_url(&self, id: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, id)
    }

    pub fn species_url(&self, name: &str) -> String {
        format!("{}/pokemon-species/{}", self.base_url, name)
    }

    fn get_json(&self, url: &str) -> Result<Value, EtlError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| EtlError::CatalogHttp(err.to_string()))?;
        let response = Self::handle_status(response, url)?;
        response
            .json()
            .map_err(|err| EtlError::CatalogHttp(err.to_string()))
    }

    fn handle_status(
        response: reqwest::blocking::Response,
        url: &str,
    ) -> Result<reqwest::blocking::Response, EtlError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "catalog request failed".to_string());
        Err(EtlError::CatalogStatus {
            status,
            url: url.to_string(),
            message,
        })
    }
}

impl CatalogClient for PokeApiHttpClient {
    fn fetch_creature(&self, id: &str) -> Result<Value, EtlError> {
        self.get_json(&self.creature_url(id))
    }

    fn fetch_species(&self, name: &str) -> Result<Value, EtlError> {
        self.get_json(&self.species_url(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        let client =
            PokeApiHttpClient::new("https://pokeapi.co/api/v2/", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.creature_url("25"),
            "https://pokeapi.co/api/v2/pokemon/25"
        );
        assert_eq!(
            client.species_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon-species/pikachu"
        );
    }
}
