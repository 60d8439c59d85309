use std::time::Duration;

use assert_matches::assert_matches;

use pokeapi_etl::config::DEFAULT_BASE_URL;
use pokeapi_etl::error::EtlError;
use pokeapi_etl::flatten::{SpeciesDetails, extraction_timestamp, flatten_creature};
use pokeapi_etl::pokeapi::{CatalogClient, PokeApiHttpClient};

fn client() -> PokeApiHttpClient {
    PokeApiHttpClient::new(DEFAULT_BASE_URL, Duration::from_secs(10)).unwrap()
}

#[test]
#[ignore = "requires network access"]
fn fetches_and_flattens_pikachu() {
    let client = client();
    let raw = client.fetch_creature("25").unwrap();
    let species = SpeciesDetails::from_json(&client.fetch_species("pikachu").unwrap());
    let record = flatten_creature(&raw, &species, extraction_timestamp()).unwrap();

    assert_eq!(record.name, "pikachu");
    assert_eq!(record.types, "electric");
    assert_eq!(record.hp, Some(35));
    assert_eq!(record.generation, "generation-i");
    assert!(!record.description.is_empty());
}

#[test]
#[ignore = "requires network access"]
fn unknown_id_is_a_status_error() {
    let result = client().fetch_creature("999999");
    assert_matches!(result, Err(EtlError::CatalogStatus { status: 404, .. }));
}
