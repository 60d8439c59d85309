use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::CreatureRecord;
use crate::error::EtlError;
use crate::flatten::{CreaturePayload, SpeciesDetails, extraction_timestamp};
use crate::pokeapi::CatalogClient;
use crate::store::DataStore;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    pub records: Vec<CreatureRecord>,
    /// Ids whose entity fetch or parse failed.
    pub failed_ids: Vec<u32>,
    pub species_fallbacks: Vec<String>,
}

impl ExtractionResult {
    pub fn requested(&self) -> usize {
        self.records.len() + self.failed_ids.len()
    }
}

pub struct Extractor<C: CatalogClient> {
    client: C,
}

impl<C: CatalogClient> Extractor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Per-creature failures are logged and never abort the run.
    pub fn run(&self, count: u32) -> ExtractionResult {
        info!("starting extraction of {count} creatures");
        let start = Instant::now();
        let mut result = ExtractionResult::default();

        for id in 1..=count {
            match self.extract_one(id, &mut result.species_fallbacks) {
                Ok(record) => result.records.push(record),
                Err(_) => result.failed_ids.push(id),
            }
        }

        info!(
            extracted = result.records.len(),
            failed = result.failed_ids.len(),
            species_fallbacks = result.species_fallbacks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "extraction finished"
        );
        result
    }

    pub fn run_and_store(&self, count: u32, store: &DataStore) -> Result<ExtractionResult, EtlError> {
        let result = self.run(count);
        store.write_json(&result.records)?;
        info!("saved {}", store.json_path());
        store.write_csv(&result.records)?;
        info!("saved {}", store.csv_path());
        Ok(result)
    }

    fn extract_one(
        &self,
        id: u32,
        species_fallbacks: &mut Vec<String>,
    ) -> Result<CreatureRecord, EtlError> {
        let key = id.to_string();
        let raw = self.client.fetch_creature(&key).inspect_err(|err| {
            error!("failed to extract creature {id}: {err}");
        })?;
        info!("extracted data for {id}");

        let payload = CreaturePayload::from_json(&raw).inspect_err(|err| {
            error!("failed to process creature {id}: {err}");
        })?;

        let species = match self.client.fetch_species(payload.name()) {
            Ok(raw_species) => SpeciesDetails::from_json(&raw_species),
            Err(err) => {
                warn!(
                    "failed to extract species for {}: {err}; keeping defaults",
                    payload.name()
                );
                species_fallbacks.push(payload.name().to_string());
                SpeciesDetails::default()
            }
        };

        Ok(payload.flatten(&species, extraction_timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{Value, json};

    use super::*;

    struct FixedCatalog {
        creatures: HashMap<String, Value>,
    }

    impl CatalogClient for FixedCatalog {
        fn fetch_creature(&self, id: &str) -> Result<Value, EtlError> {
            self.creatures
                .get(id)
                .cloned()
                .ok_or_else(|| EtlError::CatalogStatus {
                    status: 404,
                    url: format!("/pokemon/{id}"),
                    message: "Not Found".to_string(),
                })
        }

        fn fetch_species(&self, _name: &str) -> Result<Value, EtlError> {
            Err(EtlError::CatalogHttp("connection refused".to_string()))
        }
    }

    #[test]
    fn missing_ids_are_skipped_and_species_failures_kept() {
        let mut creatures = HashMap::new();
        creatures.insert(
            "2".to_string(),
            json!({
                "id": 2, "name": "ivysaur", "is_default": true,
                "height": 10, "weight": 130, "base_experience": 142,
                "stats": [], "types": [], "abilities": [], "moves": []
            }),
        );
        let extractor = Extractor::new(FixedCatalog { creatures });

        let result = extractor.run(3);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.failed_ids, vec![1, 3]);
        assert_eq!(result.species_fallbacks, vec!["ivysaur".to_string()]);
        assert_eq!(result.requested(), 3);
        assert!(!result.records[0].is_legendary);
        assert_eq!(result.records[0].capture_rate, None);
    }
}
