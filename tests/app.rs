use std::collections::HashMap;
use std::sync::Mutex;

use camino::Utf8PathBuf;
use serde_json::{Value, json};

use pokeapi_etl::app::Extractor;
use pokeapi_etl::error::EtlError;
use pokeapi_etl::output::SummaryOutput;
use pokeapi_etl::pokeapi::CatalogClient;
use pokeapi_etl::store::DataStore;

fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Serves the pikachu fixture under every id in `known`, renamed per id.
#[derive(Default)]
struct MockCatalog {
    known: HashMap<String, Value>,
    species_ok: bool,
    calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    fn with_ids(ids: &[u32], species_ok: bool) -> Self {
        let base = fixture("pikachu.json");
        let known = ids
            .iter()
            .map(|id| {
                let mut raw = base.clone();
                raw["id"] = Value::from(*id);
                raw["name"] = Value::from(format!("creature-{id}"));
                (id.to_string(), raw)
            })
            .collect();
        Self {
            known,
            species_ok,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl CatalogClient for MockCatalog {
    fn fetch_creature(&self, id: &str) -> Result<Value, EtlError> {
        self.calls.lock().unwrap().push(format!("pokemon/{id}"));
        self.known
            .get(id)
            .cloned()
            .ok_or_else(|| EtlError::CatalogStatus {
                status: 404,
                url: format!("https://catalog.test/pokemon/{id}"),
                message: "Not Found".to_string(),
            })
    }

    fn fetch_species(&self, name: &str) -> Result<Value, EtlError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("pokemon-species/{name}"));
        if self.species_ok {
            Ok(fixture("pikachu_species.json"))
        } else {
            Err(EtlError::CatalogHttp("timed out".to_string()))
        }
    }
}

fn temp_store() -> (tempfile::TempDir, DataStore) {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().join("data")).unwrap();
    (temp, DataStore::new(dir))
}

#[test]
fn walks_ids_in_order() {
    let catalog = MockCatalog::with_ids(&[1, 2, 3], true);
    let extractor = Extractor::new(&catalog);

    let result = extractor.run(3);
    let ids = result.records.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(result.failed_ids.is_empty());

    let calls = catalog.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        [
            "pokemon/1",
            "pokemon-species/creature-1",
            "pokemon/2",
            "pokemon-species/creature-2",
            "pokemon/3",
            "pokemon-species/creature-3",
        ]
    );
}

#[test]
fn failed_entities_are_skipped() {
    let catalog = MockCatalog::with_ids(&[1, 3, 5], true);
    let result = Extractor::new(&catalog).run(5);

    assert_eq!(result.records.len(), 3);
    assert!(result.records.len() <= 5);
    assert_eq!(result.failed_ids, vec![2, 4]);
    assert_eq!(result.requested(), 5);
}

#[test]
fn unparsable_entity_is_skipped_without_species_call() {
    let mut catalog = MockCatalog::with_ids(&[2, 3], true);
    catalog
        .known
        .insert("1".to_string(), json!({ "id": 1, "name": "x" }));

    let result = Extractor::new(&catalog).run(3);
    assert_eq!(result.failed_ids, vec![1]);
    let ids = result.records.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 3]);

    let calls = catalog.calls.lock().unwrap();
    assert!(calls.iter().any(|call| call == "pokemon/1"));
    assert!(!calls.iter().any(|call| call == "pokemon-species/x"));
}

#[test]
fn species_failure_keeps_the_record() {
    let catalog = MockCatalog::with_ids(&[1, 2], false);
    let result = Extractor::new(&catalog).run(2);

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.species_fallbacks, vec!["creature-1", "creature-2"]);
    for record in &result.records {
        assert_eq!(record.description, "");
        assert!(!record.is_legendary);
        assert_eq!(record.capture_rate, None);
        assert_eq!(record.hp, Some(35));
    }
}

#[test]
fn stores_json_and_csv_with_same_rows() {
    let (_temp, store) = temp_store();
    let catalog = MockCatalog::with_ids(&[1, 2, 4], true);

    let result = Extractor::new(&catalog).run_and_store(4, &store).unwrap();
    assert_eq!(result.records.len(), 3);
    assert!(store.json_path().exists());
    assert!(store.csv_path().exists());

    let from_json = store.read_json().unwrap();
    let from_csv = store.read_csv().unwrap();
    assert_eq!(from_json, result.records);
    assert_eq!(from_csv, from_json);

    let json_text = std::fs::read_to_string(store.json_path()).unwrap();
    assert!(json_text.contains("\n  {"));
    assert!(json_text.contains("Pokémon"));
}

#[test]
fn empty_run_still_writes_both_files() {
    let (_temp, store) = temp_store();
    let catalog = MockCatalog::default();

    let result = Extractor::new(&catalog).run_and_store(3, &store).unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.failed_ids, vec![1, 2, 3]);

    assert_eq!(std::fs::read_to_string(store.json_path()).unwrap(), "[]");
    assert!(store.read_csv().unwrap().is_empty());
}

#[test]
fn summary_reports_counts() {
    let catalog = MockCatalog::with_ids(&[1], false);
    let result = Extractor::new(&catalog).run(2);

    let summary = SummaryOutput::render(&result);
    assert!(summary.contains("RESUMEN DE EXTRACCIÓN"));
    assert!(summary.contains("creature-1"));
}
