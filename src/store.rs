use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::CreatureRecord;
use crate::error::EtlError;

pub const JSON_FILE: &str = "pokemon_raw.json";
pub const CSV_FILE: &str = "pokemon.csv";

#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: Utf8PathBuf,
}

impl DataStore {
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn json_path(&self) -> Utf8PathBuf {
        self.data_dir.join(JSON_FILE)
    }

    pub fn csv_path(&self) -> Utf8PathBuf {
        self.data_dir.join(CSV_FILE)
    }

    pub fn ensure_data_dir(&self) -> Result<(), EtlError> {
        fs::create_dir_all(self.data_dir.as_std_path())
            .map_err(|err| EtlError::Filesystem(format!("create {}: {err}", self.data_dir)))
    }

    pub fn write_json(&self, records: &[CreatureRecord]) -> Result<(), EtlError> {
        self.ensure_data_dir()?;
        let content = serde_json::to_vec_pretty(records)
            .map_err(|err| EtlError::Filesystem(err.to_string()))?;
        let path = self.json_path();
        fs::write(path.as_std_path(), content)
            .map_err(|err| EtlError::Filesystem(format!("write {path}: {err}")))
    }

    pub fn read_json(&self) -> Result<Vec<CreatureRecord>, EtlError> {
        let path = self.json_path();
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| EtlError::Filesystem(format!("read {path}: {err}")))?;
        serde_json::from_str(&content).map_err(|err| EtlError::Filesystem(err.to_string()))
    }

    // The header is written even for an empty table.
    pub fn write_csv(&self, records: &[CreatureRecord]) -> Result<(), EtlError> {
        self.ensure_data_dir()?;
        let content = encode_csv(records)?;
        let path = self.csv_path();
        fs::write(path.as_std_path(), content)
            .map_err(|err| EtlError::Filesystem(format!("write {path}: {err}")))
    }

    pub fn read_csv(&self) -> Result<Vec<CreatureRecord>, EtlError> {
        let path = self.csv_path();
        let content = fs::read(path.as_std_path())
            .map_err(|err| EtlError::Filesystem(format!("read {path}: {err}")))?;
        decode_csv(&content)
    }
}

pub fn encode_csv(records: &[CreatureRecord]) -> Result<Vec<u8>, EtlError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CreatureRecord::COLUMNS)
        .map_err(|err| EtlError::Csv(err.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|err| EtlError::Csv(format!("record {}: {err}", record.id)))?;
    }
    writer
        .into_inner()
        .map_err(|err| EtlError::Csv(err.to_string()))
}

pub fn decode_csv(content: &[u8]) -> Result<Vec<CreatureRecord>, EtlError> {
    let mut reader = csv::Reader::from_reader(content);
    let headers = reader
        .headers()
        .map_err(|err| EtlError::Csv(err.to_string()))?
        .clone();
    if let Some(missing) = CreatureRecord::COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(EtlError::Csv(format!("missing column {missing}")));
    }

    reader
        .deserialize::<CreatureRecord>()
        .enumerate()
        .map(|(row, record)| record.map_err(|err| EtlError::Csv(format!("row {}: {err}", row + 1))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let store = DataStore::new("data");
        assert!(store.json_path().ends_with("data/pokemon_raw.json"));
        assert!(store.csv_path().ends_with("data/pokemon.csv"));
    }

    #[test]
    fn empty_table_keeps_header() {
        let bytes = encode_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), CreatureRecord::COLUMNS.join(","));
        assert!(decode_csv(text.as_bytes()).unwrap().is_empty());
    }
}
