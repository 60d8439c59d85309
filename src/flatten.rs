use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{CreatureRecord, Stat, join_names};
use crate::error::EtlError;

pub const PREFERRED_LANGUAGE: &str = "es";
pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
    is_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct MoveSlot {
    #[serde(rename = "move")]
    learned: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Sprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    front_shiny: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreaturePayload {
    id: u32,
    name: String,
    is_default: bool,
    height: u32,
    weight: u32,
    #[serde(deserialize_with = "present_or_null")]
    base_experience: Option<u32>,
    stats: Vec<StatSlot>,
    types: Vec<TypeSlot>,
    abilities: Vec<AbilitySlot>,
    moves: Vec<MoveSlot>,
    #[serde(default)]
    sprites: Option<Sprites>,
}

// The key must be present; only its value may be null.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl CreaturePayload {
    pub fn from_json(raw: &Value) -> Result<Self, EtlError> {
        CreaturePayload::deserialize(raw).map_err(|err| {
            let who = raw
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .or_else(|| raw.get("id").map(|v| v.to_string()))
                .unwrap_or_else(|| "unknown".to_string());
            EtlError::MalformedCreature(format!("{who}: {err}"))
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flatten(self, species: &SpeciesDetails, extracted_at: String) -> CreatureRecord {
        let stats = self
            .stats
            .iter()
            .map(|slot| (slot.stat.name.as_str(), slot.base_stat))
            .collect::<HashMap<_, _>>();
        let stat = |stat: Stat| stats.get(stat.api_name()).copied();

        let hidden_abilities = join_names(
            self.abilities
                .iter()
                .filter(|slot| slot.is_hidden)
                .map(|slot| slot.ability.name.as_str()),
        );
        let sprites = self.sprites.unwrap_or_default();

        CreatureRecord {
            id: self.id,
            is_default: self.is_default,
            height: self.height,
            weight: self.weight,
            base_experience: self.base_experience,
            types: join_names(self.types.iter().map(|slot| slot.kind.name.as_str())),
            abilities: join_names(self.abilities.iter().map(|slot| slot.ability.name.as_str())),
            hidden_abilities,
            hp: stat(Stat::Hp),
            attack: stat(Stat::Attack),
            defense: stat(Stat::Defense),
            special_attack: stat(Stat::SpecialAttack),
            special_defense: stat(Stat::SpecialDefense),
            speed: stat(Stat::Speed),
            move_count: self.moves.len(),
            moves: join_names(self.moves.iter().map(|slot| slot.learned.name.as_str())),
            description: species.description.clone(),
            is_legendary: species.is_legendary,
            is_mythical: species.is_mythical,
            capture_rate: species.capture_rate,
            base_happiness: species.base_happiness,
            habitat: species.habitat.clone(),
            generation: species.generation.clone(),
            evolution_chain_url: species.evolution_chain_url.clone(),
            sprite_front: sprites.front_default,
            sprite_shiny: sprites.front_shiny,
            extracted_at,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesDetails {
    pub description: String,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub capture_rate: Option<u32>,
    pub base_happiness: Option<u32>,
    pub habitat: String,
    pub generation: String,
    pub evolution_chain_url: String,
}

impl SpeciesDetails {
    pub fn from_json(raw: &Value) -> Self {
        let description = raw
            .get("flavor_text_entries")
            .and_then(|v| v.as_array())
            .map(|entries| select_description(entries))
            .unwrap_or_default();
        let small_uint = |key: &str| {
            raw.get(key)
                .and_then(|v| v.as_u64())
                .and_then(|v| u32::try_from(v).ok())
        };
        let nested_str = |key: &str, field: &str| {
            raw.get(key)
                .and_then(|v| v.get(field))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            description,
            is_legendary: raw
                .get("is_legendary")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            is_mythical: raw
                .get("is_mythical")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            capture_rate: small_uint("capture_rate"),
            base_happiness: small_uint("base_happiness"),
            habitat: nested_str("habitat", "name"),
            generation: nested_str("generation", "name"),
            evolution_chain_url: nested_str("evolution_chain", "url"),
        }
    }
}

/// First Spanish entry wins wherever it sits; an empty or missing one falls
/// back to the first English entry.
pub fn select_description(entries: &[Value]) -> String {
    let preferred = first_flavor_text(entries, PREFERRED_LANGUAGE).unwrap_or_default();
    if !preferred.is_empty() {
        return preferred;
    }
    first_flavor_text(entries, FALLBACK_LANGUAGE).unwrap_or_default()
}

fn first_flavor_text(entries: &[Value], language: &str) -> Option<String> {
    entries
        .iter()
        .find(|entry| {
            entry
                .get("language")
                .and_then(|v| v.get("name"))
                .and_then(|v| v.as_str())
                == Some(language)
        })
        .map(|entry| {
            entry
                .get("flavor_text")
                .and_then(|v| v.as_str())
                .map(clean_flavor_text)
                .unwrap_or_default()
        })
}

pub fn clean_flavor_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}

pub fn flatten_creature(
    raw: &Value,
    species: &SpeciesDetails,
    extracted_at: String,
) -> Result<CreatureRecord, EtlError> {
    Ok(CreaturePayload::from_json(raw)?.flatten(species, extracted_at))
}

/// Local wall-clock time in ISO-8601 with microseconds and no offset.
pub fn extraction_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn flavor(lang: &str, text: &str) -> Value {
        json!({ "flavor_text": text, "language": { "name": lang, "url": "" } })
    }

    #[test]
    fn spanish_wins_regardless_of_order() {
        let entries = vec![
            flavor("en", "English text."),
            flavor("ja", "日本語"),
            flavor("es", "Texto en español."),
            flavor("es", "Otro texto."),
        ];
        assert_eq!(select_description(&entries), "Texto en español.");
    }

    #[test]
    fn english_is_the_fallback() {
        let entries = vec![
            flavor("fr", "Texte."),
            flavor("en", "First English."),
            flavor("en", "Second English."),
        ];
        assert_eq!(select_description(&entries), "First English.");
    }

    #[test]
    fn no_known_language_gives_empty() {
        let entries = vec![flavor("de", "Text."), flavor("ko", "텍스트")];
        assert_eq!(select_description(&entries), "");
        assert_eq!(select_description(&[]), "");
    }

    #[test]
    fn empty_spanish_text_falls_back_to_english() {
        let entries = vec![flavor("es", ""), flavor("en", "English.")];
        assert_eq!(select_description(&entries), "English.");
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(
            clean_flavor_text("Cuando varios\nde estos\u{000C}se juntan"),
            "Cuando varios de estos se juntan"
        );
    }

    #[test]
    fn null_habitat_defaults_to_empty() {
        let species = SpeciesDetails::from_json(&json!({
            "is_legendary": true,
            "habitat": null,
            "generation": { "name": "generation-i" },
        }));
        assert!(species.is_legendary);
        assert!(!species.is_mythical);
        assert_eq!(species.habitat, "");
        assert_eq!(species.generation, "generation-i");
        assert_eq!(species.capture_rate, None);
        assert_eq!(species.evolution_chain_url, "");
    }
}
