use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EtlError;

pub const LIST_SEPARATOR: &str = ", ";

/// Serialized names double as the CSV header and the JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "es_default")]
    pub is_default: bool,

    #[serde(rename = "altura")]
    pub height: u32,
    #[serde(rename = "peso")]
    pub weight: u32,

    #[serde(rename = "experiencia_base")]
    pub base_experience: Option<u32>,
    #[serde(rename = "tipos")]
    pub types: String,
    #[serde(rename = "habilidades")]
    pub abilities: String,
    #[serde(rename = "habilidades_ocultas")]
    pub hidden_abilities: String,

    pub hp: Option<u32>,
    #[serde(rename = "ataque")]
    pub attack: Option<u32>,
    #[serde(rename = "defensa")]
    pub defense: Option<u32>,
    #[serde(rename = "ataque_especial")]
    pub special_attack: Option<u32>,
    #[serde(rename = "defensa_especial")]
    pub special_defense: Option<u32>,
    #[serde(rename = "velocidad")]
    pub speed: Option<u32>,

    #[serde(rename = "total_movimientos")]
    pub move_count: usize,
    #[serde(rename = "movimientos")]
    pub moves: String,

    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "es_legendario")]
    pub is_legendary: bool,
    #[serde(rename = "es_mitico")]
    pub is_mythical: bool,
    #[serde(rename = "tasa_captura")]
    pub capture_rate: Option<u32>,
    #[serde(rename = "felicidad_base")]
    pub base_happiness: Option<u32>,
    pub habitat: String,
    #[serde(rename = "generacion")]
    pub generation: String,
    #[serde(rename = "cadena_evolucion_url")]
    pub evolution_chain_url: String,

    #[serde(rename = "sprite_frente")]
    pub sprite_front: Option<String>,
    #[serde(rename = "sprite_shiny")]
    pub sprite_shiny: Option<String>,

    #[serde(rename = "fecha_extraccion")]
    pub extracted_at: String,
}

impl CreatureRecord {
    pub const COLUMNS: [&'static str; 28] = [
        "id",
        "nombre",
        "es_default",
        "altura",
        "peso",
        "experiencia_base",
        "tipos",
        "habilidades",
        "habilidades_ocultas",
        "hp",
        "ataque",
        "defensa",
        "ataque_especial",
        "defensa_especial",
        "velocidad",
        "total_movimientos",
        "movimientos",
        "descripcion",
        "es_legendario",
        "es_mitico",
        "tasa_captura",
        "felicidad_base",
        "habitat",
        "generacion",
        "cadena_evolucion_url",
        "sprite_frente",
        "sprite_shiny",
        "fecha_extraccion",
    ];

    pub fn type_list(&self) -> Vec<&str> {
        split_names(&self.types)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.type_list().into_iter().next()
    }

    pub fn stat(&self, stat: Stat) -> Option<u32> {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    pub fn api_name(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::SpecialAttack => "special-attack",
            Stat::SpecialDefense => "special-defense",
            Stat::Speed => "speed",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Attack => "ataque",
            Stat::Defense => "defensa",
            Stat::SpecialAttack => "ataque_especial",
            Stat::SpecialDefense => "defensa_especial",
            Stat::Speed => "velocidad",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Ataque",
            Stat::Defense => "Defensa",
            Stat::SpecialAttack => "Ataque especial",
            Stat::SpecialDefense => "Defensa especial",
            Stat::Speed => "Velocidad",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

impl FromStr for Stat {
    type Err = EtlError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.api_name() == value.trim())
            .ok_or_else(|| EtlError::MalformedCreature(format!("unknown stat: {value}")))
    }
}

pub fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

pub fn split_names(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
