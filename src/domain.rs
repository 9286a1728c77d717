use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DexError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedReference {
    pub name: String,
    pub url: String,
}

impl NamedReference {
    pub fn id(&self) -> Result<u32, DexError> {
        extract_id(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<NamedReference>,
    pub next: Option<String>,
    pub count: u32,
}

impl CatalogPage {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSet {
    pub default: Option<String>,
    pub animated: Option<String>,
    pub artwork: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub stats: Vec<BaseStat>,
    pub images: ImageSet,
}

impl Record {
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    pub fn sprite(&self) -> Option<&str> {
        self.images
            .animated
            .as_deref()
            .or(self.images.default.as_deref())
    }

    pub fn artwork(&self) -> Option<&str> {
        self.images
            .artwork
            .as_deref()
            .or(self.images.default.as_deref())
    }

    pub fn stat(&self, name: &str) -> Option<u8> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }

    pub fn primary_type(&self) -> Option<PokemonType> {
        self.types.first().and_then(|name| name.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    pub species: NamedReference,
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evolution {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub id: u32,
    pub evolution_chain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Id(u32),
    Name(String),
}

impl RecordKey {
    pub fn as_path_segment(&self) -> String {
        match self {
            RecordKey::Id(id) => id.to_string(),
            RecordKey::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "#{}", format_id(*id)),
            RecordKey::Name(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for RecordKey {
    type Err = DexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().trim_start_matches('#').to_lowercase();
        if normalized.is_empty() {
            return Err(DexError::RecordNotFound(value.to_string()));
        }
        if normalized.chars().all(|ch| ch.is_ascii_digit()) {
            return match normalized.parse::<u32>() {
                Ok(id) if id > 0 => Ok(RecordKey::Id(id)),
                _ => Err(DexError::RecordNotFound(value.to_string())),
            };
        }
        let is_valid = normalized
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
        if !is_valid {
            return Err(DexError::RecordNotFound(value.to_string()));
        }
        Ok(RecordKey::Name(normalized))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PokemonType {
    type Err = DexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        PokemonType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DexError::InvalidQuery(format!("unknown type: {value}")))
    }
}

pub fn extract_id(reference: &str) -> Result<u32, DexError> {
    let segments = reference.split('/').collect::<Vec<_>>();
    if segments.len() < 2 {
        return Err(DexError::InvalidReference(reference.to_string()));
    }
    segments[segments.len() - 2]
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| DexError::InvalidReference(reference.to_string()))
}

pub fn format_id(id: u32) -> String {
    format!("{id:03}")
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Attack".to_string(),
        "special-defense" => "Sp. Defense".to_string(),
        "speed" => "Speed".to_string(),
        other => capitalize(other),
    }
}

// Wire shapes as served by the catalog API. Only the fields the viewer reads
// are declared; everything else is ignored by serde.

#[derive(Debug, Deserialize)]
pub(crate) struct PageWire {
    #[serde(default)]
    pub results: Vec<NamedReference>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub count: u32,
}

impl From<PageWire> for CatalogPage {
    fn from(value: PageWire) -> Self {
        Self {
            items: value.results,
            next: value.next,
            count: value.count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordWire {
    id: u32,
    name: String,
    #[serde(default)]
    types: Vec<TypeSlotWire>,
    #[serde(default)]
    abilities: Vec<AbilitySlotWire>,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    stats: Vec<StatWire>,
    #[serde(default)]
    sprites: SpritesWire,
}

#[derive(Debug, Deserialize)]
struct TypeSlotWire {
    #[serde(rename = "type")]
    kind: NamedReference,
}

#[derive(Debug, Deserialize)]
struct AbilitySlotWire {
    ability: NamedReference,
}

#[derive(Debug, Deserialize)]
struct StatWire {
    base_stat: u8,
    stat: NamedReference,
}

#[derive(Debug, Default, Deserialize)]
struct SpritesWire {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    other: Option<OtherSpritesWire>,
    #[serde(default)]
    versions: Option<VersionsWire>,
}

#[derive(Debug, Deserialize)]
struct OtherSpritesWire {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<FrontDefaultWire>,
}

#[derive(Debug, Deserialize)]
struct VersionsWire {
    #[serde(rename = "generation-v", default)]
    generation_v: Option<GenerationVWire>,
}

#[derive(Debug, Deserialize)]
struct GenerationVWire {
    #[serde(rename = "black-white", default)]
    black_white: Option<BlackWhiteWire>,
}

#[derive(Debug, Deserialize)]
struct BlackWhiteWire {
    #[serde(default)]
    animated: Option<FrontDefaultWire>,
}

#[derive(Debug, Deserialize)]
struct FrontDefaultWire {
    #[serde(default)]
    front_default: Option<String>,
}

impl From<RecordWire> for Record {
    fn from(value: RecordWire) -> Self {
        let sprites = value.sprites;
        let artwork = sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|art| art.front_default);
        let animated = sprites
            .versions
            .and_then(|versions| versions.generation_v)
            .and_then(|gen_v| gen_v.black_white)
            .and_then(|bw| bw.animated)
            .and_then(|animated| animated.front_default);
        Self {
            id: value.id,
            name: value.name,
            types: value.types.into_iter().map(|slot| slot.kind.name).collect(),
            abilities: value
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
            height: value.height,
            weight: value.weight,
            stats: value
                .stats
                .into_iter()
                .map(|stat| BaseStat {
                    name: stat.stat.name,
                    value: stat.base_stat,
                })
                .collect(),
            images: ImageSet {
                default: sprites.front_default,
                animated,
                artwork,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeciesWire {
    id: u32,
    #[serde(default)]
    evolution_chain: Option<ChainPointerWire>,
}

#[derive(Debug, Deserialize)]
struct ChainPointerWire {
    url: String,
}

impl From<SpeciesWire> for Species {
    fn from(value: SpeciesWire) -> Self {
        Self {
            id: value.id,
            evolution_chain: value.evolution_chain.map(|pointer| pointer.url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChainResponseWire {
    pub chain: ChainLinkWire,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChainLinkWire {
    species: NamedReference,
    #[serde(default)]
    evolves_to: Vec<ChainLinkWire>,
}

impl From<ChainLinkWire> for ChainLink {
    fn from(value: ChainLinkWire) -> Self {
        Self {
            species: value.species,
            evolves_to: value.evolves_to.into_iter().map(ChainLink::from).collect(),
        }
    }
}

pub fn decode_page(raw: &serde_json::Value) -> Result<CatalogPage, DexError> {
    decode::<PageWire>(raw, "Pokemon list").map(CatalogPage::from)
}

pub fn decode_record(raw: &serde_json::Value) -> Result<Record, DexError> {
    decode::<RecordWire>(raw, "Pokemon details").map(Record::from)
}

pub fn decode_species(raw: &serde_json::Value) -> Result<Species, DexError> {
    decode::<SpeciesWire>(raw, "Pokemon species").map(Species::from)
}

pub fn decode_chain(raw: &serde_json::Value) -> Result<ChainLink, DexError> {
    decode::<ChainResponseWire>(raw, "evolution chain")
        .map(|response| ChainLink::from(response.chain))
}

fn decode<'de, T: Deserialize<'de>>(
    raw: &'de serde_json::Value,
    resource: &str,
) -> Result<T, DexError> {
    T::deserialize(raw).map_err(|err| DexError::CatalogDecode {
        resource: resource.to_string(),
        message: err.to_string(),
    })
}
