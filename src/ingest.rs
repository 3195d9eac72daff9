// =============================================================================
// INGEST — Export JSON des extensions → tables normalisées
// =============================================================================
//
// Phase hors ligne, jamais concurrente des requêtes :
//
//   AllSets.json ──load_sets──→ IndexMap<code, SetRecord>
//                 ──import────→ cards, sets, set_card, card_color,
//                               card_colorID, card_supertype, card_type,
//                               card_rarity, card_names
//
// Tout est écrit dans UNE transaction : un export invalide en cours de
// route laisse la base précédente intacte. Les extensions promo sont
// ignorées.
//
// Normalisations :
//   - rareté : chaîne ou liste ;
//   - coût de mana : symboles `{W}` réécrits en emoji de chat `:ww:` ;
//   - force / endurance non entières (`*`, `1+*`) → NULL ;
//   - couleurs : noms longs ("Red") ou lettres ("R") → ColorMask.
//
// =============================================================================

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::backend::sqlite::SqliteStore;
use crate::core::card::{Card, CardSet};
use crate::core::color::ColorMask;
use crate::error::IngestError;

/// Type d'extension ignoré à l'import.
pub const PROMO_SET_TYPE: &str = "promo";

/// Une extension telle qu'elle apparaît dans l'export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default, rename = "type")]
    pub set_type: String,
    #[serde(default)]
    pub block: String,
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}

/// Une impression telle qu'elle apparaît dans l'export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default, rename = "type")]
    pub type_line: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub number: String,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub power: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub toughness: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub loyalty: Option<i64>,
    #[serde(default, rename = "multiverseid", deserialize_with = "lenient_integer")]
    pub multiverse_id: Option<i64>,
    #[serde(default)]
    pub release_date: String,
}

/// Rareté : `"Rare"` ou `["Common", "Special"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Rarity {
    One(String),
    Many(Vec<String>),
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Many(Vec::new())
    }
}

impl Rarity {
    pub fn values(&self) -> Vec<String> {
        match self {
            Rarity::One(r) => vec![r.clone()],
            Rarity::Many(rs) => rs.clone(),
        }
    }
}

/// Nombre ou chaîne → entier ; tout le reste (`*`, `1+*`, `2.5`) → None.
fn lenient_integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Le numéro de collection est parfois un nombre.
fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Symboles de mana → emoji du chat.
static COST_SYMBOLS: &[(&str, &str)] = &[
    ("{W}", ":ww:"), ("{U}", ":uu:"), ("{B}", ":bb:"), ("{R}", ":rr:"), ("{G}", ":gg:"),
    ("{X}", ":xx:"),
    ("{1}", ":1:"), ("{2}", ":2:"), ("{3}", ":3:"), ("{4}", ":4:"), ("{5}", ":5:"),
    ("{6}", ":6:"), ("{7}", ":7:"), ("{8}", ":8:"), ("{9}", ":9:"), ("{10}", ":10:"),
    ("{11}", ":11:"), ("{12}", ":12:"), ("{13}", ":13:"), ("{14}", ":14:"), ("{15}", ":15:"),
    ("{20}", ":20:"),
    ("{2w}", ":2w:"), ("{2u}", ":2u:"), ("{2b}", ":2b:"), ("{2r}", ":2r:"), ("{2g}", ":2g:"),
    ("{W/P}", ":wp:"), ("{U/P}", ":up:"), ("{B/P}", ":bp:"), ("{R/P}", ":rp:"), ("{G/P}", ":gp:"),
    ("{W/U}", ":wu:"), ("{W/B}", ":wb:"), ("{U/B}", ":ub:"), ("{U/R}", ":ur:"), ("{B/R}", ":br:"),
    ("{B/G}", ":bg:"), ("{R/G}", ":rg:"), ("{R/W}", ":rw:"), ("{G/W}", ":gw:"), ("{G/U}", ":gu:"),
];

/// Réécrit un coût de mana ; les symboles inconnus restent tels quels.
pub fn format_cost(cost: &str) -> String {
    let mut out = String::with_capacity(cost.len());
    let mut rest = cost;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let symbol = &tail[..=close];
        match COST_SYMBOLS.iter().find(|(from, _)| *from == symbol) {
            Some((_, emoji)) => out.push_str(emoji),
            None => out.push_str(symbol),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

impl SetRecord {
    pub fn is_promo(&self) -> bool {
        self.set_type == PROMO_SET_TYPE
    }

    fn to_card_set(&self) -> CardSet {
        CardSet {
            code: self.code.clone(),
            name: self.name.clone(),
            release_date: self.release_date.clone(),
            set_type: self.set_type.clone(),
            block: self.block.clone(),
        }
    }
}

impl CardRecord {
    /// La Card normalisée ; la date de sortie par défaut est celle de l'extension.
    pub fn to_card(&self, set_release_date: &str) -> Card {
        let release_date = if self.release_date.is_empty() {
            set_release_date
        } else {
            &self.release_date
        };
        Card {
            id: self.id.clone(),
            name: self.name.clone(),
            mana_cost: format_cost(&self.mana_cost),
            cmc: self.cmc,
            type_line: self.type_line.clone(),
            text: self.text.clone(),
            flavor: self.flavor.clone(),
            artist: self.artist.clone(),
            number: self.number.clone(),
            power: self.power,
            toughness: self.toughness,
            loyalty: self.loyalty,
            multiverse_id: self.multiverse_id.unwrap_or(0),
            release_date: release_date.to_string(),
            colors: ColorMask::from_names(&self.colors),
            color_identity: ColorMask::from_names(&self.color_identity),
            supertypes: self.supertypes.clone(),
            types: self.types.clone(),
            rarities: self.rarity.values(),
        }
    }
}

/// Bilan d'un import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub sets: usize,
    pub skipped_sets: usize,
    pub printings: usize,
}

/// Lit un export `{code: set}`, dans l'ordre du fichier.
pub fn load_sets(path: &Path) -> Result<IndexMap<String, SetRecord>, IngestError> {
    let body = fs::read_to_string(path)?;
    parse_sets(&body)
}

pub fn parse_sets(body: &str) -> Result<IndexMap<String, SetRecord>, IngestError> {
    Ok(serde_json::from_str(body)?)
}

/// Remplace le corpus du store par celui de l'export.
pub fn import(
    store: &mut SqliteStore,
    sets: &IndexMap<String, SetRecord>,
) -> Result<ImportStats, IngestError> {
    store.migrate()?;

    store.write(|w| {
        w.clear()?;
        let mut stats = ImportStats::default();

        for set in sets.values() {
            if set.is_promo() {
                debug!(set = %set.code, "extension promo ignorée");
                stats.skipped_sets += 1;
                continue;
            }

            w.insert_set(&set.to_card_set())?;
            for record in &set.cards {
                w.insert_printing(&set.code, &record.to_card(&set.release_date))?;
            }
            info!(set = %set.code, name = %set.name, cards = set.cards.len(), "extension importée");

            stats.sets += 1;
            stats.printings += set.cards.len();
        }

        w.rebuild_name_index()?;
        Ok(stats)
    })
}
