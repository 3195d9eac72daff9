// =============================================================================
// CATEGORY — Résolution des termes catégoriels vers des vues canoniques
// =============================================================================
//
// Trois axes de classification ont une vue précalculée par valeur :
//   type       → creatures, artifacts, lands, ...
//   supertype  → legendaries, basics, snows, ...
//   rarity     → commons, rares, mythics, ...
//
// Deux tables statiques :
//   1. forme de surface normalisée → CategoryTag   (SYNONYMS)
//   2. CategoryTag → nom de vue + valeur stockée   (CategoryTag::view_name)
//
// Ajouter un synonyme = ajouter une ligne à SYNONYMS. Les vues SQL sont
// générées à partir des mêmes tags (backend::sql::view_statements), donc
// le résolveur et le store ne peuvent pas diverger.
//
// Terme inconnu → None : aucun prédicat, pas d'erreur.
//
// =============================================================================

use std::fmt;

/// Un axe de classification d'une carte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Type,
    Supertype,
    Rarity,
}

impl Axis {
    /// Table d'appartenance qui alimente les vues de cet axe.
    pub fn membership_table(&self) -> &'static str {
        match self {
            Axis::Type => "card_type",
            Axis::Supertype => "card_supertype",
            Axis::Rarity => "card_rarity",
        }
    }

    /// Colonne de la table d'appartenance.
    pub fn membership_column(&self) -> &'static str {
        match self {
            Axis::Type => "type",
            Axis::Supertype => "supertype",
            Axis::Rarity => "rarity",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Type => write!(f, "type"),
            Axis::Supertype => write!(f, "supertype"),
            Axis::Rarity => write!(f, "rarity"),
        }
    }
}

/// Une valeur canonique de classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    // Types
    Artifact,
    Creature,
    Enchantment,
    Instant,
    Land,
    Planeswalker,
    Sorcery,
    Tribal,
    // Supertypes
    Basic,
    Legendary,
    Ongoing,
    Snow,
    World,
    // Raretés
    Common,
    Uncommon,
    Rare,
    Mythic,
    Special,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 18] = [
        CategoryTag::Artifact,
        CategoryTag::Creature,
        CategoryTag::Enchantment,
        CategoryTag::Instant,
        CategoryTag::Land,
        CategoryTag::Planeswalker,
        CategoryTag::Sorcery,
        CategoryTag::Tribal,
        CategoryTag::Basic,
        CategoryTag::Legendary,
        CategoryTag::Ongoing,
        CategoryTag::Snow,
        CategoryTag::World,
        CategoryTag::Common,
        CategoryTag::Uncommon,
        CategoryTag::Rare,
        CategoryTag::Mythic,
        CategoryTag::Special,
    ];

    pub fn axis(&self) -> Axis {
        use CategoryTag::*;
        match self {
            Artifact | Creature | Enchantment | Instant | Land | Planeswalker | Sorcery
            | Tribal => Axis::Type,
            Basic | Legendary | Ongoing | Snow | World => Axis::Supertype,
            Common | Uncommon | Rare | Mythic | Special => Axis::Rarity,
        }
    }

    /// Nom de la vue canonique (ensemble des ids de cartes portant ce tag).
    pub fn view_name(&self) -> &'static str {
        use CategoryTag::*;
        match self {
            Artifact => "artifacts",
            Creature => "creatures",
            Enchantment => "enchantments",
            Instant => "instants",
            Land => "lands",
            Planeswalker => "planeswalkers",
            Sorcery => "sorceries",
            Tribal => "tribals",
            Basic => "basics",
            Legendary => "legendaries",
            Ongoing => "ongoings",
            Snow => "snows",
            World => "worlds",
            Common => "commons",
            Uncommon => "uncommons",
            Rare => "rares",
            Mythic => "mythics",
            Special => "specials",
        }
    }

    /// Valeur telle qu'écrite par l'ingestion dans la table d'appartenance.
    pub fn stored_value(&self) -> &'static str {
        use CategoryTag::*;
        match self {
            Artifact => "Artifact",
            Creature => "Creature",
            Enchantment => "Enchantment",
            Instant => "Instant",
            Land => "Land",
            Planeswalker => "Planeswalker",
            Sorcery => "Sorcery",
            Tribal => "Tribal",
            Basic => "Basic",
            Legendary => "Legendary",
            Ongoing => "Ongoing",
            Snow => "Snow",
            World => "World",
            Common => "Common",
            Uncommon => "Uncommon",
            Rare => "Rare",
            Mythic => "Mythic Rare",
            Special => "Special",
        }
    }
}

/// Formes de surface (déjà en minuscules) → tag canonique.
///
/// Une même forme peut apparaître sur deux axes différents ("c" n'existe
/// qu'en rareté ; la recherche filtre toujours par axe).
static SYNONYMS: &[(&str, CategoryTag)] = &[
    // ── type ──
    ("artifact", CategoryTag::Artifact),
    ("artifacts", CategoryTag::Artifact),
    ("creature", CategoryTag::Creature),
    ("creatures", CategoryTag::Creature),
    ("enchantment", CategoryTag::Enchantment),
    ("enchantments", CategoryTag::Enchantment),
    ("instant", CategoryTag::Instant),
    ("instants", CategoryTag::Instant),
    ("land", CategoryTag::Land),
    ("lands", CategoryTag::Land),
    ("planeswalker", CategoryTag::Planeswalker),
    ("planeswalkers", CategoryTag::Planeswalker),
    ("pw", CategoryTag::Planeswalker),
    ("sorcery", CategoryTag::Sorcery),
    ("sorceries", CategoryTag::Sorcery),
    ("tribal", CategoryTag::Tribal),
    ("tribals", CategoryTag::Tribal),
    // ── supertype ──
    ("basic", CategoryTag::Basic),
    ("basics", CategoryTag::Basic),
    ("legendary", CategoryTag::Legendary),
    ("legendaries", CategoryTag::Legendary),
    ("legend", CategoryTag::Legendary),
    ("legends", CategoryTag::Legendary),
    ("ongoing", CategoryTag::Ongoing),
    ("ongoings", CategoryTag::Ongoing),
    ("snow", CategoryTag::Snow),
    ("snows", CategoryTag::Snow),
    ("world", CategoryTag::World),
    ("worlds", CategoryTag::World),
    // ── rarity ──
    ("common", CategoryTag::Common),
    ("commons", CategoryTag::Common),
    ("c", CategoryTag::Common),
    ("uncommon", CategoryTag::Uncommon),
    ("uncommons", CategoryTag::Uncommon),
    ("u", CategoryTag::Uncommon),
    ("uc", CategoryTag::Uncommon),
    ("rare", CategoryTag::Rare),
    ("rares", CategoryTag::Rare),
    ("r", CategoryTag::Rare),
    ("mythic", CategoryTag::Mythic),
    ("mythics", CategoryTag::Mythic),
    ("mythic rare", CategoryTag::Mythic),
    ("mythic rares", CategoryTag::Mythic),
    ("mr", CategoryTag::Mythic),
    ("m", CategoryTag::Mythic),
    ("special", CategoryTag::Special),
    ("specials", CategoryTag::Special),
    ("s", CategoryTag::Special),
];

/// Normalise une forme de surface : minuscules, espaces internes réduits.
fn normalize(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Résout un terme sur un axe donné. `None` = terme inconnu sur cet axe.
pub fn resolve(axis: Axis, term: &str) -> Option<CategoryTag> {
    let key = normalize(term);
    SYNONYMS
        .iter()
        .find(|(surface, tag)| *surface == key && tag.axis() == axis)
        .map(|(_, tag)| *tag)
}

/// Les formes de surface déclarées pour un axe (utilisé par les diagnostics).
pub fn synonyms(axis: Axis) -> impl Iterator<Item = (&'static str, CategoryTag)> {
    SYNONYMS
        .iter()
        .copied()
        .filter(move |(_, tag)| tag.axis() == axis)
}
