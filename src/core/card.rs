// =============================================================================
// CARD — Le modèle de données normalisé du corpus
// =============================================================================
//
// Une Card est UNE impression (printing) : la même carte rééditée dans
// trois extensions donne trois Card de même nom. Le regroupement par nom
// se fait au moment de l'agrégation, pas ici.
//
// Ces structures sont écrites une fois par l'ingestion puis immuables
// pendant les requêtes.
//
// =============================================================================

use super::color::ColorMask;

/// Une impression de carte.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub mana_cost: String,
    pub cmc: f64,
    /// Ligne de type complète ("Legendary Creature — Goblin Shaman")
    pub type_line: String,
    pub text: String,
    pub flavor: String,
    pub artist: String,
    pub number: String,
    pub power: Option<i64>,
    pub toughness: Option<i64>,
    pub loyalty: Option<i64>,
    /// Référence image externe ; 0 = placeholder / promo
    pub multiverse_id: i64,
    pub release_date: String,
    pub colors: ColorMask,
    pub color_identity: ColorMask,
    pub supertypes: Vec<String>,
    pub types: Vec<String>,
    pub rarities: Vec<String>,
}

impl Card {
    pub fn new(id: &str, name: &str) -> Self {
        Card {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn cmc(mut self, cmc: f64) -> Self {
        self.cmc = cmc;
        self
    }

    pub fn type_line(mut self, line: &str) -> Self {
        self.type_line = line.to_string();
        self
    }

    pub fn colors(mut self, colors: ColorMask) -> Self {
        self.colors = colors;
        self
    }

    pub fn color_identity(mut self, identity: ColorMask) -> Self {
        self.color_identity = identity;
        self
    }

    pub fn supertype(mut self, supertype: &str) -> Self {
        self.supertypes.push(supertype.to_string());
        self
    }

    pub fn card_type(mut self, card_type: &str) -> Self {
        self.types.push(card_type.to_string());
        self
    }

    pub fn rarity(mut self, rarity: &str) -> Self {
        self.rarities.push(rarity.to_string());
        self
    }

    pub fn multiverse_id(mut self, id: i64) -> Self {
        self.multiverse_id = id;
        self
    }

    pub fn power_toughness(mut self, power: i64, toughness: i64) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    pub fn mana_cost(mut self, cost: &str) -> Self {
        self.mana_cost = cost.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

/// Une extension (set).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardSet {
    pub code: String,
    pub name: String,
    pub release_date: String,
    pub set_type: String,
    pub block: String,
}

impl CardSet {
    pub fn new(code: &str, name: &str) -> Self {
        CardSet {
            code: code.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }
}
