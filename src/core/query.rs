// =============================================================================
// QUERY — Requête structurée et demandes d'agrégation
// =============================================================================
//
// Une correspondance `#[[type:Creature,color:BR,avg:cmc]]` donne :
//
//   Query            { type → ["Creature"], color → ["BR"] }
//   AggregationRequest { verb: Avg, column: "cmc" }
//
// La Query est un mapping ordonné champ → termes bruts (éventuellement
// préfixés par `!`). L'ordre d'apparition des champs est conservé pour
// que le plan compilé soit stable d'une exécution à l'autre.
//
// =============================================================================

use indexmap::IndexMap;
use std::fmt;

/// Un champ filtrable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Color,
    ColorIdentity,
    Supertype,
    Type,
    Subtype,
    Set,
    Rarity,
    /// Champ non reconnu : conservé dans la Query, ignoré à la compilation
    Unknown(String),
}

impl Field {
    /// Reconnaît un nom de champ (casse libre, pluriels acceptés).
    pub fn parse(name: &str) -> Field {
        match name.to_ascii_lowercase().as_str() {
            "name" | "names" => Field::Name,
            "color" | "colors" => Field::Color,
            "colorid" | "colorids" => Field::ColorIdentity,
            "supertype" | "supertypes" => Field::Supertype,
            "type" | "types" => Field::Type,
            "subtype" | "subtypes" => Field::Subtype,
            "set" | "sets" | "set_code" | "set_codes" => Field::Set,
            "rarity" | "rarities" => Field::Rarity,
            _ => Field::Unknown(name.to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Color => write!(f, "color"),
            Field::ColorIdentity => write!(f, "colorID"),
            Field::Supertype => write!(f, "supertype"),
            Field::Type => write!(f, "type"),
            Field::Subtype => write!(f, "subtype"),
            Field::Set => write!(f, "set"),
            Field::Rarity => write!(f, "rarity"),
            Field::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Un verbe d'agrégation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Verb {
    /// Reconnaît un verbe utilisé comme nom de champ.
    pub fn parse(name: &str) -> Option<Verb> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(Verb::Count),
            "sum" => Some(Verb::Sum),
            "avg" | "average" => Some(Verb::Avg),
            "min" => Some(Verb::Min),
            "max" => Some(Verb::Max),
            _ => None,
        }
    }

    /// Fonction d'agrégation SQL correspondante.
    pub fn sql_function(&self) -> &'static str {
        match self {
            Verb::Count => "count",
            Verb::Sum => "sum",
            Verb::Avg => "avg",
            Verb::Min => "min",
            Verb::Max => "max",
        }
    }

    /// Libellé affiché en tête de ligne de résultat.
    pub fn label(&self) -> &'static str {
        match self {
            Verb::Count => "Count",
            Verb::Sum => "Sum",
            Verb::Avg => "Average",
            Verb::Min => "Minimum",
            Verb::Max => "Maximum",
        }
    }
}

/// Une demande d'agrégation : verbe + colonne cible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRequest {
    pub verb: Verb,
    pub column: String,
}

impl AggregationRequest {
    pub fn new(verb: Verb, column: &str) -> Self {
        AggregationRequest {
            verb,
            column: column.to_string(),
        }
    }
}

impl Default for AggregationRequest {
    /// `{count, id}` : ce qui est exécuté quand aucun verbe n'est donné.
    fn default() -> Self {
        AggregationRequest::new(Verb::Count, "id")
    }
}

/// La partie filtre d'une correspondance : champ → termes bruts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub fields: IndexMap<Field, Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    /// Ajoute des termes à un champ ; un champ répété accumule ses termes.
    pub fn add_terms<I, S>(&mut self, field: Field, terms: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .entry(field)
            .or_default()
            .extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn terms(&self, field: &Field) -> Option<&[String]> {
        self.fields.get(field).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Résultat du parsing d'une correspondance.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatch {
    pub query: Query,
    /// Jamais vide : `{count, id}` par défaut
    pub requests: Vec<AggregationRequest>,
    /// Clauses abandonnées (sans `:`), gardées pour le mode strict
    pub skipped: Vec<String>,
}
