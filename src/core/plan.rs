// =============================================================================
// PLAN — Le plan relationnel compilé (filtre + jointures)
// =============================================================================
//
// Un CompiledPlan décrit, sans SQL, l'ensemble des impressions retenues :
//
//   base      : la relation des cartes (une ligne par impression)
//   joins     : relations auxiliaires jointes sur cards.id, SANS doublon
//   predicates: conjonction (AND) de prédicats, un groupe par champ
//
// La traduction en SQL est faite par backend::sql::planner. Le cœur ne
// connaît que des noms de relations, de colonnes et de vues.
//
// =============================================================================

use std::fmt;

use super::color::ColorMask;

/// Une relation du store, jointe à la base par la colonne `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Cards,
    SetMembership,
    Color,
    ColorIdentity,
}

impl Relation {
    pub fn table(&self) -> &'static str {
        match self {
            Relation::Cards => "cards",
            Relation::SetMembership => "set_card",
            Relation::Color => "card_color",
            Relation::ColorIdentity => "card_colorID",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// Une colonne qualifiée par sa relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub relation: Relation,
    pub column: &'static str,
}

impl ColumnRef {
    pub const fn new(relation: Relation, column: &'static str) -> Self {
        ColumnRef { relation, column }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation, self.column)
    }
}

pub const CARD_NAME: ColumnRef = ColumnRef::new(Relation::Cards, "name");
pub const CARD_TYPE_LINE: ColumnRef = ColumnRef::new(Relation::Cards, "type");
pub const SET_CODE: ColumnRef = ColumnRef::new(Relation::SetMembership, "set_code");

/// Un prédicat sur une ligne du plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `cards.id ∈ view` (ou ∉ si `negated`)
    InView { view: &'static str, negated: bool },
    /// `column ∈ {values}` (ou ∉), comparaison insensible à la casse
    OneOf {
        column: ColumnRef,
        values: Vec<String>,
        negated: bool,
    },
    /// Sous-chaîne dans une colonne texte (ou absence)
    Contains {
        column: ColumnRef,
        needle: String,
        negated: bool,
    },
    /// Les 6 drapeaux de la relation valent exactement ceux du masque
    ColorExact {
        relation: Relation,
        mask: ColorMask,
        negated: bool,
    },
    /// Disjonction ; jamais construite vide
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// OU des prédicats ; un seul élément n'est pas enveloppé.
    pub fn any_of(mut preds: Vec<Predicate>) -> Option<Predicate> {
        match preds.len() {
            0 => None,
            1 => preds.pop(),
            _ => Some(Predicate::AnyOf(preds)),
        }
    }
}

/// Le plan compilé d'une Query.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlan {
    pub base: Relation,
    pub joins: Vec<Relation>,
    pub predicates: Vec<Predicate>,
}

impl CompiledPlan {
    pub fn new() -> Self {
        CompiledPlan {
            base: Relation::Cards,
            joins: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Ajoute une jointure si elle n'est pas déjà présente.
    pub fn join(&mut self, relation: Relation) -> &mut Self {
        if relation != self.base && !self.joins.contains(&relation) {
            self.joins.push(relation);
        }
        self
    }

    /// Ajoute un prédicat à la conjonction.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn join_count(&self) -> usize {
        self.joins.len()
    }
}

impl Default for CompiledPlan {
    fn default() -> Self {
        CompiledPlan::new()
    }
}
