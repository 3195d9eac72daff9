// =============================================================================
// COMPILE — Query → CompiledPlan
// =============================================================================
//
// Pour chaque champ présent, dans l'ordre d'apparition :
//
//   1. séparer positifs / négatifs (negation.rs)
//   2. joindre la relation auxiliaire nécessaire (au plus une fois)
//   3. ajouter les prédicats du champ
//
// Combinaison :
//   - entre champs               : AND
//   - positifs d'un même champ   : OR  (au moins un)
//   - négatifs d'un même champ   : AND (tous exclus)
//
//   champ        relation jointe   prédicat
//   ───────────  ────────────────  ─────────────────────────────────────
//   name         —                 cards.name ∈ / ∉ {…}  (casse libre)
//   set          set_card          set_code ∈ / ∉ {…}    (MAJUSCULES)
//   color        card_color        vecteur exact (color.rs)
//   colorID      card_colorID      vecteur exact (color.rs)
//   type         —                 cards.id ∈ / ∉ vue canonique
//   supertype    —                 cards.id ∈ / ∉ vue canonique
//   rarity       —                 cards.id ∈ / ∉ vue canonique
//   subtype      —                 sous-chaîne de la ligne de type
//   (inconnu)    —                 rien
//
// Un terme inconnu (catégorie ou couleur) ne produit aucun prédicat.
//
// =============================================================================

use tracing::debug;

use super::category::{self, Axis};
use super::color::ColorMask;
use super::negation::split_negatives;
use super::plan::{
    ColumnRef, CompiledPlan, Predicate, Relation, CARD_NAME, CARD_TYPE_LINE, SET_CODE,
};
use super::query::{Field, Query};

/// Compile une Query en plan relationnel filtré.
pub fn compile(query: &Query) -> CompiledPlan {
    let mut plan = CompiledPlan::new();

    for (field, terms) in &query.fields {
        let (positives, negatives) = split_negatives(terms);

        match field {
            Field::Name => {
                compile_one_of(&mut plan, CARD_NAME, positives, negatives);
            }
            Field::Set => {
                plan.join(Relation::SetMembership);
                let upper = |terms: Vec<String>| -> Vec<String> {
                    terms.iter().map(|t| t.to_uppercase()).collect()
                };
                compile_one_of(&mut plan, SET_CODE, upper(positives), upper(negatives));
            }
            Field::Color => {
                compile_colors(&mut plan, Relation::Color, &positives, &negatives);
            }
            Field::ColorIdentity => {
                compile_colors(&mut plan, Relation::ColorIdentity, &positives, &negatives);
            }
            Field::Type => compile_category(&mut plan, Axis::Type, &positives, &negatives),
            Field::Supertype => {
                compile_category(&mut plan, Axis::Supertype, &positives, &negatives)
            }
            Field::Rarity => compile_category(&mut plan, Axis::Rarity, &positives, &negatives),
            Field::Subtype => compile_subtypes(&mut plan, &positives, &negatives),
            Field::Unknown(name) => {
                debug!(field = %name, "champ inconnu ignoré");
            }
        }
    }

    plan
}

/// Égalité / inégalité directe sur une colonne texte.
fn compile_one_of(
    plan: &mut CompiledPlan,
    column: ColumnRef,
    positives: Vec<String>,
    negatives: Vec<String>,
) {
    if !positives.is_empty() {
        plan.filter(Predicate::OneOf {
            column,
            values: positives,
            negated: false,
        });
    }
    if !negatives.is_empty() {
        plan.filter(Predicate::OneOf {
            column,
            values: negatives,
            negated: true,
        });
    }
}

/// Un terme de couleur = une combinaison exacte.
///
/// Positifs : OU des combinaisons. Négatifs : chaque combinaison exacte
/// est exclue (une carte BR n'est PAS exclue par `!B`).
fn compile_colors(
    plan: &mut CompiledPlan,
    relation: Relation,
    positives: &[String],
    negatives: &[String],
) {
    let exact = |terms: &[String], negated: bool| -> Vec<Predicate> {
        terms
            .iter()
            .filter_map(|term| {
                let mask = ColorMask::parse(term);
                if mask.is_none() {
                    debug!(term = %term, "terme de couleur inconnu ignoré");
                }
                mask
            })
            .map(|mask| Predicate::ColorExact {
                relation,
                mask,
                negated,
            })
            .collect()
    };

    let included = Predicate::any_of(exact(positives, false));
    let excluded = exact(negatives, true);

    if included.is_none() && excluded.is_empty() {
        return;
    }

    plan.join(relation);
    if let Some(pred) = included {
        plan.filter(pred);
    }
    for pred in excluded {
        plan.filter(pred);
    }
}

/// Appartenance à une vue canonique.
fn compile_category(plan: &mut CompiledPlan, axis: Axis, positives: &[String], negatives: &[String]) {
    let views = |terms: &[String], negated: bool| -> Vec<Predicate> {
        terms
            .iter()
            .filter_map(|term| {
                let tag = category::resolve(axis, term);
                if tag.is_none() {
                    debug!(%axis, term = %term, "terme catégoriel inconnu ignoré");
                }
                tag
            })
            .map(|tag| Predicate::InView {
                view: tag.view_name(),
                negated,
            })
            .collect()
    };

    if let Some(pred) = Predicate::any_of(views(positives, false)) {
        plan.filter(pred);
    }
    for pred in views(negatives, true) {
        plan.filter(pred);
    }
}

/// Pas de vue pour les sous-types : recherche dans la ligne de type.
fn compile_subtypes(plan: &mut CompiledPlan, positives: &[String], negatives: &[String]) {
    let contains = |terms: &[String], negated: bool| -> Vec<Predicate> {
        terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|needle| Predicate::Contains {
                column: CARD_TYPE_LINE,
                needle: needle.clone(),
                negated,
            })
            .collect()
    };

    if let Some(pred) = Predicate::any_of(contains(positives, false)) {
        plan.filter(pred);
    }
    for pred in contains(negatives, true) {
        plan.filter(pred);
    }
}
