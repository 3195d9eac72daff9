// =============================================================================
// DIAGNOSE — Ce que le mode tolérant ignore silencieusement
// =============================================================================
//
// Par défaut le moteur est tolérant :
//   - une clause sans ':' est abandonnée ;
//   - un champ inconnu n'ajoute rien au plan ;
//   - un terme catégoriel ou de couleur inconnu n'ajoute aucun prédicat.
//
// Ce module liste ces abandons. Il ne change jamais le plan : le moteur
// en mode strict se contente d'afficher un avertissement par diagnostic
// avant le résultat.
//
// =============================================================================

use std::fmt;

use super::category::{self, Axis};
use super::color::ColorMask;
use super::negation::split_negatives;
use super::query::{Field, ParsedMatch};

/// Un élément de la requête ignoré par la compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    SkippedClause(String),
    UnknownField(String),
    UnknownTerm { field: Field, term: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SkippedClause(clause) => {
                write!(f, "Warning: clause '{}' has no ':' and was ignored", clause)
            }
            Diagnostic::UnknownField(name) => {
                write!(f, "Warning: unknown field '{}' was ignored", name)
            }
            Diagnostic::UnknownTerm { field, term } => {
                write!(f, "Warning: unknown {} '{}' was ignored", field, term)
            }
        }
    }
}

/// Liste les clauses, champs et termes qui n'ont pas contribué au plan.
pub fn diagnose(parsed: &ParsedMatch) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = parsed
        .skipped
        .iter()
        .map(|clause| Diagnostic::SkippedClause(clause.clone()))
        .collect();

    for (field, terms) in &parsed.query.fields {
        let (positives, negatives) = split_negatives(terms);
        let all = positives.iter().chain(negatives.iter());

        let known: fn(&str) -> bool = match field {
            Field::Unknown(name) => {
                diagnostics.push(Diagnostic::UnknownField(name.clone()));
                continue;
            }
            Field::Type => |t| category::resolve(Axis::Type, t).is_some(),
            Field::Supertype => |t| category::resolve(Axis::Supertype, t).is_some(),
            Field::Rarity => |t| category::resolve(Axis::Rarity, t).is_some(),
            Field::Color | Field::ColorIdentity => |t| ColorMask::parse(t).is_some(),
            Field::Name | Field::Set | Field::Subtype => continue,
        };

        for term in all.filter(|t| !known(t.as_str())) {
            diagnostics.push(Diagnostic::UnknownTerm {
                field: field.clone(),
                term: term.clone(),
            });
        }
    }

    diagnostics
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_match;

    #[test]
    fn test_clean_query_has_no_diagnostics() {
        let parsed = parse_match("type:Creature,color:BR|!G,rarity:MR,name:Shock,avg:cmc");
        assert!(diagnose(&parsed).is_empty());
    }

    #[test]
    fn test_reports_everything_ignored() {
        let parsed = parse_match("type:Goblin|Creature,oops,color:!purple,flavor:x");
        let diags = diagnose(&parsed);
        assert_eq!(diags, vec![
            Diagnostic::SkippedClause("oops".into()),
            Diagnostic::UnknownTerm { field: Field::Type, term: "Goblin".into() },
            Diagnostic::UnknownTerm { field: Field::Color, term: "purple".into() },
            Diagnostic::UnknownField("flavor".into()),
        ]);
        assert_eq!(
            diags[1].to_string(),
            "Warning: unknown type 'Goblin' was ignored"
        );
    }
}
