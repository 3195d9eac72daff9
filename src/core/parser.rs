// =============================================================================
// PARSER — Texte d'une correspondance → Query + demandes d'agrégation
// =============================================================================
//
// Grammaire (informelle) :
//
//   match  := clause (',' clause)*
//   clause := field ':' value ('|' value)*
//   value  := ['!'] term
//
// Règles :
//   - une clause est coupée au PREMIER ':' ;
//   - une clause sans ':' est abandonnée (les suivantes sont lues) ;
//   - une clause vide termine la lecture de la correspondance ;
//   - un champ qui est un verbe (count, sum, avg, min, max) produit une
//     AggregationRequest par valeur, la valeur nommant la colonne ;
//   - sans verbe, la demande par défaut est {count, id}.
//
// Le parsing ne peut pas échouer : au pire il rend une Query vide.
//
// =============================================================================

use tracing::debug;

use super::query::{AggregationRequest, Field, ParsedMatch, Query, Verb};

pub const CLAUSE_SEPARATOR: char = ',';
pub const FIELD_SEPARATOR: char = ':';
pub const VALUE_SEPARATOR: char = '|';

/// Parse l'intérieur d'une correspondance.
pub fn parse_match(text: &str) -> ParsedMatch {
    let mut query = Query::new();
    let mut requests = Vec::new();
    let mut skipped = Vec::new();

    for clause in text.split(CLAUSE_SEPARATOR) {
        if clause.trim().is_empty() {
            break;
        }

        let Some((field, values)) = clause.split_once(FIELD_SEPARATOR) else {
            debug!(clause, "clause sans ':' abandonnée");
            skipped.push(clause.trim().to_string());
            continue;
        };

        let field = field.trim();
        let values = values.split(VALUE_SEPARATOR).map(str::trim);

        match Verb::parse(field) {
            Some(verb) => {
                requests.extend(
                    values
                        .filter(|column| !column.is_empty())
                        .map(|column| AggregationRequest::new(verb, column)),
                );
            }
            None => {
                query.add_terms(Field::parse(field), values);
            }
        }
    }

    if requests.is_empty() {
        requests.push(AggregationRequest::default());
    }

    ParsedMatch {
        query,
        requests,
        skipped,
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_and_default_verb() {
        let parsed = parse_match("type:Creature,color:BR");
        assert_eq!(parsed.query.terms(&Field::Type).unwrap(), &["Creature".to_string()]);
        assert_eq!(parsed.query.terms(&Field::Color).unwrap(), &["BR".to_string()]);
        assert_eq!(parsed.requests, vec![AggregationRequest::default()]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_values_are_trimmed() {
        let parsed = parse_match(" name : Shock |  !Lightning Bolt ");
        assert_eq!(
            parsed.query.terms(&Field::Name).unwrap(),
            &["Shock".to_string(), "!Lightning Bolt".to_string()]
        );
    }

    #[test]
    fn test_verb_per_value() {
        let parsed = parse_match("type:Creature,avg:cmc|power,max:toughness");
        assert_eq!(parsed.requests, vec![
            AggregationRequest::new(Verb::Avg, "cmc"),
            AggregationRequest::new(Verb::Avg, "power"),
            AggregationRequest::new(Verb::Max, "toughness"),
        ]);
        // Les verbes ne sont pas des filtres
        assert_eq!(parsed.query.fields.len(), 1);
    }

    #[test]
    fn test_malformed_clause_is_skipped() {
        let parsed = parse_match("type:Land,oops,rarity:!Common");
        assert_eq!(parsed.skipped, vec!["oops".to_string()]);
        assert!(parsed.query.terms(&Field::Type).is_some());
        assert!(parsed.query.terms(&Field::Rarity).is_some());
    }

    #[test]
    fn test_empty_clause_stops_scanning() {
        let parsed = parse_match("type:Land,,rarity:Rare");
        assert!(parsed.query.terms(&Field::Type).is_some());
        assert!(parsed.query.terms(&Field::Rarity).is_none());
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let parsed = parse_match("name:Circle of Protection: Red");
        assert_eq!(
            parsed.query.terms(&Field::Name).unwrap(),
            &["Circle of Protection: Red".to_string()]
        );
    }

    #[test]
    fn test_empty_color_value_is_kept() {
        // "color:" demande les cartes incolores
        let parsed = parse_match("color:");
        assert_eq!(parsed.query.terms(&Field::Color).unwrap(), &["".to_string()]);
    }

    #[test]
    fn test_unknown_field_is_kept_in_query() {
        let parsed = parse_match("flavor:goblins");
        assert!(parsed.query.terms(&Field::Unknown("flavor".into())).is_some());
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_match("");
        assert!(parsed.query.is_empty());
        assert_eq!(parsed.requests, vec![AggregationRequest::default()]);
    }
}
