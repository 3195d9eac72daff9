// =============================================================================
// LOOKUP — Recherche d'une carte par son nom (`[[nom]]`)
// =============================================================================
//
//   [[Shock]]                 → l'impression de Shock (image, coût, texte)
//   [[Lightning Bolt|LEA]]    → l'impression de l'extension LEA
//   [[Lightning Bolt|ALL]]    → + la liste de toutes ses extensions
//
// La recherche passe par l'index plein texte des noms ; parmi les
// candidats, un nom égal (casse libre) est préféré au premier trouvé.
//
// =============================================================================

use tracing::debug;

use super::format::image_url;
use crate::backend::sql::NAME_INDEX;
use crate::backend::{CardStore, SqlStatement};
use crate::core::value::Value;
use crate::error::StoreResult;

/// Filtre d'extension d'une recherche.
#[derive(Debug, Clone, PartialEq)]
pub enum SetFilter {
    Any,
    Code(String),
    All,
}

/// Une recherche `nom[|SET]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub name: String,
    pub set: SetFilter,
}

impl LookupRequest {
    pub fn parse(text: &str) -> Self {
        let (name, set) = match text.split_once('|') {
            Some((name, set)) => (name, set.trim()),
            None => (text, ""),
        };
        let set = if set.is_empty() {
            SetFilter::Any
        } else if set.eq_ignore_ascii_case("all") {
            SetFilter::All
        } else {
            SetFilter::Code(set.to_uppercase())
        };
        LookupRequest {
            name: name.trim().to_string(),
            set,
        }
    }
}

/// Une carte trouvée.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub name: String,
    pub mana_cost: String,
    pub text: String,
    pub multiverse_id: i64,
    /// Code de l'impression, ou liste des codes pour `ALL`
    pub sets: String,
}

/// Expression MATCH : chaque mot du nom devient une phrase entre guillemets.
fn match_expression(name: &str) -> String {
    name.split_whitespace()
        .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_at(row: &[Value], i: usize) -> String {
    row.get(i).and_then(Value::as_text).unwrap_or_default()
}

/// Cherche une carte ; `Ok(None)` si aucune ne correspond.
pub fn lookup<S: CardStore + ?Sized>(store: &S, request: &LookupRequest) -> StoreResult<Option<CardSummary>> {
    let expression = match_expression(&request.name);
    if expression.is_empty() {
        return Ok(None);
    }

    let mut sql = format!(
        "SELECT cards.name, cards.mana_cost, cards.card_text, cards.multiverse_id, set_card.set_code
FROM cards
JOIN {idx} ON cards.id = {idx}.id
JOIN set_card ON cards.id = set_card.id
WHERE {idx} MATCH ? AND cards.multiverse_id != 0",
        idx = NAME_INDEX
    );
    let mut params = vec![Value::Text(expression)];
    if let SetFilter::Code(code) = &request.set {
        sql.push_str(" AND set_card.set_code = ?");
        params.push(Value::Text(code.clone()));
    }
    sql.push_str("\nORDER BY cards.rowid");

    let rows = store.fetch_rows(&SqlStatement::with_params(sql, params))?;
    debug!(name = %request.name, candidates = rows.len(), "recherche par nom");

    let picked = rows
        .iter()
        .find(|row| text_at(row.as_slice(), 0).eq_ignore_ascii_case(&request.name))
        .or_else(|| rows.first());

    let Some(row) = picked else {
        return Ok(None);
    };

    let mut summary = CardSummary {
        name: text_at(row, 0),
        mana_cost: text_at(row, 1),
        text: text_at(row, 2),
        multiverse_id: row.get(3).and_then(Value::as_integer).unwrap_or(0),
        sets: text_at(row, 4),
    };

    if request.set == SetFilter::All {
        let all = store.fetch_row(&SqlStatement::with_params(
            "SELECT group_concat(code, ', ') FROM (
  SELECT DISTINCT set_card.set_code AS code
  FROM set_card JOIN cards ON cards.id = set_card.id
  WHERE cards.name = ?
  ORDER BY code
)",
            vec![Value::Text(summary.name.clone())],
        ))?;
        summary.sets = all.map(|r| text_at(&r, 0)).unwrap_or_default();
    }

    Ok(Some(summary))
}

/// Rend les résultats : image en tête pour une seule recherche, nom sinon.
pub fn render_lookups(results: &[Option<CardSummary>], image_template: &str) -> Vec<String> {
    let multi = results.len() > 1;
    results
        .iter()
        .map(|found| match found {
            None => "Card Not Found!".to_string(),
            Some(card) => {
                let text = if card.text.is_empty() { " " } else { card.text.as_str() };
                let head = if multi {
                    card.name.clone()
                } else {
                    image_url(image_template, card.multiverse_id)
                };
                format!("{} {} ```{}``` {}", head, card.mana_cost, text, card.sets)
            }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        assert_eq!(LookupRequest::parse("Shock"), LookupRequest {
            name: "Shock".into(),
            set: SetFilter::Any,
        });
        assert_eq!(LookupRequest::parse(" Lightning Bolt | lea").set, SetFilter::Code("LEA".into()));
        assert_eq!(LookupRequest::parse("Lightning Bolt|All").set, SetFilter::All);
    }

    #[test]
    fn test_match_expression_quotes_words() {
        assert_eq!(match_expression("Circle of  Protection"), "\"Circle\" \"of\" \"Protection\"");
        assert_eq!(match_expression("Say \"hi\""), "\"Say\" \"\"\"hi\"\"\"");
        assert_eq!(match_expression("   "), "");
    }

    #[test]
    fn test_render_single_and_multi() {
        let card = CardSummary {
            name: "Shock".into(),
            mana_cost: ":rr:".into(),
            text: String::new(),
            multiverse_id: 7,
            sets: "STH".into(),
        };
        assert_eq!(
            render_lookups(&[Some(card.clone())], "img://{id}"),
            vec!["img://7 :rr: ``` ``` STH"]
        );
        assert_eq!(
            render_lookups(&[Some(card), None], "img://{id}"),
            vec!["Shock :rr: ``` ``` STH", "Card Not Found!"]
        );
    }
}
