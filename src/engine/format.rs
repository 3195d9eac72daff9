// =============================================================================
// FORMAT — Rendu texte des résultats
// =============================================================================
//
//   Count id: 12
//   Average cmc: 2.500000
//   Minimum cmc: Forest http://gatherer.../Image.ashx?multiverseid=289&type=card
//   Sum power: not found
//   Average name: failed (column 'name' is not numeric)
//
// Une ligne par demande, dans l'ordre des demandes.
//
// =============================================================================

use super::aggregate::Outcome;

/// Substitution dans le gabarit d'URL : `{id}` → référence image.
pub fn image_url(template: &str, multiverse_id: i64) -> String {
    template.replace("{id}", &multiverse_id.to_string())
}

/// Une ligne de résultat.
pub fn render_outcome(outcome: &Outcome, image_template: &str) -> String {
    let label = outcome.request.verb.label();
    let column = &outcome.request.column;

    match &outcome.result {
        Err(e) => format!("{} {}: failed ({})", label, column, e),
        Ok(result) if result.is_not_found() => format!("{} {}: not found", label, column),
        Ok(result) => match &result.card {
            Some(card) => format!(
                "{} {}: {} {}",
                label,
                column,
                card.name,
                image_url(image_template, card.multiverse_id)
            ),
            None => format!("{} {}: {}", label, column, result.value),
        },
    }
}
