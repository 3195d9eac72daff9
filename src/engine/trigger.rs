// =============================================================================
// TRIGGER — Repérage des correspondances dans un message de chat
// =============================================================================
//
//   "combien ? #[[type:Creature]] et #[[type:Land]]"
//        → ["type:Creature", "type:Land"]          (statistiques)
//
//   "[[Shock]] ou [[Lightning Bolt|LEA]]"
//        → ["Shock", "Lightning Bolt|LEA"]         (recherche par nom)
//
// Une ouverture sans fermeture arrête la lecture du message.
// Une ouverture de recherche `[[` n'est retenue qu'en début de message ou
// après un blanc, ce qui écarte les `#[[` des statistiques.
//
// =============================================================================

pub const STATS_OPEN: &str = "#[[";
pub const LOOKUP_OPEN: &str = "[[";
pub const CLOSE: &str = "]]";

/// Intérieurs des spans `#[[ ... ]]`, dans l'ordre du message.
pub fn extract_stats_matches(message: &str) -> Vec<&str> {
    extract(message, STATS_OPEN, |_, _| true)
}

/// Intérieurs des spans `[[ ... ]]` précédés d'un blanc (ou en tête).
pub fn extract_lookup_matches(message: &str) -> Vec<&str> {
    extract(message, LOOKUP_OPEN, |message, open| {
        message[..open]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
    })
}

fn extract<'m>(message: &'m str, opener: &str, accept: impl Fn(&str, usize) -> bool) -> Vec<&'m str> {
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(rel) = message[pos..].find(opener) {
        let open = pos + rel;
        let start = open + opener.len();
        let Some(len) = message[start..].find(CLOSE) else {
            break;
        };
        let end = start + len;
        if accept(message, open) {
            matches.push(&message[start..end]);
        }
        pos = end + CLOSE.len();
    }

    matches
}
