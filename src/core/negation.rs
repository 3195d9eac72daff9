// =============================================================================
// NEGATION — Partition des termes en positifs / négatifs
// =============================================================================
//
// Un terme préfixé par `!` est négatif ; le `!` est retiré. L'ordre relatif
// est conservé dans chaque partition. Appliqué avant la construction des
// prédicats de chaque champ.
//
//   ["BR", "!U", "G"]  →  (["BR", "G"], ["U"])
//
// =============================================================================

/// Marqueur de négation en tête de terme.
pub const NEGATION_MARK: char = '!';

/// Sépare une liste de termes en (positifs, négatifs).
///
/// Seul le premier `!` est retiré : `!!x` donne le négatif `!x`.
/// Un terme vide reste positif.
pub fn split_negatives<S: AsRef<str>>(terms: &[S]) -> (Vec<String>, Vec<String>) {
    let mut positives = Vec::new();
    let mut negatives = Vec::new();

    for term in terms {
        let term = term.as_ref();
        match term.strip_prefix(NEGATION_MARK) {
            Some(rest) => negatives.push(rest.to_string()),
            None => positives.push(term.to_string()),
        }
    }

    (positives, negatives)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_preserves_order() {
        let (pos, neg) = split_negatives(&["BR", "!U", "G", "!W"]);
        assert_eq!(pos, vec!["BR", "G"]);
        assert_eq!(neg, vec!["U", "W"]);
    }

    #[test]
    fn test_single_negative() {
        let (pos, neg) = split_negatives(&["!Gleemax"]);
        assert!(pos.is_empty());
        assert_eq!(neg, vec!["Gleemax"]);
    }

    #[test]
    fn test_empty_and_bare_mark() {
        let (pos, neg) = split_negatives(&["", "!"]);
        assert_eq!(pos, vec![""]);
        assert_eq!(neg, vec![""]);
    }

    proptest! {
        #[test]
        fn test_partition_reconstructs_terms(terms in proptest::collection::vec("!{0,2}[a-zA-Z ]{0,6}", 0..12)) {
            let (pos, neg) = split_negatives(&terms);

            let mut rebuilt: Vec<String> = pos.clone();
            rebuilt.extend(neg.iter().map(|t| format!("{}{}", NEGATION_MARK, t)));
            rebuilt.sort();

            let mut original = terms.clone();
            original.sort();
            prop_assert_eq!(rebuilt, original);

            // Aucun terme n'appartient aux deux partitions
            prop_assert_eq!(pos.len() + neg.len(), terms.len());
            for p in &pos {
                prop_assert!(!p.starts_with(NEGATION_MARK));
            }
        }
    }
}
