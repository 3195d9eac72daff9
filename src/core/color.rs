// =============================================================================
// COLOR — Vecteurs de couleurs et test d'appartenance exacte
// =============================================================================
//
// Chaque carte porte deux vecteurs à 5 canaux {W, U, B, R, G} :
//   - la couleur imprimée        (table card_color)
//   - l'identité de couleur      (table card_colorID)
// plus un drapeau dérivé `colorless` ⇔ aucun canal allumé.
//
// Un terme de couleur est une chaîne de lettres de canaux. Il désigne UNE
// combinaison exacte :
//
//   "BR"  →  b=1 ∧ r=1 ∧ w=0 ∧ u=0 ∧ g=0 ∧ colorless=0
//   ""    →  w=0 ∧ u=0 ∧ b=0 ∧ r=0 ∧ g=0 ∧ colorless=1
//
// Le compilateur de requêtes (compile.rs) combine plusieurs termes en OU ;
// un terme négatif exclut exactement sa combinaison.
//
// =============================================================================

use std::fmt;

/// Un canal de couleur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Channel {
    /// Ordre WUBRG, celui des colonnes et de l'affichage.
    pub const ALL: [Channel; 5] = [
        Channel::White,
        Channel::Blue,
        Channel::Black,
        Channel::Red,
        Channel::Green,
    ];

    fn bit(&self) -> u8 {
        match self {
            Channel::White => 1 << 0,
            Channel::Blue => 1 << 1,
            Channel::Black => 1 << 2,
            Channel::Red => 1 << 3,
            Channel::Green => 1 << 4,
        }
    }

    /// Lettre du canal, aussi nom de la colonne booléenne.
    pub fn letter(&self) -> char {
        match self {
            Channel::White => 'w',
            Channel::Blue => 'u',
            Channel::Black => 'b',
            Channel::Red => 'r',
            Channel::Green => 'g',
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Channel::White => "w",
            Channel::Blue => "u",
            Channel::Black => "b",
            Channel::Red => "r",
            Channel::Green => "g",
        }
    }

    pub fn from_letter(c: char) -> Option<Channel> {
        match c.to_ascii_lowercase() {
            'w' => Some(Channel::White),
            'u' => Some(Channel::Blue),
            'b' => Some(Channel::Black),
            'r' => Some(Channel::Red),
            'g' => Some(Channel::Green),
            _ => None,
        }
    }

    /// Nom long tel qu'écrit dans l'export JSON ("White", "Blue", ...).
    pub fn from_name(name: &str) -> Option<Channel> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Some(Channel::White),
            "blue" => Some(Channel::Blue),
            "black" => Some(Channel::Black),
            "red" => Some(Channel::Red),
            "green" => Some(Channel::Green),
            _ => None,
        }
    }
}

/// Colonne du drapeau incolore dans les tables de couleur.
pub const COLORLESS_COLUMN: &str = "colorless";

/// Un vecteur de couleurs : 5 bits, un par canal.
///
/// `colorless` n'est pas stocké : il est vrai ssi le masque est vide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorMask(u8);

impl ColorMask {
    pub const COLORLESS: ColorMask = ColorMask(0);

    pub fn with(mut self, channel: Channel) -> Self {
        self.0 |= channel.bit();
        self
    }

    pub fn has(&self, channel: Channel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn is_colorless(&self) -> bool {
        self.0 == 0
    }

    /// Parse un terme de couleur.
    ///
    /// - "" → incolore
    /// - "c" / "colorless" → incolore
    /// - sinon chaque caractère doit être une lettre de canal (casse libre,
    ///   répétitions tolérées) ; tout autre caractère → `None` (terme inconnu).
    pub fn parse(term: &str) -> Option<ColorMask> {
        let term = term.trim();
        if term.eq_ignore_ascii_case("c") || term.eq_ignore_ascii_case("colorless") {
            return Some(ColorMask::COLORLESS);
        }
        term.chars().try_fold(ColorMask::COLORLESS, |mask, c| {
            Channel::from_letter(c).map(|ch| mask.with(ch))
        })
    }

    /// Construit un masque à partir de noms longs ("Black") ou de lettres ("B"),
    /// tels qu'écrits dans l'export JSON. Les valeurs inconnues sont ignorées.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ColorMask {
        names
            .iter()
            .filter_map(|n| {
                let n = n.as_ref();
                Channel::from_name(n).or_else(|| {
                    let mut chars = n.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Channel::from_letter(c),
                        _ => None,
                    }
                })
            })
            .fold(ColorMask::COLORLESS, |mask, ch| mask.with(ch))
    }

    /// Les 6 drapeaux attendus : (colonne, valeur) dans l'ordre WUBRG puis incolore.
    pub fn flags(&self) -> [(&'static str, bool); 6] {
        [
            (Channel::White.column(), self.has(Channel::White)),
            (Channel::Blue.column(), self.has(Channel::Blue)),
            (Channel::Black.column(), self.has(Channel::Black)),
            (Channel::Red.column(), self.has(Channel::Red)),
            (Channel::Green.column(), self.has(Channel::Green)),
            (COLORLESS_COLUMN, self.is_colorless()),
        ]
    }
}

impl fmt::Display for ColorMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            return write!(f, "C");
        }
        for ch in Channel::ALL {
            if self.has(ch) {
                write!(f, "{}", ch.letter().to_ascii_uppercase())?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_combination() {
        let br = ColorMask::parse("BR").unwrap();
        let flags = br.flags();
        assert_eq!(flags, [
            ("w", false), ("u", false), ("b", true),
            ("r", true), ("g", false), ("colorless", false),
        ]);
        assert_eq!(br.to_string(), "BR");
    }

    #[test]
    fn test_parse_case_and_order_insensitive() {
        assert_eq!(ColorMask::parse("rb"), ColorMask::parse("BR"));
        assert_eq!(ColorMask::parse("gGg"), ColorMask::parse("g"));
    }

    #[test]
    fn test_empty_term_is_colorless() {
        let empty = ColorMask::parse("").unwrap();
        assert!(empty.is_colorless());
        assert_eq!(empty.flags()[5], ("colorless", true));
        assert!(empty.flags()[..5].iter().all(|(_, on)| !on));
        assert_eq!(ColorMask::parse("C"), Some(ColorMask::COLORLESS));
    }

    #[test]
    fn test_unknown_letter() {
        assert_eq!(ColorMask::parse("BX"), None);
        assert_eq!(ColorMask::parse("purple"), None);
    }

    #[test]
    fn test_colorless_iff_no_channel() {
        for bits in 0u8..32 {
            let mask = Channel::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .fold(ColorMask::COLORLESS, |m, (_, ch)| m.with(*ch));
            let any_channel = mask.flags()[..5].iter().any(|(_, on)| *on);
            assert_eq!(mask.is_colorless(), !any_channel);
        }
    }

    #[test]
    fn test_from_names_and_letters() {
        let br = ColorMask::parse("BR").unwrap();
        assert_eq!(ColorMask::from_names(&["Black", "Red"]), br);
        assert_eq!(ColorMask::from_names(&["B", "r"]), br);
        assert_ne!(ColorMask::from_names(&["Black"]), br);
        assert_eq!(ColorMask::from_names(&["Purple", "Blurple"]), ColorMask::COLORLESS);
    }
}
