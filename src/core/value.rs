// =============================================================================
// VALUE — Les valeurs scalaires échangées avec le store
// =============================================================================
//
// Le moteur ne connaît pas le schéma physique : il envoie des paramètres
// au store et reçoit des lignes de valeurs. Une Value est une cellule.
//
// Les quatre variantes correspondent aux classes de stockage SQLite
// utiles ici (pas de BLOB : rien dans le corpus n'en produit).
//
// =============================================================================

use std::fmt;

/// Une cellule : paramètre lié ou colonne d'une ligne résultat.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            // Six décimales, comme les moyennes affichées dans le chat
            Value::Real(r) => write!(f, "{:.6}", r),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Lecture numérique entière (les booléens SQLite sont des entiers).
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) => Some(*r as i64),
            _ => None,
        }
    }

    /// Lecture textuelle ; un entier est rendu en décimal.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(r) => Some(r.to_string()),
            Value::Null => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
