// =============================================================================
// BACKEND — Le contrat du store relationnel
// =============================================================================
//
// Le moteur n'émet que des lectures : une requête SQL paramétrée, et en
// retour une ligne ou une suite de lignes de Value. Il ne connaît du
// schéma physique que les noms de relations, colonnes et vues.
//
//   sql/       → DDL du corpus + traduction CompiledPlan → SQL
//   sqlite     → implémentation rusqlite (fichier ou mémoire)
//
// Le store est passé explicitement à chaque composant qui en a besoin :
// aucune connexion globale.
//
// =============================================================================

pub mod sql;
pub mod sqlite;

use std::fmt;

use crate::core::value::Value;
use crate::error::StoreResult;

/// Une requête SQL et ses paramètres positionnels (`?`).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        SqlStatement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        SqlStatement {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| format!("{:?}", p)).collect();
            write!(f, " -- [{}]", params.join(", "))?;
        }
        Ok(())
    }
}

/// Une ligne résultat.
pub type Row = Vec<Value>;

/// Store en lecture seule vu par le moteur.
pub trait CardStore {
    /// Première ligne du résultat, `None` si aucune.
    fn fetch_row(&self, stmt: &SqlStatement) -> StoreResult<Option<Row>>;

    /// Toutes les lignes du résultat.
    fn fetch_rows(&self, stmt: &SqlStatement) -> StoreResult<Vec<Row>>;

    /// Nom du store (journalisation)
    fn name(&self) -> &str;
}
