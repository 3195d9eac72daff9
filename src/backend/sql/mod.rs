// =============================================================================
// BACKEND SQL — Le schéma physique du corpus
// =============================================================================
//
// Ce module produit le DDL que l'ingestion exécute :
//
//   cards          une ligne par impression
//   sets           une ligne par extension
//   set_card       appartenance impression → extension
//   card_color     5 canaux + incolore, couleur imprimée
//   card_colorID   5 canaux + incolore, identité de couleur
//   card_supertype / card_type / card_rarity   appartenances multi-valuées
//   card_names     index plein texte (FTS5) sur les noms
//
// puis une vue par CategoryTag, générée à partir de la même table que le
// résolveur (core::category) :
//
//   CREATE VIEW legendaries (id) AS
//     SELECT id FROM card_supertype WHERE supertype = 'Legendary'
//
// La traduction des plans compilés en SELECT est dans planner.rs.
//
// =============================================================================

pub mod planner;

use crate::backend::SqlStatement;
use crate::core::category::CategoryTag;
use crate::core::color::{Channel, COLORLESS_COLUMN};
use crate::core::plan::Relation;

/// Table plein texte des noms de cartes.
pub const NAME_INDEX: &str = "card_names";

/// Les tables alimentées par l'ingestion (hors index plein texte).
pub const CORPUS_TABLES: &[&str] = &[
    "sets",
    "cards",
    "set_card",
    "card_color",
    "card_colorID",
    "card_supertype",
    "card_type",
    "card_rarity",
];

/// Le CREATE TABLE d'une table de couleurs (card_color / card_colorID).
fn color_table_sql(relation: Relation) -> String {
    let mut columns = vec!["  id TEXT PRIMARY KEY".to_string()];
    for ch in Channel::ALL {
        columns.push(format!("  {} INTEGER NOT NULL", ch.column()));
    }
    columns.push(format!("  {} INTEGER NOT NULL", COLORLESS_COLUMN));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        relation.table(),
        columns.join(",\n")
    )
}

/// Les tables du corpus, dans l'ordre de création.
pub fn table_statements() -> Vec<SqlStatement> {
    let mut stmts = vec![
        SqlStatement::new(
            "CREATE TABLE IF NOT EXISTS sets (
  code TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  release_date TEXT,
  type TEXT,
  block TEXT
)",
        ),
        SqlStatement::new(
            "CREATE TABLE IF NOT EXISTS cards (
  id TEXT NOT NULL,
  name TEXT NOT NULL,
  mana_cost TEXT,
  cmc REAL,
  type TEXT,
  card_text TEXT,
  flavor TEXT,
  artist TEXT,
  number TEXT,
  power INTEGER,
  toughness INTEGER,
  loyalty INTEGER,
  multiverse_id INTEGER NOT NULL DEFAULT 0,
  release_date TEXT
)",
        ),
        SqlStatement::new("CREATE INDEX IF NOT EXISTS cards_id ON cards (id)"),
        SqlStatement::new("CREATE INDEX IF NOT EXISTS cards_name ON cards (name)"),
        SqlStatement::new(
            "CREATE TABLE IF NOT EXISTS set_card (set_code TEXT NOT NULL, id TEXT NOT NULL)",
        ),
        SqlStatement::new("CREATE INDEX IF NOT EXISTS set_card_id ON set_card (id)"),
    ];

    stmts.push(SqlStatement::new(color_table_sql(Relation::Color)));
    stmts.push(SqlStatement::new(color_table_sql(Relation::ColorIdentity)));

    for table in ["card_supertype", "card_type", "card_rarity"] {
        let column = table.trim_start_matches("card_");
        stmts.push(SqlStatement::new(format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT NOT NULL, {} TEXT NOT NULL)",
            table, column
        )));
        stmts.push(SqlStatement::new(format!(
            "CREATE INDEX IF NOT EXISTS {}_{} ON {} ({}, id)",
            table, column, table, column
        )));
    }

    stmts.push(SqlStatement::new(format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5(id UNINDEXED, name)",
        NAME_INDEX
    )));

    stmts
}

/// Une vue d'appartenance par tag canonique.
pub fn view_statements() -> Vec<SqlStatement> {
    CategoryTag::ALL
        .iter()
        .map(|tag| {
            let axis = tag.axis();
            SqlStatement::new(format!(
                "CREATE VIEW IF NOT EXISTS {} (id) AS SELECT id FROM {} WHERE {} = '{}'",
                tag.view_name(),
                axis.membership_table(),
                axis.membership_column(),
                tag.stored_value().replace('\'', "''"),
            ))
        })
        .collect()
}

/// Tout le DDL : tables puis vues.
pub fn schema_statements() -> Vec<SqlStatement> {
    let mut stmts = table_statements();
    stmts.extend(view_statements());
    stmts
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tables() {
        let sql = color_table_sql(Relation::ColorIdentity);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS card_colorID"));
        for col in ["w", "u", "b", "r", "g", "colorless"] {
            assert!(sql.contains(&format!("  {} INTEGER NOT NULL", col)), "{}", col);
        }
    }

    #[test]
    fn test_one_view_per_tag() {
        let views = view_statements();
        assert_eq!(views.len(), CategoryTag::ALL.len());
        let mythics = views
            .iter()
            .find(|s| s.sql.contains("VIEW IF NOT EXISTS mythics"))
            .unwrap();
        assert!(mythics.sql.contains("FROM card_rarity WHERE rarity = 'Mythic Rare'"));
    }

    #[test]
    fn test_membership_tables() {
        let sql: Vec<String> = table_statements().into_iter().map(|s| s.sql).collect();
        assert!(sql.iter().any(|s| s.contains("card_supertype (id TEXT NOT NULL, supertype TEXT NOT NULL)")));
        assert!(sql.iter().any(|s| s.contains("USING fts5")));
    }
}
