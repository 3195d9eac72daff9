// =============================================================================
// SQLITE — Store rusqlite (fichier ou mémoire)
// =============================================================================
//
// Deux usages distincts, jamais simultanés :
//
//   - lecture (moteur)    : CardStore::fetch_row / fetch_rows
//   - écriture (ingestion): SqliteStore::write + Writer, dans UNE transaction
//
// Les tests montent un store en mémoire et l'alimentent par le même
// Writer que l'ingestion.
//
// =============================================================================

use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection, ToSql};
use tracing::debug;

use super::sql::{schema_statements, CORPUS_TABLES, NAME_INDEX};
use super::{CardStore, Row, SqlStatement};
use crate::core::card::{Card, CardSet};
use crate::core::color::ColorMask;
use crate::core::plan::Relation;
use crate::core::value::Value;
use crate::error::StoreResult;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(SqlValue::Real(*r)),
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}

fn to_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        // Le corpus ne contient pas de BLOB
        ValueRef::Blob(_) => Value::Null,
    }
}

/// Le store SQLite du corpus.
pub struct SqliteStore {
    conn: Connection,
    name: String,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(SqliteStore {
            conn,
            name: path.display().to_string(),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(SqliteStore {
            conn: Connection::open_in_memory()?,
            name: ":memory:".to_string(),
        })
    }

    /// Crée tables, index, index plein texte et vues (idempotent).
    pub fn migrate(&self) -> StoreResult<()> {
        for stmt in schema_statements() {
            self.conn.execute_batch(&stmt.sql)?;
        }
        Ok(())
    }

    /// Exécute `f` dans une transaction, validée seulement si `f` réussit.
    pub fn write<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Writer<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let tx = self.conn.transaction()?;
        let out = f(&Writer { conn: &tx })?;
        tx.commit()?;
        Ok(out)
    }
}

impl CardStore for SqliteStore {
    fn fetch_row(&self, stmt: &SqlStatement) -> StoreResult<Option<Row>> {
        Ok(self.fetch_rows(stmt)?.into_iter().next())
    }

    fn fetch_rows(&self, stmt: &SqlStatement) -> StoreResult<Vec<Row>> {
        debug!(store = %self.name, sql = %stmt, "requête");
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let width = prepared.column_count();
        let mut rows = prepared.query(params_from_iter(stmt.params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(to_value(row.get_ref(i)?));
            }
            out.push(cells);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Accès en écriture, valable le temps d'une transaction.
pub struct Writer<'c> {
    conn: &'c Connection,
}

impl Writer<'_> {
    /// Vide le corpus avant une réingestion complète.
    pub fn clear(&self) -> rusqlite::Result<()> {
        for table in CORPUS_TABLES.iter().chain([&NAME_INDEX]) {
            self.conn.execute(&format!("DELETE FROM {}", table), [])?;
        }
        Ok(())
    }

    pub fn insert_set(&self, set: &CardSet) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sets (code, name, release_date, type, block)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![set.code, set.name, set.release_date, set.set_type, set.block],
        )?;
        Ok(())
    }

    /// Écrit une impression et toutes ses appartenances.
    pub fn insert_printing(&self, set_code: &str, card: &Card) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO cards (id, name, mana_cost, cmc, type, card_text, flavor, artist,
                                number, power, toughness, loyalty, multiverse_id, release_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                card.id,
                card.name,
                card.mana_cost,
                card.cmc,
                card.type_line,
                card.text,
                card.flavor,
                card.artist,
                card.number,
                card.power,
                card.toughness,
                card.loyalty,
                card.multiverse_id,
                card.release_date,
            ],
        )?;

        self.conn.execute(
            "INSERT INTO set_card (set_code, id) VALUES (?1, ?2)",
            params![set_code, card.id],
        )?;

        self.insert_colors(Relation::Color, &card.id, card.colors)?;
        self.insert_colors(Relation::ColorIdentity, &card.id, card.color_identity)?;

        self.insert_memberships("card_supertype", "supertype", &card.id, &card.supertypes)?;
        self.insert_memberships("card_type", "type", &card.id, &card.types)?;
        self.insert_memberships("card_rarity", "rarity", &card.id, &card.rarities)?;
        Ok(())
    }

    fn insert_colors(&self, relation: Relation, id: &str, mask: ColorMask) -> rusqlite::Result<()> {
        let flags = mask.flags();
        let columns: Vec<&str> = flags.iter().map(|(col, _)| *col).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO {} (id, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            relation.table(),
            columns.join(", ")
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params![
            id, flags[0].1, flags[1].1, flags[2].1, flags[3].1, flags[4].1, flags[5].1
        ])?;
        Ok(())
    }

    fn insert_memberships(
        &self,
        table: &str,
        column: &str,
        id: &str,
        values: &[String],
    ) -> rusqlite::Result<()> {
        let sql = format!("INSERT INTO {} (id, {}) VALUES (?1, ?2)", table, column);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        for value in values {
            stmt.execute(params![id, value])?;
        }
        Ok(())
    }

    /// Reconstruit l'index plein texte des noms à partir de `cards`.
    pub fn rebuild_name_index(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(&format!(
            "DELETE FROM {idx}; INSERT INTO {idx} (id, name) SELECT id, name FROM cards;",
            idx = NAME_INDEX
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
            .write(|w| {
                w.insert_set(&CardSet::new("LEA", "Limited Edition Alpha"))?;
                w.insert_printing(
                    "LEA",
                    &Card::new("a1", "Lightning Bolt")
                        .cmc(1.0)
                        .colors(ColorMask::parse("R").unwrap())
                        .color_identity(ColorMask::parse("R").unwrap())
                        .card_type("Instant")
                        .rarity("Common")
                        .multiverse_id(209),
                )?;
                w.rebuild_name_index()?;
                Ok::<_, StoreError>(())
            })
            .unwrap();
        store
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let store = seeded();
        store.migrate().unwrap();
    }

    #[test]
    fn test_color_flags_written() {
        let store = seeded();
        let row = store
            .fetch_row(&SqlStatement::new(
                "SELECT w, u, b, r, g, colorless FROM card_color WHERE id = 'a1'",
            ))
            .unwrap()
            .unwrap();
        assert_eq!(row, vec![
            Value::Integer(0), Value::Integer(0), Value::Integer(0),
            Value::Integer(1), Value::Integer(0), Value::Integer(0),
        ]);
    }

    #[test]
    fn test_views_and_params() {
        let store = seeded();
        let rows = store
            .fetch_rows(&SqlStatement::with_params(
                "SELECT cards.name FROM cards WHERE cards.id IN (SELECT id FROM instants) AND cards.name = ?",
                vec![Value::from("Lightning Bolt")],
            ))
            .unwrap();
        assert_eq!(rows, vec![vec![Value::from("Lightning Bolt")]]);
    }

    #[test]
    fn test_name_index() {
        let store = seeded();
        let row = store
            .fetch_row(&SqlStatement::with_params(
                "SELECT id FROM card_names WHERE card_names MATCH ?",
                vec![Value::from("\"bolt\"")],
            ))
            .unwrap();
        assert_eq!(row, Some(vec![Value::from("a1")]));
    }

    #[test]
    fn test_unknown_column_is_a_store_error() {
        let store = seeded();
        let err = store.fetch_row(&SqlStatement::new("SELECT avg(nope) FROM cards"));
        assert!(matches!(err, Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_clear_empties_corpus() {
        let mut store = seeded();
        store.write(|w| w.clear()).unwrap();
        for table in ["cards", "set_card", "card_color", "card_type", "card_names"] {
            let row = store
                .fetch_row(&SqlStatement::new(format!("SELECT count(*) FROM {}", table)))
                .unwrap();
            assert_eq!(row, Some(vec![Value::Integer(0)]), "{}", table);
        }
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut store = seeded();
        let result: Result<(), StoreError> = store.write(|w| {
            w.insert_set(&CardSet::new("UGL", "Unglued"))?;
            Err(StoreError::InvalidColumn("boom".into()))
        });
        assert!(result.is_err());
        let sets = store.fetch_rows(&SqlStatement::new("SELECT code FROM sets")).unwrap();
        assert_eq!(sets, vec![vec![Value::from("LEA")]]);
    }
}
