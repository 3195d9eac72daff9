// =============================================================================
// SQL PLANNER — Traduction des plans compilés en SQL
// =============================================================================
//
// Un CompiledPlan devient une relation dérivée, regroupée par nom de carte
// (les rééditions comptent une fois) et restreinte aux impressions ayant
// une image :
//
// ┌──────────────────────────────────────────────────────────────────┐
// │ Query : type:Creature, color:BR                                  │
// │                                                                  │
// │   SELECT cards.*, min(cards.rowid) AS printing                   │
// │   FROM cards                                                     │
// │   JOIN card_color ON cards.id = card_color.id                    │
// │   WHERE cards.id IN (SELECT id FROM creatures)                   │
// │     AND (card_color.w = 0 AND card_color.u = 0                   │
// │          AND card_color.b = 1 AND card_color.r = 1               │
// │          AND card_color.g = 0 AND card_color.colorless = 0)      │
// │     AND cards.multiverse_id != 0                                 │
// │   GROUP BY cards.name                                            │
// └──────────────────────────────────────────────────────────────────┘
//
// Avec un seul agrégat min(), SQLite prend les colonnes nues de la ligne
// qui porte ce minimum : la représentante d'un nom est sa première
// impression insérée. Le résultat est donc stable pour un corpus donné.
//
// Chaque demande d'agrégation est ensuite posée sur cette relation.
// Les termes de l'utilisateur passent toujours par des paramètres `?` ;
// seule la colonne agrégée est interpolée, après validation.
//
// =============================================================================

use std::fmt;

use crate::backend::SqlStatement;
use crate::core::plan::{CompiledPlan, Predicate};
use crate::core::query::{AggregationRequest, Verb};
use crate::core::value::Value;
use crate::error::{StoreError, StoreResult};

/// Alias de la relation dérivée dans les requêtes d'agrégation.
const GROUPED: &str = "grouped";

/// Résultat de la traduction : la relation regroupée.
#[derive(Debug, Clone)]
pub struct SqlPlan {
    pub sql: String,
    pub params: Vec<Value>,
    /// Nombre de JOINs dans la requête
    pub join_count: usize,
}

impl fmt::Display for SqlPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.sql)?;
        writeln!(f, "-- {} JOINs, {} paramètres", self.join_count, self.params.len())
    }
}

/// Forme de la ligne renvoyée pour chaque verbe.
///
///   Count        → [count]
///   Sum / Avg    → [valeur, nombre de valeurs non numériques]
///   Min / Max    → [valeur, nom, multiverse_id]  (0 ou 1 ligne)
pub struct SqlPlanner<'a> {
    plan: &'a CompiledPlan,
}

impl<'a> SqlPlanner<'a> {
    pub fn new(plan: &'a CompiledPlan) -> Self {
        SqlPlanner { plan }
    }

    /// La relation filtrée, regroupée par nom.
    pub fn grouped_relation(&self) -> SqlPlan {
        let base = self.plan.base.table();
        let mut params = Vec::new();

        let mut sql = format!("SELECT {base}.*, min({base}.rowid) AS printing\nFROM {base}");

        for join in &self.plan.joins {
            let table = join.table();
            sql.push_str(&format!("\nJOIN {table} ON {base}.id = {table}.id"));
        }

        let mut where_parts: Vec<String> = self
            .plan
            .predicates
            .iter()
            .map(|pred| predicate_sql(pred, &mut params))
            .collect();
        where_parts.push(format!("{base}.multiverse_id != 0"));

        sql.push_str(&format!("\nWHERE {}", where_parts.join("\n  AND ")));
        sql.push_str(&format!("\nGROUP BY {base}.name"));

        SqlPlan {
            sql,
            params,
            join_count: self.plan.join_count(),
        }
    }

    /// La requête d'une demande d'agrégation.
    ///
    /// Une colonne qui n'est pas un identifiant SQL nu est refusée ici ;
    /// une colonne inconnue est refusée par le store à la préparation.
    pub fn aggregate(&self, request: &AggregationRequest) -> StoreResult<SqlStatement> {
        let column = request.column.as_str();
        if !is_identifier(column) {
            return Err(StoreError::InvalidColumn(column.to_string()));
        }

        let relation = self.grouped_relation();
        let from = format!("FROM (\n{}\n) AS {GROUPED}", relation.sql);

        let sql = match request.verb {
            Verb::Count => format!("SELECT count({column})\n{from}"),
            Verb::Sum | Verb::Avg => format!(
                "SELECT {func}({column}), \
                 count({column}) - count(CASE WHEN typeof({column}) IN ('integer', 'real') THEN 1 END)\n{from}",
                func = request.verb.sql_function(),
            ),
            Verb::Min | Verb::Max => {
                let order = if request.verb == Verb::Min { "ASC" } else { "DESC" };
                format!(
                    "SELECT {column}, name, multiverse_id\n{from}\n\
                     WHERE {column} IS NOT NULL\n\
                     ORDER BY {column} {order}, name ASC\nLIMIT 1"
                )
            }
        };

        Ok(SqlStatement::with_params(sql, relation.params))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Traduit un prédicat ; les valeurs sont poussées dans `params`.
fn predicate_sql(pred: &Predicate, params: &mut Vec<Value>) -> String {
    match pred {
        Predicate::InView { view, negated } => {
            let not = if *negated { "NOT " } else { "" };
            format!("cards.id {not}IN (SELECT id FROM {view})")
        }
        Predicate::OneOf {
            column,
            values,
            negated,
        } => {
            let not = if *negated { "NOT " } else { "" };
            let placeholders = vec!["?"; values.len()].join(", ");
            params.extend(values.iter().map(|v| Value::Text(v.clone())));
            format!("{column} COLLATE NOCASE {not}IN ({placeholders})")
        }
        Predicate::Contains {
            column,
            needle,
            negated,
        } => {
            let not = if *negated { "NOT " } else { "" };
            params.push(Value::Text(format!("%{}%", escape_like(needle))));
            format!("{column} {not}LIKE ? ESCAPE '\\'")
        }
        Predicate::ColorExact {
            relation,
            mask,
            negated,
        } => {
            let table = relation.table();
            let flags: Vec<String> = mask
                .flags()
                .iter()
                .map(|(col, on)| format!("{table}.{col} = {}", if *on { 1 } else { 0 }))
                .collect();
            let not = if *negated { "NOT " } else { "" };
            format!("{not}({})", flags.join(" AND "))
        }
        Predicate::AnyOf(preds) => {
            let parts: Vec<String> = preds.iter().map(|p| predicate_sql(p, params)).collect();
            format!("({})", parts.join(" OR "))
        }
    }
}

/// Échappe les jokers de LIKE.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
