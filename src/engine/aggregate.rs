// =============================================================================
// AGGREGATE — Exécution des verbes sur le plan compilé
// =============================================================================
//
// Toutes les demandes d'une correspondance portent sur LE MÊME plan, traduit
// en relation regroupée par nom (backend::sql::planner). Elles sont
// indépendantes : l'échec de l'une est rendu à sa place et n'empêche pas
// les suivantes. L'ordre des résultats est celui des demandes.
//
//   count      → nombre de lignes (0 si rien ne correspond)
//   sum / avg  → agrégat numérique ; une colonne non numérique → TypeMismatch
//   min / max  → extremum + carte représentative (nom, image)
//
// =============================================================================

use tracing::{debug, warn};

use super::Deadline;
use crate::backend::sql::planner::SqlPlanner;
use crate::backend::CardStore;
use crate::core::plan::CompiledPlan;
use crate::core::query::{AggregationRequest, Verb};
use crate::core::value::Value;
use crate::error::{StoreError, StoreResult};

/// La carte qui porte un extremum.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRef {
    pub name: String,
    pub multiverse_id: i64,
}

/// Résultat réussi d'une demande.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub verb: Verb,
    pub column: String,
    /// `Null` quand aucune ligne ne correspond (sauf count)
    pub value: Value,
    pub card: Option<CardRef>,
}

impl AggregateResult {
    /// Le filtre n'a retenu aucune carte.
    pub fn is_not_found(&self) -> bool {
        match self.verb {
            Verb::Count => false,
            Verb::Min | Verb::Max => self.card.is_none(),
            Verb::Sum | Verb::Avg => self.value.is_null(),
        }
    }
}

/// Une demande et son issue.
#[derive(Debug)]
pub struct Outcome {
    pub request: AggregationRequest,
    pub result: StoreResult<AggregateResult>,
}

/// Exécute chaque demande, dans l'ordre, contre le même plan.
pub fn execute<S: CardStore + ?Sized>(
    store: &S,
    plan: &CompiledPlan,
    requests: &[AggregationRequest],
    deadline: &Deadline,
) -> Vec<Outcome> {
    let planner = SqlPlanner::new(plan);

    requests
        .iter()
        .map(|request| {
            let result = deadline
                .check("aggregation")
                .and_then(|_| execute_one(store, &planner, request));
            if let Err(e) = &result {
                warn!(verb = ?request.verb, column = %request.column, error = %e, "agrégation en échec");
            }
            Outcome {
                request: request.clone(),
                result,
            }
        })
        .collect()
}

fn execute_one<S: CardStore + ?Sized>(
    store: &S,
    planner: &SqlPlanner<'_>,
    request: &AggregationRequest,
) -> StoreResult<AggregateResult> {
    let stmt = planner.aggregate(request)?;
    debug!(sql = %stmt, "agrégation");

    let row = store.fetch_row(&stmt)?;
    let mut result = AggregateResult {
        verb: request.verb,
        column: request.column.clone(),
        value: Value::Null,
        card: None,
    };

    match request.verb {
        Verb::Count => {
            result.value = row
                .and_then(|r| r.into_iter().next())
                .unwrap_or(Value::Integer(0));
        }
        Verb::Sum | Verb::Avg => {
            let mut cells = row.unwrap_or_default().into_iter();
            let value = cells.next().unwrap_or(Value::Null);
            let non_numeric = cells.next().and_then(|v| v.as_integer()).unwrap_or(0);
            if non_numeric > 0 {
                return Err(StoreError::TypeMismatch {
                    column: request.column.clone(),
                });
            }
            result.value = value;
        }
        Verb::Min | Verb::Max => {
            if let Some(row) = row {
                let mut cells = row.into_iter();
                result.value = cells.next().unwrap_or(Value::Null);
                let name = cells.next().and_then(|v| v.as_text()).unwrap_or_default();
                let multiverse_id = cells.next().and_then(|v| v.as_integer()).unwrap_or(0);
                result.card = Some(CardRef {
                    name,
                    multiverse_id,
                });
            }
        }
    }

    Ok(result)
}
