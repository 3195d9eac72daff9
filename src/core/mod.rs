// =============================================================================
// CORE — Le moteur de requêtes pur
// =============================================================================
//
// Ce module regroupe toute la logique sans store :
// pas de SQL, pas de réseau — du texte en entrée, un plan en sortie.
//
// Architecture (feuilles d'abord) :
//   value     → les cellules échangées avec le store
//   card      → le modèle de données normalisé (Card, CardSet)
//   negation  → partition positifs / négatifs
//   category  → synonymes → vues canoniques (type, supertype, rareté)
//   color     → vecteurs de couleurs, appartenance exacte
//   query     → Query, Field, Verb, AggregationRequest
//   parser    → texte → Query + demandes d'agrégation
//   plan      → CompiledPlan (base + jointures + prédicats)
//   compile   → Query → CompiledPlan
//   diagnose  → ce que le mode tolérant ignore
//
// =============================================================================

pub mod value;
pub mod card;
pub mod negation;
pub mod category;
pub mod color;
pub mod query;
pub mod parser;
pub mod plan;
pub mod compile;
pub mod diagnose;
