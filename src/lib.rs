// =============================================================================
// CARDSTATS — Statistiques de cartes à collectionner, depuis le chat
// =============================================================================
//
// Un utilisateur écrit une requête compacte dans un message :
//
//   "combien ? #[[type:Creature,color:BR,avg:cmc]]"
//
// et le moteur répond par des agrégats (count, sum, avg, min, max) sur un
// corpus de cartes normalisé, ou par la fiche d'une carte (`[[Shock]]`).
//
// Architecture :
//   core/     → Le moteur pur : parsing, vues catégorielles, couleurs, plan
//   backend/  → Le store relationnel : schéma, traduction plan → SQL, SQLite
//   engine/   → Le pipeline message → réponse (agrégats, rendu, recherche)
//   ingest    → Export JSON → tables normalisées (hors ligne)
//   config    → Fichier TOML et valeurs par défaut
//   error     → Les erreurs du store, de la config et de l'ingestion
//
// =============================================================================

pub mod core;
pub mod backend;
pub mod engine;
pub mod ingest;
pub mod config;
pub mod error;
