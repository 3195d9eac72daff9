// =============================================================================
// ERROR — Les erreurs du store, de la configuration et de l'ingestion
// =============================================================================
//
// Aucune de ces erreurs n'est fatale sur le chemin des requêtes : le moteur
// convertit chaque StoreError en une ligne de texte, à la place de la
// demande d'agrégation qui a échoué.
//
// =============================================================================

use thiserror::Error;

/// Échec d'une requête au niveau du store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}", sqlite_message(.0))]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid column name '{0}'")]
    InvalidColumn(String),

    #[error("column '{column}' is not numeric")]
    TypeMismatch { column: String },

    #[error("deadline exceeded before {stage}")]
    DeadlineExceeded { stage: &'static str },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Le message SQLite seul, sur une ligne : le texte SQL joint par rusqlite
/// à une erreur de préparation n'est pas repris.
fn sqlite_message(e: &rusqlite::Error) -> String {
    let full = match e {
        rusqlite::Error::SqlInputError { msg, .. } => msg.clone(),
        other => other.to_string(),
    };
    full.lines().next().unwrap_or_default().trim_end().to_string()
}

/// Échec de chargement du fichier de configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Échec de l'ingestion hors ligne.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("cannot read card export: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid card export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error during ingestion: {0}")]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for IngestError {
    fn from(e: rusqlite::Error) -> Self {
        IngestError::Store(StoreError::Sqlite(e))
    }
}
