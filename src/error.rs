//! Błędy fazy ładowania danych.

use std::path::PathBuf;
use thiserror::Error;

/// Błędy, które mogą wystąpić przy ładowaniu geometrii i zbiorów danych.
///
/// Brak rekordu dla klikniętego regionu nie jest błędem - rdzeń podstawia
/// wtedy wartości zastępcze. Tutaj trafia tylko to, co uniemożliwia start.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Nie udało się odczytać pliku.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plik JSON ma niepoprawny format.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Plik GeoJSON ma niepoprawny format.
    #[error("failed to parse GeoJSON {path}: {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    /// Obiekt geometrii nie daje się zamienić na wielokąt.
    #[error("invalid geometry for feature '{name}': {message}")]
    Geometry { name: String, message: String },

    /// Zbiór danych nie zawiera żadnego rekordu.
    #[error("dataset is empty: {path}")]
    EmptyDataset { path: PathBuf },
}

/// Wynik operacji ładowania.
pub type Result<T> = std::result::Result<T, AtlasError>;
