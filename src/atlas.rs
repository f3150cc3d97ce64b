use std::path::PathBuf;
use tracing::info;

use crate::data::{COUNTRIES_FILE, RecordStore};
use crate::error::Result;
use crate::geometry::GeometryIndex;
use crate::markers::{Marker, build_markers};
use crate::resolver::{BrowseMode, Resolver};
use crate::selection::SelectionController;

pub const GEOMETRY_FILE: &str = "world.geojson";

/// Ustawienia ładowania niezależne od interfejsu.
#[derive(Clone, Debug)]
pub struct AtlasConfig {
    pub data_dir: PathBuf,
    pub mode: BrowseMode,
    pub top: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            mode: BrowseMode::default(),
            top: 20,
        }
    }
}

/// Wszystkie dane wczytane przy starcie. Po załadowaniu tylko do odczytu.
#[derive(Debug)]
pub struct Atlas {
    pub mode: BrowseMode,
    pub geometry: GeometryIndex,
    pub records: RecordStore,
    pub markers: Vec<Marker>,
}

impl Atlas {
    pub fn new(mode: BrowseMode, geometry: GeometryIndex, records: RecordStore, markers: Vec<Marker>) -> Self {
        Self {
            mode,
            geometry,
            records,
            markers,
        }
    }

    /// Ładuje geometrię i źródło danych właściwe dla wariantu. Każdy błąd
    /// przerywa start, zanim mapa stanie się interaktywna.
    pub fn load(config: &AtlasConfig) -> Result<Self> {
        let base = &config.data_dir;
        let geometry = GeometryIndex::load(base.join(GEOMETRY_FILE))?;

        let mut records = RecordStore::new();
        match config.mode {
            BrowseMode::Stats => {
                records.load_stats(base.join(COUNTRIES_FILE))?;
                records.load_points(base)?;
            }
            BrowseMode::Missions => {
                records.load_missions(base)?;
            }
        }

        let markers = build_markers(config.mode, &geometry, &records, config.top);
        info!(mode = ?config.mode, markers = markers.len(), "atlas ready");
        Ok(Self::new(config.mode, geometry, records, markers))
    }

    pub fn controller(&self) -> SelectionController {
        SelectionController::new(Resolver::new(self.mode))
    }
}
