use serde::Deserialize;
use serde_json::from_slice;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::{AtlasError, Result};
use crate::geometry::LatLng;

/// Misje dołączone do programu; plik w katalogu danych może je nadpisać.
pub const BUNDLED_MISSIONS: &str = include_str!("../data/missions.json");

pub const COUNTRIES_FILE: &str = "countries_data.json";
pub const MISSIONS_FILE: &str = "missions.json";
pub const POINTS_FILE: &str = "points_of_interest.json";

#[derive(Clone, Debug, PartialEq)]
pub struct StatRecord {
    pub region_code: Option<String>,
    pub common_name: String,
    pub population: Option<u64>,
    pub region_label: String,
    pub capital: Option<String>,
    pub flag_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MissionStat {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MissionImage {
    pub src: String,
    #[serde(rename = "title")]
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MissionRecord {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "flag")]
    pub flag_country_code: String,
    #[serde(flatten)]
    pub coordinates: LatLng,
    #[serde(default)]
    pub stats: Vec<MissionStat>,
    #[serde(default)]
    pub images: Vec<MissionImage>,
}

/// Stały punkt na mapie z własnymi danymi, bez wielokąta.
#[derive(Clone, Debug, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    pub coordinates: LatLng,
    pub record: StatRecord,
}

#[derive(Deserialize)]
struct RawName {
    common: String,
}

#[derive(Deserialize, Default)]
struct RawFlags {
    svg: Option<String>,
    png: Option<String>,
}

// format countries_data.json
#[derive(Deserialize)]
struct RawCountry {
    name: RawName,
    ccn3: Option<String>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    flags: Option<RawFlags>,
}

impl From<RawCountry> for StatRecord {
    fn from(raw: RawCountry) -> Self {
        let flags = raw.flags.unwrap_or_default();
        Self {
            region_code: raw.ccn3.filter(|c| !c.trim().is_empty()),
            common_name: raw.name.common,
            population: raw.population,
            region_label: raw.region,
            capital: raw.capital.into_iter().next(),
            flag_url: flags.svg.or(flags.png),
        }
    }
}

#[derive(Deserialize)]
struct RawPoint {
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    region: String,
    capital: Option<String>,
    flag: Option<String>,
}

impl From<RawPoint> for PointOfInterest {
    fn from(raw: RawPoint) -> Self {
        Self {
            coordinates: LatLng::new(raw.lat, raw.lng),
            record: StatRecord {
                region_code: None,
                common_name: raw.name.clone(),
                population: raw.population,
                region_label: raw.region,
                capital: raw.capital,
                flag_url: raw.flag,
            },
            name: raw.name,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MissionId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointId(usize);

/// Oba niezależne źródła faktów: statystyki krajów i misje.
#[derive(Debug, Default)]
pub struct RecordStore {
    stats: Vec<StatRecord>,
    by_code: HashMap<String, StatId>,
    by_name: HashMap<String, StatId>,
    missions: Vec<MissionRecord>,
    missions_by_name: HashMap<String, MissionId>,
    points: Vec<PointOfInterest>,
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: for<'de> Deserialize<'de>>(bytes: &[u8], path: &Path) -> Result<T> {
    from_slice(bytes).map_err(|source| AtlasError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // pusty albo zepsuty plik kończy start
    pub fn load_stats<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let raw: Vec<RawCountry> = parse(&read(path)?, path)?;
        if raw.is_empty() {
            return Err(AtlasError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }
        let count = raw.len();
        for r in raw {
            self.insert_stat(r.into());
        }
        info!(records = count, path = %path.display(), "country statistics loaded");
        Ok(count)
    }

    /// Misje z pliku w katalogu danych albo wersja dołączona do programu.
    pub fn load_missions(&mut self, base: &Path) -> Result<usize> {
        let path = base.join(MISSIONS_FILE);
        let records: Vec<MissionRecord> = if path.exists() {
            parse(&read(&path)?, &path)?
        } else {
            debug!("using bundled mission data");
            parse(BUNDLED_MISSIONS.as_bytes(), Path::new("<bundled missions.json>"))?
        };
        if records.is_empty() {
            return Err(AtlasError::EmptyDataset { path });
        }
        let count = records.len();
        for m in records {
            self.insert_mission(m);
        }
        info!(records = count, "missions loaded");
        Ok(count)
    }

    /// Punkty są opcjonalne; brak pliku to zero punktów.
    pub fn load_points(&mut self, base: &Path) -> Result<usize> {
        let path: PathBuf = base.join(POINTS_FILE);
        if !path.exists() {
            return Ok(0);
        }
        let raw: Vec<RawPoint> = parse(&read(&path)?, &path)?;
        let count = raw.len();
        for p in raw {
            self.insert_point(p.into());
        }
        info!(records = count, "points of interest loaded");
        Ok(count)
    }

    /// Późniejszy rekord nadpisuje wcześniejszy pod tym samym kluczem.
    pub fn insert_stat(&mut self, record: StatRecord) -> StatId {
        let id = StatId(self.stats.len());
        self.by_name.insert(record.common_name.to_lowercase(), id);
        if let Some(code) = &record.region_code {
            self.by_code.insert(code.clone(), id);
        }
        self.stats.push(record);
        id
    }

    pub fn insert_mission(&mut self, record: MissionRecord) -> MissionId {
        let id = MissionId(self.missions.len());
        self.missions_by_name.insert(record.display_name.clone(), id);
        self.missions.push(record);
        id
    }

    pub fn insert_point(&mut self, point: PointOfInterest) -> PointId {
        let id = PointId(self.points.len());
        self.points.push(point);
        id
    }

    pub fn stat_by_code(&self, code: &str) -> Option<StatId> {
        self.by_code.get(code).copied()
    }

    /// Klucz musi już być zapisany małymi literami.
    pub fn stat_by_lower_name(&self, name: &str) -> Option<StatId> {
        self.by_name.get(name).copied()
    }

    pub fn mission_by_name(&self, name: &str) -> Option<MissionId> {
        self.missions_by_name.get(name).copied()
    }

    pub fn point_by_name(&self, name: &str) -> Option<PointId> {
        self.points.iter().position(|p| p.name == name).map(PointId)
    }

    pub fn stat(&self, id: StatId) -> &StatRecord {
        &self.stats[id.0]
    }

    pub fn mission(&self, id: MissionId) -> &MissionRecord {
        &self.missions[id.0]
    }

    pub fn point(&self, id: PointId) -> &PointOfInterest {
        &self.points[id.0]
    }

    pub fn stats(&self) -> &[StatRecord] {
        &self.stats
    }

    pub fn missions(&self) -> &[MissionRecord] {
        &self.missions
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }
}
