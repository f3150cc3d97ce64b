use geo::{Area, Centroid, Contains, Geometry, MultiPolygon, Point, Polygon};
use geojson::{GeoJson, feature::Id};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path, str::FromStr};
use tracing::{debug, info, warn};

use crate::error::{AtlasError, Result};

// Mniejsze fragmenty (np. wyspy zamorskie) nie przesuwają centroidu.
const FRAGMENT_AREA_RATIO: f64 = 0.20;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Region {
    pub id: RegionId,
    pub code: Option<u32>,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    anchor: Option<LatLng>,
}

impl Region {
    pub fn centroid(&self) -> Option<LatLng> {
        self.anchor
    }

    pub fn contains(&self, at: LatLng) -> bool {
        self.geometry.contains(&Point::new(at.lng, at.lat))
    }
}

/// Normalizuje kod regionu do liczby: `"004"`, `"4"` i `4` to ten sam kod.
pub fn parse_region_code(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

fn feature_code(id: Option<&Id>) -> Option<u32> {
    match id? {
        Id::String(s) => parse_region_code(s),
        Id::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
            .and_then(|v| u32::try_from(v).ok()),
    }
}

/// Centroid bez drobnych fragmentów, gdy wielokąt ma wiele części.
fn representative_point(mp: &MultiPolygon<f64>) -> Option<LatLng> {
    let point = if mp.0.len() > 1 {
        let areas: Vec<f64> = mp.0.iter().map(|p| p.unsigned_area()).collect();
        let max_area = areas.iter().copied().fold(0.0, f64::max);
        let threshold = max_area * FRAGMENT_AREA_RATIO;
        let significant: Vec<Polygon<f64>> = mp
            .0
            .iter()
            .zip(areas)
            .filter(|(_, area)| *area >= threshold)
            .map(|(poly, _)| poly.clone())
            .collect();
        MultiPolygon(significant).centroid().or_else(|| mp.centroid())
    } else {
        mp.centroid()
    };
    point.map(|p| LatLng::new(p.y(), p.x()))
}

#[derive(Debug, Default)]
pub struct GeometryIndex {
    regions: Vec<Region>,
    by_code: HashMap<u32, RegionId>,
    by_name: HashMap<String, RegionId>,
}

impl GeometryIndex {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = GeoJson::from_str(&txt).map_err(|source| AtlasError::GeoJson {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        let index = Self::from_geojson(raw)?;
        if index.is_empty() {
            return Err(AtlasError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }
        info!(regions = index.len(), path = %path.display(), "geometry loaded");
        Ok(index)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self> {
        let mut index = Self::default();

        let features = match raw {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => Vec::new(),
        };

        for feature in features {
            let name = feature
                .property("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let code = feature_code(feature.id.as_ref());

            let Some(gj) = feature.geometry else {
                debug!(%name, "feature without geometry skipped");
                continue;
            };
            let geom: Geometry<f64> =
                gj.value.try_into().map_err(|e: geojson::Error| AtlasError::Geometry {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let mp = match geom {
                Geometry::Polygon(p) => MultiPolygon(vec![p]),
                Geometry::MultiPolygon(m) => m,
                _ => {
                    warn!(%name, "non-polygon feature skipped");
                    continue;
                }
            };

            index.push(code, name, mp);
        }

        Ok(index)
    }

    /// Dodaje region. Przy powtórzonym kodzie lub nazwie wygrywa pierwszy.
    pub fn push(&mut self, code: Option<u32>, name: String, geometry: MultiPolygon<f64>) -> RegionId {
        let id = RegionId(self.regions.len());
        if let Some(code) = code {
            self.by_code.entry(code).or_insert(id);
        }
        if !name.is_empty() {
            self.by_name.entry(name.clone()).or_insert(id);
        }
        let anchor = representative_point(&geometry);
        self.regions.push(Region {
            id,
            code,
            name,
            geometry,
            anchor,
        });
        id
    }

    pub fn find_by_code(&self, code: u32) -> Option<&Region> {
        self.by_code.get(&code).map(|id| &self.regions[id.0])
    }

    /// Dokładne, wrażliwe na wielkość liter dopasowanie nazwy z geometrii.
    pub fn find_by_name(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|id| &self.regions[id.0])
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    // pierwszy trafiony
    pub fn region_at(&self, at: LatLng) -> Option<RegionId> {
        self.regions.iter().find(|r| r.contains(at)).map(|r| r.id)
    }
}
