use crate::data::RecordStore;
use crate::geometry::{GeometryIndex, LatLng, parse_region_code};
use crate::resolver::BrowseMode;

/// Rodzaj pinezki, od którego zależy jej kolor na mapie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerColor {
    Population,
    PointOfInterest,
    Mission,
}

/// Klikalna pinezka. Powiązana z kodem kraju, z misją albo z żadnym z nich
/// (punkt z własnymi danymi).
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: String,
    pub label: String,
    pub coordinates: LatLng,
    pub linked_region_code: Option<String>,
    pub linked_mission_name: Option<String>,
    pub color: MarkerColor,
}

/// N najludniejszych krajów z wielokątem na mapie, plus stałe punkty.
pub fn population_markers(geometry: &GeometryIndex, records: &RecordStore, top: usize) -> Vec<Marker> {
    let mut ranked: Vec<_> = records.stats().iter().collect();
    ranked.sort_by(|a, b| b.population.cmp(&a.population));

    let mut markers: Vec<Marker> = ranked
        .into_iter()
        .take(top)
        .filter_map(|rec| {
            let code = rec.region_code.as_ref()?;
            let region = geometry.find_by_code(parse_region_code(code)?)?;
            let coordinates = region.centroid()?;
            Some(Marker {
                id: code.clone(),
                label: rec.common_name.clone(),
                coordinates,
                linked_region_code: Some(code.clone()),
                linked_mission_name: None,
                color: MarkerColor::Population,
            })
        })
        .collect();

    markers.extend(records.points().iter().map(|p| Marker {
        id: p.name.clone(),
        label: p.name.clone(),
        coordinates: p.coordinates,
        linked_region_code: None,
        linked_mission_name: None,
        color: MarkerColor::PointOfInterest,
    }));

    markers
}

/// Jedna pinezka na każdą misję, w kolejności z pliku.
pub fn mission_markers(records: &RecordStore) -> Vec<Marker> {
    records
        .missions()
        .iter()
        .map(|m| Marker {
            id: m.display_name.clone(),
            label: m.display_name.clone(),
            coordinates: m.coordinates,
            linked_region_code: None,
            linked_mission_name: Some(m.display_name.clone()),
            color: MarkerColor::Mission,
        })
        .collect()
}

pub fn build_markers(mode: BrowseMode, geometry: &GeometryIndex, records: &RecordStore, top: usize) -> Vec<Marker> {
    match mode {
        BrowseMode::Stats => population_markers(geometry, records, top),
        BrowseMode::Missions => mission_markers(records),
    }
}
