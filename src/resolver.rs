//! Rozstrzyganie, który rekord pokazać dla klikniętego regionu lub pinezki.
//!
//! Trzy źródła danych używają różnych kluczy: geometria ma liczbowy `id` i
//! angielską nazwę, statystyki mają kod tekstowy i nazwę potoczną, a misje
//! tylko grecką nazwę wyświetlaną. Kolejność prób jest zapisana w jednej
//! liście [`Strategy`], a tabela nazw w [`NAME_MAPPING`].

use std::collections::HashMap;
use tracing::debug;

use crate::data::{MissionId, PointId, RecordStore, StatId};
use crate::geometry::{GeometryIndex, LatLng, RegionId, parse_region_code};
use crate::markers::Marker;

/// Wariant przeglądania: ogólne dane krajów albo tylko kraje misyjne.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrowseMode {
    Stats,
    #[default]
    Missions,
}

/// Jeden sposób dopasowania regionu do rekordu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Kod liczbowy dopełniony zerami do 3 cyfr (`4` → `"004"`).
    PaddedCode,
    /// Kod liczbowy jako zwykły tekst (`4` → `"4"`).
    RawCode,
    /// Nazwa z geometrii małymi literami.
    LowerName,
    /// Nazwa z geometrii przetłumaczona przez [`NAME_MAPPING`].
    CuratedName,
}

pub const STAT_STRATEGIES: &[Strategy] = &[Strategy::PaddedCode, Strategy::RawCode, Strategy::LowerName];
pub const MISSION_STRATEGIES: &[Strategy] = &[Strategy::CuratedName];

/// Wersja tabeli nazw; podbijać przy każdej zmianie wpisów.
pub const NAME_MAPPING_VERSION: u32 = 1;

/// Nazwa w geometrii (Natural Earth, angielski) → nazwa w danych misji.
pub const NAME_MAPPING: &[(&str, &str)] = &[
    ("Mexico", "Μεξικό"),
    ("Taiwan", "Ταϊβάν"),
    ("Sierra Leone", "Σιέρα Λεόνε"),
    ("Guatemala", "Γουατεμάλα"),
    ("Cameroon", "Καμερούν"),
    ("Dem. Rep. Congo", "Ζαΐρ"),
    ("Congo", "Κονγκό"),
    ("Uganda", "Ουγκάντα"),
    ("Tanzania", "Τανζανία"),
    ("Kenya", "Κένυα"),
    ("Madagascar", "Μαδαγασκάρη"),
    ("India", "Ινδία"),
    ("Indonesia", "Ινδονησία"),
    ("South Korea", "Νότια Κορέα"),
    ("Albania", "Αλβανία"),
    ("Japan", "Ιαπωνία"),
    ("Zimbabwe", "Ζιμπάμπουε"),
    ("Colombia", "Κολομβία"),
    ("Cuba", "Κούβα"),
    ("Nigeria", "Νιγηρία"),
    ("Thailand", "Ταϋλάνδη"),
    ("Philippines", "Φιλιππίνες"),
];

/// Wyjątek od tabeli nazw: wielokąt państwa, którego misja dotyczy tylko
/// jednego terytorium. Kamera celuje wtedy w stały punkt, nie w centroid.
#[derive(Clone, Copy, Debug)]
pub struct NameOverride {
    pub geometry_name: &'static str,
    pub curated_name: &'static str,
    pub focus: LatLng,
}

pub const NAME_OVERRIDES: &[NameOverride] = &[NameOverride {
    geometry_name: "United States of America",
    curated_name: "Αλάσκα",
    focus: LatLng::new(64.2, -153.5),
}];

/// Rekord wybrany do pokazania.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordRef {
    Stat(StatId),
    Mission(MissionId),
    Point(PointId),
}

/// Tożsamość zaznaczenia, używana do przełączania (drugi klik odznacza).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionKey {
    Region(RegionId),
    Marker(String),
}

/// Kanoniczny wynik rozstrzygnięcia jednego kliknięcia.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub key: SelectionKey,
    /// Wielokąt do podświetlenia; `None` dla pinezek bez kraju.
    pub region: Option<RegionId>,
    pub title: String,
    /// `None` oznacza znany region bez danych ("N/A" w każdym polu).
    pub record: Option<RecordRef>,
    pub focus: Option<LatLng>,
}

#[derive(Debug)]
pub struct Resolver {
    mode: BrowseMode,
    strategies: &'static [Strategy],
    to_curated: HashMap<&'static str, &'static str>,
    to_geometry: HashMap<&'static str, &'static str>,
    focus: HashMap<&'static str, LatLng>,
}

impl Resolver {
    pub fn new(mode: BrowseMode) -> Self {
        let strategies = match mode {
            BrowseMode::Stats => STAT_STRATEGIES,
            BrowseMode::Missions => MISSION_STRATEGIES,
        };

        let mut to_curated = HashMap::new();
        let mut to_geometry = HashMap::new();
        let mut focus = HashMap::new();
        for &(geometry_name, curated_name) in NAME_MAPPING {
            to_curated.insert(geometry_name, curated_name);
            to_geometry.insert(curated_name, geometry_name);
        }
        for o in NAME_OVERRIDES {
            to_curated.insert(o.geometry_name, o.curated_name);
            to_geometry.insert(o.curated_name, o.geometry_name);
            focus.insert(o.geometry_name, o.focus);
        }

        Self {
            mode,
            strategies,
            to_curated,
            to_geometry,
            focus,
        }
    }

    pub fn curated_name_for(&self, geometry_name: &str) -> Option<&'static str> {
        self.to_curated.get(geometry_name).copied()
    }

    pub fn geometry_name_for(&self, curated_name: &str) -> Option<&'static str> {
        self.to_geometry.get(curated_name).copied()
    }

    fn try_strategy(
        &self,
        strategy: Strategy,
        code: Option<u32>,
        name: &str,
        records: &RecordStore,
    ) -> Option<RecordRef> {
        match strategy {
            Strategy::PaddedCode => records.stat_by_code(&format!("{:03}", code?)).map(RecordRef::Stat),
            Strategy::RawCode => records.stat_by_code(&code?.to_string()).map(RecordRef::Stat),
            Strategy::LowerName => records.stat_by_lower_name(&name.to_lowercase()).map(RecordRef::Stat),
            Strategy::CuratedName => {
                let curated = self.curated_name_for(name)?;
                records.mission_by_name(curated).map(RecordRef::Mission)
            }
        }
    }

    /// Pierwsza strategia, która trafi, wygrywa.
    pub fn lookup(&self, code: Option<u32>, name: &str, records: &RecordStore) -> Option<RecordRef> {
        self.strategies
            .iter()
            .find_map(|&s| self.try_strategy(s, code, name, records))
    }

    /// Kliknięcie wielokąta. `None` oznacza region nieaktywny (w wariancie
    /// misji kraj bez misji) i kliknięcie jest ignorowane.
    pub fn resolve_region(&self, geometry: &GeometryIndex, records: &RecordStore, id: RegionId) -> Option<Selection> {
        let region = geometry.get(id)?;
        let record = self.lookup(region.code, &region.name, records);
        if record.is_none() {
            debug!(region = %region.name, code = ?region.code, "no record for region");
        }

        let title = match (self.mode, record) {
            (BrowseMode::Missions, Some(RecordRef::Mission(m))) => records.mission(m).display_name.clone(),
            (BrowseMode::Missions, _) => return None,
            (BrowseMode::Stats, _) => region.name.clone(),
        };

        // Stały punkt tylko dla misji na terytorium; statystyki dotyczą całego państwa.
        let focus = match record {
            Some(RecordRef::Mission(_)) => self.focus.get(region.name.as_str()).copied(),
            _ => None,
        }
        .or_else(|| region.centroid());

        Some(Selection {
            key: SelectionKey::Region(id),
            region: Some(id),
            title,
            record,
            focus,
        })
    }

    /// Kliknięcie pinezki. Jeśli pinezka ma wielokąt, wynik jest identyczny
    /// jak przy kliknięciu tego wielokąta.
    pub fn resolve_marker(&self, geometry: &GeometryIndex, records: &RecordStore, marker: &Marker) -> Option<Selection> {
        let code = marker.linked_region_code.as_deref().and_then(parse_region_code);
        if let Some(region) = code.and_then(|c| geometry.find_by_code(c)) {
            if let Some(sel) = self.resolve_region(geometry, records, region.id) {
                return Some(sel);
            }
        }

        let record = if let Some(name) = &marker.linked_mission_name {
            let mission = records.mission_by_name(name)?;
            let region = self
                .geometry_name_for(name)
                .and_then(|g| geometry.find_by_name(g));
            if let Some(sel) = region.and_then(|r| self.resolve_region(geometry, records, r.id)) {
                return Some(sel);
            }
            debug!(mission = %name, "mission without polygon, framing on marker");
            Some(RecordRef::Mission(mission))
        } else if code.is_some() {
            self.lookup(code, &marker.label, records)
        } else {
            records.point_by_name(&marker.id).map(RecordRef::Point)
        };

        Some(Selection {
            key: SelectionKey::Marker(marker.id.clone()),
            region: None,
            title: marker.label.clone(),
            record,
            focus: Some(marker.coordinates),
        })
    }
}
