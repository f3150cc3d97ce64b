//! Testy zaznaczania przez publiczne API, na danych z plików.

use std::fs;

use geo::polygon;

use proptest::prelude::*;
use rust_atlas::data::{RecordStore, StatRecord};
use rust_atlas::geometry::{GeometryIndex, LatLng, RegionId};
use rust_atlas::markers::build_markers;
use rust_atlas::modal::{ModalBody, PLACEHOLDER};
use rust_atlas::resolver::RecordRef;
use rust_atlas::{
    Atlas, AtlasConfig, AtlasError, BrowseMode, Effect, Interaction, PresentationAdapter, SelectionState,
};
use tempfile::TempDir;

const WORLD: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": "004", "properties": {"name": "Afghanistan"},
         "geometry": {"type": "Polygon", "coordinates": [[[60,30],[70,30],[70,38],[60,38],[60,30]]]}},
        {"type": "Feature", "id": "180", "properties": {"name": "Dem. Rep. Congo"},
         "geometry": {"type": "Polygon", "coordinates": [[[15,-10],[30,-10],[30,4],[15,4],[15,-10]]]}},
        {"type": "Feature", "id": "840", "properties": {"name": "United States of America"},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[-125,25],[-70,25],[-70,49],[-125,49],[-125,25]]],
            [[[-170,55],[-140,55],[-140,71],[-170,71],[-170,55]]]
         ]}},
        {"type": "Feature", "id": "250", "properties": {"name": "France"},
         "geometry": {"type": "Polygon", "coordinates": [[[-5,42],[8,42],[8,51],[-5,51],[-5,42]]]}}
    ]
}"#;

const COUNTRIES: &str = r#"[
    {"name": {"common": "Afghanistan"}, "ccn3": "004", "population": 38000000,
     "region": "Asia", "capital": ["Kabul"]},
    {"name": {"common": "France"}, "ccn3": "250", "population": 67000000,
     "region": "Europe", "capital": ["Paris"], "flags": {"png": "https://flagcdn.com/w320/fr.png"}}
]"#;

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("world.geojson"), WORLD).unwrap();
    fs::write(dir.path().join("countries_data.json"), COUNTRIES).unwrap();
    dir
}

fn load(dir: &TempDir, mode: BrowseMode) -> Atlas {
    Atlas::load(&AtlasConfig {
        data_dir: dir.path().to_path_buf(),
        mode,
        top: 20,
    })
    .unwrap()
}

fn region(atlas: &Atlas, name: &str) -> RegionId {
    atlas.geometry.find_by_name(name).unwrap().id
}

fn modal(effects: &[Effect]) -> &rust_atlas::modal::ModalContent {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::ShowModal(m) => Some(m),
            _ => None,
        })
        .expect("modal shown")
}

#[test]
fn afghanistan_polygon_shows_grouped_population() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Stats);
    let mut ctl = atlas.controller();

    let effects = ctl.handle(&atlas, Interaction::Region(region(&atlas, "Afghanistan")));
    let content = modal(&effects);
    assert_eq!(content.title, "Afghanistan");
    let ModalBody::Facts(facts) = &content.body else {
        panic!("expected facts");
    };
    assert_eq!(facts.population, "38,000,000");
    assert_eq!(facts.region, "Asia");
    assert_eq!(facts.capital, "Kabul");
    assert_eq!(facts.flag_url, None);
}

#[test]
fn congo_polygon_resolves_to_curated_mission() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Missions);
    let mut ctl = atlas.controller();

    let effects = ctl.handle(&atlas, Interaction::Region(region(&atlas, "Dem. Rep. Congo")));
    let content = modal(&effects);
    assert_eq!(content.title, "Ζαΐρ");
    let ModalBody::Mission(sheet) = &content.body else {
        panic!("expected mission");
    };
    // Zair nie ma statystyk w danych misji, tylko zdjęcia.
    assert_eq!(sheet.stats.len(), 1);
    assert_eq!(sheet.stats[0].value, PLACEHOLDER);
    assert_eq!(sheet.slideshow.as_ref().map(Vec::len), Some(4));
    assert_eq!(
        ctl.state().selected_mission(&atlas.records).map(|m| m.display_name.as_str()),
        Some("Ζαΐρ")
    );
}

#[test]
fn usa_polygon_frames_alaska() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Missions);
    let mut ctl = atlas.controller();

    let usa = region(&atlas, "United States of America");
    let effects = ctl.handle(&atlas, Interaction::Region(usa));
    assert_eq!(effects[0], Effect::Highlight(Some(usa)));
    assert_eq!(effects[1], Effect::FrameCamera(LatLng::new(64.2, -153.5)));
    assert_eq!(modal(&effects).title, "Αλάσκα");
}

#[test]
fn non_mission_country_is_ignored_in_mission_mode() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Missions);
    let mut ctl = atlas.controller();

    let congo = region(&atlas, "Dem. Rep. Congo");
    ctl.handle(&atlas, Interaction::Region(congo));
    let effects = ctl.handle(&atlas, Interaction::Region(region(&atlas, "France")));
    assert!(effects.is_empty());
    assert_eq!(ctl.state().selected_region(), Some(congo));
}

#[test]
fn background_click_returns_to_idle() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Stats);
    let mut ctl = atlas.controller();

    ctl.handle(&atlas, Interaction::Region(region(&atlas, "France")));
    let effects = ctl.handle(&atlas, Interaction::Background);
    assert_eq!(ctl.state(), &SelectionState::Idle);
    assert!(effects.contains(&Effect::HideModal));
    assert!(effects.contains(&Effect::AutoRotate(true)));
}

#[test]
fn every_marker_matches_its_polygon() {
    let dir = data_dir();
    for mode in [BrowseMode::Stats, BrowseMode::Missions] {
        let atlas = load(&dir, mode);
        let ctl = atlas.controller();
        let resolver = ctl.resolver();
        for marker in &atlas.markers {
            let from_marker = resolver.resolve_marker(&atlas.geometry, &atlas.records, marker).unwrap();
            if let Some(id) = from_marker.region {
                let from_polygon = resolver.resolve_region(&atlas.geometry, &atlas.records, id);
                assert_eq!(Some(from_marker), from_polygon, "marker {}", marker.id);
            }
        }
    }
}

#[test]
fn mission_marker_without_polygon_still_selects() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Missions);
    let mut ctl = atlas.controller();

    let kenya = atlas.markers.iter().position(|m| m.id == "Κένυα").unwrap();
    let effects = ctl.handle(&atlas, Interaction::Marker(kenya));
    assert_eq!(effects[0], Effect::Highlight(None));
    assert_eq!(effects[1], Effect::FrameCamera(LatLng::new(-0.02, 37.9)));
    assert!(matches!(
        ctl.state().selection().and_then(|s| s.record),
        Some(RecordRef::Mission(_))
    ));
}

const POINTS: &str = r#"[
    {"name": "New York City, USA", "lat": 40.7128, "lng": -74.006,
     "population": 8804190, "region": "North America",
     "capital": "Albany (State Cap)", "flag": "https://flagcdn.com/w320/us.png"}
]"#;

#[test]
fn point_of_interest_marker_uses_its_own_record() {
    let dir = data_dir();
    fs::write(dir.path().join("points_of_interest.json"), POINTS).unwrap();
    let atlas = load(&dir, BrowseMode::Stats);
    let mut ctl = atlas.controller();

    let nyc = atlas.markers.iter().position(|m| m.id == "New York City, USA").unwrap();
    let effects = ctl.handle(&atlas, Interaction::Marker(nyc));
    assert_eq!(effects.len(), 4);
    assert_eq!(effects[0], Effect::Highlight(None));
    assert_eq!(effects[1], Effect::FrameCamera(LatLng::new(40.7128, -74.006)));
    assert_eq!(effects[3], Effect::AutoRotate(false));

    let content = modal(&effects);
    assert_eq!(content.title, "New York City, USA");
    let ModalBody::Facts(facts) = &content.body else {
        panic!("expected facts");
    };
    assert_eq!(facts.population, "8,804,190");
    assert_eq!(facts.region, "North America");
    assert_eq!(facts.capital, "Albany (State Cap)");
    assert_eq!(facts.flag_url.as_deref(), Some("https://flagcdn.com/w320/us.png"));
    assert!(matches!(
        ctl.state().selection().and_then(|s| s.record),
        Some(RecordRef::Point(_))
    ));
    assert_eq!(ctl.state().selected_region(), None);

    // Drugie kliknięcie w tę samą pinezkę odznacza.
    let effects = ctl.handle(&atlas, Interaction::Marker(nyc));
    assert_eq!(ctl.state(), &SelectionState::Idle);
    assert_eq!(
        effects,
        vec![Effect::Highlight(None), Effect::HideModal, Effect::AutoRotate(true)]
    );
}

#[test]
fn usa_polygon_in_stats_mode_frames_its_centroid() {
    let dir = data_dir();
    let atlas = load(&dir, BrowseMode::Stats);
    let mut ctl = atlas.controller();

    let usa = region(&atlas, "United States of America");
    let centroid = atlas.geometry.get(usa).unwrap().centroid().unwrap();
    let effects = ctl.handle(&atlas, Interaction::Region(usa));
    assert_eq!(effects[1], Effect::FrameCamera(centroid));
    assert_eq!(modal(&effects).title, "United States of America");
}

#[test]
fn missing_geometry_file_prevents_start() {
    let dir = TempDir::new().unwrap();
    let err = Atlas::load(&AtlasConfig {
        data_dir: dir.path().to_path_buf(),
        mode: BrowseMode::Missions,
        top: 20,
    })
    .unwrap_err();
    assert!(matches!(err, AtlasError::Io { .. }));
}

#[test]
fn stats_mode_requires_country_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("world.geojson"), WORLD).unwrap();
    let err = Atlas::load(&AtlasConfig {
        data_dir: dir.path().to_path_buf(),
        mode: BrowseMode::Stats,
        top: 20,
    })
    .unwrap_err();
    assert!(matches!(err, AtlasError::Io { .. }));
}

/// Adapter, który pamięta tylko podświetlenie i stan okna.
#[derive(Default)]
struct HighlightOnly {
    highlighted: Option<RegionId>,
    modal_open: bool,
}

impl PresentationAdapter for HighlightOnly {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Highlight(r) => self.highlighted = *r,
            Effect::ShowModal(_) => self.modal_open = true,
            Effect::HideModal => self.modal_open = false,
            _ => {}
        }
    }
}

fn grid_atlas(n: usize) -> (Atlas, Vec<RegionId>) {
    let mut geometry = GeometryIndex::default();
    let mut records = RecordStore::new();
    let mut ids = Vec::new();
    for i in 0..n {
        let lng = -170.0 + 20.0 * i as f64;
        let poly = geo::MultiPolygon(vec![geo::polygon![
            (x: lng, y: 0.0),
            (x: lng + 10.0, y: 0.0),
            (x: lng + 10.0, y: 10.0),
            (x: lng, y: 10.0),
            (x: lng, y: 0.0),
        ]]);
        let code = 100 + i as u32;
        ids.push(geometry.push(Some(code), format!("Country {i}"), poly));
        records.insert_stat(StatRecord {
            region_code: Some(format!("{code:03}")),
            common_name: format!("Country {i}"),
            population: Some(1_000 * (i as u64 + 1)),
            region_label: "Test".to_string(),
            capital: None,
            flag_url: None,
        });
    }
    let markers = build_markers(BrowseMode::Stats, &geometry, &records, n);
    (Atlas::new(BrowseMode::Stats, geometry, records, markers), ids)
}

fn interaction(n: usize) -> impl Strategy<Value = (u8, usize)> {
    (0u8..4, 0..n)
}

fn to_interaction(ids: &[RegionId], (kind, i): (u8, usize)) -> Interaction {
    match kind {
        0 => Interaction::Region(ids[i]),
        1 => Interaction::Marker(i),
        2 => Interaction::Background,
        _ => Interaction::Dismiss,
    }
}

proptest! {
    #[test]
    fn double_click_always_ends_idle(prefix in prop::collection::vec(interaction(6), 0..12), target in 0usize..6, via_marker in any::<bool>()) {
        let (atlas, ids) = grid_atlas(6);
        let mut ctl = atlas.controller();
        for step in prefix {
            ctl.handle(&atlas, to_interaction(&ids, step));
        }
        let (click, resolved) = if via_marker {
            let marker = &atlas.markers[target];
            (Interaction::Marker(target), ctl.resolver().resolve_marker(&atlas.geometry, &atlas.records, marker))
        } else {
            (Interaction::Region(ids[target]), ctl.resolver().resolve_region(&atlas.geometry, &atlas.records, ids[target]))
        };
        let key = resolved.expect("grid regions are resolvable").key;
        // Jeśli cel jest już zaznaczony, wystarczy jedno kliknięcie.
        let already = ctl.state().selection().map(|s| &s.key) == Some(&key);
        ctl.handle(&atlas, click);
        if !already {
            ctl.handle(&atlas, click);
        }
        prop_assert!(ctl.state().is_idle());
    }

    #[test]
    fn highlight_follows_state(steps in prop::collection::vec(interaction(6), 1..24)) {
        let (atlas, ids) = grid_atlas(6);
        let mut ctl = atlas.controller();
        let mut adapter = HighlightOnly::default();
        for step in steps {
            ctl.dispatch(&atlas, to_interaction(&ids, step), &mut adapter);
            prop_assert_eq!(adapter.highlighted, ctl.state().selected_region());
            prop_assert_eq!(adapter.modal_open, !ctl.state().is_idle());
        }
    }

    #[test]
    fn reselect_is_exclusive(a in 0usize..6, b in 0usize..6) {
        prop_assume!(a != b);
        let (atlas, ids) = grid_atlas(6);
        let mut ctl = atlas.controller();
        ctl.handle(&atlas, Interaction::Region(ids[a]));
        let effects = ctl.handle(&atlas, Interaction::Region(ids[b]));
        prop_assert_eq!(ctl.state().selected_region(), Some(ids[b]));
        let highlights: Vec<Effect> = effects.iter().filter(|e| matches!(e, Effect::Highlight(_))).cloned().collect();
        prop_assert_eq!(highlights, vec![Effect::Highlight(Some(ids[b]))]);
    }

    #[test]
    fn resolution_is_deterministic(i in 0usize..6) {
        let (atlas, ids) = grid_atlas(6);
        let first = atlas.controller();
        let second = atlas.controller();
        let a = first.resolver().resolve_region(&atlas.geometry, &atlas.records, ids[i]);
        let b = second.resolver().resolve_region(&atlas.geometry, &atlas.records, ids[i]);
        let c = first.resolver().resolve_region(&atlas.geometry, &atlas.records, ids[i]);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }
}
