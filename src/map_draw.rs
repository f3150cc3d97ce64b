use geo::{BoundingRect, LineString, Rect};
use ratatui::layout::Rect as TuiRect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::atlas::Atlas;
use crate::geometry::{LatLng, RegionId};
use crate::markers::MarkerColor;
use crate::selection::Interaction;

/// Przesunięcie długości geograficznej na jeden takt obrotu (w stopniach).
const ROTATE_STEP: f64 = 0.75;
/// Przybliżenie po wybraniu regionu.
const FRAMED_ZOOM: f64 = 3.0;
/// Promień trafienia pinezki przy zoomie 1 (w stopniach).
const PICK_RADIUS: f64 = 3.0;

/// Sprowadza długość geograficzną do przedziału [-180, 180).
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// "Kamera" mapy: środek widoku, przybliżenie i automatyczny obrót.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub auto_rotate: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 1.0,
            auto_rotate: true,
        }
    }
}

impl Viewport {
    /// Nowy cel zastępuje poprzedni; nie ma kolejki przejść.
    pub fn frame(&mut self, target: LatLng) {
        self.zoom = FRAMED_ZOOM;
        self.center = LatLng::new(target.lat, wrap_lng(target.lng));
    }

    /// Powrót do widoku całego świata, bez zmiany długości geograficznej.
    pub fn release(&mut self) {
        self.zoom = 1.0;
        self.center.lat = 0.0;
    }

    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.center.lng = wrap_lng(self.center.lng + ROTATE_STEP);
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = 180.0 / self.zoom;
        [self.center.lng - half, self.center.lng + half]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let half = 90.0 / self.zoom;
        let lat = self.center.lat.clamp(-90.0 + half, 90.0 - half);
        [lat - half, lat + half]
    }

    /// Komórka terminala → współrzędne geograficzne. `inner` to obszar
    /// płótna bez ramki.
    pub fn to_geo(&self, inner: TuiRect, column: u16, row: u16) -> Option<LatLng> {
        if inner.width == 0
            || inner.height == 0
            || column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        let [x0, x1] = self.x_bounds();
        let [y0, y1] = self.y_bounds();
        let fx = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
        let fy = (f64::from(row - inner.y) + 0.5) / f64::from(inner.height);
        Some(LatLng::new(y1 - fy * (y1 - y0), wrap_lng(x0 + fx * (x1 - x0))))
    }
}

fn marker_color(color: MarkerColor) -> Color {
    match color {
        MarkerColor::Population => Color::Blue,
        MarkerColor::PointOfInterest => Color::LightRed,
        MarkerColor::Mission => Color::Green,
    }
}

fn draw_ring(ctx: &mut Context, ring: &LineString<f64>, offset: f64, color: Color) {
    for window in ring.0.windows(2) {
        let a = window[0];
        let b = window[1];
        ctx.draw(&Line { x1: a.x + offset, y1: a.y, x2: b.x + offset, y2: b.y, color });
    }
}

/// Rysowanie mapy i zamiana kliknięć na interakcje.
pub struct MapView {
    bounds: Vec<Option<Rect<f64>>>,
}

impl MapView {
    pub fn new(atlas: &Atlas) -> Self {
        let bounds = atlas
            .geometry
            .regions()
            .iter()
            .map(|r| r.geometry.bounding_rect())
            .collect();
        Self { bounds }
    }

    /// Przesunięcia o 360°, przy których region jest widoczny.
    fn visible_offsets(&self, id: RegionId, x_bounds: [f64; 2]) -> impl Iterator<Item = f64> + '_ {
        let rect = self.bounds.get(id.index()).copied().flatten();
        [-360.0, 0.0, 360.0].into_iter().filter(move |off| {
            rect.is_some_and(|r| r.max().x + off >= x_bounds[0] && r.min().x + off <= x_bounds[1])
        })
    }

    /// Obszar płótna bez ramki, do zamiany kliknięć na współrzędne.
    pub fn inner(area: TuiRect) -> TuiRect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    /// Najpierw pinezki, potem wielokąty; poza nimi jest tło.
    pub fn pick(&self, atlas: &Atlas, viewport: &Viewport, at: LatLng) -> Interaction {
        let radius = PICK_RADIUS / viewport.zoom;
        let nearest = atlas
            .markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let dx = wrap_lng(m.coordinates.lng - at.lng);
                let dy = m.coordinates.lat - at.lat;
                (i, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = nearest {
            return Interaction::Marker(i);
        }
        match atlas.geometry.region_at(at) {
            Some(id) => Interaction::Region(id),
            None => Interaction::Background,
        }
    }

    /// Rysuje mapę: granice, podświetlony region, na końcu pinezki.
    pub fn render(
        &self,
        f: &mut Frame,
        area: TuiRect,
        title: &str,
        atlas: &Atlas,
        viewport: &Viewport,
        highlight: Option<RegionId>,
        active_markers: &[usize],
    ) {
        let x_bounds = viewport.x_bounds();
        let canvas = Canvas::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(viewport.y_bounds())
            .paint(|ctx| {
                // 1) wszystkie granice na biało
                for region in atlas.geometry.regions() {
                    for offset in self.visible_offsets(region.id, x_bounds) {
                        for poly in &region.geometry.0 {
                            draw_ring(ctx, poly.exterior(), offset, Color::White);
                        }
                    }
                }

                // 2) wybrany region na czerwono, nad resztą
                if let Some(region) = highlight.and_then(|id| atlas.geometry.get(id)) {
                    for offset in self.visible_offsets(region.id, x_bounds) {
                        for poly in &region.geometry.0 {
                            draw_ring(ctx, poly.exterior(), offset, Color::Red);
                        }
                    }
                }

                ctx.layer();

                for (i, marker) in atlas.markers.iter().enumerate() {
                    let active = active_markers.contains(&i);
                    let style = if active {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(marker_color(marker.color))
                    };
                    for offset in [-360.0, 0.0, 360.0] {
                        let x = marker.coordinates.lng + offset;
                        if x >= x_bounds[0] && x <= x_bounds[1] {
                            ctx.print(x, marker.coordinates.lat, Span::styled("▼", style));
                        }
                    }
                }
            });
        f.render_widget(canvas, area);
    }
}
