use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::trace;

use crate::atlas::Atlas;
use crate::geometry::{RegionId, parse_region_code};
use crate::map_draw::{MapView, Viewport};
use crate::modal::{ModalBody, ModalContent};
use crate::resolver::SelectionKey;
use crate::selection::{Effect, Interaction, PresentationAdapter, SelectionController, SelectionState};

/// To, co widać na ekranie. Zmieniane wyłącznie przez efekty z kontrolera.
#[derive(Debug, Default)]
pub struct Presentation {
    pub viewport: Viewport,
    pub highlight: Option<RegionId>,
    pub modal: Option<ModalContent>,
    pub slide: usize,
}

impl Presentation {
    fn slide_count(&self) -> usize {
        match self.modal.as_ref().map(|m| &m.body) {
            Some(ModalBody::Mission(sheet)) => sheet.slideshow.as_ref().map_or(0, Vec::len),
            _ => 0,
        }
    }

    pub fn next_slide(&mut self) {
        let n = self.slide_count();
        if n > 0 {
            self.slide = (self.slide + 1) % n;
        }
    }

    pub fn prev_slide(&mut self) {
        let n = self.slide_count();
        if n > 0 {
            self.slide = (self.slide + n - 1) % n;
        }
    }
}

impl PresentationAdapter for Presentation {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Highlight(region) => self.highlight = *region,
            Effect::FrameCamera(target) => self.viewport.frame(*target),
            Effect::ShowModal(content) => {
                self.modal = Some(content.clone());
                self.slide = 0;
            }
            Effect::HideModal => self.modal = None,
            Effect::AutoRotate(on) => {
                self.viewport.auto_rotate = *on;
                if *on {
                    self.viewport.release();
                }
            }
        }
    }

    fn on_selection_changed(&mut self, state: &SelectionState) {
        trace!(selected = ?state.selection().map(|s| &s.title), "presentation updated");
    }
}

pub struct AppState {
    pub atlas: Atlas,
    pub controller: SelectionController,
    pub map: MapView,
    pub view: Presentation,
    /// Obszar mapy z ostatniego rysowania, do trafiania kliknięć.
    pub map_area: Rect,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
Klik: wybór kraju lub pinezki
Klik w tło / Esc: odznaczenie
←/→: zdjęcia
q: wyjście";

    pub fn new(atlas: Atlas) -> Self {
        let controller = atlas.controller();
        let map = MapView::new(&atlas);
        Self {
            atlas,
            controller,
            map,
            view: Presentation::default(),
            map_area: Rect::default(),
        }
    }

    fn interact(&mut self, interaction: Interaction) {
        self.controller.dispatch(&self.atlas, interaction, &mut self.view);
    }

    /// Zwraca true, jeśli trzeba wyjść
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.interact(Interaction::Dismiss),
            KeyCode::Right => self.view.next_slide(),
            KeyCode::Left => self.view.prev_slide(),
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let inner = MapView::inner(self.map_area);
        let Some(at) = self.view.viewport.to_geo(inner, event.column, event.row) else {
            return;
        };
        let interaction = self.map.pick(&self.atlas, &self.view.viewport, at);
        self.interact(interaction);
    }

    pub fn tick(&mut self) {
        self.view.viewport.tick();
    }

    /// Pinezki odpowiadające bieżącemu zaznaczeniu.
    pub fn active_markers(&self) -> Vec<usize> {
        let Some(sel) = self.controller.state().selection() else {
            return Vec::new();
        };
        self.atlas
            .markers
            .iter()
            .enumerate()
            .filter(|(_, m)| match &sel.key {
                SelectionKey::Marker(id) => *id == m.id,
                SelectionKey::Region(region) => {
                    let by_code = m
                        .linked_region_code
                        .as_deref()
                        .and_then(parse_region_code)
                        .and_then(|c| self.atlas.geometry.find_by_code(c))
                        .is_some_and(|r| r.id == *region);
                    let by_mission = m
                        .linked_mission_name
                        .as_deref()
                        .and_then(|name| self.controller.resolver().geometry_name_for(name))
                        .and_then(|g| self.atlas.geometry.find_by_name(g))
                        .is_some_and(|r| r.id == *region);
                    by_code || by_mission
                }
            })
            .map(|(i, _)| i)
            .collect()
    }
}
