//! Maszyna stanów zaznaczenia.
//!
//! Całe przejście stanu i jego skutki uboczne liczy czysta funkcja
//! [`reduce`]. [`SelectionController`] jest jedynym właścicielem stanu;
//! kliknięcia wielokątów i pinezek przechodzą przez ten sam [`Resolver`] i to
//! samo przejście.

use tracing::debug;

use crate::atlas::Atlas;
use crate::data::{MissionRecord, RecordStore};
use crate::geometry::{LatLng, RegionId};
use crate::modal::ModalContent;
use crate::resolver::{RecordRef, Resolver, Selection};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(Selection),
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Idle => None,
            Self::Selected(sel) => Some(sel),
        }
    }

    pub fn selected_region(&self) -> Option<RegionId> {
        self.selection()?.region
    }

    pub fn selected_mission<'a>(&self, records: &'a RecordStore) -> Option<&'a MissionRecord> {
        match self.selection()?.record? {
            RecordRef::Mission(id) => Some(records.mission(id)),
            _ => None,
        }
    }
}

/// Zdarzenie po rozstrzygnięciu celu kliknięcia.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Pick(Selection),
    Background,
    Dismiss,
}

/// Skutki przejścia, w kolejności wykonania.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Jedyny podświetlony region; `None` gasi podświetlenie.
    Highlight(Option<RegionId>),
    /// Nowy cel kamery zastępuje poprzedni.
    FrameCamera(LatLng),
    ShowModal(ModalContent),
    HideModal,
    AutoRotate(bool),
}

fn enter(selection: Selection, records: &RecordStore) -> (SelectionState, Vec<Effect>) {
    let mut effects = vec![Effect::Highlight(selection.region)];
    if let Some(focus) = selection.focus {
        effects.push(Effect::FrameCamera(focus));
    }
    effects.push(Effect::ShowModal(ModalContent::for_selection(&selection, records)));
    effects.push(Effect::AutoRotate(false));
    (SelectionState::Selected(selection), effects)
}

fn leave() -> (SelectionState, Vec<Effect>) {
    (
        SelectionState::Idle,
        vec![Effect::Highlight(None), Effect::HideModal, Effect::AutoRotate(true)],
    )
}

pub fn reduce(state: &SelectionState, event: Event, records: &RecordStore) -> (SelectionState, Vec<Effect>) {
    match (state, event) {
        (SelectionState::Selected(current), Event::Pick(next)) if current.key == next.key => leave(),
        (_, Event::Pick(next)) => enter(next, records),
        (SelectionState::Selected(_), Event::Background | Event::Dismiss) => leave(),
        (SelectionState::Idle, Event::Background | Event::Dismiss) => (SelectionState::Idle, Vec::new()),
    }
}

/// Cel pojedynczej interakcji użytkownika.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    Region(RegionId),
    /// Indeks w `Atlas::markers`.
    Marker(usize),
    Background,
    Dismiss,
}

/// Strona prezentacji: rysuje podświetlenie, kamerę i okno informacji.
pub trait PresentationAdapter {
    fn apply(&mut self, effect: &Effect);

    fn on_selection_changed(&mut self, _state: &SelectionState) {}
}

#[derive(Debug)]
pub struct SelectionController {
    state: SelectionState,
    resolver: Resolver,
}

impl SelectionController {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            state: SelectionState::Idle,
            resolver,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn to_event(&self, atlas: &Atlas, interaction: Interaction) -> Option<Event> {
        match interaction {
            Interaction::Region(id) => self
                .resolver
                .resolve_region(&atlas.geometry, &atlas.records, id)
                .map(Event::Pick),
            Interaction::Marker(i) => {
                let marker = atlas.markers.get(i)?;
                self.resolver
                    .resolve_marker(&atlas.geometry, &atlas.records, marker)
                    .map(Event::Pick)
            }
            Interaction::Background => Some(Event::Background),
            Interaction::Dismiss => Some(Event::Dismiss),
        }
    }

    /// Przetwarza jedno kliknięcie. Pusta lista oznacza brak zmiany stanu.
    pub fn handle(&mut self, atlas: &Atlas, interaction: Interaction) -> Vec<Effect> {
        let Some(event) = self.to_event(atlas, interaction) else {
            debug!(?interaction, "click on non-interactive target ignored");
            return Vec::new();
        };
        let (next, effects) = reduce(&self.state, event, &atlas.records);
        if next != self.state {
            debug!(
                from = ?self.state.selection().map(|s| &s.title),
                to = ?next.selection().map(|s| &s.title),
                "selection changed"
            );
        }
        self.state = next;
        effects
    }

    pub fn dispatch<A: PresentationAdapter + ?Sized>(&mut self, atlas: &Atlas, interaction: Interaction, adapter: &mut A) {
        let effects = self.handle(atlas, interaction);
        if effects.is_empty() {
            return;
        }
        for effect in &effects {
            adapter.apply(effect);
        }
        adapter.on_selection_changed(&self.state);
    }
}
