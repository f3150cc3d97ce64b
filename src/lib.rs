//! Interaktywna mapa świata: wybór kraju i dopasowanie danych z trzech
//! niezależnych źródeł (geometria, statystyki krajów, opisy misji).

pub mod atlas;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod map_draw;
pub mod markers;
pub mod modal;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod ui;

pub use atlas::{Atlas, AtlasConfig};
pub use error::{AtlasError, Result};
pub use resolver::{BrowseMode, Resolver, Selection};
pub use selection::{Effect, Interaction, PresentationAdapter, SelectionController, SelectionState, reduce};
