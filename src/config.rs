use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::atlas::AtlasConfig;
use crate::resolver::BrowseMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Wszystkie kraje z ogólnymi danymi (ludność, stolica, flaga).
    Stats,
    /// Tylko kraje misyjne z opisem i zdjęciami.
    Missions,
}

impl From<ModeArg> for BrowseMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Stats => BrowseMode::Stats,
            ModeArg::Missions => BrowseMode::Missions,
        }
    }
}

/// Interaktywna mapa świata w terminalu.
#[derive(Debug, Parser)]
#[command(name = "rust_atlas", version, about)]
pub struct Cli {
    /// Katalog z world.geojson i plikami danych.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Wariant przeglądania.
    #[arg(long, value_enum, default_value_t = ModeArg::Missions)]
    pub mode: ModeArg,

    /// Liczba pinezek najludniejszych krajów (wariant stats).
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Plik logu; terminal jest zajęty przez interfejs.
    #[arg(long, default_value = "rust_atlas.log")]
    pub log_file: PathBuf,

    /// Więcej szczegółów w logu (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn atlas_config(&self) -> AtlasConfig {
        AtlasConfig {
            data_dir: self.data_dir.clone(),
            mode: self.mode.into(),
            top: self.top,
        }
    }
}
