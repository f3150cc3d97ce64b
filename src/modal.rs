use crate::data::{MissionRecord, RecordStore, StatRecord};
use crate::resolver::{RecordRef, Selection};

/// Tekst pokazywany zamiast brakującej wartości.
pub const PLACEHOLDER: &str = "N/A";

/// Etykieta wiersza zastępczego, gdy misja nie ma statystyk.
pub const NO_STATS_LABEL: &str = "Brak statystyk";

const FLAG_CDN: &str = "https://flagcdn.com/w320";

/// Dane okna informacji, gotowe do narysowania.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalContent {
    pub title: String,
    pub body: ModalBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModalBody {
    Facts(FactSheet),
    Mission(MissionSheet),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FactSheet {
    pub population: String,
    pub region: String,
    pub capital: String,
    pub flag_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatEntry {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    pub src: String,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MissionSheet {
    pub flag_url: String,
    /// Nigdy puste: bez statystyk zawiera jeden wiersz zastępczy.
    pub stats: Vec<StatEntry>,
    /// `None` ukrywa panel pokazu slajdów.
    pub slideshow: Option<Vec<Slide>>,
}

/// Grupuje cyfry po trzy: `38000000` → `38,000,000`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

impl FactSheet {
    pub fn from_record(record: &StatRecord) -> Self {
        Self {
            population: record
                .population
                .map(format_grouped)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            region: or_placeholder(Some(&record.region_label)),
            capital: or_placeholder(record.capital.as_deref()),
            flag_url: record.flag_url.clone(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            population: PLACEHOLDER.to_string(),
            region: PLACEHOLDER.to_string(),
            capital: PLACEHOLDER.to_string(),
            flag_url: None,
        }
    }
}

impl MissionSheet {
    pub fn from_record(record: &MissionRecord) -> Self {
        let mut stats: Vec<StatEntry> = record
            .stats
            .iter()
            .map(|s| StatEntry {
                label: s.label.clone(),
                value: or_placeholder(Some(&s.value)),
            })
            .collect();
        if stats.is_empty() {
            stats.push(StatEntry {
                label: NO_STATS_LABEL.to_string(),
                value: PLACEHOLDER.to_string(),
            });
        }

        let slideshow = (!record.images.is_empty()).then(|| {
            record
                .images
                .iter()
                .map(|img| Slide {
                    src: img.src.clone(),
                    caption: img.caption.clone(),
                })
                .collect()
        });

        Self {
            flag_url: format!("{FLAG_CDN}/{}.png", record.flag_country_code.to_lowercase()),
            stats,
            slideshow,
        }
    }
}

impl ModalContent {
    pub fn for_selection(selection: &Selection, records: &RecordStore) -> Self {
        let body = match selection.record {
            Some(RecordRef::Stat(id)) => ModalBody::Facts(FactSheet::from_record(records.stat(id))),
            Some(RecordRef::Point(id)) => ModalBody::Facts(FactSheet::from_record(&records.point(id).record)),
            Some(RecordRef::Mission(id)) => ModalBody::Mission(MissionSheet::from_record(records.mission(id))),
            None => ModalBody::Facts(FactSheet::unknown()),
        };
        Self {
            title: selection.title.clone(),
            body,
        }
    }
}
