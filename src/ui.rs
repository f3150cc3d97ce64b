use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use crate::modal::{FactSheet, MissionSheet, ModalBody, ModalContent, PLACEHOLDER};
use crate::resolver::BrowseMode;
use crate::state::AppState;

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Percentage(30),
        ].as_ref())
        .split(f.area());

    // Lewa strona: mapa
    state.map_area = chunks[0];
    let title = match state.atlas.mode {
        BrowseMode::Stats => "Świat",
        BrowseMode::Missions => "Mapa misji",
    };
    let active = state.active_markers();
    state.map.render(
        f,
        chunks[0],
        title,
        &state.atlas,
        &state.view.viewport,
        state.view.highlight,
        &active,
    );

    // Prawa strona: okno informacji albo pomoc
    match &state.view.modal {
        Some(modal) => draw_modal(f, chunks[1], modal, state.view.slide),
        None => {
            let help = Paragraph::new(AppState::HELP_TEXT)
                .block(Block::default().borders(Borders::ALL).title("Informacje"))
                .wrap(Wrap { trim: true });
            f.render_widget(help, chunks[1]);
        }
    }
}

fn field<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn draw_modal(f: &mut Frame, area: Rect, modal: &ModalContent, slide: usize) {
    match &modal.body {
        ModalBody::Facts(facts) => draw_facts(f, area, &modal.title, facts),
        ModalBody::Mission(sheet) => draw_mission(f, area, &modal.title, sheet, slide),
    }
}

fn draw_facts(f: &mut Frame, area: Rect, title: &str, facts: &FactSheet) {
    let lines = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::default(),
        field("Ludność", &facts.population),
        field("Region", &facts.region),
        field("Stolica", &facts.capital),
        field("Flaga", facts.flag_url.as_deref().unwrap_or(PLACEHOLDER)),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Informacje"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_mission(f: &mut Frame, area: Rect, title: &str, sheet: &MissionSheet, slide: usize) {
    // Bez zdjęć panel pokazu slajdów znika całkiem.
    let constraints = if sheet.slideshow.is_some() {
        vec![Constraint::Length(3), Constraint::Min(4), Constraint::Length(6)]
    } else {
        vec![Constraint::Length(3), Constraint::Min(4)]
    };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
    ])
    .block(Block::default().borders(Borders::ALL).title(sheet.flag_url.as_str()));
    f.render_widget(header, parts[0]);

    let items: Vec<ListItem> = sheet
        .stats
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled(s.value.as_str(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(s.label.as_str(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let stats = List::new(items).block(Block::default().borders(Borders::ALL).title("Statystyki"));
    f.render_widget(stats, parts[1]);

    if let Some(slides) = &sheet.slideshow {
        let idx = slide.min(slides.len().saturating_sub(1));
        let current = &slides[idx];
        let body = Paragraph::new(vec![
            Line::from(current.caption.as_str()),
            Line::from(Span::styled(current.src.as_str(), Style::default().fg(Color::DarkGray))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Zdjęcie {}/{}", idx + 1, slides.len())),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(body, parts[2]);
    }
}
