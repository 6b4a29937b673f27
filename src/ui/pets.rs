use crate::notice::Notice;
use crate::pets::desk::{PetDesk, UpdateOutcome};
use crate::pets::form::EditForm;
use crate::pets::listing::{PetListing, SelectionOption};
use crate::pets::query::{build_filter, SearchInput, FILTER_OPTIONS};
use crate::pets::store::PetStore;
use crate::ui::{hint_spans, notice_line, truncate, with_terminal};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchName,
    SearchPetText,
    PetFilter,
    Results,
    FormName,
    FormPet,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::SearchName,
        Focus::SearchPetText,
        Focus::PetFilter,
        Focus::Results,
        Focus::FormName,
        Focus::FormPet,
        Focus::Submit,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct PetsApp<S: PetStore> {
    pub desk: PetDesk<S>,
    pub input: SearchInput,
    pub listing: PetListing,
    pub options: Vec<SelectionOption>,
    pub list_state: ListState,
    pub form: Option<EditForm>,
    pub focus: Focus,
    /// Outcome of the last submit or fetch failure
    pub status: Option<Notice>,
}

impl<S: PetStore> PetsApp<S> {
    pub fn new(desk: PetDesk<S>) -> Self {
        let mut app = Self {
            desk,
            input: SearchInput::default(),
            listing: PetListing::default(),
            options: Vec::new(),
            list_state: ListState::default(),
            form: None,
            focus: Focus::SearchName,
            status: None,
        };
        app.refresh();
        app
    }

    /// Re-run the read pipeline for the current inputs and restart the
    /// selection from the first option
    pub fn refresh(&mut self) {
        let filter = build_filter(&self.input);

        self.listing = match self.desk.fetch(&filter) {
            Ok(records) => PetListing::new(records),
            Err(e) => {
                self.status = Some(Notice::error(format!("Fetching records failed: {}", e)));
                PetListing::default()
            }
        };
        self.options = self.listing.selection_options();
        self.select(if self.options.is_empty() { None } else { Some(0) });
    }

    fn select(&mut self, index: Option<usize>) {
        self.list_state.select(index);
        self.form = index
            .and_then(|i| self.options.get(i))
            .map(|option| EditForm::from_record(&option.record));
    }

    pub fn selected_option(&self) -> Option<&SelectionOption> {
        self.list_state.selected().and_then(|i| self.options.get(i))
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        let i = match (self.list_state.selected(), forward) {
            (Some(i), true) if i + 1 < len => i + 1,
            (_, true) => 0,
            (Some(0) | None, false) => len - 1,
            (Some(i), false) => i - 1,
        };
        self.select(Some(i));
    }

    fn cycle_filter(&mut self, forward: bool) {
        let len = FILTER_OPTIONS.len();
        let current = FILTER_OPTIONS
            .iter()
            .position(|p| *p == self.input.selected_pet)
            .unwrap_or(0);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.input.selected_pet = FILTER_OPTIONS[next].to_string();
        self.refresh();
    }

    pub fn submit(&mut self) -> Option<UpdateOutcome> {
        let form = self.form.as_ref()?;
        let outcome = form.submit(&mut self.desk);
        self.status = Some(outcome.notice());

        if outcome == UpdateOutcome::Updated {
            self.refresh();
        }
        Some(outcome)
    }

    fn edit_text(&mut self, key: KeyCode) {
        let target = match self.focus {
            Focus::SearchName => &mut self.input.search_name,
            Focus::SearchPetText => &mut self.input.search_pet_text,
            Focus::FormName => match self.form.as_mut() {
                Some(form) => &mut form.name,
                None => return,
            },
            _ => return,
        };

        match key {
            KeyCode::Char(c) => target.push(c),
            KeyCode::Backspace => {
                target.pop();
            }
            _ => return,
        }

        if matches!(self.focus, Focus::SearchName | Focus::SearchPetText) {
            self.refresh();
        }
    }

    /// Apply one key press; returns `true` when the dashboard should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match (key.code, self.focus) {
            (KeyCode::Esc, _) => return true,
            (KeyCode::Tab, _) => self.focus = self.focus.next(),
            (KeyCode::BackTab, _) => self.focus = self.focus.previous(),
            (KeyCode::Right, Focus::PetFilter) => self.cycle_filter(true),
            (KeyCode::Left, Focus::PetFilter) => self.cycle_filter(false),
            (KeyCode::Down, Focus::Results) => self.move_selection(true),
            (KeyCode::Up, Focus::Results) => self.move_selection(false),
            (KeyCode::Right, Focus::FormPet) => {
                if let Some(form) = self.form.as_mut() {
                    form.next_pet();
                }
            }
            (KeyCode::Left, Focus::FormPet) => {
                if let Some(form) = self.form.as_mut() {
                    form.previous_pet();
                }
            }
            (KeyCode::Enter, Focus::FormName | Focus::FormPet | Focus::Submit) => {
                self.submit();
            }
            (KeyCode::Char(_) | KeyCode::Backspace, _) => self.edit_text(key.code),
            _ => {}
        }
        false
    }
}

pub fn run_pets<S: PetStore>(app: &mut PetsApp<S>) -> Result<()> {
    with_terminal(|terminal| run_app(terminal, app))
}

fn run_app<B: ratatui::backend::Backend, S: PetStore>(
    terminal: &mut Terminal<B>,
    app: &mut PetsApp<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn input_box<'a>(title: &'a str, value: &'a str, active: bool) -> Paragraph<'a> {
    let cursor = if active { "▏" } else { "" };
    Paragraph::new(format!("{}{}", value, cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(active))
            .title(title),
    )
}

pub(crate) fn ui<S: PetStore>(f: &mut Frame, app: &mut PetsApp<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search inputs
            Constraint::Length(3), // Count / warning
            Constraint::Min(0),    // Results + form
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(Span::styled(
        "My pet 🐟😺🐶",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(title, chunks[0]);

    render_search(f, chunks[1], app);
    render_summary(f, chunks[2], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);

    render_results(f, body[0], app);
    render_form(f, body[1], app);
    render_status_bar(f, chunks[4], app);
}

fn render_search<S: PetStore>(f: &mut Frame, area: Rect, app: &PetsApp<S>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);

    f.render_widget(
        input_box(" Search by name ", &app.input.search_name, app.focus == Focus::SearchName),
        columns[0],
    );
    f.render_widget(
        input_box(" Search by pet ", &app.input.search_pet_text, app.focus == Focus::SearchPetText),
        columns[1],
    );

    let dropdown = format!("◀ {} ▶", app.input.selected_pet);
    f.render_widget(
        Paragraph::new(dropdown).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::PetFilter))
                .title(" Pet type "),
        ),
        columns[2],
    );
}

fn render_summary<S: PetStore>(f: &mut Frame, area: Rect, app: &PetsApp<S>) {
    let line = match app.desk.diagnostic() {
        Some(diagnostic) => notice_line(diagnostic),
        None if !app.desk.is_connected() => Line::from("No database connection"),
        None => match app.listing.empty_notice() {
            Some(warning) => notice_line(&warning),
            None => notice_line(&app.listing.count_notice()),
        },
    };

    f.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_results<S: PetStore>(f: &mut Frame, area: Rect, app: &mut PetsApp<S>) {
    let items: Vec<ListItem> = app
        .options
        .iter()
        .map(|o| ListItem::new(truncate(&o.label, area.width.saturating_sub(4) as usize)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Results))
                .title(format!(" Records ({}) ", app.listing.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_form<S: PetStore>(f: &mut Frame, area: Rect, app: &PetsApp<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" 📝 Edit record ");

    let Some(form) = app.form.as_ref() else {
        f.render_widget(
            Paragraph::new("Search for records, or wait for data, to edit one.").block(block),
            area,
        );
        return;
    };

    let field = |label: &'static str, value: String, focus: Focus| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, focus_style(app.focus == focus)),
        ])
    };

    let name_cursor = if app.focus == Focus::FormName { "▏" } else { "" };
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<10}", "ID"), Style::default().fg(Color::DarkGray)),
            Span::styled(form.id_text(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        field("Name", format!("{}{}", form.name, name_cursor), Focus::FormName),
        field("Pet", format!("◀ {} ▶", form.pet()), Focus::FormPet),
        Line::from(""),
        field("", "[ 💾 Save changes ]".to_string(), Focus::Submit),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar<S: PetStore>(f: &mut Frame, area: Rect, app: &PetsApp<S>) {
    let mut spans = Vec::new();
    if let Some(status) = &app.status {
        spans.extend(notice_line(status).spans);
        spans.push(Span::raw("  "));
    }
    spans.extend(hint_spans(&[
        ("Tab", "Focus"),
        ("←/→", "Choose"),
        ("↑/↓", "Select"),
        ("Enter", "Save"),
        ("Esc", "Quit"),
    ]));

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        ),
        area,
    );
}
