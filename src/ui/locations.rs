use crate::locations::report::LocationReport;
use crate::locations::table::StoreTable;
use crate::ui::{hint_spans, notice_line, truncate, with_terminal};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;

/// Longitude/latitude box framing Thailand
const THAILAND_LON: [f64; 2] = [97.0, 106.0];
const THAILAND_LAT: [f64; 2] = [5.0, 21.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    RawData,
    Cities,
    Thailand,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::RawData => Page::Cities,
            Page::Cities => Page::Thailand,
            Page::Thailand => Page::RawData,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::RawData => Page::Thailand,
            Page::Cities => Page::RawData,
            Page::Thailand => Page::Cities,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::RawData => "Raw data",
            Page::Cities => "Top cities",
            Page::Thailand => "Thailand",
        }
    }
}

pub struct LocationsApp {
    pub table: Arc<StoreTable>,
    pub report: LocationReport,
    pub show_details: bool,
    pub current_page: Page,
    pub raw_state: TableState,
}

impl LocationsApp {
    pub fn new(table: Arc<StoreTable>) -> Self {
        let report = LocationReport::build(&table, false);

        let mut raw_state = TableState::default();
        if !table.is_empty() {
            raw_state.select(Some(0));
        }

        Self {
            table,
            report,
            show_details: false,
            current_page: Page::RawData,
            raw_state,
        }
    }

    /// Flip the detail-table toggle and rebuild the report
    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
        self.report = LocationReport::build(&self.table, self.show_details);
    }

    pub fn next(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.raw_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.raw_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.raw_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.raw_state.select(Some(i));
    }

    /// Apply one key press; returns `true` when the dashboard should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.current_page = self.current_page.next(),
            KeyCode::BackTab => self.current_page = self.current_page.previous(),
            KeyCode::Char('d') => self.toggle_details(),
            KeyCode::Down | KeyCode::Char('j') if self.current_page == Page::RawData => self.next(),
            KeyCode::Up | KeyCode::Char('k') if self.current_page == Page::RawData => self.previous(),
            _ => {}
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        false
    }
}

pub fn run_locations(app: &mut LocationsApp) -> Result<()> {
    with_terminal(|terminal| run_app(terminal, app))
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut LocationsApp,
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

pub(crate) fn ui(f: &mut Frame, app: &mut LocationsApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::RawData => render_raw(f, chunks[1], app),
        Page::Cities => render_cities(f, chunks[1], app),
        Page::Thailand => render_thailand(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &LocationsApp) {
    let mut spans = vec![Span::styled(
        "☕ Store Locations  ",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in [Page::RawData, Page::Cities, Page::Thailand].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Rows: {}", app.table.len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn table_widget<'a>(table: &'a StoreTable, title: String) -> Table<'a> {
    let header = Row::new(table.columns.iter().map(|c| {
        Cell::from(c.as_str()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = table
        .rows
        .iter()
        .map(|r| Row::new(r.iter().map(|v| Cell::from(truncate(v, 24)))).height(1));

    let widths = vec![Constraint::Min(8); table.columns.len().max(1)];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ")
}

fn render_raw(f: &mut Frame, area: Rect, app: &mut LocationsApp) {
    let table = Arc::clone(&app.table);
    let widget = table_widget(&table, format!(" Raw data ({} rows) ", table.len()));
    f.render_stateful_widget(widget, area, &mut app.raw_state);
}

fn bar_chart<'a>(data: &'a [(&'a str, u64)], title: &'a str, color: Color) -> BarChart<'a> {
    BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
        .data(data)
}

fn chart_data(counts: &[(String, usize)]) -> Vec<(&str, u64)> {
    counts.iter().map(|(label, count)| (label.as_str(), *count as u64)).collect()
}

fn render_cities(f: &mut Frame, area: Rect, app: &LocationsApp) {
    match app.report.city_counts() {
        Some(counts) => {
            let data = chart_data(counts);
            let chart = bar_chart(&data, " Top 20 store locations by city ", Color::Cyan);
            f.render_widget(chart, area);
        }
        None => {
            let lines: Vec<Line> = app.report.notices().map(notice_line).collect();
            f.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Top cities ")),
                area,
            );
        }
    }
}

fn map_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let mut lon = THAILAND_LON;
    let mut lat = THAILAND_LAT;
    for (la, lo) in points {
        lon = [lon[0].min(*lo - 1.0), lon[1].max(*lo + 1.0)];
        lat = [lat[0].min(*la - 1.0), lat[1].max(*la + 1.0)];
    }
    (lon, lat)
}

fn render_map(f: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    // Canvas coordinates are (x, y) = (longitude, latitude)
    let coords: Vec<(f64, f64)> = points.iter().map(|(lat, lon)| (*lon, *lat)).collect();
    let (x_bounds, y_bounds) = map_bounds(points);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" 📍 Stores in Thailand ({} points) ", points.len())),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Green,
            });
        });

    f.render_widget(canvas, area);
}

fn render_thailand(f: &mut Frame, area: Rect, app: &LocationsApp) {
    let notices: Vec<Line> = app.report.notices().map(notice_line).collect();
    let notice_height = notices.len() as u16 + 2;

    let Some(points) = app.report.map_points() else {
        let body = Paragraph::new(notices).block(Block::default().borders(Borders::ALL).title(" Thailand "));
        f.render_widget(body, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(notice_height), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(notices).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_map(f, body[0], points);

    let right = match app.report.detail_table() {
        Some(_) => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body[1]),
        None => Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(100)])
            .split(body[1]),
    };

    if let Some(detail) = app.report.detail_table() {
        f.render_widget(table_widget(detail, " Thailand stores ".to_string()), right[0]);
    }

    let province_area = right[right.len() - 1];
    match app.report.province_counts() {
        Some(counts) => {
            let data = chart_data(counts);
            f.render_widget(
                bar_chart(&data, " 🏆 Top 10 provinces ", Color::Magenta),
                province_area,
            );
        }
        None => f.render_widget(
            Paragraph::new("No state/province column")
                .block(Block::default().borders(Borders::ALL).title(" 🏆 Top 10 provinces ")),
            province_area,
        ),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let spans = hint_spans(&[
        ("Tab", "Page"),
        ("↑/↓", "Nav"),
        ("d", "Toggle detail table"),
        ("q", "Quit"),
    ]);

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
