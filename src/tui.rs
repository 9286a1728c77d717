use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use miette::IntoDiagnostic;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::domain::{Evolution, PokemonType, Record, capitalize, format_id, stat_label};
use crate::evolution::{EvolutionPanel, resolve_evolutions};
use crate::list::{Accumulator, ListPhase, LoadOutcome};
use crate::output::stat_bar;
use crate::scroll::{LoadContext, SentinelObserver, Viewport, sentinel_visible};
use crate::search::{self, FilterCache};

const LOGS_MAX: usize = 200;
const CARD_WIDTH: u16 = 30;
const HINTS: &[&str] = &[
    "/ search  Esc clear  Enter details  r reload  q quit",
    "Search by name, number, type or ability",
    "Arrows move, PgUp/PgDn jump a screen",
    "Tab walks the evolution line, Enter opens an entry",
];

enum WorkerMessage {
    Page(Result<LoadOutcome, String>),
    Evolutions { id: u32, evolutions: Vec<Evolution> },
    Record { id: u32, result: Result<Record, String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Grid,
    Search,
    Evolutions,
}

struct Snapshot {
    records: Vec<Record>,
    visible: Vec<usize>,
    loading: bool,
    has_more: bool,
    phase: ListPhase,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct GridGeometry {
    columns: usize,
    height: usize,
}

pub struct Tui<C: CatalogClient + 'static> {
    catalog: Arc<C>,
    list: Arc<Accumulator<Arc<C>>>,
    settings: Settings,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    focus: Focus,
    input: String,
    query: String,
    debouncer: Debouncer<String>,
    filter_cache: FilterCache,
    observer: SentinelObserver,
    selected: usize,
    scroll: usize,
    geometry: GridGeometry,
    detail: Option<Record>,
    panel: EvolutionPanel,
    pending_open: Option<u32>,
    logs: VecDeque<String>,
    started: Instant,
}

impl<C: CatalogClient + 'static> Tui<C> {
    pub fn new(catalog: Arc<C>, settings: Settings) -> Self {
        let (tx, rx) = mpsc::channel();
        let list = Arc::new(Accumulator::new(Arc::clone(&catalog), settings.page_size));
        Self {
            catalog,
            list,
            debouncer: Debouncer::new(settings.search_debounce),
            observer: SentinelObserver::new(settings.scroll),
            settings,
            tx,
            rx,
            focus: Focus::Grid,
            input: String::new(),
            query: String::new(),
            filter_cache: FilterCache::default(),
            selected: 0,
            scroll: 0,
            geometry: GridGeometry::default(),
            detail: None,
            panel: EvolutionPanel::default(),
            pending_open: None,
            logs: VecDeque::new(),
            started: Instant::now(),
        }
    }

    pub fn run(&mut self) -> miette::Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().into_diagnostic()?;
        stdout.execute(EnterAlternateScreen).into_diagnostic()?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).into_diagnostic()?;
        terminal.clear().into_diagnostic()?;

        self.push_log(format!("catalog {}", self.settings.base_url));
        self.spawn_load();
        let result = self.event_loop(&mut terminal);

        disable_raw_mode().into_diagnostic()?;
        let mut stdout = io::stdout();
        stdout.execute(LeaveAlternateScreen).into_diagnostic()?;
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> miette::Result<()> {
        loop {
            self.drain_messages();
            if let Some(query) = self.debouncer.poll(Instant::now()) {
                self.apply_query(query);
            }

            let snapshot = self.snapshot();
            terminal
                .draw(|f| draw_ui(f, self, &snapshot))
                .into_diagnostic()?;
            self.check_sentinel(&snapshot);

            if event::poll(Duration::from_millis(120)).into_diagnostic()? {
                if let Event::Key(key) = event::read().into_diagnostic()? {
                    if self.handle_key(key, &snapshot) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn snapshot(&mut self) -> Snapshot {
        let (records, version, loading, has_more, phase, error) = self.list.with_state(|state| {
            (
                state.records().to_vec(),
                state.version(),
                state.is_loading(),
                state.has_more(),
                state.phase(),
                state.error().map(str::to_string),
            )
        });
        let visible = self
            .filter_cache
            .indices(version, &records, &self.query)
            .to_vec();
        Snapshot {
            records,
            visible,
            loading,
            has_more,
            phase,
            error,
        }
    }

    fn check_sentinel(&mut self, snapshot: &Snapshot) {
        let geometry = self.geometry;
        if geometry.columns == 0 {
            return;
        }
        let viewport = Viewport {
            offset: self.scroll,
            height: geometry.height,
            content_len: snapshot.visible.len().div_ceil(geometry.columns),
        };
        let visible = sentinel_visible(viewport, self.settings.scroll.lookahead);
        let ctx = LoadContext {
            loading: snapshot.loading,
            has_more: snapshot.has_more,
            query: self.query.clone(),
            filtered: snapshot.visible.len(),
            loaded: snapshot.records.len(),
        };
        if self.observer.observe(visible, &ctx) {
            self.spawn_load();
        }
    }

    fn spawn_load(&mut self) {
        let list = Arc::clone(&self.list);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = list.load_more().map_err(|err| err.to_string());
            let _ = tx.send(WorkerMessage::Page(result));
        });
    }

    fn spawn_reset(&mut self) {
        self.selected = 0;
        self.scroll = 0;
        self.close_detail();
        self.push_log("reloading catalog".to_string());
        let list = Arc::clone(&self.list);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = list.reset().map_err(|err| err.to_string());
            let _ = tx.send(WorkerMessage::Page(result));
        });
    }

    fn open_detail(&mut self, record: Record) {
        self.pending_open = None;
        self.panel.begin(record.id);
        self.push_log(format!("resolving evolutions for {}", record.name));
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        let target = record.clone();
        thread::spawn(move || {
            let evolutions = resolve_evolutions(catalog.as_ref(), &target);
            let _ = tx.send(WorkerMessage::Evolutions {
                id: target.id,
                evolutions,
            });
        });
        self.detail = Some(record);
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.pending_open = None;
        self.panel.reset();
        if self.focus == Focus::Evolutions {
            self.focus = Focus::Grid;
        }
    }

    fn open_evolution(&mut self, snapshot: &Snapshot) {
        let Some(target) = self.panel.cursor().map(|evolution| evolution.id) else {
            return;
        };
        self.focus = Focus::Grid;
        if self.panel.selected() == Some(target) {
            return;
        }
        if let Some(position) = snapshot
            .visible
            .iter()
            .position(|index| snapshot.records.get(*index).is_some_and(|r| r.id == target))
        {
            self.move_selection(position as isize - self.selected as isize, snapshot);
        }
        if let Some(record) = snapshot.records.iter().find(|record| record.id == target) {
            self.open_detail(record.clone());
            return;
        }

        self.pending_open = Some(target);
        self.push_log(format!("fetching #{}", format_id(target)));
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let reference = catalog.record_reference(&target.to_string());
            let result = catalog
                .fetch_record(&reference)
                .map_err(|err| err.to_string());
            let _ = tx.send(WorkerMessage::Record { id: target, result });
        });
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                WorkerMessage::Page(Ok(LoadOutcome::Loaded { added })) => {
                    self.push_log(format!("page loaded, {added} new"));
                }
                WorkerMessage::Page(Ok(LoadOutcome::Exhausted)) => {
                    self.push_log("end of catalog".to_string());
                }
                WorkerMessage::Page(Ok(LoadOutcome::Skipped)) => {}
                WorkerMessage::Page(Err(err)) => {
                    self.push_log(format!("load failed: {err}"));
                }
                WorkerMessage::Evolutions { id, evolutions } => {
                    let count = evolutions.len();
                    if self.panel.finish(id, evolutions) {
                        self.push_log(format!("evolutions resolved, {count} entries"));
                    }
                }
                WorkerMessage::Record { id, result } => {
                    if self.pending_open != Some(id) {
                        continue;
                    }
                    self.pending_open = None;
                    match result {
                        Ok(record) => self.open_detail(record),
                        Err(err) => self.push_log(format!("open failed: {err}")),
                    }
                }
            }
        }
    }

    fn apply_query(&mut self, query: String) {
        if query != self.query {
            self.query = query;
            self.selected = 0;
            self.scroll = 0;
        }
    }

    fn clear_search(&mut self) {
        self.input.clear();
        let query = self.debouncer.flush(String::new());
        self.apply_query(query);
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &Snapshot) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match self.focus {
            Focus::Search => {
                self.handle_search_key(key);
                false
            }
            Focus::Grid => self.handle_grid_key(key, snapshot),
            Focus::Evolutions => self.handle_evolution_key(key, snapshot),
        }
    }

    fn handle_evolution_key(&mut self, key: KeyEvent, snapshot: &Snapshot) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::Right => self.panel.next_entry(),
            KeyCode::BackTab | KeyCode::Left => self.panel.previous_entry(),
            KeyCode::Enter => self.open_evolution(snapshot),
            KeyCode::Esc => self.focus = Focus::Grid,
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if !self.input.is_empty() {
                    self.clear_search();
                }
                self.focus = Focus::Grid;
            }
            KeyCode::Enter | KeyCode::Down => {
                let query = self.debouncer.flush(self.input.clone());
                self.apply_query(query);
                self.focus = Focus::Grid;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.debouncer.update(self.input.clone(), Instant::now());
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                self.debouncer.update(self.input.clone(), Instant::now());
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent, snapshot: &Snapshot) -> bool {
        let columns = self.geometry.columns.max(1);
        let page = columns * self.geometry.height.max(1);
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('r') => self.spawn_reset(),
            KeyCode::Tab | KeyCode::BackTab => {
                if self.detail.is_some() && self.panel.has_lineage() {
                    self.focus = Focus::Evolutions;
                }
            }
            KeyCode::Esc => {
                if search::is_active(&self.input) || search::is_active(&self.query) {
                    self.clear_search();
                } else if self.detail.is_some() {
                    self.close_detail();
                }
            }
            KeyCode::Left => self.move_selection(-1, snapshot),
            KeyCode::Right => self.move_selection(1, snapshot),
            KeyCode::Up => self.move_selection(-(columns as isize), snapshot),
            KeyCode::Down => self.move_selection(columns as isize, snapshot),
            KeyCode::PageUp => self.move_selection(-(page as isize), snapshot),
            KeyCode::PageDown => self.move_selection(page as isize, snapshot),
            KeyCode::Enter => {
                if let Some(record) = snapshot
                    .visible
                    .get(self.selected)
                    .and_then(|index| snapshot.records.get(*index))
                {
                    self.open_detail(record.clone());
                }
            }
            _ => {}
        }
        false
    }

    fn move_selection(&mut self, delta: isize, snapshot: &Snapshot) {
        if snapshot.visible.is_empty() {
            return;
        }
        let last = snapshot.visible.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        let columns = self.geometry.columns.max(1);
        let height = self.geometry.height.max(1);
        let row = self.selected / columns;
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }

    fn push_log(&mut self, message: String) {
        self.logs
            .push_back(format!("[{}] {message}", chrono::Local::now().format("%H:%M:%S")));
        while self.logs.len() > LOGS_MAX {
            self.logs.pop_front();
        }
    }
}

fn draw_ui<C: CatalogClient + 'static>(
    f: &mut ratatui::Frame,
    tui: &mut Tui<C>,
    snapshot: &Snapshot,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    f.render_widget(draw_header(tui, snapshot), chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_grid(f, tui, snapshot, main[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(6),
        ])
        .split(main[1]);
    f.render_widget(draw_detail(tui, snapshot), side[0]);
    f.render_widget(draw_evolutions(tui), side[1]);
    f.render_widget(draw_logs(tui), side[2]);

    draw_search_line(f, tui, chunks[2]);
}

fn draw_header<C: CatalogClient + 'static>(
    tui: &Tui<C>,
    snapshot: &Snapshot,
) -> Paragraph<'static> {
    let status = match (snapshot.phase, snapshot.loading) {
        (ListPhase::LoadingInitial, true) => ("loading", Color::Yellow),
        (ListPhase::LoadingMore, true) => ("loading more", Color::Yellow),
        (ListPhase::Resetting, _) => ("reloading", Color::Yellow),
        _ if snapshot.error.is_some() => ("error", Color::Red),
        _ if !snapshot.has_more => ("complete", Color::Green),
        _ => ("ready", Color::Green),
    };
    let title = Line::from(vec![
        Span::styled(
            "POKEDEX",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(env!("CARGO_PKG_VERSION"), Style::default().fg(Color::Gray)),
        Span::raw("   Status: "),
        Span::styled(status.0, Style::default().fg(status.1)),
        Span::styled(
            format!("   up {}s", tui.started.elapsed().as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let counts = if search::is_active(&tui.query) {
        format!(
            "{} match(es) for \"{}\" in {} loaded",
            snapshot.visible.len(),
            tui.query.trim(),
            snapshot.records.len()
        )
    } else {
        format!("{} loaded", snapshot.records.len())
    };
    let mut second = vec![Span::styled(counts, Style::default().fg(Color::Gray))];
    if let Some(error) = &snapshot.error {
        second.push(Span::styled(
            format!("   {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    Paragraph::new(vec![title, Line::from(second)])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::BOTTOM))
}

fn draw_grid<C: CatalogClient + 'static>(
    f: &mut ratatui::Frame,
    tui: &mut Tui<C>,
    snapshot: &Snapshot,
    area: Rect,
) {
    let block = Block::default().borders(Borders::RIGHT);
    let inner = block.inner(area);
    let columns = usize::from((inner.width / CARD_WIDTH).max(1));
    let height = usize::from(inner.height);
    tui.geometry = GridGeometry { columns, height };

    let rows = snapshot.visible.len().div_ceil(columns);
    let mut lines = Vec::with_capacity(height);
    for row in tui.scroll..(tui.scroll + height).min(rows) {
        let mut spans = Vec::with_capacity(columns);
        for column in 0..columns {
            let position = row * columns + column;
            let Some(record) = snapshot
                .visible
                .get(position)
                .and_then(|index| snapshot.records.get(*index))
            else {
                break;
            };
            spans.extend(card_spans(record, position == tui.selected));
        }
        lines.push(Line::from(spans));
    }

    if lines.len() < height {
        let footer = if snapshot.loading {
            Span::styled("Loading more Pokemon...", Style::default().fg(Color::Yellow))
        } else if snapshot.visible.is_empty() && search::is_active(&tui.query) {
            Span::styled(
                "No Pokemon found. Try another search term.",
                Style::default().fg(Color::Gray),
            )
        } else if !snapshot.has_more {
            Span::styled("End of the Pokedex.", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw("")
        };
        lines.push(Line::from(footer));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn card_spans(record: &Record, selected: bool) -> Vec<Span<'static>> {
    let base = if selected {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let name = truncate(&capitalize(&record.name), 14);
    let kind = record.primary_type();
    let width = usize::from(CARD_WIDTH);
    let label = format!("#{} {name:<14}", format_id(record.id));
    let tag = kind.map(|kind| kind.as_str()).unwrap_or("");
    let used = label.chars().count() + 1 + tag.chars().count();
    vec![
        Span::styled(label, base),
        Span::styled(" ", base),
        Span::styled(
            tag.to_string(),
            base.fg(kind.map(type_color).unwrap_or(Color::Gray)),
        ),
        Span::styled(" ".repeat(width.saturating_sub(used)), base),
    ]
}

fn draw_detail<C: CatalogClient + 'static>(
    tui: &Tui<C>,
    snapshot: &Snapshot,
) -> Paragraph<'static> {
    let highlighted = snapshot
        .visible
        .get(tui.selected)
        .and_then(|index| snapshot.records.get(*index));
    let record = tui.detail.as_ref().or(highlighted);
    let title = if tui.detail.is_some() {
        "DETAILS"
    } else {
        "PREVIEW (Enter for evolutions)"
    };
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    let Some(record) = record else {
        lines.push(Line::from("No Pokemon selected"));
        return Paragraph::new(lines).wrap(Wrap { trim: true });
    };

    lines.push(Line::from(vec![
        Span::styled(
            format!("#{} ", format_id(record.id)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            capitalize(&record.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    let mut types = vec![Span::styled("Types: ", Style::default().fg(Color::Gray))];
    for name in &record.types {
        let color = name
            .parse::<PokemonType>()
            .map(type_color)
            .unwrap_or(Color::Gray);
        types.push(Span::styled(format!("{name} "), Style::default().fg(color)));
    }
    lines.push(Line::from(types));
    lines.push(Line::from(vec![
        Span::styled("Height: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{:.1} m", record.height_m())),
        Span::styled("   Weight: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{:.1} kg", record.weight_kg())),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Abilities: ", Style::default().fg(Color::Gray)),
        Span::raw(
            record
                .abilities
                .iter()
                .map(|ability| capitalize(ability))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    ]));
    for stat in &record.stats {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", stat_label(&stat.name)),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(format!("{:>3} ", stat.value)),
            Span::styled(stat_bar(stat.value, 15), Style::default().fg(Color::Cyan)),
        ]));
    }
    if let Some(sprite) = record.sprite() {
        lines.push(Line::from(vec![
            Span::styled("Sprite: ", Style::default().fg(Color::Gray)),
            Span::raw(sprite.to_string()),
        ]));
    }

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::BOTTOM))
        .wrap(Wrap { trim: true })
}

fn draw_evolutions<C: CatalogClient + 'static>(tui: &Tui<C>) -> Paragraph<'static> {
    let focused = tui.focus == Focus::Evolutions;
    let mut lines = vec![Line::from(Span::styled(
        if focused {
            "EVOLUTIONS (Tab move, Enter open, Esc back)"
        } else {
            "EVOLUTIONS"
        },
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if tui.panel.selected().is_none() {
        lines.push(Line::from(Span::styled(
            "Press Enter on a Pokemon",
            Style::default().fg(Color::DarkGray),
        )));
    } else if tui.panel.is_loading() {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )));
    } else if !tui.panel.has_lineage() {
        lines.push(Line::from("No evolution data"));
    } else {
        let cursor = tui.panel.cursor().map(|evolution| evolution.id);
        let mut spans = Vec::new();
        for (position, evolution) in tui.panel.evolutions().iter().enumerate() {
            if position > 0 {
                spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
            }
            let mut style = Style::default();
            if Some(evolution.id) == tui.panel.selected() {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && Some(evolution.id) == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let marker = if evolution.image.is_some() { "" } else { "?" };
            spans.push(Span::styled(
                format!(
                    "#{} {}{marker}",
                    format_id(evolution.id),
                    capitalize(&evolution.name)
                ),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::BOTTOM))
        .wrap(Wrap { trim: true })
}

fn draw_logs<C: CatalogClient + 'static>(tui: &Tui<C>) -> Paragraph<'static> {
    let start = tui.logs.len().saturating_sub(5);
    let lines = tui
        .logs
        .iter()
        .skip(start)
        .map(|line| {
            Line::from(Span::styled(
                line.clone(),
                Style::default().fg(Color::DarkGray),
            ))
        })
        .collect::<Vec<_>>();
    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn draw_search_line<C: CatalogClient + 'static>(
    f: &mut ratatui::Frame,
    tui: &Tui<C>,
    area: Rect,
) {
    let focused = tui.focus == Focus::Search;
    let prefix = Span::styled(
        "/ ",
        Style::default()
            .fg(if focused { Color::Cyan } else { Color::DarkGray })
            .add_modifier(Modifier::BOLD),
    );
    let input = if tui.input.is_empty() && !focused {
        Span::styled(
            "Search by name, number, type or ability",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(tui.input.clone(), Style::default().fg(Color::White))
    };
    let pending = if tui.debouncer.is_pending() { " ..." } else { "" };
    let hint_index = (tui.started.elapsed().as_secs() / 5) as usize % HINTS.len();
    let lines = vec![
        Line::from(vec![
            prefix,
            input,
            Span::styled(pending, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            HINTS[hint_index],
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        area,
    );

    if focused {
        let cursor_x = area
            .x
            .saturating_add(2 + tui.input.chars().count() as u16)
            .min(area.x.saturating_add(area.width.saturating_sub(1)));
        f.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

fn type_color(kind: PokemonType) -> Color {
    match kind {
        PokemonType::Normal => Color::Gray,
        PokemonType::Fire => Color::Red,
        PokemonType::Water => Color::Blue,
        PokemonType::Electric => Color::Yellow,
        PokemonType::Grass => Color::Green,
        PokemonType::Ice => Color::LightBlue,
        PokemonType::Fighting => Color::LightRed,
        PokemonType::Poison => Color::Magenta,
        PokemonType::Ground => Color::Rgb(180, 140, 60),
        PokemonType::Flying => Color::LightCyan,
        PokemonType::Psychic => Color::LightMagenta,
        PokemonType::Bug => Color::LightGreen,
        PokemonType::Rock => Color::Rgb(140, 110, 50),
        PokemonType::Ghost => Color::Rgb(110, 80, 150),
        PokemonType::Dragon => Color::Rgb(80, 60, 200),
        PokemonType::Dark => Color::DarkGray,
        PokemonType::Steel => Color::White,
        PokemonType::Fairy => Color::Rgb(240, 150, 200),
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out = value.chars().take(max.saturating_sub(1)).collect::<String>();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("pikachu", 14), "pikachu");
        assert_eq!(truncate("crabominable", 8), "crabomi~");
    }

    #[test]
    fn every_type_has_a_color() {
        for kind in PokemonType::ALL {
            let _ = type_color(kind);
        }
        assert_eq!(type_color(PokemonType::Fire), Color::Red);
    }
}
