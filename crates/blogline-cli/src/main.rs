use anyhow::Result;
use blogline_config::Config;
use blogline_engine::{
    CatalogCache, CatalogSettings, DisplayModel, FileSource, Fragment, Navigator, PageStatus,
    ResourceAction, io, render::html::page_html, render_page,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    cache: CatalogCache<FileSource>,
    navigator: Navigator,
    scroll: u16,
    status: String,
    content: Vec<Line<'static>>,
    /// Titles cross-referenced from the current page, in body order.
    cross_refs: Vec<String>,
    selected_ref: Option<usize>,
}

impl App {
    fn new(corpus_path: PathBuf, settings: CatalogSettings, category: String) -> Self {
        let mut app = Self {
            cache: CatalogCache::new(FileSource::new(corpus_path), settings),
            navigator: Navigator::new(category),
            scroll: 0,
            status: String::new(),
            content: Vec::new(),
            cross_refs: Vec::new(),
            selected_ref: None,
        };
        app.refresh();
        app
    }

    /// Rebuilds the content panel for the navigator's current page.
    fn refresh(&mut self) {
        self.scroll = 0;
        self.cross_refs.clear();
        self.selected_ref = None;
        let catalog = match self.cache.catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("{e}");
                self.status = "Failed to load".to_string();
                self.content = vec![
                    Line::from("Could not load the corpus."),
                    Line::from(format!("{e}")),
                    Line::from(""),
                    Line::from("Press r to try again."),
                ];
                return;
            }
        };

        let category = self.navigator.category().to_string();
        match self.navigator.status(&catalog) {
            PageStatus::Ready(page) => {
                let models = render_page(&page, &catalog);
                self.status = format!(
                    "{category} | page {} of {}",
                    page.number,
                    catalog.page_count(&category)
                );
                if self.navigator.has_next_page(&catalog) {
                    self.status.push_str(" | more →");
                }
                self.content = models.iter().flat_map(entry_lines).collect();
                self.cross_refs = cross_reference_titles(&models);
            }
            PageStatus::NoEntries => {
                self.status = category.clone();
                self.content = vec![Line::from(format!("No entries in '{category}'."))];
            }
            PageStatus::PastEnd => {
                self.status = category.clone();
                self.content = vec![Line::from(format!(
                    "Page {} of '{category}' is empty.",
                    self.navigator.page()
                ))];
            }
        }

        let warnings = self.cache.warnings().len();
        if warnings > 0 {
            self.status.push_str(&format!(" | {warnings} parse warnings"));
        }
    }

    /// Selects the next cross-referenced entry on this page.
    fn cycle_cross_reference(&mut self) {
        if self.cross_refs.is_empty() {
            return;
        }
        self.selected_ref = Some(match self.selected_ref {
            Some(i) => (i + 1) % self.cross_refs.len(),
            None => 0,
        });
    }

    /// Jumps to the page showing the selected cross-referenced entry.
    fn open_cross_reference(&mut self) {
        let Some(title) = self.selected_ref.and_then(|i| self.cross_refs.get(i)).cloned() else {
            return;
        };
        if let Some(catalog) = self.cache.cached().cloned()
            && self.navigator.open_entry(&catalog, &title)
        {
            self.refresh();
        }
    }

    fn selected_cross_reference(&self) -> Option<&str> {
        self.selected_ref
            .and_then(|i| self.cross_refs.get(i))
            .map(String::as_str)
    }

    fn next_page(&mut self) {
        if let Some(catalog) = self.cache.cached().cloned()
            && self.navigator.next_page(&catalog)
        {
            self.refresh();
        }
    }

    fn previous_page(&mut self) {
        if self.navigator.previous_page() {
            self.refresh();
        }
    }

    fn cycle_category(&mut self) {
        let Some(catalog) = self.cache.cached().cloned() else {
            return;
        };
        let categories = catalog.categories();
        if categories.is_empty() {
            return;
        }
        let next = categories
            .iter()
            .position(|c| *c == self.navigator.category())
            .map(|i| (i + 1) % categories.len())
            .unwrap_or(0);
        self.navigator.switch_category(categories[next]);
        self.refresh();
    }

    fn reload(&mut self) {
        if let Err(e) = self.cache.reload() {
            log::error!("{e}");
        }
        self.refresh();
    }

    fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

/// Turns logging off until dropped, then restores the previous level.
struct QuietLogs {
    previous: log::LevelFilter,
}

impl QuietLogs {
    fn new() -> Self {
        let previous = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        Self { previous }
    }
}

impl Drop for QuietLogs {
    fn drop(&mut self) {
        log::set_max_level(self.previous);
    }
}

/// Titles the page cross-references, first occurrence first.
fn cross_reference_titles(models: &[DisplayModel]) -> Vec<String> {
    let mut titles: Vec<String> = vec![];
    for fragment in models.iter().flat_map(|model| &model.body) {
        if let Fragment::CrossRef { title, .. } = fragment
            && !titles.contains(title)
        {
            titles.push(title.clone());
        }
    }
    titles
}

/// Terminal rendition of one display model.
fn entry_lines(model: &DisplayModel) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            model.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} · {}", model.date_label, model.category),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    lines.extend(body_lines(&model.body));

    if !model.resources.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Resources",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for control in &model.resources {
            let detail = match &control.action {
                ResourceAction::Open { url } => Span::styled(
                    url.clone(),
                    Style::default().fg(Color::Cyan),
                ),
                ResourceAction::ShowReason { reason } => Span::styled(
                    format!("unavailable: {reason}"),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            lines.push(Line::from(vec![
                Span::raw(format!("📎 {} ", control.label)),
                detail,
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from("─".repeat(40)));
    lines.push(Line::from(""));
    lines
}

/// Splits the fragments into terminal lines, styling references.
fn body_lines(fragments: &[Fragment]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for fragment in fragments {
        let style = match fragment {
            Fragment::Text(_) => Style::default(),
            Fragment::LinkRef { .. } => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            Fragment::CrossRef { .. } => Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        };

        let mut parts = fragment.text().split('\n');
        if let Some(first) = parts.next()
            && !first.is_empty()
        {
            spans.push(Span::styled(first.to_string(), style));
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut spans)));
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

fn print_html(corpus_path: PathBuf, settings: CatalogSettings, category: &str) -> Result<()> {
    let mut cache = CatalogCache::new(FileSource::new(corpus_path), settings);
    let catalog = cache.catalog()?;
    let page = cache.get_page(1, category)?;
    println!("{}", page_html(&render_page(&page, &catalog)));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args: Vec<String> = env::args().collect();
    let html = if let Some(pos) = args.iter().skip(1).position(|a| a == "--html") {
        args.remove(pos + 1);
        true
    } else {
        false
    };
    let config_path = Config::config_path();

    let mut config_missing = false;
    let config = match Config::load() {
        Ok(config) => {
            config_missing = config.is_none();
            config
        }
        Err(e) => {
            if args.len() == 1 {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} [--html] <corpus-path>", args[0]);
                process::exit(1);
            }
            log::warn!("Ignoring config file: {e}");
            None
        }
    };

    let corpus_path;
    let from_config;

    if args.len() == 2 {
        // CLI argument provided - use it
        corpus_path = PathBuf::from(&args[1]);
        from_config = false;
    } else if args.len() == 1 {
        match &config {
            Some(config) => {
                corpus_path = config.corpus_path.clone();
                from_config = true;
            }
            None => {
                eprintln!("Error: No corpus path provided and no config file found");
                eprintln!("Usage: {} [--html] <corpus-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [--html] [corpus-path]", args[0]);
        process::exit(1);
    };

    if let Err(e) = io::validate_corpus_path(&corpus_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Corpus path '{}'{} is invalid: {e}",
            corpus_path.display(),
            source
        );
        process::exit(1);
    }

    // Remember the first corpus opened so later runs need no argument
    if config_missing {
        let absolute = corpus_path.canonicalize().unwrap_or_else(|_| corpus_path.clone());
        match Config::new(absolute).save() {
            Ok(()) => log::info!("Created config file at {}", config_path.display()),
            Err(e) => log::warn!("Failed to create config file: {e}"),
        }
    }

    let mut settings = CatalogSettings::default();
    let mut category = blogline_engine::models::entry::DEFAULT_CATEGORY.to_string();
    if let Some(config) = config {
        settings.page_size = config.page_size;
        if let Some(text) = config.no_reason_text {
            settings.no_reason_text = text;
        }
        category = config.default_category;
    }

    if html {
        return print_html(corpus_path, settings, &category);
    }

    // First load happens on the normal screen so parse warnings stay readable
    let mut app = App::new(corpus_path, settings, category);

    // Nothing may write to stderr while the TUI owns the terminal
    let quiet = QuietLogs::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    drop(quiet);

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Right | KeyCode::Char('n') => app.next_page(),
                KeyCode::Left | KeyCode::Char('p') => app.previous_page(),
                KeyCode::Tab => app.cycle_category(),
                KeyCode::Char('r') => app.reload(),
                KeyCode::Char('c') => app.cycle_cross_reference(),
                KeyCode::Enter => app.open_cross_reference(),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());

    let content = Paragraph::new(app.content.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.status.clone()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(content, chunks[0]);

    let reference_line = match app.selected_cross_reference() {
        Some(title) => Line::from(vec![
            Span::raw("Cross-reference: "),
            Span::styled(title.to_string(), Style::default().fg(Color::Magenta)),
            Span::raw(" (Enter to open)"),
        ]),
        None if !app.cross_refs.is_empty() => {
            Line::from(format!("{} cross-references on this page", app.cross_refs.len()))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(vec![reference_line]), chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("←/p: Previous page | "),
        Span::raw("→/n: Next page | "),
        Span::raw("Tab: Category | c/Enter: Cross-reference | r: Reload | j/k: Scroll"),
    ]);

    f.render_widget(Paragraph::new(vec![help_text]), chunks[2]);
}
