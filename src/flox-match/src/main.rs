//! flox-match - fuzzy picker built on the launcher matcher
//!
//! Sources:
//! - Applications (.desktop files)
//! - Command history
//! - Lines from stdin
//!
//! Runs as an interactive picker or, with `--filter`, prints ranked matches.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flox_match::{
    apps,
    config::{Colors, Config},
    highlight, rank, Item, Ranked, SearchPrecision, StringMatcher,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// flox-match - launcher-style fuzzy picker
#[derive(Parser, Debug)]
#[command(name = "flox-match")]
#[command(version)]
#[command(about = "Fuzzy picker with acronym-aware launcher matching")]
struct Args {
    /// Item source (defaults to the configured mode)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Initial query
    #[arg(short, long, default_value = "")]
    query: String,

    /// Acronym search precision
    #[arg(short, long, value_enum, ignore_case = true)]
    precision: Option<SearchPrecision>,

    /// Compare case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Print ranked matches for the query and exit
    #[arg(short, long)]
    filter: bool,

    /// Prefix filtered output with scores
    #[arg(long, requires = "filter")]
    scores: bool,

    /// Maximum height (lines)
    #[arg(long)]
    height: Option<u16>,

    /// Hide borders
    #[arg(long)]
    no_border: bool,

    /// Print selected item with null terminator
    #[arg(long)]
    print0: bool,

    /// Read items from stdin
    #[arg(long)]
    stdin: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Search applications (.desktop files)
    Apps,
    /// Search command history
    History,
    /// Read from stdin
    Stdin,
}

/// Colors resolved from the config
struct Theme {
    fg: Color,
    bg: Color,
    highlight: Color,
    border: Color,
}

impl Theme {
    fn from_colors(colors: &Colors) -> Self {
        let parse = |value: &str, fallback: Color| {
            value.parse().unwrap_or_else(|_| {
                warn!("invalid color {value:?}, using default");
                fallback
            })
        };

        Self {
            fg: parse(&colors.fg, Color::White),
            bg: parse(&colors.bg, Color::Reset),
            highlight: parse(&colors.highlight, Color::Cyan),
            border: parse(&colors.border, Color::DarkGray),
        }
    }
}

/// Application state
struct App {
    /// Current query string
    query: String,
    /// All items
    items: Vec<Item>,
    /// Matcher used for every keystroke
    matcher: StringMatcher,
    /// Result cap, 0 for none
    max_results: usize,
    /// Matched items, best first
    filtered: Vec<Ranked>,
    /// Currently selected index in filtered list
    selected: usize,
    /// List state for scrolling
    list_state: ListState,
    /// Should quit
    should_quit: bool,
    /// Selected item (if any)
    selected_item: Option<String>,
}

impl App {
    fn new(items: Vec<Item>, matcher: StringMatcher, max_results: usize, query: String) -> Self {
        let mut app = App {
            query,
            items,
            matcher,
            max_results,
            filtered: Vec::new(),
            selected: 0,
            list_state: ListState::default(),
            should_quit: false,
            selected_item: None,
        };

        app.update_filter();
        app
    }

    fn update_filter(&mut self) {
        self.filtered = rank_limited(&self.matcher, &self.query, &self.items, self.max_results);

        // Reset selection if out of bounds
        if self.selected >= self.filtered.len() {
            self.selected = 0;
        }

        self.list_state.select(Some(self.selected));
    }

    fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_prev(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.filtered.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn confirm_selection(&mut self) {
        if let Some(ranked) = self.filtered.get(self.selected) {
            if let Some(item) = self.items.get(ranked.index) {
                self.selected_item = Some(item.value.clone());
            }
        }
        self.should_quit = true;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match (key, modifiers) {
            // Quit without selection
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            // Navigation
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                self.select_next();
            }
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                self.select_prev();
            }
            (KeyCode::Enter, _) => {
                self.confirm_selection();
            }
            (KeyCode::Backspace, _) => {
                self.query.pop();
                self.update_filter();
            }
            // Clear query
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.query.clear();
                self.update_filter();
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.push(c);
                self.update_filter();
            }
            _ => {}
        }
    }
}

fn rank_limited(matcher: &StringMatcher, query: &str, items: &[Item], max_results: usize) -> Vec<Ranked> {
    let mut ranked = rank(matcher, query, items);
    if max_results > 0 {
        ranked.truncate(max_results);
    }
    ranked
}

fn load_history() -> Vec<Item> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    let Ok(content) = fs::read_to_string(home.join(".zsh_history")) else {
        return Vec::new();
    };

    content
        .lines()
        .rev()
        .take(1000)
        .map(|line| {
            // Extended history format: ": timestamp:0;command"
            if line.starts_with(':') {
                line.split_once(';').map_or(line, |(_, cmd)| cmd)
            } else {
                line
            }
        })
        .filter(|cmd| !cmd.is_empty())
        .map(Item::new)
        .collect()
}

fn load_items(mode: Mode, config: &Config) -> Result<Vec<Item>> {
    let items = match mode {
        Mode::Apps => apps::load_applications(&config.app_dirs)?,
        Mode::History => load_history(),
        Mode::Stdin => {
            let mut items = Vec::new();
            for line in io::stdin().lock().lines().take(10000) {
                let line = line.context("failed to read stdin")?;
                if !line.is_empty() {
                    items.push(Item::new(line));
                }
            }
            items
        }
    };

    debug!(?mode, count = items.len(), "loaded items");
    Ok(items)
}

fn highlighted_line(item: &Item, indices: &[usize], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();

    if let Some(ref icon) = item.icon {
        spans.push(Span::raw(format!("{icon} ")));
    }

    for segment in highlight::segments(&item.display, indices) {
        let span = if segment.highlighted {
            Span::styled(
                segment.text,
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(segment.text, Style::default().fg(theme.fg))
        };
        spans.push(span);
    }

    Line::from(spans)
}

fn ui(frame: &mut Frame, app: &mut App, theme: &Theme, show_border: bool, height: u16) {
    let area = frame.area();
    let area = Rect {
        height: area.height.min(height),
        ..area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(1),    // List
        ])
        .split(area);

    // Input box
    let input_block = if show_border {
        Block::default()
            .borders(Borders::ALL)
            .title(" flox-match ")
            .border_style(Style::default().fg(theme.highlight))
    } else {
        Block::default()
    };

    let input = Paragraph::new(format!("> {}", app.query))
        .style(Style::default().fg(theme.fg).bg(theme.bg))
        .block(input_block);
    frame.render_widget(input, chunks[0]);

    // Results list
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .filter_map(|ranked| {
            let item = app.items.get(ranked.index)?;
            Some(ListItem::new(highlighted_line(item, &ranked.indices, theme)))
        })
        .collect();

    let list_block = if show_border {
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {}/{} ", app.filtered.len(), app.items.len()))
            .border_style(Style::default().fg(theme.border))
    } else {
        Block::default()
    };

    let list = List::new(items)
        .block(list_block)
        .style(Style::default().bg(theme.bg))
        .highlight_style(
            Style::default()
                .bg(theme.border)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("  ");

    frame.render_stateful_widget(list, chunks[1], &mut app.list_state);
}

fn run_tui(mut app: App, theme: &Theme, show_border: bool, height: u16) -> Result<Option<String>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, theme, show_border, height);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(app.selected_item)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    show_border: bool,
    height: u16,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app, theme, show_border, height))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers);
            }
        }
    }

    Ok(())
}

fn print_filtered(app: &App, scores: bool, print0: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    let terminator = if print0 { '\0' } else { '\n' };

    for ranked in &app.filtered {
        let Some(item) = app.items.get(ranked.index) else {
            continue;
        };

        if scores {
            write!(out, "{:.2}\t", ranked.score)?;
        }
        write!(out, "{}{}", item.display, terminator)?;
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "flox_match=debug,warn"
    } else {
        "flox_match=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::load(args.config.as_deref())?;

    let mode = if args.stdin {
        Mode::Stdin
    } else {
        args.mode.unwrap_or_else(|| {
            Mode::from_str(&config.default_mode, true).unwrap_or_else(|_| {
                warn!("unknown default_mode {:?}, using apps", config.default_mode);
                Mode::Apps
            })
        })
    };

    let mut matcher = config.matcher();
    if let Some(precision) = args.precision {
        matcher = matcher.with_precision(precision);
    }
    if args.case_sensitive {
        matcher = matcher.with_ignore_case(false);
    }
    debug!(?matcher, ?mode, "starting");

    let items = load_items(mode, &config)?;
    let app = App::new(items, matcher, config.max_results, args.query);

    if args.filter {
        return print_filtered(&app, args.scores, args.print0);
    }

    let theme = Theme::from_colors(&config.colors);
    let show_border = config.border && !args.no_border;
    let height = args.height.unwrap_or(config.height);

    if let Some(selected) = run_tui(app, &theme, show_border, height)? {
        match mode {
            Mode::Apps => {
                std::process::Command::new("sh")
                    .arg("-c")
                    .arg(&selected)
                    .spawn()
                    .with_context(|| format!("failed to launch {selected}"))?;
            }
            _ => {
                if args.print0 {
                    print!("{}\0", selected);
                } else {
                    println!("{}", selected);
                }
            }
        }
    }

    Ok(())
}
