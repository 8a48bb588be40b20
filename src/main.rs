use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use ballin::config::{self, AppConfig};
use ballin::projection::{self, ProjectedShot, Surface};
use ballin::results::{Comparison, ResultsAggregator, SessionResults};
use ballin::roster::Roster;
use ballin::state::{AppState, Screen};

struct App {
    state: AppState,
    aggregator: ResultsAggregator,
    should_quit: bool,
}

impl App {
    fn new(cfg: &AppConfig) -> Self {
        let aggregator = cfg.aggregator();
        let dates = cfg.sessions().recorded_dates();
        let mut state = AppState::new(dates, Roster::active());
        if state.dates.is_empty() {
            state.push_log(format!(
                "[INFO] No sessions under {}",
                cfg.sessions_dir.display()
            ));
        }
        Self {
            state,
            aggregator,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.toggle_list(),
            KeyCode::Char('1') => self.state.screen = Screen::Calendar,
            KeyCode::Char('2') => self.state.screen = Screen::Database,
            KeyCode::Enter | KeyCode::Char('d') => self.open_selected(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('o') => self.state.show_user_overlay = !self.state.show_user_overlay,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        if self.state.screen == Screen::Results {
            return;
        }
        let Some(key) = self.state.selected_key() else {
            self.state.push_log("[INFO] Nothing selected");
            return;
        };
        let results = self.aggregator.resolve(&key);
        self.state.show_results(results);
    }
}

fn main() -> io::Result<()> {
    config::load_dotenv();
    let cfg = AppConfig::from_env();
    let roster_err = cfg.install_roster().err();

    let mut app = App::new(&cfg);
    if let Some(err) = roster_err {
        app.state
            .push_log(format!("[WARN] Roster override ignored: {err:#}"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// Text rows plus one row for the separating border.
const HEADER_HEIGHT: u16 = 4;
const FOOTER_HEIGHT: u16 = 2;

fn screen_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area)
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = screen_layout(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Calendar => render_calendar(frame, chunks[1], &app.state),
        Screen::Database => render_database(frame, chunks[1], &app.state),
        Screen::Results => render_results(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Calendar => format!("BALLIN | Calendar | {} session days", state.dates.len()),
        Screen::Database => format!("BALLIN | Database | {} players", state.players.len()),
        Screen::Results => match &state.results.key {
            Some(key) => format!("BALLIN | Results | {key}"),
            None => "BALLIN | Results".to_string(),
        },
    };
    let line1 = format!("   o   {title}");
    let line2 = "  -|-".to_string();
    let line3 = "  / \\".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Calendar | Screen::Database => {
            "1 Calendar | 2 Database | Tab Switch | j/k/↑/↓ Move | Enter/d Results | ? Help | q Quit"
                .to_string()
        }
        Screen::Results => "b/Esc Back | o Toggle your shots | ? Help | q Quit".to_string(),
    }
}

fn render_calendar(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.dates.is_empty() {
        let empty = Paragraph::new("No recorded sessions yet")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    let rows: Vec<String> = state
        .dates
        .iter()
        .map(|d| d.format("%a %d %b %Y").to_string())
        .collect();
    render_list(frame, area, &rows, state.date_selected);
}

fn render_database(frame: &mut Frame, area: Rect, state: &AppState) {
    render_list(frame, area, &state.players, state.player_selected);
}

fn render_list(frame: &mut Frame, area: Rect, rows: &[String], selected: usize) {
    if area.height == 0 {
        return;
    }
    let visible = area.height as usize;
    let (start, end) = visible_range(selected, rows.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + i as u16,
            width: area.width,
            height: 1,
        };
        let style = if idx == selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(format!(" {}", rows[idx])).style(style), row_area);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_shot_chart(frame, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(cols[1]);

    let summary = Paragraph::new(results_text(&app.state.results))
        .block(Block::default().title("Results").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(summary, right[0]);

    let log_lines = right[1].height.saturating_sub(2) as usize;
    let logs: Vec<&str> = app
        .state
        .logs
        .iter()
        .rev()
        .take(log_lines)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let log = Paragraph::new(logs.join("\n"))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Log").borders(Borders::ALL));
    frame.render_widget(log, right[1]);
}

fn results_text(results: &SessionResults) -> String {
    let mut lines = results.sections();
    if let Comparison::Loaded(player) = &results.comparison {
        lines.insert(0, format!("{} ({} shots)", player.name, player.shots.len()));
        if let Some(bio) = &player.bio {
            lines.insert(1, bio.clone());
        }
    }
    if let Some(zones) = &results.zones {
        lines.push(String::new());
        lines.push(format!("{:<22} {:>5} {:>6}", "Zone", "FGA", "FG%"));
        for line in zones.lines().iter().filter(|l| l.attempts > 0) {
            lines.push(format!(
                "{:<22} {:>5} {:>6}",
                line.zone.label(),
                line.attempts,
                line.fg_pct().map(|p| format!("{p:.1}")).unwrap_or_default()
            ));
        }
    }
    lines.join("\n")
}

fn render_shot_chart(frame: &mut Frame, area: Rect, app: &App) {
    let surface = app.aggregator.surface();
    let results = &app.state.results;
    let court = projection::project_court(surface);
    let (made, missed) = split_points(&results.points, surface);
    let (user_made, user_missed) = if app.state.show_user_overlay {
        split_points(&results.user_points, surface)
    } else {
        (Vec::new(), Vec::new())
    };

    let chart = Canvas::default()
        .block(Block::default().title("Shot chart").borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, surface.width])
        .y_bounds([0.0, surface.height])
        .paint(move |ctx| {
            for line in &court {
                for pair in line.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].x,
                        y1: surface.height - pair[0].y,
                        x2: pair[1].x,
                        y2: surface.height - pair[1].y,
                        color: Color::DarkGray,
                    });
                }
            }
            ctx.layer();
            ctx.draw(&Points {
                coords: &missed,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &made,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &user_missed,
                color: Color::Magenta,
            });
            ctx.draw(&Points {
                coords: &user_made,
                color: Color::Cyan,
            });
        });
    frame.render_widget(chart, area);
}

// Canvas y grows upward; surface y grows downward.
fn split_points(points: &[ProjectedShot], surface: Surface) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut made = Vec::new();
    let mut missed = Vec::new();
    for p in points {
        let xy = (p.point.x, surface.height - p.point.y);
        if p.made {
            made.push(xy);
        } else {
            missed.push(xy);
        }
    }
    (made, missed)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Ballin - Help",
        "",
        "Lists:",
        "  1 / 2        Calendar / Database",
        "  Tab          Switch list",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Show results",
        "",
        "Results:",
        "  b / Esc      Back",
        "  o            Toggle your shots on the chart",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().add_modifier(Modifier::empty()));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_footer_text_fit_inside_their_borders() {
        let state = AppState::new(Vec::new(), Roster::builtin());
        let chunks = screen_layout(Rect::new(0, 0, 120, 40));

        let header_rows = Block::default().borders(Borders::BOTTOM).inner(chunks[0]).height;
        assert_eq!(header_rows as usize, header_text(&state).lines().count());

        let footer_rows = Block::default().borders(Borders::TOP).inner(chunks[2]).height;
        assert_eq!(footer_rows as usize, footer_text(&state).lines().count());
    }
}
