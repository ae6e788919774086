//! Full-screen dashboard: dial on the left, readouts on the right.

use std::io::{self, Stdout};
use std::time::Duration;

use compass::engine::EngineSnapshot;
use compass::lifecycle::LifecycleState;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use super::dial::CompassDial;

/// User input the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Bring the compass to the foreground (`f`).
    Foreground,
    /// Send the compass to the background (`b`).
    Background,
    /// Leave the program (`q`, Esc, Ctrl+C).
    Quit,
}

impl DashboardEvent {
    fn from_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        match code {
            KeyCode::Char('f') => Some(DashboardEvent::Foreground),
            KeyCode::Char('b') => Some(DashboardEvent::Background),
            KeyCode::Char('q') | KeyCode::Esc => Some(DashboardEvent::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(DashboardEvent::Quit)
            }
            _ => None,
        }
    }
}

/// Owns the terminal for the lifetime of the TUI.
///
/// Raw mode and the alternate screen are restored on drop.
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Dashboard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    /// Wait up to `timeout` for a key press.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<Option<DashboardEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(DashboardEvent::from_key(key.code, key.modifiers))
            }
            _ => Ok(None),
        }
    }

    pub fn draw(&mut self, snapshot: &EngineSnapshot) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, snapshot))?;
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn render(frame: &mut Frame, snapshot: &EngineSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    frame.render_widget(CompassDial::new(snapshot), columns[0]);
    render_readouts(frame, columns[1], snapshot);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" f ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" foreground  "),
            Span::styled(" b ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" background  "),
            Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" quit"),
        ])),
        rows[1],
    );
}

fn render_readouts(frame: &mut Frame, area: Rect, snapshot: &EngineSnapshot) {
    let display = &snapshot.display;
    let location = display.location_text();
    let location_height = location.lines().count().max(1) as u16 + 2;

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(location_height),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(lifecycle_lines(snapshot)).block(panel("Lifecycle")),
        panels[0],
    );
    frame.render_widget(
        Paragraph::new(display.sensor_text()).block(panel("Sensor")),
        panels[1],
    );
    frame.render_widget(
        Paragraph::new(location)
            .wrap(Wrap { trim: true })
            .block(panel("Location")),
        panels[2],
    );
    frame.render_widget(
        Paragraph::new(display.satellites_text()).block(panel("Satellites")),
        panels[3],
    );
    frame.render_widget(
        Paragraph::new(format!(
            "accepted {}  dropped {}  redraws {}",
            snapshot.accepted, snapshot.dropped, snapshot.redraw_requests
        ))
        .style(Style::default().fg(Color::DarkGray)),
        panels[4],
    );
}

fn lifecycle_lines(snapshot: &EngineSnapshot) -> Vec<Line<'static>> {
    let (label, color) = match snapshot.lifecycle {
        LifecycleState::Active => ("ACTIVE", Color::Green),
        LifecycleState::Inactive => ("INACTIVE", Color::Yellow),
    };
    let held = |on: bool| if on { "held" } else { "-" };
    let resources = snapshot.resources;

    vec![
        Line::from(vec![
            Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  generation {}", snapshot.generation),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(format!(
            "position {}  sensor {}  wake lock {}",
            held(resources.position),
            held(resources.sensor),
            held(resources.wake_lock)
        )),
    ]
}

fn panel(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}
