use super::{Algorithm, ProcessResult, Report};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

const TICK_RATE: Duration = Duration::from_millis(200);
const RULE: &str = "--------------------------------------------------------------";

/// Renders averaged results as a plain text table.
pub fn render_table(algorithm: Algorithm, scenario: &str, results: &[ProcessResult]) -> String {
    let mut table = format!(
        "\n=== Average results (algorithm: {algorithm}, scenario: {scenario}) ===\n\
         {:>6} | {:>8} | {:>8} | {:>8} | {:>8}\n{}\n",
        "Proc", "Elapsed", "CPU", "BLOCKED", "FirstRun", RULE
    );
    for result in results {
        table.push_str(&format!(
            "{:>6} | {:>8.3} | {:>8.3} | {:>8.3} | {:>8.3}\n",
            result.name, result.elapsed, result.cpu, result.blocked, result.first_run
        ));
    }
    table.push_str(RULE);
    table.push('\n');
    table
}

enum Input {
    Quit,
    Up,
    Down,
    None,
}

/// Full screen view of a report: the averaged table and the CPU timeline of
/// the first run. Restores the terminal when dropped.
pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl DisplayTerminal {
    /// Enters raw mode and the alternate screen. If any step fails, the
    /// steps already taken are undone before the error is returned.
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore();
                Err(err)
            }
        }
    }

    /// Blocks until the user quits with `q` or `Esc`.
    pub fn show(&mut self, report: &Report) -> Result<(), io::Error> {
        let last_row = report.schedule.slices.len().saturating_sub(1);
        let mut scroll = 0;

        loop {
            self.draw(report, scroll)?;
            match self.get_input()? {
                Input::Quit => return Ok(()),
                Input::Up => scroll = scroll.saturating_sub(1),
                Input::Down => scroll = (scroll + 1).min(last_row),
                Input::None => {}
            }
        }
    }

    fn draw(&mut self, report: &Report, scroll: usize) -> Result<(), io::Error> {
        let config = &report.config;

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(report.averages.len() as u16 + 3),
                    Constraint::Min(5),
                ])
                .split(f.size());

            let title = Paragraph::new(format!(
                "{} | Scenario {} | {} run(s) | q: quit, up/down: scroll timeline",
                config.algorithm.title(),
                config.scenario,
                config.repeat()
            ))
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Simulation")
                    .border_type(BorderType::Rounded),
            );
            f.render_widget(title, chunks[0]);

            let rows = report.averages.iter().map(|result| {
                Row::new(vec![
                    Cell::from(result.name.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(format!("{:.3}", result.elapsed)),
                    Cell::from(format!("{:.3}", result.cpu)),
                    Cell::from(format!("{:.3}", result.blocked)),
                    Cell::from(format!("{:.3}", result.first_run)),
                ])
            });
            let results = Table::new(rows)
                .header(
                    Row::new(vec!["Proc", "Elapsed", "CPU", "BLOCKED", "FirstRun"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(6),
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Length(10),
                ])
                .block(Block::default().title("Averages").borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);
            f.render_widget(results, chunks[1]);

            let slices = report.schedule.slices.iter().skip(scroll).map(|slice| {
                Row::new(vec![
                    Cell::from(format!("{:.3}", slice.start)),
                    Cell::from(slice.process.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(slice.level.to_string()),
                    Cell::from(format!("{:.3}", slice.taken)),
                    Cell::from(match slice.io_fired {
                        Some(duration) => format!("{duration:.3}"),
                        None => "-".to_owned(),
                    }),
                ])
            });
            let timeline = Table::new(slices)
                .header(
                    Row::new(vec!["Start", "Proc", "Level", "CPU", "IO"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(10),
                    Constraint::Length(6),
                    Constraint::Length(5),
                    Constraint::Length(8),
                    Constraint::Length(8),
                ])
                .block(Block::default().title("Timeline").borders(Borders::ALL))
                .style(Style::default().fg(Color::White))
                .column_spacing(1);
            f.render_widget(timeline, chunks[2]);
        })?;

        Ok(())
    }

    fn get_input(&self) -> Result<Input, io::Error> {
        if !event::poll(TICK_RATE)? {
            return Ok(Input::None);
        }

        let input = match event::read()? {
            Event::Key(key)
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Input::Quit
            }
            Event::Key(key) if key.modifiers.is_empty() => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
                KeyCode::Char('k') | KeyCode::Up => Input::Up,
                KeyCode::Char('j') | KeyCode::Down => Input::Down,
                _ => Input::None,
            },
            _ => Input::None,
        };
        Ok(input)
    }
}

/// Leaves the alternate screen and raw mode. Failures are ignored: this only
/// runs on the way out, where nothing better can be done.
fn restore() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_row_per_result() {
        let results = vec![
            ProcessResult {
                name: "A".to_owned(),
                elapsed: 5.4,
                cpu: 5.0,
                blocked: 0.4,
                first_run: 0.0,
            },
            ProcessResult {
                name: "B".to_owned(),
                elapsed: 10.4,
                cpu: 5.0,
                blocked: 0.0,
                first_run: 5.4,
            },
        ];
        let table = render_table(Algorithm::Fifo, "3", &results);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[1], "=== Average results (algorithm: fifo, scenario: 3) ===");
        assert_eq!(lines[2], "  Proc |  Elapsed |      CPU |  BLOCKED | FirstRun");
        assert_eq!(lines[4], "     A |    5.400 |    5.000 |    0.400 |    0.000");
        assert_eq!(lines[5], "     B |   10.400 |    5.000 |    0.000 |    5.400");
        assert_eq!(lines[6], RULE);
    }

    #[test]
    fn restore_is_safe_without_raw_mode() {
        // Undoing a setup that never happened must neither panic nor leave
        // raw mode switched on.
        restore();
        restore();
        assert!(!terminal::is_raw_mode_enabled().unwrap_or(false));
    }
}
