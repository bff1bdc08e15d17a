// SPDX-License-Identifier: MIT
// Full-screen task board TUI:
//   - Header: open/total counts + filter state
//   - Task table (ID / Task / Status), completed rows struck through
//   - Input line for new tasks (Enter to add)
//   - Notice line showing the outcome of the last command
//
// Two focus targets: the input box and the table. `a` jumps to the
// input, Esc jumps back to the table; Ctrl+C always exits.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Terminal,
};
use std::io;

use crate::controller::{Controller, Notice, Severity};
use crate::tasks::Task;

/// Which widget key presses are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Table,
}

/// Everything one frame needs to draw.
struct BoardFrame<'a> {
    rows: &'a [Task],
    input: &'a str,
    focus: Focus,
    selected: Option<usize>,
    show_completed: bool,
    open_count: usize,
    total: usize,
    notice: Option<&'a Notice>,
}

/// ratatui-based interactive task board.
pub struct BoardUi {
    controller: Controller,
}

impl BoardUi {
    pub fn new(controller: Controller) -> Self {
        Self { controller }
    }

    /// Start the interactive TUI loop.
    pub async fn run(mut self) -> Result<()> {
        // Set up terminal.
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal regardless of result.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut input_buf = String::new();
        // The input starts focused so the user can type a first task
        // straight away.
        let mut focus = Focus::Input;
        let mut selected: Option<usize> = None;
        let mut last_notice: Option<Notice> = None;

        loop {
            // One command at a time: re-derive the view, surface what
            // happened, draw, then wait for the next key.
            let rows = self.controller.view().to_vec();
            if let Some(notice) = self.controller.take_notices().pop() {
                last_notice = Some(notice);
            }
            selected = clamp_selection(selected, rows.len());

            let board = BoardFrame {
                rows: &rows,
                input: &input_buf,
                focus,
                selected,
                show_completed: self.controller.show_completed(),
                open_count: self.controller.open_count(),
                total: self.controller.total(),
                notice: last_notice.as_ref(),
            };
            terminal.draw(|f| draw_ui(f, &board))?;

            // Poll for terminal events (non-blocking, 50ms timeout).
            if !event::poll(std::time::Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };

            // Ctrl+C — exit from anywhere.
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match focus {
                Focus::Input => match key.code {
                    KeyCode::Enter => {
                        // The input keeps focus so several tasks can be
                        // entered in a row. A rejected (blank) submission
                        // keeps the buffer for the user to fix.
                        if self.controller.submit_new_task(&input_buf).await.is_ok() {
                            input_buf.clear();
                        }
                    }
                    KeyCode::Esc => {
                        focus = Focus::Table;
                        if selected.is_none() && !rows.is_empty() {
                            selected = Some(0);
                        }
                    }
                    KeyCode::Backspace => {
                        input_buf.pop();
                    }
                    KeyCode::Char(c) => input_buf.push(c),
                    _ => {}
                },
                Focus::Table => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('a') => focus = Focus::Input,
                    KeyCode::Char('d') => {
                        let _ = self.controller.delete_at(selected).await;
                    }
                    KeyCode::Char('c') => {
                        let _ = self.controller.toggle_at(selected).await;
                    }
                    KeyCode::Char('v') => {
                        let show = !self.controller.show_completed();
                        self.controller.set_filter(show);
                    }
                    KeyCode::Esc => selected = None,
                    KeyCode::Up => {
                        selected = Some(selected.map_or(0, |s| s.saturating_sub(1)));
                    }
                    KeyCode::Down => {
                        selected =
                            Some(selected.map_or(0, |s| (s + 1).min(rows.len().saturating_sub(1))));
                    }
                    _ => {}
                },
            }
        }

        Ok(())
    }
}

/// Keep the selection inside the rendered rows; deleting the last row
/// moves the selection up instead of leaving it dangling.
fn clamp_selection(selected: Option<usize>, rows: usize) -> Option<usize> {
    match rows {
        0 => None,
        n => selected.map(|s| s.min(n - 1)),
    }
}

// ─── UI rendering ─────────────────────────────────────────────────────────────

fn draw_ui(f: &mut ratatui::Frame, board: &BoardFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(3),    // task table
            Constraint::Length(3), // input box
            Constraint::Length(1), // notice line
            Constraint::Length(1), // help line
        ])
        .split(f.area());

    render_header(f, chunks[0], board);
    render_table(f, chunks[1], board);
    render_input(f, chunks[2], board);
    render_notice(f, chunks[3], board.notice);
    render_help(f, chunks[4], board.focus);
}

fn render_header(f: &mut ratatui::Frame, area: Rect, board: &BoardFrame) {
    let filter = if board.show_completed {
        "all"
    } else {
        "open only"
    };
    let header = Paragraph::new(format!(
        " taskdeck  {} open / {} total  [{filter}]",
        board.open_count, board.total
    ))
    .style(Style::default().bg(Color::Rgb(28, 28, 40)).fg(Color::White));
    f.render_widget(header, area);
}

fn render_table(f: &mut ratatui::Frame, area: Rect, board: &BoardFrame) {
    let rows: Vec<Row> = board
        .rows
        .iter()
        .map(|t| {
            let (status, status_style) = if t.completed {
                (
                    "done",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("open", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            };
            let text_style = if t.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(Span::styled(t.text.clone(), text_style)),
                Cell::from(Span::styled(status, status_style)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(["ID", "Task", "Status"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title("Tasks"))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(board.selected);
    f.render_stateful_widget(table, area, &mut state);
}

fn render_input(f: &mut ratatui::Frame, area: Rect, board: &BoardFrame) {
    let focused = board.focus == Focus::Input;
    let cursor = if focused { "▌" } else { "" };
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let text = Paragraph::new(format!("> {}{cursor}", board.input))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("New task")
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(text, area);
}

fn render_notice(f: &mut ratatui::Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let color = match notice.severity {
        Severity::Info => Color::Gray,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };
    let line = Paragraph::new(format!(" {}", notice.message)).style(Style::default().fg(color));
    f.render_widget(line, area);
}

fn render_help(f: &mut ratatui::Frame, area: Rect, focus: Focus) {
    let help = match focus {
        Focus::Input => " Enter: add task  |  Esc: back to list  |  Ctrl+C: quit",
        Focus::Table => {
            " a: new  d: delete  c: toggle done  v: show/hide completed  ↑/↓: select  Esc: clear  q: quit"
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_clamps_to_rendered_rows() {
        assert_eq!(clamp_selection(Some(4), 3), Some(2));
        assert_eq!(clamp_selection(Some(1), 3), Some(1));
        assert_eq!(clamp_selection(Some(0), 0), None);
        assert_eq!(clamp_selection(None, 3), None);
    }
}
