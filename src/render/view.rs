//! Frame layout for one game snapshot

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::Theme;
use crate::core::{KEY_ROWS, Keyboard};
use crate::game::{Phase, Snapshot};
use crate::output::formatters::{create_progress_bar, format_elapsed, guess_noun};

const TITLE: &str = "Terminal Wordle";
const CELL_GAP: &str = "   ";

/// Display renderer: turns a snapshot into a ratatui frame
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Main UI rendering function
    pub fn draw(&self, f: &mut Frame, snapshot: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Board or post-game
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        if snapshot.phase.is_complete() {
            self.render_post_game(f, snapshot, chunks[1]);
        } else {
            self.render_board(f, snapshot, chunks[1]);
        }
        self.render_footer(f, snapshot, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(TITLE)
            .style(self.theme.title)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(self.theme.title),
            );
        f.render_widget(header, area);
    }

    fn render_board(&self, f: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let board = snapshot.board;
        let mut lines = Vec::with_capacity(board.rows() * 2 + 8);

        for row in 0..board.rows() {
            let mut spans = Vec::with_capacity(board.cols() * 2);
            for (col, cell) in board.row(row).iter().enumerate() {
                if col > 0 {
                    spans.push(Span::raw(CELL_GAP));
                }
                let letter = cell.letter.map_or(' ', |l| char::from(l).to_ascii_uppercase());
                spans.push(Span::styled(format!(" {letter} "), self.theme.tile(cell.color)));
            }
            lines.push(Line::from(spans));
            lines.push(Line::default());
        }

        lines.push(Line::default());
        lines.extend(self.keyboard_lines(snapshot.keyboard));

        if snapshot.show_secret {
            lines.push(Line::default());
            lines.push(Line::from(format!(
                "WORD: {}",
                snapshot.secret.text().to_uppercase()
            )));
        }
        self.push_notice(&mut lines, snapshot);

        let height = lines.len();
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        f.render_widget(paragraph, center_vertically(area, height));
    }

    fn keyboard_lines(&self, keyboard: &Keyboard) -> Vec<Line<'static>> {
        KEY_ROWS
            .iter()
            .map(|row| {
                Line::from(
                    row.bytes()
                        .map(|key| {
                            Span::styled(
                                format!(" {} ", char::from(key)),
                                self.theme.tile(keyboard.color(key)),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    fn render_post_game(&self, f: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let mut lines = Vec::new();

        match (snapshot.phase, snapshot.last_result) {
            (Phase::Won | Phase::PostGame, Some(result)) => {
                lines.push(Line::from(format!(
                    "Congrats! You won in {} with {} {}!",
                    format_elapsed(snapshot.elapsed),
                    result.guess_count,
                    guess_noun(result.guess_count)
                )));
                lines.push(Line::default());
                self.push_stats(&mut lines, snapshot, area.width);
            }
            _ => {
                lines.push(Line::from(format!(
                    "Unlucky. The word was \"{}\". Better luck next time!",
                    snapshot.secret
                )));
                if !snapshot.stats.is_empty() {
                    lines.push(Line::default());
                    self.push_stats(&mut lines, snapshot, area.width);
                }
            }
        }

        if snapshot.phase == Phase::Won {
            lines.push(Line::default());
            lines.push(Line::from("Saving result..."));
        }
        self.push_notice(&mut lines, snapshot);
        lines.push(Line::default());
        lines.push(Line::from("Press [SPACE] to play again..."));

        let height = lines.len() + 2;
        let panel = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .style(self.theme.post_game),
            );
        f.render_widget(panel, center_vertically(area, height));
    }

    fn push_stats(&self, lines: &mut Vec<Line<'static>>, snapshot: &Snapshot, width: u16) {
        let stats = &snapshot.stats;
        lines.push(Line::from(format!("Average Guess: {:.2}", stats.average_guesses)));
        lines.push(Line::from(format!("Average Seconds: {:.2}", stats.average_seconds)));
        lines.push(Line::default());

        let bar_width = usize::from(width / 4).max(4);
        let highlight = snapshot.last_result.map(|r| r.guess_count as usize);
        for (i, &count) in stats.histogram.iter().enumerate() {
            let bar = create_progress_bar(stats.fraction(i), 1.0, bar_width);
            let style = if highlight == Some(i + 1) {
                self.theme.green
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", i + 1)),
                Span::styled(bar, style),
                Span::raw(format!(" {count:>3}")),
            ]));
        }
    }

    fn push_notice(&self, lines: &mut Vec<Line<'static>>, snapshot: &Snapshot) {
        if let Some(notice) = snapshot.notice {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(notice.to_string(), self.theme.notice)));
        }
    }

    fn render_footer(&self, f: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let help = Paragraph::new("ctrl+c: quit | *: reveal | enter: submit")
            .style(self.theme.help)
            .block(Block::default().borders(Borders::TOP));
        f.render_widget(help, chunks[0]);

        let rows = snapshot.board.rows();
        let info = Paragraph::new(format!(
            "Guess {}/{}, Seconds: {}",
            (snapshot.current_row + 1).min(rows),
            rows,
            snapshot.elapsed.as_secs()
        ))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::TOP));
        f.render_widget(info, chunks[1]);
    }
}

/// Sub-area of `area` with `height` rows centred vertically
fn center_vertically(area: Rect, height: usize) -> Rect {
    let height = u16::try_from(height).unwrap_or(u16::MAX).min(area.height);
    let top = (area.height - height) / 2;
    Rect {
        y: area.y + top,
        height,
        ..area
    }
}
