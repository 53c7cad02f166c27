use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Direction as Heading, Position};
use crate::menu::{ConfirmAction, MenuState};
use crate::snapshot::RenderSnapshot;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snap: &RenderSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snap), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snap.game_over.is_some() {
            frame.render_widget(self.render_game_over(snap), game_area);
        } else {
            frame.render_widget(self.render_grid(snap), game_area);
            match snap.menu {
                MenuState::Running => {}
                MenuState::Paused => {
                    self.render_pause_menu(frame, game_area);
                }
                MenuState::Confirm(action) => {
                    let pause_popup = self.render_pause_menu(frame, game_area);
                    self.render_confirm(frame, game_area, pause_popup, action);
                }
            }
        }

        frame.render_widget(self.render_controls(snap), chunks[2]);
    }

    fn cell_span(&self, snap: &RenderSnapshot, pos: Position) -> Span<'static> {
        let body_color = if snap.boosted { Color::Cyan } else { Color::Green };

        if snap.head() == Some(pos) {
            let glyph = match snap.direction {
                Heading::Up => "^ ",
                Heading::Down => "v ",
                Heading::Left => "< ",
                Heading::Right => "> ",
            };
            Span::styled(
                glyph,
                Style::default().fg(body_color).add_modifier(Modifier::BOLD),
            )
        } else if snap.snake.contains(&pos) {
            Span::styled("■ ", Style::default().fg(body_color))
        } else if pos == snap.food {
            Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else if pos == snap.boost_item {
            Span::styled(
                "* ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else if pos == snap.obstacle {
            Span::styled("X ", Style::default().fg(Color::LightRed))
        } else if snap.portals.is_some_and(|pair| pair.contains(pos)) {
            Span::styled(
                "@ ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(". ", Style::default().fg(Color::DarkGray))
        }
    }

    fn render_grid(&self, snap: &RenderSnapshot) -> Paragraph<'static> {
        let size = snap.grid_size as i32;
        let lines: Vec<Line> = (0..size)
            .map(|y| {
                let spans: Vec<Span> = (0..size)
                    .map(|x| self.cell_span(snap, Position::new(x, y)))
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Portal Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snap: &RenderSnapshot) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snap.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(snap.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(snap.steps.to_string(), Style::default().fg(Color::White)),
        ];
        if snap.boosted {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "BOOST",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    /// Draw the pause menu and return the rectangle it occupies
    fn render_pause_menu(&self, frame: &mut Frame, area: Rect) -> Rect {
        let popup = centered_rect(area, 34, 9);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            button_line("Enter", "Resume"),
            button_line("R", "Restart"),
            button_line("Q", "Quit"),
            Line::from(Span::styled(
                "Space to close",
                Style::default().fg(Color::Gray),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Gray)),
            ),
            popup,
        );
        popup
    }

    fn render_confirm(
        &self,
        frame: &mut Frame,
        area: Rect,
        pause_popup: Rect,
        action: ConfirmAction,
    ) {
        let popup = below_title(centered_rect(area, 46, 6), pause_popup, area);
        let message = match action {
            ConfirmAction::Restart => "Restart game? All progress will be lost.",
            ConfirmAction::Quit => "Quit the game? Your progress will be lost.",
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::White))),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[Y] Yes",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("     "),
                Span::styled(
                    "[N] No",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::White)),
            ),
            popup,
        );
    }

    fn render_game_over(&self, snap: &RenderSnapshot) -> Paragraph<'static> {
        let reason = snap.game_over.map(|r| r.describe()).unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snap.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snap.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, snap: &RenderSnapshot) -> Paragraph<'static> {
        let hint = |key: &'static str, color: Color| Span::styled(key, Style::default().fg(color));
        let line = if snap.game_over.is_some() {
            Line::from(vec![
                hint("R/Enter", Color::Cyan),
                Span::raw(" restart | "),
                hint("Q/Esc", Color::Red),
                Span::raw(" quit"),
            ])
        } else {
            match snap.menu {
                MenuState::Confirm(_) => Line::from(vec![
                    hint("Y", Color::Green),
                    Span::raw(" yes | "),
                    hint("N", Color::Red),
                    Span::raw(" no | "),
                    hint("Esc", Color::Red),
                    Span::raw(" quit"),
                ]),
                MenuState::Paused => Line::from(vec![
                    hint("Enter", Color::Cyan),
                    Span::raw(" resume | "),
                    hint("R", Color::Cyan),
                    Span::raw(" restart | "),
                    hint("Q", Color::Red),
                    Span::raw(" quit"),
                ]),
                MenuState::Running => Line::from(vec![
                    hint("↑↓←→", Color::Cyan),
                    Span::raw(" or "),
                    hint("WASD", Color::Cyan),
                    Span::raw(" to move | "),
                    hint("Space", Color::Cyan),
                    Span::raw(" pause | "),
                    hint("Esc", Color::Red),
                    Span::raw(" quit"),
                ]),
            }
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn button_line(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("[{}] ", key),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, Style::default().fg(Color::White)),
    ])
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Move `popup` down so the border and title row of `pause_popup` stay visible
fn below_title(popup: Rect, pause_popup: Rect, area: Rect) -> Rect {
    let lowest = area.bottom().saturating_sub(popup.height);
    Rect {
        y: popup.y.max(pause_popup.y + 3).min(lowest),
        ..popup
    }
}
