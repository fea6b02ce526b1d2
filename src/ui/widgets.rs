use crate::episode::Episode;
use crate::player::{format_seconds, ButtonState, NowPlaying, PlayerSnapshot};
use crate::theme::Rgb;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn render_episode_list(
    f: &mut Frame,
    area: Rect,
    episodes: &[Episode],
    playing_id: Option<&str>,
    list_state: &mut ListState,
) {
    let items: Vec<ListItem> = episodes
        .iter()
        .map(|episode| {
            let is_current = playing_id == Some(episode.id.as_str());
            let prefix = if is_current { "♪ " } else { "  " };

            let content = format!(
                "{}{} - {} ({})",
                prefix,
                episode.title,
                episode.display_members(),
                format_seconds(episode.duration)
            );

            let style = if is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Episodes"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("► ");

    f.render_stateful_widget(list, area, list_state);
}

pub fn render_episode_details(f: &mut Frame, area: Rect, episode: Option<&Episode>) {
    let text = episode.map(Episode::details).unwrap_or_default();
    let details = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));

    f.render_widget(details, area);
}

pub fn render_player(f: &mut Frame, area: Rect, snapshot: &PlayerSnapshot, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(4),    // Now playing
            Constraint::Length(1), // Progress
            Constraint::Length(3), // Buttons
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(snapshot.header_icon.glyph(), Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        Span::styled(snapshot.header_label, Style::default().add_modifier(Modifier::BOLD)),
    ]));
    f.render_widget(header, chunks[0]);

    render_now_playing(f, chunks[1], &snapshot.now_playing);
    render_progress(f, chunks[2], snapshot);
    render_buttons(f, chunks[3], snapshot);

    if let Some(status) = status {
        let status_line = Paragraph::new(status).style(Style::default().fg(Color::Gray));
        f.render_widget(status_line, chunks[4]);
    }
}

fn render_now_playing(f: &mut Frame, area: Rect, now_playing: &NowPlaying) {
    let block = Block::default().borders(Borders::ALL);

    let widget = match now_playing {
        NowPlaying::Episode {
            title,
            members,
            thumbnail,
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    title.as_str(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw(members.as_str())),
            ];
            if !thumbnail.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("🖼 {}", thumbnail),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block)
        }
        NowPlaying::Empty { message } => Paragraph::new(*message)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(block.border_style(Style::default().fg(Color::DarkGray))),
    };

    f.render_widget(widget, area);
}

fn render_progress(f: &mut Frame, area: Rect, snapshot: &PlayerSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(9), // Elapsed
            Constraint::Min(1),    // Slider
            Constraint::Length(9), // Total
        ])
        .split(area);

    let label_style = if snapshot.empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    f.render_widget(
        Paragraph::new(snapshot.elapsed_label.as_str()).style(label_style),
        chunks[0],
    );

    match &snapshot.slider {
        Some(slider) => {
            let gauge = LineGauge::default()
                .filled_style(Style::default().fg(color(slider.palette.track)))
                .unfilled_style(Style::default().fg(color(slider.palette.rail)))
                .ratio(slider.ratio().clamp(0.0, 1.0))
                .label("");
            f.render_widget(gauge, chunks[1]);
        }
        None => {
            // Inert track
            let track = "─".repeat(chunks[1].width as usize);
            f.render_widget(
                Paragraph::new(track).style(Style::default().fg(Color::DarkGray)),
                chunks[1],
            );
        }
    }

    f.render_widget(
        Paragraph::new(snapshot.total_label.as_str())
            .style(label_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn button_span(button: &ButtonState, accent: Color) -> Span<'static> {
    let style = if !button.enabled {
        Style::default().fg(Color::DarkGray)
    } else if button.active {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Span::styled(format!(" {} ", button.icon.glyph()), style)
}

fn render_buttons(f: &mut Frame, area: Rect, snapshot: &PlayerSnapshot) {
    let accent = snapshot
        .slider
        .map(|s| color(s.palette.track))
        .unwrap_or(Color::Green);

    let mut spans = Vec::new();
    for (i, button) in snapshot.controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(button_span(button, accent));
    }

    let border_style = if snapshot.empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let title = if snapshot.is_playing { "Playing" } else { "Paused" };
    let buttons = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

    f.render_widget(buttons, area);
}
