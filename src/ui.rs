use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app_core::state::{AppState, CardSlot};
use crate::texture::Texture;

const NEXT_LABEL: &str = " Next ▶ ";

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    f.render_widget(
        Block::default().style(app.theme.text.bg(app.theme.background)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header - name, user index, next button
            Constraint::Min(0),    // Cards - takes all remaining space
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_cards(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.show_help {
        render_help_overlay(f, app);
    }
}

fn render_header(f: &mut Frame, app: &mut AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border)
        .title(" Deck ")
        .title_style(app.theme.title);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let button_width = NEXT_LABEL.width() as u16;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(button_width)])
        .split(inner_area);

    let name = if app.player_name.is_empty() {
        "-"
    } else {
        app.player_name.as_str()
    };
    let mut spans = vec![
        Span::styled("Player: ", app.theme.title),
        Span::styled(name.to_string(), app.theme.text),
        Span::styled(
            format!("  user {}/{}", app.current_user, app.total_users),
            app.theme.muted,
        ),
    ];
    if !app.deck_ids.is_empty() {
        let ids = app
            .deck_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        spans.push(Span::styled(
            format!("  {} [{}]", app.deck_source.label(), ids),
            app.theme.muted,
        ));
    }
    if app.loading {
        spans.push(Span::styled("  loading…", app.theme.title));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let button_style = if !app.next_enabled {
        app.theme.muted.add_modifier(Modifier::DIM)
    } else if app.next_hovered {
        app.theme.button.add_modifier(Modifier::REVERSED)
    } else {
        app.theme.button
    };
    f.render_widget(Paragraph::new(NEXT_LABEL).style(button_style), chunks[1]);
    app.next_button_area = Some(chunks[1]);
}

fn render_cards(f: &mut Frame, app: &mut AppState, area: Rect) {
    let count = app.slots.len();
    if count == 0 {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (idx, (slot, column)) in app.slots.iter().zip(columns.iter()).enumerate() {
        render_card(f, app, idx, slot, *column);
    }
}

fn render_card(f: &mut Frame, app: &AppState, idx: usize, slot: &CardSlot, area: Rect) {
    let border_style = if slot.title.is_empty() {
        app.theme.border
    } else {
        app.theme.border_selected
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(format!(" {} ", idx + 1))
        .title_style(app.theme.title);
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if inner_area.width == 0 || inner_area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Image
            Constraint::Length(1), // Title
            Constraint::Length(1), // Subtitle
        ])
        .split(inner_area);

    match &slot.image {
        Some(texture) => f.render_widget(TextureView::new(texture), chunks[0]),
        None => {
            let middle = Rect::new(
                chunks[0].x,
                chunks[0].y + chunks[0].height / 2,
                chunks[0].width,
                chunks[0].height.min(1),
            );
            f.render_widget(
                Paragraph::new("no image")
                    .style(app.theme.muted)
                    .alignment(Alignment::Center),
                middle,
            );
        }
    }

    let width = inner_area.width as usize;
    f.render_widget(
        Paragraph::new(truncate_to_width(&slot.title, width))
            .style(app.theme.title)
            .alignment(Alignment::Center),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(truncate_to_width(&slot.subtitle, width))
            .style(app.theme.muted)
            .alignment(Alignment::Center),
        chunks[2],
    );
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("←/→ ", key_style),
        Span::raw("user  "),
        Span::styled("r ", key_style),
        Span::raw("reload  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let status = match &app.last_error {
        Some(error) => Line::from(Span::styled(
            truncate_to_width(error, chunks[1].width as usize),
            app.theme.error,
        )),
        None => {
            let painted = app.slots.iter().filter(|slot| !slot.title.is_empty()).count();
            Line::from(format!("Cards: {}/{}", painted, app.slots.len()))
        }
    };
    f.render_widget(
        Paragraph::new(status)
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(format!("deck-tui {}", app.app_version))
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(48).saturating_sub(4);
    let popup_height = 14.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <14}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Navigation",
        vec![
            ("→ | n | l", "next user"),
            ("← | p | h", "previous user"),
            ("r", "reload current user"),
            ("Click Next", "next user"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "General",
        vec![("?", "toggle help"), ("q | Esc", "quit")],
    ));

    let content = Rect::new(
        inner_area.x + 1,
        inner_area.y + 1,
        inner_area.width.saturating_sub(2),
        inner_area.height.saturating_sub(2),
    );
    f.render_widget(Paragraph::new(lines), content);
}

/// Draws a texture with half-block cells: each cell shows two vertically
/// stacked pixels, the upper as foreground and the lower as background.
pub struct TextureView<'a> {
    texture: &'a Texture,
}

impl<'a> TextureView<'a> {
    pub fn new(texture: &'a Texture) -> Self {
        Self { texture }
    }
}

impl Widget for TextureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let target = fit_texture(self.texture.width(), self.texture.height(), area);
        let cols = target.width as u32;
        let rows = target.height as u32 * 2;
        for cy in 0..target.height {
            for cx in 0..target.width {
                let top = self.texture.sample(cx as u32, cy as u32 * 2, cols, rows);
                let bottom = self.texture.sample(cx as u32, cy as u32 * 2 + 1, cols, rows);
                if let Some(cell) = buf.cell_mut((target.x + cx, target.y + cy)) {
                    cell.set_symbol("▀").set_fg(rgb(top)).set_bg(rgb(bottom));
                }
            }
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Largest centred cell rectangle inside `area` that keeps the texture's
/// aspect ratio, counting two pixel rows per cell.
pub fn fit_texture(width: u32, height: u32, area: Rect) -> Rect {
    if width == 0 || height == 0 || area.is_empty() {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let max_cols = area.width as u32;
    let max_rows = area.height as u32 * 2;
    let (cols, rows) = if max_cols * height <= max_rows * width {
        (max_cols, (max_cols * height / width).max(1))
    } else {
        ((max_rows * width / height).max(1), max_rows)
    };
    let cell_width = cols.min(max_cols) as u16;
    let cell_height = rows.div_ceil(2).min(area.height as u32) as u16;
    Rect::new(
        area.x + (area.width - cell_width) / 2,
        area.y + (area.height - cell_height) / 2,
        cell_width,
        cell_height,
    )
}

/// Cuts `text` to `max_width` terminal cells, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        if width + char_width > max_width - 1 {
            break;
        }
        out.push(ch);
        width += char_width;
    }
    out.push('…');
    out
}
