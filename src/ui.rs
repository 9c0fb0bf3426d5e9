use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::agent::AgentTag;
use crate::app::{App, InputMode};
use crate::conversation::Role;
use crate::markdown::{self, DisplayBlock, Inline};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, agent row, input, footer
    let [header_area, chat_area, agents_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_agent_row(app, frame, agents_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_agent_picker {
        render_agent_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " Dados Recife — Assistente Ana ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("[{}] ", app.controller.conversation().id()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.client.base_url()));

    // Store chat area dimensions for scroll calculations and mouse
    // hit-testing (inner size minus borders)
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.controller.conversation().snapshot() {
        match msg.role {
            Role::User => {
                lines.push(Line::from(Span::styled(
                    "Você:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.content.lines() {
                    lines.push(Line::from(line.to_string()));
                }
                lines.push(Line::default());
            }
            Role::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Ana:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                lines.extend(message_lines(&msg.content));
                lines.push(Line::default());
            }
        }
    }

    if app.controller.is_pending() {
        lines.push(Line::from(Span::styled(
            "Ana:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Digitando{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_agent_row(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::raw(" Agente: ")];
    for (i, tag) in AgentTag::all().iter().enumerate() {
        let style = if *tag == app.controller.current_agent() {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, tag.label()), style));
        spans.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_border_color = match app.input_mode {
        InputMode::Editing => Color::Yellow,
        InputMode::Normal => Color::DarkGray,
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Pergunta (Enter para enviar) ");

    // Calculate visible portion of input with horizontal scrolling.
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.query_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.query_input.is_empty() && app.input_mode == InputMode::Editing {
        Paragraph::new(app.controller.current_agent().placeholder())
            .style(Style::default().fg(Color::DarkGray))
            .block(input_block)
    } else {
        let visible_text: String = app
            .query_input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block)
    };

    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing {
        // With a degenerate inner width the offset never advances, so the
        // column is clamped before it is added to the area origin.
        let cursor_col = (cursor_pos - scroll_offset).min(inner_width) as u16;
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(cursor_col)
            .min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (
            " NORMAL ",
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        InputMode::Editing => (
            " EDIÇÃO ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };

    let hints = match app.input_mode {
        InputMode::Normal => " i editar · j/k rolar · 1-5/Tab agente · P seletor · q sair",
        InputMode::Editing => " Enter enviar · Tab agente · Esc navegar · Ctrl+C sair",
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

fn render_agent_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = (AgentTag::all().len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let items: Vec<ListItem> = AgentTag::all()
        .iter()
        .map(|tag| ListItem::new(format!(" {} — {} ", tag.label(), tag.description())))
        .collect();

    let picker = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Selecione o agente especialista "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(picker, popup, &mut app.agent_picker_state);
}

/// Render assistant text as styled terminal lines via the display blocks.
pub fn message_lines(content: &str) -> Vec<Line<'static>> {
    let blocks = markdown::render(content);
    let mut lines = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        block_lines(block, &mut lines);
    }

    lines
}

fn block_lines(block: &DisplayBlock, lines: &mut Vec<Line<'static>>) {
    match block {
        DisplayBlock::Heading { level, text } => {
            let style = heading_style(*level);
            for line in text.lines() {
                lines.push(Line::from(Span::styled(line.to_string(), style)));
            }
        }
        DisplayBlock::BulletList { items } => {
            for item in items {
                push_list_item(lines, "• ".to_string(), item);
            }
        }
        DisplayBlock::NumberedList { items } => {
            // The split consumed the original ordinals; renumber in order.
            for (i, item) in items.iter().enumerate() {
                push_list_item(lines, format!("{}. ", i + 1), item);
            }
        }
        DisplayBlock::Paragraph { spans } => {
            inline_lines(spans, lines);
        }
    }
}

fn heading_style(level: u8) -> Style {
    let color = match level {
        1 => Color::Cyan,
        2 => Color::Blue,
        _ => Color::Magenta,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn push_list_item(lines: &mut Vec<Line<'static>>, marker: String, item: &str) {
    for (i, line) in item.lines().enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(marker.clone(), Style::default().fg(Color::Yellow)),
                Span::raw(line.to_string()),
            ]));
        } else {
            lines.push(Line::from(format!("  {line}")));
        }
    }
}

/// Flatten inline spans into lines, breaking on embedded newlines while
/// preserving the span styling across the break.
fn inline_lines(spans: &[Inline], lines: &mut Vec<Line<'static>>) {
    let mut current: Vec<Span<'static>> = Vec::new();

    for span in spans {
        let style = inline_style(span);
        let mut parts = span.text().split('\n');

        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first.to_string(), style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
        }
    }

    lines.push(Line::from(current));
}

fn inline_style(span: &Inline) -> Style {
    match span {
        Inline::Plain(_) => Style::default(),
        Inline::Strong(_) => Style::default().add_modifier(Modifier::BOLD),
        Inline::Emphasis(_) => Style::default().add_modifier(Modifier::ITALIC),
    }
}
