use cloze_author_engine::Run;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus};

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(5),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(f.area());

    let sentence = Paragraph::new(sentence_line(app))
        .block(panel("Sentence", app.focus == Focus::Sentence))
        .wrap(Wrap { trim: false });
    f.render_widget(sentence, rows[0]);

    let preview = Paragraph::new(app.engine.render())
        .block(Block::default().borders(Borders::ALL).title("Preview"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, rows[1]);

    let blank_items: Vec<ListItem> = app
        .engine
        .spans()
        .map(|span| {
            let checkbox = if span.checked { "[x] " } else { "[ ] " };
            ListItem::new(Line::from(vec![
                Span::raw(checkbox),
                Span::raw(span.text.clone()),
            ]))
        })
        .collect();
    let blanks = List::new(blank_items)
        .block(panel("Blanks", app.focus == Focus::Blanks))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(blanks, rows[2], &mut app.blank_list_state);

    let title = if app.dirty { "* " } else { "" };
    let help = match app.focus {
        Focus::Sentence => "Tab: Blanks | ←/→: Move | Shift+←/→: Select | Ctrl-u: Underline",
        Focus::Blanks => "Tab: Sentence | ↑/↓: Select | Space: Toggle | d: Delete | K/J: Move",
    };
    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(format!("{title}{help} | Ctrl-s: Save | Esc: Quit")),
    ]);
    f.render_widget(footer, rows[3]);
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// The sentence with blanks underlined, the selection reversed and the caret highlighted
fn sentence_line(app: &App) -> Line<'static> {
    let (sel_start, sel_end) = app.selection();
    let mut spans = Vec::new();
    let mut offset = 0;

    for run in app.engine.document().runs() {
        let base = match run {
            Run::Plain(_) => Style::default(),
            Run::Span { id, .. } => {
                let style = Style::default().add_modifier(Modifier::UNDERLINED);
                if app.engine.registry().is_checked(*id).unwrap_or(false) {
                    style.fg(Color::Green)
                } else {
                    style.add_modifier(Modifier::DIM)
                }
            }
        };
        for ch in run.text().chars() {
            let mut style = base;
            if sel_start <= offset && offset < sel_end {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if offset == app.cursor && app.focus == Focus::Sentence {
                style = style.bg(Color::Yellow).fg(Color::Black);
            }
            spans.push(Span::styled(ch.to_string(), style));
            offset += 1;
        }
    }

    if app.cursor == offset && app.focus == Focus::Sentence {
        spans.push(Span::styled(" ", Style::default().bg(Color::Yellow)));
    }
    Line::from(spans)
}
