mod app;
mod ui;

use anyhow::Result;
use cloze_author_config::{Config, DEFAULT_SENTENCE};
use cloze_author_engine::io;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

use crate::app::{App, Focus};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let path = match args.len() {
        2 => PathBuf::from(&args[1]),
        1 => config
            .as_ref()
            .map(|config| config.question_file("question"))
            .unwrap_or_else(|| PathBuf::from("question.json")),
        _ => {
            eprintln!("Usage: {} [question-file.json]", args[0]);
            process::exit(1);
        }
    };
    let seed = config
        .as_ref()
        .map(|config| config.default_sentence.as_str())
        .unwrap_or(DEFAULT_SENTENCE);

    let engine = match io::load_or_seed(&path, seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: Could not open '{}': {e}", path.display());
            process::exit(1);
        }
    };
    log::info!("Editing {}", path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(engine, path);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match (key.code, app.focus) {
            (KeyCode::Esc, _) => return Ok(()),
            (KeyCode::Char('s'), _) if ctrl => {
                if let Err(e) = app.save() {
                    log::error!("Save failed: {e:#}");
                    app.status = format!("Save failed: {e}");
                }
            }
            (KeyCode::Tab, _) => app.toggle_focus(),

            (KeyCode::Char('u'), Focus::Sentence) if ctrl => app.toggle_underline(),
            (KeyCode::Left, Focus::Sentence) => app.move_cursor(false, shift),
            (KeyCode::Right, Focus::Sentence) => app.move_cursor(true, shift),
            (KeyCode::Backspace, Focus::Sentence) => app.delete_backward(),
            (KeyCode::Delete, Focus::Sentence) => app.delete_forward(),
            (KeyCode::Char(c), Focus::Sentence) if !ctrl => {
                let mut buf = [0u8; 4];
                app.insert_text(c.encode_utf8(&mut buf));
            }

            (KeyCode::Down | KeyCode::Char('j'), Focus::Blanks) => app.select_next_blank(),
            (KeyCode::Up | KeyCode::Char('k'), Focus::Blanks) => app.select_previous_blank(),
            (KeyCode::Char(' '), Focus::Blanks) => app.toggle_selected_blank(),
            (KeyCode::Char('d'), Focus::Blanks) => app.delete_selected_blank(),
            (KeyCode::Char('J'), Focus::Blanks) => app.shift_selected_blank(true),
            (KeyCode::Char('K'), Focus::Blanks) => app.shift_selected_blank(false),
            _ => {}
        }
    }
}
