use crate::remote::Remote;

use super::app::{App, PromptKind};
use super::*;

pub(super) fn run_loop<R: Remote>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<R>,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        // Typed search text is applied once keys stop arriving for one poll window.
        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        } else {
            app.flush_search();
        }
    }
}

pub(super) fn handle_key<R: Remote>(app: &mut App<R>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    if app.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
            _ => {}
        }
        return;
    }
    if app.prompt.is_some() {
        handle_prompt_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if !app.console.view().selected.is_empty() {
                app.run(crate::console::Command::ClearSelection);
            } else {
                app.quit = true;
            }
        }

        KeyCode::Up | KeyCode::Char('k') => app.move_by(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_by(1),
        KeyCode::PageUp => app.move_by(-10),
        KeyCode::PageDown => app.move_by(10),
        KeyCode::Home => app.move_to(0),
        KeyCode::End => app.move_to(usize::MAX),

        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.toggle_expand(),
        KeyCode::Left | KeyCode::Char('h') => app.collapse_or_parent(),
        KeyCode::Char(' ') => app.toggle_select(),
        KeyCode::Char('a') => {
            app.run(crate::console::Command::ExpandAll);
        }
        KeyCode::Char('A') => {
            app.run(crate::console::Command::CollapseAll);
        }
        KeyCode::Char('f') => app.toggle_flat(),
        KeyCode::Char('F') => app.toggle_folders(),

        KeyCode::Char('/') => app.open_prompt(PromptKind::Search),
        KeyCode::Char('e') => app.open_prompt(PromptKind::Extension),
        KeyCode::Char('n') => app.open_prompt(PromptKind::NewDirectory),
        KeyCode::Char('u') => app.open_upload(),
        KeyCode::Char('r') => app.open_rename(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),

        KeyCode::Char('R') | KeyCode::F(5) => app.refresh(),
        KeyCode::Char('L') => app.open_prompt(PromptKind::Login),
        KeyCode::Char('O') => app.sign_out(),
        _ => {}
    }
}

fn handle_prompt_key<R: Remote>(app: &mut App<R>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Backspace => {
            app.input.backspace();
            app.search_dirty = true;
        }
        KeyCode::Delete => {
            app.input.delete();
            app.search_dirty = true;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.clear();
            app.search_dirty = true;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_char(c);
            app.search_dirty = true;
        }
        _ => {}
    }
}
