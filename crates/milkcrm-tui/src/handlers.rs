//! Keyboard event handling.

use crate::app::{App, InputMode, Managed, Tab};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use milkcrm_core::{AdminKind, ClientKind, StaffKind};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return true;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Palette => handle_palette_key(app, key),
        InputMode::PasswordForm => handle_password_key(app, key),
        InputMode::Search | InputMode::Form | InputMode::ConfirmDelete => match app.tab {
            Tab::Clients => handle_list_mode_key::<ClientKind>(app, key),
            Tab::Staff => handle_list_mode_key::<StaffKind>(app, key),
            Tab::Settings => handle_list_mode_key::<AdminKind>(app, key),
            Tab::Dashboard => {
                app.input_mode = InputMode::Normal;
                false
            }
        },
    }
}

fn handle_list_mode_key<K: Managed>(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Search => handle_search_key::<K>(app, key),
        InputMode::Form => handle_form_key::<K>(app, key),
        InputMode::ConfirmDelete => handle_confirm_key::<K>(app, key),
        _ => false,
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+P opens quick find
    if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.open_palette();
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return true;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.select_tab(Tab::ALL[index]);
            return false;
        }
        KeyCode::Tab => {
            app.select_tab(app.tab.next());
            return false;
        }
        _ => {}
    }

    match app.tab {
        Tab::Dashboard => handle_dashboard_key(app, key),
        Tab::Clients => handle_list_key::<ClientKind>(app, key),
        Tab::Staff => handle_list_key::<StaffKind>(app, key),
        Tab::Settings => {
            if key.code == KeyCode::Char('p') {
                app.open_password_form();
                false
            } else {
                handle_list_key::<AdminKind>(app, key)
            }
        }
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.step_dashboard_date(-1),
        KeyCode::Right | KeyCode::Char('l') => app.step_dashboard_date(1),
        KeyCode::Char('s') => app.cycle_dashboard_shift(),
        KeyCode::Char('r') => app.fetch_dashboard(),
        _ => {}
    }
    false
}

fn handle_list_key<K: Managed>(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_selection::<K>(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection::<K>(-1),
        KeyCode::Left | KeyCode::Char('h') => app.change_page::<K>(-1),
        KeyCode::Right | KeyCode::Char('l') => app.change_page::<K>(1),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('n') => app.start_create::<K>(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit::<K>(),
        KeyCode::Char('d') => app.request_delete::<K>(),
        KeyCode::Char('r') => app.load::<K>(),
        KeyCode::Esc => app.dismiss_messages::<K>(),
        _ => {}
    }
    false
}

fn handle_search_key<K: Managed>(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        // Keep the term and go back to the list
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.edit_search::<K>(String::clear);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char(c) => app.edit_search::<K>(|term| term.push(c)),
        KeyCode::Backspace => app.edit_search::<K>(|term| {
            term.pop();
        }),
        _ => {}
    }
    false
}

fn handle_form_key<K: Managed>(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_form::<K>(),
        KeyCode::Enter => app.submit::<K>(),
        KeyCode::Tab | KeyCode::Down => app.focus_field::<K>(1),
        KeyCode::BackTab | KeyCode::Up => app.focus_field::<K>(-1),
        KeyCode::Backspace => app.form_backspace::<K>(),
        KeyCode::Char(c) => app.form_input::<K>(c),
        _ => {}
    }
    false
}

fn handle_confirm_key<K: Managed>(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_delete::<K>(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_delete::<K>(false),
        _ => {}
    }
    false
}

fn handle_password_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_password_form(),
        KeyCode::Enter => app.submit_password(),
        KeyCode::Tab | KeyCode::Down => app.focus_password_field(1),
        KeyCode::BackTab | KeyCode::Up => app.focus_password_field(-1),
        KeyCode::Backspace => app.edit_password_field(|value| {
            value.pop();
        }),
        KeyCode::Char(c) => app.edit_password_field(|value| value.push(c)),
        _ => {}
    }
    false
}

fn handle_palette_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_palette(),
        KeyCode::Enter => app.select_palette(),
        KeyCode::Up => app.move_palette(-1),
        KeyCode::Down => app.move_palette(1),
        KeyCode::Char(c) => app.edit_palette(|query| query.push(c)),
        KeyCode::Backspace => app.edit_palette(|query| {
            query.pop();
        }),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{client, seed_clients, test_app};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_tab_keys() {
        let mut app = test_app(10);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, Tab::Staff);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Settings);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Dashboard);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app(10);
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        let mut app = test_app(10);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_mode_edits_term() {
        let mut app = test_app(10);
        seed_clients(
            &mut app,
            vec![client("1", "Asha", "Sector 4"), client("2", "Bala", "MG Road")],
        );
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        // 'q' is text here, not quit
        type_str(&mut app, "roaq");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.clients.search_term(), "roa");
        assert_eq!(app.clients.visible().len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.clients.search_term(), "roa");

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.clients.search_term(), "");
    }

    #[test]
    fn test_edit_form_roundtrip_keys() {
        let mut app = test_app(10);
        seed_clients(&mut app, vec![client("1", "Asha", "Sector 4")]);
        press(&mut app, KeyCode::Char('2'));

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.clients.form().name, "Asha");

        type_str(&mut app, " Devi");
        assert_eq!(app.clients.form().name, "Asha Devi");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.clients.is_form_open());
    }

    #[test]
    fn test_delete_needs_yes() {
        let mut app = test_app(10);
        seed_clients(&mut app, vec![client("1", "Asha", "Sector 4")]);
        press(&mut app, KeyCode::Char('2'));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_settings_opens_password_form() {
        let mut app = test_app(10);
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.input_mode, InputMode::PasswordForm);

        type_str(&mut app, "old");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "n");
        assert_eq!(app.password.form().current_password, "old");
        assert_eq!(app.password.form().new_password, "n");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.password.is_open());
    }

    #[test]
    fn test_palette_keys() {
        let mut app = test_app(10);
        seed_clients(
            &mut app,
            vec![client("1", "Asha", "Sector 4"), client("2", "Bala", "MG Road")],
        );
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));
        assert_eq!(app.input_mode, InputMode::Palette);

        type_str(&mut app, "bala");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tab, Tab::Clients);
        assert_eq!(app.selected::<ClientKind>().unwrap().name, "Bala");
    }
}
