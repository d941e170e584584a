use crate::app::Screen;
use crate::viewport::Navigation;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ReturnToMenu,
    Navigate(Navigation),
    SubmitInput,
    CancelInput,
    Backspace,
    InputChar(char),
}

pub fn map_key(screen: Screen, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match screen {
        Screen::Menu => map_menu_key(key),
        Screen::Table => map_table_key(key),
    }
}

fn map_table_key(key: KeyEvent) -> Option<Action> {
    let navigate = |navigation| Some(Action::Navigate(navigation));
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => Some(Action::ReturnToMenu),
        KeyCode::Char('>') | KeyCode::Right => navigate(Navigation::NextColumnPage),
        KeyCode::Char('.') if key.modifiers.contains(KeyModifiers::SHIFT) => {
            navigate(Navigation::NextColumnPage)
        }
        KeyCode::Char('<') | KeyCode::Left => navigate(Navigation::PrevColumnPage),
        KeyCode::Char(',') if key.modifiers.contains(KeyModifiers::SHIFT) => {
            navigate(Navigation::PrevColumnPage)
        }
        KeyCode::Char('j') | KeyCode::Down => navigate(Navigation::ScrollDown),
        KeyCode::Char('k') | KeyCode::Up => navigate(Navigation::ScrollUp),
        KeyCode::PageDown => navigate(Navigation::PageDown),
        KeyCode::PageUp => navigate(Navigation::PageUp),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            navigate(Navigation::PageDown)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            navigate(Navigation::PageUp)
        }
        _ => None,
    }
}

fn map_menu_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::CancelInput),
        KeyCode::Enter => Some(Action::SubmitInput),
        KeyCode::Char('m') | KeyCode::Char('j')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(Action::SubmitInput)
        }
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            Some(Action::InputChar(c))
        }
        _ => None,
    }
}
