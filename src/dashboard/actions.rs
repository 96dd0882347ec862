use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::navigation::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Top,
    Bottom,
    DrillIn,
    Back,
    PageForward,
    PageBack,
    /// Zero-based breadcrumb level.
    JumpTo(usize),
    SwitchEnvironment,
    ToggleAutoRefresh,
    Edit,
    Delete,
    OpenContextSelector,
    Help,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::DrillIn => "drill_in",
            Action::Back => "back",
            Action::PageForward => "page_forward",
            Action::PageBack => "page_back",
            Action::JumpTo(_) => "jump_to",
            Action::SwitchEnvironment => "switch_environment",
            Action::ToggleAutoRefresh => "toggle_auto_refresh",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::OpenContextSelector => "open_context_selector",
            Action::Help => "help",
        }
    }
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn is_delete_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('d') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Keys of the table view. Overlays map their own keys.
pub fn table_action_from_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Some(Action::Delete),
            KeyCode::Char('e') => Some(Action::SwitchEnvironment),
            KeyCode::Char('f') => Some(Action::PageForward),
            KeyCode::Char('b') => Some(Action::PageBack),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::End | KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Enter | KeyCode::Right => Some(Action::DrillIn),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => Some(Action::Back),
        KeyCode::PageDown => Some(Action::PageForward),
        KeyCode::PageUp => Some(Action::PageBack),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|digit| Action::JumpTo(digit as usize - 1)),
        KeyCode::Char('r') => Some(Action::ToggleAutoRefresh),
        KeyCode::Char('e') => Some(Action::Edit),
        KeyCode::Char(':') => Some(Action::OpenContextSelector),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Cancel,
    Save,
    NextColumn,
    PrevColumn,
    Toggle,
    Backspace,
    Input(char),
}

pub fn edit_action_from_key(key: KeyEvent) -> Option<EditAction> {
    match key.code {
        KeyCode::Esc => Some(EditAction::Cancel),
        KeyCode::Enter => Some(EditAction::Save),
        KeyCode::Tab => Some(EditAction::NextColumn),
        KeyCode::BackTab => Some(EditAction::PrevColumn),
        KeyCode::Backspace => Some(EditAction::Backspace),
        KeyCode::Char(' ') => Some(EditAction::Toggle),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(EditAction::Input(c))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAction {
    Cancel,
    Submit,
    Complete,
    Backspace,
    Input(char),
}

pub fn selector_action_from_key(key: KeyEvent) -> Option<SelectorAction> {
    match key.code {
        KeyCode::Esc => Some(SelectorAction::Cancel),
        KeyCode::Enter => Some(SelectorAction::Submit),
        KeyCode::Tab => Some(SelectorAction::Complete),
        KeyCode::Backspace => Some(SelectorAction::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SelectorAction::Input(c))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
    /// Lower shows first and survives trimming longest.
    pub priority: u8,
}

const HINT_SEPARATOR: &str = "  ";

fn hint(key: &'static str, label: &'static str, priority: u8) -> KeyHint {
    KeyHint {
        key,
        label,
        priority,
    }
}

/// Hints for the table view, in display order. `Esc` is only offered when there is a view
/// to go back to.
pub fn key_hints(
    mode: ViewMode,
    editable: bool,
    auto_refresh: bool,
    has_history: bool,
) -> Vec<KeyHint> {
    let mut hints = vec![
        hint("?", "help", 0),
        hint("Enter", "open", 1),
        hint("Esc", "back", 1),
        hint("PgUp/PgDn", "page", 2),
        hint(":", "context", 3),
        hint("^E", "env", 4),
        hint(
            "r",
            if auto_refresh {
                "auto-refresh off"
            } else {
                "auto-refresh"
            },
            5,
        ),
        hint("1-9", "crumb", 6),
    ];
    if editable {
        hints.insert(4, hint("e", "edit", 2));
    }
    if mode == ViewMode::Instances {
        hints.insert(4, hint("^D", "delete", 3));
    }
    if !has_history {
        hints.retain(|hint| hint.key != "Esc");
    }
    hints.push(hint("^C", "quit", 0));
    hints
}

fn render_hint(hint: &KeyHint) -> String {
    format!("<{}> {}", hint.key, hint.label)
}

/// Joins hints into one line no wider than `width`, dropping the least important first.
pub fn fit_key_hints(hints: &[KeyHint], width: usize) -> String {
    let mut kept = hints.to_vec();
    loop {
        let line = kept
            .iter()
            .map(render_hint)
            .collect::<Vec<_>>()
            .join(HINT_SEPARATOR);
        if line.chars().count() <= width || kept.is_empty() {
            return line;
        }
        let Some((index, _)) = kept
            .iter()
            .enumerate()
            .max_by_key(|(index, hint)| (hint.priority, *index))
        else {
            return String::new();
        };
        kept.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn table_keys_map_to_actions() {
        assert_eq!(table_action_from_key(key(KeyCode::Enter)), Some(Action::DrillIn));
        assert_eq!(table_action_from_key(key(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(
            table_action_from_key(key(KeyCode::PageDown)),
            Some(Action::PageForward)
        );
        assert_eq!(table_action_from_key(ctrl('f')), Some(Action::PageForward));
        assert_eq!(table_action_from_key(ctrl('b')), Some(Action::PageBack));
        assert_eq!(table_action_from_key(ctrl('e')), Some(Action::SwitchEnvironment));
        assert_eq!(table_action_from_key(ctrl('d')), Some(Action::Delete));
        assert_eq!(
            table_action_from_key(key(KeyCode::Char('1'))),
            Some(Action::JumpTo(0))
        );
        assert_eq!(
            table_action_from_key(key(KeyCode::Char('9'))),
            Some(Action::JumpTo(8))
        );
        assert_eq!(table_action_from_key(key(KeyCode::Char('0'))), None);
        assert_eq!(table_action_from_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn only_ctrl_c_quits() {
        assert!(is_quit_key(&ctrl('c')));
        assert!(!is_quit_key(&key(KeyCode::Char('q'))));
        assert!(!is_quit_key(&key(KeyCode::Esc)));
    }

    #[test]
    fn overlay_keys_map_to_their_own_actions() {
        assert_eq!(
            edit_action_from_key(key(KeyCode::BackTab)),
            Some(EditAction::PrevColumn)
        );
        assert_eq!(
            edit_action_from_key(key(KeyCode::Char(' '))),
            Some(EditAction::Toggle)
        );
        assert_eq!(
            edit_action_from_key(key(KeyCode::Char('7'))),
            Some(EditAction::Input('7'))
        );
        assert_eq!(
            selector_action_from_key(key(KeyCode::Tab)),
            Some(SelectorAction::Complete)
        );
        assert_eq!(selector_action_from_key(ctrl('x')), None);
    }

    #[test]
    fn hints_are_trimmed_by_priority() {
        let hints = key_hints(ViewMode::Instances, true, false, true);
        let full = fit_key_hints(&hints, 500);
        assert!(full.contains("<Esc> back"));
        assert!(full.contains("<^D> delete"));
        assert!(full.contains("<e> edit"));

        let narrow = fit_key_hints(&hints, 30);
        assert!(narrow.chars().count() <= 30);
        assert!(narrow.contains("<?> help"));
        assert!(!narrow.contains("crumb"));
        assert_eq!(fit_key_hints(&hints, 0), "");
    }

    #[test]
    fn delete_hint_only_in_instances() {
        let hints = key_hints(ViewMode::Definitions, false, true, false);
        let line = fit_key_hints(&hints, 500);
        assert!(!line.contains("delete"));
        assert!(!line.contains("<Esc> back"));
        assert!(line.contains("auto-refresh off"));
    }
}
