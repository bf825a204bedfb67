//! Undo/redo keyboard shortcut resolution.
//!
//! Pure chord matching shared by both workspaces: the host feeds the
//! pressed key plus modifier flags and the current focus context, and gets
//! back the shortcut to dispatch (if any). A resolved shortcut implies the
//! host consumes the event instead of letting it bubble.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A pressed key with its modifier flags. `meta` is Cmd on macOS; the
/// mapping treats Ctrl and Cmd interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// Where keyboard focus currently sits in the host UI.
///
/// Shortcuts are suppressed while an editable element has focus so that
/// Ctrl+Z in a text field stays a text-level undo. This guard applies to
/// both workspaces uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusContext {
    TextInput,
    TextArea,
    ContentEditable,
    Other,
}

impl FocusContext {
    pub fn is_editable(self) -> bool {
        !matches!(self, FocusContext::Other)
    }
}

/// A workspace-level history shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryShortcut {
    Undo,
    Redo,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a key chord against the history shortcut map.
///
/// - Ctrl/Cmd+Z (without Shift) -> Undo
/// - Ctrl/Cmd+Y, Ctrl/Cmd+Shift+Z -> Redo
/// - Alt disqualifies; editable focus disqualifies.
pub fn resolve(chord: KeyChord, focus: FocusContext) -> Option<HistoryShortcut> {
    if focus.is_editable() || chord.alt {
        return None;
    }
    let primary = chord.ctrl || chord.meta;
    if !primary {
        return None;
    }

    match chord.key.to_ascii_lowercase() {
        'z' if chord.shift => Some(HistoryShortcut::Redo),
        'z' => Some(HistoryShortcut::Undo),
        'y' if !chord.shift => Some(HistoryShortcut::Redo),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_z_is_undo() {
        assert_eq!(
            resolve(KeyChord::new('z').ctrl(), FocusContext::Other),
            Some(HistoryShortcut::Undo)
        );
    }

    #[test]
    fn cmd_z_is_undo() {
        assert_eq!(
            resolve(KeyChord::new('z').meta(), FocusContext::Other),
            Some(HistoryShortcut::Undo)
        );
    }

    #[test]
    fn ctrl_shift_z_is_redo() {
        assert_eq!(
            resolve(KeyChord::new('z').ctrl().shift(), FocusContext::Other),
            Some(HistoryShortcut::Redo)
        );
    }

    #[test]
    fn ctrl_y_is_redo() {
        assert_eq!(
            resolve(KeyChord::new('y').ctrl(), FocusContext::Other),
            Some(HistoryShortcut::Redo)
        );
    }

    #[test]
    fn uppercase_key_matches() {
        // Shift+Z arrives as 'Z' from some hosts.
        assert_eq!(
            resolve(KeyChord::new('Z').ctrl().shift(), FocusContext::Other),
            Some(HistoryShortcut::Redo)
        );
    }

    #[test]
    fn plain_z_without_modifier_is_ignored() {
        assert_eq!(resolve(KeyChord::new('z'), FocusContext::Other), None);
    }

    #[test]
    fn alt_disqualifies() {
        assert_eq!(
            resolve(KeyChord::new('z').ctrl().alt(), FocusContext::Other),
            None
        );
    }

    #[test]
    fn ctrl_shift_y_is_ignored() {
        assert_eq!(
            resolve(KeyChord::new('y').ctrl().shift(), FocusContext::Other),
            None
        );
    }

    #[test]
    fn editable_focus_suppresses_shortcuts() {
        for focus in [
            FocusContext::TextInput,
            FocusContext::TextArea,
            FocusContext::ContentEditable,
        ] {
            assert_eq!(resolve(KeyChord::new('z').ctrl(), focus), None);
            assert_eq!(resolve(KeyChord::new('y').ctrl(), focus), None);
        }
    }

    #[test]
    fn other_keys_with_ctrl_are_ignored() {
        assert_eq!(resolve(KeyChord::new('a').ctrl(), FocusContext::Other), None);
        assert_eq!(resolve(KeyChord::new('s').meta(), FocusContext::Other), None);
    }
}
