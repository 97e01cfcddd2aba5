//! Key handling for the input buffer.
//!
//! A plain Enter submits the buffer and is swallowed; Shift+Enter inserts a
//! newline instead.  Everything else edits the buffer in place.

/// A key press delivered by the presentation layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter, with or without Shift held.
    Enter {
        /// Whether Shift was held.
        shift: bool,
    },
    /// Delete the character before the cursor (always the end of the buffer).
    Backspace,
}

/// What a key press amounted to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum KeyAction {
    /// The buffer changed.
    Edited,
    /// The buffer should be submitted.
    Submit,
    /// Nothing happened.
    Ignored,
}

/// Applies `key` to `buffer`.
pub(crate) fn apply_key(buffer: &mut String, key: Key) -> KeyAction {
    match key {
        Key::Enter { shift: false } => KeyAction::Submit,
        Key::Enter { shift: true } => {
            buffer.push('\n');
            KeyAction::Edited
        }
        Key::Char(c) => {
            buffer.push(c);
            KeyAction::Edited
        }
        Key::Backspace => match buffer.pop() {
            Some(_) => KeyAction::Edited,
            None => KeyAction::Ignored,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_submits_without_newline() {
        let mut buffer = "hi".to_string();
        assert_eq!(apply_key(&mut buffer, Key::Enter { shift: false }), KeyAction::Submit);
        assert_eq!(buffer, "hi");
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut buffer = "hi".to_string();
        assert_eq!(apply_key(&mut buffer, Key::Enter { shift: true }), KeyAction::Edited);
        assert_eq!(buffer, "hi\n");
    }

    #[test]
    fn typing_and_backspace() {
        let mut buffer = String::new();
        for c in "дa".chars() {
            apply_key(&mut buffer, Key::Char(c));
        }
        assert_eq!(buffer, "дa");
        assert_eq!(apply_key(&mut buffer, Key::Backspace), KeyAction::Edited);
        assert_eq!(apply_key(&mut buffer, Key::Backspace), KeyAction::Edited);
        assert_eq!(apply_key(&mut buffer, Key::Backspace), KeyAction::Ignored);
        assert!(buffer.is_empty());
    }
}
