// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAction {
    Continue,
    Commit,
    Cancel,
}

/// Single-line text input with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    pub(crate) fn new(initial: &str) -> Self {
        Self {
            text: initial.to_owned(),
            cursor: initial.chars().count(),
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> EditAction {
        match code {
            KeyCode::Enter => return EditAction::Commit,
            KeyCode::Esc => return EditAction::Cancel,
            KeyCode::Char(ch) => self.insert(ch),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => {}
        }
        EditAction::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    fn delete(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::{EditAction, LineEditor};

    fn type_str(editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            assert_eq!(editor.handle_key(KeyCode::Char(ch)), EditAction::Continue);
        }
    }

    #[test]
    fn starts_with_cursor_at_end() {
        let editor = LineEditor::new("Power");
        assert_eq!(editor.cursor(), 5);
        assert_eq!(editor.text(), "Power");
    }

    #[test]
    fn edits_around_the_cursor() {
        let mut editor = LineEditor::new("GPU");
        editor.handle_key(KeyCode::Home);
        type_str(&mut editor, "Fast ");
        assert_eq!(editor.text(), "Fast GPU");
        editor.handle_key(KeyCode::End);
        editor.handle_key(KeyCode::Backspace);
        assert_eq!(editor.text(), "Fast GP");
        editor.handle_key(KeyCode::Home);
        editor.handle_key(KeyCode::Delete);
        assert_eq!(editor.text(), "ast GP");
        editor.handle_key(KeyCode::Left);
        editor.handle_key(KeyCode::Backspace);
        assert_eq!(editor.text(), "ast GP");
    }

    #[test]
    fn handles_multibyte_text() {
        let mut editor = LineEditor::new("Ωmega");
        editor.handle_key(KeyCode::Home);
        editor.handle_key(KeyCode::Right);
        editor.handle_key(KeyCode::Backspace);
        assert_eq!(editor.text(), "mega");
        type_str(&mut editor, "µ");
        assert_eq!(editor.text(), "µmega");
    }

    #[test]
    fn enter_and_escape_finish_editing() {
        let mut editor = LineEditor::new("x");
        assert_eq!(editor.handle_key(KeyCode::Enter), EditAction::Commit);
        assert_eq!(editor.handle_key(KeyCode::Esc), EditAction::Cancel);
        editor.clear();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }
}
