//! Form editing state.
//!
//! This module provides the cursor, selection and edit-mode handling for
//! the onboarding and settings forms shown inside a widget slot.

use newtab_protocol::{Form, FormAction};

/// Edit mode for form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Not currently editing.
    #[default]
    None,
    /// Editing a text field.
    Text {
        /// The current value being edited.
        value: String,
        /// The cursor position within the value, in bytes.
        cursor: usize,
    },
}

impl EditMode {
    /// Returns `true` if currently in edit mode.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the current edit value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Text { value, .. } => Some(value),
        }
    }

    /// Returns the cursor position, if in edit mode.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Text { cursor, .. } => Some(*cursor),
        }
    }

    /// Inserts a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        if let Self::Text { value, cursor } = self {
            value.insert(*cursor, ch);
            *cursor += ch.len_utf8();
        }
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if let Self::Text { value, cursor } = self {
            if *cursor > 0 {
                let prev_boundary = value[..*cursor]
                    .char_indices()
                    .last()
                    .map_or(0, |(i, _)| i);
                value.remove(prev_boundary);
                *cursor = prev_boundary;
            }
        }
    }
}

/// What the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// The field at this index.
    Field(usize),
    /// An action row.
    Action(FormAction),
}

/// State for a form being filled in.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Form,
    selected: usize,
    edit_mode: EditMode,
    pending: bool,
}

impl FormState {
    /// Creates the editing state for `form`, with the cursor on the first
    /// row.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::{Configurable, WeatherSettings};
    /// use newtab_tui::form_state::FormState;
    ///
    /// let state = FormState::new(WeatherSettings::default().onboarding_form());
    /// assert_eq!(state.selected(), 0);
    /// assert!(!state.is_editing());
    /// ```
    #[must_use]
    pub fn new(form: Form) -> Self {
        Self {
            form,
            selected: 0,
            edit_mode: EditMode::None,
            pending: false,
        }
    }

    /// Returns the form with the values entered so far.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the selected row index (fields first, then actions).
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns the row under the cursor.
    #[must_use]
    pub fn selected_row(&self) -> Option<Row> {
        let fields = self.form.fields.len();
        if self.selected < fields {
            Some(Row::Field(self.selected))
        } else {
            self.form
                .actions
                .get(self.selected - fields)
                .copied()
                .map(Row::Action)
        }
    }

    /// Returns a reference to the current edit mode.
    #[must_use]
    pub fn edit_mode(&self) -> &EditMode {
        &self.edit_mode
    }

    /// Returns `true` if currently in edit mode.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit_mode.is_editing()
    }

    /// Returns `true` while a submitted form is being processed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Marks the form as submitted.
    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    /// Clears the submitted mark (e.g. when the submission was ignored).
    pub fn clear_pending(&mut self) {
        self.pending = false;
    }

    /// Moves the cursor, wrapping around.
    ///
    /// # Arguments
    ///
    /// * `delta` - Direction to navigate (positive = down, negative = up)
    pub fn navigate(&mut self, delta: i32) {
        if self.is_editing() {
            return;
        }
        let row_count = self.form.row_count();
        if row_count == 0 {
            self.selected = 0;
            return;
        }

        let new_idx = if delta > 0 {
            (self.selected + delta as usize) % row_count
        } else {
            let abs_delta = delta.unsigned_abs() as usize;
            if abs_delta > self.selected {
                row_count - ((abs_delta - self.selected) % row_count)
            } else {
                self.selected - abs_delta
            }
        };
        self.selected = new_idx.min(row_count.saturating_sub(1));
    }

    /// Activates the row under the cursor.
    ///
    /// A field enters edit mode and `None` is returned; an action row is
    /// returned for the caller to carry out.
    pub fn activate(&mut self) -> Option<FormAction> {
        match self.selected_row()? {
            Row::Field(idx) => {
                let value = self.form.fields[idx].value.clone();
                self.edit_mode = EditMode::Text {
                    cursor: value.len(),
                    value,
                };
                None
            }
            Row::Action(action) => Some(action),
        }
    }

    /// Writes the edited value back into the form.
    pub fn confirm_edit(&mut self) {
        let mode = std::mem::take(&mut self.edit_mode);
        if let (EditMode::Text { value, .. }, Some(Row::Field(idx))) = (mode, self.selected_row())
        {
            self.form.fields[idx].value = value;
        }
    }

    /// Leaves edit mode, discarding the edited value.
    pub fn cancel_edit(&mut self) {
        self.edit_mode = EditMode::None;
    }

    /// Inputs a character while editing.
    pub fn input_char(&mut self, ch: char) {
        self.edit_mode.insert_char(ch);
    }

    /// Deletes the character before the cursor while editing.
    pub fn backspace(&mut self) {
        self.edit_mode.backspace();
    }
}
