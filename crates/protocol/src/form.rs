//! Onboarding and settings forms.
//!
//! Widgets describe their onboarding prompt and settings panel as a
//! [`Form`]: an ordered list of text fields followed by action rows. The
//! TUI renders and edits forms generically; the widget's settings type
//! turns a submitted form back into settings (see
//! [`Configurable::apply_form`](crate::Configurable::apply_form)).

/// Whether a form is the first-run onboarding prompt or the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Shown while the widget has no credentials.
    Onboarding,
    /// Shown when the user opens the widget's settings, or when the
    /// remote service rejected the current settings.
    Settings,
}

/// An action row at the bottom of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormAction {
    /// Persist the settings, clear the cache and reload.
    Save,
    /// Reload without touching settings or cache.
    Cancel,
    /// Drop the stored token and cache, keep the settings.
    SignOut,
    /// Submit onboarding credentials.
    Submit {
        /// Button label, e.g. "Save Key" or "Sign in".
        label: &'static str,
    },
}

impl FormAction {
    /// Returns the button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Save => "Save & Reload",
            Self::Cancel => "Cancel",
            Self::SignOut => "Sign out",
            Self::Submit { label } => label,
        }
    }
}

/// A single text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Stable identifier the settings type matches on.
    pub key: &'static str,
    /// Label shown next to the value.
    pub label: &'static str,
    /// The current value.
    pub value: String,
    /// Whether the value should be masked when displayed.
    pub secret: bool,
    /// Whether onboarding may be submitted with this field empty.
    pub required: bool,
    /// Optional hint shown under the field.
    pub hint: Option<&'static str>,
}

impl FormField {
    /// Creates a plain, optional text field.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::FormField;
    ///
    /// let field = FormField::text("api_key", "API key", "abc123").secret().required();
    /// assert!(field.secret);
    /// assert!(field.required);
    /// assert_eq!(field.display_value(), "******");
    /// ```
    #[must_use]
    pub fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            secret: false,
            required: false,
            hint: None,
        }
    }

    /// Marks the field as secret.
    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Marks the field as required for onboarding.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Returns the value as it should be displayed (masked when secret).
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count().min(24))
        } else {
            self.value.clone()
        }
    }

    /// Returns `true` if the trimmed value is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// An onboarding prompt or settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Onboarding or settings.
    pub kind: FormKind,
    /// Heading, e.g. "Weather Settings".
    pub title: String,
    /// Short explanation shown under the heading.
    pub intro: Option<&'static str>,
    /// Editable fields, in display order.
    pub fields: Vec<FormField>,
    /// Action rows, in display order.
    pub actions: Vec<FormAction>,
    /// Inline message, e.g. why the settings panel was opened.
    pub message: Option<String>,
}

impl Form {
    /// Creates an onboarding form with a single submit action.
    #[must_use]
    pub fn onboarding(
        title: impl Into<String>,
        fields: Vec<FormField>,
        submit_label: &'static str,
    ) -> Self {
        Self {
            kind: FormKind::Onboarding,
            title: title.into(),
            intro: None,
            fields,
            actions: vec![FormAction::Submit {
                label: submit_label,
            }],
            message: None,
        }
    }

    /// Creates a settings form with the Save and Cancel actions.
    #[must_use]
    pub fn settings(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            kind: FormKind::Settings,
            title: title.into(),
            intro: None,
            fields,
            actions: vec![FormAction::Save, FormAction::Cancel],
            message: None,
        }
    }

    /// Sets the intro line.
    #[must_use]
    pub fn with_intro(mut self, intro: &'static str) -> Self {
        self.intro = Some(intro);
        self
    }

    /// Appends an action row.
    #[must_use]
    pub fn with_action(mut self, action: FormAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Sets the inline message. Blank messages clear it.
    ///
    /// # Examples
    ///
    /// ```
    /// use newtab_protocol::Form;
    ///
    /// let form = Form::settings("Settings", vec![]).with_message("Key rejected");
    /// assert_eq!(form.message.as_deref(), Some("Key rejected"));
    ///
    /// let form = form.with_message("");
    /// assert!(form.message.is_none());
    /// ```
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.trim().is_empty()).then_some(message);
        self
    }

    /// Returns the trimmed value of the field with the given key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).map(|f| f.value.trim())
    }

    /// Returns the field with the given key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Replaces the value of the field with the given key.
    ///
    /// Returns `false` if no such field exists.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Returns the first required field left blank, if any.
    #[must_use]
    pub fn missing_required(&self) -> Option<&FormField> {
        self.fields.iter().find(|f| f.required && f.is_blank())
    }

    /// Returns the number of selectable rows (fields then actions).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.fields.len() + self.actions.len()
    }
}
