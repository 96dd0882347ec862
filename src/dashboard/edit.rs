use super::layout::Column;
use crate::config::InputType;
use crate::shared::parse_input_value;

pub const USER_SUGGESTION_LIMIT: usize = 5;

/// Input type implied by an engine variable type name.
pub fn input_type_for_variable_type(variable_type: &str) -> InputType {
    let lower = variable_type.to_lowercase();
    if lower.contains("bool") {
        InputType::Bool
    } else if lower.contains("int") || lower.contains("long") {
        InputType::Int
    } else if lower.contains("double") || lower.contains("float") || lower.contains("number") {
        InputType::Number
    } else {
        InputType::Text
    }
}

/// Engine type name sent along with a value. The variable's own type is kept when it agrees
/// with the input type.
pub fn type_name_for(input_type: InputType, variable_type: &str) -> String {
    if !variable_type.is_empty() && input_type_for_variable_type(variable_type) == input_type {
        return variable_type.to_string();
    }
    match input_type {
        InputType::Bool => "Boolean",
        InputType::Int => "Integer",
        InputType::Number => "Double",
        InputType::Json => "Json",
        InputType::Text | InputType::User | InputType::Auto => "String",
    }
    .to_string()
}

/// Up to five configured users whose name starts with `prefix`, ignoring case. An empty
/// prefix lists the first five.
pub fn suggest_users<'a>(users: &'a [String], prefix: &str) -> Vec<&'a str> {
    let prefix = prefix.trim().to_lowercase();
    users
        .iter()
        .filter(|user| user.to_lowercase().starts_with(&prefix))
        .map(String::as_str)
        .take(USER_SUGGESTION_LIMIT)
        .collect()
}

/// Resolves `auto` against the variable type and picks the type name to send.
pub fn resolve_edit_types(configured: InputType, variable_type: &str) -> (InputType, String) {
    let input_type = match configured {
        InputType::Auto => input_type_for_variable_type(variable_type),
        other => other,
    };
    (input_type, type_name_for(input_type, variable_type))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditColumn {
    /// Position among the rendered columns.
    pub index: usize,
    pub key: String,
    pub title: String,
    pub input_type: InputType,
    pub type_name: String,
}

/// An open edit form over the editable columns of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub row: usize,
    pub generation: u64,
    pub columns: Vec<EditColumn>,
    pub position: usize,
    pub input: String,
    pub error: Option<String>,
}

impl EditSession {
    /// `None` when no rendered column is editable.
    pub fn open(
        columns: &[Column],
        cells: &[String],
        row: usize,
        generation: u64,
        variable_type: &str,
    ) -> Option<Self> {
        let editable = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.editable)
            .map(|(index, column)| {
                let (input_type, type_name) =
                    resolve_edit_types(column.input_type, variable_type);
                EditColumn {
                    index,
                    key: column.key.clone(),
                    title: column.title.clone(),
                    input_type,
                    type_name,
                }
            })
            .collect::<Vec<_>>();
        if editable.is_empty() {
            return None;
        }
        let mut session = Self {
            row,
            generation,
            columns: editable,
            position: 0,
            input: String::new(),
            error: None,
        };
        session.select(0, cells);
        Some(session)
    }

    pub fn current(&self) -> Option<&EditColumn> {
        self.columns.get(self.position)
    }

    /// Moves to another column, wrapping at both ends, and loads its cell into the input.
    pub fn cycle(&mut self, forward: bool, cells: &[String]) {
        let len = self.columns.len();
        if len == 0 {
            return;
        }
        let position = if forward {
            (self.position + 1) % len
        } else {
            (self.position + len - 1) % len
        };
        self.select(position, cells);
    }

    fn select(&mut self, position: usize, cells: &[String]) {
        self.position = position;
        self.input = self
            .current()
            .and_then(|column| cells.get(column.index))
            .cloned()
            .unwrap_or_default();
        self.validate();
    }

    /// Re-checks the input against the current column's type and records the error, if any.
    pub fn validate(&mut self) {
        self.error = self.current().and_then(|column| {
            parse_input_value(&self.input, column.input_type)
                .err()
                .map(|err| err.to_string())
        });
    }

    pub fn can_save(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_user_input(&self) -> bool {
        self.current().map(|column| column.input_type) == Some(InputType::User)
    }

    /// Flips boolean inputs; other input types are left alone.
    pub fn toggle(&mut self) -> bool {
        if self.current().map(|column| column.input_type) != Some(InputType::Bool) {
            return false;
        }
        let on = matches!(self.input.trim().to_lowercase().as_str(), "true" | "1");
        self.input = if on { "false" } else { "true" }.to_string();
        self.validate();
        true
    }

    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
        self.validate();
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.validate();
    }
}
