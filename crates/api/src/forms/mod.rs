//! Entity forms for the master-data screens.
//!
//! Each entity module declares a [`FormSpec`] (the ordered field whitelist
//! and widgets), a `validate` function turning submitted [`FormData`] into
//! the repository input, `initial` values for an existing record and
//! `defaults` for a blank create form. Only whitelisted fields are ever read.

pub mod driver;
pub mod event;
pub mod gate;
pub mod race_class;
pub mod session;
pub mod stage;
pub mod vehicle;

use rallycontrol_core::forms::{FieldErrors, FormData};
use rallycontrol_core::labels::title_case;
use rallycontrol_core::types::DbId;
use rallycontrol_db::repositories::{DriverRepo, EventRepo, RaceClassRepo, StageRepo};
use rallycontrol_db::DbPool;
use serde::Serialize;

/// Label of the empty option in foreign-key selects.
const EMPTY_OPTION_LABEL: &str = "---------";

/// Where a foreign-key select loads its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    RaceClasses,
    Drivers,
    Events,
    Stages,
}

impl ChoiceSource {
    /// `(id, display)` pairs in each entity's default order.
    pub async fn load(self, pool: &DbPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        match self {
            Self::RaceClasses => RaceClassRepo::choices(pool).await,
            Self::Drivers => DriverRepo::choices(pool).await,
            Self::Events => EventRepo::choices(pool).await,
            Self::Stages => StageRepo::choices(pool).await,
        }
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy)]
pub enum Widget {
    /// Single-line text with a maximum length.
    Text(usize),
    TextArea,
    Checkbox,
    Number,
    Decimal,
    Date,
    DateTime,
    /// One of a fixed set of `(value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
    ForeignKey(ChoiceSource),
}

/// One whitelisted form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: Option<&'static str>,
    pub widget: Widget,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, widget: Widget) -> Self {
        Self {
            name,
            label: None,
            widget,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, widget: Widget) -> Self {
        Self {
            name,
            label: None,
            widget,
            required: false,
        }
    }

    pub const fn labelled(self, label: &'static str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    /// Declared label, else the title-cased field name.
    pub fn label(&self) -> String {
        self.label
            .map(str::to_string)
            .unwrap_or_else(|| title_case(self.name))
    }
}

/// An entity form: its fields in display order.
#[derive(Debug)]
pub struct FormSpec {
    pub fields: &'static [FieldSpec],
}

impl FormSpec {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Drop every submitted value that is not a declared field.
    pub fn whitelist(&self, data: FormData) -> FormData {
        data.retain_fields(&self.field_names())
    }

    /// Build the template context for every field, loading select options.
    pub async fn render(
        &self,
        pool: &DbPool,
        values: &FormData,
        errors: &FieldErrors,
    ) -> Result<Vec<RenderedField>, sqlx::Error> {
        let mut rendered = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let options = match field.widget {
                Widget::ForeignKey(source) => {
                    let current = values.get(field.name);
                    let mut options = vec![SelectOption {
                        value: String::new(),
                        label: EMPTY_OPTION_LABEL.to_string(),
                        selected: current.is_none(),
                    }];
                    options.extend(source.load(pool).await?.into_iter().map(|(id, label)| {
                        let value = id.to_string();
                        SelectOption {
                            selected: current == Some(value.as_str()),
                            value,
                            label,
                        }
                    }));
                    options
                }
                Widget::Select(choices) => {
                    let current = values.get(field.name);
                    choices
                        .iter()
                        .map(|(value, label)| SelectOption {
                            value: value.to_string(),
                            label: label.to_string(),
                            selected: current == Some(*value),
                        })
                        .collect()
                }
                _ => Vec::new(),
            };
            rendered.push(RenderedField::new(field, values, errors, options));
        }
        Ok(rendered)
    }
}

/// One `<option>` of a select.
#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Template context for one field.
#[derive(Debug, Serialize)]
pub struct RenderedField {
    pub name: &'static str,
    pub label: String,
    pub required: bool,
    pub value: String,
    pub checked: bool,
    pub is_input: bool,
    pub is_checkbox: bool,
    pub is_textarea: bool,
    pub is_select: bool,
    pub input_type: &'static str,
    pub max_length: Option<usize>,
    pub step: Option<&'static str>,
    pub options: Vec<SelectOption>,
    pub errors: Vec<String>,
}

impl RenderedField {
    fn new(
        field: &FieldSpec,
        values: &FormData,
        errors: &FieldErrors,
        options: Vec<SelectOption>,
    ) -> Self {
        let (input_type, max_length, step) = match field.widget {
            Widget::Text(max) => ("text", Some(max), None),
            Widget::Number => ("number", None, Some("1")),
            Widget::Decimal => ("number", None, Some("0.01")),
            Widget::Date => ("date", None, None),
            Widget::DateTime => ("datetime-local", None, None),
            _ => ("", None, None),
        };
        let is_checkbox = matches!(field.widget, Widget::Checkbox);
        let is_textarea = matches!(field.widget, Widget::TextArea);
        let is_select = matches!(field.widget, Widget::Select(_) | Widget::ForeignKey(_));

        Self {
            name: field.name,
            label: field.label(),
            required: field.required,
            value: values.raw(field.name).unwrap_or_default().to_string(),
            checked: is_checkbox && values.is_checked(field.name),
            is_input: !(is_checkbox || is_textarea || is_select),
            is_checkbox,
            is_textarea,
            is_select,
            input_type,
            max_length,
            step,
            options,
            errors: errors.get(field.name).to_vec(),
        }
    }
}
