use rallycontrol_core::forms::{FieldErrors, FormData, FormReader};
use rallycontrol_db::models::driver::{Driver, NewDriver};

use super::{ChoiceSource, FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("first_name", Widget::Text(100)),
        FieldSpec::required("last_name", Widget::Text(100)),
        FieldSpec::optional("display_name", Widget::Text(150)),
        FieldSpec::optional("team", Widget::Text(150)),
        FieldSpec::optional("race_class", Widget::ForeignKey(ChoiceSource::RaceClasses))
            .labelled("Klasse"),
        FieldSpec::optional("default_start_number", Widget::Number),
        FieldSpec::optional("transponder_id", Widget::Text(100)),
        FieldSpec::optional("is_active", Widget::Checkbox),
        FieldSpec::optional("notes", Widget::TextArea),
    ],
};

pub fn validate(data: &FormData) -> Result<NewDriver, FieldErrors> {
    let mut form = FormReader::new(data);
    let first_name = form.text("first_name", 100, true);
    let last_name = form.text("last_name", 100, true);
    let display_name = form.text("display_name", 150, false);
    let team = form.text("team", 150, false);
    let race_class_id = form.foreign_key("race_class", false);
    let default_start_number = form.integer("default_start_number", false, None);
    let transponder_id = form.text("transponder_id", 100, false);
    let is_active = form.checkbox("is_active");
    let notes = form.long_text("notes", false);

    form.finish(|| {
        Some(NewDriver {
            first_name: first_name?,
            last_name: last_name?,
            display_name,
            team,
            race_class_id,
            default_start_number,
            transponder_id,
            is_active,
            notes,
        })
    })
}

pub fn initial(driver: &Driver) -> FormData {
    let mut data = FormData::new();
    data.set("first_name", &driver.first_name);
    data.set("last_name", &driver.last_name);
    data.set_opt("display_name", driver.display_name.as_ref());
    data.set_opt("team", driver.team.as_ref());
    data.set_opt("race_class", driver.race_class_id);
    data.set_opt("default_start_number", driver.default_start_number);
    data.set_opt("transponder_id", driver.transponder_id.as_ref());
    data.set_checked("is_active", driver.is_active);
    data.set_opt("notes", driver.notes.as_ref());
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set_checked("is_active", true);
    data
}
