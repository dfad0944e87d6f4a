use rallycontrol_core::forms::{FieldErrors, FormData, FormReader};
use rallycontrol_db::models::race_class::{NewRaceClass, RaceClass};

use super::{FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("name", Widget::Text(100)),
        FieldSpec::optional("description", Widget::TextArea),
        FieldSpec::optional("is_active", Widget::Checkbox),
    ],
};

pub fn validate(data: &FormData) -> Result<NewRaceClass, FieldErrors> {
    let mut form = FormReader::new(data);
    let name = form.text("name", 100, true);
    let description = form.long_text("description", false);
    let is_active = form.checkbox("is_active");

    form.finish(|| {
        Some(NewRaceClass {
            name: name?,
            description,
            is_active,
        })
    })
}

pub fn initial(class: &RaceClass) -> FormData {
    let mut data = FormData::new();
    data.set("name", &class.name);
    data.set_opt("description", class.description.as_ref());
    data.set_checked("is_active", class.is_active);
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set_checked("is_active", true);
    data
}
