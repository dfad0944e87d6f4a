use rallycontrol_core::forms::{FieldErrors, FormData, FormReader};
use rallycontrol_db::models::event::{Event, NewEvent, DEFAULT_TIMEZONE};

use super::{FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("name", Widget::Text(200)),
        FieldSpec::optional("location", Widget::Text(200)),
        FieldSpec::required("start_date", Widget::Date),
        FieldSpec::optional("end_date", Widget::Date),
        FieldSpec::required("timezone", Widget::Text(50)),
        FieldSpec::optional("notes", Widget::TextArea),
    ],
};

pub fn validate(data: &FormData) -> Result<NewEvent, FieldErrors> {
    let mut form = FormReader::new(data);
    let name = form.text("name", 200, true);
    let location = form.text("location", 200, false);
    let start_date = form.date("start_date", true);
    let end_date = form.date("end_date", false);
    let timezone = form.text("timezone", 50, true);
    let notes = form.long_text("notes", false);

    form.finish(|| {
        Some(NewEvent {
            name: name?,
            location,
            start_date: start_date?,
            end_date,
            timezone: timezone?,
            notes,
        })
    })
}

pub fn initial(event: &Event) -> FormData {
    let mut data = FormData::new();
    data.set("name", &event.name);
    data.set_opt("location", event.location.as_ref());
    data.set("start_date", event.start_date.format("%Y-%m-%d").to_string());
    data.set_opt("end_date", event.end_date.map(|d| d.format("%Y-%m-%d")));
    data.set("timezone", &event.timezone);
    data.set_opt("notes", event.notes.as_ref());
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set("timezone", DEFAULT_TIMEZONE);
    data
}
