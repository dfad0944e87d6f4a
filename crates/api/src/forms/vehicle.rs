use rallycontrol_core::forms::{FieldErrors, FormData, FormReader};
use rallycontrol_db::models::vehicle::{NewVehicle, Vehicle};

use super::{ChoiceSource, FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("driver", Widget::ForeignKey(ChoiceSource::Drivers)).labelled("Fahrer"),
        FieldSpec::optional("race_class", Widget::ForeignKey(ChoiceSource::RaceClasses))
            .labelled("Klasse"),
        FieldSpec::required("name", Widget::Text(150)),
        FieldSpec::optional("default_start_number", Widget::Number),
        FieldSpec::optional("notes", Widget::TextArea),
        FieldSpec::optional("is_active", Widget::Checkbox),
    ],
};

pub fn validate(data: &FormData) -> Result<NewVehicle, FieldErrors> {
    let mut form = FormReader::new(data);
    let driver_id = form.foreign_key("driver", true);
    let race_class_id = form.foreign_key("race_class", false);
    let name = form.text("name", 150, true);
    let default_start_number = form.integer("default_start_number", false, None);
    let notes = form.long_text("notes", false);
    let is_active = form.checkbox("is_active");

    form.finish(|| {
        Some(NewVehicle {
            driver_id: driver_id?,
            race_class_id,
            name: name?,
            default_start_number,
            notes,
            is_active,
        })
    })
}

pub fn initial(vehicle: &Vehicle) -> FormData {
    let mut data = FormData::new();
    data.set("driver", vehicle.driver_id.to_string());
    data.set_opt("race_class", vehicle.race_class_id);
    data.set("name", &vehicle.name);
    data.set_opt("default_start_number", vehicle.default_start_number);
    data.set_opt("notes", vehicle.notes.as_ref());
    data.set_checked("is_active", vehicle.is_active);
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set_checked("is_active", true);
    data
}
