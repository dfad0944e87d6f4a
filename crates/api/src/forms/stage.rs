use rallycontrol_core::choices::StageMode;
use rallycontrol_core::forms::{FieldErrors, FormData, FormReader};
use rallycontrol_db::models::stage::{NewStage, Stage, DEFAULT_STAGE_ORDER};

use super::{ChoiceSource, FieldSpec, FormSpec, Widget};

/// `NUMERIC(8,2)`.
const DISTANCE_DIGITS: usize = 8;
const DISTANCE_DECIMALS: usize = 2;

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("event", Widget::ForeignKey(ChoiceSource::Events)),
        FieldSpec::required("name", Widget::Text(150)),
        FieldSpec::required("stage_order", Widget::Number),
        FieldSpec::required("mode", Widget::Select(StageMode::CHOICES)),
        FieldSpec::optional("distance_m", Widget::Decimal),
        FieldSpec::optional("is_active", Widget::Checkbox),
    ],
};

pub fn validate(data: &FormData) -> Result<NewStage, FieldErrors> {
    let mut form = FormReader::new(data);
    let event_id = form.foreign_key("event", true);
    let name = form.text("name", 150, true);
    let stage_order = form.integer("stage_order", true, Some(0));
    let mode = form.choice("mode", StageMode::CHOICES, true);
    let distance_m = form.decimal("distance_m", false, DISTANCE_DIGITS, DISTANCE_DECIMALS);
    let is_active = form.checkbox("is_active");

    form.finish(|| {
        Some(NewStage {
            event_id: event_id?,
            name: name?,
            stage_order: stage_order?,
            mode: mode?,
            distance_m,
            is_active,
        })
    })
}

pub fn initial(stage: &Stage) -> FormData {
    let mut data = FormData::new();
    data.set("event", stage.event_id.to_string());
    data.set("name", &stage.name);
    data.set("stage_order", stage.stage_order.to_string());
    data.set("mode", &stage.mode);
    data.set_opt("distance_m", stage.distance_m.map(|d| format!("{d:.2}")));
    data.set_checked("is_active", stage.is_active);
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set("stage_order", DEFAULT_STAGE_ORDER.to_string());
    data.set("mode", StageMode::default().as_str());
    data.set_checked("is_active", true);
    data
}
