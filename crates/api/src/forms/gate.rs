use rallycontrol_core::choices::GateType;
use rallycontrol_core::forms::{format_datetime_local, FieldErrors, FormData, FormReader};
use rallycontrol_db::models::gate::{Gate, NewGate};

use super::{ChoiceSource, FieldSpec, FormSpec, Widget};

pub static FORM: FormSpec = FormSpec {
    fields: &[
        FieldSpec::required("gate_uid", Widget::Text(100)),
        FieldSpec::required("name", Widget::Text(150)),
        FieldSpec::required("gate_type", Widget::Select(GateType::CHOICES)),
        FieldSpec::optional("stage", Widget::ForeignKey(ChoiceSource::Stages)),
        FieldSpec::optional("ip_address", Widget::Text(45)).labelled("IP Address"),
        FieldSpec::optional("location_hint", Widget::Text(200)),
        FieldSpec::optional("is_enabled", Widget::Checkbox),
        FieldSpec::optional("last_seen_at", Widget::DateTime),
        FieldSpec::optional("fw_version", Widget::Text(50)).labelled("Firmware Version"),
        FieldSpec::optional("notes", Widget::TextArea),
    ],
};

pub fn validate(data: &FormData) -> Result<NewGate, FieldErrors> {
    let mut form = FormReader::new(data);
    let gate_uid = form.text("gate_uid", 100, true);
    let name = form.text("name", 150, true);
    let gate_type = form.choice("gate_type", GateType::CHOICES, true);
    let stage_id = form.foreign_key("stage", false);
    let ip_address = form.ip_address("ip_address", false);
    let location_hint = form.text("location_hint", 200, false);
    let is_enabled = form.checkbox("is_enabled");
    let last_seen_at = form.datetime("last_seen_at", false);
    let fw_version = form.text("fw_version", 50, false);
    let notes = form.long_text("notes", false);

    form.finish(|| {
        Some(NewGate {
            gate_uid: gate_uid?,
            name: name?,
            gate_type: gate_type?,
            stage_id,
            ip_address,
            location_hint,
            is_enabled,
            last_seen_at,
            fw_version,
            notes,
        })
    })
}

pub fn initial(gate: &Gate) -> FormData {
    let mut data = FormData::new();
    data.set("gate_uid", &gate.gate_uid);
    data.set("name", &gate.name);
    data.set("gate_type", &gate.gate_type);
    data.set_opt("stage", gate.stage_id);
    data.set_opt("ip_address", gate.ip_address.as_ref());
    data.set_opt("location_hint", gate.location_hint.as_ref());
    data.set_checked("is_enabled", gate.is_enabled);
    data.set_opt("last_seen_at", gate.last_seen_at.map(format_datetime_local));
    data.set_opt("fw_version", gate.fw_version.as_ref());
    data.set_opt("notes", gate.notes.as_ref());
    data
}

pub fn defaults() -> FormData {
    let mut data = FormData::new();
    data.set("gate_type", GateType::default().as_str());
    data.set_checked("is_enabled", true);
    data
}

#[cfg(test)]
mod tests {
    use rallycontrol_core::forms::MSG_IP_ADDRESS;

    use super::*;

    fn with_ip(ip: &str) -> FormData {
        FormData::from_pairs([
            ("gate_uid", "G-START-01"),
            ("name", "Start"),
            ("gate_type", "start"),
            ("ip_address", ip),
        ])
    }

    #[test]
    fn ip_addresses_are_canonicalised() {
        let input = validate(&with_ip("192.168.10.21")).unwrap();
        assert_eq!(input.ip_address.as_deref(), Some("192.168.10.21"));

        let input = validate(&with_ip("2001:0db8:0000:0000:0000:0000:0000:0001")).unwrap();
        assert_eq!(input.ip_address.as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn malformed_ip_is_a_field_error() {
        let errors = validate(&with_ip("192.168.10.300")).unwrap_err();
        assert_eq!(errors.get("ip_address"), [MSG_IP_ADDRESS]);
    }

    #[test]
    fn missing_stage_is_allowed() {
        let input = validate(&with_ip("")).unwrap();
        assert_eq!(input.stage_id, None);
        assert_eq!(input.ip_address, None);
        assert!(!input.is_enabled);
    }
}
