//! Enumerated column values.
//!
//! Each enum maps to a `TEXT` column guarded by a `CHECK` constraint. The
//! stored value is [`as_str`](StageMode::as_str); the label is what screens
//! show.

use std::fmt;

use crate::error::CoreError;

macro_rules! define_choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $( $variant:ident => ($value:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// `(value, label)` pairs in declaration order, for select widgets.
            pub const CHOICES: &'static [(&'static str, &'static str)] = &[$( ($value, $label) ),+];

            /// Return the database string representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Parse from the database representation.
            pub fn parse(s: &str) -> Result<Self, CoreError> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} value: '{other}'. Valid values: {}",
                        stringify!($name),
                        [$( $value ),+].join(", ")
                    ))),
                }
            }

            /// Label for a stored value, falling back to the raw value.
            pub fn label_for(value: &str) -> String {
                Self::parse(value)
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|_| value.to_string())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_choice_enum! {
    /// What a stage is run as.
    StageMode (default Training) {
        Training => ("training", "Training"),
        Qualifying => ("qualifying", "Qualifying"),
        Race => ("race", "Race"),
    }
}

define_choice_enum! {
    /// How a session is timed.
    SessionType (default TimedRun) {
        TimedRun => ("timed_run", "Timed Run"),
        MultiLap => ("multi_lap", "Multi Lap"),
        OpenPractice => ("open_practice", "Open Practice"),
    }
}

define_choice_enum! {
    /// Session lifecycle.
    SessionStatus (default Planned) {
        Planned => ("planned", "Planned"),
        Running => ("running", "Running"),
        Finished => ("finished", "Finished"),
        Archived => ("archived", "Archived"),
    }
}

define_choice_enum! {
    /// Position of a timing gate on the stage.
    GateType (default Start) {
        Start => ("start", "Start"),
        Finish => ("finish", "Finish"),
        Checkpoint => ("checkpoint", "Checkpoint"),
    }
}

define_choice_enum! {
    /// Outcome of a single timed run.
    RunStatus (default Queued) {
        Queued => ("queued", "Queued"),
        Running => ("running", "Running"),
        Finished => ("finished", "Finished"),
        Dnf => ("dnf", "Did Not Finish"),
        Dsq => ("dsq", "Disqualified"),
        Void => ("void", "Void"),
    }
}

define_choice_enum! {
    /// Where the start number of a run came from.
    StartNumberSource (default DriverDefault) {
        DriverDefault => ("driver_default", "Driver Default"),
        VehicleDefault => ("vehicle_default", "Vehicle Default"),
        ManualOverride => ("manual_override", "Manual Override"),
        OcrDetected => ("ocr_detected", "OCR Detected"),
    }
}

define_choice_enum! {
    /// Result quality of an OCR pass over a capture.
    OcrStatus (default Ok) {
        Ok => ("ok", "OK"),
        LowConfidence => ("low_confidence", "Low Confidence"),
        Failed => ("failed", "Failed"),
    }
}

define_choice_enum! {
    /// Console role of a user account.
    UserRole (default Operator) {
        Admin => ("admin", "Admin"),
        Operator => ("operator", "Operator"),
        Viewer => ("viewer", "Viewer"),
    }
}
