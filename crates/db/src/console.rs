//! Administrative console declarations.
//!
//! Every entity gets a static [`ConsoleSpec`]: the columns shown per row
//! (SQL expressions over the entity's `t` alias and its joins), the
//! exact-match filters, the free-text search fields and the row ordering.
//! [`ConsoleSpec::resolve_query`] turns raw query-string parameters into a
//! validated [`ConsoleQuery`]; [`ConsoleRepo`](crate::repositories::ConsoleRepo)
//! executes it.

use std::collections::BTreeMap;

use rallycontrol_core::choices::{
    GateType, OcrStatus, RunStatus, SessionStatus, SessionType, StageMode, UserRole,
};
use rallycontrol_core::error::CoreError;
use rallycontrol_core::types::DbId;
use serde::Serialize;

/// Rows returned when no `limit` is given.
pub const DEFAULT_LIMIT: i64 = 100;
/// Upper bound for `limit`.
pub const MAX_LIMIT: i64 = 500;

/// Query parameters that are not filters.
const RESERVED_PARAMS: &[&str] = &["q", "limit", "offset"];

/// One visible column.
#[derive(Debug, Serialize)]
pub struct ConsoleColumn {
    pub name: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
}

/// How a filter value is parsed and compared.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "choices", rename_all = "snake_case")]
pub enum FilterKind {
    Text,
    Bool,
    Id,
    Choice(&'static [(&'static str, &'static str)]),
}

/// One exact-match filter.
#[derive(Debug, Serialize)]
pub struct ConsoleFilter {
    pub name: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
    pub kind: FilterKind,
}

/// One field matched by the free-text search.
#[derive(Debug, Serialize)]
pub struct SearchField {
    pub name: &'static str,
    #[serde(skip)]
    pub sql: &'static str,
}

/// Console declaration for one entity.
#[derive(Debug, Serialize)]
pub struct ConsoleSpec {
    /// URL segment, e.g. `ocr-results`.
    pub slug: &'static str,
    pub verbose_name: &'static str,
    #[serde(skip)]
    pub table: &'static str,
    /// `FROM` clause; the entity table is always aliased `t`.
    #[serde(skip)]
    pub from: &'static str,
    /// SQL expression for the entity's display string.
    #[serde(skip)]
    pub display: &'static str,
    pub columns: &'static [ConsoleColumn],
    pub filters: &'static [ConsoleFilter],
    pub search_fields: &'static [SearchField],
    #[serde(skip)]
    pub order_by: &'static str,
}

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Id(DbId),
}

/// A validated console listing request.
#[derive(Debug)]
pub struct ConsoleQuery {
    pub search: Option<String>,
    pub filters: Vec<(&'static ConsoleFilter, FilterValue)>,
    pub limit: i64,
    pub offset: i64,
}

impl ConsoleSpec {
    /// Look up a filter by name.
    pub fn filter(&self, name: &str) -> Option<&ConsoleFilter> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// Validate raw query parameters against this spec.
    ///
    /// `q`, `limit` and `offset` are reserved; every other key must name a
    /// declared filter. Blank values are ignored.
    pub fn resolve_query(
        &'static self,
        params: &BTreeMap<String, String>,
    ) -> Result<ConsoleQuery, CoreError> {
        let search = params
            .get("q")
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let limit = parse_bound(params.get("limit"), "limit", DEFAULT_LIMIT)?.min(MAX_LIMIT);
        let offset = parse_bound(params.get("offset"), "offset", 0)?;

        let mut filters = Vec::new();
        for (name, raw) in params {
            if RESERVED_PARAMS.contains(&name.as_str()) {
                continue;
            }
            let filter = self
                .filters
                .iter()
                .find(|f| f.name == name.as_str())
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Unknown filter '{name}' for {}. Valid filters: {}",
                        self.slug,
                        self.filters
                            .iter()
                            .map(|f| f.name)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            filters.push((filter, parse_filter_value(filter, raw)?));
        }

        Ok(ConsoleQuery {
            search,
            filters,
            limit,
            offset,
        })
    }
}

fn parse_bound(raw: Option<&String>, name: &str, default: i64) -> Result<i64, CoreError> {
    match raw.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| CoreError::Validation(format!("'{name}' must be a non-negative integer"))),
    }
}

fn parse_filter_value(filter: &ConsoleFilter, raw: &str) -> Result<FilterValue, CoreError> {
    let invalid = |expected: &str| {
        CoreError::Validation(format!(
            "Invalid value '{raw}' for filter '{}': expected {expected}",
            filter.name
        ))
    };
    match &filter.kind {
        FilterKind::Text => Ok(FilterValue::Text(raw.to_string())),
        FilterKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(FilterValue::Bool(true)),
            "false" | "0" | "no" => Ok(FilterValue::Bool(false)),
            _ => Err(invalid("true or false")),
        },
        FilterKind::Id => raw
            .parse::<DbId>()
            .map(FilterValue::Id)
            .map_err(|_| invalid("an integer id")),
        FilterKind::Choice(choices) => {
            if choices.iter().any(|(value, _)| *value == raw) {
                Ok(FilterValue::Text(raw.to_string()))
            } else {
                let valid = choices.iter().map(|(v, _)| *v).collect::<Vec<_>>();
                Err(invalid(&format!("one of {}", valid.join(", "))))
            }
        }
    }
}

/// Typed bind value for dynamically-built console queries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
}

/// Build a WHERE clause and bind values from a console query.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no conditions apply, or starts with `WHERE `.
pub(crate) fn build_console_filter(
    spec: &ConsoleSpec,
    query: &ConsoleQuery,
) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for (filter, value) in &query.filters {
        conditions.push(format!("{} = ${bind_idx}", filter.sql));
        bind_idx += 1;
        bind_values.push(match value {
            FilterValue::Text(v) => BindValue::Text(v.clone()),
            FilterValue::Bool(v) => BindValue::Bool(*v),
            FilterValue::Id(v) => BindValue::BigInt(*v),
        });
    }

    if let Some(ref search) = query.search {
        if !spec.search_fields.is_empty() {
            let matches = spec
                .search_fields
                .iter()
                .map(|field| format!("CAST({} AS TEXT) ILIKE ${bind_idx}", field.sql))
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({matches})"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format!("%{}%", escape_like(search))));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// `json_build_object(...)` expression producing one console row.
pub(crate) fn row_object(spec: &ConsoleSpec) -> String {
    let mut args = vec![
        "'id', t.id".to_string(),
        format!("'display', {}", spec.display),
    ];
    args.extend(
        spec.columns
            .iter()
            .map(|c| format!("'{}', {}", c.name, c.sql)),
    );
    format!("json_build_object({})", args.join(", "))
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Look up the console declaration for a URL slug.
pub fn spec_for(slug: &str) -> Option<&'static ConsoleSpec> {
    CONSOLE_SPECS.iter().find(|s| s.slug == slug)
}

// ---------------------------------------------------------------------------
// Shared SQL fragments
// ---------------------------------------------------------------------------

macro_rules! col {
    ($name:literal, $sql:literal) => {
        ConsoleColumn {
            name: $name,
            sql: $sql,
        }
    };
}

macro_rules! search {
    ($name:literal, $sql:literal) => {
        SearchField {
            name: $name,
            sql: $sql,
        }
    };
}

macro_rules! filter {
    ($name:literal, $sql:literal, $kind:expr) => {
        ConsoleFilter {
            name: $name,
            sql: $sql,
            kind: $kind,
        }
    };
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// Console declarations for all entities, in navigation order.
pub static CONSOLE_SPECS: &[ConsoleSpec] = &[
    ConsoleSpec {
        slug: "users",
        verbose_name: "User",
        table: "users",
        from: "users t",
        display: "COALESCE(NULLIF(TRIM(t.first_name || ' ' || t.last_name), ''), t.username)",
        columns: &[
            col!("username", "t.username"),
            col!("email", "t.email"),
            col!("first_name", "t.first_name"),
            col!("last_name", "t.last_name"),
            col!("role", "t.role"),
            col!("is_active", "t.is_active"),
            col!("last_login_at", "t.last_login_at"),
        ],
        filters: &[
            filter!("role", "t.role", FilterKind::Choice(UserRole::CHOICES)),
            filter!("is_active", "t.is_active", FilterKind::Bool),
        ],
        search_fields: &[
            search!("username", "t.username"),
            search!("email", "t.email"),
            search!("first_name", "t.first_name"),
            search!("last_name", "t.last_name"),
        ],
        order_by: "t.username",
    },
    ConsoleSpec {
        slug: "classes",
        verbose_name: "Klasse",
        table: "classes",
        from: "classes t",
        display: "t.name",
        columns: &[
            col!("name", "t.name"),
            col!("description", "t.description"),
            col!("is_active", "t.is_active"),
            col!("created_at", "t.created_at"),
        ],
        filters: &[filter!("is_active", "t.is_active", FilterKind::Bool)],
        search_fields: &[search!("name", "t.name")],
        order_by: "t.name, t.id",
    },
    ConsoleSpec {
        slug: "drivers",
        verbose_name: "Fahrer",
        table: "drivers",
        from: "drivers t LEFT JOIN classes rc ON rc.id = t.race_class_id",
        display: "COALESCE(NULLIF(t.display_name, ''), t.first_name || ' ' || t.last_name)",
        columns: &[
            col!("display_name", "t.display_name"),
            col!("first_name", "t.first_name"),
            col!("last_name", "t.last_name"),
            col!("team", "t.team"),
            col!("race_class", "rc.name"),
            col!("race_class_id", "t.race_class_id"),
            col!("default_start_number", "t.default_start_number"),
            col!("is_active", "t.is_active"),
        ],
        filters: &[
            filter!("race_class", "t.race_class_id", FilterKind::Id),
            filter!("is_active", "t.is_active", FilterKind::Bool),
        ],
        search_fields: &[
            search!("first_name", "t.first_name"),
            search!("last_name", "t.last_name"),
            search!("display_name", "t.display_name"),
            search!("team", "t.team"),
        ],
        order_by: "t.last_name, t.first_name, t.id",
    },
    ConsoleSpec {
        slug: "events",
        verbose_name: "Event",
        table: "events",
        from: "events t",
        display: "t.name || ' (' || to_char(t.start_date, 'YYYY-MM-DD') || ')'",
        columns: &[
            col!("name", "t.name"),
            col!("location", "t.location"),
            col!("start_date", "t.start_date"),
            col!("end_date", "t.end_date"),
            col!("timezone", "t.timezone"),
        ],
        filters: &[filter!("timezone", "t.timezone", FilterKind::Text)],
        search_fields: &[search!("name", "t.name"), search!("location", "t.location")],
        order_by: "t.start_date DESC, t.name, t.id",
    },
    ConsoleSpec {
        slug: "stages",
        verbose_name: "Stage",
        table: "stages",
        from: "stages t JOIN events e ON e.id = t.event_id",
        display: "e.name || ' - ' || t.name",
        columns: &[
            col!("name", "t.name"),
            col!("event", "e.name"),
            col!("event_id", "t.event_id"),
            col!("stage_order", "t.stage_order"),
            col!("mode", "t.mode"),
            col!("distance_m", "t.distance_m::FLOAT8"),
            col!("is_active", "t.is_active"),
        ],
        filters: &[
            filter!("mode", "t.mode", FilterKind::Choice(StageMode::CHOICES)),
            filter!("is_active", "t.is_active", FilterKind::Bool),
            filter!("event", "t.event_id", FilterKind::Id),
        ],
        search_fields: &[search!("name", "t.name")],
        order_by: "e.start_date DESC, e.name, e.id, t.stage_order, t.id",
    },
    ConsoleSpec {
        slug: "sessions",
        verbose_name: "Session",
        table: "sessions",
        from: "sessions t JOIN stages s ON s.id = t.stage_id JOIN events e ON e.id = s.event_id",
        display: "e.name || ' - ' || s.name || ' – ' || t.name",
        columns: &[
            col!("name", "t.name"),
            col!("stage", "e.name || ' - ' || s.name"),
            col!("stage_id", "t.stage_id"),
            col!("session_type", "t.session_type"),
            col!("status", "t.status"),
            col!("start_time", "t.start_time"),
            col!("end_time", "t.end_time"),
        ],
        filters: &[
            filter!(
                "session_type",
                "t.session_type",
                FilterKind::Choice(SessionType::CHOICES)
            ),
            filter!("status", "t.status", FilterKind::Choice(SessionStatus::CHOICES)),
            filter!("stage", "t.stage_id", FilterKind::Id),
        ],
        search_fields: &[search!("name", "t.name")],
        order_by: "e.start_date DESC, e.name, e.id, s.stage_order, s.id, \
                   t.start_time, t.name, t.id",
    },
    ConsoleSpec {
        slug: "gates",
        verbose_name: "Gate",
        table: "gates",
        from: "gates t LEFT JOIN stages s ON s.id = t.stage_id \
               LEFT JOIN events e ON e.id = s.event_id",
        display: "t.name || ' (' || t.gate_uid || ')'",
        columns: &[
            col!("name", "t.name"),
            col!("gate_uid", "t.gate_uid"),
            col!("gate_type", "t.gate_type"),
            col!("stage", "e.name || ' - ' || s.name"),
            col!("stage_id", "t.stage_id"),
            col!("is_enabled", "t.is_enabled"),
            col!("last_seen_at", "t.last_seen_at"),
        ],
        filters: &[
            filter!("gate_type", "t.gate_type", FilterKind::Choice(GateType::CHOICES)),
            filter!("is_enabled", "t.is_enabled", FilterKind::Bool),
            filter!("stage", "t.stage_id", FilterKind::Id),
        ],
        search_fields: &[
            search!("name", "t.name"),
            search!("gate_uid", "t.gate_uid"),
            search!("ip_address", "t.ip_address"),
        ],
        order_by: "t.name, t.id",
    },
    ConsoleSpec {
        slug: "vehicles",
        verbose_name: "Fahrzeug",
        table: "vehicles",
        from: "vehicles t JOIN drivers d ON d.id = t.driver_id \
               LEFT JOIN classes rc ON rc.id = t.race_class_id",
        display: "COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name) \
                  || ' – ' || t.name",
        columns: &[
            col!("name", "t.name"),
            col!(
                "driver",
                "COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name)"
            ),
            col!("driver_id", "t.driver_id"),
            col!("race_class", "rc.name"),
            col!("race_class_id", "t.race_class_id"),
            col!("default_start_number", "t.default_start_number"),
            col!("is_active", "t.is_active"),
        ],
        filters: &[
            filter!("race_class", "t.race_class_id", FilterKind::Id),
            filter!("is_active", "t.is_active", FilterKind::Bool),
        ],
        search_fields: &[
            search!("name", "t.name"),
            search!("driver__first_name", "d.first_name"),
            search!("driver__last_name", "d.last_name"),
        ],
        order_by: "d.last_name, d.first_name, d.id, t.name, t.id",
    },
    ConsoleSpec {
        slug: "runs",
        verbose_name: "Run",
        table: "runs",
        from: "runs t JOIN sessions se ON se.id = t.session_id \
               JOIN stages s ON s.id = se.stage_id \
               JOIN events e ON e.id = s.event_id \
               JOIN drivers d ON d.id = t.driver_id \
               LEFT JOIN vehicles v ON v.id = t.vehicle_id",
        display: "COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name) \
                  || ' @ ' || e.name || ' - ' || s.name || ' – ' || se.name",
        columns: &[
            col!(
                "driver",
                "COALESCE(NULLIF(d.display_name, ''), d.first_name || ' ' || d.last_name)"
            ),
            col!("driver_id", "t.driver_id"),
            col!("session", "e.name || ' - ' || s.name || ' – ' || se.name"),
            col!("session_id", "t.session_id"),
            col!("vehicle", "v.name"),
            col!("vehicle_id", "t.vehicle_id"),
            col!("status", "t.status"),
            col!("start_number_used", "t.start_number_used"),
            col!("final_time_ms", "t.final_time_ms"),
        ],
        filters: &[
            filter!("status", "t.status", FilterKind::Choice(RunStatus::CHOICES)),
            filter!("session", "t.session_id", FilterKind::Id),
        ],
        search_fields: &[
            search!("driver__first_name", "d.first_name"),
            search!("driver__last_name", "d.last_name"),
            search!("comment", "t.comment"),
        ],
        order_by: "e.start_date DESC, e.name, e.id, s.stage_order, s.id, se.start_time, \
                   se.name, se.id, d.last_name, d.first_name, d.id, t.id",
    },
    ConsoleSpec {
        slug: "passages",
        verbose_name: "Passage",
        table: "passages",
        from: "passages t JOIN sessions se ON se.id = t.session_id \
               JOIN stages s ON s.id = se.stage_id \
               JOIN events e ON e.id = s.event_id \
               JOIN gates g ON g.id = t.gate_id",
        display: "g.name || ' (' || g.gate_uid || ') @ ' || t.timestamp_ms",
        columns: &[
            col!("session", "e.name || ' - ' || s.name || ' – ' || se.name"),
            col!("session_id", "t.session_id"),
            col!("gate", "g.name || ' (' || g.gate_uid || ')'"),
            col!("gate_id", "t.gate_id"),
            col!("timestamp_ms", "t.timestamp_ms"),
            col!("run_id", "t.run_id"),
            col!("is_valid", "t.is_valid"),
            col!("received_at", "t.received_at"),
        ],
        filters: &[
            filter!("gate", "t.gate_id", FilterKind::Id),
            filter!("session", "t.session_id", FilterKind::Id),
            filter!("is_valid", "t.is_valid", FilterKind::Bool),
        ],
        search_fields: &[search!("timestamp_ms", "t.timestamp_ms")],
        order_by: "t.timestamp_ms, t.id",
    },
    ConsoleSpec {
        slug: "captures",
        verbose_name: "Capture",
        table: "captures",
        from: "captures t JOIN passages p ON p.id = t.passage_id JOIN gates g ON g.id = p.gate_id",
        display: "'Capture ' || t.id || ' for ' || g.name || ' (' || g.gate_uid || ') @ ' \
                  || p.timestamp_ms",
        columns: &[
            col!("passage", "g.name || ' (' || g.gate_uid || ') @ ' || p.timestamp_ms"),
            col!("passage_id", "t.passage_id"),
            col!("image_path", "t.image_path"),
            col!("created_at", "t.created_at"),
            col!("sha256", "t.sha256"),
        ],
        filters: &[],
        search_fields: &[
            search!("image_path", "t.image_path"),
            search!("sha256", "t.sha256"),
        ],
        order_by: "t.created_at DESC, t.id DESC",
    },
    ConsoleSpec {
        slug: "ocr-results",
        verbose_name: "OCR Result",
        table: "ocr_results",
        from: "ocr_results t JOIN captures c ON c.id = t.capture_id",
        display: "'OCR ' || COALESCE(t.detected_number::TEXT, '?') || ' (' || t.engine || ')'",
        columns: &[
            col!("capture", "'Capture ' || c.id"),
            col!("capture_id", "t.capture_id"),
            col!("detected_number", "t.detected_number"),
            col!("confidence", "t.confidence"),
            col!("engine", "t.engine"),
            col!("status", "t.status"),
            col!("created_at", "t.created_at"),
        ],
        filters: &[
            filter!("status", "t.status", FilterKind::Choice(OcrStatus::CHOICES)),
            filter!("engine", "t.engine", FilterKind::Text),
        ],
        search_fields: &[
            search!("detected_number", "t.detected_number"),
            search!("engine", "t.engine"),
        ],
        order_by: "t.created_at DESC, t.id DESC",
    },
    ConsoleSpec {
        slug: "leaderboards",
        verbose_name: "Leaderboard",
        table: "leaderboards",
        from: "leaderboards t JOIN sessions se ON se.id = t.session_id \
               JOIN stages s ON s.id = se.stage_id \
               JOIN events e ON e.id = s.event_id \
               LEFT JOIN classes rc ON rc.id = t.race_class_id",
        display: "'Leaderboard for ' || e.name || ' - ' || s.name || ' – ' || se.name",
        columns: &[
            col!("session", "e.name || ' - ' || s.name || ' – ' || se.name"),
            col!("session_id", "t.session_id"),
            col!("race_class", "rc.name"),
            col!("race_class_id", "t.race_class_id"),
            col!("generated_at", "t.generated_at"),
            col!("checksum", "t.checksum"),
        ],
        filters: &[
            filter!("session", "t.session_id", FilterKind::Id),
            filter!("race_class", "t.race_class_id", FilterKind::Id),
        ],
        search_fields: &[search!("session__name", "se.name")],
        order_by: "t.generated_at DESC, t.id DESC",
    },
];
