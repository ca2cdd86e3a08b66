/// The scheduler's fixed tool vocabulary (§4.5): six calendar operations,
/// each with a typed argument record deserialized from the model's JSON
/// tool-call arguments, dispatched against a `CalendarProvider`.
use chrono::{DateTime, Duration, Utc};
use replyforge_core::{CalendarProvider, ToolCall, ToolDefinition};
use serde::Deserialize;
use serde_json::json;

pub const CHECK_AVAILABILITY: &str = "check_availability";
pub const PROPOSE_SLOTS: &str = "propose_slots";
pub const SCHEDULE: &str = "schedule";
pub const LIST_UPCOMING: &str = "list_upcoming";
pub const RESCHEDULE: &str = "reschedule";
pub const CANCEL: &str = "cancel";

/// The human-readable sentinel a normalized empty tool result is replaced
/// with before re-entering the model (§4.5, §9: "Empty lists returned from
/// tools must be normalized to a non-empty human-readable string").
pub const NO_CONFLICTS_SENTINEL: &str =
    "No conflicts found - user is available during requested time";

#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityArgs {
    pub email: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BusyRangeArg {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProposeSlotsArgs {
    #[serde(default)]
    pub busy: Vec<BusyRangeArg>,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleArgs {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListUpcomingArgs {
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct RescheduleArgs {
    pub event_id: String,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CancelArgs {
    pub event_id: String,
}

/// Tool definitions advertised to the language model's tool-calling mode.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: CHECK_AVAILABILITY.to_string(),
            description: "Check free/busy for a specific email over a time window".to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "email": {"type": "string"},
                    "start": {"type": "string", "format": "date-time"},
                    "end": {"type": "string", "format": "date-time"}
                },
                "required": ["email", "start", "end"]
            }),
        },
        ToolDefinition {
            name: PROPOSE_SLOTS.to_string(),
            description:
                "Given busy ranges and working hours, find up to 3 one-hour free slots within the next 7 days"
                    .to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "busy": {"type": "array"},
                    "working_hours_start": {"type": "integer"},
                    "working_hours_end": {"type": "integer"}
                },
                "required": ["working_hours_start", "working_hours_end"]
            }),
        },
        ToolDefinition {
            name: SCHEDULE.to_string(),
            description: "Create a calendar event with a summary, start, end, attendees and optional description"
                .to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "summary": {"type": "string"},
                    "start": {"type": "string", "format": "date-time"},
                    "end": {"type": "string", "format": "date-time"},
                    "attendees": {"type": "array", "items": {"type": "string"}},
                    "description": {"type": "string"}
                },
                "required": ["summary", "start", "end"]
            }),
        },
        ToolDefinition {
            name: LIST_UPCOMING.to_string(),
            description: "List the top-N upcoming events".to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {"max_results": {"type": "integer"}}
            }),
        },
        ToolDefinition {
            name: RESCHEDULE.to_string(),
            description: "Move an existing event to a new start/end by id".to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {
                    "event_id": {"type": "string"},
                    "new_start": {"type": "string", "format": "date-time"},
                    "new_end": {"type": "string", "format": "date-time"}
                },
                "required": ["event_id", "new_start", "new_end"]
            }),
        },
        ToolDefinition {
            name: CANCEL.to_string(),
            description: "Delete an event by id".to_string(),
            parameters_schema: json!({
                "type": "object",
                "properties": {"event_id": {"type": "string"}},
                "required": ["event_id"]
            }),
        },
    ]
}

/// Dispatches one tool call against the calendar provider, returning a
/// non-empty human-readable string either way. Errors are folded into the
/// returned string rather than propagated, since a `ToolExecutionError`
/// re-enters the loop as a tool-result message (§7).
pub async fn dispatch(call: &ToolCall, calendar: &dyn CalendarProvider) -> String {
    match call.name.as_str() {
        CHECK_AVAILABILITY => match serde_json::from_value::<CheckAvailabilityArgs>(call.arguments.clone()) {
            Ok(args) => match calendar.free_busy(&args.email, args.start, args.end).await {
                Ok(ranges) if ranges.is_empty() => NO_CONFLICTS_SENTINEL.to_string(),
                Ok(ranges) => format_busy_ranges(&ranges),
                Err(err) => format!("Error checking availability: {err}"),
            },
            Err(err) => format!("Error parsing check_availability arguments: {err}"),
        },
        PROPOSE_SLOTS => match serde_json::from_value::<ProposeSlotsArgs>(call.arguments.clone()) {
            Ok(args) => {
                let busy: Vec<replyforge_core::BusyRange> = args
                    .busy
                    .into_iter()
                    .map(|b| replyforge_core::BusyRange {
                        start: b.start,
                        end: b.end,
                    })
                    .collect();
                let slots = propose_slots(&busy, args.working_hours_start, args.working_hours_end, 7);
                if slots.is_empty() {
                    "No free one-hour slots found in the next 7 days within working hours".to_string()
                } else {
                    format_slots(&slots)
                }
            }
            Err(err) => format!("Error parsing propose_slots arguments: {err}"),
        },
        SCHEDULE => match serde_json::from_value::<ScheduleArgs>(call.arguments.clone()) {
            Ok(args) => match calendar
                .insert_event(&args.summary, args.start, args.end, &args.attendees, args.description.as_deref())
                .await
            {
                Ok(event) => format!("Scheduled '{}': {}", event.summary, event.link),
                Err(err) => format!("Error scheduling event: {err}"),
            },
            Err(err) => format!("Error parsing schedule arguments: {err}"),
        },
        LIST_UPCOMING => match serde_json::from_value::<ListUpcomingArgs>(call.arguments.clone()) {
            Ok(args) => match calendar.list_upcoming(args.max_results).await {
                Ok(events) if events.is_empty() => "No upcoming events found".to_string(),
                Ok(events) => events
                    .iter()
                    .map(|e| format!("- {} ({} to {}) [{}]", e.summary, e.start, e.end, e.id))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Err(err) => format!("Error listing upcoming events: {err}"),
            },
            Err(err) => format!("Error parsing list_upcoming arguments: {err}"),
        },
        RESCHEDULE => match serde_json::from_value::<RescheduleArgs>(call.arguments.clone()) {
            Ok(args) => match calendar
                .update_event(&args.event_id, args.new_start, args.new_end)
                .await
            {
                Ok(event) => format!("Rescheduled to {}: {}", event.start, event.link),
                Err(err) => format!("Error rescheduling event: {err}"),
            },
            Err(err) => format!("Error parsing reschedule arguments: {err}"),
        },
        CANCEL => match serde_json::from_value::<CancelArgs>(call.arguments.clone()) {
            Ok(args) => match calendar.delete_event(&args.event_id).await {
                Ok(()) => format!("Event {} cancelled", args.event_id),
                Err(err) => format!("Error cancelling event: {err}"),
            },
            Err(err) => format!("Error parsing cancel arguments: {err}"),
        },
        other => format!("Unknown tool '{other}' requested"),
    }
}

fn format_busy_ranges(ranges: &[replyforge_core::BusyRange]) -> String {
    ranges
        .iter()
        .map(|r| format!("- busy {} to {}", r.start, r.end))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_slots(slots: &[(DateTime<Utc>, DateTime<Utc>)]) -> String {
    slots
        .iter()
        .map(|(start, end)| format!("- {start} to {end}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds up to 3 one-hour slots within the next `lookahead_days` days that
/// fall inside `[working_hours_start, working_hours_end)` UTC wall-clock hour
/// and do not overlap any busy range (§4.5, scenario #2). `working_hours_*`
/// is treated as a UTC hour, not a deployment-local hour — see DESIGN.md's
/// "Working hours timezone" open-question entry.
pub fn propose_slots(
    busy: &[replyforge_core::BusyRange],
    working_hours_start: u32,
    working_hours_end: u32,
    lookahead_days: i64,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut slots = Vec::new();
    let now = Utc::now();
    let day_start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    'days: for day in 0..lookahead_days {
        for hour in working_hours_start..working_hours_end {
            let start = day_start + Duration::days(day) + Duration::hours(hour as i64);
            let end = start + Duration::hours(1);
            if start < now {
                continue;
            }
            if busy.iter().any(|b| start < b.end && end > b.start) {
                continue;
            }
            slots.push((start, end));
            if slots.len() == 3 {
                break 'days;
            }
        }
    }
    slots
}
