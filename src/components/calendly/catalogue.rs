//! The fixed table of operations exposed to agents.
//!
//! Every entry describes one Calendly endpoint: its HTTP method, a path
//! template with `{placeholders}`, and the named parameters it accepts. A
//! request is built from the descriptor alone, plus an optional shaping hook
//! for the few endpoints whose body is not a flat copy of the arguments.
//!
//! Identifiers are passed through untouched. Some endpoints take a bare UUID,
//! others a full resource URI such as `https://api.calendly.com/users/XXX`;
//! each parameter's description says which one the endpoint expects.

use super::arguments::Arguments;
use super::models::{Method, RequestDescriptor};
use crate::error::{argument_error, AppResult};
use serde_json::{json, Map, Value};
use std::fmt;

/// Value types a parameter can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// Structured data, inline or as a JSON string
    Json,
    StringList,
}

/// Where a parameter ends up in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Path,
    Query,
    Body,
    /// Consumed by the operation's shaping hook
    Shaped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Integer(i64),
    Str(&'static str),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Integer(n) => Value::from(n),
            DefaultValue::Str(s) => Value::from(s),
        }
    }
}

/// One named parameter of an operation
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub placement: Placement,
    pub required: bool,
    pub default: Option<DefaultValue>,
    /// Name sent to Calendly when it differs from `name`
    pub wire_name: Option<&'static str>,
    pub description: &'static str,
}

impl ParamSpec {
    const fn new(
        name: &'static str,
        kind: ParamKind,
        placement: Placement,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            placement,
            required: false,
            default: None,
            wire_name: None,
            description,
        }
    }

    /// Identifier substituted into the path template; always required
    pub const fn path(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, Placement::Path, description).required()
    }

    pub const fn query(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self::new(name, kind, Placement::Query, description)
    }

    pub const fn body(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self::new(name, kind, Placement::Body, description)
    }

    pub const fn shaped(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self::new(name, kind, Placement::Shaped, description)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_int(mut self, value: i64) -> Self {
        self.default = Some(DefaultValue::Integer(value));
        self
    }

    pub const fn default_str(mut self, value: &'static str) -> Self {
        self.default = Some(DefaultValue::Str(value));
        self
    }

    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    /// Coerced value, falling back to the default
    fn resolve(&self, args: &Arguments) -> AppResult<Option<Value>> {
        let value = match self.kind {
            ParamKind::String => args.string(self.name)?.map(Value::String),
            ParamKind::Integer => args.integer(self.name)?.map(Value::from),
            ParamKind::Boolean => args.boolean(self.name)?.map(Value::Bool),
            ParamKind::Json => args.json(self.name)?,
            ParamKind::StringList => args.string_list(self.name)?.map(Value::from),
        };
        Ok(value.or_else(|| self.default.map(DefaultValue::to_value)))
    }

    fn schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Integer => json!({ "type": "integer" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::Json => json!({ "type": ["object", "array", "string"] }),
            ParamKind::StringList => json!({ "type": "array", "items": { "type": "string" } }),
        };
        schema["description"] = Value::from(self.description);
        if let Some(default) = self.default {
            schema["default"] = default.to_value();
        }
        schema
    }
}

/// Adjusts a built request for endpoints with nested bodies
pub type Shaper = fn(&Arguments, &mut RequestDescriptor) -> AppResult<()>;

/// Descriptor of one exposed operation
pub struct OperationSpec {
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub method: Method,
    /// Path relative to the base URL, with `{name}` placeholders
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub shape: Option<Shaper>,
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params.len())
            .field("shaped", &self.shape.is_some())
            .finish()
    }
}

impl OperationSpec {
    /// Validate the arguments and assemble the request.
    ///
    /// Fails with a caller error, before anything touches the network, when a
    /// required parameter is absent or a value has the wrong shape.
    pub fn build(&self, args: &Arguments) -> AppResult<RequestDescriptor> {
        let mut path = self.path.to_string();
        let mut request = RequestDescriptor::new(self.method, String::new());

        for param in self.params {
            let value = match param.resolve(args)? {
                Some(value) => value,
                None if param.required => {
                    return Err(argument_error(&format!(
                        "Missing required parameter '{}' for {}",
                        param.name, self.name
                    )))
                }
                None => continue,
            };

            match param.placement {
                Placement::Path => {
                    let placeholder = format!("{{{}}}", param.name);
                    let segment = urlencoding::encode(&render(&value)).into_owned();
                    path = path.replace(&placeholder, &segment);
                }
                Placement::Query => {
                    request
                        .query
                        .insert(param.wire_name().to_string(), render(&value));
                }
                Placement::Body => request.insert_body(param.wire_name(), value),
                Placement::Shaped => {}
            }
        }

        request.path = path;

        if let Some(shape) = self.shape {
            shape(args, &mut request)?;
        }

        Ok(request)
    }

    /// JSON Schema describing the accepted arguments
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in self.params {
            properties.insert(param.name.to_string(), param.schema());
            if param.required {
                required.push(Value::from(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Names of the `{placeholders}` in the path template
    pub fn placeholders(&self) -> Vec<&'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}

/// Query-string rendering of a coerced value
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Look up an operation by name
pub fn find(name: &str) -> Option<&'static OperationSpec> {
    CATALOGUE.iter().find(|op| op.name == name)
}

/// Builds `locations: [{kind, ...}]` from `location_kind` / `location_details`
fn shape_event_type_location(args: &Arguments, request: &mut RequestDescriptor) -> AppResult<()> {
    let Some(kind) = args.string("location_kind")? else {
        return Ok(());
    };

    let mut location = Map::new();
    if let Some(details) = args.string("location_details")? {
        let field = match kind.as_str() {
            "physical" => "location",
            "inbound_call" | "outbound_call" => "phone_number",
            _ => "additional_info",
        };
        location.insert(field.to_string(), Value::String(details));
    }
    location.insert("kind".to_string(), Value::String(kind));

    request.insert_body("locations", Value::Array(vec![Value::Object(location)]));
    Ok(())
}

use ParamKind::{Boolean, Integer, Json, String as Str, StringList};

const COUNT: ParamSpec =
    ParamSpec::query("count", Integer, "Number of results per page (max 100)").default_int(20);
const PAGE_TOKEN: ParamSpec = ParamSpec::query(
    "page_token",
    Str,
    "Token for the next or previous page, taken from a previous response's pagination block",
);
const LOCATION_KIND: ParamSpec = ParamSpec::shaped(
    "location_kind",
    Str,
    "Location type (zoom_conference, google_conference, physical, inbound_call, outbound_call, custom, ...)",
);
const LOCATION_DETAILS: ParamSpec = ParamSpec::shaped(
    "location_details",
    Str,
    "Address for physical locations, phone number for calls, additional info otherwise",
);

/// Every operation, grouped by resource
pub static CATALOGUE: &[OperationSpec] = &[
    // Users
    OperationSpec {
        name: "get_current_user",
        group: "users",
        description: "Get information about the currently authenticated user",
        method: Method::Get,
        path: "users/me",
        params: &[],
        shape: None,
    },
    OperationSpec {
        name: "get_user",
        group: "users",
        description: "Get information about a specific user",
        method: Method::Get,
        path: "users/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the user, or \"me\" for the current user")],
        shape: None,
    },
    // Event types
    OperationSpec {
        name: "list_event_types",
        group: "event_types",
        description: "List event types for a user or organization",
        method: Method::Get,
        path: "event_types",
        params: &[
            ParamSpec::query("user", Str, "URI of the user (e.g. https://api.calendly.com/users/XXX)"),
            ParamSpec::query("organization", Str, "URI of the organization"),
            ParamSpec::query("active", Boolean, "Filter by active status"),
            COUNT,
            ParamSpec::query("sort", Str, "Sort order, e.g. name:asc"),
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_event_type",
        group: "event_types",
        description: "Get details of a specific event type",
        method: Method::Get,
        path: "event_types/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the event type")],
        shape: None,
    },
    OperationSpec {
        name: "create_event_type",
        group: "event_types",
        description: "Create a new one-on-one event type",
        method: Method::Post,
        path: "event_types",
        params: &[
            ParamSpec::body("name", Str, "Name of the event type").required(),
            ParamSpec::body("duration", Integer, "Duration in minutes").required(),
            ParamSpec::body("owner", Str, "URI of the owning user").required(),
            ParamSpec::body("description", Str, "Description shown to invitees"),
            ParamSpec::body("color", Str, "Hex color code (e.g. #8247f5)"),
            ParamSpec::body("visibility", Str, "Visibility of the event type"),
            ParamSpec::body("locale", Str, "Locale of the booking page"),
            LOCATION_KIND,
            LOCATION_DETAILS,
        ],
        shape: Some(shape_event_type_location),
    },
    OperationSpec {
        name: "update_event_type",
        group: "event_types",
        description: "Update an existing event type (name, duration, location, ...)",
        method: Method::Patch,
        path: "event_types/{uuid}",
        params: &[
            ParamSpec::path("uuid", "UUID of the event type to update"),
            ParamSpec::body("name", Str, "New name"),
            ParamSpec::body("duration", Integer, "New duration in minutes"),
            ParamSpec::body("description", Str, "Description shown to invitees"),
            ParamSpec::body("description_plain", Str, "Plain text description"),
            ParamSpec::body("description_html", Str, "HTML description"),
            ParamSpec::body("color", Str, "Hex color code (e.g. #8247f5)"),
            ParamSpec::body("active", Boolean, "Whether the event type is active"),
            ParamSpec::body("visibility", Str, "Visibility of the event type"),
            LOCATION_KIND,
            LOCATION_DETAILS,
        ],
        shape: Some(shape_event_type_location),
    },
    OperationSpec {
        name: "delete_event_type",
        group: "event_types",
        description: "Delete an event type",
        method: Method::Delete,
        path: "event_types/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the event type to delete")],
        shape: None,
    },
    OperationSpec {
        name: "list_event_type_available_times",
        group: "event_types",
        description: "Get available time slots for an event type",
        method: Method::Get,
        path: "event_type_available_times",
        params: &[
            ParamSpec::query("event_type", Str, "URI of the event type").required(),
            ParamSpec::query("start_time", Str, "Start of range (ISO 8601)").required(),
            ParamSpec::query("end_time", Str, "End of range (ISO 8601)").required(),
        ],
        shape: None,
    },
    OperationSpec {
        name: "list_event_type_availability_schedules",
        group: "event_types",
        description: "List availability schedules attached to an event type",
        method: Method::Get,
        path: "event_type_availability_schedules",
        params: &[ParamSpec::query("event_type", Str, "URI of the event type").required()],
        shape: None,
    },
    OperationSpec {
        name: "update_event_type_availability_schedule",
        group: "event_types",
        description: "Update the availability schedule of an event type",
        method: Method::Patch,
        path: "event_type_availability_schedules/{event_type}",
        params: &[
            ParamSpec::path("event_type", "UUID of the event type"),
            ParamSpec::body("availability_rules", Json, "Availability rule as JSON")
                .required()
                .wire("availability_rule"),
            ParamSpec::body("user", Str, "URI of the user whose schedule applies"),
            ParamSpec::body("availability_setting", Str, "Availability setting, e.g. host"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "list_user_meeting_locations",
        group: "event_types",
        description: "List meeting locations configured for a user",
        method: Method::Get,
        path: "location",
        params: &[ParamSpec::query("user", Str, "URI of the user").required()],
        shape: None,
    },
    // Availability
    OperationSpec {
        name: "list_user_availability_schedules",
        group: "availability",
        description: "List all availability schedules for a user",
        method: Method::Get,
        path: "user_availability_schedules",
        params: &[ParamSpec::query("user", Str, "URI of the user (e.g. https://api.calendly.com/users/XXX)").required()],
        shape: None,
    },
    OperationSpec {
        name: "get_user_availability_schedule",
        group: "availability",
        description: "Get details of a user availability schedule",
        method: Method::Get,
        path: "user_availability_schedules/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the availability schedule")],
        shape: None,
    },
    OperationSpec {
        name: "create_user_availability_schedule",
        group: "availability",
        description: "Create a new availability schedule",
        method: Method::Post,
        path: "user_availability_schedules",
        params: &[
            ParamSpec::body("user", Str, "URI of the user").required(),
            ParamSpec::body("name", Str, "Name for the schedule").required(),
            ParamSpec::body("timezone", Str, "IANA timezone (e.g. America/New_York)").required(),
            ParamSpec::body("rules", Json, "Availability rules as JSON").required(),
        ],
        shape: None,
    },
    OperationSpec {
        name: "update_user_availability_schedule",
        group: "availability",
        description: "Update an existing availability schedule",
        method: Method::Patch,
        path: "user_availability_schedules/{uuid}",
        params: &[
            ParamSpec::path("uuid", "UUID of the schedule to update"),
            ParamSpec::body("name", Str, "New name for the schedule"),
            ParamSpec::body("timezone", Str, "New IANA timezone"),
            ParamSpec::body("rules", Json, "New availability rules as JSON"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "delete_user_availability_schedule",
        group: "availability",
        description: "Delete an availability schedule",
        method: Method::Delete,
        path: "user_availability_schedules/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the schedule to delete")],
        shape: None,
    },
    OperationSpec {
        name: "list_user_busy_times",
        group: "availability",
        description: "Get busy times for a user within a date range",
        method: Method::Get,
        path: "user_busy_times",
        params: &[
            ParamSpec::query("user", Str, "URI of the user").required(),
            ParamSpec::query("start_time", Str, "Start of range (ISO 8601)").required(),
            ParamSpec::query("end_time", Str, "End of range (ISO 8601)").required(),
        ],
        shape: None,
    },
    // Scheduled events
    OperationSpec {
        name: "list_events",
        group: "scheduled_events",
        description: "List scheduled events with optional filters",
        method: Method::Get,
        path: "scheduled_events",
        params: &[
            ParamSpec::query("user", Str, "URI of the user"),
            ParamSpec::query("organization", Str, "URI of the organization"),
            ParamSpec::query("invitee_email", Str, "Filter by invitee email"),
            ParamSpec::query("status", Str, "Filter by status (active, canceled)"),
            ParamSpec::query("min_start_time", Str, "Minimum start time (ISO 8601)"),
            ParamSpec::query("max_start_time", Str, "Maximum start time (ISO 8601)"),
            COUNT,
            ParamSpec::query("sort", Str, "Sort order, e.g. start_time:asc"),
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_event",
        group: "scheduled_events",
        description: "Get details of a scheduled event",
        method: Method::Get,
        path: "scheduled_events/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the scheduled event")],
        shape: None,
    },
    OperationSpec {
        name: "cancel_event",
        group: "scheduled_events",
        description: "Cancel a scheduled event",
        method: Method::Post,
        path: "scheduled_events/{uuid}/cancellation",
        params: &[
            ParamSpec::path("uuid", "UUID of the event to cancel"),
            ParamSpec::body("reason", Str, "Reason for cancellation, sent to invitees"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "create_event_invitee",
        group: "scheduled_events",
        description: "Book a meeting for an invitee on an event type",
        method: Method::Post,
        path: "scheduled_events",
        params: &[
            ParamSpec::body("event_type_uuid", Str, "UUID of the event type").required(),
            ParamSpec::body("start_time", Str, "Start time (ISO 8601)").required(),
            ParamSpec::body("email", Str, "Invitee email").required(),
            ParamSpec::body("name", Str, "Invitee full name").required(),
            ParamSpec::body("first_name", Str, "Invitee first name"),
            ParamSpec::body("last_name", Str, "Invitee last name"),
            ParamSpec::body("timezone", Str, "Invitee IANA timezone"),
            ParamSpec::body("guests", StringList, "Additional guest emails"),
            ParamSpec::body("questions_and_answers", Json, "Answers to booking questions as JSON"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "list_event_invitees",
        group: "scheduled_events",
        description: "List invitees for a scheduled event",
        method: Method::Get,
        path: "scheduled_events/{event_uuid}/invitees",
        params: &[
            ParamSpec::path("event_uuid", "UUID of the scheduled event"),
            ParamSpec::query("email", Str, "Filter by invitee email"),
            ParamSpec::query("status", Str, "Filter by status (active, canceled)"),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_event_invitee",
        group: "scheduled_events",
        description: "Get details of a specific event invitee",
        method: Method::Get,
        path: "scheduled_events/{event_uuid}/invitees/{invitee_uuid}",
        params: &[
            ParamSpec::path("event_uuid", "UUID of the scheduled event"),
            ParamSpec::path("invitee_uuid", "UUID of the invitee"),
        ],
        shape: None,
    },
    // Organizations
    OperationSpec {
        name: "get_organization",
        group: "organizations",
        description: "Get organization details",
        method: Method::Get,
        path: "organizations/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the organization")],
        shape: None,
    },
    OperationSpec {
        name: "list_organization_memberships",
        group: "organizations",
        description: "List members of an organization",
        method: Method::Get,
        path: "organization_memberships",
        params: &[
            ParamSpec::query("organization", Str, "URI of the organization").required(),
            ParamSpec::query("email", Str, "Filter by member email"),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_organization_membership",
        group: "organizations",
        description: "Get details of an organization membership",
        method: Method::Get,
        path: "organization_memberships/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the membership")],
        shape: None,
    },
    OperationSpec {
        name: "delete_organization_membership",
        group: "organizations",
        description: "Remove a user from an organization",
        method: Method::Delete,
        path: "organization_memberships/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the membership")],
        shape: None,
    },
    OperationSpec {
        name: "list_organization_invitations",
        group: "organizations",
        description: "List invitations sent by an organization",
        method: Method::Get,
        path: "organizations/{org_uuid}/invitations",
        params: &[
            ParamSpec::path("org_uuid", "UUID of the organization"),
            ParamSpec::query("email", Str, "Filter by invitee email"),
            ParamSpec::query("status", Str, "Filter by status (pending, accepted, declined)"),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_organization_invitation",
        group: "organizations",
        description: "Get details of an organization invitation",
        method: Method::Get,
        path: "organizations/{org_uuid}/invitations/{invitation_uuid}",
        params: &[
            ParamSpec::path("org_uuid", "UUID of the organization"),
            ParamSpec::path("invitation_uuid", "UUID of the invitation"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "create_organization_invitation",
        group: "organizations",
        description: "Invite a user to an organization",
        method: Method::Post,
        path: "organizations/{org_uuid}/invitations",
        params: &[
            ParamSpec::path("org_uuid", "UUID of the organization"),
            ParamSpec::body("email", Str, "Email address to invite").required(),
        ],
        shape: None,
    },
    OperationSpec {
        name: "revoke_organization_invitation",
        group: "organizations",
        description: "Revoke a pending organization invitation",
        method: Method::Delete,
        path: "organizations/{org_uuid}/invitations/{invitation_uuid}",
        params: &[
            ParamSpec::path("org_uuid", "UUID of the organization"),
            ParamSpec::path("invitation_uuid", "UUID of the invitation"),
        ],
        shape: None,
    },
    // Webhooks
    OperationSpec {
        name: "list_webhook_subscriptions",
        group: "webhooks",
        description: "List webhook subscriptions",
        method: Method::Get,
        path: "webhook_subscriptions",
        params: &[
            ParamSpec::query("organization", Str, "URI of the organization").required(),
            ParamSpec::query("scope", Str, "Scope of webhooks (organization or user)")
                .default_str("organization"),
            ParamSpec::query("user", Str, "URI of the user, required by Calendly for user scope"),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "create_webhook_subscription",
        group: "webhooks",
        description: "Create a webhook subscription",
        method: Method::Post,
        path: "webhook_subscriptions",
        params: &[
            ParamSpec::body("url", Str, "URL to send webhook events to").required(),
            ParamSpec::body("organization", Str, "URI of the organization").required(),
            ParamSpec::body("events", StringList, "Event names to subscribe to, e.g. invitee.created")
                .required(),
            ParamSpec::body("scope", Str, "Scope (organization or user)").default_str("organization"),
            ParamSpec::body("user", Str, "URI of the user, for user scope"),
            ParamSpec::body("signing_key", Str, "Key used to sign webhook payloads"),
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_webhook_subscription",
        group: "webhooks",
        description: "Get details of a webhook subscription",
        method: Method::Get,
        path: "webhook_subscriptions/{webhook_uuid}",
        params: &[ParamSpec::path("webhook_uuid", "UUID of the webhook subscription")],
        shape: None,
    },
    OperationSpec {
        name: "delete_webhook_subscription",
        group: "webhooks",
        description: "Delete a webhook subscription",
        method: Method::Delete,
        path: "webhook_subscriptions/{webhook_uuid}",
        params: &[ParamSpec::path("webhook_uuid", "UUID of the webhook subscription to delete")],
        shape: None,
    },
    // Routing forms
    OperationSpec {
        name: "list_routing_forms",
        group: "routing_forms",
        description: "List routing forms for an organization",
        method: Method::Get,
        path: "routing_forms",
        params: &[
            ParamSpec::query("organization", Str, "URI of the organization").required(),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_routing_form",
        group: "routing_forms",
        description: "Get details of a routing form",
        method: Method::Get,
        path: "routing_forms/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the routing form")],
        shape: None,
    },
    OperationSpec {
        name: "list_routing_form_submissions",
        group: "routing_forms",
        description: "List submissions for a routing form",
        method: Method::Get,
        path: "routing_forms/{form_uuid}/submissions",
        params: &[
            ParamSpec::path("form_uuid", "UUID of the routing form"),
            COUNT,
            PAGE_TOKEN,
        ],
        shape: None,
    },
    OperationSpec {
        name: "get_routing_form_submission",
        group: "routing_forms",
        description: "Get details of a routing form submission",
        method: Method::Get,
        path: "routing_form_submissions/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the submission")],
        shape: None,
    },
    // Scheduling links
    OperationSpec {
        name: "create_scheduling_link",
        group: "scheduling_links",
        description: "Create a single-use scheduling link",
        method: Method::Post,
        path: "scheduling_links",
        params: &[
            ParamSpec::body("max_event_count", Integer, "Number of events the link can book").required(),
            ParamSpec::body("owner", Str, "URI of the event type that owns the link").required(),
            ParamSpec::body("owner_type", Str, "Type of the owner, e.g. EventType").required(),
        ],
        shape: None,
    },
    // No-shows
    OperationSpec {
        name: "create_invitee_no_show",
        group: "no_shows",
        description: "Mark an invitee as a no-show",
        method: Method::Post,
        path: "invitee_no_shows",
        params: &[ParamSpec::body("invitee", Str, "URI of the invitee").required()],
        shape: None,
    },
    OperationSpec {
        name: "get_invitee_no_show",
        group: "no_shows",
        description: "Get no-show details",
        method: Method::Get,
        path: "invitee_no_shows/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the no-show record")],
        shape: None,
    },
    OperationSpec {
        name: "delete_invitee_no_show",
        group: "no_shows",
        description: "Unmark an invitee as a no-show",
        method: Method::Delete,
        path: "invitee_no_shows/{uuid}",
        params: &[ParamSpec::path("uuid", "UUID of the no-show record")],
        shape: None,
    },
    // Data compliance
    OperationSpec {
        name: "delete_invitee_data",
        group: "data_compliance",
        description: "Delete all data for the given invitee emails (GDPR)",
        method: Method::Post,
        path: "data_compliance/deletion/invitees",
        params: &[ParamSpec::body("emails", StringList, "Invitee emails whose data is deleted").required()],
        shape: None,
    },
];
