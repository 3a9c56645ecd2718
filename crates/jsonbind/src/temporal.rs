//! Temporal host objects backed by the `time` crate.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::well_known::{Iso8601, Rfc3339},
};

use crate::value::HostObject;

impl HostObject for OffsetDateTime {
    fn to_display_string(&self) -> String {
        self.to_string()
    }

    fn iso8601(&self) -> Option<String> {
        self.format(&Rfc3339).ok()
    }

    fn is_temporal(&self) -> bool {
        true
    }
}

impl HostObject for PrimitiveDateTime {
    fn to_display_string(&self) -> String {
        self.to_string()
    }

    fn iso8601(&self) -> Option<String> {
        self.format(&Iso8601::DATE_TIME).ok()
    }

    fn is_temporal(&self) -> bool {
        true
    }
}

impl HostObject for Date {
    fn to_display_string(&self) -> String {
        self.to_string()
    }

    fn iso8601(&self) -> Option<String> {
        self.format(&Iso8601::DATE).ok()
    }

    fn is_temporal(&self) -> bool {
        true
    }
}
