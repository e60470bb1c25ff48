//! Calendar export for brotherhood events
//!
//! Produces RFC 5545 iCalendar documents and "add to calendar" links for
//! Google Calendar and Outlook.

use crate::errors::CalendarError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const ICS_PRODID: &str = "-//Top Tier Men//Brotherhood Events//NL";
pub const GOOGLE_CALENDAR_BASE: &str = "https://calendar.google.com/calendar/render";
pub const OUTLOOK_CALENDAR_BASE: &str = "https://outlook.live.com/calendar/0/deeplink/compose";

/// Longest content line allowed before folding, in octets
const MAX_LINE_OCTETS: usize = 75;

/// Event data needed for calendar export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Links for adding an event to hosted calendars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarLinks {
    pub google: String,
    pub outlook: String,
}

impl CalendarEvent {
    pub fn new(
        uid: impl Into<String>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, CalendarError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CalendarError::EmptyTitle);
        }
        if ends_at <= starts_at {
            return Err(CalendarError::InvalidRange);
        }
        Ok(Self {
            uid: uid.into(),
            title,
            description: None,
            location: None,
            starts_at,
            ends_at,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.trim().is_empty());
        self
    }

    /// Render a single-event VCALENDAR document
    pub fn to_ics(&self, stamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", ICS_PRODID),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", escape_text(&self.uid)),
            format!("DTSTAMP:{}", ics_timestamp(stamp)),
            format!("DTSTART:{}", ics_timestamp(self.starts_at)),
            format!("DTEND:{}", ics_timestamp(self.ends_at)),
            format!("SUMMARY:{}", escape_text(&self.title)),
        ];
        if let Some(description) = &self.description {
            lines.push(format!("DESCRIPTION:{}", escape_text(description)));
        }
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold_line(&line));
            out.push_str("\r\n");
        }
        out
    }

    /// File name for the `.ics` download
    pub fn ics_filename(&self) -> String {
        let slug: String = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        if slug.is_empty() {
            "event.ics".to_string()
        } else {
            format!("{}.ics", slug)
        }
    }

    pub fn google_calendar_url(&self) -> String {
        let dates = format!(
            "{}/{}",
            ics_timestamp(self.starts_at),
            ics_timestamp(self.ends_at)
        );
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates)
            .append_pair("details", self.description.as_deref().unwrap_or(""))
            .append_pair("location", self.location.as_deref().unwrap_or(""))
            .finish();
        format!("{}?{}", GOOGLE_CALENDAR_BASE, query)
    }

    pub fn outlook_calendar_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("path", "/calendar/action/compose")
            .append_pair("rru", "addevent")
            .append_pair("subject", &self.title)
            .append_pair("startdt", &self.starts_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("enddt", &self.ends_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("body", self.description.as_deref().unwrap_or(""))
            .append_pair("location", self.location.as_deref().unwrap_or(""))
            .finish();
        format!("{}?{}", OUTLOOK_CALENDAR_BASE, query)
    }

    pub fn links(&self) -> CalendarLinks {
        CalendarLinks {
            google: self.google_calendar_url(),
            outlook: self.outlook_calendar_url(),
        }
    }
}

/// UTC timestamp in iCalendar basic format
pub fn ics_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT property value
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Fold a content line so no physical line exceeds 75 octets
///
/// Continuation lines start with a single space, which counts towards the
/// limit. Multi-byte characters are never split.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}
