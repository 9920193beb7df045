//! `{(date)source}` and `{(date)source:format}`: timestamp formatting.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use regex::Regex;

use crate::context::{Context, Value};
use crate::engine::{HandlerError, TemplateEngine};

use super::ExpressionHandler;

/// Format used when the expression names none.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(date\)(.+?)(?::(.+))?$").expect("date pattern is valid")
});

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Formats `now` or a context value with a strftime pattern.
///
/// Sources are numeric epoch seconds or date strings. Strings without an
/// offset are read in the handler's zone, which is also the output zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatHandler {
    offset: Option<FixedOffset>,
}

impl DateFormatHandler {
    pub const NAME: &'static str = "date_format";

    /// Handler using the system local zone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler pinned to a fixed UTC offset.
    #[must_use]
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// Handler pinned to UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::with_offset(Utc.fix())
    }

    /// Handler for an offset in seconds east of UTC; `None` or an out of
    /// range offset selects the local zone.
    #[must_use]
    pub fn from_offset_seconds(seconds: Option<i32>) -> Self {
        Self {
            offset: seconds.and_then(FixedOffset::east_opt),
        }
    }

    fn parse_instant(&self, value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(text) if text.trim().parse::<f64>().is_err() => self.parse_text(text.trim()),
            _ => {
                let seconds = value.as_number()?;
                #[allow(clippy::cast_possible_truncation)]
                let seconds = seconds.trunc() as i64;
                DateTime::from_timestamp(seconds, 0)
            }
        }
    }

    fn parse_text(&self, text: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NAIVE_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })?;
        self.localize(&naive)
    }

    fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.offset {
            Some(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            None => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    fn format(&self, instant: DateTime<Utc>, format: &str) -> Option<String> {
        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }
        let mut out = String::new();
        let written = match self.offset {
            Some(offset) => write!(
                out,
                "{}",
                instant.with_timezone(&offset).format_with_items(items.iter())
            ),
            None => write!(
                out,
                "{}",
                instant.with_timezone(&Local).format_with_items(items.iter())
            ),
        };
        written.ok().map(|()| out)
    }
}

impl ExpressionHandler for DateFormatHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Date formatting: {(date)created_at:%Y-%m-%d} or {(date)now}"
    }

    fn handle(
        &self,
        expression: &str,
        context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = DATE_RE.captures(expression) else {
            return Ok(None);
        };
        let source = &caps[1];
        let format = caps.get(2).map_or(DEFAULT_DATE_FORMAT, |m| m.as_str());

        let instant = if source.eq_ignore_ascii_case("now") {
            Utc::now()
        } else {
            let Some(value) = context.get(source).filter(|v| !v.is_blank()) else {
                return Ok(None);
            };
            let Some(instant) = self.parse_instant(value) else {
                tracing::debug!(source, "Date source not parseable");
                return Ok(None);
            };
            instant
        };
        Ok(self.format(instant, format))
    }
}
