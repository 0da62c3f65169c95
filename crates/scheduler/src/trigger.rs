//! Trigger grammar: interval, cron, and one-shot date schedules.

use std::str::FromStr;

use autoqliq_core::AutomationError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Raw schedule configuration, as submitted to `schedule()`.
///
/// Mirrors the recognized options: a `trigger` selector plus the fields
/// that selector uses. Unknown keys are rejected at deserialization;
/// invalid combinations are rejected by [`TriggerConfig::build`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TriggerConfig {
    /// `"interval"`, `"cron"`, or `"date"`.
    pub trigger: String,
    /// Interval length in seconds.
    pub seconds: Option<u64>,
    /// Interval length in minutes.
    pub minutes: Option<u64>,
    /// Interval length in hours.
    pub hours: Option<u64>,
    /// Interval length in days.
    pub days: Option<u64>,
    /// Interval length in weeks.
    pub weeks: Option<u64>,
    /// Cron minute field.
    pub minute: Option<String>,
    /// Cron hour field.
    pub hour: Option<String>,
    /// Cron day-of-month field.
    pub day: Option<String>,
    /// Cron month field.
    pub month: Option<String>,
    /// Cron day-of-week field.
    pub day_of_week: Option<String>,
    /// One-shot fire instant (`trigger = "date"`).
    pub run_date: Option<DateTime<Utc>>,
    /// First-fire instant for interval triggers.
    pub start_date: Option<DateTime<Utc>>,
}

/// A validated schedule.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Fires every `every`, starting at `start` (default: now + `every`).
    Interval {
        /// Period between fires.
        every: Duration,
        /// Explicit first fire.
        start: Option<DateTime<Utc>>,
    },
    /// Fires on a cron schedule.
    Cron {
        /// Parsed schedule.
        schedule: cron::Schedule,
        /// The five-field source pattern, for display.
        source: String,
    },
    /// Fires once.
    Date {
        /// The fire instant.
        when: DateTime<Utc>,
    },
}

impl TriggerConfig {
    /// Validate and build the trigger.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Config`] for an unknown `trigger`
    /// selector, missing or conflicting fields, malformed cron field
    /// patterns, zero-length intervals, or fire instants in the past.
    pub fn build(&self, now: DateTime<Utc>) -> Result<Trigger, AutomationError> {
        match self.trigger.as_str() {
            "interval" => self.build_interval(now),
            "cron" => self.build_cron(),
            "date" => self.build_date(now),
            other => Err(AutomationError::config(format!(
                "unknown trigger type '{other}' (expected interval, cron, or date)"
            ))),
        }
    }

    fn build_interval(&self, now: DateTime<Utc>) -> Result<Trigger, AutomationError> {
        self.reject_cron_fields("interval")?;
        if self.run_date.is_some() {
            return Err(AutomationError::config(
                "interval trigger does not take run_date",
            ));
        }

        let units: Vec<(&str, Option<u64>, fn(i64) -> Duration)> = vec![
            ("seconds", self.seconds, Duration::seconds),
            ("minutes", self.minutes, Duration::minutes),
            ("hours", self.hours, Duration::hours),
            ("days", self.days, Duration::days),
            ("weeks", self.weeks, Duration::weeks),
        ];
        let set: Vec<_> = units
            .iter()
            .filter_map(|(name, value, make)| value.map(|v| (*name, v, *make)))
            .collect();

        let (unit, value, make) = match set.as_slice() {
            [] => {
                return Err(AutomationError::config(
                    "interval trigger requires one of seconds, minutes, hours, days, weeks",
                ));
            }
            [one] => *one,
            _ => {
                let names: Vec<&str> = set.iter().map(|(name, ..)| *name).collect();
                return Err(AutomationError::config(format!(
                    "interval trigger takes exactly one unit, got {}",
                    names.join(" and ")
                )));
            }
        };
        if value == 0 {
            return Err(AutomationError::config(format!(
                "interval {unit} must be greater than zero"
            )));
        }

        if let Some(start) = self.start_date {
            if start < now {
                return Err(AutomationError::config(format!(
                    "start_date {start} is in the past"
                )));
            }
        }

        Ok(Trigger::Interval {
            every: make(i64::try_from(value).map_err(|_| {
                AutomationError::config(format!("interval {unit} value {value} is out of range"))
            })?),
            start: self.start_date,
        })
    }

    fn build_cron(&self) -> Result<Trigger, AutomationError> {
        if self.seconds.is_some()
            || self.minutes.is_some()
            || self.hours.is_some()
            || self.days.is_some()
            || self.weeks.is_some()
        {
            return Err(AutomationError::config(
                "cron trigger does not take interval fields",
            ));
        }
        if self.run_date.is_some() {
            return Err(AutomationError::config("cron trigger does not take run_date"));
        }
        if [&self.minute, &self.hour, &self.day, &self.month, &self.day_of_week]
            .iter()
            .all(|field| field.is_none())
        {
            return Err(AutomationError::config(
                "cron trigger requires at least one of minute, hour, day, month, day_of_week",
            ));
        }

        let fields = [
            ("minute", self.minute.as_deref().unwrap_or("*")),
            ("hour", self.hour.as_deref().unwrap_or("*")),
            ("day", self.day.as_deref().unwrap_or("*")),
            ("month", self.month.as_deref().unwrap_or("*")),
            ("day_of_week", self.day_of_week.as_deref().unwrap_or("*")),
        ];
        for (name, pattern) in fields {
            validate_cron_field(name, pattern)?;
        }

        let source = fields
            .iter()
            .map(|(_, pattern)| *pattern)
            .collect::<Vec<_>>()
            .join(" ");
        // The cron crate wants a leading seconds field; pin it to zero.
        let expression = format!("0 {source}");
        let schedule = cron::Schedule::from_str(&expression).map_err(|e| {
            AutomationError::config(format!("invalid cron pattern '{source}': {e}"))
        })?;

        Ok(Trigger::Cron { schedule, source })
    }

    fn build_date(&self, now: DateTime<Utc>) -> Result<Trigger, AutomationError> {
        self.reject_cron_fields("date")?;
        if self.seconds.is_some()
            || self.minutes.is_some()
            || self.hours.is_some()
            || self.days.is_some()
            || self.weeks.is_some()
        {
            return Err(AutomationError::config(
                "date trigger does not take interval fields",
            ));
        }
        let Some(when) = self.run_date else {
            return Err(AutomationError::config("date trigger requires run_date"));
        };
        if when < now {
            return Err(AutomationError::config(format!(
                "run_date {when} is in the past"
            )));
        }
        Ok(Trigger::Date { when })
    }

    fn reject_cron_fields(&self, trigger: &str) -> Result<(), AutomationError> {
        if self.minute.is_some()
            || self.hour.is_some()
            || self.day.is_some()
            || self.month.is_some()
            || self.day_of_week.is_some()
        {
            return Err(AutomationError::config(format!(
                "{trigger} trigger does not take cron fields"
            )));
        }
        Ok(())
    }
}

/// Check a cron field is `*`, `*/n`, or a comma list of integers.
fn validate_cron_field(name: &str, pattern: &str) -> Result<(), AutomationError> {
    let malformed = || {
        AutomationError::config(format!(
            "cron field {name} '{pattern}' must be '*', '*/n', or a comma list of integers"
        ))
    };

    if pattern == "*" {
        return Ok(());
    }
    if let Some(step) = pattern.strip_prefix("*/") {
        let step: u32 = step.parse().map_err(|_| malformed())?;
        if step == 0 {
            return Err(malformed());
        }
        return Ok(());
    }
    if pattern.split(',').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    {
        return Ok(());
    }
    Err(malformed())
}

impl Trigger {
    /// First fire after registration at `now`.
    #[must_use]
    pub fn first_fire(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Interval { every, start } => Some(start.unwrap_or(now + *every)),
            Self::Cron { schedule, .. } => schedule.after(&now).next(),
            Self::Date { when } => Some(*when),
        }
    }

    /// Next fire strictly after `after`.
    ///
    /// Computed from the instant the previous fire was handled, never
    /// from a missed instant: a late scheduler skips, it does not
    /// replay. `None` retires the job (one-shot dates).
    #[must_use]
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Interval { every, .. } => Some(after + *every),
            Self::Cron { schedule, .. } => schedule.after(&after).next(),
            Self::Date { .. } => None,
        }
    }

    /// Short description for job listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Interval { every, .. } => format!("every {}s", every.num_seconds()),
            Self::Cron { source, .. } => format!("cron {source}"),
            Self::Date { when } => format!("once at {}", when.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn interval_config(seconds: u64) -> TriggerConfig {
        TriggerConfig {
            trigger: "interval".into(),
            seconds: Some(seconds),
            ..TriggerConfig::default()
        }
    }

    #[test]
    fn interval_defaults_first_fire_to_now_plus_period() {
        let now = Utc::now();
        let trigger = interval_config(30).build(now).unwrap();
        assert_eq!(trigger.first_fire(now), Some(now + Duration::seconds(30)));
        assert_eq!(
            trigger.next_fire(now + Duration::seconds(30)),
            Some(now + Duration::seconds(60))
        );
    }

    #[test]
    fn interval_honours_start_date() {
        let now = Utc::now();
        let start = now + Duration::minutes(5);
        let config = TriggerConfig {
            start_date: Some(start),
            ..interval_config(60)
        };
        let trigger = config.build(now).unwrap();
        assert_eq!(trigger.first_fire(now), Some(start));
    }

    #[test]
    fn interval_requires_exactly_one_unit() {
        let now = Utc::now();
        let none = TriggerConfig {
            trigger: "interval".into(),
            ..TriggerConfig::default()
        };
        assert!(none.build(now).is_err());

        let two = TriggerConfig {
            minutes: Some(1),
            ..interval_config(30)
        };
        let err = two.build(now).unwrap_err();
        assert!(err.to_string().contains("exactly one unit"));
    }

    #[test]
    fn interval_rejects_zero_and_past_start() {
        let now = Utc::now();
        assert!(interval_config(0).build(now).is_err());

        let past = TriggerConfig {
            start_date: Some(now - Duration::seconds(10)),
            ..interval_config(30)
        };
        assert!(past.build(now).is_err());
    }

    #[test]
    fn interval_rejects_cron_fields() {
        let now = Utc::now();
        let mixed = TriggerConfig {
            minute: Some("*/5".into()),
            ..interval_config(30)
        };
        let err = mixed.build(now).unwrap_err();
        assert!(err.to_string().contains("does not take cron fields"));
    }

    #[test]
    fn cron_builds_and_fires_on_the_pattern() {
        let config = TriggerConfig {
            trigger: "cron".into(),
            minute: Some("*/15".into()),
            ..TriggerConfig::default()
        };
        let now = "2026-08-01T10:03:00Z".parse().unwrap();
        let trigger = config.build(now).unwrap();
        let first = trigger.first_fire(now).unwrap();
        assert_eq!(first, "2026-08-01T10:15:00Z".parse::<DateTime<Utc>>().unwrap());
        let second = trigger.next_fire(first).unwrap();
        assert_eq!(second, "2026-08-01T10:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[rstest]
    #[case("*")]
    #[case("*/5")]
    #[case("0")]
    #[case("1,15,30")]
    fn cron_field_patterns_accepted(#[case] pattern: &str) {
        assert!(validate_cron_field("minute", pattern).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("*/0")]
    #[case("*/x")]
    #[case("1-5")]
    #[case("a,b")]
    #[case("1,,2")]
    fn cron_field_patterns_rejected(#[case] pattern: &str) {
        assert!(validate_cron_field("minute", pattern).is_err());
    }

    #[test]
    fn cron_requires_some_field_and_no_interval_units() {
        let now = Utc::now();
        let bare = TriggerConfig {
            trigger: "cron".into(),
            ..TriggerConfig::default()
        };
        assert!(bare.build(now).is_err());

        let mixed = TriggerConfig {
            trigger: "cron".into(),
            minute: Some("*".into()),
            seconds: Some(30),
            ..TriggerConfig::default()
        };
        assert!(mixed.build(now).is_err());
    }

    #[test]
    fn date_fires_once_then_retires() {
        let now = Utc::now();
        let when = now + Duration::hours(1);
        let config = TriggerConfig {
            trigger: "date".into(),
            run_date: Some(when),
            ..TriggerConfig::default()
        };
        let trigger = config.build(now).unwrap();
        assert_eq!(trigger.first_fire(now), Some(when));
        assert_eq!(trigger.next_fire(when), None);
    }

    #[test]
    fn date_requires_a_future_run_date() {
        let now = Utc::now();
        let missing = TriggerConfig {
            trigger: "date".into(),
            ..TriggerConfig::default()
        };
        assert!(missing.build(now).is_err());

        let past = TriggerConfig {
            trigger: "date".into(),
            run_date: Some(now - Duration::seconds(1)),
            ..TriggerConfig::default()
        };
        assert!(past.build(now).is_err());
    }

    #[test]
    fn unknown_trigger_type_is_rejected() {
        let config = TriggerConfig {
            trigger: "hourly".into(),
            ..TriggerConfig::default()
        };
        let err = config.build(Utc::now()).unwrap_err();
        assert!(err.to_string().contains("unknown trigger type"));
    }

    #[test]
    fn config_deserializes_from_flat_mapping() {
        let config: TriggerConfig = serde_json::from_str(
            r#"{"trigger": "interval", "minutes": 10}"#,
        )
        .unwrap();
        assert_eq!(config.minutes, Some(10));
        assert!(serde_json::from_str::<TriggerConfig>(r#"{"trigger": "interval", "bogus": 1}"#).is_err());
    }

    #[test]
    fn describe_is_human_readable() {
        let now = Utc::now();
        let trigger = interval_config(90).build(now).unwrap();
        assert_eq!(trigger.describe(), "every 90s");
    }
}
