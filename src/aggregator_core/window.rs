//! Trailing time window aggregation of delivery durations

use super::error::{AggregationError, Result};
use super::normalizer::{DeliveryEvent, RawEvent};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// Output layout for tick dates, e.g. `2018-12-26 18:11:00`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    /// Minutes between two ticks.
    pub frequency_minutes: u32,
    /// How far back from a tick an event still counts.
    pub window_size_minutes: u32,
}

impl WindowSpec {
    /// One tick per minute over a `window_size_minutes` trailing window.
    pub fn new(window_size_minutes: u32) -> Self {
        Self {
            frequency_minutes: 1,
            window_size_minutes,
        }
    }

    pub fn with_frequency(mut self, frequency_minutes: u32) -> Self {
        self.frequency_minutes = frequency_minutes;
        self
    }

    fn step(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.frequency_minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatePoint {
    #[serde(with = "minute_format")]
    pub date: NaiveDateTime,
    pub average_delivery_time: f64,
}

mod minute_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Zero the seconds and sub-seconds of `timestamp`.
pub fn truncate_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .date()
        .and_hms_opt(timestamp.hour(), timestamp.minute(), 0)
        .unwrap_or(timestamp)
}

/// An event counts at `tick` when it happened at or before the tick and no
/// more than `window_size_minutes` earlier. Both bounds are inclusive.
pub fn in_window(tick: NaiveDateTime, event_time: NaiveDateTime, window_size_minutes: u32) -> bool {
    let delta = tick - event_time;
    delta >= TimeDelta::zero() && delta <= TimeDelta::minutes(i64::from(window_size_minutes))
}

/// Running count and sum of the durations seen in one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowAccumulator {
    pub count: usize,
    pub cumsum: f64,
}

impl WindowAccumulator {
    pub fn add(&mut self, duration: f64) {
        self.count += 1;
        self.cumsum += duration;
    }

    /// Mean duration, or 0 for an empty window.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.cumsum / self.count as f64
        }
    }
}

pub struct TimeWindowAggregator {
    spec: WindowSpec,
}

impl TimeWindowAggregator {
    pub fn new(spec: WindowSpec) -> Result<Self> {
        if spec.frequency_minutes == 0 {
            return Err(AggregationError::InvalidArgument(
                "frequency must be at least one minute".into(),
            ));
        }
        Ok(Self { spec })
    }

    /// Compute one point per tick from the first event's minute up to one
    /// step past the last event's minute.
    ///
    /// `events` must already be sorted by timestamp. Every record has to be a
    /// valid delivery: a single bad record aborts the whole run with
    /// [`AggregationError::IntegrityViolation`] and no points are returned.
    pub fn aggregate(&self, events: &[RawEvent]) -> Result<Vec<AggregatePoint>> {
        let deliveries = events
            .iter()
            .map(DeliveryEvent::try_from)
            .collect::<Result<Vec<_>>>()?;

        let (Some(first), Some(last)) = (deliveries.first(), deliveries.last()) else {
            log::debug!("No events to aggregate");
            return Ok(Vec::new());
        };

        let step = self.spec.step();
        let start = truncate_to_minute(first.timestamp);
        let end = truncate_to_minute(last.timestamp) + step;

        let mut points = Vec::new();
        let mut tick = start;
        while tick <= end {
            points.push(self.point_at(tick, &deliveries));
            tick += step;
        }

        log::debug!(
            "Aggregated {} events into {} ticks ({} to {})",
            deliveries.len(),
            points.len(),
            start,
            end
        );

        Ok(points)
    }

    /// Average over the events inside the window ending at `tick`.
    pub fn point_at(&self, tick: NaiveDateTime, events: &[DeliveryEvent]) -> AggregatePoint {
        let mut acc = WindowAccumulator::default();
        for event in events
            .iter()
            .filter(|e| in_window(tick, e.timestamp, self.spec.window_size_minutes))
        {
            acc.add(event.duration);
        }

        AggregatePoint {
            date: tick,
            average_delivery_time: acc.average(),
        }
    }
}
