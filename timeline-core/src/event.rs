use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::properties::TimelineProperties;
use crate::TimelineError;

/// Màu mặc định khi sự kiện không chỉ định màu.
pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";

/// Định danh ổn định của một sự kiện, do controller cấp khi thêm sự kiện.
///
/// Renderer chỉ dùng giá trị này làm khóa tra cứu; engine không diễn giải nó.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event-{}", self.0)
    }
}

/// Một sự kiện logic trên timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent<T = ()> {
    #[serde(with = "event_date")]
    pub date: DateTime<Utc>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub description: String,
    /// Dữ liệu riêng của caller, engine không động tới.
    #[serde(default)]
    pub data: T,
}

impl<T: Default> TimelineEvent<T> {
    pub fn new(date: DateTime<Utc>, description: impl Into<String>) -> Self {
        Self {
            date,
            color: default_color(),
            description: description.into(),
            data: T::default(),
        }
    }
}

impl<T> TimelineEvent<T> {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_data<U>(self, data: U) -> TimelineEvent<U> {
        TimelineEvent {
            date: self.date,
            color: self.color,
            description: self.description,
            data,
        }
    }
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Sự kiện đã được controller gắn định danh.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent<T> {
    pub id: EventId,
    pub event: TimelineEvent<T>,
}

/// Thứ gì có mốc thời gian để sắp xếp và rút gọn khoảng.
pub trait Dated {
    fn date(&self) -> DateTime<Utc>;
}

impl<T> Dated for TimelineEvent<T> {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

impl<T> Dated for TrackedEvent<T> {
    fn date(&self) -> DateTime<Utc> {
        self.event.date
    }
}

/// Phía đặt nhãn so với trục.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Above,
    Below,
}

impl Side {
    /// Hạng chẵn nằm trên, hạng lẻ nằm dưới; không xen kẽ thì luôn nằm trên.
    pub fn for_rank(index: usize, alternate: bool) -> Self {
        if alternate && index % 2 == 1 {
            Side::Below
        } else {
            Side::Above
        }
    }
}

/// Trạng thái dẫn xuất của một sự kiện trong một lượt tính.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResolvedEvent {
    pub id: EventId,
    /// Thứ hạng sau khi sắp xếp.
    pub index: usize,
    pub time_fraction: f64,
    pub side: Side,
    /// Điểm neo trên trục.
    pub point: Point,
}

/// Tính vị trí và phía cho các sự kiện đã sắp xếp tăng dần.
pub fn resolve_events<T>(
    events: &[TrackedEvent<T>],
    properties: &TimelineProperties,
    alternate: bool,
) -> Vec<ResolvedEvent> {
    events
        .iter()
        .enumerate()
        .map(|(index, tracked)| {
            let time_fraction = properties.time_fraction(tracked.event.date);
            ResolvedEvent {
                id: tracked.id,
                index,
                time_fraction,
                side: Side::for_rank(index, alternate),
                point: properties.anchor_at(time_fraction),
            }
        })
        .collect()
}

/// Đọc danh sách sự kiện từ chuỗi JSON (mảng các object sự kiện).
pub fn events_from_json_str<T>(json: &str) -> Result<Vec<TimelineEvent<T>>, TimelineError>
where
    T: DeserializeOwned + Default,
{
    serde_json::from_str(json).map_err(|err| TimelineError::Parse(err.to_string()))
}

/// Đọc ngày theo RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) hoặc `YYYY-MM-DD` (nửa đêm UTC).
pub fn parse_event_date(value: &str) -> Result<DateTime<Utc>, TimelineError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimelineError::InvalidDate(value.to_string()))
}

mod event_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDate::deserialize(deserializer)? {
            RawDate::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| de::Error::custom(format!("timestamp ngoài phạm vi: {ms}"))),
            RawDate::Text(text) => super::parse_event_date(&text).map_err(de::Error::custom),
        }
    }
}

impl<T> fmt::Display for TimelineEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.description
        )
    }
}
