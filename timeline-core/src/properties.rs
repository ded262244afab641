use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{ContainerSize, Point};

/// Tỉ lệ thụt lề hai đầu trục so với chiều rộng.
const TRACK_START_RATIO: f64 = 0.15;
const TRACK_END_RATIO: f64 = 0.85;
const LINE_HEIGHT_RATIO: f64 = 0.5;

/// Khoảng thời gian bao trùm mọi sự kiện. Luôn có `min <= max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeRange {
    /// Khoảng chỉ gồm một thời điểm.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            min: instant,
            max: instant,
        }
    }

    /// Mở rộng khoảng để chứa `instant`.
    pub fn include(&mut self, instant: DateTime<Utc>) {
        if instant < self.min {
            self.min = instant;
        }
        if instant > self.max {
            self.max = instant;
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Vị trí chuẩn hóa của `date` trong `[0, 1]`; bằng 0 khi khoảng suy biến.
    pub fn fraction(&self, date: DateTime<Utc>) -> f64 {
        let span = (self.max - self.min).num_milliseconds();
        if span == 0 {
            return 0.0;
        }
        let offset = (date - self.min).num_milliseconds();
        (offset as f64 / span as f64).clamp(0.0, 1.0)
    }
}

/// Hình học pixel của timeline, tính lại toàn bộ ở mỗi lượt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineProperties {
    /// `None` khi timeline chưa có sự kiện.
    pub range: Option<TimeRange>,
    pub width: f64,
    pub height: f64,
    /// Tọa độ dọc của trục ngang.
    pub line_height: f64,
    pub start_point: Point,
    pub end_point: Point,
}

impl TimelineProperties {
    pub fn compute(size: ContainerSize, range: Option<TimeRange>) -> Self {
        let line_height = size.height * LINE_HEIGHT_RATIO;
        Self {
            range,
            width: size.width,
            height: size.height,
            line_height,
            start_point: Point::new(size.width * TRACK_START_RATIO, line_height),
            end_point: Point::new(size.width * TRACK_END_RATIO, line_height),
        }
    }

    pub fn min_time(&self) -> Option<DateTime<Utc>> {
        self.range.map(|range| range.min)
    }

    pub fn max_time(&self) -> Option<DateTime<Utc>> {
        self.range.map(|range| range.max)
    }

    /// Điểm neo trên trục ứng với vị trí chuẩn hóa `fraction`.
    pub fn anchor_at(&self, fraction: f64) -> Point {
        let x = self.start_point.lerp(self.end_point, fraction).x;
        Point::new(x, self.start_point.y)
    }

    /// Vị trí chuẩn hóa của `date`; bằng 0 khi chưa có khoảng thời gian.
    pub fn time_fraction(&self, date: DateTime<Utc>) -> f64 {
        self.range.map_or(0.0, |range| range.fraction(date))
    }
}
