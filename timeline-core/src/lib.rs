//! Logic lõi dàn trang timeline ngang: vị trí, làn trên/dưới và hình học pixel.

mod controller;
mod event;
mod geometry;
mod ordering;
mod placement;
mod properties;

pub use controller::{
    Container, FixedContainer, Frame, RecordingRenderer, RenderRecord, Renderer, RootStyle,
    Timeline,
};
pub use event::{
    events_from_json_str, parse_event_date, resolve_events, Dated, EventId, ResolvedEvent, Side,
    TimelineEvent, TrackedEvent, DEFAULT_EVENT_COLOR,
};
pub use geometry::{ContainerSize, Point};
pub use ordering::{min_max_times, sort_events};
pub use placement::{place, LabelBox, LineBox, Placement};
pub use properties::{TimeRange, TimelineProperties};

use serde::{Deserialize, Serialize};

/// Cấu hình timeline do phía host truyền vào.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Xen kẽ sự kiện trên/dưới trục theo thứ hạng thời gian.
    pub alternate: bool,
    /// Chiều rộng CSS của phần tử gốc.
    pub width: String,
    /// Chiều cao CSS của phần tử gốc.
    pub height: String,
    pub labels: LabelMetrics,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            alternate: true,
            width: "100%".to_string(),
            height: "100%".to_string(),
            labels: LabelMetrics::default(),
        }
    }
}

/// Kích thước nhãn giả định dùng cho tính toán va chạm.
///
/// Kích thước thật của nhãn chỉ biết được sau khi DOM render, nên engine dùng
/// một hộp cố định cho mọi nhãn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelMetrics {
    pub label_width: f64,
    pub label_height: f64,
    /// Độ dài tối thiểu của đường nối từ trục tới nhãn.
    pub connector_length: f64,
    /// Khoảng cách giữa hai tầng nhãn cùng phía.
    pub tier_gap: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            label_width: 120.0,
            label_height: 32.0,
            connector_length: 24.0,
            tier_gap: 8.0,
        }
    }
}

/// Lỗi chung của timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Ngày không hợp lệ: {0}")]
    InvalidDate(String),
    #[error("Kích thước container không hợp lệ: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
