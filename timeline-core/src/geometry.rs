use serde::{Deserialize, Serialize};

use crate::TimelineError;

/// Tọa độ pixel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nội suy tuyến tính giữa `self` và `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

/// Kích thước đo được của container, đơn vị pixel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    /// Kích thước bằng 0 được chấp nhận; giá trị âm hoặc không hữu hạn thì bị từ chối.
    pub fn new(width: f64, height: f64) -> Result<Self, TimelineError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(height) {
            return Err(TimelineError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}
