//! Đặt nhãn và đường nối sao cho nhãn cùng phía không chồng lên nhau.
//!
//! Mỗi phía có nhiều tầng. Nhãn được xét theo thứ tự thời gian và vào tầng thấp
//! nhất còn trống theo chiều ngang; nếu không tầng nào trống thì mở tầng mới xa
//! trục hơn. Nhãn không bao giờ bị dịch ngang khỏi điểm neo. Đường nối của
//! nhãn ở tầng cao chặn các tầng thấp hơn tới hoành độ điểm neo, nên nhãn đặt
//! sau không đè lên đường nối đó.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::event::{ResolvedEvent, Side};
use crate::properties::TimelineProperties;
use crate::LabelMetrics;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LineBox {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelBox {
    pub top: f64,
    pub left: f64,
}

/// Hình học pixel cuối cùng của một sự kiện.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub line: LineBox,
    pub label: LabelBox,
}

/// Mép phải của vật cản cuối cùng (nhãn hoặc đường nối) trong từng tầng.
#[derive(Default)]
struct Tiers {
    right_edges: Vec<f64>,
}

impl Tiers {
    /// `anchor` là hoành độ đường nối; đường nối đi xuyên qua mọi tầng thấp hơn.
    fn claim(&mut self, anchor: f64, left: f64, right: f64, gap: f64) -> usize {
        let free = self
            .right_edges
            .iter()
            .position(|&edge| edge + gap <= left);
        let tier = match free {
            Some(tier) => {
                self.right_edges[tier] = right;
                tier
            }
            None => {
                self.right_edges.push(right);
                self.right_edges.len() - 1
            }
        };
        for edge in &mut self.right_edges[..tier] {
            *edge = edge.max(anchor);
        }
        tier
    }
}

/// Tính hình học cho các sự kiện đã sắp xếp; kết quả cùng thứ tự với đầu vào.
pub fn place(
    events: &[ResolvedEvent],
    properties: &TimelineProperties,
    metrics: &LabelMetrics,
) -> Vec<Placement> {
    let mut above = Tiers::default();
    let mut below = Tiers::default();
    let half_width = metrics.label_width / 2.0;
    let axis = properties.line_height;

    events
        .iter()
        .map(|event| {
            let left = event.point.x - half_width;
            let right = event.point.x + half_width;
            let tiers = match event.side {
                Side::Above => &mut above,
                Side::Below => &mut below,
            };
            let tier = tiers.claim(event.point.x, left, right, metrics.tier_gap);
            if tier > 0 {
                trace!(id = %event.id, tier, side = ?event.side, "nhãn bị đẩy lên tầng cao hơn");
            }

            let offset =
                metrics.connector_length + tier as f64 * (metrics.label_height + metrics.tier_gap);
            let (line_top, label_top) = match event.side {
                Side::Above => (axis - offset, axis - offset - metrics.label_height),
                Side::Below => (axis, axis + offset),
            };

            Placement {
                line: LineBox {
                    top: line_top,
                    height: offset,
                },
                label: LabelBox {
                    top: label_top,
                    left,
                },
            }
        })
        .collect()
}
