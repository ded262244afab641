//! Controller sở hữu danh sách sự kiện và chạy lượt tính lại toàn bộ.
//!
//! Lượt tính: đo container, sắp xếp, rút gọn khoảng thời gian, tính hình học
//! timeline, dẫn xuất trạng thái từng sự kiện, đặt nhãn, rồi giao `Frame` cho
//! renderer. Việc debounce sự kiện resize thuộc về host; host chỉ cần gọi
//! [`Timeline::recompute`] khi kích thước đã ổn định.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::{resolve_events, EventId, ResolvedEvent, Side, TimelineEvent, TrackedEvent};
use crate::geometry::{ContainerSize, Point};
use crate::ordering::{min_max_times, sort_events};
use crate::placement::{place, LabelBox, LineBox, Placement};
use crate::properties::TimelineProperties;
use crate::{TimelineConfig, TimelineError};

/// Nơi gắn timeline; chỉ cần đo được kích thước.
pub trait Container {
    fn measure(&self) -> ContainerSize;
}

/// Nhận hình học đã tính để vẽ ra bề mặt thật (DOM, canvas, terminal...).
pub trait Renderer {
    fn paint(&mut self, frame: &Frame);
}

impl Renderer for () {
    fn paint(&mut self, _: &Frame) {}
}

/// Container có kích thước do host cập nhật thủ công.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContainer {
    size: ContainerSize,
}

impl FixedContainer {
    pub fn new(width: f64, height: f64) -> Result<Self, TimelineError> {
        Ok(Self {
            size: ContainerSize::new(width, height)?,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), TimelineError> {
        self.size = ContainerSize::new(width, height)?;
        Ok(())
    }
}

impl Default for FixedContainer {
    fn default() -> Self {
        Self {
            size: ContainerSize {
                width: 800.0,
                height: 200.0,
            },
        }
    }
}

impl Container for FixedContainer {
    fn measure(&self) -> ContainerSize {
        self.size
    }
}

/// Renderer lưu lại frame gần nhất, dùng cho bridge và kiểm thử.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    last: Option<Frame>,
    paints: usize,
}

impl RecordingRenderer {
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    pub fn paints(&self) -> usize {
        self.paints
    }
}

impl Renderer for RecordingRenderer {
    fn paint(&mut self, frame: &Frame) {
        self.last = Some(frame.clone());
        self.paints += 1;
    }
}

/// Kích thước CSS của phần tử gốc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootStyle {
    pub width: String,
    pub height: String,
}

/// Bản ghi hiển thị của một sự kiện, tạo mới ở mỗi lượt tính.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderRecord {
    pub id: EventId,
    pub index: usize,
    pub time_fraction: f64,
    pub side: Side,
    pub point: Point,
    pub color: String,
    pub line: LineBox,
    pub label: LabelBox,
}

impl RenderRecord {
    fn new(resolved: ResolvedEvent, placement: Placement, color: &str) -> Self {
        Self {
            id: resolved.id,
            index: resolved.index,
            time_fraction: resolved.time_fraction,
            side: resolved.side,
            point: resolved.point,
            color: color.to_string(),
            line: placement.line,
            label: placement.label,
        }
    }
}

/// Kết quả của một lượt tính lại.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub properties: TimelineProperties,
    pub root: RootStyle,
    pub records: Vec<RenderRecord>,
}

impl Frame {
    pub fn record(&self, id: EventId) -> Option<&RenderRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Timeline ngang: sở hữu sự kiện, container và renderer.
pub struct Timeline<T = (), C = FixedContainer, R = ()> {
    config: TimelineConfig,
    container: C,
    renderer: R,
    events: Vec<TrackedEvent<T>>,
    next_id: u64,
    frame: Frame,
    passes: usize,
}

impl<T, C: Container, R: Renderer> Timeline<T, C, R> {
    /// Tạo timeline rỗng và chạy lượt tính đầu tiên.
    pub fn new(config: TimelineConfig, container: C, renderer: R) -> Self {
        Self::with_events(config, container, renderer, Vec::new())
    }

    pub fn with_events(
        config: TimelineConfig,
        container: C,
        renderer: R,
        events: impl IntoIterator<Item = TimelineEvent<T>>,
    ) -> Self {
        let frame = empty_frame(&config, container.measure());
        let mut timeline = Self {
            config,
            container,
            renderer,
            events: Vec::new(),
            next_id: 0,
            frame,
            passes: 0,
        };
        timeline.set_events(events);
        timeline
    }

    /// Thêm sự kiện rồi tính lại đúng một lần, bất kể thêm bao nhiêu.
    pub fn add_events(
        &mut self,
        events: impl IntoIterator<Item = TimelineEvent<T>>,
    ) -> Vec<EventId> {
        let ids = self.track(events);
        self.recompute();
        ids
    }

    /// Thay toàn bộ danh sách sự kiện trong một lượt tính.
    pub fn set_events(
        &mut self,
        events: impl IntoIterator<Item = TimelineEvent<T>>,
    ) -> Vec<EventId> {
        self.events.clear();
        self.frame.records.clear();
        let ids = self.track(events);
        self.recompute();
        ids
    }

    fn track(&mut self, events: impl IntoIterator<Item = TimelineEvent<T>>) -> Vec<EventId> {
        let mut ids = Vec::new();
        for event in events {
            let id = EventId(self.next_id);
            self.next_id += 1;
            self.events.push(TrackedEvent { id, event });
            ids.push(id);
        }
        ids
    }

    /// Lượt tính lại đầy đủ. Host gọi hàm này sau khi container đổi kích thước.
    pub fn recompute(&mut self) -> &Frame {
        let size = self.container.measure();
        if size.is_empty() && !self.events.is_empty() {
            warn!(
                width = size.width,
                height = size.height,
                "container có kích thước 0, hình học sẽ suy biến"
            );
        }

        sort_events(&mut self.events);
        let range = min_max_times(&self.events);
        let properties = TimelineProperties::compute(size, range);
        let resolved = resolve_events(&self.events, &properties, self.config.alternate);
        let placements = place(&resolved, &properties, &self.config.labels);

        let records = resolved
            .into_iter()
            .zip(placements)
            .zip(&self.events)
            .map(|((resolved, placement), tracked)| {
                RenderRecord::new(resolved, placement, &tracked.event.color)
            })
            .collect();

        self.frame = Frame {
            properties,
            root: root_style(&self.config),
            records,
        };
        self.passes += 1;
        debug!(
            pass = self.passes,
            events = self.events.len(),
            width = size.width,
            height = size.height,
            "đã tính lại timeline"
        );

        self.renderer.paint(&self.frame);
        &self.frame
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Sự kiện theo thứ tự thời gian của lượt tính gần nhất.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &TimelineEvent<T>)> {
        self.events.iter().map(|tracked| (tracked.id, &tracked.event))
    }

    /// Tra ngược từ định danh về sự kiện logic (ví dụ khi xử lý click).
    pub fn event(&self, id: EventId) -> Option<&TimelineEvent<T>> {
        self.events
            .iter()
            .find(|tracked| tracked.id == id)
            .map(|tracked| &tracked.event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Số lượt tính đã chạy.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

fn root_style(config: &TimelineConfig) -> RootStyle {
    RootStyle {
        width: config.width.clone(),
        height: config.height.clone(),
    }
}

fn empty_frame(config: &TimelineConfig, size: ContainerSize) -> Frame {
    Frame {
        properties: TimelineProperties::compute(size, None),
        root: root_style(config),
        records: Vec::new(),
    }
}
