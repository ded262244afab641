//! Bridge WASM <-> JavaScript trung lập framework.
//!
//! Phía JS giữ DOM: đo container, debounce resize, rồi gọi `resize`/`frame`
//! và ghi `top`/`left`/`height` từ frame vào các phần tử theo `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use timeline_core::{
    EventId, FixedContainer, LabelMetrics, RecordingRenderer, Timeline, TimelineConfig,
    TimelineError, TimelineEvent,
};
use wasm_bindgen::prelude::*;

type BridgeTimeline = Timeline<Value, FixedContainer, RecordingRenderer>;

/// Cấu hình từ JS; trường nào thiếu thì lấy mặc định. Các tuỳ chọn thuộc về
/// host như `formatter` hay `mouseEvents` bị bỏ qua.
#[derive(Deserialize, Default)]
struct JsTimelineConfig {
    #[serde(default)]
    alternate: Option<bool>,
    #[serde(default)]
    width: Option<String>,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    label_width: Option<f64>,
    #[serde(default)]
    label_height: Option<f64>,
    #[serde(default)]
    connector_length: Option<f64>,
    #[serde(default)]
    tier_gap: Option<f64>,
}

impl From<JsTimelineConfig> for TimelineConfig {
    fn from(cfg: JsTimelineConfig) -> Self {
        let mut base = TimelineConfig::default();
        if let Some(alternate) = cfg.alternate {
            base.alternate = alternate;
        }
        if let Some(width) = cfg.width.clone() {
            base.width = width;
        }
        if let Some(height) = cfg.height.clone() {
            base.height = height;
        }
        base.labels = merge_labels(base.labels, &cfg);
        base
    }
}

fn merge_labels(mut labels: LabelMetrics, cfg: &JsTimelineConfig) -> LabelMetrics {
    if let Some(value) = cfg.label_width {
        labels.label_width = value;
    }
    if let Some(value) = cfg.label_height {
        labels.label_height = value;
    }
    if let Some(value) = cfg.connector_length {
        labels.connector_length = value;
    }
    if let Some(value) = cfg.tier_gap {
        labels.tier_gap = value;
    }
    labels
}

/// Handle giữ timeline sống giữa các lần gọi từ JS.
#[wasm_bindgen]
pub struct TimelineHandle {
    inner: BridgeTimeline,
}

#[wasm_bindgen]
impl TimelineHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        config: Option<JsValue>,
    ) -> Result<TimelineHandle, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = parse_config(config)?;
        let container = FixedContainer::new(width, height).map_err(format_timeline_error)?;
        Ok(Self {
            inner: Timeline::new(config, container, RecordingRenderer::default()),
        })
    }

    /// Thêm sự kiện, trả về frame mới.
    #[wasm_bindgen(js_name = addEvents)]
    pub fn add_events(&mut self, events: JsValue) -> Result<JsValue, JsValue> {
        let events = parse_events(events)?;
        self.inner.add_events(events);
        to_js(self.inner.frame())
    }

    /// Thay toàn bộ sự kiện, trả về frame mới.
    #[wasm_bindgen(js_name = setEvents)]
    pub fn set_events(&mut self, events: JsValue) -> Result<JsValue, JsValue> {
        let events = parse_events(events)?;
        self.inner.set_events(events);
        to_js(self.inner.frame())
    }

    /// Gọi sau khi host đã debounce sự kiện resize.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        self.inner
            .container_mut()
            .resize(width, height)
            .map_err(format_timeline_error)?;
        to_js(self.inner.recompute())
    }

    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.frame())
    }

    /// Tra sự kiện logic từ `id` trong frame; `undefined` nếu không còn.
    pub fn event(&self, id: f64) -> Result<JsValue, JsValue> {
        let id = event_id_from_js(id).map_err(format_timeline_error)?;
        match self.inner.event(id) {
            Some(event) => to_js(event),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

/// Dàn trang một lần, không giữ trạng thái.
#[wasm_bindgen]
pub fn layout_events(
    events: JsValue,
    width: f64,
    height: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let config = parse_config(config)?;
    let events = parse_events(events)?;
    let container = FixedContainer::new(width, height).map_err(format_timeline_error)?;
    let timeline: BridgeTimeline =
        Timeline::with_events(config, container, RecordingRenderer::default(), events);
    to_js(timeline.frame())
}

fn parse_config(config: Option<JsValue>) -> Result<TimelineConfig, JsValue> {
    let Some(js_cfg) = config.filter(|value| !value.is_undefined() && !value.is_null()) else {
        return Ok(TimelineConfig::default());
    };
    let cfg: JsTimelineConfig = from_value(js_cfg)
        .map_err(|err| TimelineError::Parse(format!("config: {err}")))
        .map_err(format_timeline_error)?;
    Ok(TimelineConfig::from(cfg))
}

fn parse_events(events: JsValue) -> Result<Vec<TimelineEvent<Value>>, JsValue> {
    from_value(events)
        .map_err(|err| TimelineError::Parse(format!("danh sách sự kiện: {err}")))
        .map_err(format_timeline_error)
}

/// Số JS chỉ biểu diễn chính xác số nguyên tới 2^53 - 1.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Chuyển `id` dạng số JS về `EventId`; từ chối số âm, số lẻ hoặc vượt phạm vi an toàn.
fn event_id_from_js(id: f64) -> Result<EventId, TimelineError> {
    if !id.is_finite() || id < 0.0 || id.fract() != 0.0 || id > MAX_SAFE_INTEGER {
        return Err(TimelineError::Parse(format!("id sự kiện không hợp lệ: {id}")));
    }
    Ok(EventId(id as u64))
}

/// Object thuần thay vì `Map` để JS đọc trực tiếp `frame.records[i].label.top`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize được kết quả: {err}")))
}

fn format_timeline_error(err: TimelineError) -> JsValue {
    JsValue::from_str(&format!("Timeline error: {err}"))
}
