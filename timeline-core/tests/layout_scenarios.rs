use std::fs;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use timeline_core::{
    events_from_json_str, FixedContainer, Point, RecordingRenderer, Side, Timeline,
    TimelineConfig, TimelineError, TimelineEvent,
};

type JsonTimeline = Timeline<Value, FixedContainer, RecordingRenderer>;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn load_events(name: &str) -> Vec<TimelineEvent<Value>> {
    let raw = fs::read_to_string(fixture_path(name)).expect("Không đọc được file mẫu");
    events_from_json_str(&raw).expect("File mẫu không hợp lệ")
}

fn timeline(config: TimelineConfig) -> JsonTimeline {
    Timeline::new(
        config,
        FixedContainer::new(1000.0, 200.0).expect("kích thước hợp lệ"),
        RecordingRenderer::default(),
    )
}

fn event(y: i32, m: u32, d: u32, label: &str) -> TimelineEvent<Value> {
    TimelineEvent::new(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(), label)
}

#[test]
fn year_2023_scenario_matches_expected_geometry() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events(load_events("year_2023_events.json"));

    let frame = timeline.frame();
    let props = &frame.properties;
    assert_eq!(props.start_point, Point::new(150.0, 100.0));
    assert_eq!(props.end_point, Point::new(850.0, 100.0));
    assert_eq!(props.min_time(), Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(props.max_time(), Some(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()));

    let descriptions: Vec<&str> = timeline.events().map(|(_, e)| e.description.as_str()).collect();
    assert_eq!(descriptions, ["Khởi động dự án", "Bản beta", "Phát hành 1.0"]);

    // 2023-01-01 -> 2023-06-01 là 151 ngày trên tổng 364 ngày, tức ~0.4148 (x ~440.4),
    // không phải ~0.45 / 465 như ước lượng thô.
    let beta_fraction = 151.0 / 364.0;
    let records = &frame.records;
    assert_eq!(records[0].time_fraction, 0.0);
    assert!((records[1].time_fraction - beta_fraction).abs() < 1e-9);
    assert_eq!(records[2].time_fraction, 1.0);

    let sides: Vec<Side> = records.iter().map(|r| r.side).collect();
    assert_eq!(sides, [Side::Above, Side::Below, Side::Above]);

    assert_eq!(records[0].point.x, 150.0);
    assert!((records[1].point.x - (150.0 + beta_fraction * 700.0)).abs() < 1e-9);
    assert_eq!(records[2].point.x, 850.0);

    assert_eq!(records[0].label.top, 44.0);
    assert_eq!(records[0].label.left, 90.0);
    assert_eq!(records[1].label.top, 124.0);
    assert_eq!(records[1].line.top, 100.0);
    assert_eq!(records[2].line.top, 76.0);
    assert_eq!(records[2].line.height, 24.0);

    assert_eq!(records[0].color, "#0f766e");
    let beta = timeline.event(records[1].id).expect("tra được sự kiện theo id");
    assert_eq!(beta.data["milestone"], "beta");
}

#[test]
fn malformed_date_is_surfaced() {
    let raw = fs::read_to_string(fixture_path("malformed_events.json"))
        .expect("Không đọc được file mẫu");
    let err = events_from_json_str::<Value>(&raw).expect_err("ngày sai định dạng phải báo lỗi");
    assert!(matches!(&err, TimelineError::Parse(message) if message.contains("01/06/2023")));
}

#[test]
fn clearing_then_single_event() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events([event(2023, 1, 1, "a"), event(2023, 2, 1, "b")]);

    timeline.set_events(Vec::new());
    assert!(timeline.frame().is_empty());
    assert_eq!(timeline.frame().properties.range, None);

    timeline.set_events([event(2023, 5, 5, "only")]);
    let records = &timeline.frame().records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].time_fraction, 0.0);
    assert_eq!(records[0].side, Side::Above);
    assert_eq!(records[0].point, Point::new(150.0, 100.0));
}

#[test]
fn identical_dates_do_not_divide_by_zero() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events((0..4).map(|i| event(2023, 3, 3, &format!("e{i}"))));

    for record in &timeline.frame().records {
        assert_eq!(record.time_fraction, 0.0);
        assert!(record.point.x.is_finite());
    }
    // Cùng mốc: giữ thứ tự thêm vào.
    let labels: Vec<&str> = timeline.events().map(|(_, e)| e.description.as_str()).collect();
    assert_eq!(labels, ["e0", "e1", "e2", "e3"]);
}

#[test]
fn batched_add_matches_sequential_adds() {
    let events = [
        event(2023, 4, 1, "b"),
        event(2023, 1, 1, "a"),
        event(2023, 9, 1, "c"),
    ];

    let mut batched = timeline(TimelineConfig::default());
    let before = batched.passes();
    batched.add_events(events.clone());
    assert_eq!(batched.passes(), before + 1);
    assert_eq!(batched.renderer().paints(), batched.passes());

    let mut sequential = timeline(TimelineConfig::default());
    for event in events {
        sequential.add_events([event]);
    }
    sequential.recompute();

    assert_eq!(batched.frame(), sequential.frame());
}

#[test]
fn recompute_is_idempotent() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events(load_events("year_2023_events.json"));

    let first = timeline.recompute().clone();
    let second = timeline.recompute().clone();
    assert_eq!(first, second);
    assert_eq!(timeline.renderer().last_frame(), Some(&second));
}

#[test]
fn alternation_follows_time_order() {
    let mut alternating = timeline(TimelineConfig::default());
    alternating.add_events([
        event(2023, 5, 1, "c"),
        event(2023, 1, 1, "a"),
        event(2023, 3, 1, "b"),
        event(2023, 7, 1, "d"),
    ]);
    let records = &alternating.frame().records;
    for pair in records.windows(2) {
        assert_ne!(pair[0].side, pair[1].side);
    }

    let mut single_side = timeline(TimelineConfig {
        alternate: false,
        ..TimelineConfig::default()
    });
    single_side.add_events([event(2023, 5, 1, "c"), event(2023, 1, 1, "a")]);
    assert!(single_side
        .frame()
        .records
        .iter()
        .all(|record| record.side == Side::Above));
}

#[test]
fn fractions_stay_in_unit_interval() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events([
        event(1969, 7, 20, "moon"),
        event(1989, 11, 9, "wall"),
        event(1955, 1, 1, "early"),
        event(2001, 1, 1, "late"),
    ]);

    let records = &timeline.frame().records;
    assert!(records
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.time_fraction)));
    assert_eq!(records.first().map(|r| r.time_fraction), Some(0.0));
    assert_eq!(records.last().map(|r| r.time_fraction), Some(1.0));
    for pair in records.windows(2) {
        assert!(pair[0].point.x <= pair[1].point.x);
    }
}

#[test]
fn frame_serializes_for_renderers() {
    let mut timeline = timeline(TimelineConfig::default());
    timeline.add_events([event(2023, 1, 1, "a")]);

    let value = serde_json::to_value(timeline.frame()).expect("serialize frame");
    assert_eq!(value["root"]["width"], "100%");
    assert_eq!(value["records"][0]["side"], "above");
    assert_eq!(value["records"][0]["id"], 0);
    assert_eq!(value["properties"]["range"]["min"], "2023-01-01T00:00:00Z");
}
