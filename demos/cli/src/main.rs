use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use timeline_core::{
    events_from_json_str, FixedContainer, Frame, Timeline, TimelineConfig, TimelineEvent,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "timeline-cli",
    about = "Tính hình học timeline ngang từ file JSON sự kiện."
)]
struct Args {
    /// Đường dẫn tới file JSON chứa mảng sự kiện.
    #[arg(short, long)]
    input: PathBuf,

    /// Chiều rộng container (px).
    #[arg(long, default_value_t = 1000.0)]
    width: f64,

    /// Chiều cao container (px).
    #[arg(long, default_value_t = 200.0)]
    height: f64,

    /// Đặt mọi nhãn phía trên trục.
    #[arg(long)]
    no_alternate: bool,

    /// In toàn bộ frame dạng JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let events: Vec<TimelineEvent<Value>> = events_from_json_str(&data)
        .with_context(|| format!("File {:?} không phải danh sách sự kiện hợp lệ", args.input))?;

    let config = TimelineConfig {
        alternate: !args.no_alternate,
        ..TimelineConfig::default()
    };
    let container = FixedContainer::new(args.width, args.height)?;
    let timeline: Timeline<Value> = Timeline::with_events(config, container, (), events);
    info!(events = timeline.len(), "đã dàn trang");

    if args.json {
        println!("{}", serde_json::to_string_pretty(timeline.frame())?);
    } else {
        print_table(&timeline, timeline.frame());
    }

    Ok(())
}

fn print_table(timeline: &Timeline<Value>, frame: &Frame) {
    println!(
        "Container: {}x{} | trục y={} | {} sự kiện",
        frame.properties.width,
        frame.properties.height,
        frame.properties.line_height,
        frame.records.len()
    );
    for record in &frame.records {
        let description = timeline
            .event(record.id)
            .map(|event| event.to_string())
            .unwrap_or_default();
        println!(
            "{:>3} {:<6} t={:.3} x={:>7.1} label(top={:.1}, left={:.1}) line(top={:.1}, h={:.1})  {}",
            record.index,
            format!("{:?}", record.side),
            record.time_fraction,
            record.point.x,
            record.label.top,
            record.label.left,
            record.line.top,
            record.line.height,
            description
        );
    }
}
