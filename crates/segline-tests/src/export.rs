//! Integration tests for EDL and CSV exports built from an edited timeline.

use segline_core::{EngineConfig, FrameRate, Segment, SegmentStatus, Timecode};
use segline_media::{build_csv, build_edl, ExportMeta, CSV_HEADER};
use segline_timeline::TrimRange;

use crate::fixtures::{document, three_clip_segments};

struct RecordTimes {
    clip_name: String,
    record_in: f64,
    record_out: f64,
}

/// Pull record-in/out back out of the event lines.
fn parse_events(edl: &str, rate: FrameRate) -> Vec<RecordTimes> {
    edl.lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields.len(), 8, "malformed event line {line:?}");
            assert_eq!(&fields[2..4], &["V", "C"]);
            let tc = |s: &str| s.parse::<Timecode>().unwrap().to_seconds(rate);
            RecordTimes {
                clip_name: fields[1].to_string(),
                record_in: tc(fields[6]),
                record_out: tc(fields[7]),
            }
        })
        .collect()
}

#[test]
fn edl_record_times_round_trip_within_a_frame() {
    let mut doc = document(three_clip_segments());
    doc.segments.push(Segment::done(3, 0, 2.7, "https://cdn.example/s3-0.mp4"));
    doc.order.push(doc.segments[3].id);
    let mut model = doc.model();
    let ids = model.order().to_vec();
    model.set_trim(ids[0], TrimRange::new(0.37, 0.21));
    model.set_trim(ids[2], TrimRange::new(1.13, 0.0));
    model.reorder(ids[3], 1);

    let config = EngineConfig::default();
    let meta = ExportMeta::from_document(&doc, &config);
    let edl = build_edl(&meta, model.clips());
    let events = parse_events(&edl, meta.frame_rate);

    let frame = 1.0 / 30.0;
    assert_eq!(events.len(), model.clips().len());
    for (event, clip) in events.iter().zip(model.clips()) {
        assert!((event.record_in - clip.cumulative_start).abs() < frame);
        assert!((event.record_out - clip.end()).abs() < frame);
    }
    let sum: f64 = events.iter().map(|e| e.record_out - e.record_in).sum();
    assert!((sum - model.total_duration()).abs() < frame * events.len() as f64);
    assert!((events[3].record_out - model.total_duration()).abs() < frame);
    assert_eq!(events[1].clip_name, "NM-S02-SC003-SEG001.mp4");
}

#[test]
fn edl_lists_only_finished_clips() {
    let mut segments = three_clip_segments();
    segments.push(Segment::new(3, 0, 4.0));
    let doc = document(segments);
    let model = doc.model();

    let edl = build_edl(&ExportMeta::from_document(&doc, &EngineConfig::default()), model.clips());
    assert!(edl.starts_with("TITLE: Night Market - Episode 2\nFCM: NON-DROP FRAME\n\n"));
    assert_eq!(edl.matches("* FROM CLIP NAME:").count(), 3);
    assert!(edl.contains("003  NM-S02-SC002-SEG001.mp4  V  C  00:00:00:00 00:00:04:00 00:00:08:00 00:00:12:00"));
}

#[test]
fn empty_timeline_exports_header_only() {
    let doc = document(Vec::new());
    let meta = ExportMeta::from_document(&doc, &EngineConfig::default());

    let edl = build_edl(&meta, doc.model().clips());
    assert_eq!(edl, "TITLE: Night Market - Episode 2\nFCM: NON-DROP FRAME\n\n");

    let csv = build_csv(&meta, &doc.segments, &doc.order, &doc.trim);
    assert_eq!(csv, format!("{CSV_HEADER}\n"));
}

#[test]
fn csv_lists_timeline_rows_first_then_the_rest() {
    let mut segments = three_clip_segments();
    let mut pending = Segment::new(1, 2, 6.0);
    pending.prompt = "Wide shot, \"neon\" stalls\nat dusk".into();
    segments.insert(0, pending);
    let mut doc = document(segments);
    let mut model = doc.model();
    let ids = model.order().to_vec();
    model.reorder(ids[2], 0);
    model.set_trim(ids[0], TrimRange::new(1.0, 0.5));
    doc.update_from(&model);

    let meta = ExportMeta::from_document(&doc, &EngineConfig::default());
    let csv = build_csv(&meta, &doc.segments, &doc.order, &doc.trim);
    let rows: Vec<&str> = csv.lines().collect();

    assert_eq!(rows[0], CSV_HEADER);
    assert_eq!(rows.len(), 5);
    assert!(rows[1].starts_with("NM-S02-SC002-SEG001.mp4,2,1,4.00,0.00,0.00,4.00,"));
    assert!(rows[2].starts_with("NM-S02-SC001-SEG001.mp4,1,1,5.00,1.00,0.50,3.50,"));
    assert!(rows[4].starts_with("NM-S02-SC001-SEG003.mp4,1,3,6.00,"));
    assert!(rows[4].contains(SegmentStatus::Pending.as_str()));
    assert!(rows[4].ends_with(",\"Wide shot, 'neon' stalls at dusk\""));
}
