use std::collections::BTreeMap;

use assessment_report::fonts::FontSet;
use assessment_report::layout::layout;
use assessment_report::render::render_pdf;
use assessment_report::{
    AssessmentKind, Priority, Recommendation, ReportBuilder, ReportExporter, ReportModel,
};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};

fn sample_model() -> ReportModel {
    let kind = AssessmentKind::Shopfloor;
    let answers: BTreeMap<u32, u8> = kind
        .questions()
        .iter()
        .map(|question| (question.id, (question.id % 5) as u8 + 1))
        .collect();
    ReportModel::from_answers(
        kind,
        &answers,
        "2024-01-15",
        vec![
            Recommendation::new("Digitise work instructions", "Replace paper binders with tablets.")
                .with_priority(Priority::High)
                .with_timeline("1-3 months")
                .with_impact("Fewer setup errors"),
            Recommendation::new("Track downtime", "Log every stop with a reason code.")
                .with_priority(Priority::Low),
        ],
    )
}

fn exporter() -> ReportExporter {
    ReportBuilder::new()
        .with_builtin_fonts()
        .build()
        .expect("builtin fonts always build")
}

fn render_sample_pdf() -> Vec<u8> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    exporter()
        .render_on(&sample_model(), date)
        .expect("render sample pdf")
        .into_bytes()
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let bytes = render_sample_pdf();
    assert!(bytes.starts_with(b"%PDF"), "rendered PDF should start with a header");
    assert!(bytes.len() > 1000);
}

#[test]
fn rendering_is_deterministic() {
    let bytes_a = render_sample_pdf();
    let bytes_b = render_sample_pdf();

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn rendered_report_is_named_after_the_generation_date() {
    let date = NaiveDate::from_ymd_opt(2025, 11, 2).expect("valid date");
    let report = ReportBuilder::new()
        .with_builtin_fonts()
        .with_file_prefix("acme")
        .build()
        .expect("exporter")
        .render_on(&sample_model(), date)
        .expect("render");

    assert_eq!(report.file_name(), "acme-assessment-shopfloor-2025-11-02.pdf");
    assert_eq!(report.page_count(), layout(&sample_model()).page_count());
}

#[test]
fn missing_fonts_fall_back_to_builtin_faces() {
    let fonts = FontSet::locate_or_builtin(Some(std::path::Path::new("/definitely/not/here")));
    if !fonts.is_builtin() {
        eprintln!("Skipping missing_fonts_fall_back_to_builtin_faces: TrueType fonts installed.");
        return;
    }
    let bytes = render_pdf(&layout(&sample_model()), &fonts, "Fallback").expect("render");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn reports_are_written_atomically() {
    let directory = std::env::temp_dir().join(format!("assessment-report-{}", std::process::id()));
    std::fs::create_dir_all(&directory).expect("temp dir");

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    let report = exporter().render_on(&sample_model(), date).expect("render");
    let path = report.write_to_dir(&directory).expect("write");

    assert_eq!(std::fs::read(&path).expect("read back"), report.bytes());
    assert!(!directory.join(format!("{}.part", report.file_name())).exists());
    std::fs::remove_dir_all(&directory).ok();
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_add_an_outline() {
    let report = exporter().render_with_bookmarks(&sample_model()).expect("render");
    let bytes = report.bytes();
    let has = |needle: &[u8]| bytes.windows(needle.len()).any(|window| window == needle);
    assert!(has(b"/Outlines"));
    assert!(has(b"Assessment Questions & Answers"));
}
