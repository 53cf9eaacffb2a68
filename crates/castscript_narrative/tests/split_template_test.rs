//! Section splitting, part-count parsing and template rendering.

use castscript_error::PipelineErrorKind;
use castscript_narrative::{
    TemplateContext, parse_part_count, placeholders, render_template, split_sections,
};

#[test]
fn test_split_gives_floor_and_ceil_halves() {
    for n in 1..=12 {
        let chunks: Vec<String> = (0..n).map(|i| format!("chunk {}", i)).collect();
        let text = chunks.join("\n\n");

        let split = split_sections(&text);

        assert_eq!(split.chunks, n);
        assert_eq!(split.first, chunks[..n / 2].join("\n\n"));
        assert_eq!(split.last, chunks[n / 2..].join("\n\n"));
    }
}

#[test]
fn test_split_counts_blank_line_boundaries_only() {
    let split = split_sections("line one\nline two\n\nline three");
    assert_eq!(split.chunks, 2);
    assert_eq!(split.first, "line one\nline two");
    assert_eq!(split.last, "line three");
}

#[test]
fn test_single_chunk_is_incomplete() {
    let split = split_sections("no blank lines here");
    assert_eq!(split.first, "");
    assert_eq!(split.last, "no blank lines here");
    assert!(!split.is_complete());
}

#[test]
fn test_part_count_parsing() {
    assert_eq!(parse_part_count("5", 40).unwrap(), 5);
    assert_eq!(parse_part_count("  17  ", 40).unwrap(), 17);
    assert_eq!(parse_part_count("+3", 40).unwrap(), 3);
    assert_eq!(parse_part_count("12.", 40).unwrap(), 12);
    assert_eq!(parse_part_count("40", 40).unwrap(), 40);
}

#[test]
fn test_unusable_part_counts() {
    for reply in ["", "five", "Total: 5", "-3", "0", "00"] {
        let err = parse_part_count(reply, 40).unwrap_err();
        assert!(
            matches!(err.kind, PipelineErrorKind::UnusablePartCount(_)),
            "{:?} should be unusable",
            reply
        );
    }
}

#[test]
fn test_excessive_part_counts() {
    let err = parse_part_count("41", 40).unwrap_err();
    assert_eq!(err.kind, PipelineErrorKind::TooManyParts { count: 41, max: 40 });

    let err = parse_part_count("99999999999999999999", 40).unwrap_err();
    assert!(matches!(err.kind, PipelineErrorKind::TooManyParts { .. }));
}

#[test]
fn test_render_leaves_values_untouched() {
    let mut ctx = TemplateContext::new();
    ctx.insert("transcript", "raw {{braces}} in text");

    let rendered = render_template("{{transcript}}!", &ctx).unwrap();
    assert_eq!(rendered, "raw {{braces}} in text!");
}

#[test]
fn test_render_unknown_placeholder() {
    let err = render_template("Hello {{name}}", &TemplateContext::new()).unwrap_err();
    match err.kind {
        PipelineErrorKind::TemplateError(msg) => assert!(msg.contains("{{name}}")),
        other => panic!("Expected TemplateError, got {:?}", other),
    }
}

#[test]
fn test_placeholders_deduplicated_in_order() {
    let names = placeholders("{{b}} {{a}} {{ b }}").unwrap();
    assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
}
