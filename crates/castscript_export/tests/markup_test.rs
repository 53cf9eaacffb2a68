//! Markup parser tests.

use castscript_export::{Block, MarkupParser, Span};

fn parse(text: &str) -> Vec<Block> {
    MarkupParser::new().unwrap().parse(text)
}

#[test]
fn test_heading_levels() {
    for level in 1..=6u8 {
        let line = format!("{} Title", "#".repeat(level as usize));
        assert_eq!(parse(&line), vec![Block::heading(level, "Title")]);
    }
}

#[test]
fn test_not_quite_headings_are_paragraphs() {
    assert_eq!(parse("####### Seven"), vec![Block::text("####### Seven")]);
    assert_eq!(parse("#hashtag"), vec![Block::text("#hashtag")]);
}

#[test]
fn test_bullets() {
    assert_eq!(
        parse("- one\n* two\n+ three"),
        vec![
            Block::Bullet(vec![Span::plain("one")]),
            Block::Bullet(vec![Span::plain("two")]),
            Block::Bullet(vec![Span::plain("three")]),
        ]
    );
}

#[test]
fn test_numbered_entries_keep_their_numbers() {
    assert_eq!(
        parse("1. Mở đầu\n12. Kết thúc"),
        vec![
            Block::Numbered {
                number: 1,
                spans: vec![Span::plain("Mở đầu")]
            },
            Block::Numbered {
                number: 12,
                spans: vec![Span::plain("Kết thúc")]
            },
        ]
    );
    assert_eq!(parse("1.5 million views"), vec![Block::text("1.5 million views")]);
}

#[test]
fn test_blockquote() {
    assert_eq!(
        parse("> Đẹp như một giấc mơ"),
        vec![Block::Quote(vec![Span::plain("Đẹp như một giấc mơ")])]
    );
}

#[test]
fn test_fenced_code_keeps_lines_verbatim() {
    let blocks = parse("Before\n```text\n  # not a heading\n- not a bullet\n```\nAfter");
    assert_eq!(
        blocks,
        vec![
            Block::text("Before"),
            Block::Code(vec![
                "  # not a heading".to_string(),
                "- not a bullet".to_string()
            ]),
            Block::text("After"),
        ]
    );
}

#[test]
fn test_unterminated_fence_is_kept() {
    assert_eq!(
        parse("```\nline"),
        vec![Block::Code(vec!["line".to_string()])]
    );
}

#[test]
fn test_inline_emphasis() {
    let bold_italic = Span {
        text: "both".to_string(),
        bold: true,
        italic: true,
    };
    assert_eq!(
        parse("**bold**, __also bold__, *italic* and ***both***"),
        vec![Block::Paragraph(vec![
            Span::bold("bold"),
            Span::plain(", "),
            Span::bold("also bold"),
            Span::plain(", "),
            Span::italic("italic"),
            Span::plain(" and "),
            bold_italic,
        ])]
    );
}

#[test]
fn test_underscore_italics() {
    assert_eq!(
        parse("_italic_ words, __bold__ and _more_."),
        vec![Block::Paragraph(vec![
            Span::italic("italic"),
            Span::plain(" words, "),
            Span::bold("bold"),
            Span::plain(" and "),
            Span::italic("more"),
            Span::plain("."),
        ])]
    );
}

#[test]
fn test_underscores_inside_words_stay_plain() {
    assert_eq!(
        parse("set max_output_tokens here"),
        vec![Block::Paragraph(vec![Span::plain(
            "set max_output_tokens here"
        )])]
    );
}

#[test]
fn test_emphasis_inside_list_and_heading() {
    assert_eq!(
        parse("## Phần **1**\n- *ghi chú*"),
        vec![
            Block::Heading {
                level: 2,
                spans: vec![Span::plain("Phần "), Span::bold("1")]
            },
            Block::Bullet(vec![Span::italic("ghi chú")]),
        ]
    );
}

#[test]
fn test_blank_lines_separate_paragraphs() {
    assert_eq!(
        parse("first\n\n\n  \nsecond"),
        vec![Block::text("first"), Block::text("second")]
    );
    assert!(parse("").is_empty());
}
