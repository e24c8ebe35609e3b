use mml_bounded::{
    check, parse, parse_with_options, validate, Document, Error, ParserOptions, Statistics,
    LINK_FIELD_LENGTH, MAX_METADATA, MAX_SECTIONS, MAX_TITLE_LENGTH, METADATA_FIELD_LENGTH,
};

const REPORT: &str = "\
T:Emergency report
M:Author|Rescue team
M:Priority|CRITICAL

H:Current situation
P:Fire in the north sector
M:Area|500 hectares
P:Risk of fast spread

H:Actions
P:Evacuate red zone
L:Sector map|maps/sector-7.png
IMG:Fire photo|photos/fire-1500.jpg
Q:Speed saves lives
";

#[test]
fn test_basic_example() {
    let doc = parse("T:Report\nH:Intro\nP:Hello\nM:Key|Val\n");

    assert_eq!(doc.title, "Report");
    assert!(doc.metadata.is_empty());
    assert_eq!(doc.sections.len(), 1);

    let intro = doc.sections.get(0).unwrap();
    assert_eq!(intro.title, "Intro");
    assert_eq!(intro.content, "Hello");
    assert_eq!(intro.metadata.len(), 1);
    assert_eq!(intro.metadata.get(0).unwrap().key, "Key");
    assert_eq!(intro.metadata.get(0).unwrap().value, "Val");

    assert_eq!(doc.stats.total_lines, 4);
    assert_eq!(doc.stats.parsed_lines, 4);
    assert_eq!(doc.stats.error_lines, 0);
}

#[test]
fn test_metadata_without_delimiter() {
    let doc = parse("M:OnlyKey\n");
    assert_eq!(doc.metadata.len(), 1);
    let entry = doc.metadata.get(0).unwrap();
    assert_eq!(entry.key, "OnlyKey");
    assert_eq!(entry.value, "");
    assert_eq!(doc.stats.error_lines, 0);
}

#[test]
fn test_link_without_delimiter() {
    let doc = parse("L:just text");
    let link = doc.links.get(0).unwrap();
    assert_eq!(link.text, "just text");
    assert!(link.url.is_empty());
    assert_eq!(doc.stats.parsed_lines, 1);
}

#[test]
fn test_image_before_section_is_error() {
    let doc = parse("IMG:Photo|photo.jpg\n");
    assert_eq!(doc.stats.total_lines, 1);
    assert_eq!(doc.stats.error_lines, 1);
    assert!(doc.sections.is_empty());
    assert!(doc.metadata.is_empty());
    assert!(doc.links.is_empty());
}

#[test]
fn test_full_report() {
    let doc = parse(REPORT);

    assert_eq!(doc.title, "Emergency report");
    assert_eq!(doc.metadata.len(), 2);
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.stats.total_lines, 12);
    assert_eq!(doc.stats.error_lines, 0);

    let situation = doc.sections.get(0).unwrap();
    assert_eq!(situation.content, "Risk of fast spread");
    assert_eq!(situation.metadata.get(0).unwrap().value, "500 hectares");

    let actions = doc.sections.get(1).unwrap();
    assert_eq!(actions.content, "> Speed saves lives");
    assert_eq!(actions.links.get(0).unwrap().url, "maps/sector-7.png");
    assert_eq!(actions.images.get(0).unwrap().description, "Fire photo");

    assert!(validate(&doc));
}

#[test]
fn test_title_last_write_wins() {
    let doc = parse("T:First\nH:A\nT:Second");
    assert_eq!(doc.title, "Second");
    assert_eq!(doc.stats.error_lines, 0);
}

#[test]
fn test_cursor_never_returns_to_document() {
    let doc = parse("H:A\nM:k|v\nL:t|u\nT:Title\nM:k2|v2");
    assert!(doc.metadata.is_empty());
    assert!(doc.links.is_empty());
    assert_eq!(doc.sections.get(0).unwrap().metadata.len(), 2);
}

#[test]
fn test_counter_invariant_with_mixed_lines() {
    let input = "T:x\nnot a directive\n\n  \nP:orphan\nUNKNOWN:ok\nH:s\nCFG:mode=1\n";
    let doc = parse(input);
    assert_eq!(doc.stats.total_lines, 6);
    assert_eq!(doc.stats.parsed_lines, 4);
    assert_eq!(doc.stats.error_lines, 2);
    assert_eq!(
        doc.stats.total_lines,
        doc.stats.parsed_lines + doc.stats.error_lines
    );
}

#[test]
fn test_truncated_fields_are_counted_as_errors() {
    let title = "t".repeat(MAX_TITLE_LENGTH * 2);
    let key = "k".repeat(METADATA_FIELD_LENGTH);
    let url = "u".repeat(LINK_FIELD_LENGTH);
    let input = format!("T:{title}\nM:{key}|v\nH:S\nL:text|{url}\n");
    let doc = parse(&input);

    assert_eq!(doc.title.len(), MAX_TITLE_LENGTH - 1);
    assert_eq!(doc.metadata.get(0).unwrap().key.len(), METADATA_FIELD_LENGTH - 1);
    let link = doc.sections.get(0).unwrap().links.get(0).unwrap();
    assert_eq!(link.url.len(), LINK_FIELD_LENGTH - 1);
    assert_eq!(link.text, "text");

    assert_eq!(doc.stats.total_lines, 4);
    assert_eq!(doc.stats.error_lines, 3);
}

#[test]
fn test_value_exactly_at_capacity_is_accepted() {
    let key = "k".repeat(METADATA_FIELD_LENGTH - 1);
    let doc = parse(format!("M:{key}|v"));
    assert_eq!(doc.stats.error_lines, 0);
    assert_eq!(doc.metadata.get(0).unwrap().key.len(), METADATA_FIELD_LENGTH - 1);
}

#[test]
fn test_section_overflow_keeps_existing_sections() {
    let mut input = String::new();
    for i in 0..=MAX_SECTIONS {
        input.push_str(&format!("H:S{i}\nP:body {i}\n"));
    }
    let doc = parse(&input);

    assert_eq!(doc.sections.len(), MAX_SECTIONS);
    // the rejected H: leaves the cursor on the last accepted section
    let last = doc.sections.get(MAX_SECTIONS - 1).unwrap();
    assert_eq!(last.title, format!("S{}", MAX_SECTIONS - 1).as_str());
    assert_eq!(last.content, format!("body {MAX_SECTIONS}").as_str());
    assert_eq!(doc.stats.error_lines, 1);
}

#[test]
fn test_metadata_overflow_rejects_new_entries() {
    let mut input = String::new();
    for i in 0..MAX_METADATA + 3 {
        input.push_str(&format!("M:k{i}|v{i}\n"));
    }
    let doc = parse(&input);
    assert_eq!(doc.metadata.len(), MAX_METADATA);
    assert_eq!(doc.metadata.get(0).unwrap().key, "k0");
    assert_eq!(doc.stats.error_lines, 3);
}

#[test]
fn test_crlf_and_whitespace_input() {
    let doc = parse("  T:Windows  \r\n\r\n\tH:Section\t\r\nP:   text\r\n");
    assert_eq!(doc.title, "Windows");
    let section = doc.sections.get(0).unwrap();
    assert_eq!(section.title, "Section");
    assert_eq!(section.content, "text");
    assert_eq!(doc.stats.total_lines, 3);
}

#[test]
fn test_strict_and_reject_unknown() {
    let options = ParserOptions::new().with_reject_unknown(true);
    let doc = parse_with_options("T:a\nXX:b\nH:c", options);
    assert_eq!(doc.stats.error_lines, 1);
    assert_eq!(doc.sections.len(), 1);

    let doc = parse_with_options("T:a\nXX:b\nH:c", options.with_strict(true));
    assert_eq!(doc.stats.total_lines, 2);
    assert!(doc.sections.is_empty());
}

#[test]
fn test_check() {
    assert!(check(REPORT).is_ok());
    assert_eq!(check("T:ok\nbroken"), Err(Error::ParseError));
}

#[test]
fn test_statistics_of_report() {
    let stats = Statistics::collect(&parse(REPORT));
    assert!(stats.has_title);
    assert_eq!(stats.sections, 2);
    assert_eq!(stats.metadata, 3);
    assert_eq!(stats.links, 1);
    assert_eq!(stats.images, 1);
    assert_eq!(stats.total_lines, 12);
    assert_eq!(stats.parsed_lines, 12);
    assert_eq!(stats.error_lines, 0);

    let summary = stats.summary();
    assert!(summary.as_str().contains("Sections: 2\n"));
    assert!(summary.as_str().ends_with("Errors: 0"));
}

#[test]
fn test_empty_input() {
    let doc = parse("");
    assert_eq!(doc, Document::new());
    assert!(validate(&doc));
}
