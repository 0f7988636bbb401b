//! Round-trip properties: parse/generate symmetry, idempotence, and
//! delimiter invariance.

mod common;

use common::{claim_837, inquiry_270, remittance_835};
use x12::{Delimiters, Engine, Interchange};

fn normalize(mut interchange: Interchange) -> Interchange {
    interchange.delimiters = Delimiters::default();
    interchange
}

#[test]
fn test_835_round_trip_preserves_tree() {
    let engine = Engine::new();
    let first = engine.parse(remittance_835().as_bytes()).unwrap();
    let bytes = engine.generate(&first.interchange, None).unwrap();
    let second = engine.parse(&bytes).unwrap();

    assert_eq!(first.interchange, second.interchange);
}

#[test]
fn test_control_fields_self_consistent_after_regeneration() {
    let engine = Engine::new();
    let parsed = engine.parse(remittance_835().as_bytes()).unwrap();
    let bytes = engine.generate(&parsed.interchange, None).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.contains("ST*835*0001~"));
    assert!(text.contains("SE*14*0001~"), "SE01 recomputed from the tree");
    assert!(text.contains("GE*1*1~"));
    assert!(text.ends_with("IEA*1*000000001~"));
}

#[test]
fn test_generation_is_idempotent() {
    let engine = Engine::new();
    for fixture in [remittance_835(), inquiry_270(), claim_837("1234567893")] {
        let parsed = engine.parse(fixture.as_bytes()).unwrap();
        let once = engine.generate(&parsed.interchange, None).unwrap();
        let reparsed = engine.parse(&once).unwrap();
        let twice = engine.generate(&reparsed.interchange, None).unwrap();
        assert_eq!(once, twice, "generate(parse(generate(T))) == generate(T)");
    }
}

#[test]
fn test_delimiter_invariance() {
    let engine = Engine::new();
    let parsed = engine.parse(remittance_835().as_bytes()).unwrap();

    let custom = Delimiters::new(b'|', b'\n', b'>', Some(b'^')).unwrap();
    let custom_bytes = engine.generate(&parsed.interchange, Some(custom)).unwrap();
    let default_bytes = engine.generate(&parsed.interchange, None).unwrap();

    let from_custom = engine.parse(&custom_bytes).unwrap();
    let from_default = engine.parse(&default_bytes).unwrap();

    assert_eq!(from_custom.interchange.delimiters, custom);
    assert_eq!(
        normalize(from_custom.interchange),
        normalize(from_default.interchange)
    );
}

#[test]
fn test_trailing_empty_elements_elide_on_round_trip() {
    let engine = Engine::new();
    // DTP carries two explicitly terminated trailing empties.
    let input = inquiry_270().replace("NM1*IL*1*DOE*JOHN~", "NM1*IL*1*DOE*JOHN**~");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let bytes = engine.generate(&parsed.interchange, None).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.contains("NM1*IL*1*DOE*JOHN~"), "trailing empties elided");
}

#[test]
fn test_line_wrapped_input_parses_identically() {
    let engine = Engine::new();
    let flat = engine.parse(inquiry_270().as_bytes()).unwrap();
    let wrapped = inquiry_270().replace('~', "~\r\n");
    let parsed_wrapped = engine.parse(wrapped.as_bytes()).unwrap();

    assert_eq!(flat.interchange, parsed_wrapped.interchange);
}

#[test]
fn test_non_default_delimiters_detected_and_parsed() {
    let engine = Engine::new();
    let parsed = engine.parse(remittance_835().as_bytes()).unwrap();

    let custom = Delimiters::new(b'|', b'\n', b':', Some(b'^')).unwrap();
    let bytes = engine.generate(&parsed.interchange, Some(custom)).unwrap();
    let reparsed = engine.parse(&bytes).unwrap();

    assert_eq!(reparsed.interchange.delimiters.element, b'|');
    assert_eq!(reparsed.interchange.delimiters.segment, b'\n');
    assert_eq!(
        normalize(reparsed.interchange).functional_groups,
        normalize(parsed.interchange).functional_groups
    );
}
