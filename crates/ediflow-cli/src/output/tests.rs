// Tests for output formatting
//
// These tests verify the wire shape of machine formats and the
// human rendering of validation results and link outcomes.

use super::*;
use ediflow_core::{RelatedUpdate, SkipReason};
use ediflow_schemas::{validate_payload, ValidationOutcome};
use std::cell::RefCell;
use std::rc::Rc;

/// Writer that shares its buffer with the test
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_update() -> RelatedUpdate {
    RelatedUpdate {
        record_id: "ASN-7".to_string(),
        field: "related_record".to_string(),
        value: "SO-42".to_string(),
    }
}

#[test]
fn test_script_result_json_is_wire_shape() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.script_result(&ScriptResult::valid()).unwrap();

    assert_eq!(
        buffer.contents(),
        "{\"status\":\"VALID\",\"success\":true,\"errorMessage\":\"\"}\n"
    );
}

#[test]
fn test_script_result_human() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    let result = validate_payload(None).to_script_result();
    out.script_result(&result).unwrap();

    assert_eq!(
        buffer.contents(),
        "✗ MISSING_DATA: Pallet_array_JSON field is empty or missing\n"
    );
}

#[test]
fn test_script_result_yaml() {
    let (mut out, buffer) = writer(OutputFormat::Yaml, false);
    out.script_result(&ScriptResult::valid()).unwrap();

    let contents = buffer.contents();
    assert!(contents.contains("status: VALID"));
    assert!(contents.contains("success: true"));
}

#[test]
fn test_validation_errors_human_lists_paths() {
    let outcome = validate_payload(Some(r#"{"totalPallets":1,"pallets":[{"palletNumber":1,"items":[{}]}]}"#));
    let errors = match outcome {
        ValidationOutcome::Validated { errors } => errors,
        other => panic!("unexpected outcome: {:?}", other),
    };

    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.validation_errors(&errors).unwrap();

    let contents = buffer.contents();
    assert!(contents.starts_with("  1. $.pallets[0].sscc [non_empty] Pallet 1 missing or empty sscc"));
    assert!(contents.contains("$.pallets[0].items[0].qty [present] Pallet 1 Item 1 missing or empty qty"));
}

#[test]
fn test_empty_validation_errors_write_nothing() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.validation_errors(&ValidationErrors::new()).unwrap();
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_link_outcome_human() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.link_outcome(&LinkOutcome::Linked { update: sample_update() }).unwrap();
    out.link_outcome(&LinkOutcome::Unlinked { candidates_checked: 0 }).unwrap();
    out.link_outcome(&LinkOutcome::Skipped { reason: SkipReason::MissingOwnerId }).unwrap();

    let contents = buffer.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "✓ Linked ASN-7: related_record = SO-42");
    assert_eq!(lines[1], "• No matching record among 0 candidate(s), field left blank");
    assert_eq!(lines[2], "• Skipped: document has no owner");
}

#[test]
fn test_link_outcome_json() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.link_outcome(&LinkOutcome::Linked { update: sample_update() }).unwrap();

    let value: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(value["outcome"], "linked");
    assert_eq!(value["update"]["value"], "SO-42");
}

#[test]
fn test_quiet_suppresses_info_but_not_results() {
    let (mut out, buffer) = writer(OutputFormat::Human, true);
    out.info("Validating payload").unwrap();
    out.success("done").unwrap();
    out.script_result(&ScriptResult::valid()).unwrap();

    assert_eq!(buffer.contents(), "✓ VALID\n");
}

#[test]
fn test_machine_formats_skip_chatter() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.info("Validating payload").unwrap();
    out.section("Results").unwrap();
    out.success("done").unwrap();

    assert!(buffer.contents().is_empty());
}
