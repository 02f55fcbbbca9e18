//! Link command handler
//!
//! Runs the related-record workflow for one inbound document against a
//! candidate file. Updates are recorded and reported, not applied anywhere.

use crate::cli::LinkArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use ediflow_core::{
    link_related_record, InMemoryCandidateSource, InboundDocument, LinkOptions, LinkOutcome,
    RecordingWriter,
};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Handle the link command
#[instrument(skip(config, output), fields(document = %args.document.display()))]
pub async fn handle_link(args: LinkArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("link_command", &args.document.display().to_string());

    let options = resolve_options(&args, config)?;
    let document = load_document(&args.document)?;
    let owner_id = document.owner_id.as_deref().unwrap_or_default();
    let source = load_candidates(&args.candidates, owner_id)?;
    debug!(candidates = source.len(), "Loaded candidate records");

    output.info(&format!("Linking document {}", document.id))?;

    let mut writer = RecordingWriter::default();
    let outcome = link_related_record(&document, &source, &mut writer, &options);

    output.link_outcome(&outcome)?;

    if let LinkOutcome::WriteFailed { message, .. } = &outcome {
        return Err(Error::other(format!("Failed to write related record: {}", message)));
    }

    Ok(())
}

/// Config-file link options with command-line overrides applied
pub fn resolve_options(args: &LinkArgs, config: &Config) -> Result<LinkOptions> {
    let mut options = config.linking.clone();

    if let Some(field) = &args.field {
        if field.is_empty() {
            return Err(Error::invalid_args("--field must not be empty"));
        }
        options.related_field = field.clone();
    }
    if let Some(limit) = args.page_limit {
        if limit == 0 {
            return Err(Error::invalid_args("--page-limit must be greater than zero"));
        }
        options.page_limit = limit;
    }

    Ok(options)
}

fn load_document(path: &Path) -> Result<InboundDocument> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "inbound document JSON object".to_string(),
        detail: e.to_string(),
    })
}

/// The candidate file stands in for the owner's record query, so a bad
/// file is a candidate fetch failure for that owner.
fn load_candidates(path: &Path, owner_id: &str) -> Result<InMemoryCandidateSource> {
    let content = read_input(path)?;
    let source = InMemoryCandidateSource::from_json(&content).map_err(|e| {
        ediflow_core::Error::candidate_fetch(
            owner_id,
            format!("cannot parse candidates file {}: {}", path.display(), e),
        )
        .with_source(e.into())
    })?;
    Ok(source)
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn json_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn link_args(document: &Path, candidates: &Path) -> LinkArgs {
        LinkArgs {
            document: document.to_path_buf(),
            candidates: candidates.to_path_buf(),
            field: None,
            page_limit: None,
        }
    }

    const CANDIDATES: &str = r#"[
        {"ownerId": "C-1", "id": "SO-1", "primaryKey": "PO-9"},
        {"ownerId": "C-2", "id": "SO-2", "primaryKey": "PO-1"},
        {"ownerId": "C-1", "id": "SO-3", "secondaryKey": "PO-1"},
        {"ownerId": "C-1", "id": "SO-4", "primaryKey": "PO-1"}
    ]"#;

    async fn run(args: LinkArgs, config: &Config) -> (Result<()>, serde_json::Value) {
        let buffer = SharedBuffer::default();
        let mut output = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));
        let result = handle_link(args, config, &mut output).await;
        let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        let value = serde_json::from_str(text.trim()).unwrap_or(serde_json::Value::Null);
        (result, value)
    }

    #[tokio::test]
    async fn test_links_first_match_in_candidate_order() {
        let document = json_file(r#"{"id": "ASN-7", "targetKey": "PO-1", "ownerId": "C-1"}"#);
        let candidates = json_file(CANDIDATES);

        let (result, value) = run(link_args(document.path(), candidates.path()), &Config::default()).await;

        assert!(result.is_ok());
        assert_eq!(value["outcome"], "linked");
        assert_eq!(value["update"]["recordId"], "ASN-7");
        assert_eq!(value["update"]["field"], "related_record");
        assert_eq!(value["update"]["value"], "SO-3");
    }

    #[tokio::test]
    async fn test_field_override() {
        let document = json_file(r#"{"id": "ASN-7", "targetKey": "PO-9", "ownerId": "C-1"}"#);
        let candidates = json_file(CANDIDATES);
        let mut args = link_args(document.path(), candidates.path());
        args.field = Some("custbody_related_so".to_string());

        let (result, value) = run(args, &Config::default()).await;

        assert!(result.is_ok());
        assert_eq!(value["update"]["field"], "custbody_related_so");
        assert_eq!(value["update"]["value"], "SO-1");
    }

    #[tokio::test]
    async fn test_no_match_is_not_an_error() {
        let document = json_file(r#"{"id": "ASN-8", "targetKey": "PO-404", "ownerId": "C-1"}"#);
        let candidates = json_file(CANDIDATES);

        let (result, value) = run(link_args(document.path(), candidates.path()), &Config::default()).await;

        assert!(result.is_ok());
        assert_eq!(value["outcome"], "unlinked");
        assert_eq!(value["candidates_checked"], 0);
    }

    #[tokio::test]
    async fn test_document_without_owner_is_skipped() {
        let document = json_file(r#"{"id": "ASN-9", "targetKey": "PO-1"}"#);
        let candidates = json_file(CANDIDATES);

        let (result, value) = run(link_args(document.path(), candidates.path()), &Config::default()).await;

        assert!(result.is_ok());
        assert_eq!(value["outcome"], "skipped");
        assert_eq!(value["reason"], "missing_owner_id");
    }

    #[tokio::test]
    async fn test_malformed_candidates_file() {
        let document = json_file(r#"{"id": "ASN-7", "targetKey": "PO-1", "ownerId": "C-1"}"#);
        let candidates = json_file(r#"{"not": "an array"}"#);

        let (result, _) = run(link_args(document.path(), candidates.path()), &Config::default()).await;
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        match err {
            Error::Core(ediflow_core::Error::CandidateFetch { owner_id, message, source }) => {
                assert_eq!(owner_id, "C-1");
                assert!(message.contains("invalid type: map, expected a sequence"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_document_keeps_parser_detail() {
        let document = json_file(r#"{"targetKey": "PO-1"}"#);
        let candidates = json_file(CANDIDATES);

        let (result, _) = run(link_args(document.path(), candidates.path()), &Config::default()).await;
        match result {
            Err(Error::InvalidFormat { detail, .. }) => assert!(detail.contains("missing field `id`")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_options_rejects_zero_limit() {
        let mut args = link_args(Path::new("doc.json"), Path::new("orders.json"));
        args.page_limit = Some(0);
        assert!(matches!(
            resolve_options(&args, &Config::default()),
            Err(Error::InvalidArgs(_))
        ));

        args.page_limit = Some(5);
        assert_eq!(resolve_options(&args, &Config::default()).unwrap().page_limit, 5);
    }

    #[tokio::test]
    async fn test_missing_document_file() {
        let candidates = json_file(CANDIDATES);
        let args = link_args(&PathBuf::from("/nonexistent/asn.json"), candidates.path());

        let (result, _) = run(args, &Config::default()).await;
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
