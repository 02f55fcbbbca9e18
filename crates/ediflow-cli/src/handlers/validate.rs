//! Validation command handler
//!
//! Payloads come from files, stdin (`-`), or an environment variable. Each
//! one is validated independently and reported in its wire shape.

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use ediflow_schemas::{validate_payload, ScriptResult, ValidationOutcome};
use serde::Serialize;
use std::env::{self, VarError};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A payload as read from its source, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadInput {
    /// Nothing was provided (unset environment variable)
    Absent,
    /// Decoded text, validated as-is
    Text(String),
    /// Bytes that are not valid UTF-8; carries the decoder message
    Undecodable(String),
}

/// A payload and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSource {
    pub label: String,
    pub input: PayloadInput,
}

impl PayloadSource {
    fn from_bytes(label: String, bytes: Vec<u8>) -> Self {
        let input = match String::from_utf8(bytes) {
            Ok(text) => PayloadInput::Text(text),
            Err(e) => PayloadInput::Undecodable(e.to_string()),
        };
        Self { label, input }
    }

    /// Validate this payload; undecodable bytes count as malformed input
    pub fn validate(&self) -> ValidationOutcome {
        match &self.input {
            PayloadInput::Absent => validate_payload(None),
            PayloadInput::Text(text) => validate_payload(Some(text)),
            PayloadInput::Undecodable(message) => {
                warn!(source = %self.label, error = %message, "Payload is not valid UTF-8");
                ValidationOutcome::MalformedInput {
                    message: message.clone(),
                }
            }
        }
    }
}

/// Per-payload entry in machine-readable multi-payload output
#[derive(Debug, Serialize)]
struct PayloadReport<'a> {
    source: &'a str,
    #[serde(flatten)]
    result: ScriptResult,
}

/// Handle the validate command
#[instrument(skip(config, output), fields(inputs = args.inputs.len()))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("validate_command");

    let sources = collect_payloads(&args, config)?;
    info!(count = sources.len(), "Validating payloads");

    let outcomes = {
        let _validation_timer = Timer::new("payload_validation");
        sources.iter().map(PayloadSource::validate).collect::<Vec<_>>()
    };

    report(&sources, &outcomes, args.detailed, output)?;

    let failed = outcomes.iter().filter(|o| !o.is_valid()).count();
    if failed > 0 && !args.allow_invalid {
        warn!(failed, total = outcomes.len(), "Validation failed");
        return Err(Error::ValidationFailed {
            failed,
            total: outcomes.len(),
        });
    }

    Ok(())
}

/// Resolve the payloads named by the arguments
pub fn collect_payloads(args: &ValidateArgs, config: &Config) -> Result<Vec<PayloadSource>> {
    if !args.inputs.is_empty() {
        return args.inputs.iter().map(|path| read_payload_file(path)).collect();
    }

    let var = args
        .from_env
        .as_deref()
        .unwrap_or(config.input.payload_var.as_str());
    if var.is_empty() {
        return Err(Error::invalid_args("environment variable name must not be empty"));
    }

    // An unset variable is a missing payload, not a host error
    let input = match env::var(var) {
        Ok(text) => PayloadInput::Text(text),
        Err(VarError::NotPresent) => PayloadInput::Absent,
        Err(e @ VarError::NotUnicode(_)) => PayloadInput::Undecodable(e.to_string()),
    };
    debug!(var, absent = input == PayloadInput::Absent, "Read payload from environment");

    Ok(vec![PayloadSource {
        label: format!("${}", var),
        input,
    }])
}

fn read_payload_file(path: &Path) -> Result<PayloadSource> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        return Ok(PayloadSource::from_bytes("<stdin>".to_string(), bytes));
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read payload file");

    Ok(PayloadSource::from_bytes(path.display().to_string(), bytes))
}

/// Write every outcome in the configured format
fn report(
    sources: &[PayloadSource],
    outcomes: &[ValidationOutcome],
    detailed: bool,
    output: &mut OutputWriter,
) -> Result<()> {
    // A single payload is printed as the bare wire result
    if !output.is_human() && outcomes.len() > 1 {
        let reports: Vec<PayloadReport<'_>> = sources
            .iter()
            .zip(outcomes)
            .map(|(source, outcome)| PayloadReport {
                source: &source.label,
                result: outcome.to_script_result(),
            })
            .collect();
        return output.data(&reports);
    }

    for (source, outcome) in sources.iter().zip(outcomes) {
        if outcomes.len() > 1 {
            output.section(&source.label)?;
        }
        output.script_result(&outcome.to_script_result())?;

        if detailed && output.is_human() {
            if let ValidationOutcome::Validated { errors } = outcome {
                output.validation_errors(errors)?;
            }
        }
    }

    if outcomes.len() > 1 {
        let valid = outcomes.iter().filter(|o| o.is_valid()).count();
        output.success(&format!("{} of {} payload(s) valid", valid, outcomes.len()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;
    use std::rc::Rc;

    const VALID: &str = r#"{"totalPallets":1,"pallets":[{"palletNumber":1,"sscc":"S1","items":[{"qty":5,"vpn":"V1","ediUom":"EA","poLineNumber":"1"}]}]}"#;

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

    fn args(inputs: Vec<PathBuf>, from_env: Option<&str>) -> ValidateArgs {
        ValidateArgs {
            inputs,
            from_env: from_env.map(str::to_string),
            allow_invalid: false,
            detailed: false,
        }
    }

    fn payload_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn json_writer() -> (OutputWriter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let writer = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));
        (writer, buffer)
    }

    fn contents(buffer: &SharedBuffer) -> String {
        String::from_utf8(buffer.0.borrow().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_file() {
        let file = payload_file(VALID);
        let (mut output, buffer) = json_writer();

        handle_validate(args(vec![file.path().to_path_buf()], None), &Config::default(), &mut output)
            .await
            .unwrap();

        assert_eq!(
            contents(&buffer),
            "{\"status\":\"VALID\",\"success\":true,\"errorMessage\":\"\"}\n"
        );
    }

    #[tokio::test]
    async fn test_invalid_file_fails_unless_allowed() {
        let file = payload_file(r#"{"totalPallets":1,"pallets":[]}"#);
        let (mut output, _buffer) = json_writer();

        let err = handle_validate(args(vec![file.path().to_path_buf()], None), &Config::default(), &mut output)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { failed: 1, total: 1 }));

        let mut allowed = args(vec![file.path().to_path_buf()], None);
        allowed.allow_invalid = true;
        assert!(handle_validate(allowed, &Config::default(), &mut output).await.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_files_report_sources() {
        let good = payload_file(VALID);
        let bad = payload_file("{oops");
        let (mut output, buffer) = json_writer();

        let mut request = args(vec![good.path().to_path_buf(), bad.path().to_path_buf()], None);
        request.allow_invalid = true;
        handle_validate(request, &Config::default(), &mut output).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(contents(&buffer).trim()).unwrap();
        let reports = value.as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["status"], "VALID");
        assert_eq!(reports[0]["source"], good.path().display().to_string());
        assert_eq!(reports[1]["status"], "INVALID_JSON");
        assert_eq!(reports[1]["success"], false);
    }

    #[tokio::test]
    async fn test_non_utf8_file_gets_wire_result() {
        let good = payload_file(VALID);
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(b"{\"totalPallets\":\"\xff\"}").unwrap();
        let (mut output, buffer) = json_writer();

        let request = args(vec![bad.path().to_path_buf(), good.path().to_path_buf()], None);
        let err = handle_validate(request, &Config::default(), &mut output).await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { failed: 1, total: 2 }));

        let value: serde_json::Value = serde_json::from_str(contents(&buffer).trim()).unwrap();
        let reports = value.as_array().unwrap();
        assert_eq!(reports[0]["status"], "INVALID_JSON");
        assert_eq!(reports[0]["success"], false);
        let message = reports[0]["errorMessage"].as_str().unwrap();
        assert!(message.starts_with("Pallet_array_JSON is malformed or invalid JSON: invalid utf-8"));
        assert_eq!(reports[1]["status"], "VALID");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_env_is_malformed_input() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        std::env::set_var("EDIFLOW_TEST_PAYLOAD_BYTES", OsString::from_vec(vec![b'{', 0xff, b'}']));
        let sources = collect_payloads(&args(vec![], Some("EDIFLOW_TEST_PAYLOAD_BYTES")), &Config::default())
            .unwrap();

        assert!(matches!(sources[0].input, PayloadInput::Undecodable(_)));
        assert_eq!(sources[0].validate().status(), ediflow_schemas::ResultStatus::InvalidJson);
    }

    #[test]
    fn test_missing_file() {
        let err = collect_payloads(&args(vec![PathBuf::from("/nonexistent/asn.json")], None), &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_env_payload() {
        std::env::set_var("EDIFLOW_TEST_PAYLOAD_PRESENT", VALID);
        let sources = collect_payloads(&args(vec![], Some("EDIFLOW_TEST_PAYLOAD_PRESENT")), &Config::default())
            .unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].label, "$EDIFLOW_TEST_PAYLOAD_PRESENT");
        assert_eq!(sources[0].input, PayloadInput::Text(VALID.to_string()));
    }

    #[test]
    fn test_unset_env_is_missing_payload() {
        let mut config = Config::default();
        config.input.payload_var = "EDIFLOW_TEST_PAYLOAD_UNSET".to_string();

        let sources = collect_payloads(&args(vec![], None), &config).unwrap();
        assert_eq!(sources[0].input, PayloadInput::Absent);
        assert_eq!(sources[0].validate(), ValidationOutcome::MissingInput);
    }
}
