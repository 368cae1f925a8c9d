use super::*;
use crate::api::ServiceStatus;
use crate::cli::mode_list::write_modes;
use crate::cli::say::{exit_code, write_reply};
use crate::cli::status::{missing_routes, write_status};
use crate::core::conversation::{SkipReason, SubmitOutcome};
use crate::core::message::Message;
use crate::core::projection::MissingField;
use serde_json::json;
use tempfile::TempDir;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn output_of(write: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&mut out).expect("write to buffer");
        String::from_utf8(out).expect("utf8 output")
    }
}

use test_helpers::{output_of, parse_args};

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["novahub"]);
    assert_eq!(args.command, None);
    assert_eq!(args.mode, None);
    assert_eq!(args.api_url, None);
}

#[test]
fn mode_flag_parses_before_and_after_subcommand() {
    let cases: [(&[&str], Mode); 4] = [
        (&["novahub", "-m", "analyze"], Mode::Analyze),
        (&["novahub", "--mode", "sladocs", "chat"], Mode::DocumentQa),
        (&["novahub", "say", "-m", "extract", "Ada", "met", "Charles"], Mode::Extract),
        (&["novahub", "modes", "--mode", "Document-QA"], Mode::DocumentQa),
    ];

    for (argv, expected) in cases {
        let args = parse_args(argv);
        assert_eq!(args.mode, Some(expected), "argv={argv:?}");
    }
}

#[test]
fn unknown_mode_is_rejected_by_the_parser() {
    let err = match Args::try_parse_from(["novahub", "-m", "poetry"]) {
        Ok(_) => panic!("unknown mode should not parse"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("unknown mode 'poetry'"));
}

#[test]
fn say_collects_trailing_words() {
    let args = parse_args(&["novahub", "say", "What's", "the", "-weather-", "like?"]);
    assert_eq!(
        args.command,
        Some(Commands::Say {
            text: vec![
                "What's".to_string(),
                "the".to_string(),
                "-weather-".to_string(),
                "like?".to_string()
            ]
        })
    );
}

#[test]
fn global_flags_parse() {
    let args = parse_args(&[
        "novahub",
        "status",
        "--api-url",
        "http://10.0.0.5:8000",
        "--trace-file",
        "/tmp/novahub.trace",
        "-l",
        "session.log",
    ]);
    assert_eq!(args.command, Some(Commands::Status));
    assert_eq!(args.api_url.as_deref(), Some("http://10.0.0.5:8000"));
    assert_eq!(
        args.trace_file.as_deref(),
        Some(std::path::Path::new("/tmp/novahub.trace"))
    );
    assert_eq!(args.log.as_deref(), Some("session.log"));
}

#[test]
fn set_accepts_multi_word_values() {
    let args = parse_args(&["novahub", "set", "thread-id", "ops", "review"]);
    assert_eq!(
        args.command,
        Some(Commands::Set {
            key: "thread-id".to_string(),
            value: vec!["ops".to_string(), "review".to_string()],
        })
    );
}

#[test]
fn long_version_carries_build_metadata() {
    assert!(LONG_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    assert!(LONG_VERSION.contains("\ncommit: "));
    assert!(LONG_VERSION.contains("\nrustc: "));
}

#[test]
fn set_and_unset_round_trip_through_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    let message =
        set_config_value(&config_path, "default-mode", "sladocs").expect("set default mode");
    assert_eq!(message, "Set default-mode to: sladocs");
    let message = set_config_value(&config_path, "api_url", "http://10.0.0.5:8000")
        .expect("set api url");
    assert_eq!(message, "Set api-url to: http://10.0.0.5:8000");

    let config = Config::load_from_path(&config_path).expect("load");
    assert_eq!(config.default_mode, Some(Mode::DocumentQa));
    assert_eq!(config.api_url.as_deref(), Some("http://10.0.0.5:8000"));

    assert_eq!(
        unset_config_value(&config_path, "api-url").expect("unset"),
        "Unset api-url"
    );
    assert_eq!(
        unset_config_value(&config_path, "api-url").expect("unset again"),
        "api-url was not set"
    );
    let config = Config::load_from_path(&config_path).expect("load");
    assert_eq!(config.api_url, None);
    assert_eq!(config.default_mode, Some(Mode::DocumentQa));
}

#[test]
fn set_rejects_bad_keys_and_values_without_writing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    let err = set_config_value(&config_path, "theme", "dark").expect_err("unknown key");
    assert!(err.to_string().starts_with("Unknown config key 'theme'"));

    let err = set_config_value(&config_path, "default-mode", "poetry").expect_err("bad mode");
    assert!(err.to_string().contains("poetry"));

    assert!(!config_path.exists());
}

#[test]
fn build_controller_applies_flags_over_config() {
    let config = Config {
        api_url: Some("http://file:8000".to_string()),
        default_mode: Some(Mode::Analyze),
        thread_id: Some("ops-review".to_string()),
        ..Default::default()
    };

    let (controller, base_url) =
        build_controller(&config, Some("http://flag:9000"), Some(Mode::Extract), None)
            .expect("controller");
    assert_eq!(base_url, "http://flag:9000");
    assert_eq!(controller.current_mode(), Mode::Extract);
    assert_eq!(controller.identity().thread_id, "ops-review");
    assert_eq!(controller.identity().user_id, "1");
    assert_eq!(controller.logging_status(), "off");

    let (controller, _) =
        build_controller(&config, None, None, None).expect("controller");
    assert_eq!(controller.current_mode(), Mode::Analyze);
}

#[test]
fn build_controller_enables_transcript_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let log_path = temp_dir.path().join("session.log");

    let (controller, _) = build_controller(
        &Config::default(),
        None,
        None,
        Some(log_path.to_string_lossy().into_owned()),
    )
    .expect("controller");
    assert_eq!(controller.logging_status(), "session.log");
}

#[test]
fn modes_table_lists_every_route() {
    let text = output_of(|out| write_modes(out, Mode::DocumentQa));
    let mut lines = text.lines();

    let header = lines.next().expect("header row");
    assert!(header.starts_with("MODE"));
    assert!(header.contains("METHOD"));
    assert!(header.ends_with("SCHEMA"));

    for mode in Mode::ALL {
        let descriptor = mode.descriptor();
        let row = text
            .lines()
            .find(|line| line.contains(descriptor.endpoint_path))
            .unwrap_or_else(|| panic!("row for {mode}"));
        assert!(row.contains("POST"));
        assert!(row.contains(descriptor.agent_label));
        assert!(row.ends_with(descriptor.response_schema));
    }
    assert!(text.contains("document-qa*"));
    assert!(!text.contains("chat*"));
    assert!(text.ends_with("* = starting mode\n"));
}

#[test]
fn modes_table_reports_write_failures() {
    struct ClosedPipe;

    impl std::io::Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = write_modes(&mut ClosedPipe, Mode::Chat).expect_err("closed pipe");
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
}

#[test]
fn status_report_flags_missing_routes() {
    let status = ServiceStatus {
        status: "online".to_string(),
        endpoints: vec!["/chat".to_string(), "/extract".to_string(), "/analyze".to_string()],
        tech_stack: vec!["FastAPI".to_string(), "LangChain".to_string()],
    };
    assert_eq!(missing_routes(&status), vec!["/sladocs"]);

    let text = output_of(|out| write_status(out, "http://127.0.0.1:8000", &status));
    assert!(text.starts_with("✅ http://127.0.0.1:8000: online\n"));
    assert!(text.contains("  Endpoints: /chat, /extract, /analyze\n"));
    assert!(text.contains("  Tech stack: FastAPI, LangChain\n"));
    assert!(text.contains("  Missing agent routes: /sladocs\n"));
}

#[test]
fn status_without_endpoint_list_reports_nothing_missing() {
    let status = ServiceStatus {
        status: "degraded".to_string(),
        ..Default::default()
    };
    assert!(missing_routes(&status).is_empty());
    let text = output_of(|out| write_status(out, "http://127.0.0.1:8000", &status));
    assert_eq!(text, "⚠️  http://127.0.0.1:8000: degraded\n");
}

#[test]
fn say_prints_reply_with_highlights() {
    let reply = Message::assistant(
        "Austin is sun-sational.",
        Mode::Chat,
        Some(json!({
            "punny_response": "Austin is sun-sational.",
            "weather_conditions": {"conditions": "Clear"}
        })),
    );
    let text = output_of(|out| write_reply(out, &reply));
    assert_eq!(text, "Austin is sun-sational.\n  • CONDITION: Clear\n");
}

#[test]
fn say_exit_codes() {
    assert_eq!(exit_code(&SubmitOutcome::ConnectionFailed), 1);
    assert_eq!(
        exit_code(&SubmitOutcome::Skipped(SkipReason::EmptyInput)),
        1
    );
    assert_eq!(
        exit_code(&SubmitOutcome::MissingField(MissingField {
            mode: Mode::Chat,
            field: "punny_response",
        })),
        2
    );
}
