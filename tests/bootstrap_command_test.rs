//! Tests for BootstrapCommand dispatch

use std::sync::Arc;

use rstest::rstest;

use aclboot::cli::{BootstrapCommand, ClapArgParser, Ui};
use aclboot::domain::TokenType;
use aclboot::exitcode;
use aclboot::infrastructure::traits::{ClientFactory, ClientOptions};
use aclboot::util::testing::{
    init_test_setup, management_token, BufferUi, RecordingClientFactory, StubResponse,
};

fn run(factory: &Arc<RecordingClientFactory>, args: &[&str]) -> (i32, Arc<BufferUi>) {
    init_test_setup();
    let ui = Arc::new(BufferUi::default());
    let command = BootstrapCommand::with_parser(
        Arc::new(ClapArgParser),
        Arc::clone(factory) as Arc<dyn ClientFactory>,
        Arc::clone(&ui) as Arc<dyn Ui>,
    );
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let code = command.run(&args);
    (code, ui)
}

#[test]
fn given_no_flags_when_bootstrap_succeeds_then_prints_token_table() {
    // Arrange
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    // Act
    let (code, ui) = run(&factory, &[]);

    // Assert
    assert_eq!(code, exitcode::OK);
    let out = ui.output_text();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "Accessor ID  = abc123");
    assert_eq!(lines[1], "Secret ID    = xyz789");
    assert_eq!(lines[2], "Name         = <none>");
    assert_eq!(lines[5], "Policies     = n/a");
    assert_eq!(lines[6], "Create Time  = 2023-01-01 00:00:00 UTC");
    assert_eq!(lines[8], "Modify Index = 5");
    assert!(ui.error_text().is_empty());
    assert_eq!(factory.bootstrap_calls(), 1);
}

#[test]
fn given_no_bootstrap_token_when_running_then_sends_empty_secret() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    run(&factory, &[]);

    let requests = factory.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].operator_secret, "");
    assert!(!requests[0].is_operator_authorized());
}

#[rstest]
#[case(&["-bootstrap-token", "2b778dd9-f5f1-6f29-b4b4-9a5fa948757a"])]
#[case(&["--bootstrap-token", "2b778dd9-f5f1-6f29-b4b4-9a5fa948757a"])]
#[case(&["--bootstrap-token=2b778dd9-f5f1-6f29-b4b4-9a5fa948757a"])]
fn given_bootstrap_token_when_running_then_forwards_operator_secret(#[case] args: &[&str]) {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, _) = run(&factory, args);

    assert_eq!(code, exitcode::OK);
    assert_eq!(
        factory.requests()[0].operator_secret,
        "2b778dd9-f5f1-6f29-b4b4-9a5fa948757a"
    );
}

#[rstest]
#[case(&["extra"])]
#[case(&["-json", "extra"])]
#[case(&["extra", "-bootstrap-token", "s3cret"])]
#[case(&["one", "two"])]
fn given_positional_args_when_running_then_fails_without_network(#[case] args: &[&str]) {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, args);

    assert_eq!(code, exitcode::FAILURE);
    assert!(ui.error_text().contains("This command takes no arguments"));
    assert!(ui.output_text().is_empty());
    assert_eq!(factory.client_requests(), 0);
    assert_eq!(factory.bootstrap_calls(), 0);
}

#[test]
fn given_positional_arg_when_running_then_error_line_is_bare_message() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["extra"]);

    assert_eq!(code, exitcode::FAILURE);
    let errors = ui.error_text();
    let mut lines = errors.lines();
    assert_eq!(lines.next(), Some("This command takes no arguments"));
    assert_eq!(lines.next(), Some("For additional help try 'aclboot --help'"));
}

#[rstest]
#[case(&["-json=true"], true)]
#[case(&["-json=false"], false)]
fn given_json_with_explicit_value_when_running_then_honours_it(
    #[case] args: &[&str],
    #[case] json: bool,
) {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, args);

    assert_eq!(code, exitcode::OK);
    assert_eq!(ui.output_text().trim_start().starts_with('{'), json);
    assert_eq!(factory.bootstrap_calls(), 1);
}

#[test]
fn given_hyphen_leading_secret_when_running_then_forwards_it() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, _) = run(&factory, &["-bootstrap-token", "-2b778dd9"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(factory.requests()[0].operator_secret, "-2b778dd9");
}

#[test]
fn given_unknown_flag_when_running_then_fails_before_client() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["--bogus"]);

    assert_eq!(code, exitcode::FAILURE);
    assert!(ui.error_text().contains("--bogus"));
    assert_eq!(factory.client_requests(), 0);
}

#[test]
fn given_already_bootstrapped_when_running_then_reports_remote_error() {
    // Arrange
    let factory = Arc::new(RecordingClientFactory::failing(
        400,
        "ACL bootstrap already done",
    ));

    // Act
    let (code, ui) = run(&factory, &[]);

    // Assert
    assert_eq!(code, exitcode::FAILURE);
    let err = ui.error_text();
    assert!(err.starts_with("Error bootstrapping: "));
    assert!(err.contains("ACL bootstrap already done"));
    assert!(ui.output_text().is_empty());
    assert_eq!(factory.bootstrap_calls(), 1, "bootstrap must not be retried");
}

#[test]
fn given_transport_failure_when_running_then_reports_once() {
    let factory = Arc::new(RecordingClientFactory::new(StubResponse::Transport(
        "connection refused".into(),
    )));

    let (code, ui) = run(&factory, &["-json"]);

    assert_eq!(code, exitcode::FAILURE);
    assert!(ui.error_text().contains("connection refused"));
    assert_eq!(factory.bootstrap_calls(), 1);
}

#[test]
fn given_client_unavailable_when_running_then_reports_initialization_error() {
    let factory = Arc::new(RecordingClientFactory::unavailable("no control-plane address"));

    let (code, ui) = run(&factory, &[]);

    assert_eq!(code, exitcode::FAILURE);
    assert_eq!(
        ui.error_text(),
        "Error initializing client: no control-plane address"
    );
    assert_eq!(factory.bootstrap_calls(), 0);
}

#[test]
fn given_address_flag_when_running_then_passes_override_to_factory() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    run(&factory, &["-address", "https://cp.example:4646"]);

    assert_eq!(
        factory.last_options(),
        Some(ClientOptions {
            address: Some("https://cp.example:4646".into())
        })
    );
}

#[test]
fn given_json_flag_when_running_then_prints_wire_json() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["-json"]);

    assert_eq!(code, exitcode::OK);
    let value: serde_json::Value = serde_json::from_str(&ui.output_text()).unwrap();
    assert_eq!(value["AccessorID"], "abc123");
    assert_eq!(value["SecretID"], "xyz789");
    assert_eq!(value["Type"], "management");
    assert_eq!(value["CreateIndex"], 5);
}

#[test]
fn given_template_when_running_then_prints_rendered_template() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["-t", "{{.AccessorID}}:{{.SecretID}}"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(ui.output_text(), "abc123:xyz789");
}

#[test]
fn given_bad_template_when_running_then_reports_rendering_error_after_bootstrap() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["-t", "{{.NoSuchField}}"]);

    assert_eq!(code, exitcode::FAILURE);
    assert!(ui.error_text().starts_with("error formatting output:"));
    assert!(!ui.error_text().contains("Error bootstrapping"));
    assert!(ui.output_text().is_empty());
    assert_eq!(factory.bootstrap_calls(), 1);
}

#[test]
fn given_json_and_template_when_running_then_reports_rendering_error() {
    let factory = Arc::new(RecordingClientFactory::returning(management_token()));

    let (code, ui) = run(&factory, &["-json", "-t", "{{.SecretID}}"]);

    assert_eq!(code, exitcode::FAILURE);
    assert!(ui.error_text().contains("both json and template"));
}

#[test]
fn given_client_token_when_running_then_table_lists_policies() {
    let mut token = management_token();
    token.token_type = TokenType::Client;
    token.global = false;
    token.policies = vec!["readonly".into(), "deploy".into()];
    let factory = Arc::new(RecordingClientFactory::returning(token));

    let (code, ui) = run(&factory, &[]);

    assert_eq!(code, exitcode::OK);
    let out = ui.output_text();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[3], "Type         = client");
    assert_eq!(lines[4], "Global       = false");
    assert_eq!(lines[5], "Policies     = [readonly deploy]");
}
