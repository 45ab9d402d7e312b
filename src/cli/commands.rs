//! Command dispatch: the ACL bootstrap command

use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::application::format_output;
use crate::cli::args::{ArgParser, BootstrapArgs, ClapArgParser, Parsed};
use crate::cli::output::Ui;
use crate::cli::{CliError, CliResult};
use crate::domain::{format_kv, format_token, BootstrapRequest};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{ClientFactory, ClientOptions};

/// Bootstraps the ACL system and prints the initial management token.
pub struct BootstrapCommand {
    parser: Arc<dyn ArgParser>,
    clients: Arc<dyn ClientFactory>,
    ui: Arc<dyn Ui>,
}

impl BootstrapCommand {
    /// Create the command from the container's services and the clap parser.
    pub fn new(container: &ServiceContainer, ui: Arc<dyn Ui>) -> Self {
        Self::with_parser(Arc::new(ClapArgParser), Arc::clone(&container.clients), ui)
    }

    pub fn with_parser(
        parser: Arc<dyn ArgParser>,
        clients: Arc<dyn ClientFactory>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            parser,
            clients,
            ui,
        }
    }

    pub fn synopsis(&self) -> &'static str {
        self.parser.synopsis()
    }

    pub fn help(&self) -> String {
        self.parser.help()
    }

    /// Run the command and return the process exit code.
    pub fn run(&self, args: &[String]) -> i32 {
        match self.execute(args) {
            Ok(()) => exitcode::OK,
            Err(e) => {
                self.ui.error(&e.to_string());
                if e.wants_help_hint() {
                    self.ui.error("For additional help try 'aclboot --help'");
                }
                e.exit_code()
            }
        }
    }

    fn execute(&self, args: &[String]) -> CliResult<()> {
        let args = match self.parser.parse(args)? {
            Parsed::Args(args) => args,
            Parsed::Help(text) => {
                self.ui.output(&text);
                return Ok(());
            }
        };

        if !args.extra.is_empty() {
            return Err(CliError::InvalidArgs(
                "This command takes no arguments".to_string(),
            ));
        }

        if let Some(shell) = args.completion {
            self.ui.output(&completions(shell));
            return Ok(());
        }

        self.bootstrap(&args)
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(json = args.json, template = !args.template.is_empty())
    )]
    fn bootstrap(&self, args: &BootstrapArgs) -> CliResult<()> {
        let options = ClientOptions {
            address: args.address.clone(),
        };
        let client = self.clients.client(&options).map_err(CliError::ClientInit)?;

        let request = BootstrapRequest::new(args.bootstrap_token.as_str());
        debug!(
            "bootstrap: operator_authorized={}",
            request.is_operator_authorized()
        );
        let token = client.bootstrap(&request).map_err(CliError::Bootstrap)?;
        info!("ACL system bootstrapped: accessor_id={}", token.accessor_id);

        if args.json || !args.template.is_empty() {
            let out = format_output(args.json, &args.template, &token).map_err(CliError::Render)?;
            self.ui.output(&out);
            return Ok(());
        }

        self.ui.output(&format_kv(&format_token(&token)));
        Ok(())
    }
}

fn completions(shell: Shell) -> String {
    let mut cmd = BootstrapArgs::command();
    let name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, name, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
