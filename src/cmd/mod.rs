//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], [`validate`], or [`fetch`].
//! Each handler lives in its own submodule.

pub mod fetch;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::CalderaError;

pub async fn dispatch(cli: Cli) -> Result<(), CalderaError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Fetch(args)) => fetch::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  caldera v{version} \u{2014} single-endpoint HTTP service\n\n  \
         No command provided. To get started:\n\n    \
         caldera run                       Serve GET /thing (auto-detects ./caldera.yaml)\n    \
         caldera init                      Generate a starter config\n    \
         caldera fetch                     Call GET /thing on a running instance\n    \
         caldera --help                    See all commands and options\n"
    );
}
