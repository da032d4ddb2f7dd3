use std::process::ExitCode;

use terraform_provider_dockhand::config::loader::{load_observability, process_env};
use terraform_provider_dockhand::observability::logging::init_logging;
use terraform_provider_dockhand::provider::DockhandProviderFactory;
use terraform_provider_dockhand::version::VERSION;
use terraform_provider_dockhand::{Bootstrap, BootstrapError, PluginServer};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging(&load_observability(process_env));

    tracing::debug!(version = VERSION, "terraform-provider-dockhand starting");

    let bootstrap = Bootstrap::new(
        VERSION,
        DockhandProviderFactory::default(),
        PluginServer::from_process_env(),
    );

    match bootstrap.run(std::env::args_os()).await {
        Ok(()) => ExitCode::SUCCESS,
        // Usage and help go to stderr; stdout carries only the handshake.
        Err(e @ BootstrapError::Arguments(_)) => {
            eprint!("{e}");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            eprintln!("Error: {}", e.diagnostic());
            ExitCode::from(e.exit_code())
        }
    }
}
