use clap::Parser;
use lintctl::{
    Cli, Commands, ContainerEngine, DockerEngine, LintError, ProductTable, RunState,
    env::ProcessEnv,
    handlers::{App, handle_images, handle_pull, handle_scan, handle_show_id},
    interrupt::{self, InterruptContext},
    logging, output,
    update::UpdateChecker,
};
use std::process::ExitCode;
use std::sync::Arc;

const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let engine: Option<Arc<dyn ContainerEngine>> = match &cli.command {
        Commands::Scan(_) | Commands::Pull(_) => match DockerEngine::connect() {
            Ok(engine) => Some(Arc::new(engine)),
            Err(e) => {
                output::error(&LintError::EngineUnavailable(e).to_string());
                return ExitCode::FAILURE;
            }
        },
        Commands::Images | Commands::ShowId(_) => None,
    };

    let state = Arc::new(RunState::new());
    if let Err(e) = interrupt::install(InterruptContext {
        engine: engine.clone(),
        state: state.clone(),
        updates: UpdateChecker::default(),
        cli_version: CLI_VERSION.to_string(),
    }) {
        output::error(&LintError::Signals(e).to_string());
        return ExitCode::FAILURE;
    }

    let app = App {
        products: Arc::new(ProductTable::current()),
        env: Arc::new(ProcessEnv),
        state,
        engine,
        cli_version: CLI_VERSION.to_string(),
        interactive: output::is_interactive(),
    };

    match &cli.command {
        Commands::Scan(args) => handle_scan(&app, args).await,
        Commands::Pull(args) => handle_pull(&app, args).await,
        Commands::Images => handle_images(&app),
        Commands::ShowId(args) => handle_show_id(&app, args),
    }
}
