use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskdesk::cli::Cli::parse();
    let config = taskdesk::config::from_cli(&cli)?;

    match cli.command.clone() {
        Some(taskdesk::cli::CliCommand::Tui(args)) => run_tui(&cli, &config, &args.route)?,
        None => run_tui(&cli, &config, &taskdesk::cli::TuiArgs::default().route)?,
        Some(command) => {
            taskdesk::config::init_stderr_tracing(&cli)?;
            let api = taskdesk::config::connect(&cli, &config)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            taskdesk::commands::execute(api.as_ref(), command, &mut handle)?;
        }
    }

    Ok(())
}

fn run_tui(cli: &taskdesk::cli::Cli, config: &taskdesk::ApiConfig, path: &str) -> Result<()> {
    taskdesk::config::init_tui_tracing(cli)?;
    let api = taskdesk::config::connect(cli, config)?;
    taskdesk::tui::run(api, taskdesk::Route::parse(path))
}
