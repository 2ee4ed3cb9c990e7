// ABOUTME: Entry point for the greenfleet CLI application.
// ABOUTME: Parses arguments, wires the deployment engine and streams its output.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use greenfleet::config::{Config, normalize_instances};
use greenfleet::deploy::BlueGreener;
use greenfleet::error::Result;
use greenfleet::events::{
    DEPLOY_FAILURE, DEPLOY_FINISH, DEPLOY_START, DEPLOY_SUCCESS, EventManager,
    FOUNDATIONS_UNAVAILABLE, HandlerRegistry, LogHandler,
};
use greenfleet::precheck::Prechecker;
use greenfleet::push::CfPusherCreator;
use greenfleet::response::ResponseStream;
use greenfleet::types::{AppName, DeploymentInfo};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Response output owns stdout, logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("greenfleet=debug,info")
    } else {
        EnvFilter::new("greenfleet=info,warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            config,
            environment,
            org,
            space,
            app,
            path,
            manifest,
            instances,
            uuid,
            max_concurrency,
            cf,
        } => {
            let config = Config::load(&config)?;
            let environment = config.environment(&environment)?.clone();

            let mut info =
                DeploymentInfo::for_environment(&environment, AppName::new(&app)?, org, space)
                    .with_credentials(config.username.clone(), config.password.clone());
            info.app_path = path.clone();
            if let Some(instances) = instances {
                info.instances = normalize_instances(instances);
            }
            if let Some(uuid) = uuid {
                info.uuid = uuid;
            }
            if let Some(manifest) = manifest {
                info.manifest = std::fs::read_to_string(manifest)?;
            }

            let events = Arc::new(HandlerRegistry::new());
            for event_type in [
                FOUNDATIONS_UNAVAILABLE,
                DEPLOY_START,
                DEPLOY_SUCCESS,
                DEPLOY_FAILURE,
                DEPLOY_FINISH,
            ] {
                events.add_handler(Arc::new(LogHandler), event_type)?;
            }

            let prechecker = Prechecker::new(events.clone()).with_timeout(config.precheck_timeout);
            let blue_greener = BlueGreener::new(
                Arc::new(prechecker),
                Arc::new(CfPusherCreator::with_binary(cf)),
                events,
            )
            .with_max_concurrency(max_concurrency.or(config.max_concurrency));

            println!(
                "Deploying {} to {} ({} foundation(s))",
                info.app_name,
                environment.name,
                environment.foundations.len()
            );

            let response = ResponseStream::stdout();
            let diagnostics = blue_greener
                .push(&environment, &path, &info, &response)
                .await?;

            for warning in diagnostics.warnings() {
                eprintln!("Warning: {}", warning.message);
            }
            println!("Deployment complete!");
            Ok(())
        }
    }
}
