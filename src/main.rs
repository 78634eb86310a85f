use predeploy_registry::cli::Cli;
use predeploy_registry::compiler::ArtifactCompiler;
use predeploy_registry::output;
use predeploy_registry::pipeline;

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

/// Main entry point for the generator
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the default `info` level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
    }

    let config = cli.generate_config();
    output::print_banner(&config.root, config.compile);

    let mut compiler = ArtifactCompiler::new(&config.root, &cli.build_dir);
    if let Some(command) = cli.compile_cmd.clone() {
        compiler = compiler.with_command(command);
    }

    let report = match pipeline::run(&config, &compiler).await {
        Ok(report) => report,
        Err(err) => {
            output::print_error(&err);
            return Err(err).wrap_err("predeploy generation failed");
        }
    };

    output::print_registry(&report.registry);
    output::print_written("Specialized token contracts:", &config.root, &report.sources);
    output::print_written("Emitted artifacts:", &config.root, &report.outputs);
    output::print_done(report.registry.len());

    Ok(())
}
