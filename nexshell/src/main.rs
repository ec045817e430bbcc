use clap::Parser;
use nexshell::{Config, commands, config::Args, telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before anything else that might build a TLS client
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    telemetry::init_telemetry()?;

    let Some(command) = args.command else {
        anyhow::bail!("no command given; run `nexshell --help` for usage");
    };

    if let Err(e) = commands::run(command, &config).await {
        // Full detail to the logs, a short user-safe line to stderr
        tracing::debug!("command failed: {e:?}");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
