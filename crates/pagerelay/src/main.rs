use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{info, warn, LevelFilter};
use tokio::io::{AsyncBufRead, BufReader};

use pagerdec::{Decoder, TimeBase};

mod app;
mod cli;
mod config;
mod sender;
mod transport;

use cli::{Args, CliError};
use config::{Config, ConfigFile};
use sender::{RetryPolicy, Sender};
use transport::HttpTransport;

fn main() {
    match pagerelay() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn pagerelay() -> Result<(), CliError> {
    // Parse options and start logging
    let args = Args::try_parse()?;
    log_setup(&args);

    // first run: write a starter configuration and stop
    let config = match Config::load_or_create(&args.config)? {
        ConfigFile::Loaded(config) => config,
        ConfigFile::Created(path) => {
            if !args.quiet {
                println!(
                    "Created configuration file \"{}\". Set your server's hostname and API key there, then run again.",
                    path.display()
                );
            }
            return Ok(());
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("unable to start async runtime")?;
    runtime.block_on(relay(&args, config))?;
    Ok(())
}

async fn relay(args: &Args, config: Config) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::new(&config)?);
    info!("relaying messages to \"{}\"", transport.endpoint());

    let sender = Sender::new(transport, RetryPolicy::default());
    let time_base = if args.utc {
        TimeBase::Utc
    } else {
        TimeBase::Local
    };
    let mut decoder = Decoder::new(config.decode_options(time_base));

    let input = file_setup(args).await?;
    let cfg = app::RunConfig {
        source: &config.identifier,
        quiet: args.quiet,
    };
    let result = app::run(&cfg, &mut decoder, &sender, input).await;

    // deliver what we have even if the input failed
    app::finish(&sender, app::on_signal(tokio::signal::ctrl_c())).await;

    result.context("unable to read input")?;
    Ok(())
}

fn log_setup(args: &Args) {
    if args.quiet {
        // no logging
        return;
    } else if std::env::var_os("RUST_LOG").is_none() {
        // parameter controls
        let log_filter = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        pretty_env_logger::formatted_builder()
            .filter_module("pagerdec", log_filter)
            .filter_module("pagerelay", log_filter)
            .init();
    } else {
        // environment controls
        pretty_env_logger::init();
    }
}

async fn file_setup(args: &Args) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if args.input_is_stdin() {
        info!("pagerelay reading standard input");
        if is_terminal(&std::io::stdin()) {
            warn!(
                "reading messages from a terminal.

Pipe the output of multimon-ng into this program."
            );
        }
        Ok(Box::new(BufReader::new(tokio::io::stdin())))
    } else {
        info!("pagerelay reading file: \"{}\"", &args.file);
        let file = tokio::fs::File::open(&args.file)
            .await
            .with_context(|| format!("Unable to open --file \"{}\"", args.file))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(not(target_os = "windows"))]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::fd::AsRawFd,
{
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn is_terminal<S>(stream: &S) -> bool
where
    S: std::os::windows::io::AsRawHandle,
{
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}
