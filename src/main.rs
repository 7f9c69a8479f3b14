use broker_console::console::{Command, Console, HELP};
use broker_console::utils::display::DisplayFormatter;
use broker_console::{AppContext, Cli, Config};
use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting broker console");

    let ctx = AppContext::new(Config::from(&cli))?;
    let display = DisplayFormatter::new();

    let connection_id = match cli.connection.clone() {
        Some(id) => Some(id),
        None => match ctx.connections.active().await {
            Ok(active) => active.map(|connection| connection.id),
            Err(e) => {
                warn!("Could not look up the active connection: {}", e);
                None
            }
        },
    };

    println!("=== Broker Console ===");
    println!("API: {}", ctx.config.base_url);
    match &connection_id {
        Some(id) => println!("Connection: {}", id),
        None => println!("No active connection, run 'connections' and 'use <id>'"),
    }
    println!("{}", HELP);

    let mut console = Console::new(&ctx, connection_id);
    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            debug!("Reached end of input");
            break;
        }

        let command = match Command::parse(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", display.format_error(&e.to_string()));
                continue;
            }
        };

        if command == Command::Exit {
            debug!("Received exit command");
            break;
        }

        match console.execute(&command).await {
            Ok(output) => println!("{}", output),
            Err(e) => {
                error!("{:?} failed: {}", command, e);
                println!("{}", display.format_error(&e.to_string()));
            }
        }
    }

    drop(console);
    ctx.shutdown().await;
    Ok(())
}
