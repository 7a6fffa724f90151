mod commands;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, distribute, networks, registry};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    let mut cfg = commands.config();

    match commands.command {
        Commands::Distribute {
            symbol,
            confirmations,
            delay_ms,
            seed,
        } => {
            cfg.confirmations = confirmations;
            cfg.transfer_delay = Duration::from_millis(delay_ms);
            cfg.seed = seed;
            print::header("getting ready for distribution");
            distribute::distribute(symbol, &cfg).await
        }
        Commands::Networks => {
            print::header("target networks");
            networks::networks(&cfg)
        }
        Commands::Registry { symbol } => {
            print::header("deployment registry");
            registry::registry(symbol.as_deref(), &cfg)
        }
    }
}
