mod commands;
mod terminal;

use commands::{CommandLine, discover};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;

    let cfg = commands.to_config();
    discover::discover(&commands.addresses, &cfg).await
}
