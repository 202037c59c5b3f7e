mod commands;
mod terminal;

use commands::{CommandLine, Commands, device, run, sweep, who};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init();

    match commands.command {
        Commands::Run(probe) => run::run(commands.registry, probe.to_config()).await,
        Commands::Who => who::who(commands.registry).await,
        Commands::Sweep { subnet, probe } => sweep::sweep(&subnet, probe.to_config()).await,
        Commands::Add {
            name,
            lladdr,
            network,
        } => device::add(commands.registry, name, &lladdr, &network).await,
        Commands::Remove { name } => device::remove(commands.registry, &name).await,
    }
}
