use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use pixsearch::Opts;
use pixsearch::cli::SubCommandExtend;
use pixsearch::config::SubCommand;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let opts = Opts::parse();
    match &opts.subcmd {
        SubCommand::Add(cmd) => cmd.run(&opts).await,
        SubCommand::Search(cmd) => cmd.run(&opts).await,
        SubCommand::List(cmd) => cmd.run(&opts).await,
        SubCommand::Delete(cmd) => cmd.run(&opts).await,
        SubCommand::Server(cmd) => cmd.run(&opts).await,
    }
}
