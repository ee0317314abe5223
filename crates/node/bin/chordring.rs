use std::process;

use chordring_core::dht::Ring;
use chordring_node::config::Config;
use chordring_node::config::DEFAULT_CONFIG_PATH;
use chordring_node::logging::init_logging;
use chordring_node::logging::LogLevel;
use chordring_node::report::LookupReport;
use chordring_node::report::NodeReport;
use chordring_node::util::build_version;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, value_enum, env)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a default configuration file.")]
    Init(InitCommand),
    #[command(about = "Resolves the owner of each key.")]
    Lookup(LookupCommand),
    #[command(about = "Shows members with their predecessor, successor and finger table.")]
    Inspect(InspectCommand),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(
        long,
        short = 'c',
        env = "CHORDRING_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Config file location"
    )]
    pub config: String,

    #[arg(
        long = "node",
        short = 'n',
        help = "Ring member name, repeatable. Overrides nodes in config file"
    )]
    pub nodes: Vec<String>,

    #[arg(long, help = "Hop ceiling of a lookup. Overrides max_hops in config file")]
    pub max_hops: Option<usize>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::read_fs_or_default(&self.config)?;
        if !self.nodes.is_empty() {
            config.nodes = self.nodes.clone();
        }
        if let Some(max_hops) = self.max_hops {
            config.max_hops = max_hops;
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "The location of config file"
    )]
    pub location: String,
}

#[derive(Args, Debug)]
struct LookupCommand {
    #[command(flatten)]
    config_args: ConfigArgs,

    #[arg(long, help = "Member to start the finger table walk from. Defaults to the first")]
    pub from: Option<String>,

    #[arg(required = true)]
    pub keys: Vec<String>,
}

#[derive(Args, Debug)]
struct InspectCommand {
    #[command(flatten)]
    config_args: ConfigArgs,
}

fn build(config: &Config) -> anyhow::Result<Ring> {
    let ring = config.build_ring()?;
    tracing::info!("ring built with {} members", ring.len()?);
    Ok(ring)
}

fn lookup(args: LookupCommand) -> anyhow::Result<bool> {
    let config = args.config_args.load()?;
    let ring = build(&config)?;
    let origin = match args.from {
        Some(name) => Config::find_member(&ring, &name)?,
        None => Config::find_member(&ring, &config.nodes[0])?,
    };

    let mut consistent = true;
    for key in args.keys.iter() {
        let report = LookupReport::lookup(&ring, config.router_config(), &origin, key)?;
        consistent &= report.is_consistent();
        println!("{}", report);
    }
    Ok(consistent)
}

fn inspect(args: InspectCommand) -> anyhow::Result<()> {
    let config = args.config_args.load()?;
    let ring = build(&config)?;
    for report in NodeReport::inspect_ring(&ring)? {
        println!("{}", report);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The flag wins over the config file.
    let config_path = match &cli.command {
        Command::Lookup(args) => Some(&args.config_args.config),
        Command::Inspect(args) => Some(&args.config_args.config),
        Command::Init(_) => None,
    };
    let file_level = config_path
        .and_then(|p| Config::read_fs_or_default(p).ok())
        .and_then(|c| c.log_level);
    init_logging(cli.log_level.or(file_level).unwrap_or(LogLevel::Info));
    tracing::debug!("chordring {}", build_version());

    match cli.command {
        Command::Init(args) => {
            let path = Config::default().write_fs(&args.location)?;
            println!("Your config file has saved to: {}", path);
        }
        Command::Lookup(args) => {
            if !lookup(args)? {
                process::exit(2);
            }
        }
        Command::Inspect(args) => inspect(args)?,
    }
    Ok(())
}
