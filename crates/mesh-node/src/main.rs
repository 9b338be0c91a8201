use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mesh_core::Address;
use mesh_node::{Node, NodeConfig, dump, logging};

#[derive(Parser)]
#[command(name = "mesh-node", about = "Mesh VPN node subnet routing")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/mesh/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every known subnet and its owner
    Dump {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show which route owns an address
    Lookup {
        /// IPv4, IPv6 or MAC address
        address: String,
    },
    /// Run subnet-up for every known subnet
    Up,
    /// Run subnet-down for every known subnet
    Down,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match NodeConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config from {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        logging::init_json(&config.logging.level);
    } else {
        logging::init(&config.logging.level);
    }

    let mut node = match Node::from_config(&config) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("failed to initialize node: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Dump { json: false } => print!("{}", dump::dump_subnets(node.table())),
        Command::Dump { json: true } => match dump::dump_json(node.table()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to render dump: {e}");
                std::process::exit(1);
            }
        },
        Command::Lookup { address } => {
            let address: Address = match address.parse() {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("invalid address '{address}': {e}");
                    std::process::exit(1);
                }
            };
            match node.lookup(&address) {
                Some(route) => println!("{} owner {}", route.subnet(), route.owner()),
                None => println!("no route"),
            }
        }
        Command::Up => run_scripts(&node, true).await,
        Command::Down => run_scripts(&node, false).await,
    }
}

async fn run_scripts(node: &Node, up: bool) {
    match node.run_subnet_scripts(up).await {
        Ok(ran) => tracing::info!(ran, up, "subnet scripts finished"),
        Err(e) => {
            tracing::error!("subnet scripts failed: {e}");
            std::process::exit(1);
        }
    }
}
