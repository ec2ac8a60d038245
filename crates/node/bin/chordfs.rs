use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chordfs_node::logging::init_logging;
use chordfs_node::logging::LogLevel;
use chordfs_node::native::config::Config;
use chordfs_node::native::config::StorageKind;
use chordfs_node::native::config::DEFAULT_CONFIG_PATH;
use chordfs_node::native::endpoint::advertised_address;
use chordfs_node::native::endpoint::bind;
use chordfs_node::native::endpoint::run_http_api;
use chordfs_node::prelude::chordfs_core::dht::Did;
use chordfs_node::prelude::chordfs_rpc::types::*;
use chordfs_node::prelude::Client;
use chordfs_node::processor::ProcessorBuilder;
use chordfs_node::processor::ProcessorConfig;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    #[command(about = "Writes a default configuration file.")]
    Init(InitCommand),
    #[command(about = "Starts a long-running node daemon.")]
    Run(RunCommand),
    #[command(about = "Makes the node join the ring of an introducer.")]
    Join(JoinCommand),
    #[command(about = "Makes the node hand its files over and leave the ring.")]
    Leave(ClientArgs),
    #[command(about = "Shows identifier, state, successor and predecessor of the node.")]
    Info(ClientArgs),
    #[command(about = "Shows the finger table of the node.")]
    Fingers(ClientArgs),
    #[command(about = "Shows the keys and filenames the node stores.")]
    Files(ClientArgs),
    #[command(about = "Finds the node responsible for a key.")]
    Lookup(LookupCommand),
    #[command(about = "Prints the key of a name or an address.")]
    Hash(HashCommand),
    #[command(about = "Stores a local file on the node owning its name.")]
    Upload(UploadCommand),
    #[command(about = "Fetches a file from the node owning its name.")]
    Retrieve(RetrieveCommand),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(
        long,
        short = 'c',
        env,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Config file location"
    )]
    pub config: String,
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
struct RunCommand {
    #[arg(
        long,
        short = 'b',
        help = "Listen address. If not provided, use bind_addr in config file or 127.0.0.1:50000",
        env
    )]
    pub bind_addr: Option<String>,

    #[arg(
        long,
        help = "Address advertised to other nodes. If not provided, use external_addr in config file or the bound address",
        env
    )]
    pub external_addr: Option<String>,

    #[arg(
        long,
        help = "Storage files location. If not provided, use data_dir in config file or ~/.chordfs/data",
        env
    )]
    pub data_dir: Option<String>,

    #[arg(long, value_enum, help = "Storage backend of owned files", env)]
    pub storage: Option<StorageKind>,

    #[arg(long, help = "Seconds before a remote call gives up", env)]
    pub rpc_timeout: Option<u64>,

    #[arg(long, short = 'i', help = "Join the ring of this node after start-up", env)]
    pub introducer: Option<String>,

    #[arg(long, help = "Stay in the ring on ctrl-c instead of leaving it")]
    pub no_leave_on_shutdown: bool,

    #[command(flatten)]
    config_args: ConfigArgs,
}

#[derive(Args, Debug)]
struct ClientArgs {
    #[arg(
        long,
        short = 'u',
        help = "chordfs-node endpoint url. If not provided, use endpoint_url in config file or http://127.0.0.1:50000",
        env
    )]
    endpoint_url: Option<String>,

    #[command(flatten)]
    config_args: ConfigArgs,
}

impl ClientArgs {
    fn new_client(&self) -> anyhow::Result<Client> {
        let endpoint_url = match &self.endpoint_url {
            Some(url) => url.clone(),
            None => Config::read_fs_or_default(self.config_args.config.as_str())?.endpoint_url,
        };
        Ok(Client::new(&endpoint_url))
    }
}

#[derive(Args, Debug)]
struct JoinCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    introducer: String,
}

#[derive(Args, Debug)]
struct LookupCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    #[arg(long, help = "Follow successor pointers only")]
    basic: bool,

    #[arg(help = "Key in [0, 2^20)")]
    key: Did,
}

#[derive(Args, Debug)]
struct HashCommand {
    name: String,
}

#[derive(Args, Debug)]
struct UploadCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    #[arg(long, help = "Name stored in the ring. Defaults to the file name of the path")]
    name: Option<String>,

    path: PathBuf,
}

#[derive(Args, Debug)]
struct RetrieveCommand {
    #[command(flatten)]
    client_args: ClientArgs,

    #[arg(long, short = 'o', help = "Write the content here instead of stdout")]
    output: Option<PathBuf>,

    name: String,
}

fn get_value<V>(value: Option<V>, default_value: V) -> V {
    value.unwrap_or(default_value)
}

async fn daemon_run(args: RunCommand) -> anyhow::Result<()> {
    let c = Config::read_fs_or_default(args.config_args.config.as_str())?;
    let c = Config {
        bind_addr: get_value(args.bind_addr, c.bind_addr),
        external_addr: args.external_addr.or(c.external_addr),
        data_dir: get_value(args.data_dir, c.data_dir),
        storage: get_value(args.storage, c.storage),
        rpc_timeout: get_value(args.rpc_timeout, c.rpc_timeout),
        introducer: args.introducer.or(c.introducer),
        leave_on_shutdown: c.leave_on_shutdown && !args.no_leave_on_shutdown,
        ..c
    };

    let listener = bind(&c.bind_addr)?;
    let address = advertised_address(&listener, c.external_addr.as_deref())?;
    let processor_config = ProcessorConfig::try_from(&c)?;
    let processor = Arc::new(ProcessorBuilder::from_config(&address, &processor_config).build()?);
    println!("Address: {}", processor.address());
    println!("Did: {}", processor.did());

    if let Some(introducer) = c.introducer.clone() {
        let processor = processor.clone();
        tokio::spawn(async move {
            if let Err(e) = processor.join(&introducer).await {
                tracing::error!("failed to join {}: {}", introducer, e);
            }
        });
    }

    let leave_on_shutdown = c.leave_on_shutdown;
    let shutdown = {
        let processor = processor.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            if leave_on_shutdown {
                if let Err(e) = processor.leave().await {
                    tracing::error!("failed to leave: {}", e);
                }
            }
        }
    };

    run_http_api(listener, processor.clone(), shutdown).await?;
    processor.shutdown().await;
    Ok(())
}

async fn upload(args: UploadCommand) -> anyhow::Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => args
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("{:?} has no file name", args.path))?,
    };
    let content = Bytes::from(tokio::fs::read(&args.path).await?);

    let did = Did::hash(&name);
    let owner = args
        .client_args
        .new_client()?
        .lookup(&LookupRequest { did })
        .await?;
    Client::new(&endpoint_url(&owner.address))
        .upload_file(&UploadFileRequest {
            did,
            filename: name.clone(),
            content,
        })
        .await?;
    println!("{} stored under key {} on {}", name, did, owner);
    Ok(())
}

async fn retrieve(args: RetrieveCommand) -> anyhow::Result<()> {
    let did = Did::hash(&args.name);
    let owner = args
        .client_args
        .new_client()?
        .lookup(&LookupRequest { did })
        .await?;
    let file = Client::new(&endpoint_url(&owner.address))
        .retrieve_file(&RetrieveFileRequest {
            did,
            filename: args.name.clone(),
        })
        .await?;
    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &file.content).await?;
            println!("{} retrieved from {} into {:?}", args.name, owner, path);
        }
        None => println!("{}", String::from_utf8_lossy(&file.content)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Command::Init(args) => {
            let path = Config::default().write_fs(args.location.as_str())?;
            println!("Your config file has saved to: {}", path);
            Ok(())
        }
        Command::Run(args) => daemon_run(args).await,
        Command::Join(args) => {
            let report = args
                .client_args
                .new_client()?
                .join(&JoinRequest {
                    introducer: args.introducer,
                })
                .await?;
            for (step, outcome) in report.steps {
                println!("{:?}: {:?}", step, outcome);
            }
            Ok(())
        }
        Command::Leave(args) => {
            let report = args.new_client()?.leave().await?;
            for (step, outcome) in report.steps {
                println!("{:?}: {:?}", step, outcome);
            }
            Ok(())
        }
        Command::Info(args) => {
            let info = args.new_client()?.node_info().await?;
            let show = |p: Option<&chordfs_node::prelude::Peer>| {
                p.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
            };
            println!("Node:        {}", info.dht.peer);
            println!("State:       {:?}", info.dht.state);
            println!("Successor:   {}", show(info.dht.successor.as_ref()));
            println!("Predecessor: {}", show(info.dht.predecessor.as_ref()));
            println!(
                "Stabilizer:  pending {}, forwarded {}, failed {}",
                info.stabilizer.pending, info.stabilizer.forwarded, info.stabilizer.failed
            );
            Ok(())
        }
        Command::Fingers(args) => {
            let info = args.new_client()?.node_info().await?;
            for finger in info.dht.finger_table {
                println!("{:>2} {:>7} {}", finger.index, finger.start, finger.peer);
            }
            Ok(())
        }
        Command::Files(args) => {
            let info = args.new_client()?.node_info().await?;
            for file in info.files {
                println!("{:>7} {}", file.did, file.filename);
            }
            Ok(())
        }
        Command::Lookup(args) => {
            let client = args.client_args.new_client()?;
            let owner = if args.basic {
                client
                    .lookup_basic(&LookupBasicRequest { did: args.key })
                    .await?
            } else {
                client.lookup(&LookupRequest { did: args.key }).await?
            };
            println!("{}", owner);
            Ok(())
        }
        Command::Hash(args) => {
            println!("{}", Did::hash(&args.name));
            Ok(())
        }
        Command::Upload(args) => upload(args).await,
        Command::Retrieve(args) => retrieve(args).await,
    }
}
