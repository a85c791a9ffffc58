//! CLI for cluster file operations

use clap::{Parser, Subcommand};
use miniweed::{ClientConfig, FileId, WeedFs};
use std::io::Write;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "miniweed")]
#[command(about = "miniweed blob store client")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $MINIWEED_CONFIG, then ./miniweed.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Master host
    #[arg(long, global = true)]
    master: Option<String>,

    /// Master port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a volume id (or file id) to a volume server
    Locate {
        /// Volume id, e.g. `3`, or file id, e.g. `3,01637037d6`
        volume: String,

        /// Number of resolutions to print (shows replica spreading)
        #[arg(long, default_value = "1")]
        repeat: usize,
    },

    /// Download a file
    Get {
        /// File id
        fid: String,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fetch a square JPEG thumbnail of this size
        #[arg(long)]
        thumbnail: Option<NonZeroU32>,
    },

    /// Upload a file
    Put {
        /// File path
        file: PathBuf,

        /// Stored file name (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,

        /// Target collection
        #[arg(long)]
        collection: Option<String>,
    },

    /// Delete a collection
    DropCollection {
        /// Collection name
        collection: String,
    },

    /// Allocate more volumes for a collection
    GrowCollection {
        /// Collection name
        collection: String,

        /// Number of volumes to add
        #[arg(long, default_value = "1")]
        count: NonZeroU32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(master) = cli.master {
        config.master_addr = master;
    }
    if let Some(port) = cli.port {
        config.master_port = port;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let fs = WeedFs::new(&config)?;
    tracing::debug!("Using {}", fs);

    if let Err(e) = run(&fs, cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(fs: &WeedFs, command: Commands) -> miniweed::Result<()> {
    match command {
        Commands::Locate { volume, repeat } => {
            let volume_id = if volume.contains(',') {
                volume.parse::<FileId>()?.volume_id()
            } else {
                volume.parse()?
            };
            for _ in 0..repeat.max(1) {
                println!("{}", fs.locate(volume_id).await?);
            }
        }

        Commands::Get {
            fid,
            output,
            thumbnail,
        } => {
            let data = fs.get(&fid, thumbnail).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &data).await?;
                    println!("Wrote {} bytes to {}", data.len(), path.display());
                }
                None => std::io::stdout().write_all(&data)?,
            }
        }

        Commands::Put {
            file,
            name,
            collection,
        } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| {
                        miniweed::Error::InvalidArgument(format!(
                            "cannot derive a file name from {}",
                            file.display()
                        ))
                    })?,
            };
            let data = tokio::fs::read(&file).await?;
            let fid = fs.put(data, &name, collection.as_deref()).await?;
            println!("{}", fid);
        }

        Commands::DropCollection { collection } => {
            fs.drop_collection(&collection).await?;
            println!("Dropped collection {}", collection);
        }

        Commands::GrowCollection { collection, count } => {
            fs.grow_collection(&collection, count).await?;
            println!("Grew collection {} by {}", collection, count);
        }
    }

    Ok(())
}
