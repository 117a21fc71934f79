//! atlasresp CLI Client
//!
//! Command-line interface for talking to a Redis server.

use clap::{Parser, Subcommand, ValueEnum};
use atlasresp::{Client, Config, Expiry, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// atlasresp CLI
#[derive(Parser, Debug)]
#[command(name = "atlasresp-cli")]
#[command(about = "CLI for Redis over the atlasresp client")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Get several values at once
    Mget {
        /// The keys to get
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete one or more keys
    Del {
        /// The keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List keys matching a glob pattern
    Keys {
        /// Pattern (`*` any run, `?` any one character)
        #[arg(default_value = "*")]
        pattern: String,
    },

    /// Expire a key after a duration
    Expire {
        key: String,
        amount: i64,
        #[arg(short, long, value_enum, default_value = "seconds")]
        unit: Unit,
    },

    /// Expire a key at a Unix-epoch time
    ExpireAt {
        key: String,
        timestamp: i64,
        #[arg(short, long, value_enum, default_value = "seconds")]
        unit: Unit,
    },

    /// Remaining TTL in seconds
    Ttl { key: String },

    /// Remaining TTL in milliseconds
    Pttl { key: String },

    /// Remove a key's expiry
    Persist { key: String },

    /// Ping the server
    Ping,

    /// Send an arbitrary command
    Raw {
        /// Command name followed by its arguments
        #[arg(required = true)]
        args: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Unit {
    Ms,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl Unit {
    fn expiry(self, amount: i64) -> Expiry {
        match self {
            Unit::Ms => Expiry::Milliseconds(amount),
            Unit::Seconds => Expiry::Seconds(amount),
            Unit::Minutes => Expiry::Minutes(amount),
            Unit::Hours => Expiry::Hours(amount),
            Unit::Days => Expiry::Days(amount),
            Unit::Weeks => Expiry::Weeks(amount),
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlasresp=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("(error) {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> atlasresp::Result<()> {
    let config = Config::builder()
        .server_addr(&args.server)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build()?;

    tracing::debug!("Connecting to {}", config.server_addr);
    let mut client = Client::connect(&config)?;

    match args.command {
        Commands::Get { key } => println!("{}", client.get(&key)?),
        Commands::Mget { keys } => {
            for (i, value) in client.get_many(&keys)?.iter().enumerate() {
                println!("{}) {}", i + 1, value);
            }
        }
        Commands::Set { key, value } => {
            client.set(&key, value)?;
            println!("OK");
        }
        Commands::Del { keys } => println!("(integer) {}", client.delete(&keys)?),
        Commands::Keys { pattern } => {
            for key in client.list_keys(&pattern)? {
                println!("{}", key);
            }
        }
        Commands::Expire { key, amount, unit } => {
            println!("{}", client.expire_after(&key, unit.expiry(amount))?)
        }
        Commands::ExpireAt { key, timestamp, unit } => {
            println!("{}", client.expire_at(&key, unit.expiry(timestamp))?)
        }
        Commands::Ttl { key } => println!("(integer) {}", client.ttl(&key)?),
        Commands::Pttl { key } => println!("(integer) {}", client.pttl(&key)?),
        Commands::Persist { key } => println!("{}", client.persist(&key)?),
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
        Commands::Raw { args } => {
            let request = Value::Array(args.into_iter().map(Value::BulkString).collect());
            match client.send(&request)? {
                Value::Error(message) => println!("(error) {}", message),
                value => println!("{}", value),
            }
        }
    }

    client.quit()
}
