//! PHPCoin name registrar command line
//!
//! Search, register and manage `.phpcoin` names from a terminal. Signing is
//! delegated to an external signer program.

mod external_signer;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use external_signer::ExternalSigner;
use registrar_core::{DnsTarget, Domain, PrivateKey};
use registrar_service::{Registrar, ServiceConfig, TransactionOutcome};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable holding a private key for `login`
const PRIVATE_KEY_ENV: &str = "REGISTRAR_PRIVATE_KEY";

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "PHPCoin name service registrar", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// External signer program
    #[arg(short, long, global = true, env = "REGISTRAR_SIGNER", default_value = "phpcoin-signer")]
    signer: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Registry reachability, counters and trending names
    Status,

    /// Look up a name
    Search {
        /// Name, with or without extension
        name: String,
    },

    /// Log in with a private key read from stdin or REGISTRAR_PRIVATE_KEY
    Login,

    /// Forget the stored wallet
    Logout,

    /// Balance and owned names of the active wallet
    Account,

    /// Register a name
    Register {
        /// Name to register
        name: String,
    },

    /// Point a name at a new target
    SetDns {
        /// Owned name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Hand a name to another wallet
    Transfer {
        /// Owned name
        name: String,

        /// Recipient address
        recipient: String,
    },

    /// Release a name for a partial refund
    Unregister {
        /// Owned name
        name: String,
    },

    /// Registration price and refund for a name
    Quote {
        /// Name, with or without extension
        name: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TargetArgs {
    /// IP address
    #[arg(long)]
    ip: Option<String>,

    /// IPFS content id
    #[arg(long)]
    ipfs: Option<String>,

    /// Redirect URL
    #[arg(long)]
    redirect: Option<String>,

    /// Remove the current target
    #[arg(long)]
    clear: bool,
}

impl TargetArgs {
    fn into_target(self) -> anyhow::Result<DnsTarget> {
        let target = match (self.ip, self.ipfs, self.redirect) {
            (Some(ip), _, _) => DnsTarget::ip(&ip)?,
            (_, Some(cid), _) => DnsTarget::ipfs(&cid)?,
            (_, _, Some(url)) => DnsTarget::redirect(&url)?,
            _ if self.clear => DnsTarget::None,
            _ => bail!("Choose one of --ip, --ipfs, --redirect or --clear"),
        };
        Ok(target)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow!(e.user_message()))?;
    let signer = Arc::new(ExternalSigner::new(cli.signer));
    let registrar = Registrar::open(&config, signer).map_err(|e| anyhow!(e.user_message()))?;
    debug!("Using registry on {}", registrar.network().name);

    match cli.command {
        Commands::Status => run_status(&registrar).await,
        Commands::Search { name } => run_search(&registrar, &name).await,
        Commands::Login => run_login(&registrar).await,
        Commands::Logout => {
            registrar.logout().map_err(|e| anyhow!(e.user_message()))?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Account => run_account(&registrar).await,
        Commands::Register { name } => {
            let outcome = registrar.register(&name).await;
            finish(&registrar, outcome).await
        }
        Commands::SetDns { name, target } => {
            let target = target.into_target()?;
            let outcome = registrar.update_dns(&name, target).await;
            finish(&registrar, outcome).await
        }
        Commands::Transfer { name, recipient } => {
            let outcome = registrar.transfer(&name, &recipient).await;
            finish(&registrar, outcome).await
        }
        Commands::Unregister { name } => {
            let outcome = registrar.unregister(&name).await;
            finish(&registrar, outcome).await
        }
        Commands::Quote { name } => {
            let quote = registrar.quote(&name).map_err(|e| anyhow!(e.user_message()))?;
            println!("{}", quote.name);
            println!("  registration: {} PHP", quote.registration);
            println!("  refund:       {} PHP", quote.refund);
            Ok(())
        }
    }
}

async fn run_status(registrar: &Registrar) -> anyhow::Result<()> {
    let boot = registrar.bootstrap().await;
    println!("Registry: {}", boot.status);
    let source = if boot.derived { " (local estimate)" } else { "" };
    println!("Domains:  {}{}", boot.stats.total_domains, source);
    println!("Funds:    {} PHP{}", boot.stats.total_funds, source);
    if !boot.trending.is_empty() {
        println!("Trending: {}", boot.trending.join(", "));
    }
    Ok(())
}

async fn run_search(registrar: &Registrar, query: &str) -> anyhow::Result<()> {
    registrar.bootstrap().await;
    let domain = registrar
        .search(query)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    print_domain(registrar, &domain);
    Ok(())
}

async fn run_login(registrar: &Registrar) -> anyhow::Result<()> {
    let key = match std::env::var(PRIVATE_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("Private key:");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Cannot read private key")?;
            line
        }
    };

    let address = registrar
        .login(PrivateKey::new(key))
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Logged in as {}", address);
    println!("{}", registrar.network().address_url(&address));
    Ok(())
}

async fn run_account(registrar: &Registrar) -> anyhow::Result<()> {
    let info = registrar
        .refresh_account()
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Balance: {} PHP", info.balance);

    let owned = registrar.owned_domains();
    if owned.is_empty() {
        println!("No domains.");
    }
    for domain in owned {
        print_domain(registrar, &domain);
    }
    Ok(())
}

fn print_domain(registrar: &Registrar, domain: &Domain) {
    println!("{} [{}]", domain.name, domain.status);
    if let Some(owner) = &domain.owner {
        println!("  owner:   {}", owner);
    }
    if let Some(created) = &domain.created {
        println!("  created: {}", created);
    }
    if let Some(price) = domain.price {
        println!("  price:   {} PHP", price);
    }
    if let Some(site) = domain.dns_target().linked_site() {
        println!("  site:    {}", site);
    }
    if let Some(tx) = &domain.transaction_id {
        println!("  tx:      {}", registrar.network().tx_url(tx));
    }
}

/// Report a workflow result once the follow-up account refresh has landed
async fn finish(
    registrar: &Registrar,
    outcome: registrar_service::Result<TransactionOutcome>,
) -> anyhow::Result<()> {
    let outcome = outcome.map_err(|e| anyhow!(e.user_message()))?;
    registrar.settle().await;
    info!("Account refreshed after {}", outcome.operation);

    println!("Submitted {} of {}", outcome.operation, outcome.name);
    println!("{}", registrar.network().tx_url(&outcome.transaction_id));
    Ok(())
}
