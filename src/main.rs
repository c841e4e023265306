use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidgate::{
    catalog::{CatalogService, ProxyCatalogClient},
    gate::GateClient,
    inject,
    models::{MediaKind, PlaybackRequest},
    policy::{NavigationPolicy, ScreenProfile},
    servers::Server,
    SandboxConfig,
};

/// Diagnostic CLI for the playback sandbox: build player URLs, evaluate
/// policy decisions, poke the catalog proxy and the feature gate.
#[derive(Parser)]
#[command(name = "vidgate")]
#[command(version = "0.1.0")]
#[command(about = "Embedded-player sandbox diagnostics")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Series => MediaKind::Series,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Embedded,
    Fullscreen,
}

impl From<ProfileArg> for ScreenProfile {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Embedded => ScreenProfile::Embedded,
            ProfileArg::Fullscreen => ScreenProfile::Fullscreen,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the player URL every configured server would load
    Urls {
        #[arg(long)]
        media_id: u64,
        #[arg(long, value_enum, default_value_t = KindArg::Movie)]
        kind: KindArg,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value_t = 1)]
        season: u32,
        #[arg(long, default_value_t = 1)]
        episode: u32,
    },
    /// Evaluate one navigation-policy decision
    Decide {
        #[arg(long)]
        candidate: String,
        #[arg(long)]
        origin: String,
        #[arg(long, value_enum, default_value_t = ProfileArg::Fullscreen)]
        profile: ProfileArg,
    },
    /// Print the injected script payloads
    Scripts,
    /// Fetch one season from the catalog proxy and print episode ids
    Season {
        #[arg(long)]
        media_id: u64,
        #[arg(long)]
        season: u32,
    },
    /// Check the remote feature gate
    Gate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vidgate={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::env::set_var("CONFIG_FILE", &cli.config);
    let config = SandboxConfig::load()?;
    info!("configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Urls {
            media_id,
            kind,
            title,
            season,
            episode,
        } => {
            let request = PlaybackRequest {
                media_id,
                kind: kind.into(),
                title,
                season: Some(season),
                episode: Some(episode),
            };
            for server in Server::ALL {
                println!(
                    "{:<10} {:<12} {}",
                    server.key(),
                    server.label(),
                    server.player_url(&request, season, episode, None)
                );
            }
        }
        Command::Decide {
            candidate,
            origin,
            profile,
        } => {
            let policy = NavigationPolicy::new(profile.into(), &config);
            println!("{:?}", policy.decide(&candidate, &origin));
        }
        Command::Scripts => {
            let scripts = inject::build_scripts(&config.filtering, &config.cleanup);
            println!("// pre-load (v{})\n{}\n", inject::PATCHER_VERSION, scripts.pre_load);
            println!("// post-load (v{})\n{}", inject::PATCHER_VERSION, scripts.post_load);
        }
        Command::Season { media_id, season } => {
            let client = ProxyCatalogClient::new(config.proxy.base_url.clone());
            let details = client.season(media_id, season).await?;
            println!("season id: {}", details.id);
            for episode in details.episodes {
                println!("  e{:<3} id {}", episode.episode_number, episode.id);
            }
        }
        Command::Gate => {
            let client = GateClient::new(config.gate.clone());
            println!("{:?}", client.check().await);
        }
    }

    Ok(())
}
