use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use heartline_core::{CharacterId, CharacterProfile, HeartlineConfig, PairKey, PlayerId, Roster};
use heartline_dialogue::{build_provider, ConversationService};
use heartline_memory::JsonFileStore;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod render;
mod repl;

#[derive(Parser, Debug)]
#[command(name = "heartline", author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long, env = "HEARTLINE_CONFIG", default_value = "heartline.toml")]
    config: PathBuf,

    /// Directory holding the save files (overrides the config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use the static dialogue tables even when an AI key is configured
    #[arg(long)]
    offline: bool,

    /// Player the saves belong to
    #[arg(short, long, env = "HEARTLINE_PLAYER", default_value = "player")]
    player: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation with one character
    Chat { character: CharacterId },

    /// Send a single message and print the reply
    Say {
        character: CharacterId,
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Relationship status with one character, or all of them
    Status { character: Option<CharacterId> },

    /// List the characters in the roster
    Characters,

    /// Show the content unlocked with a character
    Unlocks { character: CharacterId },

    /// Show recent dialogue with a character
    History {
        character: CharacterId,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Forget a relationship (or every relationship with --all)
    Reset {
        #[arg(required_unless_present = "all")]
        character: Option<CharacterId>,
        #[arg(long)]
        all: bool,
    },

    /// Show what an exchange would do without saving anything
    Preview {
        character: CharacterId,
        message: String,
        /// The character's reply to score
        #[arg(long, default_value = "")]
        reply: String,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heartline=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_roster(config: &HeartlineConfig) -> Result<Roster> {
    match &config.roster.path {
        Some(path) => Roster::load(path)
            .with_context(|| format!("Failed to load roster {}", path.display())),
        None => Ok(Roster::builtin()?),
    }
}

fn profile(roster: &Roster, character: CharacterId) -> Result<&CharacterProfile> {
    roster
        .get(character)
        .with_context(|| format!("{} is not in the roster", character))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    let args = Args::parse();

    let mut config = HeartlineConfig::load_or_default(&args.config);
    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = dir.clone();
    }

    let roster = Arc::new(load_roster(&config)?);
    let store = Arc::new(JsonFileStore::new(config.storage.data_dir.clone()));
    let provider = build_provider(&config.ai, args.offline)?;
    let service = ConversationService::new(roster.clone(), store, provider, config.engine.seed)
        .with_history_window(config.engine.history_window);

    let player = PlayerId::new(args.player.trim());
    let key = |character: CharacterId| PairKey::new(player.clone(), character);

    match args.command {
        Command::Chat { character } => {
            repl::run(&service, profile(&roster, character)?, &key(character)).await?;
        }
        Command::Say { character, message } => {
            let report = service.take_turn(&key(character), &message.join(" ")).await?;
            if args.json {
                print_json(&report)?;
            } else {
                println!("{}", render::turn(profile(&roster, character)?, &report));
            }
        }
        Command::Status { character } => {
            let characters: Vec<CharacterId> = match character {
                Some(c) => vec![c],
                None => roster.iter().map(|p| p.id).collect(),
            };
            let mut records = Vec::with_capacity(characters.len());
            for c in characters {
                records.push(service.status(&key(c)).await?);
            }
            if args.json {
                print_json(&records)?;
            } else {
                for record in &records {
                    println!("{}", render::status(profile(&roster, record.character)?, record));
                }
            }
        }
        Command::Characters => {
            if args.json {
                let list: Vec<_> = roster
                    .iter()
                    .map(|p| json!({ "id": p.id, "name": p.name, "traits": p.traits }))
                    .collect();
                print_json(&list)?;
            } else {
                for p in roster.iter() {
                    let blurb = p.persona.lines().next().unwrap_or_default().trim();
                    println!("{:<8} {:<8} {}", p.id, p.name, blurb);
                }
            }
        }
        Command::Unlocks { character } => {
            let items = service.unlocked_content(&key(character)).await?;
            if args.json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("Nothing unlocked with {} yet.", profile(&roster, character)?.name);
            } else {
                for item in &items {
                    println!("{}", render::unlocked_item(item));
                }
            }
        }
        Command::History { character, limit } => {
            let entries = service.history(&key(character), limit).await?;
            if args.json {
                print_json(&entries)?;
            } else {
                println!("{}", render::history(profile(&roster, character)?, &entries));
            }
        }
        Command::Reset { character, all } => {
            if all {
                let removed = service.delete_player(&player).await?;
                println!("Removed {} relationship(s) for {}.", removed, player);
            } else if let Some(character) = character {
                if service.reset(&key(character)).await? {
                    println!("{} has forgotten you.", profile(&roster, character)?.name);
                } else {
                    println!("You had not met {} yet.", profile(&roster, character)?.name);
                }
            }
        }
        Command::Preview {
            character,
            message,
            reply,
        } => {
            let outcome = service.preview(&key(character), &message, &reply).await?;
            if args.json {
                print_json(&outcome)?;
            } else {
                println!("{}", render::preview(profile(&roster, character)?, &outcome));
            }
        }
    }

    Ok(())
}
