use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use stickerforge::configuration::{Config, ConfigArgs};
use stickerforge::controller::Controller;
use stickerforge::export;
use stickerforge::session_management::GenerationStatus;
use stickerforge::sticker::prompt::{random_suggestion, SUGGESTIONS};
use stickerforge::sticker::{StickerRecord, StickerStyle};
use stickerforge::web_interface::WebServer;

#[derive(Parser)]
#[command(name = "stickerforge")]
#[command(version = "0.0.2")]
#[command(about = "Turns short text prompts into die-cut sticker images")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a sticker and add it to the gallery
    Generate {
        /// What the sticker should show
        #[arg(required_unless_present = "surprise")]
        prompt: Option<String>,
        /// Visual style (see `styles`)
        #[arg(long, short, default_value_t = StickerStyle::default())]
        style: StickerStyle,
        /// Use a random example prompt
        #[arg(long, conflicts_with = "prompt")]
        surprise: bool,
        /// Also save the image into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List stored stickers, newest first
    List,
    /// Print one sticker's details
    Show { id: String },
    /// Remove a sticker from the gallery
    Delete { id: String },
    /// Save a sticker as an image file
    Export {
        id: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print share text and a link that reopens the prompt
    Share { id: String },
    /// Read the prompt and style back out of a share link
    Open { link: String },
    /// List the available styles
    Styles,
    /// Print example prompts
    Suggest,
    /// Serve the local HTTP API
    Serve,
}

fn find<'a>(controller: &'a Controller, id: &str) -> &'a StickerRecord {
    match controller.sticker(id) {
        Some(record) => record,
        None => {
            error!("No sticker with id {}", id);
            std::process::exit(1);
        }
    }
}

fn print_record(record: &StickerRecord) {
    println!(
        "{}  {}  {:<11}  {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M:%S"),
        record.style,
        record.prompt
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();

    // Commands that need no gallery
    match &args.command {
        Command::Styles => {
            for style in StickerStyle::ALL {
                println!("{:<11}  {}", style, style.describe());
            }
            return;
        }
        Command::Suggest => {
            for suggestion in SUGGESTIONS {
                println!("{}", suggestion);
            }
            return;
        }
        Command::Open { link } => {
            match export::parse_share_link(link) {
                Ok(prefill) => {
                    println!("prompt: {}", prefill.prompt);
                    println!("style:  {}", prefill.style);
                }
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
            return;
        }
        _ => {}
    }

    let config = Config::resolve(&args.config).unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        std::process::exit(1);
    });

    let mut controller = Controller::from_config(&config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        std::process::exit(1);
    });

    match args.command {
        Command::Generate {
            prompt,
            style,
            surprise,
            out,
        } => {
            let prompt = match prompt {
                Some(prompt) if !surprise => prompt,
                _ => {
                    let picked = random_suggestion();
                    info!("Surprise prompt: {}", picked);
                    picked.to_string()
                }
            };
            match controller.submit(&prompt, style).await {
                None => {
                    error!("Prompt is empty, nothing to generate");
                    std::process::exit(1);
                }
                Some(GenerationStatus::Success) => {}
                Some(_) => {
                    error!(
                        "{}",
                        controller.error_message().unwrap_or("Sticker generation failed")
                    );
                    std::process::exit(1);
                }
            }
            let Some(record) = controller.displayed_sticker() else {
                return;
            };
            print_record(record);
            if let Some(dir) = out {
                match export::export_to_dir(record, &dir) {
                    Ok(path) => println!("{}", path.display()),
                    Err(e) => {
                        error!("{}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
        Command::List => {
            if controller.stickers().is_empty() {
                info!("No stickers yet");
            }
            for record in controller.stickers() {
                print_record(record);
            }
        }
        Command::Show { id } => {
            let record = find(&controller, &id);
            print_record(record);
            println!("{}", record.image_data.to_data_url());
        }
        Command::Delete { id } => {
            find(&controller, &id);
            let remaining = controller.delete(&id).len();
            info!("Deleted {}, {} stickers left", id, remaining);
        }
        Command::Export { id, dir } => {
            let record = find(&controller, &id);
            match export::export_to_dir(record, &dir) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Share { id } => {
            let record = find(&controller, &id);
            println!("{}", export::share_text(record));
            match export::share_link(&config.share_base_url, record) {
                Ok(link) => println!("{}", link),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve => {
            println!(
                "
  ___ _   _    _          ___
 / __| |_(_)__| |_____ _ | __|__ _ _ __ _ ___
 \\__ \\  _| / _| / / -_) '_| _/ _ \\ '_/ _` / -_)
 |___/\\__|_\\__|_\\_\\___|_| |_|\\___/_| \\__, \\___|
                                     |___/
"
            );
            let server = WebServer::new(controller);
            server.start(config.web_port).await;
        }
        Command::Styles | Command::Suggest | Command::Open { .. } => {}
    }
}
