//! Contentify - AI-assisted social media content studio for the terminal
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use contentify::services::{ContentGenerator, GenerationRequest};
use contentify::{Config, MockStudio, PlatformId, SourceImage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    match parse_args()? {
        Command::Run => run_tui().await,
        Command::Generate {
            idea,
            platforms,
            image,
            json,
        } => generate_cli(&idea, &platforms, image.as_deref(), json).await,
        Command::Platforms => {
            list_platforms();
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    Generate {
        idea: String,
        platforms: Vec<String>,
        image: Option<String>,
        json: bool,
    },
    Platforms,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();
    parse_command(&args)
}

fn parse_command(args: &[String]) -> Result<Command> {
    if args.len() <= 1 {
        return Ok(Command::Run);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "platforms" => Ok(Command::Platforms),

        "generate" | "gen" => {
            let mut idea = String::new();
            let mut platforms = Vec::new();
            let mut image = None;
            let mut json = false;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--to" | "-t" => {
                        if let Some(list) = args.get(i + 1) {
                            platforms.extend(list.split(',').map(|s| s.trim().to_string()));
                        }
                        i += 2;
                    }
                    "--image" | "-i" => {
                        image = args.get(i + 1).cloned();
                        i += 2;
                    }
                    "--json" => {
                        json = true;
                        i += 1;
                    }
                    word => {
                        if !idea.is_empty() {
                            idea.push(' ');
                        }
                        idea.push_str(word);
                        i += 1;
                    }
                }
            }

            if idea.is_empty() && image.is_none() {
                return Err(anyhow::anyhow!(
                    "Missing content idea\nExample: contentify generate \"Our new espresso blend\" --to twitter,linkedin"
                ));
            }

            Ok(Command::Generate {
                idea,
                platforms,
                image,
                json,
            })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'contentify --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
✨ Contentify - AI-powered content for every platform

USAGE:
    contentify                         Launch TUI
    contentify [COMMAND]

COMMANDS:
    generate <idea> [OPTIONS]          Generate captions without the TUI
      Options:
        -t, --to <platforms>           Comma-separated platforms (default: config)
        -i, --image <path>             Build the post around your own image
            --json                     Print the draft as JSON
      Examples:
        contentify generate "Spring sale starts Monday"
        contentify generate "Team offsite recap" --to linkedin,facebook
        contentify generate --image ./latte.jpg --to instagram

    platforms                          List supported platforms

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    Navigation
      1-4           Jump to view
      Tab           Next view
      t             Toggle light/dark theme
      L             Log out
      ?             Help

    Create
      i             Describe your idea
      u / x         Upload / remove image
      Space         Toggle platform
      Enter         Generate

    Review & Schedule
      e / c         Edit / copy caption
      i / #         Improve writing / suggest hashtags
      s / p         Schedule / publish now

CONFIG:
    {}
"#,
        contentify::LOGO,
        config_path
    );
}

fn print_version() {
    println!("contentify {}", contentify::VERSION);
}

async fn run_tui() -> Result<()> {
    // The TUI drives its own runtime from a plain thread
    tokio::task::spawn_blocking(contentify::app::run)
        .await
        .context("TUI thread panicked")?
}

async fn generate_cli(
    idea: &str,
    platforms: &[String],
    image: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;

    let targets: Vec<PlatformId> = if platforms.is_empty() {
        config.default_platforms.clone()
    } else {
        platforms
            .iter()
            .map(|name| {
                PlatformId::from_str(name).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown platform: {}\nSupported: twitter, linkedin, facebook, instagram",
                        name
                    )
                })
            })
            .collect::<Result<_>>()?
    };

    let upload = match image {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read image {path}"))?;
            let file_name = std::path::Path::new(path)
                .file_name()
                .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
            Some(SourceImage::uploaded(file_name, bytes))
        }
        None => None,
    };

    let request = GenerationRequest::new(idea, targets, upload);
    request.validate()?;

    let studio = MockStudio::from_config(&config);
    if !json {
        println!("✨ Generating content...");
    }
    let draft = studio.generate(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }

    println!("🖼  {}", draft.source_image().label());
    for (platform, caption) in draft.captions() {
        println!(
            "\n{} {} ({}/{})",
            platform.emoji(),
            platform.name(),
            draft.caption_len(*platform),
            platform.max_caption_len()
        );
        println!("{}", "─".repeat(60));
        println!("{caption}");
    }

    Ok(())
}

fn list_platforms() {
    println!("Supported platforms:\n");
    for platform in PlatformId::all() {
        println!(
            "  {} {:<10} {:<10} max {:>5} chars\n    {}",
            platform.emoji(),
            platform.name(),
            platform.id(),
            platform.max_caption_len(),
            platform.description()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_tui() {
        assert!(matches!(parse_command(&args(&["contentify"])), Ok(Command::Run)));
    }

    #[test]
    fn test_generate_with_flags() {
        let cmd = parse_command(&args(&[
            "contentify",
            "generate",
            "Spring",
            "sale",
            "--to",
            "twitter,linkedin",
            "--json",
        ]));
        let Ok(Command::Generate {
            idea,
            platforms,
            image,
            json,
        }) = cmd
        else {
            panic!("expected generate command");
        };
        assert_eq!(idea, "Spring sale");
        assert_eq!(platforms, vec!["twitter", "linkedin"]);
        assert!(image.is_none());
        assert!(json);
    }

    #[test]
    fn test_generate_requires_idea_or_image() {
        assert!(parse_command(&args(&["contentify", "generate"])).is_err());
        assert!(parse_command(&args(&["contentify", "generate", "--image", "a.png"])).is_ok());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command(&args(&["contentify", "bogus"]))
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(err.contains("Unknown command: bogus"));
    }
}
