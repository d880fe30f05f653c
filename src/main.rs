use parley::config::Config;
use parley::data::{AppData, CategoryFilter};
use parley::lang::Language;
use parley::practice::Practice;
use parley::render::{self, CardAction};
use parley::seed;
use parley::shadow::{self, Interrupt, PlayOutcome};
use parley::similarity;
use parley::speech::{Recognizer, Speaker};
use parley::stats::SessionStats;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use crossterm::{event, terminal};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "parley", about = "Flashcard and dialogue shadowing practice")]
struct Cli {
    /// Config file (default: ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Practice data JSON (overrides config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Target language: en, es, ja
    #[arg(long, global = true)]
    lang: Option<Language>,
    /// Pad the dataset with synthetic copies for bulk practice
    #[arg(long, global = true)]
    expand: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Flashcard drill (default)
    Cards {
        #[arg(long)]
        category: Option<String>,
    },
    /// Conversation scenes: listen, play all, shadow lines
    Convo {
        #[arg(long)]
        scene: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Score a repetition against its target
    Score { heard: String, target: String },
    /// List card and scene categories
    Categories,
    /// List conversation scenes
    Scenes {
        #[arg(long)]
        category: Option<String>,
    },
}

#[hotpath::main]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());
    let lang = cli.lang.unwrap_or(config.lang);

    let load_data = || -> anyhow::Result<AppData> {
        let data_path = cli
            .data
            .clone()
            .or_else(|| config.data_path.as_ref().map(PathBuf::from));
        let data = match data_path {
            Some(path) => AppData::load(&path)
                .with_context(|| format!("loading practice data from {}", path.display()))?,
            None => AppData::sample().context("loading built-in sample data")?,
        };
        let data = if cli.expand {
            seed::expand(&data, (&config.expand).into())
        } else {
            data
        };
        log::info!(
            "{} cards, {} scenes",
            data.total_cards(),
            data.conversations.len()
        );
        Ok(data)
    };

    match cli.command.unwrap_or(Command::Cards { category: None }) {
        Command::Score { heard, target } => {
            run_score(&heard, &target);
            Ok(())
        }
        Command::Cards { category } => {
            let mut practice = Practice::new(load_data()?, lang);
            if let Some(category) = category {
                practice.set_category(CategoryFilter::parse(&category));
            }
            let speaker = config.speaker.build();
            let recognizer = config.recognizer.build();
            run_cards(&mut practice, speaker.as_ref(), recognizer.as_ref())
        }
        Command::Convo { scene, category } => {
            let mut practice = Practice::new(load_data()?, lang);
            if let Some(category) = category {
                practice.set_scene_category(CategoryFilter::parse(&category));
            }
            if let Some(id) = scene {
                if !practice.select_scene(&id) {
                    bail!("no scene with id '{}'", id);
                }
            }
            let speaker = config.speaker.build();
            let recognizer = config.recognizer.build();
            run_convo(&mut practice, speaker.as_ref(), recognizer.as_ref())
        }
        Command::Categories => {
            let data = load_data()?;
            println!("Cards:");
            for c in data.card_categories() {
                println!("  {} ({})", c, data.cards(&CategoryFilter::Named(c.clone())).len());
            }
            println!("Scenes:");
            for c in data.scene_categories() {
                println!("  {} ({})", c, data.scenes(&CategoryFilter::Named(c.clone())).len());
            }
            Ok(())
        }
        Command::Scenes { category } => {
            let data = load_data()?;
            let filter = category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or_default();
            for s in data.scenes(&filter) {
                println!("{:<24} {} [{}] ({} lines)", s.id, s.title, s.category(), s.lines.len());
            }
            Ok(())
        }
    }
}

fn run_score(heard: &str, target: &str) {
    let a = similarity::normalize(heard);
    let b = similarity::normalize(target);
    let score = similarity::similarity(heard, target);
    println!("distance:   {}", similarity::levenshtein(&a, &b));
    println!("similarity: {}%", similarity::percent(score));
}

// ============================================================================
// Cards
// ============================================================================

fn run_cards(
    practice: &mut Practice,
    speaker: &dyn Speaker,
    recognizer: &dyn Recognizer,
) -> anyhow::Result<()> {
    let mut stats = SessionStats::default();

    terminal::enable_raw_mode().context("enabling raw terminal mode")?;
    let result = card_loop(practice, speaker, recognizer, &mut stats);
    terminal::disable_raw_mode().ok();
    speaker.cancel();

    println!();
    print!("{}", stats.summary());
    result
}

fn card_loop(
    practice: &mut Practice,
    speaker: &dyn Speaker,
    recognizer: &dyn Recognizer,
    stats: &mut SessionStats,
) -> anyhow::Result<()> {
    let mut status = String::new();
    let mut out = std::io::stdout();

    loop {
        write!(
            out,
            "{}{}\r\n",
            render::card_screen(practice, recognizer.available()),
            status
        )?;
        out.flush()?;

        let event::Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(action) = render::map_key(&key) else {
            continue;
        };

        status.clear();
        match action {
            CardAction::Flip => practice.flip(),
            CardAction::Next(good) => {
                if practice.current_card().is_some() {
                    stats.mark(good);
                }
                practice.next_card();
            }
            CardAction::Speak => {
                if let Some(text) = practice
                    .current_card()
                    .and_then(|c| c.text(practice.lang()))
                {
                    if let Err(e) = speaker.speak(text, practice.lang().speech_tag()) {
                        log::warn!("speak failed: {}", e);
                        status = format!("Could not speak: {}", e);
                    } else {
                        status = format!("♪ {}", text);
                    }
                }
            }
            CardAction::Shadow => {
                let Some(target) = practice
                    .current_card()
                    .and_then(|c| c.text(practice.lang()))
                    .map(String::from)
                else {
                    continue;
                };
                if !recognizer.available() {
                    continue;
                }
                // typed recognizers need cooked mode for line input
                terminal::disable_raw_mode()?;
                writeln!(out, "Start speaking...")?;
                out.flush()?;
                let result = shadow::shadow_once(recognizer, &target, practice.lang());
                terminal::enable_raw_mode()?;
                status = match result {
                    Ok(r) => {
                        stats.record_attempt(&r.target, &r.heard, r.percent);
                        r.to_string()
                    }
                    Err(e) => {
                        log::warn!("shadowing failed: {}", e);
                        shadow::failure_message(&e)
                    }
                };
            }
            CardAction::NextCategory => practice.next_category(),
            CardAction::NextLanguage => practice.set_lang(practice.lang().next()),
            CardAction::Quit => return Ok(()),
        }
    }
}

// ============================================================================
// Conversation
// ============================================================================

/// Line-driven scene practice; Ctrl-C stops playback, or quits when idle
fn run_convo(
    practice: &mut Practice,
    speaker: &dyn Speaker,
    recognizer: &dyn Recognizer,
) -> anyhow::Result<()> {
    let interrupt = Arc::new(Interrupt::default());
    let handler = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        if handler.fire() {
            println!();
            std::process::exit(130);
        }
    })
    .context("installing Ctrl-C handler")?;

    let mut stats = SessionStats::default();
    let stdin = std::io::stdin();
    let mut line = String::new();

    print_scene(practice, recognizer);
    loop {
        print!("convo> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        let (cmd, arg) = input
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((input, ""));
        let lang = practice.lang();

        match cmd {
            "" => {}
            "q" | "quit" => break,
            "l" => {
                practice.set_lang(lang.next());
                print_scene(practice, recognizer);
            }
            "g" => {
                if practice.select_scene(arg) {
                    print_scene(practice, recognizer);
                } else {
                    println!("No scene '{}'. Scenes:", arg);
                    for s in practice.scenes() {
                        println!("  {:<24} {}", s.id, s.title);
                    }
                }
            }
            "p" => {
                let Some(scene) = practice.current_scene() else {
                    continue;
                };
                let texts: Vec<&str> = scene.lines.iter().filter_map(|l| l.text(lang)).collect();
                match interrupt.play(speaker, &texts, lang) {
                    Ok(PlayOutcome::Finished) => {}
                    Ok(PlayOutcome::Cancelled) => println!("(stopped)"),
                    Err(e) => println!("Could not speak: {}", e),
                }
            }
            "s" => {
                let Some(target) = scene_line(practice, arg) else {
                    println!("Usage: s <line number>");
                    continue;
                };
                match shadow::shadow_once(recognizer, &target, lang) {
                    Ok(r) => {
                        stats.record_attempt(&r.target, &r.heard, r.percent);
                        println!("{}", r);
                    }
                    Err(e) => {
                        log::warn!("shadowing failed: {}", e);
                        println!("{}", shadow::failure_message(&e));
                    }
                }
            }
            n => match scene_line(practice, n) {
                Some(text) => {
                    if let Err(e) = speaker.speak(&text, lang.speech_tag()) {
                        println!("Could not speak: {}", e);
                    }
                }
                None => println!("Unknown command '{}'", input),
            },
        }
    }

    speaker.cancel();
    print!("{}", stats.summary());
    Ok(())
}

/// Target-language text of the 1-based line `arg` in the current scene
fn scene_line(practice: &Practice, arg: &str) -> Option<String> {
    let idx: usize = arg.parse().ok()?;
    let scene = practice.current_scene()?;
    let line = scene.lines.get(idx.checked_sub(1)?)?;
    line.text(practice.lang()).map(String::from)
}

fn print_scene(practice: &Practice, recognizer: &dyn Recognizer) {
    match practice.current_scene() {
        Some(scene) => print!(
            "{}",
            render::dialogue(scene, practice.lang(), recognizer.available())
        ),
        None => println!("No scenes."),
    }
}
