use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use splitsnap_core::{
    parse_price_input, parse_receipt_text, CoreConfig, Item, ItemId, PersonId, ScanOutcome,
    Session, TesseractRecognizer,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(name = "splitsnap")]
#[command(about = "Split a shared bill from a receipt")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Symbol used when printing amounts
    #[arg(long, global = true, env = "SPLITSNAP_CURRENCY_SYMBOL", value_name = "SYMBOL")]
    currency_symbol: Option<String>,

    /// Tesseract executable
    #[arg(long, global = true, env = "SPLITSNAP_TESSERACT_BIN", value_name = "PATH")]
    tesseract_bin: Option<String>,

    /// Tesseract language, e.g. `eng` or `eng+deu`
    #[arg(long = "ocr-lang", global = true, env = "SPLITSNAP_OCR_LANG", value_name = "LANG")]
    ocr_language: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Validated only after argument parsing, so `--help` works with a bad environment.
    fn config(&self) -> anyhow::Result<CoreConfig> {
        let config = CoreConfig::from_env_values(
            self.currency_symbol.clone(),
            self.tesseract_bin.clone(),
            self.ocr_language.clone(),
        )?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract items from receipt text
    Parse {
        /// Text file with OCR output, or `-` for stdin
        file: PathBuf,
    },
    /// Recognise a receipt photo and list the extracted items
    Scan {
        /// Receipt image
        image: PathBuf,
    },
    /// Build a bill and print everyone's share
    Split(SplitArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Person sharing the bill (repeatable)
    #[arg(long = "person", value_name = "NAME")]
    people: Vec<String>,
    /// Receipt text to import, or `-` for stdin
    #[arg(long)]
    receipt: Option<PathBuf>,
    /// Receipt image to scan with tesseract
    #[arg(long)]
    image: Option<PathBuf>,
    /// Extra item entered by hand
    #[arg(long = "item", value_name = "NAME=PRICE")]
    items: Vec<String>,
    /// Give an item to one person
    #[arg(long = "assign", value_name = "ITEM=PERSON")]
    assignments: Vec<String>,
    /// Split an item equally among everyone
    #[arg(long = "share", value_name = "ITEM")]
    shared: Vec<String>,
    /// Remove a person after assignments (their items become unassigned)
    #[arg(long = "remove-person", value_name = "NAME")]
    removed: Vec<String>,
}

/// Entry point for the SplitSnap command-line tool.
///
/// # Environment Variables
/// - `SPLITSNAP_CURRENCY_SYMBOL`: symbol used when printing amounts (default: "$")
/// - `SPLITSNAP_TESSERACT_BIN`: tesseract executable (default: "tesseract")
/// - `SPLITSNAP_OCR_LANG`: tesseract language (default: "eng")
/// - `RUST_LOG`: log filter; logs go to stderr
///
/// The first three can also be given as flags, which take precedence.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("splitsnap=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Some(Commands::Parse { file }) => {
            let text = read_text(&file)?;
            let lines = parse_receipt_text(&text);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                render::print_parsed(&lines, &config);
            }
        }
        Some(Commands::Scan { image }) => {
            let mut session = Session::new();
            scan_into(&mut session, &image, &config).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(session.items())?);
            } else {
                render::print_items(session.items(), &config);
            }
        }
        Some(Commands::Split(args)) => {
            let session = build_session(args, &config).await?;
            if cli.json {
                println!("{}", render::session_json(&session)?);
            } else {
                render::print_split(&session, &config);
            }
        }
        None => {
            println!("Use 'splitsnap --help' for commands");
        }
    }

    Ok(())
}

async fn build_session(args: SplitArgs, config: &CoreConfig) -> anyhow::Result<Session> {
    let mut session = Session::new();

    for name in &args.people {
        session
            .add_person(name)
            .ok_or_else(|| anyhow!("invalid person name: {name:?}"))?;
    }

    if let Some(path) = &args.receipt {
        let text = read_text(path)?;
        session.ingest_parsed(&parse_receipt_text(&text));
    }

    if let Some(path) = &args.image {
        scan_into(&mut session, path, config).await?;
    }

    for entry in &args.items {
        let (name, price) = entry
            .rsplit_once('=')
            .ok_or_else(|| anyhow!("expected NAME=PRICE, got {entry:?}"))?;
        let price = parse_price_input(price)
            .ok_or_else(|| anyhow!("invalid price in {entry:?}"))?;
        session
            .add_item(name, price)
            .ok_or_else(|| anyhow!("invalid item {entry:?}"))?;
    }

    for entry in &args.assignments {
        let (item_name, person_name) = entry
            .rsplit_once('=')
            .ok_or_else(|| anyhow!("expected ITEM=PERSON, got {entry:?}"))?;
        let item = find_item(&session, item_name)?;
        let person = find_person(&session, person_name)?;
        session.assign_item(item, person);
    }

    for name in &args.shared {
        let item = find_item(&session, name)?;
        if !session.item(item).is_some_and(Item::is_split) {
            session.toggle_split(item);
        }
    }

    for name in &args.removed {
        let person = find_person(&session, name)?;
        session.remove_person(person);
    }

    Ok(session)
}

async fn scan_into(session: &mut Session, image: &Path, config: &CoreConfig) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("failed to read image {}", image.display()))?;
    let recognizer = TesseractRecognizer::from_config(config);

    let mut monitor = session.scan_monitor();
    let progress = tokio::spawn(async move {
        while let Some(state) = monitor.changed().await {
            if state.scanning {
                tracing::info!(progress = state.progress, "scanning receipt");
            }
        }
    });

    let outcome = session.scan(&recognizer, &bytes).await;
    progress.abort();

    match outcome? {
        ScanOutcome::Added(ids) => tracing::info!(items = ids.len(), "receipt scanned"),
        ScanOutcome::NothingFound => tracing::warn!("no items found on receipt"),
    }
    Ok(())
}

/// Items are matched by name. With duplicate names the first item nobody has yet is preferred,
/// so `--assign Coffee=Ana --assign Coffee=Ben` hands out both coffees.
fn find_item(session: &Session, name: &str) -> anyhow::Result<ItemId> {
    let name = name.trim();
    let mut matches = session.items().iter().filter(|item| item.name() == name);
    let first = matches
        .clone()
        .find(|item| item.is_unassigned())
        .or_else(|| matches.next());

    match first {
        Some(item) => Ok(item.id()),
        None => bail!("no item named {name:?}"),
    }
}

fn find_person(session: &Session, name: &str) -> anyhow::Result<PersonId> {
    let name = name.trim();
    session
        .people()
        .iter()
        .find(|person| person.name() == name)
        .map(|person| person.id())
        .ok_or_else(|| anyhow!("no person named {name:?}"))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read receipt text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read receipt text {}", path.display()))
}
