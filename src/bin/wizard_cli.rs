use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use berichtsheft::client::{ClientError, ReportClient, DEFAULT_ENDPOINT};
use berichtsheft::model::{DayResult, GenerateRequest};
use berichtsheft::progress::{loading_messages, ProgressTicker, REGENERATING_MESSAGE};
use berichtsheft::prompts::Gender;
use berichtsheft::wizard::{Step, WizardState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive Berichtsheft wizard")]
struct Args {
    /// Generate endpoint of a running server
    #[arg(short = 'e', long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Skip the gender step
    #[arg(short = 'g', long)]
    gender: Option<GenderArg>,

    /// Interval between loading messages
    #[arg(long, default_value_t = 2000)]
    tick_ms: u64,

    /// Enable moving rows within and between days
    #[arg(long)]
    reorder: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Gender(Gender),
    /// 1-based day, free text appended as a new row
    Add(usize, String),
    Remove(usize, usize),
    Move(usize, usize, usize),
    Transfer(usize, usize, usize, usize),
    List,
    Generate,
    Back,
    Regenerate(usize),
    Copy(usize),
    New,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let nums = || -> Option<Vec<usize>> {
        rest.split_whitespace().map(|n| n.parse().ok()).collect()
    };

    let cmd = match head {
        "m" | "male" | "männlich" => Command::Gender(Gender::Male),
        "f" | "female" | "weiblich" => Command::Gender(Gender::Female),
        "add" | "a" => {
            let (day, text) = rest.split_once(' ')?;
            Command::Add(day.parse().ok()?, text.trim().to_string())
        }
        "rm" => match nums()?.as_slice() {
            [day, row] => Command::Remove(*day, *row),
            _ => return None,
        },
        "mv" => match nums()?.as_slice() {
            [day, from, to] => Command::Move(*day, *from, *to),
            [from_day, from_row, to_day, to_row] => {
                Command::Transfer(*from_day, *from_row, *to_day, *to_row)
            }
            _ => return None,
        },
        "ls" | "list" => Command::List,
        "go" | "generate" => Command::Generate,
        "back" => Command::Back,
        "regen" | "r" => Command::Regenerate(rest.parse().ok()?),
        "copy" | "c" => Command::Copy(rest.parse().ok()?),
        "new" => Command::New,
        "q" | "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        _ => return None,
    };
    Some(cmd)
}

/// 1-based user index to 0-based.
fn index(n: usize) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("indices start at 1"))
}

fn print_help(step: Step) {
    match step {
        Step::GenderSelect => println!("  m | f              Geschlecht wählen"),
        Step::DayInput => {
            println!("  add <tag> <text>   Tätigkeit hinzufügen");
            println!("  rm <tag> <zeile>   Zeile leeren");
            println!("  mv <tag> <von> <nach> | mv <tag> <zeile> <tag> <zeile>");
            println!("  ls                 Eingaben anzeigen");
            println!("  go                 Bericht generieren");
            println!("  back               zurück zur Geschlechtswahl");
        }
        Step::Results => {
            println!("  regen <tag>        einen Tag neu generieren");
            println!("  copy <tag>         Bericht in die Zwischenablage kopieren");
            println!("  new                neuer Bericht");
        }
        Step::Loading => {}
    }
    println!("  quit");
}

fn print_rows(wizard: &WizardState) {
    for (i, day) in wizard.days().iter().enumerate() {
        println!("{}. {day}", i + 1);
        if let Ok(rows) = wizard.rows(i) {
            for (j, row) in rows.rows().iter().enumerate().filter(|(_, r)| !r.is_empty()) {
                println!("   {}: {row}", j + 1);
            }
        }
    }
}

fn print_results(results: &[DayResult]) {
    for (i, result) in results.iter().enumerate() {
        if let Some(text) = &result.text {
            println!("\n📄 {}. {}\n{text}", i + 1, result.day);
        }
    }
    println!();
}

fn add_activity(wizard: &mut WizardState, day: usize, text: String) -> Result<()> {
    let rows = wizard.rows_mut(day)?;
    match rows.rows().iter().position(|r| r.trim().is_empty()) {
        Some(free) => rows.set_text(free, text)?,
        None => {
            let row = rows.add_row();
            rows.set_text(row, text)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Batch,
    Regenerate,
}

/// Status lines for a run: per-day messages for a full batch, a single
/// line for a one-day regeneration.
fn status_messages(kind: RunKind, request: &GenerateRequest) -> Vec<String> {
    match kind {
        RunKind::Batch => loading_messages(&request.inputs, &request.days),
        RunKind::Regenerate => vec![REGENERATING_MESSAGE.to_string()],
    }
}

/// Runs one request while printing status messages.
async fn run_with_progress(
    client: &ReportClient,
    request: &GenerateRequest,
    kind: RunKind,
    tick: Duration,
) -> Result<Vec<DayResult>, ClientError> {
    let mut ticker = ProgressTicker::start(status_messages(kind, request), tick);
    let call = client.generate(request);
    tokio::pin!(call);
    loop {
        tokio::select! {
            result = &mut call => return result,
            Some(message) = ticker.next() => println!("⏳ {message}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CopyOutcome {
    Copied,
    /// No usable clipboard; the caller shows the text for manual copying.
    Printed,
}

fn copy_report(clipboard: &mut Option<arboard::Clipboard>, text: &str) -> CopyOutcome {
    let Some(board) = clipboard.as_mut() else {
        return CopyOutcome::Printed;
    };
    match board.set_text(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(_) => CopyOutcome::Printed,
    }
}

async fn handle(
    wizard: &mut WizardState,
    client: &ReportClient,
    clipboard: &mut Option<arboard::Clipboard>,
    tick: Duration,
    cmd: Command,
) -> Result<()> {
    match (wizard.step(), cmd) {
        (_, Command::Help) => print_help(wizard.step()),
        (Step::GenderSelect, Command::Gender(gender)) => {
            wizard.select_gender(gender);
            print_rows(wizard);
        }
        (Step::DayInput, Command::Add(day, text)) => {
            add_activity(wizard, index(day)?, text)?;
        }
        (Step::DayInput, Command::Remove(day, row)) => {
            let rows = wizard.rows_mut(index(day)?)?;
            let row = index(row)?;
            rows.set_text(row, "")?;
            rows.press_backspace(row)?;
        }
        (Step::DayInput, Command::Move(day, from, to)) => {
            wizard.move_row(index(day)?, index(from)?, index(to)?)?;
        }
        (Step::DayInput, Command::Transfer(fd, fr, td, tr)) => {
            wizard.transfer_row(index(fd)?, index(fr)?, index(td)?, index(tr)?)?;
        }
        (Step::DayInput, Command::List) => print_rows(wizard),
        (Step::DayInput, Command::Back) => wizard.back_to_gender(),
        (Step::DayInput, Command::Generate) => {
            let request = wizard.begin_generation()?;
            match run_with_progress(client, &request, RunKind::Batch, tick).await {
                Ok(results) => {
                    wizard.finish_generation(results);
                    print_results(wizard.results());
                }
                Err(err) => {
                    wizard.fail_generation();
                    return Err(err.into());
                }
            }
        }
        (Step::Results, Command::Regenerate(day)) => {
            let day = index(day)?;
            let request = wizard.regenerate_request(day)?;
            let results = run_with_progress(client, &request, RunKind::Regenerate, tick).await?;
            wizard.apply_regenerated(day, &results)?;
            print_results(wizard.results());
        }
        (Step::Results, Command::Copy(day)) => {
            let text = wizard.copy_text(index(day)?)?;
            match copy_report(clipboard, text) {
                CopyOutcome::Copied => println!("📋 Kopiert!"),
                CopyOutcome::Printed => {
                    println!("📋 Keine Zwischenablage verfügbar, bitte manuell kopieren:\n{text}")
                }
            }
        }
        (Step::Results, Command::New) => wizard.reset(),
        (step, cmd) => anyhow::bail!("{cmd:?} ist in Schritt {step:?} nicht möglich"),
    }
    Ok(())
}

fn prompt_for(step: Step) -> &'static str {
    match step {
        Step::GenderSelect => "Geschlecht (m/f)> ",
        Step::DayInput => "Tätigkeiten> ",
        Step::Loading => "",
        Step::Results => "Ergebnis> ",
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>, step: Step) -> Result<Option<String>> {
    use std::io::Write;
    print!("{}", prompt_for(step));
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let client = ReportClient::new(args.endpoint);
    let tick = Duration::from_millis(args.tick_ms);
    let mut wizard = WizardState::default().with_reorder(args.reorder);
    if let Some(gender) = args.gender {
        wizard.select_gender(gender.into());
    }

    println!("📝 Berichtsheft-Generator ({})", client.endpoint());
    print_help(wizard.step());

    // Kept for the whole session; some platforms drop the contents with it.
    let mut clipboard = arboard::Clipboard::new().ok();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = read_line(&mut lines, wizard.step()).await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(cmd) = parse_command(&line) else {
            println!("❓ unbekannter Befehl, 'help' zeigt alle Befehle");
            continue;
        };
        if cmd == Command::Quit {
            break;
        }
        if let Err(err) = handle(&mut wizard, &client, &mut clipboard, tick, cmd).await {
            println!("❌ {err}");
        }
    }

    Ok(())
}
