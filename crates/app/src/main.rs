use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::Duration;
use interview_core::{
    export_file_name, Difficulty, InterviewSession, Report, RoundType, SessionError, SessionSetup,
    TimingMode,
};
use services::{
    AnswerEvent, Clock, CredentialGate, GeminiConfig, GeminiProvider, InterviewError,
    PracticeLoopService, QuestionProvider, TemplateProvider,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidRound { raw: String },
    InvalidDifficulty { raw: String },
    MissingRole,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidRound { raw } => write!(f, "invalid --round value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::MissingRole => write!(f, "--role is required"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    setup: SessionSetup,
    timing: TimingMode,
    local: bool,
    out: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --role <title> [--company <name>]");
    eprintln!("                      [--round <warm up|coding|role related|behavioral>]");
    eprintln!("                      [--difficulty <beginner|professional>]");
    eprintln!("                      [--whole-interview] [--local] [--out <path>]");
    eprintln!();
    eprintln!("Defaults: --round coding, --difficulty professional, per-question timing.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_AI_API_KEY, INTERVIEW_AI_BASE_URL, INTERVIEW_AI_MODEL");
    eprintln!("  (without an API key the local template strategy is used)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut role: Option<String> = None;
        let mut company: Option<String> = None;
        let mut round = RoundType::Coding;
        let mut difficulty = Difficulty::Professional;
        let mut timing = TimingMode::PerQuestion;
        let mut local = false;
        let mut out: Option<String> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--role" => role = Some(require_value(args, "--role")?),
                "--company" => company = Some(require_value(args, "--company")?),
                "--round" => {
                    let value = require_value(args, "--round")?;
                    round = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidRound { raw: value })?;
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value })?;
                }
                "--whole-interview" => timing = TimingMode::WholeInterview,
                "--local" => local = true,
                "--out" => out = Some(require_value(args, "--out")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let role = role.ok_or(ArgsError::MissingRole)?;
        let setup = SessionSetup::new(role, company, round, difficulty)
            .map_err(|_| ArgsError::MissingRole)?;

        Ok(Self {
            setup,
            timing,
            local,
            out,
        })
    }
}

fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn print_question(session: &InterviewSession) {
    let index = session.current_index();
    println!();
    println!(
        "Question {} of {}{}",
        index + 1,
        session.questions().len(),
        if session.is_locked(index) {
            "  [time is up - answer locked]"
        } else {
            ""
        }
    );
    if let Some(question) = session.current_question() {
        println!("  {question}");
    }
    if let Some(answer) = session.answer(index) {
        println!("  (current answer: {answer})");
    }
}

fn print_report(report: &Report) {
    println!();
    println!("Interview summary");
    println!("-----------------");
    for entry in &report.entries {
        println!("Question {}: {}", entry.index + 1, entry.question);
        println!("  {}", entry.answer_or_marker());
    }
    println!();
    println!("Feedback:");
    for line in &report.feedback {
        println!("  - {line}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    let provider: Arc<dyn QuestionProvider> = if args.local {
        Arc::new(TemplateProvider::new())
    } else if let Some(config) = GeminiConfig::from_env() {
        let provider = GeminiProvider::new(config)?;
        // Check the credential once up front so generation failures later
        // can be blamed on something other than the key.
        let gate = CredentialGate::new();
        gate.ensure_valid(&provider).await?;
        Arc::new(provider)
    } else {
        eprintln!("No INTERVIEW_AI_API_KEY set; using local question templates.");
        Arc::new(TemplateProvider::new())
    };

    let service = PracticeLoopService::new(clock, provider);
    let mut session = service.start(args.setup.clone(), args.timing);

    println!(
        "Preparing questions for {} ({}, {})...",
        args.setup.role(),
        args.setup.round(),
        args.setup.difficulty()
    );
    while let Err(err) = service.populate(&mut session).await {
        eprintln!("Question generation failed: {err}");
        if !prompt_yes_no("Retry generation? [y/N] ")? {
            return Err(err.into());
        }
    }

    println!();
    println!("Commands: next, prev, new, finish. Anything else is saved as your answer.");

    let stdin = io::stdin();
    let report = loop {
        if let Some(remaining) = service.tick(&mut session) {
            println!("Time remaining: {}", format_remaining(remaining));
        }
        if session.is_finished() {
            println!("The interview timer has run out.");
            break service.finish(&mut session)?;
        }
        print_question(&session);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break service.finish(&mut session)?;
        }
        let input = line.trim();

        match input {
            "next" => session.go_next(clock.now()),
            "prev" => session.go_previous(clock.now()),
            "new" => match service.regenerate(&mut session).await {
                Ok(_) => {}
                Err(InterviewError::Session(SessionError::CannotRegenerate { .. })) => {
                    println!("The final question cannot be replaced; use `finish`.");
                }
                Err(err) => eprintln!("Regeneration failed: {err}"),
            },
            "finish" => break service.finish(&mut session)?,
            "" => {}
            answer => {
                let event = AnswerEvent {
                    index: session.current_index(),
                    text: answer.to_string(),
                };
                match service.apply_answer(&mut session, event) {
                    Ok(()) => {}
                    Err(InterviewError::Session(SessionError::Locked { .. })) => {
                        println!("This question's time is up; the answer is locked.");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    };

    print_report(&report);

    let path = args.out.unwrap_or_else(|| {
        export_file_name(args.setup.role(), args.setup.company())
    });
    std::fs::write(&path, report.to_export_text())?;
    println!();
    println!("Transcript written to {path}");
    Ok(())
}

fn prompt_yes_no(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
