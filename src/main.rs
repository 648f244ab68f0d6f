//! Parley - chat with your database in plain English.

use std::io::Write as _;
use std::path::Path;

use db_parley::agent::{AgentEvent, LlmSqlAgent};
use db_parley::chat::ChatService;
use db_parley::cli::{ChatArgs, Cli, Command, ConnectionArgs, SeedArgs};
use db_parley::config::{Config, ConnectionConfig};
use db_parley::db::ConnectionManager;
use db_parley::error::Result;
use db_parley::llm::create_client;
use db_parley::logging::init_stderr_logging;
use db_parley::seed::{create_sample_database, SAMPLE_QUERIES};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load .env before anything reads GROQ_API_KEY or MYSQL_* variables.
    dotenvy::dotenv().ok();
    init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::load_from_file(&cli.config_path())?;

    match cli.command {
        Command::Chat(args) => run_chat(args, &config).await,
        Command::Seed(args) => run_seed(&args).await,
        Command::Schema(args) => run_schema(&args, &config).await,
    }
}

async fn run_seed(args: &SeedArgs) -> Result<()> {
    create_sample_database(&args.db_path).await?;
    println!("Sample database created at {}", args.db_path.display());
    println!("\nTry these questions in `parley chat`:");
    for (description, sql) in SAMPLE_QUERIES {
        println!("  {description}\n    {sql}");
    }
    Ok(())
}

async fn run_schema(args: &ConnectionArgs, config: &Config) -> Result<()> {
    let connection = args.to_connection_config(config)?;
    let db = db_parley::db::connect(&connection).await?;
    let schema = db.introspect_schema().await?;
    print!("{}", schema.format_for_display());
    db.close().await?;
    Ok(())
}

async fn run_chat(args: ChatArgs, config: &Config) -> Result<()> {
    let connection = args.connection.to_connection_config(config)?;
    connection.validate()?;

    let model = args.to_model_config(config);

    // The session starts even without an API key; only question dispatch is
    // blocked. Commands like /schema still work.
    let mut service = match create_client(&model) {
        Ok(client) => Some(ChatService::new(Box::new(LlmSqlAgent::new(
            client,
            model.streaming,
        )))),
        Err(e) => {
            eprintln!("Warning: {e}");
            eprintln!("Questions will be rejected until a key is provided.");
            None
        }
    };

    let mut manager = ConnectionManager::new();
    info!(connection = %connection.display_string(), model = %model.model, "Chat session started");

    println!("Parley - ask questions about {}", connection.display_string());
    println!("Commands: /schema /history /clear /export <path> /quit");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.map_err(|e| {
            db_parley::error::ParleyError::config(format!("Failed to read input: {e}"))
        })?
        else {
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            if handle_command(command, &mut service, &mut manager, &connection).await? {
                break;
            }
            continue;
        }

        ask_question(input, &mut service, &mut manager, &connection).await;
    }

    manager.close().await?;
    Ok(())
}

/// Handles one slash command. Returns true when the session should end.
async fn handle_command(
    command: &str,
    service: &mut Option<ChatService>,
    manager: &mut ConnectionManager,
    connection: &ConnectionConfig,
) -> Result<bool> {
    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "quit" | "exit" => return Ok(true),
        "schema" => match manager.handle(connection).await {
            Ok(db) => match db.introspect_schema().await {
                Ok(schema) => print!("{}", schema.format_for_display()),
                Err(e) => eprintln!("Error: {e}"),
            },
            Err(e) => eprintln!("Error: {e}"),
        },
        "history" => {
            let history = service.as_ref().map(|s| s.log().history()).unwrap_or(&[]);
            if history.is_empty() {
                println!("(empty session)");
            }
            for turn in history {
                println!("{}: {}", turn.role, turn.text);
            }
        }
        "clear" => {
            if let Some(service) = service {
                service.reset();
            }
            println!("Session cleared.");
        }
        "export" => {
            if arg.is_empty() {
                eprintln!("Usage: /export <path>");
            } else {
                let text = service
                    .as_ref()
                    .map(|s| s.export_as_text())
                    .unwrap_or_default();
                match std::fs::write(Path::new(arg), text) {
                    Ok(()) => println!("Session exported to {arg}"),
                    Err(e) => eprintln!("Error: failed to write {arg}: {e}"),
                }
            }
        }
        other => eprintln!("Unknown command: /{other}"),
    }

    Ok(false)
}

async fn ask_question(
    question: &str,
    service: &mut Option<ChatService>,
    manager: &mut ConnectionManager,
    connection: &ConnectionConfig,
) {
    let Some(service) = service else {
        eprintln!("Error: {}", db_parley::error::ParleyError::MissingCredential);
        return;
    };

    let db = match manager.handle(connection).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        let mut streaming_line = false;
        while let Some(event) = rx.recv().await {
            match event {
                AgentEvent::Status(status) => {
                    if streaming_line {
                        println!();
                        streaming_line = false;
                    }
                    println!("... {status}");
                }
                AgentEvent::Token(token) => {
                    print!("{token}");
                    std::io::stdout().flush().ok();
                    streaming_line = true;
                }
            }
        }
        if streaming_line {
            println!();
        }
    });

    let outcome = service.ask(question, db, &tx).await;
    drop(tx);
    printer.await.ok();

    match outcome {
        Ok(turn) => {
            println!("\n{}\n", turn.text);
        }
        Err(e) => {
            eprintln!("Error: {e}");
        }
    }
}
