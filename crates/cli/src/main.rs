/// ReplyForge CLI - Main entry point
///
/// Command-line demo harness for the email orchestration engine:
/// - `replyforge config init`: write a default engine configuration
/// - `replyforge consent issue`: mint a consent token for a user/scope
/// - `replyforge generate`: run one email through the graph
/// - `replyforge demo`: run the built-in fixture inbox through the graph
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use replyforge_cli::{config_cmd, consent_cmd, demo_cmd, generate_cmd};

#[derive(Parser)]
#[command(name = "replyforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ReplyForge - Email Orchestration Engine demo CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Consent token management commands
    #[command(subcommand)]
    Consent(ConsentCommands),

    /// Run one email through the orchestration graph
    Generate {
        /// Email subject
        #[arg(long, default_value = "Quick question")]
        subject: String,

        /// Sender header, e.g. "Jane Doe <jane@x.com>"
        #[arg(long, default_value = "Jane Doe <jane@x.com>")]
        from: String,

        /// Email body
        #[arg(long, required = true)]
        body: String,

        /// Requesting user's id
        #[arg(long, default_value = "demo-user")]
        user_id: String,

        /// Requesting user's display name, used to sign the reply
        #[arg(long, default_value = "Alex")]
        user_name: String,

        /// Optional steering hint forwarded to the sub-agents
        #[arg(long)]
        user_hint: Option<String>,

        /// Engine configuration file (defaults to built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Knowledge-base root directory (defaults to a scratch temp dir)
        #[arg(long)]
        kb_root: Option<PathBuf>,

        /// Print the draft response as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in fixture inbox through the orchestration graph
    Demo,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default engine configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "replyforge.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConsentCommands {
    /// Issue a signed consent token
    Issue {
        /// User id to embed in the token
        #[arg(long)]
        user_id: String,

        /// Consent scope: "primary" or "kb"
        #[arg(long, default_value = "primary")]
        scope: String,

        /// Token lifetime, in seconds
        #[arg(long, default_value = "3600")]
        ttl_secs: i64,

        /// Engine configuration file (defaults to built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Config(ConfigCommands::Init { output, force }) => config_cmd::init(&output, force),
        Commands::Consent(ConsentCommands::Issue { user_id, scope, ttl_secs, config }) => {
            match consent_cmd::Scope::parse(&scope) {
                Some(scope) => consent_cmd::issue(config.as_deref(), &user_id, scope, ttl_secs),
                None => {
                    eprintln!("Error: invalid scope '{scope}', expected 'primary' or 'kb'");
                    process::exit(1);
                }
            }
        }
        Commands::Generate {
            subject,
            from,
            body,
            user_id,
            user_name,
            user_hint,
            config,
            kb_root,
            json,
        } => {
            generate_cmd::generate(generate_cmd::GenerateArgs {
                subject,
                from,
                body,
                user_id,
                user_name,
                user_hint,
                config_path: config,
                kb_root,
                json,
            })
            .await
        }
        Commands::Demo => demo_cmd::demo().await,
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let builder = tracing_subscriber::fmt().with_target(false).with_thread_ids(false).with_file(false).with_line_number(false);

    if verbose {
        builder.with_max_level(tracing::Level::DEBUG).init();
    } else {
        builder.with_max_level(tracing::Level::INFO).init();
    }
}
