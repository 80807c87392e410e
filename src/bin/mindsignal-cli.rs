use clap::{Args, Parser, Subcommand};
use mindsignal::catalog::{DEFAULT_SELECTION, display_label, task_catalog};
use mindsignal::llm::prompt::build_prompt;
use mindsignal::llm::{LlmConfig, LlmError, ProviderKind, ProviderRouter, Refinement};
use mindsignal::services::refine::{RefineError, refine_phrases};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("LLM configuration: {0}")]
    Config(#[from] LlmError),
    #[error("{0}")]
    Refine(#[from] RefineError),
    #[error("refinement failed: {0}")]
    Failed(String),
}

#[derive(Parser, Debug)]
#[command(name = "mindsignal-cli", about = "Build MindSignal prompts and run refinements against LLM providers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List analysis tasks.
    Catalog,
    /// List providers and whether an API key is configured.
    Providers,
    /// Print the composed prompt without calling a provider.
    Prompt(PromptArgs),
    /// Run a refinement and print each section.
    Refine(RefineArgs),
}

#[derive(Args, Debug)]
struct PromptArgs {
    /// Idea snippet; repeat for several, oldest first.
    #[arg(long = "phrase", required = true)]
    phrases: Vec<String>,

    /// Task id; repeat for several. Defaults to the standard selection.
    #[arg(long = "task")]
    tasks: Vec<String>,
}

impl PromptArgs {
    fn task_ids(&self) -> Vec<String> {
        if self.tasks.is_empty() {
            DEFAULT_SELECTION.iter().map(ToString::to_string).collect()
        } else {
            self.tasks.clone()
        }
    }
}

#[derive(Args, Debug)]
struct RefineArgs {
    #[arg(long, env = "MINDSIGNAL_PROVIDER", default_value = "gemini")]
    provider: String,

    #[command(flatten)]
    prompt: PromptArgs,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Catalog => {
            for entry in task_catalog() {
                println!("{:<16} {}", entry.id, entry.label);
            }
        }
        Command::Providers => {
            let router = ProviderRouter::from_config(&LlmConfig::from_env()?)?;
            for status in router.providers() {
                let flag = if status.configured { "configured" } else { "no API key" };
                println!("{:<8} {:<18} {flag}", status.id, status.label);
            }
        }
        Command::Prompt(args) => {
            let prompt = build_prompt(&args.phrases, &args.task_ids(), task_catalog());
            println!("{}", prompt.render());
        }
        Command::Refine(args) => run_refine(args).await?,
    }
    Ok(())
}

async fn run_refine(args: RefineArgs) -> Result<(), CliError> {
    if let Ok(kind) = args.provider.parse::<ProviderKind>() {
        eprintln!("refining with {}...", kind.label());
    }
    let router = ProviderRouter::from_config(&LlmConfig::from_env()?)?;
    let catalog = task_catalog();

    let refinement =
        refine_phrases(&router, &args.provider, &args.prompt.phrases, &args.prompt.task_ids(), catalog).await?;

    if let Refinement::Failed(envelope) = &refinement {
        if let Some(raw) = &envelope.raw_response {
            eprintln!("raw response:\n{raw}");
        }
        return Err(CliError::Failed(envelope.error.clone()));
    }
    for (key, markdown) in refinement.sections() {
        println!("## {}\n\n{markdown}\n", display_label(catalog, key));
    }
    Ok(())
}
