use anyhow::{Context, Result, bail};
use chem_eval::file_io::average_ratio;
use chem_eval::{
    ChoiceSet, EndpointConfig, EvalOptions, HttpEndpoint, InferenceBackend, OpenRouterBackend,
    PromptStyle, SubjectEvaluator, Table, discover_subjects, logger, write_submission,
    write_summary,
};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Split {
    /// Labelled questions; accuracy is meaningful
    Val,
    /// Blind questions; only answers are collected
    Test,
}

impl Split {
    fn as_str(self) -> &'static str {
        match self {
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Http,
    Openrouter,
}

/// Multiple-choice benchmark evaluation against a chat-completions endpoint
#[derive(Debug, Parser)]
#[command(name = "chem-eval", version)]
struct Args {
    /// Directory holding `<split>/<subject>_<split>.csv` files
    #[arg(long, default_value = "data", env = "CHEM_EVAL_DATA_DIR")]
    data_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Split::Val)]
    split: Split,

    /// Evaluate only these subjects
    #[arg(long = "subject")]
    subjects: Vec<String>,

    /// Write per-subject result tables and a summary here
    #[arg(long, env = "CHEM_EVAL_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Http)]
    backend: Backend,

    #[arg(long, env = "CHEM_EVAL_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CHEM_EVAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = chem_eval::DEFAULT_MODEL, env = "CHEM_EVAL_MODEL")]
    model: String,

    #[arg(long, default_value_t = chem_eval::config::DEFAULT_TIMEOUT_SECS, env = "CHEM_EVAL_TIMEOUT_SECONDS")]
    timeout_secs: u64,

    /// Seed for the random answer fallback
    #[arg(long, env = "CHEM_EVAL_SEED")]
    seed: Option<u64>,

    /// Ask for step-by-step reasoning
    #[arg(long)]
    cot: bool,

    #[arg(long)]
    with_prompt: bool,

    #[arg(long, default_value = logger::DEFAULT_LOG_FILE, env = "CHEM_EVAL_LOG_FILE")]
    log_file: PathBuf,
}

fn build_backend(args: &Args) -> Result<Box<dyn InferenceBackend>> {
    match args.backend {
        Backend::Http => {
            let (Some(url), Some(key)) = (&args.api_url, &args.api_key) else {
                bail!("--api-url and --api-key are required for the http backend");
            };
            let config = EndpointConfig::new(url, key)
                .with_model(&args.model)
                .with_timeout(Duration::from_secs(args.timeout_secs));
            Ok(Box::new(HttpEndpoint::new(&config)?))
        }
        Backend::Openrouter => Ok(Box::new(OpenRouterBackend::new(&args.model)?)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_at(&args.log_file);

    let mut subjects = discover_subjects(&args.data_dir, args.split.as_str());
    if !args.subjects.is_empty() {
        subjects.retain(|(name, _)| args.subjects.contains(name));
    }
    if subjects.is_empty() {
        bail!(
            "no subjects found under {}",
            args.data_dir.join(args.split.as_str()).display()
        );
    }

    let evaluator = SubjectEvaluator::new(build_backend(&args)?, ChoiceSet::default());
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let options = EvalOptions {
        ground_truth_available: args.split == Split::Val,
        persist_dir: args.output_dir.clone(),
        prompt_style: PromptStyle {
            cot: args.cot,
            with_prompt: args.with_prompt,
        },
    };

    let mut ratios = BTreeMap::new();
    let mut all_answers = BTreeMap::new();

    for (subject, path) in &subjects {
        let table = Table::read(path).with_context(|| format!("reading {}", path.display()))?;
        let result = evaluator
            .evaluate_subject(subject, &table, &options, &mut rng)
            .await
            .with_context(|| format!("evaluating {}", subject))?;

        match args.split {
            Split::Val => println!(
                "{}: {:.2}% ({}/{})",
                subject, result.ratio, result.correct, result.total
            ),
            Split::Test => println!("{}: {} answers collected", subject, result.total),
        }

        ratios.insert(subject.clone(), result.ratio);
        all_answers.insert(subject.clone(), result.answers);
    }

    if args.split == Split::Val {
        println!("average: {:.2}%", average_ratio(&ratios));
    }

    if let Some(dir) = &args.output_dir {
        let path = match args.split {
            Split::Val => write_summary(dir, &ratios)?,
            Split::Test => write_submission(dir, &all_answers)?,
        };
        println!("wrote {}", path.display());
    }

    Ok(())
}
