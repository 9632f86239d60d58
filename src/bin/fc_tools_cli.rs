//src/bin/fc_tools_cli.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use fc_tools::{brite, matchfcs, psiblast, reshape, traits, KeggRestClient};

#[derive(Debug, Parser)]
#[command(name = "fc-tools", version = env!("CARGO_PKG_VERSION"), about = "Functional-cluster annotation utilities", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Keep PSI-BLAST hits with more than 50% identity.
    FilterPsiblast(FilterArgs),
    /// Look up BRITE classification levels for KO-annotated clusters.
    BriteInfo(BriteArgs),
    /// Resolve cluster representatives to amino-acid sequences.
    IdentifyTraits(ClusterGenomeArgs),
    /// Reshape MCL clusters into a Genome / Protein / FC table.
    MclReshape(ClusterGenomeArgs),
    /// Join a long genome table against BRITE annotations.
    MatchFcs(MatchArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// PSI-BLAST tabular output.
    #[arg(short = 'i', value_name = "FILE")]
    input: PathBuf,
    /// Output directory.
    #[arg(short = 'o', value_name = "DIR")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct BriteArgs {
    /// FC<TAB>KO list.
    #[arg(short = 'i', value_name = "FILE")]
    input: PathBuf,
    /// Output directory.
    #[arg(short = 'o', value_name = "DIR")]
    out_dir: PathBuf,
    /// KEGG REST `get` endpoint; the KO identifier is appended.
    #[arg(long, env = "KEGG_REST_URL", default_value = brite::DEFAULT_KEGG_URL)]
    kegg_url: String,
    /// Per-request timeout.
    #[arg(long, default_value_t = brite::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Debug, Args)]
struct ClusterGenomeArgs {
    /// MCL output, one cluster per line.
    #[arg(short = 'm', value_name = "FILE")]
    mcl: PathBuf,
    /// Concatenated genome FASTA.
    #[arg(short = 'g', value_name = "FILE")]
    genomes: PathBuf,
    /// Output directory.
    #[arg(short = 'o', value_name = "DIR")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Long-format genome table.
    #[arg(short = 'g', value_name = "FILE")]
    genomes: PathBuf,
    /// Annotated FCs table.
    #[arg(short = 'a', value_name = "FILE")]
    annotations: PathBuf,
    /// Output directory.
    #[arg(short = 'o', value_name = "DIR")]
    out_dir: PathBuf,
}

fn spinner(color: &str, msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(msg);
    spinner
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::FilterPsiblast(args) => {
            let (summary, out) = psiblast::run(&args.input, &args.out_dir)
                .with_context(|| format!("filtering {}", args.input.display()))?;
            log::info!("{} of {} rows kept -> {}", summary.retained, summary.total, out.display());
        }
        Command::BriteInfo(args) => {
            let client = KeggRestClient::new(args.kegg_url, Duration::from_secs(args.timeout_secs))
                .context("building KEGG client")?;
            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.green} {pos}/{len} {msg}")
                    .expect("Invalid progress template"),
            );
            let (rows, out) = brite::run(&args.input, &args.out_dir, &client, &progress)
                .with_context(|| format!("fetching BRITE info for {}", args.input.display()))?;
            log::info!("{} BRITE rows -> {}", rows.len(), out.display());
        }
        Command::IdentifyTraits(args) => {
            let spinner = spinner("blue", "Resolving cluster sequences...");
            let (records, paths) = traits::run(&args.mcl, &args.genomes, &args.out_dir)
                .with_context(|| format!("resolving {} against {}", args.mcl.display(), args.genomes.display()))?;
            spinner.finish_with_message(format!(
                "Wrote {} sequences across {} files.",
                records.len(),
                paths.len()
            ));
        }
        Command::MclReshape(args) => {
            let spinner = spinner("yellow", "Sorting functional clusters to each genome...");
            let (rows, out) = reshape::run(&args.mcl, &args.genomes, &args.out_dir)
                .with_context(|| format!("reshaping {}", args.mcl.display()))?;
            spinner.finish_with_message(format!("Wrote {} rows to {}.", rows.len(), out.display()));
        }
        Command::MatchFcs(args) => {
            let spinner = spinner("cyan", "Matching BRITE annotations to FCs...");
            let (lines, out) = matchfcs::run(&args.genomes, &args.annotations, &args.out_dir)
                .with_context(|| format!("matching {} against {}", args.genomes.display(), args.annotations.display()))?;
            spinner.finish_with_message(format!(
                "Wrote {} rows to {}.",
                lines.len().saturating_sub(1),
                out.display()
            ));
        }
    }
    Ok(())
}
