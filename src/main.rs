use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use smellscope_context::analyzer::Analyzer;
use smellscope_context::catalog::RuleCatalog;
use smellscope_context::report::FindingsReport;
use smellscope_core::{OutputFormat, SmellscopeConfig};
use smellscope_difflens::filter::FileFilter;
use smellscope_difflens::parser::{parse_changed_ranges, ChangeMap};

#[derive(Parser)]
#[command(
    name = "smellscope",
    version,
    about = "Scope static-analysis findings to changed lines and extract review context",
    long_about = "Smellscope decides which analyzer findings matter for a code review and\n\
                   what source text to show next to them.\n\n\
                   It diffs two revisions with zero context lines, keeps the findings that\n\
                   land on changed lines, and extracts a rule-sized window of surrounding\n\
                   source for each one — ready for inline review comments.\n\n\
                   Examples:\n  \
                     smellscope changes --base origin/main --head HEAD\n  \
                     smellscope analyze --report findings.json --base origin/main --head HEAD\n  \
                     git diff -U0 main | smellscope changes\n  \
                     smellscope rules --format markdown"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .smellscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown\n  \
                         sarif     SARIF v2.1.0 (analyze subcommand only)"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show which lines changed per tracked file between two revisions
    #[command(long_about = "Show which lines changed per tracked file between two revisions.\n\n\
        Runs git diff with zero context lines and parses the hunk headers into\n\
        per-file changed line intervals. Reads a saved diff from --diff-file or\n\
        stdin instead when no revisions are given.\n\n\
        Examples:\n  smellscope changes --base origin/main --head HEAD\n  \
        git diff -U0 main | smellscope changes\n  \
        smellscope changes --diff-file pr.patch --ext java --ext kt")]
    Changes {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Base revision to diff from
        #[arg(long)]
        base: Option<String>,

        /// Head revision to diff to
        #[arg(long)]
        head: Option<String>,

        /// Read a saved diff from a file instead of invoking git
        #[arg(long)]
        diff_file: Option<PathBuf>,

        /// Tracked file extensions (overrides configuration)
        #[arg(long)]
        ext: Vec<String>,
    },
    /// Pair analyzer findings with extracted source context
    #[command(long_about = "Pair analyzer findings with extracted source context.\n\n\
        Reads a findings report (JSON with an `issues` array), optionally drops\n\
        findings that overlap no changed line of the given diff, and extracts a\n\
        rule-sized window of source text around each remaining finding.\n\n\
        Examples:\n  smellscope analyze --report findings.json\n  \
        smellscope analyze --report findings.json --base origin/main --head HEAD\n  \
        smellscope analyze --report findings.json --diff-file pr.patch --format sarif")]
    Analyze {
        /// Findings report to ingest (JSON)
        #[arg(long)]
        report: PathBuf,

        /// Repository path findings are relative to (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Base revision; with --head, scopes findings to changed lines
        #[arg(long)]
        base: Option<String>,

        /// Head revision; with --base, scopes findings to changed lines
        #[arg(long)]
        head: Option<String>,

        /// Scope findings using a saved diff instead of invoking git
        #[arg(long)]
        diff_file: Option<PathBuf>,

        /// Exit with code 1 if any file's context extraction failed
        #[arg(long)]
        fail_on_skipped: bool,
    },
    /// Print the effective rule catalog
    #[command(long_about = "Print the effective rule catalog.\n\n\
        Shows the built-in per-rule context policies with any overrides from\n\
        .smellscope.toml applied, plus the fallback used for unknown rules.")]
    Rules,
    /// Create a default .smellscope.toml configuration file
    #[command(long_about = "Create a default .smellscope.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .smellscope.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("smellscope v{version} — review context for static-analysis findings\n");

    println!("Quick start:");
    println!("  smellscope init                                  Create a .smellscope.toml config file");
    println!("  smellscope changes --base origin/main --head HEAD  Show changed lines per tracked file");
    println!("  smellscope analyze --report findings.json          Extract context for findings\n");

    println!("All commands:");
    println!("  changes   Changed line intervals per tracked file");
    println!("  analyze   Findings paired with extracted source context");
    println!("  rules     Effective per-rule context policies");
    println!("  init      Create default configuration\n");

    println!("Run 'smellscope <command> --help' for details.");
}

fn read_diff_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

/// Resolve the change map from revisions, a saved diff, or stdin.
///
/// Returns `None` when the caller provided no diff source at all (only
/// meaningful for `analyze`, where scoping is optional).
fn resolve_changes(
    repo: &std::path::Path,
    base: &Option<String>,
    head: &Option<String>,
    diff_file: &Option<PathBuf>,
    filter: &FileFilter,
    allow_stdin: bool,
) -> Result<Option<ChangeMap>> {
    match (base, head) {
        (Some(base), Some(head)) => {
            let changes = smellscope_difflens::git::changed_ranges(repo, base, head, filter)
                .into_diagnostic()?;
            Ok(Some(changes))
        }
        (Some(_), None) | (None, Some(_)) => {
            miette::bail!("--base and --head must be given together");
        }
        (None, None) => {
            if diff_file.is_none() && !allow_stdin {
                return Ok(None);
            }
            let diff = read_diff_input(diff_file)?;
            if diff.trim().is_empty() && diff_file.is_none() {
                miette::bail!(miette::miette!(
                    help = "Pipe a diff to smellscope, e.g.: git diff -U0 main | smellscope changes\n       Or use --base/--head or --diff-file <path>",
                    "Empty diff input"
                ));
            }
            Ok(Some(parse_changed_ranges(&diff, filter)))
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# smellscope configuration
# See: https://github.com/smellscope/smellscope

[diff]
# File extensions whose changes are tracked
# extensions = ["java"]
# Glob patterns to skip even when the extension matches
# skip_patterns = ["src/generated/**", "*Test.java"]

[context]
# Extra lines padded around every finding before the per-rule window applies
# margin = 10

# Per-rule context window overrides; a "default" entry replaces the fallback
# [rules."java:S1488"]
# lines_above = 2
# lines_below = 3
# scope = "block"
# needs_wider_context = false
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SmellscopeConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".smellscope.toml");
            if default_path.exists() {
                SmellscopeConfig::from_file(default_path).into_diagnostic()?
            } else {
                SmellscopeConfig::default()
            }
        }
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!(
            "tracked extensions: {} | rule overrides: {}",
            config.diff.extensions.join(", "),
            config.rules.len(),
        );
    }

    match cli.command {
        None => {
            print_welcome();
            return Ok(());
        }
        Some(Command::Changes {
            ref repo,
            ref base,
            ref head,
            ref diff_file,
            ref ext,
        }) => {
            if cli.format == OutputFormat::Sarif {
                miette::bail!("SARIF output is only supported for the analyze subcommand.");
            }

            let filter = if ext.is_empty() {
                FileFilter::from_config(&config.diff)
            } else {
                FileFilter::new(ext, &config.diff.skip_patterns)
            };

            let changes = resolve_changes(repo, base, head, diff_file, &filter, true)?
                .unwrap_or_default();

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&changes).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Changed Lines\n");
                    if changes.is_empty() {
                        println!("No tracked files changed.");
                    } else {
                        println!("| File | Changed lines |");
                        println!("|------|---------------|");
                        for (file, ranges) in &changes {
                            let spans: Vec<String> =
                                ranges.iter().map(|r| r.to_string()).collect();
                            println!("| `{}` | {} |", file.display(), spans.join(", "));
                        }
                    }
                }
                OutputFormat::Text => {
                    if changes.is_empty() {
                        println!("No tracked files changed.");
                    } else {
                        for (file, ranges) in &changes {
                            let spans: Vec<String> =
                                ranges.iter().map(|r| r.to_string()).collect();
                            println!("{}: {}", file.display(), spans.join(", "));
                        }
                    }
                }
                OutputFormat::Sarif => unreachable!(),
            }
        }
        Some(Command::Analyze {
            ref report,
            ref repo,
            ref base,
            ref head,
            ref diff_file,
            fail_on_skipped,
        }) => {
            let findings = FindingsReport::from_file(report)
                .into_diagnostic()
                .wrap_err(format!("loading findings report {}", report.display()))?
                .by_file();

            let filter = FileFilter::from_config(&config.diff);
            let changes = resolve_changes(repo, base, head, diff_file, &filter, false)?;

            let catalog = RuleCatalog::builtin().with_overrides(&config.rules);
            let analyzer = Analyzer::with_margin(catalog, config.context.margin);
            let result = analyzer.analyze(repo, &findings, changes.as_ref());

            if cli.verbose {
                eprintln!("--- Analysis Stats ---");
                eprintln!(
                    "Files: {} analyzed, {} skipped",
                    result.stats.files_analyzed, result.stats.files_skipped
                );
                eprintln!(
                    "Findings: {} total, {} out of scope, {} changed regions",
                    result.stats.findings_total,
                    result.stats.out_of_scope,
                    result.stats.merged_regions,
                );
                eprintln!("----------------------");
            }

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&result).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    print!("{}", result.to_markdown());
                }
                OutputFormat::Sarif => {
                    let sarif = smellscope_context::sarif::to_sarif(&result);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&sarif).into_diagnostic()?
                    );
                }
                OutputFormat::Text => {
                    print!("{result}");
                }
            }

            if fail_on_skipped && !result.skipped.is_empty() {
                std::process::exit(1);
            }
        }
        Some(Command::Rules) => {
            if cli.format == OutputFormat::Sarif {
                miette::bail!("SARIF output is only supported for the analyze subcommand.");
            }

            let catalog = RuleCatalog::builtin().with_overrides(&config.rules);

            match cli.format {
                OutputFormat::Json => {
                    let mut rules = serde_json::Map::new();
                    for (id, policy) in catalog.iter() {
                        rules.insert(
                            id.to_string(),
                            serde_json::to_value(policy).into_diagnostic()?,
                        );
                    }
                    let json = serde_json::json!({
                        "rules": rules,
                        "default": catalog.default_policy(),
                    });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown => {
                    println!("# Rule Catalog\n");
                    println!("| Rule | Above | Below | Scope | Wider context |");
                    println!("|------|-------|-------|-------|---------------|");
                    for (id, policy) in catalog.iter() {
                        println!(
                            "| `{id}` | {} | {} | {} | {} |",
                            policy.lines_above,
                            policy.lines_below,
                            policy.scope,
                            if policy.needs_wider_context { "yes" } else { "no" },
                        );
                    }
                    let fallback = catalog.default_policy();
                    println!(
                        "| `default` | {} | {} | {} | {} |",
                        fallback.lines_above,
                        fallback.lines_below,
                        fallback.scope,
                        if fallback.needs_wider_context { "yes" } else { "no" },
                    );
                }
                OutputFormat::Text => {
                    for (id, policy) in catalog.iter() {
                        println!(
                            "{id:<14} above={:<3} below={:<3} scope={:<7} wider={}",
                            policy.lines_above,
                            policy.lines_below,
                            policy.scope.to_string(),
                            policy.needs_wider_context,
                        );
                    }
                    let fallback = catalog.default_policy();
                    println!(
                        "{:<14} above={:<3} below={:<3} scope={:<7} wider={}",
                        "default",
                        fallback.lines_above,
                        fallback.lines_below,
                        fallback.scope.to_string(),
                        fallback.needs_wider_context,
                    );
                }
                OutputFormat::Sarif => unreachable!(),
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".smellscope.toml");
            if path.exists() {
                miette::bail!(".smellscope.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .smellscope.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "smellscope", &mut std::io::stdout());
        }
    }

    Ok(())
}
