use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sqlctx::app::{CachedAnalyzer, ContextAnalyzer, WordInclude, last_word};
use sqlctx::error;
use sqlctx::infra::{AppConfig, ConfigError, OutputFormat, TomlConfigStore};
use sqlctx::render::{self, CursorIsolation};

const LOG_ENV: &str = "SQLCTX_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Cursor-aware SQL context analysis for completion engines.
///
/// SQL is taken from the argument, or from stdin when it is omitted.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: <config dir>/sqlctx/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding the config file
    #[arg(long, global = true, value_enum)]
    format: Option<FormatArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// CTEs of a leading WITH clause and the text after it
    Ctes { sql: Option<String> },
    /// Statement to complete against at each cursor offset
    Isolate {
        /// Byte offset of the cursor; repeatable (default: end of text)
        #[arg(long = "cursor")]
        cursors: Vec<usize>,
        sql: Option<String>,
    },
    /// Last significant keyword or open parenthesis
    Keyword {
        /// Trailing tokens to ignore
        #[arg(long, default_value_t = 0)]
        skip: usize,
        sql: Option<String>,
    },
    /// Whether a string or dollar quote is left open
    OpenQuote { sql: Option<String> },
    /// Parse a partially typed, possibly qualified name
    Identifier { word: String },
    /// Partial word at the end of the text
    LastWord {
        #[arg(long, value_enum, default_value_t = IncludeArg::AlphanumUnderscore)]
        include: IncludeArg,
        sql: Option<String>,
    },
    /// Whether any statement drops, truncates or rewrites data
    Destructive { sql: Option<String> },
    /// Write a default config file to the default location
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IncludeArg {
    AlphanumUnderscore,
    ManyPunctuations,
    MostPunctuations,
    AllPunctuations,
}

impl From<IncludeArg> for WordInclude {
    fn from(arg: IncludeArg) -> Self {
        match arg {
            IncludeArg::AlphanumUnderscore => Self::AlphanumUnderscore,
            IncludeArg::ManyPunctuations => Self::ManyPunctuations,
            IncludeArg::MostPunctuations => Self::MostPunctuations,
            IncludeArg::AllPunctuations => Self::AllPunctuations,
        }
    }
}

fn main() -> Result<()> {
    error::install_hooks()?;

    let args = Args::parse();
    let config = load_config(args.config.as_deref()).wrap_err("failed to load configuration")?;
    init_tracing(&config);

    let format = args.format.map_or(config.output.format, OutputFormat::from);
    let rendered = run(args.command, &config, format)?;

    let mut out = io::stdout().lock();
    writeln!(out, "{rendered}")?;
    Ok(())
}

fn run(command: Command, config: &AppConfig, format: OutputFormat) -> Result<String> {
    let analyzer = build_analyzer(config);

    let rendered = match command {
        Command::Ctes { sql } => {
            let sql = read_sql(sql)?;
            render::render_ctes(&analyzer.extract_ctes(&sql), format)?
        }
        Command::Isolate { cursors, sql } => {
            let sql = read_sql(sql)?;
            let cursors = if cursors.is_empty() {
                vec![sql.len()]
            } else {
                cursors
            };
            let mut cached = CachedAnalyzer::new(analyzer, config.cache.capacity);
            let isolations: Vec<CursorIsolation> = cursors
                .into_iter()
                .map(|cursor| CursorIsolation {
                    cursor,
                    result: cached.isolate_at(&sql, cursor),
                })
                .collect();
            debug!(cached = cached.cached_len(), "isolation done");
            render::render_isolations(&isolations, format)?
        }
        Command::Keyword { skip, sql } => {
            let sql = read_sql(sql)?;
            render::render_keyword(&analyzer.find_prev_keyword(&sql, skip), format)?
        }
        Command::OpenQuote { sql } => {
            render::render_flag(analyzer.is_open_quote(&read_sql(sql)?))
        }
        Command::Identifier { word } => {
            let identifier = analyzer.parse_partial_identifier(&word);
            render::render_identifier(identifier.as_ref(), format)?
        }
        Command::LastWord { include, sql } => {
            let sql = read_sql(sql)?;
            render::render_word(last_word(&sql, include.into()), format)?
        }
        Command::Destructive { sql } => {
            render::render_flag(analyzer.is_destructive(&read_sql(sql)?))
        }
        Command::InitConfig { force } => {
            let store = TomlConfigStore::new()?;
            let path = store.storage_path();
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            store.save(&AppConfig::default())?;
            path.display().to_string()
        }
    };

    Ok(rendered)
}

fn build_analyzer(config: &AppConfig) -> ContextAnalyzer {
    let analyzer = ContextAnalyzer::new();
    match &config.safety.destructive_keywords {
        Some(keywords) => analyzer.with_destructive_keywords(keywords.clone()),
        None => analyzer,
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return Ok(TomlConfigStore::load_from(path)?);
    }

    match TomlConfigStore::new() {
        Ok(store) => Ok(store.load()?),
        Err(ConfigError::NoConfigDir) => Ok(AppConfig::default()),
        Err(e) => Err(e.into()),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .ok()
        .or_else(|| {
            config
                .log
                .filter
                .as_deref()
                .and_then(|directives| EnvFilter::try_new(directives).ok())
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// The argument, or all of stdin minus one trailing newline.
fn read_sql(arg: Option<String>) -> Result<String> {
    if let Some(sql) = arg {
        return Ok(sql);
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .wrap_err("failed to read SQL from stdin")?;

    let trimmed_len = input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .map_or(input.len(), str::len);
    input.truncate(trimmed_len);
    Ok(input)
}
