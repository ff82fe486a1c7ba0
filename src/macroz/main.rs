use clap::Parser;
use directories::ProjectDirs;
use macroz::api::{ConfigAction, FindQuery, MacroApi, MacroPaths};
use macroz::config::MacroConfig;
use macroz::error::{MacroError, Result};
use macroz::formatter::Formatter;
use macroz::store::fs::FileBackend;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod args;
mod cli;
use args::{Cli, Commands};
use cli::print::{print_config, print_full_macro, print_macros, print_messages};

const HOME_ENV: &str = "MACROZ_HOME";
const LOG_ENV: &str = "MACROZ_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: MacroApi<FileBackend>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            name,
            content,
            input,
            encoded,
        }) => handle_add(&mut ctx, name, content, input, encoded),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Remove { selectors }) => handle_remove(&mut ctx, selectors),
        Some(Commands::Show { selector, raw }) => handle_show(&ctx, &selector, raw),
        Some(Commands::Find { term, name }) => handle_find(&ctx, term, name),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Path) => handle_path(&ctx),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn resolve_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "macroz", "macroz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MacroError::Config("Could not determine data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = resolve_home()?;
    let mut paths = MacroPaths::new(home);
    if let Some(file) = &cli.file {
        paths = paths.with_store_file(file.clone());
    }

    let mut config = MacroConfig::load(&paths.home)?;
    if let Some(name) = &cli.formatter {
        config.formatter = name.parse::<Formatter>().map_err(MacroError::Config)?;
    }
    debug!(
        store = %paths.store_file.display(),
        formatter = %config.formatter,
        "resolved store"
    );

    let backend = FileBackend::new(paths.store_file.clone()).with_options(config.store_options());
    Ok(AppContext {
        api: MacroApi::new(backend, paths),
    })
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    content: Option<String>,
    input: Option<PathBuf>,
    encoded: Option<String>,
) -> Result<()> {
    let result = match (input, encoded) {
        (_, Some(encoded)) => {
            let content = match content {
                Some(c) => c,
                None => macroz::notation::render(&macroz::codec::decode(&encoded)?),
            };
            ctx.api.add_encoded(name, content, encoded)?
        }
        (Some(path), None) => {
            let raw = std::fs::read(&path).map_err(MacroError::Io)?;
            ctx.api.add_macro(name, content, &raw)?
        }
        (None, None) => {
            let mut raw = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut raw)
                .map_err(MacroError::Io)?;
            ctx.api.add_macro(name, content, &raw)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_macros()?;
    print_macros(&result.listed_macros);
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.remove_macros(&selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, selector: &str, raw_only: bool) -> Result<()> {
    let result = ctx.api.show_macro(selector)?;
    let raw = result.raw_bytes.clone().unwrap_or_default();

    if raw_only {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&raw).map_err(MacroError::Io)?;
        stdout.flush().map_err(MacroError::Io)?;
    } else if let Some(dm) = result.listed_macros.first() {
        print_full_macro(dm, &raw);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_find(ctx: &AppContext, term: String, by_name: bool) -> Result<()> {
    let query = if by_name {
        FindQuery::Name(term)
    } else {
        FindQuery::ContentPrefix(term)
    };
    let result = ctx.api.find_macros(query)?;
    print_macros(&result.listed_macros);
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.store_path()?;
    for path in &result.paths {
        println!("{}", path.display());
    }
    Ok(())
}
