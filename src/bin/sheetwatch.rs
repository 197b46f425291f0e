use anyhow::{Context, Result, anyhow};
use sheetwatch::cache::RefreshCache;
use sheetwatch::cli::{self, Command};
use sheetwatch::clock::ZonedClock;
use sheetwatch::config::{Config, SourceConfig};
use sheetwatch::context::{AppContext, StandardContext};
use sheetwatch::controller::ReportController;
use sheetwatch::logging;
use sheetwatch::source::AnySource;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        cli::print_help("sheetwatch");
        return Ok(());
    }

    let ctx = StandardContext::new(args.root.clone());
    logging::init(&ctx, args.verbose)?;

    if args.command == Command::Init {
        return init_config(&ctx);
    }

    let config = match Config::load(&ctx) {
        Ok(c) => c,
        Err(e) if Config::is_missing_config_error(&e) => {
            eprintln!(
                "No configuration found at {}. Run 'sheetwatch init' to create one.",
                Config::get_path_string(&ctx)?
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading configuration:\n{}", e);
            std::process::exit(1);
        }
    };

    let source_config = config
        .source
        .as_ref()
        .ok_or_else(|| {
            anyhow!(
                "No [source] configured in {}",
                Config::get_path_string(&ctx).unwrap_or_default()
            )
        })?;
    let source = AnySource::from_config(source_config)?;
    let cache = Arc::new(RefreshCache::new(source, config.cache_ttl()));
    let clock = ZonedClock::new(config.tz()?);
    let controller = ReportController::new(
        cache,
        clock,
        config.max_display_items,
        config.allowed_callers.clone(),
    );

    log::info!("sheetwatch v{} starting ({:?})", env!("CARGO_PKG_VERSION"), args.command);

    match args.command {
        Command::Report(kind) => {
            let text = controller.respond(args.caller, &kind, args.force_refresh).await;
            println!("{}", text);
        }
        Command::Tasks => {
            if !controller.is_authorized(args.caller) {
                eprintln!("{}", sheetwatch::controller::UNAUTHORIZED_MESSAGE);
                std::process::exit(1);
            }
            let tasks = controller.load_tasks(args.force_refresh).await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Command::Refresh => match controller.refresh().await {
            Ok(n) => println!("Data refreshed: {} rows.", n),
            Err(e) => {
                log::error!("Refresh failed: {:#}", e);
                println!("{}", sheetwatch::controller::UNAVAILABLE_MESSAGE);
            }
        },
        Command::Status => println!("{}", controller.status_text()),
        Command::Init | Command::Help => {}
    }

    Ok(())
}

fn init_config(ctx: &dyn AppContext) -> Result<()> {
    let path = ctx.get_config_file_path()?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let data_dir = ctx.get_data_dir()?;
    let config = Config {
        source: Some(SourceConfig::File {
            path: data_dir.join("tasks.json"),
        }),
        ..Config::default()
    };
    config
        .save(ctx)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    println!(
        "Point [source] at your sheet, or export rows to {}",
        data_dir.join("tasks.json").display()
    );
    Ok(())
}
