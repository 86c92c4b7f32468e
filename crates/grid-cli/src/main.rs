//! `grid` - inspect and edit spec-driven grids from the terminal

mod commands;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{ListArgs, SharedGateway};
use grid_core::GridConfig;
use grid_spec::ModelSpec;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn spec_arg() -> Arg {
    Arg::new("spec")
        .required(true)
        .help("Spec file (.json, .yaml, .toml) or built-in resource name")
}

fn key_arg() -> Arg {
    Arg::new("key")
        .long("key")
        .required(true)
        .help("Data-key value of the row (JSON, or a bare string)")
}

fn cli() -> Command {
    Command::new("grid")
        .version(grid_core::VERSION)
        .about("Spec-driven tables synchronized with a CRUD API")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Grid configuration file (TOML)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("API base URL, overriding the configuration"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .help("Bearer token (defaults to $GRID_API_TOKEN)"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Use built-in in-memory sample data instead of the API"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a spec and print its resolved columns")
                .arg(spec_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("Fetch and print one page of rows")
                .arg(spec_arg())
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .action(ArgAction::Append)
                        .help("Column filter as Field=value (repeatable)"),
                )
                .arg(
                    Arg::new("global")
                        .long("global")
                        .help("Free-text filter across searchable fields"),
                )
                .arg(Arg::new("sort").long("sort").help("Sort by this field"))
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .help("Sort descending"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_parser(value_parser!(u32))
                        .help("Viewport width in pixels"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Page to print (1-based)"),
                )
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .value_parser(value_parser!(usize))
                        .help("Rows per page"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print raw records as JSON"),
                ),
        )
        .subcommand(
            Command::new("upsert")
                .about("Create or replace a record")
                .arg(spec_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .required(true)
                        .help("Record as a JSON object; a null or missing key creates"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change one cell of an existing row")
                .arg(spec_arg())
                .arg(key_arg())
                .arg(Arg::new("field").long("field").required(true))
                .arg(Arg::new("value").long("value").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a row after confirmation")
                .arg(spec_arg())
                .arg(key_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the deletion"),
                ),
        )
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<GridConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    if let Some(url) = matches.get_one::<String>("base-url") {
        let gateway = config.gateway.clone().with_base_url(url.as_str());
        config = config.with_gateway(gateway);
    }
    config.validate()?;
    Ok(config)
}

fn session(matches: &ArgMatches, args: &ArgMatches) -> Result<(ModelSpec, SharedGateway, GridConfig)> {
    let config = load_config(matches)?;
    let spec = args
        .get_one::<String>("spec")
        .context("missing spec argument")?;
    let model = commands::resolve_spec(spec)?;
    let gateway = commands::open_gateway(
        &config,
        matches.get_one::<String>("token").cloned(),
        matches.get_flag("demo"),
    )?;
    Ok((model, gateway, config))
}

async fn run(matches: ArgMatches) -> Result<()> {
    let mut out = std::io::stdout().lock();

    match matches.subcommand() {
        Some(("validate", args)) => {
            let config = load_config(&matches)?;
            let spec = args
                .get_one::<String>("spec")
                .context("missing spec argument")?;
            commands::validate(&commands::resolve_spec(spec)?, &config, &mut out)
        }
        Some(("list", args)) => {
            let (model, gateway, mut config) = session(&matches, args)?;
            if let Some(width) = args.get_one::<u32>("width") {
                config = config.with_viewport_width(*width);
            }
            let filters = args
                .get_many::<String>("filter")
                .unwrap_or_default()
                .map(|f| commands::parse_filter_arg(f))
                .collect::<Result<Vec<_>>>()?;
            let list = ListArgs {
                filters,
                global: args.get_one::<String>("global").cloned(),
                sort: args.get_one::<String>("sort").cloned(),
                descending: args.get_flag("desc"),
                page: args.get_one::<usize>("page").copied().unwrap_or(1),
                rows: args.get_one::<usize>("rows").copied(),
                json: args.get_flag("json"),
            };
            commands::list(model, gateway, config, &list, &mut out).await
        }
        Some(("upsert", args)) => {
            let (model, gateway, config) = session(&matches, args)?;
            let json = args.get_one::<String>("json").context("missing --json")?;
            commands::upsert(model, gateway, config, json, &mut out).await
        }
        Some(("edit", args)) => {
            let (model, gateway, config) = session(&matches, args)?;
            let key = commands::parse_key(args.get_one::<String>("key").context("missing --key")?);
            let field = args.get_one::<String>("field").context("missing --field")?;
            let value = args.get_one::<String>("value").context("missing --value")?;
            commands::edit(model, gateway, config, &key, field, value, &mut out).await
        }
        Some(("delete", args)) => {
            let (model, gateway, config) = session(&matches, args)?;
            let key = commands::parse_key(args.get_one::<String>("key").context("missing --key")?);
            commands::delete(model, gateway, config, &key, args.get_flag("yes"), &mut out).await
        }
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"), matches.get_flag("log-json"));

    if let Err(e) = run(matches).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let matches = cli()
            .try_get_matches_from([
                "grid", "list", "CardSet", "--demo", "--filter", "Name=fib", "--filter", "CardSetId=1",
            ])
            .unwrap();
        assert!(matches.get_flag("demo"));
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_many::<String>("filter").unwrap().count(), 2);
        assert_eq!(args.get_one::<usize>("page"), Some(&1));
    }

    #[test]
    fn delete_requires_key() {
        assert!(cli()
            .try_get_matches_from(["grid", "delete", "CardSet"])
            .is_err());
    }
}
