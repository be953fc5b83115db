use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::LoadArgs;
use crate::error::{AppError, AppResult, ValidationError};

/// Binary entry point: parses arguments, sets up logging and the runtime, and
/// runs the load test.
///
/// # Errors
///
/// Returns an error when the arguments or config are invalid or the run fails.
pub fn run() -> AppResult<()> {
    let matches = LoadArgs::command().get_matches();
    let args = LoadArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let args = resolve_args(args, &matches)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run_load(&args))
}

/// Merges the config file into the parsed arguments and checks that a target
/// is set.
fn resolve_args(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<LoadArgs> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }

    if args.url.is_none() {
        tracing::error!("Missing URL (pass a target URL or set `url` in the config file).");
        eprintln!("{}", LoadArgs::command().render_usage());
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    Ok(args)
}
