use swipe_deck::app_logic::DeckController;
use swipe_deck::core::path_utils;
use swipe_deck::core::{
    ConfigManagerOperations, CoreConfigManager, DeckConfig, load_stack_from_path,
};
use swipe_deck::presentation::{ScriptRunner, SessionScript};

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use time::macros::format_description;

const APP_NAME: &str = "SwipeDeck";
const LOG_FILENAME: &str = "swipe_deck.log";
const DEFAULT_SCRIPT_PATH: &str = "demos/session.json";
const DEFAULT_PROFILES_PATH: &str = "demos/profiles.json";

/*
 * Terminal output at info level, plus a debug-level log file in the per-user config
 * directory when one is available.
 */
fn initialize_logging() {
    let log_config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    match path_utils::app_config_file(APP_NAME, LOG_FILENAME).map(File::create) {
        Some(Ok(file)) => loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, file)),
        Some(Err(e)) => eprintln!("Could not create log file: {e}"),
        None => eprintln!("No config directory available, logging to terminal only"),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logger: {e}");
    }
}

fn load_deck_config() -> DeckConfig {
    match CoreConfigManager::new().load_config(APP_NAME) {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::debug!("main: No saved deck config, using defaults");
            DeckConfig::default()
        }
        Err(e) => {
            log::warn!("main: Ignoring unusable deck config: {e}");
            DeckConfig::default()
        }
    }
}

/*
 * Applies the script's screen width, if any. Width-derived thresholds can become
 * invalid (e.g. an edge inset wider than the screen), in which case the defaults
 * at that width are used instead.
 */
fn apply_screen_width(mut config: DeckConfig, screen_width: Option<f64>) -> DeckConfig {
    let Some(width) = screen_width else {
        return config;
    };
    log::debug!("main: Script overrides screen width to {width}");
    config.screen_width = width;
    if let Err(e) = config.validate() {
        log::warn!("main: Deck config unusable at width {width} ({e}), using defaults");
        config = DeckConfig {
            screen_width: width,
            ..DeckConfig::default()
        };
    }
    config
}

fn main() -> ExitCode {
    initialize_logging();

    let mut args = std::env::args().skip(1);
    let script_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_SCRIPT_PATH.into()));
    let profiles_path =
        PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_PROFILES_PATH.into()));

    let script = match SessionScript::load_from_path(&script_path) {
        Ok(script) => script,
        Err(e) => {
            log::error!("main: Failed to load session script {script_path:?}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = apply_screen_width(load_deck_config(), script.screen_width);

    let stack = match load_stack_from_path(&profiles_path, config.undo_policy) {
        Ok(stack) => stack,
        Err(e) => {
            log::error!("main: Failed to load profiles {profiles_path:?}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller = DeckController::new(Box::new(stack), config);
    let runner = ScriptRunner::for_script(&script);
    log::info!(
        "main: Running {} steps from {script_path:?}",
        script.steps.len()
    );
    for (index, step) in script.steps.iter().enumerate() {
        let commands = runner.run_step(step, &mut controller);
        log::debug!(
            "main: Step {index} {step:?} produced {} commands",
            commands.len()
        );
        log::info!("main: [{index}] {}", controller.status_line());
    }
    ExitCode::SUCCESS
}
