use caddie_core::preferences::{
    parse_loft_inputs, recommended_lofts, JsonFilePreferenceStore, PreferenceStore,
    CURRENT_CLUB_LOFTS_KEY,
};
use serde::Serialize;

use crate::commands::{load_config, CommandResult, EXIT_CONFIG, EXIT_EXECUTION};

#[derive(Debug, Serialize)]
struct LoftsOutput {
    lofts: Vec<f64>,
    recommended: Vec<f64>,
    saved: bool,
}

/// Without values, reports the saved lofts. With values, reports them and
/// replaces the saved set when `save` is given.
pub fn run(values: &[String], save: bool) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(failure) => return CommandResult::from_failure("lofts", failure),
    };
    let store = JsonFilePreferenceStore::new(&config.preferences.directory);

    let parsed = parse_loft_inputs(values);
    if save && parsed.is_empty() {
        return CommandResult::failure(
            "lofts",
            "invalid_argument",
            "--save needs at least one loft in (0, 70]",
            EXIT_CONFIG,
        );
    }

    let lofts = if values.is_empty() {
        store.load_lofts(CURRENT_CLUB_LOFTS_KEY)
    } else if save {
        match store.save_lofts(CURRENT_CLUB_LOFTS_KEY, &parsed) {
            Ok(saved) => saved,
            Err(error) => {
                return CommandResult::failure(
                    "lofts",
                    "preference_write",
                    error.to_string(),
                    EXIT_EXECUTION,
                );
            }
        }
    } else {
        parsed
    };

    let recommended = recommended_lofts(&lofts);
    let message = if recommended.is_empty() {
        format!("{} lofts, no gaps wider than five degrees", lofts.len())
    } else {
        let targets = recommended.iter().map(|loft| format!("{loft}°")).collect::<Vec<_>>();
        format!("{} lofts, fill gaps near {}", lofts.len(), targets.join(", "))
    };

    CommandResult::success_with_data(
        "lofts",
        message,
        LoftsOutput { lofts, recommended, saved: save },
    )
}
