use std::str::FromStr;

use caddie_core::catalog::page::PAGE_SIZE_OPTIONS;
use caddie_core::catalog::{FilterCriteria, SortKey};
use caddie_core::config::AppConfig;
use caddie_core::preferences::{
    parse_loft_inputs, JsonFilePreferenceStore, PreferenceStore, CURRENT_CLUB_LOFTS_KEY,
};
use caddie_core::BrowseState;
use clap::Args;
use rust_decimal::Decimal;

use crate::commands::{load_config, load_snapshot, runtime, CommandResult, Failure, EXIT_CONFIG};

#[derive(Clone, Debug, Default, Args)]
pub struct BrowseArgs {
    #[arg(long, help = "Club type, e.g. Driver, Iron, Wedge (\"All\" for every type)")]
    pub category: Option<String>,
    #[arg(long, help = "Specific type within the category, e.g. \"Gap Wedge\"")]
    pub sub_item: Option<String>,
    #[arg(long, help = "Iron set composition, e.g. 5-PW")]
    pub sub_sub_item: Option<String>,
    #[arg(long, help = "Case-insensitive text matched against brand and model")]
    pub search: Option<String>,
    #[arg(long, help = "Left or Right")]
    pub handedness: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long = "level", help = "Handicapper level, e.g. \"Mid Handicapper\"")]
    pub handicapper_level: Option<String>,
    #[arg(long)]
    pub price_min: Option<String>,
    #[arg(long)]
    pub price_max: Option<String>,
    #[arg(long, help = "default | price-asc | price-desc | brand | loft")]
    pub sort: Option<String>,
    #[arg(long, help = "1-based page number")]
    pub page: Option<usize>,
    #[arg(long, help = "25, 50, 75 or 100")]
    pub page_size: Option<usize>,
    #[arg(
        long = "loft",
        value_delimiter = ',',
        help = "Lofts of clubs you own; narrows results to the gaps between them"
    )]
    pub lofts: Vec<String>,
    #[arg(long, conflicts_with = "lofts", help = "Use the lofts saved with `caddie lofts --save`")]
    pub use_saved_lofts: bool,
}

pub fn run(args: &BrowseArgs) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(failure) => return CommandResult::from_failure("browse", failure),
    };
    let mut state = match browse_state(args, &config) {
        Ok(state) => state,
        Err(failure) => return CommandResult::from_failure("browse", failure),
    };
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return CommandResult::from_failure("browse", failure),
    };

    let snapshot = match runtime.block_on(load_snapshot(&config)) {
        Ok(snapshot) => snapshot,
        Err(failure) => return CommandResult::from_failure("browse", failure),
    };

    state.go_to_page(args.page.unwrap_or(1));
    let page = state.query(&snapshot);
    let message = format!(
        "page {} of {} ({} matching club models, sorted by {})",
        page.page,
        page.total_pages,
        page.total_items,
        state.sort().as_str()
    );
    CommandResult::success_with_data("browse", message, page)
}

fn browse_state(args: &BrowseArgs, config: &AppConfig) -> Result<BrowseState, Failure> {
    let page_size = args.page_size.unwrap_or(config.catalog.default_page_size);
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        return Err(invalid_argument(format!(
            "page size must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}"
        )));
    }
    let sort = SortKey::from_str(args.sort.as_deref().unwrap_or_default())
        .map_err(|error| invalid_argument(error.to_string()))?;

    let criteria = FilterCriteria {
        category: args.category.clone(),
        sub_item: args.sub_item.clone(),
        sub_sub_item: args.sub_sub_item.clone(),
        search: args.search.clone(),
        handedness: args.handedness.clone(),
        brand: args.brand.clone(),
        handicapper_level: args.handicapper_level.clone(),
        price_min: parse_price(args.price_min.as_deref(), "--price-min")?,
        price_max: parse_price(args.price_max.as_deref(), "--price-max")?,
        loft_gap_targets: None,
    };

    let mut state = BrowseState::with_page_size(page_size);
    state.set_criteria(criteria);
    state.set_sort(sort);

    if !args.lofts.is_empty() {
        state.apply_loft_preferences(&parse_loft_inputs(&args.lofts));
    } else if args.use_saved_lofts {
        let store = JsonFilePreferenceStore::new(&config.preferences.directory);
        state.apply_loft_preferences(&store.load_lofts(CURRENT_CLUB_LOFTS_KEY));
    }
    Ok(state)
}

fn parse_price(raw: Option<&str>, flag: &str) -> Result<Option<Decimal>, Failure> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => Decimal::from_str(value.trim_start_matches('$'))
            .map(Some)
            .map_err(|_| {
                invalid_argument(format!("{flag} must be a decimal number, got `{value}`"))
            }),
    }
}

fn invalid_argument(message: String) -> Failure {
    ("invalid_argument", message, EXIT_CONFIG)
}

#[cfg(test)]
mod tests {
    use caddie_core::catalog::SortKey;
    use caddie_core::config::AppConfig;
    use rust_decimal::Decimal;

    use super::{browse_state, BrowseArgs};

    #[test]
    fn arguments_become_criteria_and_sort() {
        let args = BrowseArgs {
            category: Some("Wedge".to_string()),
            price_max: Some("$150".to_string()),
            sort: Some("price-asc".to_string()),
            page_size: Some(25),
            ..BrowseArgs::default()
        };

        let state = browse_state(&args, &AppConfig::default()).expect("valid arguments");

        assert_eq!(state.sort(), SortKey::PriceAsc);
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.criteria().category.as_deref(), Some("Wedge"));
        assert_eq!(state.criteria().price_max, Some(Decimal::from(150)));
        assert_eq!(state.criteria().loft_gap_targets, None);
    }

    #[test]
    fn loft_arguments_set_gap_targets() {
        let args = BrowseArgs {
            lofts: vec!["46".to_string(), "56°".to_string()],
            ..BrowseArgs::default()
        };

        let state = browse_state(&args, &AppConfig::default()).expect("valid arguments");
        let targets = state.criteria().loft_gap_targets.as_ref().expect("targets");

        assert_eq!(targets.targets, vec![51.0]);
    }

    #[test]
    fn rejects_unknown_sort_page_size_and_price() {
        let config = AppConfig::default();
        let cases = [
            BrowseArgs { sort: Some("newest".to_string()), ..BrowseArgs::default() },
            BrowseArgs { page_size: Some(30), ..BrowseArgs::default() },
            BrowseArgs { price_min: Some("cheap".to_string()), ..BrowseArgs::default() },
        ];

        for args in cases {
            let (class, _, code) = browse_state(&args, &config).expect_err("should be rejected");
            assert_eq!(class, "invalid_argument");
            assert_eq!(code, 2);
        }
    }
}
