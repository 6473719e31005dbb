use std::path::Path;

use caddie_db::{CatalogSeed, ClubRepository, SeedSummary, SqlClubRepository};

use crate::commands::{
    load_config, open_store, runtime, CommandResult, Failure, EXIT_CONFIG, EXIT_EXECUTION,
    EXIT_UNAVAILABLE,
};

pub fn run(file: Option<&Path>) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(failure) => return CommandResult::from_failure("seed", failure),
    };

    let seed = match file {
        Some(path) => CatalogSeed::from_path(path),
        None => CatalogSeed::bundled(),
    };
    let seed = match seed {
        Ok(seed) => seed,
        Err(error) => {
            return CommandResult::failure("seed", "seed_input", error.to_string(), EXIT_CONFIG);
        }
    };

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(failure) => return CommandResult::from_failure("seed", failure),
    };

    let result = runtime.block_on(async {
        let pool = open_store(&config).await?;
        let repository = SqlClubRepository::new(pool.clone());

        let loaded = seed
            .load(&repository)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_EXECUTION));
        let stored = repository.list_club_models().await;
        pool.close().await;

        let summary = loaded?;
        let stored = stored
            .map_err(|error| ("seed_verification", error.to_string(), EXIT_UNAVAILABLE))?;
        if stored.len() != summary.clubs_loaded {
            return Err((
                "seed_verification",
                format!(
                    "expected {} club models after seeding, found {}",
                    summary.clubs_loaded,
                    stored.len()
                ),
                EXIT_UNAVAILABLE,
            ));
        }
        Ok::<SeedSummary, Failure>(summary)
    });

    match result {
        Ok(summary) => {
            let message = describe(&summary, file);
            CommandResult::success_with_data("seed", message, summary)
        }
        Err(failure) => CommandResult::from_failure("seed", failure),
    }
}

fn describe(summary: &SeedSummary, file: Option<&Path>) -> String {
    let origin = match file {
        Some(path) => path.display().to_string(),
        None => "bundled catalog".to_string(),
    };
    let mut lines = vec![format!(
        "loaded {} club models ({} variants, {} retailer offers) from {origin}",
        summary.clubs_loaded, summary.variants_loaded, summary.offers_loaded
    )];
    for skip in &summary.skipped {
        let variant = skip.variant_id.map(|id| format!(" variant {id}")).unwrap_or_default();
        lines.push(format!(
            "  - skipped {} {}{variant}: {:?}",
            skip.brand, skip.model, skip.reason
        ));
    }
    lines.join("\n")
}
