use std::collections::HashSet;

use caddie_core::catalog::{CatalogSession, CatalogSnapshot, CatalogSource};
use caddie_core::domain::club::{ClubType, HandicapperLevel};
use caddie_core::domain::variant::VariantId;
use caddie_core::{Bag, MatchTier};
use caddie_db::{
    connect_with_settings, migrations, CatalogSeed, ClubRepository, SqlClubRepository,
};

type SeedContractTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
    ($left:expr, $right:expr, $($arg:tt)*) => {
        if $left != $right {
            return Err(format!($($arg)*));
        }
    };
}

async fn seeded_repository() -> SeedContractTestResult<SqlClubRepository> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    let repository = SqlClubRepository::new(pool);
    CatalogSeed::bundled()
        .map_err(|error| format!("bundled catalog: {error}"))?
        .load(&repository)
        .await
        .map_err(|error| format!("seed: {error}"))?;
    Ok(repository)
}

#[test]
fn bundled_catalog_covers_every_club_type() -> SeedContractTestResult {
    let seed = CatalogSeed::bundled().map_err(|error| format!("bundled catalog: {error}"))?;
    require!(seed.skipped().is_empty(), "bundled catalog skipped {:?}", seed.skipped());

    let kinds = seed.models().iter().filter_map(|model| model.kind()).collect::<HashSet<_>>();
    for kind in ClubType::BAG_ORDER {
        require!(kinds.contains(&kind), "bundled catalog has no {}", kind.as_str());
    }

    let mut variant_ids = HashSet::new();
    for model in seed.models() {
        require!(
            HandicapperLevel::from_label(&model.handicapper_level)
                .is_some_and(|level| level.as_str() == model.handicapper_level),
            "{} {} has non-canonical level {}",
            model.brand,
            model.model,
            model.handicapper_level
        );
        for variant in &model.variants {
            require!(variant_ids.insert(variant.id), "duplicate variant id {:?}", variant.id);
            require!(!variant.price.is_sign_negative());
        }
    }
    Ok(())
}

#[tokio::test]
async fn seeded_store_round_trips_the_bundled_catalog() -> SeedContractTestResult {
    let repository = seeded_repository().await?;
    let expected = CatalogSeed::bundled().map_err(|error| format!("bundled: {error}"))?;

    let stored = repository.list_club_models().await.map_err(|error| format!("list: {error}"))?;

    require_eq!(stored.len(), expected.models().len());
    for (stored, expected) in stored.iter().zip(expected.models()) {
        require_eq!(stored.id, expected.id);
        require_eq!(stored.variants.len(), expected.variants.len());
        for (stored, expected) in stored.variants.iter().zip(&expected.variants) {
            require_eq!(stored.id, expected.id);
            require_eq!(stored.price, expected.price);
            require_eq!(stored.prices.len(), expected.prices.len());
        }
    }
    Ok(())
}

#[tokio::test]
async fn reseeding_is_idempotent() -> SeedContractTestResult {
    let repository = seeded_repository().await?;
    let before = repository.list_club_models().await.map_err(|error| format!("list: {error}"))?;

    CatalogSeed::bundled()
        .map_err(|error| format!("bundled: {error}"))?
        .load(&repository)
        .await
        .map_err(|error| format!("reseed: {error}"))?;

    let after = repository.list_club_models().await.map_err(|error| format!("list: {error}"))?;
    require_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn seeded_store_feeds_the_gap_report() -> SeedContractTestResult {
    let repository = seeded_repository().await?;
    let document =
        repository.fetch_catalog().await.map_err(|error| format!("fetch: {error:?}"))?;
    let snapshot = CatalogSnapshot::from_document(document);
    require!(snapshot.issues().is_empty());

    let mut session = CatalogSession::new();
    require!(session.refresh(&repository).await);
    require_eq!(session.snapshot().models().len(), snapshot.models().len());

    // 7 iron at 33° and sand wedge at 56° leave one wide gap.
    let mut bag = Bag::new();
    for id in [1501, 1101] {
        let entry = snapshot
            .bag_entry(VariantId(id))
            .ok_or_else(|| format!("variant {id} should exist in the bundled catalog"))?;
        bag.add(entry).map_err(|rejection| format!("add {id}: {rejection}"))?;
    }

    let report = bag.gap_report(&snapshot);
    require_eq!(report.gaps.len(), 1);
    require_eq!(report.gaps[0].recommended_loft, 44.5);
    require_eq!(report.recommendations.len(), 1);
    let candidate = report.recommendations[0]
        .candidate
        .as_ref()
        .ok_or_else(|| "gap should have a recommended club".to_string())?;
    require_eq!(candidate.id(), VariantId(1301));
    require_eq!(report.recommendations[0].tier, Some(MatchTier::Close));
    Ok(())
}
