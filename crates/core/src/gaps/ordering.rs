use std::cmp::Ordering;

use crate::domain::bag_entry::BagEntry;
use crate::domain::club::ClubType;

pub const FAIRWAY_WOOD_ORDER: [&str; 5] = ["3 Wood", "5 Wood", "7 Wood", "9 Wood", "11 Wood"];
pub const WEDGE_ORDER: [&str; 4] = ["Pitching Wedge", "Gap Wedge", "Sand Wedge", "Lob Wedge"];

const LAST: u64 = u64::MAX;

fn type_rank(entry: &BagEntry) -> usize {
    entry
        .kind()
        .and_then(|kind| ClubType::BAG_ORDER.iter().position(|candidate| *candidate == kind))
        .unwrap_or(ClubType::BAG_ORDER.len())
}

fn listed_rank(list: &[&str], specific_type: Option<&str>) -> u64 {
    specific_type
        .and_then(|value| list.iter().position(|label| *label == value))
        .map_or(LAST, |position| position as u64)
}

fn first_integer(text: &str) -> Option<u64> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let digits = text[start..].chars().take_while(char::is_ascii_digit).collect::<String>();
    digits.parse().ok()
}

fn sub_rank(entry: &BagEntry) -> u64 {
    let specific_type = entry.specific_type.as_deref();
    match entry.kind() {
        Some(ClubType::FairwayWood) => listed_rank(&FAIRWAY_WOOD_ORDER, specific_type),
        Some(ClubType::Wedge) => listed_rank(&WEDGE_ORDER, specific_type),
        Some(ClubType::IronSet) => specific_type.and_then(first_integer).unwrap_or(LAST),
        _ => 0,
    }
}

pub fn compare_in_bag(a: &BagEntry, b: &BagEntry) -> Ordering {
    type_rank(a)
        .cmp(&type_rank(b))
        .then_with(|| sub_rank(a).cmp(&sub_rank(b)))
        .then_with(|| a.loft_degrees().total_cmp(&b.loft_degrees()))
}

/// Returns the entries in golf-bag order: club type, then the per-type
/// sub-rank, then ascending loft. Unknown types and sub-types go last and
/// keep their relative order.
pub fn canonical_order(entries: &[BagEntry]) -> Vec<BagEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(compare_in_bag);
    sorted
}
