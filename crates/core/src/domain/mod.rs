pub mod bag_entry;
pub mod club;
pub mod description;
pub mod variant;
