mod output;

pub use output::{display_groups, display_summary};
