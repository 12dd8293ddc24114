//! The "unassigned" shelf: a fixed chain that stock lands on when no real
//! location has been chosen yet.

pub const LOCATION: &str = "Unassigned Location";
pub const SUB_LOCATION: &str = "Unassigned Sub Location";
pub const AREA: &str = "Unassigned Area";
pub const SUB_AREA: &str = "Unassigned Sub Area";

/// Names of the chain, root first.
pub const CHAIN: [&str; 4] = [LOCATION, SUB_LOCATION, AREA, SUB_AREA];
