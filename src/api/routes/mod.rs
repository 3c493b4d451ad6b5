pub mod archetypes;
pub mod cards;
pub mod matchups;
pub mod metagame;
pub mod overview;
pub mod players;
pub mod reload;

use crate::calculate::table::{SortDirection, SortState};

/// Sort state from optional query parameters, falling back to the column's
/// default, descending.
pub(crate) fn sort_state<C>(sort: Option<C>, dir: Option<SortDirection>) -> SortState<C>
where
    C: Copy + PartialEq + Default,
{
    SortState::new(sort.unwrap_or_default(), dir.unwrap_or_default())
}
