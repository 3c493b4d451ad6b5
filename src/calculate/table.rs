//! Sorting, searching and paging for the presentation tables.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{
    ArchetypeMetagameRow, ArchetypeSummaryRow, CardStat, CardUsage, PlayerRecord,
};

// ── Sorting ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Current sort column and direction of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Clicking the active column flips direction; a new column starts
    /// descending.
    pub fn toggle(&mut self, column: C) {
        if self.column == column {
            self.direction = self.direction.flip();
        } else {
            self.column = column;
            self.direction = SortDirection::Desc;
        }
    }
}

/// A row type that can be ordered by one of its columns.
pub trait Sortable {
    type Column: Copy + PartialEq;

    /// Ascending comparison on `column`.
    fn compare(&self, other: &Self, column: Self::Column) -> Ordering;
}

/// Stable sort by the given state.
pub fn sort_rows<T: Sortable>(rows: &mut [T], state: &SortState<T::Column>) {
    rows.sort_by(|a, b| state.direction.apply(a.compare(b, state.column)));
}

/// Total order on floats, NaN sorted last.
pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Case-insensitive string order.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ── Searching ───────────────────────────────────────────────────────

/// A row type that can be matched against a free-text search.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any searchable field.
    fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Keep rows matching `term`; an empty term keeps everything.
pub fn filter_rows<T: Searchable>(rows: Vec<T>, term: &str) -> Vec<T> {
    if term.trim().is_empty() {
        return rows;
    }
    rows.into_iter().filter(|r| r.matches_search(term)).collect()
}

// ── Paging ──────────────────────────────────────────────────────────

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows skipped before this page; saturates for pages far past the end.
    pub fn offset(&self) -> usize {
        let offset = u64::from(self.page - 1) * u64::from(self.page_size);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Slice one page out of `rows`. Pages past the end are empty.
pub fn paginate<T>(rows: Vec<T>, pagination: &Pagination) -> (Vec<T>, PaginationMeta) {
    let meta = PaginationMeta::new(pagination, rows.len() as u32);
    let page = rows
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.page_size as usize)
        .collect();
    (page, meta)
}

// ── Row types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeColumn {
    Archetype,
    Players,
    Wins,
    Losses,
    Draws,
    #[default]
    WinRate,
    GameWinRate,
    TotalMatches,
}

impl Sortable for ArchetypeSummaryRow {
    type Column = ArchetypeColumn;

    fn compare(&self, other: &Self, column: ArchetypeColumn) -> Ordering {
        match column {
            ArchetypeColumn::Archetype => compare_text(&self.archetype, &other.archetype),
            ArchetypeColumn::Players => self.players.cmp(&other.players),
            ArchetypeColumn::Wins => self.wins.cmp(&other.wins),
            ArchetypeColumn::Losses => self.losses.cmp(&other.losses),
            ArchetypeColumn::Draws => self.draws.cmp(&other.draws),
            ArchetypeColumn::WinRate => compare_f64(self.win_rate, other.win_rate),
            ArchetypeColumn::GameWinRate => compare_f64(self.game_win_rate, other.game_win_rate),
            ArchetypeColumn::TotalMatches => self.total_matches.cmp(&other.total_matches),
        }
    }
}

impl Searchable for ArchetypeSummaryRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.archetype.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerColumn {
    Player,
    Archetype,
    Wins,
    Losses,
    #[default]
    WinRate,
    GameWinRate,
    TotalMatches,
}

impl Sortable for PlayerRecord {
    type Column = PlayerColumn;

    fn compare(&self, other: &Self, column: PlayerColumn) -> Ordering {
        let (a, b) = (&self.record, &other.record);
        match column {
            PlayerColumn::Player => compare_text(&self.player, &other.player),
            PlayerColumn::Archetype => compare_text(&self.archetype, &other.archetype),
            PlayerColumn::Wins => a.record.wins.cmp(&b.record.wins),
            PlayerColumn::Losses => a.record.losses.cmp(&b.record.losses),
            PlayerColumn::WinRate => compare_f64(a.win_rate, b.win_rate),
            PlayerColumn::GameWinRate => compare_f64(a.game_win_rate, b.game_win_rate),
            PlayerColumn::TotalMatches => a.record.total_matches.cmp(&b.record.total_matches),
        }
    }
}

impl Searchable for PlayerRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.player.as_str(), self.archetype.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColumn {
    Name,
    #[default]
    TotalCopies,
    MainDeckCopies,
    SideboardCopies,
    DecksIncluded,
}

impl Sortable for CardUsage {
    type Column = CardColumn;

    fn compare(&self, other: &Self, column: CardColumn) -> Ordering {
        match column {
            CardColumn::Name => compare_text(&self.name, &other.name),
            CardColumn::TotalCopies => self.total_copies.cmp(&other.total_copies),
            CardColumn::MainDeckCopies => self.main_deck_copies.cmp(&other.main_deck_copies),
            CardColumn::SideboardCopies => self.sideboard_copies.cmp(&other.sideboard_copies),
            CardColumn::DecksIncluded => self.decks_included.cmp(&other.decks_included),
        }
    }
}

impl Searchable for CardUsage {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatColumn {
    Name,
    Archetype,
    #[default]
    TotalCopies,
    MainDeckAverage,
    MainDeckPercentage,
    SideboardAverage,
    SideboardPercentage,
    PercentageIncluded,
}

impl Sortable for CardStat {
    type Column = CardStatColumn;

    fn compare(&self, other: &Self, column: CardStatColumn) -> Ordering {
        match column {
            CardStatColumn::Name => compare_text(&self.name, &other.name),
            CardStatColumn::Archetype => compare_text(
                self.archetype.as_deref().unwrap_or_default(),
                other.archetype.as_deref().unwrap_or_default(),
            ),
            CardStatColumn::TotalCopies => self.total_copies.cmp(&other.total_copies),
            CardStatColumn::MainDeckAverage => {
                compare_f64(self.main_deck_average, other.main_deck_average)
            }
            CardStatColumn::MainDeckPercentage => {
                compare_f64(self.main_deck_percentage, other.main_deck_percentage)
            }
            CardStatColumn::SideboardAverage => {
                compare_f64(self.sideboard_average, other.sideboard_average)
            }
            CardStatColumn::SideboardPercentage => {
                compare_f64(self.sideboard_percentage, other.sideboard_percentage)
            }
            CardStatColumn::PercentageIncluded => {
                compare_f64(self.percentage_included, other.percentage_included)
            }
        }
    }
}

impl Searchable for CardStat {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(archetype) = &self.archetype {
            fields.push(archetype);
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetagameColumn {
    Archetype,
    Day1Players,
    #[default]
    Day1Percentage,
    Day2Players,
    Day2Percentage,
    ConversionRate,
}

impl Sortable for ArchetypeMetagameRow {
    type Column = MetagameColumn;

    fn compare(&self, other: &Self, column: MetagameColumn) -> Ordering {
        match column {
            MetagameColumn::Archetype => compare_text(&self.archetype, &other.archetype),
            MetagameColumn::Day1Players => self.day1_players.cmp(&other.day1_players),
            MetagameColumn::Day1Percentage => {
                compare_f64(self.day1_percentage, other.day1_percentage)
            }
            MetagameColumn::Day2Players => self.day2_players.cmp(&other.day2_players),
            MetagameColumn::Day2Percentage => {
                compare_f64(self.day2_percentage, other.day2_percentage)
            }
            MetagameColumn::ConversionRate => {
                compare_f64(self.conversion_rate, other.conversion_rate)
            }
        }
    }
}

impl Searchable for ArchetypeMetagameRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.archetype.as_str()]
    }
}
