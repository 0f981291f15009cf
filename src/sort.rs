use clap::ValueEnum;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { SortDirection::Ascending } else { SortDirection::Descending }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Key the application sorts the current view by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    Size,
    Created,
    Name,
}

impl SortMode {
    pub fn name(&self) -> &'static str {
        match self {
            SortMode::Size => "size",
            SortMode::Created => "created",
            SortMode::Name => "name",
        }
    }

    /// Direction used when switching to this mode
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortMode::Size | SortMode::Created => SortDirection::Descending,
            SortMode::Name => SortDirection::Ascending,
        }
    }
}
