mod filters;

pub use filters::{filter_records, matches_search};

use crate::model::PokemonRecord;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

// which collection the page count is derived from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageCountBasis {
    #[default]
    Filtered,
    Unfiltered,
}

impl PageCountBasis {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "filtered" | "search" => Some(Self::Filtered),
            "unfiltered" | "all" => Some(Self::Unfiltered),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Unfiltered => "unfiltered",
        }
    }
}

pub fn total_pages(count: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    count.div_ceil(items_per_page)
}

pub fn page_slice<'s, T>(items: &'s [T], page: usize, items_per_page: usize) -> &'s [T] {
    if page == 0 || items_per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(items_per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(items_per_page).min(items.len());
    &items[start..end]
}

/// Search and navigation state of one view over the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    search_term: String,
    current_page: usize,
    items_per_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl ViewState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Changing the term sends the view back to the first page; setting the
    /// same term again keeps the current page.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        if term != self.search_term {
            self.search_term = term;
            self.current_page = 1;
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current_page >= total_pages {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn go_to(&mut self, page: usize, total_pages: usize) -> bool {
        let target = page.clamp(1, total_pages.max(1));
        if target == self.current_page {
            return false;
        }
        self.current_page = target;
        true
    }
}

#[derive(Clone, Debug)]
pub struct PageView<'a> {
    pub items: Vec<&'a PokemonRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub search_term: String,
}

impl PageView<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn page_count(
    records: &[PokemonRecord],
    state: &ViewState,
    basis: PageCountBasis,
) -> usize {
    let count = match basis {
        PageCountBasis::Filtered => records
            .iter()
            .filter(|r| matches_search(r, state.search_term()))
            .count(),
        PageCountBasis::Unfiltered => records.len(),
    };
    total_pages(count, state.items_per_page())
}

pub fn render<'a>(
    records: &'a [PokemonRecord],
    state: &ViewState,
    basis: PageCountBasis,
) -> PageView<'a> {
    let filtered = filter_records(records, state.search_term());
    let pages_from = match basis {
        PageCountBasis::Filtered => filtered.len(),
        PageCountBasis::Unfiltered => records.len(),
    };
    let items = page_slice(&filtered, state.current_page(), state.items_per_page()).to_vec();
    PageView {
        items,
        page: state.current_page(),
        total_pages: total_pages(pages_from, state.items_per_page()),
        filtered_count: filtered.len(),
        total_count: records.len(),
        search_term: state.search_term().to_string(),
    }
}
