//! Browsing the form list: search, sort and pagination.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use crate::Form;

/// Forms per page when nothing else is configured.
pub const DEFAULT_PER_PAGE: usize = 8;

/// Page buttons shown around the current page.
pub const DEFAULT_VISIBLE_PAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Slug,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against name, slug and description.
    pub search: String,
    /// `None` keeps the listing order.
    pub sort: Option<SortKey>,
    pub order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub visible_pages: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: Some(SortKey::Name),
            order: SortOrder::Asc,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            visible_pages: DEFAULT_VISIBLE_PAGES,
        }
    }
}

impl CatalogQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sort by `key`. Picking the current key again flips the order;
    /// picking a new key starts ascending.
    pub fn toggle_sort(mut self, key: SortKey) -> Self {
        if self.sort == Some(key) {
            self.order = self.order.reversed();
        } else {
            self.sort = Some(key);
            self.order = SortOrder::Asc;
        }
        self
    }

    fn matches(&self, form: &Form) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let haystack = format!("{} {} {}", form.name, form.slug, form.description).to_lowercase();
        haystack.contains(&self.search.to_lowercase())
    }
}

/// One page of the form list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub forms: Vec<Form>,
    /// The page actually shown, clamped into range.
    pub page: usize,
    pub total_pages: usize,
    /// Page numbers to offer as buttons. Empty when there are no pages.
    pub window: RangeInclusive<usize>,
}

impl CatalogPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Pagination controls are only shown for more than one page.
    pub fn needs_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

pub fn browse(forms: &[Form], query: &CatalogQuery) -> CatalogPage {
    let per_page = query.per_page.max(1);

    let mut matching: Vec<&Form> = forms.iter().filter(|f| query.matches(f)).collect();
    if let Some(key) = query.sort {
        // Stable, so equal keys keep listing order.
        matching.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    let total_pages = matching.len().div_ceil(per_page);
    let page = query.page.clamp(1, total_pages.max(1));

    let forms = matching
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    let visible = query.visible_pages.max(1);
    let start = page.saturating_sub(visible / 2).max(1);
    let end = total_pages.min(start.saturating_add(visible - 1));

    CatalogPage {
        forms,
        page,
        total_pages,
        window: start..=end,
    }
}

fn compare(a: &Form, b: &Form, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Slug => a.slug.to_lowercase().cmp(&b.slug.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: i64, name: &str, slug: &str, description: &str) -> Form {
        Form {
            id,
            name: name.into(),
            slug: slug.into(),
            description: description.into(),
            limit_one_response: false,
        }
    }

    fn many(n: i64) -> Vec<Form> {
        (1..=n)
            .map(|i| form(i, &format!("Form {i:02}"), &format!("form-{i:02}"), ""))
            .collect()
    }

    #[test]
    fn search_spans_name_slug_and_description() {
        let forms = vec![
            form(1, "Lunch", "lunch", "Friday food"),
            form(2, "Retro", "q3-retro", ""),
            form(3, "Offsite", "offsite", "Team trip"),
        ];
        let ids =
            |q: &CatalogQuery| browse(&forms, q).forms.iter().map(|f| f.id).collect::<Vec<_>>();
        assert_eq!(ids(&CatalogQuery::default().with_search("FOOD")), vec![1]);
        assert_eq!(ids(&CatalogQuery::default().with_search("q3")), vec![2]);
        assert_eq!(ids(&CatalogQuery::default().with_search("team")), vec![3]);
        assert!(ids(&CatalogQuery::default().with_search("nothing")).is_empty());
    }

    #[test]
    fn sorts_case_insensitively() {
        let forms = vec![
            form(1, "beta", "b", ""),
            form(2, "Alpha", "c", ""),
            form(3, "gamma", "a", ""),
        ];
        let by_name = browse(&forms, &CatalogQuery::default());
        assert_eq!(by_name.forms.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        let query = CatalogQuery::default().toggle_sort(SortKey::Name);
        assert_eq!(query.order, SortOrder::Desc);
        let desc = browse(&forms, &query);
        assert_eq!(desc.forms.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3, 1, 2]);

        let by_slug = browse(&forms, &query.toggle_sort(SortKey::Slug));
        assert_eq!(by_slug.forms.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn paginates_with_a_centred_window() {
        let forms = many(20);
        let page = browse(&forms, &CatalogQuery::default().with_page(2));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.forms.len(), 8);
        assert_eq!(page.forms[0].id, 9);
        assert_eq!(page.window, 1..=3);
        assert!(page.has_previous() && page.has_next());

        let last = browse(&forms, &CatalogQuery::default().with_page(3));
        assert_eq!(last.forms.len(), 4);
        assert_eq!(last.window, 2..=3);
        assert!(!last.has_next());
    }

    #[test]
    fn huge_window_covers_every_page() {
        let forms = many(20);
        let query = CatalogQuery {
            visible_pages: usize::MAX,
            ..CatalogQuery::default().with_page(2)
        };
        assert_eq!(browse(&forms, &query).window, 1..=3);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let forms = many(5);
        assert_eq!(browse(&forms, &CatalogQuery::default().with_page(0)).page, 1);
        assert_eq!(browse(&forms, &CatalogQuery::default().with_page(9)).page, 1);

        let zero_per_page = CatalogQuery {
            per_page: 0,
            ..Default::default()
        };
        assert_eq!(browse(&forms, &zero_per_page).total_pages, 5);
    }

    #[test]
    fn empty_listing_has_no_pages() {
        let page = browse(&[], &CatalogQuery::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.window.is_empty());
        assert!(!page.needs_pagination());
    }
}
