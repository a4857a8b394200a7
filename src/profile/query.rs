//! Filtering, grouping and pagination for the "my comments" page.

use std::collections::BTreeSet;

use super::{CommentKind, MyComment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Comments,
    Replies,
}

impl KindFilter {
    fn accepts(self, kind: &CommentKind) -> bool {
        match (self, kind) {
            (KindFilter::All, _) => true,
            (KindFilter::Comments, CommentKind::Review) => true,
            (KindFilter::Replies, CommentKind::Reply { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentQuery {
    pub kind: KindFilter,
    /// Case-insensitive text matched against comment bodies and product names.
    pub search: String,
    /// 1-based page of product groups.
    pub page: usize,
    /// Products whose groups show every item instead of the first few.
    pub expanded: BTreeSet<u64>,
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self {
            kind: KindFilter::All,
            search: String::new(),
            page: 1,
            expanded: BTreeSet::new(),
        }
    }
}

impl CommentQuery {
    pub fn kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn expand(mut self, product_id: u64) -> Self {
        self.expanded.insert(product_id);
        self
    }

    fn matches(&self, item: &MyComment) -> bool {
        if !self.kind.accepts(&item.kind) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || item.comment.to_lowercase().contains(&needle)
            || item.product_name.to_lowercase().contains(&needle)
    }
}

/// The user's comments on one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGroup {
    pub product_id: u64,
    pub product_name: String,
    /// Items shown, newest first.
    pub items: Vec<MyComment>,
    /// Items in the group after filtering.
    pub total: usize,
    /// Items held back behind "show more".
    pub hidden: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPage {
    pub groups: Vec<ProductGroup>,
    /// The page served, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_groups: usize,
    pub total_items: usize,
}

/// Filter newest-first `items`, group them by product (groups ordered by their
/// newest item) and cut out one page.
pub fn paginate(
    items: Vec<MyComment>,
    query: &CommentQuery,
    groups_per_page: usize,
    group_item_limit: usize,
) -> CommentPage {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut total_items = 0;

    for item in items.into_iter().filter(|item| query.matches(item)) {
        total_items += 1;
        match groups.iter_mut().find(|g| g.product_id == item.product_id) {
            Some(group) => group.items.push(item),
            None => groups.push(ProductGroup {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                items: vec![item],
                total: 0,
                hidden: 0,
            }),
        }
    }

    for group in groups.iter_mut() {
        group.total = group.items.len();
        if !query.expanded.contains(&group.product_id) && group.items.len() > group_item_limit {
            group.hidden = group.items.len() - group_item_limit;
            group.items.truncate(group_item_limit);
        }
    }

    let per_page = groups_per_page.max(1);
    let total_groups = groups.len();
    let total_pages = total_groups.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let groups = groups
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    CommentPage {
        groups,
        page,
        total_pages,
        total_groups,
        total_items,
    }
}
