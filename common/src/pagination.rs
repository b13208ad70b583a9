//! Abstractions for offset pagination.

use std::cmp;

/// Number of items on a [`Page`] when none is requested.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: u32,

    /// Maximum number of items on a page.
    per_page: u32,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Arguments {
    /// Creates new [`Arguments`] out of the requested `page` and `per_page`.
    ///
    /// Missing values fall back to the first page of [`DEFAULT_PER_PAGE`]
    /// items. Non-positive `page` is clamped to the first one.
    ///
    /// [`None`] is returned if `per_page` is not positive.
    #[must_use]
    pub fn new<Num>(page: Option<Num>, per_page: Option<Num>) -> Option<Self>
    where
        Num: TryInto<u32>,
    {
        let page = page
            .and_then(|p| p.try_into().ok())
            .map_or(1, |p: u32| p.max(1));
        let per_page = match per_page {
            Some(n) => n.try_into().ok().filter(|n| *n > 0)?,
            None => DEFAULT_PER_PAGE,
        };
        Some(Self { page, per_page })
    }

    /// Returns the 1-based number of the requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items on a page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the number of items to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// Direction of ordering.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    #[default]
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Applies this [`Order`] to the ascending comparison result.
    #[must_use]
    pub fn apply(&self, ordering: cmp::Ordering) -> cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Ordering of a list by a column `C`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OrderBy<C> {
    /// Column to order by.
    pub column: C,

    /// Direction of ordering.
    pub order: Order,
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<C, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Ordering of the list.
    pub order_by: OrderBy<C>,

    /// Filter being applied to the list.
    pub filter: F,
}

/// A single page of a list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub data: Vec<T>,

    /// Total number of items matching the filter, regardless of pagination.
    pub count: u64,

    /// 1-based number of this [`Page`].
    pub current_page: u32,

    /// Maximum number of items on a [`Page`].
    pub per_page: u32,

    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a new [`Page`] out of the fetched items and the total `count`.
    #[must_use]
    pub fn new(
        args: &Arguments,
        data: impl IntoIterator<Item = T>,
        count: u64,
    ) -> Self {
        Self {
            data: data.into_iter().collect(),
            count,
            current_page: args.page(),
            per_page: args.per_page(),
            total_pages: count.div_ceil(u64::from(args.per_page())),
        }
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let Self {
            data,
            count,
            current_page,
            per_page,
            total_pages,
        } = self;
        Page {
            data: data.into_iter().map(f).collect(),
            count,
            current_page,
            per_page,
            total_pages,
        }
    }
}

/// Defines pagination types of a list.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $column:ty, $filter:ty) => {
        #[doc = "A [`Page`] of list items."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "Ordering of the list."]
        pub type OrderBy = $crate::pagination::OrderBy<$column>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$column, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page, DEFAULT_PER_PAGE};

    #[test]
    fn defaults_to_first_page() {
        let args = Arguments::new::<i32>(None, None).unwrap();

        assert_eq!(args.page(), 1);
        assert_eq!(args.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(args.offset(), 0);
        assert_eq!(args, Arguments::default());
    }

    #[test]
    fn clamps_non_positive_page() {
        for page in [0, -1, -100] {
            let args = Arguments::new(Some(page), Some(5)).unwrap();

            assert_eq!(args.page(), 1);
            assert_eq!(args.offset(), 0);
        }
    }

    #[test]
    fn computes_offset() {
        let args = Arguments::new(Some(3), Some(20)).unwrap();

        assert_eq!(args.offset(), 40);
    }

    #[test]
    fn rejects_non_positive_per_page() {
        assert!(Arguments::new(Some(1), Some(0)).is_none());
        assert!(Arguments::new(Some(1), Some(-10)).is_none());
    }

    #[test]
    fn total_pages_rounds_up() {
        let args = Arguments::new(Some(1), Some(10)).unwrap();

        assert_eq!(Page::new(&args, Vec::<u8>::new(), 0).total_pages, 0);
        assert_eq!(Page::new(&args, Vec::<u8>::new(), 1).total_pages, 1);
        assert_eq!(Page::new(&args, Vec::<u8>::new(), 10).total_pages, 1);
        assert_eq!(Page::new(&args, Vec::<u8>::new(), 11).total_pages, 2);
    }

    #[test]
    fn reports_requested_page() {
        let args = Arguments::new(Some(7), Some(3)).unwrap();
        let page = Page::new(&args, [1, 2], 5).map(|n| n * 10);

        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.current_page, 7);
        assert_eq!(page.per_page, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.count, 5);
    }
}
