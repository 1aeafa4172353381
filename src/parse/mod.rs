//! Reading the menu out of a dining hall page.
//!
//! Everything else only sees [`MenuSource`]: a menu title, then sections, each
//! with a name and a list of items, each with a name. How those are found in
//! the markup stays in this module.
mod error;
mod menu_page;
mod remove_excess_whitespace;
mod static_selector;
mod text_from_selection;

pub use error::Error;
pub use menu_page::MenuListing;
pub use remove_excess_whitespace::remove_excess_whitespace;

/// A section header and what could be read of its item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionListing {
    pub name: String,
    /// `Err` when the header has no list container after it.
    pub items: Result<Vec<ItemListing>, Error>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListing {
    /// `Err` when the item has no usable name field.
    pub name: Result<String, Error>,
}

pub trait MenuSource {
    fn menu_title(&self) -> Option<String>;
    fn sections(&self) -> Vec<SectionListing>;
}
