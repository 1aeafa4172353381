use scraper::{ElementRef, Html};

use super::{
    text_from_selection::{text_content, text_from_selection},
    Error, ItemListing, MenuSource, SectionListing,
};
use crate::static_selector;

impl MenuSource for Html {
    fn menu_title(&self) -> Option<String> {
        static_selector!(MENU_TITLE_SELECTOR <- "h2.menuTitle");
        let title = self.select(&MENU_TITLE_SELECTOR).next()?;
        // an empty title still counts as present
        Some(text_content(title, "menu title").unwrap_or_default())
    }

    fn sections(&self) -> Vec<SectionListing> {
        static_selector!(SECTION_SELECTOR <- "h4");
        self.select(&SECTION_SELECTOR)
            .map(SectionListing::from_html_element)
            .collect()
    }
}

impl SectionListing {
    /// Reads a section from its header. The list of items is the next sibling element.
    fn from_html_element(header: ElementRef<'_>) -> Self {
        static_selector!(ITEM_SELECTOR <- "li");
        let name = text_content(header, "section header").unwrap_or_default();
        let items = header
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|list| {
                list.select(&ITEM_SELECTOR)
                    .map(ItemListing::from_html_element)
                    .collect()
            })
            .ok_or_else(|| Error::html_parse_error("Section header has no list after it."));
        Self { name, items }
    }
}

impl ItemListing {
    fn from_html_element(element: ElementRef<'_>) -> Self {
        static_selector!(NAME_SELECTOR <- ".item-name");
        Self {
            name: text_from_selection(&NAME_SELECTOR, element, "item", "name"),
        }
    }
}

/// A menu already read out of its page. Owns its strings, so it can be held
/// across awaits where the parsed document cannot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuListing {
    pub title: Option<String>,
    pub sections: Vec<SectionListing>,
}

impl MenuListing {
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self::from_source(&document)
    }

    pub fn from_source(source: &impl MenuSource) -> Self {
        Self {
            title: source.menu_title(),
            sections: source.sections(),
        }
    }
}

impl MenuSource for MenuListing {
    fn menu_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn sections(&self) -> Vec<SectionListing> {
        self.sections.clone()
    }
}
