use std::collections::HashMap;

use juniper::{graphql_object, GraphQLObject};
use url::Url;

use crate::favorites::Favorites;

const IMAGE_SEARCH_URL: &str = "https://www.google.com/search";

/// Where an item sits on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    section: usize,
    item: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct CopyButton {
    pub label: String,
    /// What goes on the clipboard.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct ImageSearchButton {
    pub label: String,
    /// Opened in a new tab.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct FavoriteButton {
    pub label: String,
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct Controls {
    pub copy: CopyButton,
    pub image_search: ImageSearchButton,
    pub favorite: FavoriteButton,
}

impl Controls {
    fn new(name: &str, favorited: bool) -> Self {
        Self {
            copy: CopyButton {
                label: "Copy".into(),
                text: name.to_owned(),
            },
            image_search: ImageSearchButton {
                label: "Search Image".into(),
                url: image_search_url(name),
            },
            favorite: FavoriteButton {
                label: "Love it!".into(),
                favorited,
            },
        }
    }
}

pub fn image_search_url(name: &str) -> String {
    Url::parse_with_params(IMAGE_SEARCH_URL, [("tbm", "isch"), ("q", name)])
        .map_or_else(|_| IMAGE_SEARCH_URL.to_owned(), String::from)
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct MenuItem {
    pub name: String,
    pub controls: Controls,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct Section {
    pub name: String,
    /// Whether images are looked up automatically for this section.
    pub auto_search: bool,
    pub items: Vec<MenuItem>,
}

/// A dining hall menu with its controls added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    title: Option<String>,
    sections: Vec<Section>,
    /// Every favorite button on the page for a given food name.
    favorite_buttons: HashMap<String, Vec<ItemId>>,
    favorites_on_menu: Option<usize>,
}

#[graphql_object]
impl Page {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sections(&self) -> Vec<&Section> {
        self.sections.iter().collect()
    }

    /// The line under the menu title, absent when the page has no title.
    pub fn favorites_line(&self) -> Option<String> {
        self.favorites_on_menu
            .map(|n| format!("{n} of your favorite item(s) are on today's menu."))
    }

    pub fn favorites_on_menu(&self) -> Option<i32> {
        self.favorites_on_menu
            .map(|n| i32::try_from(n).unwrap_or(i32::MAX))
    }
}

impl Page {
    #[must_use]
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    pub fn push_section(&mut self, name: String, auto_search: bool) {
        self.sections.push(Section {
            name,
            auto_search,
            items: Vec::new(),
        });
    }

    /// Adds an item with its controls to the last section and registers its
    /// favorite button under `name`.
    ///
    /// # Panics
    /// If no section has been pushed yet.
    pub fn push_item(&mut self, name: String, favorited: bool) -> ItemId {
        let section = self.sections.len() - 1;
        let items = &mut self.sections[section].items;
        let id = ItemId {
            section,
            item: items.len(),
        };
        items.push(MenuItem {
            controls: Controls::new(&name, favorited),
            images: Vec::new(),
            name: name.clone(),
        });
        self.favorite_buttons.entry(name).or_default().push(id);
        id
    }

    #[cfg(test)]
    pub fn item(&self, id: ItemId) -> Option<&MenuItem> {
        self.sections.get(id.section)?.items.get(id.item)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut MenuItem> {
        self.sections.get_mut(id.section)?.items.get_mut(id.item)
    }

    /// Appends thumbnails under an item.
    pub fn display_images(&mut self, id: ItemId, images: &[String]) {
        let Some(item) = self.item_mut(id) else {
            log::warn!("no item at {id:?} to show images under");
            return;
        };
        item.images.extend(images.iter().enumerate().map(|(i, src)| Image {
            src: src.clone(),
            alt: format!("Image {}", i + 1),
        }));
    }

    /// Sets every favorite button bound to `name`. Returns how many were updated.
    pub fn set_favorited(&mut self, name: &str, favorited: bool) -> usize {
        let ids = self.favorite_buttons.get(name).cloned().unwrap_or_default();
        for &id in &ids {
            if let Some(item) = self.item_mut(id) {
                item.controls.favorite.favorited = favorited;
            }
        }
        ids.len()
    }

    /// Recomputes how many distinct items on the page are favorites. Only
    /// shown when the page has a title to hang the line from.
    pub fn refresh_favorites_count(&mut self, favorites: &Favorites) {
        if self.title.is_none() {
            return;
        }
        let names = self.favorite_buttons.keys().map(String::as_str);
        self.favorites_on_menu = Some(favorites.count_among(names));
    }

    #[cfg(test)]
    pub const fn favorites_count(&self) -> Option<usize> {
        self.favorites_on_menu
    }

    #[cfg(test)]
    pub fn section_list(&self) -> &[Section] {
        &self.sections
    }
}
