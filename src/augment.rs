//! Turns a scraped menu into a [`Page`]: controls on every item, thumbnails for
//! the sections that get them.
use chrono::NaiveDate;
use futures::{stream::FuturesUnordered, StreamExt};
use futures_locks::Mutex;

use crate::{
    context::Context,
    favorites::Favorites,
    fetch::ImageSearch,
    page::{ItemId, Page},
    parse::MenuSource,
};

/// Sections whose items get images looked up automatically.
pub const AUTO_SEARCH_SECTIONS: [&str; 6] = [
    "Signature Maize",
    "Signature Blue",
    "Halal",
    "Two Oceans",
    "Wild Fire Maize",
    "Wild Fire Blue",
];

#[inline]
#[must_use]
pub fn is_auto_search(section: &str) -> bool {
    AUTO_SEARCH_SECTIONS.contains(&section)
}

/// An item in an auto-search section, waiting on images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub id: ItemId,
    pub query: String,
}

/// Walks every section and item, adding controls to each named item.
pub fn scan(source: &impl MenuSource, favorites: &Favorites) -> (Page, Vec<Lookup>) {
    let mut page = Page::new(source.menu_title());
    let mut lookups = Vec::new();
    for section in source.sections() {
        let items = match section.items {
            Ok(items) => items,
            Err(e) => {
                log::debug!("Skipping section `{}`: {e}", section.name);
                continue;
            }
        };
        let auto_search = is_auto_search(&section.name);
        page.push_section(section.name, auto_search);
        for item in items {
            let name = match item.name {
                Ok(name) => name,
                Err(e) => {
                    log::debug!("Skipping item: {e}");
                    continue;
                }
            };
            log::debug!("Processing food item: {name}");
            let favorited = favorites.contains(&name);
            let id = page.push_item(name.clone(), favorited);
            if auto_search {
                lookups.push(Lookup { id, query: name });
            }
        }
    }
    (page, lookups)
}

/// Serves each lookup from the cache, or searches for it when a key is set and
/// the quota allows. Searches run concurrently; none is awaited before the
/// next lookup is considered.
pub async fn fill_images(
    page: &mut Page,
    lookups: Vec<Lookup>,
    ctx: &Mutex<Context>,
    search: &ImageSearch,
    today: NaiveDate,
) {
    let mut pending = FuturesUnordered::new();
    {
        let mut guard = ctx.lock().await;
        for Lookup { id, query } in lookups {
            if let Some(images) = guard.lookup_images(&query, today).await {
                log::info!("Using cached images for: {query}");
                page.display_images(id, &images);
                continue;
            }
            if !guard.quota().can_request() {
                log::info!("API request limit reached. Auto search disabled.");
                continue;
            }
            let Some(api_key) = guard.api_key().map(str::to_owned) else {
                log::debug!("No API key set, not searching for: {query}");
                continue;
            };
            pending.push(async move {
                let images = run_search(ctx, search, &query, &api_key, today).await;
                (id, images)
            });
        }
    }

    while let Some((id, images)) = pending.next().await {
        if let Some(images) = images {
            page.display_images(id, &images);
        }
    }
}

/// One search attempt. Whatever the outcome, the attempt is counted once
/// after the request resolves.
async fn run_search(
    ctx: &Mutex<Context>,
    search: &ImageSearch,
    query: &str,
    api_key: &str,
    today: NaiveDate,
) -> Option<Vec<String>> {
    if !ctx.lock().await.quota().can_request() {
        log::info!("API request limit reached. Cannot perform search.");
        return None;
    }

    let outcome = search.search(query, api_key).await;

    let mut ctx = ctx.lock().await;
    let images = match outcome {
        Ok(images) if images.is_empty() => {
            log::warn!("No images found for: {query}");
            None
        }
        Ok(images) => {
            ctx.store_images(query, images.clone(), today).await;
            Some(images)
        }
        Err(e) => {
            log::error!("Failed to fetch images for: {query} Error: {e}");
            None
        }
    };
    let count = ctx.record_attempt().await;
    log::info!("API Requests Made: {count}");
    images
}

/// A full page load: the daily reset, the walk over the menu, then images.
pub async fn augment(
    source: &(impl MenuSource + Sync),
    ctx: &Mutex<Context>,
    search: &ImageSearch,
    today: NaiveDate,
) -> Page {
    let (mut page, lookups) = {
        let mut guard = ctx.lock().await;
        guard.begin_day(today).await;
        scan(source, guard.favorites())
    };
    fill_images(&mut page, lookups, ctx, search, today).await;

    let guard = ctx.lock().await;
    page.refresh_favorites_count(guard.favorites());
    log::info!("API Requests Made Today: {}", guard.quota().count());
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetch::make_client,
        parse::{ItemListing, MenuListing, SectionListing},
        store::{self, Store},
    };
    use httpmock::{Mock, MockServer};
    use std::fs;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    fn dining_hall() -> MenuListing {
        let html = fs::read_to_string("./src/parse/html_examples/dining_hall.html").unwrap();
        MenuListing::from_html(&html)
    }

    fn listing(section: &str, names: &[&str]) -> MenuListing {
        MenuListing {
            title: Some("Lunch".into()),
            sections: vec![SectionListing {
                name: section.into(),
                items: Ok(names
                    .iter()
                    .map(|n| ItemListing {
                        name: Ok((*n).to_string()),
                    })
                    .collect()),
            }],
        }
    }

    async fn context(api_key: &str, count: u32, cache: &str) -> Mutex<Context> {
        let mut store = Store::ad_hoc();
        store
            .set(store::QUOTA, &format!(r#"{{"count":{count},"date":"2024-10-01"}}"#))
            .await
            .unwrap();
        store.set(store::IMAGE_CACHE, cache).await.unwrap();
        let mut ctx = Context::load(store).await;
        ctx.set_api_key(api_key).await;
        Mutex::new(ctx)
    }

    fn search_against(server: &MockServer) -> ImageSearch {
        ImageSearch::new(
            make_client(),
            server.url("/customsearch/v1").parse().unwrap(),
            "engine",
        )
    }

    async fn results_for<'a>(server: &'a MockServer, query: &str, body: &str) -> Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method("GET").query_param("q", query);
                then.status(200).body(body);
            })
            .await
    }

    const TWO_THUMBS: &str =
        r#"{"items":[{"image":{"thumbnailLink":"t1"}},{"image":{"thumbnailLink":"t2"}}]}"#;

    #[test]
    fn test_scan_skips_unnamed_and_unlisted() {
        let (page, lookups) = scan(&dining_hall(), &Favorites::default());
        let sections: Vec<(&str, usize)> = page
            .section_list()
            .iter()
            .map(|s| (s.name.as_str(), s.items.len()))
            .collect();
        assert_eq!(
            sections,
            [
                ("Signature Maize", 2),
                ("Soup", 1),
                ("Wild Fire Maize", 1),
                ("Halal", 1)
            ]
        );
        let queries: Vec<&str> = lookups.iter().map(|l| l.query.as_str()).collect();
        assert_eq!(
            queries,
            [
                "Grilled Chicken",
                "Pasta Primavera",
                "Grilled Chicken",
                "Chicken Shawarma"
            ]
        );
    }

    #[test]
    fn test_scan_initial_favorite_state() {
        let mut favorites = Favorites::default();
        favorites.toggle("Grilled Chicken");
        let (page, lookups) = scan(&dining_hall(), &favorites);
        let chicken = page.item(lookups[0].id).unwrap();
        let pasta = page.item(lookups[1].id).unwrap();
        assert!(chicken.controls.favorite.favorited);
        assert!(!pasta.controls.favorite.favorited);
    }

    #[tokio::test]
    async fn test_non_allowlisted_section_never_searches() {
        let server = MockServer::start_async().await;
        let any = results_for(&server, "Tomato Basil Soup", TWO_THUMBS).await;
        let ctx = context("k3y", 0, "{}").await;
        let page = augment(
            &listing("Soup", &["Tomato Basil Soup"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(any.hits_async().await, 0);
        assert_eq!(ctx.lock().await.quota().count(), 0);
        assert!(page.section_list()[0].items[0].images.is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_costs_nothing() {
        let server = MockServer::start_async().await;
        let mock = results_for(&server, "Falafel", TWO_THUMBS).await;
        let ctx = context(
            "k3y",
            3,
            r#"{"Falafel":{"images":["c1","c2","c3"],"date":"2024-09-20"}}"#,
        )
        .await;
        let page = augment(
            &listing("Halal", &["Falafel"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(mock.hits_async().await, 0);
        let images = &page.section_list()[0].items[0].images;
        assert_eq!(images.len(), 3);
        let ctx = ctx.lock().await;
        assert_eq!(ctx.quota().count(), 3);
        assert_eq!(ctx.images().get("Falafel").unwrap().date, today());
    }

    #[tokio::test]
    async fn test_miss_searches_renders_and_caches() {
        let server = MockServer::start_async().await;
        let mock = results_for(&server, "Falafel", TWO_THUMBS).await;
        let ctx = context("k3y", 0, "{}").await;
        let page = augment(
            &listing("Two Oceans", &["Falafel"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(mock.hits_async().await, 1);
        let srcs: Vec<&str> = page.section_list()[0].items[0]
            .images
            .iter()
            .map(|i| i.src.as_str())
            .collect();
        assert_eq!(srcs, ["t1", "t2"]);
        let ctx = ctx.lock().await;
        assert_eq!(ctx.quota().count(), 1);
        assert_eq!(
            ctx.images().get("Falafel").unwrap().images,
            ["t1".to_string(), "t2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_counted_not_cached() {
        let server = MockServer::start_async().await;
        let mock = results_for(&server, "Pasta Primavera", r#"{"items":[]}"#).await;
        let ctx = context("k3y", 0, "{}").await;
        let search = search_against(&server);
        let menu = listing("Signature Blue", &["Pasta Primavera"]);

        augment(&menu, &ctx, &search, today()).await;
        assert!(ctx.lock().await.images().get("Pasta Primavera").is_none());

        // the next load tries again
        augment(&menu, &ctx, &search, today()).await;
        assert_eq!(mock.hits_async().await, 2);
        assert_eq!(ctx.lock().await.quota().count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_counted_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET");
                then.status(500);
            })
            .await;
        let ctx = context("k3y", 10, "{}").await;
        let page = augment(
            &listing("Halal", &["Falafel"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(mock.hits_async().await, 1);
        assert!(page.section_list()[0].items[0].images.is_empty());
        let ctx = ctx.lock().await;
        assert_eq!(ctx.quota().count(), 11);
        assert!(ctx.images().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_or_spent_quota_skips() {
        let server = MockServer::start_async().await;
        let mock = results_for(&server, "Falafel", TWO_THUMBS).await;
        let search = search_against(&server);
        let menu = listing("Halal", &["Falafel"]);

        let no_key = context("", 0, "{}").await;
        augment(&menu, &no_key, &search, today()).await;

        let spent = context("k3y", 100, "{}").await;
        augment(&menu, &spent, &search, today()).await;

        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(no_key.lock().await.quota().count(), 0);
        assert_eq!(spent.lock().await.quota().count(), 100);
    }

    #[tokio::test]
    async fn test_concurrent_searches_may_overrun() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET");
                then.status(200).body(TWO_THUMBS);
            })
            .await;
        let ctx = context("k3y", 99, "{}").await;
        augment(
            &listing("Halal", &["Falafel", "Shawarma"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(mock.hits_async().await, 2);
        assert_eq!(ctx.lock().await.quota().count(), 101);
    }

    #[tokio::test]
    async fn test_new_day_resets_before_scan() {
        let server = MockServer::start_async().await;
        let mock = results_for(&server, "Falafel", TWO_THUMBS).await;
        let mut store = Store::ad_hoc();
        store
            .set(store::QUOTA, r#"{"count":100,"date":"2024-09-30"}"#)
            .await
            .unwrap();
        store
            .set(
                store::IMAGE_CACHE,
                r#"{"Stale":{"images":["s"],"date":"2024-09-01"}}"#,
            )
            .await
            .unwrap();
        let mut ctx = Context::load(store).await;
        ctx.set_api_key("k3y").await;
        let ctx = Mutex::new(ctx);

        augment(
            &listing("Halal", &["Falafel"]),
            &ctx,
            &search_against(&server),
            today(),
        )
        .await;
        assert_eq!(mock.hits_async().await, 1);
        let ctx = ctx.lock().await;
        assert_eq!(ctx.quota().count(), 1);
        assert!(ctx.images().get("Stale").is_none());
    }

    #[tokio::test]
    async fn test_favorites_line_counts_distinct_names() {
        let server = MockServer::start_async().await;
        let ctx = context("", 0, "{}").await;
        ctx.lock().await.toggle_favorite("Grilled Chicken").await;
        let page = augment(&dining_hall(), &ctx, &search_against(&server), today()).await;
        assert_eq!(page.favorites_count(), Some(1));
    }
}
