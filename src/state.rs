use std::collections::HashMap;

use chrono::NaiveDate;
use futures_locks::{Mutex, RwLock};
use url::Url;

use crate::{
    augment::augment,
    config::Config,
    context::Context,
    fetch::{self, ImageSearch},
    page::Page,
    parse::MenuListing,
    quota::QuotaRecord,
    settings::{ApiKeyInput, Settings},
    store::Store,
};

/// Everything a running service holds: the persisted records, the last page
/// loaded for each hall, and the state of the settings input.
#[derive(Debug)]
pub struct State {
    ctx: Mutex<Context>,
    pages: RwLock<HashMap<String, Page>>,
    input: Mutex<ApiKeyInput>,
    client: reqwest::Client,
    search: ImageSearch,
    menu_base: Url,
}

impl State {
    pub async fn new(config: &Config, store: Store) -> Self {
        let client = fetch::make_client();
        let search = ImageSearch::new(
            client.clone(),
            config.search_endpoint.clone(),
            config.search_engine_id.clone(),
        );
        Self::with_parts(store, client, search, config.menu_base.clone()).await
    }

    pub async fn with_parts(
        store: Store,
        client: reqwest::Client,
        search: ImageSearch,
        menu_base: Url,
    ) -> Self {
        Self {
            ctx: Mutex::new(Context::load(store).await),
            pages: RwLock::new(HashMap::new()),
            input: Mutex::new(ApiKeyInput::default()),
            client,
            search,
            menu_base,
        }
    }

    /// A page load: fetches the hall's menu, augments it, and keeps it as the
    /// hall's current page.
    pub async fn load_menu(&self, hall: &str, today: NaiveDate) -> crate::Result<Page> {
        let html = fetch::menu_page(&self.client, &self.menu_base, hall).await?;
        let listing = MenuListing::from_html(&html);
        let page = augment(&listing, &self.ctx, &self.search, today).await;
        self.pages
            .write()
            .await
            .insert(hall.to_owned(), page.clone());
        Ok(page)
    }

    pub async fn page(&self, hall: &str) -> Option<Page> {
        self.pages.read().await.get(hall).cloned()
    }

    /// Toggles a favorite and updates every button bound to it on the current pages.
    pub async fn toggle_favorite(&self, name: &str) -> bool {
        let mut ctx = self.ctx.lock().await;
        let favorited = ctx.toggle_favorite(name).await;
        let mut pages = self.pages.write().await;
        for page in pages.values_mut() {
            page.set_favorited(name, favorited);
            page.refresh_favorites_count(ctx.favorites());
        }
        favorited
    }

    pub async fn set_api_key(&self, value: &str) -> Settings {
        let mut ctx = self.ctx.lock().await;
        ctx.set_api_key(value).await;
        let input = *self.input.lock().await;
        input.render(ctx.api_key().unwrap_or_default())
    }

    pub async fn toggle_api_key_visibility(&self) -> Settings {
        let input = {
            let mut input = self.input.lock().await;
            input.toggle_visibility();
            *input
        };
        let ctx = self.ctx.lock().await;
        input.render(ctx.api_key().unwrap_or_default())
    }

    pub async fn settings(&self) -> Settings {
        let input = *self.input.lock().await;
        let ctx = self.ctx.lock().await;
        input.render(ctx.api_key().unwrap_or_default())
    }

    pub async fn quota(&self) -> QuotaRecord {
        *self.ctx.lock().await.quota()
    }

    pub async fn favorites(&self) -> Vec<String> {
        self.ctx
            .lock()
            .await
            .favorites()
            .iter()
            .map(str::to_owned)
            .collect()
    }
}
