use std::sync::Arc;

use chrono::NaiveDate;
use juniper::{graphql_object, EmptySubscription, FieldResult, GraphQLObject, RootNode};

use crate::{
    day,
    page::Page,
    quota::{QuotaRecord, MAX_REQUESTS},
    settings::Settings,
    state::State,
};

#[derive(Clone, Debug)]
pub struct Shared(pub Arc<State>);

impl juniper::Context for Shared {}

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub struct Quota {
    pub count: i32,
    pub max: i32,
    pub date: NaiveDate,
    pub can_request: bool,
}

impl From<QuotaRecord> for Quota {
    fn from(q: QuotaRecord) -> Self {
        Self {
            count: i32::try_from(q.count()).unwrap_or(i32::MAX),
            max: i32::try_from(MAX_REQUESTS).unwrap_or(i32::MAX),
            date: q.date(),
            can_request: q.can_request(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Query;

#[graphql_object(context = Shared)]
impl Query {
    /// Loads a dining hall's menu the way opening its page would.
    async fn menu(context: &Shared, hall: String) -> FieldResult<Page> {
        Ok(context.0.load_menu(&hall, day::today()).await?)
    }

    /// The hall's last loaded menu, without reloading it.
    async fn page(context: &Shared, hall: String) -> Option<Page> {
        context.0.page(&hall).await
    }

    async fn settings(context: &Shared) -> Settings {
        context.0.settings().await
    }

    async fn quota(context: &Shared) -> Quota {
        context.0.quota().await.into()
    }

    async fn favorites(context: &Shared) -> Vec<String> {
        context.0.favorites().await
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Mutation;

#[graphql_object(context = Shared)]
impl Mutation {
    /// Returns whether the food is now a favorite.
    async fn toggle_favorite(context: &Shared, name: String) -> bool {
        context.0.toggle_favorite(&name).await
    }

    async fn set_api_key(context: &Shared, value: String) -> Settings {
        context.0.set_api_key(&value).await
    }

    async fn toggle_api_key_visibility(context: &Shared) -> Settings {
        context.0.toggle_api_key_visibility().await
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<Shared>>;

pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
