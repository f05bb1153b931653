use std::sync::Arc;

use crate::application::content::ContentService;
use crate::application::newsletter::NewsletterService;
use crate::application::subscribers::SubscriberService;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub subscribers: Arc<SubscriberService>,
    pub newsletter: Arc<NewsletterService>,
    pub db: Arc<PostgresRepositories>,
}
