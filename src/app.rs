// Application state and configuration
use std::sync::Arc;

use crate::{
    db::DieselPool,
    services::{EmailService, MagicLinkService, SessionService},
    RedisPool,
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub diesel_pool: DieselPool,
    pub redis_pool: RedisPool,
    pub session_service: Arc<SessionService>,
    pub magic_link_service: Arc<MagicLinkService>,
    pub email_service: Arc<EmailService>,
    pub max_connections: u32,
}
