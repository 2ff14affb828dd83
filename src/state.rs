use tokio::sync::broadcast;

use crate::db::{DbPool, OrmConn};

const CHAT_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub chat_tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        let (chat_tx, _) = broadcast::channel(CHAT_CHANNEL_CAPACITY);
        Self { pool, orm, chat_tx }
    }
}
