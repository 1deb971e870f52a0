use axum::Router;
use invitely_shared::store::sqlite::SqliteInvitationStore;
use invitely_shared::store::{InvitationStore, INVITATION_LIST_LIMIT};
use invitely_shared::test_utils::mock_invitation_store::MockInvitationStore;
use invitely_shared::test_utils::test_logging::init_test_logging;
use log::debug;
use std::env;
use std::sync::Arc;

use crate::routes::create_router_with_store;

mod health_handlers_test;

pub(crate) enum TestStore {
    Mock(Arc<MockInvitationStore>),
    Sqlite(Arc<SqliteInvitationStore>),
}

impl TestStore {
    pub(crate) fn store(&self) -> &dyn InvitationStore {
        match self {
            TestStore::Mock(mock) => mock.as_ref(),
            TestStore::Sqlite(sqlite) => sqlite.as_ref(),
        }
    }

    pub(crate) async fn invitation_count(&self) -> usize {
        self.store()
            .get_recent_invitations(INVITATION_LIST_LIMIT)
            .await
            .unwrap()
            .len()
    }
}

/// Set TEST_STORE=sqlite to run the handler tests against an in-memory
/// SQLite database instead of the mock store.
fn use_sqlite() -> bool {
    env::var("TEST_STORE")
        .map(|v| v.eq_ignore_ascii_case("sqlite"))
        .unwrap_or(false)
}

// Helper to set up test application with the appropriate store based on environment
pub(crate) async fn create_test_app() -> (Router, TestStore) {
    init_test_logging();

    if use_sqlite() {
        debug!("Using in-memory SQLite store for handler tests");
        let store = Arc::new(SqliteInvitationStore::in_memory().await.unwrap());
        let app = create_router_with_store(store.clone());
        (app, TestStore::Sqlite(store))
    } else {
        debug!("Using mock store for handler tests");
        let store = Arc::new(MockInvitationStore::new());
        let app = create_router_with_store(store.clone());
        (app, TestStore::Mock(store))
    }
}
