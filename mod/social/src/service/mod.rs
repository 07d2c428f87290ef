pub mod content;
pub mod engagement;
pub mod follow;
pub mod threads;

use std::sync::Arc;

use notify::service::NotifyService;
use openhome_core::ServiceError;
use openhome_kv::KVStore;
use openhome_sql::SQLStore;

use crate::store::{ContentStore, FollowGraph, LikeLedger, RecentViews, UserStore};

/// The engagement facade.
///
/// One user-facing action is one call here, and each call is one logical
/// unit: existence/authorization checks first, then the ledger/graph
/// mutation together with its counter deltas inside a single storage
/// transaction, then notification fan-out. Fan-out runs after the
/// transaction commits and is best-effort — a failed notification is
/// logged and swallowed, everything else propagates unmodified.
pub struct SocialService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) users: UserStore,
    pub(crate) content: Arc<ContentStore>,
    pub(crate) likes: LikeLedger,
    pub(crate) follows: FollowGraph,
    pub(crate) recent: RecentViews,
    pub(crate) notify: Arc<NotifyService>,
}

impl SocialService {
    /// Create the facade, initialising the schemas it owns.
    ///
    /// The [`ContentStore`] is passed in (rather than built here) because
    /// the same instance also serves as the notify module's target
    /// resolver — both sides must see one store.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        content: Arc<ContentStore>,
        notify: Arc<NotifyService>,
    ) -> Result<Arc<Self>, ServiceError> {
        let users = UserStore::new(Arc::clone(&sql))?;
        let likes = LikeLedger::new(Arc::clone(&sql))?;
        let follows = FollowGraph::new(Arc::clone(&sql))?;
        let recent = RecentViews::new(kv);

        Ok(Arc::new(Self {
            sql,
            users,
            content,
            likes,
            follows,
            recent,
            notify,
        }))
    }

    /// The notify service this facade fans out to.
    pub fn notify(&self) -> &Arc<NotifyService> {
        &self.notify
    }
}
