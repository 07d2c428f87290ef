pub mod content;
pub mod counters;
pub mod follow_graph;
pub mod like_ledger;
pub mod recent;
pub mod users;

pub use content::ContentStore;
pub use follow_graph::FollowGraph;
pub use like_ledger::LikeLedger;
pub use recent::RecentViews;
pub use users::UserStore;
