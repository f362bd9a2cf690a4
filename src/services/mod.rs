pub mod franchise_service;
pub use franchise_service::{
    FranchiseError, FranchiseService, SyncOutcome, canonical_key, decode_snapshot,
};

pub mod franchise_service_impl;
pub use franchise_service_impl::SeaOrmFranchiseService;

pub mod recommendation_service;
pub use recommendation_service::{RecommendationError, RecommendationService, Suggestion};

pub mod recommendation_service_impl;
pub use recommendation_service_impl::SeaOrmRecommendationService;

pub mod watch_order_service;
pub use watch_order_service::WatchOrderService;

pub mod refresh;
pub use refresh::{RefreshReport, refresh_stale_graphs};

pub mod scheduler;
pub use scheduler::Scheduler;
