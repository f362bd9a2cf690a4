pub mod franchise {

    /// Age after which a cached franchise graph is eligible for refresh.
    pub const STALE_GRAPH_HORIZON_DAYS: i64 = 7;

    pub const DEFAULT_STALE_BATCH: u64 = 25;
}

pub mod recommendation {

    /// How many recently completed works the global suggestion looks at.
    pub const DEFAULT_RECENT_COMPLETED_WINDOW: u64 = 20;
}
