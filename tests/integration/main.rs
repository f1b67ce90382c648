//! End-to-end tests: universe → scanner → decision pipeline → report,
//! driven by an in-memory market-data provider.

mod api;
mod mock_provider;
mod scan;
