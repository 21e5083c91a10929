//! Drill-down navigation: a pure state machine plus the async driver that feeds it.

mod controller;
pub mod gateway;
mod state;

#[cfg(test)]
pub(crate) mod tests;

pub use controller::{
    fetch_run, Commit, DashboardData, DrilldownController, DrilldownError, ErrorSink, Loaded,
    Ticket, TracingErrorSink,
};
pub use gateway::{GatewayError, ReviewGateway};
pub use state::{
    transition, Breadcrumb, DetailSubLevel, Level, LoadIntent, NavAction, NavigationError,
    NavigationState, Transition,
};
