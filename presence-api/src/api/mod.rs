//! HTTP API handlers for presence-api

pub mod error;
pub mod health;
pub mod presence;

pub use error::ApiError;
pub use health::health_routes;
pub use presence::{
    mean_time_weekday_view, presence_start_end_view, presence_weekday_view, users_view,
};
