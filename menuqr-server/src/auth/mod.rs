//! Authentication middleware and login rate limiting

pub mod rate_limit;
pub mod restaurant_auth;

pub use rate_limit::RateLimiter;
pub use restaurant_auth::{MaybeRestaurant, RestaurantIdentity};
