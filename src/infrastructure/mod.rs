pub mod google_auth;
pub mod spotify;
pub mod throttle;
pub mod youtube;
