//! HTTP API behind the portfolio site: contact form submissions and
//! per-session theme preferences stored in MongoDB, with an optional
//! Google Sheets copy of every contact.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub mod models {
    pub mod contact;
    pub mod theme;
}

pub mod repositories {
    pub mod contact;
    pub mod theme;
}

pub mod services {
    pub mod contact;
    pub mod theme;
}

pub mod handlers {
    pub mod contact;
    pub mod fallback;
    pub mod health;
    pub mod theme;
}

pub mod integrations {
    pub mod google_sheets;
}

pub mod middleware_layer {
    pub mod panic;
}

pub mod validation {
    pub mod contact;
    pub mod theme;
}

pub use routes::router;
pub use state::AppState;
