// Services module for Jolt Backend
// Business logic layer for the application

pub mod account_link;
pub mod drink;
pub mod email;
pub mod entry;
pub mod favorite;
pub mod limits;
pub mod magic_link;
pub mod session;

// Re-export commonly used services
pub use account_link::AccountLinkService;
pub use drink::DrinkService;
pub use email::{EmailError, EmailService};
pub use entry::EntryService;
pub use favorite::FavoriteService;
pub use limits::{day_bounds_utc, resolve_effective, DailyTotals, LimitService};
pub use magic_link::{MagicLinkService, MagicLinkTokenInfo};
pub use session::{SessionData, SessionError, SessionService};
