pub mod caffeine_entry;
pub mod daily_limit;
pub mod drink;
pub mod favorite;
pub mod magic_link;
pub mod user;

// Re-export common types
pub use caffeine_entry::{
    CaffeineEntry, CreateEntryRequest, DailySummaryResponse, DayQuery, DayTotalResponse,
    HistoryQuery, NewCaffeineEntry, UpdateCaffeineEntry, UpdateEntryRequest,
};
pub use daily_limit::{
    DailyLimit, LimitHistoryEntry, LimitHistoryResponse, NewDailyLimit, SetLimitRequest,
};
pub use drink::{CreateDrinkRequest, Drink, NewDrink, UpdateDrink, UpdateDrinkRequest};
pub use favorite::{CreateFavoriteRequest, Favorite, NewFavorite};
pub use magic_link::{
    MagicLinkRequest, MagicLinkResponse, MagicLinkToken, NewMagicLinkToken, SessionResponse,
    VerifyMagicLinkRequest,
};
pub use user::{NewUser, User, UserError};
