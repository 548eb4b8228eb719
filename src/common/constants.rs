// Base relations
pub const GAME_SALES_TABLE: &str = "game_sales";
pub const REVIEWS_TABLE: &str = "reviews";

// Derived relations, materialized by the pipeline
pub const TOP_CRITIC_YEARS_TABLE: &str = "top_critic_years";
pub const TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE: &str =
    "top_critic_years_more_than_four_games";
pub const TOP_USER_YEARS_MORE_THAN_FOUR_GAMES_TABLE: &str = "top_user_years_more_than_four_games";

// Pipeline defaults
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MIN_GAMES: usize = 4;

// Storage defaults
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "gamedb.toml";
pub const CONFIG_ENV_PREFIX: &str = "GAMEDB";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Catalog
pub const TABLE_EXISTS_MSG: &str = "Table already exists:";
pub const NO_TABLE_FOUND_MSG: &str = "No table found with name:";
