pub mod auth;
pub mod health;
pub mod index;
pub mod items;
pub mod point;
pub mod session;
pub mod settings;
pub mod validation;

pub use auth::{delete_account, heartbeat, login, register_user};
pub use health::health_check;
pub use index::{index, LedgerView};
pub use items::{add_reward, add_task, list_removable, remove_items};
pub use point::{point, timer_submit};
pub use session::AuthUser;
pub use settings::{update_quote_seed, update_settings};
