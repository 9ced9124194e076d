pub mod callback;
pub mod session;
pub mod state;
pub mod store;
pub mod token;

pub use callback::{listen_for_callback, CallbackParams};
pub use session::OAuthSession;
pub use state::generate_state;
pub use store::{store_path, FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{TokenRecord, TokenResponse, EXPIRY_MARGIN_SECS};
