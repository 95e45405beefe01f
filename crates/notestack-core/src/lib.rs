pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::NotestackError;
pub use result::NotestackResult;
pub use traits::KeyValueStore;
