pub mod clock;
pub mod config;
pub mod delay;
pub mod input;
pub mod launch;
pub mod nav;
pub mod orp;
pub mod reader;
pub mod session;
pub mod state;
pub mod text;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock, TickReport, Ticker};
pub use orp::{calculate_chunk_orp, calculate_orp, OrpResult};
pub use reader::Reader;
pub use session::{Session, SessionSnapshot};
pub use text::tokenize;
