pub mod codec;
pub mod extract;
pub mod gate;

pub use codec::{SessionCodec, SessionUser};
pub use extract::{AdminUser, CurrentUser};
