mod interaction;
mod promotion;
mod score;
mod user;

pub use interaction::*;
pub use promotion::*;
pub use score::*;
pub use user::*;
