pub mod error;
pub mod handlers;
pub mod router;
pub mod views;

pub use handlers::*;
pub use router::*;
pub use views::Views;
