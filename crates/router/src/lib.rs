pub mod provider;
pub mod response;
pub mod router;

pub use response::RouterResponse;
pub use router::{Router, RouterError};
