pub mod claims;
pub mod extractor;
pub mod jwt;
pub mod utils;

pub use claims::{Claims, UserRole};
pub use extractor::AuthenticatedUser;
pub use jwt::JwtService;
pub use utils::require_teacher;
