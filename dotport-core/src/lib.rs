pub mod domain;
pub mod error;
pub mod fields;
pub mod format;
pub mod pagination;
pub mod record;
pub mod session;
pub mod validate;
pub mod value;

pub use domain::*;
pub use error::*;
pub use fields::*;
pub use format::*;
pub use pagination::*;
pub use record::*;
pub use session::*;
pub use validate::*;
pub use value::*;
