pub mod bridge;
pub mod fatality;
pub mod railroad;
pub mod reference;
pub mod transit;

pub use bridge::*;
pub use fatality::*;
pub use railroad::*;
pub use reference::*;
pub use transit::*;
