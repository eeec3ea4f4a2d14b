pub mod codec;
pub mod describe;
pub mod model;
pub mod palette;
