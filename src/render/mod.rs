pub mod compositor;
pub mod fonts;
pub mod layout;
pub mod plugins;
