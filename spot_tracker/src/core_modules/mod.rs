pub mod bright_mask;
pub mod frame;
pub mod motion_locator;
pub mod pixel;
