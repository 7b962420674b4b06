pub mod carousel;
pub mod drawer;

pub use carousel::{AutoAdvance, Carousel, CarouselConfig, Frame};
pub use drawer::{Drawer, DrawerState};
