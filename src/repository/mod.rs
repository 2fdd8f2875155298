mod order;
mod solar;

pub use order::OrderRepository;
pub use solar::SolarRepository;
