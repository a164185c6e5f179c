mod persistors;
mod secondary;

pub use persistors::Persistors;
pub use secondary::SecondaryServices;
