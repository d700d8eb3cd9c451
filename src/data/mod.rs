pub mod error;
pub mod layout;
pub mod model;
pub mod persistence;
pub mod provider;

pub use error::DataError;
pub use model::{Compound, Dataset, Position, Reaction, Viewport};
pub use provider::{DataSource, DataState, DatasetProvider};
