pub mod types;
pub mod validate;
pub mod wizard;
pub mod schemas;
pub mod error;

pub use types::*;
pub use wizard::MultiStepForm;
pub use error::FormError;
