pub mod error;
pub mod setup;

pub use error::TestError;
pub use setup::{TestSetup, TEST_SEASON};

pub mod prelude {
    pub use crate::{
        test_setup_with_core_tables, test_setup_with_tables, TestError, TestSetup, TEST_SEASON,
    };
}
