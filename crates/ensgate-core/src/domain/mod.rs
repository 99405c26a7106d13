mod address;
mod amount;
mod name;
mod timestamp;

pub use address::Address;
pub use amount::{RegistrationDuration, Wei, SECONDS_PER_YEAR};
pub use name::EnsName;
pub use timestamp::UtcDateTime;
