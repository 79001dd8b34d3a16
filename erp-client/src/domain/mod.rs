mod contract;
mod metering_point;
mod partner;
mod profile;

pub use contract::{Contract, ContractVersion};
pub use metering_point::{MeterLink, MeteringPoint};
pub use partner::{Partner, PartnerAddress};
pub use profile::Profile;
