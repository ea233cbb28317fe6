use rota_types::CustomerId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("destination cannot be the same as origin ({place})")]
    SameOriginAndDestination { place: String },

    #[error("no customer ids left")]
    CustomerIdsExhausted,

    #[error("no reservation ids left for customer {customer}")]
    ReservationIdsExhausted { customer: CustomerId },
}
