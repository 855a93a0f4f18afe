pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod quiz;

pub use domain::configuration::{ConfigurationId, CustomerInfo, RingConfiguration};
pub use domain::metal::{Metal, MetalId, MetalType};
pub use domain::quote::{
    CustomerDetails, QuoteRequest, QuoteRequestId, QuoteRequestStatus, QUOTE_RESPONSE_SLA,
};
pub use domain::setting::{Setting, SettingId};
pub use domain::stone::{Availability, GemType, Stone, StoneCut, StoneId, StoneSize};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{PriceBreakdown, PriceDetails, PriceQuote};
pub use quiz::{PersonalityRecommendation, QuizAnalysis, QuizOption, QuizQuestion};
