mod compensation;
mod filing_status;
mod grant;
mod pay_frequency;
mod tax_bracket;

pub use compensation::CompensationProfile;
pub use filing_status::FilingStatus;
pub use grant::{GrantPortfolio, GrantTranche, PortfolioSummary, ShareListing};
pub use pay_frequency::PayFrequency;
pub use tax_bracket::TaxBracket;
