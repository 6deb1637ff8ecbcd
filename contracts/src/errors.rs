//! Protocol error definitions.

use odra::prelude::*;
use odra::casper_types::U256;

/// DSC engine errors
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DscError {
    // Input errors (1xx)
    InvalidAmount,
    UnsupportedAsset,

    // Ledger errors (2xx)
    InsufficientCollateral,
    InternalAccountingError,
    ArithmeticOverflow,

    // Collaborator errors (3xx)
    TransferFailed,
    MintFailed,
    PriceUnavailable,
    InsufficientTokenBalance,
    InsufficientAllowance,

    // Solvency errors (4xx)
    HealthFactorBroken { health_factor: U256 },
    HealthFactorOk,
    HealthFactorNotImproved,

    // Configuration errors (5xx)
    ConfigurationLengthMismatch,
    DuplicateAsset,
    InvalidConfig,

    // Access errors (6xx)
    ReentrantCall,
    Unauthorized,
}

impl DscError {
    /// Stable numeric code used when reverting a contract call.
    pub const fn code(&self) -> u16 {
        match self {
            DscError::InvalidAmount => 100,
            DscError::UnsupportedAsset => 101,

            DscError::InsufficientCollateral => 200,
            DscError::InternalAccountingError => 201,
            DscError::ArithmeticOverflow => 202,

            DscError::TransferFailed => 300,
            DscError::MintFailed => 301,
            DscError::PriceUnavailable => 302,
            DscError::InsufficientTokenBalance => 303,
            DscError::InsufficientAllowance => 304,

            DscError::HealthFactorBroken { .. } => 400,
            DscError::HealthFactorOk => 401,
            DscError::HealthFactorNotImproved => 402,

            DscError::ConfigurationLengthMismatch => 500,
            DscError::DuplicateAsset => 501,
            DscError::InvalidConfig => 502,

            DscError::ReentrantCall => 600,
            DscError::Unauthorized => 601,
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // Input
            DscError::InvalidAmount => "Amount must be greater than zero",
            DscError::UnsupportedAsset => "Collateral asset not supported",

            // Ledger
            DscError::InsufficientCollateral => "Insufficient collateral",
            DscError::InternalAccountingError => "Internal accounting error: ledger underflow",
            DscError::ArithmeticOverflow => "Arithmetic overflow",

            // Collaborators
            DscError::TransferFailed => "Token transfer failed",
            DscError::MintFailed => "Stable unit mint failed",
            DscError::PriceUnavailable => "Price feed answer unusable",
            DscError::InsufficientTokenBalance => "Insufficient token balance",
            DscError::InsufficientAllowance => "Insufficient allowance",

            // Solvency
            DscError::HealthFactorBroken { .. } => "Health factor below minimum",
            DscError::HealthFactorOk => "Health factor is ok: account cannot be liquidated",
            DscError::HealthFactorNotImproved => "Liquidation did not improve health factor",

            // Config
            DscError::ConfigurationLengthMismatch => {
                "Collateral assets and price feeds must have the same length"
            }
            DscError::DuplicateAsset => "Collateral asset registered twice",
            DscError::InvalidConfig => "Invalid configuration parameter",

            // Access
            DscError::ReentrantCall => "Reentrant call rejected",
            DscError::Unauthorized => "Unauthorized: caller is not owner",
        }
    }
}

impl core::fmt::Display for DscError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DscError::HealthFactorBroken { health_factor } => {
                write!(f, "{} ({})", self.message(), health_factor)
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl From<DscError> for OdraError {
    fn from(error: DscError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error.code())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error.code(), error.message())
        }
    }
}
