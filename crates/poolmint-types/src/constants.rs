//! System-wide constants for the Poolmint engine.

/// Maximum decimal precision for prices (8 decimal places).
pub const PRICE_PRECISION: u32 = 8;

/// Maximum decimal precision for token quantities (8 decimal places).
pub const QTY_PRECISION: u32 = 8;

/// Default total token supply at genesis.
pub const DEFAULT_TOTAL_SUPPLY: u64 = 100_000_000;

/// Default admin reserve carved out of the total supply at genesis.
pub const DEFAULT_ADMIN_RESERVE: u64 = 10_000_000;

/// Default base token value in fiat, expressed in ten-thousandths
/// (10 ten-thousandths = 0.0010).
pub const DEFAULT_BASE_VALUE_TEN_THOUSANDTHS: i64 = 10;

/// Default inflation slope in tenths (25 tenths = 2.5). The current value
/// is `base * (1 + usage * slope)`.
pub const DEFAULT_INFLATION_SLOPE_TENTHS: i64 = 25;

/// Fee percentage applied to BUY-side fiat flows at the API boundary.
pub const BUY_FEE_PERCENT: i64 = 1;

/// Fee percentage applied to withdrawals.
pub const WITHDRAW_FEE_PERCENT: i64 = 10;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Poolmint";
