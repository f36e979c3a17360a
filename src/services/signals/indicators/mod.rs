//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod trend;

pub use bollinger::{simple_returns, Volatility};
pub use ema::{ema, ema_series, Ema};
pub use macd::Macd;
pub use momentum::{momentum, Momentum};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use stochastic::{stochastic, Stochastic};
pub use trend::{analyze_trend, trend_strength, Trend};
