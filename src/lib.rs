pub mod analyzer;
pub mod candle;
pub mod candle_series;
pub mod error;
pub mod indicator;
pub mod insight_cache;
pub mod model;

/// 설정 로더
pub mod config_loader;

pub use analyzer::{MarketAnalyzer, analyze};
pub use candle::{Candle, OhlcvCandle};
pub use candle_series::CandleSeries;
pub use error::AnalysisError;
pub use model::AnalysisResult;
