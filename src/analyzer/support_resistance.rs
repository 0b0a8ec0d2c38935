use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::error::AnalysisOutcome;
use serde::Serialize;
use std::fmt::Display;

/// 기본 지지/저항 탐색 윈도우
pub const DEFAULT_LOOKBACK: usize = 20;

/// 최근 지지/저항 레벨
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportResistance {
    /// 윈도우 내 최저 저가
    pub support: f64,
    /// 윈도우 내 최고 고가
    pub resistance: f64,
}

impl Display for SupportResistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SupportResistance(support: {:.2}, resistance: {:.2})",
            self.support, self.resistance
        )
    }
}

impl SupportResistance {
    /// 최근 `lookback`개 캔들에서 지지/저항 계산
    ///
    /// 시리즈가 `lookback`보다 짧으면 모든 캔들을 사용합니다.
    ///
    /// # Arguments
    /// * `series` - 캔들 시리즈
    /// * `lookback` - 탐색 윈도우 크기
    ///
    /// # Returns
    /// * `SupportResistance` - 지지/저항 레벨
    pub fn detect<C: Candle>(series: &CandleSeries<C>, lookback: usize) -> SupportResistance {
        let window = series.tail(lookback.max(1));

        let support = window
            .iter()
            .map(|c| c.low_price())
            .fold(f64::INFINITY, f64::min);
        let resistance = window
            .iter()
            .map(|c| c.high_price())
            .fold(f64::NEG_INFINITY, f64::max);

        SupportResistance {
            support,
            resistance,
        }
    }

    /// 캔들 슬라이스에서 지지/저항 계산 (빈 슬라이스면 `NoData`)
    pub fn from_candles<C: Candle>(data: &[C], lookback: usize) -> AnalysisOutcome<SupportResistance> {
        let series = CandleSeries::from_slice(data)?;
        Ok(Self::detect(&series, lookback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candle::OhlcvCandle;
    use crate::error::AnalysisError;
    use chrono::{TimeZone, Utc};

    fn candle(i: i64, high: f64, low: f64) -> OhlcvCandle {
        let open_time = Utc.timestamp_opt(i * 60, 0).unwrap();
        OhlcvCandle {
            open_time,
            open: low,
            high,
            low,
            close: high,
            volume: 1.0,
            close_time: open_time,
        }
    }

    #[test]
    fn test_only_trailing_window_is_used() {
        // 첫 캔들의 극단값은 윈도우 밖이므로 무시되어야 함
        let candles = vec![
            candle(0, 500.0, 1.0),
            candle(1, 12.0, 9.0),
            candle(2, 14.0, 10.0),
            candle(3, 13.0, 8.0),
        ];
        let levels = SupportResistance::from_candles(&candles, 3).unwrap();
        assert_eq!(levels.support, 8.0);
        assert_eq!(levels.resistance, 14.0);
    }

    #[test]
    fn test_short_series_uses_all_candles() {
        let candles = vec![candle(0, 11.0, 7.0), candle(1, 12.0, 9.0)];
        let levels = SupportResistance::from_candles(&candles, DEFAULT_LOOKBACK).unwrap();
        assert_eq!(levels.support, 7.0);
        assert_eq!(levels.resistance, 12.0);
    }

    #[test]
    fn test_empty_data() {
        let result = SupportResistance::from_candles::<OhlcvCandle>(&[], DEFAULT_LOOKBACK);
        assert_eq!(result.unwrap_err(), AnalysisError::NoData);
    }
}
