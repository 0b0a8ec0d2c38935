use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::indicator::TABuilder;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;

/// 거래량 가중 평균 가격(VWAP) 지표
///
/// 전체 시리즈에 대해 누적 계산합니다 (롤링 윈도우 없음).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VWAP {
    /// VWAP 값
    pub value: f64,
    /// 총 거래량이 0이라 마지막 종가로 대체되었는지 여부
    pub is_fallback: bool,
}

impl Display for VWAP {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VWAP: {:.2}", self.value)
    }
}

/// VWAP 빌더
#[derive(Debug)]
pub struct VWAPBuilder<C: Candle> {
    /// (typical_price, volume) 쌍
    values: Vec<(f64, f64)>,
    _phantom: PhantomData<C>,
}

impl<C: Candle> Default for VWAPBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> VWAPBuilder<C>
where
    C: Candle,
{
    /// 새 VWAP 빌더 생성
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            _phantom: PhantomData,
        }
    }

    fn compute(&mut self, data: &[C]) -> VWAP {
        self.values.clear();
        self.values
            .extend(data.iter().map(|item| (item.typical_price(), item.volume())));

        let (cumulative_pv, cumulative_volume) = self
            .values
            .iter()
            .fold((0.0, 0.0), |(pv, vol), (price, volume)| {
                (pv + price * volume, vol + volume)
            });

        if cumulative_volume == 0.0 {
            // 거래량이 없으면 마지막 종가 사용
            let last_close = data.last().map(|c| c.close_price()).unwrap_or(0.0);
            return VWAP {
                value: last_close,
                is_fallback: true,
            };
        }

        VWAP {
            value: cumulative_pv / cumulative_volume,
            is_fallback: false,
        }
    }
}

impl<C> TABuilder<VWAP, C> for VWAPBuilder<C>
where
    C: Candle,
{
    fn from_series(&mut self, series: &CandleSeries<C>) -> VWAP {
        self.compute(series.items())
    }

    fn build(&mut self, data: &[C]) -> AnalysisOutcome<VWAP> {
        if data.is_empty() {
            return Err(AnalysisError::NoData);
        }
        Ok(self.compute(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candle::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candle(i: i64, high: f64, low: f64, close: f64, volume: f64) -> OhlcvCandle {
        let open_time = Utc.timestamp_opt(i * 60, 0).unwrap();
        OhlcvCandle {
            open_time,
            open: close,
            high,
            low,
            close,
            volume,
            close_time: open_time,
        }
    }

    #[test]
    fn test_volume_weighted() {
        // typical: 10, 20 / volume: 1, 3 -> (10 + 60) / 4
        let candles = vec![candle(0, 12.0, 8.0, 10.0, 1.0), candle(1, 22.0, 18.0, 20.0, 3.0)];
        let mut builder = VWAPBuilder::new();
        let vwap = builder.build(&candles).unwrap();
        assert_eq!(vwap.value, 17.5);
        assert!(!vwap.is_fallback);
    }

    #[test]
    fn test_zero_volume_falls_back_to_last_close() {
        let candles = vec![candle(0, 12.0, 8.0, 10.0, 0.0), candle(1, 22.0, 18.0, 21.0, 0.0)];
        let mut builder = VWAPBuilder::new();
        let vwap = builder.build(&candles).unwrap();
        assert_eq!(vwap.value, 21.0);
        assert!(vwap.is_fallback);
    }

    #[test]
    fn test_empty_data() {
        let mut builder = VWAPBuilder::<OhlcvCandle>::new();
        assert_eq!(builder.build(&[]).unwrap_err(), AnalysisError::NoData);
    }
}
