// 기술적 지표 모듈
// EMA, ATR, VWAP을 캔들 시리즈로부터 계산합니다.

pub mod atr;
pub mod ma;
pub mod utils;
pub mod vwap;

use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::error::AnalysisOutcome;
use atr::ATRBuilder;
use ma::MA;
use ma::ema::EMABuilder;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use vwap::VWAPBuilder;

/// 기술적 지표 생성 인터페이스
///
/// 모든 계산은 호출마다 새로 수행되며 호출 간 상태를 유지하지 않습니다.
pub trait TABuilder<T, C: Candle>: Send + std::fmt::Debug {
    /// 시리즈에서 기술적 지표 생성
    ///
    /// # Arguments
    /// * `series` - 비어 있지 않은 캔들 시리즈
    ///
    /// # Returns
    /// * `T` - 생성된 기술적 지표
    fn from_series(&mut self, series: &CandleSeries<C>) -> T;

    /// 캔들 슬라이스에서 기술적 지표 생성
    ///
    /// # Arguments
    /// * `data` - 시간 순 캔들 슬라이스
    ///
    /// # Returns
    /// * `AnalysisOutcome<T>` - 생성된 지표, 빈 슬라이스면 `NoData`
    fn build(&mut self, data: &[C]) -> AnalysisOutcome<T>;
}

/// 지표 계산 기간 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    /// 단기 EMA 기간
    pub ema_fast: usize,
    /// 장기 EMA 기간
    pub ema_slow: usize,
    /// ATR 기간
    pub atr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_fast: 50,
            ema_slow: 200,
            atr_period: 14,
        }
    }
}

/// 지표 값 모음
///
/// 필드 이름은 직렬화 결과(`indicators.{ema50,ema200,atr14,vwap}`)에 그대로 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ema50: f64,
    pub ema200: f64,
    pub atr14: f64,
    pub vwap: f64,
}

impl Display for IndicatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IndicatorSet(ema50: {:.2}, ema200: {:.2}, atr14: {:.2}, vwap: {:.2})",
            self.ema50, self.ema200, self.atr14, self.vwap
        )
    }
}

impl IndicatorSet {
    /// 시리즈에서 모든 지표 계산
    ///
    /// # Arguments
    /// * `series` - 캔들 시리즈
    /// * `params` - 지표 기간 설정
    ///
    /// # Returns
    /// * `IndicatorSet` - 계산된 지표 모음
    pub fn calculate<C: Candle>(series: &CandleSeries<C>, params: &IndicatorParams) -> IndicatorSet {
        let ema_fast = EMABuilder::<C>::new(params.ema_fast).from_series(series);
        let ema_slow = EMABuilder::<C>::new(params.ema_slow).from_series(series);
        let atr = ATRBuilder::<C>::new(params.atr_period).from_series(series);
        let vwap = VWAPBuilder::<C>::new().from_series(series);

        if vwap.is_fallback {
            log::warn!("총 거래량이 0이므로 VWAP를 마지막 종가 {:.2}로 대체", vwap.value);
        }
        log::debug!("지표 계산 완료: {}, {}, {}, {}", ema_fast, ema_slow, atr, vwap);

        IndicatorSet {
            ema50: ema_fast.get(),
            ema200: ema_slow.get(),
            atr14: atr.value,
            vwap: vwap.value,
        }
    }

    /// 캔들 슬라이스에서 모든 지표 계산
    pub fn from_candles<C: Candle>(data: &[C], params: &IndicatorParams) -> AnalysisOutcome<IndicatorSet> {
        let series = CandleSeries::from_slice(data)?;
        Ok(Self::calculate(&series, params))
    }

    /// 단기 EMA가 장기 EMA 위에 있는지 (상승 편향)
    pub fn is_bullish(&self) -> bool {
        self.ema50 > self.ema200
    }
}
