use crate::analyzer::fair_value_gap::FairValueGap;
use crate::analyzer::narrative::format_fixed2;
use crate::analyzer::support_resistance::SupportResistance;
use crate::indicator::IndicatorSet;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

/// 가격 구간 (하단, 상단)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn new(low: f64, high: f64) -> PriceBand {
        PriceBand { low, high }
    }

    /// 구간 폭
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

impl Display for PriceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", format_fixed2(self.low), format_fixed2(self.high))
    }
}

// `[low, high]` 배열로 직렬화
impl Serialize for PriceBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.low, self.high].serialize(serializer)
    }
}

/// 매수/매도 구간 계수
///
/// 구간 폭은 `min(ATR 배수, 가격 비율 상한)`으로 정해집니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneParams {
    pub aggressive_atr_multiple: f64,
    pub aggressive_cap_ratio: f64,
    pub standard_atr_multiple: f64,
    pub standard_cap_ratio: f64,
    pub sell_atr_multiple: f64,
    pub sell_cap_ratio: f64,
}

impl Default for ZoneParams {
    fn default() -> Self {
        ZoneParams {
            aggressive_atr_multiple: 0.25,
            aggressive_cap_ratio: 0.02,
            standard_atr_multiple: 0.5,
            standard_cap_ratio: 0.03,
            sell_atr_multiple: 0.75,
            sell_cap_ratio: 0.03,
        }
    }
}

/// 매수/매도 구간과 신뢰도 점수
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneSet {
    pub buy_aggressive: PriceBand,
    pub buy_standard: PriceBand,
    pub sell_standard: PriceBand,
    /// 순서형 휴리스틱 점수 [-1, 4], 확률이 아님
    pub confidence: i32,
}

impl ZoneSet {
    /// 지지/저항과 ATR로 구간을 만들고 신뢰도를 계산합니다.
    ///
    /// # Arguments
    /// * `price` - 최근 종가
    /// * `indicators` - 지표 모음
    /// * `levels` - 지지/저항
    /// * `fvg` - 최근 Fair Value Gap
    /// * `params` - 구간 계수
    ///
    /// # Returns
    /// * `ZoneSet` - 매수/매도 구간과 점수
    pub fn synthesize(
        price: f64,
        indicators: &IndicatorSet,
        levels: &SupportResistance,
        fvg: &FairValueGap,
        params: &ZoneParams,
    ) -> ZoneSet {
        let atr = indicators.atr14;
        let support = levels.support;
        let resistance = levels.resistance;

        let buy_aggressive = PriceBand::new(
            support,
            (support + params.aggressive_atr_multiple * atr)
                .min(support * (1.0 + params.aggressive_cap_ratio)),
        );
        let buy_standard = PriceBand::new(
            support,
            (support + params.standard_atr_multiple * atr)
                .min(support * (1.0 + params.standard_cap_ratio)),
        );
        let sell_standard = PriceBand::new(
            resistance - (params.sell_atr_multiple * atr).min(resistance * params.sell_cap_ratio),
            resistance,
        );

        ZoneSet {
            buy_aggressive,
            buy_standard,
            sell_standard,
            confidence: confidence_score(price, indicators, fvg),
        }
    }
}

/// 신뢰도 점수
///
/// * EMA50 > EMA200 이면 +2, 아니면 -1
/// * VWAP < 가격 이면 +1
/// * FVG 존재 시 +1
pub fn confidence_score(price: f64, indicators: &IndicatorSet, fvg: &FairValueGap) -> i32 {
    let trend = if indicators.is_bullish() { 2 } else { -1 };
    let vwap = if indicators.vwap < price { 1 } else { 0 };
    let gap = if fvg.exists() { 1 } else { 0 };
    trend + vwap + gap
}
