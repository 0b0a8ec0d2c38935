use crate::analyzer::fair_value_gap::FairValueGap;
use crate::analyzer::support_resistance::SupportResistance;
use crate::analyzer::zone::{PriceBand, ZoneSet};
use crate::indicator::IndicatorSet;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// 분석 결과
///
/// 호출마다 새로 생성되며 엔진은 결과에 대한 식별자나 만료 시간을 두지 않습니다.
/// JSON 직렬화 시 필드 이름과 중첩 구조는 UI가 직접 사용하므로 고정입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub symbol: String,
    pub timeframe: String,
    /// 마지막 종가
    pub price: f64,
    pub indicators: IndicatorSet,
    pub levels: SupportResistance,
    pub zones: ZoneSet,
    pub fvg: FairValueGap,
    pub narrative: String,
    pub updated_at: DateTime<Utc>,
}

impl Display for AnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnalysisResult({} {} price: {:.2}, confidence: {})",
            self.symbol, self.timeframe, self.price, self.zones.confidence
        )
    }
}

#[derive(Serialize)]
struct BuyZoneView<'a> {
    aggressive: &'a PriceBand,
    standard: &'a PriceBand,
    confidence: i32,
}

#[derive(Serialize)]
struct SellZoneView<'a> {
    standard: &'a PriceBand,
}

#[derive(Serialize)]
struct AnalysisResultView<'a> {
    symbol: &'a str,
    timeframe: &'a str,
    price: f64,
    indicators: &'a IndicatorSet,
    buy_zone: BuyZoneView<'a>,
    sell_zone: SellZoneView<'a>,
    fvg: &'a FairValueGap,
    narrative: &'a str,
    updated_at: &'a DateTime<Utc>,
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AnalysisResultView {
            symbol: &self.symbol,
            timeframe: &self.timeframe,
            price: self.price,
            indicators: &self.indicators,
            buy_zone: BuyZoneView {
                aggressive: &self.zones.buy_aggressive,
                standard: &self.zones.buy_standard,
                confidence: self.zones.confidence,
            },
            sell_zone: SellZoneView {
                standard: &self.zones.sell_standard,
            },
            fvg: &self.fvg,
            narrative: &self.narrative,
            updated_at: &self.updated_at,
        }
        .serialize(serializer)
    }
}

/// 요약 생성기(AI 등)에 넘기는 축약 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompactSummary {
    pub price: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub atr14: f64,
    pub vwap: f64,
    pub buy_zone: PriceBand,
    pub sell_zone: PriceBand,
}

impl AnalysisResult {
    /// 축약 결과 생성
    pub fn compact(&self) -> CompactSummary {
        CompactSummary {
            price: self.price,
            ema50: self.indicators.ema50,
            ema200: self.indicators.ema200,
            atr14: self.indicators.atr14,
            vwap: self.indicators.vwap,
            buy_zone: self.zones.buy_standard,
            sell_zone: self.zones.sell_standard,
        }
    }

    /// JSON 문자열로 직렬화
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            symbol: "BTCUSDT".to_string(),
            timeframe: "1h".to_string(),
            price: 10.0,
            indicators: IndicatorSet {
                ema50: 9.0,
                ema200: 8.0,
                atr14: 1.0,
                vwap: 9.5,
            },
            levels: SupportResistance {
                support: 8.0,
                resistance: 11.0,
            },
            zones: ZoneSet {
                buy_aggressive: PriceBand::new(8.0, 8.16),
                buy_standard: PriceBand::new(8.0, 8.24),
                sell_standard: PriceBand::new(10.67, 11.0),
                confidence: 3,
            },
            fvg: FairValueGap::Absent,
            narrative: "n".to_string(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["symbol"], "BTCUSDT");
        assert_eq!(value["timeframe"], "1h");
        assert_eq!(value["price"], 10.0);
        assert_eq!(value["indicators"]["ema50"], 9.0);
        assert_eq!(value["indicators"]["ema200"], 8.0);
        assert_eq!(value["indicators"]["atr14"], 1.0);
        assert_eq!(value["indicators"]["vwap"], 9.5);
        assert_eq!(value["buy_zone"]["aggressive"], serde_json::json!([8.0, 8.16]));
        assert_eq!(value["buy_zone"]["standard"], serde_json::json!([8.0, 8.24]));
        assert_eq!(value["buy_zone"]["confidence"], 3);
        assert_eq!(value["sell_zone"]["standard"], serde_json::json!([10.67, 11.0]));
        assert_eq!(value["fvg"]["exists"], false);
        assert_eq!(value["narrative"], "n");
        assert_eq!(value["updated_at"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_compact_summary() {
        let compact = sample().compact();
        assert_eq!(compact.price, 10.0);
        assert_eq!(compact.buy_zone, PriceBand::new(8.0, 8.24));
        assert_eq!(compact.sell_zone, PriceBand::new(10.67, 11.0));

        let value = serde_json::to_value(compact).unwrap();
        assert_eq!(value["buy_zone"], serde_json::json!([8.0, 8.24]));
    }
}
