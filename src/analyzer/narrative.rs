use crate::analyzer::fair_value_gap::FairValueGap;
use crate::analyzer::support_resistance::SupportResistance;
use crate::analyzer::zone::ZoneSet;
use crate::indicator::IndicatorSet;
use rust_decimal::prelude::*;

/// 서술문 생성에 필요한 파생 값 전체
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInput<'a> {
    pub price: f64,
    pub indicators: &'a IndicatorSet,
    pub levels: &'a SupportResistance,
    pub zones: &'a ZoneSet,
    pub fvg: &'a FairValueGap,
}

/// 소수점 둘째 자리 고정 표기
///
/// 이진 값이 정확히 중간값이면 0에서 먼 쪽으로 올립니다 (`0.125` → `0.13`).
/// 표준 `{:.2}`는 짝수 쪽으로 반올림하므로 서술문 숫자는 모두 이 함수를 거칩니다.
///
/// # Arguments
/// * `value` - 표기할 값
///
/// # Returns
/// * `String` - 소수점 둘째 자리 문자열
pub fn format_fixed2(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => format!(
            "{:.2}",
            exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        // NaN, 무한대, Decimal 범위를 넘는 값
        None => format!("{:.2}", value),
    }
}

/// 고정 템플릿 서술문 생성
///
/// 문장 순서와 소수점 둘째 자리 반올림은 고정되어 있으며,
/// 수치 계산과 분리된 순수 함수입니다.
pub fn build_narrative(input: &NarrativeInput) -> String {
    let ind = input.indicators;
    let mut parts: Vec<String> = Vec::with_capacity(8);

    parts.push(format!(
        "Price: {} | EMA50: {} | EMA200: {} | ATR14: {}",
        format_fixed2(input.price),
        format_fixed2(ind.ema50),
        format_fixed2(ind.ema200),
        format_fixed2(ind.atr14)
    ));

    let bias = if ind.is_bullish() {
        "Bullish bias (EMA50 > EMA200)."
    } else {
        "Bearish bias (EMA50 <= EMA200)."
    };
    parts.push(bias.to_string());

    parts.push(format!(
        "Support ~ {}, Resistance ~ {}.",
        format_fixed2(input.levels.support),
        format_fixed2(input.levels.resistance)
    ));
    parts.push(format!("Aggressive buy zone: {}.", input.zones.buy_aggressive));
    parts.push(format!("Standard buy zone: {}.", input.zones.buy_standard));
    parts.push(format!("Sell zone: {}.", input.zones.sell_standard));

    match input.fvg {
        FairValueGap::Present {
            direction, range, ..
        } => parts.push(format!(
            "Fair Value Gap detected ({}) at {} - {}.",
            direction,
            format_fixed2(range.0),
            format_fixed2(range.1)
        )),
        FairValueGap::Absent => {
            parts.push("No clear Fair Value Gap detected in recent candles.".to_string())
        }
    }

    parts.push("Use stop-loss around 1*ATR below support for conservative positions.".to_string());

    parts.join(" ")
}
